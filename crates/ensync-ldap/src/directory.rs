use std::collections::HashSet;

use async_trait::async_trait;
use ldap3::adapters::{Adapter, EntriesOnly, PagedResults};
use ldap3::{Ldap, LdapConnAsync, Mod, Scope, SearchEntry, SearchStream};
use tracing::{debug, info, warn};

use ensync_core::error::DirectoryResult;
use ensync_core::{Directory, DirectoryEntry, DirectoryError, EntryPager, JobConfig};

/// LDAP result code for invalid credentials.
const RC_INVALID_CREDENTIALS: u32 = 49;

/// One bound LDAP connection, used strictly sequentially for the duration of
/// a run.
pub struct LdapDirectory {
    ldap: Ldap,
}

impl LdapDirectory {
    /// Connect to the configured endpoint and bind as the directory
    /// administrator. Fails before any read or write if the bind is refused.
    pub async fn connect(cfg: &JobConfig) -> DirectoryResult<Self> {
        debug!(url = %cfg.endpoint, "connecting to LDAP server");
        let (conn, mut ldap) = LdapConnAsync::new(&cfg.endpoint)
            .await
            .map_err(|e| DirectoryError::Connect(e.to_string()))?;

        tokio::spawn(async move {
            if let Err(e) = conn.drive().await {
                warn!(error = %e, "LDAP connection driver error");
            }
        });

        let bind_dn = cfg.admin_dn();
        debug!(%bind_dn, "performing simple bind");
        let result = ldap
            .simple_bind(&bind_dn, &cfg.bind_password)
            .await
            .map_err(|e| DirectoryError::Bind(e.to_string()))?;

        if result.rc == RC_INVALID_CREDENTIALS {
            return Err(DirectoryError::Bind(format!(
                "invalid credentials for {bind_dn}"
            )));
        }
        if result.rc != 0 {
            return Err(DirectoryError::Bind(format!(
                "bind failed with code {}: {}",
                result.rc, result.text
            )));
        }

        info!(url = %cfg.endpoint, "LDAP connection established");
        Ok(Self { ldap })
    }

    /// Release the connection. Called at run end regardless of outcome.
    pub async fn unbind(&mut self) -> DirectoryResult<()> {
        self.ldap
            .unbind()
            .await
            .map_err(|e| DirectoryError::Query(e.to_string()))
    }
}

fn to_entry(entry: SearchEntry) -> DirectoryEntry {
    DirectoryEntry {
        dn: entry.dn,
        attrs: entry.attrs,
    }
}

/// Pager over an RFC 2696 paged-results search stream.
///
/// The adapter chain fetches follow-up pages transparently; this wrapper
/// regroups the per-entry stream into pages of at most `page_size` entries so
/// memory stays bounded for the caller.
struct LdapPager {
    stream: SearchStream<'static, String, Vec<String>>,
    page_size: usize,
    done: bool,
}

#[async_trait]
impl EntryPager for LdapPager {
    async fn next_page(&mut self) -> DirectoryResult<Option<Vec<DirectoryEntry>>> {
        if self.done {
            return Ok(None);
        }
        let mut page = Vec::new();
        loop {
            match self.stream.next().await {
                Ok(Some(result_entry)) => {
                    page.push(to_entry(SearchEntry::construct(result_entry)));
                    if page.len() >= self.page_size {
                        return Ok(Some(page));
                    }
                }
                Ok(None) => {
                    self.done = true;
                    self.stream
                        .finish()
                        .await
                        .success()
                        .map_err(|e| DirectoryError::Query(e.to_string()))?;
                    return Ok(if page.is_empty() { None } else { Some(page) });
                }
                Err(e) => {
                    self.done = true;
                    return Err(DirectoryError::Query(e.to_string()));
                }
            }
        }
    }
}

#[async_trait]
impl Directory for LdapDirectory {
    async fn paged_scan(
        &mut self,
        base: &str,
        filter: &str,
        attrs: &[&str],
        page_size: i32,
    ) -> DirectoryResult<Box<dyn EntryPager + Send>> {
        let adapters: Vec<Box<dyn Adapter<String, Vec<String>>>> = vec![
            Box::new(EntriesOnly::new()),
            Box::new(PagedResults::new(page_size)),
        ];
        let attrs: Vec<String> = attrs.iter().map(|a| (*a).to_string()).collect();
        let stream = self
            .ldap
            .streaming_search_with(adapters, base, Scope::Subtree, filter, attrs)
            .await
            .map_err(|e| DirectoryError::Query(e.to_string()))?;

        Ok(Box::new(LdapPager {
            stream,
            page_size: page_size.max(1) as usize,
            done: false,
        }))
    }

    async fn search(
        &mut self,
        base: &str,
        filter: &str,
        attrs: &[&str],
    ) -> DirectoryResult<Vec<DirectoryEntry>> {
        let attrs: Vec<String> = attrs.iter().map(|a| (*a).to_string()).collect();
        let (entries, _result) = self
            .ldap
            .search(base, Scope::Subtree, filter, attrs)
            .await
            .map_err(|e| DirectoryError::Query(e.to_string()))?
            .success()
            .map_err(|e| DirectoryError::Query(e.to_string()))?;

        Ok(entries
            .into_iter()
            .map(|result_entry| to_entry(SearchEntry::construct(result_entry)))
            .collect())
    }

    async fn replace_attribute(
        &mut self,
        dn: &str,
        attribute: &str,
        value: &str,
    ) -> DirectoryResult<()> {
        let mods = vec![Mod::Replace(
            attribute.to_string(),
            HashSet::from([value.to_string()]),
        )];
        self.ldap
            .modify(dn, mods)
            .await
            .map_err(|e| DirectoryError::Modify {
                dn: dn.to_string(),
                message: e.to_string(),
            })?
            .success()
            .map_err(|e| DirectoryError::Modify {
                dn: dn.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }
}
