//! Directory access abstraction.
//!
//! The allocation algorithms only ever see these traits; the concrete LDAP
//! backend lives in its own crate. Implementations are used strictly
//! sequentially: one query or update in flight at a time.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::DirectoryResult;

/// A single directory entry: DN plus attribute multi-map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub dn: String,
    pub attrs: HashMap<String, Vec<String>>,
}

impl DirectoryEntry {
    pub fn new(dn: impl Into<String>) -> Self {
        Self {
            dn: dn.into(),
            attrs: HashMap::new(),
        }
    }

    /// Attach an attribute with its values.
    pub fn with_attr(mut self, name: impl Into<String>, values: Vec<String>) -> Self {
        self.attrs.insert(name.into(), values);
        self
    }

    /// First value of an attribute, if present.
    pub fn first(&self, attribute: &str) -> Option<&str> {
        self.attrs
            .get(attribute)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Whether the entry carries at least one value for the attribute.
    pub fn has(&self, attribute: &str) -> bool {
        self.attrs
            .get(attribute)
            .is_some_and(|values| !values.is_empty())
    }
}

/// Lazy, finite sequence of result pages from a paginated subtree read.
///
/// Pulling page by page bounds memory regardless of directory size.
#[async_trait]
pub trait EntryPager: Send {
    /// Next page of entries, or `None` once the directory reports the end of
    /// the result set.
    async fn next_page(&mut self) -> DirectoryResult<Option<Vec<DirectoryEntry>>>;
}

/// Read/write capability against one bound directory connection.
///
/// Connection lifecycle (bind/unbind) stays on the concrete backend; by the
/// time a `Directory` is handed to the allocator it must already be bound.
#[async_trait]
pub trait Directory: Send {
    /// Paginated subtree read retrieving only `attrs` for each match.
    async fn paged_scan(
        &mut self,
        base: &str,
        filter: &str,
        attrs: &[&str],
        page_size: i32,
    ) -> DirectoryResult<Box<dyn EntryPager + Send>>;

    /// Unpaginated subtree read. Used where the expected result set is small.
    async fn search(
        &mut self,
        base: &str,
        filter: &str,
        attrs: &[&str],
    ) -> DirectoryResult<Vec<DirectoryEntry>>;

    /// Replace `attribute` on the entry at `dn` with the single `value`.
    async fn replace_attribute(
        &mut self,
        dn: &str,
        attribute: &str,
        value: &str,
    ) -> DirectoryResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_returns_leading_value() {
        let entry = DirectoryEntry::new("uid=jdoe,ou=users,dc=example,dc=org")
            .with_attr("cn", vec!["jdoe".to_string(), "John Doe".to_string()]);

        assert_eq!(entry.first("cn"), Some("jdoe"));
        assert_eq!(entry.first("sn"), None);
    }

    #[test]
    fn has_requires_a_value() {
        let entry = DirectoryEntry::new("uid=jdoe,ou=users,dc=example,dc=org")
            .with_attr("employeeNumber", vec!["1001".to_string()])
            .with_attr("telephoneNumber", vec![]);

        assert!(entry.has("employeeNumber"));
        assert!(!entry.has("telephoneNumber"));
        assert!(!entry.has("mail"));
    }
}
