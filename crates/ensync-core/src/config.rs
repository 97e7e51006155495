use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::escape;

/// Immutable configuration for one reconciliation run.
///
/// Built once at startup (typically from environment variables) and passed
/// into the scanner/assigner, so the allocation algorithm stays testable
/// against fixture directories.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JobConfig {
    /// LDAP endpoint URL.
    pub endpoint: String,

    /// Root DN of the directory (e.g. "dc=georchestra,dc=org").
    pub base_dn: String,

    /// OU holding user entries, relative to `base_dn`.
    pub users_ou: String,

    /// OU holding role entries, relative to `base_dn`.
    pub roles_ou: String,

    /// Role whose members should carry an employee number.
    pub match_role: String,

    /// Password for the administrative bind.
    pub bind_password: String,

    /// Attribute the job assigns.
    pub attribute: String,

    /// Lower bound for assigned numbers. The scan maximum is seeded here, so
    /// the first number handed out in an empty directory is `floor + 1`.
    pub floor: i64,

    /// Page size for the paginated attribute scan.
    pub page_size: i32,

    /// Pushgateway address. When unset, metrics reporting is skipped.
    pub pushgateway: Option<String>,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            endpoint: "ldap://localhost:3389".to_string(),
            base_dn: "dc=georchestra,dc=org".to_string(),
            users_ou: "ou=users".to_string(),
            roles_ou: "ou=roles".to_string(),
            match_role: "SSH_USER".to_string(),
            bind_password: "secret".to_string(),
            attribute: "employeeNumber".to_string(),
            floor: 1000,
            page_size: 1000,
            pushgateway: None,
        }
    }
}

impl std::fmt::Debug for JobConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobConfig")
            .field("endpoint", &self.endpoint)
            .field("base_dn", &self.base_dn)
            .field("users_ou", &self.users_ou)
            .field("roles_ou", &self.roles_ou)
            .field("match_role", &self.match_role)
            .field("bind_password", &"***REDACTED***")
            .field("attribute", &self.attribute)
            .field("floor", &self.floor)
            .field("page_size", &self.page_size)
            .field("pushgateway", &self.pushgateway)
            .finish()
    }
}

impl JobConfig {
    /// Root of the user subtree, scope of every query the job issues.
    pub fn user_base(&self) -> String {
        format!("{},{}", self.users_ou, self.base_dn)
    }

    /// DN used for the administrative bind.
    pub fn admin_dn(&self) -> String {
        format!("cn=admin,{}", self.base_dn)
    }

    /// DN of the configured role entry.
    pub fn role_dn(&self) -> String {
        format!("cn={},{},{}", self.match_role, self.roles_ou, self.base_dn)
    }

    /// Filter selecting every entry that already carries the attribute.
    pub fn scan_filter(&self) -> String {
        format!("({}=*)", self.attribute)
    }

    /// Filter selecting role members that do not yet carry the attribute.
    pub fn eligible_filter(&self) -> String {
        format!(
            "(&(objectClass=InetOrgPerson)(memberOf=cn={},{},{})(!({}=*)))",
            escape::filter_value(&self.match_role),
            self.roles_ou,
            self.base_dn,
            self.attribute,
        )
    }

    /// DN of a user entry, built from its naming attribute value.
    pub fn entry_dn(&self, cn: &str) -> String {
        format!("uid={},{}", escape::dn_value(cn), self.user_base())
    }

    /// Reject configurations the job cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoint.is_empty() {
            return Err(ConfigError::Invalid("endpoint is required".to_string()));
        }
        if self.base_dn.is_empty() {
            return Err(ConfigError::Invalid("base_dn is required".to_string()));
        }
        if self.match_role.is_empty() {
            return Err(ConfigError::Invalid("match_role is required".to_string()));
        }
        if self.attribute.is_empty() {
            return Err(ConfigError::Invalid("attribute is required".to_string()));
        }
        if self.page_size <= 0 {
            return Err(ConfigError::Invalid(format!(
                "page_size must be positive, got {}",
                self.page_size
            )));
        }
        Ok(())
    }
}
