//! Environment-derived configuration.
//!
//! Every option comes from process environment variables; the result is an
//! immutable [`JobConfig`] handed to the rest of the job.

use std::env;
use std::fs;

use anyhow::{Context, Result};

use ensync_core::JobConfig;

/// Read `name` from the environment, falling back to the file named by
/// `{name}_FILE`.
///
/// Secrets mounted by an orchestrator usually arrive as files; the plain
/// variable wins when both are set.
fn fileenv(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<Option<String>> {
    if let Some(value) = lookup(name) {
        return Ok(Some(value));
    }
    let file_key = format!("{name}_FILE");
    match lookup(&file_key) {
        Some(path) => {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("reading {file_key} at {path}"))?;
            Ok(Some(contents.trim_end().to_string()))
        }
        None => Ok(None),
    }
}

/// Build the job configuration from the process environment.
pub fn load_config() -> Result<JobConfig> {
    load_from(&|name| env::var(name).ok())
}

fn load_from(lookup: &impl Fn(&str) -> Option<String>) -> Result<JobConfig> {
    let mut cfg = JobConfig::default();

    if let Some(v) = lookup("LDAP_URI") {
        cfg.endpoint = v;
    }
    if let Some(v) = lookup("BASE_DN") {
        cfg.base_dn = v;
    }
    if let Some(v) = lookup("MATCH_ROLE") {
        cfg.match_role = v;
    }
    if let Some(v) = fileenv(lookup, "LDAPADMIN_PASSWORD")? {
        cfg.bind_password = v;
    }
    if let Some(v) = lookup("EN_ATTRIBUTE") {
        cfg.attribute = v;
    }
    if let Some(v) = lookup("EN_FLOOR") {
        cfg.floor = v
            .parse()
            .with_context(|| format!("EN_FLOOR must be an integer, got {v:?}"))?;
    }
    if let Some(v) = lookup("EN_PAGE_SIZE") {
        cfg.page_size = v
            .parse()
            .with_context(|| format!("EN_PAGE_SIZE must be an integer, got {v:?}"))?;
    }
    cfg.pushgateway = lookup("PROM_PUSHGATEWAY_URI");

    cfg.validate()?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_in<'a>(vars: &'a HashMap<&'a str, String>) -> impl Fn(&str) -> Option<String> + 'a {
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let vars = HashMap::new();
        let cfg = load_from(&lookup_in(&vars)).unwrap();

        assert_eq!(cfg.endpoint, "ldap://localhost:3389");
        assert_eq!(cfg.match_role, "SSH_USER");
        assert_eq!(cfg.floor, 1000);
        assert!(cfg.pushgateway.is_none());
    }

    #[test]
    fn variables_override_defaults() {
        let vars = HashMap::from([
            ("LDAP_URI", "ldap://ldap.internal:389".to_string()),
            ("BASE_DN", "dc=example,dc=com".to_string()),
            ("MATCH_ROLE", "GEOSERVER".to_string()),
            ("LDAPADMIN_PASSWORD", "hunter2".to_string()),
            ("EN_FLOOR", "2000".to_string()),
            ("PROM_PUSHGATEWAY_URI", "pushgw:9091".to_string()),
        ]);
        let cfg = load_from(&lookup_in(&vars)).unwrap();

        assert_eq!(cfg.endpoint, "ldap://ldap.internal:389");
        assert_eq!(cfg.base_dn, "dc=example,dc=com");
        assert_eq!(cfg.match_role, "GEOSERVER");
        assert_eq!(cfg.bind_password, "hunter2");
        assert_eq!(cfg.floor, 2000);
        assert_eq!(cfg.pushgateway, Some("pushgw:9091".to_string()));
    }

    #[test]
    fn password_can_come_from_a_file() {
        let path = std::env::temp_dir().join("ensync-pw-test");
        fs::write(&path, "from-file\n").unwrap();

        let vars = HashMap::from([(
            "LDAPADMIN_PASSWORD_FILE",
            path.to_string_lossy().into_owned(),
        )]);
        let cfg = load_from(&lookup_in(&vars)).unwrap();
        assert_eq!(cfg.bind_password, "from-file");

        fs::remove_file(&path).ok();
    }

    #[test]
    fn plain_password_wins_over_file() {
        let vars = HashMap::from([
            ("LDAPADMIN_PASSWORD", "direct".to_string()),
            ("LDAPADMIN_PASSWORD_FILE", "/nonexistent".to_string()),
        ]);
        let cfg = load_from(&lookup_in(&vars)).unwrap();
        assert_eq!(cfg.bind_password, "direct");
    }

    #[test]
    fn missing_password_file_is_an_error() {
        let vars = HashMap::from([(
            "LDAPADMIN_PASSWORD_FILE",
            "/nonexistent/ensync".to_string(),
        )]);
        assert!(load_from(&lookup_in(&vars)).is_err());
    }

    #[test]
    fn non_numeric_floor_is_an_error() {
        let vars = HashMap::from([("EN_FLOOR", "soon".to_string())]);
        assert!(load_from(&lookup_in(&vars)).is_err());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let vars = HashMap::from([("BASE_DN", String::new())]);
        assert!(load_from(&lookup_in(&vars)).is_err());
    }
}
