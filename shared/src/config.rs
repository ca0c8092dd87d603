use std::env;
use std::path::PathBuf;

pub const DEFAULT_TABLE_NAME: &str = "crewdesk";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
}

/// Deployment settings. AWS region and credentials are resolved separately
/// by `aws-config`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub table_name: String,
    pub cognito_client_id: Option<String>,
    /// Set for app clients that have a secret; enables `SECRET_HASH`.
    pub cognito_client_secret: Option<String>,
    pub export_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            table_name: get("TABLE_NAME").unwrap_or_else(|| DEFAULT_TABLE_NAME.to_string()),
            cognito_client_id: get("COGNITO_CLIENT_ID"),
            cognito_client_secret: get("COGNITO_CLIENT_SECRET"),
            export_dir: get("EXPORT_DIR").map(PathBuf::from).unwrap_or_else(|| PathBuf::from(".")),
        }
    }

    pub fn require_client_id(&self) -> Result<&str, ConfigError> {
        self.cognito_client_id
            .as_deref()
            .ok_or(ConfigError::Missing("COGNITO_CLIENT_ID"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config(&[]);
        assert_eq!(config.table_name, "crewdesk");
        assert_eq!(config.export_dir, PathBuf::from("."));
        assert_eq!(config.require_client_id(), Err(ConfigError::Missing("COGNITO_CLIENT_ID")));
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = config(&[("TABLE_NAME", "  "), ("COGNITO_CLIENT_SECRET", "")]);
        assert_eq!(config.table_name, DEFAULT_TABLE_NAME);
        assert_eq!(config.cognito_client_secret, None);
    }

    #[test]
    fn values_are_read() {
        let config = config(&[
            ("TABLE_NAME", "crewdesk-prod"),
            ("COGNITO_CLIENT_ID", "client-123"),
            ("EXPORT_DIR", "/tmp/exports"),
        ]);
        assert_eq!(config.table_name, "crewdesk-prod");
        assert_eq!(config.require_client_id(), Ok("client-123"));
        assert_eq!(config.export_dir, PathBuf::from("/tmp/exports"));
    }
}
