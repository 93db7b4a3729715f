//! Runtime configuration.
//!
//! Everything the two workflows need lives in a single JSON file loaded once
//! at startup and passed by reference into each component. There are no
//! mutable globals and no environment fallbacks.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Base URL of the Satellite server, e.g. "https://satellite.example.com".
    pub server_url: String,
    /// Organization whose content views and hosts are managed.
    pub org_name: String,

    #[serde(default)]
    pub oauth_key: String,
    #[serde(default)]
    pub oauth_secret: String,
    #[serde(default = "default_true")]
    pub ssl_verify: bool,

    /// Content view names that are never published.
    #[serde(default)]
    pub excluded_cvs: BTreeSet<String>,
    /// Lifecycle environments that are never promoted into.
    #[serde(default = "default_excluded_envs")]
    pub excluded_envs: BTreeSet<String>,

    /// Seconds between polls while waiting for publish tasks.
    #[serde(default = "default_poll_interval_publish")]
    pub poll_interval_publish: u64,
    /// Seconds between polls while waiting for promote tasks.
    #[serde(default = "default_poll_interval_promote")]
    pub poll_interval_promote: u64,
    /// Seconds to pause before the first poll so the task can register
    /// server-side.
    #[serde(default = "default_poll_settle_delay")]
    pub poll_settle_delay: u64,
    /// Upper bound in seconds on any single task wait.
    #[serde(default = "default_poll_max_wait")]
    pub poll_max_wait: u64,

    #[serde(default)]
    pub smtp_host: String,
    #[serde(default)]
    pub mail_from: String,
    #[serde(default)]
    pub mail_to: String,
}

fn default_true() -> bool {
    true
}

fn default_excluded_envs() -> BTreeSet<String> {
    // Library always holds the latest version; promoting into it is a no-op
    // the server rejects.
    BTreeSet::from(["Library".to_string()])
}

fn default_poll_interval_publish() -> u64 {
    10
}

fn default_poll_interval_promote() -> u64 {
    5
}

fn default_poll_settle_delay() -> u64 {
    2
}

fn default_poll_max_wait() -> u64 {
    3600
}

impl Config {
    /// Loads and validates configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::internal_io(e.to_string(), Some(format!("read {}", path.display())))
                .with_hint("Pass --config with the path to a satops configuration file")
        })?;

        let config: Config = serde_json::from_str(&raw)
            .map_err(|e| Error::config_invalid_json(path.display().to_string(), e))?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.server_url.trim().is_empty() {
            return Err(Error::config_invalid_value(
                "serverUrl",
                None,
                "Server URL must not be empty",
            ));
        }
        if self.org_name.trim().is_empty() {
            return Err(Error::config_invalid_value(
                "orgName",
                None,
                "Organization name must not be empty",
            ));
        }
        if self.poll_interval_publish == 0 || self.poll_interval_promote == 0 {
            return Err(Error::config_invalid_value(
                "pollInterval",
                None,
                "Poll intervals must be at least 1 second",
            ));
        }
        Ok(())
    }

    /// Validates the fields the report mailer needs. Kept separate so the
    /// publish workflow can run from a config with no mail section.
    pub fn validate_mail(&self) -> Result<()> {
        for (key, value) in [
            ("smtpHost", &self.smtp_host),
            ("mailFrom", &self.mail_from),
            ("mailTo", &self.mail_to),
        ] {
            if value.trim().is_empty() {
                return Err(Error::config_invalid_value(
                    key,
                    None,
                    "Required for sending the report email",
                ));
            }
        }
        Ok(())
    }

    /// Server URL with any trailing slash removed.
    pub fn base_url(&self) -> &str {
        self.server_url.trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> Config {
        serde_json::from_str(
            r#"{"serverUrl": "https://satellite.example.com", "orgName": "Example Org"}"#,
        )
        .unwrap()
    }

    #[test]
    fn minimal_config_gets_defaults() {
        let config = minimal();

        assert!(config.ssl_verify);
        assert!(config.excluded_cvs.is_empty());
        assert!(config.excluded_envs.contains("Library"));
        assert_eq!(config.poll_interval_publish, 10);
        assert_eq!(config.poll_interval_promote, 5);
        assert_eq!(config.poll_settle_delay, 2);
        assert_eq!(config.poll_max_wait, 3600);
    }

    #[test]
    fn full_config_parses_camel_case_keys() {
        let config: Config = serde_json::from_str(
            r#"{
                "serverUrl": "https://satellite.example.com/",
                "orgName": "Example Org",
                "oauthKey": "key",
                "oauthSecret": "secret",
                "sslVerify": false,
                "excludedCvs": ["rhel-5-base", "rhel-7-hotfix"],
                "excludedEnvs": ["Library", "Sandbox"],
                "pollIntervalPublish": 20,
                "pollIntervalPromote": 7,
                "pollMaxWait": 120,
                "smtpHost": "mail.example.com",
                "mailFrom": "satellite@example.com",
                "mailTo": "ops@example.com"
            }"#,
        )
        .unwrap();

        assert!(!config.ssl_verify);
        assert!(config.excluded_cvs.contains("rhel-7-hotfix"));
        assert_eq!(config.poll_interval_publish, 20);
        assert_eq!(config.base_url(), "https://satellite.example.com");
        assert!(config.validate_mail().is_ok());
    }

    #[test]
    fn empty_server_url_is_rejected() {
        let mut config = minimal();
        config.server_url = " ".to_string();

        let err = config.validate().unwrap_err();
        assert_eq!(err.code, crate::ErrorCode::ConfigInvalidValue);
    }

    #[test]
    fn mail_fields_required_only_for_mailing() {
        let config = minimal();

        assert!(config.validate().is_ok());
        let err = config.validate_mail().unwrap_err();
        assert_eq!(err.code, crate::ErrorCode::ConfigInvalidValue);
        assert_eq!(err.details["key"], "smtpHost");
    }
}
