//! Shell configuration
//!
//! Defaults reproduce the stock shell. A JSON file named by `PREKT_CONFIG`
//! may override any subset of the fields.

use prekt_navigation::{DEFAULT_HISTORY_CAPACITY, DEFAULT_WIKIPEDIA_HOST};
use prekt_probe::{DEFAULT_IP_ECHO_URL, DEFAULT_PROBE_TIMEOUT};
use prekt_tabs::AnonymityProfile;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

use crate::error::CoreError;
use crate::Result;

pub const CONFIG_ENV_VAR: &str = "PREKT_CONFIG";
pub const DEFAULT_TAB_COUNT: usize = 3;

const HOME_PAGE_FILE: &str = "newtab.html";
const FALLBACK_HOME_URI: &str = "about:home";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Page loaded into new sessions and by `home`
    pub home_uri: String,
    /// Number of tab slots, fixed for the life of the process
    pub tab_count: usize,
    /// SOCKS endpoint anonymized sessions route through
    pub socks_proxy: String,
    /// Client identification string sent by anonymized sessions
    pub anonymized_user_agent: String,
    pub ip_echo_url: String,
    pub probe_timeout_secs: u64,
    pub history_capacity: usize,
    pub wikipedia_host: String,
}

impl Config {
    /// Defaults, overridden by the file named in `PREKT_CONFIG` if set
    pub fn load() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::from_path(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&raw)?;
        config.validate()?;

        tracing::info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tab_count == 0 {
            return Err(CoreError::Config("tab_count must be at least 1".to_string()));
        }
        if self.history_capacity == 0 {
            return Err(CoreError::Config(
                "history_capacity must be at least 1".to_string(),
            ));
        }
        if self.probe_timeout_secs == 0 {
            return Err(CoreError::Config(
                "probe_timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.home_uri.trim().is_empty() {
            return Err(CoreError::Config("home_uri is empty".to_string()));
        }

        self.ip_echo_url()?;
        Url::parse(&self.socks_proxy)
            .map_err(|e| CoreError::Config(format!("socks_proxy: {e}")))?;
        Url::parse(&format!("https://{}/", self.wikipedia_host))
            .map_err(|e| CoreError::Config(format!("wikipedia_host: {e}")))?;

        Ok(())
    }

    pub fn ip_echo_url(&self) -> Result<Url> {
        Url::parse(&self.ip_echo_url).map_err(|e| CoreError::Config(format!("ip_echo_url: {e}")))
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn anonymity_profile(&self) -> AnonymityProfile {
        AnonymityProfile::new(self.socks_proxy.clone(), self.anonymized_user_agent.clone())
    }

    /// `newtab.html` in the working directory
    pub fn default_home_uri() -> String {
        std::env::current_dir()
            .ok()
            .and_then(|dir| Url::from_file_path(dir.join(HOME_PAGE_FILE)).ok())
            .map(|url| url.to_string())
            .unwrap_or_else(|| FALLBACK_HOME_URI.to_string())
    }
}

impl Default for Config {
    fn default() -> Self {
        let profile = AnonymityProfile::default();
        Self {
            home_uri: Self::default_home_uri(),
            tab_count: DEFAULT_TAB_COUNT,
            socks_proxy: profile.socks_proxy,
            anonymized_user_agent: profile.user_agent,
            ip_echo_url: DEFAULT_IP_ECHO_URL.to_string(),
            probe_timeout_secs: DEFAULT_PROBE_TIMEOUT.as_secs(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            wikipedia_host: DEFAULT_WIKIPEDIA_HOST.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.tab_count, 3);
        assert_eq!(config.socks_proxy, "socks5://127.0.0.1:9050");
        assert_eq!(config.ip_echo_url, "https://api.ipify.org");
        assert_eq!(config.probe_timeout(), Duration::from_secs(5));
        assert_eq!(config.history_capacity, 512);
        assert!(config.home_uri.ends_with("newtab.html") || config.home_uri == FALLBACK_HOME_URI);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let config: Config =
            serde_json::from_str(r#"{ "tab_count": 5, "wikipedia_host": "en.wikipedia.org" }"#)
                .unwrap();
        assert_eq!(config.tab_count, 5);
        assert_eq!(config.wikipedia_host, "en.wikipedia.org");
        assert_eq!(config.probe_timeout_secs, 5);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.tab_count = 0;
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));

        let mut config = Config::default();
        config.ip_echo_url = "not a url".to_string();
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));

        let mut config = Config::default();
        config.probe_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_path() {
        let path = std::env::temp_dir().join(format!("prekt-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "history_capacity": 16 }"#).unwrap();

        let config = Config::from_path(&path).unwrap();
        assert_eq!(config.history_capacity, 16);

        std::fs::remove_file(&path).unwrap();
    }
}
