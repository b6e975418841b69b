//! Configuration file parser for ~/.config/statuswatch/config.toml.
//!
//! Unlike most settings files, this one is required: a run with no
//! feeds has nothing to do, and an empty feed list is the only
//! unrecoverable startup condition. Unknown keys are accepted by serde
//! but logged as probable typos.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config file exceeds the maximum allowed size.
    #[error("Config file too large: {0}")]
    TooLarge(String),

    /// Structurally valid TOML with unusable values (empty feed list,
    /// bad URL, zero interval).
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

// ============================================================================
// Configuration Struct
// ============================================================================

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be
/// specified, but `feeds` must end up non-empty for [`Config::load`] to
/// succeed.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Ordered list of feed URLs to poll. Required, non-empty.
    pub feeds: Vec<String>,

    /// Seconds between polling cycles. Must be > 0.
    pub poll_interval_seconds: u64,

    /// Per-request timeout for feed fetches, in seconds. Must be > 0.
    pub request_timeout_seconds: u64,

    /// Cap on remembered entry ids per feed; 0 disables the cap.
    pub max_tracked_ids: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            feeds: Vec::new(),
            poll_interval_seconds: 60,
            request_timeout_seconds: 10,
            max_tracked_ids: crate::feed::DEFAULT_MAX_TRACKED_IDS,
        }
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    /// Loads and validates configuration from a TOML file.
    ///
    /// - Missing file → `Err(ConfigError::Io)`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Empty `feeds`, malformed URL, or zero interval/timeout →
    ///   `Err(ConfigError::Invalid)`
    /// - Unknown keys → accepted, logged as warnings
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        // Check file size before reading to bound memory on a corrupted
        // or hostile config file.
        let meta = std::fs::metadata(path)?;
        if meta.len() > Self::MAX_FILE_SIZE {
            return Err(ConfigError::TooLarge(format!(
                "Config file is {} bytes (max {} bytes)",
                meta.len(),
                Self::MAX_FILE_SIZE
            )));
        }

        let content = std::fs::read_to_string(path)?;

        // Parse once as a raw table to flag probable typos
        if let Ok(raw) = content.parse::<toml::Table>() {
            let known_keys = [
                "feeds",
                "poll_interval_seconds",
                "request_timeout_seconds",
                "max_tracked_ids",
            ];
            for key in raw.keys() {
                if !known_keys.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        tracing::info!(
            path = %path.display(),
            feeds = config.feeds.len(),
            interval_secs = config.poll_interval_seconds,
            "Loaded configuration"
        );
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.feeds.is_empty() {
            return Err(ConfigError::Invalid(
                "feeds must list at least one URL".to_string(),
            ));
        }
        for feed in &self.feeds {
            let parsed = url::Url::parse(feed)
                .map_err(|e| ConfigError::Invalid(format!("feed URL '{}': {}", feed, e)))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(ConfigError::Invalid(format!(
                    "feed URL '{}': scheme must be http or https",
                    feed
                )));
            }
        }
        if self.poll_interval_seconds == 0 {
            return Err(ConfigError::Invalid(
                "poll_interval_seconds must be greater than zero".to_string(),
            ));
        }
        if self.request_timeout_seconds == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_seconds must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write_config(dir_name: &str, content: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(dir_name);
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.feeds.is_empty());
        assert_eq!(config.poll_interval_seconds, 60);
        assert_eq!(config.request_timeout_seconds, 10);
        assert_eq!(config.max_tracked_ids, 1000);
    }

    #[test]
    fn test_minimal_config_gets_defaults() {
        let path = write_config(
            "statuswatch_config_minimal",
            "feeds = [\"https://status.example.com/feed.atom\"]\n",
        );

        let config = Config::load(&path).unwrap();
        assert_eq!(config.feeds.len(), 1);
        assert_eq!(config.poll_interval_seconds, 60);
        assert_eq!(config.max_tracked_ids, 1000);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_full_config() {
        let content = r#"
feeds = [
    "https://status.openai.com/feed.atom",
    "https://www.githubstatus.com/history.atom",
]
poll_interval_seconds = 30
request_timeout_seconds = 5
max_tracked_ids = 500
"#;
        let path = write_config("statuswatch_config_full", content);

        let config = Config::load(&path).unwrap();
        assert_eq!(config.feeds.len(), 2);
        assert_eq!(config.poll_interval_seconds, 30);
        assert_eq!(config.request_timeout_seconds, 5);
        assert_eq!(config.max_tracked_ids, 500);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let path = std::path::Path::new("/tmp/statuswatch_nonexistent/config.toml");
        assert!(matches!(Config::load(path), Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_empty_feed_list_rejected() {
        let path = write_config("statuswatch_config_nofeeds", "feeds = []\n");
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(err.to_string().contains("at least one URL"));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_invalid_url_rejected() {
        let path = write_config("statuswatch_config_badurl", "feeds = [\"not a url\"]\n");
        assert!(matches!(
            Config::load(&path),
            Err(ConfigError::Invalid(_))
        ));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_non_http_scheme_rejected() {
        let path = write_config(
            "statuswatch_config_ftp",
            "feeds = [\"ftp://example.com/feed.xml\"]\n",
        );
        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().contains("http or https"));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_zero_interval_rejected() {
        let path = write_config(
            "statuswatch_config_zerointerval",
            "feeds = [\"https://example.com/feed\"]\npoll_interval_seconds = 0\n",
        );
        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().contains("poll_interval_seconds"));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_invalid_toml_returns_parse_error() {
        let path = write_config("statuswatch_config_badtoml", "feeds = [not valid");
        assert!(matches!(Config::load(&path), Err(ConfigError::Parse(_))));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_wrong_type_returns_parse_error() {
        let path = write_config(
            "statuswatch_config_wrongtype",
            "feeds = [\"https://example.com/feed\"]\npoll_interval_seconds = \"soon\"\n",
        );
        assert!(matches!(Config::load(&path), Err(ConfigError::Parse(_))));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_unknown_keys_accepted() {
        let path = write_config(
            "statuswatch_config_unknown",
            "feeds = [\"https://example.com/feed\"]\ntotally_fake_key = 42\n",
        );
        let config = Config::load(&path).unwrap();
        assert_eq!(config.feeds.len(), 1);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_too_large_file_rejected() {
        let mut content = "feeds = [\"https://example.com/feed\"]\n".to_string();
        while content.len() <= 1_048_576 {
            content.push_str("# padding comment\n");
        }
        let path = write_config("statuswatch_config_toolarge", &content);
        assert!(matches!(
            Config::load(&path),
            Err(ConfigError::TooLarge(_))
        ));
        std::fs::remove_file(&path).ok();
    }
}
