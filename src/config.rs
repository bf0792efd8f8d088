use crate::cache::{ensure_ttl, DEFAULT_CACHE_TTL_SECS};
use anyhow::{Context, Result};
use std::time::Duration;

pub const DEFAULT_FEED_API_URL: &str = "https://api.wikimedia.org/feed/v1/wikipedia";

#[derive(Debug, Clone)]
pub struct Config {
    // Translation service
    pub translate_api_url: String,
    pub translate_api_key: String,

    // Cache store
    pub cache_url: String,
    pub cache_ttl_secs: u64,

    // Upstream feed
    pub feed_api_url: String,
    pub request_timeout_secs: u64,
    pub debug_dump_dir: Option<String>,

    // Server
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let config = Self {
            // Translation service
            translate_api_url: std::env::var("TRANSLATE_API_URL")
                .context("TRANSLATE_API_URL not set")?,
            translate_api_key: std::env::var("TRANSLATE_API_KEY").unwrap_or_default(),

            // Cache store
            cache_url: std::env::var("CACHE_URL").context("CACHE_URL not set")?,
            cache_ttl_secs: std::env::var("CACHE_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_CACHE_TTL_SECS),

            // Upstream feed
            feed_api_url: std::env::var("FEED_API_URL")
                .unwrap_or_else(|_| DEFAULT_FEED_API_URL.to_string()),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(10),
            debug_dump_dir: std::env::var("FEED_DEBUG_DUMP_DIR")
                .ok()
                .filter(|dir| !dir.trim().is_empty()),

            // Server
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
        };

        ensure_ttl(config.cache_ttl_secs).context("Invalid CACHE_TTL_SECS")?;

        Ok(config)
    }

    /// Deadline applied to every outbound HTTP call.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// The client shared by the feed and translation clients. A call that
    /// exceeds the deadline fails like any other network error.
    pub fn http_client(&self) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.request_timeout())
            .build()
            .context("Failed to create HTTP client")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MAX_CACHE_TTL_SECS;
    use serial_test::serial;

    const VARS: &[&str] = &[
        "TRANSLATE_API_URL",
        "TRANSLATE_API_KEY",
        "CACHE_URL",
        "CACHE_TTL_SECS",
        "FEED_API_URL",
        "REQUEST_TIMEOUT_SECS",
        "FEED_DEBUG_DUMP_DIR",
        "PORT",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();
        std::env::set_var("TRANSLATE_API_URL", "http://translate.local");
        std::env::set_var("CACHE_URL", "memory://");

        let config = Config::from_env().expect("required vars are set");

        assert_eq!(config.translate_api_url, "http://translate.local");
        assert_eq!(config.translate_api_key, "");
        assert_eq!(config.cache_url, "memory://");
        assert_eq!(config.cache_ttl_secs, 1800);
        assert_eq!(config.feed_api_url, DEFAULT_FEED_API_URL);
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert!(config.debug_dump_dir.is_none());
        assert_eq!(config.port, 3000);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        std::env::set_var("TRANSLATE_API_URL", "http://translate.local");
        std::env::set_var("TRANSLATE_API_KEY", "secret");
        std::env::set_var("CACHE_URL", "redis://127.0.0.1:6379");
        std::env::set_var("CACHE_TTL_SECS", "60");
        std::env::set_var("FEED_API_URL", "http://feed.local");
        std::env::set_var("REQUEST_TIMEOUT_SECS", "3");
        std::env::set_var("FEED_DEBUG_DUMP_DIR", "/tmp/dumps");
        std::env::set_var("PORT", "8081");

        let config = Config::from_env().expect("required vars are set");

        assert_eq!(config.translate_api_key, "secret");
        assert_eq!(config.cache_ttl_secs, 60);
        assert_eq!(config.feed_api_url, "http://feed.local");
        assert_eq!(config.request_timeout_secs, 3);
        assert_eq!(config.debug_dump_dir.as_deref(), Some("/tmp/dumps"));
        assert_eq!(config.port, 8081);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_invalid_numbers_fall_back() {
        clear_env();
        std::env::set_var("TRANSLATE_API_URL", "http://translate.local");
        std::env::set_var("CACHE_URL", "memory://");
        std::env::set_var("REQUEST_TIMEOUT_SECS", "soon");
        std::env::set_var("PORT", "-1");

        let config = Config::from_env().expect("required vars are set");
        assert_eq!(config.request_timeout_secs, 10);
        assert_eq!(config.port, 3000);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_zero_cache_ttl() {
        clear_env();
        std::env::set_var("TRANSLATE_API_URL", "http://translate.local");
        std::env::set_var("CACHE_URL", "memory://");
        std::env::set_var("CACHE_TTL_SECS", "0");

        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("CACHE_TTL_SECS"));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_huge_cache_ttl() {
        clear_env();
        std::env::set_var("TRANSLATE_API_URL", "http://translate.local");
        std::env::set_var("CACHE_URL", "memory://");
        std::env::set_var("CACHE_TTL_SECS", &u64::MAX.to_string());

        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("CACHE_TTL_SECS"));

        std::env::set_var("CACHE_TTL_SECS", &MAX_CACHE_TTL_SECS.to_string());
        let config = Config::from_env().expect("upper bound is accepted");
        assert_eq!(config.cache_ttl_secs, MAX_CACHE_TTL_SECS);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_zero_timeout_falls_back() {
        clear_env();
        std::env::set_var("TRANSLATE_API_URL", "http://translate.local");
        std::env::set_var("CACHE_URL", "memory://");
        std::env::set_var("REQUEST_TIMEOUT_SECS", "0");

        let config = Config::from_env().expect("required vars are set");
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert!(config.http_client().is_ok());

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_missing_translate_url() {
        clear_env();
        std::env::set_var("CACHE_URL", "memory://");

        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("TRANSLATE_API_URL"));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_missing_cache_url() {
        clear_env();
        std::env::set_var("TRANSLATE_API_URL", "http://translate.local");

        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("CACHE_URL"));

        clear_env();
    }
}
