use std::time::Duration;

use reqwest::Client;
use url::Url;

pub const DEFAULT_WATCH_BASE_URL: &str = "https://www.youtube.com";
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:5000/api/summarize";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

pub const WATCH_BASE_URL_ENV: &str = "YTDIGEST_WATCH_BASE_URL";
pub const BACKEND_URL_ENV: &str = "YTDIGEST_BACKEND_URL";
pub const TIMEOUT_SECS_ENV: &str = "YTDIGEST_TIMEOUT_SECS";

#[derive(Debug, Clone)]
pub struct DigestConfig {
    /// Origin the watch page is fetched from.
    pub watch_base_url: String,
    /// Summarization endpoint receiving `{ "video_id": ... }`.
    pub backend_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            watch_base_url: DEFAULT_WATCH_BASE_URL.to_string(),
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl DigestConfig {
    /// Defaults overridden by `YTDIGEST_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();

        if let Some(url) = get(WATCH_BASE_URL_ENV) {
            config.watch_base_url = url;
        }
        if let Some(url) = get(BACKEND_URL_ENV) {
            config.backend_url = url;
        }
        if let Some(raw) = get(TIMEOUT_SECS_ENV) {
            match raw.parse::<u64>() {
                Ok(secs) => config.timeout = Duration::from_secs(secs),
                Err(_) => tracing::warn!(
                    value = %raw,
                    "ignoring invalid {}, using {}s",
                    TIMEOUT_SECS_ENV,
                    DEFAULT_TIMEOUT_SECS
                ),
            }
        }

        config
    }

    /// Watch page address for `video_id`, with the id query-encoded.
    pub fn watch_url(&self, video_id: &str) -> Result<String, url::ParseError> {
        let mut url = Url::parse(&format!(
            "{}/watch",
            self.watch_base_url.trim_end_matches('/')
        ))?;
        url.query_pairs_mut().append_pair("v", video_id);
        Ok(url.into())
    }

    pub fn http_client(&self) -> reqwest::Result<Client> {
        Client::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn defaults_point_at_youtube_and_local_backend() {
        let config = DigestConfig::default();
        assert_eq!(config.watch_base_url, "https://www.youtube.com");
        assert_eq!(config.backend_url, "http://127.0.0.1:5000/api/summarize");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn lookup_overrides_defaults() {
        let vars: HashMap<&str, &str> = HashMap::from([
            (WATCH_BASE_URL_ENV, "http://localhost:9000/"),
            (BACKEND_URL_ENV, " http://backend/api/summarize "),
            (TIMEOUT_SECS_ENV, "5"),
        ]);
        let config = DigestConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.backend_url, "http://backend/api/summarize");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(
            config.watch_url("dQw4w9WgXcQ").unwrap(),
            "http://localhost:9000/watch?v=dQw4w9WgXcQ"
        );
    }

    #[test]
    fn watch_url_encodes_the_video_id() {
        let config = DigestConfig::default();
        assert_eq!(
            config.watch_url("abc&lang=x").unwrap(),
            "https://www.youtube.com/watch?v=abc%26lang%3Dx"
        );
        assert_eq!(
            config.watch_url("a b#c").unwrap(),
            "https://www.youtube.com/watch?v=a+b%23c"
        );
    }

    #[test]
    fn unparsable_watch_base_url_is_an_error() {
        let config = DigestConfig {
            watch_base_url: "not a url".to_string(),
            ..DigestConfig::default()
        };
        assert!(config.watch_url("dQw4w9WgXcQ").is_err());
    }

    #[test]
    fn invalid_timeout_keeps_default() {
        let config = DigestConfig::from_lookup(|key| {
            (key == TIMEOUT_SECS_ENV).then(|| "soon".to_string())
        });
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }
}
