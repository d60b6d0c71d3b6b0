//! Configuration module for environment variable parsing.
//!
//! All configuration comes from environment variables so the dispatcher can
//! run unattended under an external scheduler. The loaded `Config` is passed
//! explicitly into the dispatch pass rather than read globally.

use std::env;
use std::path::PathBuf;

use tracing::warn;
use url::Url;

/// Platforms targeted when `PUBLISH_PLATFORMS` is unset.
const DEFAULT_PLATFORMS: &[&str] = &["baijiahao", "toutiao"];

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding publish_queue.json and publish_status.json
    pub state_dir: PathBuf,

    /// Directory holding post markdown files
    pub posts_dir: PathBuf,

    /// Optional gateway base URL used to derive missing platform endpoints
    pub base_url: Option<String>,

    /// Target platforms, in delivery order
    pub platforms: Vec<PlatformConfig>,

    /// HTTP request timeout in milliseconds
    pub request_timeout_ms: u64,
}

/// Per-platform delivery configuration.
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    /// Platform name as it appears in the status store
    pub name: String,

    /// Explicit webhook endpoint, if configured
    pub endpoint: Option<String>,

    /// Optional bearer token sent with each delivery
    pub token: Option<String>,

    /// Optional HMAC key for signing outbound payloads
    pub signing_key: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let platform_names = parse_csv("PUBLISH_PLATFORMS")
            .unwrap_or_else(|| DEFAULT_PLATFORMS.iter().map(|s| s.to_string()).collect());

        let platforms = platform_names
            .into_iter()
            .map(|name| {
                let endpoint = env::var(platform_var(&name, "PUBLISH_ENDPOINT")).ok();
                let token = env::var(platform_var(&name, "PUBLISH_TOKEN")).ok();
                let signing_key = env::var(platform_var(&name, "PUBLISH_SIGNING_KEY")).ok();
                PlatformConfig {
                    name,
                    endpoint,
                    token,
                    signing_key,
                }
            })
            .collect();

        Config {
            state_dir: env::var("PUBLISH_STATE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("automation")),

            posts_dir: env::var("PUBLISH_POSTS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("content/posts")),

            base_url: env::var("PUBLISH_GATEWAY_BASE_URL").ok(),

            platforms,

            request_timeout_ms: env::var("PUBLISH_REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8000),
        }
    }

    /// Resolve the delivery endpoint for a platform.
    ///
    /// An explicit `{PLATFORM}_PUBLISH_ENDPOINT` wins; otherwise the endpoint
    /// derives from the gateway base URL as `{base}/publish/{platform}`.
    /// Returns None when neither is configured or the result is not a valid
    /// URL - the pair then stays queued for a future run.
    pub fn resolve_endpoint(&self, platform: &PlatformConfig) -> Option<Url> {
        let raw = match &platform.endpoint {
            Some(endpoint) => endpoint.clone(),
            None => {
                let base = self.base_url.as_deref()?;
                format!("{}/publish/{}", base.trim_end_matches('/'), platform.name)
            }
        };

        match Url::parse(&raw) {
            Ok(url) => Some(url),
            Err(e) => {
                warn!(platform = %platform.name, url = %raw, error = %e, "endpoint_invalid");
                None
            }
        }
    }
}

/// Environment variable name for a per-platform setting, e.g.
/// ("baijiahao", "PUBLISH_TOKEN") -> "BAIJIAHAO_PUBLISH_TOKEN".
fn platform_var(name: &str, suffix: &str) -> String {
    let prefix: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("{}_{}", prefix, suffix)
}

/// Parse a comma-separated list of strings.
fn parse_csv(name: &str) -> Option<Vec<String>> {
    env::var(name).ok().map(|raw| {
        raw.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn platform(name: &str, endpoint: Option<&str>) -> PlatformConfig {
        PlatformConfig {
            name: name.to_string(),
            endpoint: endpoint.map(|s| s.to_string()),
            token: None,
            signing_key: None,
        }
    }

    fn config(base_url: Option<&str>, platforms: Vec<PlatformConfig>) -> Config {
        Config {
            state_dir: PathBuf::from("automation"),
            posts_dir: PathBuf::from("content/posts"),
            base_url: base_url.map(|s| s.to_string()),
            platforms,
            request_timeout_ms: 8000,
        }
    }

    #[test]
    fn test_platform_var() {
        assert_eq!(
            platform_var("baijiahao", "PUBLISH_ENDPOINT"),
            "BAIJIAHAO_PUBLISH_ENDPOINT"
        );
        assert_eq!(
            platform_var("my-site", "PUBLISH_TOKEN"),
            "MY_SITE_PUBLISH_TOKEN"
        );
    }

    #[test]
    fn test_parse_csv() {
        env::set_var("TEST_PLATFORM_CSV", "foo, bar, baz");
        let result = parse_csv("TEST_PLATFORM_CSV");
        assert_eq!(
            result,
            Some(vec![
                "foo".to_string(),
                "bar".to_string(),
                "baz".to_string()
            ])
        );
        env::remove_var("TEST_PLATFORM_CSV");
    }

    #[test]
    fn test_parse_csv_missing() {
        assert_eq!(parse_csv("NONEXISTENT_PLATFORM_CSV"), None);
    }

    #[test]
    fn test_resolve_endpoint_explicit_wins() {
        let config = config(
            Some("https://x.test"),
            vec![platform("baijiahao", Some("https://hooks.test/bjh"))],
        );
        let url = config.resolve_endpoint(&config.platforms[0]).unwrap();
        assert_eq!(url.as_str(), "https://hooks.test/bjh");
    }

    #[test]
    fn test_resolve_endpoint_derived_from_base() {
        let config = config(Some("https://x.test"), vec![platform("baijiahao", None)]);
        let url = config.resolve_endpoint(&config.platforms[0]).unwrap();
        assert_eq!(url.as_str(), "https://x.test/publish/baijiahao");
    }

    #[test]
    fn test_resolve_endpoint_base_trailing_slash() {
        let config = config(Some("https://x.test/"), vec![platform("toutiao", None)]);
        let url = config.resolve_endpoint(&config.platforms[0]).unwrap();
        assert_eq!(url.as_str(), "https://x.test/publish/toutiao");
    }

    #[test]
    fn test_resolve_endpoint_unconfigured() {
        let config = config(None, vec![platform("baijiahao", None)]);
        assert!(config.resolve_endpoint(&config.platforms[0]).is_none());
    }

    #[test]
    fn test_resolve_endpoint_invalid_url() {
        let config = config(None, vec![platform("baijiahao", Some("not a url"))]);
        assert!(config.resolve_endpoint(&config.platforms[0]).is_none());
    }

    #[test]
    fn test_from_env_platform_settings() {
        env::set_var("PUBLISH_PLATFORMS", "weibo");
        env::set_var("WEIBO_PUBLISH_ENDPOINT", "https://hooks.test/weibo");
        env::set_var("WEIBO_PUBLISH_TOKEN", "secret");

        let config = Config::from_env();
        assert_eq!(config.platforms.len(), 1);
        assert_eq!(config.platforms[0].name, "weibo");
        assert_eq!(
            config.platforms[0].endpoint.as_deref(),
            Some("https://hooks.test/weibo")
        );
        assert_eq!(config.platforms[0].token.as_deref(), Some("secret"));
        assert_eq!(config.platforms[0].signing_key, None);

        env::remove_var("PUBLISH_PLATFORMS");
        env::remove_var("WEIBO_PUBLISH_ENDPOINT");
        env::remove_var("WEIBO_PUBLISH_TOKEN");
    }

    #[test]
    fn test_default_platforms() {
        let config = config(None, Vec::new());
        assert!(config.platforms.is_empty());

        // from_env falls back to the default pair when the variable is unset
        let names: Vec<String> = DEFAULT_PLATFORMS.iter().map(|s| s.to_string()).collect();
        assert_eq!(names, vec!["baijiahao", "toutiao"]);
    }
}
