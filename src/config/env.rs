use crate::config::types::{CheckerConfig, Config, OutputConfig, StatusApiConfig};
use crate::config::validation::validate;
use crate::ConfigError;

/// Loads and validates the configuration from the process environment
///
/// Every variable is optional; absence degrades the matching feature
/// (no proxy tier, no API key, no backlink check) rather than failing.
///
/// | Variable         | Meaning                                  |
/// |------------------|------------------------------------------|
/// | `SOURCE_URL`     | link source URL or path (`./link.csv`)   |
/// | `PROXY_URL`      | proxy URL prefix for the proxy tier      |
/// | `STATUS_API_URL` | status API endpoint                      |
/// | `STATUS_API_KEY` | key appended to status API requests      |
/// | `AUTHOR_URL`     | operator site for the backlink check     |
/// | `RESULT_FILE`    | report path (`./result.json`)            |
pub fn from_env() -> Result<Config, ConfigError> {
    from_lookup(|key| std::env::var(key).ok())
}

/// Builds the configuration from an arbitrary variable lookup
///
/// The lookup seam keeps configuration testable without mutating the
/// process environment. Empty values are treated as unset, since CI
/// systems commonly export blank secrets.
pub fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    let defaults = StatusApiConfig::default();
    let status_api = StatusApiConfig {
        url: get("STATUS_API_URL").unwrap_or(defaults.url),
        key: get("STATUS_API_KEY"),
    };

    let output_defaults = OutputConfig::default();
    let config = Config {
        source: get("SOURCE_URL").unwrap_or_else(|| "./link.csv".to_string()),
        proxy_prefix: get("PROXY_URL"),
        status_api,
        author_url: get("AUTHOR_URL"),
        checker: CheckerConfig::default(),
        output: OutputConfig {
            result_path: get("RESULT_FILE").unwrap_or(output_defaults.result_path),
        },
    };

    validate(&config)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_with_empty_environment() {
        let config = from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config.source, "./link.csv");
        assert!(config.proxy_prefix.is_none());
        assert!(config.author_url.is_none());
        assert!(config.status_api.key.is_none());
        assert_eq!(config.status_api.url, "https://v2.xxapi.cn/api/status");
        assert_eq!(config.output.result_path, "./result.json");
        assert_eq!(config.checker.workers, 10);
    }

    #[test]
    fn test_all_variables_set() {
        let config = from_lookup(lookup_from(&[
            ("SOURCE_URL", "https://example.com/links.json"),
            ("PROXY_URL", "https://proxy.example.com/"),
            ("STATUS_API_URL", "https://api.example.com/status"),
            ("STATUS_API_KEY", "secret"),
            ("AUTHOR_URL", "https://blog.example.com"),
            ("RESULT_FILE", "/tmp/out.json"),
        ]))
        .unwrap();

        assert_eq!(config.source, "https://example.com/links.json");
        assert_eq!(config.proxy_prefix.as_deref(), Some("https://proxy.example.com/"));
        assert_eq!(config.status_api.url, "https://api.example.com/status");
        assert_eq!(config.status_api.key.as_deref(), Some("secret"));
        assert_eq!(config.author_url.as_deref(), Some("https://blog.example.com"));
        assert_eq!(config.output.result_path, "/tmp/out.json");
    }

    #[test]
    fn test_blank_value_is_unset() {
        let config = from_lookup(lookup_from(&[("PROXY_URL", "  "), ("AUTHOR_URL", "")])).unwrap();

        assert!(config.proxy_prefix.is_none());
        assert!(config.author_url.is_none());
    }

    #[test]
    fn test_invalid_proxy_rejected() {
        let result = from_lookup(lookup_from(&[("PROXY_URL", "ftp://proxy.example.com/")]));
        assert!(result.is_err());
    }
}
