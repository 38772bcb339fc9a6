use crate::config::types::{CheckerConfig, Config};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_checker_config(&config.checker)?;

    if config.source.is_empty() {
        return Err(ConfigError::Validation("source cannot be empty".to_string()));
    }

    if config.output.result_path.is_empty() {
        return Err(ConfigError::Validation(
            "result_path cannot be empty".to_string(),
        ));
    }

    if let Some(prefix) = &config.proxy_prefix {
        validate_http_url(prefix, "proxy prefix")?;
    }

    validate_http_url(&config.status_api.url, "status API URL")?;

    if let Some(author) = &config.author_url {
        validate_author_url(author)?;
    }

    Ok(())
}

/// Validates checker behavior configuration
fn validate_checker_config(config: &CheckerConfig) -> Result<(), ConfigError> {
    if config.workers < 1 || config.workers > 100 {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and 100, got {}",
            config.workers
        )));
    }

    if config.probe_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "probe_timeout_secs must be >= 1, got {}",
            config.probe_timeout_secs
        )));
    }

    if config.api_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "api_timeout_secs must be >= 1, got {}",
            config.api_timeout_secs
        )));
    }

    Ok(())
}

/// Requires an absolute http(s) URL
fn validate_http_url(value: &str, what: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {}: {}", what, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Invalid {}: expected http or https, got {}",
            what,
            url.scheme()
        )));
    }

    Ok(())
}

/// The author URL may be given bare ("blog.example.com") or with a scheme;
/// it must carry a resolvable host either way.
fn validate_author_url(value: &str) -> Result<(), ConfigError> {
    let candidate = if value.contains("://") {
        value.to_string()
    } else {
        format!("https://{}", value)
    };

    let url = Url::parse(&candidate)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid author URL: {}", e)))?;

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(
            "Invalid author URL: missing host".to_string(),
        ));
    }

    Ok(())
}
