use crate::config::types::Config;
use crate::ConfigError;
use url::Url;

/// Validates a loaded configuration
///
/// Checks:
/// - `base-domain` parses as an absolute HTTP(S) URL with a host
/// - `visit-cap` is non-zero
/// - `fetch-timeout-secs` is non-zero
/// - `description-max-len` is non-zero
/// - `crawler-name` and `contact` are non-empty
/// - `database-path` is non-empty
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    let base = Url::parse(&config.crawler.base_domain)
        .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", config.crawler.base_domain, e)))?;

    if base.scheme() != "http" && base.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-domain must be http(s), got {}",
            base.scheme()
        )));
    }

    if base.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "base-domain has no host: {}",
            config.crawler.base_domain
        )));
    }

    if config.crawler.visit_cap == 0 {
        return Err(ConfigError::Validation(
            "visit-cap must be greater than 0".to_string(),
        ));
    }

    if config.crawler.fetch_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "fetch-timeout-secs must be greater than 0".to_string(),
        ));
    }

    if config.crawler.description_max_len == 0 {
        return Err(ConfigError::Validation(
            "description-max-len must be greater than 0".to_string(),
        ));
    }

    if config.user_agent.crawler_name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "crawler-name must not be empty".to_string(),
        ));
    }

    if config.user_agent.contact.trim().is_empty() {
        return Err(ConfigError::Validation(
            "contact must not be empty".to_string(),
        ));
    }

    if config.output.database_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "database-path must not be empty".to_string(),
        ));
    }

    Ok(())
}
