use crate::config::types::{AssetsConfig, BrowserConfig, Config, HttpConfig, SiteConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_http_config(&config.http)?;
    validate_browser_config(&config.browser)?;
    validate_assets_config(&config.assets)?;
    Ok(())
}

/// Validates store endpoints
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let origin = Url::parse(&config.origin)
        .map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid origin '{}': {}", config.origin, e))
        })?;

    if origin.scheme() != "http" && origin.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Origin '{}' must use http or https",
            config.origin
        )));
    }

    if !config.listing_url_template.contains("{page}") {
        return Err(ConfigError::Validation(format!(
            "listing-url-template must contain a {{page}} placeholder, got '{}'",
            config.listing_url_template
        )));
    }

    Url::parse(&config.listing_url(1)).map_err(|e| {
        ConfigError::InvalidUrl(format!(
            "Invalid listing-url-template '{}': {}",
            config.listing_url_template, e
        ))
    })?;

    Ok(())
}

/// Validates HTTP client and retry settings
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.max_attempts < 1 {
        return Err(ConfigError::Validation(format!(
            "max-attempts must be >= 1, got {}",
            config.max_attempts
        )));
    }

    if config.fetch_timeout_secs < 1 || config.image_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "fetch and image timeouts must be >= 1s".to_string(),
        ));
    }

    Ok(())
}

fn validate_browser_config(config: &BrowserConfig) -> Result<(), ConfigError> {
    if config.navigation_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "navigation-timeout-secs must be >= 1, got {}",
            config.navigation_timeout_secs
        )));
    }

    Ok(())
}

fn validate_assets_config(config: &AssetsConfig) -> Result<(), ConfigError> {
    if config.uploads_root.is_empty() {
        return Err(ConfigError::Validation(
            "uploads-root cannot be empty".to_string(),
        ));
    }

    Ok(())
}
