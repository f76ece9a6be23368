use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Reads a TOML configuration file and validates it
///
/// Sections and keys missing from the file take their defaults, so an
/// empty file is a valid configuration.
///
/// # Errors
///
/// `ConfigError::Io` when the file cannot be read, `ConfigError::Parse` for
/// malformed TOML, and the validation errors of [`validate`].
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use tadu_crawler::config::load_config;
///
/// let config = load_config(Path::new("tadu.toml")).unwrap();
/// println!("Retry attempts: {}", config.http.max_attempts);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    parse_config(&std::fs::read_to_string(path)?)
}

/// Hex SHA-256 digest of the configuration file, logged at startup
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    Ok(digest_hex(&std::fs::read_to_string(path)?))
}

/// Loads a configuration together with the digest of the exact text parsed
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let text = std::fs::read_to_string(path)?;
    let config = parse_config(&text)?;
    Ok((config, digest_hex(&text)))
}

fn parse_config(text: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(text)?;
    validate(&config)?;
    Ok(config)
}

fn digest_hex(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}

/// Applies process environment overrides
///
/// Only `PORT` is honoured; it replaces `server.port` when it parses as a
/// port number.
pub fn apply_env_overrides(config: &mut Config) {
    apply_port_override(config, std::env::var("PORT").ok().as_deref());
}

fn apply_port_override(config: &mut Config, value: Option<&str>) {
    let Some(raw) = value else {
        return;
    };

    match raw.trim().parse::<u16>() {
        Ok(port) => config.server.port = port,
        Err(_) => tracing::warn!("Ignoring invalid PORT value: {}", raw),
    }
}
