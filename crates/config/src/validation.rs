//! Configuration validation

use crate::{AirdropConfig, ConfigError, Result};

/// Validation error details
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate the entire application configuration
pub fn validate_config(config: &AirdropConfig) -> Result<()> {
    let mut errors = Vec::new();

    // Distribution
    let distribution = &config.distribution;

    if distribution.batch_size == 0 {
        errors.push(ValidationError::new(
            "distribution.batch_size",
            "must be greater than 0",
        ));
    }

    if distribution.max_retries == 0 {
        errors.push(ValidationError::new(
            "distribution.max_retries",
            "must be greater than 0",
        ));
    }

    if distribution.amount_per_recipient == 0 {
        errors.push(ValidationError::new(
            "distribution.amount_per_recipient",
            "must be greater than 0",
        ));
    }

    if distribution.mint.trim().is_empty() {
        errors.push(ValidationError::new(
            "distribution.mint",
            "mint address is required",
        ));
    }

    if distribution.input_path.as_os_str().is_empty() {
        errors.push(ValidationError::new(
            "distribution.input_path",
            "input path is required",
        ));
    }

    if distribution.submit_timeout_ms == 0 {
        errors.push(ValidationError::new(
            "distribution.submit_timeout_ms",
            "must be greater than 0",
        ));
    }

    // Network
    if let Err(e) = validate_url(&config.network.rpc_url) {
        errors.push(ValidationError::new("network.rpc_url", e));
    }

    if let Err(e) = validate_log_level(&config.network.log_level) {
        errors.push(e);
    }

    // Retry
    if let Err(e) = config.retry.backoff.validate() {
        errors.push(ValidationError::new("retry.backoff", e));
    }

    if !errors.is_empty() {
        let error_msg = errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(ConfigError::ValidationError(error_msg));
    }

    Ok(())
}

/// Validate a URL
pub fn validate_url(url: &str) -> std::result::Result<(), String> {
    if url.is_empty() {
        return Err("URL cannot be empty".to_string());
    }

    // Basic URL validation - check for scheme
    if !url.starts_with("http://")
        && !url.starts_with("https://")
        && !url.starts_with("ws://")
        && !url.starts_with("wss://")
    {
        return Err("URL must start with http://, https://, ws://, or wss://".to_string());
    }

    Ok(())
}

/// Validate log level
fn validate_log_level(level: &str) -> std::result::Result<(), ValidationError> {
    match level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ValidationError::new(
            "network.log_level",
            format!(
                "invalid log level '{level}', must be one of: trace, debug, info, warn, error"
            ),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use airdrop_backoff::BackoffPolicy;

    fn valid_config() -> AirdropConfig {
        let mut config = AirdropConfig::default();
        config.distribution.mint = "EtUtjntdnndwLrXKNgwWKyfSCsuy3thP4pr5vqxtWA1m".to_string();
        config
    }

    #[test]
    fn test_valid_config() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_missing_mint() {
        let config = AirdropConfig::default();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("distribution.mint"));
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = valid_config();
        config.distribution.batch_size = 0;
        config.distribution.max_retries = 0;
        config.network.rpc_url = "localhost:8899".to_string();

        let msg = validate_config(&config).unwrap_err().to_string();
        assert!(msg.contains("distribution.batch_size"));
        assert!(msg.contains("distribution.max_retries"));
        assert!(msg.contains("network.rpc_url"));
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = valid_config();
        config.network.log_level = "verbose".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_invalid_backoff() {
        let mut config = valid_config();
        config.retry.backoff = BackoffPolicy::Exponential {
            initial_ms: 1000,
            max_ms: 10,
            multiplier: 2.0,
        };

        let msg = validate_config(&config).unwrap_err().to_string();
        assert!(msg.contains("retry.backoff"));
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("https://api.mainnet-beta.solana.com").is_ok());
        assert!(validate_url("wss://api.mainnet-beta.solana.com").is_ok());
        assert!(validate_url("").is_err());
        assert!(validate_url("ftp://example.com").is_err());
    }
}
