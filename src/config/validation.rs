use crate::config::types::{
    AuditConfig, Config, ExtractConfig, FetchConfig, OutputConfig, ToneConfig,
};
use crate::{ConfigError, ConfigResult};
use url::Url;

/// Upper bound on pages in flight at once
const MAX_CONCURRENCY: usize = 32;

/// Upper bound on redirect hops a single fetch may follow
const MAX_REDIRECTS: usize = 20;

/// Validates the entire configuration
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_audit_config(&config.audit)?;
    validate_fetch_config(&config.fetch)?;
    validate_extract_config(&config.extract)?;
    validate_tone_config(&config.tone)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates batch configuration
fn validate_audit_config(config: &AuditConfig) -> ConfigResult<()> {
    // max_pages = 0 is a legal (empty) run

    if config.batch_size < 1 {
        return Err(ConfigError::Validation(format!(
            "batch_size must be >= 1, got {}",
            config.batch_size
        )));
    }

    if config.concurrency < 1 || config.concurrency > MAX_CONCURRENCY {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and {}, got {}",
            MAX_CONCURRENCY, config.concurrency
        )));
    }

    Ok(())
}

/// Validates HTTP fetch configuration
fn validate_fetch_config(config: &FetchConfig) -> ConfigResult<()> {
    if config.timeout_seconds < 1 {
        return Err(ConfigError::Validation(
            "fetch timeout_seconds must be >= 1".to_string(),
        ));
    }

    if config.max_redirects > MAX_REDIRECTS {
        return Err(ConfigError::Validation(format!(
            "max_redirects must be <= {}, got {}",
            MAX_REDIRECTS, config.max_redirects
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_extract_config(config: &ExtractConfig) -> ConfigResult<()> {
    if config.max_text_length < 1 {
        return Err(ConfigError::Validation(
            "max_text_length must be >= 1".to_string(),
        ));
    }
    Ok(())
}

/// Validates tone analyzer configuration
///
/// The endpoint is checked even when tone analysis is disabled so a config
/// file never silently carries a broken URL.
fn validate_tone_config(config: &ToneConfig) -> ConfigResult<()> {
    if config.model.trim().is_empty() {
        return Err(ConfigError::Validation(
            "tone model cannot be empty".to_string(),
        ));
    }

    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid tone base_url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Tone base_url '{}' must use http or https",
            config.base_url
        )));
    }

    if config.max_input_length < 1 {
        return Err(ConfigError::Validation(
            "tone max_input_length must be >= 1".to_string(),
        ));
    }

    if !(0.0..=2.0).contains(&config.temperature) {
        return Err(ConfigError::Validation(format!(
            "tone temperature must be between 0.0 and 2.0, got {}",
            config.temperature
        )));
    }

    if config.timeout_seconds < 1 {
        return Err(ConfigError::Validation(
            "tone timeout_seconds must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> ConfigResult<()> {
    if config.cache_dir.is_empty() {
        return Err(ConfigError::Validation(
            "cache_dir cannot be empty".to_string(),
        ));
    }

    if config.reports_dir.is_empty() {
        return Err(ConfigError::Validation(
            "reports_dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}
