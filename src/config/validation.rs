//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses and URLs parse
//! - Validate value ranges (timeouts > 0, limits > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use tracing_subscriber::EnvFilter;
use url::Url;

use crate::config::schema::AppConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address \"{0}\" is not a socket address")]
    BindAddress(String),

    #[error("listener.public_url \"{0}\" is not an absolute URL")]
    PublicUrl(String),

    #[error("session.cookie_name must not be empty")]
    CookieName,

    #[error("session.ttl_secs must be greater than zero")]
    SessionTtl,

    #[error("timeouts.request_secs must be greater than zero")]
    RequestTimeout,

    #[error("security.max_body_size must be greater than zero")]
    BodyLimit,

    #[error("observability.log_level \"{0}\" is not a valid filter")]
    LogLevel(String),

    #[error("observability.metrics_address \"{0}\" is not a socket address")]
    MetricsAddress(String),
}

/// Check `config` for semantic errors.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }
    match Url::parse(&config.listener.public_url) {
        Ok(url) if !url.cannot_be_a_base() => {}
        _ => errors.push(ValidationError::PublicUrl(config.listener.public_url.clone())),
    }

    if config.session.cookie_name.trim().is_empty() {
        errors.push(ValidationError::CookieName);
    }
    if config.session.ttl_secs == 0 {
        errors.push(ValidationError::SessionTtl);
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::RequestTimeout);
    }
    if config.security.max_body_size == 0 {
        errors.push(ValidationError::BodyLimit);
    }

    if EnvFilter::try_new(&config.observability.log_level).is_err() {
        errors.push(ValidationError::LogLevel(config.observability.log_level.clone()));
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(validate_config(&AppConfig::default()), Ok(()));
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = AppConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.session.cookie_name = " ".into();
        config.timeouts.request_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::BindAddress("not-an-address".into()),
                ValidationError::CookieName,
                ValidationError::RequestTimeout,
            ]
        );
    }

    #[test]
    fn test_metrics_address_checked_only_when_enabled() {
        let mut config = AppConfig::default();
        config.observability.metrics_address = "nowhere".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::MetricsAddress("nowhere".into())])
        );
    }

    #[test]
    fn test_public_url_must_be_absolute() {
        let mut config = AppConfig::default();
        config.listener.public_url = "/relative".into();
        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::PublicUrl("/relative".into())])
        );
    }
}
