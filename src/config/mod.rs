//! Configuration management for Verimail
//!
//! Every provider group is independently optional: a group whose
//! credentials are absent from the environment is configured-out and the
//! delivery chain is assembled without it.

use crate::domain::{ResendConfig, SmtpConfig};
use crate::error::{AppError, Result};
use std::env;
use std::time::Duration;
use validator::Validate;

const DEFAULT_ATTEMPT_TIMEOUT_SECS: u64 = 30;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Resend transactional API (first in priority order)
    pub resend: Option<ResendConfig>,
    /// Primary authenticated SMTP relay
    pub smtp: Option<SmtpConfig>,
    /// Sandbox SMTP relay (non-production, last resort)
    pub sandbox: Option<SmtpConfig>,
    /// Upper bound for a single provider attempt, in seconds
    pub attempt_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            resend: None,
            smtp: None,
            sandbox: None,
            attempt_timeout_secs: DEFAULT_ATTEMPT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Reads a `.env` file when present. Provider groups are keyed on
    /// their credential variable: no credential, no provider.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let resend = match env::var("RESEND_API_KEY") {
            Ok(api_key) => {
                let config = ResendConfig {
                    api_key,
                    from_email: required_var("RESEND_FROM_EMAIL")?,
                    from_name: env::var("RESEND_FROM_NAME").ok(),
                    base_url: env::var("RESEND_BASE_URL")
                        .unwrap_or_else(|_| "https://api.resend.com".to_string()),
                };
                config.validate()?;
                Some(config)
            }
            Err(_) => None,
        };

        let smtp = match (env::var("SMTP_USERNAME"), env::var("SMTP_PASSWORD")) {
            (Ok(username), Ok(password)) => {
                let config = SmtpConfig {
                    host: env::var("SMTP_HOST").unwrap_or_else(|_| "smtp.gmail.com".to_string()),
                    port: parsed_var("SMTP_PORT", 587)?,
                    username: Some(username),
                    password: Some(password),
                    use_tls: bool_var("SMTP_USE_TLS", true),
                    from_email: required_var("SMTP_FROM_EMAIL")?,
                    from_name: env::var("SMTP_FROM_NAME").ok(),
                };
                config.validate()?;
                Some(config)
            }
            _ => None,
        };

        let sandbox = match (
            env::var("SANDBOX_SMTP_USERNAME"),
            env::var("SANDBOX_SMTP_PASSWORD"),
        ) {
            (Ok(username), Ok(password)) => {
                let config = SmtpConfig {
                    host: env::var("SANDBOX_SMTP_HOST")
                        .unwrap_or_else(|_| "smtp.ethereal.email".to_string()),
                    port: parsed_var("SANDBOX_SMTP_PORT", 587)?,
                    username: Some(username.clone()),
                    password: Some(password),
                    use_tls: bool_var("SANDBOX_SMTP_USE_TLS", true),
                    // Ethereal-style sandboxes send from the account address
                    from_email: env::var("SANDBOX_FROM_EMAIL").unwrap_or(username),
                    from_name: env::var("SANDBOX_FROM_NAME").ok(),
                };
                config.validate()?;
                Some(config)
            }
            _ => None,
        };

        Ok(Self {
            resend,
            smtp,
            sandbox,
            attempt_timeout_secs: parsed_var(
                "DELIVERY_ATTEMPT_TIMEOUT_SECS",
                DEFAULT_ATTEMPT_TIMEOUT_SECS,
            )?,
        })
    }

    /// Upper bound for a single provider attempt
    pub fn attempt_timeout(&self) -> Duration {
        Duration::from_secs(self.attempt_timeout_secs)
    }

    /// Whether at least one provider group is configured
    pub fn has_providers(&self) -> bool {
        self.resend.is_some() || self.smtp.is_some() || self.sandbox.is_some()
    }
}

fn required_var(name: &str) -> Result<String> {
    env::var(name).map_err(|_| AppError::Configuration(format!("{} is required", name)))
}

fn parsed_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T> {
    match env::var(name) {
        Ok(value) => value
            .parse()
            .map_err(|_| AppError::Configuration(format!("Invalid {}: {}", name, value))),
        Err(_) => Ok(default),
    }
}

fn bool_var(name: &str, default: bool) -> bool {
    env::var(name)
        .map(|s| s.to_lowercase() == "true")
        .unwrap_or(default)
}
