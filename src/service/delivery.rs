//! Delivery orchestration over an ordered provider chain
//!
//! The chain is fixed at construction: providers are injected in priority
//! order and tried one at a time until the first success. A provider is
//! attempted at most once per delivery; there is no retry and no backoff,
//! because a retried ambiguous failure could deliver the same mail twice.

use crate::config::Config;
use crate::domain::{DeliveryAttempt, DeliveryReport, EmailMessage};
use crate::email::{EmailProvider, EmailProviderError, ResendEmailProvider, SmtpEmailProvider};
use crate::error::{AppError, Result};
use std::time::Duration;
use tracing::{error, info, warn};

/// Email delivery service with ordered fallback
pub struct DeliveryService {
    providers: Vec<Box<dyn EmailProvider>>,
    attempt_timeout: Duration,
}

impl DeliveryService {
    /// Create a service over an explicit provider chain
    ///
    /// Providers are tried in the order given. An empty chain is a startup
    /// error, not a per-delivery failure.
    pub fn new(providers: Vec<Box<dyn EmailProvider>>, attempt_timeout: Duration) -> Result<Self> {
        if providers.is_empty() {
            return Err(AppError::Configuration(
                "no email providers configured".to_string(),
            ));
        }

        info!(
            providers = ?providers.iter().map(|p| p.provider_name()).collect::<Vec<_>>(),
            "Initialized delivery chain"
        );

        Ok(Self {
            providers,
            attempt_timeout,
        })
    }

    /// Assemble the chain from configuration
    ///
    /// Priority order is fixed: resend, then the primary SMTP relay, then
    /// the sandbox relay. Groups absent from the configuration are skipped
    /// with a single startup warning; a group that is present but unusable
    /// is a hard configuration error.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut providers: Vec<Box<dyn EmailProvider>> = Vec::new();

        match &config.resend {
            Some(resend) => {
                let provider = ResendEmailProvider::from_config(resend)
                    .map_err(|e| AppError::Configuration(e.to_string()))?;
                providers.push(Box::new(provider));
            }
            None => warn!("Resend provider not configured, skipping"),
        }

        match &config.smtp {
            Some(smtp) => {
                let provider = SmtpEmailProvider::from_config(smtp)
                    .map_err(|e| AppError::Configuration(e.to_string()))?;
                providers.push(Box::new(provider));
            }
            None => warn!("Primary SMTP provider not configured, skipping"),
        }

        match &config.sandbox {
            Some(sandbox) => {
                let provider = SmtpEmailProvider::from_sandbox_config(sandbox)
                    .map_err(|e| AppError::Configuration(e.to_string()))?;
                providers.push(Box::new(provider));
            }
            None => warn!("Sandbox SMTP provider not configured, skipping"),
        }

        Self::new(providers, config.attempt_timeout())
    }

    /// Provider names in priority order
    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.provider_name()).collect()
    }

    /// Deliver a message through the chain
    ///
    /// Providers are invoked sequentially; the next one is contacted only
    /// after the previous attempt has fully resolved. Every attempt is
    /// bounded by the configured timeout, and every outcome is recorded on
    /// the report. Provider failures never surface as `Err`: only an
    /// invalid message does.
    pub async fn deliver(&self, message: &EmailMessage) -> Result<DeliveryReport> {
        if message.to.email.trim().is_empty() {
            return Err(AppError::Validation(
                "recipient address must not be empty".to_string(),
            ));
        }
        if message.subject.trim().is_empty() {
            return Err(AppError::Validation(
                "subject must not be empty".to_string(),
            ));
        }

        let recipient = mask_email(&message.to.email);
        let mut attempts = Vec::with_capacity(self.providers.len());

        for provider in &self.providers {
            let name = provider.provider_name();
            info!(provider = name, to = %recipient, "Attempting delivery");

            let outcome = match tokio::time::timeout(self.attempt_timeout, provider.send(message))
                .await
            {
                Ok(result) => result,
                Err(_) => Err(EmailProviderError::Timeout(self.attempt_timeout.as_secs())),
            };

            match outcome {
                Ok(receipt) => {
                    info!(
                        provider = name,
                        message_id = receipt.message_id.as_deref().unwrap_or("-"),
                        to = %recipient,
                        "Delivery succeeded"
                    );
                    attempts.push(DeliveryAttempt::succeeded(name, receipt.message_id));
                    // Fallback short-circuit: remaining providers are never invoked
                    return Ok(DeliveryReport::from_attempts(attempts));
                }
                Err(e) => {
                    warn!(provider = name, error = %e, "Delivery attempt failed");
                    attempts.push(DeliveryAttempt::failed(name, e.to_string()));
                }
            }
        }

        error!(
            to = %recipient,
            attempts = attempts.len(),
            "All providers exhausted, delivery failed"
        );
        Ok(DeliveryReport::from_attempts(attempts))
    }
}

/// Mask an email address for log output ("user@example.com" -> "us***@example.com")
fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        // Counted in chars, not bytes: local parts may hold multibyte
        // characters and slicing those at a byte offset panics.
        Some((local, domain)) if local.chars().count() > 2 => {
            let visible: String = local.chars().take(2).collect();
            format!("{}***@{}", visible, domain)
        }
        Some((_, domain)) => format!("***@{}", domain),
        None => "***".to_string(),
    }
}
