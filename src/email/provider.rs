//! Email provider trait and error types

use crate::domain::EmailMessage;
use async_trait::async_trait;
use thiserror::Error;

/// Email provider error types
///
/// Every provider failure becomes one of these values and is folded into a
/// [`crate::domain::DeliveryAttempt`] by the orchestrator; nothing crosses
/// the provider boundary as a panic.
#[derive(Error, Debug)]
pub enum EmailProviderError {
    /// Required credential or secret is absent; raised before any network I/O
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    /// Message failed the provider's own input checks
    #[error("Invalid message: {0}")]
    InvalidMessage(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The provider accepted the connection but rejected the message
    #[error("Rejected by provider: {0}")]
    Rejected(String),

    /// The attempt did not resolve within the orchestrator's deadline
    #[error("Attempt timed out after {0}s")]
    Timeout(u64),

    #[error("Send failed: {0}")]
    SendFailed(String),
}

/// What a provider hands back on success
#[derive(Debug, Clone)]
pub struct SendReceipt {
    /// Provider-native message identifier, when the provider reports one
    pub message_id: Option<String>,
}

impl SendReceipt {
    pub fn new(message_id: Option<String>) -> Self {
        Self { message_id }
    }
}

/// Trait for email providers
///
/// Implementations perform real network I/O; a successful send may cause
/// the recipient to actually receive mail, so callers must not retry an
/// ambiguous failure blindly.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmailProvider: Send + Sync {
    /// Attempt to transmit the message through this channel
    async fn send(&self, message: &EmailMessage) -> Result<SendReceipt, EmailProviderError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}

/// Shared input check: recipient and subject must be non-empty
pub(crate) fn validate_message(message: &EmailMessage) -> Result<(), EmailProviderError> {
    if message.to.email.trim().is_empty() {
        return Err(EmailProviderError::InvalidMessage(
            "recipient address is empty".to_string(),
        ));
    }
    if message.subject.trim().is_empty() {
        return Err(EmailProviderError::InvalidMessage(
            "subject is empty".to_string(),
        ));
    }
    Ok(())
}
