//! Verification facade: code issuance plus delivery
//!
//! The entry point a registration flow talks to. It issues the code and
//! runs the delivery chain; the caller builds the message body (embedding
//! the code however it likes) and decides what to do with the outcome.

use crate::config::Config;
use crate::domain::{DeliveryReport, EmailMessage, VerificationCode};
use crate::error::Result;
use crate::service::DeliveryService;
use serde::Serialize;

/// Outcome of one verification delivery
///
/// Carries the issued code back to the caller together with the delivery
/// report. The code appears here and nowhere else: it is never written to
/// the logs.
#[derive(Debug, Serialize)]
pub struct VerificationOutcome {
    /// The issued code, echoed for the caller to persist or verify against
    pub otp: VerificationCode,
    /// What happened across the provider chain
    #[serde(flatten)]
    pub delivery: DeliveryReport,
}

impl VerificationOutcome {
    /// Whether any provider accepted the message
    pub fn delivered(&self) -> bool {
        self.delivery.success
    }
}

/// Service tying code issuance to email delivery
pub struct VerificationService {
    delivery: DeliveryService,
}

impl VerificationService {
    pub fn new(delivery: DeliveryService) -> Self {
        Self { delivery }
    }

    /// Build the service from environment-driven configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(DeliveryService::from_config(config)?))
    }

    /// Issue a fresh verification code
    ///
    /// Pure issuance: the caller owns storage, expiry and consumption.
    pub fn issue_code(&self) -> VerificationCode {
        VerificationCode::generate()
    }

    /// Deliver a caller-built message through the provider chain
    pub async fn deliver(&self, message: &EmailMessage) -> Result<DeliveryReport> {
        self.delivery.deliver(message).await
    }

    /// Deliver a message carrying the given code and echo the code back
    ///
    /// The message body must already contain the code; this method only
    /// pairs the delivery report with it so the caller has a single value
    /// to act on. Repeated calls are not deduplicated: each one may cause
    /// a real transmission.
    pub async fn send_code(
        &self,
        message: &EmailMessage,
        code: VerificationCode,
    ) -> Result<VerificationOutcome> {
        let delivery = self.delivery.deliver(message).await?;
        Ok(VerificationOutcome {
            otp: code,
            delivery,
        })
    }
}
