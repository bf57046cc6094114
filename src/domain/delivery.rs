//! Delivery attempt and report types

use serde::Serialize;

/// Record of one provider's single try
///
/// Attempts accumulate in priority order on the [`DeliveryReport`]; the
/// first successful one ends the chain.
#[derive(Debug, Clone, Serialize)]
pub struct DeliveryAttempt {
    /// Provider name ("resend", "smtp", "sandbox")
    pub provider: String,

    /// Provider-native message identifier, present on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,

    /// Human-readable error summary, present on failure. Operator
    /// diagnostics only; never shown to end users.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DeliveryAttempt {
    pub fn succeeded(provider: impl Into<String>, message_id: Option<String>) -> Self {
        Self {
            provider: provider.into(),
            message_id,
            error: None,
        }
    }

    pub fn failed(provider: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            message_id: None,
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Canonical result of one delivery request
///
/// Returned once per `deliver` call and owned by the caller. Exactly one
/// attempt can be successful; providers after the first success are never
/// invoked. When every provider fails, `success` is false and `attempts`
/// holds each failure in priority order.
#[derive(Debug, Clone, Serialize)]
pub struct DeliveryReport {
    pub success: bool,

    /// Which provider succeeded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,

    /// Message identifier from the succeeding provider
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,

    /// Every attempt made, in priority order
    pub attempts: Vec<DeliveryAttempt>,
}

impl DeliveryReport {
    /// Build a report from the recorded attempts
    ///
    /// The report is successful when the last attempt succeeded (the chain
    /// stops at the first success, so a successful attempt is always last).
    pub fn from_attempts(attempts: Vec<DeliveryAttempt>) -> Self {
        match attempts.last() {
            Some(last) if last.is_success() => Self {
                success: true,
                service: Some(last.provider.clone()),
                message_id: last.message_id.clone(),
                attempts,
            },
            _ => Self {
                success: false,
                service: None,
                message_id: None,
                attempts,
            },
        }
    }

    /// Errors of every failed attempt, in priority order
    pub fn failures(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attempts
            .iter()
            .filter_map(|a| a.error.as_deref().map(|e| (a.provider.as_str(), e)))
    }
}
