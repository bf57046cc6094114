//! Email message and provider configuration types

use serde::{Deserialize, Serialize};
use validator::Validate;

/// SMTP configuration for email sending
///
/// Used for both the primary relay and the sandbox relay; the two differ
/// only in host and credential source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
pub struct SmtpConfig {
    /// SMTP server host
    #[validate(length(min = 1, max = 255))]
    pub host: String,

    /// SMTP server port (typically 587 for STARTTLS, 465 for SSL)
    pub port: u16,

    /// Username for authentication (optional)
    pub username: Option<String>,

    /// Password for authentication
    pub password: Option<String>,

    /// Use STARTTLS encryption
    #[serde(default = "default_true")]
    pub use_tls: bool,

    /// From email address
    #[validate(email)]
    pub from_email: String,

    /// From name (optional)
    pub from_name: Option<String>,
}

/// Resend transactional API configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
pub struct ResendConfig {
    /// API key (Bearer token)
    #[validate(length(min = 1))]
    pub api_key: String,

    /// From email address (must belong to a verified sending domain)
    #[validate(email)]
    pub from_email: String,

    /// From name (optional)
    pub from_name: Option<String>,

    /// API base URL; overridable so tests can point at a local server
    #[serde(default = "default_resend_base_url")]
    pub base_url: String,
}

fn default_true() -> bool {
    true
}

fn default_resend_base_url() -> String {
    "https://api.resend.com".to_string()
}

/// Email address with optional display name
#[derive(Debug, Clone)]
pub struct EmailAddress {
    pub email: String,
    pub name: Option<String>,
}

impl EmailAddress {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: None,
        }
    }

    pub fn with_name(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: Some(name.into()),
        }
    }

    /// Render as an RFC 5322 mailbox string
    pub fn to_mailbox_string(&self) -> String {
        match &self.name {
            Some(name) => format!("{} <{}>", name, self.email),
            None => self.email.clone(),
        }
    }
}

/// Email message to be delivered
///
/// Built by the caller; providers never mutate it.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: EmailAddress,
    pub subject: String,
    pub text_body: String,
    pub html_body: Option<String>,
}

impl EmailMessage {
    pub fn new(to: EmailAddress, subject: impl Into<String>, text_body: impl Into<String>) -> Self {
        Self {
            to,
            subject: subject.into(),
            text_body: text_body.into(),
            html_body: None,
        }
    }

    pub fn with_html_body(mut self, html_body: impl Into<String>) -> Self {
        self.html_body = Some(html_body.into());
        self
    }

    /// HTML body if present, otherwise the plain-text body
    pub fn html_or_text(&self) -> &str {
        self.html_body.as_deref().unwrap_or(&self.text_body)
    }
}
