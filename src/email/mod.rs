//! Email provider implementations
//!
//! One adapter per external channel, all behind the [`EmailProvider`]
//! trait:
//! - SMTP relay (lettre), serving both the primary and the sandbox channel
//! - Resend transactional HTTPS API (reqwest)

pub mod provider;
pub mod resend;
pub mod smtp;

pub use provider::{EmailProvider, EmailProviderError, SendReceipt};
pub use resend::ResendEmailProvider;
pub use smtp::SmtpEmailProvider;
