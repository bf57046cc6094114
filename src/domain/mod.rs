//! Domain types for Verimail

pub mod delivery;
pub mod email;
pub mod otp;

pub use delivery::{DeliveryAttempt, DeliveryReport};
pub use email::{EmailAddress, EmailMessage, ResendConfig, SmtpConfig};
pub use otp::VerificationCode;
