//! Verimail - OTP issuance and fallback email delivery
//!
//! This crate provides the verification-code subsystem of a registration
//! flow: it issues 6-digit one-time passcodes and delivers them through an
//! ordered chain of email providers, falling back to the next provider
//! until one accepts the message.

pub mod config;
pub mod domain;
pub mod email;
pub mod error;
pub mod service;

// Re-export commonly used types
pub use config::Config;
pub use domain::{DeliveryAttempt, DeliveryReport, EmailAddress, EmailMessage, VerificationCode};
pub use error::{AppError, Result};
pub use service::{DeliveryService, VerificationOutcome, VerificationService};
