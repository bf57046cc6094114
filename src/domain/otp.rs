//! One-time passcode generation

use rand::{rngs::OsRng, Rng};
use serde::Serialize;
use std::fmt;

const CODE_MIN: u32 = 100_000;
const CODE_MAX: u32 = 999_999;

/// A 6-digit numeric verification code
///
/// Immutable once created; the caller owns its lifecycle (storage, expiry,
/// consumption). The `Debug` form masks the digits so the code cannot leak
/// through structured logging; use [`VerificationCode::as_str`] or
/// `Display` where the raw value is genuinely needed.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct VerificationCode(String);

impl VerificationCode {
    /// Generate a fresh code from the OS CSPRNG
    ///
    /// Samples uniformly from [100000, 999999], so every code is exactly
    /// six digits with no leading zero and no modulo bias. Each call is
    /// independent; safe to invoke from concurrent delivery requests.
    pub fn generate() -> Self {
        let value = OsRng.gen_range(CODE_MIN..=CODE_MAX);
        Self(value.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VerificationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for VerificationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("VerificationCode(******)")
    }
}
