//! Services for Verimail

pub mod delivery;
pub mod verification;

pub use delivery::DeliveryService;
pub use verification::{VerificationOutcome, VerificationService};
