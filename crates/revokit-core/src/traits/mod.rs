//! Core traits defined in `revokit-core` and implemented by other crates.

pub mod clock;
pub mod revocation;

pub use clock::{Clock, SystemClock};
pub use revocation::RevocationStore;
