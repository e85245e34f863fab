//! # revokit-core
//!
//! Core crate for Revokit. Contains the revocation store and clock traits,
//! configuration schemas, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Revokit crates.

pub mod config;
pub mod error;
pub mod keys;
pub mod result;
pub mod traits;

pub use error::AppError;
pub use result::AppResult;
