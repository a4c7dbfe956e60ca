//! # SMP Common Library
//!
//! Shared code for the membership portal backend:
//! - Error taxonomy
//! - Data directory resolution
//! - Credential hashing helpers

pub mod auth;
pub mod config;
pub mod error;

pub use error::{Error, Result};
