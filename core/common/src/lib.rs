//! Common types shared across drivectl modules.
//!
//! This module provides the error taxonomy used throughout the codebase,
//! ensuring consistent failure reporting across crates.

pub mod error;

pub use error::{Error, Result};
