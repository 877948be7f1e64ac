//! Core constants and errors shared across the engine.

pub mod constants;
pub mod error;

pub use constants::*;
pub use error::*;
