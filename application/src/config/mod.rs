//! Application-level configuration.
//!
//! - [`BatchOptions`] - per-request parameters and pacing for a batch fetch

pub mod batch_options;

pub use batch_options::{BatchOptions, BatchOptionsError};
