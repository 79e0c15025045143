//! # chirp-core
//!
//! Core crate for Chirp. Contains configuration schemas, the unified error
//! system, and the traits implemented by the infrastructure crates.
//!
//! This crate has **no** internal dependencies on other Chirp crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
