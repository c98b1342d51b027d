//! # hookable-core
//!
//! Core crate for the hookable engine. Contains the unified error type,
//! the result alias, and the configuration schemas read by the engine and
//! the demo binary.
//!
//! This crate has **no** internal dependencies on other hookable crates.

pub mod config;
pub mod error;
pub mod result;

pub use error::{ErrorKind, HookError};
pub use result::HookResult;
