//! # ecodash Common Library
//!
//! Shared code for the ecodash dashboard service:
//! - Error types
//! - Settings resolution (ENV → TOML → compiled defaults)
//! - Assessment API types and response-envelope normalization
//! - Formatting utilities

pub mod api;
pub mod config;
pub mod error;
pub mod format;

pub use error::{Error, Result};
