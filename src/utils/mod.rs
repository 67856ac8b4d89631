//! Shared configuration constants and error types.

pub mod config;
pub mod error;
pub mod validate;
