//! Easel Core - Foundational types for the Easel asset pipeline
//!
//! This crate provides the types that all other Easel crates depend on:
//! - `ContentHash` - SHA-256 based content hashing
//! - `slugify` - stable filesystem-safe identifiers
//! - `now_iso8601` - UTC timestamps for manifests and run logs
//! - Error types and Result alias

mod error;
mod hash;
mod slug;
mod time;

pub use error::{EaselError, Result};
pub use hash::ContentHash;
pub use slug::slugify;
pub use time::now_iso8601;
