//! Easel Gen - idempotent batch asset generation
//!
//! Expands a catalog of (subject, target) pairs into an ordered job list,
//! composes prompts against a shared style guide, calls a generative API
//! through a normalized client (with a one-shot model fallback), and
//! records everything produced in a JSON manifest flushed per job.

pub mod catalog;
pub mod client;
pub mod clients;
pub mod config;
pub mod cost;
pub mod manifest;
pub mod prompt;
pub mod runlog;
pub mod runner;
pub mod style;

pub use catalog::{CatalogData, Filters, ImageOptions, Job};
pub use client::{AssetClient, ErrorKind, FallbackClient, GenPayload, GenRequest, InvokeError, RequestKind};
pub use config::EaselConfig;
pub use cost::{estimate, CostEstimate};
pub use manifest::{Manifest, ManifestEntry, Method};
pub use runlog::{RunLog, RunObject, RunRecord};
pub use runner::{execute, Outcome, RunOptions, RunSummary};
pub use style::StyleGuide;
