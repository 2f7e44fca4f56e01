//! Run manifest
//!
//! A JSON record of what was produced, where, and by what method. Entries
//! are upserted by id and the document is flushed after every completed or
//! skipped job, so an interrupted run keeps the progress it made.

use easel_core::{now_iso8601, EaselError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How a manifest item came to exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Method {
    /// Output file already existed; no generation call was made
    #[serde(rename = "existing")]
    Existing,
    /// Generated by the primary model
    #[serde(rename = "generated-primary")]
    GeneratedPrimary,
    /// Generated by the fallback model after a recoverable primary failure
    #[serde(rename = "generated-fallback")]
    GeneratedFallback,
}

/// A record of a single completed or skipped job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub image_path: String,
    pub method: Method,
    /// Model that produced the asset; null for skipped jobs
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
}

/// Manifest document, one per output tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub generated_at: String,
    /// Run configuration, recorded verbatim for auditability
    pub options: serde_json::Value,
    pub items: Vec<ManifestEntry>,
}

impl Manifest {
    /// Create a new manifest with the given run options
    pub fn new(options: serde_json::Value) -> Self {
        Self {
            generated_at: now_iso8601(),
            options,
            items: Vec::new(),
        }
    }

    /// Load a manifest, or start fresh with the given options when the file
    /// does not exist yet
    pub fn load_or_new(path: &Path, options: serde_json::Value) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new(options));
        }
        let content = std::fs::read_to_string(path)?;
        let mut manifest: Manifest = serde_json::from_str(&content).map_err(|e| {
            EaselError::PersistenceError(format!(
                "failed to parse manifest {}: {}",
                path.display(),
                e
            ))
        })?;
        manifest.options = options;
        Ok(manifest)
    }

    /// Insert or replace the entry with the same id
    pub fn upsert(&mut self, entry: ManifestEntry) {
        match self.items.iter_mut().find(|e| e.id == entry.id) {
            Some(existing) => *existing = entry,
            None => self.items.push(entry),
        }
    }

    /// Write the full document, creating parent directories as needed
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                EaselError::PersistenceError(format!(
                    "cannot create manifest directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| {
            EaselError::PersistenceError(format!(
                "cannot write manifest {}: {}",
                path.display(),
                e
            ))
        })
    }
}
