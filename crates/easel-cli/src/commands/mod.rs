//! Subcommand implementations

pub mod illustrate;
pub mod localize;
pub mod showcase;

use anyhow::Result;
use clap::Args;
use easel_gen::{clients, EaselConfig, FallbackClient, RunOptions, StyleGuide};
use std::path::PathBuf;

/// Flags shared by every generation subcommand
#[derive(Args, Debug)]
pub struct CommonArgs {
    /// Path to the catalog data file
    #[arg(long, default_value = "catalog.toml")]
    pub catalog: String,

    /// Output directory for generated assets
    #[arg(long, default_value = "output/assets")]
    pub out_dir: String,

    /// Manifest path (defaults to <out-dir>/manifest.json)
    #[arg(long)]
    pub manifest: Option<String>,

    /// Print the resolved catalog and cost estimate without generating
    #[arg(long)]
    pub dry_run: bool,

    /// Comma-separated job ids to run (exact match)
    #[arg(long, value_delimiter = ',')]
    pub only: Option<Vec<String>>,

    /// Model override for this run
    #[arg(long)]
    pub model: Option<String>,

    /// Cap the number of jobs
    #[arg(long)]
    pub max_jobs: Option<usize>,

    /// Regenerate outputs even when the file already exists
    #[arg(long)]
    pub no_skip_existing: bool,

    /// Style guide name
    #[arg(long)]
    pub style: Option<String>,
}

impl CommonArgs {
    pub fn out_dir(&self) -> PathBuf {
        PathBuf::from(&self.out_dir)
    }

    pub fn manifest_path(&self) -> PathBuf {
        match &self.manifest {
            Some(path) => PathBuf::from(path),
            None => self.out_dir().join("manifest.json"),
        }
    }

    /// Build runner options, recording the run configuration in the manifest
    pub fn run_options(&self, config: &EaselConfig, variant: &str) -> RunOptions {
        RunOptions {
            output_dir: self.out_dir(),
            manifest_path: self.manifest_path(),
            skip_existing: !self.no_skip_existing,
            dry_run: self.dry_run,
            delay: config.request_delay(),
            options: serde_json::json!({
                "variant": variant,
                "catalog": self.catalog,
                "model": self.model,
                "maxJobs": self.max_jobs,
                "only": self.only,
                "skipExisting": !self.no_skip_existing,
            }),
        }
    }

    /// Build the generation client, unless this is a dry run
    pub fn client(
        &self,
        config: &EaselConfig,
        default_model: &str,
    ) -> Result<Option<FallbackClient>> {
        if self.dry_run {
            return Ok(None);
        }
        let model = self.model.as_deref().unwrap_or(default_model);
        let client = clients::from_config(config, Some(model))?;
        Ok(Some(client))
    }

    /// Resolve the style guide: flag, then config default, then empty
    pub fn style(&self, config: &EaselConfig) -> Result<StyleGuide> {
        match self.style.as_deref().or_else(|| config.default_style()) {
            Some(name) => Ok(StyleGuide::find(name)?),
            None => Ok(StyleGuide::default()),
        }
    }
}
