//! Job executor
//!
//! Iterates a catalog strictly in order, one job at a time. Each job is
//! skipped (output already on disk), generated (payload written, manifest
//! flushed), or failed (counted, run continues). Only configuration and
//! persistence errors abort a run.

use easel_core::{ContentHash, EaselError, Result};
use std::path::PathBuf;
use std::time::Duration;

use crate::catalog::Job;
use crate::client::FallbackClient;
use crate::cost;
use crate::manifest::{Manifest, ManifestEntry, Method};

/// Execution settings for one run
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub output_dir: PathBuf,
    pub manifest_path: PathBuf,
    /// Treat a pre-existing output file as already satisfying its job
    pub skip_existing: bool,
    /// Report planned work and cost without generating or writing
    pub dry_run: bool,
    /// Pause between consecutive generation calls
    pub delay: Duration,
    /// Run configuration recorded in the manifest
    pub options: serde_json::Value,
}

/// Terminal state of one job
#[derive(Debug, Clone)]
pub enum Outcome {
    Generated {
        path: PathBuf,
        model: String,
        method: Method,
    },
    Skipped {
        path: PathBuf,
    },
    Failed {
        error: String,
    },
}

/// One job's id and where it ended up
#[derive(Debug, Clone)]
pub struct JobReport {
    pub id: String,
    pub outcome: Outcome,
}

/// Result of a full run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub reports: Vec<JobReport>,
    pub dry_run: bool,
}

impl RunSummary {
    pub fn generated(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Generated { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Failed { .. }))
    }

    pub fn failed_ids(&self) -> Vec<&str> {
        self.reports
            .iter()
            .filter(|r| matches!(r.outcome, Outcome::Failed { .. }))
            .map(|r| r.id.as_str())
            .collect()
    }

    fn count(&self, pred: impl Fn(&Outcome) -> bool) -> usize {
        self.reports.iter().filter(|r| pred(&r.outcome)).count()
    }
}

/// Run every job in the catalog, in order, and report the summary.
///
/// Re-running with identical inputs and skip-existing enabled never
/// re-generates already-produced assets: the executor checks the output
/// path before any network call. A dry run needs no client at all.
pub fn execute(
    jobs: &[Job],
    client: Option<&FallbackClient>,
    opts: &RunOptions,
) -> Result<RunSummary> {
    if opts.dry_run {
        return dry_run(jobs, opts);
    }

    let client = client.ok_or_else(|| {
        EaselError::ConfigError("a generation client is required unless --dry-run is set".to_string())
    })?;

    let mut manifest = Manifest::load_or_new(&opts.manifest_path, opts.options.clone())?;
    let mut reports = Vec::with_capacity(jobs.len());
    let mut calls_made = 0usize;

    println!("Running {} job(s)...", jobs.len());

    for job in jobs {
        if opts.skip_existing && job.output_path.exists() {
            println!("  {} exists, skipped", job.id);
            record(
                &mut manifest,
                job,
                Method::Existing,
                None,
                ContentHash::from_file(&job.output_path)
                    .ok()
                    .map(|h| h.to_prefixed_hex()),
            );
            manifest.save(&opts.manifest_path)?;
            reports.push(JobReport {
                id: job.id.clone(),
                outcome: Outcome::Skipped {
                    path: job.output_path.clone(),
                },
            });
            continue;
        }

        if calls_made > 0 && !opts.delay.is_zero() {
            std::thread::sleep(opts.delay);
        }
        calls_made += 1;

        match client.invoke(&job.request) {
            Ok((payload, method)) => {
                write_output(&job.output_path, &payload.bytes)?;
                let hash = ContentHash::from_bytes(&payload.bytes).to_prefixed_hex();
                record(
                    &mut manifest,
                    job,
                    method,
                    Some(payload.model.clone()),
                    Some(hash),
                );
                manifest.save(&opts.manifest_path)?;

                let via = match method {
                    Method::GeneratedFallback => " (fallback)",
                    _ => "",
                };
                println!("  {} -> {}{}", job.id, job.output_path.display(), via);
                reports.push(JobReport {
                    id: job.id.clone(),
                    outcome: Outcome::Generated {
                        path: job.output_path.clone(),
                        model: payload.model,
                        method,
                    },
                });
            }
            Err(err) => {
                eprintln!("  {} failed: {}", job.id, err);
                reports.push(JobReport {
                    id: job.id.clone(),
                    outcome: Outcome::Failed {
                        error: err.to_string(),
                    },
                });
            }
        }
    }

    let summary = RunSummary {
        reports,
        dry_run: false,
    };
    print_summary(&summary, opts);
    Ok(summary)
}

fn dry_run(jobs: &[Job], opts: &RunOptions) -> Result<RunSummary> {
    println!("Dry run: {} job(s) planned", jobs.len());
    for job in jobs {
        println!("  {} -> {}", job.id, job.output_path.display());
    }

    let est = cost::estimate(jobs.len());
    println!(
        "Estimated cost: ${:.2} (range ${:.2} - ${:.2})",
        est.estimated, est.min, est.max
    );
    println!("  Output: {}", opts.output_dir.display());
    println!("  Manifest: {}", opts.manifest_path.display());

    Ok(RunSummary {
        reports: Vec::new(),
        dry_run: true,
    })
}

fn record(
    manifest: &mut Manifest,
    job: &Job,
    method: Method,
    model: Option<String>,
    content_hash: Option<String>,
) {
    manifest.upsert(ManifestEntry {
        id: job.id.clone(),
        category: job.category.clone(),
        language: job.language.clone(),
        image_path: job.output_path.to_string_lossy().to_string(),
        method,
        model,
        content_hash,
    });
}

fn write_output(path: &std::path::Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            EaselError::PersistenceError(format!(
                "cannot create output directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }
    std::fs::write(path, bytes).map_err(|e| {
        EaselError::PersistenceError(format!("cannot write {}: {}", path.display(), e))
    })
}

fn print_summary(summary: &RunSummary, opts: &RunOptions) {
    println!(
        "\nDone: {} generated, {} skipped, {} failed",
        summary.generated(),
        summary.skipped(),
        summary.failed()
    );
    println!("  Output: {}", opts.output_dir.display());
    println!("  Manifest: {}", opts.manifest_path.display());

    if summary.failed() > 0 {
        println!(
            "  Retry just the failed jobs with --only={}",
            summary.failed_ids().join(",")
        );
    }
}
