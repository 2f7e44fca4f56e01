//! Flashcard illustration generation

use anyhow::Result;
use clap::Args;
use easel_core::now_iso8601;
use easel_gen::catalog::{self, Filters, ImageOptions};
use easel_gen::{cost, runner, CatalogData, EaselConfig, Outcome, RunLog, RunObject, RunRecord, RunSummary};
use std::path::{Path, PathBuf};

use super::CommonArgs;

#[derive(Args, Debug)]
pub struct IllustrateArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Comma-separated category allow-list (exact match)
    #[arg(long, value_delimiter = ',')]
    pub category: Option<Vec<String>>,

    /// Historical run log path (defaults to <out-dir>/runlog.json)
    #[arg(long)]
    pub run_log: Option<String>,
}

pub fn run(args: IllustrateArgs) -> Result<RunSummary> {
    let config = EaselConfig::load()?;
    let data = CatalogData::load(Path::new(&args.common.catalog))?;
    let style = args.common.style(&config)?;

    let filters = Filters {
        only: args.common.only.clone(),
        categories: args.category.clone(),
        languages: None,
        templates: None,
        max_jobs: args.common.max_jobs,
    };
    let image = ImageOptions {
        size: config.generation.size.clone(),
        quality: config.generation.quality.clone(),
    };

    let jobs = catalog::illustration_jobs(
        &data,
        &style,
        &image,
        &args.common.out_dir(),
        &filters,
    )?;

    let client = args.common.client(&config, config.model())?;
    let opts = args.common.run_options(&config, "illustrate");
    let summary = runner::execute(&jobs, client.as_ref(), &opts)?;

    if !summary.dry_run {
        append_run_log(&args, &summary)?;
    }

    Ok(summary)
}

/// Record this run in the accumulating history log. Skipped jobs were
/// produced (and logged) by an earlier run, so only fresh outcomes appear.
fn append_run_log(args: &IllustrateArgs, summary: &RunSummary) -> Result<()> {
    let path = match &args.run_log {
        Some(p) => PathBuf::from(p),
        None => args.common.out_dir().join("runlog.json"),
    };

    let mut objects = Vec::new();
    for report in &summary.reports {
        match &report.outcome {
            Outcome::Generated { path, .. } => objects.push(RunObject {
                id: report.id.clone(),
                success: true,
                file: Some(path.to_string_lossy().to_string()),
                error: None,
            }),
            Outcome::Failed { error } => objects.push(RunObject {
                id: report.id.clone(),
                success: false,
                file: None,
                error: Some(error.clone()),
            }),
            Outcome::Skipped { .. } => {}
        }
    }

    let generated = summary.generated();
    let record = RunRecord {
        timestamp: now_iso8601(),
        objects,
        success_count: generated,
        fail_count: summary.failed(),
        estimated_cost: cost::estimate(generated).estimated,
    };

    let mut log = RunLog::load_or_default(&path)?;
    log.push(record);
    log.save(&path)?;
    Ok(())
}
