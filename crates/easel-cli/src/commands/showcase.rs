//! Showcase image generation
//!
//! Cycles categories and language pairs with modular indexing, so
//! `--max-jobs` may exceed the natural product size; combinations then
//! repeat by design while ids and output paths stay distinct.

use anyhow::Result;
use clap::Args;
use easel_gen::catalog::{self, Filters, ImageOptions};
use easel_gen::{runner, CatalogData, EaselConfig, RunSummary};
use std::path::Path;

use super::CommonArgs;

#[derive(Args, Debug)]
pub struct ShowcaseArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Comma-separated category allow-list (exact match)
    #[arg(long, value_delimiter = ',')]
    pub category: Option<Vec<String>>,
}

pub fn run(args: ShowcaseArgs) -> Result<RunSummary> {
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

    let jobs = catalog::showcase_jobs(&data, &style, &image, &args.common.out_dir(), &filters)?;

    let client = args.common.client(&config, config.model())?;
    let opts = args.common.run_options(&config, "showcase");
    runner::execute(&jobs, client.as_ref(), &opts).map_err(Into::into)
}
