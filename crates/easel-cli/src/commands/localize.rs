//! Marketing copy localization

use anyhow::Result;
use clap::Args;
use easel_gen::catalog::{self, Filters};
use easel_gen::{runner, CatalogData, EaselConfig, RunSummary};
use std::path::Path;

use super::CommonArgs;

#[derive(Args, Debug)]
pub struct LocalizeArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Comma-separated language codes (case-insensitive)
    #[arg(long, value_delimiter = ',')]
    pub languages: Option<Vec<String>>,

    /// Comma-separated template ids (exact match)
    #[arg(long, value_delimiter = ',')]
    pub templates: Option<Vec<String>>,
}

pub fn run(args: LocalizeArgs) -> Result<RunSummary> {
    let config = EaselConfig::load()?;
    let data = CatalogData::load(Path::new(&args.common.catalog))?;
    let style = args.common.style(&config)?;

    let filters = Filters {
        only: args.common.only.clone(),
        categories: None,
        languages: args.languages.clone(),
        templates: args.templates.clone(),
        max_jobs: args.common.max_jobs,
    };

    let jobs = catalog::localization_jobs(&data, &style, &args.common.out_dir(), &filters)?;

    // Translations go through the chat endpoint, so the text model is the default
    let client = args.common.client(&config, config.text_model())?;
    let opts = args.common.run_options(&config, "localize");
    runner::execute(&jobs, client.as_ref(), &opts).map_err(Into::into)
}
