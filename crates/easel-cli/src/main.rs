//! Easel CLI - batch generation of marketing illustrations and localized copy

mod commands;

use clap::{Parser, Subcommand};
use commands::{illustrate, localize, showcase};

/// Exit status when one or more jobs failed but the run completed
const EXIT_PARTIAL_FAILURE: i32 = 2;
/// Exit status for fatal configuration or persistence errors
const EXIT_FATAL: i32 = 1;

#[derive(Parser)]
#[command(name = "easel")]
#[command(about = "Idempotent batch generation of marketing assets", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate flashcard illustrations for catalog objects
    Illustrate(illustrate::IllustrateArgs),

    /// Translate marketing copy templates into target languages
    Localize(localize::LocalizeArgs),

    /// Generate showcase images cycling categories and language pairs
    Showcase(showcase::ShowcaseArgs),
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Illustrate(args) => illustrate::run(args),
        Commands::Localize(args) => localize::run(args),
        Commands::Showcase(args) => showcase::run(args),
    };

    match result {
        Ok(summary) => {
            if !summary.dry_run && summary.failed() > 0 {
                std::process::exit(EXIT_PARTIAL_FAILURE);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(EXIT_FATAL);
        }
    }
}
