//! `tracekit stats` command - batch bundle statistics for a corpus

use clap::ValueEnum;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::args::GlobalOpts;
use crate::core::Config;
use crate::corpus::{bundle_statistics, generate_bundles_for_dataset, load_dataset};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatsFormat {
    Table,
    Json,
}

#[derive(clap::Args, Debug)]
pub struct StatsArgs {
    /// Corpus name (case-insensitive, e.g. albergate, libest)
    pub corpus: String,

    /// Token budget applied to every bundle (default: from config, then unlimited)
    #[arg(long)]
    pub budget: Option<usize>,

    /// Restrict bundling to these requirement ids (repeatable)
    #[arg(long = "req")]
    pub reqs: Vec<String>,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value = "table")]
    pub format: StatsFormat,
}

pub fn run(args: StatsArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let base = super::resolve_datasets_dir(global, &config);
    let budget = args.budget.or(config.token_budget);

    let dataset = load_dataset(&args.corpus, &base).into_diagnostic()?;

    let only = (!args.reqs.is_empty()).then_some(args.reqs.as_slice());
    let bundles = generate_bundles_for_dataset(&dataset, budget, only).into_diagnostic()?;
    let stats = bundle_statistics(&bundles);

    match args.format {
        StatsFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&stats).into_diagnostic()?
            );
        }
        StatsFormat::Table => {
            println!(
                "{} {}",
                style("Bundle statistics for").bold(),
                style(&dataset.name).cyan()
            );
            if let Some(budget) = budget {
                println!("  Token budget: {budget}");
            }
            println!("  Bundles: {}", stats.total_bundles);
            println!("  Avg tokens: {:.0}", stats.avg_token_count);
            println!("  Min tokens: {}", stats.min_token_count);
            println!("  Max tokens: {}", stats.max_token_count);
            println!("  Truncated: {}", stats.truncated_count);
            println!("  Empty bundles: {}", stats.empty_bundles);
            println!("  Avg files per bundle: {:.1}", stats.avg_files_per_bundle);
        }
    }

    Ok(())
}
