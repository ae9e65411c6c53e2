//! `tracekit load` command - load a corpus and print a summary

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::args::GlobalOpts;
use crate::core::Config;
use crate::corpus::load_dataset;

#[derive(clap::Args, Debug)]
pub struct LoadArgs {
    /// Corpus name (case-insensitive, e.g. albergate, libest)
    pub corpus: String,
}

pub fn run(args: LoadArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let base = super::resolve_datasets_dir(global, &config);

    let dataset = load_dataset(&args.corpus, &base).into_diagnostic()?;

    println!("{} {}", style("Corpus:").bold(), style(&dataset.name).cyan());
    println!("  Language: {}", dataset.language);
    println!("  Requirements: {}", dataset.requirements.len());
    println!("  Source files: {}", dataset.source_files.len());
    println!("  Traceability links: {}", dataset.links.len());

    if !dataset.warnings.is_empty() && !global.quiet {
        println!();
        for warning in &dataset.warnings {
            println!("{} {}", style("warning:").yellow().bold(), warning);
        }
    }

    Ok(())
}
