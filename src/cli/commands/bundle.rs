//! `tracekit bundle` command - print one requirement's bundle

use miette::{IntoDiagnostic, Result};

use crate::cli::args::GlobalOpts;
use crate::core::Config;
use crate::corpus::{format_bundle_text, generate_bundle, load_dataset, TraceabilityLink};

#[derive(clap::Args, Debug)]
pub struct BundleArgs {
    /// Corpus name (case-insensitive, e.g. albergate, libest)
    pub corpus: String,

    /// Requirement id to bundle
    #[arg(long)]
    pub req: String,

    /// Token budget for the bundle (default: from config, then unlimited)
    #[arg(long)]
    pub budget: Option<usize>,

    /// Omit the metadata header block
    #[arg(long)]
    pub bare: bool,
}

pub fn run(args: BundleArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let base = super::resolve_datasets_dir(global, &config);
    let budget = args.budget.or(config.token_budget);

    let dataset = load_dataset(&args.corpus, &base).into_diagnostic()?;

    let requirement = dataset.requirements.get(&args.req).ok_or_else(|| {
        miette::miette!(
            "requirement not found: {} in corpus {}",
            args.req,
            dataset.name
        )
    })?;

    let links: Vec<TraceabilityLink> = dataset
        .links_for_requirement(&args.req)
        .into_iter()
        .cloned()
        .collect();

    let bundle =
        generate_bundle(requirement, &links, &dataset.source_files, budget).into_diagnostic()?;
    let text = format_bundle_text(&bundle, !args.bare).into_diagnostic()?;

    print!("{text}");

    Ok(())
}
