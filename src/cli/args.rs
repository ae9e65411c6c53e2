//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::cli::commands::{
    bundle::BundleArgs, list::ListArgs, load::LoadArgs, stats::StatsArgs,
};

#[derive(Parser)]
#[command(name = "tracekit")]
#[command(author, version, about = "Traceability corpus toolkit")]
#[command(
    long_about = "Loads requirements-to-code traceability corpora and assembles token-budgeted context bundles for LLM prompts."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Base directory containing the corpora (default: from config, then ./datasets)
    #[arg(long, global = true, env = "TRACEKIT_DATASETS")]
    pub datasets_dir: Option<PathBuf>,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the known corpora and whether they are present on disk
    List(ListArgs),

    /// Load a corpus and print a summary
    Load(LoadArgs),

    /// Assemble one requirement's bundle and print it as prompt-ready text
    Bundle(BundleArgs),

    /// Assemble bundles for a whole corpus and print batch statistics
    Stats(StatsArgs),
}
