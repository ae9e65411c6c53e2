//! CLI command implementations

pub mod bundle;
pub mod list;
pub mod load;
pub mod stats;

use std::path::PathBuf;

use crate::cli::args::GlobalOpts;
use crate::core::Config;

/// Resolve the corpora base directory: CLI flag first, then the config
/// layers, then `./datasets`.
pub(crate) fn resolve_datasets_dir(global: &GlobalOpts, config: &Config) -> PathBuf {
    global
        .datasets_dir
        .clone()
        .unwrap_or_else(|| config.datasets_dir())
}
