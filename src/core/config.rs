//! Configuration management with layered hierarchy

use serde::Deserialize;
use std::path::PathBuf;

/// Tracekit configuration with layered hierarchy
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base directory containing the corpora
    pub datasets_dir: Option<PathBuf>,

    /// Default token budget for bundle assembly
    pub token_budget: Option<usize>,

    /// Default output format for statistics
    pub default_format: Option<String>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (already in Default impl)

        // 2. Global user config (~/.config/tracekit/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                if let Ok(contents) = std::fs::read_to_string(&global_path) {
                    if let Ok(global) = serde_yml::from_str::<Config>(&contents) {
                        config.merge(global);
                    }
                }
            }
        }

        // 3. Local config (./tracekit.yaml)
        let local_path = PathBuf::from("tracekit.yaml");
        if local_path.exists() {
            if let Ok(contents) = std::fs::read_to_string(&local_path) {
                if let Ok(local) = serde_yml::from_str::<Config>(&contents) {
                    config.merge(local);
                }
            }
        }

        // 4. Environment variables
        if let Ok(dir) = std::env::var("TRACEKIT_DATASETS") {
            config.datasets_dir = Some(PathBuf::from(dir));
        }
        if let Ok(budget) = std::env::var("TRACEKIT_BUDGET") {
            if let Ok(budget) = budget.parse() {
                config.token_budget = Some(budget);
            }
        }

        config
    }

    /// Get the path to the global config file
    fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "tracekit")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.datasets_dir.is_some() {
            self.datasets_dir = other.datasets_dir;
        }
        if other.token_budget.is_some() {
            self.token_budget = other.token_budget;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
    }

    /// Base corpora directory, defaulting to `./datasets`
    pub fn datasets_dir(&self) -> PathBuf {
        self.datasets_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("datasets"))
    }
}
