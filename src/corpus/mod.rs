//! Corpus module - datasets, ground truth, and bundle assembly

pub mod bundle;
pub mod descriptor;
pub mod error;
pub mod ground_truth;
pub mod loader;
pub mod models;
pub mod stats;

pub use bundle::{
    format_bundle_text, generate_bundle, generate_bundle_with, generate_bundles_for_dataset,
    CharsPerToken, TokenEstimator,
};
pub use descriptor::{CorpusDescriptor, RequirementsLayout, CORPORA};
pub use error::DatasetError;
pub use ground_truth::{merge_duplicate_links, parse_ground_truth_file, validate_links};
pub use loader::{list_available_corpora, load_dataset, SOURCE_EXTENSIONS};
pub use models::{
    Dataset, LinkType, Requirement, SourceFile, TraceabilityBundle, TraceabilityLink,
};
pub use stats::{bundle_statistics, BundleStatistics};
