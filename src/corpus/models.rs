//! Core data types: requirements, source files, links, datasets, bundles

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::corpus::descriptor::CorpusDescriptor;
use crate::corpus::error::DatasetError;

/// Kind of traceability link endpoint pairing.
///
/// The vocabulary is closed: corpora declare requirement-to-source,
/// requirement-to-test, or use-case-to-source links and nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LinkType {
    /// Requirement to source file ("Rq→Src")
    #[serde(rename = "req_to_source")]
    ReqToSource,

    /// Requirement to test file ("Rq→Test")
    #[serde(rename = "req_to_test")]
    ReqToTest,

    /// Use case to source file ("UC→Src")
    #[serde(rename = "use_case_to_source")]
    UseCaseToSource,
}

impl std::fmt::Display for LinkType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinkType::ReqToSource => write!(f, "Rq→Src"),
            LinkType::ReqToTest => write!(f, "Rq→Test"),
            LinkType::UseCaseToSource => write!(f, "UC→Src"),
        }
    }
}

/// A single requirement (or use case) from a corpus.
#[derive(Debug, Clone)]
pub struct Requirement {
    /// Unique identifier within its dataset (e.g. "F-GES-01", "RQ4")
    pub id: String,

    /// Path to the file the requirement was loaded from
    pub path: PathBuf,

    /// Full requirement text, immutable after load
    pub text: String,

    /// Language of the requirement text (e.g. "italian", "english")
    pub language: String,

    /// Free-form metadata
    pub metadata: BTreeMap<String, String>,
}

impl Requirement {
    pub fn new(id: impl Into<String>, path: impl Into<PathBuf>, text: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
            text: text.into(),
            language: language.into(),
            metadata: BTreeMap::new(),
        }
    }
}

/// A source code file registered in a dataset.
///
/// Content is lazy: nothing is read from disk until [`SourceFile::content`]
/// is called, and the result is cached for every later access. The cache is
/// a [`OnceLock`], so first access from concurrent readers still initializes
/// at most once.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// File name, the identity of the file within its dataset
    pub file_name: String,

    /// Full path on disk
    pub path: PathBuf,

    content: OnceLock<String>,
}

impl SourceFile {
    pub fn new(file_name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            file_name: file_name.into(),
            path: path.into(),
            content: OnceLock::new(),
        }
    }

    /// Create a source file with its content cache pre-seeded.
    ///
    /// Useful for in-memory construction; the path is never read.
    pub fn with_content(
        file_name: impl Into<String>,
        path: impl Into<PathBuf>,
        content: impl Into<String>,
    ) -> Self {
        let cell = OnceLock::new();
        let _ = cell.set(content.into());
        Self {
            file_name: file_name.into(),
            path: path.into(),
            content: cell,
        }
    }

    /// Get the file content, reading it from disk on first access.
    ///
    /// Invalid UTF-8 sequences are replaced, never fatal.
    pub fn content(&self) -> Result<&str, DatasetError> {
        if let Some(text) = self.content.get() {
            return Ok(text);
        }
        let bytes = std::fs::read(&self.path).map_err(|source| DatasetError::Io {
            path: self.path.clone(),
            source,
        })?;
        let text = String::from_utf8_lossy(&bytes).into_owned();
        Ok(self.content.get_or_init(|| text).as_str())
    }

    /// File extension derived from the path (without the dot).
    pub fn extension(&self) -> Option<&str> {
        self.path.extension().and_then(|e| e.to_str())
    }
}

/// A traceability link between one requirement and its target files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceabilityLink {
    /// Source requirement id (normalized, no ".txt" suffix)
    pub source_id: String,

    /// Target file names, non-empty after validation
    pub target_files: Vec<String>,

    /// Kind of link
    pub link_type: LinkType,
}

impl TraceabilityLink {
    pub fn new(source_id: impl Into<String>, target_files: Vec<String>, link_type: LinkType) -> Self {
        Self {
            source_id: source_id.into(),
            target_files,
            link_type,
        }
    }
}

/// A fully loaded traceability corpus.
///
/// Populated incrementally by the loader and handed to callers as an
/// immutable snapshot. Requirement ids and file names are unique keys.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Display name (e.g. "Albergate", "LibEST")
    pub name: String,

    /// Base directory the corpus was loaded from
    pub base_path: PathBuf,

    /// Primary language of the requirements
    pub language: String,

    /// Requirements keyed by id
    pub requirements: BTreeMap<String, Requirement>,

    /// Source files keyed by file name
    pub source_files: BTreeMap<String, SourceFile>,

    /// Validated, merged traceability links
    pub links: Vec<TraceabilityLink>,

    /// Non-fatal problems encountered during loading, in discovery order
    pub warnings: Vec<String>,

    /// The descriptor this corpus was loaded under
    pub descriptor: &'static CorpusDescriptor,
}

impl Dataset {
    /// All links whose source resolves to the given requirement id.
    ///
    /// Accepts ground-truth sources recorded either as the bare id or with
    /// a ".txt" suffix.
    pub fn links_for_requirement(&self, req_id: &str) -> Vec<&TraceabilityLink> {
        let with_txt = format!("{req_id}.txt");
        self.links
            .iter()
            .filter(|link| link.source_id == req_id || link.source_id == with_txt)
            .collect()
    }
}

/// A requirement paired with its linked source files, sized to a token
/// budget. The primary unit of downstream context.
#[derive(Debug, Clone)]
pub struct TraceabilityBundle {
    /// The requirement at the center of the bundle
    pub requirement: Requirement,

    /// Linked source files that made it into the bundle, in resolution order
    pub linked_files: Vec<SourceFile>,

    /// Estimated tokens actually included (requirement plus kept files)
    pub token_count: usize,

    /// True iff available linked content was excluded to fit the budget
    pub truncated: bool,

    /// Free-form bundle metadata
    pub metadata: BTreeMap<String, String>,
}

/// Path helper shared by the loaders: file stem as an owned string.
pub(crate) fn file_stem(path: &Path) -> Option<String> {
    path.file_stem().and_then(|s| s.to_str()).map(|s| s.to_string())
}
