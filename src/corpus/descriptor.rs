//! Static descriptors for the known traceability corpora
//!
//! Each corpus ships with its own directory layout and ground-truth
//! conventions. The differences are data, not code: adding a corpus means
//! adding an entry to [`CORPORA`].

use crate::corpus::models::LinkType;

/// How a corpus stores its requirements on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequirementsLayout {
    /// One `.txt` file per requirement in the named subdirectory;
    /// the file stem is the requirement id
    Directory(&'static str),

    /// A single tab-separated file: `<id>\t<text>` per line
    SingleFile(&'static str),
}

/// Declared layout and metadata for one corpus.
#[derive(Debug)]
pub struct CorpusDescriptor {
    /// Lookup key (lowercase)
    pub key: &'static str,

    /// Display name, also the corpus directory name under the base path
    pub display_name: &'static str,

    /// Primary language of the requirement texts
    pub language: &'static str,

    /// Where the requirements live
    pub requirements: RequirementsLayout,

    /// Subdirectories holding source code
    pub source_dirs: &'static [&'static str],

    /// Ground-truth files, each with the link type it declares
    pub ground_truth: &'static [(&'static str, LinkType)],

    /// Advisory requirement count; a mismatch is a warning, never fatal
    pub expected_requirements: Option<usize>,
}

/// The six known corpora.
pub const CORPORA: &[CorpusDescriptor] = &[
    CorpusDescriptor {
        key: "albergate",
        display_name: "Albergate",
        language: "italian",
        requirements: RequirementsLayout::Directory("requirements"),
        source_dirs: &["source_code"],
        ground_truth: &[("ground.txt", LinkType::ReqToSource)],
        expected_requirements: Some(17),
    },
    CorpusDescriptor {
        key: "ebt",
        display_name: "EBT",
        language: "english",
        requirements: RequirementsLayout::SingleFile("requirements.txt"),
        source_dirs: &["source_code"],
        ground_truth: &[("code_ground.txt", LinkType::ReqToSource)],
        expected_requirements: Some(41),
    },
    CorpusDescriptor {
        key: "libest",
        display_name: "LibEST",
        language: "english",
        requirements: RequirementsLayout::Directory("requirements"),
        source_dirs: &["source_code"],
        ground_truth: &[
            ("req_to_code_ground.txt", LinkType::ReqToSource),
            ("req_to_test_ground.txt", LinkType::ReqToTest),
        ],
        expected_requirements: Some(52),
    },
    CorpusDescriptor {
        key: "etour",
        display_name: "eTOUR",
        language: "english",
        requirements: RequirementsLayout::Directory("use_cases"),
        source_dirs: &["source_code"],
        ground_truth: &[("ground.txt", LinkType::UseCaseToSource)],
        expected_requirements: Some(89),
    },
    CorpusDescriptor {
        key: "smos",
        display_name: "SMOS",
        language: "italian",
        requirements: RequirementsLayout::Directory("use_cases"),
        source_dirs: &["source_code"],
        ground_truth: &[("ground.txt", LinkType::UseCaseToSource)],
        expected_requirements: Some(85),
    },
    CorpusDescriptor {
        key: "itrust",
        display_name: "iTrust",
        language: "english",
        requirements: RequirementsLayout::Directory("use_cases"),
        source_dirs: &["source_code"],
        ground_truth: &[("ground.txt", LinkType::UseCaseToSource)],
        expected_requirements: Some(35),
    },
];

/// Look up a corpus descriptor by name (case-insensitive).
pub fn find(name: &str) -> Option<&'static CorpusDescriptor> {
    let lower = name.to_ascii_lowercase();
    CORPORA.iter().find(|c| c.key == lower)
}

/// Comma-separated list of known corpus keys, for error messages.
pub fn known_corpora() -> String {
    CORPORA
        .iter()
        .map(|c| c.key)
        .collect::<Vec<_>>()
        .join(", ")
}
