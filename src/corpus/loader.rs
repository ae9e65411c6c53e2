//! Dataset loading
//!
//! Walks a per-corpus directory layout declared by its descriptor, loads
//! requirements and source files, reconciles ground-truth links, and
//! assembles a [`Dataset`]. Anything short of a missing corpus is handled
//! by skipping the offending item and recording a warning.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use tracing::{info, warn};
use walkdir::WalkDir;

use crate::corpus::descriptor::{self, CorpusDescriptor, RequirementsLayout};
use crate::corpus::error::DatasetError;
use crate::corpus::ground_truth::{merge_duplicate_links, parse_ground_truth_file, validate_links};
use crate::corpus::models::{file_stem, Dataset, Requirement, SourceFile, TraceabilityLink};

/// File extensions recognized as source code.
pub const SOURCE_EXTENSIONS: &[&str] = &["java", "c", "cpp", "h", "py", "js"];

/// Load a corpus by name from the given base directory.
///
/// The base directory is expected to contain one subdirectory per corpus,
/// named after the corpus display name (e.g. `<base>/Albergate`). Fails only
/// when the corpus name is unrecognized or its directory is missing; every
/// other problem becomes a warning on the returned dataset.
pub fn load_dataset(name: &str, base_path: &Path) -> Result<Dataset, DatasetError> {
    let descriptor = descriptor::find(name).ok_or_else(|| DatasetError::UnknownCorpus {
        name: name.to_string(),
        available: descriptor::known_corpora(),
    })?;

    let corpus_path = base_path.join(descriptor.display_name);
    if !corpus_path.exists() {
        return Err(DatasetError::MissingCorpusDir(corpus_path));
    }

    info!("loading corpus {} from {}", descriptor.display_name, corpus_path.display());

    let mut warnings = Vec::new();

    // Requirements
    let requirements = match descriptor.requirements {
        RequirementsLayout::Directory(subdir) => {
            load_requirements_dir(&corpus_path.join(subdir), descriptor.language, &mut warnings)
        }
        RequirementsLayout::SingleFile(file) => {
            load_requirements_file(&corpus_path.join(file), descriptor.language, &mut warnings)
        }
    };
    info!("loaded {} requirements", requirements.len());

    // Source files from every declared subdirectory, plus the `test`
    // subdirectory some corpora use for separately stored test code
    let mut source_files = BTreeMap::new();
    for subdir in descriptor.source_dirs {
        let dir = corpus_path.join(subdir);
        if dir.exists() {
            load_source_files(&dir, &mut source_files);
        } else {
            let warning = format!("source directory not found: {}", dir.display());
            warn!("{warning}");
            warnings.push(warning);
        }
    }
    let test_dir = corpus_path.join("test");
    if test_dir.exists() {
        load_source_files(&test_dir, &mut source_files);
    }
    info!("loaded {} source files", source_files.len());

    // Ground truth: parse every declared file, merge, then validate
    let mut all_links: Vec<TraceabilityLink> = Vec::new();
    for (gt_file, link_type) in descriptor.ground_truth {
        let gt_path = corpus_path.join(gt_file);
        if !gt_path.exists() {
            let warning = format!("ground truth file not found: {}", gt_path.display());
            warn!("{warning}");
            warnings.push(warning);
            continue;
        }
        let (links, parse_warnings) = parse_ground_truth_file(&gt_path, *link_type)?;
        all_links.extend(links);
        warnings.extend(parse_warnings);
    }

    let merged = merge_duplicate_links(all_links);
    let merged_count = merged.len();

    let known_requirements: BTreeSet<String> = requirements.keys().cloned().collect();
    let known_files: BTreeSet<String> = source_files.keys().cloned().collect();
    let (links, link_warnings) = validate_links(merged, &known_requirements, &known_files);

    for warning in &link_warnings {
        warn!("{warning}");
    }
    warnings.extend(link_warnings);

    info!(
        "loaded {} valid traceability links ({} dropped)",
        links.len(),
        merged_count - links.len()
    );

    // Advisory consistency check against the descriptor
    if let Some(expected) = descriptor.expected_requirements {
        if requirements.len() != expected {
            let warning = format!(
                "requirement count mismatch for {}: expected {}, got {}",
                descriptor.display_name,
                expected,
                requirements.len()
            );
            warn!("{warning}");
            warnings.push(warning);
        }
    }

    Ok(Dataset {
        name: descriptor.display_name.to_string(),
        base_path: corpus_path,
        language: descriptor.language.to_string(),
        requirements,
        source_files,
        links,
        warnings,
        descriptor,
    })
}

/// Descriptors of the corpora actually present under the base directory.
pub fn list_available_corpora(base_path: &Path) -> Vec<&'static CorpusDescriptor> {
    descriptor::CORPORA
        .iter()
        .filter(|c| base_path.join(c.display_name).is_dir())
        .collect()
}

/// Load one requirement per `.txt` file (case-insensitive) in a directory.
/// The file stem is the requirement id.
fn load_requirements_dir(
    dir: &Path,
    language: &str,
    warnings: &mut Vec<String>,
) -> BTreeMap<String, Requirement> {
    let mut requirements = BTreeMap::new();

    if !dir.exists() {
        let warning = format!("requirements directory not found: {}", dir.display());
        warn!("{warning}");
        warnings.push(warning);
        return requirements;
    }

    for entry in WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        let is_txt = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("txt"));
        if !is_txt {
            continue;
        }

        let Some(id) = file_stem(path) else { continue };

        match std::fs::read(path) {
            Ok(bytes) => {
                let text = String::from_utf8_lossy(&bytes).into_owned();
                requirements.insert(id.clone(), Requirement::new(id, path, text, language));
            }
            Err(err) => {
                let warning = format!("failed to read requirement {}: {}", path.display(), err);
                warn!("{warning}");
                warnings.push(warning);
            }
        }
    }

    requirements
}

/// Load requirements from a single tab-separated file: `<id>\t<text>` per
/// line. Lines without a tab are skipped with a warning.
fn load_requirements_file(
    path: &Path,
    language: &str,
    warnings: &mut Vec<String>,
) -> BTreeMap<String, Requirement> {
    let mut requirements = BTreeMap::new();

    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) => {
            let warning = format!("requirements file not found: {} ({})", path.display(), err);
            warn!("{warning}");
            warnings.push(warning);
            return requirements;
        }
    };
    let text = String::from_utf8_lossy(&bytes);
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    for (idx, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        match line.split_once('\t') {
            Some((id, body)) => {
                requirements.insert(
                    id.to_string(),
                    Requirement::new(id, path, body, language),
                );
            }
            None => {
                let warning = format!("malformed line {} in {}", idx + 1, file_name);
                warn!("{warning}");
                warnings.push(warning);
            }
        }
    }

    info!("loaded {} requirements from {}", requirements.len(), file_name);

    requirements
}

/// Register one lazy [`SourceFile`] per recognized file in a directory.
fn load_source_files(dir: &Path, source_files: &mut BTreeMap<String, SourceFile>) {
    for entry in WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        let recognized = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| SOURCE_EXTENSIONS.contains(&e));
        if !recognized {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy().into_owned();
        source_files.insert(file_name.clone(), SourceFile::new(file_name, path));
    }
}
