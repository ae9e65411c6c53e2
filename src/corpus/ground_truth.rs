//! Ground-truth parsing and link reconciliation
//!
//! Ground-truth files declare which source files satisfy which requirement,
//! one declaration per line. Layouts differ across corpora: some put one
//! target per line ("REQ.txt FILE.java"), others many ("REQ.txt A.c B.c").
//! The line itself determines arity, so no configuration is needed.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use tracing::{debug, warn};

use crate::corpus::error::DatasetError;
use crate::corpus::models::{LinkType, TraceabilityLink};

/// Parse a ground-truth file into traceability links.
///
/// One link per non-empty, non-comment (`#`-prefixed) line: the first
/// whitespace-delimited token is the requirement id, the rest are target
/// file names. A trailing ".txt" on the id is stripped, since corpora are
/// inconsistent about including it. Malformed lines (fewer than two tokens)
/// are skipped and reported in the returned warnings.
pub fn parse_ground_truth_file(
    path: &Path,
    link_type: LinkType,
) -> Result<(Vec<TraceabilityLink>, Vec<String>), DatasetError> {
    if !path.exists() {
        return Err(DatasetError::GroundTruthNotFound(path.to_path_buf()));
    }

    let bytes = std::fs::read(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let text = String::from_utf8_lossy(&bytes);
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut links = Vec::new();
    let mut warnings = Vec::new();

    for (idx, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut tokens = line.split_whitespace();
        let source_token = tokens.next().unwrap_or_default();
        let target_files: Vec<String> = tokens.map(|t| t.to_string()).collect();

        if target_files.is_empty() {
            let warning = format!("malformed line {} in {}: {}", idx + 1, file_name, line);
            warn!("{warning}");
            warnings.push(warning);
            continue;
        }

        let source_id = source_token.strip_suffix(".txt").unwrap_or(source_token);
        links.push(TraceabilityLink::new(source_id, target_files, link_type));
    }

    debug!("parsed {} traceability links from {}", links.len(), file_name);

    Ok((links, warnings))
}

/// Validate links against the known requirement ids and file names.
///
/// A link survives when its source id resolves (as the bare id or with a
/// ".txt" suffix) and at least one target file exists; unknown targets are
/// dropped from the link. One warning is produced per dropped source, per
/// dropped target, and per link left with no targets, in input order.
pub fn validate_links(
    links: Vec<TraceabilityLink>,
    known_requirements: &BTreeSet<String>,
    known_files: &BTreeSet<String>,
) -> (Vec<TraceabilityLink>, Vec<String>) {
    let mut valid = Vec::new();
    let mut warnings = Vec::new();

    for mut link in links {
        let with_txt = format!("{}.txt", link.source_id);
        if !known_requirements.contains(&link.source_id) && !known_requirements.contains(&with_txt) {
            warnings.push(format!("link source not found: {}", link.source_id));
            continue;
        }

        let mut surviving = Vec::new();
        for target in link.target_files {
            if known_files.contains(&target) {
                surviving.push(target);
            } else {
                warnings.push(format!(
                    "link target not found: {} → {}",
                    link.source_id, target
                ));
            }
        }

        if surviving.is_empty() {
            warnings.push(format!("link has no valid targets: {}", link.source_id));
        } else {
            link.target_files = surviving;
            valid.push(link);
        }
    }

    (valid, warnings)
}

/// Merge links that share a source id into one link per id.
///
/// Target file sets are unioned and deduplicated, preserving first-seen
/// order; the link type of the first occurrence is retained. Idempotent.
pub fn merge_duplicate_links(links: Vec<TraceabilityLink>) -> Vec<TraceabilityLink> {
    let mut merged: Vec<TraceabilityLink> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for link in links {
        match index.get(&link.source_id) {
            Some(&i) => {
                let existing = &mut merged[i];
                for target in link.target_files {
                    if !existing.target_files.contains(&target) {
                        existing.target_files.push(target);
                    }
                }
            }
            None => {
                index.insert(link.source_id.clone(), merged.len());
                merged.push(link);
            }
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn req_set(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_multi_target_line() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("ground.txt");
        fs::write(&path, "REQ1.txt FileA.java FileB.java\n").unwrap();

        let (links, warnings) = parse_ground_truth_file(&path, LinkType::ReqToSource).unwrap();
        assert!(warnings.is_empty());
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].source_id, "REQ1");
        assert_eq!(links[0].target_files, vec!["FileA.java", "FileB.java"]);
        assert_eq!(links[0].link_type, LinkType::ReqToSource);
    }

    #[test]
    fn test_parse_one_target_per_line_layout() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("ground.txt");
        fs::write(&path, "F-GES-01.txt ModificaStanze.java\nF-GES-01.txt Prenota.java\n").unwrap();

        let (links, _) = parse_ground_truth_file(&path, LinkType::ReqToSource).unwrap();
        assert_eq!(links.len(), 2);
        assert!(links.iter().all(|l| l.source_id == "F-GES-01"));
    }

    #[test]
    fn test_parse_skips_comments_and_blank_lines() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("ground.txt");
        fs::write(&path, "# header comment\n\nRQ4 est_server.c\n  \n").unwrap();

        let (links, warnings) = parse_ground_truth_file(&path, LinkType::ReqToSource).unwrap();
        assert!(warnings.is_empty());
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].source_id, "RQ4");
    }

    #[test]
    fn test_parse_warns_on_malformed_line() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("ground.txt");
        fs::write(&path, "LONELY\nRQ1 a.java\n").unwrap();

        let (links, warnings) = parse_ground_truth_file(&path, LinkType::ReqToSource).unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("malformed line 1"));
    }

    #[test]
    fn test_parse_missing_file_is_not_found() {
        let err =
            parse_ground_truth_file(Path::new("/nonexistent/ground.txt"), LinkType::ReqToSource)
                .unwrap_err();
        assert!(matches!(err, DatasetError::GroundTruthNotFound(_)));
    }

    #[test]
    fn test_validate_drops_unknown_source() {
        let links = vec![TraceabilityLink::new(
            "GHOST",
            vec!["a.java".to_string()],
            LinkType::ReqToSource,
        )];
        let (valid, warnings) =
            validate_links(links, &req_set(&["REQ1"]), &req_set(&["a.java"]));
        assert!(valid.is_empty());
        assert_eq!(warnings, vec!["link source not found: GHOST"]);
    }

    #[test]
    fn test_validate_accepts_source_with_txt_suffix_in_requirements() {
        // Some corpora key requirements by "RQ1.txt" while ground truth says "RQ1"
        let links = vec![TraceabilityLink::new(
            "RQ1",
            vec!["a.java".to_string()],
            LinkType::ReqToSource,
        )];
        let (valid, warnings) =
            validate_links(links, &req_set(&["RQ1.txt"]), &req_set(&["a.java"]));
        assert_eq!(valid.len(), 1);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_validate_drops_unknown_targets_keeps_link() {
        let links = vec![TraceabilityLink::new(
            "REQ1",
            vec!["a.java".to_string(), "ghost.java".to_string()],
            LinkType::ReqToSource,
        )];
        let (valid, warnings) =
            validate_links(links, &req_set(&["REQ1"]), &req_set(&["a.java"]));
        assert_eq!(valid.len(), 1);
        assert_eq!(valid[0].target_files, vec!["a.java"]);
        assert_eq!(warnings, vec!["link target not found: REQ1 → ghost.java"]);
    }

    #[test]
    fn test_validate_drops_link_with_no_surviving_targets() {
        let links = vec![TraceabilityLink::new(
            "REQ1",
            vec!["ghost.java".to_string()],
            LinkType::ReqToSource,
        )];
        let (valid, warnings) = validate_links(links, &req_set(&["REQ1"]), &BTreeSet::new());
        assert!(valid.is_empty());
        assert_eq!(
            warnings,
            vec![
                "link target not found: REQ1 → ghost.java",
                "link has no valid targets: REQ1"
            ]
        );
    }

    #[test]
    fn test_validate_never_changes_link_type() {
        let links = vec![TraceabilityLink::new(
            "REQ1",
            vec!["a.c".to_string()],
            LinkType::ReqToTest,
        )];
        let (valid, _) = validate_links(links, &req_set(&["REQ1"]), &req_set(&["a.c"]));
        assert_eq!(valid[0].link_type, LinkType::ReqToTest);
    }

    #[test]
    fn test_merge_unions_targets_for_same_source() {
        let links = vec![
            TraceabilityLink::new("REQ1", vec!["a.java".to_string()], LinkType::ReqToSource),
            TraceabilityLink::new(
                "REQ1",
                vec!["b.java".to_string(), "a.java".to_string()],
                LinkType::ReqToTest,
            ),
            TraceabilityLink::new("REQ2", vec!["c.java".to_string()], LinkType::ReqToSource),
        ];

        let merged = merge_duplicate_links(links);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].source_id, "REQ1");
        assert_eq!(merged[0].target_files, vec!["a.java", "b.java"]);
        // Link type of the first occurrence wins
        assert_eq!(merged[0].link_type, LinkType::ReqToSource);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let links = vec![
            TraceabilityLink::new("REQ1", vec!["a.java".to_string()], LinkType::ReqToSource),
            TraceabilityLink::new("REQ1", vec!["b.java".to_string()], LinkType::ReqToSource),
            TraceabilityLink::new("REQ2", vec!["c.java".to_string()], LinkType::ReqToSource),
        ];

        let once = merge_duplicate_links(links);
        let twice = merge_duplicate_links(once.clone());
        assert_eq!(once, twice);
    }
}
