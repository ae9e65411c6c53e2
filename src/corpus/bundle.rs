//! Traceability bundle assembly
//!
//! Combines a requirement with its linked source files into a bundle sized
//! to an optional token budget. Budget enforcement is a deterministic
//! first-fit walk over the linked files in resolution order; callers that
//! want priority-based retention pre-order their links before calling.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info, warn};

use crate::corpus::error::DatasetError;
use crate::corpus::models::{
    Dataset, Requirement, SourceFile, TraceabilityBundle, TraceabilityLink,
};

/// Token estimation seam.
///
/// Truncation decisions depend directly on the estimate, so the estimator
/// is injected rather than hard-coded; swapping it changes observable
/// truncation behavior without changing the algorithm.
pub trait TokenEstimator {
    fn estimate_tokens(&self, text: &str) -> usize;
}

/// Fixed chars-per-token approximation: `ceil(chars / n)`.
///
/// This is an approximation, not a tokenizer. It is coarse but cheap and
/// good enough to size bundles against a budget.
#[derive(Debug, Clone, Copy)]
pub struct CharsPerToken(pub usize);

impl Default for CharsPerToken {
    fn default() -> Self {
        // 1 token ≈ 4 characters
        Self(4)
    }
}

impl TokenEstimator for CharsPerToken {
    fn estimate_tokens(&self, text: &str) -> usize {
        text.chars().count().div_ceil(self.0)
    }
}

/// Assemble a bundle for one requirement using the default estimator.
///
/// `links` is expected to already be the subset belonging to this
/// requirement (see [`Dataset::links_for_requirement`]).
pub fn generate_bundle(
    requirement: &Requirement,
    links: &[TraceabilityLink],
    source_files: &BTreeMap<String, SourceFile>,
    token_budget: Option<usize>,
) -> Result<TraceabilityBundle, DatasetError> {
    generate_bundle_with(
        &CharsPerToken::default(),
        requirement,
        links,
        source_files,
        token_budget,
    )
}

/// Assemble a bundle for one requirement with an injected token estimator.
///
/// Target file names are unioned across the links preserving first-seen
/// order; names that resolve to no known source file are dropped with a
/// warning. With no budget, or a budget the whole bundle fits, everything
/// is included untruncated. The requirement itself is never dropped or
/// internally truncated: if its tokens alone meet or exceed the budget the
/// bundle carries zero files. Otherwise linked files are kept first-fit,
/// skipping (never splitting) any file that would overflow the budget.
pub fn generate_bundle_with(
    estimator: &dyn TokenEstimator,
    requirement: &Requirement,
    links: &[TraceabilityLink],
    source_files: &BTreeMap<String, SourceFile>,
    token_budget: Option<usize>,
) -> Result<TraceabilityBundle, DatasetError> {
    let mut target_names: Vec<&str> = Vec::new();
    let mut seen: BTreeSet<&str> = BTreeSet::new();
    for link in links {
        for target in &link.target_files {
            if seen.insert(target) {
                target_names.push(target);
            }
        }
    }

    let mut resolved: Vec<&SourceFile> = Vec::new();
    for name in target_names {
        match source_files.get(name) {
            Some(file) => resolved.push(file),
            None => warn!(
                "linked file not found: {} for requirement {}",
                name, requirement.id
            ),
        }
    }

    let req_tokens = estimator.estimate_tokens(&requirement.text);
    let mut file_tokens = Vec::with_capacity(resolved.len());
    for file in &resolved {
        file_tokens.push(estimator.estimate_tokens(file.content()?));
    }
    let total_tokens = req_tokens + file_tokens.iter().sum::<usize>();

    let (linked_files, token_count, truncated) = match token_budget {
        Some(budget) if total_tokens > budget => {
            debug!(
                "bundle for {} exceeds budget ({} > {}), truncating",
                requirement.id, total_tokens, budget
            );

            if req_tokens >= budget {
                // The requirement is never dropped or truncated internally,
                // even when it alone blows the budget
                warn!("requirement alone exceeds budget for {}", requirement.id);
                (Vec::new(), req_tokens, true)
            } else {
                let mut kept = Vec::new();
                let mut used = req_tokens;
                let mut skipped_any = false;
                for (file, tokens) in resolved.iter().zip(&file_tokens) {
                    if used + tokens <= budget {
                        kept.push((*file).clone());
                        used += tokens;
                    } else {
                        debug!("skipping {} to fit budget", file.file_name);
                        skipped_any = true;
                    }
                }
                (kept, used, skipped_any)
            }
        }
        _ => {
            let kept: Vec<SourceFile> = resolved.into_iter().cloned().collect();
            (kept, total_tokens, false)
        }
    };

    Ok(TraceabilityBundle {
        requirement: requirement.clone(),
        linked_files,
        token_count,
        truncated,
        metadata: BTreeMap::new(),
    })
}

/// Assemble bundles for every requirement in a dataset.
///
/// Optionally restricted to the given requirement ids. Requirements with no
/// links still yield a bundle with an empty file list.
pub fn generate_bundles_for_dataset(
    dataset: &Dataset,
    token_budget: Option<usize>,
    only_requirement_ids: Option<&[String]>,
) -> Result<BTreeMap<String, TraceabilityBundle>, DatasetError> {
    let mut bundles = BTreeMap::new();

    for (req_id, requirement) in &dataset.requirements {
        if let Some(only) = only_requirement_ids {
            if !only.iter().any(|id| id == req_id) {
                continue;
            }
        }

        let links: Vec<TraceabilityLink> = dataset
            .links_for_requirement(req_id)
            .into_iter()
            .cloned()
            .collect();

        let bundle = generate_bundle(requirement, &links, &dataset.source_files, token_budget)?;
        bundles.insert(req_id.clone(), bundle);
    }

    let truncated = bundles.values().filter(|b| b.truncated).count();
    let empty = bundles.values().filter(|b| b.linked_files.is_empty()).count();
    info!(
        "generated {} bundles for {}: {} truncated, {} with no files",
        bundles.len(),
        dataset.name,
        truncated,
        empty
    );

    Ok(bundles)
}

/// Render a bundle as a plain-text document ready to drop into a prompt.
///
/// Requirement header block, requirement text, then one block per linked
/// file, with a trailing note when the bundle was truncated.
pub fn format_bundle_text(
    bundle: &TraceabilityBundle,
    include_metadata: bool,
) -> Result<String, DatasetError> {
    let mut parts: Vec<String> = Vec::new();

    if include_metadata {
        parts.push(format!("=== Requirement: {} ===", bundle.requirement.id));
        parts.push(format!("Language: {}", bundle.requirement.language));
        parts.push(format!("Linked Files: {}", bundle.linked_files.len()));
        parts.push(String::new());
    }

    parts.push("--- Requirement Text ---".to_string());
    parts.push(bundle.requirement.text.trim().to_string());
    parts.push(String::new());

    if bundle.linked_files.is_empty() {
        parts.push("--- No Linked Source Files ---".to_string());
        parts.push(String::new());
    } else {
        parts.push("--- Linked Source Files ---".to_string());
        parts.push(String::new());
        for file in &bundle.linked_files {
            parts.push(format!("=== File: {} ===", file.file_name));
            parts.push(file.content()?.trim().to_string());
            parts.push(String::new());
        }
    }

    if bundle.truncated {
        parts.push("Note: this bundle was truncated to fit the token budget.".to_string());
        parts.push(String::new());
    }

    Ok(parts.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::models::LinkType;

    fn req(id: &str, chars: usize) -> Requirement {
        Requirement::new(id, format!("/corpus/{id}.txt"), "r".repeat(chars), "english")
    }

    fn files(specs: &[(&str, usize)]) -> BTreeMap<String, SourceFile> {
        specs
            .iter()
            .map(|(name, chars)| {
                (
                    name.to_string(),
                    SourceFile::with_content(*name, format!("/corpus/{name}"), "x".repeat(*chars)),
                )
            })
            .collect()
    }

    fn link(source: &str, targets: &[&str]) -> TraceabilityLink {
        TraceabilityLink::new(
            source,
            targets.iter().map(|t| t.to_string()).collect(),
            LinkType::ReqToSource,
        )
    }

    #[test]
    fn test_chars_per_token_rounds_up() {
        let est = CharsPerToken::default();
        assert_eq!(est.estimate_tokens(""), 0);
        assert_eq!(est.estimate_tokens("abcd"), 1);
        assert_eq!(est.estimate_tokens("abcde"), 2);
        assert_eq!(est.estimate_tokens(&"x".repeat(4000)), 1000);
    }

    #[test]
    fn test_no_budget_includes_every_resolvable_file_once() {
        let requirement = req("REQ1", 400);
        let sources = files(&[("A.java", 100), ("B.java", 100)]);
        let links = vec![link("REQ1", &["A.java", "B.java"]), link("REQ1", &["A.java"])];

        let bundle = generate_bundle(&requirement, &links, &sources, None).unwrap();
        assert!(!bundle.truncated);
        assert_eq!(bundle.linked_files.len(), 2);
        assert_eq!(bundle.token_count, 100 + 25 + 25);
    }

    #[test]
    fn test_budget_first_fit_example() {
        // Requirement 4000 chars (1000 tokens), files 2000 and 4000 chars
        // (500 and 1000 tokens), budget 1800: first file fits (1500),
        // second would overflow (2500) and is skipped.
        let requirement = req("REQ1", 4000);
        let sources = files(&[("First.java", 2000), ("Second.java", 4000)]);
        let links = vec![link("REQ1", &["First.java", "Second.java"])];

        let bundle = generate_bundle(&requirement, &links, &sources, Some(1800)).unwrap();
        assert!(bundle.truncated);
        assert_eq!(bundle.token_count, 1500);
        assert_eq!(bundle.linked_files.len(), 1);
        assert_eq!(bundle.linked_files[0].file_name, "First.java");
    }

    #[test]
    fn test_requirement_alone_meeting_budget_drops_all_files() {
        let requirement = req("REQ1", 4000); // 1000 tokens
        let sources = files(&[("A.java", 100)]);
        let links = vec![link("REQ1", &["A.java"])];

        let bundle = generate_bundle(&requirement, &links, &sources, Some(1000)).unwrap();
        assert!(bundle.truncated);
        assert!(bundle.linked_files.is_empty());
        assert_eq!(bundle.token_count, 1000);
    }

    #[test]
    fn test_bundle_that_fits_budget_is_untruncated() {
        let requirement = req("REQ1", 400);
        let sources = files(&[("A.java", 400)]);
        let links = vec![link("REQ1", &["A.java"])];

        let bundle = generate_bundle(&requirement, &links, &sources, Some(200)).unwrap();
        assert!(!bundle.truncated);
        assert_eq!(bundle.token_count, 200);
    }

    #[test]
    fn test_budget_monotonicity() {
        let requirement = req("REQ1", 400); // 100 tokens
        let sources = files(&[("A.java", 400), ("B.java", 800), ("C.java", 400)]);
        let links = vec![link("REQ1", &["A.java", "B.java", "C.java"])];

        let mut prev_files = 0;
        let mut prev_tokens = 0;
        for budget in [100, 200, 300, 400, 500, 600] {
            let bundle = generate_bundle(&requirement, &links, &sources, Some(budget)).unwrap();
            assert!(bundle.linked_files.len() >= prev_files, "files shrank at budget {budget}");
            assert!(bundle.token_count >= prev_tokens, "tokens shrank at budget {budget}");
            prev_files = bundle.linked_files.len();
            prev_tokens = bundle.token_count;
        }
    }

    #[test]
    fn test_unresolved_targets_are_dropped() {
        let requirement = req("REQ1", 400);
        let sources = files(&[("A.java", 100)]);
        let links = vec![link("REQ1", &["A.java", "Missing.java"])];

        let bundle = generate_bundle(&requirement, &links, &sources, None).unwrap();
        assert_eq!(bundle.linked_files.len(), 1);
        assert!(!bundle.truncated);
    }

    #[test]
    fn test_no_links_yields_empty_bundle() {
        let requirement = req("REQ1", 400);
        let sources = files(&[]);

        let bundle = generate_bundle(&requirement, &[], &sources, None).unwrap();
        assert!(bundle.linked_files.is_empty());
        assert!(!bundle.truncated);
        assert_eq!(bundle.token_count, 100);
    }

    #[test]
    fn test_custom_estimator_changes_truncation() {
        struct WordCount;
        impl TokenEstimator for WordCount {
            fn estimate_tokens(&self, text: &str) -> usize {
                text.split_whitespace().count()
            }
        }

        let requirement = Requirement::new("REQ1", "/r.txt", "one two three", "english");
        let sources: BTreeMap<String, SourceFile> = [(
            "A.java".to_string(),
            SourceFile::with_content("A.java", "/A.java", "four five six seven"),
        )]
        .into();
        let links = vec![link("REQ1", &["A.java"])];

        let bundle =
            generate_bundle_with(&WordCount, &requirement, &links, &sources, Some(7)).unwrap();
        assert!(!bundle.truncated);
        assert_eq!(bundle.token_count, 7);
    }

    #[test]
    fn test_format_bundle_text_layout() {
        let requirement = Requirement::new("REQ1", "/r.txt", "The system shall.\n", "english");
        let sources = files(&[("A.java", 8)]);
        let links = vec![link("REQ1", &["A.java"])];

        let bundle = generate_bundle(&requirement, &links, &sources, None).unwrap();
        let text = format_bundle_text(&bundle, true).unwrap();

        assert!(text.contains("=== Requirement: REQ1 ==="));
        assert!(text.contains("Language: english"));
        assert!(text.contains("Linked Files: 1"));
        assert!(text.contains("--- Requirement Text ---\nThe system shall."));
        assert!(text.contains("=== File: A.java ==="));
        assert!(!text.contains("truncated"));
    }

    #[test]
    fn test_format_bundle_text_truncation_note_and_bare_mode() {
        let requirement = req("REQ1", 4000);
        let sources = files(&[("A.java", 4000)]);
        let links = vec![link("REQ1", &["A.java"])];

        let bundle = generate_bundle(&requirement, &links, &sources, Some(1200)).unwrap();
        let text = format_bundle_text(&bundle, false).unwrap();

        assert!(!text.contains("=== Requirement:"));
        assert!(text.contains("--- No Linked Source Files ---"));
        assert!(text.contains("truncated to fit the token budget"));
    }
}
