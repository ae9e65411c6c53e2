//! Aggregate statistics over a batch of bundles

use std::collections::BTreeMap;

use serde::Serialize;

use crate::corpus::models::TraceabilityBundle;

/// Token and file counts aggregated across a batch of bundles.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BundleStatistics {
    pub total_bundles: usize,
    pub avg_token_count: f64,
    pub max_token_count: usize,
    pub min_token_count: usize,
    pub truncated_count: usize,
    pub empty_bundles: usize,
    pub avg_files_per_bundle: f64,
}

/// Compute statistics for a mapping of bundles.
///
/// An empty mapping yields all-zero fields rather than a division error.
pub fn bundle_statistics(bundles: &BTreeMap<String, TraceabilityBundle>) -> BundleStatistics {
    if bundles.is_empty() {
        return BundleStatistics::default();
    }

    let count = bundles.len();
    let token_total: usize = bundles.values().map(|b| b.token_count).sum();
    let file_total: usize = bundles.values().map(|b| b.linked_files.len()).sum();

    BundleStatistics {
        total_bundles: count,
        avg_token_count: token_total as f64 / count as f64,
        max_token_count: bundles.values().map(|b| b.token_count).max().unwrap_or(0),
        min_token_count: bundles.values().map(|b| b.token_count).min().unwrap_or(0),
        truncated_count: bundles.values().filter(|b| b.truncated).count(),
        empty_bundles: bundles
            .values()
            .filter(|b| b.linked_files.is_empty())
            .count(),
        avg_files_per_bundle: file_total as f64 / count as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::models::{Requirement, SourceFile};

    fn bundle(id: &str, tokens: usize, file_count: usize, truncated: bool) -> TraceabilityBundle {
        TraceabilityBundle {
            requirement: Requirement::new(id, "/r.txt", "text", "english"),
            linked_files: (0..file_count)
                .map(|i| SourceFile::with_content(format!("f{i}.java"), "/f.java", "x"))
                .collect(),
            token_count: tokens,
            truncated,
            metadata: Default::default(),
        }
    }

    #[test]
    fn test_empty_input_is_all_zero() {
        let stats = bundle_statistics(&BTreeMap::new());
        assert_eq!(stats, BundleStatistics::default());
        assert_eq!(stats.total_bundles, 0);
        assert_eq!(stats.avg_token_count, 0.0);
    }

    #[test]
    fn test_statistics_aggregation() {
        let bundles: BTreeMap<String, TraceabilityBundle> = [
            ("R1".to_string(), bundle("R1", 100, 2, false)),
            ("R2".to_string(), bundle("R2", 300, 0, true)),
            ("R3".to_string(), bundle("R3", 200, 1, false)),
        ]
        .into();

        let stats = bundle_statistics(&bundles);
        assert_eq!(stats.total_bundles, 3);
        assert_eq!(stats.avg_token_count, 200.0);
        assert_eq!(stats.max_token_count, 300);
        assert_eq!(stats.min_token_count, 100);
        assert_eq!(stats.truncated_count, 1);
        assert_eq!(stats.empty_bundles, 1);
        assert_eq!(stats.avg_files_per_bundle, 1.0);
    }
}
