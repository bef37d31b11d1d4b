//! Custom assertions for test verification

use netsense_core::features::structural::{FeatureTable, FEATURE_COUNT};
use std::path::Path;

/// Assert every feature value lies in [0, 1]
pub fn assert_unit_interval(table: &FeatureTable) {
    for (node, row) in table.rows().iter().enumerate() {
        for (col, &v) in row.iter().enumerate() {
            assert!(
                (0.0..=1.0).contains(&v),
                "feature {col} of node {node} is {v}, expected [0, 1]"
            );
        }
        assert_eq!(row.len(), FEATURE_COUNT);
    }
}

/// Parse a ranking file into `(name, score)` pairs
pub fn read_ranking(path: &Path) -> Vec<(String, f64)> {
    let text = std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("cannot read ranking {}: {e}", path.display()));
    text.lines()
        .map(|line| {
            let (name, score) = line
                .rsplit_once(' ')
                .unwrap_or_else(|| panic!("malformed ranking line: {line:?}"));
            let decimals = score.split_once('.').map(|(_, d)| d.len());
            assert_eq!(decimals, Some(6), "score must have 6 decimals: {line:?}");
            (name.to_string(), score.parse().expect("numeric score"))
        })
        .collect()
}

/// Assert a ranking file is sorted by descending score with unique names
pub fn assert_ranking_sorted(path: &Path) {
    let ranking = read_ranking(path);
    assert!(
        ranking.windows(2).all(|w| w[0].1 >= w[1].1),
        "ranking is not sorted: {ranking:?}"
    );
    let mut names: Vec<&str> = ranking.iter().map(|(n, _)| n.as_str()).collect();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), ranking.len(), "duplicate names in ranking");
}
