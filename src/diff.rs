//! Day-over-day deltas for the named-entry lists of a snapshot.

use std::collections::HashMap;

use crate::models::{RawTsdbStatus, StatList, TopHeapEntry, TsdbStatus};

/// Annotate `current` entries with their delta against `previous`.
///
/// Each entry is matched by name against the first previous entry of the
/// same name. Entries that were not seen before, or whose previous value is
/// zero, get `diff = 0` and `diff_percent = 0`.
pub fn annotate_entries(current: &[TopHeapEntry], previous: &[TopHeapEntry]) -> Vec<TopHeapEntry> {
    let mut prev_values: HashMap<&str, u64> = HashMap::with_capacity(previous.len());
    for entry in previous {
        prev_values.entry(entry.name.as_str()).or_insert(entry.value);
    }

    current
        .iter()
        .map(|entry| {
            let value_prev = prev_values.get(entry.name.as_str()).copied().unwrap_or(0);
            let (diff, diff_percent) = if value_prev == 0 {
                (0, 0.0)
            } else {
                let diff = entry.value as i64 - value_prev as i64;
                (diff, diff as f64 / value_prev as f64 * 100.0)
            };
            TopHeapEntry {
                name: entry.name.clone(),
                value: entry.value,
                diff,
                diff_percent,
                value_prev,
            }
        })
        .collect()
}

/// Diff every list of `current` against the same list of `previous`.
///
/// Lists the previous snapshot does not carry are left untouched. Scalar
/// counts are never diffed here; `total_series_prev` is filled in by the
/// merger instead.
pub fn compute_diffs(mut current: TsdbStatus, previous: &RawTsdbStatus) -> TsdbStatus {
    for kind in StatList::ALL {
        if let Some(prev) = previous.list(kind) {
            let annotated = annotate_entries(current.list(kind), prev);
            *current.list_mut(kind) = annotated;
        }
    }
    current
}
