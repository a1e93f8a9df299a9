//! Reconciliation of the current, previous-day and totals snapshots.

use crate::config;
use crate::diff::compute_diffs;
use crate::models::{RawTsdbStatus, TsdbStatus};

// ---------------------------------------------------------------------------
// TotalsCache
// ---------------------------------------------------------------------------

/// Single slot retaining the unfiltered totals used by the last merge.
///
/// Totals are only requested when the date changes under an active filter;
/// every other cycle reuses this slot.
#[derive(Debug, Clone, Default)]
pub struct TotalsCache {
    slot: Option<RawTsdbStatus>,
}

impl TotalsCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<&RawTsdbStatus> {
        self.slot.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.slot.is_none()
    }

    pub fn clear(&mut self) {
        self.slot = None;
    }

    /// Pick the effective totals (`fetched`, else the cached slot, else
    /// `current`) and retain them for the next cycle.
    pub fn resolve(
        &mut self,
        fetched: Option<RawTsdbStatus>,
        current: &RawTsdbStatus,
    ) -> &RawTsdbStatus {
        let effective = match (fetched, self.slot.take()) {
            (Some(totals), _) => totals,
            (None, Some(cached)) => cached,
            (None, None) => current.clone(),
        };
        self.slot.insert(effective)
    }
}

// ---------------------------------------------------------------------------
// Merge
// ---------------------------------------------------------------------------

/// Decoded snapshots of one fetch cycle.
#[derive(Debug, Clone, Default)]
pub struct MergeInputs {
    pub current: RawTsdbStatus,
    pub previous_day: RawTsdbStatus,
    pub totals: Option<RawTsdbStatus>,
}

/// Strip `{`, `}` and `"` from a series selector, e.g. `{job="x"}` becomes
/// `job=x`, the form label/value pair names take.
pub fn sanitize_match(match_expr: &str) -> String {
    match_expr.replace(config::MATCH_STRIP_CHARS, "")
}

/// Merge one cycle's snapshots into the published snapshot.
///
/// `last_total_series_by_all` is the value from the last published
/// snapshot; it keeps the "all series" baseline from dropping to zero when
/// no totals are available at all.
pub fn merge_snapshots(
    inputs: MergeInputs,
    cache: &mut TotalsCache,
    last_total_series_by_all: u64,
    match_expr: Option<&str>,
) -> TsdbStatus {
    let MergeInputs {
        current,
        previous_day,
        totals,
    } = inputs;

    if totals.is_none() {
        tracing::debug!(cached = !cache.is_empty(), "totals not fetched this cycle");
    }
    let total_series_by_all = cache
        .resolve(totals, &current)
        .total_series()
        .unwrap_or(last_total_series_by_all);

    let mut merged = TsdbStatus {
        total_series: current.total_series().unwrap_or(0),
        total_label_value_pairs: current.total_label_value_pairs().unwrap_or(0),
        total_series_by_all,
        total_series_prev: previous_day.total_series().unwrap_or(0),
        series_count_by_metric_name: current.series_count_by_metric_name.unwrap_or_default(),
        series_count_by_label_name: current.series_count_by_label_name.unwrap_or_default(),
        series_count_by_focus_label_value: current
            .series_count_by_focus_label_value
            .unwrap_or_default(),
        series_count_by_label_value_pair: current
            .series_count_by_label_value_pair
            .unwrap_or_default(),
        label_value_count_by_label_name: current
            .label_value_count_by_label_name
            .unwrap_or_default(),
    };

    if let Some(name) = match_expr.map(sanitize_match) {
        merged
            .series_count_by_label_value_pair
            .retain(|entry| entry.name != name);
    }

    compute_diffs(merged, &previous_day)
}
