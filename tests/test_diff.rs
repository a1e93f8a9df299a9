//! Day-over-day delta computation.

use tsdb_cardinality::diff::{annotate_entries, compute_diffs};
use tsdb_cardinality::models::{RawTsdbStatus, StatList};
use tsdb_cardinality::{TopHeapEntry, TsdbStatus};

fn entries(pairs: &[(&str, u64)]) -> Vec<TopHeapEntry> {
    pairs.iter().map(|(n, v)| TopHeapEntry::new(*n, *v)).collect()
}

// ---------------------------------------------------------------------------
// annotate_entries
// ---------------------------------------------------------------------------

#[test]
fn growth_yields_diff_and_percent() {
    let out = annotate_entries(&entries(&[("a", 120)]), &entries(&[("a", 100)]));
    assert_eq!(out[0].diff, 20);
    assert_eq!(out[0].diff_percent, 20.0);
    assert_eq!(out[0].value_prev, 100);
    assert_eq!(out[0].value, 120);
}

#[test]
fn shrink_yields_negative_diff() {
    let out = annotate_entries(&entries(&[("a", 50)]), &entries(&[("a", 200)]));
    assert_eq!(out[0].diff, -150);
    assert_eq!(out[0].diff_percent, -75.0);
}

#[test]
fn non_terminating_ratio_divides_before_scaling() {
    let out = annotate_entries(&entries(&[("a", 4)]), &entries(&[("a", 3)]));
    assert_eq!(out[0].diff, 1);
    assert_eq!(out[0].diff_percent, 1.0 / 3.0 * 100.0);
    assert_eq!(out[0].diff_percent, 33.33333333333333);
}

#[test]
fn zero_previous_value_is_guarded() {
    let out = annotate_entries(&entries(&[("a", 5)]), &entries(&[("a", 0)]));
    assert_eq!(out[0].diff, 0);
    assert_eq!(out[0].diff_percent, 0.0);
    assert_eq!(out[0].value_prev, 0);
}

#[test]
fn unseen_entry_gets_zero_delta() {
    let out = annotate_entries(&entries(&[("new", 7)]), &entries(&[("old", 3)]));
    assert_eq!(out[0].diff, 0);
    assert_eq!(out[0].diff_percent, 0.0);
    assert_eq!(out[0].value_prev, 0);
}

#[test]
fn first_previous_match_wins() {
    let out = annotate_entries(&entries(&[("a", 30)]), &entries(&[("a", 10), ("a", 20)]));
    assert_eq!(out[0].value_prev, 10);
    assert_eq!(out[0].diff, 20);
}

#[test]
fn order_is_preserved() {
    let out = annotate_entries(
        &entries(&[("z", 1), ("a", 2), ("m", 3)]),
        &entries(&[("a", 1)]),
    );
    let names: Vec<&str> = out.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["z", "a", "m"]);
}

#[test]
fn input_is_not_mutated() {
    let current = entries(&[("a", 120)]);
    let _ = annotate_entries(&current, &entries(&[("a", 100)]));
    assert_eq!(current[0].diff, 0);
    assert_eq!(current[0].value_prev, 0);
}

// ---------------------------------------------------------------------------
// compute_diffs
// ---------------------------------------------------------------------------

#[test]
fn compute_diffs_covers_every_list_present_in_previous() {
    let mut current = TsdbStatus::default();
    for kind in StatList::ALL {
        *current.list_mut(kind) = entries(&[("a", 120)]);
    }
    let previous = RawTsdbStatus {
        series_count_by_metric_name: Some(entries(&[("a", 100)])),
        series_count_by_label_value_pair: Some(entries(&[("a", 60)])),
        ..Default::default()
    };

    let out = compute_diffs(current, &previous);
    assert_eq!(out.series_count_by_metric_name[0].diff, 20);
    assert_eq!(out.series_count_by_label_value_pair[0].diff, 60);
    assert_eq!(out.series_count_by_label_value_pair[0].diff_percent, 100.0);
    // Lists missing from the previous snapshot are left as they were.
    assert_eq!(out.series_count_by_label_name[0].diff, 0);
    assert_eq!(out.label_value_count_by_label_name[0].value_prev, 0);
}

#[test]
fn compute_diffs_leaves_scalars_alone() {
    let current = TsdbStatus {
        total_series: 500,
        total_label_value_pairs: 900,
        ..Default::default()
    };
    let previous = RawTsdbStatus {
        total_series: Some(100),
        ..Default::default()
    };
    let out = compute_diffs(current.clone(), &previous);
    assert_eq!(out, current);
}
