//! Request parameter parsing, request-set planning and URL construction.

mod common;

use common::{date, filtered, params, SERVER};
use tsdb_cardinality::{CardinalityError, RequestParams, UrlBuilder};

// ---------------------------------------------------------------------------
// from_query
// ---------------------------------------------------------------------------

#[test]
fn from_query_applies_defaults() {
    let p = RequestParams::from_query(Vec::<(&str, &str)>::new(), date("2024-03-10")).unwrap();
    assert_eq!(p.top_n, 10);
    assert_eq!(p.date, date("2024-03-10"));
    assert!(p.match_expr.is_none());
    assert!(p.focus_label.is_none());
}

#[test]
fn from_query_reads_all_keys() {
    let p = RequestParams::from_query(
        [
            ("match", "{job=\"node\"}"),
            ("focusLabel", "instance"),
            ("topN", "25"),
            ("date", "2024-01-02"),
            ("unrelated", "x"),
        ],
        date("2024-03-10"),
    )
    .unwrap();
    assert_eq!(p.top_n, 25);
    assert_eq!(p.date, date("2024-01-02"));
    assert_eq!(p.match_expr.as_deref(), Some("{job=\"node\"}"));
    assert_eq!(p.focus_label.as_deref(), Some("instance"));
}

#[test]
fn from_query_treats_empty_values_as_absent() {
    let p = RequestParams::from_query(
        [("match", ""), ("topN", ""), ("date", "")],
        date("2024-03-10"),
    )
    .unwrap();
    assert_eq!(p.top_n, 10);
    assert_eq!(p.date, date("2024-03-10"));
    assert!(p.match_expr.is_none());
}

#[test]
fn from_query_rejects_bad_top_n() {
    let err = RequestParams::from_query([("topN", "ten")], date("2024-03-10")).unwrap_err();
    assert!(matches!(err, CardinalityError::InvalidArgument(_)));
}

#[test]
fn from_query_rejects_bad_date() {
    let err = RequestParams::from_query([("date", "03/10/2024")], date("2024-03-10")).unwrap_err();
    assert!(matches!(err, CardinalityError::InvalidArgument(_)));
}

// ---------------------------------------------------------------------------
// Derived params
// ---------------------------------------------------------------------------

#[test]
fn previous_day_crosses_month_and_year() {
    assert_eq!(params("2024-03-01").previous_day().date, date("2024-02-29"));
    assert_eq!(params("2024-01-01").previous_day().date, date("2023-12-31"));
}

#[test]
fn previous_day_keeps_filters() {
    let p = filtered("2024-01-02", "{job=\"x\"}");
    let prev = p.previous_day();
    assert_eq!(prev.match_expr, p.match_expr);
    assert_eq!(prev.top_n, p.top_n);
}

#[test]
fn totals_drop_filters_and_top_n() {
    let mut p = filtered("2024-01-02", "{job=\"x\"}");
    p.focus_label = Some("instance".into());
    let totals = p.totals();
    assert_eq!(totals.top_n, 0);
    assert!(totals.match_expr.is_none());
    assert!(totals.focus_label.is_none());
    assert_eq!(totals.date, p.date);
}

// ---------------------------------------------------------------------------
// plan — totals gating
// ---------------------------------------------------------------------------

#[test]
fn plan_without_filter_has_two_requests() {
    let set = params("2024-01-02").plan(Some(date("2024-01-01")));
    assert!(set.totals.is_none());
    assert_eq!(set.iter().count(), 2);
    assert_eq!(set.previous_day.date, date("2024-01-01"));
}

#[test]
fn plan_with_filter_and_new_date_requests_totals() {
    let set = filtered("2024-01-02", "{job=\"x\"}").plan(Some(date("2024-01-01")));
    assert_eq!(set.totals, Some(filtered("2024-01-02", "{job=\"x\"}").totals()));
    assert_eq!(set.iter().count(), 3);
}

#[test]
fn plan_with_filter_and_same_date_skips_totals() {
    let set = filtered("2024-01-02", "{job=\"x\"}").plan(Some(date("2024-01-02")));
    assert!(set.totals.is_none());
}

#[test]
fn plan_on_first_cycle_with_focus_label_requests_totals() {
    let mut p = params("2024-01-02");
    p.focus_label = Some("instance".into());
    assert!(p.plan(None).totals.is_some());
}

#[test]
fn plan_ignores_empty_filter_strings() {
    let mut p = params("2024-01-02");
    p.match_expr = Some(String::new());
    p.focus_label = Some(String::new());
    assert!(p.plan(None).totals.is_none());
}

// ---------------------------------------------------------------------------
// URLs
// ---------------------------------------------------------------------------

#[test]
fn to_url_encodes_selector() {
    let mut p = filtered("2024-01-02", "{job=\"x\"}");
    p.focus_label = Some("instance".into());
    let url = p.to_url(SERVER).unwrap();
    assert_eq!(url.path(), "/api/v1/status/tsdb");
    let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    assert_eq!(
        pairs,
        vec![
            ("topN".to_string(), "10".to_string()),
            ("date".to_string(), "2024-01-02".to_string()),
            ("match[]".to_string(), "{job=\"x\"}".to_string()),
            ("focusLabel".to_string(), "instance".to_string()),
        ]
    );
}

#[test]
fn to_url_omits_unset_filters() {
    let url = params("2024-01-02").totals().to_url(SERVER).unwrap();
    assert_eq!(url.query(), Some("topN=0&date=2024-01-02"));
}

#[test]
fn url_builder_keeps_server_path_prefix() {
    let url = UrlBuilder::new("http://vmselect:8481/select/0/prometheus/", "/api/v1/status/tsdb")
        .param("topN", "5")
        .build()
        .unwrap();
    assert_eq!(
        url.as_str(),
        "http://vmselect:8481/select/0/prometheus/api/v1/status/tsdb?topN=5"
    );
}

#[test]
fn url_builder_rejects_malformed_server() {
    let err = UrlBuilder::new("not a url", "/x").build().unwrap_err();
    assert!(matches!(err, CardinalityError::Url(_)));
}
