//! Shared test fixtures for the cardinality client integration tests.
//!
//! Provides `FakeFetcher`, an in-memory `Fetch` implementation that serves
//! canned JSON responses by URL and records every requested URL, plus small
//! builders for status bodies.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::{json, Value};
use tsdb_cardinality::{Fetch, RawResponse, RequestParams, Result};
use url::Url;

pub const SERVER: &str = "http://vm.test:8428";

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn params(day: &str) -> RequestParams {
    RequestParams::new(date(day))
}

pub fn filtered(day: &str, match_expr: &str) -> RequestParams {
    RequestParams {
        match_expr: Some(match_expr.to_string()),
        ..params(day)
    }
}

pub fn url_for(p: &RequestParams) -> String {
    p.to_url(SERVER).unwrap().to_string()
}

/// `{"data": {...}}` body with a total series count and the same entries
/// in the metric-name and label/value pair lists.
pub fn status_body(total_series: u64, pairs: &[(&str, u64)]) -> Value {
    let entries: Vec<Value> = pairs
        .iter()
        .map(|(name, value)| json!({"name": name, "value": value}))
        .collect();
    json!({
        "status": "success",
        "data": {
            "totalSeries": total_series,
            "totalLabelValuePairs": total_series * 3,
            "seriesCountByMetricName": entries.clone(),
            "seriesCountByLabelName": [],
            "seriesCountByFocusLabelValue": [],
            "seriesCountByLabelValuePair": entries,
            "labelValueCountByLabelName": []
        }
    })
}

#[derive(Default)]
pub struct FakeFetcher {
    routes: Mutex<HashMap<String, RawResponse>>,
    requests: Mutex<Vec<String>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(&self, url: impl Into<String>, status: u16, body: Value) {
        self.routes
            .lock()
            .unwrap()
            .insert(url.into(), RawResponse::new(status, body));
    }

    /// Serve `body` with status 200 for the cardinality request `p`.
    pub fn ok(&self, p: &RequestParams, body: Value) {
        self.route(url_for(p), 200, body);
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn clear_requests(&self) {
        self.requests.lock().unwrap().clear();
    }
}

#[async_trait]
impl Fetch for FakeFetcher {
    async fn fetch(&self, url: &Url) -> Result<RawResponse> {
        self.requests.lock().unwrap().push(url.to_string());
        let routed = self.routes.lock().unwrap().get(url.as_str()).cloned();
        Ok(routed.unwrap_or_else(|| {
            RawResponse::new(
                404,
                json!({"errorType": "not_found", "error": format!("no route for {}", url)}),
            )
        }))
    }
}
