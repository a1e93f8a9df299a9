use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// TopHeapEntry — Named entry inside a statistics list
// ---------------------------------------------------------------------------

/// A `{name, value}` pair from one of the top-N lists, annotated with the
/// day-over-day delta once diffed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TopHeapEntry {
    pub name: String,
    pub value: u64,
    #[serde(default)]
    pub diff: i64,
    #[serde(default)]
    pub diff_percent: f64,
    #[serde(default)]
    pub value_prev: u64,
}

impl TopHeapEntry {
    pub fn new(name: impl Into<String>, value: u64) -> Self {
        Self {
            name: name.into(),
            value,
            ..Default::default()
        }
    }
}

// ---------------------------------------------------------------------------
// StatList — The named-entry lists carried by a snapshot
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatList {
    SeriesCountByMetricName,
    SeriesCountByLabelName,
    SeriesCountByFocusLabelValue,
    SeriesCountByLabelValuePair,
    LabelValueCountByLabelName,
}

impl StatList {
    pub const ALL: [StatList; 5] = [
        StatList::SeriesCountByMetricName,
        StatList::SeriesCountByLabelName,
        StatList::SeriesCountByFocusLabelValue,
        StatList::SeriesCountByLabelValuePair,
        StatList::LabelValueCountByLabelName,
    ];

    /// Wire name of the list field.
    pub fn field_name(self) -> &'static str {
        match self {
            StatList::SeriesCountByMetricName => "seriesCountByMetricName",
            StatList::SeriesCountByLabelName => "seriesCountByLabelName",
            StatList::SeriesCountByFocusLabelValue => "seriesCountByFocusLabelValue",
            StatList::SeriesCountByLabelValuePair => "seriesCountByLabelValuePair",
            StatList::LabelValueCountByLabelName => "labelValueCountByLabelName",
        }
    }
}

// ---------------------------------------------------------------------------
// HeadStats — Legacy scalar block reported by older servers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct HeadStats {
    pub num_series: Option<u64>,
    pub num_label_value_pairs: Option<u64>,
}

// ---------------------------------------------------------------------------
// RawTsdbStatus — Snapshot exactly as decoded from the server
// ---------------------------------------------------------------------------

/// One cardinality snapshot as returned by the server.
///
/// Every field is optional: which ones are present depends on the server
/// version and on the request (`topN=0` totals requests carry no lists).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct RawTsdbStatus {
    pub total_series: Option<u64>,
    pub total_label_value_pairs: Option<u64>,
    pub head_stats: Option<HeadStats>,
    pub series_count_by_metric_name: Option<Vec<TopHeapEntry>>,
    pub series_count_by_label_name: Option<Vec<TopHeapEntry>>,
    pub series_count_by_focus_label_value: Option<Vec<TopHeapEntry>>,
    pub series_count_by_label_value_pair: Option<Vec<TopHeapEntry>>,
    pub label_value_count_by_label_name: Option<Vec<TopHeapEntry>>,
}

fn non_zero(v: Option<u64>) -> Option<u64> {
    v.filter(|n| *n != 0)
}

impl RawTsdbStatus {
    /// Total series count, falling back to `headStats.numSeries` when the
    /// modern field is missing or zero.
    pub fn total_series(&self) -> Option<u64> {
        non_zero(self.total_series).or_else(|| {
            self.head_stats
                .as_ref()
                .and_then(|h| non_zero(h.num_series))
        })
    }

    /// Total label/value pair count with the same legacy fallback.
    pub fn total_label_value_pairs(&self) -> Option<u64> {
        non_zero(self.total_label_value_pairs).or_else(|| {
            self.head_stats
                .as_ref()
                .and_then(|h| non_zero(h.num_label_value_pairs))
        })
    }

    pub fn list(&self, kind: StatList) -> Option<&[TopHeapEntry]> {
        let list = match kind {
            StatList::SeriesCountByMetricName => &self.series_count_by_metric_name,
            StatList::SeriesCountByLabelName => &self.series_count_by_label_name,
            StatList::SeriesCountByFocusLabelValue => &self.series_count_by_focus_label_value,
            StatList::SeriesCountByLabelValuePair => &self.series_count_by_label_value_pair,
            StatList::LabelValueCountByLabelName => &self.label_value_count_by_label_name,
        };
        list.as_deref()
    }
}

/// `{ "data": ... }` envelope of the cardinality endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StatusEnvelope {
    pub data: RawTsdbStatus,
}

// ---------------------------------------------------------------------------
// TsdbStatus — Normalized, merged snapshot
// ---------------------------------------------------------------------------

/// The reconciled snapshot published to callers.
///
/// `Default` is the well-known empty value shown while loading and after
/// an error: all counts zero, all lists empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TsdbStatus {
    pub total_series: u64,
    pub total_series_prev: u64,
    pub total_series_by_all: u64,
    pub total_label_value_pairs: u64,
    pub series_count_by_metric_name: Vec<TopHeapEntry>,
    pub series_count_by_label_name: Vec<TopHeapEntry>,
    pub series_count_by_focus_label_value: Vec<TopHeapEntry>,
    pub series_count_by_label_value_pair: Vec<TopHeapEntry>,
    pub label_value_count_by_label_name: Vec<TopHeapEntry>,
}

impl TsdbStatus {
    pub fn list(&self, kind: StatList) -> &[TopHeapEntry] {
        match kind {
            StatList::SeriesCountByMetricName => &self.series_count_by_metric_name,
            StatList::SeriesCountByLabelName => &self.series_count_by_label_name,
            StatList::SeriesCountByFocusLabelValue => &self.series_count_by_focus_label_value,
            StatList::SeriesCountByLabelValuePair => &self.series_count_by_label_value_pair,
            StatList::LabelValueCountByLabelName => &self.label_value_count_by_label_name,
        }
    }

    pub fn list_mut(&mut self, kind: StatList) -> &mut Vec<TopHeapEntry> {
        match kind {
            StatList::SeriesCountByMetricName => &mut self.series_count_by_metric_name,
            StatList::SeriesCountByLabelName => &mut self.series_count_by_label_name,
            StatList::SeriesCountByFocusLabelValue => &mut self.series_count_by_focus_label_value,
            StatList::SeriesCountByLabelValuePair => &mut self.series_count_by_label_value_pair,
            StatList::LabelValueCountByLabelName => &mut self.label_value_count_by_label_name,
        }
    }

    /// True when the snapshot equals the empty default.
    pub fn is_default(&self) -> bool {
        *self == TsdbStatus::default()
    }
}
