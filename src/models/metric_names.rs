use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// MetricNameStatsRecord — Usage counters for a single metric name
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct MetricNameStatsRecord {
    pub metric_name: String,
    pub query_requests_count: u64,
    pub last_request_timestamp: u64,
}

// ---------------------------------------------------------------------------
// MetricNameStats — Body of the metric-name usage statistics endpoint
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct MetricNameStats {
    pub stats_collected_since: u64,
    pub stats_collected_records_total: u64,
    pub tracker_memory_max_size_bytes: u64,
    pub tracker_current_memory_usage_bytes: u64,
    pub records: Vec<MetricNameStatsRecord>,
}

impl MetricNameStats {
    /// True when the server has not collected any metric-name usage yet.
    pub fn is_empty(&self) -> bool {
        self.stats_collected_records_total == 0 && self.records.is_empty()
    }
}
