use std::time::Duration;

pub const TSDB_STATUS_PATH: &str = "/api/v1/status/tsdb";
pub const METRIC_NAMES_STATS_PATH: &str = "/api/v1/status/metric_names_stats";

/// Number of top entries requested when the caller does not set `topN`.
pub const DEFAULT_TOP_N: u32 = 10;

/// Record limit for the metric-name usage statistics request.
pub const METRIC_NAMES_STATS_LIMIT: u32 = 1;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

// Fallbacks used when an error body lacks the corresponding fields.
pub const UNKNOWN_ERROR_TYPE: &str = "Unknown type";
pub const UNKNOWN_ERROR_MESSAGE: &str = "see console for more details";

/// Characters stripped from a `match` selector before it is compared with
/// label/value pair names.
pub const MATCH_STRIP_CHARS: &[char] = &['{', '}', '"'];
