//! Metric-name usage statistics, fetched independently of the cardinality
//! cycle.
//!
//! Refetched only when the server URL changes. Failures are logged and reset
//! the stats to their default; they never reach the shared error state.

use url::Url;

use crate::config;
use crate::decoder::{get_response, Fetch};
use crate::error::Result;
use crate::models::MetricNameStats;
use crate::url_builder::UrlBuilder;

/// Build the metric-name stats URL for `server`.
pub fn metric_names_stats_url(server: &str) -> Result<Url> {
    UrlBuilder::new(server, config::METRIC_NAMES_STATS_PATH)
        .param("limit", &config::METRIC_NAMES_STATS_LIMIT.to_string())
        .build()
}

#[derive(Debug, Clone)]
pub struct MetricStatsPlan {
    pub generation: u64,
    pub url: Url,
}

#[derive(Debug)]
pub struct MetricStatsOutcome {
    pub generation: u64,
    result: Result<MetricNameStats>,
}

/// Owns the metric-name stats and their fetch lifecycle.
#[derive(Debug, Default)]
pub struct MetricNameStatsFetcher {
    generation: u64,
    last_server: Option<String>,
    stats: MetricNameStats,
    is_loading: bool,
}

impl MetricNameStatsFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> &MetricNameStats {
        &self.stats
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Start a fetch if the server URL changed.
    pub fn begin(&mut self, server_url: &str) -> Option<MetricStatsPlan> {
        if server_url.is_empty() || self.last_server.as_deref() == Some(server_url) {
            return None;
        }
        self.last_server = Some(server_url.to_string());
        self.generation += 1;

        match metric_names_stats_url(server_url) {
            Ok(url) => {
                self.is_loading = true;
                Some(MetricStatsPlan {
                    generation: self.generation,
                    url,
                })
            }
            Err(e) => {
                tracing::warn!(error = %e, "cannot build metric names stats url");
                self.stats = MetricNameStats::default();
                None
            }
        }
    }

    pub async fn execute<F>(fetcher: &F, plan: MetricStatsPlan) -> MetricStatsOutcome
    where
        F: Fetch + ?Sized,
    {
        MetricStatsOutcome {
            generation: plan.generation,
            result: get_response(fetcher, &plan.url).await,
        }
    }

    /// Apply an outcome. Returns `false` if it was stale and dropped.
    pub fn complete(&mut self, outcome: MetricStatsOutcome) -> bool {
        if outcome.generation != self.generation {
            return false;
        }
        self.is_loading = false;
        match outcome.result {
            Ok(stats) => self.stats = stats,
            Err(e) => {
                tracing::warn!(error = %e.surface(), "failed to fetch metric names stats");
                self.stats = MetricNameStats::default();
            }
        }
        true
    }

    pub async fn update<F>(&mut self, fetcher: &F, server_url: &str) -> bool
    where
        F: Fetch + ?Sized,
    {
        match self.begin(server_url) {
            Some(plan) => {
                let outcome = Self::execute(fetcher, plan).await;
                self.complete(outcome)
            }
            None => false,
        }
    }
}
