//! A cardinality dashboard session: both fetchers plus the cluster flag,
//! combined into one published view.

use chrono::FixedOffset;
use serde::Serialize;

use crate::decoder::Fetch;
use crate::error::Result;
use crate::metric_names::MetricNameStatsFetcher;
use crate::models::{MetricNameStats, TsdbStatus};
use crate::orchestrator::{CardinalityFetcher, FetchInputs};
use crate::params::{today_in, RequestParams};
use crate::tenant;

// ---------------------------------------------------------------------------
// Published view
// ---------------------------------------------------------------------------

/// Holder of the merged statistics shown by the dashboard.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Configurator {
    pub tsdb_status: TsdbStatus,
    pub metric_name_stats: MetricNameStats,
}

impl Configurator {
    /// Share of all series matched by the current filter, in percent.
    ///
    /// `None` when the unfiltered baseline is unknown.
    pub fn share_of_all_series(&self) -> Option<f64> {
        let status = &self.tsdb_status;
        (status.total_series_by_all != 0)
            .then(|| status.total_series as f64 * 100.0 / status.total_series_by_all as f64)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardinalityView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetch_url: Option<Vec<String>>,
    pub is_loading: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub configurator: Configurator,
    pub is_cluster: bool,
}

// ---------------------------------------------------------------------------
// CardinalitySession
// ---------------------------------------------------------------------------

/// Owns the transport and both fetchers for one viewer.
pub struct CardinalitySession<F> {
    fetcher: F,
    utc_offset: FixedOffset,
    cardinality: CardinalityFetcher,
    metric_names: MetricNameStatsFetcher,
    is_cluster: bool,
}

impl<F: Fetch> CardinalitySession<F> {
    pub fn new(fetcher: F, utc_offset: FixedOffset) -> Self {
        Self {
            fetcher,
            utc_offset,
            cardinality: CardinalityFetcher::new(),
            metric_names: MetricNameStatsFetcher::new(),
            is_cluster: false,
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn cardinality(&self) -> &CardinalityFetcher {
        &self.cardinality
    }

    pub fn metric_names(&self) -> &MetricNameStatsFetcher {
        &self.metric_names
    }

    /// Bring both fetchers up to date with the given inputs and return the
    /// resulting view.
    ///
    /// The cardinality cycle and the metric-name stats fetch run
    /// concurrently; each only does work if its own inputs changed.
    pub async fn sync(&mut self, server_url: &str, params: RequestParams) -> CardinalityView {
        self.is_cluster = tenant::is_cluster(server_url);

        let Self {
            fetcher,
            cardinality,
            metric_names,
            ..
        } = self;
        let fetcher: &F = fetcher;
        let inputs = FetchInputs::new(server_url, params);
        tokio::join!(
            cardinality.update(fetcher, inputs),
            metric_names.update(fetcher, server_url),
        );

        self.view()
    }

    /// Like [`sync`](Self::sync), parsing the params from query-string
    /// pairs. A missing date means today in the session's time zone.
    pub async fn sync_query<I, K, V>(&mut self, server_url: &str, query: I) -> Result<CardinalityView>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let params = RequestParams::from_query(query, today_in(self.utc_offset))?;
        Ok(self.sync(server_url, params).await)
    }

    /// Snapshot of the current published state.
    pub fn view(&self) -> CardinalityView {
        let state = self.cardinality.state();
        CardinalityView {
            fetch_url: state.fetch_url.clone(),
            is_loading: state.is_loading,
            error: state.error.clone(),
            configurator: Configurator {
                tsdb_status: state.tsdb_status.clone(),
                metric_name_stats: self.metric_names.stats().clone(),
            },
            is_cluster: self.is_cluster,
        }
    }
}
