//! TSDB cardinality client for Rust.
//!
//! Fetches cardinality statistics for a day, the day before, and (when a
//! filter is active) the unfiltered totals, then reconciles them into one
//! snapshot annotated with day-over-day deltas.
//!
//! # Quick start
//!
//! ```no_run
//! use tsdb_cardinality::{CardinalityClient, RequestParams};
//!
//! # async fn example() -> tsdb_cardinality::Result<()> {
//! let client = CardinalityClient::builder()
//!     .server_url("http://localhost:8428")
//!     .build()?;
//!
//! // One-shot merged snapshot
//! let params = RequestParams::new(client.today());
//! let status = client.snapshot(params).await?;
//! println!("{} series", status.total_series);
//!
//! // Long-lived session that refetches when its inputs change
//! let mut session = client.session();
//! let view = session
//!     .sync_query(client.server_url(), [("match", "{job=\"node\"}"), ("topN", "5")])
//!     .await?;
//! assert!(!view.is_loading);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod decoder;
pub mod diff;
pub mod error;
pub mod merge;
pub mod metric_names;
pub mod models;
pub mod orchestrator;
pub mod params;
pub mod session;
pub mod tenant;
pub mod url_builder;

pub use decoder::{Fetch, HttpFetcher, RawResponse};
pub use error::{CardinalityError, Result};
pub use models::{MetricNameStats, TopHeapEntry, TsdbStatus};
pub use orchestrator::{CardinalityFetcher, FetchInputs, FetchState};
pub use params::{RequestParams, RequestSet};
pub use session::{CardinalitySession, CardinalityView, Configurator};
pub use url_builder::UrlBuilder;

use std::fmt;
use std::time::Duration;

use chrono::{FixedOffset, NaiveDate, Offset, Utc};

// ---------------------------------------------------------------------------
// CardinalityClientBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`CardinalityClient`].
///
/// Use [`CardinalityClient::builder()`] to obtain a builder, chain
/// configuration methods, and call [`build()`](CardinalityClientBuilder::build).
pub struct CardinalityClientBuilder {
    server_url: Option<String>,
    timeout: Duration,
    utc_offset: FixedOffset,
}

impl Default for CardinalityClientBuilder {
    fn default() -> Self {
        Self {
            server_url: None,
            timeout: config::DEFAULT_TIMEOUT,
            utc_offset: Utc.fix(),
        }
    }
}

impl CardinalityClientBuilder {
    /// Base URL of the server, e.g. `http://localhost:8428` or a cluster
    /// select URL such as `http://vmselect:8481/select/0/prometheus`.
    pub fn server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = Some(url.into());
        self
    }

    /// Set the HTTP request timeout. Defaults to 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Time zone of the viewer, used to pick "today" when no date is
    /// requested. Defaults to UTC.
    pub fn utc_offset(mut self, offset: FixedOffset) -> Self {
        self.utc_offset = offset;
        self
    }

    /// Build the client. Fails if no server URL was set or the URL is
    /// malformed.
    pub fn build(self) -> Result<CardinalityClient> {
        let server_url = self
            .server_url
            .filter(|s| !s.is_empty())
            .ok_or_else(|| CardinalityError::InvalidArgument("server_url is required".into()))?;
        url::Url::parse(&server_url)?;
        let fetcher = HttpFetcher::new(self.timeout)?;
        Ok(CardinalityClient {
            server_url,
            utc_offset: self.utc_offset,
            fetcher,
        })
    }
}

// ---------------------------------------------------------------------------
// CardinalityClient
// ---------------------------------------------------------------------------

/// Entry point bound to one server.
///
/// Cheap to clone: the underlying HTTP client is shared.
#[derive(Debug, Clone)]
pub struct CardinalityClient {
    server_url: String,
    utc_offset: FixedOffset,
    fetcher: HttpFetcher,
}

impl CardinalityClient {
    pub fn builder() -> CardinalityClientBuilder {
        CardinalityClientBuilder::default()
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// Today's date in the configured time zone.
    pub fn today(&self) -> NaiveDate {
        params::today_in(self.utc_offset)
    }

    /// True when the server URL addresses a multi-tenant cluster.
    pub fn is_cluster(&self) -> bool {
        tenant::is_cluster(&self.server_url)
    }

    /// Start a session sharing this client's HTTP connection pool.
    pub fn session(&self) -> CardinalitySession<HttpFetcher> {
        CardinalitySession::new(self.fetcher.clone(), self.utc_offset)
    }

    /// Run a single cycle for `params` and return the merged snapshot.
    ///
    /// The totals baseline is fetched whenever a filter is active, since a
    /// one-shot call has no previous cycle to borrow it from.
    pub async fn snapshot(&self, params: RequestParams) -> Result<TsdbStatus> {
        let requests = params.plan(None);
        let urls = requests.urls(&self.server_url)?;
        let inputs = orchestrator::fetch_batch(&self.fetcher, &urls).await?;
        Ok(merge::merge_snapshots(
            inputs,
            &mut merge::TotalsCache::new(),
            0,
            params.match_expr.as_deref(),
        ))
    }

    /// Fetch the metric-name usage statistics.
    pub async fn metric_names_stats(&self) -> Result<MetricNameStats> {
        let url = metric_names::metric_names_stats_url(&self.server_url)?;
        decoder::get_response(&self.fetcher, &url).await
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for CardinalityClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CardinalityClient(server_url={}, utc_offset={}, cluster={})",
            self.server_url,
            self.utc_offset,
            self.is_cluster()
        )
    }
}
