//! Fetch lifecycle for the cardinality view.
//!
//! A cycle runs in three steps so that overlapping cycles never need a lock:
//!
//! 1. [`CardinalityFetcher::begin`] detects an input change, bumps the
//!    generation, resets the published state and plans the URLs.
//! 2. [`CardinalityFetcher::execute`] issues the requests concurrently. It
//!    borrows nothing from the fetcher, so several may be in flight.
//! 3. [`CardinalityFetcher::complete`] applies the outcome only if its
//!    generation is still the latest; stale outcomes are dropped without
//!    touching the state or the totals cache.
//!
//! [`CardinalityFetcher::update`] chains the three for the common case.

use chrono::NaiveDate;
use futures::future::try_join_all;
use url::Url;

use crate::decoder::{get_response, Fetch};
use crate::error::{CardinalityError, Result};
use crate::merge::{merge_snapshots, MergeInputs, TotalsCache};
use crate::models::{StatusEnvelope, TsdbStatus};
use crate::params::{RequestParams, RequestSet};

// ---------------------------------------------------------------------------
// Inputs and published state
// ---------------------------------------------------------------------------

/// Watched inputs; any change starts a new cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchInputs {
    pub server_url: String,
    pub params: RequestParams,
}

impl FetchInputs {
    pub fn new(server_url: impl Into<String>, params: RequestParams) -> Self {
        Self {
            server_url: server_url.into(),
            params,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPhase {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// State observed by the caller.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FetchState {
    pub is_loading: bool,
    /// `"Name: message"` of the last failed cycle.
    pub error: Option<String>,
    pub tsdb_status: TsdbStatus,
    /// URLs requested by the latest cycle.
    pub fetch_url: Option<Vec<String>>,
}

// ---------------------------------------------------------------------------
// Cycle plan and outcome
// ---------------------------------------------------------------------------

/// Everything [`CardinalityFetcher::execute`] needs to run one cycle.
#[derive(Debug, Clone)]
pub struct CyclePlan {
    pub generation: u64,
    pub requests: RequestSet,
    pub urls: Vec<Url>,
    last_total_series_by_all: u64,
}

/// Result of one executed cycle, tagged with its generation.
#[derive(Debug)]
pub struct CycleOutcome {
    pub generation: u64,
    match_expr: Option<String>,
    last_total_series_by_all: u64,
    result: Result<MergeInputs>,
}

impl CycleOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Fetch and decode a batch of `[current, previous_day, totals?]` URLs
/// concurrently. Any single failure fails the batch.
pub async fn fetch_batch<F>(fetcher: &F, urls: &[Url]) -> Result<MergeInputs>
where
    F: Fetch + ?Sized,
{
    let envelopes = try_join_all(
        urls.iter()
            .map(|url| get_response::<F, StatusEnvelope>(fetcher, url)),
    )
    .await?;

    let mut snapshots = envelopes.into_iter().map(|e| e.data);
    Ok(MergeInputs {
        current: snapshots.next().unwrap_or_default(),
        previous_day: snapshots.next().unwrap_or_default(),
        totals: snapshots.next(),
    })
}

// ---------------------------------------------------------------------------
// CardinalityFetcher
// ---------------------------------------------------------------------------

/// Drives cardinality fetch cycles and owns the cross-cycle totals cache.
#[derive(Debug, Default)]
pub struct CardinalityFetcher {
    generation: u64,
    phase: FetchPhase,
    state: FetchState,
    last_inputs: Option<FetchInputs>,
    previous_date: Option<NaiveDate>,
    /// Date of a planned totals request whose cycle has not been applied.
    pending_totals: Option<NaiveDate>,
    totals_cache: TotalsCache,
}

impl CardinalityFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FetchState {
        &self.state
    }

    pub fn phase(&self) -> FetchPhase {
        self.phase
    }

    /// Generation of the most recently started cycle.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn totals_cache(&self) -> &TotalsCache {
        &self.totals_cache
    }

    /// Start a cycle if the inputs changed since the last one.
    ///
    /// Returns `None` when the server URL is empty, when nothing changed, or
    /// when the URLs cannot be built (the error is then published).
    pub fn begin(&mut self, inputs: FetchInputs) -> Option<CyclePlan> {
        if inputs.server_url.is_empty() {
            return None;
        }
        if self.last_inputs.as_ref() == Some(&inputs) {
            return None;
        }

        self.generation += 1;
        let mut requests = inputs.params.plan(self.previous_date);
        if requests.totals.is_none()
            && inputs.params.has_filter()
            && self.pending_totals == Some(inputs.params.date)
        {
            // The cycle that asked for these totals was superseded.
            requests.totals = Some(inputs.params.totals());
        }
        self.pending_totals = requests.totals.as_ref().map(|t| t.date);
        self.previous_date = Some(inputs.params.date);

        let last_total_series_by_all = self.state.tsdb_status.total_series_by_all;
        self.phase = FetchPhase::Loading;
        self.state.error = None;
        self.state.is_loading = true;
        self.state.tsdb_status = TsdbStatus::default();

        let urls = requests.urls(&inputs.server_url);
        self.last_inputs = Some(inputs);
        let urls = match urls {
            Ok(urls) => urls,
            Err(e) => {
                self.state.fetch_url = None;
                self.fail(&e);
                return None;
            }
        };

        tracing::debug!(
            generation = self.generation,
            requests = urls.len(),
            totals = requests.totals.is_some(),
            "starting cardinality fetch cycle"
        );
        self.state.fetch_url = Some(urls.iter().map(|u| u.to_string()).collect());

        Some(CyclePlan {
            generation: self.generation,
            requests,
            urls,
            last_total_series_by_all,
        })
    }

    /// Fetch and decode every URL of `plan` concurrently.
    pub async fn execute<F>(fetcher: &F, plan: CyclePlan) -> CycleOutcome
    where
        F: Fetch + ?Sized,
    {
        let result = fetch_batch(fetcher, &plan.urls).await;

        CycleOutcome {
            generation: plan.generation,
            match_expr: plan.requests.current.match_expr,
            last_total_series_by_all: plan.last_total_series_by_all,
            result,
        }
    }

    /// Apply an executed cycle. Returns `false` if it was stale and dropped.
    pub fn complete(&mut self, outcome: CycleOutcome) -> bool {
        if outcome.generation != self.generation {
            tracing::debug!(
                stale = outcome.generation,
                current = self.generation,
                "discarding stale cardinality cycle"
            );
            return false;
        }

        self.pending_totals = None;
        match outcome.result {
            Ok(inputs) => {
                self.state.tsdb_status = merge_snapshots(
                    inputs,
                    &mut self.totals_cache,
                    outcome.last_total_series_by_all,
                    outcome.match_expr.as_deref(),
                );
                self.state.is_loading = false;
                self.phase = FetchPhase::Success;
            }
            Err(e) => self.fail(&e),
        }
        self.reset_on_error();
        true
    }

    /// Run a full cycle for `inputs`. Returns `false` if no cycle was
    /// started or its outcome was not applied.
    pub async fn update<F>(&mut self, fetcher: &F, inputs: FetchInputs) -> bool
    where
        F: Fetch + ?Sized,
    {
        match self.begin(inputs) {
            Some(plan) => {
                let outcome = Self::execute(fetcher, plan).await;
                self.complete(outcome)
            }
            None => false,
        }
    }

    fn fail(&mut self, err: &CardinalityError) {
        self.state.error = Some(err.surface());
        self.phase = FetchPhase::Error;
        self.reset_on_error();
    }

    /// Any published error forces the empty snapshot.
    fn reset_on_error(&mut self) {
        if self.state.error.as_deref().is_some_and(|e| !e.is_empty()) {
            self.state.tsdb_status = TsdbStatus::default();
            self.state.is_loading = false;
        }
    }
}
