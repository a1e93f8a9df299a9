//! Request parameters for the cardinality endpoint and the derived request set.
//!
//! One logical query produces up to three requests per fetch cycle: the
//! current day, the previous day (for deltas), and, when a filter is active
//! and the date just changed, an unfiltered totals request used as the
//! "share of all series" baseline.

use chrono::{FixedOffset, NaiveDate, Utc};
use url::Url;

use crate::config;
use crate::error::{CardinalityError, Result};
use crate::url_builder::UrlBuilder;

// ---------------------------------------------------------------------------
// RequestParams
// ---------------------------------------------------------------------------

/// Parameters of a single cardinality request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestParams {
    pub top_n: u32,
    /// Series selector passed as `match[]`, e.g. `{job="node"}`.
    pub match_expr: Option<String>,
    pub date: NaiveDate,
    pub focus_label: Option<String>,
}

impl RequestParams {
    /// Params for `date` with the default `topN` and no filters.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            top_n: config::DEFAULT_TOP_N,
            match_expr: None,
            date,
            focus_label: None,
        }
    }

    /// Parse params from the caller's query-string pairs.
    ///
    /// Recognizes `match`, `focusLabel`, `topN` and `date`. Missing or empty
    /// values take their defaults: no filter, `topN=10`, and `today` for the
    /// date. Unknown keys are ignored.
    pub fn from_query<I, K, V>(pairs: I, today: NaiveDate) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut params = Self::new(today);
        for (key, value) in pairs {
            let value = value.as_ref();
            if value.is_empty() {
                continue;
            }
            match key.as_ref() {
                "match" => params.match_expr = Some(value.to_string()),
                "focusLabel" => params.focus_label = Some(value.to_string()),
                "topN" => {
                    params.top_n = value.parse().map_err(|_| {
                        CardinalityError::InvalidArgument(format!("invalid topN: {}", value))
                    })?;
                }
                "date" => {
                    params.date =
                        NaiveDate::parse_from_str(value, config::DATE_FORMAT).map_err(|_| {
                            CardinalityError::InvalidArgument(format!(
                                "invalid date (expected YYYY-MM-DD): {}",
                                value
                            ))
                        })?;
                }
                _ => {}
            }
        }
        Ok(params)
    }

    /// True when either `match` or `focusLabel` narrows the statistics.
    pub fn has_filter(&self) -> bool {
        let set = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
        set(&self.match_expr) || set(&self.focus_label)
    }

    /// Same params, one calendar day earlier.
    pub fn previous_day(&self) -> Self {
        Self {
            date: self.date.pred_opt().unwrap_or(self.date),
            ..self.clone()
        }
    }

    /// Unfiltered baseline for the same date.
    pub fn totals(&self) -> Self {
        Self {
            top_n: 0,
            match_expr: None,
            date: self.date,
            focus_label: None,
        }
    }

    /// Derive the request set for one fetch cycle.
    ///
    /// `previous_date` is the date of the last cycle that was started; the
    /// totals request is only planned when the date moved and a filter is
    /// active.
    pub fn plan(&self, previous_date: Option<NaiveDate>) -> RequestSet {
        let totals = (previous_date != Some(self.date) && self.has_filter()).then(|| self.totals());
        RequestSet {
            current: self.clone(),
            previous_day: self.previous_day(),
            totals,
        }
    }

    /// URL of the cardinality endpoint for these params.
    pub fn to_url(&self, server: &str) -> Result<Url> {
        UrlBuilder::new(server, config::TSDB_STATUS_PATH)
            .param("topN", &self.top_n.to_string())
            .param("date", &self.date.format(config::DATE_FORMAT).to_string())
            .param_opt("match[]", self.match_expr.as_deref())
            .param_opt("focusLabel", self.focus_label.as_deref())
            .build()
    }
}

// ---------------------------------------------------------------------------
// RequestSet
// ---------------------------------------------------------------------------

/// The two or three requests issued by one fetch cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSet {
    pub current: RequestParams,
    pub previous_day: RequestParams,
    pub totals: Option<RequestParams>,
}

impl RequestSet {
    /// Requests in issue order: current, previous day, then totals.
    pub fn iter(&self) -> impl Iterator<Item = &RequestParams> {
        [&self.current, &self.previous_day]
            .into_iter()
            .chain(self.totals.as_ref())
    }

    /// Build every URL of the set against `server`.
    pub fn urls(&self, server: &str) -> Result<Vec<Url>> {
        self.iter().map(|p| p.to_url(server)).collect()
    }
}

/// Today's calendar date in the viewer's time zone.
pub fn today_in(offset: FixedOffset) -> NaiveDate {
    Utc::now().with_timezone(&offset).date_naive()
}
