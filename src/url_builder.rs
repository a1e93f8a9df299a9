//! Query-string builder for the status endpoints.
//!
//! Values are always percent-encoded through [`url::Url::query_pairs_mut`],
//! never spliced into the URL by hand. Builder methods return `&mut Self`
//! for chaining.
//!
//! # Example
//!
//! ```rust
//! use tsdb_cardinality::UrlBuilder;
//! let url = UrlBuilder::new("http://localhost:8428", "/api/v1/status/tsdb")
//!     .param("topN", "10")
//!     .param_opt("match[]", Some("{job=\"node\"}"))
//!     .build()
//!     .unwrap();
//! assert!(url.as_str().starts_with("http://localhost:8428/api/v1/status/tsdb?topN=10"));
//! ```

use url::Url;

use crate::error::Result;

/// Builds endpoint URLs from a server base and ordered query parameters.
pub struct UrlBuilder {
    server: String,
    path: String,
    params: Vec<(String, String)>,
}

impl UrlBuilder {
    /// Create a builder for `path` under the given server base URL.
    ///
    /// The server URL may carry its own path prefix (e.g. a tenant
    /// `/select/0/prometheus` segment); `path` is appended to it.
    pub fn new(server: &str, path: &str) -> Self {
        Self {
            server: server.trim_end_matches('/').to_string(),
            path: path.to_string(),
            params: Vec::new(),
        }
    }

    /// Append a query parameter.
    pub fn param(&mut self, key: &str, value: &str) -> &mut Self {
        self.params.push((key.to_string(), value.to_string()));
        self
    }

    /// Append a query parameter only when the value is present and non-empty.
    pub fn param_opt(&mut self, key: &str, value: Option<&str>) -> &mut Self {
        if let Some(v) = value.filter(|v| !v.is_empty()) {
            self.param(key, v);
        }
        self
    }

    /// Build the final URL.
    pub fn build(&self) -> Result<Url> {
        let mut url = Url::parse(&format!("{}{}", self.server, self.path))?;
        if !self.params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in &self.params {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }
}
