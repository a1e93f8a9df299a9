//! Tenant detection for cluster deployments.
//!
//! Cluster `select` endpoints carry the tenant in the path:
//! `http://vmselect:8481/select/<accountID>[:<projectID>]/prometheus`.

use std::sync::LazyLock;

use regex::Regex;

static TENANT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/select/(\d+|\d+:\d+)/.+").expect("tenant regex is valid")
});

/// Tenant id embedded in a cluster server URL, if any.
pub fn tenant_id_from_url(url: &str) -> Option<&str> {
    TENANT_RE
        .captures(url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// True when `url` targets a multi-tenant cluster endpoint.
pub fn is_cluster(url: &str) -> bool {
    tenant_id_from_url(url).is_some()
}
