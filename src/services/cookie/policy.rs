//! Per-cookie-kind policy shared by every request.
//!
//! The cookie path depends on the deployment context path, which is only
//! known once real traffic arrives. The path is therefore a set-once cell:
//! seeded from config when a non-blank value is configured, otherwise pinned
//! by the first request that reaches the flow stage.
//!
//! Concurrent first requests may all try to pin. Every writer computes the
//! same value from the same static context path, so whichever write lands
//! first is the value the others would have written. Losers are a no-op.

use std::sync::OnceLock;

use axum::http::HeaderMap;
use axum_extra::extract::cookie::CookieJar;
use tracing::{debug, info};

use crate::config::CookieSettings;

#[derive(Debug)]
pub struct CookiePolicy {
    name: String,
    domain: Option<String>,
    path: OnceLock<String>,
}

impl CookiePolicy {
    pub fn new(name: impl Into<String>, domain: Option<String>, path: Option<String>) -> Self {
        let path = match path.filter(|p| !p.trim().is_empty()) {
            Some(p) => OnceLock::from(p),
            None => OnceLock::new(),
        };

        Self {
            name: name.into(),
            domain,
            path,
        }
    }

    pub fn from_settings(settings: &CookieSettings) -> Self {
        Self::new(
            settings.name.clone(),
            settings.domain.clone(),
            settings.path.clone(),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    /// `None` until the path has been configured or pinned.
    pub fn path(&self) -> Option<&str> {
        self.path.get().map(String::as_str)
    }

    /// Pin the path from `base_path` if it is still unset; returns the effective path.
    pub fn ensure_path(&self, base_path: &str) -> &str {
        if let Some(path) = self.path.get() {
            debug!(
                cookie = %self.name(),
                domain = ?self.domain(),
                path = %path,
                "cookie path already set"
            );
            return path;
        }

        let cookie_path = cookie_path_for(base_path);
        if self.path.set(cookie_path).is_ok() {
            info!(cookie = %self.name(), path = ?self.path(), "pinned cookie path");
        }

        self.path().unwrap_or("/")
    }

    /// Value of this cookie on the incoming request. Empty values count as absent.
    pub fn retrieve(&self, headers: &HeaderMap) -> Option<String> {
        CookieJar::from_headers(headers)
            .get(&self.name)
            .map(|c| c.value().to_string())
            .filter(|v| !v.is_empty())
    }
}

/// `"/cas"` -> `"/cas/"`, blank -> `"/"`.
pub fn cookie_path_for(base_path: &str) -> String {
    if base_path.trim().is_empty() {
        "/".to_string()
    } else {
        format!("{base_path}/")
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::{HeaderValue, header};

    use super::*;

    #[test]
    fn blank_path_is_pinned_from_base_path() {
        let policy = CookiePolicy::new("TGC", None, None);
        assert_eq!(policy.path(), None);

        assert_eq!(policy.ensure_path("/cas"), "/cas/");
        assert_eq!(policy.path(), Some("/cas/"));
    }

    #[test]
    fn empty_base_path_pins_root() {
        let policy = CookiePolicy::new("TGC", None, Some("   ".to_string()));
        assert_eq!(policy.ensure_path(""), "/");
    }

    #[test]
    fn second_pin_leaves_path_unchanged() {
        let policy = CookiePolicy::new("TGC", None, None);
        policy.ensure_path("/cas");
        policy.ensure_path("/other");
        policy.ensure_path("");

        assert_eq!(policy.path(), Some("/cas/"));
    }

    #[test]
    fn configured_path_is_never_overridden() {
        let policy = CookiePolicy::new("TGC", Some("example.org".to_string()), Some("/sso/".to_string()));
        assert_eq!(policy.ensure_path("/cas"), "/sso/");
        assert_eq!(policy.name(), "TGC");
        assert_eq!(policy.domain(), Some("example.org"));
    }

    #[test]
    fn concurrent_pins_converge() {
        let policy = Arc::new(CookiePolicy::new("CASPRIVACY", None, None));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let policy = Arc::clone(&policy);
                std::thread::spawn(move || policy.ensure_path("/cas").to_string())
            })
            .collect();

        for h in handles {
            assert_eq!(h.join().unwrap(), "/cas/");
        }
        assert_eq!(policy.path(), Some("/cas/"));
    }

    #[test]
    fn retrieve_reads_named_cookie_only() {
        let policy = CookiePolicy::new("TGC", None, None);
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("CASPRIVACY=true; TGC=TGT-1-abc"),
        );

        assert_eq!(policy.retrieve(&headers), Some("TGT-1-abc".to_string()));
        assert_eq!(policy.retrieve(&HeaderMap::new()), None);
    }

    #[test]
    fn empty_cookie_value_counts_as_absent() {
        let policy = CookiePolicy::new("TGC", None, None);
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("TGC="));

        assert_eq!(policy.retrieve(&headers), None);
    }
}
