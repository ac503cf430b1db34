//! Session-scoped signals carried by request cookies.

use axum::http::HeaderMap;

use super::CookiePolicy;

/// What the client told us about its prior session.
///
/// - `ticket_granting_ticket_id`: existing SSO session token, if any
/// - `warn`: the user asked to be warned before the session is reused
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSignals {
    pub ticket_granting_ticket_id: Option<String>,
    pub warn: bool,
}

pub struct SessionSignalReader<'a> {
    tgc_cookie: &'a CookiePolicy,
    warn_cookie: &'a CookiePolicy,
}

impl<'a> SessionSignalReader<'a> {
    pub fn new(tgc_cookie: &'a CookiePolicy, warn_cookie: &'a CookiePolicy) -> Self {
        Self {
            tgc_cookie,
            warn_cookie,
        }
    }

    /// Absent cookies are a normal state, so this never fails.
    pub fn read(&self, headers: &HeaderMap) -> SessionSignals {
        let ticket_granting_ticket_id = self.tgc_cookie.retrieve(headers);
        let warn = self
            .warn_cookie
            .retrieve(headers)
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("true"));

        SessionSignals {
            ticket_granting_ticket_id,
            warn,
        }
    }
}
