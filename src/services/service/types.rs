/*
 * Responsibility
 * - 要求元アプリケーション (Service) の型
 * - extractor が参照する request view (FlowRequest)
 */
use axum::http::{HeaderMap, Uri};
use serde::Serialize;
use url::Url;

/// Which protocol parameter the service was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceFormat {
    Cas,
    Saml,
}

/// The application asking for authentication on this request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Service {
    id: String,
    original_url: String,
    format: ServiceFormat,
}

impl Service {
    /// Parses the callback url. `id` is the url with any `;jsessionid=...` path
    /// parameter removed; everything outside the path is left as sent.
    ///
    /// `None` when the url is not absolute or the cleaned id would point at a
    /// different host than the callback itself.
    pub fn from_url(original_url: impl Into<String>, format: ServiceFormat) -> Option<Self> {
        let original_url = original_url.into();
        let callback = Url::parse(&original_url).ok()?;

        let id = match strip_jsessionid(callback.path()) {
            Some(path) => {
                let mut cleaned = callback.clone();
                cleaned.set_path(&path);
                cleaned.to_string()
            }
            None => original_url.clone(),
        };

        let id_host = Url::parse(&id).ok()?.host_str().map(str::to_owned);
        if id_host.as_deref() != callback.host_str() {
            return None;
        }

        Some(Self {
            id,
            original_url,
            format,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn original_url(&self) -> &str {
        &self.original_url
    }

    pub fn format(&self) -> ServiceFormat {
        self.format
    }
}

/// Path with the `;jsessionid=...` segment parameter cut out, or `None` if there is none.
fn strip_jsessionid(path: &str) -> Option<String> {
    let start = path.find(";jsessionid=")?;
    let rest = &path[start..];
    match rest.find('/') {
        Some(end) => Some(format!("{}{}", &path[..start], &rest[end..])),
        None => Some(path[..start].to_string()),
    }
}

/// Read-only view of the inbound request handed to extractors.
#[derive(Debug, Clone, Copy)]
pub struct FlowRequest<'a> {
    pub headers: &'a HeaderMap,
    pub uri: &'a Uri,
    pub context_path: &'a str,
}

impl<'a> FlowRequest<'a> {
    pub fn new(headers: &'a HeaderMap, uri: &'a Uri, context_path: &'a str) -> Self {
        Self {
            headers,
            uri,
            context_path,
        }
    }

    /// First value of query parameter `name`, percent-decoded.
    pub fn param(&self, name: &str) -> Option<String> {
        let query = self.uri.query()?;
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jsessionid_is_removed_from_id() {
        let s = Service::from_url("https://app.example.org/a;jsessionid=ABC123?x=1", ServiceFormat::Cas)
            .unwrap();
        assert_eq!(s.id(), "https://app.example.org/a?x=1");
        assert_eq!(
            s.original_url(),
            "https://app.example.org/a;jsessionid=ABC123?x=1"
        );

        let s = Service::from_url("https://app.example.org/a;jsessionid=ABC123", ServiceFormat::Cas)
            .unwrap();
        assert_eq!(s.id(), "https://app.example.org/a");
    }

    #[test]
    fn url_without_jsessionid_is_kept_verbatim() {
        let s = Service::from_url("https://app.example.org", ServiceFormat::Cas).unwrap();
        assert_eq!(s.id(), "https://app.example.org");
    }

    #[test]
    fn jsessionid_in_userinfo_does_not_hide_real_host() {
        let s = Service::from_url(
            "https://app.example.org;jsessionid=x@evil.example.org/steal",
            ServiceFormat::Cas,
        )
        .unwrap();

        // nothing stripped: the id still names the host the callback goes to
        assert_eq!(s.id(), s.original_url());
        assert!(!s.id().starts_with("https://app.example.org/"));
        assert_eq!(
            Url::parse(s.id()).unwrap().host_str(),
            Some("evil.example.org")
        );
    }

    #[test]
    fn relative_or_garbage_url_is_rejected() {
        assert!(Service::from_url("/just/a/path", ServiceFormat::Cas).is_none());
        assert!(Service::from_url("not a url", ServiceFormat::Cas).is_none());
    }

    #[test]
    fn param_is_percent_decoded() {
        let headers = HeaderMap::new();
        let uri: Uri = "/cas/login?service=https%3A%2F%2Fapp.example.org%2Fhome&renew=true"
            .parse()
            .unwrap();
        let req = FlowRequest::new(&headers, &uri, "/cas");

        assert_eq!(
            req.param("service").as_deref(),
            Some("https://app.example.org/home")
        );
        assert_eq!(req.param("TARGET"), None);
    }
}
