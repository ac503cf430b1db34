//! Strategies that identify the requesting application from request parameters.

use tracing::warn;

use super::types::{FlowRequest, Service, ServiceFormat};

/// One way of finding the target service on a request.
pub trait ArgumentExtractor: Send + Sync {
    // Used in debug logs only.
    fn name(&self) -> &'static str;

    fn extract(&self, req: &FlowRequest<'_>) -> Option<Service>;
}

fn extract_param(req: &FlowRequest<'_>, param: &str, format: ServiceFormat) -> Option<Service> {
    let value = req.param(param).filter(|v| !v.trim().is_empty())?;
    let service = Service::from_url(value.as_str(), format);
    if service.is_none() {
        warn!(param, value = %value, "ignoring unusable service url");
    }
    service
}

/// CAS protocol: `?service=<callback url>`.
#[derive(Debug, Default, Clone, Copy)]
pub struct CasArgumentExtractor;

impl ArgumentExtractor for CasArgumentExtractor {
    fn name(&self) -> &'static str {
        "cas"
    }

    fn extract(&self, req: &FlowRequest<'_>) -> Option<Service> {
        extract_param(req, "service", ServiceFormat::Cas)
    }
}

/// SAML 1.1 artifact profile: `?TARGET=<callback url>`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SamlArgumentExtractor;

impl ArgumentExtractor for SamlArgumentExtractor {
    fn name(&self) -> &'static str {
        "saml"
    }

    fn extract(&self, req: &FlowRequest<'_>) -> Option<Service> {
        extract_param(req, "TARGET", ServiceFormat::Saml)
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap, Uri};

    use super::*;

    fn request_extract(extractor: &dyn ArgumentExtractor, uri: &str) -> Option<Service> {
        let headers = HeaderMap::new();
        let uri: Uri = uri.parse().unwrap();
        extractor.extract(&FlowRequest::new(&headers, &uri, ""))
    }

    #[test]
    fn cas_reads_service_param() {
        let s = request_extract(&CasArgumentExtractor, "/login?service=https://app.example.org")
            .unwrap();
        assert_eq!(s.id(), "https://app.example.org");
        assert_eq!(s.format(), ServiceFormat::Cas);
    }

    #[test]
    fn saml_reads_target_param() {
        let s = request_extract(&SamlArgumentExtractor, "/login?TARGET=https://app.example.org")
            .unwrap();
        assert_eq!(s.format(), ServiceFormat::Saml);
        assert!(request_extract(&SamlArgumentExtractor, "/login?service=https://x").is_none());
    }

    #[test]
    fn unusable_url_is_no_service() {
        assert!(request_extract(&CasArgumentExtractor, "/login?service=/relative/path").is_none());
        assert!(request_extract(&SamlArgumentExtractor, "/login?TARGET=nonsense").is_none());
    }

    #[test]
    fn empty_value_is_no_service() {
        assert!(request_extract(&CasArgumentExtractor, "/login?service=").is_none());
        assert!(request_extract(&CasArgumentExtractor, "/login").is_none());
    }
}
