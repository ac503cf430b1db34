use std::sync::Arc;

use tracing::debug;

use super::extractors::{ArgumentExtractor, CasArgumentExtractor, SamlArgumentExtractor};
use super::types::{FlowRequest, Service};

/// Runs extractors in priority order; the first one that recognises the request wins.
#[derive(Clone)]
pub struct ServiceResolver {
    extractors: Vec<Arc<dyn ArgumentExtractor>>,
}

impl ServiceResolver {
    pub fn new(extractors: Vec<Arc<dyn ArgumentExtractor>>) -> Self {
        Self { extractors }
    }

    pub fn resolve(&self, req: &FlowRequest<'_>) -> Option<Service> {
        self.extractors.iter().find_map(|extractor| {
            let service = extractor.extract(req)?;
            debug!(
                extractor = extractor.name(),
                service = %service.id(),
                "extracted service from request"
            );
            Some(service)
        })
    }
}

impl Default for ServiceResolver {
    /// CAS first, SAML as fallback.
    fn default() -> Self {
        let extractors: Vec<Arc<dyn ArgumentExtractor>> = vec![
            Arc::new(CasArgumentExtractor),
            Arc::new(SamlArgumentExtractor),
        ];
        Self::new(extractors)
    }
}

impl std::fmt::Debug for ServiceResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<_> = self.extractors.iter().map(|e| e.name()).collect();
        f.debug_struct("ServiceResolver")
            .field("extractors", &names)
            .finish()
    }
}
