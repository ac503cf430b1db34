//! The single authorization check a resolved service must pass before it may
//! take part in SSO. Downstream stages trust a `RegisteredService` found in the
//! flow context and never repeat this check for the same request.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::repos::{DenyReason, RegisteredService, ServiceRegistry};
use crate::services::service::Service;

#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    #[error("service {service} is not registered")]
    UnknownService { service: String },
    #[error("service {service} (registered service {registered_service_id}) is not allowed: {reason}")]
    AccessDenied {
        service: String,
        registered_service_id: i64,
        reason: DenyReason,
    },
}

#[derive(Clone)]
pub struct AccessGate {
    registry: Arc<dyn ServiceRegistry>,
}

impl AccessGate {
    pub fn new(registry: Arc<dyn ServiceRegistry>) -> Self {
        Self { registry }
    }

    pub async fn authorize(&self, service: &Service) -> Result<Arc<RegisteredService>, AccessError> {
        let Some(registered) = self.registry.find_service_by(service).await else {
            warn!(service = %service.id(), "service is not found in the service registry");
            return Err(AccessError::UnknownService {
                service: service.id().to_string(),
            });
        };

        if !self.registry.is_access_allowed(service, &registered) {
            let reason = registered
                .access_strategy
                .denial_reason()
                .unwrap_or(DenyReason::Policy);
            warn!(
                service = %service.id(),
                registered_service_id = registered.id,
                %reason,
                "service access denied"
            );
            return Err(AccessError::AccessDenied {
                service: service.id().to_string(),
                registered_service_id: registered.id,
                reason,
            });
        }

        debug!(
            service = %service.id(),
            registered_service_id = registered.id,
            "service access allowed"
        );
        Ok(registered)
    }
}

impl std::fmt::Debug for AccessGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessGate").finish_non_exhaustive()
    }
}
