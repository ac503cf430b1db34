//! First step of every login request.
//!
//! Pins the cookie paths, surfaces the prior session signals, resolves the
//! requesting service and runs it through the access gate. The result is a
//! fully populated `FlowContext` or a typed `FlowError` that aborts the request
//! before any credential handling happens.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::repos::RegisteredService;
use crate::services::access::{AccessError, AccessGate};
use crate::services::cookie::{CookiePolicy, SessionSignalReader};
use crate::services::service::{FlowRequest, ServiceResolver};

use super::context::FlowContext;

/// Transition id reported to the flow engine when the stage completes.
pub const TRANSITION_SUCCESS: &str = "success";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowErrorKind {
    UnknownService,
    AccessDenied,
    ServiceRequired,
}

#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error("a target application is required (request {request_url})")]
    ServiceRequired { request_url: String },
}

impl FlowError {
    pub fn kind(&self) -> FlowErrorKind {
        match self {
            FlowError::Access(AccessError::UnknownService { .. }) => FlowErrorKind::UnknownService,
            FlowError::Access(AccessError::AccessDenied { .. }) => FlowErrorKind::AccessDenied,
            FlowError::ServiceRequired { .. } => FlowErrorKind::ServiceRequired,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FlowInitializer {
    tgc_cookie: Arc<CookiePolicy>,
    warn_cookie: Arc<CookiePolicy>,
    resolver: ServiceResolver,
    gate: AccessGate,
    // Abort instead of continuing when no service is on the request.
    require_service: bool,
}

impl FlowInitializer {
    pub fn new(
        tgc_cookie: Arc<CookiePolicy>,
        warn_cookie: Arc<CookiePolicy>,
        resolver: ServiceResolver,
        gate: AccessGate,
    ) -> Self {
        Self {
            tgc_cookie,
            warn_cookie,
            resolver,
            gate,
            require_service: false,
        }
    }

    pub fn require_service(mut self, required: bool) -> Self {
        self.require_service = required;
        self
    }

    #[cfg(test)]
    pub fn tgc_cookie(&self) -> &CookiePolicy {
        &self.tgc_cookie
    }

    #[cfg(test)]
    pub fn warn_cookie(&self) -> &CookiePolicy {
        &self.warn_cookie
    }

    pub async fn initialize(&self, req: &FlowRequest<'_>) -> Result<FlowContext, FlowError> {
        let mut ctx = FlowContext::default();

        self.pin_cookie_paths(req.context_path);

        let signals = SessionSignalReader::new(&self.tgc_cookie, &self.warn_cookie).read(req.headers);
        ctx.put_session_signals(signals);

        match self.resolver.resolve(req) {
            Some(service) => {
                debug!(service = %service.id(), "placing service in flow context");

                let registered = self.gate.authorize(&service).await?;
                log_registered_service(&registered);

                ctx.put_authorized_service(service, registered);
            }
            None if self.require_service => {
                warn!(
                    request_url = %req.uri,
                    "no service authentication request is available; flow is disabled without a service"
                );
                return Err(FlowError::ServiceRequired {
                    request_url: req.uri.to_string(),
                });
            }
            None => ctx.put_no_service(),
        }

        Ok(ctx)
    }

    fn pin_cookie_paths(&self, context_path: &str) {
        self.warn_cookie.ensure_path(context_path);
        self.tgc_cookie.ensure_path(context_path);
    }
}

fn log_registered_service(registered: &RegisteredService) {
    debug!(
        registered_service = %registered.service_id,
        registered_service_id = registered.id,
        "placing registered service in flow context"
    );
}
