/*
 * Responsibility
 * - 1 request 分の login flow の作業領域 (FlowContext)
 * - initializer が埋め、後続 stage (credential / ticket) が読むだけ
 *
 * Notes
 * - registered_service は「認可済み」の証。setter は flow module に閉じる
 */
use std::sync::Arc;

use crate::repos::RegisteredService;
use crate::services::cookie::SessionSignals;
use crate::services::service::Service;

#[derive(Debug, Clone, Default)]
pub struct FlowContext {
    service: Option<Service>,
    registered_service: Option<Arc<RegisteredService>>,
    ticket_granting_ticket_id: Option<String>,
    warn_cookie: bool,
}

impl FlowContext {
    pub fn service(&self) -> Option<&Service> {
        self.service.as_ref()
    }

    /// Present only when `service()` is present and passed the access gate.
    pub fn registered_service(&self) -> Option<&RegisteredService> {
        self.registered_service.as_deref()
    }

    pub fn ticket_granting_ticket_id(&self) -> Option<&str> {
        self.ticket_granting_ticket_id.as_deref()
    }

    pub fn warn_cookie(&self) -> bool {
        self.warn_cookie
    }

    pub(super) fn put_session_signals(&mut self, signals: SessionSignals) {
        self.ticket_granting_ticket_id = signals.ticket_granting_ticket_id;
        self.warn_cookie = signals.warn;
    }

    pub(super) fn put_authorized_service(
        &mut self,
        service: Service,
        registered_service: Arc<RegisteredService>,
    ) {
        self.service = Some(service);
        self.registered_service = Some(registered_service);
    }

    pub(super) fn put_no_service(&mut self) {
        self.service = None;
        self.registered_service = None;
    }
}
