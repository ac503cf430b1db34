/*
 * Responsibility
 * - GET /login の response DTO
 * - FlowContext から後続 stage に見せてよい値だけを写す (session token 本体は出さない)
 */
use serde::Serialize;

use crate::repos::RegisteredService;
use crate::services::flow::FlowContext;
use crate::services::service::{Service, ServiceFormat};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDto {
    pub id: String,
    pub original_url: String,
    pub format: ServiceFormat,
}

impl From<&Service> for ServiceDto {
    fn from(s: &Service) -> Self {
        Self {
            id: s.id().to_string(),
            original_url: s.original_url().to_string(),
            format: s.format(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredServiceDto {
    pub id: i64,
    pub name: String,
    pub service_id: String,
}

impl From<&RegisteredService> for RegisteredServiceDto {
    fn from(r: &RegisteredService) -> Self {
        Self {
            id: r.id,
            name: r.name.clone(),
            service_id: r.service_id.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginFlowResponse {
    pub transition: &'static str,
    pub service: Option<ServiceDto>,
    pub registered_service: Option<RegisteredServiceDto>,
    pub has_session_token: bool,
    pub warn: bool,
}

impl LoginFlowResponse {
    pub fn new(transition: &'static str, ctx: &FlowContext) -> Self {
        Self {
            transition,
            service: ctx.service().map(ServiceDto::from),
            registered_service: ctx.registered_service().map(RegisteredServiceDto::from),
            has_session_token: ctx.ticket_granting_ticket_id().is_some(),
            warn: ctx.warn_cookie(),
        }
    }
}
