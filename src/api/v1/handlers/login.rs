/*
 * Responsibility
 * - GET /login
 * - flow 初期化の結果 (FlowContext) を後続 stage 向けに返す
 * - credential 入力 / ticket 発行はここでは扱わない
 */
use axum::Json;

use crate::api::v1::dto::login::LoginFlowResponse;
use crate::api::v1::extractors::FlowCtx;
use crate::services::flow::TRANSITION_SUCCESS;

pub async fn login(FlowCtx(ctx): FlowCtx) -> Json<LoginFlowResponse> {
    Json(LoginFlowResponse::new(TRANSITION_SUCCESS, &ctx))
}
