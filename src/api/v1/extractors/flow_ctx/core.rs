use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;

use crate::services::flow::FlowContext;
use crate::state::AppState;

/// Handler で、 FlowContext を受け取るための extractor
/// flow middleware が FlowContext を request.extensions() に insert 済みである前提
/// 見つからない場合は 500 を返す（route に flow middleware が掛かっていない = 配線ミス）
pub struct FlowCtx(pub FlowContext);

impl FromRequestParts<AppState> for FlowCtx {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .remove::<FlowContext>()
            .map(FlowCtx)
            .ok_or_else(|| {
                tracing::error!("flow context missing; flow middleware is not applied to this route");
                AppError::Internal
            })
    }
}
