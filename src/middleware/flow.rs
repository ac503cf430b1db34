//! login flow 初期化 → FlowContext を extensions に入れる
//!
//! - cookie path の pin、session cookie の読み取り、service の解決と認可を実行する
//! - 失敗 (unknown service / access denied / service required) は handler に届く前に中断する

use axum::{
    Router,
    body::Body,
    extract::{OriginalUri, State},
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::error::AppError;
use crate::services::service::FlowRequest;
use crate::state::AppState;

/// login flow の route に初期化 stage を掛ける。
///
/// 例：
/// ```ignore
/// let login = Router::new().route("/login", get(login));
/// let login = middleware::flow::apply(login, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.route_layer(middleware::from_fn_with_state(state, flow_middleware))
}

async fn flow_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    // nest された router では uri から context path が外れているので、ログ用には元の uri を使う
    let uri = parts
        .extensions
        .get::<OriginalUri>()
        .map(|OriginalUri(uri)| uri.clone())
        .unwrap_or_else(|| parts.uri.clone());

    let flow_req = FlowRequest::new(&parts.headers, &uri, &state.context_path);
    let ctx = state.flow.initialize(&flow_req).await?;

    // middleware → extractor への受け渡し
    parts.extensions.insert(ctx);

    Ok(next.run(Request::from_parts(parts, body)).await)
}
