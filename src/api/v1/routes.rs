/*
 * Responsibility
 * - login flow の URL 構造を定義 (context path 直下に mount される)
 * - /health は flow を通さず、/login にだけ flow 初期化 middleware を掛ける
 */
use axum::{Router, routing::get};

use crate::middleware;
use crate::state::AppState;

use crate::api::v1::handlers::{health::health, login::login};

pub fn routes(state: AppState) -> Router<AppState> {
    let login = Router::new().route("/login", get(login));
    let login = middleware::flow::apply(login, state);

    Router::new().route("/health", get(health)).merge(login)
}
