/*
 * Responsibility
 * - Config読み込み → 依存生成 (registry / cookie policy / flow initializer) → Router 組み立て
 * - Middleware の適用 (request id / trace / security headers / flow)
 * - axum::serve() で起動
 */
use std::{panic, process};

use anyhow::Result;
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::middleware::{self, http::HttpLimits};
use crate::services::build_flow_initializer;
use crate::{api, state::AppState};

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,sso_flow=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // development: fail fast / production: default hook, keep serving
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting SSO login flow in {:?} mode on {} (context path {:?})",
        config.app_env,
        config.addr,
        config.context_path
    );

    let flow = build_flow_initializer(&config).await?;
    let state = AppState::new(flow, config.context_path.clone());

    let app = build_router(state, HttpLimits::from_config(&config));

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: AppState, limits: HttpLimits) -> Router {
    let routes = api::v1::routes(state.clone());

    let router = if state.context_path.is_empty() {
        routes
    } else {
        Router::new().nest(&state.context_path, routes)
    };

    let router = router.with_state(state);
    let router = middleware::security_headers::apply(router);
    middleware::http::apply(router, limits)
}
