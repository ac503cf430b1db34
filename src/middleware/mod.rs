/*
 * Responsibility
 * - middlware の公開インターフェース (re-export)
 * - flow::apply (login flow 初期化), http::apply, security_headers::apply
 */
pub mod flow;
pub mod http;
pub mod security_headers;
