/*!
 * Flow context extractor
 *
 * Responsibility:
 * - flow 初期化済みリクエストのコンテキスト（FlowContext）を handler に提供する
 * - HTTP / axum 依存は core に閉じ込める
 */

mod core;

pub use self::core::FlowCtx;
