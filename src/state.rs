/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - ex: flow: FlowInitializer (cookie policy / registry を内包), context_path
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::services::flow::FlowInitializer;

#[derive(Clone, Debug)]
pub struct AppState {
    pub flow: Arc<FlowInitializer>,
    pub context_path: Arc<str>,
}

impl AppState {
    pub fn new(flow: Arc<FlowInitializer>, context_path: impl Into<Arc<str>>) -> Self {
        Self {
            flow,
            context_path: context_path.into(),
        }
    }
}
