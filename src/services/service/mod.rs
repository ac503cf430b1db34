/**
 * Responsibility
 *  - request から要求元 Service を特定する (extractor + resolver)
 *  - 外部 (flow / handlers) に公開する型を制御する
 */
pub mod extractors;
pub mod resolver;
mod types;

pub use resolver::ServiceResolver;
pub use types::{FlowRequest, Service, ServiceFormat};
