pub mod context;
pub mod initializer;

pub use context::FlowContext;
pub use initializer::{FlowError, FlowErrorKind, FlowInitializer, TRANSITION_SUCCESS};
