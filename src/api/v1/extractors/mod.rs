mod flow_ctx;

pub use flow_ctx::FlowCtx;
