pub mod access;
pub mod cookie;
pub mod factory;
pub mod flow;
pub mod service;

pub use factory::build_flow_initializer;
