pub mod error;
pub mod service_registry;

pub use error::RegistryError;
pub use service_registry::{DenyReason, InMemoryServiceRegistry, RegisteredService, ServiceRegistry};
