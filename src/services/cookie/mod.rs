pub mod policy;
pub mod signals;

pub use policy::CookiePolicy;
pub use signals::{SessionSignalReader, SessionSignals};
