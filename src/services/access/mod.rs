pub mod gate;

pub use gate::{AccessError, AccessGate};
