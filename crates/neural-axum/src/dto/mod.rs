//! Response bodies for the public endpoints.

pub mod system;

pub use system::{CapabilitiesResponse, HealthResponse, StatusResponse};
