#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Dev-dependencies used only by the integration tests
#[cfg(test)]
use axum as _;
#[cfg(test)]
use tokio as _;

pub mod forward;
pub mod health;

pub use forward::ChatForwarder;
pub use health::{PROBE_TIMEOUT, probe_endpoint};
