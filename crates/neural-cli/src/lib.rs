#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

#[cfg(test)]
use tempfile as _;

// Used by main.rs binary
use dotenvy as _;
use neural_axum as _;
use tokio as _;
use tokio_util as _;
use tracing as _;

pub mod commands;
pub mod logging;
pub mod parser;

pub use commands::{Commands, render_config};
pub use logging::init_logging;
pub use parser::Cli;
