#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

pub mod config;
pub mod domain;
pub mod ports;

// Re-export commonly used types for convenience
pub use config::{ConfigError, EnvFallback, Environment, GatewayConfig};
pub use domain::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ChatRole, Choice,
    CompletionDefaults, SessionEvent, SessionEventType, Usage,
};
pub use ports::{CompletionPort, ForwardError};
