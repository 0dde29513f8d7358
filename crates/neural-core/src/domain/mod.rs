//! Domain types shared by every adapter.

pub mod chat;
pub mod session;

pub use chat::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ChatRole, Choice,
    CompletionDefaults, Usage,
};
pub use session::{SessionEvent, SessionEventType};
