//! Port definitions (trait seams) implemented by adapters.

pub mod completion;

pub use completion::{CompletionPort, ForwardError};
