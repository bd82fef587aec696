//! Answer generation: prompt assembly and chat streaming

pub mod chat;
pub mod prompt;

pub use chat::ChatClient;
pub use prompt::PromptBuilder;
