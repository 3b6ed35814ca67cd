pub mod chat;
pub mod conversation;
pub mod prompt;

pub use chat::{ChatMessage, ChatRequest, ChatResponse, Choice, ModelInfo, ModelsResponse, Role};
pub use conversation::Conversation;
pub use prompt::{Task, CODER_PERSONA, NO_RESPONSE_SENTINEL};
