pub mod assistant;
pub mod client;
pub mod error;

pub use assistant::CodeAssistant;
pub use client::KimiClient;
pub use error::{ClientError, Result};
