//! `OpenAI` chat completion client used to generate product copy.
//!
//! # Example
//!
//! ```rust,ignore
//! use homare_admin::openai::ChatClient;
//!
//! let client = ChatClient::new(&config.openai)?;
//! let text = client.complete(prompt).await?;
//! ```

mod client;
mod error;
mod types;

pub use client::ChatClient;
pub use error::OpenAiError;
pub use types::{ChatChoice, ChatMessage, ChatRequest, ChatResponse};
