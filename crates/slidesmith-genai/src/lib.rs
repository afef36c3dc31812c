//! Model-facing layer for Slidesmith: prompt assembly, the Gemini
//! `generateContent` client, and validation of the model's JSON answer.

pub mod client;
pub mod error;
pub mod parse;
pub mod prompt;

pub use client::{GeminiClient, InlineDocument, ModelReply, Source, WebSource};
pub use error::GenAiError;
pub use parse::{RawSlide, parse_slides};
pub use prompt::{PresentationPattern, build_prompt};
