//! OpenAI-compatible chat completions integration
//!
//! Implements the text-generation collaborator: one prompt string in, one
//! free-text reply out. The reply is treated as a black box; all structure
//! is recovered downstream by the interpreter's rule tables.

mod client;
mod types;

pub use client::OpenAiClient;
