//! Speech integrations
//!
//! The transcription adapter (audio file in, transcript out) and the
//! fire-and-forget speech synthesis side channel.

pub mod synthesizer;
pub mod transcriber;

pub use synthesizer::OpenAiSynthesizer;
pub use transcriber::OpenAiTranscriber;
