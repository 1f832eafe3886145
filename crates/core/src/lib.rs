//! # VoiceCal Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port/adapter interfaces (traits) for every external collaborator
//! - The command interpreter and its classification rule tables
//! - The calendar service (response formatting and failure policy)
//!
//! ## Architecture Principles
//! - Only depends on `voicecal-domain`
//! - No HTTP, filesystem, or audio code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod calendar;
pub mod interpreter;
pub mod ports;

// Re-export specific items to avoid ambiguity
pub use calendar::CalendarService;
pub use interpreter::{CommandInterpreter, Interpretation};
pub use ports::{
    CalendarProvider, EventResource, EventTime, InsertedEvent, LanguageModel, ListedEvent,
    SpeechRecognizer, VoiceOutput,
};
