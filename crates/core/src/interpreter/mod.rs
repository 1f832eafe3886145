//! Command interpreter
//!
//! Combines a transcript, the extracted moment, and a fixed instruction
//! template into one prompt, obtains a free-text reply from the
//! text-generation collaborator, and classifies the reply into a structured
//! [`Action`] using the rule tables in [`rules`].

pub mod rules;

use std::sync::Arc;

use tracing::{debug, error};
use voicecal_domain::{Action, EventDraft, ParsedMoment, Transcript};

use crate::ports::LanguageModel;
use rules::{classify_intent, extract_summary, Intent};

/// Instruction template prepended to every prompt.
const INSTRUCTION_TEMPLATE: &str = "\
You are a helpful calendar assistant that processes voice commands in Hindi and English.
Decide what the command asks for and answer with the action to take:
say \"create event\" to schedule something, or \"show events\" to list the calendar.
For a new event also name its type (meeting, appointment, ...) and any details.";

/// Summary used when no summary rule matches a create reply.
const FALLBACK_SUMMARY: &str = "Event";

/// Asked of the user when a create intent arrives without a resolvable moment.
pub const CLARIFY_MESSAGE: &str = "Could not understand the date/time. Please clarify.";

/// Outcome of interpreting one transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interpretation {
    /// Structured action ready for the calendar gateway.
    Act(Action),
    /// The reply asked to create an event but no moment was extracted;
    /// the user must clarify rather than have a start time fabricated.
    Clarify,
    /// The language model call failed; carries the user-visible message.
    Failed(String),
}

/// Interprets transcripts via the text-generation collaborator.
pub struct CommandInterpreter {
    model: Arc<dyn LanguageModel>,
    default_max_results: u32,
}

impl CommandInterpreter {
    pub fn new(model: Arc<dyn LanguageModel>, default_max_results: u32) -> Self {
        Self { model, default_max_results }
    }

    /// Interpret one transcript.
    ///
    /// Internal failures never escape: a model error is logged and
    /// downgraded to [`Interpretation::Failed`] with a visible message.
    pub async fn interpret(
        &self,
        transcript: &Transcript,
        moment: Option<ParsedMoment>,
    ) -> Interpretation {
        let prompt = build_prompt(transcript, moment.as_ref());

        let reply = match self.model.generate(&prompt).await {
            Ok(reply) => reply,
            Err(err) => {
                error!(error = %err, "language model call failed");
                return Interpretation::Failed(format!("An error occurred: {err}"));
            }
        };

        debug!(reply_len = reply.len(), "classifying generated reply");

        match classify_intent(&reply) {
            Intent::CreateEvent => match moment {
                Some(start) => {
                    let summary = extract_summary(&reply).unwrap_or(FALLBACK_SUMMARY);
                    Interpretation::Act(Action::Create(EventDraft::with_default_duration(
                        summary, start,
                    )))
                }
                None => Interpretation::Clarify,
            },
            Intent::FetchEvents => {
                Interpretation::Act(Action::Fetch { max_results: self.default_max_results })
            }
            Intent::Unknown => Interpretation::Act(Action::Unrecognized),
        }
    }
}

/// Concatenate the instruction template, command text, and canonical moment.
fn build_prompt(transcript: &Transcript, moment: Option<&ParsedMoment>) -> String {
    let mut prompt = String::from(INSTRUCTION_TEMPLATE);
    prompt.push_str("\n\nCommand: ");
    prompt.push_str(&transcript.text);
    if let Some(moment) = moment {
        prompt.push_str("\nParsed date: ");
        prompt.push_str(&moment.canonical_text());
    }
    prompt
}
