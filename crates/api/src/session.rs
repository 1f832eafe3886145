//! Interactive session loop
//!
//! One command per iteration: read an audio file path from stdin, run the
//! pipeline, print the response, and hand it to the voice channel. Every
//! component boundary converts its own failures into sentinel values or
//! user-facing strings, so no iteration can take the process down; the loop
//! ends only on the exit sentinel or end of input.

use std::io::Write;
use std::path::Path;

use tokio::io::AsyncBufReadExt;
use tracing::{error, info, warn};
use voicecal_core::interpreter::{Interpretation, CLARIFY_MESSAGE};
use voicecal_domain::constants::EXIT_SENTINEL;
use voicecal_domain::extract_moment;

use crate::context::AppContext;

/// Shown when transcription yields no usable command this cycle.
pub const NO_TRANSCRIPT_MESSAGE: &str = "Sorry, I couldn't understand that.";

/// Run the interactive session until the user exits.
pub async fn run(ctx: &AppContext) {
    println!("Welcome to VoiceCal!");
    println!("Speak your command or type 'exit' to quit.");

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        println!("\nListening...");
        print!("Enter path to audio file or type 'exit': ");
        let _ = std::io::stdout().flush();

        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(err) => {
                error!(error = %err, "failed to read input");
                break;
            }
        };

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case(EXIT_SENTINEL) {
            break;
        }

        let response = handle_command(ctx, input).await;
        println!("\n{response}");
        speak(ctx, &response).await;
    }

    info!("session ended");
}

/// Drive one command through the pipeline. Always produces a response.
pub async fn handle_command(ctx: &AppContext, audio_path: &str) -> String {
    let transcript = match ctx.recognizer.transcribe(Path::new(audio_path)).await {
        Ok(transcript) => transcript,
        Err(err) => {
            warn!(error = %err, path = audio_path, "transcription failed");
            return NO_TRANSCRIPT_MESSAGE.to_string();
        }
    };

    info!(text = %transcript.text, language = ?transcript.language, "transcription");

    let now = chrono::Utc::now().with_timezone(&ctx.timezone);
    let moment = extract_moment(&transcript.text, now);

    match ctx.interpreter.interpret(&transcript, moment).await {
        Interpretation::Act(action) => ctx.calendar.dispatch(&action).await,
        Interpretation::Clarify => CLARIFY_MESSAGE.to_string(),
        Interpretation::Failed(message) => message,
    }
}

async fn speak(ctx: &AppContext, response: &str) {
    if let Some(voice) = &ctx.voice {
        if let Err(err) = voice.speak(response).await {
            warn!(error = %err, "speech synthesis failed");
        }
    }
}
