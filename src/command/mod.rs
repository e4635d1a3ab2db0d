//! Argument extraction
//!
//! Turns an intent plus the transcript it was classified from into typed
//! arguments. Splitting is heuristic by design (substring markers, no real
//! grammar); every failure mode is an explicit [`ExtractionError`] that the
//! dispatcher converts into a spoken reply.

mod calc;
mod message;

pub use calc::{Calculation, Operator};
pub use message::MessageRequest;

use thiserror::Error;

use crate::intent::{Intent, Transcript, trigger_for};

/// Why argument extraction failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    /// An operand segment did not parse as a decimal number
    #[error("\"{0}\" is not a number")]
    MalformedOperand(String),

    /// Not exactly two operands around the operator
    #[error("expected exactly two operands")]
    Arity,

    /// No operator marker found in a calculation
    #[error("no arithmetic operator found")]
    UnknownOperator,

    /// A required delimiter word is absent
    #[error("missing \"{0}\" marker")]
    MissingDelimiter(&'static str),

    /// A message field was empty after extraction
    #[error("empty {0}")]
    EmptyField(&'static str),
}

/// Typed arguments for a dispatchable command
#[derive(Debug, Clone, PartialEq)]
pub enum CommandArgs {
    /// Intent takes no arguments
    None,
    /// Binary arithmetic operation
    Calculation(Calculation),
    /// Encyclopedia lookup subject (may be empty)
    Subject(String),
    /// Media search term
    SearchTerm(String),
    /// Message destination and body
    Message(MessageRequest),
}

/// Extract typed arguments for an intent from its transcript
///
/// # Errors
///
/// Returns an [`ExtractionError`] when the transcript does not carry the
/// arguments the intent requires. Never panics; callers must handle both
/// outcomes explicitly.
pub fn extract(intent: Intent, transcript: &Transcript) -> Result<CommandArgs, ExtractionError> {
    match intent {
        Intent::Greeting
        | Intent::Identity
        | Intent::TimeQuery
        | Intent::DateQuery
        | Intent::Unknown => Ok(CommandArgs::None),

        // Empty subject is a valid (if unhelpful) lookup; passed through.
        Intent::WikiLookup => Ok(CommandArgs::Subject(strip_trigger(intent, transcript))),

        Intent::PlayMedia => Ok(CommandArgs::SearchTerm(strip_trigger(intent, transcript))),

        Intent::SendMessage => message::parse(transcript).map(CommandArgs::Message),

        Intent::Calculate => calc::parse(transcript).map(CommandArgs::Calculation),
    }
}

/// Remove the intent's trigger phrase from the transcript and trim
fn strip_trigger(intent: Intent, transcript: &Transcript) -> String {
    trigger_for(intent).map_or_else(
        || transcript.as_str().to_string(),
        |trigger| transcript.as_str().replacen(trigger, "", 1).trim().to_string(),
    )
}
