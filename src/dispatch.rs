//! Action dispatch
//!
//! Routes a classified intent and its extracted arguments to the bound
//! capability and produces the reply to speak. Side effects per cycle are
//! confined to at most one external-service invocation here; the single
//! speech-synthesis call is made by the session loop on the returned
//! [`SpokenReply`].

use std::sync::Arc;

use chrono::{DateTime, Local};

use crate::channels::{Channel, OutgoingMessage};
use crate::command::{CommandArgs, ExtractionError};
use crate::intent::Intent;
use crate::lookup::Encyclopedia;
use crate::media::MediaPlayer;

/// Sentence limit for encyclopedia summaries
const SUMMARY_SENTENCES: usize = 2;

/// Wall-clock time format (12-hour, zero-padded)
pub const TIME_FORMAT: &str = "%I:%M %p";

/// Date format (day / month / year)
pub const DATE_FORMAT: &str = "%d / %m / %Y";

/// Wall-clock source, injectable for tests
pub trait Clock: Send + Sync {
    /// The current local time
    fn now(&self) -> DateTime<Local>;
}

/// The real system clock
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Text to render through speech synthesis, plus the loop-termination flag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpokenReply {
    /// What to say
    pub text: String,
    /// Whether the dispatch loop should stop listening after this cycle
    pub terminal: bool,
}

impl SpokenReply {
    fn done(text: impl Into<String>) -> Self {
        Self { text: text.into(), terminal: true }
    }

    fn listening(text: impl Into<String>) -> Self {
        Self { text: text.into(), terminal: false }
    }
}

/// Routes intents to capabilities
///
/// Capabilities are injected as session-scoped handles rather than globals,
/// so tests can substitute fakes for every external collaborator.
pub struct Dispatcher {
    assistant_name: String,
    encyclopedia: Arc<dyn Encyclopedia>,
    messenger: Arc<dyn Channel>,
    media: Arc<dyn MediaPlayer>,
    clock: Arc<dyn Clock>,
}

impl Dispatcher {
    /// Create a dispatcher over the given capability handles
    #[must_use]
    pub fn new(
        assistant_name: String,
        encyclopedia: Arc<dyn Encyclopedia>,
        messenger: Arc<dyn Channel>,
        media: Arc<dyn MediaPlayer>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            assistant_name,
            encyclopedia,
            messenger,
            media,
            clock,
        }
    }

    /// Dispatch one command cycle
    ///
    /// Extraction failures arrive here as the `Err` side and become spoken
    /// errors; no error crosses this boundary unhandled.
    pub async fn dispatch(
        &self,
        intent: Intent,
        args: Result<CommandArgs, ExtractionError>,
    ) -> SpokenReply {
        let args = match args {
            Ok(args) => args,
            Err(e) => return Self::extraction_reply(intent, &e),
        };

        match (intent, args) {
            (Intent::Greeting, _) => {
                SpokenReply::done("I am doing well, how can I assist you today?")
            }

            (Intent::Identity, _) => SpokenReply::done(format!(
                "I am {}, your personal assistant.",
                self.assistant_name
            )),

            (Intent::WikiLookup, CommandArgs::Subject(subject)) => {
                match self.encyclopedia.summary(&subject, SUMMARY_SENTENCES).await {
                    Ok(summary) => SpokenReply::done(summary),
                    Err(e) => {
                        tracing::warn!(%subject, error = %e, "lookup failed");
                        SpokenReply::done(format!(
                            "Sorry, I couldn't find anything about {subject}."
                        ))
                    }
                }
            }

            (Intent::TimeQuery, _) => {
                let now = self.clock.now().format(TIME_FORMAT);
                SpokenReply::done(format!("Current time is {now}"))
            }

            (Intent::DateQuery, _) => {
                let today = self.clock.now().format(DATE_FORMAT);
                SpokenReply::done(format!("Today's date is {today}"))
            }

            (Intent::PlayMedia, CommandArgs::SearchTerm(term)) => {
                match self.media.play(&term) {
                    Ok(()) => SpokenReply::done(format!("Playing {term}")),
                    Err(e) => {
                        tracing::warn!(%term, error = %e, "media playback failed");
                        SpokenReply::done("Sorry, I couldn't start playback.")
                    }
                }
            }

            (Intent::SendMessage, CommandArgs::Message(request)) => {
                let outgoing = OutgoingMessage::text(request.destination, request.body);
                match self.messenger.send(outgoing).await {
                    Ok(()) => SpokenReply::listening("Message sent successfully."),
                    Err(e) => {
                        tracing::warn!(error = %e, "message send failed");
                        SpokenReply::listening(
                            "There was an error sending the message. Please try again.",
                        )
                    }
                }
            }

            (Intent::Calculate, CommandArgs::Calculation(calc)) => match calc.evaluate() {
                Some(result) => SpokenReply::done(format!("The result is {result}")),
                None => SpokenReply::done("I can't divide by zero. Please try again."),
            },

            (Intent::Unknown, _) => {
                SpokenReply::listening("I can't help you with that yet, but I'm still learning.")
            }

            // Intent/args mismatch cannot be produced by extract(); answer
            // as unknown rather than crashing mid-session.
            (intent, args) => {
                tracing::error!(?intent, ?args, "intent/args mismatch");
                SpokenReply::listening("I can't help you with that yet, but I'm still learning.")
            }
        }
    }

    /// Spoken reply for an extraction failure
    ///
    /// Terminality follows the intent's own flag: a failed calculation still
    /// ends the loop, a failed message command keeps listening.
    fn extraction_reply(intent: Intent, error: &ExtractionError) -> SpokenReply {
        tracing::warn!(?intent, %error, "argument extraction failed");
        match intent {
            Intent::Calculate => match error {
                ExtractionError::UnknownOperator => {
                    SpokenReply::done("I couldn't understand the calculation. Please try again.")
                }
                _ => SpokenReply::done(
                    "There was an error performing the calculation. Please try again.",
                ),
            },
            Intent::SendMessage => SpokenReply::listening(
                "I couldn't understand the phone number or message. \
                 Please try again, specifying to and message.",
            ),
            _ => SpokenReply::listening("Sorry, I didn't catch that."),
        }
    }
}
