//! Intent classification
//!
//! Maps a normalized transcript to one of a fixed set of intents using an
//! ordered trigger-phrase table. Order matters: triggers are not mutually
//! exclusive, so the first matching rule wins.

/// A normalized speech transcript
///
/// Lowercased and trimmed, with the configured wake word stripped out.
/// Created once per listening cycle and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript(String);

impl Transcript {
    /// Normalize raw recognized text into a transcript
    ///
    /// Lowercases, removes every occurrence of the wake word (if one is
    /// configured), and trims surrounding whitespace.
    #[must_use]
    pub fn new(raw: &str, wake_word: Option<&str>) -> Self {
        let mut text = raw.to_lowercase();
        if let Some(word) = wake_word {
            let word = word.to_lowercase();
            if !word.is_empty() {
                text = text.replace(&word, "");
            }
        }
        Self(text.trim().to_string())
    }

    /// The normalized text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the transcript is empty after normalization
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for Transcript {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The classified purpose of a spoken command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// "how are you" pleasantry
    Greeting,
    /// "what is your name"
    Identity,
    /// Encyclopedia lookup ("who is ...")
    WikiLookup,
    /// Current wall-clock time
    TimeQuery,
    /// Current date
    DateQuery,
    /// Media search and playback ("play ...")
    PlayMedia,
    /// Send a message ("send whatsapp message to ... message ...")
    SendMessage,
    /// Arithmetic ("calculate ...")
    Calculate,
    /// No trigger matched
    Unknown,
}

/// Ordered trigger-phrase rules, highest precedence first
///
/// The order is load-bearing: "what time and date" contains both "time" and
/// "date" and must resolve to `TimeQuery`.
pub const RULES: &[(&str, Intent)] = &[
    ("how are you", Intent::Greeting),
    ("what is your name", Intent::Identity),
    ("who is", Intent::WikiLookup),
    ("time", Intent::TimeQuery),
    ("date", Intent::DateQuery),
    ("play", Intent::PlayMedia),
    ("send whatsapp message", Intent::SendMessage),
    ("calculate", Intent::Calculate),
];

/// Classify a transcript into an intent
///
/// Evaluates the rule table in order and returns the intent bound to the
/// first trigger found as a substring, or [`Intent::Unknown`] if none match.
/// No side effects; always terminates.
#[must_use]
pub fn classify(transcript: &Transcript) -> Intent {
    for (trigger, intent) in RULES {
        if transcript.as_str().contains(trigger) {
            return *intent;
        }
    }
    Intent::Unknown
}

/// The trigger phrase bound to an intent in the rule table
///
/// Returns `None` for intents without a trigger (`Unknown`).
#[must_use]
pub fn trigger_for(intent: Intent) -> Option<&'static str> {
    RULES
        .iter()
        .find(|(_, i)| *i == intent)
        .map(|(trigger, _)| *trigger)
}
