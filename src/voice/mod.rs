//! Voice input and output
//!
//! Composes microphone capture + STT into the session's speech source, and
//! TTS + speaker playback into its synthesizer. Both sides are traits so
//! the session loop can run against fakes in tests.

mod capture;
mod playback;
mod stt;
mod tts;

pub use capture::{Microphone, SAMPLE_RATE, UtteranceGate, rms_energy, samples_to_wav};
pub use playback::Speaker;
pub use stt::SpeechToText;
pub use tts::TextToSpeech;

use std::time::Duration;

use async_trait::async_trait;

use crate::Result;
use crate::config::Config;
use crate::intent::Transcript;

/// Outcome of one listening cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenOutcome {
    /// Speech was recognized and normalized
    Heard(Transcript),
    /// Audio was captured but could not be understood
    Unintelligible,
    /// The recognition service (or capture device) failed
    ServiceUnavailable,
}

/// Produces one transcript per listening cycle
#[async_trait(?Send)]
pub trait SpeechSource {
    /// Listen for a single utterance
    async fn listen(&mut self) -> ListenOutcome;
}

/// Renders reply text as speech
#[async_trait(?Send)]
pub trait Synthesizer {
    /// Speak the text, blocking until spoken
    ///
    /// # Errors
    ///
    /// Returns error if synthesis or playback fails
    async fn speak(&mut self, text: &str) -> Result<()>;
}

/// Minimum utterance length worth sending to the recognizer
const MIN_UTTERANCE_SAMPLES: usize = SAMPLE_RATE as usize / 2;

/// Microphone + STT composed into a [`SpeechSource`]
pub struct VoiceInput {
    microphone: Microphone,
    stt: SpeechToText,
    wake_word: Option<String>,
    listen_timeout: Duration,
}

impl VoiceInput {
    /// Open the microphone and build the transcriber from config
    ///
    /// # Errors
    ///
    /// Returns error if the device cannot be opened or no STT key is set
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            microphone: Microphone::open()?,
            stt: SpeechToText::from_config(config)?,
            wake_word: config.assistant.wake_word.clone(),
            listen_timeout: Duration::from_secs(config.voice.listen_timeout_secs),
        })
    }
}

#[async_trait(?Send)]
impl SpeechSource for VoiceInput {
    async fn listen(&mut self) -> ListenOutcome {
        tracing::info!("listening...");

        let samples = match self.microphone.record_utterance(self.listen_timeout).await {
            Ok(samples) => samples,
            Err(e) => {
                tracing::error!(error = %e, "capture failed");
                return ListenOutcome::ServiceUnavailable;
            }
        };

        if samples.len() < MIN_UTTERANCE_SAMPLES {
            return ListenOutcome::Unintelligible;
        }

        let wav = match samples_to_wav(&samples, SAMPLE_RATE) {
            Ok(wav) => wav,
            Err(e) => {
                tracing::error!(error = %e, "WAV encoding failed");
                return ListenOutcome::ServiceUnavailable;
            }
        };

        match self.stt.transcribe(wav).await {
            Ok(text) => {
                let transcript = Transcript::new(&text, self.wake_word.as_deref());
                if transcript.is_empty() {
                    ListenOutcome::Unintelligible
                } else {
                    tracing::info!(%transcript, "command recognized");
                    ListenOutcome::Heard(transcript)
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "recognition service failed");
                ListenOutcome::ServiceUnavailable
            }
        }
    }
}

/// TTS + speaker composed into a [`Synthesizer`]
pub struct VoiceOutput {
    tts: TextToSpeech,
    speaker: Speaker,
}

impl VoiceOutput {
    /// Open the speaker and build the synthesizer from config
    ///
    /// # Errors
    ///
    /// Returns error if the device cannot be opened or no TTS key is set
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            tts: TextToSpeech::from_config(config)?,
            speaker: Speaker::open()?,
        })
    }
}

#[async_trait(?Send)]
impl Synthesizer for VoiceOutput {
    async fn speak(&mut self, text: &str) -> Result<()> {
        tracing::debug!(text, "speaking");
        let audio = self.tts.synthesize(text).await?;
        self.speaker.play_mp3(&audio)
    }
}
