//! Speech-to-text
//!
//! Sends captured WAV audio to a hosted transcription API. Provider is
//! chosen from configured API keys: `OpenAI` Whisper when an `OpenAI` key is
//! present, Deepgram otherwise.

use crate::config::Config;
use crate::{Error, Result};

/// Transcription provider backend
#[derive(Clone, Copy, Debug)]
enum SttProvider {
    Whisper,
    Deepgram,
}

/// Transcribes speech to text
pub struct SpeechToText {
    client: reqwest::Client,
    api_key: String,
    model: String,
    provider: SttProvider,
}

/// Response from the Whisper transcription API
#[derive(serde::Deserialize)]
struct WhisperResponse {
    text: String,
}

/// Response from the Deepgram transcription API, reduced to the first
/// alternative of the first channel
#[derive(serde::Deserialize)]
struct DeepgramResponse {
    results: DeepgramResults,
}

#[derive(serde::Deserialize)]
struct DeepgramResults {
    channels: Vec<DeepgramChannel>,
}

#[derive(serde::Deserialize)]
struct DeepgramChannel {
    alternatives: Vec<DeepgramAlternative>,
}

#[derive(serde::Deserialize)]
struct DeepgramAlternative {
    transcript: String,
}

impl SpeechToText {
    /// Build a transcriber from configured API keys
    ///
    /// # Errors
    ///
    /// Returns error if neither an `OpenAI` nor a Deepgram key is configured
    pub fn from_config(config: &Config) -> Result<Self> {
        if let Some(key) = &config.api_keys.openai {
            return Ok(Self {
                client: reqwest::Client::new(),
                api_key: key.clone(),
                model: config.voice.stt_model.clone(),
                provider: SttProvider::Whisper,
            });
        }

        if let Some(key) = &config.api_keys.deepgram {
            return Ok(Self {
                client: reqwest::Client::new(),
                api_key: key.clone(),
                model: config.voice.stt_model.clone(),
                provider: SttProvider::Deepgram,
            });
        }

        Err(Error::Config(
            "an OpenAI or Deepgram API key is required for speech recognition".to_string(),
        ))
    }

    /// Transcribe WAV audio to text
    ///
    /// # Errors
    ///
    /// Returns error if the transcription service fails; the caller treats
    /// any error here as the service being unavailable for this cycle.
    pub async fn transcribe(&self, wav: Vec<u8>) -> Result<String> {
        tracing::debug!(
            audio_bytes = wav.len(),
            provider = ?self.provider,
            "transcribing"
        );

        match self.provider {
            SttProvider::Whisper => self.transcribe_whisper(wav).await,
            SttProvider::Deepgram => self.transcribe_deepgram(wav).await,
        }
    }

    async fn transcribe_whisper(&self, wav: Vec<u8>) -> Result<String> {
        let form = reqwest::multipart::Form::new()
            .part(
                "file",
                reqwest::multipart::Part::bytes(wav)
                    .file_name("audio.wav")
                    .mime_str("audio/wav")
                    .map_err(|e| Error::Stt(e.to_string()))?,
            )
            .text("model", self.model.clone());

        let response = self
            .client
            .post("https://api.openai.com/v1/audio/transcriptions")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Whisper API error");
            return Err(Error::Stt(format!("Whisper API error {status}")));
        }

        let result: WhisperResponse = response.json().await?;
        tracing::info!(transcript = %result.text, "transcription complete");
        Ok(result.text)
    }

    async fn transcribe_deepgram(&self, wav: Vec<u8>) -> Result<String> {
        let url = format!(
            "https://api.deepgram.com/v1/listen?model={}&punctuate=true",
            self.model
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Token {}", self.api_key))
            .header("Content-Type", "audio/wav")
            .body(wav)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Deepgram API error");
            return Err(Error::Stt(format!("Deepgram API error {status}")));
        }

        let result: DeepgramResponse = response.json().await?;
        let transcript = result
            .results
            .channels
            .first()
            .and_then(|c| c.alternatives.first())
            .map(|a| a.transcript.clone())
            .unwrap_or_default();

        tracing::info!(transcript = %transcript, "transcription complete");
        Ok(transcript)
    }
}
