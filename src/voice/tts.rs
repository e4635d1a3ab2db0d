//! Text-to-speech
//!
//! Renders reply text to MP3 audio through a hosted synthesis API.
//! Provider is chosen from configured API keys: `OpenAI` when an `OpenAI`
//! key is present, `ElevenLabs` otherwise.

use crate::config::Config;
use crate::{Error, Result};

/// Synthesis provider backend, carrying its provider-specific settings
#[derive(Debug)]
enum TtsProvider {
    OpenAi { voice: String, speed: f64 },
    ElevenLabs { voice_id: String },
}

/// Synthesizes speech from text
pub struct TextToSpeech {
    client: reqwest::Client,
    api_key: String,
    model: String,
    provider: TtsProvider,
}

impl TextToSpeech {
    /// Build a synthesizer from configured API keys
    ///
    /// # Errors
    ///
    /// Returns error if neither an `OpenAI` nor an `ElevenLabs` key is configured
    pub fn from_config(config: &Config) -> Result<Self> {
        if let Some(key) = &config.api_keys.openai {
            return Ok(Self {
                client: reqwest::Client::new(),
                api_key: key.clone(),
                model: config.voice.tts_model.clone(),
                provider: TtsProvider::OpenAi {
                    voice: config.voice.tts_voice.clone(),
                    speed: config.voice.tts_speed,
                },
            });
        }

        if let Some(key) = &config.api_keys.elevenlabs {
            return Ok(Self {
                client: reqwest::Client::new(),
                api_key: key.clone(),
                model: "eleven_monolingual_v1".to_string(),
                provider: TtsProvider::ElevenLabs {
                    voice_id: config.voice.tts_voice.clone(),
                },
            });
        }

        Err(Error::Config(
            "an OpenAI or ElevenLabs API key is required for speech synthesis".to_string(),
        ))
    }

    /// Synthesize text to MP3 audio bytes
    ///
    /// # Errors
    ///
    /// Returns error if synthesis fails
    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        match &self.provider {
            TtsProvider::OpenAi { voice, speed } => {
                self.synthesize_openai(text, voice, *speed).await
            }
            TtsProvider::ElevenLabs { voice_id } => {
                self.synthesize_elevenlabs(text, voice_id).await
            }
        }
    }

    async fn synthesize_openai(&self, text: &str, voice: &str, speed: f64) -> Result<Vec<u8>> {
        let request = serde_json::json!({
            "model": self.model,
            "input": text,
            "voice": voice,
            "speed": speed,
        });

        let response = self
            .client
            .post("https://api.openai.com/v1/audio/speech")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Tts(format!("OpenAI TTS error {status}: {body}")));
        }

        let audio = response.bytes().await?;
        Ok(audio.to_vec())
    }

    async fn synthesize_elevenlabs(&self, text: &str, voice_id: &str) -> Result<Vec<u8>> {
        let url = format!("https://api.elevenlabs.io/v1/text-to-speech/{voice_id}");

        let request = serde_json::json!({
            "text": text,
            "model_id": self.model,
        });

        let response = self
            .client
            .post(&url)
            .header("xi-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Tts(format!("ElevenLabs TTS error {status}: {body}")));
        }

        let audio = response.bytes().await?;
        Ok(audio.to_vec())
    }
}
