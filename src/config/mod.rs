//! Configuration management
//!
//! Layered resolution: environment variables override the TOML config file,
//! which overrides built-in defaults.

pub mod file;

use std::path::PathBuf;

use crate::Result;

/// Default assistant name
const DEFAULT_NAME: &str = "Lumen";

/// Assistant configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Assistant identity
    pub assistant: AssistantConfig,

    /// Voice configuration
    pub voice: VoiceConfig,

    /// Video overlay configuration
    pub overlay: OverlayConfig,

    /// API keys
    pub api_keys: ApiKeys,
}

/// Assistant identity
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    /// Spoken name, used in the identity reply
    pub name: String,

    /// Wake word stripped from transcripts when present
    pub wake_word: Option<String>,
}

/// Voice processing configuration
#[derive(Debug, Clone)]
pub struct VoiceConfig {
    /// STT model (e.g. "whisper-1", "nova-2")
    pub stt_model: String,

    /// TTS model (e.g. "tts-1")
    pub tts_model: String,

    /// TTS voice identifier
    pub tts_voice: String,

    /// TTS speed multiplier (0.25 to 4.0)
    pub tts_speed: f64,

    /// Seconds to wait for an utterance before giving up a cycle
    pub listen_timeout_secs: u64,
}

/// Video overlay configuration
#[derive(Debug, Clone)]
pub struct OverlayConfig {
    /// Whether the display sub-loop runs at all
    pub enabled: bool,

    /// Path to the overlay image asset
    pub image_path: PathBuf,
}

/// API keys for external services
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    /// `OpenAI` API key (Whisper STT and TTS)
    pub openai: Option<String>,

    /// `ElevenLabs` API key (optional TTS)
    pub elevenlabs: Option<String>,

    /// `Deepgram` API key (optional STT)
    pub deepgram: Option<String>,

    /// `WhatsApp` Business API access token
    pub whatsapp: Option<String>,

    /// `WhatsApp` phone number ID
    pub whatsapp_phone_id: Option<String>,
}

impl Config {
    /// Load configuration
    ///
    /// # Errors
    ///
    /// Returns error if a config value fails to parse
    pub fn load() -> Result<Self> {
        Self::load_with_options(false)
    }

    /// Load configuration with an explicit overlay disable option
    ///
    /// # Errors
    ///
    /// Returns error if a config value fails to parse
    pub fn load_with_options(disable_overlay: bool) -> Result<Self> {
        // env > toml > default
        let fc = file::load_config_file();

        let name = std::env::var("LUMEN_NAME")
            .ok()
            .or(fc.assistant.name)
            .unwrap_or_else(|| DEFAULT_NAME.to_string());

        // The wake word defaults to the lowercase assistant name; an empty
        // string disables stripping entirely.
        let wake_word = std::env::var("LUMEN_WAKE_WORD")
            .ok()
            .or(fc.assistant.wake_word)
            .map_or_else(|| Some(name.to_lowercase()), |w| {
                let w = w.trim().to_lowercase();
                if w.is_empty() { None } else { Some(w) }
            });

        let assistant = AssistantConfig { name, wake_word };

        let voice = VoiceConfig {
            stt_model: std::env::var("LUMEN_STT_MODEL")
                .ok()
                .or(fc.voice.stt_model)
                .unwrap_or_else(|| "whisper-1".to_string()),
            tts_model: std::env::var("LUMEN_TTS_MODEL")
                .ok()
                .or(fc.voice.tts_model)
                .unwrap_or_else(|| "tts-1".to_string()),
            tts_voice: std::env::var("LUMEN_TTS_VOICE")
                .ok()
                .or(fc.voice.tts_voice)
                .unwrap_or_else(|| "alloy".to_string()),
            tts_speed: std::env::var("LUMEN_TTS_SPEED")
                .ok()
                .and_then(|s| s.parse().ok())
                .or(fc.voice.tts_speed)
                .unwrap_or(1.0),
            listen_timeout_secs: std::env::var("LUMEN_LISTEN_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .or(fc.voice.listen_timeout_secs)
                .unwrap_or(8),
        };

        let overlay_enabled = if disable_overlay {
            false
        } else {
            fc.overlay.enabled.unwrap_or(true)
        };
        let overlay = OverlayConfig {
            enabled: overlay_enabled,
            image_path: std::env::var("LUMEN_OVERLAY_IMAGE")
                .ok()
                .or(fc.overlay.image)
                .map_or_else(default_overlay_path, PathBuf::from),
        };

        if disable_overlay {
            tracing::info!("video overlay explicitly disabled");
        }

        let api_keys = ApiKeys {
            openai: std::env::var("OPENAI_API_KEY").ok().or(fc.api_keys.openai),
            elevenlabs: std::env::var("ELEVENLABS_API_KEY")
                .ok()
                .or(fc.api_keys.elevenlabs),
            deepgram: std::env::var("DEEPGRAM_API_KEY")
                .ok()
                .or(fc.api_keys.deepgram),
            whatsapp: std::env::var("WHATSAPP_TOKEN").ok().or(fc.api_keys.whatsapp),
            whatsapp_phone_id: std::env::var("WHATSAPP_PHONE_ID")
                .ok()
                .or(fc.api_keys.whatsapp_phone_id),
        };

        Ok(Self {
            assistant,
            voice,
            overlay,
            api_keys,
        })
    }
}

/// Default overlay asset path: `~/.config/lumen/overlay.png`
fn default_overlay_path() -> PathBuf {
    directories::BaseDirs::new().map_or_else(
        || PathBuf::from("overlay.png"),
        |d| d.config_dir().join("lumen").join("overlay.png"),
    )
}
