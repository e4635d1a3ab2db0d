//! TOML configuration file loading
//!
//! Supports `~/.config/lumen/config.toml` as a persistent config source.
//! All fields are optional — the file is a partial overlay on top of
//! defaults, and env vars override the file.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LumenConfigFile {
    /// Assistant identity
    #[serde(default)]
    pub assistant: AssistantFileConfig,

    /// Voice/audio configuration
    #[serde(default)]
    pub voice: VoiceFileConfig,

    /// Video overlay configuration
    #[serde(default)]
    pub overlay: OverlayFileConfig,

    /// API keys for external services
    #[serde(default)]
    pub api_keys: ApiKeysFileConfig,
}

/// Assistant identity configuration
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct AssistantFileConfig {
    /// Spoken name (e.g. "Lumen")
    pub name: Option<String>,

    /// Wake word stripped from transcripts; defaults to the lowercase name
    pub wake_word: Option<String>,
}

/// Voice processing configuration
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct VoiceFileConfig {
    /// STT model (e.g. "whisper-1", "nova-2")
    pub stt_model: Option<String>,

    /// TTS model (e.g. "tts-1")
    pub tts_model: Option<String>,

    /// TTS voice identifier (e.g. "alloy", or an `ElevenLabs` voice ID)
    pub tts_voice: Option<String>,

    /// TTS speed multiplier
    pub tts_speed: Option<f64>,

    /// Seconds to wait for an utterance before giving up a cycle
    pub listen_timeout_secs: Option<u64>,
}

/// Video overlay configuration
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct OverlayFileConfig {
    /// Enable the video display sub-loop
    pub enabled: Option<bool>,

    /// Path to the overlay image (PNG/JPEG; alpha respected)
    pub image: Option<String>,
}

/// API keys configuration
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ApiKeysFileConfig {
    pub openai: Option<String>,
    pub elevenlabs: Option<String>,
    pub deepgram: Option<String>,
    pub whatsapp: Option<String>,
    pub whatsapp_phone_id: Option<String>,
}

/// Load the TOML config file from the standard path
///
/// Returns `LumenConfigFile::default()` if the file doesn't exist or can't
/// be parsed.
#[must_use]
pub fn load_config_file() -> LumenConfigFile {
    let Some(path) = config_file_path() else {
        return LumenConfigFile::default();
    };

    if !path.exists() {
        return LumenConfigFile::default();
    }

    match std::fs::read_to_string(&path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded config file");
                config
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse config file, using defaults"
                );
                LumenConfigFile::default()
            }
        },
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to read config file"
            );
            LumenConfigFile::default()
        }
    }
}

/// Return the config file path: `~/.config/lumen/config.toml`
#[must_use]
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("lumen").join("config.toml"))
}
