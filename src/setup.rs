//! Interactive first-run setup wizard (`lumen setup`)

use std::path::PathBuf;

use dialoguer::{Confirm, Input};

use crate::config::file::{
    ApiKeysFileConfig, AssistantFileConfig, LumenConfigFile, OverlayFileConfig, VoiceFileConfig,
};

/// Run the interactive setup wizard
///
/// # Errors
///
/// Returns error if user input fails or the config cannot be written
pub fn run_setup() -> anyhow::Result<()> {
    println!("Lumen Setup\n");

    let existing = crate::config::file::load_config_file();
    let config_path = crate::config::file::config_file_path()
        .unwrap_or_else(|| PathBuf::from("~/.config/lumen/config.toml"));

    if config_path.exists() {
        println!("Existing config found at {}\n", config_path.display());
    }

    // 1. Assistant identity
    let name: String = Input::new()
        .with_prompt("Assistant name")
        .default(existing.assistant.name.unwrap_or_else(|| "Lumen".to_string()))
        .interact_text()?;

    let wake_word: String = Input::new()
        .with_prompt("Wake word (stripped from commands; empty to disable)")
        .default(
            existing
                .assistant
                .wake_word
                .unwrap_or_else(|| name.to_lowercase()),
        )
        .allow_empty(true)
        .interact_text()?;

    // 2. Speech services
    let openai: String = Input::new()
        .with_prompt("OpenAI API key (Whisper STT + TTS; empty to skip)")
        .default(existing.api_keys.openai.unwrap_or_default())
        .allow_empty(true)
        .interact_text()?;

    let deepgram: String = Input::new()
        .with_prompt("Deepgram API key (alternative STT; empty to skip)")
        .default(existing.api_keys.deepgram.unwrap_or_default())
        .allow_empty(true)
        .interact_text()?;

    let elevenlabs: String = Input::new()
        .with_prompt("ElevenLabs API key (alternative TTS; empty to skip)")
        .default(existing.api_keys.elevenlabs.unwrap_or_default())
        .allow_empty(true)
        .interact_text()?;

    if openai.is_empty() && (deepgram.is_empty() || elevenlabs.is_empty()) {
        println!("\nNote: without an OpenAI key you need both Deepgram (STT) and ElevenLabs (TTS).");
    }

    // 3. Messaging
    let whatsapp = if Confirm::new()
        .with_prompt("Configure WhatsApp messaging?")
        .default(existing.api_keys.whatsapp.is_some())
        .interact()?
    {
        let token: String = Input::new()
            .with_prompt("WhatsApp Business API access token")
            .default(existing.api_keys.whatsapp.unwrap_or_default())
            .interact_text()?;
        let phone_id: String = Input::new()
            .with_prompt("WhatsApp phone number ID")
            .default(existing.api_keys.whatsapp_phone_id.unwrap_or_default())
            .interact_text()?;
        (field(&token), field(&phone_id))
    } else {
        (None, None)
    };

    // 4. Video overlay
    let overlay_enabled = Confirm::new()
        .with_prompt("Enable the video overlay display?")
        .default(existing.overlay.enabled.unwrap_or(true))
        .interact()?;

    let overlay_image: String = Input::new()
        .with_prompt("Overlay image path (PNG/JPEG)")
        .default(existing.overlay.image.unwrap_or_default())
        .allow_empty(true)
        .interact_text()?;

    let config = LumenConfigFile {
        assistant: AssistantFileConfig {
            name: field(&name),
            wake_word: Some(wake_word.trim().to_string()),
        },
        voice: VoiceFileConfig {
            stt_model: existing.voice.stt_model,
            tts_model: existing.voice.tts_model,
            tts_voice: existing.voice.tts_voice,
            tts_speed: existing.voice.tts_speed,
            listen_timeout_secs: existing.voice.listen_timeout_secs,
        },
        overlay: OverlayFileConfig {
            enabled: Some(overlay_enabled),
            image: field(&overlay_image),
        },
        api_keys: ApiKeysFileConfig {
            openai: field(&openai),
            elevenlabs: field(&elevenlabs),
            deepgram: field(&deepgram),
            whatsapp: whatsapp.0,
            whatsapp_phone_id: whatsapp.1,
        },
    };

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&config_path, toml::to_string_pretty(&config)?)?;

    println!("\nConfig written to {}", config_path.display());
    println!("Run `lumen` to start the assistant.");

    Ok(())
}

/// Trimmed optional field: empty input means unset
fn field(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
