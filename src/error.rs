//! Error types for the Lumen assistant

use thiserror::Error;

/// Result type alias for Lumen operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the Lumen assistant
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Audio error
    #[error("audio error: {0}")]
    Audio(String),

    /// Speech-to-text error
    #[error("STT error: {0}")]
    Stt(String),

    /// Text-to-speech error
    #[error("TTS error: {0}")]
    Tts(String),

    /// Encyclopedia lookup error
    #[error("lookup error: {0}")]
    Lookup(String),

    /// Messaging channel error
    #[error("channel error: {0}")]
    Channel(String),

    /// Media playback error
    #[error("media error: {0}")]
    Media(String),

    /// Overlay asset error
    #[error("overlay error: {0}")]
    Overlay(String),

    /// Video frame source/sink error
    #[error("video error: {0}")]
    Video(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Image decoding error
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}
