//! Messaging channel adapters
//!
//! Each channel implements the `Channel` trait to provide unified outbound
//! messaging. This system only sends; receiving is out of scope.

mod whatsapp;

use async_trait::async_trait;

pub use whatsapp::WhatsAppChannel;

use crate::Result;

/// A message to send to a channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    /// Destination identifier (platform-specific, e.g. a phone number)
    pub destination: String,

    /// Message content (plain text)
    pub content: String,
}

impl OutgoingMessage {
    /// Create a simple text message
    #[must_use]
    pub fn text(destination: String, content: String) -> Self {
        Self {
            destination,
            content,
        }
    }
}

/// Trait for messaging channel adapters
#[async_trait]
pub trait Channel: Send + Sync {
    /// Get the channel name
    fn name(&self) -> &'static str;

    /// Validate configuration and mark the channel ready
    ///
    /// # Errors
    ///
    /// Returns error if the channel is misconfigured
    async fn connect(&mut self) -> Result<()>;

    /// Send a message
    ///
    /// # Errors
    ///
    /// Returns error if the send fails
    async fn send(&self, message: OutgoingMessage) -> Result<()>;

    /// Check if connected
    fn is_connected(&self) -> bool;
}

/// Placeholder channel used when no messaging service is configured
///
/// Every send fails, which the dispatcher turns into a spoken apology.
pub struct UnconfiguredChannel;

#[async_trait]
impl Channel for UnconfiguredChannel {
    fn name(&self) -> &'static str {
        "unconfigured"
    }

    async fn connect(&mut self) -> Result<()> {
        Ok(())
    }

    async fn send(&self, _message: OutgoingMessage) -> Result<()> {
        Err(crate::Error::Channel(
            "no messaging channel configured".to_string(),
        ))
    }

    fn is_connected(&self) -> bool {
        false
    }
}
