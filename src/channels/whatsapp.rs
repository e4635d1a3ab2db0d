//! `WhatsApp` channel adapter
//!
//! Uses the `WhatsApp` Business Cloud API for outbound messages.

use async_trait::async_trait;
use reqwest::Client;

use super::{Channel, OutgoingMessage};
use crate::{Error, Result};

/// `WhatsApp` channel adapter
pub struct WhatsAppChannel {
    /// `WhatsApp` Business API access token
    access_token: String,
    /// Phone number ID for sending messages
    phone_number_id: String,
    client: Client,
    connected: bool,
}

impl WhatsAppChannel {
    /// Create a new `WhatsApp` channel adapter
    ///
    /// # Arguments
    ///
    /// * `access_token` - `WhatsApp` Business API access token
    /// * `phone_number_id` - Phone number ID registered with `WhatsApp` Business
    #[must_use]
    pub fn new(access_token: String, phone_number_id: String) -> Self {
        Self {
            access_token,
            phone_number_id,
            client: Client::new(),
            connected: false,
        }
    }

    /// Send a text message to a `WhatsApp` number
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails
    pub async fn send_text(&self, to: &str, text: &str) -> Result<()> {
        let url = format!(
            "https://graph.facebook.com/v18.0/{}/messages",
            self.phone_number_id
        );

        let body = serde_json::json!({
            "messaging_product": "whatsapp",
            "to": to,
            "type": "text",
            "text": {
                "body": text
            }
        });

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.access_token))
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Channel(format!("WhatsApp API error: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Channel(format!(
                "WhatsApp API error: {status} - {body}"
            )));
        }

        tracing::debug!(to, "WhatsApp message sent");
        Ok(())
    }
}

#[async_trait]
impl Channel for WhatsAppChannel {
    fn name(&self) -> &'static str {
        "whatsapp"
    }

    async fn connect(&mut self) -> Result<()> {
        // WhatsApp is stateless HTTP; "connect" validates the configuration
        if self.access_token.is_empty() {
            return Err(Error::Channel(
                "WhatsApp access token required".to_string(),
            ));
        }
        if self.phone_number_id.is_empty() {
            return Err(Error::Channel(
                "WhatsApp phone number ID required".to_string(),
            ));
        }

        self.connected = true;
        tracing::info!("WhatsApp channel connected");
        Ok(())
    }

    async fn send(&self, message: OutgoingMessage) -> Result<()> {
        self.send_text(&message.destination, &message.content).await
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}
