//! Encyclopedia lookup
//!
//! Fetches article summaries from the Wikipedia REST API and truncates them
//! to a sentence limit before they are spoken.

use async_trait::async_trait;

use crate::{Error, Result};

/// Encyclopedia summary capability
#[async_trait]
pub trait Encyclopedia: Send + Sync {
    /// Look up a subject and return a summary of at most `sentences` sentences
    ///
    /// # Errors
    ///
    /// Returns error if the subject cannot be resolved or the service fails
    async fn summary(&self, subject: &str, sentences: usize) -> Result<String>;
}

/// Response from the Wikipedia page-summary API
#[derive(serde::Deserialize)]
struct SummaryResponse {
    extract: String,
}

/// Wikipedia REST API client
pub struct WikipediaClient {
    client: reqwest::Client,
    base_url: String,
}

impl WikipediaClient {
    /// Create a client against the public English Wikipedia API
    #[must_use]
    pub fn new() -> Self {
        Self::with_base_url("https://en.wikipedia.org/api/rest_v1".to_string())
    }

    /// Create a client against a custom API base URL
    #[must_use]
    pub fn with_base_url(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }
}

impl Default for WikipediaClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Encyclopedia for WikipediaClient {
    async fn summary(&self, subject: &str, sentences: usize) -> Result<String> {
        let title = subject.trim().replace(' ', "_");
        let url = format!(
            "{}/page/summary/{}",
            self.base_url,
            urlencoding::encode(&title)
        );

        tracing::debug!(subject, url = %url, "looking up summary");

        let response = self.client.get(&url).send().await.map_err(|e| {
            tracing::error!(error = %e, "lookup request failed");
            e
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, body = %body, "lookup API error");
            return Err(Error::Lookup(format!("summary API error {status}")));
        }

        let result: SummaryResponse = response.json().await?;
        if result.extract.trim().is_empty() {
            return Err(Error::Lookup(format!("no summary for \"{subject}\"")));
        }

        Ok(truncate_sentences(&result.extract, sentences))
    }
}

/// Keep at most the first `limit` sentences of a summary
///
/// Sentence boundaries are ". " runs; good enough for encyclopedia prose.
#[must_use]
pub fn truncate_sentences(text: &str, limit: usize) -> String {
    if limit == 0 {
        return String::new();
    }

    let mut remaining = limit;
    let mut end = text.len();
    for (i, _) in text.match_indices(". ") {
        remaining -= 1;
        if remaining == 0 {
            end = i + 1;
            break;
        }
    }

    text[..end].trim().to_string()
}
