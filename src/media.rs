//! Media search and playback
//!
//! Builds a `YouTube` search URL for a spoken term and hands it to the
//! platform opener. Playback itself happens outside the process; the
//! capability's only contract is "open something playable for this term".

use std::process::Command;

use crate::{Error, Result};

/// Media search-and-play capability
pub trait MediaPlayer: Send + Sync {
    /// Search for the term and start playback
    ///
    /// # Errors
    ///
    /// Returns error if playback cannot be started
    fn play(&self, term: &str) -> Result<()>;
}

/// Opens `YouTube` search results in the system browser
pub struct YoutubePlayer {
    base_url: String,
}

impl YoutubePlayer {
    /// Create a player against the public `YouTube` search page
    #[must_use]
    pub fn new() -> Self {
        Self {
            base_url: "https://www.youtube.com/results".to_string(),
        }
    }

    /// The search URL that would be opened for a term
    #[must_use]
    pub fn search_url(&self, term: &str) -> String {
        format!(
            "{}?search_query={}",
            self.base_url,
            urlencoding::encode(term.trim())
        )
    }
}

impl Default for YoutubePlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaPlayer for YoutubePlayer {
    fn play(&self, term: &str) -> Result<()> {
        let url = self.search_url(term);
        tracing::info!(term, url = %url, "opening media search");
        open_url(&url)
    }
}

/// Open a URL with the platform opener
fn open_url(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    let mut command = {
        let mut c = Command::new("open");
        c.arg(url);
        c
    };

    #[cfg(target_os = "windows")]
    let mut command = {
        let mut c = Command::new("cmd");
        c.args(["/C", "start", "", url]);
        c
    };

    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    let mut command = {
        let mut c = Command::new("xdg-open");
        c.arg(url);
        c
    };

    let status = command
        .status()
        .map_err(|e| Error::Media(format!("failed to launch opener: {e}")))?;

    if !status.success() {
        return Err(Error::Media(format!("opener exited with {status}")));
    }

    Ok(())
}
