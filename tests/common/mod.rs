//! Shared test utilities
//!
//! Fake capabilities standing in for every external collaborator, so the
//! dispatcher can be exercised without audio hardware or network access.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone};

use lumen_assistant::channels::{Channel, OutgoingMessage};
use lumen_assistant::dispatch::Clock;
use lumen_assistant::lookup::Encyclopedia;
use lumen_assistant::media::MediaPlayer;
use lumen_assistant::{Error, Result};

/// Encyclopedia returning a canned summary, or failing when `summary` is None
pub struct FakeEncyclopedia {
    pub summary: Option<String>,
}

#[async_trait]
impl Encyclopedia for FakeEncyclopedia {
    async fn summary(&self, subject: &str, _sentences: usize) -> Result<String> {
        self.summary
            .clone()
            .ok_or_else(|| Error::Lookup(format!("no article for \"{subject}\"")))
    }
}

/// Channel recording every sent message; optionally failing
pub struct RecordingChannel {
    pub sent: Arc<Mutex<Vec<OutgoingMessage>>>,
    pub fail: bool,
}

impl RecordingChannel {
    pub fn new() -> (Self, Arc<Mutex<Vec<OutgoingMessage>>>) {
        let sent = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                sent: Arc::clone(&sent),
                fail: false,
            },
            sent,
        )
    }

    pub fn failing() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            fail: true,
        }
    }
}

#[async_trait]
impl Channel for RecordingChannel {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn connect(&mut self) -> Result<()> {
        Ok(())
    }

    async fn send(&self, message: OutgoingMessage) -> Result<()> {
        if self.fail {
            return Err(Error::Channel("simulated send failure".to_string()));
        }
        self.sent.lock().unwrap().push(message);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        true
    }
}

/// Media player recording every search term
pub struct RecordingMedia {
    pub played: Arc<Mutex<Vec<String>>>,
}

impl RecordingMedia {
    pub fn new() -> (Self, Arc<Mutex<Vec<String>>>) {
        let played = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                played: Arc::clone(&played),
            },
            played,
        )
    }
}

impl MediaPlayer for RecordingMedia {
    fn play(&self, term: &str) -> Result<()> {
        self.played.lock().unwrap().push(term.to_string());
        Ok(())
    }
}

/// Clock pinned to a fixed instant
pub struct FixedClock(pub DateTime<Local>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}

/// A fixed clock at the given local date and time
pub fn fixed_clock(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> FixedClock {
    FixedClock(Local.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap())
}
