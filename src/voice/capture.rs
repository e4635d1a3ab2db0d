//! Microphone capture
//!
//! Records one utterance per listening cycle: an energy gate watches the
//! incoming sample stream, starts buffering when speech energy appears, and
//! closes the utterance after a run of trailing silence.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleRate, Stream, StreamConfig};

use crate::{Error, Result};

/// Sample rate for capture (16kHz for speech)
pub const SAMPLE_RATE: u32 = 16000;

/// Minimum RMS energy to consider a chunk speech
const ENERGY_THRESHOLD: f32 = 0.03;

/// Minimum utterance length (samples at 16kHz) before silence can close it
const MIN_SPEECH_SAMPLES: usize = 4800; // 0.3 seconds

/// Trailing silence (samples) that ends an utterance
const SILENCE_SAMPLES: usize = 8000; // 0.5 seconds

/// How often the recorder drains the capture buffer
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Energy-gated utterance segmentation
///
/// Pure state machine over sample chunks; no device access, so it is
/// testable with synthetic audio.
pub struct UtteranceGate {
    capturing: bool,
    buffer: Vec<f32>,
    silence: usize,
}

impl UtteranceGate {
    /// Create a gate in the idle state
    #[must_use]
    pub fn new() -> Self {
        Self {
            capturing: false,
            buffer: Vec::new(),
            silence: 0,
        }
    }

    /// Feed one chunk of samples
    ///
    /// Returns true when a complete utterance is buffered: enough speech
    /// followed by enough silence.
    pub fn push(&mut self, samples: &[f32]) -> bool {
        let is_speech = rms_energy(samples) > ENERGY_THRESHOLD;

        if !self.capturing {
            if is_speech {
                self.capturing = true;
                self.buffer.extend_from_slice(samples);
                self.silence = 0;
                tracing::trace!("speech started");
            }
            return false;
        }

        self.buffer.extend_from_slice(samples);
        if is_speech {
            self.silence = 0;
        } else {
            self.silence += samples.len();
        }

        if self.silence > SILENCE_SAMPLES && self.buffer.len() > MIN_SPEECH_SAMPLES {
            tracing::debug!(samples = self.buffer.len(), "utterance complete");
            return true;
        }

        // A long silent run without enough speech was a false start
        if self.silence > SILENCE_SAMPLES * 2 {
            tracing::trace!("false start, resetting");
            self.reset();
        }

        false
    }

    /// Take the buffered utterance, returning the gate to idle
    pub fn take(&mut self) -> Vec<f32> {
        self.capturing = false;
        self.silence = 0;
        std::mem::take(&mut self.buffer)
    }

    /// Discard any buffered audio and return to idle
    pub fn reset(&mut self) {
        self.capturing = false;
        self.buffer.clear();
        self.silence = 0;
    }
}

impl Default for UtteranceGate {
    fn default() -> Self {
        Self::new()
    }
}

/// RMS energy of a sample chunk
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn rms_energy(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_squares: f32 = samples.iter().map(|s| s * s).sum();
    (sum_squares / samples.len() as f32).sqrt()
}

/// Exclusive handle on the default input device
///
/// Acquired once at session start and released on drop, on every exit path.
pub struct Microphone {
    config: StreamConfig,
    buffer: Arc<Mutex<Vec<f32>>>,
    stream: Option<Stream>,
}

impl Microphone {
    /// Open the default input device at the capture sample rate
    ///
    /// # Errors
    ///
    /// Returns error if no suitable input device or config exists
    pub fn open() -> Result<Self> {
        let host = cpal::default_host();

        let device = host
            .default_input_device()
            .ok_or_else(|| Error::Audio("no input device available".to_string()))?;

        let supported = device
            .supported_input_configs()
            .map_err(|e| Error::Audio(e.to_string()))?
            .find(|c| {
                c.channels() == 1
                    && c.min_sample_rate() <= SampleRate(SAMPLE_RATE)
                    && c.max_sample_rate() >= SampleRate(SAMPLE_RATE)
            })
            .ok_or_else(|| Error::Audio("no suitable capture config found".to_string()))?;

        let config = supported.with_sample_rate(SampleRate(SAMPLE_RATE)).config();

        tracing::debug!(
            device = device.name().unwrap_or_default(),
            sample_rate = SAMPLE_RATE,
            "microphone opened"
        );

        Ok(Self {
            config,
            buffer: Arc::new(Mutex::new(Vec::new())),
            stream: None,
        })
    }

    /// Start streaming samples into the capture buffer
    ///
    /// # Errors
    ///
    /// Returns error if the input stream cannot be built
    pub fn start(&mut self) -> Result<()> {
        if self.stream.is_some() {
            return Ok(());
        }

        let buffer = Arc::clone(&self.buffer);
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or_else(|| Error::Audio("no input device".to_string()))?;

        let stream = device
            .build_input_stream(
                &self.config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if let Ok(mut buf) = buffer.lock() {
                        buf.extend_from_slice(data);
                    }
                },
                |err| {
                    tracing::error!(error = %err, "capture stream error");
                },
                None,
            )
            .map_err(|e| Error::Audio(e.to_string()))?;

        stream.play().map_err(|e| Error::Audio(e.to_string()))?;
        self.stream = Some(stream);
        Ok(())
    }

    /// Stop streaming and discard buffered samples
    pub fn stop(&mut self) {
        self.stream.take();
        if let Ok(mut buf) = self.buffer.lock() {
            buf.clear();
        }
    }

    /// Drain the samples captured since the last call
    #[must_use]
    pub fn take_chunk(&self) -> Vec<f32> {
        self.buffer
            .lock()
            .map(|mut buf| std::mem::take(&mut *buf))
            .unwrap_or_default()
    }

    /// Record a single utterance
    ///
    /// Streams from the device, feeding the energy gate until it closes an
    /// utterance or the timeout elapses. The stream is stopped before
    /// returning so the device is quiet while the reply is spoken.
    ///
    /// # Errors
    ///
    /// Returns error if the capture stream fails to start
    pub async fn record_utterance(&mut self, timeout: Duration) -> Result<Vec<f32>> {
        self.start()?;

        let mut gate = UtteranceGate::new();
        let deadline = tokio::time::Instant::now() + timeout;

        loop {
            tokio::time::sleep(POLL_INTERVAL).await;

            let chunk = self.take_chunk();
            if !chunk.is_empty() && gate.push(&chunk) {
                self.stop();
                return Ok(gate.take());
            }

            if tokio::time::Instant::now() >= deadline {
                self.stop();
                // Whatever was buffered; the caller decides if it is usable
                return Ok(gate.take());
            }
        }
    }
}

impl Drop for Microphone {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Encode f32 samples as 16-bit PCM WAV bytes for STT upload
///
/// # Errors
///
/// Returns error if WAV encoding fails
pub fn samples_to_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = std::io::Cursor::new(Vec::new());
    {
        let mut writer =
            hound::WavWriter::new(&mut cursor, spec).map_err(|e| Error::Audio(e.to_string()))?;

        for &sample in samples {
            #[allow(clippy::cast_possible_truncation)]
            let sample_i16 = (sample * 32767.0).clamp(-32768.0, 32767.0) as i16;
            writer
                .write_sample(sample_i16)
                .map_err(|e| Error::Audio(e.to_string()))?;
        }

        writer.finalize().map_err(|e| Error::Audio(e.to_string()))?;
    }

    Ok(cursor.into_inner())
}
