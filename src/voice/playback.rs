//! Speaker playback
//!
//! Plays synthesized MP3 replies on the default output device. Playback is
//! blocking: the dispatch loop does not listen while speaking.

use std::io::Cursor;
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleRate, StreamConfig};

use crate::{Error, Result};

/// Playback sample rate (matches common TTS output)
const PLAYBACK_SAMPLE_RATE: u32 = 24000;

/// Exclusive handle on the default output device
pub struct Speaker {
    config: StreamConfig,
}

impl Speaker {
    /// Open the default output device at the playback sample rate
    ///
    /// # Errors
    ///
    /// Returns error if no suitable output device or config exists
    pub fn open() -> Result<Self> {
        let host = cpal::default_host();

        let device = host
            .default_output_device()
            .ok_or_else(|| Error::Audio("no output device available".to_string()))?;

        let supported = device
            .supported_output_configs()
            .map_err(|e| Error::Audio(e.to_string()))?
            .find(|c| {
                (c.channels() == 1 || c.channels() == 2)
                    && c.min_sample_rate() <= SampleRate(PLAYBACK_SAMPLE_RATE)
                    && c.max_sample_rate() >= SampleRate(PLAYBACK_SAMPLE_RATE)
            })
            .ok_or_else(|| Error::Audio("no suitable output config found".to_string()))?;

        let config = supported
            .with_sample_rate(SampleRate(PLAYBACK_SAMPLE_RATE))
            .config();

        tracing::debug!(
            device = device.name().unwrap_or_default(),
            sample_rate = PLAYBACK_SAMPLE_RATE,
            channels = config.channels,
            "speaker opened"
        );

        Ok(Self { config })
    }

    /// Decode MP3 bytes and play them, blocking until done
    ///
    /// # Errors
    ///
    /// Returns error if decoding or playback fails
    pub fn play_mp3(&mut self, mp3_data: &[u8]) -> Result<()> {
        let samples = decode_mp3(mp3_data)?;
        self.play(&samples)
    }

    /// Play raw f32 samples, blocking until done
    ///
    /// # Errors
    ///
    /// Returns error if playback fails
    pub fn play(&mut self, samples: &[f32]) -> Result<()> {
        if samples.is_empty() {
            return Ok(());
        }

        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| Error::Audio("no output device".to_string()))?;

        let channels = self.config.channels as usize;
        let source = Arc::new(Mutex::new(samples.to_vec()));
        let position = Arc::new(AtomicUsize::new(0));

        let cb_source = Arc::clone(&source);
        let cb_position = Arc::clone(&position);

        let stream = device
            .build_output_stream(
                &self.config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let Ok(source) = cb_source.lock() else {
                        return;
                    };
                    for frame in data.chunks_mut(channels) {
                        let pos = cb_position.load(Ordering::Relaxed);
                        let sample = source.get(pos).copied().unwrap_or(0.0);
                        for out in frame.iter_mut() {
                            *out = sample;
                        }
                        if pos < source.len() {
                            cb_position.store(pos + 1, Ordering::Relaxed);
                        }
                    }
                },
                |err| {
                    tracing::error!(error = %err, "playback stream error");
                },
                None,
            )
            .map_err(|e| Error::Audio(e.to_string()))?;

        stream.play().map_err(|e| Error::Audio(e.to_string()))?;

        // Block until the cursor reaches the end, bounded by the audio
        // duration plus a small margin
        let total = samples.len();
        let duration_ms = (total as u64 * 1000) / u64::from(PLAYBACK_SAMPLE_RATE);
        let deadline =
            std::time::Instant::now() + std::time::Duration::from_millis(duration_ms + 500);

        while position.load(Ordering::Relaxed) < total {
            if std::time::Instant::now() > deadline {
                tracing::warn!("playback deadline reached before stream drained");
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(50));
        }

        // Let the device flush its last buffer
        std::thread::sleep(std::time::Duration::from_millis(100));
        drop(stream);

        tracing::debug!(samples = total, "playback complete");
        Ok(())
    }
}

/// Decode MP3 bytes into mono f32 samples
fn decode_mp3(mp3_data: &[u8]) -> Result<Vec<f32>> {
    let mut decoder = minimp3::Decoder::new(Cursor::new(mp3_data));
    let mut samples = Vec::new();

    loop {
        match decoder.next_frame() {
            Ok(frame) if frame.channels == 2 => {
                // Average stereo down to mono
                samples.extend(frame.data.chunks(2).map(|pair| {
                    let left = f32::from(pair[0]) / 32768.0;
                    let right = f32::from(pair.get(1).copied().unwrap_or(pair[0])) / 32768.0;
                    f32::midpoint(left, right)
                }));
            }
            Ok(frame) => {
                samples.extend(frame.data.iter().map(|&s| f32::from(s) / 32768.0));
            }
            Err(minimp3::Error::Eof) => break,
            Err(e) => return Err(Error::Audio(format!("MP3 decode error: {e}"))),
        }
    }

    Ok(samples)
}
