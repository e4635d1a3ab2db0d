//! Session loop
//!
//! Runs the listen → classify → extract → dispatch cycle, plus the video
//! display sub-loop. The two loops are independently cancellable: a quit
//! event from the frame sink (or a missing overlay asset) ends only the
//! display loop, while a terminal dispatch shuts the whole session down.

use tokio::sync::watch;

use crate::command::{self, CommandArgs, ExtractionError};
use crate::config::Config;
use crate::dispatch::Dispatcher;
use crate::intent::{self, Intent, Transcript};
use crate::overlay::OverlayCompositor;
use crate::video::{FrameSink, FrameSource, SinkEvent};
use crate::voice::{ListenOutcome, SpeechSource, Synthesizer};

/// Dispatch loop state
///
/// Each cycle owns its transcript and arguments; nothing carries over
/// between cycles.
enum LoopState {
    /// Waiting for a transcript
    Listening,
    /// Transcript produced, assigning an intent
    Classifying(Transcript),
    /// Intent assigned, extracting arguments
    Extracting(Intent, Transcript),
    /// Arguments (or extraction failure) ready to dispatch
    Dispatching(Intent, Result<CommandArgs, ExtractionError>),
    /// A terminal dispatch completed
    Terminated,
}

/// Camera + display pair for the video sub-loop
pub struct VideoFeed {
    /// Frame producer (camera)
    pub source: Box<dyn FrameSource>,
    /// Frame consumer (display)
    pub sink: Box<dyn FrameSink>,
}

/// One assistant session
///
/// Owns the capture devices for its lifetime; they are released on every
/// exit path when the session is dropped.
pub struct Session {
    config: Config,
    dispatcher: Dispatcher,
    speech: Box<dyn SpeechSource>,
    voice: Box<dyn Synthesizer>,
    video: Option<VideoFeed>,
}

impl Session {
    /// Create a session without video
    #[must_use]
    pub fn new(
        config: Config,
        dispatcher: Dispatcher,
        speech: Box<dyn SpeechSource>,
        voice: Box<dyn Synthesizer>,
    ) -> Self {
        Self {
            config,
            dispatcher,
            speech,
            voice,
            video: None,
        }
    }

    /// Attach a video feed for the display sub-loop
    #[must_use]
    pub fn with_video(mut self, source: Box<dyn FrameSource>, sink: Box<dyn FrameSink>) -> Self {
        self.video = Some(VideoFeed { source, sink });
        self
    }

    /// Run the session until a terminal dispatch or interrupt
    ///
    /// # Errors
    ///
    /// Returns error only for failures the loops cannot absorb; per-cycle
    /// failures are spoken/logged and the loops continue.
    #[allow(clippy::future_not_send)]
    pub async fn run(mut self) -> crate::Result<()> {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let display_task = self.start_display_loop(shutdown_rx).await;

        let result = tokio::select! {
            r = self.run_dispatch_loop() => r,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupted");
                Ok(())
            }
        };

        // Terminal dispatch (or interrupt) ends the display loop too
        let _ = shutdown_tx.send(true);
        if let Some(task) = display_task {
            match task.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => tracing::warn!(error = %e, "display loop failed"),
                Err(e) => tracing::warn!(error = %e, "display task panicked"),
            }
        }

        result
    }

    /// Start the display sub-loop if video is attached and enabled
    ///
    /// A missing or unreadable overlay asset aborts only this loop: the
    /// diagnostic is spoken and logged, and voice dispatch carries on.
    async fn start_display_loop(
        &mut self,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Option<tokio::task::JoinHandle<crate::Result<()>>> {
        if !self.config.overlay.enabled {
            return None;
        }
        let feed = self.video.take()?;

        match OverlayCompositor::from_path(&self.config.overlay.image_path) {
            Ok(compositor) => Some(tokio::task::spawn_blocking(move || {
                run_display_loop(feed, &compositor, &shutdown_rx)
            })),
            Err(e) => {
                tracing::error!(error = %e, "overlay unavailable, display disabled");
                if let Err(speak_err) = self
                    .voice
                    .speak("Could not load the overlay image. Please check the file path.")
                    .await
                {
                    tracing::error!(error = %speak_err, "failed to speak diagnostic");
                }
                None
            }
        }
    }

    /// Run the listen/classify/extract/dispatch state machine
    #[allow(clippy::future_not_send)]
    async fn run_dispatch_loop(&mut self) -> crate::Result<()> {
        let mut state = LoopState::Listening;

        loop {
            state = match state {
                LoopState::Listening => match self.speech.listen().await {
                    ListenOutcome::Heard(transcript) => LoopState::Classifying(transcript),
                    ListenOutcome::Unintelligible => {
                        tracing::debug!("could not understand audio");
                        LoopState::Listening
                    }
                    ListenOutcome::ServiceUnavailable => {
                        tracing::warn!("recognition service unavailable");
                        LoopState::Listening
                    }
                },

                LoopState::Classifying(transcript) => {
                    let intent = intent::classify(&transcript);
                    tracing::info!(?intent, %transcript, "command classified");
                    LoopState::Extracting(intent, transcript)
                }

                LoopState::Extracting(intent, transcript) => {
                    LoopState::Dispatching(intent, command::extract(intent, &transcript))
                }

                LoopState::Dispatching(intent, args) => {
                    let reply = self.dispatcher.dispatch(intent, args).await;
                    if let Err(e) = self.voice.speak(&reply.text).await {
                        tracing::error!(error = %e, "failed to speak reply");
                    }
                    if reply.terminal {
                        LoopState::Terminated
                    } else {
                        LoopState::Listening
                    }
                }

                LoopState::Terminated => {
                    tracing::info!("session complete");
                    return Ok(());
                }
            };
        }
    }
}

/// The display sub-loop body
///
/// Ends on shutdown, end-of-stream, or a quit event from the sink; its end
/// does not, by itself, end voice dispatch.
fn run_display_loop(
    mut feed: VideoFeed,
    compositor: &OverlayCompositor,
    shutdown: &watch::Receiver<bool>,
) -> crate::Result<()> {
    tracing::info!("display loop started");

    loop {
        if *shutdown.borrow() {
            break;
        }

        let Some(mut frame) = feed.source.next_frame()? else {
            tracing::info!("frame source ended");
            break;
        };

        compositor.composite(&mut frame);

        match feed.sink.present(&frame)? {
            SinkEvent::Continue => {}
            SinkEvent::QuitRequested => {
                tracing::info!("display quit requested");
                break;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use super::*;
    use crate::channels::{Channel, OutgoingMessage};
    use crate::dispatch::SystemClock;
    use crate::lookup::Encyclopedia;
    use crate::media::MediaPlayer;

    /// Speech source that replays a fixed script of outcomes
    struct ScriptedSpeech {
        script: Vec<ListenOutcome>,
    }

    #[async_trait(?Send)]
    impl SpeechSource for ScriptedSpeech {
        async fn listen(&mut self) -> ListenOutcome {
            assert!(!self.script.is_empty(), "listened past end of script");
            self.script.remove(0)
        }
    }

    /// Synthesizer that records what it was asked to say
    struct RecordingVoice {
        spoken: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait(?Send)]
    impl Synthesizer for RecordingVoice {
        async fn speak(&mut self, text: &str) -> crate::Result<()> {
            self.spoken.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    struct NoLookup;

    #[async_trait]
    impl Encyclopedia for NoLookup {
        async fn summary(&self, _subject: &str, _sentences: usize) -> crate::Result<String> {
            Err(crate::Error::Lookup("unused".into()))
        }
    }

    struct NoChannel;

    #[async_trait]
    impl Channel for NoChannel {
        fn name(&self) -> &'static str {
            "test"
        }
        async fn connect(&mut self) -> crate::Result<()> {
            Ok(())
        }
        async fn send(&self, _message: OutgoingMessage) -> crate::Result<()> {
            Ok(())
        }
        fn is_connected(&self) -> bool {
            true
        }
    }

    struct NoMedia;

    impl MediaPlayer for NoMedia {
        fn play(&self, _term: &str) -> crate::Result<()> {
            Ok(())
        }
    }

    fn test_config() -> Config {
        Config {
            assistant: crate::config::AssistantConfig {
                name: "Lumen".to_string(),
                wake_word: None,
            },
            voice: crate::config::VoiceConfig {
                stt_model: "whisper-1".to_string(),
                tts_model: "tts-1".to_string(),
                tts_voice: "alloy".to_string(),
                tts_speed: 1.0,
                listen_timeout_secs: 1,
            },
            overlay: crate::config::OverlayConfig {
                enabled: false,
                image_path: "/nonexistent.png".into(),
            },
            api_keys: crate::config::ApiKeys::default(),
        }
    }

    fn test_session(script: Vec<ListenOutcome>, spoken: Arc<Mutex<Vec<String>>>) -> Session {
        let dispatcher = Dispatcher::new(
            "Lumen".to_string(),
            Arc::new(NoLookup),
            Arc::new(NoChannel),
            Arc::new(NoMedia),
            Arc::new(SystemClock),
        );
        Session::new(
            test_config(),
            dispatcher,
            Box::new(ScriptedSpeech { script }),
            Box::new(RecordingVoice { spoken }),
        )
    }

    #[tokio::test]
    async fn test_recognition_failures_keep_listening() {
        let spoken = Arc::new(Mutex::new(Vec::new()));
        let session = test_session(
            vec![
                ListenOutcome::ServiceUnavailable,
                ListenOutcome::Unintelligible,
                ListenOutcome::Heard(Transcript::new("how are you", None)),
            ],
            Arc::clone(&spoken),
        );

        session.run().await.unwrap();

        // Failed cycles spoke nothing; the greeting terminated the loop
        let spoken = spoken.lock().unwrap();
        assert_eq!(spoken.len(), 1);
        assert!(spoken[0].contains("how can I assist you"));
    }

    #[tokio::test]
    async fn test_non_terminal_reply_continues() {
        let spoken = Arc::new(Mutex::new(Vec::new()));
        let session = test_session(
            vec![
                ListenOutcome::Heard(Transcript::new("do a backflip", None)),
                ListenOutcome::Heard(Transcript::new("what is your name", None)),
            ],
            Arc::clone(&spoken),
        );

        session.run().await.unwrap();

        let spoken = spoken.lock().unwrap();
        assert_eq!(spoken.len(), 2);
        assert!(spoken[0].contains("still learning"));
        assert!(spoken[1].contains("Lumen"));
    }
}
