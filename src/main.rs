use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use lumen_assistant::channels::{Channel, UnconfiguredChannel, WhatsAppChannel};
use lumen_assistant::dispatch::{Dispatcher, SystemClock};
use lumen_assistant::lookup::WikipediaClient;
use lumen_assistant::media::YoutubePlayer;
use lumen_assistant::overlay::OverlayCompositor;
use lumen_assistant::session::Session;
use lumen_assistant::video::{FrameSource, NullSink, TestPatternSource};
use lumen_assistant::voice::{Microphone, Speaker, TextToSpeech, VoiceInput, VoiceOutput, rms_energy};
use lumen_assistant::Config;

/// Lumen - voice-driven command assistant
#[derive(Parser)]
#[command(name = "lumen", version, about)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable the video overlay display
    #[arg(long, env = "LUMEN_DISABLE_OVERLAY")]
    no_overlay: bool,

    /// Use a synthetic frame source instead of a camera feed
    /// (for machines without a capture device)
    #[arg(long)]
    synthetic_video: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
#[allow(clippy::enum_variant_names)]
enum Command {
    /// Test microphone input
    TestMic {
        /// Duration in seconds
        #[arg(short, long, default_value = "5")]
        duration: u64,
    },
    /// Test speaker output
    TestSpeaker,
    /// Test TTS output
    TestTts {
        /// Text to speak
        #[arg(default_value = "Hello! This is a test of the text to speech system.")]
        text: String,
    },
    /// Composite the overlay onto a synthetic frame and write a PNG
    TestOverlay {
        /// Output path
        #[arg(short, long, default_value = "overlay-test.png")]
        output: PathBuf,
    },
    /// Interactive first-run setup
    Setup,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,lumen_assistant=info",
        1 => "info,lumen_assistant=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

#[allow(clippy::future_not_send)]
async fn run(cli: Cli) -> anyhow::Result<()> {
    if let Some(cmd) = cli.command {
        return match cmd {
            Command::TestMic { duration } => test_mic(duration).await,
            Command::TestSpeaker => test_speaker(),
            Command::TestTts { text } => test_tts(&text).await,
            Command::TestOverlay { output } => test_overlay(&output),
            Command::Setup => lumen_assistant::setup::run_setup(),
        };
    }

    let config = Config::load_with_options(cli.no_overlay)?;
    tracing::info!(
        assistant = %config.assistant.name,
        overlay = config.overlay.enabled,
        "starting assistant"
    );

    // Capability wiring: each external collaborator behind its trait
    let messenger: Arc<dyn Channel> = match (
        config.api_keys.whatsapp.clone(),
        config.api_keys.whatsapp_phone_id.clone(),
    ) {
        (Some(token), Some(phone_id)) => {
            let mut channel = WhatsAppChannel::new(token, phone_id);
            channel.connect().await?;
            Arc::new(channel)
        }
        _ => {
            tracing::warn!("WhatsApp not configured; message commands will apologize");
            Arc::new(UnconfiguredChannel)
        }
    };

    let dispatcher = Dispatcher::new(
        config.assistant.name.clone(),
        Arc::new(WikipediaClient::new()),
        messenger,
        Arc::new(YoutubePlayer::new()),
        Arc::new(SystemClock),
    );

    let speech = VoiceInput::from_config(&config)?;
    let voice = VoiceOutput::from_config(&config)?;

    let mut session = Session::new(config, dispatcher, Box::new(speech), Box::new(voice));

    // The camera is an external collaborator; the synthetic source stands in
    // for it where no capture device is wired up.
    if cli.synthetic_video {
        session = session.with_video(
            Box::new(TestPatternSource::new(640, 480)),
            Box::new(NullSink::new()),
        );
    }

    tracing::info!("assistant ready - speak a command");
    session.run().await?;

    Ok(())
}

/// Test microphone input
#[allow(clippy::future_not_send)]
async fn test_mic(duration: u64) -> anyhow::Result<()> {
    println!("Testing microphone for {duration} seconds...");
    println!("Speak into your microphone!\n");

    let mut microphone = Microphone::open()?;
    microphone.start()?;

    for i in 0..duration {
        tokio::time::sleep(Duration::from_secs(1)).await;

        let samples = microphone.take_chunk();
        let energy = rms_energy(&samples);
        let peak = samples.iter().map(|s| s.abs()).fold(0.0f32, f32::max);

        // Visual meter
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let meter_len = (energy * 100.0).min(50.0) as usize;
        let meter: String = "█".repeat(meter_len) + &" ".repeat(50 - meter_len);

        println!(
            "[{:2}s] RMS: {:.4} | Peak: {:.4} | [{}]",
            i + 1,
            energy,
            peak,
            meter
        );
    }

    microphone.stop();

    println!("\n---");
    println!("If you saw movement in the meter, your mic is working!");
    println!("If RMS stayed near 0, check:");
    println!("  1. Is your mic plugged in?");
    println!("  2. Run: pactl info | grep 'Default Source'");
    println!("  3. Run: arecord -l (to list devices)");

    Ok(())
}

/// Test speaker output with a sine wave
fn test_speaker() -> anyhow::Result<()> {
    println!("Testing speaker output...");
    println!("You should hear a 440Hz tone for 2 seconds\n");

    let mut speaker = Speaker::open()?;

    let sample_rate = 24000_u32;
    let frequency = 440.0_f32;
    let duration_secs = 2.0_f32;

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let num_samples = (sample_rate as f32 * duration_secs) as usize;

    #[allow(clippy::cast_precision_loss)]
    let samples: Vec<f32> = (0..num_samples)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            (2.0 * std::f32::consts::PI * frequency * t).sin() * 0.3 // 30% volume
        })
        .collect();

    println!("Playing {} samples at {} Hz...", samples.len(), sample_rate);
    speaker.play(&samples)?;

    println!("\n---");
    println!("If you heard the tone, your speakers are working!");

    Ok(())
}

/// Test TTS output
#[allow(clippy::future_not_send)]
async fn test_tts(text: &str) -> anyhow::Result<()> {
    println!("Testing TTS with text: \"{text}\"\n");

    let config = Config::load()?;
    let tts = TextToSpeech::from_config(&config)?;

    println!("Synthesizing speech...");
    let mp3_data = tts.synthesize(text).await?;
    println!("Got {} bytes of audio data", mp3_data.len());

    println!("Playing audio...");
    let mut speaker = Speaker::open()?;
    speaker.play_mp3(&mp3_data)?;

    println!("\n---");
    println!("If you heard the speech, TTS is working!");

    Ok(())
}

/// Composite the configured overlay onto one synthetic frame
fn test_overlay(output: &Path) -> anyhow::Result<()> {
    let config = Config::load()?;
    println!(
        "Loading overlay from {}...",
        config.overlay.image_path.display()
    );

    let compositor = OverlayCompositor::from_path(&config.overlay.image_path)?;
    let (width, height) = compositor.dimensions();
    println!("Overlay scaled to {width}x{height}");

    let mut source = TestPatternSource::new(640, 480);
    let mut frame = source
        .next_frame()?
        .ok_or_else(|| anyhow::anyhow!("no frame from test source"))?;

    compositor.composite(&mut frame);
    frame.save(output)?;

    println!("Composited frame written to {}", output.display());
    Ok(())
}
