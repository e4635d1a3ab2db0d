//! Action dispatch integration tests
//!
//! Exercises the dispatcher against fake capabilities: reply text, terminal
//! flags, and the single-invocation-per-cycle contract.

mod common;

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};

use common::{FakeEncyclopedia, RecordingChannel, RecordingMedia, fixed_clock};
use lumen_assistant::command::{self, CommandArgs, ExtractionError};
use lumen_assistant::dispatch::{DATE_FORMAT, Dispatcher, TIME_FORMAT};
use lumen_assistant::{Intent, Transcript, classify};

/// Dispatcher wired to well-behaved fakes
fn dispatcher() -> Dispatcher {
    let (channel, _) = RecordingChannel::new();
    let (media, _) = RecordingMedia::new();
    Dispatcher::new(
        "Lumen".to_string(),
        Arc::new(FakeEncyclopedia {
            summary: Some("Ada Lovelace was a mathematician.".to_string()),
        }),
        Arc::new(channel),
        Arc::new(media),
        Arc::new(fixed_clock(2026, 3, 7, 15, 4)),
    )
}

/// Run a transcript through classify → extract → dispatch
async fn run(dispatcher: &Dispatcher, text: &str) -> lumen_assistant::SpokenReply {
    let transcript = Transcript::new(text, None);
    let intent = classify(&transcript);
    dispatcher.dispatch(intent, command::extract(intent, &transcript)).await
}

#[tokio::test]
async fn test_greeting_terminates() {
    let reply = run(&dispatcher(), "how are you").await;
    assert_eq!(reply.text, "I am doing well, how can I assist you today?");
    assert!(reply.terminal);
}

#[tokio::test]
async fn test_identity_uses_configured_name() {
    let reply = run(&dispatcher(), "what is your name").await;
    assert_eq!(reply.text, "I am Lumen, your personal assistant.");
    assert!(reply.terminal);
}

#[tokio::test]
async fn test_wiki_success_speaks_summary() {
    let reply = run(&dispatcher(), "who is ada lovelace").await;
    assert_eq!(reply.text, "Ada Lovelace was a mathematician.");
    assert!(reply.terminal);
}

#[tokio::test]
async fn test_wiki_failure_apologizes_without_crashing() {
    let (channel, _) = RecordingChannel::new();
    let (media, _) = RecordingMedia::new();
    let dispatcher = Dispatcher::new(
        "Lumen".to_string(),
        Arc::new(FakeEncyclopedia { summary: None }),
        Arc::new(channel),
        Arc::new(media),
        Arc::new(fixed_clock(2026, 3, 7, 15, 4)),
    );

    let reply = run(&dispatcher, "who is nobody in particular").await;
    assert!(reply.text.starts_with("Sorry"));
    assert!(reply.terminal);
}

#[tokio::test]
async fn test_time_format_and_round_trip() {
    let reply = run(&dispatcher(), "what time is it").await;
    assert_eq!(reply.text, "Current time is 03:04 PM");
    assert!(reply.terminal);

    // Re-parsing the stated format recovers the instant to the minute
    let spoken = reply.text.trim_start_matches("Current time is ");
    let parsed = NaiveTime::parse_from_str(spoken, TIME_FORMAT).unwrap();
    assert_eq!(parsed, NaiveTime::from_hms_opt(15, 4, 0).unwrap());
}

#[tokio::test]
async fn test_date_format_and_round_trip() {
    let reply = run(&dispatcher(), "what is the date today").await;
    assert_eq!(reply.text, "Today's date is 07 / 03 / 2026");
    assert!(reply.terminal);

    let spoken = reply.text.trim_start_matches("Today's date is ");
    let parsed = NaiveDate::parse_from_str(spoken, DATE_FORMAT).unwrap();
    assert_eq!(parsed, NaiveDate::from_ymd_opt(2026, 3, 7).unwrap());
}

#[tokio::test]
async fn test_play_invokes_media_search() {
    let (channel, _) = RecordingChannel::new();
    let (media, played) = RecordingMedia::new();
    let dispatcher = Dispatcher::new(
        "Lumen".to_string(),
        Arc::new(FakeEncyclopedia { summary: None }),
        Arc::new(channel),
        Arc::new(media),
        Arc::new(fixed_clock(2026, 3, 7, 15, 4)),
    );

    let reply = run(&dispatcher, "play bohemian rhapsody").await;
    assert_eq!(reply.text, "Playing bohemian rhapsody");
    assert!(reply.terminal);
    assert_eq!(*played.lock().unwrap(), vec!["bohemian rhapsody"]);
}

#[tokio::test]
async fn test_send_message_success_keeps_listening() {
    let (channel, sent) = RecordingChannel::new();
    let (media, _) = RecordingMedia::new();
    let dispatcher = Dispatcher::new(
        "Lumen".to_string(),
        Arc::new(FakeEncyclopedia { summary: None }),
        Arc::new(channel),
        Arc::new(media),
        Arc::new(fixed_clock(2026, 3, 7, 15, 4)),
    );

    let reply = run(&dispatcher, "send whatsapp message to 5551234 message hello there").await;
    assert_eq!(reply.text, "Message sent successfully.");
    assert!(!reply.terminal);

    let sent = sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].destination, "5551234");
    assert_eq!(sent[0].content, "hello there");
}

#[tokio::test]
async fn test_send_message_failure_keeps_listening() {
    let (media, _) = RecordingMedia::new();
    let dispatcher = Dispatcher::new(
        "Lumen".to_string(),
        Arc::new(FakeEncyclopedia { summary: None }),
        Arc::new(RecordingChannel::failing()),
        Arc::new(media),
        Arc::new(fixed_clock(2026, 3, 7, 15, 4)),
    );

    let reply = run(&dispatcher, "send whatsapp message to 5551234 message hi").await;
    assert!(reply.text.contains("error sending the message"));
    assert!(!reply.terminal);
}

#[tokio::test]
async fn test_malformed_message_command_apologizes() {
    let reply = run(&dispatcher(), "send whatsapp message hello").await;
    assert!(reply.text.contains("phone number or message"));
    assert!(!reply.terminal);
}

#[tokio::test]
async fn test_calculation_result_spoken() {
    let reply = run(&dispatcher(), "calculate 10 plus 5").await;
    assert_eq!(reply.text, "The result is 15");
    assert!(reply.terminal);
}

#[tokio::test]
async fn test_division_by_zero_spoken_error() {
    let reply = run(&dispatcher(), "calculate 9 divided by 0").await;
    assert!(reply.text.contains("divide by zero"));
    assert!(reply.terminal);
}

#[tokio::test]
async fn test_malformed_calculation_spoken_error() {
    let reply = run(&dispatcher(), "calculate ten plus five").await;
    assert!(reply.text.contains("error performing the calculation"));
    assert!(reply.terminal);
}

#[tokio::test]
async fn test_unknown_keeps_listening() {
    let reply = run(&dispatcher(), "fold my laundry").await;
    assert!(reply.text.contains("still learning"));
    assert!(!reply.terminal);
}

#[tokio::test]
async fn test_extraction_error_surface_is_spoken() {
    // Feed an extraction error directly: it must come back as a reply,
    // never a panic or a propagated error
    let reply = dispatcher()
        .dispatch(Intent::Calculate, Err(ExtractionError::UnknownOperator))
        .await;
    assert!(reply.text.contains("couldn't understand the calculation"));
    assert!(reply.terminal);

    let reply = dispatcher()
        .dispatch(Intent::SendMessage, Err(ExtractionError::MissingDelimiter("to")))
        .await;
    assert!(!reply.terminal);
}

#[tokio::test]
async fn test_dispatch_matches_loop_table() {
    // Terminal flags per the dispatch table, end to end
    let cases: &[(&str, bool)] = &[
        ("how are you", true),
        ("what is your name", true),
        ("who is ada lovelace", true),
        ("what time is it", true),
        ("what is the date", true),
        ("play jazz", true),
        ("send whatsapp message to 1 message hi", false),
        ("calculate 1 plus 1", true),
        ("zzz unknown zzz", false),
    ];

    let dispatcher = dispatcher();
    for (text, terminal) in cases {
        let reply = run(&dispatcher, text).await;
        assert_eq!(reply.terminal, *terminal, "{text}");
    }
}

#[tokio::test]
async fn test_calculation_ignores_unused_args() {
    // CommandArgs::None with a no-arg intent still answers
    let reply = dispatcher().dispatch(Intent::Greeting, Ok(CommandArgs::None)).await;
    assert!(reply.terminal);
}
