//! Intent classification integration tests
//!
//! Verifies the trigger table's first-match precedence over whole
//! transcripts, the way the session loop produces them.

use lumen_assistant::{Intent, Transcript, classify};

fn intent_of(text: &str) -> Intent {
    classify(&Transcript::new(text, None))
}

#[test]
fn test_each_trigger_maps_to_its_intent() {
    assert_eq!(intent_of("how are you"), Intent::Greeting);
    assert_eq!(intent_of("what is your name"), Intent::Identity);
    assert_eq!(intent_of("who is ada lovelace"), Intent::WikiLookup);
    assert_eq!(intent_of("what's the time"), Intent::TimeQuery);
    assert_eq!(intent_of("today's date please"), Intent::DateQuery);
    assert_eq!(intent_of("play some jazz"), Intent::PlayMedia);
    assert_eq!(
        intent_of("send whatsapp message to 5551234 message hi"),
        Intent::SendMessage
    );
    assert_eq!(intent_of("calculate 2 plus 2"), Intent::Calculate);
}

#[test]
fn test_classification_is_case_insensitive() {
    assert_eq!(intent_of("WHO IS Ada Lovelace"), Intent::WikiLookup);
    assert_eq!(intent_of("CaLcUlAtE 1 plus 1"), Intent::Calculate);
}

#[test]
fn test_precedence_time_over_calculate() {
    // Both triggers present; "time" is earlier in the table
    assert_eq!(intent_of("calculate the time"), Intent::TimeQuery);
}

#[test]
fn test_precedence_greeting_over_everything() {
    assert_eq!(intent_of("how are you, what is your name"), Intent::Greeting);
}

#[test]
fn test_precedence_substring_traps() {
    // "updated" contains "date"; precedence makes that a date query even
    // though the user asked to play something. Documented heuristic cost.
    assert_eq!(intent_of("play the updated remix"), Intent::DateQuery);
}

#[test]
fn test_unknown_fallback() {
    assert_eq!(intent_of("make me a sandwich"), Intent::Unknown);
    assert_eq!(intent_of(""), Intent::Unknown);
}

#[test]
fn test_wake_word_does_not_change_intent() {
    let t = Transcript::new("lumen, who is ada lovelace", Some("lumen"));
    assert_eq!(classify(&t), Intent::WikiLookup);
}
