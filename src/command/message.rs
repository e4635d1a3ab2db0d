//! Message command parsing
//!
//! Splits "send whatsapp message to <destination> message <body>" on its two
//! literal markers. A best-effort heuristic, not a grammar: "to" and
//! "message" are matched as substrings, so unusual phrasings can misparse.
//! Failures are explicit and spoken back, never fatal.

use super::ExtractionError;
use crate::intent::Transcript;

/// A parsed outbound message request
///
/// Both fields are non-empty after extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRequest {
    /// Destination identifier (typically a phone number)
    pub destination: String,
    /// Message body text
    pub body: String,
}

/// Parse a message transcript into a [`MessageRequest`]
///
/// The transcript is split on the first "to"; within that tail, the segment
/// before the first "message" is the destination and the segment after is
/// the body.
///
/// # Errors
///
/// - [`ExtractionError::MissingDelimiter`] if "to" or "message" is absent in
///   the expected order
/// - [`ExtractionError::EmptyField`] if either extracted field is empty
pub fn parse(transcript: &Transcript) -> Result<MessageRequest, ExtractionError> {
    let (_, tail) = transcript
        .as_str()
        .split_once("to")
        .ok_or(ExtractionError::MissingDelimiter("to"))?;

    let (destination, body) = tail
        .split_once("message")
        .ok_or(ExtractionError::MissingDelimiter("message"))?;

    let destination = destination.trim();
    let body = body.trim();

    if destination.is_empty() {
        return Err(ExtractionError::EmptyField("destination"));
    }
    if body.is_empty() {
        return Err(ExtractionError::EmptyField("message body"));
    }

    Ok(MessageRequest {
        destination: destination.to_string(),
        body: body.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(text: &str) -> Result<MessageRequest, ExtractionError> {
        parse(&Transcript::new(text, None))
    }

    #[test]
    fn test_well_formed() {
        let m = msg("send whatsapp message to 5551234 message hello there").unwrap();
        assert_eq!(m.destination, "5551234");
        assert_eq!(m.body, "hello there");
    }

    #[test]
    fn test_missing_to() {
        assert_eq!(
            msg("send whatsapp message hello"),
            Err(ExtractionError::MissingDelimiter("to"))
        );
    }

    #[test]
    fn test_missing_message_marker() {
        assert_eq!(
            msg("send whatsapp message to 5551234 hello"),
            Err(ExtractionError::MissingDelimiter("message"))
        );
    }

    #[test]
    fn test_empty_body() {
        assert_eq!(
            msg("send whatsapp message to 5551234 message"),
            Err(ExtractionError::EmptyField("message body"))
        );
    }

    #[test]
    fn test_empty_destination() {
        assert_eq!(
            msg("send whatsapp message to message hi"),
            Err(ExtractionError::EmptyField("destination"))
        );
    }
}
