//! Calculation parsing
//!
//! A small tokenizer over spoken arithmetic: the expression after the
//! "calculate" trigger is split on the first operator marker found, in a
//! fixed priority order, and both sides must parse as decimal numbers.

use super::ExtractionError;
use crate::intent::{Intent, Transcript, trigger_for};

/// Binary arithmetic operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// Addition ("plus" / "+")
    Add,
    /// Subtraction ("minus" / "-")
    Sub,
    /// Multiplication ("times" / "*")
    Mul,
    /// Division ("divided by" / "/")
    Div,
}

/// Marker priority order: the first operator whose word or symbol marker
/// appears in the expression wins. Word forms are checked before symbols.
const MARKERS: &[(Operator, &str, &str)] = &[
    (Operator::Add, "plus", "+"),
    (Operator::Sub, "minus", "-"),
    (Operator::Mul, "times", "*"),
    (Operator::Div, "divided by", "/"),
];

impl Operator {
    /// The spoken word form of this operator
    #[must_use]
    pub fn word(self) -> &'static str {
        match self {
            Self::Add => "plus",
            Self::Sub => "minus",
            Self::Mul => "times",
            Self::Div => "divided by",
        }
    }
}

/// A parsed binary calculation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calculation {
    /// Left operand
    pub a: f64,
    /// Right operand
    pub b: f64,
    /// Operator between them
    pub op: Operator,
}

impl Calculation {
    /// Evaluate the operation
    ///
    /// Returns `None` for division by zero, which callers report as a
    /// spoken error rather than producing an infinity.
    #[must_use]
    pub fn evaluate(&self) -> Option<f64> {
        match self.op {
            Operator::Add => Some(self.a + self.b),
            Operator::Sub => Some(self.a - self.b),
            Operator::Mul => Some(self.a * self.b),
            Operator::Div => {
                if self.b == 0.0 {
                    None
                } else {
                    Some(self.a / self.b)
                }
            }
        }
    }
}

/// Parse a calculation transcript into a [`Calculation`]
///
/// # Errors
///
/// - [`ExtractionError::UnknownOperator`] if no marker is present
/// - [`ExtractionError::Arity`] if the marker appears more than once or an
///   operand segment is empty
/// - [`ExtractionError::MalformedOperand`] if a segment is not a number
pub fn parse(transcript: &Transcript) -> Result<Calculation, ExtractionError> {
    let trigger = trigger_for(Intent::Calculate).unwrap_or_default();
    let expr = transcript.as_str().replacen(trigger, "", 1);
    let expr = expr.trim();

    let (op, marker) = find_marker(expr).ok_or(ExtractionError::UnknownOperator)?;

    // Only binary operations: a second occurrence of the marker means a
    // third operand (or a stray sign) we refuse to guess about.
    if expr.matches(marker).count() > 1 {
        return Err(ExtractionError::Arity);
    }

    // split is infallible here: find_marker guaranteed one occurrence
    let (lhs, rhs) = expr.split_once(marker).ok_or(ExtractionError::Arity)?;

    Ok(Calculation {
        a: parse_operand(lhs)?,
        b: parse_operand(rhs)?,
        op,
    })
}

/// Find the highest-priority operator marker present in the expression
fn find_marker(expr: &str) -> Option<(Operator, &'static str)> {
    for (op, word, symbol) in MARKERS {
        if expr.contains(word) {
            return Some((*op, word));
        }
        if expr.contains(symbol) {
            return Some((*op, symbol));
        }
    }
    None
}

/// Parse one operand segment as a decimal number
fn parse_operand(segment: &str) -> Result<f64, ExtractionError> {
    let segment = segment.trim();
    if segment.is_empty() {
        return Err(ExtractionError::Arity);
    }
    segment
        .parse::<f64>()
        .map_err(|_| ExtractionError::MalformedOperand(segment.to_string()))
}
