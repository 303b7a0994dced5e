//! Core types for the transcript decoder library
//!
//! This module defines the types the decoder emits when processing a
//! transcript: reassembled messages, the error taxonomy, and the partial
//! result that pairs completed messages with the failure that ended a parse.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::frame::FrameKind;

/// Result type for decoder operations
pub type Result<T> = std::result::Result<T, DecoderError>;

/// A fully reassembled application-layer message
///
/// Produced only on a complete, successful decode of either a single frame
/// or a first-frame sequence. A message under construction that errors
/// mid-reassembly is discarded, never published.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedMessage {
    /// 3-character identifier of the trigger line, passed through verbatim
    pub id: String,
    /// Payload as hexadecimal-pair-encoded bytes
    pub payload: String,
}

impl ParsedMessage {
    /// Payload length in encoded bytes (two hex characters per byte)
    pub fn byte_len(&self) -> usize {
        self.payload.len() / 2
    }
}

impl fmt::Display for ParsedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.id, self.payload)
    }
}

/// Errors that can occur during decoding
///
/// Every variant is terminal: the remaining parse is aborted and the error
/// surfaces to the caller as a single failure value. Skip-and-continue
/// policies belong to the caller, not the decoder.
#[derive(Debug, thiserror::Error)]
pub enum DecoderError {
    #[error("Line has {actual_length} characters, expected 19")]
    MalformedLine { actual_length: usize },

    #[error("Unknown frame type '{found}', expected '0' through '3'")]
    UnknownFrameType { found: char },

    #[error("Consecutive frame sequence digit '{found}' outside '1' through '9'")]
    InvalidSequenceDigit { found: char },

    #[error("Length field \"{field}\" is not a valid number")]
    InvalidLengthField { field: String },

    #[error("Single frame declares {declared} bytes, at most 7 fit in one frame")]
    SingleFrameTooLarge { declared: usize },

    #[error("Expected flow control type \"30\" after first frame, got \"{found}\"")]
    MissingFlowControl { found: String },

    #[error("Consecutive frame out of order: expected sequence {expected}, got {got}")]
    SequenceMismatch { expected: u32, got: u32 },

    #[error("Transcript ended while more frames were required")]
    UnexpectedEof,

    #[error("A {kind} cannot start a new message")]
    UnexpectedFrameAsTrigger { kind: FrameKind },

    #[error("Expected a consecutive frame to continue reassembly, got a {found}")]
    ExpectedConsecutiveFrame { found: FrameKind },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A terminal decode error together with the transcript line that triggered it
#[derive(Debug, thiserror::Error)]
#[error("line {line}: {error}")]
pub struct ParseFailure {
    /// 1-based number of the line the parse failed on
    pub line: usize,
    /// The violation that aborted the parse
    pub error: DecoderError,
}

/// Outcome of decoding one transcript
///
/// Messages completed before a failure remain valid, so a failed parse
/// carries both the surviving messages and the failure itself.
#[derive(Debug, Default)]
pub struct Transcript {
    /// Messages decoded in transcript order
    pub messages: Vec<ParsedMessage>,
    /// The failure that ended the parse, if it did not run to exhaustion
    pub failure: Option<ParseFailure>,
}

impl Transcript {
    /// True if the whole transcript was consumed without error
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }

    /// Convert into a plain result, dropping the surviving messages on failure
    pub fn into_result(self) -> std::result::Result<Vec<ParsedMessage>, ParseFailure> {
        match self.failure {
            Some(failure) => Err(failure),
            None => Ok(self.messages),
        }
    }
}
