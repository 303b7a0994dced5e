//! Transcript line layout and frame classification
//!
//! Every transcript line is exactly 19 ASCII characters, decomposed
//! positionally as `ID(3) | TYPE(2) | PAYLOAD(14)`. The first character of
//! the TYPE field selects the frame kind; the meaning of everything after it
//! depends on that kind. All field offsets live here so the layout contract
//! is stated once.

use std::fmt;
use std::ops::Range;

use crate::types::{DecoderError, Result};

/// Total line width in characters
pub const LINE_LEN: usize = 19;

/// Frame identifier, passed through verbatim
const ID_RANGE: Range<usize> = 0..3;
/// Two-character frame type field
const TYPE_RANGE: Range<usize> = 3..5;
/// Payload region shared by all frame kinds
const PAYLOAD_RANGE: Range<usize> = 5..19;

/// Single frame: the declared length digit (in bytes) is TYPE[1]
const SF_LEN_OFFSET: usize = 4;
/// Single frame payload ceiling in hex characters (7 bytes)
pub(crate) const SF_MAX_HEX_CHARS: usize = 14;

/// First frame: two-character hexadecimal total length (in bytes)
const FF_LEN_RANGE: Range<usize> = 5..7;
/// First frame: fixed initial payload segment (12 hex characters)
const FF_SEED_RANGE: Range<usize> = 7..19;
/// Hex characters one consecutive frame can contribute
pub(crate) const CF_STRIDE_HEX_CHARS: usize = 14;
/// Type field of the flow-control acknowledgment demanded after a first frame
pub(crate) const FLOW_CONTROL_TYPE: &str = "30";

/// A validated transcript line
///
/// Construction goes through [`TranscriptLine::parse`], so a value of this
/// type always has the full 19-character shape and the field accessors
/// cannot slice out of bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptLine {
    raw: String,
}

impl TranscriptLine {
    /// Validate the raw line shape and take ownership of the line.
    ///
    /// Only the line width is checked here; field-level validation happens
    /// in the component consuming each field.
    pub fn parse(raw: impl Into<String>) -> Result<TranscriptLine> {
        let raw = raw.into();
        // the positional accessors below slice by byte offset, which is only
        // sound while every character is one byte wide
        if raw.len() != LINE_LEN || !raw.is_ascii() {
            return Err(DecoderError::MalformedLine {
                actual_length: raw.chars().count(),
            });
        }
        Ok(TranscriptLine { raw })
    }

    /// Frame identifier (3 characters, verbatim)
    pub fn id(&self) -> &str {
        &self.raw[ID_RANGE]
    }

    /// Two-character frame type field
    pub fn frame_type(&self) -> &str {
        &self.raw[TYPE_RANGE]
    }

    /// The 14-character payload region
    pub fn payload_region(&self) -> &str {
        &self.raw[PAYLOAD_RANGE]
    }

    /// Declared length digit of a single frame (TYPE[1])
    pub(crate) fn single_frame_len_digit(&self) -> char {
        self.raw.as_bytes()[SF_LEN_OFFSET] as char
    }

    /// Hexadecimal total-length field of a first frame
    pub(crate) fn first_frame_len_field(&self) -> &str {
        &self.raw[FF_LEN_RANGE]
    }

    /// Fixed 12-character initial payload segment of a first frame
    pub(crate) fn first_frame_seed(&self) -> &str {
        &self.raw[FF_SEED_RANGE]
    }
}

/// Frame kinds distinguished by the first character of the TYPE field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// Whole message in one line
    Single,
    /// Opens a multi-frame message; carries the total length
    First,
    /// Continues a multi-frame message; carries a sequence digit
    Consecutive { sequence: u8 },
    /// Acknowledgment required between a first frame and its consecutive frames
    FlowControl,
}

impl FrameKind {
    /// Classify a two-character type field.
    ///
    /// The mapping over TYPE[0] is exact and total for `0`..`3`; anything
    /// else is rejected. For consecutive frames the sequence digit is
    /// extracted but not compared against an expected position - that is
    /// the accumulator's job.
    pub fn classify(type_field: &str) -> Result<FrameKind> {
        let (selector, detail) = match type_field.as_bytes() {
            [selector, detail] => (*selector, *detail),
            _ => {
                return Err(DecoderError::MalformedLine {
                    actual_length: type_field.chars().count(),
                })
            }
        };
        match selector {
            b'0' => Ok(FrameKind::Single),
            b'1' => Ok(FrameKind::First),
            b'2' => match detail {
                digit @ b'1'..=b'9' => Ok(FrameKind::Consecutive {
                    sequence: digit - b'0',
                }),
                other => Err(DecoderError::InvalidSequenceDigit {
                    found: other as char,
                }),
            },
            b'3' => Ok(FrameKind::FlowControl),
            other => Err(DecoderError::UnknownFrameType {
                found: other as char,
            }),
        }
    }
}

impl fmt::Display for FrameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameKind::Single => write!(f, "single frame"),
            FrameKind::First => write!(f, "first frame"),
            FrameKind::Consecutive { .. } => write!(f, "consecutive frame"),
            FrameKind::FlowControl => write!(f, "flow control frame"),
        }
    }
}
