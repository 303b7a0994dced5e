//! Payload extraction and multi-frame reassembly
//!
//! Implements the decoding paths behind the driver: single-frame extraction,
//! first-frame decoding with its mandatory flow-control lookahead, and the
//! consecutive-frame accumulator. Everything here that reads past the
//! trigger line advances the shared cursor irreversibly.

use crate::cursor::LineCursor;
use crate::frame::{
    FrameKind, TranscriptLine, CF_STRIDE_HEX_CHARS, FLOW_CONTROL_TYPE, SF_MAX_HEX_CHARS,
};
use crate::types::{DecoderError, Result};

/// Extract the payload of a single-frame line.
///
/// The declared length is a decimal digit counting payload bytes; each byte
/// is two hex characters in the transcript. Terminal - consumes no further
/// lines.
pub(crate) fn decode_single_frame(line: &TranscriptLine) -> Result<String> {
    let digit = line.single_frame_len_digit();
    let declared = digit.to_digit(10).ok_or_else(|| DecoderError::InvalidLengthField {
        field: digit.to_string(),
    })? as usize;

    let hex_chars = declared * 2;
    if hex_chars > SF_MAX_HEX_CHARS {
        return Err(DecoderError::SingleFrameTooLarge { declared });
    }

    Ok(line.payload_region()[..hex_chars].to_string())
}

/// Decode a first frame and reassemble the full message payload.
///
/// Consumes the mandatory flow-control line and however many consecutive
/// frames the declared total length requires, all through the same cursor.
pub(crate) fn decode_first_frame(
    line: &TranscriptLine,
    cursor: &mut LineCursor<'_>,
) -> Result<String> {
    let len_field = line.first_frame_len_field();
    let total_bytes = usize::from_str_radix(len_field, 16).map_err(|_| {
        DecoderError::InvalidLengthField {
            field: len_field.to_string(),
        }
    })?;

    log::debug!("Reassembling {}-byte message for id {}", total_bytes, line.id());

    let mut state = Reassembly::start(line.first_frame_seed(), total_bytes * 2);
    expect_flow_control(cursor)?;
    state.accumulate(cursor)?;
    Ok(state.into_payload())
}

/// The line immediately after a first frame must be a `"30"` flow-control
/// acknowledgment; nothing may come between them.
fn expect_flow_control(cursor: &mut LineCursor<'_>) -> Result<()> {
    let raw = cursor.next_line()?.ok_or(DecoderError::UnexpectedEof)?;
    let line = TranscriptLine::parse(raw)?;
    if line.frame_type() == FLOW_CONTROL_TYPE {
        Ok(())
    } else {
        Err(DecoderError::MissingFlowControl {
            found: line.frame_type().to_string(),
        })
    }
}

/// Transient state of one multi-frame reassembly.
///
/// Created by the first-frame decoder and dropped when reassembly completes
/// or fails; nothing survives a failed attempt.
struct Reassembly {
    payload: String,
    remaining: isize,
    next_sequence: u32,
}

impl Reassembly {
    fn start(seed: &str, total_hex_chars: usize) -> Reassembly {
        Reassembly {
            remaining: total_hex_chars as isize - seed.len() as isize,
            payload: seed.to_string(),
            next_sequence: 1,
        }
    }

    /// Append consecutive-frame payloads until the declared length is satisfied.
    ///
    /// `remaining` drops by the full 14-character stride per accepted frame
    /// even when the final frame contributes fewer characters; sequence
    /// digits must count up from 1 with no gap or repeat.
    fn accumulate(&mut self, cursor: &mut LineCursor<'_>) -> Result<()> {
        while self.remaining > 0 {
            let raw = cursor.next_line()?.ok_or(DecoderError::UnexpectedEof)?;
            let line = TranscriptLine::parse(raw)?;

            let sequence = match FrameKind::classify(line.frame_type())? {
                FrameKind::Consecutive { sequence } => sequence,
                other => return Err(DecoderError::ExpectedConsecutiveFrame { found: other }),
            };
            if u32::from(sequence) != self.next_sequence {
                return Err(DecoderError::SequenceMismatch {
                    expected: self.next_sequence,
                    got: sequence.into(),
                });
            }

            let take = (self.remaining as usize).min(CF_STRIDE_HEX_CHARS);
            self.payload.push_str(&line.payload_region()[..take]);
            self.remaining -= CF_STRIDE_HEX_CHARS as isize;
            self.next_sequence += 1;

            log::trace!("Accepted consecutive frame {}, appended {} hex chars", sequence, take);
        }
        Ok(())
    }

    fn into_payload(self) -> String {
        self.payload
    }
}
