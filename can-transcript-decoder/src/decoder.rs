//! Transcript decoding driver
//!
//! This module provides the primary interface for the decoder library. The
//! driver reads one trigger line at a time, classifies it, and dispatches to
//! the single-frame or first-frame decode path; first-frame decoding is the
//! only place with stream lookahead, and it reads through the same cursor.
//! Messages completed before a failure always survive it.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::cursor::LineCursor;
use crate::frame::{FrameKind, TranscriptLine};
use crate::reassembly;
use crate::types::{DecoderError, ParseFailure, ParsedMessage, Result, Transcript};

/// The main decoder - entry point for all transcript decoding
///
/// The decoder is stateless; every call runs an independent parse.
pub struct TranscriptDecoder;

impl TranscriptDecoder {
    /// Create a new decoder instance
    pub fn new() -> Self {
        TranscriptDecoder
    }

    /// Decode a transcript file.
    ///
    /// # Arguments
    /// * `path` - Path to the transcript file
    ///
    /// # Returns
    /// * `Ok(Transcript)` with the decoded messages (and the failure that
    ///   ended the parse, if any)
    /// * `Err` only if the file could not be opened
    ///
    /// # Example
    /// ```no_run
    /// use can_transcript_decoder::TranscriptDecoder;
    /// use std::path::Path;
    ///
    /// let decoder = TranscriptDecoder::new();
    /// let transcript = decoder.decode_file(Path::new("transcript.txt")).unwrap();
    /// for message in &transcript.messages {
    ///     println!("{}", message);
    /// }
    /// ```
    pub fn decode_file(&self, path: &Path) -> Result<Transcript> {
        log::info!("Decoding transcript file: {:?}", path);
        let file = File::open(path)?;
        Ok(self.decode_reader(BufReader::new(file)))
    }

    /// Decode all lines from a buffered reader.
    pub fn decode_reader<'a, R: BufRead + 'a>(&self, reader: R) -> Transcript {
        self.decode_cursor(LineCursor::from_reader(reader))
    }

    /// Decode an in-memory line sequence.
    pub fn decode_lines<I, S>(&self, lines: I) -> Transcript
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines: Vec<String> = lines.into_iter().map(Into::into).collect();
        self.decode_cursor(LineCursor::from_lines(lines))
    }

    /// Drive a full parse over an explicit cursor.
    ///
    /// Collects messages until the stream is exhausted or a terminal error
    /// occurs; on error the messages decoded so far are preserved next to
    /// the failure.
    pub fn decode_cursor(&self, cursor: LineCursor<'_>) -> Transcript {
        let mut transcript = Transcript::default();
        for item in MessageIterator::new(cursor) {
            match item {
                Ok(message) => transcript.messages.push(message),
                Err(failure) => {
                    transcript.failure = Some(failure);
                    break;
                }
            }
        }
        transcript
    }
}

impl Default for TranscriptDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator yielding one decoded message per trigger line
///
/// Stream exhaustion at a trigger position ends iteration cleanly - that is
/// success, not an error. After yielding an `Err` the iterator is fused;
/// the cursor never rewinds.
pub struct MessageIterator<'a> {
    cursor: LineCursor<'a>,
    failed: bool,
}

impl<'a> MessageIterator<'a> {
    /// Wrap a cursor into a lazy message iterator
    pub fn new(cursor: LineCursor<'a>) -> Self {
        MessageIterator {
            cursor,
            failed: false,
        }
    }

    /// Decode one message starting from the given trigger line.
    ///
    /// Consecutive and flow-control frames are only legal as lookahead
    /// inside first-frame decoding, never as triggers.
    fn decode_trigger(&mut self, raw: String) -> Result<ParsedMessage> {
        let line = TranscriptLine::parse(raw)?;
        let kind = FrameKind::classify(line.frame_type())?;
        let payload = match kind {
            FrameKind::Single => reassembly::decode_single_frame(&line)?,
            FrameKind::First => reassembly::decode_first_frame(&line, &mut self.cursor)?,
            FrameKind::Consecutive { .. } | FrameKind::FlowControl => {
                return Err(DecoderError::UnexpectedFrameAsTrigger { kind });
            }
        };

        log::debug!("Decoded message {} ({} bytes)", line.id(), payload.len() / 2);
        Ok(ParsedMessage {
            id: line.id().to_string(),
            payload,
        })
    }
}

impl Iterator for MessageIterator<'_> {
    type Item = std::result::Result<ParsedMessage, ParseFailure>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        let raw = match self.cursor.next_line() {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(error) => {
                self.failed = true;
                return Some(Err(ParseFailure {
                    line: self.cursor.line_number(),
                    error,
                }));
            }
        };

        match self.decode_trigger(raw) {
            Ok(message) => Some(Ok(message)),
            Err(error) => {
                self.failed = true;
                Some(Err(ParseFailure {
                    line: self.cursor.line_number(),
                    error,
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_transcript_is_complete() {
        let transcript = TranscriptDecoder::new().decode_lines(Vec::<String>::new());
        assert!(transcript.is_complete());
        assert!(transcript.messages.is_empty());
    }

    #[test]
    fn test_mixed_single_and_multi_frame_messages() {
        let transcript = TranscriptDecoder::new().decode_lines([
            "00103AABBCC00000000",
            "7E810140102030405CC",
            "7E03000000000000000",
            "7E821AABBCCDDEEFF00",
            "7E82211223344556677",
            "0020201020000000000",
        ]);
        assert!(transcript.is_complete());
        assert_eq!(transcript.messages.len(), 3);
        assert_eq!(transcript.messages[0].id, "001");
        assert_eq!(transcript.messages[0].payload, "AABBCC");
        assert_eq!(transcript.messages[1].id, "7E8");
        assert_eq!(
            transcript.messages[1].payload,
            "0102030405CCAABBCCDDEEFF0011223344556677"
        );
        assert_eq!(transcript.messages[2].id, "002");
        assert_eq!(transcript.messages[2].payload, "0102");
    }

    #[test]
    fn test_consecutive_frame_as_trigger() {
        let transcript = TranscriptDecoder::new().decode_lines(["7E821AABBCCDDEEFF00"]);
        let failure = transcript.failure.unwrap();
        assert_eq!(failure.line, 1);
        assert!(matches!(
            failure.error,
            DecoderError::UnexpectedFrameAsTrigger {
                kind: FrameKind::Consecutive { sequence: 1 }
            }
        ));
    }

    #[test]
    fn test_flow_control_as_trigger() {
        let transcript = TranscriptDecoder::new().decode_lines(["7E03000000000000000"]);
        let failure = transcript.failure.unwrap();
        assert!(matches!(
            failure.error,
            DecoderError::UnexpectedFrameAsTrigger {
                kind: FrameKind::FlowControl
            }
        ));
    }

    #[test]
    fn test_completed_messages_survive_failure() {
        let transcript = TranscriptDecoder::new().decode_lines([
            "00103AABBCC00000000",
            "too short",
            "0020201020000000000",
        ]);
        assert_eq!(transcript.messages.len(), 1);
        assert_eq!(transcript.messages[0].payload, "AABBCC");

        let failure = transcript.failure.unwrap();
        assert_eq!(failure.line, 2);
        assert!(matches!(failure.error, DecoderError::MalformedLine { actual_length: 9 }));
    }

    #[test]
    fn test_iterator_is_fused_after_error() {
        let cursor = LineCursor::from_lines([
            "XYZ99nonsense000000",
            "00103AABBCC00000000",
        ]);
        let mut iter = MessageIterator::new(cursor);
        assert!(iter.next().unwrap().is_err());
        // the valid line after the failure is never looked at
        assert!(iter.next().is_none());
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_failure_line_points_at_lookahead_line() {
        // the sequence error is on line 4, not on the trigger line
        let transcript = TranscriptDecoder::new().decode_lines([
            "7E810140102030405CC",
            "7E03000000000000000",
            "7E821AABBCCDDEEFF00",
            "7E82911223344556677",
        ]);
        let failure = transcript.failure.unwrap();
        assert_eq!(failure.line, 4);
        assert!(matches!(
            failure.error,
            DecoderError::SequenceMismatch { expected: 2, got: 9 }
        ));
    }

    #[test]
    fn test_unknown_frame_type_as_trigger() {
        let transcript = TranscriptDecoder::new().decode_lines(["0014001020304050607"]);
        let failure = transcript.failure.unwrap();
        assert!(matches!(
            failure.error,
            DecoderError::UnknownFrameType { found: '4' }
        ));
    }

    #[test]
    fn test_decode_reader() {
        let data: &[u8] = b"00103AABBCC00000000\n0020201020000000000\n";
        let transcript = TranscriptDecoder::new().decode_reader(data);
        assert!(transcript.is_complete());
        assert_eq!(transcript.messages.len(), 2);
    }
}
