//! CAN Transcript Decoder Library
//!
//! A small, stateless library for decoding textual transcripts of CAN bus
//! link-layer records into reassembled application-layer messages, following
//! the ISO-TP (ISO 15765-2) segmentation model: single-frame messages, and
//! multi-frame messages split across a first frame, one or more consecutive
//! frames, and an interleaved flow-control acknowledgment.
//!
//! # Architecture
//!
//! This library is intentionally minimal and focused on decoding:
//! - Validates the fixed 19-character line shape before interpretation
//! - Classifies each line into one of four frame kinds
//! - Reassembles multi-frame payloads with strict sequence checking
//! - Fails deterministically on the first violation, preserving every
//!   message completed before it
//!
//! The library does NOT:
//! - Read a live CAN bus
//! - Negotiate flow control (block size, separation time)
//! - Track multiple interleaved multi-frame conversations
//! - Skip bad lines - resilience policy belongs to the caller
//!
//! # Example Usage
//!
//! ```
//! use can_transcript_decoder::TranscriptDecoder;
//!
//! let decoder = TranscriptDecoder::new();
//! let transcript = decoder.decode_lines([
//!     "00103AABBCC00000000", // single frame, 3 bytes of payload
//! ]);
//!
//! assert!(transcript.is_complete());
//! assert_eq!(transcript.messages[0].payload, "AABBCC");
//! ```

// Public modules
pub mod cursor;
pub mod decoder;
pub mod frame;
pub mod types;

// Internal modules (not exposed in public API)
mod reassembly;

// Re-export main types for convenience
pub use cursor::LineCursor;
pub use decoder::{MessageIterator, TranscriptDecoder};
pub use frame::{FrameKind, TranscriptLine, LINE_LEN};
pub use types::{DecoderError, ParseFailure, ParsedMessage, Result, Transcript};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
