//! Forward-only access to the transcript line stream
//!
//! The reassembly engine never touches a file handle directly. All lookahead
//! goes through a [`LineCursor`] that owns the underlying line sequence and
//! only ever moves forward, even on error. Substituting an in-memory line
//! sequence keeps the whole decoder testable without real I/O.

use std::io::BufRead;

use crate::types::Result;

/// Cursor over a finite, ordered sequence of transcript lines.
///
/// The decoder asks the cursor for exactly one thing: the next line, or
/// "exhausted". There is a single owner and the cursor is never rewound.
pub struct LineCursor<'a> {
    lines: Box<dyn Iterator<Item = Result<String>> + 'a>,
    line_no: usize,
}

impl<'a> LineCursor<'a> {
    /// Cursor over the lines of a buffered reader.
    ///
    /// Read failures surface as [`DecoderError::Io`](crate::DecoderError::Io)
    /// from [`next_line`](Self::next_line).
    pub fn from_reader<R: BufRead + 'a>(reader: R) -> Self {
        LineCursor {
            lines: Box::new(reader.lines().map(|line| line.map_err(Into::into))),
            line_no: 0,
        }
    }

    /// Cursor over an in-memory line sequence.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        I::IntoIter: 'a,
        S: Into<String> + 'a,
    {
        LineCursor {
            lines: Box::new(lines.into_iter().map(|line| Ok(line.into()))),
            line_no: 0,
        }
    }

    /// Advance to the next line.
    ///
    /// Returns `Ok(None)` once the stream is exhausted. A read error still
    /// advances the cursor, so [`line_number`](Self::line_number) names the
    /// unreadable line.
    pub fn next_line(&mut self) -> Result<Option<String>> {
        match self.lines.next() {
            Some(Ok(line)) => {
                self.line_no += 1;
                Ok(Some(line))
            }
            Some(Err(e)) => {
                self.line_no += 1;
                Err(e)
            }
            None => Ok(None),
        }
    }

    /// 1-based number of the line most recently yielded (0 before any read)
    pub fn line_number(&self) -> usize {
        self.line_no
    }
}
