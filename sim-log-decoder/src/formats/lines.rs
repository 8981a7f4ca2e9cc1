//! Per-line log shapes
//!
//! Two historical layouts are recognised, tried in a fixed priority order:
//!
//! - Compact (exactly 4 tokens): `blkerr biterrs enctime dectime`
//! - Extended (8 or more tokens): `k n esno nblk blkerr biterr avg_enc avg_dec`
//!
//! Only the error counts and the two times are extracted from the extended
//! layout here; the leading fields belong to the summary reader.

use super::{classify, RawLine};
use crate::types::ParsedRecord;

/// Outcome of classifying one line of a per-line log
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogLine {
    /// Blank or comment, not counted either way
    Ignored,
    /// A record from one of the recognised shapes
    Record(ParsedRecord),
    /// Wrong token count or a field that failed conversion
    Malformed,
}

/// The closed set of per-line layouts, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineShape {
    Compact,
    Extended,
}

impl LineShape {
    pub const PRIORITY: [LineShape; 2] = [LineShape::Compact, LineShape::Extended];

    /// Whether this shape claims a line with `count` tokens
    pub fn accepts(self, count: usize) -> bool {
        match self {
            LineShape::Compact => count == 4,
            LineShape::Extended => count >= 8,
        }
    }

    /// Index of the block-error field; the next three follow it
    fn first_field(self) -> usize {
        match self {
            LineShape::Compact => 0,
            LineShape::Extended => 4,
        }
    }

    /// Convert the typed fields, or `None` if any conversion fails
    pub fn extract(self, tokens: &[&str]) -> Option<ParsedRecord> {
        let fields = tokens.get(self.first_field()..self.first_field() + 4)?;
        Some(ParsedRecord {
            block_error: fields[0].parse().ok()?,
            bit_error: fields[1].parse().ok()?,
            encode_time: fields[2].parse().ok()?,
            decode_time: fields[3].parse().ok()?,
        })
    }
}

/// Classify one line of a per-line log
pub fn parse_log_line(line: &str) -> LogLine {
    let tokens = match classify(line) {
        RawLine::Ignored => return LogLine::Ignored,
        RawLine::Tokens(tokens) => tokens,
    };

    for shape in LineShape::PRIORITY {
        if shape.accepts(tokens.len()) {
            return match shape.extract(&tokens) {
                Some(record) => LogLine::Record(record),
                None => LogLine::Malformed,
            };
        }
    }
    LogLine::Malformed
}
