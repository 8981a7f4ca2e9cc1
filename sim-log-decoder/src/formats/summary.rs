//! Summary file lines
//!
//! A summary line has the extended layout
//! `k n esno nblk blkerr biterr avg_enc avg_dec`; the reader needs the code
//! parameters for filtering, Es/No and the average decode time.

use super::{classify, RawLine};
use crate::config::KnFilter;
use crate::types::SummaryPoint;

/// Minimum token count of a summary line
pub const SUMMARY_FIELDS: usize = 8;

/// The fields of a summary line used for comparison plots
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryLine {
    pub k: u64,
    pub n: u64,
    pub esno: f64,
    pub avg_decode_time: f64,
}

impl SummaryLine {
    pub fn point(&self) -> SummaryPoint {
        SummaryPoint {
            esno: self.esno,
            avg_decode_time: self.avg_decode_time,
        }
    }
}

/// Parse one summary line, or `None` for blanks, comments and malformed lines
pub fn parse_summary_line(line: &str) -> Option<SummaryLine> {
    let tokens = match classify(line) {
        RawLine::Ignored => return None,
        RawLine::Tokens(tokens) => tokens,
    };
    if tokens.len() < SUMMARY_FIELDS {
        return None;
    }

    Some(SummaryLine {
        k: tokens[0].parse().ok()?,
        n: tokens[1].parse().ok()?,
        esno: tokens[2].parse().ok()?,
        avg_decode_time: tokens[7].parse().ok()?,
    })
}

/// First line of `content` accepted by `filter`
pub fn first_match(content: &str, filter: &KnFilter) -> Option<SummaryLine> {
    content
        .lines()
        .filter_map(parse_summary_line)
        .find(|line| filter.matches(line.k, line.n))
}
