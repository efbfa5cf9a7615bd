use std::fmt;

use crate::error::RangeError;

/// An inclusive pair of 1-based indices as typed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    pub start: i64,
    pub end: i64,
}

impl Range {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Parses `start..end`. Ordering and positivity are left to the caller.
pub fn parse_range(text: &str) -> Result<Range, RangeError> {
    let parts: Vec<&str> = text.split("..").collect();
    let [start, end] = parts.as_slice() else {
        return Err(RangeError::InvalidFormat(text.to_string()));
    };

    let start = parse_bound(start)?;
    let end = parse_bound(end)?;
    Ok(Range { start, end })
}

fn parse_bound(text: &str) -> Result<i64, RangeError> {
    text.trim().parse().map_err(|_| RangeError::InvalidValue)
}
