//! Parsing of ID list arguments
//!
//! File and share IDs are given as comma-separated lists; inclusive ranges
//! such as `10-14` expand to every ID in between.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Most IDs one list argument may expand to
pub const MAX_IDS: usize = 100;

/// A non-empty list of positive IDs, in the order given
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdList(Vec<i64>);

impl IdList {
    /// The IDs
    pub fn as_slice(&self) -> &[i64] {
        &self.0
    }

    /// Number of IDs
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false for a parsed list
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromStr for IdList {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self> {
        let mut ids = Vec::new();
        for part in input.split(',').map(str::trim) {
            if part.is_empty() {
                return Err(invalid(format!("empty entry in '{input}'")));
            }
            match part.split_once('-') {
                Some((start, end)) => {
                    let start = parse_id(start.trim())?;
                    let end = parse_id(end.trim())?;
                    if start > end {
                        return Err(invalid(format!("range {start}-{end} runs backwards")));
                    }
                    let span = usize::try_from(end - start).unwrap_or(usize::MAX);
                    if span >= MAX_IDS.saturating_sub(ids.len()) {
                        return Err(too_many());
                    }
                    ids.extend(start..=end);
                }
                None => ids.push(parse_id(part)?),
            }
            if ids.len() > MAX_IDS {
                return Err(too_many());
            }
        }
        Ok(Self(ids))
    }
}

impl fmt::Display for IdList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&parts.join(","))
    }
}

fn parse_id(raw: &str) -> Result<i64> {
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        Ok(_) => Err(invalid(format!("'{raw}' is not a positive ID"))),
        Err(_) => Err(invalid(format!("'{raw}' is not a number"))),
    }
}

fn invalid(message: String) -> Error {
    Error::invalid_value("ids", message)
}

fn too_many() -> Error {
    invalid(format!("at most {MAX_IDS} IDs per request"))
}
