//! Plain-text event readers.
//!
//! One event per line, fields separated by whitespace:
//!
//! ```text
//! # references: query <location>
//! cat page1 10 20 30 40
//!
//! # hypotheses: query <location> score
//! cat page1 12 20 30 40 0.93
//! ```
//!
//! Lines whose first non-blank character is `#` and blank lines are skipped.
//! The number of location fields is given by [`Location::FIELDS`], so a line
//! with missing or extra fields is rejected with its line number.

use crate::error::ReaderError;
use crate::event::{Event, Location, ScoredEvent};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// Parses `query <location>`.
pub fn parse_reference<L: Location>(line: &str) -> Result<Event<L>, String> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    parse_event(&fields, 1 + L::FIELDS)
}

/// Parses `query <location> score`.
pub fn parse_hypothesis<L: Location>(line: &str) -> Result<ScoredEvent<L>, String> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let event = parse_event(&fields, 2 + L::FIELDS)?;
    let raw_score = fields[1 + L::FIELDS];
    let score: f64 = raw_score
        .parse()
        .map_err(|_| format!("invalid score {raw_score:?}"))?;
    Ok(event.with_score(score))
}

/// Parses the query and location of a line that must have `expected` fields.
fn parse_event<L: Location>(fields: &[&str], expected: usize) -> Result<Event<L>, String> {
    if fields.len() != expected {
        return Err(format!("expected {expected} fields, found {}", fields.len()));
    }
    let location = L::from_fields(&fields[1..1 + L::FIELDS]).map_err(|e| e.to_string())?;
    Ok(Event::new(fields[0], location))
}

fn is_skipped(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.is_empty() || trimmed.starts_with('#')
}

fn read_lines<T, R, F>(reader: R, parse: F) -> Result<Vec<T>, ReaderError>
where
    R: BufRead,
    F: Fn(&str) -> Result<T, String>,
{
    let mut events = Vec::new();
    for (n, line) in reader.lines().enumerate() {
        let line = line?;
        if is_skipped(&line) {
            continue;
        }
        let event = parse(&line).map_err(|message| ReaderError::Parse {
            line: n + 1,
            message,
        })?;
        events.push(event);
    }
    Ok(events)
}

/// Reads reference events from any buffered reader (a file, stdin, ...).
pub fn read_references_from_reader<L: Location, R: BufRead>(
    reader: R,
) -> Result<Vec<Event<L>>, ReaderError> {
    read_lines(reader, parse_reference)
}

/// Reads scored hypotheses from any buffered reader.
pub fn read_hypotheses_from_reader<L: Location, R: BufRead>(
    reader: R,
) -> Result<Vec<ScoredEvent<L>>, ReaderError> {
    read_lines(reader, parse_hypothesis)
}

/// Reads reference events from a file.
pub fn read_references<L: Location>(path: impl AsRef<Path>) -> Result<Vec<Event<L>>, ReaderError> {
    let path = path.as_ref();
    let events = read_references_from_reader(BufReader::new(File::open(path)?))?;
    debug!("Read {} references from {}", events.len(), path.display());
    Ok(events)
}

/// Reads scored hypotheses from a file.
pub fn read_hypotheses<L: Location>(
    path: impl AsRef<Path>,
) -> Result<Vec<ScoredEvent<L>>, ReaderError> {
    let path = path.as_ref();
    let events = read_hypotheses_from_reader(BufReader::new(File::open(path)?))?;
    debug!("Read {} hypotheses from {}", events.len(), path.display());
    Ok(events)
}
