//! Query sets and query groups.
//!
//! A *query set* file lists query ids separated by whitespace; each query
//! becomes its own group. A *query groups* file has one group per line:
//!
//! ```text
//! # group query [query ...]
//! felines cat kitten
//! canines dog puppy
//! ```
//!
//! Blank lines and `#` comments are skipped in both formats. A group row with
//! fewer than two fields is a configuration error.

use crate::error::QueryGroupError;
use crate::event::HasQuery;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::info;

/// Mapping from query id to query group id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryGroups {
    query_to_group: HashMap<String, String>,
}

fn content_lines<R: BufRead>(reader: R) -> impl Iterator<Item = (usize, std::io::Result<String>)> {
    reader.lines().enumerate().map(|(n, line)| (n + 1, line))
}

fn is_skipped(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.is_empty() || trimmed.starts_with('#')
}

impl QueryGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a query set: every query forms its own group.
    pub fn from_query_set_reader<R: BufRead>(reader: R) -> Result<Self, QueryGroupError> {
        let mut groups = Self::new();
        for (_, line) in content_lines(reader) {
            let line = line?;
            if is_skipped(&line) {
                continue;
            }
            for query in line.split_whitespace() {
                groups.insert(query, query);
            }
        }
        Ok(groups)
    }

    /// Reads `group query [query ...]` rows.
    pub fn from_query_groups_reader<R: BufRead>(reader: R) -> Result<Self, QueryGroupError> {
        let mut groups = Self::new();
        for (n, line) in content_lines(reader) {
            let line = line?;
            if is_skipped(&line) {
                continue;
            }
            let mut fields = line.split_whitespace();
            let (Some(group), Some(first)) = (fields.next(), fields.next()) else {
                return Err(QueryGroupError::MalformedRow { line: n });
            };
            for query in std::iter::once(first).chain(fields) {
                groups.insert(query, group);
            }
        }
        Ok(groups)
    }

    /// Reads a query set file.
    pub fn read_query_set(path: impl AsRef<Path>) -> Result<Self, QueryGroupError> {
        let path = path.as_ref();
        let groups = Self::from_query_set_reader(BufReader::new(File::open(path)?))?;
        info!("{} queries were read from {}", groups.len(), path.display());
        Ok(groups)
    }

    /// Reads a query groups file.
    pub fn read_query_groups(path: impl AsRef<Path>) -> Result<Self, QueryGroupError> {
        let path = path.as_ref();
        let groups = Self::from_query_groups_reader(BufReader::new(File::open(path)?))?;
        info!(
            "{} queries in {} groups were read from {}",
            groups.len(),
            groups.num_groups(),
            path.display()
        );
        Ok(groups)
    }

    /// Assigns a query to a group, replacing any previous assignment.
    pub fn insert(&mut self, query: impl Into<String>, group: impl Into<String>) {
        self.query_to_group.insert(query.into(), group.into());
    }

    pub fn group_of(&self, query: &str) -> Option<&str> {
        self.query_to_group.get(query).map(String::as_str)
    }

    pub fn contains(&self, query: &str) -> bool {
        self.query_to_group.contains_key(query)
    }

    /// Number of queries.
    pub fn len(&self) -> usize {
        self.query_to_group.len()
    }

    pub fn is_empty(&self) -> bool {
        self.query_to_group.is_empty()
    }

    /// Number of distinct groups.
    pub fn num_groups(&self) -> usize {
        self.query_to_group.values().collect::<HashSet<_>>().len()
    }

    /// The query to group map, as consumed by
    /// [`group_matches_by_query_group`](crate::evaluation::group_matches_by_query_group).
    pub fn mapping(&self) -> &HashMap<String, String> {
        &self.query_to_group
    }

    /// Drops events whose query is not listed. Returns how many were dropped.
    pub fn filter_events<E: HasQuery>(&self, events: &mut Vec<E>) -> usize {
        let before = events.len();
        events.retain(|e| self.contains(e.query()));
        before - events.len()
    }
}
