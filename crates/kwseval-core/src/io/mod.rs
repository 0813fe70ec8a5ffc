//! Plain-text inputs and outputs of the evaluator.
//!
//! - [`reader`] - reference and hypothesis event files
//! - [`query_groups`] - query set and query group files
//! - [`dump`] - match dump for debugging

pub mod dump;
pub mod query_groups;
pub mod reader;

pub use dump::{dump_matches, write_matches, REPEATED_MATCHES_HEADER};
pub use query_groups::QueryGroups;
pub use reader::{
    parse_hypothesis, parse_reference, read_hypotheses, read_hypotheses_from_reader,
    read_references, read_references_from_reader,
};
