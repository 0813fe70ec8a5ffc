//! Text dump of match outcomes for debugging submissions.

use crate::matching::Match;
use std::fmt::Display;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Separates primary matches from the ignored repeated matches.
pub const REPEATED_MATCHES_HEADER: &str = "#### REPEATED MATCHES ####";

/// Writes every match on its own line, then the repeated matches prefixed
/// with `## `.
pub fn write_matches<W: Write, L: Display>(
    mut writer: W,
    matches: &[Match<L>],
    repeated: &[Match<L>],
) -> io::Result<()> {
    for m in matches {
        writeln!(writer, "{m}")?;
    }
    writeln!(writer, "{REPEATED_MATCHES_HEADER}")?;
    for m in repeated {
        writeln!(writer, "## {m}")?;
    }
    writer.flush()
}

/// Writes the match dump to a file, replacing it if it exists.
pub fn dump_matches<L: Display>(
    path: impl AsRef<Path>,
    matches: &[Match<L>],
    repeated: &[Match<L>],
) -> io::Result<()> {
    let file = File::create(path)?;
    write_matches(BufWriter::new(file), matches, repeated)
}
