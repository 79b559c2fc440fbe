//! Index sidecar file
//!
//! Persists a [`PrimaryKeyIndex`] as `"<key> <offset>"` text lines.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use tracing::{debug, info, trace, warn};

use crate::error::Result;

use super::PrimaryKeyIndex;

impl PrimaryKeyIndex {
    /// Write the index to `path`, one line per entry in key order
    ///
    /// Replaces any existing sidecar. Keys containing a space or a line break
    /// are written as is but will not read back intact.
    pub fn write(&self, path: &Path) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);

        for (key, offset) in self.iter() {
            if key.contains([' ', '\n']) {
                warn!(key, "index key contains a separator and will not reload intact");
            }
            writeln!(writer, "{} {}", key, offset)?;
        }

        writer.flush()?;
        writer.get_ref().sync_all()?;

        info!(path = %path.display(), entries = self.len(), "wrote index sidecar");
        Ok(())
    }

    /// Load an index from the sidecar at `path`
    ///
    /// Lines without a space or with an unreadable offset are skipped.
    pub fn read(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let mut index = Self::new();
        let mut skipped = 0usize;

        for line in reader.lines() {
            let line = line?;
            match parse_index_line(&line) {
                Some((key, offset)) => {
                    index.insert(key, offset);
                }
                None => {
                    trace!(line = %line, "skipped malformed index line");
                    skipped += 1;
                }
            }
        }

        debug!(
            path = %path.display(),
            entries = index.len(),
            skipped,
            "read index sidecar"
        );
        Ok(index)
    }
}

/// Split a sidecar line on its first space into `(key, offset)`
pub fn parse_index_line(line: &str) -> Option<(&str, u64)> {
    let line = line.trim_end_matches('\r');
    let (key, offset) = line.split_once(' ')?;
    let offset = offset.trim().parse().ok()?;
    Some((key, offset))
}
