// src/index/store.rs
// =============================================================================
// Reading and writing index files.
//
// An index file is a JSON array of edges:
//   [[1,0,"http:"],[2,1,""],[3,2,"example.com"], ...]
// The order of the edges does not matter for loading.
// =============================================================================

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use super::{Edge, IndexError};

/// Writes `edges` to `path`, replacing any existing file.
pub fn write_index<I>(path: &Path, edges: I) -> Result<usize, IndexError>
where
    I: IntoIterator<Item = Edge>,
{
    let edges: Vec<Edge> = edges.into_iter().collect();
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, &edges)?;
    writer.flush()?;
    Ok(edges.len())
}

/// Loads every edge stored in `path`.
pub fn read_index(path: &Path) -> Result<Vec<Edge>, IndexError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}
