//! Whitespace-delimited edge-list and label-list files for tessella.
//!
//! The format is two text files. Each non-empty, non-comment line of the
//! edges file holds two integer node ids; each such line of the labels file
//! holds a node id and an integer label. Comments start at the first `#` or
//! `//` and run to end of line; lines with fewer than two tokens are
//! skipped; self-loops are skipped on read and never written.

use std::{
    fmt,
    fs::File,
    io::{self, BufRead, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use thiserror::Error;

use tessella_core::{Cell, Graph};

/// Stable codes describing [`EdgeListError`] variants.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum EdgeListErrorCode {
    /// An underlying I/O operation failed.
    Io,
    /// A line held tokens that did not parse as integers.
    Parse,
    /// An exported cell was not collapsed.
    NotCollapsed,
}

impl EdgeListErrorCode {
    /// Return the stable machine-readable representation of this error code.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Io => "EDGELIST_IO",
            Self::Parse => "EDGELIST_PARSE",
            Self::NotCollapsed => "EDGELIST_NOT_COLLAPSED",
        }
    }
}

impl fmt::Display for EdgeListErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error raised while reading or writing edge-list files.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum EdgeListError {
    /// An underlying I/O operation failed.
    #[error("i/o failure on `{path}`: {source}")]
    Io {
        /// File the operation touched.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// A line held tokens that did not parse as integers.
    #[error("line {line} is not parseable: `{content}`")]
    Parse {
        /// One-based line number within the offending file.
        line: usize,
        /// The raw line content after comment stripping.
        content: String,
    },
    /// An exported cell was not collapsed.
    #[error("cannot export: cell {index} is still uncollapsed")]
    NotCollapsed {
        /// Zero-based index of the uncollapsed cell.
        index: usize,
    },
}

impl EdgeListError {
    /// Retrieve the stable [`EdgeListErrorCode`] for this error.
    pub const fn code(&self) -> EdgeListErrorCode {
        match self {
            Self::Io { .. } => EdgeListErrorCode::Io,
            Self::Parse { .. } => EdgeListErrorCode::Parse,
            Self::NotCollapsed { .. } => EdgeListErrorCode::NotCollapsed,
        }
    }

    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Wraps a stream-level error from a reader/writer without a path.
    fn bare_io(source: io::Error) -> Self {
        Self::Io {
            path: PathBuf::new(),
            source,
        }
    }

    /// Attaches the file path to path-less I/O errors from stream helpers.
    fn with_io_path(self, path: &Path) -> Self {
        match self {
            Self::Io { path: empty, source } if empty.as_os_str().is_empty() => {
                Self::io(path, source)
            }
            other => other,
        }
    }
}

/// Loads training graphs from edge and label files.
pub struct Reader;

impl Reader {
    /// Reads both files and returns the populated graph.
    ///
    /// Edges load first, then labels; nodes named only in the labels file
    /// still exist, and nodes without a label line keep label 0.
    ///
    /// # Errors
    /// Returns [`EdgeListError::Io`] on file errors and
    /// [`EdgeListError::Parse`] on unparseable integer tokens.
    pub fn load(edges_path: &Path, labels_path: &Path) -> Result<Graph, EdgeListError> {
        let mut graph = Graph::new();
        let edges = File::open(edges_path).map_err(|source| EdgeListError::io(edges_path, source))?;
        Self::read_edges(BufReader::new(edges), &mut graph)
            .map_err(|err| err.with_io_path(edges_path))?;
        let labels = File::open(labels_path).map_err(|source| EdgeListError::io(labels_path, source))?;
        Self::read_labels(BufReader::new(labels), &mut graph)
            .map_err(|err| err.with_io_path(labels_path))?;
        Ok(graph)
    }

    /// Reads undirected edges from a buffered source into the graph.
    ///
    /// Self-loops and duplicate edges are rejected by the graph itself.
    ///
    /// # Errors
    /// Returns [`EdgeListError::Parse`] when a token is not an integer.
    pub fn read_edges(reader: impl BufRead, graph: &mut Graph) -> Result<(), EdgeListError> {
        for_each_pair(reader, |u, v| {
            graph.add_edge(u, v);
        })
    }

    /// Reads `id label` lines from a buffered source into the graph.
    ///
    /// # Errors
    /// Returns [`EdgeListError::Parse`] when a token is not an integer.
    pub fn read_labels(reader: impl BufRead, graph: &mut Graph) -> Result<(), EdgeListError> {
        for_each_signed_pair(reader, |id, label| graph.set_label(id, label))
    }
}

/// Writes generated graphs as edge and label files.
pub struct Exporter;

impl Exporter {
    /// Writes the cells and adjacency to the two output files.
    ///
    /// Node indices are zero-based positions in `cells`; each undirected
    /// edge appears once with `u < v`; label lines are `index label`.
    ///
    /// # Errors
    /// Returns [`EdgeListError::NotCollapsed`] when any cell is still open
    /// and [`EdgeListError::Io`] on file errors.
    pub fn export(
        cells: &[Cell],
        adjacency: &[Vec<usize>],
        edges_path: &Path,
        labels_path: &Path,
    ) -> Result<(), EdgeListError> {
        let edges = File::create(edges_path).map_err(|source| EdgeListError::io(edges_path, source))?;
        Self::write_edges(BufWriter::new(edges), adjacency)
            .map_err(|err| err.with_io_path(edges_path))?;
        let labels = File::create(labels_path).map_err(|source| EdgeListError::io(labels_path, source))?;
        Self::write_labels(BufWriter::new(labels), cells)
            .map_err(|err| err.with_io_path(labels_path))?;
        Ok(())
    }

    /// Writes each undirected edge once, smaller index first.
    ///
    /// # Errors
    /// Returns [`EdgeListError::Io`] when the sink fails.
    pub fn write_edges(
        mut writer: impl Write,
        adjacency: &[Vec<usize>],
    ) -> Result<(), EdgeListError> {
        for (u, neighbours) in adjacency.iter().enumerate() {
            for &v in neighbours {
                if u < v {
                    writeln!(writer, "{u} {v}").map_err(EdgeListError::bare_io)?;
                }
            }
        }
        writer.flush().map_err(EdgeListError::bare_io)
    }

    /// Writes `index label` per cell, validating collapse state.
    ///
    /// # Errors
    /// Returns [`EdgeListError::NotCollapsed`] for the first open cell and
    /// [`EdgeListError::Io`] when the sink fails.
    pub fn write_labels(mut writer: impl Write, cells: &[Cell]) -> Result<(), EdgeListError> {
        for (index, cell) in cells.iter().enumerate() {
            let Some(label) = cell.center_label() else {
                return Err(EdgeListError::NotCollapsed { index });
            };
            writeln!(writer, "{index} {label}").map_err(EdgeListError::bare_io)?;
        }
        writer.flush().map_err(EdgeListError::bare_io)
    }
}

/// Strips comments, splits tokens, and invokes `apply` per unsigned pair.
fn for_each_pair(
    reader: impl BufRead,
    mut apply: impl FnMut(u32, u32),
) -> Result<(), EdgeListError> {
    for_each_line(reader, |line_number, first, second| {
        let u = first
            .parse::<u32>()
            .map_err(|_| parse_error(line_number, first, second))?;
        let v = second
            .parse::<u32>()
            .map_err(|_| parse_error(line_number, first, second))?;
        apply(u, v);
        Ok(())
    })
}

/// Like [`for_each_pair`] but the second token may be negative.
fn for_each_signed_pair(
    reader: impl BufRead,
    mut apply: impl FnMut(u32, i32),
) -> Result<(), EdgeListError> {
    for_each_line(reader, |line_number, first, second| {
        let id = first
            .parse::<u32>()
            .map_err(|_| parse_error(line_number, first, second))?;
        let label = second
            .parse::<i32>()
            .map_err(|_| parse_error(line_number, first, second))?;
        apply(id, label);
        Ok(())
    })
}

fn parse_error(line: usize, first: &str, second: &str) -> EdgeListError {
    EdgeListError::Parse {
        line,
        content: format!("{first} {second}"),
    }
}

fn for_each_line(
    reader: impl BufRead,
    mut apply: impl FnMut(usize, &str, &str) -> Result<(), EdgeListError>,
) -> Result<(), EdgeListError> {
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(EdgeListError::bare_io)?;
        let stripped = strip_comments(&line).trim();
        if stripped.is_empty() {
            continue;
        }
        let mut tokens = stripped.split_whitespace();
        let (Some(first), Some(second)) = (tokens.next(), tokens.next()) else {
            continue;
        };
        apply(index + 1, first, second)?;
    }
    Ok(())
}

/// Returns the line content before the first `#` or `//` marker.
fn strip_comments(line: &str) -> &str {
    let hash = line.find('#');
    let slashes = line.find("//");
    match (hash, slashes) {
        (Some(a), Some(b)) => &line[..a.min(b)],
        (Some(a), None) => &line[..a],
        (None, Some(b)) => &line[..b],
        (None, None) => line,
    }
}

#[cfg(test)]
mod tests {
    use super::strip_comments;

    use rstest::rstest;

    #[rstest]
    #[case("1 2", "1 2")]
    #[case("1 2 # trailing", "1 2 ")]
    #[case("1 2 // trailing", "1 2 ")]
    #[case("// all comment", "")]
    #[case("3 4 # first // second", "3 4 ")]
    fn comments_start_at_the_earliest_marker(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(strip_comments(input), expected);
    }
}
