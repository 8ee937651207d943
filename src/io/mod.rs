// adjbin converts undirected edge lists into binary adjacency records
// Copyright (C) 2022 Jacob Konrad
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Replayable edge list inputs.
//!
//! The converter reads its input twice, once to count degrees and once to
//! fill the adjacency buffer, so inputs are modelled as [`EdgeSource`]s that
//! can start a fresh pass on demand rather than as one-shot iterators.

use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

#[cfg(feature = "gz")]
use flate2::read::GzDecoder;

use crate::{error::Result, Edge, MEBIBYTE};

mod text;

pub use text::{parse_line, EdgeLines};

/// An input that can be read from the start any number of times.
pub trait EdgeSource
{
    type Edges: Iterator<Item = Result<Edge>>;

    /// Starts a new pass over the input. Every pass must yield the same
    /// edges in the same order.
    fn edges(&self) -> Result<Self::Edges>;
}

/// An edge list on disk, reopened for every pass. Paths ending in `.gz` are
/// decompressed on the fly.
#[derive(Debug, Clone)]
pub struct EdgeFile
{
    path: PathBuf,
}

impl EdgeFile
{
    pub fn new<P: AsRef<Path>>(path: P) -> Self
    {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path
    {
        &self.path
    }

    fn is_gzip(&self) -> bool
    {
        self.path.extension().map_or(false, |ext| ext == "gz")
    }
}

pub enum Iter
{
    Text(EdgeLines<BufReader<File>>),
    #[cfg(feature = "gz")]
    TextGz(EdgeLines<BufReader<GzDecoder<File>>>),
}

impl Iterator for Iter
{
    type Item = Result<Edge>;

    fn next(&mut self) -> Option<Self::Item>
    {
        match self {
            Self::Text(iter) => iter.next(),
            #[cfg(feature = "gz")]
            Self::TextGz(iter) => iter.next(),
        }
    }
}

impl EdgeSource for EdgeFile
{
    type Edges = Iter;

    fn edges(&self) -> Result<Iter>
    {
        let file = File::open(&self.path)?;
        if self.is_gzip() {
            #[cfg(feature = "gz")]
            {
                let reader = BufReader::with_capacity(MEBIBYTE, GzDecoder::new(file));
                return Ok(Iter::TextGz(EdgeLines::new(reader)));
            }
            #[cfg(not(feature = "gz"))]
            tracing::warn!(
                "{} looks gzip compressed but the gz feature is disabled, reading it as text",
                self.path.display()
            );
        }
        Ok(Iter::Text(EdgeLines::new(BufReader::with_capacity(
            MEBIBYTE, file,
        ))))
    }
}

/// An edge list already held in memory.
///
/// # Examples
///
/// ```
/// use adjbin::io::{EdgeSource, EdgeText};
/// use adjbin::Edge;
///
/// let text = EdgeText::new("# comment\n1 2\n2 3\n");
/// let edges: Vec<Edge> = text.edges().unwrap().map(Result::unwrap).collect();
/// assert_eq!(edges, vec![Edge(1, 2), Edge(2, 3)]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct EdgeText<'a>
{
    bytes: &'a [u8],
}

impl<'a> EdgeText<'a>
{
    pub fn new<T: AsRef<[u8]> + ?Sized>(text: &'a T) -> Self
    {
        Self {
            bytes: text.as_ref(),
        }
    }
}

impl<'a> EdgeSource for EdgeText<'a>
{
    type Edges = EdgeLines<&'a [u8]>;

    fn edges(&self) -> Result<Self::Edges>
    {
        Ok(EdgeLines::new(self.bytes))
    }
}

#[cfg(test)]
mod tests
{
    use std::io::Write;

    use super::*;

    #[test]
    fn test_file_replays_identically()
    {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "# edges\n1 2\n\n2 3 ignored\n3 1\n").unwrap();
        let source = EdgeFile::new(file.path());

        let first: Vec<Edge> = source.edges().unwrap().map(Result::unwrap).collect();
        let second: Vec<Edge> = source.edges().unwrap().map(Result::unwrap).collect();
        assert_eq!(first, vec![Edge(1, 2), Edge(2, 3), Edge(3, 1)]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_file_is_io_error()
    {
        let dir = tempfile::tempdir().unwrap();
        let source = EdgeFile::new(dir.path().join("nope.txt"));
        assert!(matches!(source.edges(), Err(crate::Error::Io(_))));
    }

    #[cfg(feature = "gz")]
    #[test]
    fn test_reads_gzip_input()
    {
        use flate2::{write::GzEncoder, Compression};

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.txt.gz");
        let mut encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        encoder.write_all(b"1 2\n# skip\n4 1\n").unwrap();
        encoder.finish().unwrap();

        let edges: Vec<Edge> = EdgeFile::new(&path)
            .edges()
            .unwrap()
            .map(Result::unwrap)
            .collect();
        assert_eq!(edges, vec![Edge(1, 2), Edge(4, 1)]);
    }
}
