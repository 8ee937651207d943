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

// Reads back what `encoder` writes. The format has no framing beyond the
// degree field, so a short read anywhere after the first byte of a record
// means the file is truncated.

use std::io::{self, ErrorKind, Read};

use byteorder::{ByteOrder, LittleEndian, ReadBytesExt};

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record
{
    pub node: u32,
    pub neighbors: Vec<u32>,
}

impl Record
{
    pub fn degree(&self) -> usize
    {
        self.neighbors.len()
    }
}

pub struct Records<R: Read>
{
    reader: R,
    done: bool,
}

impl<R: Read> Records<R>
{
    pub fn new(reader: R) -> Self
    {
        Self {
            reader,
            done: false,
        }
    }

    /// Reads the node id, telling a clean end of input apart from a
    /// partial one.
    fn first_word(&mut self) -> Result<Option<u32>>
    {
        let mut buf = [0u8; 4];
        let mut filled = 0;
        while filled < buf.len() {
            match self.reader.read(&mut buf[filled..]) {
                Ok(0) if filled == 0 => return Ok(None),
                Ok(0) => return Err(Error::Truncated),
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(Some(u32::from_le_bytes(buf)))
    }

    fn read_record(&mut self) -> Result<Option<Record>>
    {
        let node = match self.first_word()? {
            Some(node) => node,
            None => return Ok(None),
        };
        let degree = self.reader.read_u32::<LittleEndian>().map_err(truncated)?;

        // The degree is untrusted; let the buffer grow with the bytes read.
        let len = u64::from(degree) * 4;
        let mut raw = Vec::new();
        self.reader.by_ref().take(len).read_to_end(&mut raw)?;
        if (raw.len() as u64) < len {
            return Err(Error::Truncated);
        }
        let neighbors = raw.chunks_exact(4).map(LittleEndian::read_u32).collect();
        Ok(Some(Record { node, neighbors }))
    }
}

fn truncated(e: io::Error) -> Error
{
    if e.kind() == ErrorKind::UnexpectedEof {
        Error::Truncated
    }
    else {
        e.into()
    }
}

impl<R: Read> Iterator for Records<R>
{
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item>
    {
        if self.done {
            return None;
        }
        match self.read_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Summary of a binary adjacency file and the ordering properties the
/// downstream reader relies on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inspection
{
    pub records: usize,
    pub neighbors: usize,
    pub max_degree: usize,
    pub max_node: u32,
    pub max_neighbor: u32,
    /// Records appear in non-decreasing degree order.
    pub degree_ordered: bool,
    /// Every neighbor list is sorted ascending.
    pub neighbors_sorted: bool,
}

impl Inspection
{
    pub fn is_well_formed(&self) -> bool
    {
        self.degree_ordered && self.neighbors_sorted
    }
}

/// Decodes every record of `reader` and summarises them.
pub fn inspect<R: Read>(reader: R) -> Result<Inspection>
{
    let mut inspection = Inspection {
        degree_ordered: true,
        neighbors_sorted: true,
        ..Inspection::default()
    };
    let mut prev_degree = 0usize;

    for record in Records::new(reader) {
        let record = record?;
        let degree = record.degree();
        inspection.records += 1;
        inspection.neighbors += degree;
        inspection.max_degree = std::cmp::max(inspection.max_degree, degree);
        inspection.max_node = std::cmp::max(inspection.max_node, record.node);
        if let Some(&last) = record.neighbors.last() {
            inspection.max_neighbor = std::cmp::max(inspection.max_neighbor, last);
        }
        if degree < prev_degree {
            inspection.degree_ordered = false;
        }
        if !record.neighbors.windows(2).all(|w| w[0] <= w[1]) {
            inspection.neighbors_sorted = false;
            // Unsorted lists do not end with their maximum.
            let max = record.neighbors.iter().copied().max().unwrap_or(0);
            inspection.max_neighbor = std::cmp::max(inspection.max_neighbor, max);
        }
        prev_degree = degree;
    }

    Ok(inspection)
}

#[cfg(test)]
mod tests
{
    use super::*;

    fn bytes(words: &[u32]) -> Vec<u8>
    {
        words.iter().flat_map(|w| w.to_le_bytes()).collect()
    }

    #[test]
    fn test_decodes_records()
    {
        let data = bytes(&[4, 1, 1, 2, 2, 1, 3]);
        let records: Vec<Record> = Records::new(&data[..]).collect::<Result<_>>().unwrap();
        assert_eq!(
            records,
            vec![
                Record {
                    node: 4,
                    neighbors: vec![1]
                },
                Record {
                    node: 2,
                    neighbors: vec![1, 3]
                },
            ]
        );
    }

    #[test]
    fn test_zero_degree_record()
    {
        let data = bytes(&[7, 0]);
        let records: Vec<Record> = Records::new(&data[..]).collect::<Result<_>>().unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].neighbors.is_empty());
    }

    #[test]
    fn test_truncated_inputs()
    {
        let full = bytes(&[2, 2, 1, 3]);
        for cut in [2, 4, 6, 8, 12, 15] {
            let mut records = Records::new(&full[..cut]);
            assert!(
                matches!(records.next(), Some(Err(Error::Truncated))),
                "cut at {}",
                cut
            );
            assert!(records.next().is_none());
        }
    }

    #[test]
    fn test_huge_degree_without_neighbors()
    {
        let data = bytes(&[1, u32::MAX]);
        let mut records = Records::new(&data[..]);
        assert!(matches!(records.next(), Some(Err(Error::Truncated))));
        assert!(records.next().is_none());
        assert!(matches!(inspect(&data[..]), Err(Error::Truncated)));
    }

    #[test]
    fn test_inspect_flags_disorder()
    {
        let good = inspect(&bytes(&[4, 1, 1, 2, 2, 1, 3])[..]).unwrap();
        assert!(good.is_well_formed());
        assert_eq!(good.records, 2);
        assert_eq!(good.neighbors, 3);
        assert_eq!(good.max_neighbor, 3);

        let degree_disorder = inspect(&bytes(&[2, 2, 1, 3, 4, 1, 1])[..]).unwrap();
        assert!(!degree_disorder.degree_ordered);

        let unsorted = inspect(&bytes(&[2, 2, 9, 3])[..]).unwrap();
        assert!(!unsorted.neighbors_sorted);
        assert_eq!(unsorted.max_neighbor, 9);
    }
}
