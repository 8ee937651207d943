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

// Record layout, one per active node, no header or footer:
//
//   node_id: u32   degree: u32   neighbor: u32 * degree
//
// All integers are little-endian. Readers find record boundaries only
// through the degree field.

use std::io::Write;

use byteorder::{LittleEndian, WriteBytesExt};

use crate::{csr::Csr, degree::Degrees, error::Result, progress::Progress, RECORD_HEADER_BYTES};

/// Active node ids in output order: ascending degree, ties by ascending id.
///
/// # Examples
///
/// ```
/// use adjbin::{degree::Degrees, encoder::emission_order, Edge};
///
/// let edges = vec![Edge(1, 2), Edge(2, 3), Edge(1, 3), Edge(1, 4)];
/// let degrees = Degrees::count(edges.into_iter().map(Ok)).unwrap();
///
/// assert_eq!(vec![4, 2, 3, 1], emission_order(&degrees));
/// ```
pub fn emission_order(degrees: &Degrees) -> Vec<u32>
{
    let mut order: Vec<u32> = degrees.active().collect();
    // `active` yields ids ascending and the sort is stable, which is what
    // orders equal degrees by id.
    order.sort_by_key(|&n| degrees.get(n));
    order
}

/// What [`encode`] wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Encoded
{
    pub records: usize,
    pub neighbors: usize,
    pub bytes: u64,
}

/// Writes one record per node of `order`.
///
/// The record id is always the original node id; only the neighbor values
/// reflect relabeling, if `csr` was relabeled.
pub fn encode<W: Write>(writer: &mut W, csr: &Csr, order: &[u32], progress: &Progress) -> Result<Encoded>
{
    let stage = progress.stage("writing", order.len());
    let mut encoded = Encoded::default();

    for &node in order {
        let neighbors = csr.neighbors(node);
        writer.write_u32::<LittleEndian>(node)?;
        writer.write_u32::<LittleEndian>(neighbors.len() as u32)?;
        for &neighbor in neighbors {
            writer.write_u32::<LittleEndian>(neighbor)?;
        }
        encoded.records += 1;
        encoded.neighbors += neighbors.len();
        encoded.bytes += (RECORD_HEADER_BYTES + 4 * neighbors.len()) as u64;
        stage.advance(1);
    }

    stage.finish();
    Ok(encoded)
}
