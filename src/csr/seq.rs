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

use crate::{
    error::{Error, Result},
    Edge,
};

/// Exclusive prefix sum of the degree table, `max_node_id + 2` entries long.
pub fn offsets(degree: &[u32], max_node_id: u32) -> Vec<usize>
{
    let len = max_node_id as usize + 2;
    let mut offsets = Vec::with_capacity(len);
    let mut sum = 0usize;
    offsets.push(sum);
    for n in 0..(len - 1) {
        sum += degree.get(n).copied().unwrap_or(0) as usize;
        offsets.push(sum);
    }
    offsets
}

#[inline]
fn place(neighbors: &mut [u32], cursors: &mut [usize], offsets: &[usize], node: u32, neighbor: u32) -> Result<()>
{
    let n = node as usize;
    match cursors.get_mut(n) {
        Some(pos) if *pos < offsets[n + 1] => {
            neighbors[*pos] = neighbor;
            *pos += 1;
            Ok(())
        }
        _ => Err(Error::PassMismatch { node }),
    }
}

/// Second pass: scatters every edge into both endpoints' slices.
///
/// `offsets` is only read; a private copy serves as the per-node write
/// cursor. Every cursor must end exactly at the next node's offset.
pub fn fill<I>(offsets: &[usize], edges: I) -> Result<Vec<u32>>
where
    I: IntoIterator<Item = Result<Edge>>,
{
    let num_nodes = offsets.len() - 1;
    let total = offsets[num_nodes];
    let mut neighbors = vec![0u32; total];
    let mut cursors = offsets[..num_nodes].to_vec();

    for edge in edges {
        let Edge(u, v) = edge?;
        place(&mut neighbors, &mut cursors, offsets, u, v)?;
        place(&mut neighbors, &mut cursors, offsets, v, u)?;
    }

    for (n, (&cursor, &end)) in cursors.iter().zip(&offsets[1..]).enumerate() {
        if cursor != end {
            return Err(Error::PassMismatch { node: n as u32 });
        }
    }

    Ok(neighbors)
}
