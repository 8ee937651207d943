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

//! Compressed Sparse Row representation of an undirected graph, built in two
//! streaming passes so that no per-node list is ever allocated.

use tracing::info;

use crate::{degree::Degrees, error::Result, io::EdgeSource, progress::Progress, Edge};

mod par;

mod seq;

/// The Compressed Sparse Row struct.
///
/// `offsets` is fixed once built; only the contents of `neighbors` change
/// afterwards (relabeling, sorting).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Csr
{
    offsets: Vec<usize>,
    neighbors: Vec<u32>,
}

impl Csr
{
    /// Runs the second pass over `source`.
    pub fn build<S>(degrees: &Degrees, source: &S) -> Result<Self>
    where
        S: EdgeSource + ?Sized,
    {
        Self::from_edges(degrees, source.edges()?)
    }

    /// Builds the adjacency from the same edges `degrees` was counted from.
    ///
    /// # Examples
    ///
    /// ```
    /// use adjbin::{csr::Csr, degree::Degrees, Edge};
    ///
    /// let edges = vec![Edge(1, 2), Edge(2, 3), Edge(1, 3), Edge(1, 4)];
    /// let degrees = Degrees::count(edges.iter().copied().map(Ok)).unwrap();
    /// let csr = Csr::from_edges(&degrees, edges.into_iter().map(Ok)).unwrap();
    ///
    /// assert_eq!(&[2, 3, 4], csr.neighbors(1));
    /// assert_eq!(&[1], csr.neighbors(4));
    /// assert!(csr.neighbors(5).is_empty());
    /// ```
    pub fn from_edges<I>(degrees: &Degrees, edges: I) -> Result<Self>
    where
        I: IntoIterator<Item = Result<Edge>>,
    {
        let offsets = seq::offsets(degrees.as_slice(), degrees.max_node_id());
        let neighbors = seq::fill(&offsets, edges)?;
        let csr = Self { offsets, neighbors };
        info!(
            "built adjacency for {} node ids, {} neighbor entries, {} bytes",
            csr.order(),
            csr.num_neighbors(),
            csr.nbytes()
        );
        Ok(csr)
    }

    /// Number of node ids covered, `max_node_id + 1` counting the unused id 0.
    pub fn order(&self) -> usize
    {
        self.offsets.len().saturating_sub(1)
    }

    pub fn num_neighbors(&self) -> usize
    {
        self.neighbors.len()
    }

    pub fn offsets(&self) -> &[usize]
    {
        &self.offsets
    }

    /// The neighbor slice of `node`; empty for ids out of range.
    pub fn neighbors(&self, node: u32) -> &[u32]
    {
        let i = node as usize;
        match (self.offsets.get(i), self.offsets.get(i + 1)) {
            (Some(&start), Some(&end)) => &self.neighbors[start..end],
            _ => &[],
        }
    }

    pub fn degree(&self, node: u32) -> usize
    {
        self.neighbors(node).len()
    }

    /// The flat neighbor buffer, for whole-buffer rewrites such as
    /// relabeling. Slice boundaries cannot be changed through it.
    pub fn neighbors_mut(&mut self) -> &mut [u32]
    {
        &mut self.neighbors
    }

    /// Sorts every node's neighbors ascending, keeping duplicates.
    ///
    /// Runs on the current rayon pool; the result does not depend on the
    /// number of threads.
    pub fn sort_neighbors(&mut self, progress: &Progress, num_active: usize)
    {
        let stage = progress.stage("sorting", num_active);
        par::sort_neighbors(&self.offsets, &mut self.neighbors, &stage);
        stage.finish();
    }

    pub fn nbytes(&self) -> usize
    {
        let mut bytes = std::mem::size_of_val(self);
        bytes += std::mem::size_of_val(&self.offsets[..]);
        bytes += std::mem::size_of_val(&self.neighbors[..]);
        bytes
    }
}
