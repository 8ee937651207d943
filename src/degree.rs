//! First pass: undirected degree of every node id seen in the input.

use tracing::info;

use crate::{
    error::{Error, Result},
    Edge,
};

/// Dense degree table indexed by node id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Degrees
{
    degree: Vec<u32>,
    max_node_id: u32,
    num_edges: usize,
    total_neighbors: usize,
}

impl Degrees
{
    /// Counts degrees over one full pass of `edges`.
    ///
    /// Every edge adds one to both endpoints, so a self-loop `(n, n)` adds
    /// two to `n`.
    ///
    /// # Examples
    ///
    /// ```
    /// use adjbin::{degree::Degrees, Edge};
    ///
    /// let edges = vec![Edge(1, 2), Edge(2, 3), Edge(1, 3), Edge(1, 4)];
    /// let degrees = Degrees::count(edges.into_iter().map(Ok)).unwrap();
    ///
    /// assert_eq!(degrees.max_node_id(), 4);
    /// assert_eq!(degrees.get(1), 3);
    /// assert_eq!(degrees.total_neighbors(), 8);
    /// ```
    pub fn count<I>(edges: I) -> Result<Self>
    where
        I: IntoIterator<Item = Result<Edge>>,
    {
        let mut degree: Vec<u32> = Vec::new();
        let mut max_node_id = 0u32;
        let mut num_edges = 0usize;

        for edge in edges {
            let edge = edge?;
            let top = edge.max_endpoint();
            let Edge(u, v) = edge;
            if top as usize >= degree.len() {
                grow(&mut degree, top as usize);
            }
            if top > max_node_id {
                max_node_id = top;
            }
            bump(&mut degree, u)?;
            bump(&mut degree, v)?;
            num_edges += 1;
        }

        // The doubling leaves slack past the largest id.
        degree.truncate(max_node_id as usize + 1);
        degree.shrink_to_fit();

        let total_neighbors = degree.iter().map(|&d| d as usize).sum();

        info!(
            "found {} undirected edges, max node id {}, {} neighbor entries",
            num_edges, max_node_id, total_neighbors
        );

        Ok(Self {
            degree,
            max_node_id,
            num_edges,
            total_neighbors,
        })
    }

    /// Degree of `node`, zero for ids never seen.
    pub fn get(&self, node: u32) -> u32
    {
        self.degree.get(node as usize).copied().unwrap_or(0)
    }

    pub fn max_node_id(&self) -> u32
    {
        self.max_node_id
    }

    /// Number of edge lines consumed.
    pub fn num_edges(&self) -> usize
    {
        self.num_edges
    }

    /// Sum of all degrees, i.e. twice the number of edges.
    pub fn total_neighbors(&self) -> usize
    {
        self.total_neighbors
    }

    /// The whole table, index 0 included. Length is `max_node_id + 1`
    /// unless no edge was read.
    pub fn as_slice(&self) -> &[u32]
    {
        &self.degree
    }

    /// Ids `1..=max_node_id` with a nonzero degree, ascending.
    pub fn active(&self) -> impl Iterator<Item = u32> + '_
    {
        self.degree
            .iter()
            .enumerate()
            .skip(1)
            .filter(|&(_, &d)| d > 0)
            .map(|(n, _)| n as u32)
    }

    pub fn num_active(&self) -> usize
    {
        self.active().count()
    }
}

/// Grows `degree` so that `index` is in bounds, at least doubling the length.
fn grow(degree: &mut Vec<u32>, index: usize)
{
    let new_len = std::cmp::max(index + 1, degree.len() * 2);
    degree.resize(new_len, 0);
}

#[inline]
fn bump(degree: &mut [u32], node: u32) -> Result<()>
{
    let slot = &mut degree[node as usize];
    *slot = slot.checked_add(1).ok_or(Error::DegreeOverflow(node))?;
    Ok(())
}
