//! Dense feature ids ordered by global frequency: the least connected node
//! becomes id 1.

use rayon::prelude::*;
use tracing::{debug, info};

use crate::{
    degree::Degrees,
    error::{Error, Result},
};

/// Old id to new id table. Entry 0 means "no new id".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relabeling
{
    map: Vec<u32>,
    num_ids: u32,
}

impl Relabeling
{
    /// Ranks the active nodes by `(degree, id)` ascending and numbers them
    /// from 1.
    ///
    /// # Examples
    ///
    /// ```
    /// use adjbin::{degree::Degrees, relabel::Relabeling, Edge};
    ///
    /// let edges = vec![Edge(1, 2), Edge(2, 3), Edge(1, 3), Edge(1, 4)];
    /// let degrees = Degrees::count(edges.into_iter().map(Ok)).unwrap();
    /// let relabeling = Relabeling::by_frequency(&degrees);
    ///
    /// assert_eq!(relabeling.get(4), Some(1));
    /// assert_eq!(relabeling.get(2), Some(2));
    /// assert_eq!(relabeling.get(3), Some(3));
    /// assert_eq!(relabeling.get(1), Some(4));
    /// assert_eq!(relabeling.get(5), None);
    /// ```
    pub fn by_frequency(degrees: &Degrees) -> Self
    {
        let mut ranked: Vec<(u32, u32)> = degrees
            .active()
            .map(|n| (degrees.get(n), n))
            .collect();
        // Keys are unique, so an unstable sort is still deterministic.
        ranked.par_sort_unstable();

        let mut map = vec![0u32; degrees.max_node_id() as usize + 1];
        for (rank, &(_, old)) in ranked.iter().enumerate() {
            map[old as usize] = rank as u32 + 1;
        }

        let num_ids = ranked.len() as u32;
        info!("assigned new ids to {} distinct features", num_ids);

        Self { map, num_ids }
    }

    /// New id of `old`, or `None` if it had degree zero.
    #[inline]
    pub fn get(&self, old: u32) -> Option<u32>
    {
        match self.map.get(old as usize) {
            Some(&new) if new != 0 => Some(new),
            _ => None,
        }
    }

    /// Number of ids handed out, the largest new id.
    pub fn num_ids(&self) -> u32
    {
        self.num_ids
    }

    /// Rewrites every entry of `neighbors` to its new id.
    ///
    /// A neighbor without a new id means the edge list read now is not the one
    /// the degrees were counted from; that is an error, never patched over.
    pub fn apply(&self, neighbors: &mut [u32]) -> Result<()>
    {
        neighbors.par_iter_mut().try_for_each(|n| match self.get(*n) {
            Some(new) => {
                *n = new;
                Ok(())
            }
            None => Err(Error::Unmapped(*n)),
        })?;

        let max_new = neighbors.par_iter().copied().max().unwrap_or(0);
        debug!(
            "max new feature id in neighbor lists: {} (expected {})",
            max_new, self.num_ids
        );
        Ok(())
    }
}
