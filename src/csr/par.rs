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

use rayon::prelude::*;

use crate::progress::Stage;

/// Below this many neighbor entries a range is sorted on the current thread.
const GRAIN: usize = 1 << 14;

/// Single slices at least this long are sorted with rayon's parallel sort.
const PAR_SORT_MIN: usize = 1 << 20;

fn sort_leaf(offsets: &[usize], base: usize, buf: &mut [u32], stage: &Stage)
{
    let mut active = 0usize;
    for win in offsets.windows(2) {
        let slice = &mut buf[(win[0] - base)..(win[1] - base)];
        if slice.len() >= PAR_SORT_MIN {
            slice.par_sort_unstable();
        }
        else {
            slice.sort_unstable();
        }
        if !slice.is_empty() {
            active += 1;
        }
    }
    stage.advance(active);
}

/// Sorts the slices of the nodes covered by `offsets`, where `buf` starts at
/// `offsets[0]` (== `base`) of the full neighbor buffer.
///
/// The node range is halved until it is small, each half borrowing a
/// disjoint part of `buf`, so no slice is ever touched by two threads.
fn rec_sort(offsets: &[usize], base: usize, buf: &mut [u32], stage: &Stage)
{
    let num_nodes = offsets.len() - 1;
    if num_nodes <= 1 || buf.len() <= GRAIN {
        sort_leaf(offsets, base, buf, stage);
        return;
    }

    let mid = num_nodes / 2;
    let split = offsets[mid];
    let (left, right) = buf.split_at_mut(split - base);
    rayon::join(
        || rec_sort(&offsets[..=mid], base, left, stage),
        || rec_sort(&offsets[mid..], split, right, stage),
    );
}

pub fn sort_neighbors(offsets: &[usize], neighbors: &mut [u32], stage: &Stage)
{
    if offsets.len() < 2 {
        return;
    }
    rec_sort(offsets, offsets[0], neighbors, stage);
}
