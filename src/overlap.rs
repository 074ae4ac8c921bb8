//! Overlap queries over bounding boxes, backed by an [`AvlTree`]
//!
//! Boxes are ordered by their left edge. A query only walks the boxes whose
//! left edge lies in `[q.min.x - widest, q.max.x]`, where `widest` is the
//! widest box ever inserted; everything outside that window cannot reach the
//! query horizontally.

use std::cmp::Ordering;

use crate::geometry::Bounds;
use crate::tree::{AvlTree, Comparator};

/// Handle to a box stored in an [`OverlapIndex`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlapId {
    bounds: Bounds,
    seq: u64,
}

impl OverlapId {
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }
}

/// Left edge first, insertion sequence as tie-break
#[derive(Debug, Clone, Copy, Default)]
struct ByLeftEdge;

impl Comparator<OverlapId> for ByLeftEdge {
    fn compare(&self, a: &OverlapId, b: &OverlapId) -> Ordering {
        a.bounds
            .min
            .x
            .total_cmp(&b.bounds.min.x)
            .then(a.seq.cmp(&b.seq))
    }
}

#[derive(Debug, Clone)]
pub struct OverlapIndex {
    tree: AvlTree<OverlapId, ByLeftEdge>,
    next_seq: u64,
    widest: f32,
}

impl Default for OverlapIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl OverlapIndex {
    pub fn new() -> Self {
        OverlapIndex {
            tree: AvlTree::with_comparator(ByLeftEdge),
            next_seq: 0,
            widest: 0.0,
        }
    }

    pub fn insert(&mut self, bounds: Bounds) -> OverlapId {
        let id = OverlapId {
            bounds,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.widest = self.widest.max(bounds.width());
        self.tree.insert(id);
        id
    }

    /// Drop a box. `widest` is not shrunk, which only widens later scans.
    pub fn remove(&mut self, id: OverlapId) -> bool {
        self.tree.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Stored boxes intersecting `query`, ordered by left edge
    pub fn overlapping(&self, query: Bounds) -> impl Iterator<Item = &OverlapId> + '_ {
        let low = query.min.x - self.widest;
        let high = query.max.x;
        self.tree
            .range_by(move |id| {
                let left = id.bounds.min.x;
                if left < low {
                    Ordering::Less
                } else if left > high {
                    Ordering::Greater
                } else {
                    Ordering::Equal
                }
            })
            .filter(move |id| id.bounds.intersects(&query))
    }

    pub fn overlaps(&self, query: Bounds) -> bool {
        !query.is_empty() && self.overlapping(query).next().is_some()
    }
}
