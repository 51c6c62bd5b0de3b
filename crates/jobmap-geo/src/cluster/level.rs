//! One zoom level of the cluster hierarchy, with an R-tree over its nodes.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

/// What a level node stands for: a job (index into the index's job list)
/// or a cluster (index into its cluster arena).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Member {
    Job(usize),
    Cluster(u32),
}

/// A marker at one zoom level, in projected unit-square coordinates.
#[derive(Debug, Clone, Copy)]
pub(super) struct Node {
    pub(super) x: f64,
    pub(super) y: f64,
    pub(super) count: usize,
    pub(super) member: Member,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    idx: usize,
    x: f64,
    y: f64,
}

impl RTreeObject for Entry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.x, self.y])
    }
}

impl PointDistance for Entry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.x - point[0];
        let dy = self.y - point[1];
        dx * dx + dy * dy
    }
}

pub(super) struct Level {
    pub(super) nodes: Vec<Node>,
    tree: RTree<Entry>,
}

impl Level {
    pub(super) fn new(nodes: Vec<Node>) -> Self {
        let entries = nodes
            .iter()
            .enumerate()
            .map(|(idx, n)| Entry { idx, x: n.x, y: n.y })
            .collect();
        Self {
            nodes,
            tree: RTree::bulk_load(entries),
        }
    }

    /// Indices of nodes within `radius` of `(x, y)`, inclusive.
    pub(super) fn within(&self, x: f64, y: f64, radius: f64) -> impl Iterator<Item = usize> + '_ {
        self.tree
            .locate_within_distance([x, y], radius * radius)
            .map(|e| e.idx)
    }

    /// Indices of nodes inside the projected rectangle, edges included.
    pub(super) fn in_box(&self, min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Vec<usize> {
        let envelope = AABB::from_corners([min_x, min_y], [max_x, max_y]);
        self.tree
            .locate_in_envelope(&envelope)
            .map(|e| e.idx)
            .collect()
    }
}
