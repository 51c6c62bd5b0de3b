//! Zoom-aware point clustering for the job map.
//!
//! [`SpatialIndex::rebuild`] projects every job onto the unit Mercator square
//! and builds one level per zoom, from `max_zoom + 1` (raw points) down to 0.
//! Each level greedily merges the previous level's nodes that fall within
//! `radius_px` screen pixels of each other at that zoom, so clusters split
//! progressively as the map zooms in. Levels are immutable once built;
//! [`SpatialIndex::query`] only reads.

mod level;
pub(crate) mod projection;

use std::sync::Arc;

use jobmap_core::{BoundingBox, ClusterSettings, Coordinates, JobRecord};
use serde::{Deserialize, Serialize};

use level::{Level, Member, Node};
use projection::{lat_y, lng_x, x_lng, y_lat};

/// Zoom-to-cluster never goes deeper than this.
pub const MAX_EXPANSION_ZOOM: u8 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClusterId(pub u32);

impl std::fmt::Display for ClusterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One visible marker.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClusterFeature {
    Cluster {
        cluster_id: ClusterId,
        position: Coordinates,
        member_count: usize,
        /// Zoom at which this cluster splits into its children.
        expansion_zoom: u8,
    },
    Point {
        position: Coordinates,
        job: Arc<JobRecord>,
    },
}

impl ClusterFeature {
    #[must_use]
    pub fn is_cluster(&self) -> bool {
        matches!(self, ClusterFeature::Cluster { .. })
    }

    #[must_use]
    pub fn position(&self) -> Coordinates {
        match self {
            ClusterFeature::Cluster { position, .. } | ClusterFeature::Point { position, .. } => {
                *position
            }
        }
    }

    /// Number of jobs behind this marker.
    #[must_use]
    pub fn member_count(&self) -> usize {
        match self {
            ClusterFeature::Cluster { member_count, .. } => *member_count,
            ClusterFeature::Point { .. } => 1,
        }
    }
}

#[derive(Debug, Clone)]
struct ClusterNode {
    x: f64,
    y: f64,
    count: usize,
    /// Zoom of the level this cluster was formed in.
    zoom: u8,
    children: Vec<Member>,
}

pub struct SpatialIndex {
    settings: ClusterSettings,
    jobs: Vec<Arc<JobRecord>>,
    clusters: Vec<ClusterNode>,
    /// `levels[z]` holds the markers for zoom `z`, up to `max_zoom + 1`.
    levels: Vec<Level>,
}

impl SpatialIndex {
    #[must_use]
    pub fn new(settings: ClusterSettings) -> Self {
        Self {
            settings,
            jobs: Vec::new(),
            clusters: Vec::new(),
            levels: Vec::new(),
        }
    }

    #[must_use]
    pub fn settings(&self) -> &ClusterSettings {
        &self.settings
    }

    /// `true` once [`rebuild`](Self::rebuild) has run.
    #[must_use]
    pub fn is_built(&self) -> bool {
        !self.levels.is_empty()
    }

    /// Number of indexed jobs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Replace the index contents with `records`.
    pub fn rebuild(&mut self, records: &[Arc<JobRecord>]) {
        self.jobs = records.to_vec();
        self.clusters.clear();

        let points: Vec<Node> = self
            .jobs
            .iter()
            .enumerate()
            .map(|(i, job)| Node {
                x: lng_x(job.coordinates.lng),
                y: lat_y(job.coordinates.lat),
                count: 1,
                member: Member::Job(i),
            })
            .collect();

        let max_zoom = self.settings.max_zoom;
        let mut built = Vec::with_capacity(usize::from(max_zoom) + 2);
        built.push(Level::new(points));
        for zoom in (0..=max_zoom).rev() {
            let nodes = self.merge_level(&built[built.len() - 1], zoom);
            built.push(Level::new(nodes));
        }
        built.reverse();
        self.levels = built;

        tracing::debug!(
            jobs = self.jobs.len(),
            clusters = self.clusters.len(),
            max_zoom,
            "spatial index rebuilt"
        );
    }

    /// Greedy single pass over `prev`: each unvisited node absorbs every
    /// unvisited neighbour within the zoom's radius.
    fn merge_level(&mut self, prev: &Level, zoom: u8) -> Vec<Node> {
        let radius =
            self.settings.radius_px / (self.settings.extent * 2f64.powi(i32::from(zoom)));
        let mut visited = vec![false; prev.nodes.len()];
        let mut out = Vec::new();

        for (i, p) in prev.nodes.iter().enumerate() {
            if visited[i] {
                continue;
            }
            visited[i] = true;

            let mut neighbors: Vec<usize> = prev
                .within(p.x, p.y, radius)
                .filter(|&j| !visited[j])
                .collect();
            neighbors.sort_unstable();

            let num_points = p.count + neighbors.iter().map(|&j| prev.nodes[j].count).sum::<usize>();

            if num_points > p.count && num_points >= self.settings.min_points {
                #[allow(clippy::cast_precision_loss)]
                let weight = |n: &Node| n.count as f64;
                let mut wx = p.x * weight(p);
                let mut wy = p.y * weight(p);
                let mut children = vec![p.member];
                for &j in &neighbors {
                    visited[j] = true;
                    let n = &prev.nodes[j];
                    wx += n.x * weight(n);
                    wy += n.y * weight(n);
                    children.push(n.member);
                }
                #[allow(clippy::cast_precision_loss)]
                let total = num_points as f64;
                let id = self.next_cluster_id();
                let node = ClusterNode {
                    x: wx / total,
                    y: wy / total,
                    count: num_points,
                    zoom,
                    children,
                };
                out.push(Node {
                    x: node.x,
                    y: node.y,
                    count: node.count,
                    member: Member::Cluster(id),
                });
                self.clusters.push(node);
            } else {
                out.push(*p);
                // Too few to cluster: keep the neighbours as-is, but claim
                // them so they do not seed their own cluster at this zoom.
                if num_points > 1 {
                    for &j in &neighbors {
                        visited[j] = true;
                        out.push(prev.nodes[j]);
                    }
                }
            }
        }

        out
    }

    fn next_cluster_id(&self) -> u32 {
        // Cluster count is bounded by the job count, which never nears u32::MAX.
        #[allow(clippy::cast_possible_truncation)]
        let id = self.clusters.len() as u32;
        id
    }

    /// Markers visible inside `bbox` at `zoom`.
    ///
    /// Zooms past `max_zoom` show individual points. A box with
    /// `west > east` wraps across the antimeridian. Returns an empty
    /// vector before the first [`rebuild`](Self::rebuild).
    #[must_use]
    pub fn query(&self, bbox: &BoundingBox, zoom: u8) -> Vec<ClusterFeature> {
        let Some(level) = self.level_for(zoom) else {
            return Vec::new();
        };

        let min_lat = bbox.south.clamp(-90.0, 90.0);
        let max_lat = bbox.north.clamp(-90.0, 90.0);

        let mut hits = if bbox.east - bbox.west >= 360.0 {
            level.in_box(lng_x(-180.0), lat_y(max_lat), lng_x(180.0), lat_y(min_lat))
        } else {
            let min_lng = (bbox.west + 180.0).rem_euclid(360.0) - 180.0;
            let max_lng = if (bbox.east - 180.0).abs() < f64::EPSILON {
                180.0
            } else {
                (bbox.east + 180.0).rem_euclid(360.0) - 180.0
            };

            if min_lng > max_lng {
                let mut eastern =
                    level.in_box(lng_x(min_lng), lat_y(max_lat), lng_x(180.0), lat_y(min_lat));
                let western =
                    level.in_box(lng_x(-180.0), lat_y(max_lat), lng_x(max_lng), lat_y(min_lat));
                eastern.extend(western);
                eastern
            } else {
                level.in_box(lng_x(min_lng), lat_y(max_lat), lng_x(max_lng), lat_y(min_lat))
            }
        };

        hits.sort_unstable();
        hits.dedup();
        hits.into_iter()
            .map(|i| self.feature(level.nodes[i].member))
            .collect()
    }

    fn level_for(&self, zoom: u8) -> Option<&Level> {
        let top = self.levels.len().checked_sub(1)?;
        self.levels.get(usize::from(zoom).min(top))
    }

    fn cluster(&self, id: ClusterId) -> Option<&ClusterNode> {
        self.clusters.get(usize::try_from(id.0).ok()?)
    }

    /// Minimum zoom at which the cluster splits into its children.
    #[must_use]
    pub fn expansion_zoom(&self, id: ClusterId) -> Option<u8> {
        self.cluster(id).map(|c| c.zoom + 1)
    }

    /// Zoom the map should jump to when the cluster's marker is clicked.
    #[must_use]
    pub fn zoom_to_cluster(&self, id: ClusterId) -> Option<u8> {
        self.expansion_zoom(id).map(|z| z.min(MAX_EXPANSION_ZOOM))
    }

    /// The markers the cluster splits into at its expansion zoom.
    #[must_use]
    pub fn children(&self, id: ClusterId) -> Option<Vec<ClusterFeature>> {
        let node = self.cluster(id)?;
        Some(node.children.iter().map(|&m| self.feature(m)).collect())
    }

    /// Every job inside the cluster, at any depth.
    #[must_use]
    pub fn leaves(&self, id: ClusterId) -> Option<Vec<Arc<JobRecord>>> {
        let node = self.cluster(id)?;
        let mut out = Vec::with_capacity(node.count);
        let mut stack: Vec<Member> = node.children.iter().rev().copied().collect();
        while let Some(member) = stack.pop() {
            match member {
                Member::Job(i) => out.push(Arc::clone(&self.jobs[i])),
                Member::Cluster(c) => {
                    if let Some(child) = self.cluster(ClusterId(c)) {
                        stack.extend(child.children.iter().rev().copied());
                    }
                }
            }
        }
        Some(out)
    }

    fn feature(&self, member: Member) -> ClusterFeature {
        match member {
            Member::Job(i) => {
                let job = Arc::clone(&self.jobs[i]);
                ClusterFeature::Point {
                    position: job.coordinates,
                    job,
                }
            }
            Member::Cluster(c) => {
                let id = ClusterId(c);
                let node = &self.clusters[c as usize];
                ClusterFeature::Cluster {
                    cluster_id: id,
                    position: Coordinates {
                        lat: y_lat(node.y),
                        lng: x_lng(node.x),
                    },
                    member_count: node.count,
                    expansion_zoom: node.zoom + 1,
                }
            }
        }
    }
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new(ClusterSettings::default())
    }
}

impl std::fmt::Debug for SpatialIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpatialIndex")
            .field("settings", &self.settings)
            .field("jobs", &self.jobs.len())
            .field("clusters", &self.clusters.len())
            .field("levels", &self.levels.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "cluster_test.rs"]
mod tests;
