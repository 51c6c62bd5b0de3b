//! Subcommand handlers. Each prints one JSON document to stdout.

use std::sync::Arc;

use anyhow::Context;
use jobmap_core::{
    AppConfig, BoundingBox, CityCentroid, CityTable, Coordinates, ExperienceLevel, FilterCriteria,
    JobRecord, JobType, ViewportState,
};
use jobmap_geo::{viewport_around, ClusterFeature, ClusterId};
use jobmap_search::{Action, Session};
use serde::Serialize;

pub(crate) struct GroupArgs {
    pub(crate) search: Option<String>,
    pub(crate) job_type: JobType,
    pub(crate) experience: ExperienceLevel,
    pub(crate) max_distance: Option<f64>,
    pub(crate) near: Option<Coordinates>,
}

impl GroupArgs {
    fn criteria(&self) -> anyhow::Result<FilterCriteria> {
        let criteria = FilterCriteria {
            search_text: self.search.clone().unwrap_or_default(),
            job_type: self.job_type,
            experience_level: self.experience,
            max_distance_miles: None,
        };
        Ok(criteria.with_max_distance(self.max_distance)?)
    }
}

#[derive(Serialize)]
struct CitiesOut<'a> {
    default: &'a str,
    cities: Vec<&'a CityCentroid>,
}

#[derive(Serialize)]
struct ClustersOut<'a> {
    viewport: ViewportState,
    zoom_level: u8,
    features: &'a [ClusterFeature],
}

#[derive(Serialize)]
struct ExpandOut {
    cluster_id: ClusterId,
    /// Zoom the map jumps to, capped for very tight clusters.
    zoom_to: u8,
    jobs: Vec<Arc<JobRecord>>,
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("failed to encode output")?;
    println!("{out}");
    Ok(())
}

pub(crate) fn run_cities(cities: &CityTable) -> anyhow::Result<()> {
    print_json(&CitiesOut {
        default: &cities.default_centroid().name,
        cities: cities.iter().collect(),
    })
}

pub(crate) fn run_groups(session: &mut Session, args: &GroupArgs) -> anyhow::Result<()> {
    session.dispatch(Action::CriteriaReplaced(args.criteria()?));
    session.geolocation_resolved(args.near);
    let groups = session.groups()?;
    print_json(groups)
}

pub(crate) fn run_clusters(
    session: &mut Session,
    config: &AppConfig,
    bbox: Option<BoundingBox>,
    zoom: Option<f64>,
) -> anyhow::Result<()> {
    let fitted = session
        .state()
        .viewport
        .context("no viewport was fitted to the job data")?;

    let viewport = match (bbox, zoom) {
        (Some(bounding_box), zoom) => ViewportState {
            bounding_box,
            zoom: zoom.unwrap_or(fitted.zoom),
            center: bounding_box.center(),
        },
        (None, Some(zoom)) => viewport_around(
            fitted.center,
            zoom,
            config.viewport_width_px,
            config.viewport_height_px,
        ),
        (None, None) => fitted,
    };
    session.dispatch(Action::ViewportChanged(viewport));
    let viewport = session.state().viewport.unwrap_or(viewport);
    let features = session.clusters()?;
    print_json(&ClustersOut {
        viewport,
        zoom_level: viewport.zoom_level(),
        features,
    })
}

pub(crate) fn run_expand(session: &Session, cluster_id: u32) -> anyhow::Result<()> {
    let id = ClusterId(cluster_id);
    let zoom = session.zoom_to_cluster(id)?;
    let jobs = session.cluster_leaves(id)?;
    print_json(&ExpandOut {
        cluster_id: id,
        zoom_to: zoom,
        jobs,
    })
}
