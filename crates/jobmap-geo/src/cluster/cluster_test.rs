use jobmap_core::JobId;

use super::*;

fn job(n: u8, lat: f64, lng: f64) -> Arc<JobRecord> {
    Arc::new(JobRecord {
        id: JobId::from_random_bytes([n; 16]),
        title: format!("Job {n}"),
        employer_name: "Acme".to_string(),
        location_text: "Boston, MA".to_string(),
        description: String::new(),
        requirements_text: String::new(),
        coordinates: Coordinates::new(lat, lng),
    })
}

/// Two postings a few blocks apart in Boston plus one in Los Angeles.
fn fixture() -> Vec<Arc<JobRecord>> {
    vec![
        job(1, 42.360_1, -71.058_9),
        job(2, 42.370_1, -71.048_9),
        job(3, 34.052_2, -118.243_7),
    ]
}

fn built(records: &[Arc<JobRecord>]) -> SpatialIndex {
    let mut index = SpatialIndex::default();
    index.rebuild(records);
    index
}

fn clusters_of(features: &[ClusterFeature]) -> Vec<(ClusterId, usize, u8)> {
    features
        .iter()
        .filter_map(|f| match f {
            ClusterFeature::Cluster {
                cluster_id,
                member_count,
                expansion_zoom,
                ..
            } => Some((*cluster_id, *member_count, *expansion_zoom)),
            ClusterFeature::Point { .. } => None,
        })
        .collect()
}

#[test]
fn query_before_rebuild_is_empty() {
    let index = SpatialIndex::default();
    assert!(!index.is_built());
    assert!(index.query(&BoundingBox::world(), 4).is_empty());
}

#[test]
fn nearby_points_cluster_at_country_zoom() {
    let index = built(&fixture());
    let features = index.query(&BoundingBox::world(), 4);

    assert_eq!(features.len(), 2, "got {features:?}");
    let clusters = clusters_of(&features);
    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].1, 2);
    let total: usize = features.iter().map(ClusterFeature::member_count).sum();
    assert_eq!(total, 3);
}

#[test]
fn zooming_to_expansion_zoom_yields_constituent_points() {
    let records = fixture();
    let index = built(&records);
    let (id, _, expansion) = clusters_of(&index.query(&BoundingBox::world(), 4))[0];

    assert_eq!(index.expansion_zoom(id), Some(expansion));
    assert!(expansion > 4);
    assert!(expansion <= index.settings().max_zoom + 1);

    for zoom in [expansion, expansion + 1, index.settings().max_zoom + 1, 22] {
        let features = index.query(&BoundingBox::world(), zoom);
        assert_eq!(features.len(), 3, "zoom {zoom}: {features:?}");
        assert!(features.iter().all(|f| !f.is_cluster()), "zoom {zoom}");
    }

    // One level shallower the pair is still merged.
    let shallower = index.query(&BoundingBox::world(), expansion - 1);
    assert_eq!(clusters_of(&shallower).len(), 1);
}

#[test]
fn cluster_position_is_between_members() {
    let index = built(&fixture());
    let features = index.query(&BoundingBox::world(), 4);
    let cluster = features.iter().find(|f| f.is_cluster()).unwrap();
    let p = cluster.position();
    assert!(p.lat > 42.36 && p.lat < 42.371, "lat {}", p.lat);
    assert!(p.lng > -71.059 && p.lng < -71.048, "lng {}", p.lng);
}

#[test]
fn children_and_leaves_return_members() {
    let records = fixture();
    let index = built(&records);
    let (id, _, _) = clusters_of(&index.query(&BoundingBox::world(), 4))[0];

    let children = index.children(id).unwrap();
    assert_eq!(children.len(), 2);
    assert!(children.iter().all(|c| !c.is_cluster()));

    let mut leaf_ids: Vec<JobId> = index.leaves(id).unwrap().iter().map(|j| j.id).collect();
    leaf_ids.sort();
    let mut expected = vec![records[0].id, records[1].id];
    expected.sort();
    assert_eq!(leaf_ids, expected);
}

#[test]
fn unknown_cluster_id_is_none() {
    let index = built(&fixture());
    assert!(index.expansion_zoom(ClusterId(999)).is_none());
    assert!(index.children(ClusterId(999)).is_none());
    assert!(index.leaves(ClusterId(999)).is_none());
}

#[test]
fn zoom_to_cluster_is_capped() {
    let settings = ClusterSettings {
        max_zoom: 24,
        ..ClusterSettings::default()
    };
    let mut index = SpatialIndex::new(settings);
    // ~1 m apart: only separates beyond zoom 20.
    index.rebuild(&[job(1, 42.360_000, -71.058_900), job(2, 42.360_005, -71.058_905)]);
    let (id, _, expansion) = clusters_of(&index.query(&BoundingBox::world(), 10))[0];
    assert!(expansion > MAX_EXPANSION_ZOOM);
    assert_eq!(index.zoom_to_cluster(id), Some(MAX_EXPANSION_ZOOM));
}

#[test]
fn min_points_threshold_reports_individual_points() {
    let settings = ClusterSettings {
        min_points: 3,
        ..ClusterSettings::default()
    };
    let mut index = SpatialIndex::new(settings);
    index.rebuild(&fixture());
    let features = index.query(&BoundingBox::world(), 4);
    assert_eq!(features.len(), 3);
    assert!(features.iter().all(|f| !f.is_cluster()));
}

#[test]
fn bounding_box_limits_results() {
    let index = built(&fixture());
    let boston_area = BoundingBox::new(-71.2, 42.3, -70.9, 42.5).unwrap();
    let features = index.query(&boston_area, index.settings().max_zoom + 1);
    assert_eq!(features.len(), 2);

    let west_coast = BoundingBox::new(-125.0, 30.0, -110.0, 40.0).unwrap();
    let features = index.query(&west_coast, 4);
    assert_eq!(features.len(), 1);
    assert!(!features[0].is_cluster());
}

#[test]
fn antimeridian_box_is_split() {
    let index = built(&[job(1, 0.0, 179.5), job(2, 0.0, -179.5), job(3, 0.0, 0.0)]);
    let across = BoundingBox::new(170.0, -10.0, -170.0, 10.0).unwrap();
    let features = index.query(&across, 17);
    assert_eq!(features.len(), 2, "got {features:?}");

    let greenwich = BoundingBox::new(-10.0, -10.0, 10.0, 10.0).unwrap();
    assert_eq!(index.query(&greenwich, 17).len(), 1);
}

#[test]
fn query_is_repeatable() {
    let index = built(&fixture());
    let first: Vec<_> = index
        .query(&BoundingBox::world(), 4)
        .iter()
        .map(|f| (f.is_cluster(), f.member_count()))
        .collect();
    let second: Vec<_> = index
        .query(&BoundingBox::world(), 4)
        .iter()
        .map(|f| (f.is_cluster(), f.member_count()))
        .collect();
    assert_eq!(first, second);
}

#[test]
fn rebuild_replaces_contents() {
    let mut index = built(&fixture());
    index.rebuild(&[job(9, 47.6, -122.3)]);
    assert_eq!(index.len(), 1);
    let features = index.query(&BoundingBox::world(), 4);
    assert_eq!(features.len(), 1);
    assert!(!features[0].is_cluster());
}

#[test]
fn every_level_accounts_for_every_job() {
    let records: Vec<_> = (0..40u8)
        .map(|i| job(i, 42.3 + f64::from(i) * 0.003, -71.1 + f64::from(i % 7) * 0.004))
        .collect();
    let index = built(&records);
    for zoom in 0..=17 {
        let total: usize = index
            .query(&BoundingBox::world(), zoom)
            .iter()
            .map(ClusterFeature::member_count)
            .sum();
        assert_eq!(total, records.len(), "zoom {zoom}");
    }
}
