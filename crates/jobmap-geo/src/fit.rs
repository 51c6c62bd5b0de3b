//! Fit-to-bounds zoom and visible extent for a Web Mercator map surface.

use std::f64::consts::PI;

use jobmap_core::{BoundingBox, Coordinates, ViewportState, MAX_LATITUDE, MAX_ZOOM, MIN_ZOOM};

use crate::cluster::projection::{lat_y, y_lat};

/// Pixel size of one map tile at zoom 0.
const TILE_SIZE_PX: f64 = 256.0;

fn mercator_lat_rad(lat: f64) -> f64 {
    let sin = lat.to_radians().sin();
    let rad_x2 = ((1.0 + sin) / (1.0 - sin)).ln() / 2.0;
    rad_x2.clamp(-PI, PI) / 2.0
}

/// Largest whole zoom at which `bbox` fits inside a `width_px` × `height_px`
/// surface, clamped to the map's zoom bounds. A degenerate (single point)
/// box fits at the deepest zoom.
#[must_use]
pub fn fit_zoom(bbox: &BoundingBox, width_px: u32, height_px: u32) -> f64 {
    let lat_fraction = (mercator_lat_rad(bbox.north) - mercator_lat_rad(bbox.south)) / PI;

    let mut lng_span = bbox.east - bbox.west;
    if lng_span < 0.0 {
        lng_span += 360.0;
    }
    let lng_fraction = lng_span / 360.0;

    let zoom_for = |px: u32, fraction: f64| -> f64 {
        if fraction <= 0.0 {
            f64::INFINITY
        } else {
            (f64::from(px) / TILE_SIZE_PX / fraction).log2()
        }
    };

    let zoom = zoom_for(height_px, lat_fraction)
        .min(zoom_for(width_px, lng_fraction))
        .floor();
    zoom.clamp(MIN_ZOOM, MAX_ZOOM)
}

fn wrap_lng(lng: f64) -> f64 {
    (lng + 180.0).rem_euclid(360.0) - 180.0
}

/// What a `width_px` × `height_px` surface shows when centered on `center`
/// at `zoom`. Zoom and latitude are clamped to the map's bounds; a view
/// wider than the world spans every longitude.
#[must_use]
pub fn viewport_around(
    center: Coordinates,
    zoom: f64,
    width_px: u32,
    height_px: u32,
) -> ViewportState {
    let zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    let lat = center.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE);

    // Half extents as fractions of the projected unit square.
    let world_px = TILE_SIZE_PX * zoom.exp2();
    let half_w = f64::from(width_px) / world_px / 2.0;
    let half_h = f64::from(height_px) / world_px / 2.0;

    let cy = lat_y(lat);
    let north = y_lat((cy - half_h).max(0.0)).min(MAX_LATITUDE);
    let south = y_lat((cy + half_h).min(1.0)).max(-MAX_LATITUDE);

    let (west, east) = if half_w >= 0.5 {
        (-180.0, 180.0)
    } else {
        let span = half_w * 360.0;
        (wrap_lng(center.lng - span), wrap_lng(center.lng + span))
    };

    ViewportState {
        bounding_box: BoundingBox {
            west,
            south,
            east,
            north,
        },
        zoom,
        center: Coordinates::new(lat, center.lng),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_point_fits_at_max_zoom() {
        let b = BoundingBox::new(-71.06, 42.36, -71.06, 42.36).unwrap();
        assert!((fit_zoom(&b, 1280, 800) - MAX_ZOOM).abs() < f64::EPSILON);
    }

    #[test]
    fn world_fits_at_min_zoom() {
        let b = BoundingBox::new(-180.0, -85.0, 180.0, 85.0).unwrap();
        assert!((fit_zoom(&b, 1280, 800) - MIN_ZOOM).abs() < f64::EPSILON);
    }

    #[test]
    fn continental_us_fits_around_zoom_four() {
        let b = BoundingBox::new(-122.7, 25.7, -71.0, 47.6).unwrap();
        let z = fit_zoom(&b, 1280, 800);
        assert!((3.0..=5.0).contains(&z), "got {z}");
    }

    #[test]
    fn metro_area_fits_deeper_than_country() {
        let metro = BoundingBox::new(-71.25, 42.30, -71.00, 42.42).unwrap();
        let country = BoundingBox::new(-122.7, 25.7, -71.0, 47.6).unwrap();
        assert!(fit_zoom(&metro, 1280, 800) > fit_zoom(&country, 1280, 800));
    }

    #[test]
    fn antimeridian_span_is_measured_the_short_way() {
        let b = BoundingBox::new(170.0, -10.0, -170.0, 10.0).unwrap();
        let z = fit_zoom(&b, 1280, 800);
        assert!(z >= 4.0, "got {z}");
    }

    #[test]
    fn viewport_around_contains_its_center() {
        let boston = Coordinates::new(42.36, -71.06);
        let v = viewport_around(boston, 12.0, 1280, 800);
        let b = v.bounding_box;
        assert!(b.west < boston.lng && boston.lng < b.east);
        assert!(b.south < boston.lat && boston.lat < b.north);
        assert!(b.east - b.west < 1.0, "{b:?}");
        assert!((v.zoom - 12.0).abs() < f64::EPSILON);
    }

    #[test]
    fn viewport_around_at_min_zoom_spans_the_world() {
        let v = viewport_around(jobmap_core::DEFAULT_CENTER, 0.0, 1280, 800);
        assert!((v.zoom - MIN_ZOOM).abs() < f64::EPSILON);
        assert!((v.bounding_box.west + 180.0).abs() < f64::EPSILON);
        assert!((v.bounding_box.east - 180.0).abs() < f64::EPSILON);
        assert!(v.bounding_box.north <= MAX_LATITUDE);
    }

    #[test]
    fn viewport_around_wraps_near_antimeridian() {
        let v = viewport_around(Coordinates::new(0.0, 179.0), 8.0, 1280, 800);
        assert!(v.bounding_box.west > v.bounding_box.east, "{:?}", v.bounding_box);
    }

    #[test]
    fn fitted_zoom_keeps_bounds_visible() {
        let b = BoundingBox::new(-87.7, 41.8, -71.0, 42.4).unwrap();
        let zoom = fit_zoom(&b, 1280, 800);
        let v = viewport_around(b.center(), zoom, 1280, 800);
        assert!(v.bounding_box.west <= b.west && v.bounding_box.east >= b.east);
        assert!(v.bounding_box.south <= b.south && v.bounding_box.north >= b.north);
    }
}
