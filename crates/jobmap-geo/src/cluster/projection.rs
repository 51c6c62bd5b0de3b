//! Spherical Mercator projection onto the unit square.
//!
//! `x` grows east from 0 at -180° to 1 at 180°; `y` grows south from 0 at
//! the top of the map to 1 at the bottom. Latitudes past the Mercator limit
//! clamp to the edges.

use std::f64::consts::PI;

pub(crate) fn lng_x(lng: f64) -> f64 {
    lng / 360.0 + 0.5
}

pub(crate) fn lat_y(lat: f64) -> f64 {
    let sin = lat.to_radians().sin();
    let y = 0.5 - 0.25 * ((1.0 + sin) / (1.0 - sin)).ln() / PI;
    y.clamp(0.0, 1.0)
}

pub(crate) fn x_lng(x: f64) -> f64 {
    (x - 0.5) * 360.0
}

pub(crate) fn y_lat(y: f64) -> f64 {
    let y2 = (180.0 - y * 360.0).to_radians();
    360.0 * y2.exp().atan() / PI - 90.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_maps_to_center() {
        assert!((lng_x(0.0) - 0.5).abs() < 1e-12);
        assert!((lat_y(0.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn projection_inverts() {
        for &(lat, lng) in &[(42.36, -71.06), (-33.87, 151.21), (64.13, -21.9)] {
            assert!((y_lat(lat_y(lat)) - lat).abs() < 1e-9);
            assert!((x_lng(lng_x(lng)) - lng).abs() < 1e-9);
        }
    }

    #[test]
    fn poles_clamp_to_edges() {
        assert!(lat_y(90.0).abs() < 1e-12);
        assert!((lat_y(-90.0) - 1.0).abs() < 1e-12);
    }
}
