/// Mean Earth radius (meters) used for great-circle distances.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Geographic coordinate in degrees (WGS84 lat/lon).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeoPoint {
    pub lat_deg: f64,
    pub lon_deg: f64,
}

impl GeoPoint {
    pub fn new(lat_deg: f64, lon_deg: f64) -> Self {
        Self { lat_deg, lon_deg }
    }
}

/// Axis-aligned geographic viewport.
///
/// Convention:
/// - `top_left.lat_deg >= bottom_right.lat_deg`.
/// - Longitude wrap across the anti-meridian is not handled; callers are
///   expected to supply non-wrapping bounds.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeoBounds {
    pub top_left: GeoPoint,
    pub bottom_right: GeoPoint,
}

impl GeoBounds {
    pub fn new(top_left: GeoPoint, bottom_right: GeoPoint) -> Self {
        Self {
            top_left,
            bottom_right,
        }
    }

    pub fn lat_span_deg(&self) -> f64 {
        self.top_left.lat_deg - self.bottom_right.lat_deg
    }

    pub fn lon_span_deg(&self) -> f64 {
        self.bottom_right.lon_deg - self.top_left.lon_deg
    }

    /// Fractional position of `p` inside the bounds, 0.0 at the top-left
    /// corner and 1.0 at the bottom-right corner on both axes.
    ///
    /// Degenerate (zero-span) bounds map everything to 0.0 on that axis
    /// instead of dividing by zero.
    pub fn fractional_position(&self, p: GeoPoint) -> (f64, f64) {
        let lat_span = self.lat_span_deg();
        let lon_span = self.lon_span_deg();
        let fy = if lat_span > 0.0 {
            (self.top_left.lat_deg - p.lat_deg) / lat_span
        } else {
            0.0
        };
        let fx = if lon_span > 0.0 {
            (p.lon_deg - self.top_left.lon_deg) / lon_span
        } else {
            0.0
        };
        (fy, fx)
    }
}

/// Great-circle distance between two points (haversine, meters).
pub fn haversine_m(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat_a = a.lat_deg.to_radians();
    let lat_b = b.lat_deg.to_radians();
    let d_lat = (b.lat_deg - a.lat_deg).to_radians();
    let d_lon = (b.lon_deg - a.lon_deg).to_radians();

    // Rounding can push the intermediate just above 1.0 for near-antipodal
    // points, where sqrt().asin() would return NaN; clamp keeps the result
    // finite across the whole valid coordinate range.
    let s = (d_lat / 2.0).sin().powi(2)
        + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * s.sqrt().min(1.0).asin()
}

#[cfg(test)]
mod tests {
    use super::{GeoBounds, GeoPoint, haversine_m};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn haversine_zero_for_identical_points() {
        let p = GeoPoint::new(47.6, -122.3);
        assert_close(haversine_m(p, p), 0.0, 1e-9);
    }

    #[test]
    fn haversine_one_millidegree_of_latitude() {
        // 0.001 deg of latitude is ~111.19 m on a 6371 km sphere.
        let a = GeoPoint::new(47.0, 8.0);
        let b = GeoPoint::new(47.001, 8.0);
        assert_close(haversine_m(a, b), 111.19, 0.05);
    }

    #[test]
    fn haversine_is_finite_for_near_antipodal_points() {
        // This pair previously drove the haversine intermediate above 1.0,
        // yielding NaN instead of ~half the Earth's circumference.
        let a = GeoPoint::new(59.30512566052522, -14.179600418234429);
        let b = GeoPoint::new(-59.30512566052479, 165.82039958176605);
        let d = haversine_m(a, b);
        assert!(d.is_finite(), "expected finite distance, got {d}");
        assert_close(d, std::f64::consts::PI * super::EARTH_RADIUS_M, 1000.0);
    }

    #[test]
    fn haversine_is_symmetric() {
        let a = GeoPoint::new(-33.86, 151.21);
        let b = GeoPoint::new(-33.90, 151.18);
        assert_close(haversine_m(a, b), haversine_m(b, a), 1e-9);
    }

    #[test]
    fn fractional_position_hits_corners() {
        let b = GeoBounds::new(GeoPoint::new(10.0, 20.0), GeoPoint::new(0.0, 30.0));
        let (fy, fx) = b.fractional_position(GeoPoint::new(10.0, 20.0));
        assert_close(fy, 0.0, 1e-12);
        assert_close(fx, 0.0, 1e-12);

        let (fy, fx) = b.fractional_position(GeoPoint::new(0.0, 30.0));
        assert_close(fy, 1.0, 1e-12);
        assert_close(fx, 1.0, 1e-12);

        let (fy, fx) = b.fractional_position(GeoPoint::new(5.0, 25.0));
        assert_close(fy, 0.5, 1e-12);
        assert_close(fx, 0.5, 1e-12);
    }

    #[test]
    fn fractional_position_tolerates_degenerate_bounds() {
        let b = GeoBounds::new(GeoPoint::new(5.0, 25.0), GeoPoint::new(5.0, 25.0));
        let (fy, fx) = b.fractional_position(GeoPoint::new(6.0, 26.0));
        assert_eq!((fy, fx), (0.0, 0.0));
    }
}
