//! Great-circle distance on a spherical Earth.

/// Mean Earth radius in kilometers used for every distance in the crate.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A location in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadianPoint {
    /// Latitude in radians.
    pub lat: f64,
    /// Longitude in radians.
    pub lon: f64,
}

impl RadianPoint {
    /// Converts a `(latitude, longitude)` pair in degrees.
    #[must_use]
    pub fn from_degrees(lat: f64, lon: f64) -> Self {
        Self {
            lat: lat.to_radians(),
            lon: lon.to_radians(),
        }
    }

    /// Whether both components are finite.
    #[must_use]
    pub const fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }

    /// Position of the point on the unit sphere.
    ///
    /// The Euclidean (chord) distance between two unit vectors grows
    /// monotonically with their central angle, so nearest-by-chord is
    /// nearest-by-great-circle.
    #[must_use]
    pub fn to_unit_vector(self) -> [f64; 3] {
        let (sin_lat, cos_lat) = self.lat.sin_cos();
        let (sin_lon, cos_lon) = self.lon.sin_cos();
        [cos_lat * cos_lon, cos_lat * sin_lon, sin_lat]
    }
}

/// Central angle between two points in radians (haversine formula).
///
/// `NaN` components propagate to a `NaN` result.
#[must_use]
pub fn central_angle(a: RadianPoint, b: RadianPoint) -> f64 {
    let half_dlat = (b.lat - a.lat) / 2.0;
    let half_dlon = (b.lon - a.lon) / 2.0;

    let h = half_dlon
        .sin()
        .powi(2)
        .mul_add(a.lat.cos() * b.lat.cos(), half_dlat.sin().powi(2));

    // Rounding can push antipodal points just past 1.0.
    let h = if h > 1.0 { 1.0 } else { h };

    2.0 * h.sqrt().asin()
}

/// Great-circle distance in kilometers between two points given in degrees.
#[must_use]
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    EARTH_RADIUS_KM
        * central_angle(
            RadianPoint::from_degrees(lat1, lon1),
            RadianPoint::from_degrees(lat2, lon2),
        )
}

/// Converts a distance in kilometers to a central angle in radians.
#[must_use]
pub fn km_to_angle(km: f64) -> f64 {
    km / EARTH_RADIUS_KM
}

/// Converts a central angle in radians to kilometers.
#[must_use]
pub fn angle_to_km(angle: f64) -> f64 {
    angle * EARTH_RADIUS_KM
}

#[cfg(test)]
mod tests {
    use super::*;

    const LA_ROCHELLE: (f64, f64) = (46.1603, -1.1511);
    const PARIS: (f64, f64) = (48.8566, 2.3522);

    #[test]
    fn same_point_is_zero() {
        let d = haversine_km(LA_ROCHELLE.0, LA_ROCHELLE.1, LA_ROCHELLE.0, LA_ROCHELLE.1);
        assert!(d.abs() < 1e-9, "expected 0, got {d}");
    }

    #[test]
    fn distance_is_symmetric() {
        let ab = haversine_km(LA_ROCHELLE.0, LA_ROCHELLE.1, PARIS.0, PARIS.1);
        let ba = haversine_km(PARIS.0, PARIS.1, LA_ROCHELLE.0, LA_ROCHELLE.1);
        assert!((ab - ba).abs() < 1e-9);
    }

    #[test]
    fn la_rochelle_to_paris() {
        let d = haversine_km(LA_ROCHELLE.0, LA_ROCHELLE.1, PARIS.0, PARIS.1);
        assert!((d - 398.8).abs() < 0.5, "expected ~398.8 km, got {d}");
    }

    #[test]
    fn one_degree_of_latitude() {
        let d = haversine_km(45.0, 0.0, 46.0, 0.0);
        let expected = EARTH_RADIUS_KM * 1.0_f64.to_radians();
        assert!((d - expected).abs() < 1e-9);
    }

    #[test]
    fn antipodes_are_half_circumference() {
        let d = haversine_km(0.0, 0.0, 0.0, 180.0);
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }

    #[test]
    fn nan_propagates() {
        assert!(haversine_km(f64::NAN, 0.0, 1.0, 1.0).is_nan());
        assert!(haversine_km(0.0, 0.0, 1.0, f64::NAN).is_nan());
    }

    #[test]
    fn angle_conversions_round_trip() {
        assert!((angle_to_km(km_to_angle(15.0)) - 15.0).abs() < 1e-12);
        assert!((km_to_angle(EARTH_RADIUS_KM) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn unit_vectors_have_unit_length() {
        let v = RadianPoint::from_degrees(PARIS.0, PARIS.1).to_unit_vector();
        let norm = v.iter().map(|c| c * c).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-12);
    }
}
