/// Mean Earth radius in miles
pub const EARTH_RADIUS_MILES: f64 = 3958.0;

/// Mean Earth radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Rough miles per degree of latitude, used for padding map corners
pub const MILES_PER_DEGREE: f64 = 69.0;

/// A geographic position in degrees
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Haversine great-circle distance between two points.
/// Latitudes and longitudes are in radians; the result is in the unit of `radius`.
#[inline(always)]
pub fn haversine(lat1: f64, lon1: f64, lat2: f64, lon2: f64, radius: f64) -> f64 {
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    // Rounding can push h a hair past 1.0 for antipodal points
    2.0 * radius * h.clamp(0.0, 1.0).sqrt().asin()
}

/// Great-circle distance in miles between two points given in degrees
#[inline(always)]
pub fn distance_miles(a: LatLon, b: LatLon) -> f64 {
    haversine(
        a.lat.to_radians(),
        a.lon.to_radians(),
        b.lat.to_radians(),
        b.lon.to_radians(),
        EARTH_RADIUS_MILES,
    )
}

/// Normalize longitude into [-180, 180)
#[inline(always)]
pub fn normalize_lon(lon: f64) -> f64 {
    (lon + 180.0).rem_euclid(360.0) - 180.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_distance() {
        let p = LatLon::new(37.65, -121.9);
        assert_eq!(distance_miles(p, p), 0.0);
    }

    #[test]
    fn test_one_degree_latitude() {
        // 2πR/360 ≈ 69.08 miles
        let d = distance_miles(LatLon::new(0.0, 0.0), LatLon::new(1.0, 0.0));
        assert!((d - 69.08).abs() < 0.01, "got {d}");
    }

    #[test]
    fn test_known_city_pair() {
        // Los Angeles to Las Vegas is roughly 228 miles as the crow flies
        let la = LatLon::new(34.0522, -118.2437);
        let lv = LatLon::new(36.1699, -115.1398);
        let d = distance_miles(la, lv);
        assert!((d - 228.0).abs() < 3.0, "got {d}");
    }

    #[test]
    fn test_symmetric() {
        let a = LatLon::new(42.28, -83.26);
        let b = LatLon::new(41.5, -81.7);
        assert!((distance_miles(a, b) - distance_miles(b, a)).abs() < 1e-9);
    }

    #[test]
    fn test_antipodal_is_half_circumference() {
        let d = haversine(0.0, 0.0, 0.0, std::f64::consts::PI, EARTH_RADIUS_KM);
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_lon() {
        assert_eq!(normalize_lon(190.0), -170.0);
        assert_eq!(normalize_lon(-180.0), -180.0);
        assert_eq!(normalize_lon(45.0), 45.0);
    }
}
