//! Great-circle math for the proximity search.

/// Mean earth radius used by the Haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometres between two points given in degrees.
#[must_use]
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Latitude/longitude rectangle enclosing every point within a radius.
///
/// Used as an index-friendly prefilter; callers still apply [`haversine_km`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    #[must_use]
    pub fn around(lat: f64, lon: f64, radius_km: f64) -> Self {
        let angular = radius_km / EARTH_RADIUS_KM;
        let lat_delta = angular.to_degrees();
        let min_lat = (lat - lat_delta).max(-90.0);
        let max_lat = (lat + lat_delta).min(90.0);

        // A circle touching a pole spans every meridian.
        if min_lat <= -90.0 || max_lat >= 90.0 {
            return Self::full_longitude(min_lat, max_lat);
        }

        let ratio = angular.sin() / lat.to_radians().cos();
        if ratio >= 1.0 || angular >= std::f64::consts::FRAC_PI_2 {
            return Self::full_longitude(min_lat, max_lat);
        }

        let lon_delta = ratio.asin().to_degrees();
        let min_lon = lon - lon_delta;
        let max_lon = lon + lon_delta;

        // A box crossing the antimeridian widens to every meridian.
        if min_lon < -180.0 || max_lon > 180.0 {
            return Self::full_longitude(min_lat, max_lat);
        }

        Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        }
    }

    fn full_longitude(min_lat: f64, max_lat: f64) -> Self {
        Self {
            min_lat,
            max_lat,
            min_lon: -180.0,
            max_lon: 180.0,
        }
    }

    #[cfg(test)]
    fn contains(&self, lat: f64, lon: f64) -> bool {
        (self.min_lat..=self.max_lat).contains(&lat) && (self.min_lon..=self.max_lon).contains(&lon)
    }
}
