//! Geodesic projection engine: spherical positions, bearings, and the
//! forward great-circle step.
//!
//! # Coordinate conventions
//!
//! - **SpherePoint**: latitude/longitude in degrees. Latitude ∈ [-90, 90],
//!   longitude normalized into [0, 360).
//! - **Bearing**: degrees clockwise from local north, wrapped modulo 360.
//! - **Unit vectors**: x = cos(lat)cos(lon), y = cos(lat)sin(lon), z = sin(lat).
//!
//! Everything here is stateless and side-effect free; the projection formulas
//! assume step distances well below 90° (no antipodal wraparound handling),
//! which holds for the incremental walks this crate performs.

use rkyv::{Archive, Deserialize, Serialize};
use tracing::warn;

use crate::Vector3;

/// A position on the unit sphere, in degrees.
///
/// Immutable value type: every geodesic step produces a new instance.
#[derive(Debug, Clone, Copy, PartialEq, Archive, Serialize, Deserialize)]
pub struct SpherePoint {
    /// Latitude in degrees, in [-90, 90].
    pub lat_deg: f64,
    /// Longitude in degrees, normalized into [0, 360).
    pub lon_deg: f64,
}

impl SpherePoint {
    /// Create a point, normalizing longitude into [0, 360).
    ///
    /// Latitude is taken as given; configuration validation rejects
    /// out-of-range start latitudes before a trace run begins.
    pub fn new(lat_deg: f64, lon_deg: f64) -> Self {
        Self {
            lat_deg,
            lon_deg: wrap_bearing(lon_deg),
        }
    }
}

/// Normalize an angle in degrees into [0, 360).
pub fn wrap_bearing(deg: f64) -> f64 {
    let w = deg.rem_euclid(360.0);
    // rem_euclid of e.g. -1e-16 yields 360.0 exactly after rounding
    if w >= 360.0 {
        0.0
    } else {
        w
    }
}

/// Smallest absolute separation between two bearings, in [0, 180].
///
/// Wrap-aware: `bearing_separation(355.0, 5.0)` is 10, not 350.
pub fn bearing_separation(a_deg: f64, b_deg: f64) -> f64 {
    let d = (wrap_bearing(a_deg) - wrap_bearing(b_deg)).abs();
    if d > 180.0 {
        360.0 - d
    } else {
        d
    }
}

/// Destination of a great-circle step from `origin` along `bearing_deg`
/// for `distance_deg` degrees of arc.
///
/// Standard forward-geodesic formula on the unit sphere:
///
/// ```text
/// lat' = asin(sin(lat)·cos(d) + cos(lat)·sin(d)·cos(b))
/// lon' = lon + atan2(sin(b)·sin(d)·cos(lat), cos(d) − sin(lat)·sin(lat'))
/// ```
///
/// The returned longitude is normalized into [0, 360). Correctness assumes
/// `distance_deg` ≪ 90°; no hard constraint is enforced.
pub fn project(origin: SpherePoint, bearing_deg: f64, distance_deg: f64) -> SpherePoint {
    let lat = origin.lat_deg.to_radians();
    let lon = origin.lon_deg.to_radians();
    let b = bearing_deg.to_radians();
    let d = distance_deg.to_radians();

    let (lat_sin, lat_cos) = lat.sin_cos();
    let (d_sin, d_cos) = d.sin_cos();

    let new_lat = (lat_sin * d_cos + lat_cos * d_sin * b.cos()).asin();
    let new_lon = lon + (b.sin() * d_sin * lat_cos).atan2(d_cos - lat_sin * new_lat.sin());

    SpherePoint::new(new_lat.to_degrees(), new_lon.to_degrees())
}

/// Initial great-circle bearing from `from` toward `to`, in [0, 360).
///
/// Inverse companion of [`project`]: aiming a walk along a known edge.
pub fn bearing_between(from: SpherePoint, to: SpherePoint) -> f64 {
    let lat1 = from.lat_deg.to_radians();
    let lat2 = to.lat_deg.to_radians();
    let dlon = (to.lon_deg - from.lon_deg).to_radians();

    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();
    wrap_bearing(y.atan2(x).to_degrees())
}

/// Great-circle angular separation between two points, in degrees.
pub fn great_circle_distance(a: SpherePoint, b: SpherePoint) -> f64 {
    let dot = to_vector(a).dot(&to_vector(b)).clamp(-1.0, 1.0);
    dot.acos().to_degrees()
}

/// Unit 3-vector for a sphere point.
pub fn to_vector(point: SpherePoint) -> Vector3 {
    let lat = point.lat_deg.to_radians();
    let lon = point.lon_deg.to_radians();
    let (lat_sin, lat_cos) = lat.sin_cos();
    let (lon_sin, lon_cos) = lon.sin_cos();
    Vector3::new(lat_cos * lon_cos, lat_cos * lon_sin, lat_sin)
}

/// Sphere point for a 3-vector (normalized internally).
///
/// A zero-length input is degenerate: the conversion returns the (0, 0)
/// sentinel and logs a warning rather than dividing by zero.
pub fn to_spherical(v: Vector3) -> SpherePoint {
    let norm = v.norm();
    if norm == 0.0 {
        warn!("degenerate projection: zero-length vector, returning (0, 0) sentinel");
        return SpherePoint::new(0.0, 0.0);
    }
    let u = v / norm;
    let lat = u.z.clamp(-1.0, 1.0).asin().to_degrees();
    let lon = u.y.atan2(u.x).to_degrees();
    SpherePoint::new(lat, lon)
}
