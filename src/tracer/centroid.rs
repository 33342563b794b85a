//! Vertex-centroid strategies.
//!
//! The tracer reports the center of the polygon it closed. How that center
//! is computed is a pluggable policy, selected in
//! [`TraceConfig`](super::TraceConfig): a planar lat/lon average, or a
//! proper spherical mean. The state
//! machine itself never does the averaging; it hands the vertex list to the
//! configured method.

use crate::geodesic::{to_spherical, to_vector, SpherePoint};
use crate::Vector3;

/// Centroid computation policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CentroidMethod {
    /// Arithmetic mean of vertex latitudes and longitudes.
    ///
    /// Known limitation: longitude averaging is not wrap-aware and the
    /// result is not a true spherical mean. Kept as the default because it
    /// reproduces the behavior the tracer's thresholds were tuned against.
    Planar,
    /// Normalized mean of vertex unit vectors, converted back to
    /// spherical coordinates.
    Spherical,
}

impl CentroidMethod {
    /// Centroid of a set of points, or `None` for an empty set.
    pub fn compute(&self, points: &[SpherePoint]) -> Option<SpherePoint> {
        if points.is_empty() {
            return None;
        }
        match self {
            CentroidMethod::Planar => {
                let n = points.len() as f64;
                let lat = points.iter().map(|p| p.lat_deg).sum::<f64>() / n;
                let lon = points.iter().map(|p| p.lon_deg).sum::<f64>() / n;
                Some(SpherePoint::new(lat, lon))
            }
            CentroidMethod::Spherical => {
                let sum: Vector3 = points.iter().map(|&p| to_vector(p)).sum();
                // Antipodally balanced inputs cancel to the zero vector;
                // to_spherical resolves that to its (0, 0) sentinel.
                Some(to_spherical(sum / points.len() as f64))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geodesic::great_circle_distance;

    #[test]
    fn test_empty_input() {
        assert!(CentroidMethod::Planar.compute(&[]).is_none());
        assert!(CentroidMethod::Spherical.compute(&[]).is_none());
    }

    #[test]
    fn test_planar_mean() {
        let points = [
            SpherePoint::new(10.0, 100.0),
            SpherePoint::new(20.0, 110.0),
            SpherePoint::new(30.0, 120.0),
        ];
        let c = CentroidMethod::Planar.compute(&points).unwrap();
        assert!((c.lat_deg - 20.0).abs() < 1e-12);
        assert!((c.lon_deg - 110.0).abs() < 1e-12);
    }

    #[test]
    fn test_spherical_mean_of_symmetric_points() {
        // Four points symmetric about (0, 90)
        let points = [
            SpherePoint::new(10.0, 90.0),
            SpherePoint::new(-10.0, 90.0),
            SpherePoint::new(0.0, 80.0),
            SpherePoint::new(0.0, 100.0),
        ];
        let c = CentroidMethod::Spherical.compute(&points).unwrap();
        assert!(great_circle_distance(c, SpherePoint::new(0.0, 90.0)) < 1e-9);
    }

    #[test]
    fn test_seam_behavior_differs() {
        // Two points straddling the 0/360 seam: the spherical mean lands on
        // the seam, the planar mean lands on the far side of the sphere.
        // The planar result is the documented limitation, not a bug.
        let points = [SpherePoint::new(0.0, 359.0), SpherePoint::new(0.0, 1.0)];

        let spherical = CentroidMethod::Spherical.compute(&points).unwrap();
        assert!(great_circle_distance(spherical, SpherePoint::new(0.0, 0.0)) < 1e-9);

        let planar = CentroidMethod::Planar.compute(&points).unwrap();
        assert!((planar.lon_deg - 180.0).abs() < 1e-12);
    }
}
