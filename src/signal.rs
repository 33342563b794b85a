//! The signal-source contract: the tracer's only sensory input.
//!
//! A [`SignalField`] maps a sphere position to a non-negative scalar
//! magnitude. The tracer never parses map file formats; it depends only on
//! this sampling contract, so any backing store — a precomputed grid, a
//! closure over synthetic geometry, an adapter around an external map
//! library — plugs in the same way.
//!
//! Implementations must be safe to sample concurrently from independent
//! trace runs (`&self` receiver, no interior mutation expected). A sampler
//! that returns a negative or non-finite value violates the contract; the
//! tracer treats such samples as signal-lost and counts them rather than
//! aborting (see [`TraceResult::malformed_samples`](crate::TraceResult)).

use crate::geodesic::{project, SpherePoint};

/// A scalar signal field over the sphere.
pub trait SignalField {
    /// Signal magnitude at a point. Well-formed values are finite and ≥ 0.
    fn sample(&self, point: SpherePoint) -> f64;

    /// Signal magnitude at a short lookahead point: project `lookahead_deg`
    /// along `bearing_deg` from `point`, then sample there.
    fn sample_ahead(&self, point: SpherePoint, bearing_deg: f64, lookahead_deg: f64) -> f64 {
        self.sample(project(point, bearing_deg, lookahead_deg))
    }
}

/// Any `Fn(SpherePoint) -> f64` closure is a signal field. Convenient for
/// synthetic fields in tests and for adapting external map samplers.
impl<F> SignalField for F
where
    F: Fn(SpherePoint) -> f64,
{
    fn sample(&self, point: SpherePoint) -> f64 {
        self(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_field() {
        let field = |p: SpherePoint| p.lat_deg.abs();
        assert_eq!(field.sample(SpherePoint::new(-30.0, 10.0)), 30.0);
    }

    #[test]
    fn test_sample_ahead_projects() {
        // Field that is 1.0 north of the equator, 0.0 south of it.
        let field = |p: SpherePoint| if p.lat_deg > 0.0 { 1.0 } else { 0.0 };
        let origin = SpherePoint::new(-0.2, 100.0);
        assert_eq!(field.sample(origin), 0.0);
        // Looking 0.5° north crosses the equator
        assert_eq!(field.sample_ahead(origin, 0.0, 0.5), 1.0);
        // Looking south does not
        assert_eq!(field.sample_ahead(origin, 180.0, 0.5), 0.0);
    }
}
