//! Coarse radial scan: find the dominant branch directions leaving a point.
//!
//! A vertex of the hypothesized tiling is where three edges meet. Before
//! committing a tracer to a bearing, a full-circle sweep at fine angular
//! resolution ranks every direction by signal magnitude and keeps the top
//! few that are mutually well separated. The tracer does not use this; it
//! is the seeding step that produces the tracer's `initial_bearing_deg`.

use tracing::debug;

use crate::geodesic::{bearing_separation, SpherePoint};
use crate::signal::SignalField;

/// Sweep the full circle around `origin` and return up to `count` dominant
/// branch bearings, strongest first.
///
/// Candidates are ranked by absolute signal magnitude at `lookahead_deg`
/// ahead, then greedily accepted in rank order, skipping any bearing within
/// `min_separation_deg` of an already-accepted one. Non-finite samples are
/// ignored. Typical survey values are a 0.1° sweep step, 0.5° lookahead,
/// 60° separation, and 3 branches (for a tiling vertex of degree three).
pub fn dominant_branches<F>(
    field: &F,
    origin: SpherePoint,
    scan_step_deg: f64,
    lookahead_deg: f64,
    min_separation_deg: f64,
    count: usize,
) -> Vec<f64>
where
    F: SignalField + ?Sized,
{
    let mut scan: Vec<(f64, f64)> = Vec::new();
    let candidates = (360.0 / scan_step_deg).ceil() as u64;
    for i in 0..candidates {
        let angle = i as f64 * scan_step_deg;
        if angle >= 360.0 {
            break;
        }
        let value = field.sample_ahead(origin, angle, lookahead_deg);
        if value.is_finite() {
            scan.push((angle, value));
        }
    }

    scan.sort_by(|a, b| {
        b.1.abs()
            .partial_cmp(&a.1.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut branches: Vec<f64> = Vec::new();
    for (angle, _value) in scan {
        if branches
            .iter()
            .all(|&b| bearing_separation(angle, b) >= min_separation_deg)
        {
            branches.push(angle);
        }
        if branches.len() == count {
            break;
        }
    }

    debug!(
        "dominant branches from ({:.2}, {:.2}): {:?}",
        origin.lat_deg, origin.lon_deg, branches,
    );
    branches
}
