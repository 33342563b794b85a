//! The perimeter-tracing state machine.
//!
//! A run is a bounded loop over two logical modes:
//!
//! - **Walking**: probe the signal ahead; if it is alive, nudge the bearing
//!   toward the strongest of the configured correction offsets and advance
//!   one step.
//! - **Scanning**: the signal died past the edge-minimum gate, so the
//!   current position is a vertex. Sweep the circle of candidate bearings
//!   (excluding a wedge around the reverse bearing) and adopt the strongest
//!   as the next edge. The sweep is synchronous and consumes no step budget
//!   beyond the iteration that triggered it.
//!
//! The run terminates `Closed` when the vertex target is reached, or
//! `Exhausted` when the step budget runs out; both are ordinary outcomes
//! carrying the accumulated path.

use std::time::Instant;

use tracing::{debug, info};

use crate::geodesic::{bearing_separation, project, wrap_bearing, SpherePoint};
use crate::signal::SignalField;

use super::{ConfigError, PathKind, PathPoint, TraceConfig, TraceResult, TraceStatus};

/// Run a single closed-path discovery over `field`.
///
/// The configuration is validated up front; an invalid configuration is the
/// only error path. Everything the run encounters afterward — malformed
/// samples, an unclosable polygon — is reported through [`TraceResult`]
/// rather than raised.
pub fn trace_perimeter<F>(field: &F, config: &TraceConfig) -> Result<TraceResult, ConfigError>
where
    F: SignalField + ?Sized,
{
    config.validate()?;
    let t0 = Instant::now();

    let mut path = vec![PathPoint {
        position: config.start,
        kind: PathKind::Start,
    }];

    // Degenerate target: the polygon is closed before any walking
    if config.vertex_target == 0 {
        return Ok(TraceResult {
            path,
            status: TraceStatus::Closed,
            vertices_found: 0,
            centroid: None,
            initial_signal: 0.0,
            signal_threshold: 0.0,
            malformed_samples: 0,
            steps_taken: 0,
            trace_time_ms: elapsed_ms(t0),
        });
    }

    let mut malformed: u32 = 0;

    // ── Calibration ──
    // The loss threshold is a fixed fraction of the signal at the seed
    // point. A malformed first sample calibrates the threshold to zero,
    // so such a run can only end by exhaustion.
    let initial_signal = well_formed(
        field.sample_ahead(config.start, config.initial_bearing_deg, config.lookahead_deg),
        &mut malformed,
    )
    .unwrap_or(0.0);
    let threshold = initial_signal * config.loss_threshold_ratio;

    info!(
        "trace start: ({:.2}, {:.2}) bearing {:.1}°, initial signal {:.3e}, loss threshold {:.3e}",
        config.start.lat_deg,
        config.start.lon_deg,
        config.initial_bearing_deg,
        initial_signal,
        threshold,
    );

    let mut position = config.start;
    let mut bearing = wrap_bearing(config.initial_bearing_deg);
    let mut steps_on_edge: u32 = 0;
    let mut vertices_found: u32 = 0;
    let mut vertex_positions: Vec<SpherePoint> = Vec::new();
    let mut status = TraceStatus::Exhausted;
    let mut steps_taken: u32 = 0;

    for step in 0..config.max_steps {
        steps_taken = step + 1;

        // ── Look ahead ──
        let ahead = well_formed(
            field.sample_ahead(position, bearing, config.lookahead_deg),
            &mut malformed,
        );
        let lost = match ahead {
            Some(v) => v < threshold,
            None => true,
        };

        if lost && steps_on_edge > config.edge_min_steps {
            // ── Scanning: candidate vertex ──
            debug!(
                "signal lost at step {} ({:.2}, {:.2}), rescanning",
                step, position.lat_deg, position.lon_deg,
            );
            let next_bearing = radial_rescan(field, position, bearing, config, &mut malformed);

            path.push(PathPoint {
                position,
                kind: PathKind::Vertex,
            });
            vertex_positions.push(position);
            vertices_found += 1;
            debug!(
                "vertex {} at ({:.2}, {:.2}), turning {:.1}° -> {:.1}°",
                vertices_found, position.lat_deg, position.lon_deg, bearing, next_bearing,
            );

            if vertices_found == config.vertex_target {
                status = TraceStatus::Closed;
                break;
            }

            bearing = next_bearing;
            steps_on_edge = 0;
            continue;
        }

        // ── Walking: self-correct onto the ridge, then advance ──
        // Greedy probe of the fixed offset set: strict improvement only, so
        // ties resolve to the first offset in probe order.
        let mut best_offset = 0.0;
        let mut best_signal = -1.0;
        for &offset in &config.bearing_correction_offsets_deg {
            let probe = well_formed(
                field.sample_ahead(position, wrap_bearing(bearing + offset), config.lookahead_deg),
                &mut malformed,
            );
            if let Some(s) = probe {
                if s > best_signal {
                    best_signal = s;
                    best_offset = offset;
                }
            }
        }
        bearing = wrap_bearing(bearing + best_offset);

        position = project(position, bearing, config.step_size_deg);
        path.push(PathPoint {
            position,
            kind: PathKind::Path,
        });
        steps_on_edge += 1;

        if step % 50 == 0 {
            debug!(
                "step {}: ({:.2}, {:.2}) bearing {:.1}° signal {:.3e}",
                step,
                position.lat_deg,
                position.lon_deg,
                bearing,
                ahead.unwrap_or(f64::NAN),
            );
        }
    }

    let centroid = config.centroid_method.compute(&vertex_positions);

    info!(
        "trace {:?}: {} vertices, {} steps, {} path points in {:.1} ms",
        status,
        vertices_found,
        steps_taken,
        path.len(),
        elapsed_ms(t0),
    );

    Ok(TraceResult {
        path,
        status,
        vertices_found,
        centroid,
        initial_signal,
        signal_threshold: threshold,
        malformed_samples: malformed,
        steps_taken,
        trace_time_ms: elapsed_ms(t0),
    })
}

/// Sweep the full circle of candidate bearings from a vertex and return the
/// strongest direction outside the exclusion wedge around the reverse
/// bearing. Falls back to the incoming bearing when no candidate scores a
/// strictly positive sample.
fn radial_rescan<F>(
    field: &F,
    position: SpherePoint,
    bearing: f64,
    config: &TraceConfig,
    malformed: &mut u32,
) -> f64
where
    F: SignalField + ?Sized,
{
    let reverse = wrap_bearing(bearing + 180.0);
    let mut best_angle = bearing;
    let mut best_signal = 0.0;

    let candidates = (360.0 / config.rescan_angle_step_deg).ceil() as u32;
    for i in 0..candidates {
        let angle = i as f64 * config.rescan_angle_step_deg;
        if angle >= 360.0 {
            break;
        }
        // Wrap-aware exclusion, so a reverse bearing near 0/360 still
        // shields both sides of the seam
        if bearing_separation(angle, reverse) < config.rescan_exclusion_half_width_deg {
            continue;
        }
        let sample = well_formed(
            field.sample_ahead(position, angle, config.lookahead_deg),
            malformed,
        );
        if let Some(s) = sample {
            if s > best_signal {
                best_signal = s;
                best_angle = angle;
            }
        }
    }

    debug!(
        "rescan at ({:.2}, {:.2}): best bearing {:.1}° (signal {:.3e})",
        position.lat_deg, position.lon_deg, best_angle, best_signal,
    );
    best_angle
}

/// Screen one sampler return. Negative and non-finite values violate the
/// signal contract: they are counted and treated as signal-lost so a
/// misbehaving sampler degrades the run instead of corrupting it.
fn well_formed(sample: f64, malformed: &mut u32) -> Option<f64> {
    if sample.is_finite() && sample >= 0.0 {
        Some(sample)
    } else {
        *malformed += 1;
        debug!("malformed signal sample: {}", sample);
        None
    }
}

fn elapsed_ms(t0: Instant) -> f32 {
    t0.elapsed().as_secs_f32() * 1000.0
}
