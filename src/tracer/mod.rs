//! Autonomous perimeter tracer: walk a ridge of high signal, detect where it
//! terminates, pivot, and stop once a closed polygon is reconstructed.
//!
//! This module implements the "wall-crawler" strategy over a scalar signal
//! field on the sphere. The algorithm:
//!
//! 1. **Calibration**: sample the field ahead of the start point; the loss
//!    threshold is a fixed fraction of that reading.
//! 2. **Walking**: step forward along the current bearing, nudging the
//!    bearing each step toward the strongest of a small set of probe offsets
//!    to stay centered on the ridge.
//! 3. **Vertex detection**: when the lookahead signal drops below the loss
//!    threshold (and enough steps have been walked to rule out a transient),
//!    the current position is a candidate vertex.
//! 4. **Rescan**: sweep the full circle of candidate bearings, excluding a
//!    wedge around the reverse bearing, and adopt the strongest direction as
//!    the next edge.
//! 5. **Termination**: close after the configured number of vertices, or
//!    exhaust the step budget and return the partial path.

pub mod centroid;
pub mod trace;

use rkyv::{Archive, Deserialize, Serialize};
use thiserror::Error;

use crate::geodesic::SpherePoint;

pub use centroid::CentroidMethod;
pub use trace::trace_perimeter;

// ── Path records ────────────────────────────────────────────────────────────

/// Role of a point in a traced path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Archive, Serialize, Deserialize)]
pub enum PathKind {
    /// The seed position of the run.
    Start,
    /// An ordinary forward step along an edge.
    Path,
    /// A detected ridge termination.
    Vertex,
}

/// One record of a traced path. The path is append-only: no element is
/// removed or mutated once written.
#[derive(Debug, Clone, Copy, PartialEq, Archive, Serialize, Deserialize)]
pub struct PathPoint {
    pub position: SpherePoint,
    pub kind: PathKind,
}

// ── Status codes ────────────────────────────────────────────────────────────

/// Terminal outcome of a trace run. Neither variant is an error: an
/// exhausted run still carries its partial path and vertex count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceStatus {
    /// The configured number of vertices was found; the polygon is closed.
    Closed,
    /// The step budget ran out before the polygon could be closed.
    Exhausted,
}

// ── Configuration ───────────────────────────────────────────────────────────

/// Parameters controlling a trace run.
///
/// A flat record with no hidden defaults: every tuning knob of the walk is
/// here. `start` and `initial_bearing_deg` have no meaningful default and
/// should be set via [`TraceConfig::new`].
#[derive(Debug, Clone)]
pub struct TraceConfig {
    /// Seed position of the walk.
    pub start: SpherePoint,
    /// Seed bearing in degrees clockwise from north.
    pub initial_bearing_deg: f64,
    /// Degrees of arc advanced per forward step. Default 0.2.
    pub step_size_deg: f64,
    /// Hard step budget for the whole run. Default 1000.
    pub max_steps: u32,
    /// Minimum steps walked on the current edge before a signal drop is
    /// treated as a real vertex rather than a transient. Default 20.
    pub edge_min_steps: u32,
    /// Number of vertices that closes the polygon (5 for a pentagonal
    /// face). Zero is degenerate and closes immediately. Default 5.
    pub vertex_target: u32,
    /// Fraction of the initial signal reading below which the signal is
    /// declared lost. Default 0.4.
    pub loss_threshold_ratio: f64,
    /// Angular resolution of the radial rescan, degrees. Default 5.
    pub rescan_angle_step_deg: f64,
    /// Half-width of the wedge around the reverse bearing excluded from the
    /// rescan, so the walker does not re-walk the edge it arrived on.
    /// Default 30.
    pub rescan_exclusion_half_width_deg: f64,
    /// Bearing perturbations probed every forward step to keep the walk
    /// centered on the ridge, in probe order. Ties break to the
    /// first-probed offset. Default [-10, -5, 0, 5, 10].
    pub bearing_correction_offsets_deg: Vec<f64>,
    /// Fixed lookahead distance for every signal probe, independent of the
    /// step size. Default 0.5.
    pub lookahead_deg: f64,
    /// How the vertex centroid is computed for the result. Default planar.
    pub centroid_method: CentroidMethod,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            start: SpherePoint::new(0.0, 0.0),
            initial_bearing_deg: 0.0,
            step_size_deg: 0.2,
            max_steps: 1000,
            edge_min_steps: 20,
            vertex_target: 5,
            loss_threshold_ratio: 0.4,
            rescan_angle_step_deg: 5.0,
            rescan_exclusion_half_width_deg: 30.0,
            bearing_correction_offsets_deg: vec![-10.0, -5.0, 0.0, 5.0, 10.0],
            lookahead_deg: 0.5,
            centroid_method: CentroidMethod::Planar,
        }
    }
}

impl TraceConfig {
    /// Create a configuration with the given seed position and bearing.
    pub fn new(start: SpherePoint, initial_bearing_deg: f64) -> Self {
        Self {
            start,
            initial_bearing_deg,
            ..Default::default()
        }
    }

    /// Validate the configuration. Called by [`trace_perimeter`] before a
    /// run starts; invalid parameters never surface mid-run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("step_size_deg", self.step_size_deg),
            ("lookahead_deg", self.lookahead_deg),
            ("rescan_angle_step_deg", self.rescan_angle_step_deg),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NonPositive { name, value });
            }
        }
        if self.max_steps == 0 {
            return Err(ConfigError::ZeroStepBudget);
        }
        if !self.loss_threshold_ratio.is_finite()
            || self.loss_threshold_ratio <= 0.0
            || self.loss_threshold_ratio > 1.0
        {
            return Err(ConfigError::ThresholdRatioOutOfRange {
                value: self.loss_threshold_ratio,
            });
        }
        if !self.rescan_exclusion_half_width_deg.is_finite()
            || self.rescan_exclusion_half_width_deg < 0.0
            || self.rescan_exclusion_half_width_deg >= 180.0
        {
            return Err(ConfigError::ExclusionOutOfRange {
                value: self.rescan_exclusion_half_width_deg,
            });
        }
        if self.bearing_correction_offsets_deg.is_empty() {
            return Err(ConfigError::EmptyCorrectionOffsets);
        }
        if let Some(&value) = self
            .bearing_correction_offsets_deg
            .iter()
            .find(|v| !v.is_finite())
        {
            return Err(ConfigError::NonFiniteOffset { value });
        }
        if !self.start.lat_deg.is_finite() || self.start.lat_deg.abs() > 90.0 {
            return Err(ConfigError::StartLatitudeOutOfRange {
                value: self.start.lat_deg,
            });
        }
        if !self.initial_bearing_deg.is_finite() {
            return Err(ConfigError::NonFiniteBearing {
                value: self.initial_bearing_deg,
            });
        }
        Ok(())
    }
}

/// Invalid trace configuration, rejected before a run starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A length or resolution parameter is zero, negative, or non-finite.
    #[error("{name} must be positive and finite, got {value}")]
    NonPositive {
        /// Name of the offending field.
        name: &'static str,
        /// Value provided.
        value: f64,
    },

    /// The step budget is zero.
    #[error("max_steps must be greater than zero")]
    ZeroStepBudget,

    /// The signal-loss ratio is outside (0, 1].
    #[error("loss_threshold_ratio must be in (0, 1], got {value}")]
    ThresholdRatioOutOfRange {
        /// Value provided.
        value: f64,
    },

    /// The rescan exclusion half-width is outside [0, 180).
    #[error("rescan_exclusion_half_width_deg must be in [0, 180), got {value}")]
    ExclusionOutOfRange {
        /// Value provided.
        value: f64,
    },

    /// No bearing correction offsets were provided.
    #[error("bearing_correction_offsets_deg must not be empty")]
    EmptyCorrectionOffsets,

    /// A bearing correction offset is NaN or infinite.
    #[error("bearing correction offsets must be finite, got {value}")]
    NonFiniteOffset {
        /// Value provided.
        value: f64,
    },

    /// The start latitude is outside [-90, 90].
    #[error("start latitude must be in [-90, 90], got {value}")]
    StartLatitudeOutOfRange {
        /// Value provided.
        value: f64,
    },

    /// The initial bearing is NaN or infinite.
    #[error("initial_bearing_deg must be finite, got {value}")]
    NonFiniteBearing {
        /// Value provided.
        value: f64,
    },
}

// ── Trace result ────────────────────────────────────────────────────────────

/// Result of a trace run.
#[derive(Debug, Clone)]
pub struct TraceResult {
    /// The ordered path: the start record, every forward step, and every
    /// detected vertex, in discovery order.
    pub path: Vec<PathPoint>,
    /// Terminal outcome.
    pub status: TraceStatus,
    /// Number of vertices detected. Always equals the number of
    /// [`PathKind::Vertex`] records in `path`.
    pub vertices_found: u32,
    /// Centroid of the detected vertices, computed by the configured
    /// [`CentroidMethod`]. `None` when no vertex was found.
    pub centroid: Option<SpherePoint>,
    /// Signal reading used for threshold calibration (0 when the very first
    /// sample was malformed).
    pub initial_signal: f64,
    /// Loss threshold derived from the initial reading.
    pub signal_threshold: f64,
    /// Number of negative or non-finite samples returned by the field
    /// during the run. Each was treated as signal-lost and recovered; a
    /// nonzero count flags a misbehaving sampler to the caller.
    pub malformed_samples: u32,
    /// Loop iterations consumed from the step budget.
    pub steps_taken: u32,
    /// Wall-clock time spent tracing, in milliseconds.
    pub trace_time_ms: f32,
}

impl TraceResult {
    /// Whether the run closed its polygon.
    pub fn is_closed(&self) -> bool {
        self.status == TraceStatus::Closed
    }

    /// Positions of the detected vertices, in discovery order.
    pub fn vertex_positions(&self) -> Vec<SpherePoint> {
        self.path
            .iter()
            .filter(|p| p.kind == PathKind::Vertex)
            .map(|p| p.position)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(TraceConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let c = TraceConfig {
            step_size_deg: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            c.validate(),
            Err(ConfigError::NonPositive { name: "step_size_deg", .. })
        ));

        let c = TraceConfig {
            step_size_deg: f64::NAN,
            ..Default::default()
        };
        assert!(c.validate().is_err());

        let c = TraceConfig {
            max_steps: 0,
            ..Default::default()
        };
        assert!(matches!(c.validate(), Err(ConfigError::ZeroStepBudget)));

        let c = TraceConfig {
            loss_threshold_ratio: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            c.validate(),
            Err(ConfigError::ThresholdRatioOutOfRange { .. })
        ));

        let c = TraceConfig {
            rescan_exclusion_half_width_deg: 180.0,
            ..Default::default()
        };
        assert!(matches!(
            c.validate(),
            Err(ConfigError::ExclusionOutOfRange { .. })
        ));

        let c = TraceConfig {
            bearing_correction_offsets_deg: Vec::new(),
            ..Default::default()
        };
        assert!(matches!(
            c.validate(),
            Err(ConfigError::EmptyCorrectionOffsets)
        ));

        let c = TraceConfig {
            bearing_correction_offsets_deg: vec![-10.0, f64::NAN],
            ..Default::default()
        };
        assert!(matches!(c.validate(), Err(ConfigError::NonFiniteOffset { .. })));

        let c = TraceConfig {
            start: SpherePoint {
                lat_deg: 95.0,
                lon_deg: 0.0,
            },
            ..Default::default()
        };
        assert!(matches!(
            c.validate(),
            Err(ConfigError::StartLatitudeOutOfRange { .. })
        ));

        let c = TraceConfig {
            initial_bearing_deg: f64::INFINITY,
            ..Default::default()
        };
        assert!(matches!(
            c.validate(),
            Err(ConfigError::NonFiniteBearing { .. })
        ));
    }

    #[test]
    fn test_vertex_target_zero_is_valid() {
        let c = TraceConfig {
            vertex_target: 0,
            ..Default::default()
        };
        assert!(c.validate().is_ok());
    }
}
