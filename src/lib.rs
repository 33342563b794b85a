//! # ridgetrace
//!
//! An **autonomous perimeter tracer** for scalar signal fields on the
//! celestial sphere, written in Rust.
//!
//! Given a signal field sampled from an all-sky map, `ridgetrace` walks
//! along a ridge of high signal, detects where the ridge terminates (a
//! vertex), pivots onto the continuation edge, and stops once a closed
//! polygon — such as the pentagonal boundary of a dodecahedral face — has
//! been reconstructed. It is a deterministic greedy tracer, not a
//! probabilistic estimator.
//!
//! ## Features
//!
//! - **Self-correcting walk** — a fixed set of bearing offsets is probed
//!   every step to keep the walk centered on the signal ridge
//! - **Vertex detection** — signal loss past a minimum-edge gate marks a
//!   candidate vertex; a radial rescan (with a wedge excluded around the
//!   reverse bearing) finds the next edge
//! - **Robust to bad samplers** — negative/non-finite samples are counted
//!   and treated as signal-lost rather than aborting the run
//! - **Pluggable signal sources** — any `Fn(SpherePoint) -> f64` closure or
//!   [`SkyGrid`], a binned map persisted with [rkyv](https://docs.rs/rkyv)
//!   for instant loading
//! - **Seeding & validation helpers** — dominant-branch coarse scan,
//!   dodecahedron wireframe/faces, rotation alignment, twist-angle probes
//!
//! ## Example
//!
//! ```
//! use ridgetrace::{trace_perimeter, SpherePoint, TraceConfig, TraceStatus};
//!
//! // A synthetic field: a narrow ridge along the equator
//! let field = |p: SpherePoint| (-(p.lat_deg / 0.3).powi(2)).exp();
//!
//! let mut config = TraceConfig::new(SpherePoint::new(0.0, 10.0), 90.0);
//! config.max_steps = 100;
//!
//! let result = trace_perimeter(&field, &config).unwrap();
//! match result.status {
//!     TraceStatus::Closed => println!(
//!         "closed polygon: {} vertices, centroid {:?}",
//!         result.vertices_found, result.centroid,
//!     ),
//!     TraceStatus::Exhausted => println!(
//!         "budget exhausted after {} steps, {} vertices found",
//!         result.steps_taken, result.vertices_found,
//!     ),
//! }
//! ```
//!
//! ## Algorithm overview
//!
//! 1. **Calibration** — sample the field ahead of the seed point; the
//!    signal-loss threshold is a fixed fraction of that reading
//! 2. **Walking** — probe a short lookahead along the current bearing; while
//!    the signal is alive, nudge the bearing toward the strongest of a small
//!    offset set and advance one step
//! 3. **Scanning** — on signal loss, record a vertex, sweep the full circle
//!    of candidate bearings excluding the arrival direction, and adopt the
//!    strongest as the next edge
//! 4. **Termination** — `Closed` when the configured vertex count is
//!    reached, `Exhausted` when the step budget runs out; both return the
//!    full path and the vertex centroid
//!
//! The geodesic engine underneath (forward great-circle projection,
//! vector/spherical conversions, bearing arithmetic) is exposed in
//! [`geodesic`] and safe to use standalone.

pub mod geodesic;
pub mod geom;
pub mod scan;
pub mod signal;
pub mod skygrid;
pub mod tracer;

pub use geodesic::{
    bearing_between, bearing_separation, great_circle_distance, project, to_spherical, to_vector,
    wrap_bearing, SpherePoint,
};
pub use scan::dominant_branches;
pub use signal::SignalField;
pub use skygrid::SkyGrid;
pub use tracer::{
    trace_perimeter, CentroidMethod, ConfigError, PathKind, PathPoint, TraceConfig, TraceResult,
    TraceStatus,
};

// Commonly used types
// Note: all coordinate math runs in 64-bit floats. A trace accumulates
// error over every one of its (up to) thousand geodesic steps, which is
// exactly the regime where 32-bit floats have proven insufficient.
pub type Vector3 = nalgebra::Vector3<f64>;
pub type Quaternion = nalgebra::UnitQuaternion<f64>;
