//! Stateless geometry utilities around the dodecahedral-tiling hypothesis.
//!
//! Free functions consumed by, but not part of, the tracer: the reference
//! wireframe a traced face is compared against, the rotation that aligns a
//! model face with an observed sky position, and the tangent-plane helpers
//! used to test whether two traced faces match under a fixed twist angle.
//!
//! All directions are unit 3-vectors in the same frame as
//! [`geodesic::to_vector`](crate::geodesic::to_vector).

use crate::geodesic::SpherePoint;
use crate::{Quaternion, Vector3};

/// Golden ratio.
const PHI: f64 = 1.618033988749895;

/// Chord length of a dodecahedron edge after projection onto the unit
/// sphere: (2/φ) / √3.
const EDGE_CHORD: f64 = 0.7136441795461795;

/// The 20 vertices of a regular dodecahedron, normalized onto the unit
/// sphere: the 8 cube corners (±1, ±1, ±1) and the 12 cyclic permutations
/// of (0, ±φ, ±1/φ), all scaled by 1/√3.
pub fn dodecahedron_vertices() -> Vec<Vector3> {
    let mut verts = Vec::with_capacity(20);
    for i in [-1.0, 1.0] {
        for j in [-1.0, 1.0] {
            for k in [-1.0, 1.0] {
                verts.push(Vector3::new(i, j, k));
            }
        }
    }
    let inv_phi = 1.0 / PHI;
    for i in [-1.0, 1.0] {
        for j in [-1.0, 1.0] {
            verts.push(Vector3::new(0.0, i * PHI, j * inv_phi));
            verts.push(Vector3::new(j * inv_phi, 0.0, i * PHI));
            verts.push(Vector3::new(i * PHI, j * inv_phi, 0.0));
        }
    }
    // Every vertex has norm √3, so one uniform scale lands all of them on
    // the unit sphere
    let scale = 1.0 / verts[0].norm();
    verts.iter().map(|v| v * scale).collect()
}

/// The 30 edges of the dodecahedron as index pairs into
/// [`dodecahedron_vertices`], detected by nearest-neighbor chord length.
pub fn dodecahedron_wireframe() -> Vec<(usize, usize)> {
    let verts = dodecahedron_vertices();
    let mut edges = Vec::with_capacity(30);
    for i in 0..verts.len() {
        for j in (i + 1)..verts.len() {
            let chord = (verts[i] - verts[j]).norm();
            if (chord - EDGE_CHORD).abs() < 0.05 {
                edges.push((i, j));
            }
        }
    }
    edges
}

/// The 12 face-center directions of the dodecahedron: the vertices of the
/// dual icosahedron, normalized.
pub fn face_centers() -> Vec<Vector3> {
    let mut centers = Vec::with_capacity(12);
    for i in [-1.0, 1.0] {
        for j in [-1.0, 1.0] {
            centers.push(Vector3::new(0.0, i, j * PHI));
            centers.push(Vector3::new(j * PHI, 0.0, i));
            centers.push(Vector3::new(i, j * PHI, 0.0));
        }
    }
    centers.iter().map(|c| c.normalize()).collect()
}

/// The 12 pentagonal faces as index arrays into [`dodecahedron_vertices`],
/// each ordered counter-clockwise around its face center (consecutive
/// entries, cyclically, are dodecahedron edges).
///
/// Face `k` surrounds `face_centers()[k]`.
pub fn dodecahedron_faces() -> Vec<[usize; 5]> {
    let verts = dodecahedron_vertices();
    let mut faces = Vec::with_capacity(12);

    for center in face_centers() {
        // The 5 vertices nearest the face center form the face
        let mut by_dist: Vec<usize> = (0..verts.len()).collect();
        by_dist.sort_by(|&a, &b| {
            let da = (verts[a] - center).norm();
            let db = (verts[b] - center).norm();
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        });
        let mut face: Vec<usize> = by_dist[..5].to_vec();

        // Order around the center: build a tangent basis at the center and
        // sort by azimuth
        let z_axis = center;
        let mut x_axis = Vector3::new(0.0, 0.0, 1.0).cross(&z_axis);
        if x_axis.norm() < 0.1 {
            x_axis = Vector3::new(1.0, 0.0, 0.0);
        }
        let x_axis = x_axis.normalize();
        let y_axis = z_axis.cross(&x_axis);

        face.sort_by(|&a, &b| {
            let ang = |idx: usize| {
                let v = verts[idx] - center;
                v.dot(&y_axis).atan2(v.dot(&x_axis))
            };
            ang(a)
                .partial_cmp(&ang(b))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        faces.push([face[0], face[1], face[2], face[3], face[4]]);
    }
    faces
}

/// Minimal rotation carrying `source` onto the direction of a target sky
/// position.
///
/// For antiparallel inputs (where the minimal rotation is degenerate) a
/// half-turn about an arbitrary perpendicular axis is returned; for
/// parallel inputs the identity.
pub fn rotation_to_target(source: Vector3, target: SpherePoint) -> Quaternion {
    let target_vec = crate::geodesic::to_vector(target);
    match Quaternion::rotation_between(&source, &target_vec) {
        Some(q) => q,
        None => {
            // Antiparallel: any axis perpendicular to source works
            let mut axis = source.cross(&Vector3::new(0.0, 0.0, 1.0));
            if axis.norm() < 1e-9 {
                axis = Vector3::new(1.0, 0.0, 0.0);
            }
            Quaternion::from_axis_angle(
                &nalgebra::Unit::new_normalize(axis),
                std::f64::consts::PI,
            )
        }
    }
}

/// Rodrigues rotation of `v` about `axis` by `angle_deg`.
///
/// A zero-length axis leaves `v` unchanged.
pub fn rotate_about_axis(v: Vector3, axis: Vector3, angle_deg: f64) -> Vector3 {
    if axis.norm() == 0.0 {
        return v;
    }
    let q = Quaternion::from_axis_angle(
        &nalgebra::Unit::new_normalize(axis),
        angle_deg.to_radians(),
    );
    q * v
}

// ── Twist validation helpers ────────────────────────────────────────────────

/// Tangent-plane offsets of a track around a center: (Δlon, Δlat) pairs in
/// degrees, with the longitude delta wrapped into (-180, 180].
pub fn tangent_offsets(track: &[SpherePoint], center: SpherePoint) -> Vec<(f64, f64)> {
    track
        .iter()
        .map(|p| {
            let mut dlon = (p.lon_deg - center.lon_deg).rem_euclid(360.0);
            if dlon > 180.0 {
                dlon -= 360.0;
            }
            (dlon, p.lat_deg - center.lat_deg)
        })
        .collect()
}

/// Rotate tangent-plane offsets by `angle_deg` counter-clockwise. Probing a
/// 36° twist between two opposite faces is the motivating use.
pub fn rotate_offsets(offsets: &[(f64, f64)], angle_deg: f64) -> Vec<(f64, f64)> {
    let (s, c) = angle_deg.to_radians().sin_cos();
    offsets
        .iter()
        .map(|&(x, y)| (x * c - y * s, x * s + y * c))
        .collect()
}

/// Mean nearest-neighbor distance from each offset in `a` to the set `b`,
/// in degrees. Lower is better alignment; infinite when either track is
/// empty.
pub fn alignment_error(a: &[(f64, f64)], b: &[(f64, f64)]) -> f64 {
    if a.is_empty() || b.is_empty() {
        return f64::INFINITY;
    }
    let total: f64 = a
        .iter()
        .map(|&(ax, ay)| {
            b.iter()
                .map(|&(bx, by)| ((ax - bx).powi(2) + (ay - by).powi(2)).sqrt())
                .fold(f64::INFINITY, f64::min)
        })
        .sum();
    total / a.len() as f64
}
