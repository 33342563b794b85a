//! Binned in-memory scalar sky map implementing the sampling contract.
//!
//! `SkyGrid` stores one signal magnitude per cell of a HEALPix-style
//! rectangular binning: latitude is partitioned into `3 * nside` bins
//! uniform in `z = sin(lat)`, and longitude into `4 * nside` bins, for a
//! total of `12 * nside^2` equal-area-ish cells. Sampling a point reduces
//! to one cell lookup, so a grid behaves like the nearest-pixel map
//! samplers the tracer was designed against.
//!
//! The grid never parses map file formats; it is the precomputed product of
//! an external map pipeline, persisted as rkyv bytes for instant reloading.

use rkyv::{Archive, Deserialize, Serialize};
use tracing::info;

use crate::geodesic::SpherePoint;
use crate::signal::SignalField;

/// A precomputed scalar signal map on the sphere.
#[derive(Debug, Clone, Archive, Serialize, Deserialize)]
pub struct SkyGrid {
    nside: u32,
    n_lat: u32,
    n_lon: u32,
    pixels: Vec<f64>,
}

impl SkyGrid {
    /// Build a grid from owned pixel values.
    ///
    /// `nside` controls resolution and must be greater than zero; `pixels`
    /// must hold exactly `12 * nside^2` values, laid out row-major with
    /// latitude bins outermost (south to north) and longitude bins innermost.
    pub fn new(nside: u32, pixels: Vec<f64>) -> anyhow::Result<Self> {
        anyhow::ensure!(nside > 0, "nside must be > 0");
        let n_lat = 3 * nside;
        let n_lon = 4 * nside;
        let n_cells = (n_lat * n_lon) as usize;
        anyhow::ensure!(
            pixels.len() == n_cells,
            "expected {} pixels for nside {}, got {}",
            n_cells,
            nside,
            pixels.len(),
        );
        Ok(Self {
            nside,
            n_lat,
            n_lon,
            pixels,
        })
    }

    /// Rasterize a signal function into a grid, evaluating it at each cell
    /// center.
    pub fn from_fn<F>(nside: u32, f: F) -> anyhow::Result<Self>
    where
        F: Fn(SpherePoint) -> f64,
    {
        anyhow::ensure!(nside > 0, "nside must be > 0");
        let n_lat = 3 * nside;
        let n_lon = 4 * nside;
        let mut pixels = Vec::with_capacity((n_lat * n_lon) as usize);
        for lat_bin in 0..n_lat {
            for lon_bin in 0..n_lon {
                pixels.push(f(Self::center_of(n_lat, n_lon, lat_bin, lon_bin)));
            }
        }
        Self::new(nside, pixels)
    }

    /// Return the grid resolution parameter.
    pub fn nside(&self) -> u32 {
        self.nside
    }

    /// Return the total number of cells.
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// Return `true` when the grid holds no cells (never, post-construction).
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Return all pixel values as an immutable slice.
    pub fn pixels(&self) -> &[f64] {
        &self.pixels
    }

    /// Flat cell index containing a point.
    pub fn cell_for(&self, point: SpherePoint) -> usize {
        let z = point.lat_deg.to_radians().sin().clamp(-1.0, 1.0);
        let lat_bin = Self::z_to_lat_bin(self.n_lat, z);
        let lon_bin = Self::lon_to_bin(self.n_lon, point.lon_deg);
        (lat_bin * self.n_lon + lon_bin) as usize
    }

    /// Center coordinates of a flat cell index.
    pub fn cell_center(&self, cell: usize) -> SpherePoint {
        let lat_bin = cell as u32 / self.n_lon;
        let lon_bin = cell as u32 % self.n_lon;
        Self::center_of(self.n_lat, self.n_lon, lat_bin, lon_bin)
    }

    fn center_of(n_lat: u32, n_lon: u32, lat_bin: u32, lon_bin: u32) -> SpherePoint {
        let z = -1.0 + (lat_bin as f64 + 0.5) * (2.0 / n_lat as f64);
        let lat = z.clamp(-1.0, 1.0).asin().to_degrees();
        let lon = (lon_bin as f64 + 0.5) * (360.0 / n_lon as f64);
        SpherePoint::new(lat, lon)
    }

    fn z_to_lat_bin(n_lat: u32, z: f64) -> u32 {
        let u = ((z + 1.0) * 0.5).clamp(0.0, 1.0);
        let mut idx = (u * n_lat as f64).floor() as u32;
        if idx >= n_lat {
            idx = n_lat - 1;
        }
        idx
    }

    fn lon_to_bin(n_lon: u32, lon_deg: f64) -> u32 {
        let u = (lon_deg.rem_euclid(360.0) / 360.0).clamp(0.0, 1.0 - f64::EPSILON);
        let mut idx = (u * n_lon as f64).floor() as u32;
        if idx >= n_lon {
            idx = n_lon - 1;
        }
        idx
    }
}

impl SignalField for SkyGrid {
    fn sample(&self, point: SpherePoint) -> f64 {
        self.pixels[self.cell_for(point)]
    }
}

// ── Serialization ───────────────────────────────────────────────────────────

impl SkyGrid {
    /// Serialize the grid to bytes using rkyv.
    pub fn to_rkyv_bytes(&self) -> Vec<u8> {
        rkyv::to_bytes::<rkyv::rancor::Error>(self)
            .expect("rkyv serialization failed")
            .to_vec()
    }

    /// Deserialize a grid from rkyv bytes.
    pub fn from_rkyv_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        rkyv::from_bytes::<Self, rkyv::rancor::Error>(bytes)
            .map_err(|e| anyhow::anyhow!("rkyv deserialization failed: {}", e))
    }

    /// Save the grid to a file using rkyv.
    pub fn save_to_file(&self, path: &str) -> anyhow::Result<()> {
        let bytes = self.to_rkyv_bytes();
        std::fs::write(path, &bytes)?;
        info!("Saved sky grid to {} ({} bytes)", path, bytes.len());
        Ok(())
    }

    /// Load a grid from an rkyv file.
    pub fn load_from_file(path: &str) -> anyhow::Result<Self> {
        let bytes = std::fs::read(path)?;
        let grid = Self::from_rkyv_bytes(&bytes)?;
        info!("Loaded sky grid: nside {}, {} cells", grid.nside, grid.len());
        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_count_and_layout() {
        let grid = SkyGrid::from_fn(4, |_| 1.0).unwrap();
        assert_eq!(grid.len(), 12 * 4 * 4);
        assert!(!grid.is_empty());

        // Every cell center maps back to its own cell
        for cell in 0..grid.len() {
            assert_eq!(grid.cell_for(grid.cell_center(cell)), cell);
        }
    }

    #[test]
    fn test_new_rejects_wrong_length() {
        assert!(SkyGrid::new(2, vec![0.0; 7]).is_err());
        assert!(SkyGrid::new(0, vec![]).is_err());
        assert!(SkyGrid::new(1, vec![0.0; 12]).is_ok());
    }

    #[test]
    fn test_sampling_matches_source_function() {
        // Smooth function of latitude only: nearest-cell sampling should be
        // close to the source value for a reasonably fine grid.
        let f = |p: SpherePoint| 10.0 + p.lat_deg / 9.0;
        let grid = SkyGrid::from_fn(64, f).unwrap();

        for &(lat, lon) in &[(0.0, 10.0), (45.0, 200.0), (-41.81, 354.38), (80.0, 0.0)] {
            let p = SpherePoint::new(lat, lon);
            let got = grid.sample(p);
            let want = f(p);
            assert!(
                (got - want).abs() < 0.15,
                "sample at ({}, {}): got {}, want {}",
                lat,
                lon,
                got,
                want,
            );
        }
    }

    #[test]
    fn test_longitude_seam() {
        // A field that peaks in a band straddling lon = 0
        let f = |p: SpherePoint| {
            let d = (p.lon_deg - 0.0).rem_euclid(360.0).min((0.0 - p.lon_deg).rem_euclid(360.0));
            if d < 5.0 {
                1.0
            } else {
                0.0
            }
        };
        let grid = SkyGrid::from_fn(32, f).unwrap();
        assert_eq!(grid.sample(SpherePoint::new(0.0, 359.5)), 1.0);
        assert_eq!(grid.sample(SpherePoint::new(0.0, 0.5)), 1.0);
        assert_eq!(grid.sample(SpherePoint::new(0.0, 180.0)), 0.0);
    }

    #[test]
    fn test_rkyv_roundtrip() {
        let grid = SkyGrid::from_fn(8, |p| p.lat_deg.abs() + p.lon_deg).unwrap();
        let bytes = grid.to_rkyv_bytes();
        let back = SkyGrid::from_rkyv_bytes(&bytes).unwrap();
        assert_eq!(back.nside(), grid.nside());
        assert_eq!(back.pixels(), grid.pixels());
    }
}
