// src/bathymetry.rs - seafloor depth along the survey track

use crate::constants::{EDGE_PADDING_KM, EDGE_PADDING_STEP_KM};
use crate::error::MagellanError;
use serde::Serialize;

/// Parallel distance/depth arrays, ascending (non-decreasing) in distance.
/// Depth is in km on the same vertical axis the forward model uses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BathymetryProfile {
    distance: Vec<f64>,
    depth: Vec<f64>,
}

impl BathymetryProfile {
    pub fn new(distance: Vec<f64>, depth: Vec<f64>) -> Result<Self, MagellanError> {
        if distance.len() != depth.len() {
            return Err(MagellanError::InvalidBathymetry(format!(
                "{} distances but {} depths",
                distance.len(),
                depth.len()
            )));
        }
        if distance.len() < 2 {
            return Err(MagellanError::InvalidBathymetry(format!(
                "at least 2 points are required, got {}",
                distance.len()
            )));
        }
        if let Some(i) = distance
            .iter()
            .zip(&depth)
            .position(|(x, z)| !x.is_finite() || !z.is_finite())
        {
            return Err(MagellanError::InvalidBathymetry(format!(
                "non-finite value at point {}",
                i
            )));
        }
        if let Some(i) = distance.windows(2).position(|w| w[1] < w[0]) {
            return Err(MagellanError::InvalidBathymetry(format!(
                "distance decreases after point {} ({} -> {})",
                i,
                distance[i],
                distance[i + 1]
            )));
        }

        Ok(Self { distance, depth })
    }

    /// Accept a track in either direction; descending tracks are reversed.
    pub fn from_track(mut distance: Vec<f64>, mut depth: Vec<f64>) -> Result<Self, MagellanError> {
        if distance.len() >= 2 && distance[0] > distance[distance.len() - 1] {
            distance.reverse();
            depth.reverse();
        }
        Self::new(distance, depth)
    }

    pub fn distance(&self) -> &[f64] {
        &self.distance
    }

    pub fn depth(&self) -> &[f64] {
        &self.depth
    }

    pub fn len(&self) -> usize {
        self.distance.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distance.is_empty()
    }

    pub fn min_distance(&self) -> f64 {
        self.distance[0]
    }

    pub fn max_distance(&self) -> f64 {
        self.distance[self.distance.len() - 1]
    }

    /// Extend both ends by `margin_km` at `step_km` spacing, repeating the
    /// end depths.
    pub fn padded(&self, margin_km: f64, step_km: f64) -> BathymetryProfile {
        let count = if step_km > 0.0 {
            (margin_km / step_km).round().max(0.0) as usize
        } else {
            0
        };

        let first_x = self.min_distance();
        let last_x = self.max_distance();
        let first_z = self.depth[0];
        let last_z = self.depth[self.depth.len() - 1];

        let mut distance = Vec::with_capacity(self.len() + 2 * count);
        let mut depth = Vec::with_capacity(self.len() + 2 * count);

        for i in (1..=count).rev() {
            distance.push(first_x - i as f64 * step_km);
            depth.push(first_z);
        }
        distance.extend_from_slice(&self.distance);
        depth.extend_from_slice(&self.depth);
        for i in 1..=count {
            distance.push(last_x + i as f64 * step_km);
            depth.push(last_z);
        }

        BathymetryProfile { distance, depth }
    }

    /// `padded` with the standard 20 km margin at 1 km spacing.
    pub fn edge_padded(&self) -> BathymetryProfile {
        self.padded(EDGE_PADDING_KM, EDGE_PADDING_STEP_KM)
    }
}

/// A survey track: bathymetry plus the observed anomaly at each point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Track {
    pub bathymetry: BathymetryProfile,
    pub observed_anomaly: Vec<f64>,
}

impl Track {
    pub fn new(
        distance: Vec<f64>,
        depth: Vec<f64>,
        mut observed_anomaly: Vec<f64>,
    ) -> Result<Self, MagellanError> {
        if observed_anomaly.len() != distance.len() {
            return Err(MagellanError::InvalidBathymetry(format!(
                "{} distances but {} anomaly readings",
                distance.len(),
                observed_anomaly.len()
            )));
        }
        if distance.len() >= 2 && distance[0] > distance[distance.len() - 1] {
            observed_anomaly.reverse();
        }
        Ok(Self {
            bathymetry: BathymetryProfile::from_track(distance, depth)?,
            observed_anomaly,
        })
    }

    pub fn distance(&self) -> &[f64] {
        self.bathymetry.distance()
    }
}
