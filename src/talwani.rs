//! Forward model of the total-field magnetic anomaly over a 2-D magnetized
//! layer, using Talwani's line integrals around each trapezoidal block.

use crate::bathymetry::BathymetryProfile;
use crate::config::{FieldGeometry, ModelParams};
use crate::constants::RADIUS_EPSILON_KM;
use crate::events::Polarity;
use crate::magnetized_layer::MagnetizedLayer;
use crate::math_utils::nearest_index;
use crate::oblique::Obliquity;
use glam::DVec2;
use rayon::prelude::*;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnomalyPoint {
    pub distance: f64,
    pub value: f64,
}

/// A bathymetry interval of zero horizontal extent, left out of the model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SkippedBlock {
    pub index: usize,
    pub distance: f64,
}

/// Predicted anomaly, ascending in distance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnomalyModel {
    pub points: Vec<AnomalyPoint>,
    pub skipped_blocks: Vec<SkippedBlock>,
}

impl AnomalyModel {
    pub fn distances(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.distance).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Root-mean-square difference against observed values taken at the same
    /// distances. `None` when the lengths differ or there is nothing to compare.
    pub fn rms_misfit(&self, observed: &[f64]) -> Option<f64> {
        if observed.len() != self.points.len() || observed.is_empty() {
            return None;
        }
        let sum_sq: f64 = self
            .points
            .iter()
            .zip(observed)
            .map(|(p, o)| (p.value - o).powi(2))
            .sum();
        Some((sum_sq / observed.len() as f64).sqrt())
    }
}

/// One trapezoid between two adjacent bathymetry points: the top follows the
/// seafloor, the bottom lies `thickness` below it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Block {
    pub index: usize,
    pub top_left: DVec2,
    pub top_right: DVec2,
    pub thickness: f64,
    pub polarity: Polarity,
    /// Effective magnetization used by the edge formulas
    pub magnetization: f64,
}

impl Block {
    /// Corners in traversal order: top-left, top-right, bottom-right,
    /// bottom-left.
    pub fn vertices(&self) -> [DVec2; 4] {
        let down = DVec2::new(0.0, self.thickness);
        [
            self.top_left,
            self.top_right,
            self.top_right + down,
            self.top_left + down,
        ]
    }

    /// Total-field anomaly of this block at `observation` (same horizontal
    /// frame as the block, observation at z = 0).
    ///
    /// # Arguments
    /// * `observation` - Horizontal position of the observation point
    /// * `geometry` - Inclination/azimuth/declination terms of the field
    ///
    /// # Returns
    /// The block's contribution, already signed by its polarity
    pub fn response(&self, observation: f64, geometry: &FieldGeometry) -> f64 {
        let offset = DVec2::new(observation, 0.0);
        let corners = self.vertices().map(|v| v - offset);
        let (jx, jz) = geometry.components(self.magnetization);

        let mut total = 0.0;
        for i in 0..4 {
            let (p, q) = edge_weights(corners[i], corners[(i + 1) % 4]);
            let vertical = 2.0 * (jx * q - jz * p);
            let horizontal = 2.0 * (jx * p + jz * q);
            total += geometry.total_field(vertical, horizontal);
        }
        self.polarity.sign() * total
    }
}

/// Angle and log-radius weights (P, Q) of one polygon edge, endpoints given
/// relative to the observation point.
///
/// An edge with no vertical extent contributes nothing. A vertical edge
/// reduces to P = Δθ, Q = ln(r_end / r_start), the same form as a slanted
/// edge, so the shared interior edges of adjacent blocks cancel exactly.
fn edge_weights(start: DVec2, end: DVec2) -> (f64, f64) {
    let z21 = end.y - start.y;
    let length_sq = (end - start).length_squared();
    if z21 == 0.0 || length_sq == 0.0 {
        return (0.0, 0.0);
    }
    let x12 = start.x - end.x;
    let c1 = z21 * z21 / length_sq;
    let c2 = z21 * x12 / length_sq;

    let delta_theta = start.y.atan2(start.x) - end.y.atan2(end.x);
    let log_ratio = (start.length().max(RADIUS_EPSILON_KM) / end.length().max(RADIUS_EPSILON_KM)).ln();

    (
        c1 * delta_theta + c2 * log_ratio,
        c2 * delta_theta - c1 * log_ratio,
    )
}

/// Split the (projected) bathymetry into blocks and assign each one the
/// polarity and magnetization of the layer segment in effect at its left
/// edge.
///
/// Each layer segment marks the bathymetry index nearest its start. A block
/// takes the latest marker at or before its left index; blocks before any
/// marker take the first segment's state.
pub fn build_blocks(
    distances: &[f64],
    depths: &[f64],
    layer: &MagnetizedLayer,
    params: &ModelParams,
) -> (Vec<Block>, Vec<SkippedBlock>) {
    let Some(first) = layer.segments().first() else {
        return (Vec::new(), Vec::new());
    };

    let mut markers: Vec<Option<(Polarity, f64)>> = vec![None; distances.len()];
    for segment in layer.segments() {
        if let Some(index) = nearest_index(distances, segment.start) {
            markers[index] = Some((segment.polarity, segment.magnetization));
        }
    }

    let scale = params.magnetization_scale();
    let mut state = (first.polarity, first.magnetization);
    let mut blocks = Vec::with_capacity(distances.len().saturating_sub(1));
    let mut skipped = Vec::new();

    for index in 0..distances.len().saturating_sub(1) {
        if let Some(marker) = markers[index] {
            state = marker;
        }
        let (x1, x2) = (distances[index], distances[index + 1]);
        if x2 == x1 {
            tracing::warn!(index, distance = x1, "repeated bathymetry distance, block skipped");
            skipped.push(SkippedBlock { index, distance: x1 });
            continue;
        }
        blocks.push(Block {
            index,
            top_left: DVec2::new(x1, depths[index]),
            top_right: DVec2::new(x2, depths[index + 1]),
            thickness: params.thickness_km,
            polarity: state.0,
            magnetization: state.1 * scale,
        });
    }

    (blocks, skipped)
}

/// Compute the anomaly at every observation distance.
///
/// # Arguments
/// * `bathymetry` - Seafloor profile along the track, usually edge-padded
/// * `layer` - Magnetized layer, already projected by `obliquity`
/// * `observations` - Observation distances in the projected frame
/// * `params` - Layer thickness, field angles and susceptibility
/// * `obliquity` - Projection applied to the bathymetry distances
///
/// # Returns
/// An `AnomalyModel` sorted by distance, listing any skipped blocks
pub fn compute_anomaly(
    bathymetry: &BathymetryProfile,
    layer: &MagnetizedLayer,
    observations: &[f64],
    params: &ModelParams,
    obliquity: Obliquity,
) -> AnomalyModel {
    let distances = obliquity.project_distances(bathymetry.distance());
    let (blocks, skipped_blocks) = build_blocks(&distances, bathymetry.depth(), layer, params);
    let geometry = params.field_geometry();

    let mut points: Vec<AnomalyPoint> = observations
        .par_iter()
        .map(|&distance| AnomalyPoint {
            distance,
            value: blocks.iter().map(|b| b.response(distance, &geometry)).sum(),
        })
        .collect();
    points.sort_by(|a, b| a.distance.total_cmp(&b.distance));

    tracing::debug!(
        blocks = blocks.len(),
        skipped = skipped_blocks.len(),
        observations = points.len(),
        "anomaly model computed"
    );
    AnomalyModel {
        points,
        skipped_blocks,
    }
}
