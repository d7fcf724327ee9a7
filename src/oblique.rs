//! Projection between an oblique survey track and the cross-ridge direction.

use crate::constants::MIN_OBLIQUITY_COSINE;
use crate::error::MagellanError;
use crate::magnetized_layer::{MagnetizedLayer, MagnetizedLayerSegment};
use crate::talwani::{AnomalyModel, AnomalyPoint};
use serde::Serialize;

/// Angle between the survey track and the ridge-perpendicular, radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Obliquity {
    radians: f64,
    cosine: f64,
}

impl Obliquity {
    pub const NONE: Obliquity = Obliquity {
        radians: 0.0,
        cosine: 1.0,
    };

    pub fn from_degrees(degrees: f64) -> Result<Self, MagellanError> {
        let radians = degrees.to_radians();
        let cosine = radians.cos();
        // |obliquity| must stay below 90° so projection keeps distances ascending
        if !cosine.is_finite() || cosine <= MIN_OBLIQUITY_COSINE {
            return Err(MagellanError::DegenerateObliquity(degrees));
        }
        Ok(Self { radians, cosine })
    }

    pub fn radians(&self) -> f64 {
        self.radians
    }

    pub fn cos(&self) -> f64 {
        self.cosine
    }

    pub fn project(&self, distance: f64) -> f64 {
        distance * self.cosine
    }

    pub fn project_distances(&self, distances: &[f64]) -> Vec<f64> {
        distances.iter().map(|&d| self.project(d)).collect()
    }

    pub fn project_layer(&self, layer: &MagnetizedLayer) -> MagnetizedLayer {
        MagnetizedLayer {
            segments: layer
                .segments()
                .iter()
                .map(|s| MagnetizedLayerSegment {
                    start: self.project(s.start),
                    end: self.project(s.end),
                    ..*s
                })
                .collect(),
        }
    }

    /// Map an anomaly value computed on the cross-ridge projection back onto
    /// the oblique track.
    pub fn inverse_project_value(&self, value: f64) -> f64 {
        value / self.cosine
    }

    /// Inverse-project every value and restore along-track distance keys.
    pub fn inverse_project_anomaly(&self, model: &AnomalyModel) -> AnomalyModel {
        AnomalyModel {
            points: model
                .points
                .iter()
                .map(|p| AnomalyPoint {
                    distance: p.distance / self.cosine,
                    value: self.inverse_project_value(p.value),
                })
                .collect(),
            skipped_blocks: model.skipped_blocks.clone(),
        }
    }
}
