use crate::bathymetry::Track;
use crate::config::ModelParams;
use crate::displacement::{integrate, HalfProfile};
use crate::error::MagellanError;
use crate::events::EventSources;
use crate::faults::{extract_faults_and_rifts, FaultOrRiftEvent};
use crate::magnetized_layer::{build_layer, MagnetizedLayer};
use crate::talwani::{compute_anomaly, AnomalyModel};
use crate::timeline::Timeline;
use serde::Serialize;
use std::fmt;
use std::time::{Duration, Instant};

/// Steps of a track reconstruction, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Stage {
    Timeline,
    Displacement,
    JumpRepositioning,
    MagnetizedLayer,
    ObliqueProjection,
    FaultsAndRifts,
    ForwardModel,
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Timeline => "Timeline",
            Stage::Displacement => "Displacement",
            Stage::JumpRepositioning => "JumpRepositioning",
            Stage::MagnetizedLayer => "MagnetizedLayer",
            Stage::ObliqueProjection => "ObliqueProjection",
            Stage::FaultsAndRifts => "FaultsAndRifts",
            Stage::ForwardModel => "ForwardModel",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone)]
pub struct StageTiming {
    pub stage: Stage,
    pub elapsed: Duration,
    pub call_count: u32,
}

impl StageTiming {
    pub fn new(stage: Stage) -> Self {
        Self {
            stage,
            elapsed: Duration::ZERO,
            call_count: 0,
        }
    }

    pub fn avg_time(&self) -> Duration {
        if self.call_count > 0 {
            self.elapsed / self.call_count
        } else {
            Duration::ZERO
        }
    }
}

/// Everything computed for one track.
#[derive(Debug, Clone, Serialize)]
pub struct TrackModel {
    pub left: HalfProfile,
    pub right: HalfProfile,
    /// Layer in along-track distance
    pub layer: MagnetizedLayer,
    /// Layer projected onto the ridge-perpendicular
    pub projected_layer: MagnetizedLayer,
    pub faults_and_rifts: Vec<FaultOrRiftEvent>,
    /// Predicted anomaly keyed by along-track distance
    pub anomaly: AnomalyModel,
    pub rms_misfit: Option<f64>,
}

impl TrackModel {
    pub fn to_json(&self) -> Result<String, MagellanError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Runs the reconstruction stages for tracks sharing one set of parameters,
/// accumulating per-stage timings across runs.
pub struct Reconstruction {
    pub params: ModelParams,
    /// Pad the bathymetry by the standard edge margin before the forward model
    pub pad_bathymetry: bool,
    pub timings: Vec<StageTiming>,
    pub tracks_run: u32,
}

impl Reconstruction {
    pub fn new(params: ModelParams) -> Reconstruction {
        let timings = [
            Stage::Timeline,
            Stage::Displacement,
            Stage::MagnetizedLayer,
            Stage::ObliqueProjection,
            Stage::FaultsAndRifts,
            Stage::ForwardModel,
        ]
        .into_iter()
        .map(StageTiming::new)
        .collect();

        Reconstruction {
            params,
            pad_bathymetry: true,
            timings,
            tracks_run: 0,
        }
    }

    fn timed<T>(&mut self, stage: Stage, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let result = f();
        let elapsed = start.elapsed();
        if let Some(timing) = self.timings.iter_mut().find(|t| t.stage == stage) {
            timing.elapsed += elapsed;
            timing.call_count += 1;
        }
        result
    }

    /// Reconstruct one track.
    ///
    /// # Arguments
    /// * `sources` - Per-source change events keyed by negated age
    /// * `track` - Bathymetry and observed anomaly along the survey track
    ///
    /// # Returns
    /// The half-profiles, magnetized layer, faults/rifts and predicted anomaly,
    /// or the first stage error
    pub fn run(&mut self, sources: &EventSources, track: &Track) -> Result<TrackModel, MagellanError> {
        let params = self.params;
        let obliquity = params.obliquity()?;

        let timeline = self.timed(Stage::Timeline, || Timeline::build(sources));
        let (left, right) = self.timed(Stage::Displacement, || {
            integrate(&timeline, params.default_magnetization)
        })?;

        let bathymetry = &track.bathymetry;
        let min_left = bathymetry.min_distance().min(0.0);
        let max_right = bathymetry.max_distance().max(0.0);

        let layer = self.timed(Stage::MagnetizedLayer, || {
            build_layer(&left, &right, min_left, max_right)
        })?;
        let (projected_layer, observations) = self.timed(Stage::ObliqueProjection, || {
            (
                obliquity.project_layer(&layer),
                obliquity.project_distances(bathymetry.distance()),
            )
        });
        let faults_and_rifts = self.timed(Stage::FaultsAndRifts, || {
            extract_faults_and_rifts(&left, &right, min_left, max_right)
        });

        let pad = self.pad_bathymetry;
        let anomaly = self.timed(Stage::ForwardModel, || {
            let model_bathymetry = if pad {
                bathymetry.edge_padded()
            } else {
                bathymetry.clone()
            };
            let projected = compute_anomaly(
                &model_bathymetry,
                &projected_layer,
                &observations,
                &params,
                obliquity,
            );
            obliquity.inverse_project_anomaly(&projected)
        });
        let rms_misfit = anomaly.rms_misfit(&track.observed_anomaly);

        self.tracks_run += 1;
        tracing::info!(
            timeline_entries = timeline.len(),
            layer_segments = layer.len(),
            faults_and_rifts = faults_and_rifts.len(),
            observations = anomaly.len(),
            skipped_blocks = anomaly.skipped_blocks.len(),
            rms_misfit = ?rms_misfit,
            "track reconstructed"
        );

        Ok(TrackModel {
            left,
            right,
            layer,
            projected_layer,
            faults_and_rifts,
            anomaly,
            rms_misfit,
        })
    }

    pub fn total_time(&self) -> Duration {
        self.timings.iter().map(|t| t.elapsed).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Polarity;
    use approx::assert_abs_diff_eq;

    fn sources() -> EventSources {
        let mut sources = EventSources::new();
        sources
            .add_spreading_rate(6.0, 10.0)
            .set_timescale(&[1.0, 2.5, 4.0, 6.0]);
        sources
    }

    fn flat_track(half_width: i32) -> Track {
        let distance: Vec<f64> = (-half_width..=half_width).map(f64::from).collect();
        let n = distance.len();
        Track::new(distance, vec![-4.0; n], vec![0.0; n]).unwrap()
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(Stage::ForwardModel.to_string(), "ForwardModel");
        assert_eq!(Stage::JumpRepositioning.name(), "JumpRepositioning");
    }

    #[test]
    fn test_run_produces_full_model() {
        let mut reconstruction = Reconstruction::new(ModelParams::default());
        let model = reconstruction.run(&sources(), &flat_track(40)).unwrap();

        assert_eq!(model.layer.extent(), Some((-40.0, 40.0)));
        assert_eq!(model.layer.segment_at(0.0).unwrap().polarity, Polarity::Normal);
        assert_eq!(model.anomaly.len(), 81);
        assert!(model.anomaly.values().iter().all(|v| v.is_finite()));
        assert!(model.faults_and_rifts.is_empty());
        assert!(model.rms_misfit.is_some());

        assert_eq!(reconstruction.tracks_run, 1);
        assert!(reconstruction.timings.iter().all(|t| t.call_count == 1));
    }

    #[test]
    fn test_oblique_track_keeps_along_track_distances() {
        let params = ModelParams {
            obliquity_deg: 30.0,
            ..ModelParams::default()
        };
        let mut reconstruction = Reconstruction::new(params);
        let track = flat_track(20);
        let model = reconstruction.run(&sources(), &track).unwrap();

        for (point, distance) in model.anomaly.points.iter().zip(track.distance()) {
            assert_abs_diff_eq!(point.distance, *distance, epsilon = 1e-9);
        }
        let cos = 30f64.to_radians().cos();
        assert_abs_diff_eq!(model.projected_layer.extent().unwrap().1, 20.0 * cos, epsilon = 1e-9);
    }

    #[test]
    fn test_short_timeline_names_stage() {
        let mut reconstruction = Reconstruction::new(ModelParams::default());
        let error = reconstruction
            .run(&EventSources::new(), &flat_track(5))
            .unwrap_err();
        assert_eq!(error.stage(), Some(Stage::Displacement));
    }

    #[test]
    fn test_track_model_serializes() {
        let mut reconstruction = Reconstruction::new(ModelParams::default());
        let model = reconstruction.run(&sources(), &flat_track(5)).unwrap();
        let json = model.to_json().unwrap();
        assert!(json.contains("\"faults_and_rifts\""));
        assert!(json.contains("\"polarity\""));
    }
}
