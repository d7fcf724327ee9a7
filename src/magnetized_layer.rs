//! Compacts the half-profiles into run-length polarity/magnetization blocks
//! and stitches both halves at the ridge axis.

use crate::displacement::{HalfProfile, SegmentState};
use crate::error::MagellanError;
use crate::events::Polarity;
use crate::reconstruction::Stage;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MagnetizedLayerSegment {
    pub start: f64,
    pub end: f64,
    pub polarity: Polarity,
    pub magnetization: f64,
}

impl MagnetizedLayerSegment {
    pub fn width(&self) -> f64 {
        self.end - self.start
    }

    fn same_state(&self, other: &MagnetizedLayerSegment) -> bool {
        self.polarity == other.polarity && self.magnetization == other.magnetization
    }
}

/// Ascending, gap-free tiling of `[min_left, max_right]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MagnetizedLayer {
    pub segments: Vec<MagnetizedLayerSegment>,
}

impl MagnetizedLayer {
    pub fn segments(&self) -> &[MagnetizedLayerSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Segment covering `distance`, the right-hand one on a shared boundary.
    pub fn segment_at(&self, distance: f64) -> Option<&MagnetizedLayerSegment> {
        self.segments
            .iter()
            .rev()
            .find(|s| s.start <= distance && distance <= s.end)
    }

    pub fn extent(&self) -> Option<(f64, f64)> {
        Some((self.segments.first()?.start, self.segments.last()?.end))
    }
}

/// A closed run along one half, measured as unsigned distance from the axis.
#[derive(Debug, Clone, Copy)]
struct Run {
    near: f64,
    far: f64,
    state: SegmentState,
}

/// Walk one half from the axis outward, closing a run at every change of
/// (polarity, magnetization) and truncating at `bound` (unsigned).
fn compact_half(profile: &HalfProfile, bound: f64) -> Result<Vec<Run>, MagellanError> {
    let first = profile
        .iter()
        .next()
        .ok_or(MagellanError::EmptyHalfProfile {
            stage: Stage::MagnetizedLayer,
            side: profile.side(),
        })?;

    let mut runs = Vec::new();
    let mut open = Run {
        near: 0.0,
        far: 0.0,
        state: first.state,
    };
    let mut distance = 0.0;

    for segment in profile.iter() {
        let size = segment.delta.abs();
        if size == 0.0 {
            continue;
        }

        if !segment.state.same_magnetization(&open.state) {
            if distance > open.near {
                runs.push(Run { far: distance, ..open });
            }
            open = Run {
                near: distance,
                far: distance,
                state: segment.state,
            };
        }

        distance += size;
        if distance >= bound {
            runs.push(Run { far: bound, ..open });
            return Ok(runs);
        }
    }

    tracing::warn!(
        side = %profile.side(),
        reached_km = distance,
        bound_km = bound,
        "half-profile ends before the track bound, extending its outermost block"
    );
    runs.push(Run { far: bound, ..open });
    Ok(runs)
}

/// Build the magnetized layer between `min_left` (<= 0) and `max_right` (>= 0).
pub fn build_layer(
    left: &HalfProfile,
    right: &HalfProfile,
    min_left: f64,
    max_right: f64,
) -> Result<MagnetizedLayer, MagellanError> {
    let left_runs = compact_half(left, min_left.min(0.0).abs())?;
    let right_runs = compact_half(right, max_right.max(0.0))?;

    // `0.0 - x` keeps the axis at +0.0 rather than -0.0
    let mut stitched: Vec<MagnetizedLayerSegment> = left_runs
        .iter()
        .rev()
        .map(|run| MagnetizedLayerSegment {
            start: 0.0 - run.far,
            end: 0.0 - run.near,
            polarity: run.state.polarity,
            magnetization: run.state.magnetization,
        })
        .collect();
    stitched.extend(right_runs.iter().map(|run| MagnetizedLayerSegment {
        start: run.near,
        end: run.far,
        polarity: run.state.polarity,
        magnetization: run.state.magnetization,
    }));

    let layer = MagnetizedLayer {
        segments: coalesce(stitched),
    };
    tracing::debug!(segments = layer.len(), min_left, max_right, "magnetized layer built");
    Ok(layer)
}

/// Drop zero-width pieces and merge neighbours that share state, so the
/// axis blocks join when both halves agree there.
fn coalesce(segments: Vec<MagnetizedLayerSegment>) -> Vec<MagnetizedLayerSegment> {
    let fallback = segments.first().copied();
    let mut merged: Vec<MagnetizedLayerSegment> = Vec::with_capacity(segments.len());

    for segment in segments.into_iter().filter(|s| s.width() > 0.0) {
        match merged.last_mut() {
            Some(last) if last.same_state(&segment) => last.end = segment.end,
            _ => merged.push(segment),
        }
    }

    // Both bounds at the axis: keep a single zero-width block.
    if merged.is_empty() {
        merged.extend(fallback);
    }
    merged
}
