//! Integrates spreading rate over the change timeline into two half-profiles
//! of incremental distance, one per side of the ridge axis.

use crate::error::MagellanError;
use crate::events::{ChangeEvent, Polarity};
use crate::jump::reposition;
use crate::reconstruction::Stage;
use crate::timeline::Timeline;
use serde::Serialize;
use std::collections::VecDeque;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Geological markers carried by a segment. Swapped as a pair during jumps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FaultFlags {
    pub pseudo_fault: bool,
    pub failed_rift: bool,
}

impl FaultFlags {
    pub fn any(&self) -> bool {
        self.pseudo_fault || self.failed_rift
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SegmentState {
    pub polarity: Polarity,
    pub magnetization: f64,
    pub flags: FaultFlags,
}

impl SegmentState {
    /// True when both states would paint the same magnetized block.
    pub fn same_magnetization(&self, other: &SegmentState) -> bool {
        self.polarity == other.polarity && self.magnetization == other.magnetization
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DisplacementSegment {
    /// Signed distance increment, km. Positive on the right half, negative on the left.
    pub delta: f64,
    pub state: SegmentState,
}

/// One side of the ridge. The front of the deque is the axis end.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HalfProfile {
    side: Side,
    segments: VecDeque<DisplacementSegment>,
}

impl HalfProfile {
    pub fn new(side: Side) -> Self {
        Self {
            side,
            segments: VecDeque::new(),
        }
    }

    /// Build from segments listed axis outward.
    pub fn from_segments(side: Side, segments: Vec<DisplacementSegment>) -> Self {
        Self {
            side,
            segments: segments.into(),
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn push_axis(&mut self, segment: DisplacementSegment) {
        self.segments.push_front(segment);
    }

    pub fn pop_axis(&mut self) -> Option<DisplacementSegment> {
        self.segments.pop_front()
    }

    /// Segments from the axis outward.
    pub fn iter(&self) -> impl Iterator<Item = &DisplacementSegment> {
        self.segments.iter()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Signed distance from the axis to the outer end.
    pub fn total_distance(&self) -> f64 {
        self.segments.iter().map(|s| s.delta).sum()
    }

    /// Sum of |delta|, the material available to a jump.
    pub fn total_magnitude(&self) -> f64 {
        self.segments.iter().map(|s| s.delta.abs()).sum()
    }
}

/// Running state while walking the timeline.
struct SpreadingState {
    asymmetry: f64,
    spreading_rate: f64,
    polarity: Polarity,
    magnetization: f64,
    pseudo_fault: bool,
}

impl SpreadingState {
    /// Seed from the oldest event. Only the spreading rate may come from a
    /// later event; unset polarity and magnetization take their defaults.
    fn seed(events: &[ChangeEvent], default_magnetization: f64) -> Self {
        let first = events[0].fields;

        Self {
            asymmetry: first.asymmetry.unwrap_or(0.0),
            spreading_rate: events
                .iter()
                .find_map(|e| e.fields.spreading_rate)
                .unwrap_or(0.0),
            polarity: first.polarity.unwrap_or(Polarity::Normal),
            magnetization: first.magnetization.unwrap_or(default_magnetization),
            pseudo_fault: false,
        }
    }

    fn right_rate(&self) -> f64 {
        self.spreading_rate * (1.0 + self.asymmetry)
    }

    fn left_rate(&self) -> f64 {
        self.spreading_rate * (1.0 - self.asymmetry)
    }

    fn segment_state(&self) -> SegmentState {
        SegmentState {
            polarity: self.polarity,
            magnetization: self.magnetization,
            flags: FaultFlags {
                pseudo_fault: self.pseudo_fault,
                failed_rift: false,
            },
        }
    }

    fn apply(&mut self, event: &ChangeEvent) {
        let fields = &event.fields;
        if let Some(polarity) = fields.polarity {
            self.polarity = polarity;
        }
        if let Some(magnetization) = fields.magnetization {
            self.magnetization = magnetization;
        }
        if let Some(rate) = fields.spreading_rate {
            self.spreading_rate = rate;
        }
        if let Some(asymmetry) = fields.asymmetry {
            self.asymmetry = asymmetry;
        }
    }
}

/// Walk the timeline oldest to newest and build the (left, right)
/// half-profiles, each ordered from the axis outward.
///
/// A positive jump moves material from the right half into the left half;
/// a negative jump moves it from the left half into the right.
pub fn integrate(
    timeline: &Timeline,
    default_magnetization: f64,
) -> Result<(HalfProfile, HalfProfile), MagellanError> {
    let events = timeline.events();
    if events.len() < 2 {
        return Err(MagellanError::TimelineTooShort {
            stage: Stage::Displacement,
            found: events.len(),
        });
    }

    // Nothing has been spread yet at the oldest entry.
    if let Some(jump) = events[0].fields.jump.filter(|&j| j != 0.0) {
        return Err(MagellanError::EmptyHalfProfile {
            stage: Stage::JumpRepositioning,
            side: if jump > 0.0 { Side::Right } else { Side::Left },
        });
    }

    let mut left = HalfProfile::new(Side::Left);
    let mut right = HalfProfile::new(Side::Right);
    let mut state = SpreadingState::seed(events, default_magnetization);
    let mut prev_time = events[0].time;

    for event in &events[1..] {
        let delta_t = event.time - prev_time;
        let segment_state = state.segment_state();

        right.push_axis(DisplacementSegment {
            delta: delta_t * state.right_rate(),
            state: segment_state,
        });
        left.push_axis(DisplacementSegment {
            delta: -delta_t * state.left_rate(),
            state: segment_state,
        });

        state.pseudo_fault = false;
        state.apply(event);

        if let Some(jump) = event.fields.jump {
            if jump > 0.0 {
                reposition(&mut right, &mut left, jump, event.time)?;
            } else if jump < 0.0 {
                reposition(&mut left, &mut right, jump, event.time)?;
            }
            state.pseudo_fault = true;
        }

        prev_time = event.time;
    }

    tracing::debug!(
        left_segments = left.len(),
        right_segments = right.len(),
        left_km = left.total_distance(),
        right_km = right.total_distance(),
        "half-profiles integrated"
    );

    Ok((left, right))
}
