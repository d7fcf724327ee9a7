//! Pseudo-faults and failed rifts left behind by ridge jumps.

use crate::displacement::HalfProfile;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FaultOrRiftEvent {
    pub distance: f64,
    pub pseudo_fault: bool,
    pub failed_rift: bool,
}

/// Scan both halves from the axis outward and report every flagged segment
/// whose outer edge lies inside `[min_left, max_right]`, sorted by distance.
pub fn extract_faults_and_rifts(
    left: &HalfProfile,
    right: &HalfProfile,
    min_left: f64,
    max_right: f64,
) -> Vec<FaultOrRiftEvent> {
    let in_bounds = |d: f64| d >= min_left && d <= max_right;
    let mut events = Vec::new();

    for profile in [left, right] {
        let mut distance = 0.0;
        for segment in profile.iter() {
            distance += segment.delta;
            if !in_bounds(distance) {
                break;
            }
            if segment.state.flags.any() {
                events.push(FaultOrRiftEvent {
                    distance,
                    pseudo_fault: segment.state.flags.pseudo_fault,
                    failed_rift: segment.state.flags.failed_rift,
                });
            }
        }
    }

    events.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    tracing::debug!(count = events.len(), "faults and rifts extracted");
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::displacement::{integrate, DisplacementSegment, FaultFlags, SegmentState, Side};
    use crate::events::{EventSources, Polarity};
    use crate::timeline::Timeline;
    use approx::assert_abs_diff_eq;

    fn segment(delta: f64, pseudo_fault: bool, failed_rift: bool) -> DisplacementSegment {
        DisplacementSegment {
            delta,
            state: SegmentState {
                polarity: Polarity::Normal,
                magnetization: 10.0,
                flags: FaultFlags {
                    pseudo_fault,
                    failed_rift,
                },
            },
        }
    }

    #[test]
    fn test_flags_reported_at_outer_edge_within_bounds() {
        let right = HalfProfile::from_segments(
            Side::Right,
            vec![
                segment(2.0, false, false),
                segment(3.0, true, false),
                segment(4.0, false, true),
            ],
        );
        let left = HalfProfile::from_segments(
            Side::Left,
            vec![segment(-1.0, false, true), segment(-6.0, true, false)],
        );

        let events = extract_faults_and_rifts(&left, &right, -5.0, 20.0);
        let view: Vec<(f64, bool, bool)> = events
            .iter()
            .map(|e| (e.distance, e.pseudo_fault, e.failed_rift))
            .collect();

        // -7 lies beyond the left bound and stops the scan.
        assert_eq!(
            view,
            vec![(-1.0, false, true), (5.0, true, false), (9.0, false, true)]
        );
    }

    #[test]
    fn test_jump_leaves_fault_and_rift_at_boundary() {
        let mut sources = EventSources::new();
        sources
            .add_spreading_rate(4.0, 10.0)
            .add_polarity(4.0, Polarity::Normal)
            .add_jump(2.0, 5.0);
        let (left, right) = integrate(&Timeline::build(&sources), 10.0).unwrap();

        let events = extract_faults_and_rifts(&left, &right, -100.0, 100.0);
        assert!(events.iter().any(|e| e.failed_rift));
        assert!(events.iter().any(|e| e.pseudo_fault));
        // The pseudo-fault on the right half sits at the end of the 20 km
        // grown since the jump.
        let right_fault = events.iter().find(|e| e.pseudo_fault && e.distance > 0.0).unwrap();
        assert_abs_diff_eq!(right_fault.distance, 20.0, epsilon = 1e-9);
    }
}
