//! Ridge-jump repositioning: splice the axis-adjacent material of one
//! half-profile onto the other.

use crate::displacement::{DisplacementSegment, FaultFlags, HalfProfile};
use crate::error::MagellanError;
use crate::reconstruction::Stage;

/// Move `|jump|` km of crust from the axis end of `source` to the axis end
/// of `destination`, flipping its sign.
///
/// Whole segments are moved while they are shorter than the remaining jump;
/// the segment holding the jump boundary is split, the moved part going to
/// `destination` and the remainder staying on `source`. A zero remainder is
/// dropped. Each moved piece takes the fault flags of the piece moved before
/// it; the first one becomes a failed rift.
///
/// Returns the distance moved. Fails without touching either profile if the
/// source is empty or holds less material than the jump needs.
pub fn reposition(
    source: &mut HalfProfile,
    destination: &mut HalfProfile,
    jump: f64,
    time: f64,
) -> Result<f64, MagellanError> {
    if source.is_empty() {
        return Err(MagellanError::EmptyHalfProfile {
            stage: Stage::JumpRepositioning,
            side: source.side(),
        });
    }

    let requested = jump.abs();
    let available = source.total_magnitude();
    if requested > available {
        return Err(MagellanError::JumpOutOfRange {
            stage: Stage::JumpRepositioning,
            time,
            jump,
            available,
            side: source.side(),
        });
    }

    if requested == 0.0 {
        return Ok(0.0);
    }

    let mut remaining = requested;
    let mut carried = FaultFlags {
        pseudo_fault: false,
        failed_rift: true,
    };

    while let Some(mut segment) = source.pop_axis() {
        let size = segment.delta.abs();

        // The last segment absorbs any rounding left in `remaining`.
        if remaining > size && !source.is_empty() {
            std::mem::swap(&mut carried, &mut segment.state.flags);
            segment.delta = -segment.delta;
            destination.push_axis(segment);
            remaining -= size;
            continue;
        }

        let moved = remaining.min(size);
        let sign = if segment.delta < 0.0 { -1.0 } else { 1.0 };

        let mut boundary_state = segment.state;
        boundary_state.flags = carried;
        destination.push_axis(DisplacementSegment {
            delta: -sign * moved,
            state: boundary_state,
        });

        let leftover = size - moved;
        if leftover > 0.0 {
            segment.delta = sign * leftover;
            source.push_axis(segment);
        }
        break;
    }

    tracing::debug!(
        jump,
        time,
        from = %source.side(),
        to = %destination.side(),
        "ridge jump repositioned"
    );

    Ok(requested)
}
