//! Next/previous navigation over the gallery sequence.
//!
//! Wraps at both ends and is a no-op without an active selection. The open
//! overlay exposes two edge hotspots (a wider one on the right, matching the
//! original affordances) and the left/right arrow keys are bound in the
//! application subscription.

use iced::Rectangle;

/// Fraction of the overlay width used by the "next" hotspot.
const NEXT_FRACTION: f32 = 0.25;
/// Fraction of the overlay width used by the "prev" hotspot.
const PREV_FRACTION: f32 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Prev,
}

/// The thumbnail a navigation request should pick up, or `None` when there
/// is no active selection to move from.
pub fn target(active: Option<usize>, count: usize, direction: Direction) -> Option<usize> {
    let active = active?;
    if count == 0 {
        return None;
    }
    let target = match direction {
        Direction::Next => {
            if active + 1 >= count {
                0
            } else {
                active + 1
            }
        }
        Direction::Prev => {
            if active == 0 {
                count - 1
            } else {
                active - 1
            }
        }
    };
    Some(target)
}

/// Hotspot along the right edge of the open overlay.
pub fn next_hotspot(overlay: Rectangle) -> Rectangle {
    let width = overlay.width * NEXT_FRACTION;
    Rectangle {
        x: overlay.x + overlay.width - width,
        y: overlay.y,
        width,
        height: overlay.height,
    }
}

/// Hotspot along the left edge of the open overlay.
pub fn prev_hotspot(overlay: Rectangle) -> Rectangle {
    Rectangle {
        x: overlay.x,
        y: overlay.y,
        width: overlay.width * PREV_FRACTION,
        height: overlay.height,
    }
}
