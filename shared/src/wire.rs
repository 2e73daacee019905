//! Decorative wire geometry.
//!
//! The level draws a line from a fastener above each bridge to a point that
//! tracks the bridge's swing, to look like a wire hauling the bridge up.
//! Everything here is a pure function of poses already computed by the
//! simulation: a failure or degenerate input can only produce a silly line,
//! never touch physics state.

use nalgebra::{Point2, Vector2};

use crate::constants::{FASTENER_RISE_M, WIRE_REACH};
use crate::level_data::RotationDirection;

/// Decorative wire anchor point above a bridge. Never mutated after
/// creation.
#[derive(Clone, Copy, Debug)]
pub struct Fastener {
    /// World-space anchor the wire hangs from.
    pub anchor: Point2<f32>,
    /// Horizontal mirroring factor for the fastener art (+1 or -1).
    pub mirror: f32,
}

impl Fastener {
    /// Place the fastener above the art body, on the hinge side, mirrored to
    /// face the bridge.
    pub fn for_bridge(
        direction: RotationDirection,
        art_x: f32,
        art_y: f32,
        art_width: f32,
    ) -> Self {
        let side = direction.gear_side();
        Self {
            anchor: Point2::new(art_x + side * art_width / 2.0, art_y + FASTENER_RISE_M),
            mirror: side,
        }
    }
}

/// One wire to draw this frame.
#[derive(Clone, Copy, Debug)]
pub struct WireSegment {
    pub start: Point2<f32>,
    pub end: Point2<f32>,
}

/// Compute the moving end of a bridge's wire.
///
/// A unit vector is rotated by the current gear angle, scaled by the floor
/// body's width, and mirrored horizontally by the rotation direction. A
/// non-finite angle degenerates to the gear center instead of propagating.
pub fn wire_endpoint(
    direction: RotationDirection,
    gear_angle: f32,
    gear_center: Point2<f32>,
    floor_width: f32,
) -> Point2<f32> {
    if !gear_angle.is_finite() {
        return gear_center;
    }

    let swing = Vector2::new(gear_angle.cos(), gear_angle.sin()) * floor_width * WIRE_REACH;
    match direction {
        RotationDirection::Clockwise => gear_center - swing,
        RotationDirection::CounterClockwise => gear_center + swing,
    }
}

/// Assemble the full wire segment for one bridge.
pub fn wire_segment(
    fastener: &Fastener,
    direction: RotationDirection,
    gear_angle: f32,
    gear_center: Point2<f32>,
    floor_width: f32,
) -> WireSegment {
    WireSegment {
        start: fastener.anchor,
        end: wire_endpoint(direction, gear_angle, gear_center, floor_width),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn fastener_sits_above_the_hinge_side() {
        let cw = Fastener::for_bridge(RotationDirection::Clockwise, 10.0, 4.0, 8.0);
        assert!((cw.anchor.x - 14.0).abs() < 1.0e-6);
        assert!((cw.anchor.y - (4.0 + FASTENER_RISE_M)).abs() < 1.0e-6);
        assert_eq!(cw.mirror, 1.0);

        let ccw = Fastener::for_bridge(RotationDirection::CounterClockwise, 10.0, 4.0, 8.0);
        assert!((ccw.anchor.x - 6.0).abs() < 1.0e-6);
        assert_eq!(ccw.mirror, -1.0);
    }

    #[test]
    fn endpoint_mirrors_horizontally_by_direction() {
        let center = Point2::new(0.0, 0.0);
        let cw = wire_endpoint(RotationDirection::Clockwise, 0.0, center, 4.0);
        let ccw = wire_endpoint(RotationDirection::CounterClockwise, 0.0, center, 4.0);
        assert!((cw.x + ccw.x).abs() < 1.0e-6);
        assert_eq!(cw.y, ccw.y);
    }

    #[test]
    fn endpoint_tracks_the_gear_angle() {
        let center = Point2::new(0.0, 0.0);
        let flat = wire_endpoint(RotationDirection::CounterClockwise, 0.0, center, 4.0);
        let raised = wire_endpoint(RotationDirection::CounterClockwise, FRAC_PI_2, center, 4.0);

        // At angle 0 the offset is horizontal; at PI/2 it is vertical.
        assert!((flat.x - 4.0 * WIRE_REACH).abs() < 1.0e-5);
        assert!(flat.y.abs() < 1.0e-5);
        assert!(raised.x.abs() < 1.0e-5);
        assert!((raised.y - 4.0 * WIRE_REACH).abs() < 1.0e-5);
    }

    #[test]
    fn non_finite_angle_degenerates_to_the_gear_center() {
        let center = Point2::new(3.0, 2.0);
        let end = wire_endpoint(RotationDirection::Clockwise, f32::NAN, center, 4.0);
        assert_eq!(end, center);
    }
}
