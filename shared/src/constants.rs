use std::f32::consts::FRAC_PI_2;

/// Fixed simulation/render tick rate (Hz).
///
/// Everything time-based in this crate counts ticks, not wall-clock time,
/// so the whole mechanism stays deterministic and testable offline.
pub const TICK_RATE_HZ: u32 = 60;

/// Number of ticks a rotation runs before the scheduled stop fires.
///
/// 66 ticks at 60 Hz is ~1.1 s. The stop is open-loop: the bridge spins for
/// this long and is then frozen wherever it ended up, with the bounds clamp
/// as the only correction (overshoot only; undershoot is accepted).
pub const ROTATION_DURATION_TICKS: u64 = 66;

/// Magnitude of the gear's commanded angular velocity (rad/s).
///
/// PI/2 rad/s sweeps a quarter turn in 1.0 s, slightly inside the rotation
/// window, so a full-range bridge tends to reach its bound a few ticks before
/// the deadline and gets stopped by the clamp rather than the timer.
pub const GEAR_ANGULAR_SPEED: f32 = FRAC_PI_2;

/// Horizontal gear offset from the art body, as a multiple of the art width.
///
/// 1.5 widths places the gear pivot fully outside the art footprint, on the
/// side selected by the rotation direction, which is what makes the bridge
/// appear to swing on a far-side hinge.
pub const GEAR_OFFSET_FACTOR: f32 = 1.5;

/// Vertical drop from the art body's center down to the walkable floor
/// body's center (meters). Keeps player collision at the walkable surface
/// regardless of art asset padding.
pub const FLOOR_DROP_M: f32 = 0.25;

/// Thickness of the walkable floor body (meters).
pub const FLOOR_THICKNESS_M: f32 = 0.5;

/// Fallback art-body extents (meters) for records that do not override them.
pub const DEFAULT_ART_WIDTH_M: f32 = 8.0;
pub const DEFAULT_ART_HEIGHT_M: f32 = 1.0;

/// Height of the decorative wire fastener above the art body (meters).
pub const FASTENER_RISE_M: f32 = 6.0;

/// Scale applied to the rotated floor-width vector when computing the wire
/// endpoint. Purely cosmetic.
pub const WIRE_REACH: f32 = 2.0;

/// Gravity magnitude in meters per second squared (positive value).
/// Bridge bodies run at gravity scale zero and never feel this; the player does.
pub const GRAVITY_MPS2: f32 = 9.81;

/// Collider density for the gear body.
///
/// The gear carries almost all of the assembly's rotational inertia about the
/// pivot, which keeps the open-loop spin close to the commanded rate once the
/// joint solver distributes momentum to the art and floor bodies.
pub const GEAR_DENSITY: f32 = 25.0;

/// Collider density for the art and floor bodies.
pub const PLATE_DENSITY: f32 = 0.5;
