//! Disklock - A disk-detainer lock picking simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bitting, binding, pick input, lock state)
//! - `settings`: Player preferences (movement sensitivity)
//! - `replay`: Recorded input sequences for reproducing a session
//! - `error`: Error type for the fallible outer layers

pub mod error;
pub mod replay;
pub mod settings;
pub mod sim;

pub use error::LockError;
pub use settings::Settings;

/// Lock geometry and tuning constants
pub mod consts {
    /// Number of disks in the pack
    pub const DISK_COUNT: usize = 10;
    /// Number of gate slots cut around each disk
    pub const GATE_SLOTS: usize = 6;

    /// Gate positions as y-offsets of the pick tip
    pub const GATE_ORIGINS: [f64; GATE_SLOTS] = [-160.0, -130.0, -100.0, -70.0, -40.0, -10.0];
    /// Disk positions as x-offsets of the pick tip
    pub const DISK_ORIGINS: [f64; DISK_COUNT] =
        [2.0, 22.0, 42.0, 62.0, 82.0, 102.0, 122.0, 142.0, 162.0, 182.0];
    /// Distance between neighbouring disk origins
    pub const DISK_SPACING: f64 = 20.0;
    /// How close the tip must be on the x-axis to be considered on a disk
    pub const DISK_WIDTH: f64 = 8.0;

    /// Range of motion of a completely unbound disk (outer, inner)
    pub const DISK_DEFAULT_BOUNDS: (f64, f64) = (-5.0, -165.0);

    /// Slop on the y-axis the pick tip has inside a disk before it starts turning it
    pub const PICK_TIP_SLOP: f64 = 8.0;
    /// Jiggle a binding disk sitting in a false gate has
    pub const GATE_FALSE_BINDING_SLOP: f64 = 8.0;
    /// Jiggle a non-binding disk sitting in any gate has
    pub const GATE_TRUE_BINDING_SLOP: f64 = 16.0;
    /// Fraction of the false-gate slop left once every disk is set
    pub const FALSE_SLOP_FLOOR: f64 = 0.5;

    /// Playable range of the pick tip: x in `[0, 183]`, y in `[-165, -5]`
    pub const PICK_CLAMP_X: (f64, f64) = (0.0, 183.0);
    pub const PICK_CLAMP_Y: (f64, f64) = (-165.0, -5.0);
    /// Pick tip rest position at the start of a session
    pub const PICK_DEFAULT_OFFSET: (f64, f64) = (0.0, -160.0);

    /// Core rotation with no tension applied
    pub const CORE_ROTATION_UNTENSIONED: f64 = 5.0;
    /// Core rotation with tension but no progress
    pub const CORE_ROTATION_DEFAULT: f64 = -2.0;
    /// Core rotation in a false set
    pub const CORE_ROTATION_FALSE_SET: f64 = -10.0;
    /// Core rotation of an open lock
    pub const CORE_ROTATION_OPEN: f64 = -75.0;

    /// Core rotation animation speed (units per millisecond)
    pub const CORE_ROTATE_RATE: f64 = 0.15;
    /// Dramatic pause between the core opening and the fade-out (ms)
    pub const OPEN_PAUSE_MS: f64 = 600.0;
    /// End fade speed (units per millisecond)
    pub const FADE_RATE: f64 = 0.8;
    /// End fade value at which the session ends
    pub const FADE_MAX: f64 = 200.0;
}

/// Clamp `x` into `[low, high]` without panicking when the range is reversed.
///
/// Mirrors `max(low, min(high, x))`, so `low` wins on an inverted range.
#[inline]
pub fn clamp_loose(low: f64, x: f64, high: f64) -> f64 {
    low.max(high.min(x))
}

/// Replace NaN and infinite input with zero
#[inline]
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}
