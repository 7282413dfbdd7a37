//! Deterministic lock simulation
//!
//! All picking logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Time only from `tick` deltas
//! - No rendering or platform dependencies

pub mod autopick;
pub mod binding;
pub mod bitting;
pub mod input;
pub mod rng;
pub mod state;
pub mod tick;

pub use autopick::solve_script;
pub use binding::{BindOutcome, false_gate_slop, recalculate_binds};
pub use bitting::{BindingOrder, Bitting, generate_bitting, make_disk, make_pack, shuffle};
pub use input::{TipColumn, apply_movement, tip_column};
pub use rng::{Seed, XorShift32, random_seed};
pub use state::{
    Changes, CoreRotation, CoreTarget, Disk, DiskBounds, GameState, GateKind, LockState, Outro,
    WinSummary, init_game,
};
pub use tick::{LockInput, apply_input, apply_tension, set_cutaway, tick};
