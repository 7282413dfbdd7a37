//! Lock state machine
//!
//! Tension changes drive the binding solver; `tick` runs the animation
//! side (core rotation, the pause after opening, the end fade) off a
//! host-supplied frame delta.

use serde::{Deserialize, Serialize};

use super::input::apply_movement;
use super::state::{Changes, CoreTarget, GameState, LockState, Outro};
use crate::consts::*;

/// One input event from the host (deterministic, replayable)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LockInput {
    /// Pointer/touch movement, already scaled by sensitivity
    Move { dx: f64, dy: f64 },
    /// Tension tool state
    Tension { released: bool },
    /// Cutaway view toggle
    Cutaway { shown: bool },
    /// Frame time elapsed (ms)
    Tick { dt_ms: f64 },
}

/// Route one input event to the matching operation
pub fn apply_input(state: &mut LockState, input: &LockInput) -> Changes {
    match *input {
        LockInput::Move { dx, dy } => apply_movement(state, dx, dy),
        LockInput::Tension { released } => apply_tension(state, released),
        LockInput::Cutaway { shown } => set_cutaway(state, shown),
        LockInput::Tick { dt_ms } => tick(state, dt_ms),
    }
}

/// Release or reapply tension.
///
/// Releasing frees every disk and lets the core ease back. Reapplying runs
/// the binding solver; an open result locks input and starts the ending.
///
/// # Panics
/// If the lock was never started.
pub fn apply_tension(state: &mut LockState, released: bool) -> Changes {
    state.assert_started("apply_tension");
    if state.game_state != GameState::Main {
        return Changes::NONE;
    }
    state.start_timer();

    if state.tension_released == released {
        return Changes::NONE;
    }
    state.tension_released = released;

    let mut changes = Changes {
        core: true,
        disks: true,
        ..Changes::NONE
    };

    if released {
        log::debug!("Input tension released");
        state.core.target = CoreTarget::Untensioned;
        state.release_bounds();
    } else {
        log::debug!("Input tension reapplied");
        let target = state.rebind();
        state.core.target = target;

        if target == CoreTarget::Open {
            state.end_time = Some(state.clock_ms);
            state.game_state = GameState::Ending;
            changes.phase = true;
            log::info!("Game won, seed={}", state.seed);
        }
    }

    changes
}

/// Show or hide the cutaway view. Showing it marks the session as cheated.
///
/// # Panics
/// If the lock was never started.
pub fn set_cutaway(state: &mut LockState, shown: bool) -> Changes {
    state.assert_started("set_cutaway");
    if state.game_state != GameState::Main || state.show_cutaway == shown {
        return Changes::NONE;
    }

    log::debug!("Input {} cutaway", if shown { "show" } else { "hide" });
    state.show_cutaway = shown;
    if shown {
        state.cheated = true;
    }

    Changes {
        cutaway: true,
        ..Changes::NONE
    }
}

/// Advance animations by `dt_ms` milliseconds.
///
/// Does nothing before the first session starts. Non-finite or negative
/// deltas count as zero.
pub fn tick(state: &mut LockState, dt_ms: f64) -> Changes {
    if state.game_state == GameState::Waiting {
        return Changes::NONE;
    }
    let dt_ms = crate::finite_or_zero(dt_ms).max(0.0);
    state.clock_ms += dt_ms;

    let mut changes = Changes::NONE;
    if state.game_state == GameState::Ended {
        return changes;
    }

    let before = state.core.current;
    if state.core.step_toward_target(CORE_ROTATE_RATE * dt_ms) {
        changes.core = true;
    }

    if state.game_state != GameState::Ending || !state.core.at_target() {
        return changes;
    }

    // Core fully open: pause, then fade out to the win screen. Only the
    // part of this tick left after the core arrived counts toward the pause.
    let rotating_ms = (state.core.current - before).abs() / CORE_ROTATE_RATE;
    let mut remaining = (dt_ms - rotating_ms).max(0.0);
    loop {
        match state.outro {
            Outro::None => {
                state.outro = Outro::Pause {
                    remaining_ms: OPEN_PAUSE_MS,
                };
            }
            Outro::Pause { remaining_ms } => {
                if remaining < remaining_ms {
                    state.outro = Outro::Pause {
                        remaining_ms: remaining_ms - remaining,
                    };
                    break;
                }
                remaining -= remaining_ms;
                state.outro = Outro::Fade;
            }
            Outro::Fade => {
                let before = state.end_fade;
                state.end_fade = (state.end_fade + FADE_RATE * remaining).min(FADE_MAX);
                changes.overlay |= state.end_fade != before;

                if state.end_fade >= FADE_MAX {
                    let summary = state.win_summary();
                    log::info!("{summary}");
                    state.win = Some(summary);
                    state.game_state = GameState::Ended;
                    changes.overlay = true;
                    changes.phase = true;
                }
                break;
            }
        }
    }

    changes
}
