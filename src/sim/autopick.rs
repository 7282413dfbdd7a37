//! Scripted solver for demo / idle mode
//!
//! Reads the gate layout straight off the disks (the cutaway view) and
//! produces the input sequence that sets every disk on its true gate. The
//! script turns the cutaway on first, so an autopiloted run is flagged as
//! cheated like any other run that peeked.

use super::state::LockState;
use super::tick::LockInput;
use crate::consts::*;

/// Frame time used between scripted steps (ms)
pub const SCRIPT_FRAME_MS: f64 = 16.0;
/// Time spent on each disk, so the run has a readable pick time (ms)
pub const SCRIPT_DISK_MS: f64 = 250.0;

/// Build the inputs that open a freshly started lock.
///
/// Assumes the tip and every disk are still at rest, as left by
/// [`LockState::new`].
pub fn solve_script(state: &LockState) -> Vec<LockInput> {
    let rest_y = GATE_ORIGINS[0];
    let mut inputs = vec![
        LockInput::Cutaway { shown: true },
        LockInput::Tension { released: true },
    ];
    let mut tip_x = state.pick_offset.x;
    let mut tip_y = state.pick_offset.y;

    for (i, disk) in state.disks.iter().enumerate() {
        let Some(slot) = disk.true_slot() else {
            log::warn!("Disk {i} has no true gate, autopilot cannot open this lock");
            return inputs;
        };

        if i > 0 {
            // Drop into the gap left of the disk, line the tip up with the
            // resting disk there, then step in
            let gap_x = DISK_ORIGINS[i] - DISK_SPACING / 2.0;
            inputs.push(LockInput::Move {
                dx: gap_x - tip_x,
                dy: 0.0,
            });
            if tip_y != rest_y {
                inputs.push(LockInput::Move {
                    dx: 0.0,
                    dy: rest_y - tip_y,
                });
            }
            inputs.push(LockInput::Move {
                dx: DISK_ORIGINS[i] - gap_x,
                dy: 0.0,
            });
            tip_x = DISK_ORIGINS[i];
            tip_y = rest_y;
        }

        // Pushing down leaves the disk one tip slop behind the tip
        let target = GATE_ORIGINS[slot];
        if target > rest_y {
            let push_to = (target + PICK_TIP_SLOP).min(PICK_CLAMP_Y.1);
            inputs.push(LockInput::Move {
                dx: 0.0,
                dy: push_to - tip_y,
            });
            tip_y = push_to;
        }

        inputs.push(LockInput::Tick {
            dt_ms: SCRIPT_DISK_MS,
        });
    }

    inputs.push(LockInput::Tension { released: false });

    let travel = CORE_ROTATION_UNTENSIONED - CORE_ROTATION_OPEN;
    let outro_ms = travel / CORE_ROTATE_RATE + OPEN_PAUSE_MS + FADE_MAX / FADE_RATE;
    let frames = (outro_ms / SCRIPT_FRAME_MS).ceil() as usize + 1;
    inputs.extend(std::iter::repeat_n(
        LockInput::Tick {
            dt_ms: SCRIPT_FRAME_MS,
        },
        frames,
    ));

    inputs
}
