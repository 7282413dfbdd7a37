//! Pick tip input resolution
//!
//! Turns raw pointer deltas into pick tip motion. The tip slides freely
//! in the gaps between disks, but can only enter a disk whose rotation
//! lines up with the tip, and pushes a disk along when moved inside it.

use glam::DVec2;

use super::state::{Changes, GameState, LockState};
use crate::consts::*;
use crate::{clamp_loose, finite_or_zero};

/// Where an x-offset falls relative to the disk columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TipColumn {
    /// Squarely inside disk `i`
    On(usize),
    /// In the gap between two neighbouring disks
    Between(usize, usize),
}

impl TipColumn {
    /// Disk on the left (or the disk itself)
    pub fn left(self) -> usize {
        match self {
            TipColumn::On(i) | TipColumn::Between(i, _) => i,
        }
    }

    /// Disk on the right (or the disk itself)
    pub fn right(self) -> usize {
        match self {
            TipColumn::On(i) | TipColumn::Between(_, i) => i,
        }
    }
}

/// Locate an x-offset among the disk columns.
///
/// The nearest origin is within half a spacing. Being within one unit of
/// the edge still counts as inside, so the test is `|d| - 1 < width`.
pub fn tip_column(x: f64) -> TipColumn {
    let x = clamp_loose(PICK_CLAMP_X.0, x, PICK_CLAMP_X.1);
    let nearest = DISK_ORIGINS
        .iter()
        .position(|origin| (origin - x).abs() <= DISK_SPACING / 2.0)
        .unwrap_or_else(|| {
            if x < DISK_ORIGINS[0] {
                0
            } else {
                DISK_COUNT - 1
            }
        });

    let distance = DISK_ORIGINS[nearest] - x;
    if distance.abs() - 1.0 < DISK_WIDTH {
        TipColumn::On(nearest)
    } else if distance < 0.0 {
        TipColumn::Between(nearest, (nearest + 1).min(DISK_COUNT - 1))
    } else {
        TipColumn::Between(nearest.saturating_sub(1), nearest)
    }
}

/// Move the pick tip by `(dx, dy)`.
///
/// Only acts in [`GameState::Main`]. Non-finite deltas count as zero and a
/// zero delta is ignored, though it still starts the session timer.
///
/// # Panics
/// If the lock was never started.
pub fn apply_movement(state: &mut LockState, dx: f64, dy: f64) -> Changes {
    state.assert_started("apply_movement");
    if state.game_state != GameState::Main {
        return Changes::NONE;
    }
    state.start_timer();

    let dx = finite_or_zero(dx);
    let dy = finite_or_zero(dy);
    if dx == 0.0 && dy == 0.0 {
        return Changes::NONE;
    }
    log::trace!("Input movement: [{dx}, {dy}]");

    let tip = state.pick_offset;
    let mut nox = clamp_loose(PICK_CLAMP_X.0, tip.x + dx, PICK_CLAMP_X.1);
    let mut noy = clamp_loose(PICK_CLAMP_Y.0, tip.y + dy, PICK_CLAMP_Y.1);
    let mut changes = Changes::NONE;

    if dx != 0.0 {
        nox = resolve_x(state, tip, nox);
        changes.pick |= nox != tip.x;
        state.pick_offset.x = nox;
    }

    if dy != 0.0 {
        if let TipColumn::On(i) = tip_column(nox) {
            let disk = &mut state.disks[i];

            // The tip may sit outside the disk's range and "fall" into it,
            // so only the bound in the direction of travel applies
            if dy > 0.0 {
                noy = noy.min(disk.position.max(disk.bounds.outer) + PICK_TIP_SLOP);
            } else {
                noy = noy.max(disk.position.min(disk.bounds.inner) - PICK_TIP_SLOP);
            }

            let pushed = clamp_loose(noy - PICK_TIP_SLOP, disk.position, noy + PICK_TIP_SLOP);
            if pushed != disk.position {
                log::trace!("Disk {i} pushed {} -> {pushed}", disk.position);
                disk.position = pushed;
                changes.disks = true;
            }
        }

        changes.pick |= noy != tip.y;
        state.pick_offset.y = noy;
    }

    changes
}

/// Stop the tip at the first disk in its path it cannot enter
fn resolve_x(state: &LockState, tip: DVec2, mut nox: f64) -> f64 {
    let start = tip_column(tip.x);
    let end = tip_column(nox);
    let blocks = |i: usize| (state.disks[i].position - tip.y).abs() > PICK_TIP_SLOP;

    if start.left() < end.left() {
        // Moving right: tip stops at the blocking disk's left edge
        for i in (start.left() + 1)..=end.left() {
            if blocks(i) {
                nox = nox.min(DISK_ORIGINS[i] - DISK_WIDTH - 1.0);
                break;
            }
        }
    } else if start.right() > end.right() {
        // Moving left: tip stops at the blocking disk's right edge
        for i in (end.right()..start.right()).rev() {
            if blocks(i) {
                nox = nox.max(DISK_ORIGINS[i] + DISK_WIDTH + 1.0);
                break;
            }
        }
    }

    nox
}
