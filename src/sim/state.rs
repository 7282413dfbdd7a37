//! Lock state and core simulation types
//!
//! Everything one picking session owns lives in [`LockState`]. Starting a
//! new session replaces it wholesale; nothing carries over.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::binding::{BindOutcome, recalculate_binds};
use super::bitting::{Bitting, BindingOrder, generate_bitting, make_pack};
use super::rng::{Seed, XorShift32};
use crate::consts::*;

/// What is cut into a disk at one gate slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GateKind {
    #[default]
    None,
    /// Decoy gate: lets the disk rotate into a false set
    False,
    /// The correct gate
    True,
}

/// Clamp range of a disk under tension.
///
/// `outer` limits pushes down the pack (toward -5), `inner` limits pushes up
/// (toward -165). The pair is not guaranteed ordered, so treat it as an
/// unordered range when testing containment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiskBounds {
    pub outer: f64,
    pub inner: f64,
}

impl DiskBounds {
    /// Range of a disk that offers no resistance
    pub const DEFAULT: Self = Self {
        outer: DISK_DEFAULT_BOUNDS.0,
        inner: DISK_DEFAULT_BOUNDS.1,
    };

    /// Symmetric window around a gate origin
    pub fn around(origin: f64, slop: f64) -> Self {
        Self {
            outer: origin + slop,
            inner: origin - slop,
        }
    }

    /// Collapsed range: the disk cannot move at all
    pub fn point(position: f64) -> Self {
        Self {
            outer: position,
            inner: position,
        }
    }

    pub fn low(&self) -> f64 {
        self.outer.min(self.inner)
    }

    pub fn high(&self) -> f64 {
        self.outer.max(self.inner)
    }

    pub fn contains(&self, position: f64) -> bool {
        (self.low()..=self.high()).contains(&position)
    }

    pub fn is_point(&self) -> bool {
        self.outer == self.inner
    }
}

impl Default for DiskBounds {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// One disk of the pack
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Disk {
    /// Gate cut at each slot of [`GATE_ORIGINS`]
    pub gates: [GateKind; GATE_SLOTS],
    /// Current rotation, in the same units as the gate origins
    pub position: f64,
    /// Where `position` may go while tension is applied
    pub bounds: DiskBounds,
}

impl Disk {
    /// Fresh disk resting on the first gate origin, unbound
    pub fn new(gates: [GateKind; GATE_SLOTS]) -> Self {
        Self {
            gates,
            position: GATE_ORIGINS[0],
            bounds: DiskBounds::DEFAULT,
        }
    }

    /// Slot of the true gate, if the disk has one
    pub fn true_slot(&self) -> Option<usize> {
        self.gates.iter().position(|g| *g == GateKind::True)
    }

    pub fn false_gate_count(&self) -> usize {
        self.gates.iter().filter(|g| **g == GateKind::False).count()
    }

    /// First cut slot whose origin is within true-binding slop of the disk
    pub fn aligned_slot(&self) -> Option<usize> {
        self.gates
            .iter()
            .zip(GATE_ORIGINS)
            .position(|(gate, origin)| {
                *gate != GateKind::None && (origin - self.position).abs() <= GATE_TRUE_BINDING_SLOP
            })
    }
}

impl Default for Disk {
    fn default() -> Self {
        Self::new([GateKind::None; GATE_SLOTS])
    }
}

/// Named core rotation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoreTarget {
    /// No tension: the core eases back
    Untensioned,
    /// Tension, but some disk binds outside any gate
    Default,
    /// Tension with a disk caught in a false gate
    FalseSet,
    /// Every disk on its true gate
    Open,
}

impl CoreTarget {
    pub fn rotation(self) -> f64 {
        match self {
            CoreTarget::Untensioned => CORE_ROTATION_UNTENSIONED,
            CoreTarget::Default => CORE_ROTATION_DEFAULT,
            CoreTarget::FalseSet => CORE_ROTATION_FALSE_SET,
            CoreTarget::Open => CORE_ROTATION_OPEN,
        }
    }
}

/// Current and target rotation of the plug
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoreRotation {
    pub current: f64,
    pub target: CoreTarget,
}

impl CoreRotation {
    /// Step `current` toward the target by at most `max_step`.
    /// Returns true if the rotation moved.
    pub fn step_toward_target(&mut self, max_step: f64) -> bool {
        let target = self.target.rotation();
        let before = self.current;
        if self.current > target {
            self.current = (self.current - max_step).max(target);
        } else {
            self.current = (self.current + max_step).min(target);
        }
        self.current != before
    }

    pub fn at_target(&self) -> bool {
        self.current == self.target.rotation()
    }
}

/// Overall session state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameState {
    /// No session started yet
    #[default]
    Waiting,
    /// Interactive picking
    Main,
    /// Open detected, input locked while the core finishes turning
    Ending,
    /// Terminal until a new session starts
    Ended,
}

/// Post-open animation phase
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Outro {
    /// Core still turning (or not open at all)
    #[default]
    None,
    /// Core fully open, dramatic pause before fading
    Pause { remaining_ms: f64 },
    /// Fading out toward the win screen
    Fade,
}

/// Everything the presentation layer shows once the lock opens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WinSummary {
    /// One digit per disk, the true-gate slots
    pub bitting: String,
    /// Time from first input to the open
    pub elapsed_ms: f64,
    /// True if the cutaway was ever shown during the session
    pub cheated: bool,
}

impl WinSummary {
    pub fn elapsed(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(self.elapsed_ms.max(0.0) / 1000.0)
    }
}

impl std::fmt::Display for WinSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let secs = self.elapsed_ms.max(0.0) / 1000.0;
        let minutes = (secs / 60.0).floor();
        write!(
            f,
            "Open! Bitting: {} Picked in: {}m {:.3}s",
            self.bitting,
            minutes,
            secs % 60.0
        )?;
        if self.cheated {
            write!(f, " (cutaway used)")?;
        }
        Ok(())
    }
}

/// What a mutating call changed, for the renderer to decide what to redraw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Changes {
    /// Pick tip offset moved
    pub pick: bool,
    /// A disk position or bounds changed
    pub disks: bool,
    /// Core rotation (current or target) changed
    pub core: bool,
    /// Cutaway visibility toggled
    pub cutaway: bool,
    /// End fade or win text changed
    pub overlay: bool,
    /// [`GameState`] changed
    pub phase: bool,
}

impl Changes {
    pub const NONE: Self = Self {
        pick: false,
        disks: false,
        core: false,
        cutaway: false,
        overlay: false,
        phase: false,
    };

    pub fn any(&self) -> bool {
        self.pick || self.disks || self.core || self.cutaway || self.overlay || self.phase
    }

    pub fn merge(&mut self, other: Changes) {
        self.pick |= other.pick;
        self.disks |= other.disks;
        self.core |= other.core;
        self.cutaway |= other.cutaway;
        self.overlay |= other.overlay;
        self.phase |= other.phase;
    }
}

/// Complete lock session state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockState {
    /// Seed the pack was generated from
    pub seed: Seed,
    /// Disk pack, index = bitting position
    pub disks: [Disk; DISK_COUNT],
    /// Order in which disks bind on their edges
    pub binding_order1: BindingOrder,
    /// Order in which false gates catch
    pub binding_order2: BindingOrder,
    /// Pick tip offset within the pack
    pub pick_offset: DVec2,
    pub core: CoreRotation,
    pub game_state: GameState,
    pub tension_released: bool,
    /// Session clock, advanced by `tick` (ms)
    pub clock_ms: f64,
    /// Clock value of the first input
    pub start_time: Option<f64>,
    /// Clock value of the open
    pub end_time: Option<f64>,
    pub outro: Outro,
    /// End fade progress, 0 to [`FADE_MAX`]
    pub end_fade: f64,
    pub show_cutaway: bool,
    /// Set once the cutaway has been shown this session
    pub cheated: bool,
    /// Available once `game_state` is `Ended`
    pub win: Option<WinSummary>,
}

impl Default for LockState {
    /// A `Waiting` lock with a blank pack; call [`LockState::new`] to play
    fn default() -> Self {
        Self {
            seed: Seed::or_fallback(super::rng::FALLBACK_SEED),
            disks: [Disk::default(); DISK_COUNT],
            binding_order1: BindingOrder::identity(),
            binding_order2: BindingOrder::identity(),
            pick_offset: DVec2::new(PICK_DEFAULT_OFFSET.0, PICK_DEFAULT_OFFSET.1),
            core: CoreRotation {
                current: 0.0,
                target: CoreTarget::Default,
            },
            game_state: GameState::Waiting,
            tension_released: false,
            clock_ms: 0.0,
            start_time: None,
            end_time: None,
            outro: Outro::None,
            end_fade: 0.0,
            show_cutaway: false,
            cheated: false,
            win: None,
        }
    }
}

impl LockState {
    /// Start a session. `None` or zero picks a fresh random seed.
    pub fn new(seed: Option<u32>) -> Self {
        let seed = match seed {
            Some(value) if value != 0 => Seed::or_fallback(value),
            _ => Seed::random(),
        };
        Self::from_seed(seed)
    }

    /// Start a session from a validated seed
    pub fn from_seed(seed: Seed) -> Self {
        log::info!("Game init, seed={seed}");
        let mut rng = XorShift32::new(seed);

        let binding_order1 = BindingOrder::shuffled(&mut rng);
        let binding_order2 = BindingOrder::shuffled(&mut rng);
        let bitting = generate_bitting(&mut rng);
        let disks = make_pack(&bitting, &mut rng);

        let mut state = Self {
            seed,
            disks,
            binding_order1,
            binding_order2,
            game_state: GameState::Main,
            ..Self::default()
        };

        let target = state.rebind();
        state.core = CoreRotation {
            current: target.rotation(),
            target,
        };
        log::debug!("Bitting {bitting}, initial core target {target:?}");
        state
    }

    /// Replace this session with a fresh one
    pub fn restart(&mut self, seed: Option<u32>) {
        *self = Self::new(seed);
    }

    /// Run the binding solver on the current pack and store its bounds
    pub fn rebind(&mut self) -> CoreTarget {
        let BindOutcome { target, bounds } =
            recalculate_binds(&self.disks, &self.binding_order1, &self.binding_order2);
        for (disk, bound) in self.disks.iter_mut().zip(bounds) {
            disk.bounds = bound;
        }
        target
    }

    /// Reset every disk to the unbound range
    pub fn release_bounds(&mut self) {
        for disk in &mut self.disks {
            disk.bounds = DiskBounds::DEFAULT;
        }
    }

    /// Bitting read back from the pack's true gates
    pub fn bitting(&self) -> Bitting {
        Bitting(std::array::from_fn(|i| {
            self.disks[i].true_slot().unwrap_or_default() as u8
        }))
    }

    /// Start the session timer on first input
    pub(crate) fn start_timer(&mut self) {
        if self.start_time.is_none() {
            self.start_time = Some(self.clock_ms);
        }
    }

    /// Time since the first input (frozen once the lock opens)
    pub fn elapsed_ms(&self) -> f64 {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => end - start,
            (Some(start), None) => self.clock_ms - start,
            _ => 0.0,
        }
    }

    pub(crate) fn win_summary(&self) -> WinSummary {
        WinSummary {
            bitting: self.bitting().to_digits(),
            elapsed_ms: self.elapsed_ms(),
            cheated: self.cheated,
        }
    }

    /// Panic if the host drives a lock that was never started
    pub(crate) fn assert_started(&self, op: &str) {
        assert!(
            self.game_state != GameState::Waiting,
            "{op} called before init_game"
        );
    }
}

/// Start a new session, see [`LockState::new`]
pub fn init_game(seed: Option<u32>) -> LockState {
    LockState::new(seed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_game_determinism() {
        let a = init_game(Some(42));
        let b = init_game(Some(42));
        assert_eq!(a.disks, b.disks);
        assert_eq!(a.binding_order1, b.binding_order1);
        assert_eq!(a.binding_order2, b.binding_order2);
        assert_eq!(a.core, b.core);
    }

    #[test]
    fn test_init_game_seed_42() {
        let state = init_game(Some(42));
        assert_eq!(state.seed.get(), 42);
        assert_eq!(state.game_state, GameState::Main);
        assert_eq!(state.bitting().to_digits(), "0525531310");
        assert_eq!(state.binding_order1.0, [7, 2, 8, 9, 1, 0, 4, 3, 6, 5]);
        assert!(state.disks.iter().all(|d| d.position == GATE_ORIGINS[0]));
        assert_eq!(state.pick_offset, DVec2::new(0.0, -160.0));
        assert!(state.start_time.is_none());
        assert!(!state.cheated);
    }

    #[test]
    fn test_spinner_disk() {
        for seed in 1..200 {
            let state = init_game(Some(seed));
            let spinner = &state.disks[DISK_COUNT - 1];
            assert!(spinner.true_slot().is_some());
            assert_eq!(spinner.false_gate_count(), 0);
        }
    }

    #[test]
    fn test_initial_core_matches_target() {
        let state = init_game(Some(7));
        assert!(state.core.at_target());
        assert_ne!(state.core.target, CoreTarget::Open);
    }

    #[test]
    fn test_zero_seed_is_random() {
        let state = init_game(Some(0));
        assert_ne!(state.seed.get(), 0);
    }

    #[test]
    fn test_aligned_slot_skips_uncut_slots() {
        let mut disk = Disk::new([
            GateKind::None,
            GateKind::True,
            GateKind::None,
            GateKind::None,
            GateKind::False,
            GateKind::None,
        ]);
        // Resting on slot 0, which has no cut
        assert_eq!(disk.aligned_slot(), None);
        disk.position = -130.0 + 16.0;
        assert_eq!(disk.aligned_slot(), Some(1));
        disk.position = -130.0 + 16.5;
        assert_eq!(disk.aligned_slot(), None);
        disk.position = -45.0;
        assert_eq!(disk.aligned_slot(), Some(4));
    }

    #[test]
    fn test_core_step() {
        let mut core = CoreRotation {
            current: 5.0,
            target: CoreTarget::Default,
        };
        assert!(core.step_toward_target(4.0));
        assert_eq!(core.current, 1.0);
        assert!(core.step_toward_target(4.0));
        assert_eq!(core.current, -2.0);
        assert!(!core.step_toward_target(4.0));
        assert!(core.at_target());
    }

    #[test]
    fn test_win_summary_display() {
        let summary = WinSummary {
            bitting: "0525531310".to_string(),
            elapsed_ms: 75_250.0,
            cheated: true,
        };
        assert_eq!(
            summary.to_string(),
            "Open! Bitting: 0525531310 Picked in: 1m 15.250s (cutaway used)"
        );
        assert_eq!(summary.elapsed().as_millis(), 75_250);
    }

    #[test]
    fn test_changes_merge() {
        let mut c = Changes::NONE;
        assert!(!c.any());
        c.merge(Changes {
            core: true,
            ..Changes::NONE
        });
        assert!(c.any() && c.core && !c.pick);
    }
}
