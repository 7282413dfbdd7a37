//! Bitting and binding-order generation
//!
//! Everything here draws from the session [`XorShift32`], so the draw order
//! is part of the seed contract: order 1 shuffle, order 2 shuffle, bitting,
//! then one gate pattern per non-spinner disk.

use serde::{Deserialize, Serialize};

use super::rng::XorShift32;
use super::state::GateKind::{False as H, None as O, True as U};
use super::state::{Disk, GateKind};
use crate::consts::{DISK_COUNT, GATE_SLOTS};

/// True-gate slot per disk, the "key" of the lock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bitting(pub [u8; DISK_COUNT]);

/// Fixed cuts at the ends of the pack; `None` positions are drawn
const BITTING_TEMPLATE: [Option<u8>; DISK_COUNT] = [
    Some(0),
    Some(5),
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    Some(0),
];

impl Bitting {
    /// True when some cut appears three times in a row
    pub fn has_triple(&self) -> bool {
        self.0.windows(3).any(|w| w[0] == w[1] && w[1] == w[2])
    }

    /// Digits of the bitting, e.g. `"0525531310"`
    pub fn to_digits(&self) -> String {
        self.0.iter().map(|cut| char::from(b'0' + cut)).collect()
    }
}

impl std::fmt::Display for Bitting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_digits())
    }
}

/// Draw bittings until one has no cut repeated three times consecutively.
///
/// About 16% of raw draws are rejected, so this terminates after a couple
/// of tries in practice.
pub fn generate_bitting(rng: &mut XorShift32) -> Bitting {
    loop {
        let mut cuts = [0u8; DISK_COUNT];
        for (cut, fixed) in cuts.iter_mut().zip(BITTING_TEMPLATE) {
            *cut = match fixed {
                Some(value) => value,
                None => rng.index_below(GATE_SLOTS) as u8,
            };
        }

        let bitting = Bitting(cuts);
        if !bitting.has_triple() {
            return bitting;
        }
        log::trace!("Rejected bitting {bitting}");
    }
}

/// Valid gate layouts per true-gate slot, four each
const GATE_PATTERNS: [[[GateKind; GATE_SLOTS]; 4]; GATE_SLOTS] = [
    [
        [U, O, H, O, H, O],
        [U, O, H, O, O, O],
        [U, O, O, O, H, O],
        [U, O, O, H, O, H],
    ],
    [
        [O, U, O, H, O, H],
        [O, U, O, H, O, O],
        [O, U, O, O, O, H],
        [O, U, O, O, H, O],
    ],
    [
        [H, O, U, O, H, O],
        [H, O, U, O, O, O],
        [O, O, U, O, H, O],
        [O, O, U, O, O, H],
    ],
    [
        [O, H, O, U, O, H],
        [O, H, O, U, O, O],
        [O, O, O, U, O, H],
        [H, O, O, U, O, O],
    ],
    [
        [H, O, H, O, U, O],
        [H, O, O, O, U, O],
        [O, O, H, O, U, O],
        [O, H, O, O, U, O],
    ],
    [
        [O, H, O, H, O, U],
        [O, H, O, O, O, U],
        [O, O, O, H, O, U],
        [H, O, H, O, O, U],
    ],
];

/// Build a disk with its true gate in `true_slot`.
///
/// Regular disks take a random false-gate layout from the pattern table.
/// The spinner only gets its true gate and draws nothing from `rng`.
///
/// # Panics
/// If `true_slot` is not a gate slot.
pub fn make_disk(true_slot: usize, is_spinner: bool, rng: &mut XorShift32) -> Disk {
    assert!(true_slot < GATE_SLOTS, "true gate slot {true_slot} out of range");

    let gates = if is_spinner {
        let mut gates = [GateKind::None; GATE_SLOTS];
        gates[true_slot] = GateKind::True;
        gates
    } else {
        let patterns = &GATE_PATTERNS[true_slot];
        patterns[rng.index_below(patterns.len())]
    };

    Disk::new(gates)
}

/// Fisher-Yates shuffle, last index down to 1
pub fn shuffle<T>(rng: &mut XorShift32, seq: &mut [T]) {
    for i in (1..seq.len()).rev() {
        let j = rng.index_below(i + 1);
        seq.swap(i, j);
    }
}

/// A permutation of disk indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingOrder(pub [usize; DISK_COUNT]);

impl BindingOrder {
    /// Disks in index order
    pub fn identity() -> Self {
        Self(std::array::from_fn(|i| i))
    }

    /// Shuffled order drawn from `rng`
    pub fn shuffled(rng: &mut XorShift32) -> Self {
        let mut order = Self::identity();
        shuffle(rng, &mut order.0);
        order
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }
}

impl Default for BindingOrder {
    fn default() -> Self {
        Self::identity()
    }
}

/// Disks built from a bitting, spinner last
pub fn make_pack(bitting: &Bitting, rng: &mut XorShift32) -> [Disk; DISK_COUNT] {
    std::array::from_fn(|i| make_disk(bitting.0[i] as usize, i == DISK_COUNT - 1, rng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::Seed;

    fn rng(seed: u32) -> XorShift32 {
        XorShift32::new(Seed::new(seed).unwrap())
    }

    #[test]
    fn test_patterns_are_well_formed() {
        for (slot, patterns) in GATE_PATTERNS.iter().enumerate() {
            for pattern in patterns {
                assert_eq!(pattern[slot], GateKind::True);
                let trues = pattern.iter().filter(|g| **g == GateKind::True).count();
                assert_eq!(trues, 1);
                // No two cuts side by side
                for w in pattern.windows(2) {
                    assert!(w[0] == GateKind::None || w[1] == GateKind::None);
                }
            }
        }
    }

    #[test]
    fn test_bitting_fixed_cuts_and_no_triples() {
        for seed in 1..500 {
            let b = generate_bitting(&mut rng(seed));
            assert_eq!(b.0[0], 0);
            assert_eq!(b.0[1], 5);
            assert_eq!(b.0[9], 0);
            assert!(b.0.iter().all(|cut| *cut < 6));
            assert!(!b.has_triple(), "seed {seed} produced {b}");
        }
    }

    #[test]
    fn test_has_triple() {
        assert!(Bitting([0, 5, 2, 2, 2, 1, 0, 3, 4, 0]).has_triple());
        assert!(!Bitting([0, 5, 2, 2, 1, 1, 0, 3, 4, 0]).has_triple());
        assert_eq!(Bitting([0, 5, 2, 2, 1, 1, 0, 3, 4, 0]).to_digits(), "0522110340");
    }

    #[test]
    fn test_spinner_has_no_false_gates() {
        let mut r = rng(3);
        for slot in 0..GATE_SLOTS {
            let disk = make_disk(slot, true, &mut r);
            assert_eq!(disk.true_slot(), Some(slot));
            assert!(disk.gates.iter().all(|g| *g != GateKind::False));
        }
    }

    #[test]
    fn test_spinner_draws_nothing() {
        let mut a = rng(11);
        let mut b = rng(11);
        make_disk(2, true, &mut a);
        assert_eq!(a.next_u32(), b.next_u32());
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let mut r = rng(8);
        for _ in 0..50 {
            let order = BindingOrder::shuffled(&mut r);
            let mut sorted = order.0;
            sorted.sort_unstable();
            assert_eq!(sorted, BindingOrder::identity().0);
        }
    }

    #[test]
    fn test_shuffle_seed_42() {
        let mut r = rng(42);
        assert_eq!(BindingOrder::shuffled(&mut r).0, [7, 2, 8, 9, 1, 0, 4, 3, 6, 5]);
        assert_eq!(BindingOrder::shuffled(&mut r).0, [2, 9, 4, 1, 0, 6, 7, 3, 8, 5]);
        assert_eq!(generate_bitting(&mut r).0, [0, 5, 2, 5, 5, 3, 1, 3, 1, 0]);
    }
}
