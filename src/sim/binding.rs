//! Binding solver
//!
//! Decides which disk resists the core under tension and how much every
//! disk may still move. Two passes over the pack:
//!
//! 1. In binding order 1, the first disk not within true-binding slop of
//!    any cut binds on its edge. Disks before it keep a true-slop window
//!    around their gate, the binder locks in place, disks after it are free.
//! 2. If every disk sits in some gate, walk binding order 2 and let the
//!    first disk in a false gate catch with a reduced slop. Everything else
//!    gets the true-slop window.
//!
//! No binder and no false gate means the lock is open.

use super::bitting::BindingOrder;
use super::state::{CoreTarget, Disk, DiskBounds, GateKind};
use crate::consts::*;

/// Solver result: where the core wants to go and every disk's new range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BindOutcome {
    pub target: CoreTarget,
    pub bounds: [DiskBounds; DISK_COUNT],
}

/// Slop of a disk caught in a false gate, shrinking from the full
/// false-binding slop toward [`FALSE_SLOP_FLOOR`] of it as `order_index`
/// advances through binding order 2.
pub fn false_gate_slop(order_index: usize) -> f64 {
    let x = (DISK_COUNT - order_index) as f64 / DISK_COUNT as f64;
    let multiplier = (1.0 - FALSE_SLOP_FLOOR) * x + FALSE_SLOP_FLOOR;
    multiplier * GATE_FALSE_BINDING_SLOP
}

/// Recompute binding for the whole pack. Pure: the caller applies the
/// returned bounds.
pub fn recalculate_binds(
    disks: &[Disk; DISK_COUNT],
    order1: &BindingOrder,
    order2: &BindingOrder,
) -> BindOutcome {
    let mut bounds = [DiskBounds::DEFAULT; DISK_COUNT];
    let mut aligned = [0usize; DISK_COUNT];

    for (i, di) in order1.iter().enumerate() {
        let disk = &disks[di];
        match disk.aligned_slot() {
            Some(slot) => aligned[di] = slot,
            None => {
                for dj in order1.iter().take(i) {
                    bounds[dj] = DiskBounds::around(GATE_ORIGINS[aligned[dj]], GATE_TRUE_BINDING_SLOP);
                }
                bounds[di] = DiskBounds::point(disk.position);
                // Disks after the binder keep DEFAULT

                log::debug!("Disk bindings recalculated, disk {di} binding, no false set");
                return BindOutcome {
                    target: CoreTarget::Default,
                    bounds,
                };
            }
        }
    }

    let mut false_found = false;
    for (i, di) in order2.iter().enumerate() {
        let slot = aligned[di];
        let origin = GATE_ORIGINS[slot];

        bounds[di] = match disks[di].gates[slot] {
            GateKind::False if !false_found => {
                false_found = true;
                log::trace!("Disk {di} caught in false gate {slot}");
                DiskBounds::around(origin, false_gate_slop(i))
            }
            GateKind::False | GateKind::True | GateKind::None => {
                DiskBounds::around(origin, GATE_TRUE_BINDING_SLOP)
            }
        };
    }

    let target = if false_found {
        log::debug!("Disk bindings recalculated, in false set");
        CoreTarget::FalseSet
    } else {
        log::debug!("Disk bindings recalculated, open");
        CoreTarget::Open
    };

    BindOutcome { target, bounds }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::GateKind::{False as H, None as O, True as U};

    /// Pack with the true gate of disk `i` at slot `bitting[i]`, no false gates
    fn plain_pack(bitting: [usize; DISK_COUNT]) -> [Disk; DISK_COUNT] {
        std::array::from_fn(|i| {
            let mut gates = [O; GATE_SLOTS];
            gates[bitting[i]] = U;
            Disk::new(gates)
        })
    }

    fn set_all_true(disks: &mut [Disk; DISK_COUNT]) {
        for disk in disks.iter_mut() {
            disk.position = GATE_ORIGINS[disk.true_slot().unwrap()];
        }
    }

    const BITTING: [usize; DISK_COUNT] = [0, 5, 2, 5, 5, 3, 1, 3, 1, 0];

    #[test]
    fn test_all_true_is_open() {
        let mut disks = plain_pack(BITTING);
        set_all_true(&mut disks);
        let order = BindingOrder::identity();
        let outcome = recalculate_binds(&disks, &order, &order);
        assert_eq!(outcome.target, CoreTarget::Open);
        for (disk, bounds) in disks.iter().zip(outcome.bounds) {
            let origin = GATE_ORIGINS[disk.true_slot().unwrap()];
            assert_eq!(bounds, DiskBounds::around(origin, GATE_TRUE_BINDING_SLOP));
        }
    }

    #[test]
    fn test_unaligned_disk_binds() {
        let mut disks = plain_pack(BITTING);
        set_all_true(&mut disks);
        // Disk 4 only has a cut at -10
        disks[4].position = -113.0;
        assert_eq!(disks[4].aligned_slot(), None);

        let order1 = BindingOrder([3, 7, 4, 0, 1, 2, 5, 6, 8, 9]);
        let order2 = BindingOrder::identity();
        let outcome = recalculate_binds(&disks, &order1, &order2);

        assert_eq!(outcome.target, CoreTarget::Default);
        assert_eq!(outcome.bounds[4], DiskBounds::point(-113.0));
        assert!(outcome.bounds[4].is_point());
        // Visited before the binder: true slop around their gate
        assert_eq!(outcome.bounds[3], DiskBounds::around(-10.0, 16.0));
        assert_eq!(outcome.bounds[7], DiskBounds::around(-70.0, 16.0));
        // Visited after: free
        for di in [0, 1, 2, 5, 6, 8, 9] {
            assert_eq!(outcome.bounds[di], DiskBounds::DEFAULT);
        }
    }

    #[test]
    fn test_first_unaligned_in_order_wins() {
        let mut disks = plain_pack(BITTING);
        set_all_true(&mut disks);
        disks[2].position = -80.0;
        disks[6].position = -110.0;
        let order1 = BindingOrder([6, 2, 0, 1, 3, 4, 5, 7, 8, 9]);
        let outcome = recalculate_binds(&disks, &order1, &BindingOrder::identity());
        assert_eq!(outcome.target, CoreTarget::Default);
        assert!(outcome.bounds[6].is_point());
        assert_eq!(outcome.bounds[2], DiskBounds::DEFAULT);
    }

    #[test]
    fn test_false_set() {
        let mut disks = plain_pack(BITTING);
        set_all_true(&mut disks);
        // Disk 2 gets false gates at 0 and 4 and rests in the one at slot 4
        disks[2].gates = [H, O, U, O, H, O];
        disks[2].position = -40.0;
        // Disk 5 also sits in a false gate, later in order 2
        disks[5].gates = [O, H, O, U, O, H];
        disks[5].position = -130.0;

        let order1 = BindingOrder::identity();
        let order2 = BindingOrder([9, 8, 2, 5, 0, 1, 3, 4, 6, 7]);
        let outcome = recalculate_binds(&disks, &order1, &order2);

        assert_eq!(outcome.target, CoreTarget::FalseSet);
        // Third in order 2: X = 8/10, multiplier 0.9, slop 7.2
        let slop = false_gate_slop(2);
        assert!((slop - 7.2).abs() < 1e-9);
        assert_eq!(outcome.bounds[2], DiskBounds::around(-40.0, slop));
        // Only one false gate claims per pass
        assert_eq!(outcome.bounds[5], DiskBounds::around(-130.0, GATE_TRUE_BINDING_SLOP));
    }

    #[test]
    fn test_false_slop_range() {
        assert_eq!(false_gate_slop(0), GATE_FALSE_BINDING_SLOP);
        assert!((false_gate_slop(DISK_COUNT - 1) - 4.4).abs() < 1e-9);
        for i in 1..DISK_COUNT {
            assert!(false_gate_slop(i) < false_gate_slop(i - 1));
        }
    }

    #[test]
    fn test_slop_edge_counts_as_aligned() {
        let mut disks = plain_pack(BITTING);
        set_all_true(&mut disks);
        disks[0].position = GATE_ORIGINS[0] + GATE_TRUE_BINDING_SLOP;
        let order = BindingOrder::identity();
        let outcome = recalculate_binds(&disks, &order, &order);
        assert_eq!(outcome.target, CoreTarget::Open);
    }
}
