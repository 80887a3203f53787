use smallvec::SmallVec;

use crate::grid::{Slot, SlotId};
use crate::{CHECK_INVARIANTS, MAX_SLOT_LENGTH};

/// The shared cell of two crossing slots, as (offset into the first slot's word, offset into the
/// second slot's word).
pub type Overlap = (usize, usize);

/// A crossing between one slot and another, from the point of view of the first slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crossing {
    pub other_slot_id: SlotId,
    pub cell_idx: usize,
    pub other_slot_cell: usize,
}

/// Which slots cross which, and where. Built once from the grid's slots and never changed.
#[derive(Debug, Clone)]
pub struct SlotGraph {
    slot_count: usize,

    /// Dense `slot_count * slot_count` table, indexed by `a * slot_count + b`.
    overlaps: Vec<Option<Overlap>>,

    /// For each slot, its crossings ordered by the other slot's id.
    crossings: Vec<SmallVec<[Crossing; MAX_SLOT_LENGTH]>>,
}

impl SlotGraph {
    /// Intersect every pair of slots. This is quadratic in the slot count, which is fine for the
    /// grid sizes we care about.
    pub fn new(slots: &[Slot]) -> SlotGraph {
        let slot_count = slots.len();
        let mut overlaps = vec![None; slot_count * slot_count];
        let mut crossings: Vec<SmallVec<[Crossing; MAX_SLOT_LENGTH]>> =
            (0..slot_count).map(|_| SmallVec::new()).collect();

        for a in 0..slot_count {
            for b in a + 1..slot_count {
                let Some((a_cell, b_cell)) = slots[a].intersection(&slots[b]) else {
                    continue;
                };

                if CHECK_INVARIANTS && slots[a].cell(a_cell) != slots[b].cell(b_cell) {
                    panic!(
                        "Overlap of {} and {} doesn't point at a shared cell",
                        slots[a], slots[b]
                    );
                }

                overlaps[a * slot_count + b] = Some((a_cell, b_cell));
                overlaps[b * slot_count + a] = Some((b_cell, a_cell));
                crossings[a].push(Crossing {
                    other_slot_id: b,
                    cell_idx: a_cell,
                    other_slot_cell: b_cell,
                });
                crossings[b].push(Crossing {
                    other_slot_id: a,
                    cell_idx: b_cell,
                    other_slot_cell: a_cell,
                });
            }
        }

        // Pushing in pair order leaves each list sorted by `other_slot_id` already.
        SlotGraph {
            slot_count,
            overlaps,
            crossings,
        }
    }

    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    /// The shared cell of `a` and `b`, with offsets in that order, or `None` if they don't cross.
    pub fn overlap(&self, a: SlotId, b: SlotId) -> Option<Overlap> {
        self.overlaps[a * self.slot_count + b]
    }

    pub fn crossings(&self, slot_id: SlotId) -> &[Crossing] {
        &self.crossings[slot_id]
    }

    /// Every slot that crosses `slot_id`.
    pub fn neighbors(&self, slot_id: SlotId) -> impl Iterator<Item = SlotId> + '_ {
        self.crossings[slot_id]
            .iter()
            .map(|crossing| crossing.other_slot_id)
    }

    /// Number of neighbors.
    pub fn degree(&self, slot_id: SlotId) -> usize {
        self.crossings[slot_id].len()
    }

    /// Every ordered pair of crossing slots, i.e. both directions of every constraint.
    pub fn arcs(&self) -> impl Iterator<Item = (SlotId, SlotId)> + '_ {
        (0..self.slot_count).flat_map(move |x| self.neighbors(x).map(move |y| (x, y)))
    }
}
