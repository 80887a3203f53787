//! Per-slot candidate sets. Every narrowing is recorded on a trail so that the search can take a
//! snapshot before a tentative choice and roll back to it exactly when the choice fails.

use bit_set::BitSet;

use crate::grid::SlotId;
use crate::grid_config::GridConfig;
use crate::word_list::WordId;
use crate::CHECK_INVARIANTS;

/// The current candidate words for every slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domains {
    /// Indexed by SlotId; each set holds WordIds.
    options: Vec<BitSet>,

    /// Every (slot, word) elimination since the last `commit`, oldest first.
    trail: Vec<(SlotId, WordId)>,
}

/// A point on the trail to roll back to. Snapshots must be restored in reverse order of creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct DomainSnapshot {
    trail_len: usize,
}

impl Domains {
    /// Start every slot off with the entire word list.
    pub fn new(config: &GridConfig) -> Domains {
        let word_count = config.word_list.len();
        let mut all_words = BitSet::with_capacity(word_count);
        for word_id in 0..word_count {
            all_words.insert(word_id);
        }

        Domains {
            options: vec![all_words; config.slot_count()],
            trail: vec![],
        }
    }

    pub fn slot_count(&self) -> usize {
        self.options.len()
    }

    /// How many candidates does this slot have left?
    pub fn len(&self, slot_id: SlotId) -> usize {
        self.options[slot_id].len()
    }

    pub fn is_empty(&self, slot_id: SlotId) -> bool {
        self.options[slot_id].is_empty()
    }

    /// The slot's remaining candidates in ascending WordId order.
    pub fn iter(&self, slot_id: SlotId) -> impl Iterator<Item = WordId> + '_ {
        self.options[slot_id].iter()
    }

    pub fn first_empty_slot(&self) -> Option<SlotId> {
        self.options.iter().position(|options| options.is_empty())
    }

    /// Drop every candidate whose length doesn't match its slot. This only looks at each slot on
    /// its own, so one pass is enough.
    pub fn node_consistency(&mut self, config: &GridConfig) {
        for slot_id in 0..self.slot_count() {
            let length = config.slot(slot_id).length;
            self.narrow(slot_id, |word_id| config.word(word_id).len() == length);
        }
    }

    /// Remove every candidate for which `keep` returns false. Returns whether anything was removed.
    pub fn narrow<P>(&mut self, slot_id: SlotId, mut keep: P) -> bool
    where
        P: FnMut(WordId) -> bool,
    {
        let removed: Vec<WordId> = self.options[slot_id]
            .iter()
            .filter(|&word_id| !keep(word_id))
            .collect();

        for &word_id in &removed {
            self.options[slot_id].remove(word_id);
            self.trail.push((slot_id, word_id));
        }

        !removed.is_empty()
    }

    /// Capture the current state so that later narrowing can be undone.
    pub fn snapshot(&self) -> DomainSnapshot {
        DomainSnapshot {
            trail_len: self.trail.len(),
        }
    }

    /// Undo every narrowing made since `snapshot` was taken.
    pub fn restore(&mut self, snapshot: DomainSnapshot) {
        if CHECK_INVARIANTS && snapshot.trail_len > self.trail.len() {
            panic!(
                "Restoring a snapshot at trail position {} but the trail only has {} entries",
                snapshot.trail_len,
                self.trail.len()
            );
        }

        while self.trail.len() > snapshot.trail_len {
            if let Some((slot_id, word_id)) = self.trail.pop() {
                self.options[slot_id].insert(word_id);
            }
        }
    }

    /// Make everything narrowed so far permanent. Any outstanding snapshot becomes invalid.
    pub fn commit(&mut self) {
        self.trail.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::Domains;
    use crate::grid_config::GridConfig;
    use crate::parse::parse_structure;
    use crate::word_list::WordList;

    fn config(structure: &str, words: &[&str]) -> GridConfig {
        GridConfig::new(parse_structure(structure).unwrap(), WordList::new(words))
    }

    #[test]
    fn test_node_consistency_leaves_only_matching_lengths() {
        // _____
        // _####
        // _####
        let config = config(
            "_____\n_####\n_####\n",
            &["AT", "CAT", "DOG", "HOUSE", "MOUSE", "TREES"],
        );
        let mut domains = Domains::new(&config);
        domains.node_consistency(&config);

        for slot_id in 0..config.slot_count() {
            let length = config.slot(slot_id).length;
            assert!(domains.len(slot_id) > 0);
            for word_id in domains.iter(slot_id) {
                assert_eq!(config.word(word_id).len(), length);
            }
        }
        assert_eq!(domains.len(0), 3);
        assert_eq!(domains.len(1), 2);
    }

    #[test]
    fn test_node_consistency_can_empty_a_slot() {
        let config = config("____\n", &["CAT", "DOG"]);
        let mut domains = Domains::new(&config);
        domains.node_consistency(&config);

        assert_eq!(domains.first_empty_slot(), Some(0));
    }

    #[test]
    fn test_narrow_reports_whether_anything_changed() {
        let config = config("___\n", &["CAT", "COT", "DOG"]);
        let mut domains = Domains::new(&config);

        assert!(!domains.narrow(0, |_| true));
        assert!(domains.narrow(0, |word_id| config.word(word_id).string.starts_with('C')));
        assert_eq!(domains.iter(0).collect::<Vec<_>>(), vec![0, 1]);
        assert!(!domains.narrow(0, |word_id| config.word(word_id).string.starts_with('C')));
    }

    #[test]
    fn test_restore_undoes_narrowing_exactly() {
        let config = config("___\n#_#\n#_#\n", &["CAT", "COT", "DOG", "ACT"]);
        let mut domains = Domains::new(&config);
        domains.node_consistency(&config);
        domains.commit();
        let before = domains.clone();

        let outer = domains.snapshot();
        domains.narrow(0, |word_id| word_id != 0);
        let after_outer = domains.clone();

        let inner = domains.snapshot();
        domains.narrow(0, |_| false);
        domains.narrow(1, |word_id| word_id == 3);
        assert!(domains.is_empty(0));

        domains.restore(inner);
        assert_eq!(domains, after_outer);

        domains.restore(outer);
        assert_eq!(domains, before);
    }
}
