use std::collections::{BTreeMap, HashMap, HashSet};

use crate::grid::{Grid, Slot};

/// A word for each of some set of slots. A solved grid has one for every slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignment {
    words: BTreeMap<Slot, String>,
}

impl Assignment {
    pub fn new() -> Assignment {
        Assignment::default()
    }

    /// Put `word` in `slot`, returning whatever was there before.
    pub fn insert(&mut self, slot: Slot, word: String) -> Option<String> {
        self.words.insert(slot, word)
    }

    pub fn get(&self, slot: &Slot) -> Option<&str> {
        self.words.get(slot).map(String::as_str)
    }

    /// Slots and their words, in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (&Slot, &str)> {
        self.words.iter().map(|(slot, word)| (slot, word.as_str()))
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Does this assign a word to every slot of `grid`?
    pub fn is_complete(&self, grid: &Grid) -> bool {
        grid.slots().iter().all(|slot| self.words.contains_key(slot))
    }

    /// Check the rules of a fill against `grid`: every slot belongs to the grid, every word fits
    /// its slot, no word is used twice, and crossing slots agree on their shared letter.
    pub fn is_consistent(&self, grid: &Grid) -> bool {
        let grid_slots: HashSet<&Slot> = grid.slots().iter().collect();
        let mut seen_words: HashSet<&str> = HashSet::with_capacity(self.words.len());
        let mut letters: HashMap<(usize, usize), char> = HashMap::new();

        for (slot, word) in &self.words {
            if !grid_slots.contains(slot) || !seen_words.insert(word.as_str()) {
                return false;
            }
            if word.chars().count() != slot.length {
                return false;
            }

            for (cell, letter) in slot.cells().zip(word.chars()) {
                if *letters.entry(cell).or_insert(letter) != letter {
                    return false;
                }
            }
        }

        true
    }
}
