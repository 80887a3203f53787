use std::fmt::{Debug, Formatter};

use crate::grid::{Grid, Slot, SlotId};
use crate::slot_graph::SlotGraph;
use crate::word_list::{Word, WordId, WordList};

/// A struct representing the aspects of a puzzle that are static during filling: the skeleton,
/// the vocabulary, and the crossings derived from the skeleton.
pub struct GridConfig {
    pub grid: Grid,
    pub word_list: WordList,
    pub slot_graph: SlotGraph,
}

impl Debug for GridConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridConfig")
            .field("height", &self.grid.height())
            .field("width", &self.grid.width())
            .field("slots", &self.grid.slots())
            .field("words", &format!("({} entries)", self.word_list.len()))
            .finish()
    }
}

impl GridConfig {
    pub fn new(grid: Grid, word_list: WordList) -> GridConfig {
        let slot_graph = SlotGraph::new(grid.slots());
        GridConfig {
            grid,
            word_list,
            slot_graph,
        }
    }

    pub fn slot_count(&self) -> usize {
        self.grid.slots().len()
    }

    pub fn slot(&self, slot_id: SlotId) -> &Slot {
        &self.grid.slots()[slot_id]
    }

    pub fn word(&self, word_id: WordId) -> &Word {
        &self.word_list.words[word_id]
    }
}
