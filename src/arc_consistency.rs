//! A crossword-specific implementation of AC-3. The grid is arc-consistent when, for every pair of
//! crossing slots (x, y), every candidate left in x has at least one candidate in y that puts the
//! same letter in their shared cell.

use bit_set::BitSet;
use std::collections::VecDeque;

use crate::domain::Domains;
use crate::grid::SlotId;
use crate::grid_config::GridConfig;
use crate::word_list::{GlyphId, WordId};

/// An ordered pair of crossing slots (x, y); revising it narrows x against y.
pub type Arc = (SlotId, SlotId);

/// Result from a successful call to `enforce`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArcConsistencySuccess {
    /// How many revisions actually removed something.
    pub revisions: usize,
}

/// Result from a failed call to `enforce`: this slot ran out of candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArcConsistencyFailure {
    pub slot_id: SlotId,
}

pub type ArcConsistencyResult = Result<ArcConsistencySuccess, ArcConsistencyFailure>;

/// Work queue of arcs waiting to be revised. An arc is never queued twice at the same time.
#[derive(Debug)]
struct ConsistencyQueue {
    queue: VecDeque<Arc>,
    queued: BitSet,
    slot_count: usize,
}

impl ConsistencyQueue {
    fn new(slot_count: usize) -> ConsistencyQueue {
        ConsistencyQueue {
            queue: VecDeque::new(),
            queued: BitSet::with_capacity(slot_count * slot_count),
            slot_count,
        }
    }

    fn enqueue(&mut self, (x, y): Arc) {
        if self.queued.insert(x * self.slot_count + y) {
            self.queue.push_back((x, y));
        }
    }

    fn pop_front(&mut self) -> Option<Arc> {
        let (x, y) = self.queue.pop_front()?;
        self.queued.remove(x * self.slot_count + y);
        Some((x, y))
    }
}

fn glyph_at(config: &GridConfig, word_id: WordId, cell_idx: usize) -> GlyphId {
    let word = config.word(word_id);
    match word.glyphs.get(cell_idx) {
        Some(&glyph) => glyph,
        None => panic!(
            "Cell {} is outside of candidate {:?}; node consistency must run first",
            cell_idx, word.string
        ),
    }
}

/// Make `x` arc-consistent with `y` by removing every candidate of `x` that has no partner in `y`
/// at their shared cell. Returns whether `x`'s domain changed. Slots that don't cross are already
/// consistent with each other.
pub fn revise(config: &GridConfig, domains: &mut Domains, x: SlotId, y: SlotId) -> bool {
    let Some((x_cell, y_cell)) = config.slot_graph.overlap(x, y) else {
        return false;
    };

    // Which letters does `y` still offer in the shared cell?
    let mut supported = BitSet::with_capacity(config.word_list.glyphs.len());
    for word_id in domains.iter(y) {
        supported.insert(glyph_at(config, word_id, y_cell));
    }

    domains.narrow(x, |word_id| supported.contains(glyph_at(config, word_id, x_cell)))
}

/// Run AC-3 starting from the given arcs. Whenever revising (x, y) narrows x, every arc (z, x)
/// with z a neighbor of x other than y goes back on the queue.
///
/// On failure the domains are left partly narrowed; callers that want to carry on take a
/// snapshot first and restore it.
pub fn enforce<I>(config: &GridConfig, domains: &mut Domains, initial_arcs: I) -> ArcConsistencyResult
where
    I: IntoIterator<Item = Arc>,
{
    let mut queue = ConsistencyQueue::new(config.slot_graph.slot_count());
    for arc in initial_arcs {
        queue.enqueue(arc);
    }

    let mut revisions = 0;
    while let Some((x, y)) = queue.pop_front() {
        if !revise(config, domains, x, y) {
            continue;
        }
        revisions += 1;

        if domains.is_empty(x) {
            tracing::trace!(slot = %config.slot(x), "arc consistency emptied a domain");
            return Err(ArcConsistencyFailure { slot_id: x });
        }

        for z in config.slot_graph.neighbors(x) {
            if z != y {
                queue.enqueue((z, x));
            }
        }
    }

    Ok(ArcConsistencySuccess { revisions })
}

/// Run AC-3 over every arc in the grid.
pub fn enforce_all(config: &GridConfig, domains: &mut Domains) -> ArcConsistencyResult {
    enforce(config, domains, config.slot_graph.arcs())
}

/// The arcs whose consistency may be lost after `slot_id`'s domain shrinks: every (z, slot_id).
pub fn arcs_into(config: &GridConfig, slot_id: SlotId) -> impl Iterator<Item = Arc> + '_ {
    config
        .slot_graph
        .neighbors(slot_id)
        .map(move |neighbor| (neighbor, slot_id))
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::{enforce, enforce_all, revise, ArcConsistencyFailure};
    use crate::domain::Domains;
    use crate::grid_config::GridConfig;
    use crate::parse::parse_structure;
    use crate::word_list::WordList;

    fn node_consistent(config: &GridConfig) -> Domains {
        let mut domains = Domains::new(config);
        domains.node_consistency(config);
        domains
    }

    fn strings(config: &GridConfig, domains: &Domains, slot_id: usize) -> Vec<String> {
        let mut words: Vec<String> = domains
            .iter(slot_id)
            .map(|word_id| config.word(word_id).string.clone())
            .collect();
        words.sort();
        words
    }

    /// ___
    /// #_#
    /// ___
    #[fixture]
    fn ladder() -> GridConfig {
        GridConfig::new(
            parse_structure("___\n#_#\n___\n").unwrap(),
            WordList::new(["BOB", "OXO", "ZZZ"]),
        )
    }

    #[test]
    fn test_revise_without_overlap_changes_nothing() {
        let config = GridConfig::new(
            parse_structure("___\n###\n___\n").unwrap(),
            WordList::new(["CAT", "DOG"]),
        );
        let mut domains = node_consistent(&config);

        assert!(!revise(&config, &mut domains, 0, 1));
        assert_eq!(domains.len(0), 2);
    }

    #[test]
    fn test_revise_removes_unsupported_candidates() {
        // Across crosses down at across offset 1 / down offset 0.
        let config = GridConfig::new(
            parse_structure("___\n#_#\n#_#\n").unwrap(),
            WordList::new(["CAT", "TIN", "ACT"]),
        );
        let mut domains = node_consistent(&config);

        // TIN has an I in the shared cell, which no down word starts with.
        assert!(revise(&config, &mut domains, 0, 1));
        assert_eq!(strings(&config, &domains, 0), vec!["ACT", "CAT"]);
        assert!(!revise(&config, &mut domains, 0, 1));

        // Likewise no across word has a T in the middle.
        assert!(revise(&config, &mut domains, 1, 0));
        assert_eq!(strings(&config, &domains, 1), vec!["ACT", "CAT"]);
    }

    #[rstest]
    fn test_enforce_reaches_the_expected_fixpoint(ladder: GridConfig) {
        let mut domains = node_consistent(&ladder);
        enforce_all(&ladder, &mut domains).unwrap();

        // Slots: 0 = top across, 1 = bottom across, 2 = down.
        assert_eq!(strings(&ladder, &domains, 0), vec!["BOB", "ZZZ"]);
        assert_eq!(strings(&ladder, &domains, 1), vec!["BOB", "ZZZ"]);
        assert_eq!(strings(&ladder, &domains, 2), vec!["OXO", "ZZZ"]);
    }

    #[rstest]
    #[case("___\n#_#\n___\n", &["BOB", "OXO", "ZZZ"])]
    #[case("____\n_##_\n_##_\n____\n", &["ABBA", "ACCA", "AXXB", "BOOB", "BAAC", "CABA", "ACDC"])]
    #[case(
        "__#__\n_____\n#___#\n_____\n__#__\n",
        &["AB", "BA", "CD", "DC", "AC", "CA", "ABCDE", "BCDEA", "EDCBA", "ACE", "BDE", "CAB"]
    )]
    fn test_enforce_is_a_fixpoint(#[case] structure: &str, #[case] words: &[&str]) {
        let config = GridConfig::new(parse_structure(structure).unwrap(), WordList::new(words));
        let mut domains = node_consistent(&config);

        if enforce_all(&config, &mut domains).is_err() {
            // A wipeout is a valid outcome; there's nothing left to be consistent.
            return;
        }

        for (x, y) in config.slot_graph.arcs() {
            let (x_cell, y_cell) = config.slot_graph.overlap(x, y).unwrap();
            for x_word in domains.iter(x) {
                let glyph = config.word(x_word).glyphs[x_cell];
                assert!(
                    domains.iter(y).any(|y_word| config.word(y_word).glyphs[y_cell] == glyph),
                    "{} in slot {x} has no support in slot {y}",
                    config.word(x_word).string
                );
            }
        }

        let before = domains.clone();
        let second = enforce_all(&config, &mut domains).unwrap();
        assert_eq!(second.revisions, 0);
        assert_eq!(domains, before);
    }

    #[test]
    fn test_enforce_fails_when_a_domain_empties() {
        let config = GridConfig::new(
            parse_structure("___\n#_#\n#_#\n").unwrap(),
            WordList::new(["CAT", "DOG"]),
        );
        let mut domains = node_consistent(&config);

        let result = enforce_all(&config, &mut domains);
        assert!(matches!(result, Err(ArcConsistencyFailure { .. })));
    }

    #[rstest]
    fn test_enforce_with_no_arcs_does_nothing(ladder: GridConfig) {
        let mut domains = node_consistent(&ladder);
        let before = domains.clone();

        let result = enforce(&ladder, &mut domains, []).unwrap();
        assert_eq!(result.revisions, 0);
        assert_eq!(domains, before);
    }
}
