//! This module fills a grid with chronological backtracking search. Before searching we make every
//! slot node-consistent (right word length) and then arc-consistent (AC-3). During the search we
//! pick the next slot with the minimum-remaining-values heuristic (ties go to the slot with the
//! most crossings), try its words in least-constraining-value order, and optionally re-run AC-3
//! after every tentative choice.
//!
//! Instead of recursing, the search keeps an explicit stack of frames, one per filled slot. Each
//! frame remembers which of its candidates are still untried and the domain snapshot taken just
//! before its current choice, so backing out of a choice restores the domains exactly.

use bit_set::BitSet;
use instant::{Duration, Instant};
use smallvec::{smallvec, SmallVec};
use std::cmp::Reverse;
use std::fmt::{Debug, Formatter};

use crate::arc_consistency::{arcs_into, enforce, enforce_all, Arc, ArcConsistencyFailure};
use crate::assignment::Assignment;
use crate::domain::{DomainSnapshot, Domains};
use crate::grid::SlotId;
use crate::grid_config::GridConfig;
use crate::word_list::WordId;
use crate::{CHECK_INVARIANTS, INTERRUPT_FREQUENCY, MAX_SLOT_COUNT};

/// Knobs for a fill attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillOptions {
    /// Re-establish arc consistency after every tentative choice, so that dead ends show up
    /// before we descend into them. The search is complete either way; this only prunes.
    pub inference: bool,

    /// Give up once this much time has passed since the fill started. Running out of time is
    /// reported as `FillFailure::DeadlineExceeded`, which says nothing about whether a fill
    /// exists.
    pub deadline: Option<Duration>,
}

impl Default for FillOptions {
    fn default() -> Self {
        FillOptions {
            inference: true,
            deadline: None,
        }
    }
}

/// A struct tracking statistics about the filling process.
#[derive(Debug, Clone, Default)]
pub struct Statistics {
    pub states: u64,
    pub backtracks: u64,
    pub duration: Duration,
}

/// A struct recording a slot assignment made during the filling process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice {
    pub slot_id: SlotId,
    pub word_id: WordId,
}

/// A struct representing the results of a fill operation.
#[derive(Debug)]
pub struct FillSuccess {
    pub statistics: Statistics,

    /// One choice per slot, in the order the search made them.
    pub choices: Vec<Choice>,
}

impl FillSuccess {
    /// Turn the choices back into slots and strings.
    pub fn assignment(&self, config: &GridConfig) -> Assignment {
        let mut assignment = Assignment::new();
        for choice in &self.choices {
            assignment.insert(
                *config.slot(choice.slot_id),
                config.word(choice.word_id).string.clone(),
            );
        }
        assignment
    }
}

/// Why a fill attempt didn't produce a fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillFailure {
    /// Every possibility was ruled out; no fill exists.
    Unsatisfiable,

    /// The deadline passed before the search finished; a fill may or may not exist.
    DeadlineExceeded,
}

/// The words chosen so far, indexed by SlotId.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PartialAssignment {
    word_ids: SmallVec<[Option<WordId>; MAX_SLOT_COUNT]>,
    assigned_count: usize,
}

impl PartialAssignment {
    pub(crate) fn new(slot_count: usize) -> PartialAssignment {
        PartialAssignment {
            word_ids: smallvec![None; slot_count],
            assigned_count: 0,
        }
    }

    pub(crate) fn get(&self, slot_id: SlotId) -> Option<WordId> {
        self.word_ids[slot_id]
    }

    pub(crate) fn assign(&mut self, slot_id: SlotId, word_id: WordId) {
        if CHECK_INVARIANTS && self.word_ids[slot_id].is_some() {
            panic!("Assigning slot {slot_id}, which is already assigned");
        }
        self.word_ids[slot_id] = Some(word_id);
        self.assigned_count += 1;
    }

    pub(crate) fn unassign(&mut self, slot_id: SlotId) {
        if CHECK_INVARIANTS && self.word_ids[slot_id].is_none() {
            panic!("Unassigning slot {slot_id}, which isn't assigned");
        }
        self.word_ids[slot_id] = None;
        self.assigned_count -= 1;
    }

    pub(crate) fn is_complete(&self) -> bool {
        self.assigned_count == self.word_ids.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.assigned_count == 0
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (SlotId, WordId)> + '_ {
        self.word_ids
            .iter()
            .enumerate()
            .filter_map(|(slot_id, word_id)| word_id.map(|word_id| (slot_id, word_id)))
    }

    /// Every word currently placed somewhere in the grid.
    pub(crate) fn used_words(&self, word_count: usize) -> BitSet {
        let mut used = BitSet::with_capacity(word_count);
        for (_, word_id) in self.iter() {
            used.insert(word_id);
        }
        used
    }
}

/// Is the assignment as a whole valid so far? No word may appear twice, every word must fit its
/// slot, and every pair of assigned crossing slots must agree on the shared letter.
pub(crate) fn consistent(config: &GridConfig, assignment: &PartialAssignment) -> bool {
    let mut seen = BitSet::with_capacity(config.word_list.len());
    for (slot_id, word_id) in assignment.iter() {
        if !seen.insert(word_id) || config.word(word_id).len() != config.slot(slot_id).length {
            return false;
        }
    }

    // All lengths are known to be right at this point, so the crossing offsets are in range.
    assignment.iter().all(|(slot_id, word_id)| {
        let word = config.word(word_id);
        config.slot_graph.crossings(slot_id).iter().all(|crossing| {
            match assignment.get(crossing.other_slot_id) {
                Some(other_word_id) => {
                    word.glyphs[crossing.cell_idx]
                        == config.word(other_word_id).glyphs[crossing.other_slot_cell]
                }
                None => true,
            }
        })
    })
}

/// Pick the unassigned slot with the fewest remaining candidates. Ties go to the slot with the
/// most crossings, then to the lowest slot id so that runs are reproducible.
pub(crate) fn select_unassigned_variable(
    config: &GridConfig,
    domains: &Domains,
    assignment: &PartialAssignment,
) -> Option<SlotId> {
    (0..config.slot_count())
        .filter(|&slot_id| assignment.get(slot_id).is_none())
        .min_by_key(|&slot_id| {
            (
                domains.len(slot_id),
                Reverse(config.slot_graph.degree(slot_id)),
                slot_id,
            )
        })
}

/// Return the candidates for `slot_id`, ordered by how many candidates each one would rule out
/// in the crossing slots (fewest first). Words already placed elsewhere are left out entirely.
pub(crate) fn order_domain_values(
    config: &GridConfig,
    domains: &Domains,
    assignment: &PartialAssignment,
    slot_id: SlotId,
) -> Vec<WordId> {
    let glyph_count = config.word_list.glyphs.len();

    // For each crossing, count how many of the other slot's candidates put each glyph in the
    // shared cell. A word with glyph `g` in that cell rules out everything else.
    let crossing_counts: Vec<(usize, usize, Vec<usize>)> = config
        .slot_graph
        .crossings(slot_id)
        .iter()
        .map(|crossing| {
            let mut glyph_counts = vec![0; glyph_count];
            for word_id in domains.iter(crossing.other_slot_id) {
                glyph_counts[config.word(word_id).glyphs[crossing.other_slot_cell]] += 1;
            }
            (
                crossing.cell_idx,
                domains.len(crossing.other_slot_id),
                glyph_counts,
            )
        })
        .collect();

    let used = assignment.used_words(config.word_list.len());
    let mut values: Vec<WordId> = domains
        .iter(slot_id)
        .filter(|&word_id| !used.contains(word_id))
        .collect();

    // Stable, so equally constraining words stay in WordId order.
    values.sort_by_cached_key(|&word_id| {
        let glyphs = &config.word(word_id).glyphs;
        crossing_counts
            .iter()
            .map(|(cell_idx, total, glyph_counts)| total - glyph_counts[glyphs[*cell_idx]])
            .sum::<usize>()
    });

    values
}

/// One level of the search: a slot, the candidates not yet tried for it, and the choice currently
/// in place along with the snapshot to restore when that choice is undone.
struct Frame {
    slot_id: SlotId,
    untried: std::vec::IntoIter<WordId>,
    current: Option<(WordId, DomainSnapshot)>,
}

impl Debug for Frame {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("slot_id", &self.slot_id)
            .field("untried", &self.untried.len())
            .field("current", &self.current.map(|(word_id, _)| word_id))
            .finish()
    }
}

/// The live state of a fill attempt.
struct Search<'a> {
    config: &'a GridConfig,
    options: &'a FillOptions,
    domains: Domains,
    assignment: PartialAssignment,
    stack: Vec<Frame>,
    statistics: Statistics,
    start: Instant,
}

impl<'a> Search<'a> {
    fn new(
        config: &'a GridConfig,
        options: &'a FillOptions,
        domains: Domains,
        start: Instant,
    ) -> Search<'a> {
        Search {
            config,
            options,
            domains,
            assignment: PartialAssignment::new(config.slot_count()),
            stack: Vec::with_capacity(config.slot_count()),
            statistics: Statistics::default(),
            start,
        }
    }

    /// Descend until every slot has a word, or fail once every choice at the root has been tried.
    fn run(&mut self) -> Result<(), FillFailure> {
        loop {
            if self.statistics.states % INTERRUPT_FREQUENCY == 0 {
                if let Some(deadline) = self.options.deadline {
                    if self.start.elapsed() >= deadline {
                        return Err(FillFailure::DeadlineExceeded);
                    }
                }
            }

            // Every slot is filled.
            let Some(slot_id) =
                select_unassigned_variable(self.config, &self.domains, &self.assignment)
            else {
                return Ok(());
            };

            self.statistics.states += 1;
            let candidates =
                order_domain_values(self.config, &self.domains, &self.assignment, slot_id);
            tracing::trace!(
                slot = %self.config.slot(slot_id),
                candidates = candidates.len(),
                depth = self.stack.len(),
                "selected slot"
            );

            self.stack.push(Frame {
                slot_id,
                untried: candidates.into_iter(),
                current: None,
            });

            if !self.advance() {
                return Err(FillFailure::Unsatisfiable);
            }
        }
    }

    /// Put the next viable candidate in place in the deepest frame, undoing that frame's previous
    /// choice first. Frames with nothing left to try are popped, which backtracks into their
    /// parent. Returns false once the stack is empty.
    fn advance(&mut self) -> bool {
        while let Some(frame) = self.stack.last_mut() {
            let slot_id = frame.slot_id;
            let previous = frame.current.take();
            let next_word_id = frame.untried.next();

            if let Some((_, snapshot)) = previous {
                self.assignment.unassign(slot_id);
                self.domains.restore(snapshot);
            }

            let Some(word_id) = next_word_id else {
                self.stack.pop();
                self.statistics.backtracks += 1;
                tracing::trace!(slot = %self.config.slot(slot_id), "backtracking");
                continue;
            };

            let snapshot = self.domains.snapshot();
            self.assignment.assign(slot_id, word_id);

            if self.is_viable(slot_id, word_id) {
                if let Some(frame) = self.stack.last_mut() {
                    frame.current = Some((word_id, snapshot));
                }
                return true;
            }

            self.assignment.unassign(slot_id);
            self.domains.restore(snapshot);
        }

        false
    }

    /// Check a choice that has just been added to the assignment. With inference turned on this
    /// also narrows the domains to reflect the choice; the caller restores them if we say no.
    fn is_viable(&mut self, slot_id: SlotId, word_id: WordId) -> bool {
        if !consistent(self.config, &self.assignment) {
            return false;
        }
        if !self.options.inference {
            return true;
        }

        let mut arcs: Vec<Arc> = vec![];

        self.domains.narrow(slot_id, |candidate| candidate == word_id);
        arcs.extend(arcs_into(self.config, slot_id));

        // The word is spoken for, so no other open slot can use it.
        for other_slot_id in 0..self.config.slot_count() {
            if other_slot_id == slot_id || self.assignment.get(other_slot_id).is_some() {
                continue;
            }
            if self.domains.narrow(other_slot_id, |candidate| candidate != word_id) {
                if self.domains.is_empty(other_slot_id) {
                    return false;
                }
                arcs.extend(arcs_into(self.config, other_slot_id));
            }
        }

        enforce(self.config, &mut self.domains, arcs).is_ok()
    }

    /// The choices currently in place, from the root down.
    fn choices(&self) -> Vec<Choice> {
        self.stack
            .iter()
            .filter_map(|frame| {
                frame.current.map(|(word_id, _)| Choice {
                    slot_id: frame.slot_id,
                    word_id,
                })
            })
            .collect()
    }
}

/// Build the domains the search starts from: every word of the right length for each slot, made
/// arc-consistent. If that already leaves some slot without candidates there's no point searching.
pub fn establish_initial_consistency(config: &GridConfig) -> Result<Domains, FillFailure> {
    let mut domains = Domains::new(config);
    domains.node_consistency(config);
    if let Some(slot_id) = domains.first_empty_slot() {
        tracing::debug!(slot = %config.slot(slot_id), "no word has the right length for slot");
        return Err(FillFailure::Unsatisfiable);
    }

    match enforce_all(config, &mut domains) {
        Ok(success) => {
            tracing::debug!(revisions = success.revisions, "established arc consistency");
        }
        Err(ArcConsistencyFailure { slot_id }) => {
            tracing::debug!(
                slot = %config.slot(slot_id),
                "arc consistency left slot with no options"
            );
            return Err(FillFailure::Unsatisfiable);
        }
    }

    // Nothing before this point can be undone by the search.
    domains.commit();
    Ok(domains)
}

/// Search for a valid fill for the given grid.
pub fn find_fill(config: &GridConfig, options: &FillOptions) -> Result<FillSuccess, FillFailure> {
    let start = Instant::now();
    tracing::info!(
        slots = config.slot_count(),
        words = config.word_list.len(),
        inference = options.inference,
        "filling grid"
    );

    let domains = establish_initial_consistency(config)?;
    let mut search = Search::new(config, options, domains, start);
    let result = search.run();
    search.statistics.duration = start.elapsed();

    match result {
        Ok(()) => {
            if CHECK_INVARIANTS
                && !(search.assignment.is_complete() && consistent(config, &search.assignment))
            {
                panic!("Search finished without a complete, consistent assignment");
            }
            tracing::info!(
                states = search.statistics.states,
                backtracks = search.statistics.backtracks,
                duration = ?search.statistics.duration,
                "found a fill"
            );
            Ok(FillSuccess {
                choices: search.choices(),
                statistics: search.statistics,
            })
        }
        Err(failure) => {
            tracing::info!(
                ?failure,
                states = search.statistics.states,
                backtracks = search.statistics.backtracks,
                duration = ?search.statistics.duration,
                "no fill found"
            );
            Err(failure)
        }
    }
}
