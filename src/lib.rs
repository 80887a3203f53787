//! Crossword generation as a constraint satisfaction problem: given a grid skeleton and a word
//! list, put one word in every slot so that lengths match, crossing slots agree on their shared
//! letters, and no word is used twice, or prove that it can't be done.
//!
//! ```
//! use crossword_csp::{parse_structure, solve};
//!
//! let grid = parse_structure("___\n#_#\n#_#\n").unwrap();
//! let assignment = solve(&grid, &["CAT", "TIN", "ACT"]).unwrap();
//! assert_eq!(assignment.len(), 2);
//! ```

pub mod arc_consistency;
pub mod assignment;
pub mod backtracking_search;
pub mod domain;
pub mod error;
pub mod grid;
pub mod grid_config;
pub mod parse;
pub mod render;
pub mod slot_graph;
pub mod word_list;

pub use assignment::Assignment;
pub use backtracking_search::{find_fill, FillFailure, FillOptions, FillSuccess, Statistics};
pub use error::{Error, MalformedGridError, Result};
pub use grid::{Direction, Grid, Slot, SlotId};
pub use grid_config::GridConfig;
pub use parse::{parse_structure, parse_word_list};
pub use render::render_grid;
pub use word_list::{WordId, WordList};

/// The expected maximum number of slots appearing in a grid.
pub const MAX_SLOT_COUNT: usize = 256;

/// The expected maximum length for a single slot.
pub const MAX_SLOT_LENGTH: usize = 21;

/// Run extra (slow) checks of the solver's internal invariants, panicking if any fail.
pub const CHECK_INVARIANTS: bool = cfg!(debug_assertions);

/// How many search states to visit between deadline checks.
pub const INTERRUPT_FREQUENCY: u64 = 10;

/// Fill `grid` from `words`, returning `None` if no fill exists.
pub fn solve<S: AsRef<str>>(grid: &Grid, words: &[S]) -> Option<Assignment> {
    solve_with_options(grid, words, &FillOptions::default()).ok()
}

/// Like `solve`, but with control over inference and a deadline. Running out of time is reported
/// separately from there being no fill.
pub fn solve_with_options<S: AsRef<str>>(
    grid: &Grid,
    words: &[S],
    options: &FillOptions,
) -> std::result::Result<Assignment, FillFailure> {
    let config = GridConfig::new(grid.clone(), WordList::new(words));
    let success = find_fill(&config, options)?;
    Ok(success.assignment(&config))
}
