use std::fmt;

use crate::error::{MalformedGridError, Result};

/// Runs shorter than this aren't slots.
pub const MIN_SLOT_LENGTH: usize = 2;

/// An identifier for a given slot, based on its index in `Grid::slots()`.
pub type SlotId = usize;

/// Zero-indexed (row, column) coords for a cell in the grid, where row 0 is the top row.
pub type GridCoord = (usize, usize);

/// Direction that a slot is facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    Across,
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Across => f.write_str("across"),
            Direction::Down => f.write_str("down"),
        }
    }
}

/// A maximal run of fillable cells in one direction; each slot holds exactly one word. Two slots
/// are the same slot iff all four fields match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Slot {
    pub row: usize,
    pub col: usize,
    pub direction: Direction,
    pub length: usize,
}

impl Slot {
    pub fn new(row: usize, col: usize, direction: Direction, length: usize) -> Slot {
        Slot {
            row,
            col,
            direction,
            length,
        }
    }

    /// The coords of the `cell_idx`th cell of this slot.
    pub fn cell(&self, cell_idx: usize) -> GridCoord {
        match self.direction {
            Direction::Across => (self.row, self.col + cell_idx),
            Direction::Down => (self.row + cell_idx, self.col),
        }
    }

    /// Generate the coords for each cell of this slot.
    pub fn cells(&self) -> impl Iterator<Item = GridCoord> {
        let slot = *self;
        (0..slot.length).map(move |cell_idx| slot.cell(cell_idx))
    }

    /// If the two slots share a cell, return its offset within `self` and within `other`.
    ///
    /// Parallel slots never share a cell, and perpendicular slots can share at most one, so this
    /// is a plain range intersection on each axis.
    pub fn intersection(&self, other: &Slot) -> Option<(usize, usize)> {
        let (across, down, flipped) = match (self.direction, other.direction) {
            (Direction::Across, Direction::Down) => (self, other, false),
            (Direction::Down, Direction::Across) => (other, self, true),
            _ => return None,
        };

        let across_cols = across.col..across.col + across.length;
        let down_rows = down.row..down.row + down.length;
        if !across_cols.contains(&down.col) || !down_rows.contains(&across.row) {
            return None;
        }

        let across_offset = down.col - across.col;
        let down_offset = across.row - down.row;
        if flipped {
            Some((down_offset, across_offset))
        } else {
            Some((across_offset, down_offset))
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}) {} x{}",
            self.row, self.col, self.direction, self.length
        )
    }
}

/// The fixed skeleton of a puzzle: which cells can hold letters, and the slots those cells form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    height: usize,
    width: usize,
    cells: Vec<bool>,
    slots: Vec<Slot>,
}

impl Grid {
    /// Build a grid from row-major fillable flags.
    pub fn new(height: usize, width: usize, cells: Vec<bool>) -> Result<Grid> {
        if height.checked_mul(width) != Some(cells.len()) {
            return Err(MalformedGridError::CellCount {
                height,
                width,
                found: cells.len(),
            }
            .into());
        }

        let slots = find_slots(height, width, &cells);

        Ok(Grid {
            height,
            width,
            cells,
            slots,
        })
    }

    /// Build a grid from one slice of fillable flags per row. Every row must be the same length.
    pub fn from_rows<R: AsRef<[bool]>>(rows: &[R]) -> Result<Grid> {
        let width = rows.first().map_or(0, |row| row.as_ref().len());
        let mut cells = Vec::with_capacity(rows.len() * width);

        for (row_idx, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                return Err(MalformedGridError::RaggedRow {
                    row: row_idx,
                    expected: width,
                    found: row.len(),
                }
                .into());
            }
            cells.extend_from_slice(row);
        }

        Grid::new(rows.len(), width, cells)
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Can the given cell hold a letter? Cells outside the grid can't.
    pub fn is_fillable(&self, (row, col): GridCoord) -> bool {
        row < self.height && col < self.width && self.cells[row * self.width + col]
    }

    /// All slots in scan order: across slots row by row, then down slots column by column.
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }
}

/// Scan every row and then every column for runs of fillable cells long enough to be slots.
fn find_slots(height: usize, width: usize, cells: &[bool]) -> Vec<Slot> {
    let fillable = |row: usize, col: usize| cells[row * width + col];
    let mut slots = vec![];

    for row in 0..height {
        scan_runs(
            width,
            |col| fillable(row, col),
            |start, length| slots.push(Slot::new(row, start, Direction::Across, length)),
        );
    }

    for col in 0..width {
        scan_runs(
            height,
            |row| fillable(row, col),
            |start, length| slots.push(Slot::new(start, col, Direction::Down, length)),
        );
    }

    slots
}

/// Call `on_run(start, length)` for each maximal run of at least `MIN_SLOT_LENGTH` fillable
/// cells along a line of `line_length` cells.
fn scan_runs<F, R>(line_length: usize, is_fillable: F, mut on_run: R)
where
    F: Fn(usize) -> bool,
    R: FnMut(usize, usize),
{
    let mut run_start: Option<usize> = None;

    // One step past the end so that a run touching the edge gets closed too.
    for idx in 0..=line_length {
        let open = idx < line_length && is_fillable(idx);

        match (run_start, open) {
            (None, true) => run_start = Some(idx),
            (Some(start), false) => {
                if idx - start >= MIN_SLOT_LENGTH {
                    on_run(start, idx - start);
                }
                run_start = None;
            }
            _ => {}
        }
    }
}
