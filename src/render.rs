use crate::assignment::Assignment;
use crate::grid::Grid;

/// Printed in place of a blocked cell.
pub const BLOCK_CHAR: char = '█';

/// Lay an assignment's letters out on the grid, one `Vec` per row. Cells that no assigned slot
/// covers (including blocks) are `None`.
pub fn letter_grid(grid: &Grid, assignment: &Assignment) -> Vec<Vec<Option<char>>> {
    let mut letters = vec![vec![None; grid.width()]; grid.height()];

    for (slot, word) in assignment.iter() {
        for ((row, col), letter) in slot.cells().zip(word.chars()) {
            if grid.is_fillable((row, col)) {
                letters[row][col] = Some(letter);
            }
        }
    }

    letters
}

/// Turn the given grid and assignment into a rendered string: one line per row, blocks drawn as
/// `BLOCK_CHAR`, and empty fillable cells as spaces.
pub fn render_grid(grid: &Grid, assignment: &Assignment) -> String {
    let letters = letter_grid(grid, assignment);

    letters
        .iter()
        .enumerate()
        .map(|(row, row_letters)| {
            row_letters
                .iter()
                .enumerate()
                .map(|(col, letter)| {
                    if grid.is_fillable((row, col)) {
                        letter.unwrap_or(' ')
                    } else {
                        BLOCK_CHAR
                    }
                })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
