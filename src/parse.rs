use std::collections::HashSet;

use crate::error::Result;
use crate::grid::Grid;

/// Characters that mark a fillable cell in a structure template. Anything else is a block.
pub const FILLABLE_CHARS: [char; 2] = ['_', '.'];

/// Generate a grid from a structure template, with one line per row, `_` or `.` for each fillable
/// cell and any other character (spaces included) for a block. Empty lines are skipped.
pub fn parse_structure(template: &str) -> Result<Grid> {
    let rows: Vec<Vec<bool>> = template
        .lines()
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.is_empty())
        .map(|line| line.chars().map(|c| FILLABLE_CHARS.contains(&c)).collect())
        .collect();

    Grid::from_rows(&rows)
}

/// Read one word per line, upper-casing each and dropping blank lines and repeats.
pub fn parse_word_list(contents: &str) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();

    contents
        .lines()
        .map(|line| line.trim().to_uppercase())
        .filter(|word| !word.is_empty())
        .filter(|word| seen.insert(word.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{parse_structure, parse_word_list};
    use crate::error::{Error, MalformedGridError};

    #[rstest]
    #[case("#___#\n#_##_\n", 2, 5)]
    #[case("\n..#\r\n..#\r\n\n", 2, 3)]
    #[case("____", 1, 4)]
    fn test_parse_structure_dimensions(
        #[case] template: &str,
        #[case] height: usize,
        #[case] width: usize,
    ) {
        let grid = parse_structure(template).unwrap();
        assert_eq!(grid.height(), height);
        assert_eq!(grid.width(), width);
    }

    #[test]
    fn test_parse_structure_marks_blocks() {
        let grid = parse_structure("#_\n_X\n").unwrap();

        assert!(!grid.is_fillable((0, 0)));
        assert!(grid.is_fillable((0, 1)));
        assert!(grid.is_fillable((1, 0)));
        assert!(!grid.is_fillable((1, 1)));
    }

    #[rstest]
    #[case(" __\n___\n", (0, 0))]
    #[case("__ \n___\n", (0, 2))]
    fn test_parse_structure_keeps_edge_spaces_as_blocks(
        #[case] template: &str,
        #[case] block: (usize, usize),
    ) {
        let grid = parse_structure(template).unwrap();

        assert_eq!(grid.height(), 2);
        assert_eq!(grid.width(), 3);
        for row in 0..2 {
            for col in 0..3 {
                assert_eq!(grid.is_fillable((row, col)), (row, col) != block);
            }
        }
    }

    #[test]
    fn test_parse_structure_rejects_ragged_rows() {
        let result = parse_structure("___\n__\n");
        assert!(matches!(
            result,
            Err(Error::MalformedGrid(MalformedGridError::RaggedRow { row: 1, .. }))
        ));
    }

    #[test]
    fn test_parse_word_list() {
        let words = parse_word_list("cat\n  Dog \n\nCAT\nbird\n");
        assert_eq!(words, vec!["CAT", "DOG", "BIRD"]);
    }
}
