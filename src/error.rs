use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    MalformedGrid(#[from] MalformedGridError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// The cell data handed to `Grid` doesn't describe a rectangular grid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedGridError {
    #[error("Malformed grid: got {found} cells for a {height}x{width} grid")]
    CellCount {
        height: usize,
        width: usize,
        found: usize,
    },
    #[error("Malformed grid: row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
}
