use crate::types::Position;

/// Errors raised by direct grid access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("position {pos} is outside the {width}x{height} grid")]
    OutOfBounds { pos: Position, width: u8, height: u8 },

    #[error("cell {0} is not playable")]
    InvalidCell(Position),
}

/// Rejected swap proposals. Recoverable: the caller simply re-prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SwapError {
    #[error("swap position {0} is outside the grid")]
    OutOfBounds(Position),

    #[error("{a} and {b} are not adjacent")]
    NotAdjacent { a: Position, b: Position },

    #[error("cell {0} cannot take part in a swap")]
    InvalidCell(Position),
}

impl From<BoardError> for SwapError {
    fn from(err: BoardError) -> Self {
        match err {
            BoardError::OutOfBounds { pos, .. } => SwapError::OutOfBounds(pos),
            BoardError::InvalidCell(pos) => SwapError::InvalidCell(pos),
        }
    }
}

/// Setup-time population failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShuffleError {
    #[error("palette of {kinds} kind(s) cannot fill this board without a match: {reason}")]
    NoSolvablePlacement { kinds: usize, reason: &'static str },

    #[error("no board with a playable move found after {attempts} deals")]
    NoPlayableMove { attempts: u32 },
}

/// Board shape / palette configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("board must have at least one row and one column")]
    Empty,

    #[error("board is {width}x{height}, at most 255x255 is supported")]
    TooLarge { width: usize, height: usize },

    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("expected {expected} rows, found {found}")]
    RowCount { expected: usize, found: usize },

    #[error("expected {expected} cells, found {found}")]
    CellCount { expected: usize, found: usize },

    #[error("unknown cell code {code} at ({col}, {row})")]
    UnknownCode { code: String, col: usize, row: usize },

    #[error("column {0} has playable cells but its topmost playable cell is not a spawn")]
    MissingSpawn(u8),

    #[error("column {col} has a spawn at row {row} below another playable cell")]
    MisplacedSpawn { col: u8, row: u8 },

    #[error("hole {0} cannot hold a token")]
    TokenOnHole(Position),

    #[error("preset at {pos} uses kind {kind}, palette has {kinds}")]
    PresetOutOfPalette { pos: Position, kind: u8, kinds: usize },

    #[error("preset tokens already form a match through {0}")]
    PresetMatch(Position),

    #[error("palette has {0} kinds, at most 250 are supported")]
    PaletteTooLarge(usize),
}

/// Cascade engine failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("engine is {0} and cannot accept a command")]
    Busy(&'static str),

    #[error("swap rejected: {0}")]
    Swap(#[from] SwapError),

    #[error("board error: {0}")]
    Board(#[from] BoardError),

    #[error("invalid layout: {0}")]
    Layout(#[from] LayoutError),

    #[error("shuffle failed: {0}")]
    Shuffle(#[from] ShuffleError),

    #[error("cascade exceeded {limit} rounds without settling")]
    CascadeOverflow { limit: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_error_display() {
        let err = BoardError::OutOfBounds {
            pos: Position::new(7, 1),
            width: 7,
            height: 10,
        };
        assert_eq!(err.to_string(), "position (7, 1) is outside the 7x10 grid");
    }

    #[test]
    fn test_swap_error_from_board_error() {
        let err: SwapError = BoardError::InvalidCell(Position::new(0, 5)).into();
        assert_eq!(err, SwapError::InvalidCell(Position::new(0, 5)));
        assert_eq!(err.to_string(), "cell (0, 5) cannot take part in a swap");
    }

    #[test]
    fn test_engine_error_wraps_shuffle() {
        let err: EngineError = ShuffleError::NoPlayableMove { attempts: 64 }.into();
        assert_eq!(
            err.to_string(),
            "shuffle failed: no board with a playable move found after 64 deals"
        );
    }
}
