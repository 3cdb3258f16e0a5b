use std::hash::Hasher;

use crate::cascade::EngineState;
use crate::grid::Grid;
use crate::types::{CellClass, TokenKind};

/// Code of an empty playable cell
pub const EMPTY_CODE: u8 = 0;
/// Code of an `Invalid` cell
pub const INVALID_CODE: u8 = 255;

/// FNV-1a 64-bit.
///
/// `DefaultHasher` output is not stable across Rust versions, so board hashes
/// use this instead.
#[derive(Debug, Clone)]
pub struct Fnv1aHasher {
    state: u64,
}

impl Fnv1aHasher {
    const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;

    pub fn new() -> Self {
        Self {
            state: Self::OFFSET_BASIS,
        }
    }
}

impl Default for Fnv1aHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher for Fnv1aHasher {
    fn finish(&self) -> u64 {
        self.state
    }

    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.state ^= b as u64;
            self.state = self.state.wrapping_mul(Self::PRIME);
        }
    }
}

/// Byte code of one cell
pub fn cell_code(class: CellClass, token: Option<TokenKind>) -> u8 {
    match (class, token) {
        (CellClass::Invalid, _) => INVALID_CODE,
        (_, None) => EMPTY_CODE,
        (_, Some(kind)) => kind.0.saturating_add(1),
    }
}

/// Row-major cell codes of a grid
pub fn encode_grid(grid: &Grid) -> Vec<u8> {
    grid.classes()
        .iter()
        .zip(grid.cells())
        .map(|(&class, &cell)| cell_code(class, cell))
        .collect()
}

/// Stable hash of a grid: FNV-1a over `[width, height, codes...]`
pub fn board_hash(grid: &Grid) -> u64 {
    let mut hasher = Fnv1aHasher::new();
    hasher.write(&[grid.width(), grid.height()]);
    hasher.write(&encode_grid(grid));
    hasher.finish()
}

/// Observation of an engine between commands
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BoardSnapshot {
    pub width: u8,
    pub height: u8,
    /// Row-major codes: 0 empty, `k + 1` for kind `k`, 255 invalid
    pub cells: Vec<u8>,
    pub state: EngineState,
    pub score: u32,
    pub moves: u32,
    pub board_hash: u64,
}

impl BoardSnapshot {
    pub fn capture(grid: &Grid, state: EngineState, score: u32, moves: u32) -> Self {
        Self {
            width: grid.width(),
            height: grid.height(),
            cells: encode_grid(grid),
            state,
            score,
            moves,
            board_hash: board_hash(grid),
        }
    }

    /// Code at `(col, row)`, `None` outside the board
    pub fn code(&self, col: u8, row: u8) -> Option<u8> {
        if col >= self.width || row >= self.height {
            return None;
        }
        self.cells
            .get(row as usize * self.width as usize + col as usize)
            .copied()
    }

    /// Codes grouped by row
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.cells.chunks(self.width.max(1) as usize)
    }
}
