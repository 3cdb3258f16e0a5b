//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the puzzle.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (core logic, event playback, configuration).
//!
//! # Coordinates
//!
//! Positions are `(col, row)` pairs:
//!
//! - **col**: `0..width`, left to right
//! - **row**: `0..height`, top to bottom (row 0 is the top)
//! - **Gravity** moves tokens toward increasing row index
//!
//! # Cells
//!
//! A cell holds a [`Cell`], which is `Option<TokenKind>`: `None` is the empty
//! sentinel that exists between a clear and the following refill.
//!
//! # Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `MIN_MATCH_LEN` | 3 | Shortest run that counts as a match |
//! | `DEFAULT_TOKEN_POINTS` | 30 | Points per cleared token |
//! | `DEFAULT_PALETTE_SIZE` | 6 | Token kinds in the default palette |
//! | `SHUFFLE_ATTEMPTS` | 64 | Whole-board redeals before giving up |
//! | `MAX_TOKEN_KINDS` | 250 | Palette size ceiling |
//!
//! # Examples
//!
//! ```
//! use match_three_types::{Direction, Position, TokenKind};
//!
//! let pos = Position::new(2, 3);
//! assert_eq!(pos.step(Direction::Up), Some(Position::new(2, 2)));
//! assert_eq!(Position::new(0, 0).step(Direction::Left), None);
//!
//! assert!(pos.is_adjacent(Position::new(3, 3)));
//! assert!(!pos.is_adjacent(Position::new(3, 4)));
//!
//! assert_eq!(TokenKind(4).index(), 4);
//! ```

use std::fmt;

/// Shortest run of equal tokens that counts as a match
pub const MIN_MATCH_LEN: usize = 3;

/// Points awarded per cleared token when the palette does not say otherwise
pub const DEFAULT_TOKEN_POINTS: u32 = 30;

/// Number of token kinds in the default palette
pub const DEFAULT_PALETTE_SIZE: usize = 6;

/// Whole-board redeals attempted before a shuffle reports failure
pub const SHUFFLE_ATTEMPTS: u32 = 64;

/// Largest palette a board accepts (kind codes must stay below the snapshot sentinels)
pub const MAX_TOKEN_KINDS: usize = 250;

/// Token kind - an opaque index into the session palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenKind(pub u8);

impl TokenKind {
    /// Palette index of this kind
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Contents of a grid cell; `None` means no token is present
pub type Cell = Option<TokenKind>;

/// Board shape classification, fixed when the grid is built
///
/// - **Invalid**: a hole, never holds a token
/// - **Playable**: a normal cell
/// - **Spawn**: top-of-column cell fed by the spawner (also playable)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellClass {
    Invalid,
    Playable,
    Spawn,
}

impl CellClass {
    /// Whether tokens may occupy this cell
    ///
    /// ```
    /// use match_three_types::CellClass;
    ///
    /// assert!(CellClass::Spawn.is_playable());
    /// assert!(!CellClass::Invalid.is_playable());
    /// ```
    pub fn is_playable(self) -> bool {
        !matches!(self, CellClass::Invalid)
    }
}

/// Grid position as `(col, row)`, row 0 at the top
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub col: u8,
    pub row: u8,
}

impl Position {
    pub const fn new(col: u8, row: u8) -> Self {
        Self { col, row }
    }

    /// Move one cell in `dir`, or `None` when that would leave the
    /// non-negative quadrant. Upper bounds are the grid's business.
    pub fn step(self, dir: Direction) -> Option<Position> {
        let (dc, dr) = dir.offset();
        let col = self.col.checked_add_signed(dc)?;
        let row = self.row.checked_add_signed(dr)?;
        Some(Position { col, row })
    }

    /// Manhattan distance between two positions
    pub fn distance(self, other: Position) -> u32 {
        (self.col.abs_diff(other.col) as u32) + (self.row.abs_diff(other.row) as u32)
    }

    /// 4-adjacency: Manhattan distance of exactly one (no diagonals)
    pub fn is_adjacent(self, other: Position) -> bool {
        self.distance(other) == 1
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

/// The four grid directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All directions in neighbor order: up, down, left, right
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// `(dcol, drow)` unit offset
    pub fn offset(self) -> (i8, i8) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Opposite direction
    ///
    /// ```
    /// use match_three_types::Direction;
    ///
    /// assert_eq!(Direction::Up.opposite(), Direction::Down);
    /// assert_eq!(Direction::Left.opposite(), Direction::Right);
    /// ```
    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Parse from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "up" | "u" => Some(Direction::Up),
            "down" | "d" => Some(Direction::Down),
            "left" | "l" => Some(Direction::Left),
            "right" | "r" => Some(Direction::Right),
            _ => None,
        }
    }

    /// Convert to lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

/// Axis a run lies along
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    /// Direction that walks forward along the axis (right or down)
    pub fn forward(self) -> Direction {
        match self {
            Axis::Horizontal => Direction::Right,
            Axis::Vertical => Direction::Down,
        }
    }

    /// Direction that walks backward along the axis (left or up)
    pub fn backward(self) -> Direction {
        self.forward().opposite()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Axis::Horizontal => "horizontal",
            Axis::Vertical => "vertical",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_constants() {
        assert_eq!(MIN_MATCH_LEN, 3);
        assert_eq!(DEFAULT_TOKEN_POINTS, 30);
        assert!(DEFAULT_PALETTE_SIZE >= 3);
        assert!(MAX_TOKEN_KINDS < u8::MAX as usize);
    }

    #[test]
    fn test_position_step_edges() {
        let origin = Position::new(0, 0);
        assert_eq!(origin.step(Direction::Up), None);
        assert_eq!(origin.step(Direction::Left), None);
        assert_eq!(origin.step(Direction::Down), Some(Position::new(0, 1)));
        assert_eq!(origin.step(Direction::Right), Some(Position::new(1, 0)));

        let far = Position::new(u8::MAX, u8::MAX);
        assert_eq!(far.step(Direction::Right), None);
        assert_eq!(far.step(Direction::Down), None);
    }

    #[test]
    fn test_adjacency_excludes_diagonals_and_self() {
        let p = Position::new(3, 3);
        for dir in Direction::ALL {
            assert!(p.is_adjacent(p.step(dir).unwrap()));
        }
        assert!(!p.is_adjacent(p));
        assert!(!p.is_adjacent(Position::new(4, 4)));
        assert!(!p.is_adjacent(Position::new(5, 3)));
    }

    #[test]
    fn test_direction_roundtrip() {
        for dir in Direction::ALL {
            assert_eq!(Direction::from_str(dir.as_str()), Some(dir));
            assert_eq!(dir.opposite().opposite(), dir);
        }
        assert_eq!(Direction::from_str("UP"), Some(Direction::Up));
        assert_eq!(Direction::from_str("north"), None);
    }

    #[test]
    fn test_axis_directions() {
        assert_eq!(Axis::Horizontal.forward(), Direction::Right);
        assert_eq!(Axis::Horizontal.backward(), Direction::Left);
        assert_eq!(Axis::Vertical.forward(), Direction::Down);
        assert_eq!(Axis::Vertical.backward(), Direction::Up);
    }
}
