//! Grid module - owns the token cells of one board
//!
//! The grid is a `width x height` array of [`Cell`]s plus the fixed
//! [`CellClass`] mask it was built from. Uses flat row-major storage
//! (`row * width + col`); row 0 is the top and gravity points down.
//!
//! All access is bounds-checked: out-of-bounds positions are an error, never
//! clamped. Adjacency is plain index arithmetic.

use arrayvec::ArrayVec;

use crate::error::{BoardError, LayoutError};
use crate::layout::BoardLayout;
use crate::types::{Cell, CellClass, Direction, Position, TokenKind};

/// Token grid with its board-shape mask
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    width: u8,
    height: u8,
    classes: Vec<CellClass>,
    /// Tokens the layout pins in place; re-applied on every shuffle
    presets: Vec<Cell>,
    cells: Vec<Cell>,
}

impl Grid {
    /// Build an unpopulated grid (presets placed, every other cell empty)
    pub fn new(layout: &BoardLayout) -> Self {
        let presets = layout.presets().to_vec();
        Self {
            width: layout.width(),
            height: layout.height(),
            classes: layout.classes().to_vec(),
            cells: presets.clone(),
            presets,
        }
    }

    /// Build a fully playable grid from rows of cells (row 0 spawns).
    ///
    /// Intended for fixtures: the tokens are taken as-is, matches included.
    pub fn from_rows(rows: &[Vec<Cell>]) -> Result<Self, LayoutError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        let layout = BoardLayout::rectangular(width, height)?;
        let mut grid = Self::new(&layout);
        for (row, cells) in rows.iter().enumerate() {
            if cells.len() != width {
                return Err(LayoutError::Ragged {
                    row,
                    expected: width,
                    found: cells.len(),
                });
            }
            let start = row * width;
            grid.cells[start..start + width].copy_from_slice(cells);
        }
        Ok(grid)
    }

    /// Build a grid for `layout` and fill it row by row.
    ///
    /// `rows` must match the layout's dimensions and `Invalid` cells must be `None`.
    pub fn with_cells(layout: &BoardLayout, rows: &[Vec<Cell>]) -> Result<Self, LayoutError> {
        let mut grid = Self::new(layout);
        let width = grid.width as usize;
        if rows.len() != grid.height as usize {
            return Err(LayoutError::RowCount {
                expected: grid.height as usize,
                found: rows.len(),
            });
        }
        for (row, cells) in rows.iter().enumerate() {
            if cells.len() != width {
                return Err(LayoutError::Ragged {
                    row,
                    expected: width,
                    found: cells.len(),
                });
            }
            for (col, cell) in cells.iter().enumerate() {
                let i = row * width + col;
                if cell.is_some() && grid.classes[i] == CellClass::Invalid {
                    return Err(LayoutError::TokenOnHole(Position::new(col as u8, row as u8)));
                }
                grid.cells[i] = *cell;
            }
        }
        Ok(grid)
    }

    #[inline(always)]
    fn index(&self, pos: Position) -> Option<usize> {
        if pos.col >= self.width || pos.row >= self.height {
            return None;
        }
        Some(pos.row as usize * self.width as usize + pos.col as usize)
    }

    #[inline]
    fn checked_index(&self, pos: Position) -> Result<usize, BoardError> {
        self.index(pos).ok_or(BoardError::OutOfBounds {
            pos,
            width: self.width,
            height: self.height,
        })
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    /// Whether `pos` lies inside the grid
    pub fn contains(&self, pos: Position) -> bool {
        self.index(pos).is_some()
    }

    pub fn get(&self, pos: Position) -> Result<Cell, BoardError> {
        self.checked_index(pos).map(|i| self.cells[i])
    }

    /// Write a cell. Tokens cannot be placed on `Invalid` cells; clearing one is a no-op.
    pub fn set(&mut self, pos: Position, cell: Cell) -> Result<(), BoardError> {
        let i = self.checked_index(pos)?;
        if cell.is_some() && self.classes[i] == CellClass::Invalid {
            return Err(BoardError::InvalidCell(pos));
        }
        self.cells[i] = cell;
        Ok(())
    }

    pub fn class(&self, pos: Position) -> Result<CellClass, BoardError> {
        self.checked_index(pos).map(|i| self.classes[i])
    }

    /// `Playable` or `Spawn`. Out-of-bounds positions are not playable.
    pub fn is_playable(&self, pos: Position) -> bool {
        self.index(pos).is_some_and(|i| self.classes[i].is_playable())
    }

    /// Token at `pos` if the cell is in bounds, playable and filled
    #[inline]
    pub fn token(&self, pos: Position) -> Option<TokenKind> {
        self.index(pos).and_then(|i| self.cells[i])
    }

    /// Preset token the layout pins at `pos`
    pub fn preset(&self, pos: Position) -> Option<TokenKind> {
        self.index(pos).and_then(|i| self.presets[i])
    }

    /// Playable neighbor in `dir`.
    ///
    /// `Ok(None)` means the edge of the board or a hole; `Err` means `pos`
    /// itself is outside the grid.
    pub fn neighbor(&self, pos: Position, dir: Direction) -> Result<Option<Position>, BoardError> {
        self.checked_index(pos)?;
        Ok(pos.step(dir).filter(|&next| self.is_playable(next)))
    }

    /// Up, down, left and right playable neighbors (0-4 results)
    pub fn neighbors4(&self, pos: Position) -> Result<ArrayVec<Position, 4>, BoardError> {
        self.checked_index(pos)?;
        Ok(Direction::ALL
            .iter()
            .filter_map(|&dir| pos.step(dir))
            .filter(|&next| self.is_playable(next))
            .collect())
    }

    /// Exchange the contents of two cells
    pub fn swap(&mut self, a: Position, b: Position) -> Result<(), BoardError> {
        let ia = self.checked_index(a)?;
        let ib = self.checked_index(b)?;
        self.cells.swap(ia, ib);
        Ok(())
    }

    /// Every position, row-major
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let width = self.width;
        (0..self.height).flat_map(move |row| (0..width).map(move |col| Position::new(col, row)))
    }

    /// Every `Playable`/`Spawn` position, row-major
    pub fn playable_positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.positions().filter(|&pos| self.is_playable(pos))
    }

    /// Playable cells of one column, top to bottom (holes skipped)
    pub fn column(&self, col: u8) -> Vec<Position> {
        if col >= self.width {
            return Vec::new();
        }
        (0..self.height)
            .map(|row| Position::new(col, row))
            .filter(|&pos| self.is_playable(pos))
            .collect()
    }

    /// True when every playable cell holds a token
    pub fn is_filled(&self) -> bool {
        self.cells
            .iter()
            .zip(&self.classes)
            .all(|(cell, class)| !class.is_playable() || cell.is_some())
    }

    /// Number of tokens on the board
    pub fn token_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn classes(&self) -> &[CellClass] {
        &self.classes
    }

    /// Row-major copy of the cells
    pub fn to_rows(&self) -> Vec<Vec<Cell>> {
        let width = self.width as usize;
        self.cells.chunks(width).map(<[Cell]>::to_vec).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const R: Cell = Some(TokenKind(0));
    const G: Cell = Some(TokenKind(1));
    const B: Cell = Some(TokenKind(2));

    fn holed() -> Grid {
        let layout = BoardLayout::parse_rows(&["S#S", ".S.", "#.."]).unwrap();
        Grid::new(&layout)
    }

    #[test]
    fn test_grid_index_calculation() {
        let grid = Grid::from_rows(&[vec![R, G, B], vec![B, G, R]]).unwrap();
        assert_eq!(grid.index(Position::new(0, 0)), Some(0));
        assert_eq!(grid.index(Position::new(2, 0)), Some(2));
        assert_eq!(grid.index(Position::new(0, 1)), Some(3));
        assert_eq!(grid.index(Position::new(3, 0)), None);
        assert_eq!(grid.index(Position::new(0, 2)), None);
    }

    #[test]
    fn test_get_set_out_of_bounds_fails() {
        let mut grid = Grid::from_rows(&[vec![R, G, B]]).unwrap();
        let outside = Position::new(3, 0);
        assert_eq!(
            grid.get(outside),
            Err(BoardError::OutOfBounds {
                pos: outside,
                width: 3,
                height: 1
            })
        );
        assert!(grid.set(outside, R).is_err());
        assert_eq!(grid.get(Position::new(2, 0)), Ok(B));
    }

    #[test]
    fn test_invalid_cells_refuse_tokens() {
        let mut grid = holed();
        let hole = Position::new(1, 0);
        assert_eq!(grid.class(hole), Ok(CellClass::Invalid));
        assert_eq!(grid.set(hole, R), Err(BoardError::InvalidCell(hole)));
        assert_eq!(grid.set(hole, None), Ok(()));
        assert!(!grid.is_playable(hole));
        assert!(grid.is_playable(Position::new(0, 0)));
        assert!(!grid.is_playable(Position::new(9, 9)));
    }

    #[test]
    fn test_neighbors4_skips_holes_and_edges() {
        let grid = holed();
        // (1, 1): up is a hole, down/left/right are playable.
        let n = grid.neighbors4(Position::new(1, 1)).unwrap();
        assert_eq!(
            n.as_slice(),
            &[Position::new(1, 2), Position::new(0, 1), Position::new(2, 1)]
        );
        // Corner with a hole below.
        let n = grid.neighbors4(Position::new(0, 1)).unwrap();
        assert_eq!(n.as_slice(), &[Position::new(0, 0), Position::new(1, 1)]);
        assert!(grid.neighbors4(Position::new(3, 0)).is_err());
    }

    #[test]
    fn test_neighbor_distinguishes_edge_from_bad_call() {
        let grid = holed();
        assert_eq!(grid.neighbor(Position::new(0, 0), Direction::Up), Ok(None));
        assert_eq!(grid.neighbor(Position::new(0, 0), Direction::Right), Ok(None));
        assert_eq!(
            grid.neighbor(Position::new(0, 0), Direction::Down),
            Ok(Some(Position::new(0, 1)))
        );
        assert!(grid.neighbor(Position::new(0, 3), Direction::Up).is_err());
    }

    #[test]
    fn test_column_skips_holes() {
        let grid = holed();
        assert_eq!(grid.column(0), vec![Position::new(0, 0), Position::new(0, 1)]);
        assert_eq!(grid.column(1), vec![Position::new(1, 1), Position::new(1, 2)]);
        assert!(grid.column(5).is_empty());
    }

    #[test]
    fn test_swap_and_fill_state() {
        let mut grid = Grid::from_rows(&[vec![R, None, B]]).unwrap();
        assert!(!grid.is_filled());
        assert_eq!(grid.token_count(), 2);
        grid.swap(Position::new(0, 0), Position::new(1, 0)).unwrap();
        assert_eq!(grid.to_rows(), vec![vec![None, R, B]]);
        grid.set(Position::new(0, 0), G).unwrap();
        assert!(grid.is_filled());
    }

    #[test]
    fn test_new_places_presets() {
        let layout = BoardLayout::parse_rows(&["SS", "1."]).unwrap();
        let grid = Grid::new(&layout);
        assert_eq!(grid.get(Position::new(0, 1)), Ok(Some(TokenKind(1))));
        assert_eq!(grid.preset(Position::new(0, 1)), Some(TokenKind(1)));
        assert_eq!(grid.get(Position::new(1, 1)), Ok(None));
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        assert!(matches!(
            Grid::from_rows(&[vec![R, G], vec![B]]),
            Err(LayoutError::Ragged { row: 1, .. })
        ));
    }

    #[test]
    fn test_with_cells_checks_shape() {
        let layout = BoardLayout::parse_rows(&["S#S", "..."]).unwrap();
        let grid = Grid::with_cells(&layout, &[vec![R, None, G], vec![B, R, G]]).unwrap();
        assert_eq!(grid.get(Position::new(2, 1)), Ok(G));

        assert_eq!(
            Grid::with_cells(&layout, &[vec![R, None, G]]),
            Err(LayoutError::RowCount {
                expected: 2,
                found: 1
            })
        );
        assert_eq!(
            Grid::with_cells(&layout, &[vec![R, None, G], vec![B, R]]),
            Err(LayoutError::Ragged {
                row: 1,
                expected: 3,
                found: 2
            })
        );
        // Columns past 255 must not wrap back onto the board.
        let long: Vec<Cell> = (0..259).map(|_| R).collect();
        assert!(matches!(
            Grid::with_cells(&layout, &[long.clone(), long]),
            Err(LayoutError::Ragged { row: 0, found: 259, .. })
        ));
        assert_eq!(
            Grid::with_cells(&layout, &[vec![R, G, B], vec![B, R, G]]),
            Err(LayoutError::TokenOnHole(Position::new(1, 0)))
        );
    }
}
