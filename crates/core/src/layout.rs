//! Layout module - board shape and token palette
//!
//! A [`BoardLayout`] fixes which cells exist (`Invalid` holes, `Playable`
//! cells, `Spawn` cells at the top of each column) and which cells start with a
//! preset token. A [`Palette`] lists the token kinds a session draws from and
//! what each is worth when cleared.
//!
//! Layouts can be written three ways:
//!
//! - [`BoardLayout::rectangular`]: a plain `w x h` board, row 0 spawns
//! - [`BoardLayout::parse_rows`]: one string per row, `#` hole, `.` playable,
//!   `S` spawn, `0-9` playable cell with a preset kind
//! - [`BoardLayout::from_codes`]: legacy integer codes, `-1` hole, `-2`
//!   playable, `-3` spawn, `-4` random playable, `n >= 0` preset kind `n`

use crate::error::LayoutError;
use crate::grid::Grid;
use crate::matcher;
use crate::types::{
    Cell, CellClass, Position, TokenKind, DEFAULT_PALETTE_SIZE, DEFAULT_TOKEN_POINTS,
    MAX_TOKEN_KINDS,
};

/// Row strings of the stock 7x10 board.
pub const STARTER_ROWS: [&str; 10] = [
    "#SS#SS#", "S..S..S", ".......", ".......", ".......", "#..#..#", ".......", ".......",
    ".......", "#22...#",
];

const DEFAULT_NAMES: [&str; DEFAULT_PALETTE_SIZE] =
    ["red", "green", "blue", "yellow", "purple", "orange"];

/// One entry of the palette
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSpec {
    pub name: String,
    pub points: u32,
}

impl TokenSpec {
    pub fn new(name: impl Into<String>, points: u32) -> Self {
        Self {
            name: name.into(),
            points,
        }
    }
}

/// Ordered token palette; `TokenKind(i)` refers to entry `i`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    tokens: Vec<TokenSpec>,
}

impl Palette {
    pub fn new(tokens: Vec<TokenSpec>) -> Result<Self, LayoutError> {
        if tokens.len() > MAX_TOKEN_KINDS {
            return Err(LayoutError::PaletteTooLarge(tokens.len()));
        }
        Ok(Self { tokens })
    }

    /// `count` anonymous kinds worth `points` each
    pub fn uniform(count: usize, points: u32) -> Result<Self, LayoutError> {
        Self::new(
            (0..count)
                .map(|i| TokenSpec::new(format!("kind{}", i), points))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// All kinds in palette order
    pub fn kinds(&self) -> impl Iterator<Item = TokenKind> + '_ {
        (0..self.tokens.len()).map(|i| TokenKind(i as u8))
    }

    pub fn contains(&self, kind: TokenKind) -> bool {
        kind.index() < self.tokens.len()
    }

    /// Points for clearing one token of `kind`; kinds outside the palette score nothing
    pub fn points(&self, kind: TokenKind) -> u32 {
        self.tokens.get(kind.index()).map_or(0, |t| t.points)
    }

    pub fn name(&self, kind: TokenKind) -> Option<&str> {
        self.tokens.get(kind.index()).map(|t| t.name.as_str())
    }

    /// Look a kind up by name (case-insensitive)
    pub fn kind_named(&self, name: &str) -> Option<TokenKind> {
        self.tokens
            .iter()
            .position(|t| t.name.eq_ignore_ascii_case(name))
            .map(|i| TokenKind(i as u8))
    }

    pub fn tokens(&self) -> &[TokenSpec] {
        &self.tokens
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            tokens: DEFAULT_NAMES
                .iter()
                .map(|name| TokenSpec::new(*name, DEFAULT_TOKEN_POINTS))
                .collect(),
        }
    }
}

/// Board shape plus preset tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardLayout {
    width: u8,
    height: u8,
    /// Row-major (row * width + col)
    classes: Vec<CellClass>,
    presets: Vec<Cell>,
}

impl BoardLayout {
    /// Build from row-major classes and presets, checking the column rules
    pub fn new(
        width: usize,
        height: usize,
        classes: Vec<CellClass>,
        presets: Vec<Cell>,
    ) -> Result<Self, LayoutError> {
        if width == 0 || height == 0 {
            return Err(LayoutError::Empty);
        }
        if width > u8::MAX as usize || height > u8::MAX as usize {
            return Err(LayoutError::TooLarge { width, height });
        }
        for found in [classes.len(), presets.len()] {
            if found != width * height {
                return Err(LayoutError::CellCount {
                    expected: width * height,
                    found,
                });
            }
        }

        let layout = Self {
            width: width as u8,
            height: height as u8,
            classes,
            presets,
        };
        layout.check_columns()?;
        Ok(layout)
    }

    /// Plain rectangular board whose top row spawns
    pub fn rectangular(width: usize, height: usize) -> Result<Self, LayoutError> {
        let classes = (0..width * height)
            .map(|i| {
                if i < width {
                    CellClass::Spawn
                } else {
                    CellClass::Playable
                }
            })
            .collect();
        Self::new(width, height, classes, vec![None; width * height])
    }

    /// Parse `#`, `.`, `S` and digit rows
    pub fn parse_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, LayoutError> {
        let (width, height) = dimensions(rows.iter().map(|r| r.as_ref().chars().count()))?;
        let mut classes = Vec::with_capacity(width * height);
        let mut presets = Vec::with_capacity(width * height);

        for (row, line) in rows.iter().enumerate() {
            for (col, ch) in line.as_ref().chars().enumerate() {
                let (class, preset) = match ch {
                    '#' => (CellClass::Invalid, None),
                    '.' => (CellClass::Playable, None),
                    'S' | 's' => (CellClass::Spawn, None),
                    d if d.is_ascii_digit() => {
                        (CellClass::Playable, Some(TokenKind(d as u8 - b'0')))
                    }
                    other => {
                        return Err(LayoutError::UnknownCode {
                            code: other.to_string(),
                            col,
                            row,
                        })
                    }
                };
                classes.push(class);
                presets.push(preset);
            }
        }
        Self::new(width, height, classes, presets)
    }

    /// Parse legacy integer cell codes, one slice per row
    pub fn from_codes<R: AsRef<[i32]>>(rows: &[R]) -> Result<Self, LayoutError> {
        let (width, height) = dimensions(rows.iter().map(|r| r.as_ref().len()))?;
        let mut classes = Vec::with_capacity(width * height);
        let mut presets = Vec::with_capacity(width * height);

        for (row, codes) in rows.iter().enumerate() {
            for (col, &code) in codes.as_ref().iter().enumerate() {
                let (class, preset) = match code {
                    -1 => (CellClass::Invalid, None),
                    -2 | -4 => (CellClass::Playable, None),
                    -3 => (CellClass::Spawn, None),
                    n if n >= 0 && (n as usize) < MAX_TOKEN_KINDS => {
                        (CellClass::Playable, Some(TokenKind(n as u8)))
                    }
                    other => {
                        return Err(LayoutError::UnknownCode {
                            code: other.to_string(),
                            col,
                            row,
                        })
                    }
                };
                classes.push(class);
                presets.push(preset);
            }
        }
        Self::new(width, height, classes, presets)
    }

    /// The stock 7x10 board with holes and two preset tokens
    pub fn starter() -> Self {
        match Self::parse_rows(&STARTER_ROWS) {
            Ok(layout) => layout,
            Err(err) => unreachable!("starter layout is well formed: {}", err),
        }
    }

    /// Check the layout against a palette: presets must exist in it and must
    /// not already line up into a match.
    pub fn validate(&self, palette: &Palette) -> Result<(), LayoutError> {
        for (i, preset) in self.presets.iter().enumerate() {
            if let Some(kind) = preset {
                if !palette.contains(*kind) {
                    return Err(LayoutError::PresetOutOfPalette {
                        pos: self.position_of(i),
                        kind: kind.0,
                        kinds: palette.len(),
                    });
                }
            }
        }

        let grid = Grid::new(self);
        if let Some(found) = matcher::all_matches(&grid).first() {
            return Err(LayoutError::PresetMatch(found.start));
        }
        Ok(())
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    pub fn classes(&self) -> &[CellClass] {
        &self.classes
    }

    pub fn presets(&self) -> &[Cell] {
        &self.presets
    }

    /// Class at `pos`, `None` when out of bounds
    pub fn class(&self, pos: Position) -> Option<CellClass> {
        self.index(pos).map(|i| self.classes[i])
    }

    pub fn preset(&self, pos: Position) -> Option<TokenKind> {
        self.index(pos).and_then(|i| self.presets[i])
    }

    /// Render back to `parse_rows` form
    pub fn to_rows(&self) -> Vec<String> {
        (0..self.height as usize)
            .map(|row| {
                (0..self.width as usize)
                    .map(|col| {
                        let i = row * self.width as usize + col;
                        match (self.classes[i], self.presets[i]) {
                            (CellClass::Invalid, _) => '#',
                            (CellClass::Spawn, _) => 'S',
                            (CellClass::Playable, Some(kind)) if kind.0 < 10 => {
                                (b'0' + kind.0) as char
                            }
                            (CellClass::Playable, _) => '.',
                        }
                    })
                    .collect()
            })
            .collect()
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if pos.col >= self.width || pos.row >= self.height {
            return None;
        }
        Some(pos.row as usize * self.width as usize + pos.col as usize)
    }

    fn position_of(&self, index: usize) -> Position {
        let width = self.width as usize;
        Position::new((index % width) as u8, (index / width) as u8)
    }

    /// Every column with playable cells is fed by exactly one spawn, which
    /// must be its topmost playable cell. Presets only on playable cells.
    fn check_columns(&self) -> Result<(), LayoutError> {
        let width = self.width as usize;
        for col in 0..self.width {
            let mut seen_playable = false;
            for row in 0..self.height {
                let i = row as usize * width + col as usize;
                match self.classes[i] {
                    CellClass::Invalid if self.presets[i].is_some() => {
                        return Err(LayoutError::TokenOnHole(Position::new(col, row)));
                    }
                    CellClass::Invalid => {}
                    CellClass::Spawn if seen_playable => {
                        return Err(LayoutError::MisplacedSpawn { col, row });
                    }
                    CellClass::Spawn => seen_playable = true,
                    CellClass::Playable if !seen_playable => {
                        return Err(LayoutError::MissingSpawn(col));
                    }
                    CellClass::Playable => {}
                }
            }
        }
        Ok(())
    }
}

fn dimensions(lengths: impl Iterator<Item = usize>) -> Result<(usize, usize), LayoutError> {
    let mut width = None;
    let mut height = 0;
    for (row, len) in lengths.enumerate() {
        match width {
            None => width = Some(len),
            Some(expected) if expected != len => {
                return Err(LayoutError::Ragged {
                    row,
                    expected,
                    found: len,
                });
            }
            Some(_) => {}
        }
        height += 1;
    }
    match width {
        Some(w) if w > 0 => Ok((w, height)),
        _ => Err(LayoutError::Empty),
    }
}
