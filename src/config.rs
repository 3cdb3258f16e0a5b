//! Session configuration
//!
//! Sources, lowest precedence first: built-in defaults, a TOML file, `MATCH3_*`
//! environment variables, then command-line flags (see [`crate::cli`]).
//!
//! ```toml
//! seed = 7
//! max_moves = 50
//!
//! [[palette]]
//! name = "red"
//! points = 30
//!
//! [board]
//! rows = ["SSS", "...", "..."]
//! ```

use std::env;
use std::path::{Path, PathBuf};

use crate::core::{BoardLayout, LayoutError, Palette, TokenSpec, STARTER_ROWS};
use crate::types::{DEFAULT_TOKEN_POINTS, MAX_TOKEN_KINDS};

pub const ENV_CONFIG: &str = "MATCH3_CONFIG";
pub const ENV_SEED: &str = "MATCH3_SEED";
pub const ENV_MOVES: &str = "MATCH3_MOVES";
pub const ENV_LOG_PATH: &str = "MATCH3_LOG_PATH";
pub const ENV_QUIET: &str = "MATCH3_QUIET";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("failed to write TOML: {0}")]
    TomlWrite(#[from] toml::ser::Error),

    #[error("config validation error: {0}")]
    Validation(String),

    #[error("board layout error: {0}")]
    Layout(#[from] LayoutError),
}

/// One palette entry as written in TOML
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TokenConfig {
    pub name: String,
    #[serde(default = "default_points")]
    pub points: u32,
}

fn default_points() -> u32 {
    DEFAULT_TOKEN_POINTS
}

/// Board shape in `parse_rows` notation
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub rows: Vec<String>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            rows: STARTER_ROWS.iter().map(|r| r.to_string()).collect(),
        }
    }
}

/// Top-level configuration, loadable from TOML
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub seed: u32,
    /// Moves the runner plays before stopping
    pub max_moves: u32,
    /// JSON-lines event log; no log when unset
    pub log_path: Option<PathBuf>,
    pub quiet: bool,
    pub palette: Vec<TokenConfig>,
    pub board: BoardConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        let palette = Palette::default()
            .tokens()
            .iter()
            .map(|t| TokenConfig {
                name: t.name.clone(),
                points: t.points,
            })
            .collect();
        Self {
            seed: 1,
            max_moves: 30,
            log_path: None,
            quiet: false,
            palette,
            board: BoardConfig::default(),
        }
    }
}

impl GameConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: GameConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            eprintln!(
                "[Config] config file '{}' not found, using defaults",
                path.display()
            );
            Ok(Self::default())
        }
    }

    /// Validate configuration values, board and palette included.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_moves == 0 {
            return Err(ConfigError::Validation("max_moves must be > 0".into()));
        }
        if self.palette.is_empty() {
            return Err(ConfigError::Validation(
                "palette must list at least one token".into(),
            ));
        }
        if self.palette.len() > MAX_TOKEN_KINDS {
            return Err(ConfigError::Validation(format!(
                "palette may list at most {} tokens",
                MAX_TOKEN_KINDS
            )));
        }
        for (i, token) in self.palette.iter().enumerate() {
            if token.name.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "palette[{}].name must not be empty",
                    i
                )));
            }
            if self.palette[..i].iter().any(|t| t.name == token.name) {
                return Err(ConfigError::Validation(format!(
                    "palette name '{}' is listed twice",
                    token.name
                )));
            }
        }
        if self.board.rows.is_empty() {
            return Err(ConfigError::Validation(
                "board.rows must list at least one row".into(),
            ));
        }

        let palette = self.palette()?;
        self.layout()?.validate(&palette)?;
        Ok(())
    }

    pub fn palette(&self) -> Result<Palette, ConfigError> {
        let tokens = self
            .palette
            .iter()
            .map(|t| TokenSpec::new(t.name.clone(), t.points))
            .collect();
        Ok(Palette::new(tokens)?)
    }

    pub fn layout(&self) -> Result<BoardLayout, ConfigError> {
        Ok(BoardLayout::parse_rows(&self.board.rows)?)
    }

    /// Apply `MATCH3_*` overrides from the process environment
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    /// Apply `MATCH3_*` overrides from `lookup`. Unparsable values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(seed) = lookup(ENV_SEED).and_then(|s| s.trim().parse().ok()) {
            self.seed = seed;
        }
        if let Some(moves) = lookup(ENV_MOVES).and_then(|s| s.trim().parse().ok()) {
            self.max_moves = moves;
        }
        if let Some(path) = lookup(ENV_LOG_PATH)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
        {
            self.log_path = Some(PathBuf::from(path));
        }
        if let Some(quiet) = lookup(ENV_QUIET) {
            self.quiet = quiet == "1" || quiet.eq_ignore_ascii_case("true");
        }
    }

    /// Config file named by `MATCH3_CONFIG`, if set
    pub fn path_from_env() -> Option<PathBuf> {
        env::var(ENV_CONFIG)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&GameConfig::default()).expect("default config serializes")
    }
}
