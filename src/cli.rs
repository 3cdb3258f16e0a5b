use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};

use crate::config::GameConfig;

pub const USAGE: &str = "\
usage: match-three [options]

options:
  --config PATH     load settings from a TOML file (default: $MATCH3_CONFIG)
  --seed N          board and refill seed
  --moves N         moves to play before stopping
  --log PATH        append JSON-lines event records to PATH
  --print-config    print the resolved configuration as TOML and exit
  --quiet           no progress lines on stderr
  -h, --help        show this help";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliArgs {
    pub config: Option<PathBuf>,
    pub seed: Option<u32>,
    pub moves: Option<u32>,
    pub log: Option<PathBuf>,
    pub print_config: bool,
    pub quiet: bool,
    pub help: bool,
}

pub fn parse_args(args: &[String]) -> Result<CliArgs> {
    let mut out = CliArgs::default();
    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("missing value for --config"))?;
                out.config = Some(PathBuf::from(v));
            }
            "--seed" => {
                i += 1;
                let v = args.get(i).ok_or_else(|| anyhow!("missing value for --seed"))?;
                out.seed = Some(
                    v.parse::<u32>()
                        .map_err(|_| anyhow!("invalid --seed value: {}", v))?,
                );
            }
            "--moves" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("missing value for --moves"))?;
                out.moves = Some(
                    v.parse::<u32>()
                        .map_err(|_| anyhow!("invalid --moves value: {}", v))?,
                );
            }
            "--log" => {
                i += 1;
                let v = args.get(i).ok_or_else(|| anyhow!("missing value for --log"))?;
                out.log = Some(PathBuf::from(v));
            }
            "--print-config" => out.print_config = true,
            "--quiet" | "-q" => out.quiet = true,
            "--help" | "-h" => out.help = true,
            other => {
                return Err(anyhow!("unknown argument: {}", other));
            }
        }
        i += 1;
    }
    Ok(out)
}

impl CliArgs {
    /// Overlay flags onto `config`
    pub fn apply(&self, config: &mut GameConfig) {
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(moves) = self.moves {
            config.max_moves = moves;
        }
        if let Some(log) = &self.log {
            config.log_path = Some(log.clone());
        }
        if self.quiet {
            config.quiet = true;
        }
    }

    /// Defaults, then the config file, then `MATCH3_*`, then these flags.
    ///
    /// A file named with `--config` must exist; one named by `MATCH3_CONFIG`
    /// falls back to defaults when missing.
    pub fn resolve_config(&self) -> Result<GameConfig> {
        let mut config = match (&self.config, GameConfig::path_from_env()) {
            (Some(path), _) => GameConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            (None, Some(path)) => GameConfig::load_or_default(&path)
                .with_context(|| format!("loading config {}", path.display()))?,
            (None, None) => GameConfig::default(),
        };
        config.apply_env();
        self.apply(&mut config);
        config.validate().context("invalid configuration")?;
        Ok(config)
    }
}
