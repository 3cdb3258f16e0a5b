//! Headless session runner
//!
//! Plays a configured number of moves against a [`CascadeEngine`], picking a
//! random productive swap each turn, and reports progress as `[Session]` lines
//! on stderr. When a log path is configured every command is also appended to
//! it as a JSON line (see [`crate::wire`]).

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::config::GameConfig;
use crate::core::{CascadeEngine, CascadeReport, RandomTokens, SimpleRng};
use crate::types::Position;
use crate::wire::{BoardRecord, LogRecord, MoveRecord, StartRecord, SummaryRecord};

/// Appends one JSON object per line
pub struct EventLog {
    writer: BufWriter<File>,
    buf: Vec<u8>,
}

impl EventLog {
    pub fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("opening event log {}", path.display()))?;
        Ok(Self {
            writer: BufWriter::new(file),
            buf: Vec::with_capacity(4096),
        })
    }

    pub fn write(&mut self, record: &LogRecord) -> Result<()> {
        self.buf.clear();
        serde_json::to_writer(&mut self.buf, record)?;
        self.buf.push(b'\n');
        self.writer.write_all(&self.buf)?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Totals printed when a session ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub moves: u32,
    pub rejected: u32,
    pub score: u32,
    pub best_chain: u32,
    pub tokens_cleared: u32,
    pub board_hash: u64,
    /// The board ran out of moves before `max_moves`
    pub deadlocked: bool,
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "moves={} rejected={} score={} best_chain={} cleared={} board={:016x}",
            self.moves,
            self.rejected,
            self.score,
            self.best_chain,
            self.tokens_cleared,
            self.board_hash
        )?;
        if self.deadlocked {
            write!(f, " (deadlocked)")?;
        }
        Ok(())
    }
}

pub struct Session {
    engine: CascadeEngine<RandomTokens>,
    /// Picks among the available moves
    chooser: SimpleRng,
    log: Option<EventLog>,
    max_moves: u32,
    quiet: bool,
    seq: u64,
}

impl Session {
    pub fn new(config: &GameConfig) -> Result<Self> {
        let layout = config.layout().context("building board layout")?;
        let palette = config.palette().context("building palette")?;
        let engine = CascadeEngine::seeded(&layout, palette, config.seed)
            .with_context(|| format!("dealing the initial board (seed {})", config.seed))?;

        let log = match &config.log_path {
            Some(path) => Some(EventLog::open(path)?),
            None => None,
        };

        let mut session = Self {
            engine,
            chooser: SimpleRng::new(config.seed.rotate_left(16) ^ 0x9e37_79b9),
            log,
            max_moves: config.max_moves,
            quiet: config.quiet,
            seq: 0,
        };

        session.info(format_args!(
            "dealt {}x{} board (seed {})",
            layout.width(),
            layout.height(),
            config.seed
        ));
        let start = LogRecord::Start(StartRecord {
            seed: config.seed,
            board: BoardRecord::from(&session.engine.snapshot()),
        });
        session.record(&start)?;
        Ok(session)
    }

    pub fn engine(&self) -> &CascadeEngine<RandomTokens> {
        &self.engine
    }

    /// Apply one swap and log it
    pub fn play(&mut self, a: Position, b: Position) -> Result<CascadeReport> {
        let report = self
            .engine
            .propose_swap(a, b)
            .with_context(|| format!("swap {} <-> {}", a, b))?;
        self.seq += 1;

        if report.is_committed() {
            self.info(format_args!(
                "move {}: {} <-> {} +{} ({} round{}, total {})",
                self.seq,
                a,
                b,
                report.score,
                report.rounds,
                if report.rounds == 1 { "" } else { "s" },
                self.engine.score()
            ));
        } else {
            self.info(format_args!("move {}: {} <-> {} rejected", self.seq, a, b));
        }
        if report.count("reshuffled") > 0 {
            self.info(format_args!("no moves left, board reshuffled"));
        }

        let record = LogRecord::Move(MoveRecord::new(
            self.seq,
            a,
            b,
            &report,
            self.engine.snapshot().board_hash,
        ));
        self.record(&record)?;
        Ok(report)
    }

    /// Play up to `max_moves` random productive swaps
    pub fn run(&mut self) -> Result<SessionSummary> {
        let mut deadlocked = false;
        while self.engine.scores().moves() < self.max_moves {
            let moves = crate::core::swap::find_moves(self.engine.grid());
            let Some(choice) = self.chooser.pick(&moves) else {
                self.info(format_args!(
                    "board deadlocked after {} moves",
                    self.engine.scores().moves()
                ));
                deadlocked = true;
                break;
            };
            self.play(choice.a, choice.b)?;
        }
        self.finish(deadlocked)
    }

    /// Write the summary record and flush the log
    pub fn finish(&mut self, deadlocked: bool) -> Result<SessionSummary> {
        let scores = self.engine.scores();
        let summary = SessionSummary {
            moves: scores.moves(),
            rejected: scores.rejected(),
            score: scores.score(),
            best_chain: scores.best_chain(),
            tokens_cleared: scores.tokens_cleared(),
            board_hash: self.engine.snapshot().board_hash,
            deadlocked,
        };

        self.record(&LogRecord::Summary(SummaryRecord {
            moves: summary.moves,
            rejected: summary.rejected,
            score: summary.score,
            best_chain: summary.best_chain,
            tokens_cleared: summary.tokens_cleared,
            board_hash: summary.board_hash,
        }))?;
        if let Some(log) = self.log.as_mut() {
            log.flush().context("flushing event log")?;
        }
        self.info(format_args!("finished: {}", summary));
        Ok(summary)
    }

    fn record(&mut self, record: &LogRecord) -> Result<()> {
        if let Some(log) = self.log.as_mut() {
            log.write(record).context("writing event log")?;
        }
        Ok(())
    }

    fn info(&self, args: fmt::Arguments<'_>) {
        if !self.quiet {
            eprintln!("[Session] {}", args);
        }
    }
}
