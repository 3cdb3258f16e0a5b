//! Wire module - JSON-lines records for event logs and external players
//!
//! Every line of a session log is one [`LogRecord`], tagged by `type`:
//! `start` (initial board), `move` (one command and its cascade) and
//! `summary`. Positions are `{"col": c, "row": r}`; board cells use the
//! snapshot byte codes (0 empty, `k + 1` kind `k`, 255 hole).

use serde::{Deserialize, Serialize};

use crate::core::{BoardSnapshot, CascadeEvent, CascadeReport, SwapOutcome};
use crate::types::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PosRecord {
    pub col: u8,
    pub row: u8,
}

impl From<Position> for PosRecord {
    fn from(pos: Position) -> Self {
        Self {
            col: pos.col,
            row: pos.row,
        }
    }
}

impl From<PosRecord> for Position {
    fn from(pos: PosRecord) -> Self {
        Position::new(pos.col, pos.row)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EventRecord {
    Swapped {
        a: PosRecord,
        b: PosRecord,
    },
    SwapReverted {
        a: PosRecord,
        b: PosRecord,
    },
    Cleared {
        positions: Vec<PosRecord>,
        kind: u8,
        points: u32,
    },
    Dropped {
        from: PosRecord,
        to: PosRecord,
        kind: u8,
    },
    Refilled {
        pos: PosRecord,
        kind: u8,
    },
    /// Row-major kinds; `null` for empty cells and holes
    Reshuffled {
        tokens: Vec<Option<u8>>,
    },
    SettleComplete,
}

impl From<&CascadeEvent> for EventRecord {
    fn from(event: &CascadeEvent) -> Self {
        match event {
            CascadeEvent::Swapped { a, b } => EventRecord::Swapped {
                a: (*a).into(),
                b: (*b).into(),
            },
            CascadeEvent::SwapReverted { a, b } => EventRecord::SwapReverted {
                a: (*a).into(),
                b: (*b).into(),
            },
            CascadeEvent::Cleared {
                positions,
                kind,
                points,
            } => EventRecord::Cleared {
                positions: positions.iter().map(|&p| p.into()).collect(),
                kind: kind.0,
                points: *points,
            },
            CascadeEvent::Dropped { from, to, kind } => EventRecord::Dropped {
                from: (*from).into(),
                to: (*to).into(),
                kind: kind.0,
            },
            CascadeEvent::Refilled { pos, kind } => EventRecord::Refilled {
                pos: (*pos).into(),
                kind: kind.0,
            },
            CascadeEvent::Reshuffled { tokens } => EventRecord::Reshuffled {
                tokens: tokens.iter().map(|cell| cell.map(|k| k.0)).collect(),
            },
            CascadeEvent::SettleComplete => EventRecord::SettleComplete,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeRecord {
    Committed,
    Rejected,
}

impl From<SwapOutcome> for OutcomeRecord {
    fn from(outcome: SwapOutcome) -> Self {
        match outcome {
            SwapOutcome::Committed => OutcomeRecord::Committed,
            SwapOutcome::Rejected => OutcomeRecord::Rejected,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardRecord {
    pub width: u8,
    pub height: u8,
    pub cells: Vec<u8>,
    pub board_hash: u64,
}

impl From<&BoardSnapshot> for BoardRecord {
    fn from(snap: &BoardSnapshot) -> Self {
        Self {
            width: snap.width,
            height: snap.height,
            cells: snap.cells.clone(),
            board_hash: snap.board_hash,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartRecord {
    pub seed: u32,
    pub board: BoardRecord,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub seq: u64,
    pub a: PosRecord,
    pub b: PosRecord,
    pub outcome: OutcomeRecord,
    pub score: u32,
    pub rounds: u32,
    pub events: Vec<EventRecord>,
    /// Hash of the board after the move settled
    pub board_hash: u64,
}

impl MoveRecord {
    pub fn new(
        seq: u64,
        a: Position,
        b: Position,
        report: &CascadeReport,
        board_hash: u64,
    ) -> Self {
        Self {
            seq,
            a: a.into(),
            b: b.into(),
            outcome: report.outcome.into(),
            score: report.score,
            rounds: report.rounds,
            events: report.events.iter().map(EventRecord::from).collect(),
            board_hash,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub moves: u32,
    pub rejected: u32,
    pub score: u32,
    pub best_chain: u32,
    pub tokens_cleared: u32,
    pub board_hash: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LogRecord {
    Start(StartRecord),
    Move(MoveRecord),
    Summary(SummaryRecord),
}
