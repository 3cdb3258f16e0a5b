use std::io::{BufRead, BufReader};

use match_three::config::GameConfig;
use match_three::session::Session;
use match_three::wire::{EventRecord, LogRecord, OutcomeRecord};

#[test]
fn session_writes_one_json_line_per_record() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("events.jsonl");

    let config = GameConfig {
        seed: 21,
        max_moves: 5,
        quiet: true,
        log_path: Some(path.clone()),
        ..GameConfig::default()
    };
    let summary = Session::new(&config).unwrap().run().unwrap();

    let file = std::fs::File::open(&path).unwrap();
    let records: Vec<LogRecord> = BufReader::new(file)
        .lines()
        .map(|line| serde_json::from_str(&line.unwrap()).unwrap())
        .collect();

    assert!(matches!(records.first(), Some(LogRecord::Start(start)) if start.seed == 21));
    let Some(LogRecord::Summary(last)) = records.last() else {
        panic!("log should end with a summary");
    };
    assert_eq!(last.moves, summary.moves);
    assert_eq!(last.score, summary.score);
    assert_eq!(last.board_hash, summary.board_hash);

    let moves: Vec<_> = records
        .iter()
        .filter_map(|r| match r {
            LogRecord::Move(m) => Some(m),
            _ => None,
        })
        .collect();
    assert_eq!(moves.len() as u32, summary.moves);
    for (i, m) in moves.iter().enumerate() {
        assert_eq!(m.seq, i as u64 + 1);
        assert_eq!(m.outcome, OutcomeRecord::Committed);
        assert!(matches!(m.events.first(), Some(EventRecord::Swapped { .. })));
        assert_eq!(m.events.last(), Some(&EventRecord::SettleComplete));
    }
}

#[test]
fn session_log_appends() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("events.jsonl");
    let config = GameConfig {
        max_moves: 1,
        quiet: true,
        log_path: Some(path.clone()),
        ..GameConfig::default()
    };

    Session::new(&config).unwrap().run().unwrap();
    let first = std::fs::read_to_string(&path).unwrap().lines().count();
    Session::new(&config).unwrap().run().unwrap();
    let second = std::fs::read_to_string(&path).unwrap().lines().count();
    assert_eq!(second, first * 2);
}
