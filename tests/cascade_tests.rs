//! Settle cascade properties through the facade

use match_three::core::{
    matcher, shuffle, swap, BoardLayout, CascadeEngine, CascadeEvent, EngineError, EngineState,
    Grid, Palette, ScriptedTokens, SimpleRng, SwapError, SwapOutcome,
};
use match_three::types::{Cell, Position, TokenKind, MIN_MATCH_LEN};

const RED: TokenKind = TokenKind(0);
const GREEN: TokenKind = TokenKind(1);
const BLUE: TokenKind = TokenKind(2);

fn column_engine(kinds: &[TokenKind], refill: TokenKind) -> CascadeEngine<ScriptedTokens> {
    let rows: Vec<Vec<Cell>> = kinds.iter().map(|&k| vec![Some(k)]).collect();
    let grid = Grid::from_rows(&rows).unwrap();
    CascadeEngine::with_grid(grid, Palette::default(), ScriptedTokens::repeat(refill))
}

#[test]
fn rejected_swap_leaves_board_identical() {
    let grid = Grid::from_rows(&[vec![Some(RED), Some(RED), Some(BLUE)]]).unwrap();
    let mut engine =
        CascadeEngine::with_grid(grid.clone(), Palette::default(), ScriptedTokens::repeat(GREEN));

    let report = engine
        .propose_swap(Position::new(1, 0), Position::new(2, 0))
        .unwrap();
    assert_eq!(report.outcome, SwapOutcome::Rejected);
    assert_eq!(report.score, 0);
    assert_eq!(engine.grid(), &grid);
    assert_eq!(engine.snapshot().board_hash, match_three::core::snapshot::board_hash(&grid));
}

#[test]
fn forced_clear_in_a_column_drops_and_refills_once() {
    let mut engine = column_engine(&[RED, BLUE, RED], GREEN);
    let report = engine.force_clear(&[Position::new(0, 1)]).unwrap();

    let column: Vec<_> = (0..3)
        .map(|row| engine.grid().token(Position::new(0, row)))
        .collect();
    assert_eq!(column, vec![Some(GREEN), Some(RED), Some(RED)]);
    assert_eq!(report.count("dropped"), 1);
    assert_eq!(report.count("refilled"), 1);
}

#[test]
fn out_of_bounds_and_distant_swaps_fail() {
    let mut engine = column_engine(&[RED, BLUE, RED], GREEN);
    assert_eq!(
        engine.propose_swap(Position::new(0, 0), Position::new(0, 5)),
        Err(EngineError::Swap(SwapError::OutOfBounds(Position::new(0, 5))))
    );
    assert_eq!(
        engine.propose_swap(Position::new(0, 0), Position::new(0, 2)),
        Err(EngineError::Swap(SwapError::NotAdjacent {
            a: Position::new(0, 0),
            b: Position::new(0, 2)
        }))
    );
    assert_eq!(engine.state(), EngineState::Idle);
}

#[test]
fn populated_boards_have_no_matches() {
    for seed in 1..30 {
        let mut grid = Grid::new(&BoardLayout::starter());
        shuffle::populate(&mut grid, &Palette::default(), &mut SimpleRng::new(seed)).unwrap();
        assert!(matcher::all_matches(&grid).is_empty(), "seed {}", seed);
        assert!(grid.is_filled());
    }
}

#[test]
fn every_settle_ends_stable_and_full() {
    for seed in [2, 11, 40] {
        let mut engine =
            CascadeEngine::seeded(&BoardLayout::starter(), Palette::default(), seed).unwrap();
        let mut chooser = SimpleRng::new(seed);

        for _ in 0..15 {
            let moves = swap::find_moves(engine.grid());
            let Some(choice) = chooser.pick(&moves) else {
                break;
            };
            let report = engine.propose_swap(choice.a, choice.b).unwrap();
            assert_eq!(report.outcome, SwapOutcome::Committed);
            assert_eq!(
                report.events.first(),
                Some(&CascadeEvent::Swapped {
                    a: choice.a,
                    b: choice.b
                })
            );
            assert_eq!(report.events.last(), Some(&CascadeEvent::SettleComplete));

            // Matches are maximal and at least three long.
            for event in &report.events {
                if let CascadeEvent::Cleared { positions, points, .. } = event {
                    assert!(positions.len() >= MIN_MATCH_LEN);
                    assert!(*points <= positions.len() as u32 * 30);
                }
            }

            assert!(matcher::all_matches(engine.grid()).is_empty());
            assert!(engine.grid().is_filled());
            assert!(!engine.is_deadlocked());
        }
        assert_eq!(engine.scores().rejected(), 0);
    }
}

#[test]
fn score_is_the_sum_of_cleared_points() {
    let mut engine =
        CascadeEngine::seeded(&BoardLayout::starter(), Palette::default(), 8).unwrap();
    let mut total = 0;
    for _ in 0..10 {
        let Some(hint) = engine.hint() else { break };
        let report = engine.propose_swap(hint.a, hint.b).unwrap();
        let points: u32 = report
            .events
            .iter()
            .map(|e| match e {
                CascadeEvent::Cleared { points, .. } => *points,
                _ => 0,
            })
            .sum();
        assert_eq!(points, report.score);
        total += report.score;
    }
    assert_eq!(engine.score(), total);
}

#[test]
fn commands_run_only_when_idle() {
    let grid = Grid::from_rows(&[vec![Some(GREEN), Some(BLUE), Some(GREEN)]]).unwrap();
    let mut engine =
        CascadeEngine::with_grid(grid, Palette::default(), ScriptedTokens::repeat(RED));
    assert_eq!(engine.round_limit(), 3);

    let err = engine
        .force_clear(&[Position::new(0, 0), Position::new(1, 0), Position::new(2, 0)])
        .unwrap_err();
    assert_eq!(err, EngineError::CascadeOverflow { limit: 3 });
    assert!(matches!(
        engine.force_clear(&[Position::new(0, 0)]),
        Err(EngineError::Busy(_))
    ));

    engine.reset().unwrap();
    assert_eq!(engine.state(), EngineState::Idle);
    assert_eq!(engine.score(), 0);
}
