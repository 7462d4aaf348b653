//! Integration tests for the Abalone engine.
//!
//! These tests verify the documented scenarios and complete game flows from
//! the opening through to victory.

use abalone_core::*;
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

fn pos(q: i32, r: i32) -> Position {
    Position::new(q, r)
}

fn game(black: &[(i32, i32)], white: &[(i32, i32)], to_move: Color) -> GameState {
    let layout = black
        .iter()
        .map(|&(q, r)| (pos(q, r), Color::Black))
        .chain(white.iter().map(|&(q, r)| (pos(q, r), Color::White)));
    let board = Board::from_layout(BOARD_RADIUS, layout).expect("valid layout");
    GameState::from_position(board, to_move)
}

fn positions_of(state: &GameState, color: Color) -> Vec<Position> {
    let mut cells: Vec<_> = state.board().pieces_of(color).map(|p| p.position).collect();
    cells.sort();
    cells
}

/// Play random legal moves until the game ends or `max_moves` is reached,
/// checking the snapshot invariants after every move.
fn random_playout(seed: u64, max_moves: usize) -> GameState {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut state = GameState::new();

    for turn in 0..max_moves {
        let moves = state.legal_moves();
        let Some(mv) = moves.choose(&mut rng) else {
            break;
        };

        let before = state.board().len();
        let execution = state.execute(mv).expect("generated moves execute");
        let captured = execution.captured().is_some();
        let next = state.apply_turn(execution, turn as u64).expect("apply turn");

        assert!(next.board().is_consistent());
        assert_eq!(next.board().len(), before - usize::from(captured));
        assert_eq!(
            next.captures().black + next.captures().white,
            (28 - next.board().len()) as u32
        );
        for piece in next.board().pieces() {
            let (q, r, s) = piece.position.cube();
            assert_eq!(q + r + s, 0);
            assert!(piece.position.is_on_board(BOARD_RADIUS));
        }
        if !next.is_finished() {
            assert_eq!(next.current_player(), state.current_player().opponent());
        }

        state = next;
        if state.is_finished() {
            break;
        }
    }
    state
}

#[test]
fn test_scenario_simple_inline_move() {
    let state = game(&[(-1, 0), (0, 0)], &[], Color::Black);
    let legal = state.validate(&[pos(-1, 0), pos(0, 0)], Direction::East).unwrap();
    assert_eq!(legal.kind(), MoveKind::Inline);
    assert_eq!(legal.capture(), None);

    let (next, _) = state.play(&[pos(-1, 0), pos(0, 0)], Direction::East, 0).unwrap();
    assert_eq!(positions_of(&next, Color::Black), vec![pos(0, 0), pos(1, 0)]);
}

#[test]
fn test_scenario_two_push_one() {
    let state = game(&[(0, 0), (1, 0)], &[(2, 0)], Color::Black);
    let (next, _) = state.play(&[pos(0, 0), pos(1, 0)], Direction::East, 0).unwrap();

    assert_eq!(positions_of(&next, Color::Black), vec![pos(1, 0), pos(2, 0)]);
    assert_eq!(positions_of(&next, Color::White), vec![pos(3, 0)]);
    assert_eq!(next.captures(), Captures::default());
}

#[test]
fn test_scenario_push_off_board() {
    let state = game(&[(2, 0), (3, 0)], &[(4, 0)], Color::Black);
    let (next, events) = state.play(&[pos(2, 0), pos(3, 0)], Direction::East, 0).unwrap();

    assert_eq!(positions_of(&next, Color::Black), vec![pos(3, 0), pos(4, 0)]);
    assert!(positions_of(&next, Color::White).is_empty());
    assert_eq!(next.captures().white, 1);
    assert_eq!(next.captures().black, 0);
    assert!(events
        .iter()
        .any(|e| matches!(e, GameEvent::PieceCaptured { color: Color::White, .. })));
}

#[test]
fn test_scenario_broadside_blocked_leaves_snapshot_unchanged() {
    let state = game(&[(0, 0), (1, 0)], &[(1, 1)], Color::Black);
    let before = state.clone();

    let err = state
        .play(&[pos(0, 0), pos(1, 0)], Direction::SouthEast, 0)
        .unwrap_err();
    assert_eq!(err, GameError::Illegal(IllegalMove::BroadsideBlocked));
    assert_eq!(state, before);
}

#[test]
fn test_two_against_two_blocked_even_with_space_behind() {
    let state = game(&[(-2, 0), (-1, 0)], &[(0, 0), (1, 0)], Color::Black);
    assert_eq!(
        state.validate(&[pos(-2, 0), pos(-1, 0)], Direction::East).unwrap_err(),
        GameError::Illegal(IllegalMove::Outnumbered)
    );
}

#[test]
fn test_selection_order_does_not_matter() {
    let state = game(&[(-1, 0), (0, 0), (1, 0)], &[(2, 0)], Color::Black);
    let ordered = state.play(&[pos(-1, 0), pos(0, 0), pos(1, 0)], Direction::East, 0);
    let middle_first = state.play(&[pos(0, 0), pos(1, 0), pos(-1, 0)], Direction::East, 0);

    let (a, _) = ordered.unwrap();
    let (b, _) = middle_first.unwrap();
    assert_eq!(a.board(), b.board());
    assert_eq!(a.history()[0].group, vec![pos(-1, 0), pos(0, 0), pos(1, 0)]);
}

/// Same snapshot with a different loss tally, set through the public JSON form
fn with_losses(state: GameState, captures: Captures) -> GameState {
    let mut json = serde_json::to_value(&state).unwrap();
    json["captures"] = serde_json::to_value(captures).unwrap();
    serde_json::from_value(json).unwrap()
}

#[test]
fn test_sixth_loss_ends_the_game() {
    let start = game(&[(2, 0), (3, 0)], &[(4, 0)], Color::Black);

    let five = with_losses(start.clone(), Captures { black: 0, white: 4 });
    let (next, _) = five.play(&[pos(2, 0), pos(3, 0)], Direction::East, 0).unwrap();
    assert_eq!(next.captures().white, 5);
    assert_eq!(next.status(), GameStatus::InProgress);
    assert_eq!(next.current_player(), Color::White);

    let six = with_losses(start, Captures { black: 0, white: 5 });
    let (next, events) = six.play(&[pos(2, 0), pos(3, 0)], Direction::East, 0).unwrap();
    assert_eq!(next.status(), GameStatus::Won { winner: Color::Black });
    assert!(events.contains(&GameEvent::GameWon {
        winner: Color::Black,
        captures: 6
    }));
}

#[test]
fn test_white_wins_when_black_loses_six() {
    let state = game(&[(-4, 0)], &[(-2, 0), (-3, 0)], Color::White);
    let state = with_losses(state, Captures { black: 5, white: 0 });
    let (next, _) = state.play(&[pos(-2, 0), pos(-3, 0)], Direction::West, 0).unwrap();
    assert_eq!(next.winner(), Some(Color::White));
}

#[test]
fn test_game_rejects_moves_after_draw() {
    let state = GameState::new();
    let (drawn, _) = state.apply_action(&GameAction::AgreeDraw, 0).unwrap();
    let action = GameAction::Move {
        group: vec![pos(-2, 2)],
        direction: Direction::NorthEast,
    };
    assert_eq!(drawn.apply_action(&action, 0).unwrap_err(), GameError::GameOver);
}

#[test]
fn test_history_records_moves_in_order() {
    let state = GameState::new();
    let (s1, _) = state.play(&[pos(-2, 2)], Direction::NorthEast, 10).unwrap();
    let (s2, _) = s1.play(&[pos(0, -2)], Direction::SouthWest, 20).unwrap();

    let history = s2.history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].player, Color::Black);
    assert_eq!(history[0].timestamp, 10);
    assert_eq!(history[1].player, Color::White);
    assert_eq!(history[1].direction, Direction::SouthWest);
}

#[test]
fn test_random_playouts_keep_invariants() {
    for seed in 0..8 {
        let state = random_playout(seed, 300);
        assert!(state.board().len() >= 28 - 2 * 6 + 1);
    }
}

#[test]
fn test_playouts_are_deterministic() {
    let a = random_playout(42, 120);
    let b = random_playout(42, 120);
    assert_eq!(a, b);
}
