//! Integration tests for the board and the rules of play.
//!
//! Grids are written one string per row, top row first, with
//! `X` Black, `#` Grey, `O` White and `.` empty.

use trigo::board::Board;
use trigo::error::GoError;
use trigo::player::{Budget, MoveProvider};
use trigo::random::RandomPlayer;
use trigo::state::{Color, GameState};

// =============================================================================
// Helper functions
// =============================================================================

fn grid(rows: &[&str]) -> GameState {
    GameState::deserialize(&rows.join(";"), ";").unwrap()
}

/// Play a seeded random game for `turns` turns, calling `check` after each one.
fn random_game(w: usize, h: usize, seed: u64, turns: usize, mut check: impl FnMut(&GameState)) {
    let mut state = GameState::new(Board::new(w, h).unwrap());
    let mut players: Vec<RandomPlayer> = Color::PLAYERS
        .iter()
        .enumerate()
        .map(|(i, &c)| RandomPlayer::with_seed(c, seed + i as u64))
        .collect();

    for _ in 0..turns {
        let slot = state.turn().slot().unwrap();
        if players[slot].select_move(&mut state, Budget::Unbounded).is_none() {
            state.pass_turn();
        }
        check(&state);
    }
}

// =============================================================================
// Board geometry
// =============================================================================

#[test]
fn test_contains_matches_bounds() {
    let board = Board::new(4, 3).unwrap();
    for x in -2..6i64 {
        for y in -2..5i64 {
            let inside = (0..4).contains(&x) && (0..3).contains(&y);
            assert_eq!(board.contains_coords(&[x, y]), inside, "({x}, {y})");
        }
    }
    assert!(!board.contains_coords(&[1]));
    assert!(!board.contains_coords(&[1, 1, 1]));
}

#[test]
fn test_neighbors_stay_on_board() {
    let board = Board::new(5, 4).unwrap();
    for pt in board.points() {
        let n4: Vec<_> = board.neighbors4(pt).collect();
        assert!(!n4.contains(&pt));
        assert!(n4.iter().all(|&n| board.contains(n)));
        assert!((2..=4).contains(&n4.len()));

        let n8: Vec<_> = board.neighbors8(pt).collect();
        assert!(!n8.contains(&pt));
        assert!(n8.iter().all(|&n| board.contains(n)));
        assert!(n4.iter().all(|n| n8.contains(n)));
    }
}

#[test]
fn test_size_validation() {
    assert_eq!(Board::check_size(&[19, 19]), Ok((19, 19)));
    assert!(matches!(Board::check_size(&[19]), Err(GoError::InvalidSize(_))));
    assert!(matches!(Board::check_size(&[0, 5]), Err(GoError::InvalidSize(_))));
    assert!(matches!(Board::check_size(&[5, -1]), Err(GoError::InvalidSize(_))));
    assert!(Board::new(0, 3).is_err());
}

#[test]
fn test_wrong_dimensionality_is_invalid_coordinate() {
    let board = Board::new(3, 3).unwrap();
    assert!(matches!(
        board.point_from_coords(&[1, 1, 1]),
        Err(GoError::InvalidCoordinate(_))
    ));
    assert_eq!(board.point_from_coords(&[3, 0]), Err(GoError::OutOfBounds((3, 0))));
    assert_eq!(board.point_from_coords(&[2, 1]), Ok((2, 1)));
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_first_move_on_small_board() {
    let mut state = GameState::new(Board::new(2, 2).unwrap());
    assert_eq!(state.turn(), Color::Black);
    assert_eq!(state.play((1, 1)), Ok(0));
    assert_eq!(state.get((1, 1)), Color::Black);
    assert_eq!(state.turn(), Color::Grey);
}

#[test]
fn test_surrounded_point_is_suicide() {
    let mut state = grid(&["XXX..", "XOX..", "XXX..", ".....", "....."]);
    assert_eq!(state.liberty_count((1, 1)), 0);

    state.set((1, 1), Color::Empty).unwrap();
    state.set_turn(Color::White);
    let before = state.clone();
    assert_eq!(state.play((1, 1)), Err(GoError::SuicideMove((1, 1))));
    assert_eq!(state, before);
}

#[test]
fn test_capture_two_stone_group() {
    let mut state = grid(&[".X...", "OX...", "OX...", "X...."]);
    assert_eq!(state.play((0, 0)), Ok(2));
    assert_eq!(state.get((0, 1)), Color::Empty);
    assert_eq!(state.get((0, 2)), Color::Empty);
    assert_eq!(state.score(Color::Black), 2);
    assert_eq!(state.turn(), Color::Grey);
}

#[test]
fn test_territory() {
    let mut state = grid(&[".X...", ".X...", "X...O", "...O.", "....O"]);
    assert_eq!(state.score_territory(Color::Black), 2);
    assert_eq!(state.score_territory(Color::White), 1);
    assert_eq!(state.score_territory(Color::Grey), 0);
    assert_eq!(state.scores(), [2, 0, 1]);
    assert_eq!(state.winners(), vec![Color::Black]);
}

#[test]
fn test_suicide_checked_before_captures() {
    // The placed stone has no liberty of its own, so the move is rejected
    // even though it would also take the last liberty of both White stones.
    let mut state = grid(&[".O#.", "O#..", "#...", "...."]);
    state.set_turn(Color::Grey);
    assert_eq!(state.play((0, 0)), Err(GoError::SuicideMove((0, 0))));

    let mut state = grid(&["#O#.", ".#..", "....", "...."]);
    state.set_turn(Color::Grey);
    assert_eq!(state.liberty_count((1, 0)), 0);
    assert_eq!(state.capture((1, 0)), 1);
    assert_eq!(state.get((1, 0)), Color::Empty);
}

#[test]
fn test_illegal_moves_leave_state_alone() {
    let mut state = grid(&["X.", ".."]);
    let before = state.clone();
    assert_eq!(state.play((0, 0)), Err(GoError::CellOccupied((0, 0))));
    assert_eq!(state.play((2, 0)), Err(GoError::OutOfBounds((2, 0))));
    assert_eq!(state, before);
}

#[test]
fn test_winners_tie() {
    let mut state = GameState::new(Board::new(3, 3).unwrap());
    state.set_score(Color::Grey, 4);
    state.set_score(Color::White, 4);
    assert_eq!(state.winners(), vec![Color::Grey, Color::White]);
}

// =============================================================================
// Properties over random games
// =============================================================================

#[test]
fn test_no_move_leaves_its_group_without_liberties() {
    for seed in 0..5 {
        let mut state = GameState::new(Board::new(5, 5).unwrap());
        let mut players: Vec<RandomPlayer> = Color::PLAYERS
            .iter()
            .map(|&c| RandomPlayer::with_seed(c, seed))
            .collect();
        for _ in 0..60 {
            let slot = state.turn().slot().unwrap();
            match players[slot].select_move(&mut state, Budget::Unbounded) {
                Some(placed) => assert!(state.liberty_count(placed.point) >= 1),
                None => state.pass_turn(),
            }
        }
    }
}

#[test]
fn test_scores_never_decrease() {
    let mut last = [0u32; 3];
    random_game(4, 4, 3, 120, |state| {
        let now = state.scores();
        assert!(now.iter().zip(&last).all(|(n, l)| n >= l));
        last = now;
    });
}

#[test]
fn test_serialize_round_trip() {
    random_game(6, 4, 17, 40, |state| {
        let text = state.serialize();
        let back = GameState::deserialize(&text, ";").unwrap();
        assert_eq!(back.board(), state.board());
        assert_eq!(back.cells(), state.cells());
    });
}

#[test]
fn test_serialize_format() {
    let mut state = GameState::new(Board::new(2, 2).unwrap());
    state.play((0, 0)).unwrap();
    state.play((1, 0)).unwrap();
    state.play((0, 1)).unwrap();
    assert_eq!(state.serialize(), "X#;O.;");
}

#[test]
fn test_deserialize_errors() {
    assert!(matches!(
        GameState::deserialize("X.;..Z;", ";"),
        Err(GoError::Format(_))
    ));
    assert!(matches!(
        GameState::deserialize("X..;..;", ";"),
        Err(GoError::Format(_))
    ));
    assert!(matches!(GameState::deserialize(";;", ";"), Err(GoError::Format(_))));
}
