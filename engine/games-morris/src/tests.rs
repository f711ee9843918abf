use super::*;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn pos(ring: i32, cell: i32) -> Position {
    Position::new(ring, cell).unwrap()
}

fn board_with(white: &[(i32, i32)], black: &[(i32, i32)]) -> Board {
    let mut board = Board::new();
    for &(r, c) in white {
        board.put(pos(r, c), Cell::White);
    }
    for &(r, c) in black {
        board.put(pos(r, c), Cell::Black);
    }
    board
}

/// Nine placements per side that never line up three in a row.
const WHITE_CELLS: [(i32, i32); 9] = [
    (0, 0),
    (0, 1),
    (0, 4),
    (0, 5),
    (1, 2),
    (1, 3),
    (1, 6),
    (1, 7),
    (2, 0),
];
const BLACK_CELLS: [(i32, i32); 9] = [
    (0, 2),
    (0, 3),
    (0, 6),
    (0, 7),
    (1, 0),
    (1, 1),
    (1, 4),
    (1, 5),
    (2, 4),
];

#[test]
fn test_initial_state() {
    let game = MillGame::new(Color::White);
    assert_eq!(game.phase(), Phase::Placing);
    assert_eq!(game.turn(), Color::White);
    assert!(!game.has_to_remove());
    assert_eq!(game.player(Color::White).remaining, PIECES_PER_PLAYER);
    assert_eq!(game.player(Color::Black).alive, PIECES_PER_PLAYER);
    assert_eq!(game.winner(), Err(PreconditionError::GameNotFinished));
}

#[test]
fn test_place_switches_turn() {
    let mut game = MillGame::new(Color::White);
    game.place(pos(0, 0)).unwrap();

    assert_eq!(game.board().get(pos(0, 0)), Cell::White);
    assert_eq!(game.player(Color::White).remaining, 8);
    assert_eq!(game.turn(), Color::Black);
    assert_eq!(game.move_count(), 1);
}

#[test]
fn test_place_on_occupied_cell() {
    let mut game = MillGame::new(Color::White);
    game.place(pos(0, 0)).unwrap();
    let before = game.clone();

    let err = game.place(pos(0, 0)).unwrap_err();
    assert!(matches!(err, RuleError::InvalidMove(_)));
    assert_eq!(game, before);
}

#[test]
fn test_placing_to_moving_happens_once() {
    let mut game = MillGame::new(Color::White);
    for i in 0..9 {
        assert_eq!(game.phase(), Phase::Placing);
        game.place(pos(WHITE_CELLS[i].0, WHITE_CELLS[i].1)).unwrap();
        if i < 8 {
            assert_eq!(game.phase(), Phase::Placing);
        }
        game.place(pos(BLACK_CELLS[i].0, BLACK_CELLS[i].1)).unwrap();
    }
    assert_eq!(game.phase(), Phase::Moving);
    assert_eq!(game.turn(), Color::White);
    assert!(!game.has_to_remove());

    let err = game.place(pos(2, 7)).unwrap_err();
    assert!(matches!(err, RuleError::InvalidState(_)));

    game.move_piece(pos(2, 0), pos(2, 1)).unwrap();
    game.move_piece(pos(2, 4), pos(2, 5)).unwrap();
    assert_eq!(game.phase(), Phase::Moving);
}

#[test]
fn test_move_rule_violations() {
    let board = board_with(&[(0, 0), (0, 3), (2, 1)], &[(0, 1), (1, 4), (2, 6)]);
    let mut game = MillGame::from_position(board, Color::White, [0, 0]).unwrap();
    let before = game.clone();

    // Not adjacent
    assert!(matches!(
        game.move_piece(pos(0, 0), pos(0, 2)),
        Err(RuleError::InvalidMove(_))
    ));
    // Corners do not connect across rings
    assert!(matches!(
        game.move_piece(pos(0, 0), pos(1, 0)),
        Err(RuleError::InvalidMove(_))
    ));
    // Opponent's piece
    assert!(matches!(
        game.move_piece(pos(0, 1), pos(0, 2)),
        Err(RuleError::InvalidMove(_))
    ));
    // Occupied target
    assert!(matches!(
        game.move_piece(pos(0, 0), pos(0, 1)),
        Err(RuleError::InvalidMove(_))
    ));
    // No pending removal
    assert!(matches!(
        game.remove(pos(0, 1)),
        Err(RuleError::InvalidState(_))
    ));
    assert_eq!(game, before);

    game.move_piece(pos(2, 1), pos(1, 1)).unwrap();
    assert_eq!(game.board().get(pos(1, 1)), Cell::White);
    assert!(game.board().get(pos(2, 1)).is_empty());
    assert_eq!(game.turn(), Color::Black);
}

#[test]
fn test_white_mill_then_remove_advances_to_black() {
    let mut game = MillGame::new(Color::White);
    game.place(pos(0, 0)).unwrap();
    game.place(pos(1, 0)).unwrap();
    game.place(pos(0, 1)).unwrap();
    game.place(pos(2, 4)).unwrap();
    game.place(pos(0, 2)).unwrap();

    assert!(game.has_to_remove());
    assert_eq!(game.turn(), Color::White);

    // Nothing but a removal is allowed now
    assert!(matches!(
        game.place(pos(2, 2)),
        Err(RuleError::InvalidState(_))
    ));
    // Own piece / empty cell are rejected
    assert!(matches!(game.remove(pos(0, 0)), Err(RuleError::InvalidMove(_))));
    assert!(matches!(game.remove(pos(2, 2)), Err(RuleError::InvalidMove(_))));

    game.remove(pos(1, 0)).unwrap();
    assert!(!game.has_to_remove());
    assert_eq!(game.turn(), Color::Black);
    assert!(game.board().get(pos(1, 0)).is_empty());
    assert_eq!(game.player(Color::Black).alive, 8);
    assert_eq!(game.player(Color::Black).remaining, 7);
}

#[test]
fn test_mill_with_wrap_around() {
    let mut game = MillGame::new(Color::White);
    game.place(pos(0, 0)).unwrap();
    game.place(pos(0, 1)).unwrap();
    game.place(pos(0, 7)).unwrap();
    game.place(pos(0, 2)).unwrap();
    game.place(pos(0, 6)).unwrap();
    assert!(game.has_to_remove());

    game.remove(pos(0, 2)).unwrap();
    assert_eq!(game.turn(), Color::Black);
}

#[test]
fn test_removal_protection_when_some_pieces_free() {
    let board = board_with(&[(0, 0), (0, 1)], &[(1, 0), (1, 1), (1, 2), (2, 5)]);
    let mut game = MillGame::from_position(board, Color::White, [7, 5]).unwrap();
    game.place(pos(0, 2)).unwrap();
    assert!(game.has_to_remove());
    assert!(!game.all_pieces_in_mill(Color::Black));

    assert!(matches!(game.remove(pos(1, 1)), Err(RuleError::InvalidMove(_))));
    assert!(game.has_to_remove());

    game.remove(pos(2, 5)).unwrap();
    assert_eq!(game.turn(), Color::Black);
}

#[test]
fn test_removal_allowed_when_every_piece_is_milled() {
    // Black owns a ring mill and a spoke mill sharing no cells.
    let board = board_with(
        &[(0, 0), (0, 1)],
        &[(1, 0), (1, 1), (1, 2), (0, 5), (1, 5), (2, 5)],
    );
    let mut game = MillGame::from_position(board, Color::White, [7, 3]).unwrap();
    game.place(pos(0, 2)).unwrap();
    assert!(game.all_pieces_in_mill(Color::Black));

    game.remove(pos(1, 5)).unwrap();
    assert_eq!(game.player(Color::Black).alive, 8);
    assert_eq!(game.turn(), Color::Black);
}

#[test]
fn test_mill_without_opponent_pieces_does_not_block() {
    let board = board_with(&[(0, 0), (0, 1)], &[]);
    let mut game = MillGame::from_position(board, Color::White, [7, 5]).unwrap();
    game.place(pos(0, 2)).unwrap();
    assert!(!game.has_to_remove());
    assert_eq!(game.turn(), Color::Black);
}

#[test]
fn test_place_and_remove_is_atomic() {
    let board = board_with(&[(0, 0), (0, 1)], &[(1, 0), (1, 1), (1, 2), (2, 5)]);
    let mut game = MillGame::from_position(board, Color::White, [7, 5]).unwrap();
    let before = game.clone();

    // Protected piece: the placement is undone
    let err = game.place_and_remove(pos(0, 2), pos(1, 1)).unwrap_err();
    assert!(matches!(err, RuleError::InvalidMove(_)));
    assert_eq!(game, before);

    // No mill formed: nothing may be removed
    let err = game.place_and_remove(pos(2, 2), pos(2, 5)).unwrap_err();
    assert!(matches!(err, RuleError::InvalidMove(_)));
    assert_eq!(game, before);

    game.place_and_remove(pos(0, 2), pos(2, 5)).unwrap();
    assert_eq!(game.turn(), Color::Black);
    assert_eq!(game.player(Color::White).remaining, 6);
    assert_eq!(game.player(Color::Black).alive, 8);
}

#[test]
fn test_move_and_remove_is_atomic() {
    let board = board_with(&[(0, 0), (0, 1), (0, 3)], &[(2, 0), (2, 4), (1, 6)]);
    let mut game = MillGame::from_position(board, Color::White, [0, 0]).unwrap();
    let before = game.clone();

    let err = game
        .move_and_remove(pos(0, 3), pos(0, 2), pos(0, 0))
        .unwrap_err();
    assert!(matches!(err, RuleError::InvalidMove(_)));
    assert_eq!(game, before);
}

#[test]
fn test_black_reduced_to_two_pieces_loses() {
    let board = board_with(
        &[(0, 0), (0, 1), (0, 3)],
        &[(2, 0), (2, 4), (1, 6), (2, 6)],
    );
    let mut game = MillGame::from_position(board, Color::White, [0, 0]).unwrap();

    game.move_and_remove(pos(0, 3), pos(0, 2), pos(2, 0)).unwrap();
    assert_eq!(game.player(Color::Black).alive, 3);
    assert_eq!(game.turn(), Color::Black);

    game.move_piece(pos(1, 6), pos(1, 5)).unwrap();
    game.move_piece(pos(0, 2), pos(0, 3)).unwrap();
    game.move_piece(pos(2, 6), pos(2, 7)).unwrap();
    game.move_and_remove(pos(0, 3), pos(0, 2), pos(2, 4)).unwrap();

    assert_eq!(game.phase(), Phase::Finished);
    assert_eq!(game.player(Color::Black).alive, 2);
    assert_eq!(game.winner(), Ok(Some(Color::White)));
}

fn blocked_black() -> MillGame {
    // After white slides 1:5 -> 0:5, none of black's corners can move.
    let board = board_with(
        &[(0, 1), (0, 3), (0, 7), (1, 5)],
        &[(0, 0), (0, 2), (0, 4)],
    );
    MillGame::from_position(board, Color::White, [0, 0]).unwrap()
}

#[test]
fn test_immobile_opponent_loses() {
    let mut game = blocked_black();
    game.move_piece(pos(1, 5), pos(0, 5)).unwrap();

    assert_eq!(game.phase(), Phase::Finished);
    assert_eq!(game.winner(), Ok(Some(Color::White)));
    assert!(!game.can_move(Color::Black));
}

#[test]
fn test_move_cap_checked_before_immobility() {
    let mut game = blocked_black().with_max_moves(Some(1));
    game.move_piece(pos(1, 5), pos(0, 5)).unwrap();

    assert_eq!(game.phase(), Phase::Finished);
    assert_eq!(game.winner(), Ok(None));
}

#[test]
fn test_move_cap_ends_in_tie() {
    let n = 6;
    let mut game = MillGame::new(Color::White).with_max_moves(Some(n));
    for i in 0..(n as usize / 2) {
        game.place(pos(WHITE_CELLS[i].0, WHITE_CELLS[i].1)).unwrap();
        game.place(pos(BLACK_CELLS[i].0, BLACK_CELLS[i].1)).unwrap();
    }

    assert_eq!(game.move_count(), n);
    assert_eq!(game.phase(), Phase::Finished);
    assert_eq!(game.winner(), Ok(None));
    assert!(matches!(
        game.place(pos(2, 7)),
        Err(RuleError::InvalidState(_))
    ));
}

#[test]
fn test_apply_requires_named_removal() {
    let board = board_with(&[(0, 0), (0, 1)], &[(1, 0), (2, 5)]);
    let mut game = MillGame::from_position(board, Color::White, [7, 7]).unwrap();
    let before = game.clone();

    let err = game.apply(&Move::place(pos(0, 2))).unwrap_err();
    assert!(matches!(err, RuleError::InvalidMove(_)));
    assert_eq!(game, before);

    game.apply(&Move::place(pos(0, 2)).with_removal(pos(1, 0)))
        .unwrap();
    assert_eq!(game.turn(), Color::Black);

    game.apply(&Move::place(pos(2, 2))).unwrap();
    assert_eq!(game.turn(), Color::White);
}

#[test]
fn test_from_position_rejects_too_many_pieces() {
    let board = board_with(&[(0, 0), (0, 1)], &[]);
    assert!(MillGame::from_position(board, Color::White, [8, 9]).is_err());
}

#[test]
fn test_from_position_rejects_placer_without_pieces() {
    let board = board_with(&[(0, 0), (0, 2)], &[(1, 1)]);
    let err = MillGame::from_position(board, Color::White, [0, 1]).unwrap_err();
    assert!(matches!(err, PreconditionError::InconsistentPosition(_)));

    // Black still has a piece to place, so black to move is fine
    let game = MillGame::from_position(board, Color::Black, [0, 1]).unwrap();
    assert_eq!(game.phase(), Phase::Placing);
    assert_eq!(State::new(game).successors().count(), 21);
}

// ============================================================================
// Successor generation
// ============================================================================

#[test]
fn test_opening_successors() {
    let state = State::new(MillGame::new(Color::White));
    let successors: Vec<State> = state.successors().collect();
    assert_eq!(successors.len(), 24);

    for (i, succ) in successors.iter().enumerate() {
        let mv = succ.last_move().unwrap();
        assert_eq!(mv.to.index(), i);
        assert!(mv.is_placement());
        assert_eq!(succ.game().turn(), Color::Black);
        assert_eq!(succ.empty_cells().len(), 23);
        assert_eq!(succ.pieces(Color::White), &[mv.to]);
    }
}

#[test]
fn test_successors_leave_origin_untouched() {
    let game = MillGame::new(Color::White);
    let state = State::new(game.clone());
    let _: Vec<State> = state.successors().collect();
    assert_eq!(state.game(), &game);
    assert_eq!(state.empty_cells().len(), 24);
}

#[test]
fn test_successors_branch_on_removal() {
    let board = board_with(&[(0, 0), (0, 1)], &[(1, 0), (1, 1), (1, 2), (2, 5)]);
    let game = MillGame::from_position(board, Color::White, [7, 5]).unwrap();
    let successors: Vec<State> = State::new(game).successors().collect();

    // 17 quiet placements plus one mill that may only take the free piece
    assert_eq!(successors.len(), 18);
    let mills: Vec<Move> = successors
        .iter()
        .filter_map(|s| s.last_move())
        .filter(|m| m.removed.is_some())
        .collect();
    assert_eq!(mills, vec![Move::place(pos(0, 2)).with_removal(pos(2, 5))]);
}

#[test]
fn test_successors_branch_on_every_legal_victim() {
    let board = board_with(&[(0, 0), (0, 1)], &[(1, 0), (2, 5), (2, 6)]);
    let game = MillGame::from_position(board, Color::White, [7, 6]).unwrap();
    let successors: Vec<State> = State::new(game).successors().collect();

    // 19 empty cells, one of which forms a mill with three victims
    assert_eq!(successors.len(), 18 + 3);
    for succ in successors.iter().filter(|s| s.last_move().unwrap().removed.is_some()) {
        assert_eq!(succ.game().turn(), Color::Black);
        assert_eq!(succ.pieces(Color::Black).len(), 2);
    }
}

#[test]
fn test_moving_successors() {
    let board = board_with(&[(0, 0), (0, 3), (2, 1)], &[(0, 1), (1, 4), (2, 6)]);
    let game = MillGame::from_position(board, Color::White, [0, 0]).unwrap();
    let moves: Vec<Move> = State::new(game)
        .successors()
        .filter_map(|s| s.last_move())
        .collect();

    let expected = vec![
        Move::slide(pos(0, 0), pos(0, 7)),
        Move::slide(pos(0, 3), pos(0, 2)),
        Move::slide(pos(0, 3), pos(0, 4)),
        Move::slide(pos(0, 3), pos(1, 3)),
        Move::slide(pos(2, 1), pos(1, 1)),
        Move::slide(pos(2, 1), pos(2, 0)),
        Move::slide(pos(2, 1), pos(2, 2)),
    ];
    assert_eq!(moves, expected);
}

#[test]
fn test_finished_state_has_no_successors() {
    let mut game = blocked_black();
    game.move_piece(pos(1, 5), pos(0, 5)).unwrap();
    let state = State::new(game);
    assert!(state.is_terminal());
    assert_eq!(state.successors().count(), 0);
}

#[test]
fn test_shuffled_successors_are_a_permutation() {
    let board = board_with(&[(0, 0), (0, 1)], &[(1, 0), (2, 5), (2, 6)]);
    let game = MillGame::from_position(board, Color::White, [7, 6]).unwrap();
    let state = State::new(game);

    let mut canonical: Vec<u32> = state
        .successors()
        .filter_map(|s| s.last_move())
        .map(|m| m.packed())
        .collect();
    canonical.sort_unstable();

    let mut rng = ChaCha20Rng::seed_from_u64(7);
    let first: Vec<u32> = state
        .shuffled_successors(&mut rng)
        .filter_map(|s| s.last_move())
        .map(|m| m.packed())
        .collect();
    let second: Vec<u32> = state
        .shuffled_successors(&mut rng)
        .filter_map(|s| s.last_move())
        .map(|m| m.packed())
        .collect();
    assert_ne!(first, second);

    let mut sorted = first.clone();
    sorted.sort_unstable();
    assert_eq!(sorted, canonical);
}

#[test]
fn test_generator_is_single_pass() {
    let state = State::new(MillGame::new(Color::Black));
    let mut successors = state.successors();
    assert_eq!(successors.by_ref().count(), 24);
    assert!(successors.next().is_none());
}

#[test]
fn test_random_playout_terminates_with_cap() {
    let mut rng = ChaCha20Rng::seed_from_u64(42);
    let mut game = MillGame::new(Color::White).with_max_moves(Some(200));
    while !game.is_finished() {
        let next = State::new(game.clone())
            .shuffled_successors(&mut rng)
            .next()
            .expect("unfinished game has a successor");
        let mv = next.last_move().unwrap();
        let mut replay = game.clone();
        replay.apply(&mv).unwrap();
        assert_eq!(&replay, next.game());
        game = next.into_game();
    }
    assert!(game.move_count() <= 200);
    assert!(game.winner().is_ok());
}
