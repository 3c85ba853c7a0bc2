//! Random-playout integration testing
//!
//! Drives full games through the public API only and verifies the global
//! invariants after every accepted move:
//! - No stack ever holds more than 5 pieces
//! - Piece conservation: board + both reserves + both captures = 36
//! - The turn strictly alternates between the two players
//! - Status is monotonic: once Finished, every mutation is rejected
//! - The final state survives a serde round-trip

use focus_core::{Color, FocusGame, GameError, GameStatus, MoveOutcome, Pos, STACK_LIMIT};
use rand::prelude::*;

const PLAYER_1: &str = "North";
const PLAYER_2: &str = "South";
const COLOR_1: Color = Color('N');
const COLOR_2: Color = Color('S');

/// A candidate action to try against the engine.
#[derive(Debug, Clone, Copy)]
enum Action {
    Move { from: Pos, to: Pos, pieces: usize },
    Place { to: Pos },
}

fn new_game() -> FocusGame {
    FocusGame::new((PLAYER_1, COLOR_1), (PLAYER_2, COLOR_2)).expect("valid player pair")
}

fn color_of(game: &FocusGame, player: &str) -> Color {
    game.players()
        .iter()
        .find(|p| p.name() == player)
        .expect("registered player")
        .color()
}

/// Enumerate every action the engine should accept for `player`, using only
/// the public query surface. The engine re-validates each one on submission.
fn legal_actions(game: &FocusGame, player: &str) -> Vec<Action> {
    let color = color_of(game, player);
    let mut actions = Vec::new();

    for from in Pos::all() {
        let stack = game.show_pieces(from).expect("on-board position");
        if stack.last() != Some(&color) {
            continue;
        }
        for pieces in 1..=stack.len() {
            let d = pieces as u8;
            let mut targets = Vec::new();
            if from.col >= d {
                targets.push(Pos::new(from.row, from.col - d));
            }
            targets.push(Pos::new(from.row, from.col + d));
            if from.row >= d {
                targets.push(Pos::new(from.row - d, from.col));
            }
            targets.push(Pos::new(from.row + d, from.col));
            for to in targets {
                if to.is_valid() {
                    actions.push(Action::Move { from, to, pieces });
                }
            }
        }
    }

    if game.show_reserved(player).expect("registered player") > 0 {
        for to in Pos::all() {
            actions.push(Action::Place { to });
        }
    }

    actions
}

fn apply(game: &mut FocusGame, player: &str, action: Action) -> Result<MoveOutcome, GameError> {
    match action {
        Action::Move { from, to, pieces } => game.move_piece(player, from, to, pieces),
        Action::Place { to } => game.place_from_reserve(player, to),
    }
}

/// Assert the global invariants that must hold after every accepted move.
fn check_invariants(game: &FocusGame, context: &str) {
    for pos in Pos::all() {
        let stack = game.show_pieces(pos).expect("on-board position");
        assert!(
            stack.len() <= STACK_LIMIT,
            "{context}: stack at {pos} holds {} pieces",
            stack.len()
        );
        for piece in stack {
            assert!(
                *piece == COLOR_1 || *piece == COLOR_2,
                "{context}: foreign piece {piece} at {pos}"
            );
        }
    }

    let on_board = game.board().pieces_of(COLOR_1) + game.board().pieces_of(COLOR_2);
    let off_board = game.show_reserved(PLAYER_1).unwrap()
        + game.show_reserved(PLAYER_2).unwrap()
        + game.show_captured(PLAYER_1).unwrap()
        + game.show_captured(PLAYER_2).unwrap();
    assert_eq!(
        on_board + off_board,
        36,
        "{context}: {on_board} pieces on board + {off_board} off board"
    );
}

#[test]
fn test_scripted_opening() {
    let mut game = new_game();

    // North marches the corner piece right, stacking onto its neighbor.
    game.move_piece(PLAYER_1, Pos::new(0, 0), Pos::new(0, 1), 1).unwrap();
    assert_eq!(game.show_pieces(Pos::new(0, 1)).unwrap(), &[COLOR_1, COLOR_1]);

    // South mirrors on its own pair.
    game.move_piece(PLAYER_2, Pos::new(0, 2), Pos::new(0, 3), 1).unwrap();
    assert_eq!(game.show_pieces(Pos::new(0, 3)).unwrap(), &[COLOR_2, COLOR_2]);

    // North's double stack jumps two cells onto South's double stack.
    game.move_piece(PLAYER_1, Pos::new(0, 1), Pos::new(0, 3), 2).unwrap();
    assert!(game.show_pieces(Pos::new(0, 1)).unwrap().is_empty());
    assert_eq!(
        game.show_pieces(Pos::new(0, 3)).unwrap(),
        &[COLOR_2, COLOR_2, COLOR_1, COLOR_1]
    );

    // South develops elsewhere while North controls the tower.
    game.move_piece(PLAYER_2, Pos::new(1, 0), Pos::new(1, 1), 1).unwrap();

    // North marches the whole tower: 4 pieces, 4 cells down the column,
    // landing on a lone South piece for a full 5-stack. No overflow yet.
    game.move_piece(PLAYER_1, Pos::new(0, 3), Pos::new(4, 3), 4).unwrap();
    assert!(game.show_pieces(Pos::new(0, 3)).unwrap().is_empty());
    assert_eq!(
        game.show_pieces(Pos::new(4, 3)).unwrap(),
        &[COLOR_2, COLOR_2, COLOR_2, COLOR_1, COLOR_1]
    );
    assert_eq!(game.show_captured(PLAYER_1), Ok(0));
    assert_eq!(game.show_reserved(PLAYER_1), Ok(0));

    // South develops again; then North caps the tower. The merge overflows
    // the bottom piece, a South piece, into North's captures.
    game.move_piece(PLAYER_2, Pos::new(5, 0), Pos::new(5, 1), 1).unwrap();
    game.move_piece(PLAYER_1, Pos::new(4, 4), Pos::new(4, 3), 1).unwrap();
    assert_eq!(
        game.show_pieces(Pos::new(4, 3)).unwrap(),
        &[COLOR_2, COLOR_2, COLOR_1, COLOR_1, COLOR_1]
    );
    assert_eq!(game.show_captured(PLAYER_1), Ok(1));
    assert_eq!(game.show_reserved(PLAYER_1), Ok(0));

    check_invariants(&game, "scripted opening");
    assert_eq!(game.status(), GameStatus::InProgress);
    assert_eq!(game.current_turn(), Some(PLAYER_2));
}

#[test]
fn test_seeded_random_playouts() {
    const GAMES: u64 = 200;
    const MAX_MOVES: usize = 400;

    let mut finished = 0;
    let mut stalled = 0;
    let mut exhausted = 0;
    let mut total_moves = 0usize;

    for seed in 0..GAMES {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut game = new_game();

        // Alternate who opens; the engine accepts either while the turn
        // is unset.
        let mut mover = if seed % 2 == 0 { PLAYER_1 } else { PLAYER_2 };

        let mut moves_played = 0;
        while moves_played < MAX_MOVES {
            let actions = legal_actions(&game, mover);
            if actions.is_empty() {
                // No stacks controlled and an empty reserve: the game
                // cannot continue under random play.
                stalled += 1;
                break;
            }
            let action = actions[rng.random_range(0..actions.len())];
            let outcome = apply(&mut game, mover, action)
                .unwrap_or_else(|e| panic!("seed {seed}: engine rejected {action:?}: {e}"));
            moves_played += 1;
            check_invariants(&game, &format!("seed {seed}, move {moves_played}"));

            match outcome {
                MoveOutcome::Moved => {
                    let next = if mover == PLAYER_1 { PLAYER_2 } else { PLAYER_1 };
                    assert_eq!(
                        game.current_turn(),
                        Some(next),
                        "seed {seed}: turn did not alternate"
                    );
                    mover = next;
                }
                MoveOutcome::Won(ref winner) => {
                    assert_eq!(game.status(), GameStatus::Finished);
                    assert_eq!(game.winner(), Some(winner.as_str()));
                    assert!(
                        game.show_captured(winner).unwrap() >= 6,
                        "seed {seed}: winner below the capture threshold"
                    );
                    // A finished game rejects every further mutation.
                    assert_eq!(
                        game.move_piece(mover, Pos::new(0, 0), Pos::new(0, 1), 1),
                        Err(GameError::GameOver)
                    );
                    assert_eq!(
                        game.place_from_reserve(mover, Pos::new(0, 0)),
                        Err(GameError::GameOver)
                    );
                    finished += 1;
                    break;
                }
            }
        }
        if moves_played == MAX_MOVES {
            exhausted += 1;
        }
        total_moves += moves_played;

        // The final state, whatever it is, must survive serialization.
        let json = serde_json::to_string(&game).expect("serialize game");
        let restored: FocusGame = serde_json::from_str(&json).expect("deserialize game");
        assert_eq!(restored, game, "seed {seed}: serde round-trip changed state");
    }

    println!(
        "{GAMES} playouts: {finished} won, {stalled} stalled, {exhausted} hit the move cap, {total_moves} moves total"
    );
    assert!(finished > 0, "no playout ever reached a win");
}
