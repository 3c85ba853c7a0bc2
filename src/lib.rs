//! Focus/Domination game logic with stack-based board representation.
//!
//! # Board Layout
//!
//! ```text
//! 6×6 grid, coordinates (row, col) with (0, 0) in the top-left corner.
//! Every cell holds an ordered stack of pieces: index 0 is the bottom
//! (oldest) piece, the last index is the top (controlling) piece.
//!
//! Starting position (R = first player's color, G = second player's):
//!
//!   col:   0 1 2 3 4 5
//! row 0:   R R G G R R
//! row 1:   G G R R G G
//! row 2:   R R G G R R
//! row 3:   G G R R G G
//! row 4:   R R G G R R
//! row 5:   G G R R G G
//! ```
//!
//! # Move Rules
//!
//! ```text
//! On-board move: the top k pieces of a stack whose top piece is yours
//! travel exactly k cells along one row or column and land, in order,
//! on top of the destination stack.
//!
//! Overflow: a stack keeps at most 5 pieces. After a merge the excess
//! is shed from the bottom, oldest first. Shed pieces of the mover's
//! own color return to the mover's reserve; all others are captured.
//!
//! Reserve placement: instead of moving, drop one reserved piece of
//! your own color onto any cell (same landing rules as a move).
//!
//! Win: the first player to capture 6 opponent pieces wins, and the
//! game stops accepting moves.
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Board side length; the grid is `BOARD_SIZE` × `BOARD_SIZE`.
pub const BOARD_SIZE: usize = 6;

/// Most pieces a stack may keep after a merge; the excess is shed from the bottom.
pub const STACK_LIMIT: usize = 5;

/// Captured pieces needed to win.
pub const WIN_CAPTURES: usize = 6;

/// Piece color, chosen per player at game construction.
///
/// Colors are single characters (e.g. 'R' and 'G'); each player owns exactly
/// one, and every piece on the board carries one of the two.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct Color(pub char);

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Position on the 6×6 board.
///
/// Any row/column pair is representable so callers can submit off-board
/// requests; the engine rejects those with [`GameError::OutOfBounds`]
/// instead of assuming validity.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub row: u8,
    pub col: u8,
}

impl Pos {
    /// Create a position from row and column.
    #[inline]
    pub const fn new(row: u8, col: u8) -> Pos {
        Pos { row, col }
    }

    /// Check whether this position lies on the board.
    #[inline]
    pub fn is_valid(self) -> bool {
        (self.row as usize) < BOARD_SIZE && (self.col as usize) < BOARD_SIZE
    }

    /// Iterate over all 36 board positions in row-major order.
    pub fn all() -> impl Iterator<Item = Pos> {
        (0..BOARD_SIZE as u8)
            .flat_map(|row| (0..BOARD_SIZE as u8).map(move |col| Pos { row, col }))
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Why a game operation was rejected.
///
/// Validation stops at the first failing check, and a rejected operation
/// leaves the game untouched.
#[derive(Clone, PartialEq, Eq, Debug, Error)]
pub enum GameError {
    /// The game has already been won; no further moves are accepted.
    #[error("the game is already finished")]
    GameOver,
    /// The given name matches neither registered player.
    #[error("no player named `{0}` in this game")]
    UnknownPlayer(String),
    /// A different player holds the turn.
    #[error("it is not this player's turn")]
    NotYourTurn,
    /// A coordinate lies outside the 6×6 grid.
    #[error("position {0} is off the board")]
    OutOfBounds(Pos),
    /// A move must relocate at least one piece.
    #[error("piece count must be at least 1")]
    InvalidPieceCount,
    /// The top piece at the source does not belong to the mover.
    #[error("stack at {0} is not controlled by the moving player")]
    StackNotControlled(Pos),
    /// The source stack holds fewer pieces than requested.
    #[error("stack at {pos} holds {have} pieces, {want} were requested")]
    InsufficientPieces { pos: Pos, have: usize, want: usize },
    /// Source and destination do not share exactly one axis.
    #[error("moves must travel along a single row or column")]
    InvalidDirection,
    /// The travel distance does not match the number of pieces moved.
    #[error("{count} pieces must travel exactly {count} cells, not {distance}")]
    DistanceMismatch { count: usize, distance: usize },
    /// The player has no reserved pieces to place.
    #[error("no reserved pieces available")]
    NoReservedPieces,
    /// Both players were given the same name.
    #[error("both players are named `{0}`")]
    DuplicateName(String),
    /// Both players were given the same color.
    #[error("both players share the color `{0}`")]
    DuplicateColor(Color),
    /// Internal bookkeeping broke an invariant; indicates an engine defect.
    #[error("invalid state: {0}")]
    InvalidState(&'static str),
}

/// Lifecycle of one game. Transitions once, `InProgress` → `Finished`,
/// and never reverts.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    InProgress,
    Finished,
}

/// Result of a successful move or placement.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum MoveOutcome {
    /// The move completed and the turn passed to the opponent.
    Moved,
    /// The move completed and won the game for the named player.
    Won(String),
}

/// One player's identity and off-board piece pools.
///
/// `captured` counts opponent pieces this player has permanently removed
/// from play; `reserved` counts the player's own shed pieces awaiting
/// re-entry. Both only ever change through engine-driven overflow and
/// placement.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Player {
    name: String,
    color: Color,
    captured: usize,
    reserved: usize,
}

impl Player {
    /// Create a player with empty pools.
    pub fn new(name: &str, color: Color) -> Player {
        Player {
            name: name.to_string(),
            color,
            captured: 0,
            reserved: 0,
        }
    }

    /// Get the player's name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the player's color.
    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    /// Number of opponent pieces this player has captured.
    #[inline]
    pub fn captured(&self) -> usize {
        self.captured
    }

    /// Number of own pieces held in reserve.
    #[inline]
    pub fn reserved(&self) -> usize {
        self.reserved
    }

    /// Credit one captured opponent piece.
    #[inline]
    pub fn add_captured(&mut self) {
        self.captured += 1;
    }

    /// Return one shed piece of the player's own color to reserve.
    #[inline]
    pub fn add_reserved(&mut self) {
        self.reserved += 1;
    }

    /// Spend one reserved piece. The engine checks availability before
    /// calling this, so an empty reserve here is an engine defect.
    pub fn take_reserved(&mut self) -> Result<(), GameError> {
        if self.reserved == 0 {
            return Err(GameError::InvalidState("reserve count would go negative"));
        }
        self.reserved -= 1;
        Ok(())
    }
}

// ============================================================================
// BOARD - 6×6 grid of ordered piece stacks
// ============================================================================

/// The 6×6 grid. Every cell holds an ordered stack, index 0 at the bottom,
/// the last index on top (the controlling piece).
///
/// `Board` is pure storage: it bounds-checks coordinates but performs no
/// rules validation — stack legality is entirely [`FocusGame`]'s job.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Board {
    cells: [[Vec<Color>; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    /// Create a board in the standard Focus starting position: single
    /// pieces alternating between the two colors in column pairs, with
    /// the pattern offset on odd rows.
    pub fn new(color_1: Color, color_2: Color) -> Board {
        let cells: [[Vec<Color>; BOARD_SIZE]; BOARD_SIZE] = std::array::from_fn(|row| {
            std::array::from_fn(|col| {
                if (row + col / 2) % 2 == 0 {
                    vec![color_1]
                } else {
                    vec![color_2]
                }
            })
        });
        Board { cells }
    }

    /// Get the stack at a position, bottom-to-top.
    pub fn get_stack(&self, pos: Pos) -> Result<&[Color], GameError> {
        if !pos.is_valid() {
            return Err(GameError::OutOfBounds(pos));
        }
        Ok(&self.cells[pos.row as usize][pos.col as usize])
    }

    /// Replace the stack at a position wholesale. The contents are not
    /// validated — callers outside the engine must ensure legality.
    pub fn set_stack(&mut self, pos: Pos, stack: Vec<Color>) -> Result<(), GameError> {
        if !pos.is_valid() {
            return Err(GameError::OutOfBounds(pos));
        }
        self.cells[pos.row as usize][pos.col as usize] = stack;
        Ok(())
    }

    /// Get the controlling (top) piece at a position. Returns `None` for
    /// an empty cell or an off-board coordinate.
    #[inline]
    pub fn top_piece(&self, pos: Pos) -> Option<Color> {
        self.get_stack(pos).ok().and_then(|stack| stack.last().copied())
    }

    /// Count the pieces of one color currently on the board.
    pub fn pieces_of(&self, color: Color) -> usize {
        self.cells
            .iter()
            .flatten()
            .map(|stack| stack.iter().filter(|&&piece| piece == color).count())
            .sum()
    }
}

// ============================================================================
// GAME ENGINE - validation, stack movement, overflow, turns, win detection
// ============================================================================

/// A complete two-player Focus/Domination game.
///
/// Owns the board and both players for the lifetime of one game. All rule
/// enforcement runs through [`FocusGame::move_piece`] and
/// [`FocusGame::place_from_reserve`]; everything else is read-only
/// observable state.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct FocusGame {
    players: [Player; 2],
    board: Board,
    /// Index into `players`; `None` until the first successful move fixes it.
    turn: Option<usize>,
    status: GameStatus,
}

impl FocusGame {
    /// Create a game from two `(name, color)` pairs. The first pair's
    /// color occupies the corner cells of the starting layout.
    ///
    /// Duplicate names or colors are rejected.
    pub fn new(player_1: (&str, Color), player_2: (&str, Color)) -> Result<FocusGame, GameError> {
        let (name_1, color_1) = player_1;
        let (name_2, color_2) = player_2;
        if name_1 == name_2 {
            return Err(GameError::DuplicateName(name_1.to_string()));
        }
        if color_1 == color_2 {
            return Err(GameError::DuplicateColor(color_1));
        }
        Ok(FocusGame {
            players: [Player::new(name_1, color_1), Player::new(name_2, color_2)],
            board: Board::new(color_1, color_2),
            turn: None,
            status: GameStatus::InProgress,
        })
    }

    // ========== Moves ==========

    /// Move the top `pieces` pieces of the stack at `from` exactly `pieces`
    /// cells along a row or column, landing on top of the stack at `to`.
    ///
    /// Validation runs in a fixed order and stops at the first failure; a
    /// rejected move leaves the game untouched. On success any overflow
    /// beyond [`STACK_LIMIT`] is shed from the bottom of the combined stack
    /// into the mover's pools, the turn resolves, and the outcome reports
    /// either the pass of turn or the win.
    pub fn move_piece(
        &mut self,
        player: &str,
        from: Pos,
        to: Pos,
        pieces: usize,
    ) -> Result<MoveOutcome, GameError> {
        if self.status == GameStatus::Finished {
            return Err(GameError::GameOver);
        }
        let mover = self.player_index(player)?;
        // An unset turn accepts either player; the first successful move
        // fixes the rotation.
        if let Some(turn) = self.turn {
            if turn != mover {
                return Err(GameError::NotYourTurn);
            }
        }
        if !from.is_valid() {
            return Err(GameError::OutOfBounds(from));
        }
        if !to.is_valid() {
            return Err(GameError::OutOfBounds(to));
        }
        if pieces == 0 {
            return Err(GameError::InvalidPieceCount);
        }
        let mover_color = self.players[mover].color();
        let source = self.board.get_stack(from)?;
        if source.last() != Some(&mover_color) {
            return Err(GameError::StackNotControlled(from));
        }
        if source.len() < pieces {
            return Err(GameError::InsufficientPieces {
                pos: from,
                have: source.len(),
                want: pieces,
            });
        }
        let same_row = from.row == to.row;
        let same_col = from.col == to.col;
        if same_row == same_col {
            // Same cell (both equal) or diagonal (neither equal).
            return Err(GameError::InvalidDirection);
        }
        let distance = if same_row {
            from.col.abs_diff(to.col) as usize
        } else {
            from.row.abs_diff(to.row) as usize
        };
        if distance != pieces {
            return Err(GameError::DistanceMismatch {
                count: pieces,
                distance,
            });
        }

        // Validated; split the source and land the top pieces.
        let mut remaining = source.to_vec();
        let moving = remaining.split_off(remaining.len() - pieces);
        self.board.set_stack(from, remaining)?;
        self.merge_onto(mover, to, moving)?;
        Ok(self.resolve_turn(mover))
    }

    /// Drop one reserved piece of the player's own color onto `to`.
    ///
    /// Placement follows the same landing rules as an on-board move — the
    /// piece may overflow a full stack, even straight back into the
    /// placer's reserve. A placement never opens a game: the turn must
    /// already be fixed by an on-board move.
    pub fn place_from_reserve(&mut self, player: &str, to: Pos) -> Result<MoveOutcome, GameError> {
        if self.status == GameStatus::Finished {
            return Err(GameError::GameOver);
        }
        let mover = self.player_index(player)?;
        if self.turn != Some(mover) {
            return Err(GameError::NotYourTurn);
        }
        if !to.is_valid() {
            return Err(GameError::OutOfBounds(to));
        }
        if self.players[mover].reserved() == 0 {
            return Err(GameError::NoReservedPieces);
        }
        let piece = self.players[mover].color();
        self.merge_onto(mover, to, vec![piece])?;
        self.players[mover].take_reserved()?;
        Ok(self.resolve_turn(mover))
    }

    /// Land a moving stack on top of `to`. If the combined stack exceeds
    /// [`STACK_LIMIT`], the excess is shed from the bottom in order:
    /// own-color pieces return to the mover's reserve, opponent pieces
    /// are captured by the mover.
    fn merge_onto(&mut self, mover: usize, to: Pos, moving: Vec<Color>) -> Result<(), GameError> {
        let mover_color = self.players[mover].color();
        let mut combined = self.board.get_stack(to)?.to_vec();
        combined.extend(moving);
        if combined.len() > STACK_LIMIT {
            let excess = combined.len() - STACK_LIMIT;
            for shed in combined.drain(..excess) {
                if shed == mover_color {
                    self.players[mover].add_reserved();
                } else {
                    self.players[mover].add_captured();
                }
            }
        }
        self.board.set_stack(to, combined)
    }

    /// Close out a successful move: finish the game if either player has
    /// reached [`WIN_CAPTURES`], otherwise pass the turn to the opponent.
    /// The turn does not advance on a win.
    fn resolve_turn(&mut self, mover: usize) -> MoveOutcome {
        for player in &self.players {
            if player.captured() >= WIN_CAPTURES {
                self.status = GameStatus::Finished;
                // Freeze on the mover rather than advancing.
                self.turn = Some(mover);
                return MoveOutcome::Won(player.name().to_string());
            }
        }
        self.turn = Some(1 - mover);
        MoveOutcome::Moved
    }

    /// Resolve a player name to an index into `players`.
    fn player_index(&self, player: &str) -> Result<usize, GameError> {
        self.players
            .iter()
            .position(|p| p.name() == player)
            .ok_or_else(|| GameError::UnknownPlayer(player.to_string()))
    }

    // ========== Queries ==========

    /// The stack at `pos`, bottom-to-top.
    pub fn show_pieces(&self, pos: Pos) -> Result<&[Color], GameError> {
        self.board.get_stack(pos)
    }

    /// How many pieces `player` holds in reserve.
    pub fn show_reserved(&self, player: &str) -> Result<usize, GameError> {
        Ok(self.players[self.player_index(player)?].reserved())
    }

    /// How many opponent pieces `player` has captured.
    pub fn show_captured(&self, player: &str) -> Result<usize, GameError> {
        Ok(self.players[self.player_index(player)?].captured())
    }

    /// Whether the game is still accepting moves.
    #[inline]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Name of the player who must move next. `None` until the first
    /// successful move fixes the turn; frozen on the last mover once the
    /// game finishes.
    pub fn current_turn(&self) -> Option<&str> {
        self.turn.map(|idx| self.players[idx].name())
    }

    /// Name of the winner, if the game has been won.
    pub fn winner(&self) -> Option<&str> {
        if self.status == GameStatus::Finished {
            self.players
                .iter()
                .find(|p| p.captured() >= WIN_CAPTURES)
                .map(|p| p.name())
        } else {
            None
        }
    }

    /// Both players, in construction order.
    #[inline]
    pub fn players(&self) -> &[Player; 2] {
        &self.players
    }

    /// Read access to the board for display consumers.
    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }
}
