//! The game of chess as a state machine: the board, the side to move and the
//! status derived from them. [`Game::make_move`] is the only way to mutate a
//! game apart from [`Game::mark_over`].
//!
//! Legality is decided by simulation: every pseudo-legal candidate is played
//! on a snapshot of the board and rejected if it leaves the mover's king
//! attacked. The live board is never touched while doing that.
//!
//! NOTE: [`Game`] is not synchronized. Whoever owns it (e.g. a session
//! serving several connections) must make sure that there is at most one
//! mutating call in flight at a time.

use std::fmt;

use anyhow::bail;
use log::{debug, info};

use crate::chess::board::Board;
use crate::chess::core::{Color, Coordinate, Move, MoveList, Piece, PieceKind};

/// Castling rights, en passant square, halfmove clock and fullmove counter.
const IGNORED_FEN_FIELDS: usize = 4;

/// Where the game stands from the perspective of the side to move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "SCREAMING_SNAKE_CASE")
)]
pub enum GameStatus {
    /// The side to move is not in check and has legal moves.
    InProgress,
    /// The king of the given color is attacked, but there is a way out.
    Check(Color),
    /// The king of the given color is attacked and there is no legal move.
    Checkmate(Color),
    /// The given color is not in check but has no legal moves.
    Stalemate(Color),
    /// The game was ended externally (e.g. resignation).
    Over,
}

impl GameStatus {
    /// No moves are accepted once the game reaches a terminal status.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Checkmate(_) | Self::Stalemate(_) | Self::Over)
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InProgress => write!(f, "in_progress"),
            Self::Check(color) => write!(f, "check {color}"),
            Self::Checkmate(color) => write!(f, "checkmate {color}"),
            Self::Stalemate(color) => write!(f, "stalemate {color}"),
            Self::Over => write!(f, "over"),
        }
    }
}

/// Reasons a query or a move is refused. The game is left untouched whenever
/// one of these is returned.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    /// The referenced square is empty.
    #[error("no piece at {0}")]
    NoPiece(Coordinate),
    /// The game has already finished.
    #[error("game is finished: {0}")]
    GameOver(GameStatus),
    /// The piece belongs to the side that is not to move.
    #[error("piece at {square} belongs to {owner}, but {turn} is to move")]
    WrongTurn {
        #[allow(missing_docs)]
        square: Coordinate,
        #[allow(missing_docs)]
        owner: Color,
        #[allow(missing_docs)]
        turn: Color,
    },
    /// The move is not among the legal moves of the piece.
    #[error("illegal move {0}")]
    Illegal(Move),
}

/// A game in progress (or finished): board, side to move, status and the
/// pieces captured so far.
#[derive(Clone, PartialEq, Eq)]
pub struct Game {
    board: Board,
    turn: Color,
    status: GameStatus,
    captured: Vec<Piece>,
}

impl Game {
    /// Creates the standard starting position with White to move.
    ///
    /// ```
    /// use gambit::chess::core::{Color, Move};
    /// use gambit::chess::game::{Game, GameStatus};
    ///
    /// let mut game = Game::new();
    /// assert_eq!(game.turn(), Color::White);
    /// game.make_move(Move::from_uci("g1f3").unwrap()).unwrap();
    /// assert_eq!(game.turn(), Color::Black);
    /// assert_eq!(game.status(), GameStatus::InProgress);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::from_board(Board::starting(), Color::White)
    }

    /// Starts a game from an arbitrary board. The status is derived for
    /// `turn`.
    ///
    /// # Panics
    ///
    /// If either side does not have a king on the board.
    #[must_use]
    pub fn from_board(board: Board, turn: Color) -> Self {
        for color in [Color::White, Color::Black] {
            assert!(
                board.king(color).is_some(),
                "{color:?} king is missing from the board:\n{board:?}"
            );
        }
        let mut game = Self {
            board,
            turn,
            status: GameStatus::InProgress,
            captured: Vec::new(),
        };
        game.status = game.evaluate_status();
        game
    }

    /// Parses the position from [Forsyth-Edwards Notation]. Only piece
    /// placement and side to move are required. Castling rights, en passant
    /// square and move counters may follow but are ignored: the engine does
    /// not model them.
    ///
    /// ```
    /// use gambit::chess::core::Color;
    /// use gambit::chess::game::{Game, GameStatus};
    ///
    /// let game = Game::from_fen("7k/8/8/6Q1/8/8/8/K7 b").unwrap();
    /// assert_eq!(game.turn(), Color::Black);
    /// assert_eq!(game.status(), GameStatus::InProgress);
    /// ```
    ///
    /// # Errors
    ///
    /// If the input is malformed or describes a position that can not occur
    /// in a game: anything other than exactly one king per side, pawns on
    /// the back ranks or the side that just moved being in check.
    ///
    /// [Forsyth-Edwards Notation]: https://www.chessprogramming.org/Forsyth-Edwards_Notation
    pub fn from_fen(input: &str) -> anyhow::Result<Self> {
        let input = input.trim();
        let input = input.strip_prefix("fen ").unwrap_or(input);
        let mut parts = input.split_whitespace();
        let board = match parts.next() {
            Some(placement) => Board::from_fen_placement(placement)?,
            None => bail!("incorrect FEN: missing pieces placement"),
        };
        let turn = match parts.next() {
            Some(value) => Color::try_from(value)?,
            None => bail!("incorrect FEN: missing side to move"),
        };
        if parts.count() > IGNORED_FEN_FIELDS {
            bail!("trailing symbols are not allowed in FEN");
        }
        for color in [Color::White, Color::Black] {
            let kings = board
                .pieces_of(color)
                .filter(|(_, piece)| piece.kind() == PieceKind::King)
                .count();
            if kings != 1 {
                bail!("expected 1 {color:?} king, got {kings}");
            }
        }
        if board.pieces().any(|(square, piece)| {
            piece.kind() == PieceKind::Pawn
                && (square.rank() == Color::White.back_rank()
                    || square.rank() == Color::Black.back_rank())
        }) {
            bail!("pawns can not be placed on backranks");
        }
        if is_in_check(&board, turn.opponent()) {
            bail!("the side that is not to move can not be in check");
        }
        Ok(Self::from_board(board, turn))
    }

    /// Read-only view of the board, e.g. for serialization.
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// The side to move.
    #[must_use]
    pub const fn turn(&self) -> Color {
        self.turn
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn status(&self) -> GameStatus {
        self.status
    }

    /// Pieces removed from the board by captures, in the order they were
    /// captured.
    #[must_use]
    pub fn captured(&self) -> &[Piece] {
        &self.captured
    }

    /// Calculates the legal moves of the piece standing at `square`: the
    /// pseudo-legal moves that do not leave its own king attacked. Works for
    /// either color regardless of whose turn it is.
    ///
    /// # Errors
    ///
    /// [`MoveError::NoPiece`] if `square` is empty.
    pub fn valid_moves(&self, square: Coordinate) -> Result<MoveList, MoveError> {
        match self.board.get(square) {
            Some(piece) => Ok(king_safe_moves(&self.board, piece, square)),
            None => Err(MoveError::NoPiece(square)),
        }
    }

    /// All legal moves of the side to move, grouped by square in
    /// [`Coordinate::iter`] order.
    #[must_use]
    pub fn legal_moves(&self) -> Vec<Move> {
        legal_moves(&self.board, self.turn)
    }

    /// Plays `next_move` for the side to move and re-evaluates the status for
    /// the opponent.
    ///
    /// # Errors
    ///
    /// If the game is finished, there is no piece at the origin, the piece
    /// belongs to the opponent or the move (including its promotion) is not
    /// legal. The game is unchanged in that case.
    pub fn make_move(&mut self, next_move: Move) -> Result<(), MoveError> {
        if let Err(error) = self.validate(next_move) {
            debug!("Rejected {next_move}: {error}");
            return Err(error);
        }
        let mover = self.turn;
        if let Some(captured) = self.board.apply(&next_move) {
            debug_assert_eq!(captured.color(), mover.opponent());
            self.captured.push(captured);
        }
        self.turn = mover.opponent();
        self.status = self.evaluate_status();
        debug!("{mover} played {next_move}, status: {}", self.status);
        if self.status.is_terminal() {
            info!("Game finished: {}", self.status);
        }
        Ok(())
    }

    fn validate(&self, next_move: Move) -> Result<(), MoveError> {
        if self.status.is_terminal() {
            return Err(MoveError::GameOver(self.status));
        }
        let square = next_move.from();
        let Some(piece) = self.board.get(square) else {
            return Err(MoveError::NoPiece(square));
        };
        if piece.color() != self.turn {
            return Err(MoveError::WrongTurn {
                square,
                owner: piece.color(),
                turn: self.turn,
            });
        }
        if !self.valid_moves(square)?.contains(&next_move) {
            return Err(MoveError::Illegal(next_move));
        }
        Ok(())
    }

    /// Checks whether the king of `color` is attacked.
    ///
    /// # Panics
    ///
    /// If `color` has no king on the board: positions reached through
    /// [`Game::make_move`] always have one.
    #[must_use]
    pub fn is_in_check(&self, color: Color) -> bool {
        is_in_check(&self.board, color)
    }

    /// In check and no legal move to get out of it.
    #[must_use]
    pub fn is_in_checkmate(&self, color: Color) -> bool {
        is_in_check(&self.board, color) && !has_legal_moves(&self.board, color)
    }

    /// Not in check but no legal moves either. Only meaningful for the side to
    /// move.
    #[must_use]
    pub fn is_in_stalemate(&self, color: Color) -> bool {
        !is_in_check(&self.board, color) && !has_legal_moves(&self.board, color)
    }

    /// Ends the game externally (e.g. on resignation). A game that is already
    /// finished keeps its status.
    pub fn mark_over(&mut self) {
        if !self.status.is_terminal() {
            self.status = GameStatus::Over;
            info!("Game marked over, {} was to move", self.turn);
        }
    }

    /// Counts the leaves of the legal move tree of given depth. [Perft] is
    /// used to check move generation against known results.
    ///
    /// [Perft]: https://www.chessprogramming.org/Perft
    #[must_use]
    pub fn perft(&self, depth: u8) -> u64 {
        perft(&self.board, self.turn, depth)
    }

    fn evaluate_status(&self) -> GameStatus {
        let color = self.turn;
        match (
            is_in_check(&self.board, color),
            has_legal_moves(&self.board, color),
        ) {
            (true, false) => GameStatus::Checkmate(color),
            (false, false) => GameStatus::Stalemate(color),
            (true, true) => GameStatus::Check(color),
            (false, true) => GameStatus::InProgress,
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<&str> for Game {
    type Error = anyhow::Error;

    fn try_from(fen: &str) -> anyhow::Result<Self> {
        Self::from_fen(fen)
    }
}

impl fmt::Display for Game {
    /// Prints piece placement and side to move (the first two FEN fields).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.board, self.turn)
    }
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:?}", &self.board)?;
        writeln!(f, "Player to move: {:?}", &self.turn)?;
        writeln!(f, "Status: {}", &self.status)?;
        writeln!(f, "Captured: {:?}", &self.captured)?;
        writeln!(f, "FEN: {self}")?;
        Ok(())
    }
}

fn is_in_check(board: &Board, color: Color) -> bool {
    let Some(king) = board.king(color) else {
        panic!("{color:?} king is missing from the board:\n{board:?}");
    };
    board.is_attacked(king, color.opponent())
}

/// Filters out the moves that would leave the mover's king attacked by trying
/// each of them on a snapshot.
fn king_safe_moves(board: &Board, piece: Piece, square: Coordinate) -> MoveList {
    let mut moves = piece.pseudo_legal_moves(board, square);
    moves.retain(|candidate| {
        let mut snapshot = board.clone();
        let _ = snapshot.apply(candidate);
        !is_in_check(&snapshot, piece.color())
    });
    moves
}

fn legal_moves(board: &Board, color: Color) -> Vec<Move> {
    board
        .pieces_of(color)
        .flat_map(|(square, piece)| king_safe_moves(board, piece, square))
        .collect()
}

fn has_legal_moves(board: &Board, color: Color) -> bool {
    board
        .pieces_of(color)
        .any(|(square, piece)| !king_safe_moves(board, piece, square).is_empty())
}

fn perft(board: &Board, turn: Color, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = legal_moves(board, turn);
    if depth == 1 {
        return moves.len() as u64;
    }
    moves
        .iter()
        .map(|next_move| {
            let mut next = board.clone();
            let _ = next.apply(next_move);
            perft(&next, turn.opponent(), depth - 1)
        })
        .sum()
}
