//! Square-centric board representation: every one of the 64 squares maps to
//! an optional piece.
//!
//! The board holds plain values inline, so [`Clone`] is a complete snapshot:
//! the copy shares no state with the original and can be mutated freely to
//! simulate a move.

use std::fmt::{self, Write};
use std::ops::Index;

use anyhow::bail;

use crate::chess::core::{Color, Coordinate, Move, Piece, PieceKind, BOARD_SIZE, BOARD_WIDTH};

/// Piece placement of the standard starting position, from White's back rank
/// (files a through h).
const BACK_RANK: [PieceKind; BOARD_WIDTH as usize] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// Mapping from each [`Coordinate`] to the piece standing there, if any. At
/// most one piece occupies a square.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Board {
    squares: [Option<Piece>; BOARD_SIZE as usize],
}

impl Board {
    /// Creates a board without any pieces.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            squares: [None; BOARD_SIZE as usize],
        }
    }

    /// Creates the board of the standard starting position.
    ///
    /// ```
    /// use gambit::chess::board::Board;
    ///
    /// assert_eq!(
    ///     Board::starting().to_string(),
    ///     "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR"
    /// );
    /// ```
    #[must_use]
    pub fn starting() -> Self {
        let mut board = Self::empty();
        for color in [Color::White, Color::Black] {
            for (file, kind) in (1..=BOARD_WIDTH).zip(BACK_RANK) {
                board.put(color.back_rank(), file, Piece::new(color, kind));
                board.put(
                    color.pawn_start_rank(),
                    file,
                    Piece::new(color, PieceKind::Pawn),
                );
            }
        }
        board
    }

    fn put(&mut self, rank: u8, file: u8, piece: Piece) {
        if let Ok(square) = Coordinate::new(rank, file) {
            self.set(square, Some(piece));
        }
    }

    /// Returns the piece standing at `square`.
    #[must_use]
    pub fn get(&self, square: Coordinate) -> Option<Piece> {
        self.squares[square.index()]
    }

    /// Places `piece` at `square`; [`None`] clears the square.
    pub fn set(&mut self, square: Coordinate, piece: Option<Piece>) {
        self.squares[square.index()] = piece;
    }

    /// Occupied squares in [`Coordinate::iter`] order.
    pub fn pieces(&self) -> impl Iterator<Item = (Coordinate, Piece)> + '_ {
        Coordinate::iter().filter_map(|square| self.get(square).map(|piece| (square, piece)))
    }

    /// Squares occupied by the pieces of `color`.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Coordinate, Piece)> + '_ {
        self.pieces().filter(move |(_, piece)| piece.color() == color)
    }

    /// Number of pieces `color` has on the board.
    #[must_use]
    pub fn count(&self, color: Color) -> usize {
        self.pieces_of(color).count()
    }

    /// Finds the king of `color`. A board reached through legal play always
    /// has exactly one.
    #[must_use]
    pub fn king(&self, color: Color) -> Option<Coordinate> {
        self.pieces_of(color)
            .find(|(_, piece)| piece.kind() == PieceKind::King)
            .map(|(square, _)| square)
    }

    /// Checks whether any piece of `attacker` has a pseudo-legal move landing
    /// on `target`.
    #[must_use]
    pub fn is_attacked(&self, target: Coordinate, attacker: Color) -> bool {
        self.pieces_of(attacker).any(|(square, piece)| {
            piece
                .pseudo_legal_moves(self, square)
                .iter()
                .any(|candidate| candidate.to() == target)
        })
    }

    /// Moves the piece from `next_move.from()` to `next_move.to()`, promoting
    /// it if requested, and returns the piece that was standing on the
    /// destination. Does not check legality: callers validate the move first.
    pub(super) fn apply(&mut self, next_move: &Move) -> Option<Piece> {
        let Some(mut piece) = self.get(next_move.from()) else {
            panic!("no piece to move at {}", next_move.from());
        };
        if let Some(kind) = next_move.promotion() {
            piece.promote(kind);
        }
        let captured = self.get(next_move.to());
        self.set(next_move.from(), None);
        self.set(next_move.to(), Some(piece));
        captured
    }

    /// Parses the piece placement part of [Forsyth-Edwards Notation]: ranks
    /// from 8 to 1 separated by `/`, digits for runs of empty squares.
    ///
    /// # Errors
    ///
    /// If the input does not describe exactly 8 ranks of exactly 8 squares or
    /// contains unknown symbols.
    ///
    /// [Forsyth-Edwards Notation]: https://www.chessprogramming.org/Forsyth-Edwards_Notation
    pub fn from_fen_placement(placement: &str) -> anyhow::Result<Self> {
        let mut result = Self::empty();
        let mut rank = BOARD_WIDTH + 1;
        for rank_fen in placement.split('/') {
            if rank == 1 {
                bail!("incorrect FEN: expected 8 ranks, got {placement}");
            }
            rank -= 1;
            let mut file: u8 = 0;
            for symbol in rank_fen.chars() {
                match symbol {
                    '0' => bail!("increment can not be 0"),
                    '1'..='8' => {
                        file += symbol as u8 - b'0';
                        if file > BOARD_WIDTH {
                            bail!("file exceeded {BOARD_WIDTH} in {rank_fen}");
                        }
                        continue;
                    },
                    _ => (),
                }
                file += 1;
                if file > BOARD_WIDTH {
                    bail!("file exceeded {BOARD_WIDTH} in {rank_fen}");
                }
                let piece = Piece::try_from(symbol)?;
                result.set(Coordinate::new(rank, file)?, Some(piece));
            }
            if file != BOARD_WIDTH {
                bail!(
                    "incorrect FEN: rank size should be exactly {BOARD_WIDTH}, got {rank_fen} of \
                     length {file}"
                );
            }
        }
        if rank != 1 {
            bail!("incorrect FEN: there should be 8 ranks, got {placement}");
        }
        Ok(result)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl Index<Coordinate> for Board {
    type Output = Option<Piece>;

    fn index(&self, square: Coordinate) -> &Self::Output {
        &self.squares[square.index()]
    }
}

impl fmt::Display for Board {
    /// Prints board representation in FEN format.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (1..=BOARD_WIDTH).rev() {
            let mut empty_squares = 0;
            for file in 1..=BOARD_WIDTH {
                match Coordinate::new(rank, file).ok().and_then(|sq| self.get(sq)) {
                    Some(piece) => {
                        if empty_squares != 0 {
                            write!(f, "{empty_squares}")?;
                            empty_squares = 0;
                        }
                        write!(f, "{piece}")?;
                    },
                    None => empty_squares += 1,
                }
            }
            if empty_squares != 0 {
                write!(f, "{empty_squares}")?;
            }
            if rank != 1 {
                const RANK_SEPARATOR: char = '/';
                f.write_char(RANK_SEPARATOR)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    /// Dumps the board in a simple format ('.' for empty square, FEN algebraic
    /// symbol for piece), rank 8 at the top.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (1..=BOARD_WIDTH).rev() {
            for file in 1..=BOARD_WIDTH {
                match Coordinate::new(rank, file).ok().and_then(|sq| self.get(sq)) {
                    Some(piece) => write!(f, "{piece}"),
                    None => f.write_char('.'),
                }?;
                if file != BOARD_WIDTH {
                    f.write_str(SQUARE_SEPARATOR)?;
                }
            }
            if rank != 1 {
                f.write_str(LINE_SEPARATOR)?;
            }
        }
        Ok(())
    }
}

const LINE_SEPARATOR: &str = "\n";
const SQUARE_SEPARATOR: &str = " ";
