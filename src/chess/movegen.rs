//! Geometry of the pieces: generates [pseudo-legal] moves, i.e. moves that
//! respect the way each piece moves, board edges and occupancy, but ignore
//! whether the mover's own king is left attacked. [`crate::chess::game::Game`]
//! filters those by simulating each candidate.
//!
//! The moves are emitted in a fixed order (directions and offsets in
//! declaration order, promotions in [`PieceKind::PROMOTIONS`] order), so the
//! result is stable for a given board.
//!
//! [pseudo-legal]: https://www.chessprogramming.org/Pseudo-Legal_Move

use crate::chess::board::Board;
use crate::chess::core::{Coordinate, Move, MoveList, Piece, PieceKind};

/// (rank, file) deltas.
type Offset = (i8, i8);

const ORTHOGONAL: [Offset; 4] = [(1, 0), (0, 1), (-1, 0), (0, -1)];
const DIAGONAL: [Offset; 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const KING_OFFSETS: [Offset; 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];
const KNIGHT_OFFSETS: [Offset; 8] = [
    (2, 1),
    (1, 2),
    (-1, 2),
    (-2, 1),
    (-2, -1),
    (-1, -2),
    (1, -2),
    (2, -1),
];

impl Piece {
    /// Calculates the moves this piece standing at `at` can make on `board`
    /// without taking the safety of its own king into account.
    ///
    /// Own pieces are never captured. Opponent pieces, including the king,
    /// are regular capture targets: king safety is decided by simulation and
    /// relies on these "king captures" to detect attacks.
    #[must_use]
    pub fn pseudo_legal_moves(self, board: &Board, at: Coordinate) -> MoveList {
        debug_assert_eq!(board.get(at), Some(self), "piece should stand at {at}");
        let mut moves = MoveList::new();
        match self.kind() {
            PieceKind::King => self.step_moves(board, at, &KING_OFFSETS, &mut moves),
            PieceKind::Knight => self.step_moves(board, at, &KNIGHT_OFFSETS, &mut moves),
            PieceKind::Rook => self.slide_moves(board, at, &ORTHOGONAL, &mut moves),
            PieceKind::Bishop => self.slide_moves(board, at, &DIAGONAL, &mut moves),
            PieceKind::Queen => {
                self.slide_moves(board, at, &ORTHOGONAL, &mut moves);
                self.slide_moves(board, at, &DIAGONAL, &mut moves);
            },
            PieceKind::Pawn => self.pawn_moves(board, at, &mut moves),
        }
        moves
    }

    /// Empty squares and opponent pieces are valid targets.
    fn can_land_on(self, board: &Board, target: Coordinate) -> bool {
        board
            .get(target)
            .map_or(true, |piece| piece.color() != self.color())
    }

    fn step_moves(self, board: &Board, at: Coordinate, offsets: &[Offset], moves: &mut MoveList) {
        for &(ranks, files) in offsets {
            if let Some(target) = at.offset(ranks, files) {
                if self.can_land_on(board, target) {
                    moves.push(Move::new(at, target, None));
                }
            }
        }
    }

    fn slide_moves(
        self,
        board: &Board,
        at: Coordinate,
        directions: &[Offset],
        moves: &mut MoveList,
    ) {
        for &(ranks, files) in directions {
            let mut current = at;
            while let Some(target) = current.offset(ranks, files) {
                match board.get(target) {
                    None => moves.push(Move::new(at, target, None)),
                    Some(blocker) => {
                        if blocker.color() != self.color() {
                            moves.push(Move::new(at, target, None));
                        }
                        break;
                    },
                }
                current = target;
            }
        }
    }

    fn pawn_moves(self, board: &Board, at: Coordinate, moves: &mut MoveList) {
        let color = self.color();
        let forward = color.pawn_direction();

        if let Some(push) = at.offset(forward, 0) {
            if board.get(push).is_none() {
                push_pawn_move(at, push, color.promotion_rank(), moves);
                // Double push is only possible when the single push is.
                if at.rank() == color.pawn_start_rank() {
                    if let Some(double_push) = push.offset(forward, 0) {
                        if board.get(double_push).is_none() {
                            moves.push(Move::new(at, double_push, None));
                        }
                    }
                }
            }
        }

        for files in [-1, 1] {
            if let Some(target) = at.offset(forward, files) {
                if board
                    .get(target)
                    .is_some_and(|piece| piece.color() != color)
                {
                    push_pawn_move(at, target, color.promotion_rank(), moves);
                }
            }
        }
    }
}

/// Pawn moves onto the promotion rank are only ever emitted as the four
/// promotion variants.
fn push_pawn_move(from: Coordinate, to: Coordinate, promotion_rank: u8, moves: &mut MoveList) {
    if to.rank() == promotion_rank {
        for kind in PieceKind::PROMOTIONS {
            moves.push(Move::new(from, to, Some(kind)));
        }
    } else {
        moves.push(Move::new(from, to, None));
    }
}
