//! Chess primitives commonly used within [`crate::chess`].

use std::fmt::{self, Write};
use std::ops::Not;
use std::str::FromStr;

use anyhow::bail;
use arrayvec::ArrayVec;
use itertools::Itertools;

#[allow(missing_docs)]
pub const BOARD_WIDTH: u8 = 8;
#[allow(missing_docs)]
pub const BOARD_SIZE: u8 = BOARD_WIDTH * BOARD_WIDTH;

/// Upper bound on the number of moves a single piece can produce: a queen in
/// the center of an empty board has 27, a pawn with three promoting targets
/// has 12.
pub const MAX_PIECE_MOVES: usize = 32;

/// Moves available to a single piece. Stored inline: generating them does not
/// allocate.
pub type MoveList = ArrayVec<Move, MAX_PIECE_MOVES>;

/// A square of the board identified by its rank (row, 1 is White's back rank)
/// and file (column, 1 is the a-file). Both values are always within
/// `1..=8`: out-of-board coordinates only appear transiently during move
/// generation as [`None`] from [`Coordinate::offset`].
///
/// ```
/// use gambit::chess::core::Coordinate;
///
/// let e2 = Coordinate::new(2, 5).unwrap();
/// assert_eq!(e2.to_string(), "e2");
/// assert_eq!(Coordinate::try_from("e2").unwrap(), e2);
/// assert!(Coordinate::new(0, 5).is_err());
/// assert!(Coordinate::new(2, 9).is_err());
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct Coordinate {
    rank: u8,
    file: u8,
}

impl Coordinate {
    /// Creates a coordinate from one-based rank and file.
    ///
    /// # Errors
    ///
    /// If either value is outside `1..=8`.
    pub fn new(rank: u8, file: u8) -> anyhow::Result<Self> {
        match Self::checked(rank, file) {
            Some(coordinate) => Ok(coordinate),
            None => bail!("coordinate should be within 1..=BOARD_WIDTH, got ({rank}, {file})"),
        }
    }

    const fn checked(rank: u8, file: u8) -> Option<Self> {
        if rank >= 1 && rank <= BOARD_WIDTH && file >= 1 && file <= BOARD_WIDTH {
            Some(Self { rank, file })
        } else {
            None
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn rank(self) -> u8 {
        self.rank
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn file(self) -> u8 {
        self.file
    }

    /// Shifts the coordinate by the given number of ranks and files. Returns
    /// [`None`] when the result falls off the board.
    #[must_use]
    pub const fn offset(self, ranks: i8, files: i8) -> Option<Self> {
        match (
            self.rank.checked_add_signed(ranks),
            self.file.checked_add_signed(files),
        ) {
            (Some(rank), Some(file)) => Self::checked(rank, file),
            _ => None,
        }
    }

    /// Position of the square in rank-major order: (1, 1) is 0, (8, 8) is 63.
    pub(super) fn index(self) -> usize {
        usize::from((self.rank - 1) * BOARD_WIDTH + (self.file - 1))
    }

    /// All squares of the board, rank by rank starting from (1, 1). Every
    /// whole-board scan in the engine uses this order.
    pub fn iter() -> impl Iterator<Item = Self> {
        (1..=BOARD_WIDTH)
            .flat_map(|rank| (1..=BOARD_WIDTH).map(move |file| Self { rank, file }))
    }
}

impl TryFrom<&str> for Coordinate {
    type Error = anyhow::Error;

    /// Parses algebraic notation: file letter followed by the rank digit.
    fn try_from(square: &str) -> anyhow::Result<Self> {
        let (file, rank) = match square.chars().collect_tuple() {
            Some((file, rank)) => (file, rank),
            None => bail!(
                "square should be two-char, got {square} with {} chars",
                square.chars().count()
            ),
        };
        let file = match file {
            'a'..='h' => file as u8 - b'a' + 1,
            _ => bail!("file should be within 'a'..='h', got '{file}'"),
        };
        let rank = match rank {
            '1'..='8' => rank as u8 - b'0',
            _ => bail!("rank should be within '1'..='8', got '{rank}'"),
        };
        Self::new(rank, file)
    }
}

impl TryFrom<String> for Coordinate {
    type Error = anyhow::Error;

    fn try_from(square: String) -> anyhow::Result<Self> {
        Self::try_from(square.as_str())
    }
}

impl From<Coordinate> for String {
    fn from(coordinate: Coordinate) -> Self {
        coordinate.to_string()
    }
}

impl FromStr for Coordinate {
    type Err = anyhow::Error;

    fn from_str(square: &str) -> anyhow::Result<Self> {
        Self::try_from(square)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char((b'a' + self.file - 1) as char)?;
        write!(f, "{}", self.rank)
    }
}

/// A standard game of chess is played between two players: White (having the
/// advantage of the first turn) and Black.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "UPPERCASE")
)]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// "Flips" the color.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// Rank where the pieces start.
    #[must_use]
    pub const fn back_rank(self) -> u8 {
        match self {
            Self::White => 1,
            Self::Black => BOARD_WIDTH,
        }
    }

    /// Rank where the pawns start and are allowed to advance two squares.
    #[must_use]
    pub const fn pawn_start_rank(self) -> u8 {
        match self {
            Self::White => 2,
            Self::Black => BOARD_WIDTH - 1,
        }
    }

    /// The farthest rank for the pawns of this color: they promote there.
    #[must_use]
    pub const fn promotion_rank(self) -> u8 {
        self.opponent().back_rank()
    }

    /// Rank delta of a single pawn push.
    #[must_use]
    pub const fn pawn_direction(self) -> i8 {
        match self {
            Self::White => 1,
            Self::Black => -1,
        }
    }
}

impl Not for Color {
    type Output = Self;

    fn not(self) -> Self::Output {
        self.opponent()
    }
}

impl TryFrom<&str> for Color {
    type Error = anyhow::Error;

    fn try_from(color: &str) -> anyhow::Result<Self> {
        match color {
            "w" | "white" => Ok(Self::White),
            "b" | "black" => Ok(Self::Black),
            _ => bail!("color should be 'w' or 'b', got '{color}'"),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(match &self {
            Self::White => 'w',
            Self::Black => 'b',
        })
    }
}

/// Standard [chess pieces].
///
/// [chess pieces]: https://en.wikipedia.org/wiki/Chess_piece
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "UPPERCASE")
)]
pub enum PieceKind {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

impl PieceKind {
    /// Kinds a pawn can be promoted to, in the order promotion moves are
    /// generated.
    pub const PROMOTIONS: [Self; 4] = [Self::Queen, Self::Rook, Self::Bishop, Self::Knight];

    #[allow(missing_docs)]
    #[must_use]
    pub fn is_promotion(self) -> bool {
        Self::PROMOTIONS.contains(&self)
    }
}

impl TryFrom<char> for PieceKind {
    type Error = anyhow::Error;

    fn try_from(symbol: char) -> anyhow::Result<Self> {
        match symbol.to_ascii_lowercase() {
            'k' => Ok(Self::King),
            'q' => Ok(Self::Queen),
            'r' => Ok(Self::Rook),
            'b' => Ok(Self::Bishop),
            'n' => Ok(Self::Knight),
            'p' => Ok(Self::Pawn),
            _ => bail!("piece kind should be within \"kqrbnp\", got '{symbol}'"),
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(match &self {
            Self::King => 'k',
            Self::Queen => 'q',
            Self::Rook => 'r',
            Self::Bishop => 'b',
            Self::Knight => 'n',
            Self::Pawn => 'p',
        })
    }
}

/// Represents a specific piece owned by a player. The color is fixed for the
/// lifetime of the piece; the kind only changes through [`Piece::promote`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Piece {
    color: Color,
    kind: PieceKind,
}

impl Piece {
    #[allow(missing_docs)]
    #[must_use]
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        Self { color, kind }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn color(self) -> Color {
        self.color
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn kind(self) -> PieceKind {
        self.kind
    }

    /// Replaces the kind of a pawn that reached its promotion rank.
    pub fn promote(&mut self, kind: PieceKind) {
        debug_assert!(self.kind == PieceKind::Pawn, "only pawns are promoted");
        debug_assert!(kind.is_promotion(), "can not promote to {kind:?}");
        self.kind = kind;
    }
}

impl TryFrom<char> for Piece {
    type Error = anyhow::Error;

    /// Parses FEN symbols: uppercase for White, lowercase for Black.
    fn try_from(symbol: char) -> anyhow::Result<Self> {
        let kind = match PieceKind::try_from(symbol) {
            Ok(kind) => kind,
            Err(_) => bail!("piece symbol should be within \"KQRBNPkqrbnp\", got '{symbol}'"),
        };
        let color = if symbol.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Ok(Self::new(color, kind))
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = self.kind.to_string();
        // White player: uppercase symbols.
        match self.color {
            Color::White => f.write_str(&symbol.to_ascii_uppercase()),
            Color::Black => f.write_str(&symbol),
        }
    }
}

/// Describes an intended transition of one piece: it does not mutate anything
/// by itself. Moves are compared structurally, so two moves are the same iff
/// their origin, destination and promotion are.
///
/// A pawn move onto its promotion rank always carries `Some` promotion: the
/// move generator never produces such a move without one, hence a request with
/// [`None`] there is never legal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Move {
    from: Coordinate,
    to: Coordinate,
    promotion: Option<PieceKind>,
}

impl Move {
    #[allow(missing_docs)]
    #[must_use]
    pub const fn new(from: Coordinate, to: Coordinate, promotion: Option<PieceKind>) -> Self {
        Self {
            from,
            to,
            promotion,
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn from(&self) -> Coordinate {
        self.from
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn to(&self) -> Coordinate {
        self.to
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn promotion(&self) -> Option<PieceKind> {
        self.promotion
    }

    /// Parses a move in [UCI format] (e.g. `e2e4` or `e7e8q`).
    ///
    /// # Errors
    ///
    /// If the squares are malformed or the promotion symbol is not one of
    /// `qrbn`.
    ///
    /// [UCI format]: http://wbec-ridderkerk.nl/html/UCIProtocol.html
    pub fn from_uci(uci: &str) -> anyhow::Result<Self> {
        let uci = uci.trim();
        if !uci.is_ascii() || !(4..=5).contains(&uci.len()) {
            bail!("UCI move should be 4 or 5 ASCII chars, got '{uci}'");
        }
        let from = Coordinate::try_from(&uci[..2])?;
        let to = Coordinate::try_from(&uci[2..4])?;
        let promotion = match uci[4..].chars().next() {
            None => None,
            Some(symbol) => match PieceKind::try_from(symbol) {
                Ok(kind) if kind.is_promotion() && symbol.is_ascii_lowercase() => Some(kind),
                _ => bail!("promotion should be one of 'q', 'r', 'b', 'n', got '{symbol}'"),
            },
        };
        Ok(Self::new(from, to, promotion))
    }
}

impl FromStr for Move {
    type Err = anyhow::Error;

    fn from_str(uci: &str) -> anyhow::Result<Self> {
        Self::from_uci(uci)
    }
}

impl fmt::Display for Move {
    /// Serializes a move in [UCI format].
    ///
    /// [UCI format]: http://wbec-ridderkerk.nl/html/UCIProtocol.html
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promotion) = self.promotion {
            write!(f, "{promotion}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::mem::size_of;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn coordinate() {
        let coordinates: Vec<_> = [(1, 1), (8, 8), (0, 1), (1, 9), (4, 4), (9, 9), (2, 7)]
            .iter()
            .filter_map(|&(rank, file)| Coordinate::new(rank, file).ok())
            .map(|coordinate| coordinate.to_string())
            .collect();
        assert_eq!(coordinates, vec!["a1", "h8", "d4", "g2"]);
    }

    #[test]
    #[should_panic(expected = "coordinate should be within 1..=BOARD_WIDTH, got (9, 1)")]
    fn coordinate_out_of_range() {
        let _ = Coordinate::new(9, 1).unwrap();
    }

    #[test]
    #[should_panic(expected = "file should be within 'a'..='h', got 'i'")]
    fn coordinate_from_incorrect_file() {
        let _ = Coordinate::try_from("i1").unwrap();
    }

    #[test]
    #[should_panic(expected = "rank should be within '1'..='8', got '9'")]
    fn coordinate_from_incorrect_rank() {
        let _ = Coordinate::try_from("a9").unwrap();
    }

    #[test]
    #[should_panic(expected = "square should be two-char, got e10 with 3 chars")]
    fn coordinate_from_long_input() {
        let _ = Coordinate::try_from("e10").unwrap();
    }

    #[test]
    fn coordinate_iteration_order() {
        let squares = Coordinate::iter().collect::<Vec<_>>();
        assert_eq!(squares.len(), usize::from(BOARD_SIZE));
        assert_eq!(squares[0].to_string(), "a1");
        assert_eq!(squares[7].to_string(), "h1");
        assert_eq!(squares[8].to_string(), "a2");
        assert_eq!(squares[63].to_string(), "h8");
        for (index, square) in squares.iter().enumerate() {
            assert_eq!(square.index(), index);
        }
        assert!(squares.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn offsets() {
        let e4 = Coordinate::try_from("e4").unwrap();
        assert_eq!(e4.offset(1, 0), Coordinate::try_from("e5").ok());
        assert_eq!(e4.offset(-1, -1), Coordinate::try_from("d3").ok());
        assert_eq!(e4.offset(2, 1), Coordinate::try_from("f6").ok());
        assert_eq!(e4.offset(4, 0), Coordinate::try_from("e8").ok());
        assert_eq!(e4.offset(5, 0), None);
        assert_eq!(e4.offset(0, -5), None);

        let a1 = Coordinate::try_from("a1").unwrap();
        for (ranks, files) in [(-1, 0), (0, -1), (-1, -1), (1, -1), (-2, 1)] {
            assert_eq!(a1.offset(ranks, files), None);
        }
        let h8 = Coordinate::try_from("h8").unwrap();
        for (ranks, files) in [(1, 0), (0, 1), (1, 1), (-1, 1), (2, -1)] {
            assert_eq!(h8.offset(ranks, files), None);
        }
    }

    #[test]
    fn color() {
        assert_eq!(!Color::White, Color::Black);
        assert_eq!(Color::Black.opponent(), Color::White);
        assert_eq!(Color::White.promotion_rank(), 8);
        assert_eq!(Color::Black.promotion_rank(), 1);
        assert_eq!(Color::White.pawn_start_rank(), 2);
        assert_eq!(Color::Black.pawn_start_rank(), 7);
        assert_eq!(Color::try_from("b").unwrap(), Color::Black);
        assert_eq!(Color::try_from("white").unwrap(), Color::White);
        assert!(Color::try_from("x").is_err());
    }

    #[test]
    fn pieces() {
        assert_eq!(
            "KQRBNPkqrbnp"
                .chars()
                .filter_map(|symbol| Piece::try_from(symbol).ok())
                .map(|piece| piece.to_string())
                .collect::<String>(),
            "KQRBNPkqrbnp"
        );
        assert_eq!(
            Piece::try_from('n').unwrap(),
            Piece::new(Color::Black, PieceKind::Knight)
        );
        assert!(Piece::try_from('x').is_err());
    }

    #[test]
    fn promotion_keeps_color() {
        let mut piece = Piece::new(Color::Black, PieceKind::Pawn);
        piece.promote(PieceKind::Knight);
        assert_eq!(piece, Piece::new(Color::Black, PieceKind::Knight));
    }

    #[test]
    fn uci_moves() {
        let quiet = Move::from_uci("g1f3").unwrap();
        assert_eq!(quiet.from(), Coordinate::new(1, 7).unwrap());
        assert_eq!(quiet.to(), Coordinate::new(3, 6).unwrap());
        assert_eq!(quiet.promotion(), None);
        assert_eq!(quiet.to_string(), "g1f3");

        let promotion: Move = "b7b8n".parse().unwrap();
        assert_eq!(promotion.promotion(), Some(PieceKind::Knight));
        assert_eq!(promotion.to_string(), "b7b8n");

        assert!(Move::from_uci("e7e8k").is_err());
        assert!(Move::from_uci("e7e8Q").is_err());
        assert!(Move::from_uci("e2").is_err());
        assert!(Move::from_uci("e2e9").is_err());
        assert!(Move::from_uci("e2e4qq").is_err());
    }

    #[test]
    fn primitive_size() {
        assert_eq!(size_of::<Coordinate>(), 2);
        // Niche optimizations keep optional values as small as the values.
        assert_eq!(size_of::<PieceKind>(), size_of::<Option<PieceKind>>());
        assert_eq!(size_of::<Piece>(), size_of::<Option<Piece>>());
    }
}
