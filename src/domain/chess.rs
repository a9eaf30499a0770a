//! Pure chess domain types and utilities.
//! No GPUI dependencies - this is the domain layer.

use shakmaty::{Chess, Color as SColor, Position, Role, Square};

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    /// Position in `ALL`, used for per-type tables
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            PieceKind::Pawn => "Pawn",
            PieceKind::Knight => "Knight",
            PieceKind::Bishop => "Bishop",
            PieceKind::Rook => "Rook",
            PieceKind::Queen => "Queen",
            PieceKind::King => "King",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum PieceColor {
    White,
    Black,
}

impl PieceColor {
    pub fn opposite(self) -> Self {
        match self {
            PieceColor::White => PieceColor::Black,
            PieceColor::Black => PieceColor::White,
        }
    }

    /// Rank direction of this side's pawns
    pub fn forward(self) -> i32 {
        match self {
            PieceColor::White => 1,
            PieceColor::Black => -1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PieceColor::White => "White",
            PieceColor::Black => "Black",
        }
    }
}

impl From<SColor> for PieceColor {
    fn from(color: SColor) -> Self {
        match color {
            SColor::White => PieceColor::White,
            SColor::Black => PieceColor::Black,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: PieceColor,
}

impl Piece {
    pub fn new(kind: PieceKind, color: PieceColor) -> Self {
        Self { kind, color }
    }

    /// Unicode glyph drawn by the board view
    pub fn glyph(&self) -> &'static str {
        match (self.kind, self.color) {
            (PieceKind::Pawn, PieceColor::White) => "♙",
            (PieceKind::Pawn, PieceColor::Black) => "♟",
            (PieceKind::Knight, PieceColor::White) => "♘",
            (PieceKind::Knight, PieceColor::Black) => "♞",
            (PieceKind::Bishop, PieceColor::White) => "♗",
            (PieceKind::Bishop, PieceColor::Black) => "♝",
            (PieceKind::Rook, PieceColor::White) => "♖",
            (PieceKind::Rook, PieceColor::Black) => "♜",
            (PieceKind::Queen, PieceColor::White) => "♕",
            (PieceKind::Queen, PieceColor::Black) => "♛",
            (PieceKind::King, PieceColor::White) => "♔",
            (PieceKind::King, PieceColor::Black) => "♚",
        }
    }
}

/// Zero-based file index of a square (a = 0)
pub fn file_of(sq: Square) -> i32 {
    sq.file() as i32
}

/// Zero-based rank index of a square (rank 1 = 0)
pub fn rank_of(sq: Square) -> i32 {
    sq.rank() as i32
}

/// Square at the given file/rank, or None when off the board
pub fn square_at(file: i32, rank: i32) -> Option<Square> {
    if (0..8).contains(&file) && (0..8).contains(&rank) {
        Some(Square::new((rank * 8 + file) as u32))
    } else {
        None
    }
}

/// Convert row/col (0-indexed, row 0 = rank 8) to shakmaty Square
pub fn to_square(row: usize, col: usize) -> Square {
    Square::new(((7 - row) * 8 + col) as u32)
}

/// Inverse of `to_square`: (row, col) with row 0 = rank 8
pub fn to_row_col(sq: Square) -> (usize, usize) {
    ((7 - rank_of(sq)) as usize, file_of(sq) as usize)
}

/// Convert shakmaty piece to our domain Piece
pub fn shakmaty_to_piece(piece: shakmaty::Piece) -> Piece {
    let kind = match piece.role {
        Role::Pawn => PieceKind::Pawn,
        Role::Knight => PieceKind::Knight,
        Role::Bishop => PieceKind::Bishop,
        Role::Rook => PieceKind::Rook,
        Role::Queen => PieceKind::Queen,
        Role::King => PieceKind::King,
    };
    Piece {
        kind,
        color: piece.color.into(),
    }
}

/// Read-only occupancy snapshot of a position.
///
/// Squares are stored in shakmaty index order (a1, b1, ..., h8).
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct BoardSnapshot {
    squares: [Option<Piece>; 64],
    turn: PieceColor,
}

impl BoardSnapshot {
    pub fn empty(turn: PieceColor) -> Self {
        Self {
            squares: [None; 64],
            turn,
        }
    }

    pub fn from_position(position: &Chess) -> Self {
        let mut snapshot = Self::empty(position.turn().into());
        let board = position.board();
        for index in 0..64u32 {
            let sq = Square::new(index);
            snapshot.squares[index as usize] = board.piece_at(sq).map(shakmaty_to_piece);
        }
        snapshot
    }

    /// Parse a FEN string into a snapshot (castling rights are validated by shakmaty)
    #[cfg(test)]
    pub fn from_fen(fen: &str) -> anyhow::Result<Self> {
        use shakmaty::CastlingMode;
        use shakmaty::fen::Fen;

        let position: Chess = fen
            .parse::<Fen>()?
            .into_position(CastlingMode::Standard)
            .map_err(|e| anyhow::anyhow!("invalid position {fen:?}: {e}"))?;
        Ok(Self::from_position(&position))
    }

    /// Place a piece regardless of legality
    #[cfg(test)]
    pub fn with_piece(mut self, sq: Square, piece: Piece) -> Self {
        self.squares[sq as usize] = Some(piece);
        self
    }

    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.squares[sq as usize]
    }

    pub fn is_occupied(&self, sq: Square) -> bool {
        self.squares[sq as usize].is_some()
    }

    pub fn turn(&self) -> PieceColor {
        self.turn
    }

    /// All occupied squares in a1..h8 order
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.squares
            .iter()
            .enumerate()
            .filter_map(|(i, p)| p.map(|p| (Square::new(i as u32), p)))
    }
}
