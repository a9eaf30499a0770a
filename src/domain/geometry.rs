//! Attack geometry: which squares a piece controls on a given board.
//!
//! "Control" is broader than a legal move. Pawns always control both forward
//! diagonals, and sliding pieces control every square along a ray up to and
//! including the first occupied square, whatever its color. Nothing here
//! consults whose turn it is or whether the king would be left in check.
//!
//! Output order is stable: direction-table order, then increasing distance.
//! The overlay relies on this for z-stacking.

use shakmaty::Square;

use crate::domain::chess::{BoardSnapshot, PieceColor, PieceKind, file_of, rank_of, square_at};

/// Knight jumps: (±1, ±2) and (±2, ±1)
pub const KNIGHT_OFFSETS: [(i32, i32); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

/// King steps: all 8 adjacent squares
pub const KING_OFFSETS: [(i32, i32); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

const ROOK_DIRECTIONS: [(i32, i32); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];
const BISHOP_DIRECTIONS: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];
const QUEEN_DIRECTIONS: [(i32, i32); 8] = [
    (0, 1),
    (1, 0),
    (0, -1),
    (-1, 0),
    (1, 1),
    (1, -1),
    (-1, -1),
    (-1, 1),
];

/// Ray directions of a sliding piece; empty for everything else
pub fn ray_directions(kind: PieceKind) -> &'static [(i32, i32)] {
    match kind {
        PieceKind::Bishop => &BISHOP_DIRECTIONS,
        PieceKind::Rook => &ROOK_DIRECTIONS,
        PieceKind::Queen => &QUEEN_DIRECTIONS,
        PieceKind::Pawn | PieceKind::Knight | PieceKind::King => &[],
    }
}

/// Squares controlled by a piece of `kind`/`color` standing on `from`.
pub fn attacks_of(kind: PieceKind, color: PieceColor, from: Square, board: &BoardSnapshot) -> Vec<Square> {
    match kind {
        PieceKind::Pawn => {
            let rank = rank_of(from) + color.forward();
            [-1, 1]
                .iter()
                .filter_map(|df| square_at(file_of(from) + df, rank))
                .collect()
        }
        PieceKind::Knight => jumps(from, &KNIGHT_OFFSETS),
        PieceKind::King => jumps(from, &KING_OFFSETS),
        PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => {
            rays_of(kind, from, board).into_iter().flatten().collect()
        }
    }
}

/// Furthest square reached along each non-empty ray of a sliding piece.
///
/// Used for arrow rendering so a ray is drawn once instead of per square.
/// Non-sliding kinds have no rays and return an empty vector.
pub fn ray_endpoints_of(
    kind: PieceKind,
    _color: PieceColor,
    from: Square,
    board: &BoardSnapshot,
) -> Vec<Square> {
    rays_of(kind, from, board)
        .into_iter()
        .filter_map(|ray| ray.last().copied())
        .collect()
}

/// One vector per direction in `ray_directions(kind)`, each ordered by distance.
///
/// A ray ends at the board edge or at the first occupied square, which is kept.
/// Rays that leave the board immediately are present but empty.
pub fn rays_of(kind: PieceKind, from: Square, board: &BoardSnapshot) -> Vec<Vec<Square>> {
    ray_directions(kind)
        .iter()
        .map(|&(df, dr)| {
            let mut ray = Vec::new();
            let (mut file, mut rank) = (file_of(from), rank_of(from));
            loop {
                file += df;
                rank += dr;
                let Some(sq) = square_at(file, rank) else {
                    break;
                };
                ray.push(sq);
                if board.is_occupied(sq) {
                    break;
                }
            }
            ray
        })
        .collect()
}

fn jumps(from: Square, offsets: &[(i32, i32)]) -> Vec<Square> {
    offsets
        .iter()
        .filter_map(|&(df, dr)| square_at(file_of(from) + df, rank_of(from) + dr))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chess::Piece;
    use shakmaty::Chess;
    use std::collections::HashSet;

    fn start_board() -> BoardSnapshot {
        BoardSnapshot::from_position(&Chess::default())
    }

    fn set(squares: &[Square]) -> HashSet<Square> {
        squares.iter().copied().collect()
    }

    #[test]
    fn test_knight_b1_controls_own_pawn_square() {
        let attacks = attacks_of(PieceKind::Knight, PieceColor::White, Square::B1, &start_board());
        assert_eq!(set(&attacks), set(&[Square::A3, Square::C3, Square::D2]));
    }

    #[test]
    fn test_rook_a1_blocked_by_pawn_reaches_h1() {
        let board = BoardSnapshot::empty(PieceColor::White)
            .with_piece(Square::A1, Piece::new(PieceKind::Rook, PieceColor::White))
            .with_piece(Square::A2, Piece::new(PieceKind::Pawn, PieceColor::White));
        let attacks = attacks_of(PieceKind::Rook, PieceColor::White, Square::A1, &board);
        assert!(attacks.contains(&Square::A2));
        assert!(!attacks.contains(&Square::A3));
        assert!(attacks.contains(&Square::H1));
        assert_eq!(attacks.len(), 8);

        let endpoints = ray_endpoints_of(PieceKind::Rook, PieceColor::White, Square::A1, &board);
        assert_eq!(endpoints, vec![Square::A2, Square::H1]);
    }

    #[test]
    fn test_pawn_diagonals_are_listed_without_capture_check() {
        let board = start_board();
        assert_eq!(
            attacks_of(PieceKind::Pawn, PieceColor::White, Square::E2, &board),
            vec![Square::D3, Square::F3]
        );
        assert_eq!(
            attacks_of(PieceKind::Pawn, PieceColor::Black, Square::E7, &board),
            vec![Square::D6, Square::F6]
        );
    }

    #[test]
    fn test_edge_pawn_clipped() {
        let board = start_board();
        assert_eq!(
            attacks_of(PieceKind::Pawn, PieceColor::White, Square::A2, &board),
            vec![Square::B3]
        );
        assert_eq!(
            attacks_of(PieceKind::Pawn, PieceColor::Black, Square::H7, &board),
            vec![Square::G6]
        );
        // a pawn on its promotion rank attacks nothing
        assert!(attacks_of(PieceKind::Pawn, PieceColor::White, Square::D8, &board).is_empty());
    }

    #[test]
    fn test_leaper_counts_depend_only_on_bounds() {
        let empty = BoardSnapshot::empty(PieceColor::White);
        let full = start_board();
        for index in 0..64u32 {
            let sq = Square::new(index);
            for kind in [PieceKind::Knight, PieceKind::King] {
                let a = attacks_of(kind, PieceColor::White, sq, &empty);
                let b = attacks_of(kind, PieceColor::White, sq, &full);
                assert!(a.len() <= 8);
                assert_eq!(a, b, "{kind:?} on {sq} must ignore occupancy");
            }
        }
        assert_eq!(attacks_of(PieceKind::Knight, PieceColor::White, Square::A1, &empty).len(), 2);
        assert_eq!(attacks_of(PieceKind::King, PieceColor::White, Square::H8, &empty).len(), 3);
        assert_eq!(attacks_of(PieceKind::Knight, PieceColor::White, Square::D4, &empty).len(), 8);
    }

    #[test]
    fn test_rays_stop_at_first_occupant_inclusive() {
        let board = BoardSnapshot::from_fen("4k3/8/2p5/8/Q3P3/8/8/4K3 w - - 0 1").unwrap();
        for ray in rays_of(PieceKind::Queen, Square::A4, &board) {
            if let Some(pos) = ray.iter().position(|sq| board.is_occupied(*sq)) {
                assert_eq!(pos, ray.len() - 1, "ray continues past an occupied square");
            }
        }
        let attacks = attacks_of(PieceKind::Queen, PieceColor::White, Square::A4, &board);
        assert!(attacks.contains(&Square::E4));
        assert!(!attacks.contains(&Square::F4));
        assert!(attacks.contains(&Square::C6));
        assert!(!attacks.contains(&Square::D7));
        assert!(attacks.contains(&Square::D1));
    }

    #[test]
    fn test_endpoints_match_last_square_of_each_ray() {
        let board = start_board();
        for kind in [PieceKind::Bishop, PieceKind::Rook, PieceKind::Queen] {
            for from in [Square::D4, Square::C1, Square::H5] {
                let rays = rays_of(kind, from, &board);
                let endpoints = ray_endpoints_of(kind, PieceColor::White, from, &board);
                let expected: Vec<Square> = rays.iter().filter_map(|r| r.last().copied()).collect();
                assert_eq!(endpoints, expected);
                assert!(endpoints.len() <= ray_directions(kind).len());
            }
        }
        // d4 is central so every ray has at least one square
        assert_eq!(ray_endpoints_of(PieceKind::Queen, PieceColor::White, Square::D4, &board).len(), 8);
    }

    #[test]
    fn test_endpoints_empty_for_non_sliders() {
        let board = start_board();
        for kind in [PieceKind::Pawn, PieceKind::Knight, PieceKind::King] {
            assert!(ray_endpoints_of(kind, PieceColor::White, Square::E4, &board).is_empty());
        }
    }

    #[test]
    fn test_output_order_is_direction_then_distance() {
        let board = BoardSnapshot::empty(PieceColor::White);
        let attacks = attacks_of(PieceKind::Rook, PieceColor::White, Square::A1, &board);
        let expected: Vec<Square> = [
            Square::A2, Square::A3, Square::A4, Square::A5, Square::A6, Square::A7, Square::A8,
            Square::B1, Square::C1, Square::D1, Square::E1, Square::F1, Square::G1, Square::H1,
        ]
        .to_vec();
        assert_eq!(attacks, expected);
        assert_eq!(attacks, attacks_of(PieceKind::Rook, PieceColor::White, Square::A1, &board));
    }
}
