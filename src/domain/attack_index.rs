//! Per-square aggregation of which piece types of each side control a square.

use std::collections::BTreeMap;

use shakmaty::Square;

use crate::domain::chess::{BoardSnapshot, PieceColor, PieceKind};
use crate::domain::geometry::attacks_of;

/// Attacking piece types of one side on one square, with a count per type.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct AttackerSet {
    counts: [u8; 6],
}

impl AttackerSet {
    pub fn insert(&mut self, kind: PieceKind) {
        self.counts[kind.index()] = self.counts[kind.index()].saturating_add(1);
    }

    pub fn contains(&self, kind: PieceKind) -> bool {
        self.counts[kind.index()] > 0
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    /// Distinct attacking types, pawn first
    pub fn kinds(&self) -> impl Iterator<Item = PieceKind> + '_ {
        PieceKind::ALL.into_iter().filter(|k| self.contains(*k))
    }

    pub fn count(&self, kind: PieceKind) -> usize {
        self.counts[kind.index()] as usize
    }

    /// Number of attacking pieces, counting two rooks as two
    pub fn total(&self) -> usize {
        self.counts.iter().map(|&c| c as usize).sum()
    }
}

/// Both sides' attackers of a single square
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct SquareAttackers {
    pub white: AttackerSet,
    pub black: AttackerSet,
}

impl SquareAttackers {
    pub fn side(&self, color: PieceColor) -> &AttackerSet {
        match color {
            PieceColor::White => &self.white,
            PieceColor::Black => &self.black,
        }
    }

    fn side_mut(&mut self, color: PieceColor) -> &mut AttackerSet {
        match color {
            PieceColor::White => &mut self.white,
            PieceColor::Black => &mut self.black,
        }
    }

    /// Attacked by both colors
    pub fn is_contested(&self) -> bool {
        !self.white.is_empty() && !self.black.is_empty()
    }
}

/// Sparse square -> attackers map, rebuilt from scratch for every render
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct AttackerIndex {
    entries: BTreeMap<Square, SquareAttackers>,
}

impl AttackerIndex {
    /// Scan the board and record every piece's attacks.
    ///
    /// `exclude` skips the piece on that square, which previews the overlay
    /// as if the piece being dragged had been lifted off its origin.
    pub fn build(board: &BoardSnapshot, exclude: Option<Square>) -> Self {
        let mut entries: BTreeMap<Square, SquareAttackers> = BTreeMap::new();
        for (from, piece) in board.pieces() {
            if Some(from) == exclude {
                continue;
            }
            for target in attacks_of(piece.kind, piece.color, from, board) {
                entries
                    .entry(target)
                    .or_default()
                    .side_mut(piece.color)
                    .insert(piece.kind);
            }
        }
        Self { entries }
    }

    pub fn get(&self, sq: Square) -> Option<&SquareAttackers> {
        self.entries.get(&sq)
    }

    /// Indexed squares in a1..h8 order
    pub fn iter(&self) -> impl Iterator<Item = (Square, &SquareAttackers)> + '_ {
        self.entries.iter().map(|(sq, attackers)| (*sq, attackers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shakmaty::uci::UciMove;
    use shakmaty::{Chess, Position};

    fn start_board() -> BoardSnapshot {
        BoardSnapshot::from_position(&Chess::default())
    }

    fn after(moves: &[&str]) -> BoardSnapshot {
        let mut pos = Chess::default();
        for m in moves {
            let uci: UciMove = m.parse().unwrap();
            let mv = uci.to_move(&pos).unwrap();
            pos = pos.play(mv).unwrap();
        }
        BoardSnapshot::from_position(&pos)
    }

    #[test]
    fn test_index_matches_union_of_attack_sets() {
        for board in [start_board(), after(&["e2e4", "d7d5", "g1f3", "b8c6"])] {
            let index = AttackerIndex::build(&board, None);
            for i in 0..64u32 {
                let sq = Square::new(i);
                let attacked = board
                    .pieces()
                    .any(|(from, p)| attacks_of(p.kind, p.color, from, &board).contains(&sq));
                assert_eq!(index.get(sq).is_some(), attacked, "square {sq}");
            }
        }
    }

    #[test]
    fn test_no_empty_entries() {
        let index = AttackerIndex::build(&start_board(), None);
        for (_, attackers) in index.iter() {
            assert!(!attackers.white.is_empty() || !attackers.black.is_empty());
        }
        // ranks 3 and 6 are fully controlled, rank 4 and 5 untouched
        assert!(index.get(Square::E4).is_none());
        assert!(index.get(Square::A3).is_some());
        assert!(index.get(Square::H6).is_some());
    }

    #[test]
    fn test_start_position_counts() {
        let index = AttackerIndex::build(&start_board(), None);
        let c3 = index.get(Square::C3).unwrap();
        assert!(c3.white.contains(PieceKind::Pawn));
        assert!(c3.white.contains(PieceKind::Knight));
        assert_eq!(c3.white.count(PieceKind::Pawn), 2);
        assert_eq!(c3.white.total(), 3);
        assert!(c3.black.is_empty());
        assert!(!c3.is_contested());

        // d2 is covered by queen, king, bishop and knight but no pawn
        let d2 = index.get(Square::D2).unwrap();
        let kinds: Vec<PieceKind> = d2.white.kinds().collect();
        assert_eq!(
            kinds,
            vec![PieceKind::Knight, PieceKind::Bishop, PieceKind::Queen, PieceKind::King]
        );
    }

    #[test]
    fn test_e4_moves_pawn_control() {
        let before = AttackerIndex::build(&start_board(), None);
        let board = after(&["e2e4"]);
        assert_eq!(board.turn(), PieceColor::Black);
        let index = AttackerIndex::build(&board, None);

        // d3/f3 lose the e-pawn but d3 keeps the c-pawn
        assert_eq!(before.get(Square::D3).unwrap().white.count(PieceKind::Pawn), 2);
        assert_eq!(index.get(Square::D3).unwrap().white.count(PieceKind::Pawn), 1);
        assert_eq!(index.get(Square::F3).unwrap().white.count(PieceKind::Pawn), 1);
        for sq in [Square::D5, Square::F5] {
            assert!(before.get(sq).is_none());
            assert!(index.get(sq).unwrap().white.contains(PieceKind::Pawn));
        }
    }

    #[test]
    fn test_contested_square() {
        let board = after(&["e2e4", "d7d5"]);
        let index = AttackerIndex::build(&board, None);
        let d5 = index.get(Square::D5).unwrap();
        assert!(d5.white.contains(PieceKind::Pawn));
        assert!(d5.black.contains(PieceKind::Queen));
        assert!(d5.is_contested());
    }

    #[test]
    fn test_exclude_square_drops_its_attacks() {
        let board = start_board();
        let full = AttackerIndex::build(&board, None);
        let preview = AttackerIndex::build(&board, Some(Square::B1));
        assert_eq!(full.get(Square::A3).unwrap().white.total(), 2);
        assert_eq!(preview.get(Square::A3).unwrap().white.total(), 1);
        assert!(!preview.get(Square::D2).unwrap().white.contains(PieceKind::Knight));
        assert_eq!(AttackerIndex::build(&board, Some(Square::E4)), full);
    }
}
