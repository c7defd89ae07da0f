//! Legal destination generation: a pure function of the piece's kind, owner,
//! position and the board occupancy.

use arrayvec::ArrayVec;

use crate::game::board::{Board, PieceId};
use crate::game::core::Square;

/// Legal destinations of one piece. Every pattern is one-step, so eight
/// cells (a king in the open) is the hard upper bound.
pub type Destinations = ArrayVec<Square, 8>;

/// Computes the cells the given piece may move to or attack: every one-step
/// pattern offset that stays on the board and is not blocked by a piece of
/// the same owner. Cells holding an opposing piece are included; moving onto
/// one triggers combat rather than a silent move.
#[must_use]
pub fn legal_destinations(board: &Board, id: PieceId) -> Destinations {
    let piece = board.piece(id);
    debug_assert!(piece.is_alive(), "dead pieces have no moves");
    let mut destinations = Destinations::new();
    for &(file_delta, rank_delta) in piece.kind().move_pattern(piece.owner()) {
        let Some(to) = piece.square().offset(file_delta, rank_delta) else {
            continue;
        };
        match board.piece_at(to) {
            Some(occupant) if board.piece(occupant).owner() == piece.owner() => {},
            _ => destinations.push(to),
        }
    }
    destinations
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use strum::IntoEnumIterator;

    use super::*;
    use crate::game::core::{Piece, PieceKind, PieceStats, Player, Rules, BOARD_SIZE};

    fn lone(kind: PieceKind, owner: Player, square: Square) -> (Board, PieceId) {
        let mut board = Board::empty();
        let id = board.add(Piece::new(kind, owner, square, PieceStats { hp: 5, attack: 3 }));
        (board, id)
    }

    fn sorted(destinations: Destinations) -> Vec<Square> {
        let mut cells: Vec<_> = destinations.into_iter().collect();
        cells.sort_unstable();
        cells
    }

    #[test]
    fn king_in_the_open_has_eight_moves() {
        let (board, king) = lone(PieceKind::King, Player::Sente, Square::C3);
        assert_eq!(
            sorted(legal_destinations(&board, king)),
            vec![
                Square::B2,
                Square::C2,
                Square::D2,
                Square::B3,
                Square::D3,
                Square::B4,
                Square::C4,
                Square::D4,
            ]
        );
    }

    #[test]
    fn king_in_the_corner_has_three_moves() {
        let (board, king) = lone(PieceKind::King, Player::Gote, Square::E5);
        assert_eq!(
            sorted(legal_destinations(&board, king)),
            vec![Square::D4, Square::E4, Square::D5]
        );
    }

    #[test]
    fn pawn_moves_one_forward_per_side() {
        let (board, pawn) = lone(PieceKind::Pawn, Player::Sente, Square::B2);
        assert_eq!(sorted(legal_destinations(&board, pawn)), vec![Square::B3]);
        let (board, pawn) = lone(PieceKind::Pawn, Player::Gote, Square::B2);
        assert_eq!(sorted(legal_destinations(&board, pawn)), vec![Square::B1]);
    }

    #[test]
    fn pawn_on_the_last_rank_has_no_moves() {
        let (board, pawn) = lone(PieceKind::Pawn, Player::Sente, Square::C5);
        assert!(legal_destinations(&board, pawn).is_empty());
    }

    #[test]
    fn silver_pattern() {
        let (board, silver) = lone(PieceKind::Silver, Player::Sente, Square::C3);
        assert_eq!(
            sorted(legal_destinations(&board, silver)),
            vec![Square::B2, Square::D2, Square::B4, Square::C4, Square::D4]
        );
    }

    #[test]
    fn gold_pattern() {
        let (board, gold) = lone(PieceKind::Gold, Player::Gote, Square::C3);
        assert_eq!(
            sorted(legal_destinations(&board, gold)),
            vec![Square::B2, Square::C2, Square::D2, Square::B3, Square::D3, Square::C4]
        );
    }

    #[test]
    fn own_pieces_block_but_enemies_are_capturable() {
        let mut board = Board::empty();
        let king = board.add(Piece::new(
            PieceKind::King,
            Player::Sente,
            Square::C3,
            PieceStats { hp: 6, attack: 4 },
        ));
        // A friendly pawn blocks one neighbour, an enemy silver is a target.
        let _ = board.add(Piece::new(
            PieceKind::Pawn,
            Player::Sente,
            Square::C4,
            PieceStats { hp: 2, attack: 2 },
        ));
        let _ = board.add(Piece::new(
            PieceKind::Silver,
            Player::Gote,
            Square::D3,
            PieceStats { hp: 3, attack: 4 },
        ));
        let destinations = legal_destinations(&board, king);
        assert!(!destinations.contains(&Square::C4));
        assert!(destinations.contains(&Square::D3));
        assert_eq!(destinations.len(), 7);
    }

    #[test]
    fn never_out_of_bounds_and_never_friendly_fire() {
        // Exhaustive sweep: every kind on every square of a crowded board.
        let rules = Rules::skirmish();
        let board = Board::starting(&rules);
        for player in [Player::Sente, Player::Gote] {
            for id in board.live_pieces(player) {
                for to in legal_destinations(&board, id) {
                    assert!((to as u8) < BOARD_SIZE);
                    if let Some(occupant) = board.piece_at(to) {
                        assert_ne!(board.piece(occupant).owner(), player);
                    }
                }
            }
        }
        for kind in PieceKind::iter() {
            for square in Square::iter() {
                for player in [Player::Sente, Player::Gote] {
                    let (board, id) = lone(kind, player, square);
                    for to in legal_destinations(&board, id) {
                        assert!((to as u8) < BOARD_SIZE);
                        assert_ne!(to, square);
                    }
                }
            }
        }
    }
}
