//! Board state: a piece arena plus a 5×5 occupancy grid of arena indices.
//!
//! The grid is the single source of truth for occupancy and is only mutated
//! through [`Board::remove`] and [`Board::relocate`], which keep the
//! grid-cell/piece-square invariant in one place. Dead pieces stay in the
//! arena (their [`PieceId`]s remain valid for notifications) but leave the
//! grid for good.

use std::fmt::{self, Write};

use strum::IntoEnumIterator;

use crate::game::core::{
    File,
    Piece,
    PieceKind,
    Player,
    Rank,
    Rules,
    Square,
    BACK_RANK_LAYOUT,
    BOARD_SIZE,
};

/// Stable identifier of a piece within the current round. Indexes into the
/// board's piece arena; never reused until [`Board::starting`] rebuilds it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PieceId(u8);

impl PieceId {
    const fn index(self) -> usize {
        self.0 as usize
    }
}

/// The 5×5 battlefield: every live piece occupies exactly one cell.
#[derive(Clone, Debug)]
pub struct Board {
    pieces: Vec<Piece>,
    grid: [Option<PieceId>; BOARD_SIZE as usize],
}

impl Board {
    /// Creates the fixed initial layout of the given variant: pawn, silver,
    /// king, gold, pawn across each side's back rank.
    #[must_use]
    pub fn starting(rules: &Rules) -> Self {
        let mut board = Self::empty();
        for player in [Player::Sente, Player::Gote] {
            let rank = Rank::backrank(player);
            for (file, kind) in File::iter().zip(BACK_RANK_LAYOUT) {
                let square = Square::new(file, rank);
                let _ = board.add(Piece::new(kind, player, square, rules.stats(kind)));
            }
        }
        debug_assert!(board.is_consistent());
        board
    }

    /// Creates a board with no pieces, to be filled with [`Board::add`].
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            pieces: Vec::new(),
            grid: [None; BOARD_SIZE as usize],
        }
    }

    /// Places a new piece on its stored square. Used by [`Board::starting`]
    /// and by tests staging arbitrary positions.
    pub fn add(&mut self, piece: Piece) -> PieceId {
        debug_assert!(piece.is_alive());
        debug_assert!(self.piece_at(piece.square()).is_none(), "cell is taken");
        let id = PieceId(u8::try_from(self.pieces.len()).expect("arena outgrew the board"));
        self.grid[piece.square() as usize] = Some(id);
        self.pieces.push(piece);
        id
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn piece(&self, id: PieceId) -> &Piece {
        &self.pieces[id.index()]
    }

    pub(crate) fn piece_mut(&mut self, id: PieceId) -> &mut Piece {
        &mut self.pieces[id.index()]
    }

    /// Returns the live piece occupying the given cell, if any.
    #[must_use]
    pub fn piece_at(&self, square: Square) -> Option<PieceId> {
        self.grid[square as usize]
    }

    /// Takes a dead piece off the grid. The piece stays in the arena so its
    /// id remains meaningful to the presentation layer.
    pub(crate) fn remove(&mut self, id: PieceId) {
        let square = self.piece(id).square();
        debug_assert!(!self.piece(id).is_alive(), "only dead pieces leave the grid");
        debug_assert_eq!(self.grid[square as usize], Some(id));
        self.grid[square as usize] = None;
    }

    /// Moves a live piece onto an empty cell.
    pub(crate) fn relocate(&mut self, id: PieceId, to: Square) {
        debug_assert!(self.piece(id).is_alive());
        debug_assert!(self.piece_at(to).is_none(), "destination cell is taken");
        let from = self.piece(id).square();
        debug_assert_eq!(self.grid[from as usize], Some(id));
        self.grid[from as usize] = None;
        self.grid[to as usize] = Some(id);
        self.piece_mut(id).set_square(to);
    }

    /// Returns the given side's king while it lives.
    #[must_use]
    pub fn king(&self, player: Player) -> Option<PieceId> {
        self.live_pieces(player)
            .find(|&id| self.piece(id).kind() == PieceKind::King)
    }

    /// Iterates over the given side's living pieces.
    pub fn live_pieces(&self, player: Player) -> impl Iterator<Item = PieceId> + '_ {
        self.pieces
            .iter()
            .enumerate()
            .filter(move |(_, piece)| piece.owner() == player && piece.is_alive())
            .map(|(index, _)| PieceId(index as u8))
    }

    /// Structural invariant: every grid cell points at a live piece whose
    /// stored square matches the cell, every live piece is on the grid, and
    /// each side fields at most one king. Violations are core bugs; callers
    /// check this in `debug_assert!`s.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        for square in Square::iter() {
            if let Some(id) = self.grid[square as usize] {
                let piece = self.piece(id);
                if !piece.is_alive() || piece.square() != square {
                    return false;
                }
            }
        }
        for (index, piece) in self.pieces.iter().enumerate() {
            if piece.is_alive() && self.grid[piece.square() as usize] != Some(PieceId(index as u8))
            {
                return false;
            }
        }
        [Player::Sente, Player::Gote].iter().all(|&player| {
            self.live_pieces(player)
                .filter(|&id| self.piece(id).kind() == PieceKind::King)
                .count()
                <= 1
        })
    }
}

impl fmt::Display for Board {
    /// Dumps the grid from Gote's back rank down to Sente's, uppercase for
    /// Sente pieces, `.` for empty cells.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for rank in Rank::iter().rev() {
            write!(f, "{rank} ")?;
            for file in File::iter() {
                match self.piece_at(Square::new(file, rank)) {
                    Some(id) => write!(f, " {}", self.piece(id))?,
                    None => f.write_str(" .")?,
                }
            }
            f.write_char('\n')?;
        }
        f.write_str("   a b c d e")
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use strum::IntoEnumIterator;

    use super::*;
    use crate::game::core::PieceStats;

    #[test]
    fn starting_layout() {
        let board = Board::starting(&Rules::skirmish());
        assert!(board.is_consistent());
        for player in [Player::Sente, Player::Gote] {
            assert_eq!(board.live_pieces(player).count(), 5);
            let rank = Rank::backrank(player);
            let kinds: Vec<_> = File::iter()
                .map(|file| {
                    let id = board.piece_at(Square::new(file, rank)).unwrap();
                    board.piece(id).kind()
                })
                .collect();
            assert_eq!(kinds, BACK_RANK_LAYOUT.to_vec());
        }
        assert!(board.king(Player::Sente).is_some());
        assert!(board.king(Player::Gote).is_some());
        // The middle ranks start empty.
        for rank in [Rank::Two, Rank::Three, Rank::Four] {
            for file in File::iter() {
                assert_eq!(board.piece_at(Square::new(file, rank)), None);
            }
        }
    }

    #[test]
    fn relocate_updates_grid_and_square() {
        let rules = Rules::skirmish();
        let mut board = Board::starting(&rules);
        let pawn = board.piece_at(Square::A1).unwrap();
        board.relocate(pawn, Square::A2);
        assert_eq!(board.piece_at(Square::A1), None);
        assert_eq!(board.piece_at(Square::A2), Some(pawn));
        assert_eq!(board.piece(pawn).square(), Square::A2);
        assert!(board.is_consistent());
    }

    #[test]
    fn removed_piece_keeps_id_but_leaves_grid() {
        let rules = Rules::skirmish();
        let mut board = Board::starting(&rules);
        let pawn = board.piece_at(Square::A1).unwrap();
        assert!(board.piece_mut(pawn).take_damage(99));
        board.remove(pawn);
        assert_eq!(board.piece_at(Square::A1), None);
        assert_eq!(board.piece(pawn).hp(), 0);
        assert!(!board.piece(pawn).is_alive());
        assert_eq!(board.live_pieces(Player::Sente).count(), 4);
        assert!(board.is_consistent());
    }

    #[test]
    fn display_dump() {
        let mut board = Board::empty();
        let _ = board.add(Piece::new(
            PieceKind::King,
            Player::Sente,
            Square::C1,
            PieceStats { hp: 6, attack: 4 },
        ));
        let _ = board.add(Piece::new(
            PieceKind::Pawn,
            Player::Gote,
            Square::C4,
            PieceStats { hp: 2, attack: 2 },
        ));
        assert_eq!(
            board.to_string(),
            "5  . . . . .\n\
             4  . . p . .\n\
             3  . . . . .\n\
             2  . . . . .\n\
             1  . . K . .\n   a b c d e"
        );
    }
}
