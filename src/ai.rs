//! Greedy one-ply move selection for the engine-controlled side.
//!
//! The policy is a strict priority with uniform random tie-breaks: capture
//! an opposing king if possible, otherwise capture anything, otherwise make
//! any quiet move, otherwise pass. No look-ahead and no board evaluation
//! beyond "is it a capture".

use rand::Rng;

use crate::game::board::{Board, PieceId};
use crate::game::core::{PieceKind, Player, Square};
use crate::game::movegen;

/// Picks the `(piece, destination)` pair the given side should play, or
/// `None` when no piece has a legal destination (the side passes).
///
/// The caller owns the randomness: pass a seeded RNG for reproducible games.
#[must_use]
pub fn select_action<R: Rng>(
    board: &Board,
    player: Player,
    rng: &mut R,
) -> Option<(PieceId, Square)> {
    let mut king_captures = Vec::new();
    let mut captures = Vec::new();
    let mut quiet = Vec::new();
    for id in board.live_pieces(player) {
        for to in movegen::legal_destinations(board, id) {
            match board.piece_at(to) {
                Some(target) => {
                    debug_assert_ne!(board.piece(target).owner(), player);
                    if board.piece(target).kind() == PieceKind::King {
                        king_captures.push((id, to));
                    } else {
                        captures.push((id, to));
                    }
                },
                None => quiet.push((id, to)),
            }
        }
    }
    for tier in [king_captures, captures, quiet] {
        if !tier.is_empty() {
            return Some(tier[rng.gen_range(0..tier.len())]);
        }
    }
    None
}
