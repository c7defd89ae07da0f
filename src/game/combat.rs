//! Attack resolution: the HP exchange, removal on death, the attack-advance
//! and pawn promotion.
//!
//! The canonical rule set: the defender takes the attacker's full attack
//! first and only retaliates if it survives that blow. Dead pieces leave the
//! grid immediately; a surviving attacker always advances onto the
//! defender's former cell (displacement capture). A dead attacker stays
//! where it fell and is removed without relocation.

use crate::game::board::{Board, PieceId};
use crate::game::core::{PieceKind, Rank, Rules, Square};

/// Result of a single attack exchange, reported to the presentation layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CombatOutcome {
    /// Attacker HP after the exchange (0 when it died).
    pub attacker_hp: i32,
    /// Defender HP after the exchange (0 when it died).
    pub defender_hp: i32,
    #[allow(missing_docs)]
    pub attacker_died: bool,
    #[allow(missing_docs)]
    pub defender_died: bool,
    /// Whether the surviving attacker promoted while advancing onto the
    /// defender's cell.
    pub attacker_promoted: bool,
}

/// Resolves an attack of one piece onto an enemy-occupied cell and applies
/// every consequence to the board: damage, removals, the attack-advance and
/// a promotion check for the advancing piece.
pub(crate) fn resolve(
    board: &mut Board,
    rules: &Rules,
    attacker: PieceId,
    defender: PieceId,
) -> CombatOutcome {
    debug_assert_ne!(
        board.piece(attacker).owner(),
        board.piece(defender).owner(),
        "combat requires opposing pieces"
    );
    let contested = board.piece(defender).square();

    let defender_died = {
        let damage = board.piece(attacker).attack();
        board.piece_mut(defender).take_damage(damage)
    };
    // The defender only retaliates if it survived the first blow.
    let attacker_died = !defender_died && {
        let damage = board.piece(defender).attack();
        board.piece_mut(attacker).take_damage(damage)
    };

    if defender_died {
        board.remove(defender);
    }
    if attacker_died {
        board.remove(attacker);
    }
    let attacker_promoted = if defender_died && !attacker_died {
        advance(board, rules, attacker, contested)
    } else {
        false
    };

    debug_assert!(board.is_consistent());
    CombatOutcome {
        attacker_hp: board.piece(attacker).hp(),
        defender_hp: board.piece(defender).hp(),
        attacker_died,
        defender_died,
        attacker_promoted,
    }
}

/// Moves a piece onto an empty cell and promotes a pawn that ends the step
/// on the opponent's back rank. Returns whether a promotion happened; a gold
/// (born or promoted) reaching the rank is a no-op.
pub(crate) fn advance(board: &mut Board, rules: &Rules, id: PieceId, to: Square) -> bool {
    board.relocate(id, to);
    let piece = board.piece(id);
    if piece.kind() != PieceKind::Pawn || to.rank() != Rank::promotion(piece.owner()) {
        return false;
    }
    board
        .piece_mut(id)
        .promote(rules.stats(PieceKind::Gold));
    true
}
