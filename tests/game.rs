//! End-to-end rounds driven through the public session API: scripted games
//! that exercise selection, combat, promotion and the win judge together.

use kuroban::game::core::{PieceKind, Player, Rules, Square};
use kuroban::game::session::{Event, GameResult, InputOutcome, RejectReason, Session};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Feeds a scripted half-move (selection, then destination) and asserts it
/// completed.
fn play(session: &mut Session, from: &str, to: &str) {
    let from = Square::try_from(from).unwrap();
    let to = Square::try_from(to).unwrap();
    assert!(matches!(
        session.select_cell(from),
        InputOutcome::Selected(_) | InputOutcome::Reselected(_)
    ));
    assert!(matches!(
        session.select_cell(to),
        InputOutcome::Moved { .. } | InputOutcome::Attacked { .. }
    ));
}

#[test]
fn scripted_king_hunt_wins_the_round() {
    let mut session = Session::new(Rules::skirmish());

    // The king marches up the c file while the opposing side shuffles its
    // a-pawn. Kings hit for 4 against 6 HP, so the hunt takes two exchanges.
    play(&mut session, "c1", "c2");
    play(&mut session, "a5", "a4");
    play(&mut session, "c2", "c3");
    play(&mut session, "a4", "a3");
    play(&mut session, "c3", "c4");
    play(&mut session, "a3", "a2");

    // First exchange: both kings survive and retaliation lands.
    play(&mut session, "c4", "c5");
    assert_eq!(session.result(), None);
    let king = session.board().piece_at(Square::C4).unwrap();
    assert_eq!(session.board().piece(king).hp(), 2);
    play(&mut session, "d5", "d4");

    // Second exchange kills the king; the round ends on the same resolve.
    play(&mut session, "c4", "c5");
    assert_eq!(session.result(), Some(GameResult::Win));
    // The winner advanced onto the contested cell.
    assert_eq!(session.board().piece_at(Square::C5), Some(king));
    assert!(session.board().king(Player::Gote).is_none());

    let events = session.take_events();
    assert!(events.contains(&Event::GameOver(GameResult::Win)));

    // The round is over: every further input bounces.
    assert_eq!(
        session.select_cell(Square::C5),
        InputOutcome::Rejected(RejectReason::ActionAfterResult)
    );
    let mut rng = StdRng::seed_from_u64(0);
    assert_eq!(session.play_engine_turn(&mut rng), None);
}

#[test]
fn pawn_march_promotes_through_the_session() {
    let mut session = Session::new(Rules::skirmish());

    // The a-pawn walks into the enemy pawn guarding the far corner. Equal
    // 2/2 stat lines: the defender dies to the first blow and never
    // retaliates, then the attacker advances onto the back rank.
    play(&mut session, "a1", "a2");
    play(&mut session, "e5", "e4");
    play(&mut session, "a2", "a3");
    play(&mut session, "e4", "e3");
    play(&mut session, "a3", "a4");
    play(&mut session, "e3", "e2");

    let pawn = session.board().piece_at(Square::A4).unwrap();
    let _ = session.take_events();
    play(&mut session, "a4", "a5");

    let piece = session.board().piece(pawn);
    assert_eq!(piece.square(), Square::A5);
    assert_eq!(piece.kind(), PieceKind::Gold);
    assert!(piece.is_promoted());
    // The promoted unit adopts the gold stat line at full health.
    let gold = Rules::skirmish().stats(PieceKind::Gold);
    assert_eq!(piece.hp(), gold.hp);
    assert_eq!(piece.attack(), gold.attack);

    let events = session.take_events();
    assert!(events.contains(&Event::PiecePromoted(pawn)));
    assert_eq!(session.result(), None);
}

#[test]
fn engine_turn_plays_a_legal_action_for_the_active_side() {
    let mut session = Session::new(Rules::skirmish());
    let mut rng = StdRng::seed_from_u64(3);
    play(&mut session, "b1", "c2");
    let (piece, to) = session.play_engine_turn(&mut rng).unwrap();
    assert_eq!(session.board().piece(piece).owner(), Player::Gote);
    assert_eq!(session.board().piece(piece).square(), to);
    assert_eq!(session.active_player(), Player::Sente);
}

#[test]
fn policy_game_keeps_the_board_consistent() {
    let mut session = Session::new(Rules::duel());
    let mut rng = StdRng::seed_from_u64(17);
    for _ in 0..30 {
        if session.result().is_some() {
            break;
        }
        let _ = session.play_engine_turn(&mut rng);
        assert!(session.board().is_consistent());
        let _ = session.take_events();
    }
}
