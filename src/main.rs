//! Line-based front end for manual play: the thinnest possible presentation
//! layer over the engine core.

use std::io::{self, BufRead};

use anyhow::Context;
use kuroban::game::core::{Rules, Square};
use kuroban::game::session::{GameResult, InputOutcome, Session};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn print_state(session: &Session) {
    println!("{}", session.board());
    match session.result() {
        Some(GameResult::Win) => println!("you win"),
        Some(GameResult::Loss) => println!("you lose"),
        Some(GameResult::Draw) => println!("draw"),
        None => println!("turn {}, {} to move", session.turn(), session.active_player()),
    }
}

fn report_outcome(session: &Session, outcome: InputOutcome) {
    match outcome {
        InputOutcome::Selected(id) | InputOutcome::Reselected(id) => {
            let piece = session.board().piece(id);
            println!(
                "selected {} (HP {}/{}, ATK {}), destinations: {:?}",
                piece.kind(),
                piece.hp(),
                piece.max_hp(),
                piece.attack(),
                session.legal_destinations_for_selection()
            );
        },
        InputOutcome::Moved { to, .. } => println!("moved to {to}"),
        InputOutcome::Attacked { defender, .. } => {
            println!("attacked the {}", session.board().piece(defender).kind());
        },
        InputOutcome::Rejected(reason) => println!("rejected: {reason:?}"),
    }
}

fn main() -> anyhow::Result<()> {
    kuroban::print_engine_info();
    let mut session = Session::new(Rules::skirmish());
    let mut rng = StdRng::from_entropy();
    print_state(&session);

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("failed to read input")?;
        match line.trim() {
            "" => {},
            "quit" => break,
            "d" => print_state(&session),
            "reset" => {
                session.reset();
                print_state(&session);
            },
            command => match Square::try_from(command) {
                Ok(square) => {
                    let outcome = session.select_cell(square);
                    report_outcome(&session, outcome);
                    let half_move_done = matches!(
                        outcome,
                        InputOutcome::Moved { .. } | InputOutcome::Attacked { .. }
                    );
                    if half_move_done && session.result().is_none() {
                        match session.play_engine_turn(&mut rng) {
                            Some((piece, to)) => {
                                println!("engine: {} to {to}", session.board().piece(piece).kind());
                            },
                            None => println!("engine passes"),
                        }
                    }
                    if half_move_done {
                        let _ = session.take_events();
                        print_state(&session);
                    }
                },
                Err(e) => println!("unrecognized input: {e:#}"),
            },
        }
    }
    Ok(())
}
