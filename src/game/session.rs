//! Turn controller and win judge: the selection state machine, the round
//! counter, terminal result detection and the notification queue the
//! presentation layer drains.

use std::mem;

use rand::Rng;

use crate::ai;
use crate::game::board::{Board, PieceId};
use crate::game::combat::{self, CombatOutcome};
use crate::game::core::{Player, Rules, Square};
use crate::game::movegen::{self, Destinations};

/// Result of a round from Sente's perspective. Set exactly once; all further
/// inputs are rejected until [`Session::reset`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameResult {
    /// Sente's king outlived Gote's.
    Win,
    /// The round cap expired with both kings standing.
    Draw,
    /// Gote's king outlived Sente's.
    Loss,
}

/// Fire-and-forget notifications for the presentation layer (death effects,
/// promotion jingles, battle animations, turn banners). The core queues them
/// and never blocks; drain with [`Session::take_events`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// An attack exchange was resolved.
    CombatResolved {
        #[allow(missing_docs)]
        attacker: PieceId,
        #[allow(missing_docs)]
        defender: PieceId,
        #[allow(missing_docs)]
        outcome: CombatOutcome,
    },
    /// A pawn reached the promotion rank and became a gold.
    PiecePromoted(PieceId),
    /// A piece died and left the grid.
    PieceRemoved(PieceId),
    /// The half-move finished and the other side is to act.
    TurnAdvanced {
        #[allow(missing_docs)]
        player: Player,
        #[allow(missing_docs)]
        turn: u16,
    },
    /// The round ended; no further inputs are accepted.
    GameOver(GameResult),
}

/// Why a cell selection was rejected. None of these are fatal: the input is
/// dropped and play continues.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RejectReason {
    /// Selecting an empty cell or an opponent's piece with nothing selected.
    InvalidSelection,
    /// A destination outside the cached legal set; the selection is cleared.
    IllegalDestination,
    /// Any input after the result is set.
    ActionAfterResult,
}

/// Outcome of feeding one cell selection into the state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputOutcome {
    /// A piece of the active side was selected and its destinations cached.
    Selected(PieceId),
    /// The selection switched to another piece of the active side.
    Reselected(PieceId),
    /// The selected piece moved to an empty cell; the half-move is over.
    Moved {
        #[allow(missing_docs)]
        piece: PieceId,
        #[allow(missing_docs)]
        to: Square,
    },
    /// The selected piece attacked an enemy; the half-move is over.
    Attacked {
        #[allow(missing_docs)]
        piece: PieceId,
        #[allow(missing_docs)]
        defender: PieceId,
    },
    /// The input was dropped.
    Rejected(RejectReason),
}

/// One round of the battle: board, turn state and the notification queue.
///
/// The session is single-threaded and synchronous: all mutation happens
/// inside [`Session::select_cell`] / [`Session::play_engine_turn`] calls
/// issued by the single control thread.
#[derive(Debug)]
pub struct Session {
    rules: Rules,
    board: Board,
    to_move: Player,
    turn: u16,
    result: Option<GameResult>,
    selection: Option<(PieceId, Destinations)>,
    events: Vec<Event>,
}

impl Session {
    /// Starts a round of the given variant. Sente moves first.
    #[must_use]
    pub fn new(rules: Rules) -> Self {
        let board = Board::starting(&rules);
        Self {
            rules,
            board,
            to_move: Player::Sente,
            turn: 1,
            result: None,
            selection: None,
            events: Vec::new(),
        }
    }

    /// Clears the board and starts a fresh round under the same rules.
    pub fn reset(&mut self) {
        self.board = Board::starting(&self.rules);
        self.to_move = Player::Sente;
        self.turn = 1;
        self.result = None;
        self.selection = None;
        self.events.clear();
    }

    /// Current board snapshot.
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// The side whose half-move it is.
    #[must_use]
    pub const fn active_player(&self) -> Player {
        self.to_move
    }

    /// Round counter, starting at 1. In the round-capped variant it advances
    /// once per completed engine turn.
    #[must_use]
    pub const fn turn(&self) -> u16 {
        self.turn
    }

    /// Terminal result, if the round has ended.
    #[must_use]
    pub const fn result(&self) -> Option<GameResult> {
        self.result
    }

    /// The currently selected piece, if any.
    #[must_use]
    pub fn selection(&self) -> Option<PieceId> {
        self.selection.as_ref().map(|(id, _)| *id)
    }

    /// Cached legal destinations of the current selection (for move
    /// highlighting). Empty when nothing is selected.
    #[must_use]
    pub fn legal_destinations_for_selection(&self) -> &[Square] {
        self.selection
            .as_ref()
            .map_or(&[], |(_, destinations)| destinations.as_slice())
    }

    /// Drains the pending notifications in emission order.
    pub fn take_events(&mut self) -> Vec<Event> {
        mem::take(&mut self.events)
    }

    /// Routes one cell selection through the turn state machine.
    ///
    /// With nothing selected, a cell holding a piece of the active side
    /// selects it and caches its legal destinations; anything else is
    /// rejected with the state unchanged. With a selection, another own
    /// piece re-selects, a cached destination moves or attacks, and any
    /// other cell clears the selection. Once the result is set every input
    /// is rejected.
    pub fn select_cell(&mut self, square: Square) -> InputOutcome {
        if self.result.is_some() {
            return InputOutcome::Rejected(RejectReason::ActionAfterResult);
        }
        match self.selection.take() {
            None => match self.select_own_piece(square) {
                Some(id) => InputOutcome::Selected(id),
                None => InputOutcome::Rejected(RejectReason::InvalidSelection),
            },
            Some((piece, destinations)) => {
                if let Some(id) = self.select_own_piece(square) {
                    return InputOutcome::Reselected(id);
                }
                if !destinations.contains(&square) {
                    // The selection stays cleared.
                    return InputOutcome::Rejected(RejectReason::IllegalDestination);
                }
                self.apply_action(piece, square)
            },
        }
    }

    /// Runs the move-selection policy for the side to move and applies the
    /// chosen action. Returns the `(piece, destination)` pair for the
    /// presentation layer to highlight, or `None` when the engine had no
    /// legal action and passed (the turn still advances).
    pub fn play_engine_turn<R: Rng>(&mut self, rng: &mut R) -> Option<(PieceId, Square)> {
        if self.result.is_some() {
            return None;
        }
        self.selection = None;
        let action = ai::select_action(&self.board, self.to_move, rng);
        match action {
            Some((piece, to)) => {
                let _ = self.apply_action(piece, to);
            },
            None => self.finish_turn(),
        }
        action
    }

    /// Selects the active side's piece on the given cell, caching its legal
    /// destinations. The grid only holds live pieces, so no liveness check
    /// is needed beyond the occupancy lookup.
    fn select_own_piece(&mut self, square: Square) -> Option<PieceId> {
        let id = self.board.piece_at(square)?;
        if self.board.piece(id).owner() != self.to_move {
            return None;
        }
        debug_assert!(self.board.piece(id).is_alive());
        let destinations = movegen::legal_destinations(&self.board, id);
        self.selection = Some((id, destinations));
        Some(id)
    }

    /// Applies a legal move-or-attack and completes the half-move.
    fn apply_action(&mut self, piece: PieceId, to: Square) -> InputOutcome {
        debug_assert!(movegen::legal_destinations(&self.board, piece).contains(&to));
        let outcome = match self.board.piece_at(to) {
            Some(defender) => {
                self.attack(piece, defender);
                InputOutcome::Attacked { piece, defender }
            },
            None => {
                if combat::advance(&mut self.board, &self.rules, piece, to) {
                    self.events.push(Event::PiecePromoted(piece));
                }
                InputOutcome::Moved { piece, to }
            },
        };
        self.finish_turn();
        outcome
    }

    fn attack(&mut self, attacker: PieceId, defender: PieceId) {
        let outcome = combat::resolve(&mut self.board, &self.rules, attacker, defender);
        self.events.push(Event::CombatResolved {
            attacker,
            defender,
            outcome,
        });
        // Removals are reported in resolution order: defender first.
        if outcome.defender_died {
            self.events.push(Event::PieceRemoved(defender));
        }
        if outcome.attacker_died {
            self.events.push(Event::PieceRemoved(attacker));
        }
        if outcome.attacker_promoted {
            self.events.push(Event::PiecePromoted(attacker));
        }
    }

    /// Runs the win judge, then flips the side to move and advances the
    /// round counter. The counter ticks once per completed Gote half-move;
    /// exceeding the cap with both kings standing draws the round.
    fn finish_turn(&mut self) {
        self.selection = None;
        self.judge_kings();
        if self.result.is_some() {
            return;
        }
        let finished = self.to_move;
        self.to_move = self.to_move.opponent();
        if finished == Player::Gote {
            self.turn += 1;
        }
        self.events.push(Event::TurnAdvanced {
            player: self.to_move,
            turn: self.turn,
        });
        if let Some(cap) = self.rules.turn_cap {
            if self.turn > cap {
                self.set_result(GameResult::Draw);
            }
        }
    }

    /// Checks both kings after any removal; exactly one missing king decides
    /// the round. Conditional retaliation makes a double king death
    /// impossible.
    fn judge_kings(&mut self) {
        let sente = self.board.king(Player::Sente).is_some();
        let gote = self.board.king(Player::Gote).is_some();
        if sente && gote {
            return;
        }
        debug_assert!(sente || gote, "both kings cannot fall in one exchange");
        self.set_result(if sente { GameResult::Win } else { GameResult::Loss });
    }

    fn set_result(&mut self, result: GameResult) {
        debug_assert!(self.result.is_none(), "the result is set exactly once");
        self.result = Some(result);
        self.selection = None;
        self.events.push(Event::GameOver(result));
    }
}
