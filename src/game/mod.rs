//! Implementation of the battle rules: primitives, board state, move
//! generation, combat resolution and the turn state machine.

pub mod board;
pub mod combat;
pub mod core;
pub mod movegen;
pub mod session;
