//! Implementation of the chess rules: board, piece movement, king safety and
//! the game state machine.

pub mod board;
pub mod core;
pub mod game;
pub mod movegen;
