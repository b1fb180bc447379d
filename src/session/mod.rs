//! A line-oriented driver owning exactly one [`Game`]. It reads commands from
//! the input stream, forwards them to the rules engine and writes one response
//! per command to the output stream.
//!
//! [`Session::run`] is the "main loop" of the binary. Since the session owns
//! the game and handles commands one by one, mutations are serialized by
//! construction.
//!
//! Rule violations and malformed arguments are reported as `error: <reason>`
//! lines and never stop the loop; only I/O failures do.

use std::io::{BufRead, Write};

use anyhow::Context;
use itertools::Itertools;
use log::trace;

use crate::chess::core::{Coordinate, Move};
use crate::chess::game::Game;
use crate::session::command::Command;

mod command;

/// Connects the game to the I/O streams.
pub struct Session<'a, R: BufRead, W: Write> {
    game: Game,
    input: &'a mut R,
    output: &'a mut W,
}

impl<'a, R: BufRead, W: Write> Session<'a, R, W> {
    /// Creates a session with the starting position.
    #[must_use]
    pub fn new(input: &'a mut R, output: &'a mut W) -> Self {
        Self::with_game(Game::new(), input, output)
    }

    /// Creates a session continuing the given game.
    #[must_use]
    pub fn with_game(game: Game, input: &'a mut R, output: &'a mut W) -> Self {
        Self {
            game,
            input,
            output,
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn game(&self) -> &Game {
        &self.game
    }

    /// Continuously reads the input stream and executes the commands until
    /// "quit" is sent or the input is exhausted.
    ///
    /// # Errors
    ///
    /// If reading the input or writing the output fails.
    pub fn run(&mut self) -> anyhow::Result<()> {
        loop {
            let mut line = String::new();
            if self
                .input
                .read_line(&mut line)
                .context("reading from input")?
                == 0
            {
                break;
            }
            if line.trim().is_empty() {
                continue;
            }
            let command = Command::parse(&line);
            trace!("Received {command:?}");
            match command {
                Command::NewGame => {
                    self.game = Game::new();
                    writeln!(self.output, "ok")?;
                },
                Command::SetPosition { fen, moves } => self.handle_position(fen, &moves)?,
                Command::ValidMoves { square } => self.handle_moves(&square)?,
                Command::MakeMove { uci } => self.handle_move(&uci)?,
                Command::Status => writeln!(
                    self.output,
                    "status {} turn {}",
                    self.game.status(),
                    self.game.turn()
                )?,
                Command::Resign => {
                    self.game.mark_over();
                    writeln!(self.output, "ok {}", self.game.status())?;
                },
                Command::Display => self.handle_display()?,
                Command::Version => writeln!(
                    self.output,
                    "id name {} {}",
                    env!("CARGO_PKG_NAME"),
                    crate::version()
                )?,
                Command::Quit => break,
                Command::Unknown(command) => {
                    writeln!(self.output, "info string Unsupported command: {command}")?;
                },
            }
            self.output.flush()?;
        }
        Ok(())
    }

    /// Replaces the game with the requested position. The current game is
    /// kept if the position or any of the moves is rejected.
    fn handle_position(&mut self, fen: Option<String>, moves: &[String]) -> anyhow::Result<()> {
        match setup(fen.as_deref(), moves) {
            Ok(game) => {
                self.game = game;
                writeln!(self.output, "ok")?;
            },
            Err(e) => writeln!(self.output, "error: {e:#}")?,
        }
        Ok(())
    }

    fn handle_moves(&mut self, square: &str) -> anyhow::Result<()> {
        let moves = Coordinate::try_from(square)
            .and_then(|square| Ok(self.game.valid_moves(square)?));
        match moves {
            Ok(moves) => writeln!(
                self.output,
                "{}",
                std::iter::once("moves".to_string())
                    .chain(moves.iter().map(Move::to_string).sorted())
                    .join(" ")
            )?,
            Err(e) => writeln!(self.output, "error: {e:#}")?,
        }
        Ok(())
    }

    fn handle_move(&mut self, uci: &str) -> anyhow::Result<()> {
        let result =
            Move::from_uci(uci).and_then(|next_move| Ok(self.game.make_move(next_move)?));
        match result {
            Ok(()) => writeln!(self.output, "ok {}", self.game.status())?,
            Err(e) => writeln!(self.output, "error: {e:#}")?,
        }
        Ok(())
    }

    fn handle_display(&mut self) -> anyhow::Result<()> {
        writeln!(self.output, "{:?}", self.game.board())?;
        writeln!(self.output, "fen: {}", self.game)?;
        writeln!(self.output, "status: {}", self.game.status())?;
        Ok(())
    }
}

fn setup(fen: Option<&str>, moves: &[String]) -> anyhow::Result<Game> {
    let mut game = match fen {
        Some(fen) => Game::from_fen(fen)?,
        None => Game::new(),
    };
    for uci in moves {
        let next_move = Move::from_uci(uci)?;
        game.make_move(next_move)
            .with_context(|| format!("applying {uci}"))?;
    }
    Ok(game)
}
