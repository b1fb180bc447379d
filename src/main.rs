use std::io::{self, Write};

use clap::Parser;
use gambit::chess::game::Game;
use gambit::session::Session;

/// Chess rules engine speaking a line protocol on stdin/stdout.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Initial position in FEN: piece placement and side to move, optionally
    /// followed by the remaining (ignored) fields.
    #[arg(long)]
    fen: Option<String>,

    /// Enable debug logging. `RUST_LOG` takes precedence.
    #[arg(short, long)]
    debug: bool,
}

fn main() {
    let args = Args::parse();

    // stdout is reserved for the protocol.
    let log_level = if args.debug { "debug" } else { "info" };
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, log_level),
    )
    .format(|buf, record| writeln!(buf, "[{}] {}: {}", record.level(), record.target(), record.args()))
    .target(env_logger::Target::Stderr)
    .try_init();

    if let Err(e) = run(args.fen.as_deref()) {
        log::error!("Fatal error: {e:#}");
        std::process::exit(1);
    }
}

fn run(fen: Option<&str>) -> anyhow::Result<()> {
    gambit::log_build_info();
    let game = match fen {
        Some(fen) => Game::from_fen(fen)?,
        None => Game::new(),
    };
    let mut input = io::stdin().lock();
    let mut output = io::stdout().lock();
    Session::with_game(game, &mut input, &mut output).run()
}
