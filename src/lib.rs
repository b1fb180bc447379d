//! Chess rules engine: decides which moves are legal, applies them and tracks
//! whether the game is in progress, in check, checkmated or stalemated.
//!
//! ```
//! use gambit::chess::core::{Color, Move};
//! use gambit::chess::game::{Game, GameStatus};
//!
//! let mut game = Game::new();
//! for uci in ["f2f3", "e7e5", "g2g4", "d8h4"] {
//!     game.make_move(Move::from_uci(uci).unwrap()).unwrap();
//! }
//! assert_eq!(game.status(), GameStatus::Checkmate(Color::White));
//! ```
//!
//! The [`session`] module drives a single game over a line protocol; it is
//! what the `gambit` binary runs on stdin/stdout.

pub mod chess;
pub mod session;

use shadow_rs::shadow;

shadow!(build);

/// Returns the full version that can be used to identify how the binary was
/// built in the first place.
#[must_use]
pub fn version() -> String {
    format!(
        "{} (commit {}, branch {})",
        build::PKG_VERSION,
        build::SHORT_COMMIT,
        build::BRANCH
    )
}

/// Logs the version and the build type on startup.
pub fn log_build_info() {
    log::info!("gambit {}", version());
    log::debug!("Release build: {}", !shadow_rs::is_debug());
    if !shadow_rs::git_clean() {
        log::warn!("Built with uncommitted changes");
    }
}
