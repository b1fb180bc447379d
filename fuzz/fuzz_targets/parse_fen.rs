#![no_main]
use gambit::chess::game::Game;
use libfuzzer_sys::fuzz_target;
use pretty_assertions::assert_eq;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(game) = Game::try_from(s) {
            // Printing and parsing again yields the same position.
            assert_eq!(Game::from_fen(&game.to_string()).unwrap(), game);
        }
    }
});
