#![no_main]
use gambit::chess::game::Game;
use itertools::Itertools;
use libfuzzer_sys::fuzz_target;
use pretty_assertions::assert_eq;

fuzz_target!(|data: &[u8]| {
    let input = match std::str::from_utf8(data) {
        Ok(input) => input,
        Err(_) => return,
    };
    let game = match Game::from_fen(input) {
        Ok(game) => game,
        Err(_) => return,
    };
    let moves = game.legal_moves();
    assert_eq!(moves.len(), moves.iter().unique().count());
    assert_eq!(game.perft(1), moves.len() as u64);
    assert_eq!(moves.is_empty(), game.status().is_terminal());
    for next_move in moves {
        let mut next = game.clone();
        next.make_move(next_move)
            .expect("generated moves should be accepted");
        assert!(!next.is_in_check(game.turn()));
        assert_eq!(next.turn(), game.turn().opponent());
    }
});
