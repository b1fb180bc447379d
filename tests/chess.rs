use gambit::chess::core::Color;
use gambit::chess::game::{Game, GameStatus};
use pretty_assertions::assert_eq;

/// Only piece placement and side to move survive parsing.
fn legal_position(input: &str) {
    let game = Game::from_fen(input).unwrap_or_else(|e| panic!("parsing {input}: {e}"));
    let expected = input.split_whitespace().take(2).collect::<Vec<_>>().join(" ");
    assert_eq!(game.to_string(), expected);
}

#[test]
fn basic_positions() {
    // Full FEN.
    legal_position("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
    legal_position("2r3r1/p3k3/1p3pp1/1B5p/5P2/2P1p1P1/PP4KP/3R4 w - - 0 34");
    legal_position("rnbqk1nr/p3bppp/1p2p3/2ppP3/3P4/P7/1PP1NPPP/R1BQKBNR w KQkq c6 0 7");
    legal_position("r2qkb1r/1pp1pp1p/p1np1np1/1B6/3PP1b1/2N1BN2/PPP2PPP/R2QK2R w KQkq - 0 7");
    legal_position("r3k3/5p2/2p5/p7/P3r3/2N2n2/1PP2P2/2K2B2 w q - 0 24");
    legal_position("8/8/8/8/2P5/3k4/8/KB6 b - c3 0 1");
    // Trimmed FEN.
    legal_position("rnbqkb1r/pp2pppp/3p1n2/8/3NP3/2N5/PPP2PPP/R1BQKB1R b KQkq -");
    // Only the fields the game uses.
    legal_position("4k3/8/8/8/8/8/8/4K3 b");
}

#[test]
#[should_panic(expected = "expected 1 White king, got 0")]
fn no_white_king() {
    let _ = Game::try_from("3k4/8/8/8/8/8/8/8 w - - 0 1").unwrap();
}

#[test]
#[should_panic(expected = "expected 1 Black king, got 0")]
fn no_black_king() {
    let _ = Game::try_from("8/8/8/8/8/8/8/3K4 w - - 0 1").unwrap();
}

#[test]
#[should_panic(expected = "expected 1 White king, got 3")]
fn too_many_kings() {
    let _ = Game::try_from("1kkk4/8/8/8/8/8/8/1KKK4 w - - 0 1").unwrap();
}

#[test]
#[should_panic(expected = "pawns can not be placed on backranks")]
fn pawns_on_backranks() {
    let _ = Game::try_from("3kr3/8/8/8/8/5Q2/8/1KP5 w - - 0 1").unwrap();
}

#[test]
#[should_panic(expected = "color should be 'w' or 'b', got 'x'")]
fn unknown_side_to_move() {
    let _ = Game::try_from("4k3/8/8/8/8/8/8/4K3 x - - 0 1").unwrap();
}

#[test]
fn clean_board_str() {
    // Prefix with "fen".
    assert!(Game::try_from(
        "fen rn1qkb1r/pp3ppp/2p1pn2/3p1b2/2PP4/5NP1/PP2PPBP/RNBQK2R w KQkq - 0 1"
    )
    .is_ok());
    // Whitespaces at the start/end of the input are ignored.
    assert!(Game::try_from(
        "\n rnbqkb1r/ppp1pp1p/5np1/3p4/3P1B2/5N2/PPP1PPPP/RN1QKB1R w KQkq -\n"
    )
    .is_ok());
    // Don't crash on unicode symbols.
    assert!(Game::try_from("8/8/8/8/8/8/8/8 b 88 🔠 🔠").is_err());
}

#[test]
fn no_crash() {
    assert!(Game::try_from("3k2p1N/82/8/8/7B/6K1/3R4/8 b - - 0 1").is_err());
    assert!(Game::try_from("3kn3/R2p1N2/8/8/70000000000000000B/6K1/3R4/8 b - - 0 1").is_err());
    assert!(Game::try_from("3kn3/R4N2/8/8/7B/6K1/3R4/8 b - - 0 48 b - - 0 4/8 b").is_err());
    assert!(Game::try_from("\tfen3kn3/R2p1N2/8/8/7B/6K1/3R4/8 b - - 0 23").is_err());
    assert!(Game::try_from("fen3kn3/R2p1N2/8/8/7B/6K1/3R4/8 b - - 0 23").is_err());
    assert!(Game::try_from(
        "\n epd rnbqkb1r/ppp1pp1p/5np1/3p4/3P1B2/5N2/PPP1PPPP/RN1QKB1R w KQkq -\n"
    )
    .is_err());
    assert!(Game::try_from("").is_err());
}

#[test]
fn status_is_derived_on_setup() {
    assert_eq!(
        Game::from_fen("4k3/8/8/8/8/8/3B4/r3K3 w").unwrap().status(),
        GameStatus::Check(Color::White)
    );
    assert_eq!(
        Game::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3")
            .unwrap()
            .status(),
        GameStatus::Checkmate(Color::White)
    );
    assert_eq!(
        Game::from_fen("k7/8/1Q6/8/8/8/8/7K b").unwrap().status(),
        GameStatus::Stalemate(Color::Black)
    );
}

#[test]
fn perft_starting_position() {
    let game = Game::new();
    assert_eq!(game.perft(0), 1);
    assert_eq!(game.perft(1), 20);
    assert_eq!(game.perft(2), 400);
    assert_eq!(game.perft(3), 8902);
    assert_eq!(game.perft(4), 197_281);
}

#[test]
fn perft_without_special_moves() {
    // Position 6 from https://www.chessprogramming.org/Perft_Results: neither
    // side can castle, en passant or promote within 3 plies.
    let game = Game::from_fen(
        "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10",
    )
    .unwrap();
    assert_eq!(game.perft(1), 46);
    assert_eq!(game.perft(2), 2079);
    assert_eq!(game.perft(3), 89_890);
}
