//! Parsing of the line protocol understood by [`super::Session`].

/// A single line of input. Arguments are kept as text: they are validated by
/// the handlers so that the errors are reported back in the same format as the
/// rule violations.
#[derive(Debug, PartialEq, Eq)]
pub(super) enum Command {
    NewGame,
    SetPosition {
        fen: Option<String>,
        moves: Vec<String>,
    },
    ValidMoves {
        square: String,
    },
    MakeMove {
        uci: String,
    },
    Status,
    Resign,
    Display,
    Version,
    Quit,
    Unknown(String),
}

fn parse_setposition(parts: &[&str]) -> Option<Command> {
    let moves_index = parts.iter().position(|&x| x == "moves");
    let setup = &parts[1..moves_index.unwrap_or(parts.len())];
    let fen = match setup.split_first() {
        Some((&"startpos", [])) => None,
        Some((&"fen", fen)) if !fen.is_empty() => Some(fen.join(" ")),
        _ => return None,
    };
    let moves = moves_index.map_or_else(Vec::new, |index| {
        parts[index + 1..].iter().map(|s| (*s).to_string()).collect()
    });
    Some(Command::SetPosition { fen, moves })
}

impl Command {
    pub(super) fn parse(input: &str) -> Self {
        let parts: Vec<&str> = input.split_whitespace().collect();
        let unknown = || Self::Unknown(input.trim().to_string());

        match parts.as_slice() {
            ["new"] => Self::NewGame,
            ["position", ..] => parse_setposition(&parts).unwrap_or_else(unknown),
            ["moves", square] => Self::ValidMoves {
                square: (*square).to_string(),
            },
            ["move", uci] => Self::MakeMove {
                uci: (*uci).to_string(),
            },
            ["status"] => Self::Status,
            ["resign"] => Self::Resign,
            ["d"] => Self::Display,
            ["version"] => Self::Version,
            ["quit"] => Self::Quit,
            _ => unknown(),
        }
    }
}
