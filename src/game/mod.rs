pub mod rank;
pub mod session;

use std::fmt;
use std::str::FromStr;

/// Which ruleset a session runs under.
///
/// `Ranked` is endless survival graded at game over; `Timed` additionally
/// caps a session at a fixed duration and awards no rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    Ranked,
    Timed,
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameMode::Ranked => write!(f, "ranked"),
            GameMode::Timed => write!(f, "timed"),
        }
    }
}

impl FromStr for GameMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ranked" => Ok(GameMode::Ranked),
            "timed" => Ok(GameMode::Timed),
            _ => Err(format!("'{}' is not a valid game mode", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_parses_case_insensitively() {
        assert_eq!("ranked".parse::<GameMode>(), Ok(GameMode::Ranked));
        assert_eq!("Timed".parse::<GameMode>(), Ok(GameMode::Timed));
        assert!("marathon".parse::<GameMode>().is_err());
    }
}
