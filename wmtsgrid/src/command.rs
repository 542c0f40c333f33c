//! Navigation commands.

use std::fmt;
use std::str::FromStr;

use crate::error::GridError;

/// One arrow-style navigation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Command {
    Left,
    Right,
    Up,
    Down,
    ZoomIn,
    ZoomOut,
}

impl Command {
    pub const ALL: [Command; 6] = [
        Command::Left,
        Command::Right,
        Command::Up,
        Command::Down,
        Command::ZoomIn,
        Command::ZoomOut,
    ];

    /// Canonical name, also accepted by [`FromStr`].
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Left => "left",
            Command::Right => "right",
            Command::Up => "up",
            Command::Down => "down",
            Command::ZoomIn => "zoom-in",
            Command::ZoomOut => "zoom-out",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Accepts the canonical names, short forms (`in`, `out`, `+`, `-`) and vi
/// keys (`h`, `j`, `k`, `l`), case-insensitively.
impl FromStr for Command {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "left" | "h" => Ok(Command::Left),
            "right" | "l" => Ok(Command::Right),
            "up" | "k" => Ok(Command::Up),
            "down" | "j" => Ok(Command::Down),
            "zoom-in" | "zoomin" | "in" | "+" => Ok(Command::ZoomIn),
            "zoom-out" | "zoomout" | "out" | "-" => Ok(Command::ZoomOut),
            _ => Err(GridError::UnknownCommand(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("left".parse::<Command>().unwrap(), Command::Left);
        assert_eq!("L".parse::<Command>().unwrap(), Command::Right);
        assert_eq!(" k ".parse::<Command>().unwrap(), Command::Up);
        assert_eq!("j".parse::<Command>().unwrap(), Command::Down);
        assert_eq!("+".parse::<Command>().unwrap(), Command::ZoomIn);
        assert_eq!("Zoom-Out".parse::<Command>().unwrap(), Command::ZoomOut);
    }

    #[test]
    fn test_canonical_names_parse_back() {
        for cmd in Command::ALL {
            assert_eq!(cmd.as_str().parse::<Command>().unwrap(), cmd);
        }
    }

    #[test]
    fn test_unknown() {
        assert_eq!(
            "diagonal".parse::<Command>(),
            Err(GridError::UnknownCommand("diagonal".to_string()))
        );
    }
}
