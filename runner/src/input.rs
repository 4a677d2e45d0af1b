use common::{GameMode, SessionCommand};

/// Maps one line typed on stdin to a session command.
///
/// An empty line behaves like the space bar: start when idle, pause otherwise.
pub fn parse_command(line: &str) -> Result<SessionCommand, String> {
    let line = line.trim().to_ascii_lowercase();
    let mut parts = line.split_whitespace();
    let Some(word) = parts.next() else {
        return Ok(SessionCommand::StartOrPause);
    };

    let command = match word {
        "w" | "up" => SessionCommand::SetDirection { x: 0, y: -1 },
        "s" | "down" => SessionCommand::SetDirection { x: 0, y: 1 },
        "a" | "left" => SessionCommand::SetDirection { x: -1, y: 0 },
        "d" | "right" => SessionCommand::SetDirection { x: 1, y: 0 },
        "p" | "pause" => SessionCommand::TogglePause,
        "r" | "reset" => SessionCommand::Reset,
        "start" => SessionCommand::Start,
        "q" | "quit" | "exit" => SessionCommand::Shutdown,
        "mode" => {
            let Some(mode) = parts.next() else {
                return Err("Usage: mode <human|ai|vs>".to_string());
            };
            SessionCommand::SetMode(mode.parse::<GameMode>()?)
        }
        other => return Err(format!("Unknown command '{}'", other)),
    };

    if parts.next().is_some() {
        return Err(format!("Unexpected arguments after '{}'", word));
    }
    Ok(command)
}

pub const HELP: &str = "Controls: w/a/s/d (or up/down/left/right) to steer, <enter> start/pause, \
p pause, r reset, start, mode <human|ai|vs>, q quit";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_words() {
        assert_eq!(parse_command("w").unwrap(), SessionCommand::SetDirection { x: 0, y: -1 });
        assert_eq!(parse_command("DOWN").unwrap(), SessionCommand::SetDirection { x: 0, y: 1 });
        assert_eq!(parse_command(" a ").unwrap(), SessionCommand::SetDirection { x: -1, y: 0 });
        assert_eq!(parse_command("right").unwrap(), SessionCommand::SetDirection { x: 1, y: 0 });
    }

    #[test]
    fn test_empty_line_starts_or_pauses() {
        assert_eq!(parse_command("").unwrap(), SessionCommand::StartOrPause);
        assert_eq!(parse_command("   ").unwrap(), SessionCommand::StartOrPause);
    }

    #[test]
    fn test_mode_command() {
        assert_eq!(parse_command("mode vs").unwrap(), SessionCommand::SetMode(GameMode::Versus));
        assert_eq!(parse_command("mode AI").unwrap(), SessionCommand::SetMode(GameMode::Ai));
        assert!(parse_command("mode").is_err());
        assert!(parse_command("mode robots").is_err());
    }

    #[test]
    fn test_controls() {
        assert_eq!(parse_command("p").unwrap(), SessionCommand::TogglePause);
        assert_eq!(parse_command("r").unwrap(), SessionCommand::Reset);
        assert_eq!(parse_command("start").unwrap(), SessionCommand::Start);
        assert_eq!(parse_command("q").unwrap(), SessionCommand::Shutdown);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(parse_command("jump").is_err());
        assert!(parse_command("w now").is_err());
    }
}
