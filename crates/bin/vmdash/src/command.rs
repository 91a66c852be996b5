//! Commands typed at the dashboard prompt.

use std::str::FromStr;

/// One line of user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Stop,
    Refresh,
    Show,
    Help,
    Quit,
}

/// Input that names no known command.
#[derive(Debug, thiserror::Error)]
#[error("unknown command {0:?}, type `help` for the list")]
pub struct UnknownCommand(pub String);

impl FromStr for Command {
    type Err = UnknownCommand;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_ascii_lowercase().as_str() {
            "start" => Ok(Self::Start),
            "stop" => Ok(Self::Stop),
            "refresh" | "r" => Ok(Self::Refresh),
            "show" | "s" => Ok(Self::Show),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            _ => Err(UnknownCommand(input.trim().to_string())),
        }
    }
}

pub const HELP: &str = "\
commands:
  start     power the VM on (asks for confirmation)
  stop      deallocate the VM (asks for confirmation)
  refresh   poll status and usage now
  show      redraw the dashboard
  help      this list
  quit      leave";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_commands_ignoring_case_and_whitespace() {
        assert_eq!("start".parse::<Command>().unwrap(), Command::Start);
        assert_eq!("  STOP ".parse::<Command>().unwrap(), Command::Stop);
        assert_eq!("r".parse::<Command>().unwrap(), Command::Refresh);
        assert_eq!("exit".parse::<Command>().unwrap(), Command::Quit);
    }

    #[test]
    fn should_reject_unknown_command() {
        let err = "reboot".parse::<Command>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown command \"reboot\", type `help` for the list"
        );
    }
}
