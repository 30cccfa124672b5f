//! Stdin commands for the `camloop` binary.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleCommand {
    Gather(bool),
    Loop(bool),
    Clear,
    Status,
    Devices,
    Help,
    Quit,
}

/// Shown for `help` and after an unknown command
pub const HELP: &str = "\
Commands:
  gather on|off   start/pause buffering live frames
  loop on|off     replay the buffered window / go back to live
  clear           discard the buffered window
  status          show mode and buffer fill
  devices         list video devices
  quit            stop and exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCommandError(String);

impl fmt::Display for ParseCommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ParseCommandError {}

impl FromStr for ConsoleCommand {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let command = words.next().unwrap_or("").to_lowercase();
        let argument = words.next().map(str::to_lowercase);

        if let Some(extra) = words.next() {
            return Err(ParseCommandError(format!("Unexpected argument '{}'", extra)));
        }

        match (command.as_str(), argument.as_deref()) {
            ("gather", Some(arg)) => Ok(ConsoleCommand::Gather(switch(arg)?)),
            ("loop", Some(arg)) => Ok(ConsoleCommand::Loop(switch(arg)?)),
            ("gather" | "loop", None) => Err(ParseCommandError(format!(
                "'{}' needs on or off",
                command
            ))),
            ("clear", None) => Ok(ConsoleCommand::Clear),
            ("status", None) => Ok(ConsoleCommand::Status),
            ("devices", None) => Ok(ConsoleCommand::Devices),
            ("help" | "?", None) => Ok(ConsoleCommand::Help),
            ("quit" | "exit" | "q", None) => Ok(ConsoleCommand::Quit),
            ("", _) => Err(ParseCommandError("Empty command".to_string())),
            (_, Some(arg)) if is_known(&command) => Err(ParseCommandError(format!(
                "'{}' takes no argument, got '{}'",
                command, arg
            ))),
            _ => Err(ParseCommandError(format!("Unknown command '{}'", command))),
        }
    }
}

fn switch(arg: &str) -> Result<bool, ParseCommandError> {
    match arg {
        "on" | "true" | "1" => Ok(true),
        "off" | "false" | "0" => Ok(false),
        other => Err(ParseCommandError(format!(
            "Expected on or off, got '{}'",
            other
        ))),
    }
}

fn is_known(command: &str) -> bool {
    matches!(
        command,
        "clear" | "status" | "devices" | "help" | "?" | "quit" | "exit" | "q"
    )
}
