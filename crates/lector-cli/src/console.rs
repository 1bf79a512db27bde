//! Line-oriented operator console.
//!
//! Each stdin line is one action: an operator button, or a simulated input
//! for the mock camera and keyboard.

use lector_kiosk::OperatorCommand;

/// One parsed console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleAction {
    Command(OperatorCommand),
    /// Make the camera decode `text`.
    Decode(String),
    /// Make the camera report a decode miss.
    Noise(String),
    /// Make the next camera start fail.
    FailStart(String),
    /// Type `text` as a keyboard-wedge burst followed by Enter.
    Type(String),
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unknown command {0:?}, try \"help\"")]
    UnknownCommand(String),

    #[error("{0} needs an argument")]
    MissingArgument(&'static str),
}

pub const HELP: &str = "\
commands:
  start              start a camera scan session
  stop               stop the camera session
  clear              dismiss the error line and stop
  info               show what this kiosk does
  decode <text>      camera decodes <text>
  noise <text>       camera reports a decode miss
  fail-start <why>   next camera start fails
  type <text>        handheld scanner types <text> + Enter
  quit               exit";

/// Parse one console line. Blank lines and `help` yield `Ok(None)`.
///
/// Arguments keep their inner spacing and quotes; only the separator after
/// the command word is dropped.
pub fn parse_line(line: &str) -> Result<Option<ConsoleAction>, ParseError> {
    let line = line.trim_end_matches(['\r', '\n']);
    let trimmed = line.trim_start();
    if trimmed.trim().is_empty() {
        return Ok(None);
    }

    let (word, rest) = match trimmed.split_once(' ') {
        Some((word, rest)) => (word, Some(rest)),
        None => (trimmed.trim_end(), None),
    };
    let argument = |name: &'static str| {
        rest.filter(|r| !r.trim().is_empty())
            .map(str::to_string)
            .ok_or(ParseError::MissingArgument(name))
    };

    let action = match word {
        "help" | "?" => return Ok(None),
        "start" => ConsoleAction::Command(OperatorCommand::Start),
        "stop" => ConsoleAction::Command(OperatorCommand::Stop),
        "clear" => ConsoleAction::Command(OperatorCommand::Clear),
        "info" => ConsoleAction::Command(OperatorCommand::ShowInfo),
        "decode" => ConsoleAction::Decode(argument("decode")?),
        "noise" => ConsoleAction::Noise(argument("noise")?),
        "fail-start" => ConsoleAction::FailStart(argument("fail-start")?),
        "type" => ConsoleAction::Type(argument("type")?),
        "quit" | "exit" => ConsoleAction::Quit,
        other => return Err(ParseError::UnknownCommand(other.to_string())),
    };

    Ok(Some(action))
}
