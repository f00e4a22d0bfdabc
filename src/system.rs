use crate::{EvalError, Interpreter};

pub const HELP: &str = "The program evaluates integer expressions with + - * / ^ and parentheses\n\
You can assign variables such as a = 2.\n\
You can also reuse variables in your expressions";

/// A line starting with `/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Exit,
    Help,
    Unknown,
}

impl Command {
    pub fn parse(line: &str) -> Option<Command> {
        let line = line.trim();
        if !line.starts_with('/') {
            return None;
        }
        Some(match line {
            "/exit" => Command::Exit,
            "/help" => Command::Help,
            _ => Command::Unknown,
        })
    }

    pub fn message(self) -> &'static str {
        match self {
            Command::Exit => "Bye!",
            Command::Help => HELP,
            Command::Unknown => "Unknown command",
        }
    }
}

/// What a front end should do with one input line.
#[derive(Debug, PartialEq, Eq)]
pub enum Response {
    Silent,
    Print(String),
    Failed(EvalError),
    Exit(&'static str),
}

/// Routes a raw line to a command or to the interpreter.
pub fn respond(interpreter: &mut Interpreter, line: &str) -> Response {
    if let Some(command) = Command::parse(line) {
        tracing::debug!(?command, "command");
        return match command {
            Command::Exit => Response::Exit(command.message()),
            _ => Response::Print(command.message().to_string()),
        };
    }

    match interpreter.evaluate(line) {
        Ok(outcome) => outcome.output().map_or(Response::Silent, Response::Print),
        Err(e) => Response::Failed(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_commands() {
        assert_eq!(Command::parse("/exit"), Some(Command::Exit));
        assert_eq!(Command::parse(" /help "), Some(Command::Help));
        assert_eq!(Command::parse("/quit"), Some(Command::Unknown));
        assert_eq!(Command::parse("1/2"), None);
    }

    #[test]
    fn responds_per_line() {
        let mut interpreter = Interpreter::default();
        assert_eq!(respond(&mut interpreter, "   "), Response::Silent);
        assert_eq!(respond(&mut interpreter, "a = 3"), Response::Silent);
        assert_eq!(
            respond(&mut interpreter, "a * 2"),
            Response::Print("6".into())
        );
        assert_eq!(
            respond(&mut interpreter, "/nope"),
            Response::Print("Unknown command".into())
        );
        assert_eq!(respond(&mut interpreter, "/exit"), Response::Exit("Bye!"));
        assert!(matches!(
            respond(&mut interpreter, "b"),
            Response::Failed(EvalError::UnknownVariable { .. })
        ));
    }
}
