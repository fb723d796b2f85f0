use anyhow::{Context, Result};
use endive::Engine;
use inquire::error::InquireError;
use inquire::Text;

use crate::error_formatter::format_error;
use crate::formatter::Formatter;

const HELP: &str = "\
Directives: Goal, Intro, By, Done, Axiom, Status, Start, Use, Clear, Check,
            Reduce, Define, Functorial, Using
Commands:
  :help              show this message
  :undo              undo the last directive
  :breakpoint NAME   remember the current state as NAME
  :rollback NAME     return to the state saved as NAME
  :exit              leave the session";

/// A REPL command, as opposed to a directive for the engine
#[derive(Debug, PartialEq)]
enum Command<'a> {
    Help,
    Exit,
    Undo,
    Breakpoint(&'a str),
    Rollback(&'a str),
    Unknown(&'a str),
}

fn parse_command(input: &str) -> Option<Command<'_>> {
    let rest = input.trim().strip_prefix(':')?;
    let (name, argument) = match rest.split_once(char::is_whitespace) {
        Some((name, argument)) => (name, argument.trim()),
        None => (rest, ""),
    };
    Some(match (name, argument) {
        ("help", _) => Command::Help,
        ("exit" | "quit", _) => Command::Exit,
        ("undo", _) => Command::Undo,
        ("breakpoint", name) if !name.is_empty() => Command::Breakpoint(name),
        ("rollback", name) if !name.is_empty() => Command::Rollback(name),
        _ => Command::Unknown(rest),
    })
}

pub fn run_repl(mut engine: Engine) -> Result<()> {
    let formatter = Formatter::default();
    println!("Endive {}. Type :help for commands.", env!("CARGO_PKG_VERSION"));

    loop {
        let input = match Text::new("endive>").prompt() {
            Ok(input) => input,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e).context("Failed to read input"),
        };

        match parse_command(&input) {
            Some(Command::Help) => println!("{}", HELP),
            Some(Command::Exit) => break,
            Some(Command::Undo) => match engine.undo() {
                Some(directive) => println!("Undid {}", directive),
                None => println!("Nothing to undo"),
            },
            Some(Command::Breakpoint(name)) => {
                engine.breakpoint(name);
                println!("Breakpoint {} set", name);
            }
            Some(Command::Rollback(name)) => {
                if engine.rollback(name) {
                    println!("Rolled back to {}", name);
                } else {
                    println!("No breakpoint named {}", name);
                }
            }
            Some(Command::Unknown(command)) => {
                println!("Unknown command :{}, try :help", command)
            }
            None => match engine.process_line(&input) {
                Ok(outcome) => print!("{}", formatter.format_outcome(&outcome)),
                Err(e) => eprintln!("{}", format_error(&e)),
            },
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command(":help"), Some(Command::Help));
        assert_eq!(parse_command("  :exit "), Some(Command::Exit));
        assert_eq!(parse_command(":undo"), Some(Command::Undo));
        assert_eq!(
            parse_command(":breakpoint before-intro"),
            Some(Command::Breakpoint("before-intro"))
        );
        assert_eq!(parse_command(":rollback  x"), Some(Command::Rollback("x")));
    }

    #[test]
    fn test_commands_need_their_argument() {
        assert_eq!(
            parse_command(":rollback"),
            Some(Command::Unknown("rollback"))
        );
        assert_eq!(parse_command(":frob"), Some(Command::Unknown("frob")));
    }

    #[test]
    fn test_directives_are_not_commands() {
        assert_eq!(parse_command("Goal A => B"), None);
        assert_eq!(parse_command("# :help"), None);
    }
}
