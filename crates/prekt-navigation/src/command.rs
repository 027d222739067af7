//! Console command parsing
//!
//! A line is `verb [argument]`. The verb is matched case-insensitively; the
//! argument is everything after the first run of whitespace, kept verbatim.

use serde::{Deserialize, Serialize};

use crate::error::NavigationError;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    /// Lowercased verb
    pub verb: String,
    /// Trailing argument, untokenized
    pub argument: Option<String>,
    /// The verb as typed, for error messages
    pub raw_verb: String,
}

impl Command {
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(NavigationError::EmptyCommand);
        }

        let (raw_verb, rest) = match input.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, Some(rest)),
            None => (input, None),
        };
        let argument = rest
            .map(|s| s.trim_start().to_string())
            .filter(|s| !s.is_empty());

        Ok(Self {
            verb: raw_verb.to_lowercase(),
            argument,
            raw_verb: raw_verb.to_string(),
        })
    }

    pub fn unknown(&self) -> NavigationError {
        NavigationError::UnknownCommand(self.raw_verb.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_verb_only() {
        let cmd = Command::parse("  HELP ").unwrap();
        assert_eq!(cmd.verb, "help");
        assert!(cmd.argument.is_none());
    }

    #[test]
    fn test_argument_is_verbatim() {
        let cmd = Command::parse("Google   rust  borrow checker").unwrap();
        assert_eq!(cmd.verb, "google");
        assert_eq!(cmd.argument.as_deref(), Some("rust  borrow checker"));
        assert_eq!(cmd.raw_verb, "Google");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(Command::parse("   "), Err(NavigationError::EmptyCommand));
    }

    #[test]
    fn test_unknown_message() {
        let cmd = Command::parse("Frobnicate now").unwrap();
        assert_eq!(
            cmd.unknown().to_string(),
            "Unknown command: 'Frobnicate'. Type 'help' to see available commands."
        );
    }
}
