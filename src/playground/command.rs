//! Playground command parsing
//!
//! One command per line. The first word names the command; for `type`, `set`
//! and `paste` everything after the first space is taken verbatim, so
//! trailing spaces count.

use crate::error::{MentionsError, Result};

/// A parsed playground command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Insert text at the cursor, one input event
    Type(String),
    /// Replace the document, one input event
    Set(String),
    /// Delete chars before the cursor, one input event each
    Back(usize),
    /// Paste text: paste event, insertion, input event
    Paste(String),
    /// Key press on the editor
    Key(String),
    /// Move focus away from the editor
    Blur,
    /// Give focus back to the editor
    Focus,
    /// Click the nth option of the open surface
    Pick(usize),
    Dismiss,
    Show,
    Help,
    Quit,
}

/// Parse one line.
///
/// # Returns
/// * `Result<Option<Command>>` - `None` for blank lines and `#` comments
pub fn parse(line: &str) -> Result<Option<Command>> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() || line.trim_start().starts_with('#') {
        return Ok(None);
    }

    let line = line.trim_start();
    let (word, rest) = line.split_once(' ').unwrap_or((line, ""));

    let command = match word.to_lowercase().as_str() {
        "type" => Command::Type(required(word, rest)?),
        "set" => Command::Set(rest.to_string()),
        "back" => Command::Back(count(word, rest, 1)?),
        "paste" => Command::Paste(required(word, rest)?),
        "key" => Command::Key(required(word, rest.trim())?),
        "blur" => Command::Blur,
        "focus" => Command::Focus,
        "pick" => Command::Pick(count(word, rest, 0)?),
        "dismiss" => Command::Dismiss,
        "show" => Command::Show,
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => {
            return Err(MentionsError::Generic(format!(
                "Unknown command '{word}', try 'help'"
            )));
        }
    };

    Ok(Some(command))
}

fn required(word: &str, rest: &str) -> Result<String> {
    if rest.is_empty() {
        return Err(MentionsError::Generic(format!("'{word}' needs an argument")));
    }
    Ok(rest.to_string())
}

fn count(word: &str, rest: &str, default: usize) -> Result<usize> {
    let rest = rest.trim();
    if rest.is_empty() {
        return Ok(default);
    }
    rest.parse()
        .map_err(|_| MentionsError::Generic(format!("'{word}' expects a number, got '{rest}'")))
}

pub const HELP: &str = "\
Commands:
  type <text>    insert text at the cursor
  set <text>     replace the whole document
  back [n]       delete n chars before the cursor (default 1)
  paste <text>   paste text; the next evaluation is skipped
  key <name>     press a key (Escape, ArrowDown, ArrowUp, Enter, Tab)
  blur           move focus away from the editor
  focus          focus the editor again
  pick <n>       click option n of the open menu
  dismiss        close the menu without committing
  show           print document, cursor and menu state
  help           show this help
  quit, exit     leave the playground";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_keeps_spaces() {
        assert_eq!(
            parse("type @al ").unwrap(),
            Some(Command::Type("@al ".to_string()))
        );
    }

    #[test]
    fn test_blank_and_comment_lines() {
        assert_eq!(parse("").unwrap(), None);
        assert_eq!(parse("   ").unwrap(), None);
        assert_eq!(parse("# open the menu").unwrap(), None);
    }

    #[test]
    fn test_counts() {
        assert_eq!(parse("back").unwrap(), Some(Command::Back(1)));
        assert_eq!(parse("back 3").unwrap(), Some(Command::Back(3)));
        assert_eq!(parse("pick 2").unwrap(), Some(Command::Pick(2)));
        assert!(parse("back two").is_err());
    }

    #[test]
    fn test_set_may_clear() {
        assert_eq!(parse("set").unwrap(), Some(Command::Set(String::new())));
    }

    #[test]
    fn test_missing_argument() {
        assert!(parse("type").is_err());
        assert!(parse("key   ").is_err());
    }

    #[test]
    fn test_unknown_command() {
        let err = parse("insert x").unwrap_err();
        assert!(err.to_string().contains("insert"));
    }

    #[test]
    fn test_case_insensitive_words() {
        assert_eq!(parse("KEY Escape").unwrap(), Some(Command::Key("Escape".to_string())));
        assert_eq!(parse("Exit").unwrap(), Some(Command::Quit));
    }
}
