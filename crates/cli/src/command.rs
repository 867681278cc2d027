//! Parser for lines typed at the interactive prompt.

use std::sync::LazyLock;

use regex::Regex;

static SET_DICT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^_dict=(\w{4})$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Exit,
    ListDicts,
    Help,
    /// Switch the active dictionary; the code is validated by the caller.
    SetDict(String),
    /// Show usage details of the numbered word from the last lookup.
    Details(usize),
    Lookup(String),
    Empty,
}

pub fn parse(line: &str) -> Command {
    let line = line.trim();
    match line {
        "" => Command::Empty,
        ".exit" | "_exit" => Command::Exit,
        ".dicts" => Command::ListDicts,
        ".?" | ".help" => Command::Help,
        _ => {
            if let Some(caps) = SET_DICT.captures(line) {
                Command::SetDict(caps[1].to_string())
            } else if let Ok(number) = line.parse::<usize>() {
                Command::Details(number)
            } else {
                Command::Lookup(line.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_commands() {
        assert_eq!(parse(".exit"), Command::Exit);
        assert_eq!(parse("_exit"), Command::Exit);
        assert_eq!(parse(".dicts"), Command::ListDicts);
        assert_eq!(parse(".?"), Command::Help);
        assert_eq!(parse(" .help "), Command::Help);
        assert_eq!(parse("   "), Command::Empty);
    }

    #[test]
    fn test_set_dict() {
        assert_eq!(parse("_dict=a000"), Command::SetDict("a000".to_string()));
        assert_eq!(parse("_dict=a0001"), Command::Lookup("_dict=a0001".to_string()));
        assert_eq!(parse("_dict="), Command::Lookup("_dict=".to_string()));
    }

    #[test]
    fn test_numbers_are_details() {
        assert_eq!(parse("3"), Command::Details(3));
        assert_eq!(parse("-3"), Command::Lookup("-3".to_string()));
    }

    #[test]
    fn test_everything_else_is_lookup() {
        assert_eq!(parse("kat"), Command::Lookup("kat".to_string()));
        assert_eq!(parse("købe katten i sækken"), Command::Lookup("købe katten i sækken".to_string()));
    }
}
