//! Command-line statement parsing.
//!
//! One network line can carry several statements separated by a single
//! configurable character (default `|`), each dispatched independently.

/// Split a raw command line into trimmed statements.
pub fn split_statements(line: &str, separator: char) -> Vec<&str> {
    line.split(separator).map(str::trim).collect()
}

/// Tokenize a statement into a command name and its rejoined argument tail.
///
/// Tokens are space-separated; empty tokens from repeated spaces are
/// dropped, so the tail comes back normalized to single spaces. Returns
/// `None` for an all-whitespace statement.
pub fn split_command(statement: &str) -> Option<(&str, String)> {
    let mut tokens = statement
        .split(' ')
        .map(str::trim)
        .filter(|token| !token.is_empty());
    let name = tokens.next()?;
    let args = tokens.collect::<Vec<_>>().join(" ");
    Some((name, args))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_separator_and_trims() {
        assert_eq!(split_statements("fps on|help", '|'), vec!["fps on", "help"]);
        assert_eq!(split_statements(" fps on | help \n", '|'), vec!["fps on", "help"]);
    }

    #[test]
    fn single_statement_keeps_line_intact() {
        assert_eq!(split_statements("version\n", '|'), vec!["version"]);
    }

    #[test]
    fn empty_pieces_survive_the_split() {
        assert_eq!(split_statements("a||b", '|'), vec!["a", "", "b"]);
    }

    #[test]
    fn tokenizes_name_and_tail() {
        assert_eq!(split_command("touch tap 10 20"), Some(("touch", "tap 10 20".to_string())));
    }

    #[test]
    fn collapses_repeated_spaces() {
        assert_eq!(split_command("fps   on"), Some(("fps", "on".to_string())));
    }

    #[test]
    fn bare_name_has_empty_tail() {
        assert_eq!(split_command("help"), Some(("help", String::new())));
    }

    #[test]
    fn whitespace_only_statement_is_none() {
        assert_eq!(split_command(""), None);
        assert_eq!(split_command("   "), None);
    }
}
