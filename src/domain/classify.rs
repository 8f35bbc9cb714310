use crate::domain::LineKind;

pub const REGULAR_COMMIT_MARKER: char = 'o';
pub const CURRENT_CHECKOUT_MARKER: char = '@';

// Graph glyphs allowed before a commit marker (whitespace is always allowed).
const COMMIT_PREFIX_GLYPHS: [char; 3] = ['╷', '│', ':'];
// Graph glyphs allowed before a message (whitespace is always allowed).
const MESSAGE_PREFIX_GLYPHS: [char; 6] = ['╷', '│', '╭', '─', '╯', '├'];
// A commit sits on a fork when only these glyphs (or whitespace) precede its marker.
const FORK_PREFIX_GLYPHS: [char; 1] = ['│'];

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct CommitPrefix {
    /// Number of chars before the marker.
    pub marker_column: usize,
    pub marker: char,
}

pub(crate) fn commit_prefix(line: &str) -> Option<CommitPrefix> {
    let mut chars = line.chars();
    let mut marker_column = 0usize;
    let marker = loop {
        let c = chars.next()?;
        if c.is_whitespace() || COMMIT_PREFIX_GLYPHS.contains(&c) {
            marker_column += 1;
            continue;
        }
        break c;
    };

    if marker != REGULAR_COMMIT_MARKER && marker != CURRENT_CHECKOUT_MARKER {
        return None;
    }
    if !chars.next().is_some_and(char::is_whitespace) {
        return None;
    }

    Some(CommitPrefix {
        marker_column,
        marker,
    })
}

/// Column where the message text starts, if the line is message-shaped.
pub(crate) fn message_column(line: &str) -> Option<usize> {
    let prefix_len = line
        .chars()
        .take_while(|c| c.is_whitespace() || MESSAGE_PREFIX_GLYPHS.contains(c))
        .count();
    if prefix_len == 0 || line.chars().nth(prefix_len).is_none() {
        return None;
    }
    Some(prefix_len)
}

pub fn classify(line: &str) -> LineKind {
    if commit_prefix(line).is_some() {
        LineKind::Commit
    } else if message_column(line).is_some() {
        LineKind::Message
    } else {
        LineKind::Other
    }
}

pub fn is_commit_line(line: &str) -> bool {
    commit_prefix(line).is_some()
}

pub fn is_current_checkout(line: &str) -> bool {
    commit_prefix(line).is_some_and(|prefix| prefix.marker == CURRENT_CHECKOUT_MARKER)
}

pub fn is_local_fork(line: &str) -> bool {
    let Some(prefix) = commit_prefix(line) else {
        return false;
    };
    prefix.marker_column > 0
        && line
            .chars()
            .take(prefix.marker_column)
            .all(|c| c.is_whitespace() || FORK_PREFIX_GLYPHS.contains(&c))
}

pub fn is_in_trunk(line: &str) -> bool {
    is_commit_line(line) && !is_local_fork(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_commit_message_and_decoration_lines() {
        assert_eq!(
            classify("  o  7a8a6054a  May 09 at 11:16  roy.rothenberg"),
            LineKind::Commit
        );
        assert_eq!(classify("│ @  04b66ceaf  2 days ago  someone"), LineKind::Commit);
        assert_eq!(classify("  │  commit 3"), LineKind::Message);
        assert_eq!(classify("╭─╯  commit 2"), LineKind::Message);
        assert_eq!(classify("  │"), LineKind::Other);
        assert_eq!(classify("│"), LineKind::Other);
        assert_eq!(classify("~"), LineKind::Other);
        assert_eq!(classify(""), LineKind::Other);
    }

    #[test]
    fn marker_needs_trailing_whitespace() {
        assert!(!is_commit_line("  │  ok then"));
        assert!(!is_commit_line("o"));
        assert!(is_commit_line("o  garbage"));
    }

    #[test]
    fn detects_current_checkout_marker() {
        assert!(is_current_checkout("  @  04b66ceaf  May 09 at 11:22  roy.rothenberg"));
        assert!(!is_current_checkout("  o  7a8a6054a  May 09 at 11:16  roy.rothenberg"));
        assert!(!is_current_checkout("╭─╯  @ mentioned in a message"));
    }

    #[test]
    fn trunk_is_leftmost_column_only() {
        let trunk = "o  b7e6cf068  May 09 at 11:21  roy.rothenberg  remote/main";
        let indented = "  o  7a8a6054a  May 09 at 11:16  roy.rothenberg";
        let forked = "│ o  b693b742c  May 09 at 13:56  roy.rothenberg";

        assert!(is_in_trunk(trunk));
        assert!(!is_local_fork(trunk));
        for line in [indented, forked] {
            assert!(is_local_fork(line), "{line}");
            assert!(!is_in_trunk(line), "{line}");
        }
        assert!(!is_in_trunk("│  commit 1"));
        assert!(!is_local_fork("│  commit 1"));
    }

    #[test]
    fn dotted_graph_prefix_is_not_a_fork() {
        let line = ":  o  1234abcd  Yesterday at 09:00  someone";
        assert!(is_commit_line(line));
        assert!(!is_local_fork(line));
        assert!(is_in_trunk(line));
    }
}
