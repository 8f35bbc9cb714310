use crate::domain::{
    LineKind, LogLine, ParseError, SelectableEntry, classify, extract_line_elements,
    is_current_checkout, is_in_trunk,
};
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

static ANSI_ESCAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1B[@-_][0-?]*[ -/]*[@-~]").expect("valid ANSI escape pattern")
});

pub fn strip_ansi(text: &str) -> Cow<'_, str> {
    ANSI_ESCAPE.replace_all(text, "")
}

impl LogLine {
    /// Builds a line from already color-stripped text.
    pub fn parse(text: &str) -> Self {
        let text = text.trim_end();
        Self {
            text: text.to_string(),
            kind: classify(text),
            is_in_trunk: is_in_trunk(text),
            elements: extract_line_elements(text),
        }
    }
}

/// One parsed `sl ssl` snapshot.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SmartLog {
    lines: Vec<LogLine>,
    entries: Vec<SelectableEntry>,
}

impl SmartLog {
    pub fn parse(raw: &str) -> Self {
        let stripped = strip_ansi(raw);
        let lines: Vec<LogLine> = stripped.lines().map(LogLine::parse).collect();
        let entries = fold_entries(&lines);
        tracing::debug!(
            lines = lines.len(),
            entries = entries.len(),
            "parsed smartlog"
        );
        Self { lines, entries }
    }

    pub fn lines(&self) -> &[LogLine] {
        &self.lines
    }

    pub fn entries(&self) -> &[SelectableEntry] {
        &self.entries
    }

    pub fn commit_line_indices(&self) -> Vec<usize> {
        self.lines
            .iter()
            .enumerate()
            .filter(|(_, line)| line.kind == LineKind::Commit)
            .map(|(index, _)| index)
            .collect()
    }

    /// Position of the `@` entry within `commit_line_indices()`.
    pub fn current_checkout_position(&self) -> Result<usize, ParseError> {
        if self.entries.is_empty() {
            return Err(ParseError::NoCommitLines);
        }
        let positions: Vec<usize> = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.selected)
            .map(|(position, _)| position)
            .collect();
        match positions.as_slice() {
            [position] => Ok(*position),
            _ => Err(ParseError::NoCurrentCheckout {
                found: positions.len(),
            }),
        }
    }

    pub fn resolve_commit_id(&self, position: usize) -> Result<String, ParseError> {
        self.entries
            .get(position)
            .ok_or(ParseError::NoSuchEntry { position })?
            .commit_id()
    }
}

fn fold_entries(lines: &[LogLine]) -> Vec<SelectableEntry> {
    let mut entries = Vec::new();
    let mut index = 0usize;
    while let Some(line) = lines.get(index) {
        if line.kind != LineKind::Commit {
            index += 1;
            continue;
        }

        let message_line = lines
            .get(index + 1)
            .filter(|next| next.kind == LineKind::Message)
            .cloned();
        let mut line_indices = vec![index];
        if message_line.is_some() {
            line_indices.push(index + 1);
        }
        index += line_indices.len();

        entries.push(SelectableEntry {
            selected: is_current_checkout(&line.text),
            commit_line: line.clone(),
            message_line,
            line_indices,
        });
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ElementName;
    use crate::domain::fixtures::EXAMPLE_SMARTLOG;

    #[test]
    fn finds_commit_lines_and_current_checkout() {
        let log = SmartLog::parse(EXAMPLE_SMARTLOG);
        assert_eq!(log.lines().len(), 12);
        assert_eq!(log.commit_line_indices(), vec![0, 3, 6, 9]);
        assert_eq!(log.current_checkout_position(), Ok(1));
    }

    #[test]
    fn only_the_leftmost_commit_is_in_trunk() {
        let log = SmartLog::parse(EXAMPLE_SMARTLOG);
        let trunk: Vec<usize> = log
            .lines()
            .iter()
            .enumerate()
            .filter(|(_, line)| line.is_in_trunk)
            .map(|(index, _)| index)
            .collect();
        assert_eq!(trunk, vec![9]);
    }

    #[test]
    fn commit_lines_absorb_the_following_message() {
        let log = SmartLog::parse(EXAMPLE_SMARTLOG);
        let spans: Vec<Vec<usize>> = log
            .entries()
            .iter()
            .map(|entry| entry.line_indices.clone())
            .collect();
        assert_eq!(spans, vec![vec![0, 1], vec![3, 4], vec![6, 7], vec![9, 10]]);

        let selected: Vec<bool> = log.entries().iter().map(|entry| entry.selected).collect();
        assert_eq!(selected, vec![false, true, false, false]);

        let first = &log.entries()[0];
        assert_eq!(
            first.element(ElementName::Message).map(|e| e.text.as_str()),
            Some("commit 3")
        );
        assert_eq!(first.commit_id(), Ok("7a8a6054a".to_string()));
    }

    #[test]
    fn message_is_consumed_at_most_once() {
        let raw = "@  aaa  1 day ago  me\n│  first\n│  second\no  bbb  2 days ago  me";
        let log = SmartLog::parse(raw);
        assert_eq!(log.entries().len(), 2);
        assert_eq!(log.entries()[0].line_indices, vec![0, 1]);
        assert_eq!(log.entries()[1].line_indices, vec![3]);
        assert!(log.entries()[1].message_line.is_none());
    }

    #[test]
    fn trailing_commit_line_has_no_message() {
        let log = SmartLog::parse("o  aaa  1 day ago  me\n│  msg\n@  bbb  2 days ago  me");
        assert_eq!(log.entries().len(), 2);
        assert_eq!(log.entries()[1].line_indices, vec![2]);
        assert_eq!(log.current_checkout_position(), Ok(1));
    }

    #[test]
    fn strips_colors_before_parsing() {
        let raw = "\x1b[33m@\x1b[0m  \x1b[1;35m04b66ceaf\x1b[0m  May 09 at 11:22  roy   \n\x1b[2m│\x1b[0m  hello";
        let log = SmartLog::parse(raw);
        assert_eq!(log.lines()[0].text, "@  04b66ceaf  May 09 at 11:22  roy");
        assert_eq!(log.resolve_commit_id(0), Ok("04b66ceaf".to_string()));
        assert_eq!(
            log.entries()[0]
                .element(ElementName::Message)
                .map(|e| e.text.as_str()),
            Some("hello")
        );
    }

    #[test]
    fn snapshot_without_checkout_is_malformed() {
        let log = SmartLog::parse("o  aaa  1 day ago  me\no  bbb  2 days ago  me");
        assert_eq!(
            log.current_checkout_position(),
            Err(ParseError::NoCurrentCheckout { found: 0 })
        );
    }

    #[test]
    fn snapshot_with_two_checkouts_is_malformed() {
        let log = SmartLog::parse("@  aaa  1 day ago  me\n@  bbb  2 days ago  me");
        assert_eq!(
            log.current_checkout_position(),
            Err(ParseError::NoCurrentCheckout { found: 2 })
        );
    }

    #[test]
    fn snapshot_without_commits_is_malformed() {
        let log = SmartLog::parse("│\n~");
        assert!(log.entries().is_empty());
        assert_eq!(
            log.current_checkout_position(),
            Err(ParseError::NoCommitLines)
        );
    }

    #[test]
    fn resolving_past_the_last_entry_fails() {
        let log = SmartLog::parse(EXAMPLE_SMARTLOG);
        assert_eq!(log.resolve_commit_id(2), Ok("b693b742c".to_string()));
        assert_eq!(
            log.resolve_commit_id(4),
            Err(ParseError::NoSuchEntry { position: 4 })
        );
    }
}
