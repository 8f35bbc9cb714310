use crate::domain::classify::{commit_prefix, message_column};
use crate::domain::{Element, ElementName, Elements, ParseError};
use std::ops::Range;

pub const BOOKMARK_NAMESPACE: &str = "remote/";

pub const REVIEW_STATUSES: [&str; 5] = [
    "Unreviewed",
    "Review Required",
    "Merged",
    "Accepted",
    "Closed",
];

pub const STATUS_EMOJIS: [char; 2] = ['✓', '✗'];

const DATETIME_CLOCK_KEYWORD: &str = "at";
const DATETIME_RELATIVE_KEYWORD: &str = "ago";

/// Fields that may trail the author, in the only order they can appear.
const OPTIONAL_FIELDS: [ElementName; 4] = [
    ElementName::PullRequest,
    ElementName::Status,
    ElementName::StatusEmoji,
    ElementName::Bookmark,
];

/// `commit` is checked first so its absence is the reported one.
const REQUIRED_FIELDS: [ElementName; 3] = [
    ElementName::Commit,
    ElementName::Datetime,
    ElementName::Author,
];

struct Scanner {
    chars: Vec<char>,
    pos: usize,
}

impl Scanner {
    fn new(line: &str) -> Self {
        Self {
            chars: line.chars().collect(),
            pos: 0,
        }
    }

    fn skip_whitespace(&mut self) -> usize {
        let start = self.pos;
        while self.chars.get(self.pos).is_some_and(|c| c.is_whitespace()) {
            self.pos += 1;
        }
        self.pos - start
    }

    fn token(&mut self) -> Option<Range<usize>> {
        let start = self.pos;
        while self.chars.get(self.pos).is_some_and(|c| !c.is_whitespace()) {
            self.pos += 1;
        }
        (self.pos > start).then_some(start..self.pos)
    }

    fn literal(&mut self, literal: &str) -> Option<Range<usize>> {
        let start = self.pos;
        let mut end = start;
        for expected in literal.chars() {
            if self.chars.get(end) != Some(&expected) {
                return None;
            }
            end += 1;
        }
        self.pos = end;
        Some(start..end)
    }

    fn at_token_end(&self) -> bool {
        self.chars.get(self.pos).is_none_or(|c| c.is_whitespace())
    }

    fn text(&self, range: &Range<usize>) -> String {
        self.chars[range.clone()].iter().collect()
    }
}

pub fn extract_commit_fields(line: &str) -> Elements {
    let mut elements = Elements::new();
    let Some(prefix) = commit_prefix(line) else {
        return elements;
    };

    let mut scanner = Scanner::new(line);
    scanner.pos = prefix.marker_column + 1;
    scanner.skip_whitespace();

    let Some(commit) = scanner.token() else {
        return elements;
    };
    insert(&mut elements, &scanner, ElementName::Commit, commit);

    if scanner.skip_whitespace() == 0 {
        return elements;
    }
    let Some(datetime) = scan_datetime(&mut scanner) else {
        return elements;
    };
    insert(&mut elements, &scanner, ElementName::Datetime, datetime);

    scanner.skip_whitespace();
    let Some(author) = scanner.token() else {
        return elements;
    };
    insert(&mut elements, &scanner, ElementName::Author, author);

    for name in OPTIONAL_FIELDS {
        scanner.skip_whitespace();
        let start = scanner.pos;
        let range = match name {
            ElementName::PullRequest => scan_pull_request(&mut scanner),
            ElementName::Status => REVIEW_STATUSES
                .iter()
                .find_map(|status| scanner.literal(status)),
            ElementName::StatusEmoji => STATUS_EMOJIS
                .iter()
                .find_map(|emoji| scanner.literal(emoji.encode_utf8(&mut [0; 4]))),
            ElementName::Bookmark => scan_bookmark(&mut scanner),
            _ => None,
        };
        match range {
            Some(range) if scanner.at_token_end() => {
                insert(&mut elements, &scanner, name, range);
            }
            // "#3x" or "Mergedfoo": a field glued to other text is no field.
            _ => scanner.pos = start,
        }
    }

    elements
}

pub fn extract_message_fields(line: &str) -> Elements {
    let mut elements = Elements::new();
    let Some(start) = message_column(line) else {
        return elements;
    };
    let scanner = Scanner::new(line);
    let range = start..scanner.chars.len();
    insert(&mut elements, &scanner, ElementName::Message, range);
    elements
}

pub fn extract_line_elements(line: &str) -> Elements {
    if commit_prefix(line).is_some() {
        extract_commit_fields(line)
    } else {
        extract_message_fields(line)
    }
}

/// The commit id of a well-formed commit line. A line missing any of
/// `commit`, `datetime` or `author` is malformed and cannot be navigated to.
pub fn resolve_commit_id(line: &str) -> Result<String, ParseError> {
    let mut elements = extract_commit_fields(line);
    if let Some(field) = REQUIRED_FIELDS
        .into_iter()
        .find(|name| !elements.contains_key(name))
    {
        return Err(ParseError::MissingCommitField {
            field,
            line: line.to_string(),
        });
    }
    elements
        .remove(&ElementName::Commit)
        .map(|element| element.text)
        .ok_or_else(|| ParseError::MissingCommitField {
            field: ElementName::Commit,
            line: line.to_string(),
        })
}

// "<words> at <time>" or "<words> ago"; at least one word before the keyword.
fn scan_datetime(scanner: &mut Scanner) -> Option<Range<usize>> {
    let start = scanner.pos;
    let mut words = 0usize;
    loop {
        let word = scanner.token()?;
        let text = scanner.text(&word);
        if words > 0 && text == DATETIME_RELATIVE_KEYWORD {
            return Some(start..word.end);
        }
        if words > 0 && text == DATETIME_CLOCK_KEYWORD {
            if scanner.skip_whitespace() == 0 {
                return None;
            }
            let time = scanner.token()?;
            return Some(start..time.end);
        }
        words += 1;
        if scanner.skip_whitespace() == 0 {
            return None;
        }
    }
}

fn scan_pull_request(scanner: &mut Scanner) -> Option<Range<usize>> {
    let start = scanner.pos;
    scanner.literal("#")?;
    let digits_start = scanner.pos;
    while scanner.chars.get(scanner.pos).is_some_and(char::is_ascii_digit) {
        scanner.pos += 1;
    }
    if scanner.pos == digits_start {
        scanner.pos = start;
        return None;
    }
    Some(start..scanner.pos)
}

fn scan_bookmark(scanner: &mut Scanner) -> Option<Range<usize>> {
    let start = scanner.pos;
    scanner.literal(BOOKMARK_NAMESPACE)?;
    match scanner.token() {
        Some(name) => Some(start..name.end),
        None => {
            scanner.pos = start;
            None
        }
    }
}

fn insert(elements: &mut Elements, scanner: &Scanner, name: ElementName, columns: Range<usize>) {
    elements.insert(
        name,
        Element {
            name,
            text: scanner.text(&columns),
            columns,
            line_offset: name.line_offset(),
        },
    );
}
