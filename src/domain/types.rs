use crate::domain::resolve_commit_id;
use serde::Serialize;
use std::collections::BTreeMap;
use std::ops::Range;
use thiserror::Error;

#[derive(Debug, Error, Eq, PartialEq)]
pub enum ParseError {
    #[error("malformed smartlog: no commit lines found")]
    NoCommitLines,

    #[error("malformed smartlog: expected exactly one current checkout (@), found {found}")]
    NoCurrentCheckout { found: usize },

    #[error("malformed commit line, missing `{}`: {line}", .field.as_str())]
    MissingCommitField { field: ElementName, line: String },

    #[error("no selectable entry at position {position}")]
    NoSuchEntry { position: usize },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum LineKind {
    Commit,
    Message,
    Other,
}

impl LineKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Commit => "commit",
            Self::Message => "message",
            Self::Other => "other",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementName {
    Commit,
    Datetime,
    Author,
    PullRequest,
    Status,
    StatusEmoji,
    Bookmark,
    Message,
}

impl ElementName {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Commit => "commit",
            Self::Datetime => "datetime",
            Self::Author => "author",
            Self::PullRequest => "pull_request",
            Self::Status => "status",
            Self::StatusEmoji => "status_emoji",
            Self::Bookmark => "bookmark",
            Self::Message => "message",
        }
    }

    /// 0 for fields of the commit line, 1 for the attached message line.
    pub fn line_offset(self) -> u8 {
        match self {
            Self::Message => 1,
            _ => 0,
        }
    }
}

/// A named span of one log line. `columns` counts chars, not bytes.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Element {
    pub name: ElementName,
    pub text: String,
    pub columns: Range<usize>,
    pub line_offset: u8,
}

pub type Elements = BTreeMap<ElementName, Element>;

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct LogLine {
    pub text: String,
    pub kind: LineKind,
    pub is_in_trunk: bool,
    pub elements: Elements,
}

impl LogLine {
    pub fn element(&self, name: ElementName) -> Option<&Element> {
        self.elements.get(&name)
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct SelectableEntry {
    pub commit_line: LogLine,
    pub message_line: Option<LogLine>,
    pub line_indices: Vec<usize>,
    pub selected: bool,
}

impl SelectableEntry {
    pub fn element(&self, name: ElementName) -> Option<&Element> {
        self.commit_line.element(name).or_else(|| {
            self.message_line
                .as_ref()
                .and_then(|line| line.element(name))
        })
    }

    pub fn commit_id(&self) -> Result<String, ParseError> {
        resolve_commit_id(&self.commit_line.text)
    }
}
