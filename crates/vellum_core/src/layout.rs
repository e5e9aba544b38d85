//! View layout parsing
//!
//! A layout file declares which page containers a view renders and in what
//! order, one container per line with an optional free-text parameter
//! (usually a width percentage for the side columns).

use std::fmt;

use thiserror::Error;

use crate::lines::{is_comment_or_blank, non_empty, strip_inline_comment};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerName {
    Header,
    Footer,
    Left,
    Right,
    Main,
}

impl ContainerName {
    pub const ALL: [ContainerName; 5] = [
        ContainerName::Header,
        ContainerName::Footer,
        ContainerName::Left,
        ContainerName::Right,
        ContainerName::Main,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ContainerName::Header => "header",
            ContainerName::Footer => "footer",
            ContainerName::Left => "left",
            ContainerName::Right => "right",
            ContainerName::Main => "main",
        }
    }

    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "header" => Some(ContainerName::Header),
            "footer" => Some(ContainerName::Footer),
            "left" => Some(ContainerName::Left),
            "right" => Some(ContainerName::Right),
            "main" => Some(ContainerName::Main),
            _ => None,
        }
    }

    /// File name of the container's directive file.
    pub fn directive_file(self) -> String {
        format!("{}.txt", self.as_str())
    }

    pub fn is_row_member(self) -> bool {
        matches!(
            self,
            ContainerName::Left | ContainerName::Main | ContainerName::Right
        )
    }
}

impl fmt::Display for ContainerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct LayoutEntry {
    pub name: ContainerName,
    pub params: Option<String>,
}

/// Ordered container set parsed from a layout file. Transient; parsed fresh
/// on every render.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    entries: Vec<LayoutEntry>,
}

impl Layout {
    pub fn entries(&self) -> &[LayoutEntry] {
        &self.entries
    }

    pub fn contains(&self, name: ContainerName) -> bool {
        self.entries.iter().any(|entry| entry.name == name)
    }

    pub fn params(&self, name: ContainerName) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .and_then(|entry| entry.params.as_deref())
    }

    /// Whether the page has a left/main/right row at all.
    pub fn has_row(&self) -> bool {
        self.entries.iter().any(|entry| entry.name.is_row_member())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("unknown container tag: {0}")]
    UnknownContainerTag(String),
    #[error("duplicate container tag: {0}")]
    DuplicateContainerTag(String),
}

pub fn parse_layout(input: &str) -> Result<Layout, LayoutError> {
    let mut entries: Vec<LayoutEntry> = Vec::new();
    for raw_line in input.lines() {
        if is_comment_or_blank(raw_line) {
            continue;
        }
        let line = strip_inline_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }
        let (token, rest) = match line.split_once(char::is_whitespace) {
            Some((token, rest)) => (token, rest),
            None => (line, ""),
        };
        let name = ContainerName::parse(token)
            .ok_or_else(|| LayoutError::UnknownContainerTag(token.to_string()))?;
        if entries.iter().any(|entry| entry.name == name) {
            return Err(LayoutError::DuplicateContainerTag(token.to_string()));
        }
        entries.push(LayoutEntry {
            name,
            params: non_empty(rest),
        });
    }
    Ok(Layout { entries })
}
