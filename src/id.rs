//! Hierarchical subtask identifiers.
//!
//! A subtask identifier is a dot-separated sequence of positive integers:
//! the first segment names a root task, every following segment selects a
//! child among its siblings (`1.2.3` = root task 1, its subtask 2, that
//! subtask's subtask 3). A bare root id like `1` is not a subtask
//! identifier.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// A parsed subtask identifier: root task id plus a non-empty segment path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubtaskId {
    root: u64,
    path: Vec<u64>,
}

impl SubtaskId {
    /// Build an identifier from a root id and a segment path.
    ///
    /// Fails with `EmptyPath` when `path` has no segments, since the result
    /// would denote a root task rather than a subtask.
    pub fn new(root: u64, path: Vec<u64>) -> Result<Self> {
        if path.is_empty() {
            return Err(Error::EmptyPath);
        }
        if root == 0 || path.contains(&0) {
            return Err(Error::MalformedIdentifier(format_segments(root, &path)));
        }
        Ok(Self { root, path })
    }

    /// Parse a dot-separated identifier string.
    pub fn parse(input: &str) -> Result<Self> {
        input.parse()
    }

    pub fn root(&self) -> u64 {
        self.root
    }

    pub fn path(&self) -> &[u64] {
        &self.path
    }

    pub fn into_parts(self) -> (u64, Vec<u64>) {
        (self.root, self.path)
    }
}

impl FromStr for SubtaskId {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self> {
        let malformed = || Error::MalformedIdentifier(input.to_string());

        if !input.contains('.') {
            return Err(malformed());
        }

        let mut segments = Vec::new();
        for part in input.split('.') {
            // Digits only: u64 parsing alone would admit a leading '+'.
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(malformed());
            }
            let value: u64 = part.parse().map_err(|_| malformed())?;
            if value == 0 {
                return Err(malformed());
            }
            segments.push(value);
        }

        let root = segments.remove(0);
        Ok(Self {
            root,
            path: segments,
        })
    }
}

impl fmt::Display for SubtaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_segments(self.root, &self.path))
    }
}

/// Join a root id and segment path into the canonical dotted form.
///
/// Fails with `EmptyPath` when the path has no segments.
pub fn generate(root: u64, path: &[u64]) -> Result<String> {
    if path.is_empty() {
        return Err(Error::EmptyPath);
    }
    Ok(format_segments(root, path))
}

/// Join a root id and path without validation. Used for display of
/// already-valid paths; an empty path renders the bare root id.
pub(crate) fn join(root: u64, path: &[u64]) -> String {
    format_segments(root, path)
}

fn format_segments(root: u64, path: &[u64]) -> String {
    let mut out = root.to_string();
    for segment in path {
        out.push('.');
        out.push_str(&segment.to_string());
    }
    out
}
