//! Child-index paths into a schema tree.
//!
//! A [`Path`] is a sequence of zero-based child indices, outermost first. Its
//! string form joins base-10 indices with [`PATH_SEPARATOR`], e.g. `"1.4"` is
//! child 4 of child 1. The empty string is the empty path. A path only has
//! meaning relative to the root schema it was produced for.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::FsvisError;

/// Delimiter between indices in a path string.
pub const PATH_SEPARATOR: char = '.';

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path(Vec<usize>);

impl Path {
    /// The empty path, addressing the root itself.
    pub fn root() -> Self {
        Path(Vec::new())
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// This path extended by one child index.
    pub fn child(&self, index: usize) -> Path {
        let mut indices = Vec::with_capacity(self.0.len() + 1);
        indices.extend_from_slice(&self.0);
        indices.push(index);
        Path(indices)
    }
}

impl From<Vec<usize>> for Path {
    fn from(indices: Vec<usize>) -> Self {
        Path(indices)
    }
}

impl FromStr for Path {
    type Err = FsvisError;

    /// Parse `"a.b.c"` into indices. Every segment must be one or more ASCII
    /// digits; signs, whitespace and empty segments are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Path::root());
        }
        s.split(PATH_SEPARATOR)
            .map(|segment| {
                if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(FsvisError::InvalidPath(s.to_string()));
                }
                segment
                    .parse::<usize>()
                    .map_err(|_| FsvisError::InvalidPath(s.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Path)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, index) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", PATH_SEPARATOR)?;
            }
            write!(f, "{}", index)?;
        }
        Ok(())
    }
}

impl Serialize for Path {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
