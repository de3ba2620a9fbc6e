//! Path codec
//!
//! Paths address nodes from the document root: `/`, `/config`,
//! `/list/3/name`. A `/` or `\` inside a key is escaped with a leading `\`,
//! both in the stored leaf name and in the path segment, so
//! `{"a/b": 1}` lives at `/a\/b`.
//!
//! | Input | Canonical | Parent | Leaf |
//! |-------|-----------|--------|------|
//! | `/` | `/` | - | `**ROOT**` |
//! | `/a/b/` | `/a/b` | `/a` | `b` |
//! | `/a\/` | `/a\/` | `/` | `a/` |
//! | `/a//b` | error | | |

use crate::error::{ArborError, ArborResult};
use crate::json::{LimitError, MAX_PATH_LENGTH};

/// Path of every document's root node
pub const ROOT_PATH: &str = "/";

/// Leaf name reserved for the root node
pub const ROOT_LEAF: &str = "**ROOT**";

/// Trailing leaf name meaning "append to the parent array"
pub const APPEND_MARKER: &str = "#";

const SEPARATOR: char = '/';
const ESCAPE: char = '\\';

/// Escape a key for use as a leaf name or path segment
pub fn escape(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for c in key.chars() {
        if c == SEPARATOR || c == ESCAPE {
            out.push(ESCAPE);
        }
        out.push(c);
    }
    out
}

/// Inverse of [`escape`]
///
/// Total over all inputs: a trailing lone `\` is kept as-is.
pub fn unescape(escaped: &str) -> String {
    let mut out = String::with_capacity(escaped.len());
    let mut chars = escaped.chars();
    while let Some(c) = chars.next() {
        if c == ESCAPE {
            match chars.next() {
                Some(next) => out.push(next),
                None => out.push(ESCAPE),
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Append an escaped leaf name to a canonical parent path
pub fn join(parent: &str, escaped_leaf: &str) -> String {
    if parent == ROOT_PATH {
        format!("/{}", escaped_leaf)
    } else {
        format!("{}/{}", parent, escaped_leaf)
    }
}

/// Parse an array leaf name
///
/// Only canonical decimal indices are accepted: no sign, no leading zeros.
pub fn array_index(leaf: &str) -> Option<u64> {
    if leaf.is_empty() || !leaf.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if leaf.len() > 1 && leaf.starts_with('0') {
        return None;
    }
    leaf.parse().ok()
}

/// A validated, canonical path split into parent and leaf
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPath {
    canonical: String,
    parent: Option<String>,
    leaf: String,
    depth: usize,
}

impl ParsedPath {
    /// Parse and canonicalize a caller-supplied path
    ///
    /// Fails with `InvalidPath` on a missing leading `/`, an empty segment,
    /// a dangling or unknown escape, or a segment equal to [`ROOT_LEAF`].
    pub fn parse(path: &str) -> ArborResult<Self> {
        if !path.starts_with(SEPARATOR) {
            return Err(ArborError::invalid_path(path, "must start with '/'"));
        }
        if path == ROOT_PATH {
            return Ok(Self::root());
        }

        let mut segments: Vec<String> = Vec::new();
        let mut current = String::new();
        let mut chars = path[1..].chars();
        while let Some(c) = chars.next() {
            match c {
                ESCAPE => match chars.next() {
                    Some(next @ (SEPARATOR | ESCAPE)) => {
                        current.push(ESCAPE);
                        current.push(next);
                    }
                    Some(other) => {
                        return Err(ArborError::invalid_path(
                            path,
                            format!("invalid escape '\\{}'", other),
                        ));
                    }
                    None => return Err(ArborError::invalid_path(path, "unterminated escape")),
                },
                SEPARATOR => segments.push(std::mem::take(&mut current)),
                c => current.push(c),
            }
        }
        // A single unescaped trailing slash is dropped.
        if !current.is_empty() || segments.is_empty() {
            segments.push(current);
        }

        if segments.iter().any(|s| s.is_empty()) {
            return Err(ArborError::invalid_path(path, "empty path segment"));
        }
        if segments.iter().any(|s| s == ROOT_LEAF) {
            return Err(ArborError::invalid_path(
                path,
                format!("'{}' is a reserved key", ROOT_LEAF),
            ));
        }
        if segments.len() > MAX_PATH_LENGTH {
            return Err(LimitError::PathTooLong {
                length: segments.len(),
                max: MAX_PATH_LENGTH,
            }
            .into());
        }

        let depth = segments.len();
        let leaf = segments.pop().unwrap_or_default();
        let parent = if segments.is_empty() {
            ROOT_PATH.to_string()
        } else {
            format!("/{}", segments.join("/"))
        };
        let canonical = join(&parent, &leaf);
        Ok(ParsedPath {
            canonical,
            parent: Some(parent),
            leaf,
            depth,
        })
    }

    /// The document root
    pub fn root() -> Self {
        ParsedPath {
            canonical: ROOT_PATH.to_string(),
            parent: None,
            leaf: ROOT_LEAF.to_string(),
            depth: 0,
        }
    }

    /// Canonical path string
    pub fn as_str(&self) -> &str {
        &self.canonical
    }

    /// Canonical parent path, `None` for the root
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// Escaped leaf name
    pub fn leaf(&self) -> &str {
        &self.leaf
    }

    /// Unescaped leaf name
    pub fn key(&self) -> String {
        unescape(&self.leaf)
    }

    /// Number of segments below the root, 0 for `/`
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// True for `/`
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// True if the leaf is the append marker `#`
    pub fn is_append(&self) -> bool {
        self.leaf == APPEND_MARKER
    }
}
