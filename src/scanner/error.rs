// src/scanner/error.rs
// Fatal engine errors. Bad *input* never shows up here: the scan loop
// handles it by emitting a one-character token of the grammar's reserved
// bad kind. Anything below indicates broken tables or a broken rule set.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    /// A pushback action asked for more characters than the current match
    /// contains.
    PushbackTooFar { requested: usize, available: usize },
    /// A table lookup landed on a structurally inconsistent index, or the
    /// table set failed its own internal contract (e.g. an action id with no
    /// dispatch entry).
    CorruptTables { detail: String },
    /// A dispatch round neither moved the cursor nor changed the mode; the
    /// rule set would spin forever at this offset.
    NoProgress { offset: usize },
}

impl ScanError {
    pub(crate) fn corrupt(detail: impl Into<String>) -> Self {
        ScanError::CorruptTables {
            detail: detail.into(),
        }
    }
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanError::PushbackTooFar {
                requested,
                available,
            } => write!(
                f,
                "pushback of {requested} char(s) exceeds matched span of {available}"
            ),
            ScanError::CorruptTables { detail } => {
                write!(f, "corrupt scanner tables: {detail}")
            }
            ScanError::NoProgress { offset } => {
                write!(f, "scanner made no progress at offset {offset}")
            }
        }
    }
}

impl std::error::Error for ScanError {}
