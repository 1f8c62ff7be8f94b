//! Replay policy value objects
//!
//! A subscriber picks a [`ReplayPosition`] at subscribe time. It is evaluated
//! exactly once, against whatever history the driver retains at that moment,
//! and never applies to messages published after the subscription exists.

use crate::constants::{REPLAY_DEFAULT_COUNT, REPLAY_DEFAULT_INDEX};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

/// Which retained messages a new subscriber receives before live traffic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "position", content = "value")]
pub enum ReplayPosition {
    /// Entire retained history, oldest first
    FromBeginning,
    /// Only the most recent retained message, if any
    #[default]
    FromLast,
    /// The last `n` retained messages in publish order
    FromLastN(usize),
    /// Retained messages starting at a zero-based index, clamped to the history
    FromIndex(usize),
}

/// Replay policy without its parameter, as selected on a command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReplayKind {
    /// See [`ReplayPosition::FromBeginning`]
    FromBeginning,
    /// See [`ReplayPosition::FromLast`]
    #[default]
    FromLast,
    /// See [`ReplayPosition::FromLastN`]
    FromLastN,
    /// See [`ReplayPosition::FromIndex`]
    FromIndex,
}

impl ReplayPosition {
    /// Build a position from a kind and the optional count-or-index argument
    ///
    /// `FromLastN` defaults to a count of 1 and `FromIndex` to index 0. The
    /// argument is ignored by kinds that take none.
    pub fn from_parts(kind: ReplayKind, count_or_index: Option<usize>) -> Self {
        match kind {
            ReplayKind::FromBeginning => Self::FromBeginning,
            ReplayKind::FromLast => Self::FromLast,
            ReplayKind::FromLastN => {
                Self::FromLastN(count_or_index.unwrap_or(REPLAY_DEFAULT_COUNT))
            }
            ReplayKind::FromIndex => {
                Self::FromIndex(count_or_index.unwrap_or(REPLAY_DEFAULT_INDEX))
            }
        }
    }

    /// The kind of this position, dropping its parameter
    pub fn kind(&self) -> ReplayKind {
        match self {
            Self::FromBeginning => ReplayKind::FromBeginning,
            Self::FromLast => ReplayKind::FromLast,
            Self::FromLastN(_) => ReplayKind::FromLastN,
            Self::FromIndex(_) => ReplayKind::FromIndex,
        }
    }

    /// Slice of a history of `len` messages that must be replayed
    ///
    /// The range is always within `0..len` and may be empty.
    pub fn replay_range(&self, len: usize) -> Range<usize> {
        let start = match *self {
            Self::FromBeginning => 0,
            Self::FromLast => len.saturating_sub(1),
            Self::FromLastN(count) => len.saturating_sub(count),
            Self::FromIndex(index) => index.min(len),
        };
        start..len
    }
}

impl fmt::Display for ReplayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::FromBeginning => "from-beginning",
            Self::FromLast => "from-last",
            Self::FromLastN => "from-last-n",
            Self::FromIndex => "from-index",
        };
        f.write_str(name)
    }
}

impl FromStr for ReplayKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "from-beginning" | "beginning" => Ok(Self::FromBeginning),
            "from-last" | "last" => Ok(Self::FromLast),
            "from-last-n" | "last-n" => Ok(Self::FromLastN),
            "from-index" | "index" => Ok(Self::FromIndex),
            _ => Err(Error::invalid_argument(format!(
                "Unknown replay position '{s}'. Possible values are 'from-beginning', 'from-last', 'from-last-n', 'from-index'"
            ))),
        }
    }
}

impl fmt::Display for ReplayPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FromLastN(count) => write!(f, "{}({count})", self.kind()),
            Self::FromIndex(index) => write!(f, "{}({index})", self.kind()),
            _ => write!(f, "{}", self.kind()),
        }
    }
}
