//! Topic value object

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of a channel messages are published on
///
/// Non-empty, compared by exact case-sensitive match. There is no hierarchy
/// or wildcarding: `"chat"` and `"Chat"` are unrelated topics.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Topic(String);

impl Topic {
    /// Create a topic, rejecting the empty string
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::invalid_argument("Topic name cannot be empty"));
        }
        Ok(Self(name))
    }

    /// Borrow the topic name
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the topic is part of the well-known catalog
    pub fn is_cataloged(&self) -> bool {
        crate::topics::is_known(&self.0)
    }
}

impl AsRef<str> for Topic {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Topic {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<&str> for Topic {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Topic> for String {
    fn from(topic: Topic) -> Self {
        topic.0
    }
}
