//! Post entity, its id, and the inputs that create or edit it.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Store-assigned post identifier. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(u64);

impl PostId {
    /// Wrap a raw id, rejecting zero.
    pub fn new(raw: u64) -> Result<Self, StoreError> {
        if raw == 0 {
            return Err(StoreError::InvalidArgument(
                "post id must be a positive integer".to_string(),
            ));
        }
        Ok(Self(raw))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PostId {
    type Err = StoreError;

    /// Parse an id as received from the transport layer.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(StoreError::InvalidArgument(format!(
                "post id must be a positive integer, got {:?}",
                s
            )));
        }
        let raw = s.parse::<u64>().map_err(|e| {
            StoreError::InvalidArgument(format!("post id {:?} is out of range: {}", s, e))
        })?;
        Self::new(raw)
    }
}

/// Post entity - one blog entry with an optional banner image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub description: String,
    /// Asset filename, empty when no banner is attached.
    #[serde(default)]
    pub banner: String,
    /// Last modification time. Set on create, overwritten on every update.
    #[serde(rename = "date")]
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn has_banner(&self) -> bool {
        !self.banner.is_empty()
    }

    /// Apply an edit, returning the banner reference that was replaced, if any.
    pub(crate) fn apply(&mut self, changes: PostChanges, now: DateTime<Utc>) -> Option<String> {
        self.title = changes.title;
        self.description = changes.description;
        self.updated_at = later_than(self.updated_at, now);

        match changes.banner {
            Some(banner) if banner != self.banner => {
                let old = std::mem::replace(&mut self.banner, banner);
                (!old.is_empty()).then_some(old)
            }
            _ => None,
        }
    }
}

/// Keeps modification times strictly increasing even when the clock does not move.
fn later_than(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    if now > previous {
        now
    } else {
        previous + TimeDelta::microseconds(1)
    }
}

/// Input for creating a post.
#[derive(Debug, Clone, Default)]
pub struct NewPost {
    pub title: String,
    pub description: String,
    pub banner: String,
}

impl NewPost {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        banner: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            banner: banner.into(),
        }
    }

    pub fn validate(&self) -> Result<(), StoreError> {
        if self.title.trim().is_empty() {
            return Err(StoreError::InvalidArgument(
                "title must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Full replacement of a post's editable fields.
///
/// Title and description are always overwritten. A `None` banner keeps the
/// current reference.
#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub title: String,
    pub description: String,
    pub banner: Option<String>,
}

impl PostChanges {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        banner: Option<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            banner,
        }
    }
}
