//! Board display preference (grouping + ordering).
//!
//! # Responsibility
//! - Define the closed grouping/sorting key domains.
//! - Encode/decode the persisted `{grouping, sorting}` JSON value.
//!
//! # Invariants
//! - Decoding never yields a value outside the enumerated domains.
//! - Wire names are stable: grouping `status|user|priority`,
//!   sorting `priority|title`. `actor` is accepted as an alias of `user`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Fixed storage key the preference is persisted under.
pub const PREFERENCE_STORAGE_KEY: &str = "kanbanState";

/// How items are bucketed into columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKey {
    #[default]
    Status,
    /// Groups by the owning actor's display name.
    #[serde(rename = "user", alias = "actor")]
    Actor,
    Priority,
}

impl GroupKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::Actor => "user",
            Self::Priority => "priority",
        }
    }
}

/// How items are ordered inside one column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Priority,
    Title,
}

impl SortKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Priority => "priority",
            Self::Title => "title",
        }
    }
}

impl Display for GroupKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Display for SortKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GroupKey {
    type Err = ParseKeyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "status" => Ok(Self::Status),
            "user" | "actor" => Ok(Self::Actor),
            "priority" => Ok(Self::Priority),
            other => Err(ParseKeyError {
                kind: "grouping",
                expected: "status|user|priority",
                value: other.to_string(),
            }),
        }
    }
}

impl FromStr for SortKey {
    type Err = ParseKeyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "priority" => Ok(Self::Priority),
            "title" => Ok(Self::Title),
            other => Err(ParseKeyError {
                kind: "sorting",
                expected: "priority|title",
                value: other.to_string(),
            }),
        }
    }
}

/// Unknown grouping/sorting key string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseKeyError {
    kind: &'static str,
    expected: &'static str,
    value: String,
}

impl Display for ParseKeyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unsupported {} `{}`; expected {}",
            self.kind, self.value, self.expected
        )
    }
}

impl Error for ParseKeyError {}

/// Persisted (grouping, sorting) pair.
///
/// Defaults to `status` / `priority`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preference {
    #[serde(rename = "grouping")]
    pub group_key: GroupKey,
    #[serde(rename = "sorting")]
    pub sort_key: SortKey,
}

impl Preference {
    pub fn new(group_key: GroupKey, sort_key: SortKey) -> Self {
        Self {
            group_key,
            sort_key,
        }
    }

    /// Decodes a stored preference value.
    ///
    /// # Errors
    /// - `InvalidPreference` when `raw` is not JSON, misses a field, or names a
    ///   key outside the enumerated domains.
    pub fn decode(raw: &str) -> Result<Self, InvalidPreference> {
        serde_json::from_str::<Self>(raw).map_err(|err| InvalidPreference(err.to_string()))
    }

    /// Encodes into the stored JSON shape.
    pub fn encode(&self) -> String {
        serde_json::json!({
            "grouping": self.group_key.as_str(),
            "sorting": self.sort_key.as_str(),
        })
        .to_string()
    }
}

/// Stored preference value that cannot be decoded into the key domains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidPreference(pub String);

impl Display for InvalidPreference {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid stored preference: {}", self.0)
    }
}

impl Error for InvalidPreference {}
