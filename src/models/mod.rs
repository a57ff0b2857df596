use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

mod item;

pub use item::{Item, ItemAuthor};

/// Opaque identifier of a user. Never blank; kept byte-for-byte otherwise.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

/// Opaque identifier of a content item. Never blank; kept byte-for-byte otherwise.
///
/// Ordering is plain lexicographic on the identifier and is what the ranker
/// uses to break ties between equally popular items.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemId(String);

/// Rejection for an empty or whitespace-only identifier
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("identifier must not be blank")]
pub struct BlankId;

macro_rules! opaque_id {
    ($name:ident) => {
        impl $name {
            /// Builds an identifier, rejecting empty or whitespace-only input
            ///
            /// Non-blank input is kept as given, surrounding whitespace included.
            pub fn parse(raw: impl AsRef<str>) -> Option<Self> {
                Self::try_from(raw.as_ref().to_string()).ok()
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = BlankId;

            fn try_from(raw: String) -> Result<Self, Self::Error> {
                if raw.trim().is_empty() {
                    Err(BlankId)
                } else {
                    Ok(Self(raw))
                }
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

opaque_id!(UserId);
opaque_id!(ItemId);

/// A recorded fact that a user engaged with an item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interaction {
    pub user_id: UserId,
    pub item_id: ItemId,
    /// Audit only; ranking never looks at it
    pub recorded_at: DateTime<Utc>,
}

impl Interaction {
    pub fn new(user_id: UserId, item_id: ItemId) -> Self {
        Self {
            user_id,
            item_id,
            recorded_at: Utc::now(),
        }
    }
}

/// Result of reporting an interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordOutcome {
    /// First report of the pair; a new fact was stored
    Recorded,
    /// The pair already existed; nothing changed
    AlreadyRecorded,
    /// A user or item id was missing
    Ignored,
}

impl RecordOutcome {
    pub fn is_new(&self) -> bool {
        matches!(self, RecordOutcome::Recorded)
    }
}
