//! Board model shared between the routing logic and board clients.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A repository project board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Internal id, used for all API calls
    pub id: u64,
    /// Human-assigned sequential number within the repository
    pub number: u64,
    #[serde(default)]
    pub name: String,
}

/// A named, ordered bucket on a board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub id: u64,
    pub name: String,
}

/// Board-level representation of one issue or pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: u64,
    /// Number of the linked issue/PR; `None` for note-only cards
    #[serde(default)]
    pub content_number: Option<u64>,
}

/// Kind of content item a card links to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentKind {
    Issue,
    PullRequest,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Issue => "Issue",
            ContentKind::PullRequest => "PullRequest",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a moved card lands within its column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardPosition {
    Top,
    Bottom,
    /// Directly below the given card
    After(u64),
}

impl fmt::Display for CardPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardPosition::Top => f.write_str("top"),
            CardPosition::Bottom => f.write_str("bottom"),
            CardPosition::After(id) => write!(f, "after:{}", id),
        }
    }
}

/// Where an existing card was found on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardLocation {
    pub card_id: u64,
    pub column_id: u64,
    pub column_name: String,
}

/// Why a handler left the board untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// No label maps to an existing column
    NoMappedColumn,
    /// The issue has no card on the board (or in the searched column)
    CardNotFound,
    /// The card already sits in the target column
    AlreadyInColumn,
    /// The card sits in a column excluded from automatic moves
    IgnoredColumn,
    /// A configured column name does not exist on the board
    ColumnNotFound,
    /// Neither `remove_on_close` nor `label_on_close` is configured
    NothingConfigured,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SkipReason::NoMappedColumn => "no label maps to a board column",
            SkipReason::CardNotFound => "no card found for the issue",
            SkipReason::AlreadyInColumn => "card already in target column",
            SkipReason::IgnoredColumn => "card is in an ignored column",
            SkipReason::ColumnNotFound => "configured column does not exist",
            SkipReason::NothingConfigured => "nothing configured for this event",
        };
        f.write_str(text)
    }
}

/// Successful result of handling one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    CardCreated { card_id: u64, column_id: u64 },
    CardMoved { card_id: u64, column_id: u64 },
    CardArchived { card_id: u64 },
    Labeled { label: String },
    Skipped { reason: SkipReason },
}

impl Outcome {
    pub fn skipped(reason: SkipReason) -> Self {
        Outcome::Skipped { reason }
    }

    /// Whether the board or issue was changed.
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Outcome::Skipped { .. })
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::CardCreated { card_id, column_id } => {
                write!(f, "created card {} in column {}", card_id, column_id)
            }
            Outcome::CardMoved { card_id, column_id } => {
                write!(f, "moved card {} to column {}", card_id, column_id)
            }
            Outcome::CardArchived { card_id } => write!(f, "archived card {}", card_id),
            Outcome::Labeled { label } => write!(f, "added label '{}'", label),
            Outcome::Skipped { reason } => write!(f, "skipped: {}", reason),
        }
    }
}
