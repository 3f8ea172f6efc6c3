//! GitHub API response and request types.
//!
//! These types represent the raw JSON of the projects and issues endpoints.
//! They are deserialized and then mapped to the board model.

use serde::{Deserialize, Serialize};

// =============================================================================
// Projects
// =============================================================================

/// GitHub repository project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubProject {
    pub id: u64,
    pub number: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
}

/// GitHub project column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubColumn {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub cards_url: Option<String>,
}

/// GitHub project card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubCard {
    pub id: u64,
    /// Free-text note; set for note cards, null for issue/PR cards
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub archived: bool,
    /// API URL of the linked issue or pull request, e.g.
    /// `https://api.github.com/repos/octo/board/issues/42`
    #[serde(default)]
    pub content_url: Option<String>,
    #[serde(default)]
    pub column_url: Option<String>,
}

impl GitHubCard {
    /// Issue/PR number taken from the last segment of the content URL.
    pub fn content_number(&self) -> Option<u64> {
        self.content_url
            .as_deref()?
            .trim_end_matches('/')
            .rsplit('/')
            .next()?
            .parse()
            .ok()
    }
}

// =============================================================================
// Request bodies
// =============================================================================

/// Request body for creating a card linked to an issue or pull request.
#[derive(Debug, Clone, Serialize)]
pub struct CreateCardRequest {
    pub content_id: u64,
    /// `Issue` or `PullRequest`
    pub content_type: String,
}

/// Request body for moving a card.
#[derive(Debug, Clone, Serialize)]
pub struct MoveCardRequest {
    /// `top`, `bottom` or `after:<card_id>`
    pub position: String,
    pub column_id: u64,
}

/// Request body for updating a card.
#[derive(Debug, Clone, Serialize, Default)]
pub struct UpdateCardRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,
}

/// Request body for adding labels to an issue.
#[derive(Debug, Clone, Serialize)]
pub struct AddLabelsRequest {
    pub labels: Vec<String>,
}
