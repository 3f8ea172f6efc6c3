//! Board access trait for project hosting services.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Card, CardPosition, Column, ContentKind, Project};

/// Trait for project board backends (GitHub classic projects, test fakes).
///
/// The routing logic only relies on these primitives. Every call is awaited
/// sequentially and all board state is re-read on each invocation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BoardClient: Send + Sync {
    /// Get the backend name (e.g., "github")
    fn name(&self) -> &'static str;

    /// List the projects of the configured repository.
    async fn list_projects(&self) -> Result<Vec<Project>>;

    /// List the columns of a project, in board order.
    async fn list_columns(&self, project_id: u64) -> Result<Vec<Column>>;

    /// List the cards of a single column.
    async fn list_cards(&self, column_id: u64) -> Result<Vec<Card>>;

    /// Create a card in a column for an issue or pull request.
    async fn create_card(&self, column_id: u64, content_id: u64, kind: ContentKind)
        -> Result<Card>;

    /// Move a card to a column and position.
    async fn move_card(&self, card_id: u64, column_id: u64, position: CardPosition) -> Result<()>;

    /// Archive a card.
    async fn archive_card(&self, card_id: u64) -> Result<()>;

    /// Attach labels to an issue or pull request (content level, not board level).
    async fn add_labels(&self, issue_number: u64, labels: &[String]) -> Result<()>;
}
