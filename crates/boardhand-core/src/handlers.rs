//! Transition handlers, one per recognised trigger.
//!
//! Handlers are stateless: every call re-reads the board through the client
//! and applies at most one mutation. Conditions that leave nothing to do are
//! returned as [`Outcome::Skipped`], never as errors.

use tracing::{debug, info, warn};

use crate::board::BoardClient;
use crate::config::Settings;
use crate::event::ContentItem;
use crate::locator::{find_card, find_card_in_column, find_column_by_name};
use crate::resolver::resolve_column;
use crate::types::{CardPosition, Column, ContentKind, Outcome, Project, SkipReason};
use crate::{Error, Result};

/// What every handler works against.
#[derive(Clone, Copy)]
pub struct HandlerContext<'a> {
    pub client: &'a dyn BoardClient,
    pub settings: &'a Settings,
    pub project: &'a Project,
}

impl HandlerContext<'_> {
    async fn columns(&self) -> Result<Vec<Column>> {
        let columns = self.client.list_columns(self.project.id).await?;
        debug!(project = self.project.number, count = columns.len(), "Fetched columns");
        Ok(columns)
    }
}

fn require(value: Option<u64>, what: &str) -> Result<u64> {
    value.ok_or_else(|| Error::InvalidContext(format!("event payload has no {}", what)))
}

/// New issue: create its card in the label-mapped (or first) column and
/// put it at the top.
pub async fn issue_opened(ctx: HandlerContext<'_>, issue: &ContentItem) -> Result<Outcome> {
    let issue_id = require(issue.id, "issue id")?;
    let number = require(issue.number, "issue number")?;

    let columns = ctx.columns().await?;
    let column_id = resolve_column(
        &issue.labels,
        &ctx.settings.column_by_label,
        &columns,
        true,
        ctx.settings.label_precedence,
    )?
    .ok_or_else(|| Error::BoardSetup("no default column resolvable".to_string()))?;
    let column = columns
        .iter()
        .find(|c| c.id == column_id)
        .ok_or_else(|| Error::BoardSetup(format!("column {} vanished", column_id)))?;

    let created = ctx
        .client
        .create_card(column.id, issue_id, ContentKind::Issue)
        .await?;
    info!(issue = number, card = created.id, column = %column.name, "Created card");

    let card_id = match find_card_in_column(ctx.client, number, column).await? {
        Some(location) => location.card_id,
        None => {
            debug!(issue = number, "New card not listed yet, using id from create");
            created.id
        }
    };

    ctx.client
        .move_card(card_id, column.id, CardPosition::Top)
        .await?;

    Ok(Outcome::CardCreated {
        card_id,
        column_id: column.id,
    })
}

/// Label added: move the issue's card to the label-mapped column.
///
/// Labeled events can fire before the card from `opened` exists, so a
/// missing mapping or card is a skip. Cards are never moved out of, or
/// into, a column on the ignore list.
pub async fn issue_labeled(ctx: HandlerContext<'_>, issue: &ContentItem) -> Result<Outcome> {
    require(issue.id, "issue id")?;
    let number = require(issue.number, "issue number")?;

    let columns = ctx.columns().await?;
    let Some(target_id) = resolve_column(
        &issue.labels,
        &ctx.settings.column_by_label,
        &columns,
        false,
        ctx.settings.label_precedence,
    )?
    else {
        info!(issue = number, "No label maps to a column, nothing to do");
        return Ok(Outcome::skipped(SkipReason::NoMappedColumn));
    };

    let Some(current) = find_card(ctx.client, number, &columns).await? else {
        info!(issue = number, "Issue has no card yet, nothing to move");
        return Ok(Outcome::skipped(SkipReason::CardNotFound));
    };

    if current.column_id == target_id {
        info!(issue = number, column = %current.column_name, "Card already in target column");
        return Ok(Outcome::skipped(SkipReason::AlreadyInColumn));
    }

    if ctx.settings.is_ignored_column(&current.column_name) {
        info!(issue = number, column = %current.column_name, "Card is in an ignored column");
        return Ok(Outcome::skipped(SkipReason::IgnoredColumn));
    }

    // Ignored columns are never auto-filled either
    if let Some(target) = columns.iter().find(|c| c.id == target_id) {
        if ctx.settings.is_ignored_column(&target.name) {
            info!(issue = number, column = %target.name, "Target column is ignored");
            return Ok(Outcome::skipped(SkipReason::IgnoredColumn));
        }
    }

    ctx.client
        .move_card(current.card_id, target_id, CardPosition::Top)
        .await?;
    info!(
        issue = number,
        card = current.card_id,
        from = %current.column_name,
        to = target_id,
        "Moved card"
    );

    Ok(Outcome::CardMoved {
        card_id: current.card_id,
        column_id: target_id,
    })
}

/// Issue closed: archive its card from the `remove_on_close` column, or
/// else add the `label_on_close` label.
pub async fn issue_closed(ctx: HandlerContext<'_>, issue: &ContentItem) -> Result<Outcome> {
    let number = require(issue.number, "issue number")?;

    if let Some(column_name) = &ctx.settings.remove_on_close {
        let columns = ctx.columns().await?;
        let Some(column) = find_column_by_name(&columns, column_name) else {
            warn!(column = %column_name, "Remove-on-close column does not exist on the board");
            return Ok(Outcome::skipped(SkipReason::ColumnNotFound));
        };

        let Some(location) = find_card_in_column(ctx.client, number, column).await? else {
            info!(issue = number, column = %column.name, "No card to archive");
            return Ok(Outcome::skipped(SkipReason::CardNotFound));
        };

        ctx.client.archive_card(location.card_id).await?;
        info!(issue = number, card = location.card_id, "Archived card");
        return Ok(Outcome::CardArchived {
            card_id: location.card_id,
        });
    }

    if let Some(label) = &ctx.settings.label_on_close {
        ctx.client
            .add_labels(number, std::slice::from_ref(label))
            .await?;
        info!(issue = number, label = %label, "Labeled closed issue");
        return Ok(Outcome::Labeled {
            label: label.clone(),
        });
    }

    info!(issue = number, "Nothing configured for closed issues");
    Ok(Outcome::skipped(SkipReason::NothingConfigured))
}

/// New pull request: create its card in the first column.
pub async fn pull_request_opened(
    ctx: HandlerContext<'_>,
    pull_request: &ContentItem,
) -> Result<Outcome> {
    let pr_id = require(pull_request.id, "pull request id")?;

    let columns = ctx.columns().await?;
    let first = columns
        .first()
        .ok_or_else(|| Error::BoardSetup("project has no columns configured".to_string()))?;

    let card = ctx
        .client
        .create_card(first.id, pr_id, ContentKind::PullRequest)
        .await?;
    info!(card = card.id, column = %first.name, "Created pull request card");

    Ok(Outcome::CardCreated {
        card_id: card.id,
        column_id: first.id,
    })
}
