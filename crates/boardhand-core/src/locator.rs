//! Locating existing cards on a board.

use tracing::debug;

use crate::board::BoardClient;
use crate::types::{CardLocation, Column};
use crate::{Error, Result};

/// Find the card for an issue anywhere on the board.
///
/// Columns are scanned in order, fetching each column's cards with its own
/// request, and the first card linked to `issue_number` is returned. An issue
/// should have at most one card; if the board holds duplicates only the first
/// in column order is seen. The scan costs O(columns x cards) requests and
/// comparisons, which is fine for a single project board.
///
/// Fails with [`Error::BoardSetup`] when the board has no columns.
pub async fn find_card(
    client: &dyn BoardClient,
    issue_number: u64,
    columns: &[Column],
) -> Result<Option<CardLocation>> {
    if columns.is_empty() {
        return Err(Error::BoardSetup(
            "project has no columns configured".to_string(),
        ));
    }

    for column in columns {
        if let Some(location) = find_card_in_column(client, issue_number, column).await? {
            return Ok(Some(location));
        }
    }

    debug!(issue = issue_number, "No card found on the board");
    Ok(None)
}

/// Find the card for an issue within a single column.
pub async fn find_card_in_column(
    client: &dyn BoardClient,
    issue_number: u64,
    column: &Column,
) -> Result<Option<CardLocation>> {
    debug!(issue = issue_number, column = %column.name, "Scanning column for card");

    let cards = client.list_cards(column.id).await?;
    let location = cards
        .into_iter()
        .find(|card| card.content_number == Some(issue_number))
        .map(|card| CardLocation {
            card_id: card.id,
            column_id: column.id,
            column_name: column.name.clone(),
        });

    Ok(location)
}

/// Find a column by its exact name.
pub fn find_column_by_name<'a>(columns: &'a [Column], name: &str) -> Option<&'a Column> {
    columns.iter().find(|column| column.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::MockBoardClient;
    use crate::types::Card;
    use mockall::predicate::eq;

    fn columns() -> Vec<Column> {
        vec![
            Column {
                id: 10,
                name: "Backlog".to_string(),
            },
            Column {
                id: 20,
                name: "In Progress".to_string(),
            },
            Column {
                id: 30,
                name: "Done".to_string(),
            },
        ]
    }

    fn card(id: u64, number: Option<u64>) -> Card {
        Card {
            id,
            content_number: number,
        }
    }

    #[tokio::test]
    async fn test_find_card_stops_at_first_match() {
        let mut client = MockBoardClient::new();
        client
            .expect_list_cards()
            .with(eq(10))
            .times(1)
            .returning(|_| Ok(vec![card(1, Some(5)), card(2, None)]));
        client
            .expect_list_cards()
            .with(eq(20))
            .times(1)
            .returning(|_| Ok(vec![card(3, Some(42)), card(4, Some(7))]));
        // Column 30 is never listed
        client.expect_list_cards().with(eq(30)).never();

        let location = find_card(&client, 42, &columns()).await.unwrap();
        assert_eq!(
            location,
            Some(CardLocation {
                card_id: 3,
                column_id: 20,
                column_name: "In Progress".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_find_card_duplicates_first_in_column_order() {
        let mut client = MockBoardClient::new();
        client
            .expect_list_cards()
            .with(eq(10))
            .returning(|_| Ok(vec![card(11, Some(42))]));
        client
            .expect_list_cards()
            .returning(|_| Ok(vec![card(99, Some(42))]));

        let location = find_card(&client, 42, &columns()).await.unwrap().unwrap();
        assert_eq!(location.card_id, 11);
        assert_eq!(location.column_id, 10);
    }

    #[tokio::test]
    async fn test_find_card_not_found() {
        let mut client = MockBoardClient::new();
        client
            .expect_list_cards()
            .times(3)
            .returning(|_| Ok(vec![card(1, Some(1)), card(2, None)]));

        assert_eq!(find_card(&client, 42, &columns()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_find_card_no_columns() {
        let client = MockBoardClient::new();
        let err = find_card(&client, 42, &[]).await.unwrap_err();
        assert!(matches!(err, Error::BoardSetup(_)));
    }

    #[tokio::test]
    async fn test_find_card_propagates_errors() {
        let mut client = MockBoardClient::new();
        client
            .expect_list_cards()
            .returning(|_| Err(Error::Http("connection reset".to_string())));

        let err = find_card(&client, 42, &columns()).await.unwrap_err();
        assert!(matches!(err, Error::Http(_)));
    }

    #[test]
    fn test_find_column_by_name() {
        let columns = columns();
        assert_eq!(find_column_by_name(&columns, "Done").map(|c| c.id), Some(30));
        assert!(find_column_by_name(&columns, "done").is_none());
    }
}
