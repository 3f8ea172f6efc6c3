//! Common test utilities.
//!
//! `FakeBoard` is an in-memory project board implementing `BoardClient`.
//! It keeps columns and cards in order and records every mutation so
//! scenario tests can assert on both the final board and the calls made.

use std::sync::Mutex;

use async_trait::async_trait;
use boardhand_core::{
    BoardClient, Card, CardPosition, Column, ContentKind, Error, Project, Result,
};

/// A mutation applied to the fake board.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Create {
        column_id: u64,
        content_id: u64,
        kind: ContentKind,
    },
    Move {
        card_id: u64,
        column_id: u64,
        position: CardPosition,
    },
    Archive {
        card_id: u64,
    },
    AddLabels {
        issue_number: u64,
        labels: Vec<String>,
    },
}

#[derive(Debug, Default)]
struct State {
    columns: Vec<(Column, Vec<Card>)>,
    archived: Vec<Card>,
    calls: Vec<Call>,
    next_card_id: u64,
}

/// In-memory board with a single project.
#[derive(Debug)]
pub struct FakeBoard {
    project: Project,
    state: Mutex<State>,
}

impl FakeBoard {
    /// Create a board for project number 1 with the given column names.
    pub fn new(column_names: &[&str]) -> Self {
        let columns = column_names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                (
                    Column {
                        id: i as u64 + 1,
                        name: name.to_string(),
                    },
                    Vec::new(),
                )
            })
            .collect();

        Self {
            project: Project {
                id: 500,
                number: 1,
                name: "Board".to_string(),
            },
            state: Mutex::new(State {
                columns,
                next_card_id: 1000,
                ..Default::default()
            }),
        }
    }

    /// Place a card for `issue_number` at the bottom of `column_id`.
    pub fn with_card(self, column_id: u64, card_id: u64, issue_number: u64) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            let (_, cards) = state
                .columns
                .iter_mut()
                .find(|(c, _)| c.id == column_id)
                .expect("unknown column");
            cards.push(Card {
                id: card_id,
                content_number: Some(issue_number),
            });
        }
        self
    }

    /// Card ids of a column, top first.
    pub fn cards_in(&self, column_id: u64) -> Vec<u64> {
        let state = self.state.lock().unwrap();
        state
            .columns
            .iter()
            .find(|(c, _)| c.id == column_id)
            .map(|(_, cards)| cards.iter().map(|card| card.id).collect())
            .unwrap_or_default()
    }

    pub fn archived(&self) -> Vec<u64> {
        self.state
            .lock()
            .unwrap()
            .archived
            .iter()
            .map(|c| c.id)
            .collect()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    fn take_card(state: &mut State, card_id: u64) -> Option<Card> {
        for (_, cards) in state.columns.iter_mut() {
            if let Some(pos) = cards.iter().position(|c| c.id == card_id) {
                return Some(cards.remove(pos));
            }
        }
        None
    }
}

#[async_trait]
impl BoardClient for FakeBoard {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn list_projects(&self) -> Result<Vec<Project>> {
        Ok(vec![self.project.clone()])
    }

    async fn list_columns(&self, project_id: u64) -> Result<Vec<Column>> {
        if project_id != self.project.id {
            return Err(Error::NotFound(format!("project {}", project_id)));
        }
        let state = self.state.lock().unwrap();
        Ok(state.columns.iter().map(|(c, _)| c.clone()).collect())
    }

    async fn list_cards(&self, column_id: u64) -> Result<Vec<Card>> {
        let state = self.state.lock().unwrap();
        state
            .columns
            .iter()
            .find(|(c, _)| c.id == column_id)
            .map(|(_, cards)| cards.clone())
            .ok_or_else(|| Error::NotFound(format!("column {}", column_id)))
    }

    async fn create_card(
        &self,
        column_id: u64,
        content_id: u64,
        kind: ContentKind,
    ) -> Result<Card> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Create {
            column_id,
            content_id,
            kind,
        });
        state.next_card_id += 1;
        // Content ids in these tests are 1000 + number
        let card = Card {
            id: state.next_card_id,
            content_number: Some(content_id - 1000),
        };
        let (_, cards) = state
            .columns
            .iter_mut()
            .find(|(c, _)| c.id == column_id)
            .ok_or_else(|| Error::NotFound(format!("column {}", column_id)))?;
        // New cards land at the bottom
        cards.push(card.clone());
        Ok(card)
    }

    async fn move_card(&self, card_id: u64, column_id: u64, position: CardPosition) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Move {
            card_id,
            column_id,
            position,
        });
        let card = Self::take_card(&mut state, card_id)
            .ok_or_else(|| Error::NotFound(format!("card {}", card_id)))?;
        let (_, cards) = state
            .columns
            .iter_mut()
            .find(|(c, _)| c.id == column_id)
            .ok_or_else(|| Error::NotFound(format!("column {}", column_id)))?;
        match position {
            CardPosition::Top => cards.insert(0, card),
            CardPosition::Bottom => cards.push(card),
            CardPosition::After(other) => {
                let at = cards
                    .iter()
                    .position(|c| c.id == other)
                    .map(|i| i + 1)
                    .unwrap_or(cards.len());
                cards.insert(at, card);
            }
        }
        Ok(())
    }

    async fn archive_card(&self, card_id: u64) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Archive { card_id });
        let card = Self::take_card(&mut state, card_id)
            .ok_or_else(|| Error::NotFound(format!("card {}", card_id)))?;
        state.archived.push(card);
        Ok(())
    }

    async fn add_labels(&self, issue_number: u64, labels: &[String]) -> Result<()> {
        self.state.lock().unwrap().calls.push(Call::AddLabels {
            issue_number,
            labels: labels.to_vec(),
        });
        Ok(())
    }
}
