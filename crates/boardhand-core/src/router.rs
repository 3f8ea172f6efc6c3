//! Event router: one event in, one outcome or one error out.

use tracing::{debug, info, warn};

use crate::board::BoardClient;
use crate::config::Settings;
use crate::event::{Event, Trigger};
use crate::handlers::{self, HandlerContext};
use crate::types::{Outcome, Project};
use crate::{Error, Result};

/// Find the project with the given user-facing number.
///
/// Access failures while listing projects and a missing number are both
/// lookup errors.
pub async fn resolve_project(client: &dyn BoardClient, number: u64) -> Result<Project> {
    let projects = client.list_projects().await.map_err(|e| {
        if e.is_access_denied() {
            Error::Lookup(format!(
                "insufficient access privilege to fetch project data, check owner/repo ({})",
                e
            ))
        } else {
            e
        }
    })?;

    let project = projects
        .into_iter()
        .find(|p| p.number == number)
        .ok_or_else(|| {
            Error::Lookup(format!(
                "failed to fetch project data, no project number {}",
                number
            ))
        })?;

    debug!(number = project.number, id = project.id, "Resolved project");
    Ok(project)
}

/// Dispatches repository events to their transition handler.
pub struct Router<'a> {
    client: &'a dyn BoardClient,
    settings: &'a Settings,
}

impl<'a> Router<'a> {
    pub fn new(client: &'a dyn BoardClient, settings: &'a Settings) -> Self {
        Self { client, settings }
    }

    /// Handle one event.
    ///
    /// Unknown triggers fail before any board call. Recognised triggers
    /// resolve the project once and run exactly one handler.
    pub async fn dispatch(&self, event: &Event) -> Result<Outcome> {
        let trigger = Trigger::of(event)?;
        info!(trigger = %trigger, backend = self.client.name(), "Handling event");

        let project = resolve_project(self.client, self.settings.project).await?;
        let ctx = HandlerContext {
            client: self.client,
            settings: self.settings,
            project: &project,
        };

        let outcome = match trigger {
            Trigger::IssueOpened => handlers::issue_opened(ctx, &event.issue()?).await,
            Trigger::IssueLabeled => handlers::issue_labeled(ctx, &event.issue()?).await,
            Trigger::IssueClosed => handlers::issue_closed(ctx, &event.issue()?).await,
            Trigger::PullRequestOpened => {
                handlers::pull_request_opened(ctx, &event.pull_request()?).await
            }
            // Policies for these are not defined yet
            Trigger::PullRequestClosed | Trigger::ReleaseCreated => {
                warn!(trigger = %trigger, "Trigger recognised but not supported");
                Err(Error::Unsupported(trigger.to_string()))
            }
        }?;

        info!(trigger = %trigger, outcome = %outcome, "Event handled");
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::MockBoardClient;
    use crate::types::{Card, Column, ContentKind};
    use serde_json::json;

    fn settings() -> Settings {
        Settings {
            owner: "octo".to_string(),
            repo: "board".to_string(),
            project: 2,
            ..Default::default()
        }
    }

    fn projects() -> Vec<Project> {
        vec![
            Project {
                id: 100,
                number: 1,
                name: "Old".to_string(),
            },
            Project {
                id: 200,
                number: 2,
                name: "Current".to_string(),
            },
        ]
    }

    fn mock_client() -> MockBoardClient {
        let mut client = MockBoardClient::new();
        client.expect_name().return_const("mock");
        client
    }

    #[tokio::test]
    async fn test_resolve_project() {
        let mut client = mock_client();
        client.expect_list_projects().returning(|| Ok(projects()));

        let project = resolve_project(&client, 2).await.unwrap();
        assert_eq!(project.id, 200);

        let err = resolve_project(&client, 3).await.unwrap_err();
        assert!(matches!(err, Error::Lookup(_)));
    }

    #[tokio::test]
    async fn test_resolve_project_access_denied() {
        let mut client = mock_client();
        client
            .expect_list_projects()
            .returning(|| Err(Error::from_status(403, "Resource not accessible".into())));

        let err = resolve_project(&client, 2).await.unwrap_err();
        assert!(matches!(err, Error::Lookup(_)));
    }

    #[tokio::test]
    async fn test_resolve_project_passes_transport_errors() {
        let mut client = mock_client();
        client
            .expect_list_projects()
            .returning(|| Err(Error::Http("dns failure".into())));

        let err = resolve_project(&client, 2).await.unwrap_err();
        assert!(matches!(err, Error::Http(_)));
    }

    #[tokio::test]
    async fn test_unhandled_trigger_makes_no_calls() {
        let mut client = mock_client();
        client.expect_list_projects().never();

        let settings = settings();
        let router = Router::new(&client, &settings);
        let event = Event::new("deployment", json!({"action": "created"}));

        let err = router.dispatch(&event).await.unwrap_err();
        assert!(matches!(err, Error::UnhandledTrigger { ref kind, .. } if kind == "deployment"));
        assert_eq!(err.to_string(), "unhandled trigger: deployment");
    }

    #[tokio::test]
    async fn test_unsupported_triggers() {
        let settings = settings();

        for (name, action) in [("pull_request", "closed"), ("release", "created")] {
            let mut client = mock_client();
            client.expect_list_projects().returning(|| Ok(projects()));
            client.expect_list_columns().never();

            let router = Router::new(&client, &settings);
            let event = Event::new(name, json!({"action": action}));

            let err = router.dispatch(&event).await.unwrap_err();
            assert!(matches!(err, Error::Unsupported(_)), "{}:{}", name, action);
        }
    }

    #[tokio::test]
    async fn test_dispatch_pull_request_opened() {
        let mut client = mock_client();
        client.expect_list_projects().returning(|| Ok(projects()));
        client
            .expect_list_columns()
            .withf(|id| *id == 200)
            .returning(|_| {
                Ok(vec![Column {
                    id: 8,
                    name: "To do".to_string(),
                }])
            });
        client
            .expect_create_card()
            .withf(|column, content, kind| {
                *column == 8 && *content == 31 && *kind == ContentKind::PullRequest
            })
            .times(1)
            .returning(|_, _, _| {
                Ok(Card {
                    id: 4,
                    content_number: Some(3),
                })
            });

        let settings = settings();
        let router = Router::new(&client, &settings);
        let event = Event::new(
            "pull_request",
            json!({"action": "opened", "pull_request": {"id": 31, "number": 3}}),
        );

        let outcome = router.dispatch(&event).await.unwrap();
        assert_eq!(
            outcome,
            Outcome::CardCreated {
                card_id: 4,
                column_id: 8
            }
        );
    }

    #[tokio::test]
    async fn test_dispatch_missing_project() {
        let mut client = mock_client();
        client.expect_list_projects().returning(|| Ok(vec![]));
        client.expect_list_columns().never();

        let settings = settings();
        let router = Router::new(&client, &settings);
        let event = Event::new("issues", json!({"action": "opened", "issue": {"id": 1, "number": 1}}));

        let err = router.dispatch(&event).await.unwrap_err();
        assert!(matches!(err, Error::Lookup(_)));
    }
}
