//! Repository event descriptor and trigger classification.
//!
//! The event is passed explicitly into the router instead of being read from
//! process-wide state, so the same payload always produces the same dispatch.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::{Error, Result};

/// A single repository event delivered to one invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Event kind, e.g. `issues`, `pull_request`, `release`
    pub name: String,
    /// Activity type, e.g. `opened`, `labeled`
    #[serde(default)]
    pub action: Option<String>,
    /// Raw webhook payload
    #[serde(default)]
    pub payload: Value,
}

/// The issue or pull request an event refers to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentItem {
    pub id: Option<u64>,
    pub number: Option<u64>,
    /// Label names in payload order
    pub labels: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawContent {
    #[serde(default)]
    id: Option<u64>,
    #[serde(default)]
    number: Option<u64>,
    #[serde(default)]
    labels: Vec<RawLabel>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawLabel {
    Named { name: String },
    Plain(String),
}

impl RawLabel {
    fn into_name(self) -> String {
        match self {
            RawLabel::Named { name } | RawLabel::Plain(name) => name,
        }
    }
}

impl Event {
    /// Create an event; the action is taken from `payload.action`.
    pub fn new(name: impl Into<String>, payload: Value) -> Self {
        let action = payload
            .get("action")
            .and_then(Value::as_str)
            .map(String::from);
        Self {
            name: name.into(),
            action,
            payload,
        }
    }

    /// Create an event with an explicit action.
    pub fn with_action(name: impl Into<String>, action: impl Into<String>, payload: Value) -> Self {
        Self {
            name: name.into(),
            action: Some(action.into()),
            payload,
        }
    }

    /// Load a webhook payload from a JSON file.
    pub fn from_json_file(name: impl Into<String>, path: &Path) -> Result<Self> {
        debug!(path = ?path, "Loading event payload");

        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::InvalidContext(format!(
                "Failed to read event payload {}: {}",
                path.display(),
                e
            ))
        })?;
        let payload: Value = serde_json::from_str(&contents)?;

        Ok(Self::new(name, payload))
    }

    /// The `issue` object of the payload.
    pub fn issue(&self) -> Result<ContentItem> {
        self.content("issue")
    }

    /// The `pull_request` object of the payload.
    pub fn pull_request(&self) -> Result<ContentItem> {
        self.content("pull_request")
    }

    fn content(&self, field: &str) -> Result<ContentItem> {
        let Some(value) = self.payload.get(field) else {
            return Ok(ContentItem::default());
        };

        let raw: RawContent = serde_json::from_value(value.clone())
            .map_err(|e| Error::InvalidContext(format!("Malformed {} payload: {}", field, e)))?;

        Ok(ContentItem {
            id: raw.id,
            number: raw.number,
            labels: raw.labels.into_iter().map(RawLabel::into_name).collect(),
        })
    }
}

/// Recognised (event kind, action) combinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    IssueOpened,
    IssueLabeled,
    IssueClosed,
    PullRequestOpened,
    PullRequestClosed,
    ReleaseCreated,
}

impl Trigger {
    /// Classify an event; unknown kinds or actions are an `UnhandledTrigger`.
    pub fn classify(kind: &str, action: Option<&str>) -> Result<Self> {
        match (kind, action) {
            ("issues", Some("opened")) => Ok(Trigger::IssueOpened),
            ("issues", Some("labeled")) => Ok(Trigger::IssueLabeled),
            ("issues", Some("closed")) => Ok(Trigger::IssueClosed),
            ("pull_request", Some("opened")) => Ok(Trigger::PullRequestOpened),
            ("pull_request", Some("closed")) => Ok(Trigger::PullRequestClosed),
            ("release", Some("created")) => Ok(Trigger::ReleaseCreated),
            _ => Err(Error::UnhandledTrigger {
                kind: kind.to_string(),
                action: action.map(String::from),
            }),
        }
    }

    /// Classify a whole event.
    pub fn of(event: &Event) -> Result<Self> {
        Self::classify(&event.name, event.action.as_deref())
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Trigger::IssueOpened => "issues:opened",
            Trigger::IssueLabeled => "issues:labeled",
            Trigger::IssueClosed => "issues:closed",
            Trigger::PullRequestOpened => "pull_request:opened",
            Trigger::PullRequestClosed => "pull_request:closed",
            Trigger::ReleaseCreated => "release:created",
        };
        f.write_str(text)
    }
}
