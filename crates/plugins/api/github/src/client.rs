//! GitHub API client implementation.

use async_trait::async_trait;
use boardhand_core::{
    BoardClient, Card, CardPosition, Column, ContentKind, Error, Project, Result,
};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::types::{
    AddLabelsRequest, CreateCardRequest, GitHubCard, GitHubColumn, GitHubProject,
    MoveCardRequest, UpdateCardRequest,
};
use crate::DEFAULT_GITHUB_URL;

/// Page size for list endpoints (GitHub maximum).
const PER_PAGE: usize = 100;

/// Projects REST endpoints still require the preview media type.
const ACCEPT: &str = "application/vnd.github.inertia-preview+json";

/// GitHub API client.
pub struct GitHubBoardClient {
    base_url: String,
    owner: String,
    repo: String,
    token: String,
    client: reqwest::Client,
}

impl GitHubBoardClient {
    /// Create a new GitHub client.
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self::with_base_url(DEFAULT_GITHUB_URL, owner, repo, token)
    }

    /// Create a new GitHub client with a custom base URL.
    pub fn with_base_url(
        base_url: impl Into<String>,
        owner: impl Into<String>,
        repo: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            owner: owner.into(),
            repo: repo.into(),
            token: token.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Build request with common headers.
    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", ACCEPT)
            .header("X-GitHub-Api-Version", "2022-11-28")
            .header("User-Agent", "boardhand")
    }

    /// Get the repository API URL for a given endpoint.
    fn repo_url(&self, endpoint: &str) -> String {
        format!(
            "{}/repos/{}/{}{}",
            self.base_url, self.owner, self.repo, endpoint
        )
    }

    /// Get the API URL for a given endpoint (non-repository-scoped).
    fn api_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Make an authenticated GET request with typed deserialization.
    async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!(url = url, "GitHub GET request");

        let response = self
            .request(reqwest::Method::GET, url)
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        self.handle_response(response).await
    }

    /// GET every page of a list endpoint.
    async fn get_all<T: DeserializeOwned>(&self, url: &str) -> Result<Vec<T>> {
        let separator = if url.contains('?') { '&' } else { '?' };
        let mut items = Vec::new();
        let mut page = 1;

        loop {
            let page_url = format!("{}{}per_page={}&page={}", url, separator, PER_PAGE, page);
            let batch: Vec<T> = self.get(&page_url).await?;
            let done = batch.len() < PER_PAGE;
            items.extend(batch);
            if done {
                return Ok(items);
            }
            page += 1;
        }
    }

    /// Make an authenticated request with a JSON body.
    async fn send<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        method: reqwest::Method,
        url: &str,
        body: &B,
    ) -> Result<T> {
        debug!(url = url, method = %method, "GitHub request");

        let response = self
            .request(method, url)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        self.handle_response(response).await
    }

    /// Handle response and map errors.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let status_code = status.as_u16();
            let message = response.text().await.unwrap_or_default();
            warn!(
                status = status_code,
                message = message,
                "GitHub API error response"
            );
            return Err(Error::from_status(status_code, message));
        }

        response
            .json()
            .await
            .map_err(|e| Error::InvalidData(format!("Failed to parse response: {}", e)))
    }
}

// =============================================================================
// Mapping functions: GitHub types -> board model
// =============================================================================

fn map_project(gh_project: GitHubProject) -> Project {
    Project {
        id: gh_project.id,
        number: gh_project.number,
        name: gh_project.name,
    }
}

fn map_column(gh_column: GitHubColumn) -> Column {
    Column {
        id: gh_column.id,
        name: gh_column.name,
    }
}

fn map_card(gh_card: &GitHubCard) -> Card {
    Card {
        id: gh_card.id,
        content_number: gh_card.content_number(),
    }
}

#[async_trait]
impl BoardClient for GitHubBoardClient {
    fn name(&self) -> &'static str {
        "github"
    }

    async fn list_projects(&self) -> Result<Vec<Project>> {
        let projects: Vec<GitHubProject> = self
            .get_all(&self.repo_url("/projects?state=open"))
            .await?;
        Ok(projects.into_iter().map(map_project).collect())
    }

    async fn list_columns(&self, project_id: u64) -> Result<Vec<Column>> {
        let url = self.api_url(&format!("/projects/{}/columns", project_id));
        let columns: Vec<GitHubColumn> = self.get_all(&url).await?;
        Ok(columns.into_iter().map(map_column).collect())
    }

    async fn list_cards(&self, column_id: u64) -> Result<Vec<Card>> {
        let url = self.api_url(&format!("/projects/columns/{}/cards", column_id));
        let cards: Vec<GitHubCard> = self.get_all(&url).await?;
        Ok(cards.iter().map(map_card).collect())
    }

    async fn create_card(
        &self,
        column_id: u64,
        content_id: u64,
        kind: ContentKind,
    ) -> Result<Card> {
        let url = self.api_url(&format!("/projects/columns/{}/cards", column_id));
        let body = CreateCardRequest {
            content_id,
            content_type: kind.as_str().to_string(),
        };
        let card: GitHubCard = self.send(reqwest::Method::POST, &url, &body).await?;
        Ok(map_card(&card))
    }

    async fn move_card(&self, card_id: u64, column_id: u64, position: CardPosition) -> Result<()> {
        let url = self.api_url(&format!("/projects/columns/cards/{}/moves", card_id));
        let body = MoveCardRequest {
            position: position.to_string(),
            column_id,
        };
        let _: serde_json::Value = self.send(reqwest::Method::POST, &url, &body).await?;
        Ok(())
    }

    async fn archive_card(&self, card_id: u64) -> Result<()> {
        let url = self.api_url(&format!("/projects/columns/cards/{}", card_id));
        let body = UpdateCardRequest {
            archived: Some(true),
            ..Default::default()
        };
        let _: GitHubCard = self.send(reqwest::Method::PATCH, &url, &body).await?;
        Ok(())
    }

    async fn add_labels(&self, issue_number: u64, labels: &[String]) -> Result<()> {
        let url = self.repo_url(&format!("/issues/{}/labels", issue_number));
        let body = AddLabelsRequest {
            labels: labels.to_vec(),
        };
        let _: serde_json::Value = self.send(reqwest::Method::POST, &url, &body).await?;
        Ok(())
    }
}
