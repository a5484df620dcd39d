//! TickTick task source.
//!
//! Thin HTTP client over the TickTick Open API. Handles token refresh and
//! project lookup; task semantics live in [`crate::task`].

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::Utc;
use reqwest::Client;

use super::traits::TaskSource;
use crate::error::SourceError;
use crate::storage::{self, Config, Tokens};
use crate::task::Task;

const API_BASE: &str = "https://api.ticktick.com/open/v1";
const OAUTH_TOKEN_URL: &str = "https://ticktick.com/oauth/token";

/// Client for the TickTick Open API.
pub struct TickTickClient {
    client_id: String,
    client_secret: String,
    tokens: Tokens,
    token_path: PathBuf,
    api_base: String,
    token_url: String,
    /// Project id to name mapping, filled lazily on first fetch.
    project_names: HashMap<String, String>,
}

impl TickTickClient {
    /// Build a client using the stored tokens and the production endpoints.
    pub fn new(config: &Config) -> Self {
        Self::with_endpoints(
            config,
            Tokens::load(),
            storage::token_file(),
            API_BASE,
            OAUTH_TOKEN_URL,
        )
    }

    /// Build a client against explicit endpoints and token storage.
    pub fn with_endpoints(
        config: &Config,
        tokens: Tokens,
        token_path: PathBuf,
        api_base: &str,
        token_url: &str,
    ) -> Self {
        Self {
            client_id: config.ticktick_client_id.clone(),
            client_secret: config.ticktick_client_secret.clone(),
            tokens,
            token_path,
            api_base: api_base.trim_end_matches('/').to_string(),
            token_url: token_url.to_string(),
            project_names: HashMap::new(),
        }
    }

    /// Refresh the access token if it expires within the refresh margin.
    /// Tokens without a recorded expiry are used as-is.
    fn ensure_valid_token(&mut self) -> Result<(), SourceError> {
        if self.tokens.access_token.is_empty() {
            return Err(SourceError::NotAuthenticated {
                service: "TickTick".to_string(),
                message: "no access token stored".to_string(),
            });
        }

        let now = Utc::now().timestamp();
        if self.tokens.expires_at != 0 && self.tokens.needs_refresh(now) {
            self.refresh_access_token()?;
        }
        Ok(())
    }

    fn refresh_access_token(&mut self) -> Result<(), SourceError> {
        if self.tokens.refresh_token.is_empty() {
            return Err(SourceError::NotAuthenticated {
                service: "TickTick".to_string(),
                message: "no refresh token stored".to_string(),
            });
        }

        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("refresh_token", self.tokens.refresh_token.as_str()),
            ("grant_type", "refresh_token"),
        ];
        let url = self.token_url.clone();

        let (status, body) = tokio::runtime::Handle::current().block_on(async {
            let resp = Client::new().post(&url).form(&params).send().await?;
            let status = resp.status();
            let body = resp.text().await?;
            Ok::<_, reqwest::Error>((status, body))
        })?;

        if !status.is_success() {
            return Err(SourceError::TokenRefreshFailed(body));
        }

        let data: serde_json::Value = serde_json::from_str(&body)
            .map_err(|e| SourceError::TokenRefreshFailed(format!("invalid token response: {e}")))?;
        let access = data["access_token"].as_str().ok_or_else(|| {
            SourceError::TokenRefreshFailed("response missing access_token".to_string())
        })?;

        self.tokens.access_token = access.to_string();
        if let Some(refresh) = data["refresh_token"].as_str() {
            self.tokens.refresh_token = refresh.to_string();
        }
        let expires_in = data["expires_in"].as_i64().unwrap_or(3600);
        self.tokens.expires_at = Utc::now().timestamp() + expires_in;

        if let Err(e) = self.tokens.save_to(&self.token_path) {
            log::warn!("failed to persist refreshed TickTick tokens: {e}");
        }
        Ok(())
    }

    fn api_get(&mut self, endpoint: &str) -> Result<serde_json::Value, SourceError> {
        self.ensure_valid_token()?;
        let url = format!("{}{}", self.api_base, endpoint);
        let token = self.tokens.access_token.clone();

        let resp: serde_json::Value = tokio::runtime::Handle::current().block_on(async {
            Client::new()
                .get(&url)
                .bearer_auth(&token)
                .send()
                .await?
                .error_for_status()?
                .json()
                .await
        })?;
        Ok(resp)
    }

    fn load_project_names(&mut self) -> Result<(), SourceError> {
        if !self.project_names.is_empty() {
            return Ok(());
        }
        let projects = self.api_get("/project")?;
        let Some(list) = projects.as_array() else {
            return Err(SourceError::Api {
                service: "TickTick".to_string(),
                message: "project list is not an array".to_string(),
            });
        };
        for project in list {
            if let (Some(id), Some(name)) = (project["id"].as_str(), project["name"].as_str()) {
                self.project_names.insert(id.to_string(), name.to_string());
            }
        }
        Ok(())
    }

    fn project_tasks(&mut self, project_id: &str) -> Result<Vec<serde_json::Value>, SourceError> {
        let data = self.api_get(&format!("/project/{project_id}/data"))?;
        Ok(data["tasks"].as_array().cloned().unwrap_or_default())
    }
}

impl TaskSource for TickTickClient {
    fn fetch_all(&mut self) -> Result<Vec<Task>, SourceError> {
        self.load_project_names()?;
        let projects: Vec<(String, String)> = self
            .project_names
            .iter()
            .map(|(id, name)| (id.clone(), name.clone()))
            .collect();

        let mut tasks = Vec::new();
        for (project_id, project_name) in projects {
            for raw in self.project_tasks(&project_id)? {
                match Task::from_api(&raw, &project_name) {
                    Some(task) => tasks.push(task),
                    None => log::debug!("skipping task without id or title in {project_name}"),
                }
            }
        }
        Ok(tasks)
    }

    fn fetch_inbox(&mut self) -> Result<Vec<Task>, SourceError> {
        let projects = self.api_get("/project")?;
        let inbox_id = projects
            .as_array()
            .and_then(|list| {
                list.iter().find(|p| {
                    p["name"]
                        .as_str()
                        .is_some_and(|name| name.eq_ignore_ascii_case("inbox"))
                })
            })
            .and_then(|p| p["id"].as_str())
            .map(str::to_string);

        let Some(id) = inbox_id else {
            return Ok(Vec::new());
        };
        let raw = self.project_tasks(&id)?;
        Ok(raw.iter().filter_map(|t| Task::from_api(t, "Inbox")).collect())
    }
}
