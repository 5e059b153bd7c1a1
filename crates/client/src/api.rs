use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use planboard_config::Settings;
use reqwest::Client;
use serde::Deserialize;

use crate::{ClientError, Workspace};

/// Source of the session token sent as the bearer credential
#[async_trait]
pub trait TokenProvider: Send + Sync {
  async fn get_token(&self) -> Result<String, ClientError>;
}

#[async_trait]
pub trait WorkspacesApi: Send + Sync {
  /// `GET /api/workspaces` for the user owning `token`
  async fn list_workspaces(&self, token: &str) -> Result<Vec<Workspace>, ClientError>;
}

/// Fixed token, mostly useful for scripts and tests
#[derive(Debug, Clone)]
pub struct StaticToken(pub String);

#[async_trait]
impl TokenProvider for StaticToken {
  async fn get_token(&self) -> Result<String, ClientError> {
    Ok(self.0.clone())
  }
}

#[derive(Debug, Deserialize)]
struct WorkspacesResponse {
  #[serde(default)]
  workspaces: Option<Vec<Workspace>>,
}

/// Decode a `{ "workspaces": [...] }` body. A missing or null list is empty.
pub fn parse_workspaces_body(body: &str) -> Result<Vec<Workspace>, ClientError> {
  let resp: WorkspacesResponse = serde_json::from_str(body)?;
  Ok(resp.workspaces.unwrap_or_default())
}

#[derive(Debug, Clone)]
pub struct HttpWorkspacesApi {
  pub base_url: String,
  pub http: Arc<Client>,
}

impl HttpWorkspacesApi {
  pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
    let http = Client::builder()
      .timeout(Duration::from_secs(10))
      .connect_timeout(Duration::from_secs(3))
      .build()?;

    let base_url = base_url.into().trim_end_matches('/').to_string();
    Ok(Self { base_url, http: Arc::new(http) })
  }

  pub fn from_config(config: &Settings) -> Result<Self, ClientError> {
    Self::new(config.hosts.api.clone())
  }
}

#[async_trait]
impl WorkspacesApi for HttpWorkspacesApi {
  async fn list_workspaces(&self, token: &str) -> Result<Vec<Workspace>, ClientError> {
    let url = format!("{}/api/workspaces", self.base_url);

    let resp = self.http.get(&url).bearer_auth(token).send().await?;
    let status = resp.status();
    let body = resp.text().await?;
    tracing::debug!(%url, %status, "workspaces response");

    if !status.is_success() {
      return Err(ClientError::Status { status: status.as_u16(), body });
    }

    parse_workspaces_body(&body)
  }
}
