use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
  #[error("failed to get session token: {0}")]
  Token(String),

  #[error("workspaces request failed: {0}")]
  Http(#[from] reqwest::Error),

  #[error("workspaces request returned {status}: {body}")]
  Status { status: u16, body: String },

  #[error("failed to decode response: {0}")]
  Decode(#[from] serde_json::Error),

  #[error("storage error: {0}")]
  Storage(#[from] std::io::Error),

  #[error("identity provider error: {0}")]
  Identity(String),
}
