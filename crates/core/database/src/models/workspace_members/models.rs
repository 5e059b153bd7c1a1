use std::fmt;

use serde::{Deserialize, Serialize};

/// Role of a user inside a workspace. Identity-provider role names are
/// upper-cased; names outside the known set are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WorkspaceRole {
  Admin,
  Member,
  Other(String),
}

impl WorkspaceRole {
  pub fn as_str(&self) -> &str {
    match self {
      WorkspaceRole::Admin => "ADMIN",
      WorkspaceRole::Member => "MEMBER",
      WorkspaceRole::Other(role) => role.as_str(),
    }
  }

  /// Normalizes a role name as received from the identity provider
  pub fn from_role_name(role: &str) -> Self {
    let upper = role.to_uppercase();
    match upper.as_str() {
      "ADMIN" => WorkspaceRole::Admin,
      "MEMBER" => WorkspaceRole::Member,
      _ => WorkspaceRole::Other(upper),
    }
  }
}

impl Default for WorkspaceRole {
  fn default() -> Self {
    WorkspaceRole::Member
  }
}

impl From<String> for WorkspaceRole {
  fn from(value: String) -> Self {
    WorkspaceRole::from_role_name(&value)
  }
}

impl From<WorkspaceRole> for String {
  fn from(value: WorkspaceRole) -> Self {
    value.as_str().to_string()
  }
}

impl fmt::Display for WorkspaceRole {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct WorkspaceMember {
  pub user_id: String,      // VARCHAR(64) NOT NULL
  pub workspace_id: String, // VARCHAR(64) NOT NULL
  pub role: WorkspaceRole,  // VARCHAR(64) NOT NULL
  pub created_at: i64,      // BIGINT NOT NULL
}

impl WorkspaceMember {
  pub fn key(&self) -> (String, String) {
    (self.workspace_id.clone(), self.user_id.clone())
  }
}
