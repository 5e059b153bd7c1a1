use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A workspace as returned by `GET /api/workspaces`. Fields the client does
/// not model are kept in `extra` so they survive a round trip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
  pub id: String,
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub slug: String,
  #[serde(default)]
  pub image_url: Option<String>,
  #[serde(default)]
  pub projects: Vec<Project>,
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
  pub id: String,
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub workspace_id: String,
  #[serde(default)]
  pub tasks: Vec<Task>,
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
  pub id: String,
  pub project_id: String,
  #[serde(default)]
  pub title: String,
  #[serde(default)]
  pub status: String,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

impl Workspace {
  pub fn project_mut(&mut self, project_id: &str) -> Option<&mut Project> {
    self.projects.iter_mut().find(|p| p.id == project_id)
  }
}
