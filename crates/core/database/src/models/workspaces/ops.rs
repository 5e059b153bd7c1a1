mod reference;

#[cfg(feature = "postgres")]
mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use planboard_result::{Context, DBError};

use crate::Workspace;

#[async_trait]
pub trait WorkspacesRepository: Sync + Send {
  /// Look a workspace up by id, `None` when there is no such row
  async fn workspaces_get_by_id(
    &self,
    ctx: Arc<Context>,
    workspace_id: &str,
  ) -> Result<Option<Workspace>, DBError>;
  /// Insert a new workspace, fails with `ResourceExists` if the id is taken
  async fn workspaces_create(&self, ctx: Arc<Context>, workspace: &Workspace)
  -> Result<(), DBError>;
  /// Overwrite name, slug, image and `updated_at` of an existing workspace
  async fn workspaces_update(&self, ctx: Arc<Context>, workspace: &Workspace)
  -> Result<(), DBError>;
  /// Delete a workspace, fails with `NotFound` if there is no such row
  async fn workspaces_delete(&self, ctx: Arc<Context>, workspace_id: &str) -> Result<(), DBError>;
}
