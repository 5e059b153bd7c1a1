use std::sync::Arc;

use async_trait::async_trait;
use planboard_result::{Context, DBError};

use crate::{ReferenceSqlDb, Workspace, WorkspacesRepository};

#[async_trait()]
impl WorkspacesRepository for ReferenceSqlDb {
  async fn workspaces_get_by_id(
    &self,
    _ctx: Arc<Context>,
    workspace_id: &str,
  ) -> Result<Option<Workspace>, DBError> {
    let workspaces = self.workspaces.lock().await;
    Ok(workspaces.get(workspace_id).cloned())
  }

  async fn workspaces_create(
    &self,
    _ctx: Arc<Context>,
    workspace: &Workspace,
  ) -> Result<(), DBError> {
    let mut workspaces = self.workspaces.lock().await;
    let path = "database.workspaces.workspaces_create";

    if workspaces.contains_key(&workspace.id) {
      Err(DBError::exists(path, "workspace already exists"))
    } else {
      workspaces.insert(workspace.id.to_string(), workspace.clone());
      Ok(())
    }
  }

  async fn workspaces_update(
    &self,
    _ctx: Arc<Context>,
    workspace: &Workspace,
  ) -> Result<(), DBError> {
    let mut workspaces = self.workspaces.lock().await;
    let path = "database.workspaces.workspaces_update";

    match workspaces.get_mut(&workspace.id) {
      Some(existing) => {
        existing.name = workspace.name.clone();
        existing.slug = workspace.slug.clone();
        existing.image_url = workspace.image_url.clone();
        existing.updated_at = workspace.updated_at;
        Ok(())
      }
      None => Err(DBError::not_found(path, "workspace is not exists")),
    }
  }

  async fn workspaces_delete(&self, _ctx: Arc<Context>, workspace_id: &str) -> Result<(), DBError> {
    let mut workspaces = self.workspaces.lock().await;
    let path = "database.workspaces.workspaces_delete";

    match workspaces.remove(workspace_id) {
      Some(_) => Ok(()),
      None => Err(DBError::not_found(path, "workspace is not exists")),
    }
  }
}
