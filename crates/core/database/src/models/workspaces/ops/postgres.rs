use std::sync::Arc;

use async_trait::async_trait;
use planboard_result::{Context, DBError, ErrorType};

use crate::{drivers::sqlx_error, PostgresDb, Workspace, WorkspacesRepository};

#[async_trait()]
impl WorkspacesRepository for PostgresDb {
  async fn workspaces_get_by_id(
    &self,
    _ctx: Arc<Context>,
    workspace_id: &str,
  ) -> Result<Option<Workspace>, DBError> {
    let path = "database.workspaces.workspaces_get_by_id";

    sqlx::query_as::<_, Workspace>(
      "SELECT id, name, slug, image_url, created_at, updated_at FROM workspaces WHERE id = $1",
    )
    .bind(workspace_id)
    .fetch_optional(self.db())
    .await
    .map_err(|err| sqlx_error(err, path, ErrorType::DBSelectError, "failed to fetch workspace"))
  }

  async fn workspaces_create(
    &self,
    _ctx: Arc<Context>,
    workspace: &Workspace,
  ) -> Result<(), DBError> {
    let path = "database.workspaces.workspaces_create";

    sqlx::query(
      "INSERT INTO workspaces (id, name, slug, image_url, created_at, updated_at)
       VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(&workspace.id)
    .bind(&workspace.name)
    .bind(&workspace.slug)
    .bind(&workspace.image_url)
    .bind(workspace.created_at)
    .bind(workspace.updated_at)
    .execute(self.db())
    .await
    .map_err(|err| sqlx_error(err, path, ErrorType::DBInsertError, "failed to create workspace"))?;

    Ok(())
  }

  async fn workspaces_update(
    &self,
    _ctx: Arc<Context>,
    workspace: &Workspace,
  ) -> Result<(), DBError> {
    let path = "database.workspaces.workspaces_update";

    let result = sqlx::query(
      "UPDATE workspaces SET name = $2, slug = $3, image_url = $4, updated_at = $5 WHERE id = $1",
    )
    .bind(&workspace.id)
    .bind(&workspace.name)
    .bind(&workspace.slug)
    .bind(&workspace.image_url)
    .bind(workspace.updated_at)
    .execute(self.db())
    .await
    .map_err(|err| sqlx_error(err, path, ErrorType::DBUpdateError, "failed to update workspace"))?;

    if result.rows_affected() == 0 {
      return Err(DBError::not_found(path, "workspace not found"));
    }
    Ok(())
  }

  async fn workspaces_delete(&self, _ctx: Arc<Context>, workspace_id: &str) -> Result<(), DBError> {
    let path = "database.workspaces.workspaces_delete";

    let result = sqlx::query("DELETE FROM workspaces WHERE id = $1")
      .bind(workspace_id)
      .execute(self.db())
      .await
      .map_err(|err| {
        sqlx_error(err, path, ErrorType::DBDeleteError, "failed to delete workspace")
      })?;

    if result.rows_affected() == 0 {
      return Err(DBError::not_found(path, "workspace not found"));
    }
    Ok(())
  }
}
