use std::sync::Arc;

use async_trait::async_trait;
use planboard_result::{Context, DBError, ErrorType};

use crate::{
  drivers::sqlx_error, PostgresDb, WorkspaceMember, WorkspaceMembersRepository, WorkspaceRole,
};

#[derive(sqlx::FromRow)]
struct WorkspaceMemberRow {
  user_id: String,
  workspace_id: String,
  role: String,
  created_at: i64,
}

impl From<WorkspaceMemberRow> for WorkspaceMember {
  fn from(row: WorkspaceMemberRow) -> Self {
    WorkspaceMember {
      user_id: row.user_id,
      workspace_id: row.workspace_id,
      role: WorkspaceRole::from(row.role),
      created_at: row.created_at,
    }
  }
}

#[async_trait]
impl WorkspaceMembersRepository for PostgresDb {
  async fn workspace_members_create(
    &self,
    _ctx: Arc<Context>,
    member: &WorkspaceMember,
  ) -> Result<(), DBError> {
    let path = "database.workspace_members.workspace_members_create";

    sqlx::query(
      "INSERT INTO workspace_members (user_id, workspace_id, role, created_at)
       VALUES ($1, $2, $3, $4)",
    )
    .bind(&member.user_id)
    .bind(&member.workspace_id)
    .bind(member.role.as_str())
    .bind(member.created_at)
    .execute(self.db())
    .await
    .map_err(|err| {
      sqlx_error(err, path, ErrorType::DBInsertError, "failed to create workspace member")
    })?;

    Ok(())
  }

  async fn workspace_members_get(
    &self,
    _ctx: Arc<Context>,
    workspace_id: &str,
    user_id: &str,
  ) -> Result<WorkspaceMember, DBError> {
    let path = "database.workspace_members.workspace_members_get";

    let row = sqlx::query_as::<_, WorkspaceMemberRow>(
      "SELECT user_id, workspace_id, role, created_at FROM workspace_members
       WHERE workspace_id = $1 AND user_id = $2",
    )
    .bind(workspace_id)
    .bind(user_id)
    .fetch_optional(self.db())
    .await
    .map_err(|err| {
      sqlx_error(err, path, ErrorType::DBSelectError, "failed to fetch workspace member")
    })?;

    row.map(WorkspaceMember::from).ok_or_else(|| DBError::not_found(path, "workspace member not found"))
  }

  async fn workspace_members_list_by_workspace(
    &self,
    _ctx: Arc<Context>,
    workspace_id: &str,
  ) -> Result<Vec<WorkspaceMember>, DBError> {
    let path = "database.workspace_members.workspace_members_list_by_workspace";

    let rows = sqlx::query_as::<_, WorkspaceMemberRow>(
      "SELECT user_id, workspace_id, role, created_at FROM workspace_members
       WHERE workspace_id = $1 ORDER BY created_at ASC, user_id ASC",
    )
    .bind(workspace_id)
    .fetch_all(self.db())
    .await
    .map_err(|err| {
      sqlx_error(err, path, ErrorType::DBSelectError, "failed to list workspace members")
    })?;

    Ok(rows.into_iter().map(WorkspaceMember::from).collect())
  }
}
