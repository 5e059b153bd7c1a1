use std::sync::Arc;

use async_trait::async_trait;
use planboard_result::{Context, DBError};

use crate::{ReferenceSqlDb, WorkspaceMember, WorkspaceMembersRepository};

#[async_trait]
impl WorkspaceMembersRepository for ReferenceSqlDb {
  async fn workspace_members_create(
    &self,
    _ctx: Arc<Context>,
    member: &WorkspaceMember,
  ) -> Result<(), DBError> {
    let mut members = self.workspace_members.lock().await;
    let path = "database.workspace_members.workspace_members_create";

    let key = member.key();
    if members.contains_key(&key) {
      Err(DBError::exists(path, "workspace member already exists"))
    } else {
      members.insert(key, member.clone());
      Ok(())
    }
  }

  async fn workspace_members_get(
    &self,
    _ctx: Arc<Context>,
    workspace_id: &str,
    user_id: &str,
  ) -> Result<WorkspaceMember, DBError> {
    let members = self.workspace_members.lock().await;
    let path = "database.workspace_members.workspace_members_get";

    members
      .get(&(workspace_id.to_string(), user_id.to_string()))
      .cloned()
      .ok_or_else(|| DBError::not_found(path, "workspace member is not exists"))
  }

  async fn workspace_members_list_by_workspace(
    &self,
    _ctx: Arc<Context>,
    workspace_id: &str,
  ) -> Result<Vec<WorkspaceMember>, DBError> {
    let members = self.workspace_members.lock().await;

    let mut result: Vec<WorkspaceMember> =
      members.values().filter(|m| m.workspace_id == workspace_id).cloned().collect();
    result.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.user_id.cmp(&b.user_id)));

    Ok(result)
  }
}

#[cfg(test)]
mod tests {
  use planboard_result::ErrorType;

  use super::*;
  use crate::WorkspaceRole;

  fn member(workspace_id: &str, user_id: &str, role: WorkspaceRole, created_at: i64) -> WorkspaceMember {
    WorkspaceMember {
      user_id: user_id.to_string(),
      workspace_id: workspace_id.to_string(),
      role,
      created_at,
    }
  }

  #[tokio::test]
  async fn test_members_are_unique_per_workspace_and_user() {
    let db = ReferenceSqlDb::default();
    let ctx = Arc::new(Context::default());

    db.workspace_members_create(ctx.clone(), &member("org_1", "user_1", WorkspaceRole::Admin, 1))
      .await
      .unwrap();
    let err = db
      .workspace_members_create(ctx.clone(), &member("org_1", "user_1", WorkspaceRole::Member, 2))
      .await
      .unwrap_err();
    assert_eq!(err.err_type, ErrorType::ResourceExists);

    // same user in another workspace is fine
    db.workspace_members_create(ctx.clone(), &member("org_2", "user_1", WorkspaceRole::Member, 3))
      .await
      .unwrap();

    let stored = db.workspace_members_get(ctx, "org_1", "user_1").await.unwrap();
    assert_eq!(stored.role, WorkspaceRole::Admin);
  }

  #[tokio::test]
  async fn test_list_by_workspace_is_ordered_and_filtered() {
    let db = ReferenceSqlDb::default();
    let ctx = Arc::new(Context::default());

    db.workspace_members_create(ctx.clone(), &member("org_1", "user_b", WorkspaceRole::Member, 5))
      .await
      .unwrap();
    db.workspace_members_create(ctx.clone(), &member("org_1", "user_a", WorkspaceRole::Admin, 1))
      .await
      .unwrap();
    db.workspace_members_create(ctx.clone(), &member("org_2", "user_c", WorkspaceRole::Admin, 0))
      .await
      .unwrap();

    let members = db.workspace_members_list_by_workspace(ctx, "org_1").await.unwrap();
    let ids: Vec<&str> = members.iter().map(|m| m.user_id.as_str()).collect();
    assert_eq!(ids, vec!["user_a", "user_b"]);
  }
}
