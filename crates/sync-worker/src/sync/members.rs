use std::sync::Arc;

use planboard_database::{AbstractDatabaseSql, WorkspaceMember, WorkspaceRole};
use planboard_result::Context;
use planboard_utils::time_get_millis;

use super::{SyncError, SyncOutcome};
use crate::models::events::InvitationAcceptedData;

/// Add the invitee to the workspace with the invitation's role, upper-cased.
/// The workspace and user are not required to exist yet.
pub async fn sync_member_invitation_accepted(
  ctx: Arc<Context>,
  db: &dyn AbstractDatabaseSql,
  data: &InvitationAcceptedData,
) -> Result<SyncOutcome, SyncError> {
  let member = WorkspaceMember {
    user_id: data.user_id.clone(),
    workspace_id: data.organization_id.clone(),
    role: WorkspaceRole::from_role_name(&data.role_name),
    created_at: time_get_millis(),
  };

  db.workspace_members_create(ctx, &member).await?;
  Ok(SyncOutcome::Applied)
}

#[cfg(test)]
mod tests {
  use planboard_database::{ReferenceSqlDb, WorkspaceMembersRepository};
  use planboard_result::ErrorType;

  use super::*;

  fn invitation(role_name: &str) -> InvitationAcceptedData {
    InvitationAcceptedData {
      user_id: "user_2".to_string(),
      organization_id: "org_1".to_string(),
      role_name: role_name.to_string(),
    }
  }

  #[tokio::test]
  async fn test_invitation_accepted_adds_member_with_upper_cased_role() {
    let db = ReferenceSqlDb::default();
    let ctx = Arc::new(Context::default());

    sync_member_invitation_accepted(ctx.clone(), &db, &invitation("member")).await.unwrap();

    let member = db.workspace_members_get(ctx, "org_1", "user_2").await.unwrap();
    assert_eq!(member.role, WorkspaceRole::Member);
    assert_eq!(member.role.as_str(), "MEMBER");
  }

  #[tokio::test]
  async fn test_invitation_accepted_does_not_require_workspace() {
    let db = ReferenceSqlDb::default();
    sync_member_invitation_accepted(Arc::new(Context::default()), &db, &invitation("admin"))
      .await
      .unwrap();

    assert!(db.workspaces.lock().await.is_empty());
    assert_eq!(db.workspace_members.lock().await.len(), 1);
  }

  #[tokio::test]
  async fn test_invitation_accepted_twice_fails() {
    let db = ReferenceSqlDb::default();
    let ctx = Arc::new(Context::default());

    sync_member_invitation_accepted(ctx.clone(), &db, &invitation("member")).await.unwrap();
    let err = sync_member_invitation_accepted(ctx, &db, &invitation("member")).await.unwrap_err();
    assert_eq!(err.err_type(), ErrorType::ResourceExists);
  }
}
