use std::sync::Arc;

use planboard_database::{AbstractDatabaseSql, Workspace, WorkspaceMember, WorkspaceRole};
use planboard_result::Context;
use planboard_utils::time_get_millis;
use tracing::info;

use super::{SyncError, SyncOutcome};
use crate::models::events::{DeletedObjectData, OrganizationEventData};

fn workspace_from_event(data: &OrganizationEventData, now: i64) -> Workspace {
  Workspace {
    id: data.id.clone(),
    name: data.name.clone(),
    slug: data.slug.clone().unwrap_or_default(),
    image_url: data.image_url.clone(),
    created_at: now,
    updated_at: now,
  }
}

/// Idempotent: an existing workspace with the same id short-circuits the
/// whole handler, including the creator membership.
pub async fn sync_workspace_created(
  ctx: Arc<Context>,
  db: &dyn AbstractDatabaseSql,
  data: &OrganizationEventData,
) -> Result<SyncOutcome, SyncError> {
  if db.workspaces_get_by_id(ctx.clone(), &data.id).await?.is_some() {
    info!(workspace_id = %data.id, "workspace already exists, skipping creation");
    return Ok(SyncOutcome::Skipped);
  }

  let now = time_get_millis();
  db.workspaces_create(ctx.clone(), &workspace_from_event(data, now)).await?;

  if let Some(creator_id) = data.creator_id() {
    let member = WorkspaceMember {
      user_id: creator_id.to_string(),
      workspace_id: data.id.clone(),
      role: WorkspaceRole::Admin,
      created_at: now,
    };
    db.workspace_members_create(ctx, &member).await?;
  }

  Ok(SyncOutcome::Applied)
}

pub async fn sync_workspace_updated(
  ctx: Arc<Context>,
  db: &dyn AbstractDatabaseSql,
  data: &OrganizationEventData,
) -> Result<SyncOutcome, SyncError> {
  db.workspaces_update(ctx, &workspace_from_event(data, time_get_millis())).await?;
  Ok(SyncOutcome::Applied)
}

pub async fn sync_workspace_deleted(
  ctx: Arc<Context>,
  db: &dyn AbstractDatabaseSql,
  data: &DeletedObjectData,
) -> Result<SyncOutcome, SyncError> {
  db.workspaces_delete(ctx, &data.id).await?;
  Ok(SyncOutcome::Applied)
}

#[cfg(test)]
mod tests {
  use planboard_database::{ReferenceSqlDb, WorkspaceMembersRepository, WorkspacesRepository};
  use planboard_result::ErrorType;
  use serde_json::json;

  use super::*;

  fn org(value: serde_json::Value) -> OrganizationEventData {
    serde_json::from_value(value).unwrap()
  }

  fn acme() -> OrganizationEventData {
    org(json!({
      "id": "org_1",
      "name": "Acme",
      "slug": "acme",
      "image_url": "https://img.example.com/acme.png",
      "created_by": "user_1"
    }))
  }

  #[tokio::test]
  async fn test_workspace_created_twice_yields_one_row_and_one_admin() {
    let db = ReferenceSqlDb::default();
    let ctx = Arc::new(Context::default());

    let first = sync_workspace_created(ctx.clone(), &db, &acme()).await.unwrap();
    let second = sync_workspace_created(ctx.clone(), &db, &acme()).await.unwrap();

    assert_eq!(first, SyncOutcome::Applied);
    assert_eq!(second, SyncOutcome::Skipped);
    assert_eq!(db.workspaces.lock().await.len(), 1);

    let members = db.workspace_members_list_by_workspace(ctx, "org_1").await.unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].user_id, "user_1");
    assert_eq!(members[0].role, WorkspaceRole::Admin);
  }

  #[tokio::test]
  async fn test_workspace_created_without_creator_adds_no_member() {
    let db = ReferenceSqlDb::default();
    let ctx = Arc::new(Context::default());
    let data = org(json!({ "id": "org_2", "name": "Solo", "slug": "solo" }));

    sync_workspace_created(ctx.clone(), &db, &data).await.unwrap();

    assert!(db.workspaces_get_by_id(ctx.clone(), "org_2").await.unwrap().is_some());
    assert!(db.workspace_members_list_by_workspace(ctx, "org_2").await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn test_workspace_updated_replaces_fields_and_nulls_missing_image() {
    let db = ReferenceSqlDb::default();
    let ctx = Arc::new(Context::default());
    sync_workspace_created(ctx.clone(), &db, &acme()).await.unwrap();

    let changed = org(json!({ "id": "org_1", "name": "Acme Inc", "slug": "acme-inc" }));
    sync_workspace_updated(ctx.clone(), &db, &changed).await.unwrap();

    let stored = db.workspaces_get_by_id(ctx, "org_1").await.unwrap().unwrap();
    assert_eq!(stored.name, "Acme Inc");
    assert_eq!(stored.slug, "acme-inc");
    assert_eq!(stored.image_url, None);
  }

  #[tokio::test]
  async fn test_workspace_updated_for_unknown_id_is_not_found() {
    let db = ReferenceSqlDb::default();
    let err = sync_workspace_updated(Arc::new(Context::default()), &db, &acme()).await.unwrap_err();
    assert_eq!(err.err_type(), ErrorType::NotFound);
  }

  #[tokio::test]
  async fn test_workspace_deleted_removes_row() {
    let db = ReferenceSqlDb::default();
    let ctx = Arc::new(Context::default());
    sync_workspace_created(ctx.clone(), &db, &acme()).await.unwrap();

    let deleted = DeletedObjectData { id: "org_1".to_string() };
    sync_workspace_deleted(ctx.clone(), &db, &deleted).await.unwrap();
    assert!(db.workspaces_get_by_id(ctx.clone(), "org_1").await.unwrap().is_none());

    let err = sync_workspace_deleted(ctx, &db, &deleted).await.unwrap_err();
    assert_eq!(err.err_type(), ErrorType::NotFound);
  }
}
