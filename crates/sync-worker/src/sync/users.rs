use std::sync::Arc;

use planboard_database::{AbstractDatabaseSql, User, UserUpdate};
use planboard_result::Context;
use planboard_utils::time_get_millis;

use super::{SyncError, SyncOutcome};
use crate::models::events::{DeletedObjectData, UserEventData, USER_CREATED};

fn user_from_event(data: &UserEventData, now: i64) -> Result<User, SyncError> {
  let email = data.primary_email().ok_or_else(|| SyncError::InvalidPayload {
    event: USER_CREATED,
    reason: format!("user {} has no email address", data.id),
  })?;

  Ok(User {
    id: data.id.clone(),
    email: email.to_string(),
    name: data.display_name(),
    image_url: data.image_url.clone(),
    created_at: now,
    updated_at: now,
  })
}

/// Insert the user. A duplicate id surfaces as `ResourceExists`; unlike
/// workspace creation there is no existence check here.
pub async fn sync_user_created(
  ctx: Arc<Context>,
  db: &dyn AbstractDatabaseSql,
  data: &UserEventData,
) -> Result<SyncOutcome, SyncError> {
  let user = user_from_event(data, time_get_millis())?;
  db.users_create(ctx, &user).await?;
  Ok(SyncOutcome::Applied)
}

/// Refresh the profile. An event without addresses keeps the stored email.
pub async fn sync_user_updated(
  ctx: Arc<Context>,
  db: &dyn AbstractDatabaseSql,
  data: &UserEventData,
) -> Result<SyncOutcome, SyncError> {
  let update = UserUpdate {
    id: data.id.clone(),
    email: data.primary_email().map(String::from),
    name: data.display_name(),
    image_url: data.image_url.clone(),
    updated_at: time_get_millis(),
  };
  db.users_update(ctx, &update).await?;
  Ok(SyncOutcome::Applied)
}

pub async fn sync_user_deleted(
  ctx: Arc<Context>,
  db: &dyn AbstractDatabaseSql,
  data: &DeletedObjectData,
) -> Result<SyncOutcome, SyncError> {
  db.users_delete(ctx, &data.id).await?;
  Ok(SyncOutcome::Applied)
}
