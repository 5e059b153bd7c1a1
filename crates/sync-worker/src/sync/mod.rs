//! Handlers projecting identity-provider events into database rows.
//!
//! Each handler performs its statements sequentially against the repository
//! traits and performs no cross-entity validation: a membership may point at a
//! user or workspace whose own event has not arrived yet.

mod members;
mod users;
mod workspaces;

use std::sync::Arc;

use derive_more::Display;
use planboard_database::AbstractDatabaseSql;
use planboard_result::{Context, DBError, ErrorType};
use thiserror::Error;

pub use members::*;
pub use users::*;
pub use workspaces::*;

use crate::models::events::IdentityEvent;

/// Success marker of a handler, consumed for logs and metrics only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SyncOutcome {
  #[display("applied")]
  Applied,
  #[display("skipped")]
  Skipped,
}

#[derive(Debug, Error)]
pub enum SyncError {
  #[error(transparent)]
  Db(#[from] DBError),
  #[error("invalid {event} payload: {reason}")]
  InvalidPayload { event: &'static str, reason: String },
}

impl SyncError {
  pub fn err_type(&self) -> ErrorType {
    match self {
      SyncError::Db(err) => err.err_type.clone(),
      SyncError::InvalidPayload { .. } => ErrorType::InvalidData,
    }
  }
}

/// Route a decoded event to its handler
pub async fn dispatch(
  ctx: Arc<Context>,
  db: &dyn AbstractDatabaseSql,
  event: &IdentityEvent,
) -> Result<SyncOutcome, SyncError> {
  match event {
    IdentityEvent::UserCreated(data) => sync_user_created(ctx, db, data).await,
    IdentityEvent::UserUpdated(data) => sync_user_updated(ctx, db, data).await,
    IdentityEvent::UserDeleted(data) => sync_user_deleted(ctx, db, data).await,
    IdentityEvent::OrganizationCreated(data) => sync_workspace_created(ctx, db, data).await,
    IdentityEvent::OrganizationUpdated(data) => sync_workspace_updated(ctx, db, data).await,
    IdentityEvent::OrganizationDeleted(data) => sync_workspace_deleted(ctx, db, data).await,
    IdentityEvent::OrganizationInvitationAccepted(data) => {
      sync_member_invitation_accepted(ctx, db, data).await
    }
  }
}
