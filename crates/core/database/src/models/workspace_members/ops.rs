mod reference;

#[cfg(feature = "postgres")]
mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use planboard_result::{Context, DBError};

use crate::WorkspaceMember;

#[async_trait]
pub trait WorkspaceMembersRepository: Sync + Send {
  /// Insert a membership row, fails with `ResourceExists` if the
  /// `(workspace_id, user_id)` pair is already present
  async fn workspace_members_create(
    &self,
    ctx: Arc<Context>,
    member: &WorkspaceMember,
  ) -> Result<(), DBError>;

  /// Fetch the membership of a user in a workspace
  async fn workspace_members_get(
    &self,
    ctx: Arc<Context>,
    workspace_id: &str,
    user_id: &str,
  ) -> Result<WorkspaceMember, DBError>;

  /// All members of a workspace, oldest first
  async fn workspace_members_list_by_workspace(
    &self,
    ctx: Arc<Context>,
    workspace_id: &str,
  ) -> Result<Vec<WorkspaceMember>, DBError>;
}
