use std::{collections::HashMap, sync::Arc};

use tokio::sync::Mutex;

use crate::{User, Workspace, WorkspaceMember};

/// In-memory database used for tests and for running without Postgres
#[derive(Default, Debug)]
pub struct ReferenceSqlDb {
  pub users: Arc<Mutex<HashMap<String, User>>>,
  pub workspaces: Arc<Mutex<HashMap<String, Workspace>>>,
  /// Keyed by `(workspace_id, user_id)`
  pub workspace_members: Arc<Mutex<HashMap<(String, String), WorkspaceMember>>>,
}
