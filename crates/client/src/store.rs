use std::sync::Arc;

use tracing::{debug, warn};

use crate::{
  CURRENT_WORKSPACE_KEY, ClientError, DurableStorage, Project, Task, TokenProvider, Workspace,
  WorkspacesApi,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkspaceState {
  pub workspaces: Vec<Workspace>,
  /// The current workspace is always looked up in `workspaces` by this id
  pub current_workspace_id: Option<String>,
  pub loading: bool,
}

/// Client-side cache of the user's workspaces, with the current selection
/// remembered in durable storage between sessions.
pub struct WorkspaceStore {
  state: WorkspaceState,
  storage: Arc<dyn DurableStorage>,
}

impl WorkspaceStore {
  pub fn new(storage: Arc<dyn DurableStorage>) -> Self {
    Self { state: WorkspaceState::default(), storage }
  }

  pub fn state(&self) -> &WorkspaceState {
    &self.state
  }

  pub fn workspaces(&self) -> &[Workspace] {
    &self.state.workspaces
  }

  pub fn loading(&self) -> bool {
    self.state.loading
  }

  pub fn current_workspace(&self) -> Option<&Workspace> {
    let id = self.state.current_workspace_id.as_deref()?;
    self.state.workspaces.iter().find(|w| w.id == id)
  }

  fn current_workspace_mut(&mut self) -> Option<&mut Workspace> {
    let id = self.state.current_workspace_id.as_deref()?;
    self.state.workspaces.iter_mut().find(|w| w.id == id)
  }

  fn saved_workspace_id(&self) -> Option<String> {
    self.storage.get_item(CURRENT_WORKSPACE_KEY).unwrap_or_else(|err| {
      warn!("failed to read {}: {}", CURRENT_WORKSPACE_KEY, err);
      None
    })
  }

  /// Load the workspace list from the API. Failures only clear `loading`.
  pub async fn fetch_workspaces(&mut self, api: &dyn WorkspacesApi, tokens: &dyn TokenProvider) {
    self.fetch_pending();

    let result = match tokens.get_token().await {
      Ok(token) => api.list_workspaces(&token).await,
      Err(err) => Err(err),
    };

    match result {
      Ok(list) => self.fetch_fulfilled(list),
      Err(err) => self.fetch_rejected(&err),
    }
  }

  pub fn fetch_pending(&mut self) {
    self.state.loading = true;
  }

  /// Replace the list and re-select the saved workspace, falling back to the
  /// first one when the saved id is missing or stale.
  pub fn fetch_fulfilled(&mut self, workspaces: Vec<Workspace>) {
    let saved = self.saved_workspace_id();

    let current = saved
      .filter(|id| workspaces.iter().any(|w| &w.id == id))
      .or_else(|| workspaces.first().map(|w| w.id.clone()));

    debug!(count = workspaces.len(), current = ?current, "workspaces fetched");
    self.state.workspaces = workspaces;
    self.state.current_workspace_id = current;
    self.state.loading = false;
  }

  pub fn fetch_rejected(&mut self, err: &ClientError) {
    warn!("failed to fetch workspaces: {}", err);
    self.state.loading = false;
  }

  /// Remember `id` in storage and select it. An unknown id clears the
  /// selection.
  pub fn set_current_workspace(&mut self, id: &str) {
    if let Err(err) = self.storage.set_item(CURRENT_WORKSPACE_KEY, id) {
      warn!("failed to persist {}: {}", CURRENT_WORKSPACE_KEY, err);
    }

    self.state.current_workspace_id =
      self.state.workspaces.iter().find(|w| w.id == id).map(|w| w.id.clone());
  }

  /// Select `workspace`, replacing a listed entry with the same id
  pub fn add_workspace(&mut self, workspace: Workspace) {
    self.state.current_workspace_id = Some(workspace.id.clone());
    self.state.workspaces.retain(|w| w.id != workspace.id);
    self.state.workspaces.push(workspace);
  }

  pub fn update_workspace(&mut self, workspace: Workspace) {
    for entry in self.state.workspaces.iter_mut().filter(|w| w.id == workspace.id) {
      *entry = workspace.clone();
    }
  }

  pub fn delete_workspace(&mut self, id: &str) {
    self.state.workspaces.retain(|w| w.id != id);
    if self.state.current_workspace_id.as_deref() == Some(id) {
      self.state.current_workspace_id = None;
    }
  }

  pub fn add_project(&mut self, project: Project) {
    if let Some(workspace) = self.current_workspace_mut() {
      workspace.projects.push(project);
    }
  }

  pub fn add_task(&mut self, task: Task) {
    let Some(workspace) = self.current_workspace_mut() else { return };
    if let Some(project) = workspace.project_mut(&task.project_id) {
      project.tasks.push(task);
    }
  }

  pub fn update_task(&mut self, task: Task) {
    let Some(workspace) = self.current_workspace_mut() else { return };
    let Some(project) = workspace.project_mut(&task.project_id) else { return };

    for entry in project.tasks.iter_mut().filter(|t| t.id == task.id) {
      *entry = task.clone();
    }
  }

  pub fn delete_task(&mut self, project_id: &str, task_ids: &[String]) {
    let Some(workspace) = self.current_workspace_mut() else { return };
    if let Some(project) = workspace.project_mut(project_id) {
      project.tasks.retain(|t| !task_ids.contains(&t.id));
    }
  }
}

#[cfg(test)]
mod tests {
  use async_trait::async_trait;
  use serde_json::json;

  use super::*;
  use crate::{MemoryStorage, StaticToken};

  fn workspace(id: &str) -> Workspace {
    serde_json::from_value(json!({ "id": id, "name": id.to_uppercase() })).unwrap()
  }

  fn workspace_with_project(id: &str, project_id: &str) -> Workspace {
    serde_json::from_value(json!({
      "id": id,
      "name": id,
      "projects": [{ "id": project_id, "name": "Roadmap", "workspaceId": id, "tasks": [] }]
    }))
    .unwrap()
  }

  fn task(id: &str, project_id: &str, title: &str) -> Task {
    Task { id: id.into(), project_id: project_id.into(), title: title.into(), ..Default::default() }
  }

  fn store_with_saved(saved: Option<&str>) -> (WorkspaceStore, Arc<MemoryStorage>) {
    let storage = Arc::new(MemoryStorage::new());
    if let Some(id) = saved {
      storage.set_item(CURRENT_WORKSPACE_KEY, id).unwrap();
    }
    (WorkspaceStore::new(storage.clone()), storage)
  }

  struct FakeApi(Result<Vec<Workspace>, u16>);

  #[async_trait]
  impl WorkspacesApi for FakeApi {
    async fn list_workspaces(&self, token: &str) -> Result<Vec<Workspace>, ClientError> {
      assert_eq!(token, "tok");
      match &self.0 {
        Ok(list) => Ok(list.clone()),
        Err(status) => Err(ClientError::Status { status: *status, body: String::new() }),
      }
    }
  }

  #[tokio::test]
  async fn test_fetch_reselects_saved_workspace() {
    let (mut store, _) = store_with_saved(Some("b"));
    let api = FakeApi(Ok(vec![workspace("a"), workspace("b")]));

    store.fetch_workspaces(&api, &StaticToken("tok".into())).await;

    assert_eq!(store.current_workspace().map(|w| w.id.as_str()), Some("b"));
    assert!(!store.loading());
  }

  #[tokio::test]
  async fn test_fetch_falls_back_to_first_when_saved_id_is_stale() {
    let (mut store, _) = store_with_saved(Some("gone"));
    let api = FakeApi(Ok(vec![workspace("a"), workspace("b")]));

    store.fetch_workspaces(&api, &StaticToken("tok".into())).await;
    assert_eq!(store.current_workspace().map(|w| w.id.as_str()), Some("a"));
  }

  #[tokio::test]
  async fn test_refetch_keeps_selection() {
    let (mut store, _) = store_with_saved(None);
    let api = FakeApi(Ok(vec![workspace("a"), workspace("b")]));
    let tokens = StaticToken("tok".into());

    store.fetch_workspaces(&api, &tokens).await;
    store.set_current_workspace("b");
    store.fetch_workspaces(&api, &tokens).await;

    assert_eq!(store.current_workspace().map(|w| w.id.as_str()), Some("b"));
  }

  #[tokio::test]
  async fn test_empty_fetch_clears_current() {
    let (mut store, _) = store_with_saved(Some("a"));
    store.fetch_fulfilled(vec![workspace("a")]);

    store.fetch_workspaces(&FakeApi(Ok(vec![])), &StaticToken("tok".into())).await;

    assert!(store.current_workspace().is_none());
    assert!(store.workspaces().is_empty());
    assert!(!store.loading());
  }

  #[tokio::test]
  async fn test_rejected_fetch_only_clears_loading() {
    let (mut store, _) = store_with_saved(None);
    store.fetch_fulfilled(vec![workspace("a")]);

    store.fetch_workspaces(&FakeApi(Err(500)), &StaticToken("tok".into())).await;

    assert_eq!(store.workspaces().len(), 1);
    assert_eq!(store.current_workspace().map(|w| w.id.as_str()), Some("a"));
    assert!(!store.loading());
  }

  #[test]
  fn test_pending_sets_loading() {
    let (mut store, _) = store_with_saved(None);
    store.fetch_pending();
    assert!(store.loading());
  }

  #[test]
  fn test_set_current_workspace_persists_id() {
    let (mut store, storage) = store_with_saved(None);
    store.fetch_fulfilled(vec![workspace("a"), workspace("b")]);

    store.set_current_workspace("b");
    assert_eq!(storage.get_item(CURRENT_WORKSPACE_KEY).unwrap().as_deref(), Some("b"));
    assert_eq!(store.current_workspace().map(|w| w.id.as_str()), Some("b"));

    store.set_current_workspace("missing");
    assert!(store.current_workspace().is_none());
    assert_eq!(storage.get_item(CURRENT_WORKSPACE_KEY).unwrap().as_deref(), Some("missing"));
  }

  #[test]
  fn test_add_and_update_workspace() {
    let (mut store, _) = store_with_saved(None);
    store.fetch_fulfilled(vec![workspace("a")]);

    store.add_workspace(workspace("c"));
    assert_eq!(store.current_workspace().map(|w| w.id.as_str()), Some("c"));

    let mut renamed = workspace("c");
    renamed.name = "Renamed".into();
    store.update_workspace(renamed);
    assert_eq!(store.current_workspace().map(|w| w.name.as_str()), Some("Renamed"));
    assert_eq!(store.workspaces().len(), 2);
  }

  #[test]
  fn test_add_workspace_with_listed_id_selects_new_payload() {
    let (mut store, _) = store_with_saved(None);
    store.fetch_fulfilled(vec![workspace("a"), workspace("b")]);

    let mut fresh = workspace("a");
    fresh.name = "New".into();
    store.add_workspace(fresh);

    assert_eq!(store.current_workspace().map(|w| w.name.as_str()), Some("New"));
    let ids: Vec<_> = store.workspaces().iter().map(|w| w.id.as_str()).collect();
    assert_eq!(ids, ["b", "a"]);
  }

  #[test]
  fn test_delete_current_workspace_clears_selection() {
    let (mut store, _) = store_with_saved(None);
    store.fetch_fulfilled(vec![workspace("a"), workspace("b")]);

    store.delete_workspace("a");
    assert!(store.current_workspace().is_none());
    assert_eq!(store.workspaces().len(), 1);
  }

  #[test]
  fn test_delete_other_workspace_keeps_selection() {
    let (mut store, _) = store_with_saved(None);
    store.fetch_fulfilled(vec![workspace("a"), workspace("b")]);

    store.delete_workspace("b");
    assert_eq!(store.current_workspace().map(|w| w.id.as_str()), Some("a"));
  }

  #[test]
  fn test_task_mutations_without_current_workspace_are_noops() {
    let (mut store, _) = store_with_saved(None);
    store.fetch_fulfilled(vec![workspace_with_project("a", "p1")]);
    store.set_current_workspace("missing");
    let before = store.state().clone();

    store.add_project(Project { id: "p2".into(), ..Default::default() });
    store.add_task(task("t1", "p1", "Plan"));
    store.update_task(task("t1", "p1", "Replan"));
    store.delete_task("p1", &["t1".to_string()]);

    assert_eq!(store.state(), &before);
  }

  #[test]
  fn test_task_mutations_on_current_workspace() {
    let (mut store, _) = store_with_saved(None);
    store.fetch_fulfilled(vec![workspace_with_project("a", "p1")]);

    store.add_task(task("t1", "p1", "Plan"));
    store.add_task(task("t2", "p1", "Build"));
    store.add_task(task("t3", "p1", "Ship"));
    store.add_task(task("t4", "unknown", "Lost"));
    store.update_task(task("t2", "p1", "Build it"));
    store.delete_task("p1", &["t1".to_string(), "t3".to_string()]);

    let project = &store.current_workspace().unwrap().projects[0];
    assert_eq!(project.tasks.len(), 1);
    assert_eq!(project.tasks[0].title, "Build it");
  }

  #[test]
  fn test_add_project_lands_in_current_workspace_only() {
    let (mut store, _) = store_with_saved(Some("b"));
    store.fetch_fulfilled(vec![workspace("a"), workspace("b")]);

    store.add_project(Project { id: "p1".into(), workspace_id: "b".into(), ..Default::default() });

    assert!(store.workspaces()[0].projects.is_empty());
    assert_eq!(store.workspaces()[1].projects.len(), 1);
  }
}
