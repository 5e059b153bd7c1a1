use async_trait::async_trait;
use planboard_utils::time_get_millis;
use tracing::info;

use crate::{ClientError, WorkspaceStore};

pub const SELECT_WORKSPACE_LABEL: &str = "Select Workspace";
pub const DEFAULT_INITIAL: &str = "W";
pub const AUTH_NOT_READY: &str = "Auth not ready";
pub const NAME_PROMPT: &str = "Enter workspace name";
pub const NAME_TOO_SHORT: &str = "Workspace name must be at least 3 characters";
pub const MIN_NAME_LEN: usize = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
  pub x: f64,
  pub y: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
  pub x: f64,
  pub y: f64,
  pub width: f64,
  pub height: f64,
}

impl Rect {
  /// Edges count as inside
  pub fn contains(&self, point: Point) -> bool {
    point.x >= self.x
      && point.x <= self.x + self.width
      && point.y >= self.y
      && point.y <= self.y + self.height
  }
}

/// An organization as the identity provider reports it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Organization {
  pub id: String,
  pub name: String,
  pub image_url: Option<String>,
}

#[async_trait]
pub trait OrganizationClient: Send + Sync {
  fn is_loaded(&self) -> bool;
  async fn create_organization(&self, name: &str, slug: &str) -> Result<Organization, ClientError>;
  async fn set_active(&self, organization_id: &str) -> Result<(), ClientError>;
}

pub trait Dialogs: Send + Sync {
  fn alert(&self, message: &str);
  fn prompt(&self, message: &str) -> Option<String>;
}

pub trait Navigator: Send + Sync {
  fn navigate(&self, path: &str);
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectorEntry {
  pub id: String,
  pub name: String,
  pub is_current: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectorHeader {
  pub label: String,
  pub initial: String,
  pub image_url: Option<String>,
}

/// State behind the workspace dropdown. Rendering is left to the caller.
#[derive(Debug, Default)]
pub struct WorkspaceSelector {
  is_open: bool,
  pub bounds: Rect,
}

impl WorkspaceSelector {
  pub fn new(bounds: Rect) -> Self {
    Self { is_open: false, bounds }
  }

  pub fn is_open(&self) -> bool {
    self.is_open
  }

  pub fn toggle(&mut self) {
    self.is_open = !self.is_open;
  }

  pub fn close(&mut self) {
    self.is_open = false;
  }

  pub fn entries(&self, store: &WorkspaceStore) -> Vec<SelectorEntry> {
    let current = store.current_workspace().map(|w| w.id.as_str());
    store
      .workspaces()
      .iter()
      .map(|w| SelectorEntry {
        id: w.id.clone(),
        name: w.name.clone(),
        is_current: current == Some(w.id.as_str()),
      })
      .collect()
  }

  pub fn header(&self, active: Option<&Organization>) -> SelectorHeader {
    let name = active.map(|o| o.name.as_str()).filter(|n| !n.is_empty());

    SelectorHeader {
      label: name.unwrap_or(SELECT_WORKSPACE_LABEL).to_string(),
      initial: name
        .and_then(|n| n.chars().next())
        .map(String::from)
        .unwrap_or_else(|| DEFAULT_INITIAL.to_string()),
      image_url: active.and_then(|o| o.image_url.clone()),
    }
  }

  pub fn select(&mut self, store: &mut WorkspaceStore, navigator: &dyn Navigator, id: &str) {
    store.set_current_workspace(id);
    self.close();
    navigator.navigate("/");
  }

  /// Prompt for a name and create an organization for it. Returns `None` when
  /// the flow stops at a local check; identity-provider errors propagate.
  pub async fn create_workspace(
    &self,
    org_client: &dyn OrganizationClient,
    dialogs: &dyn Dialogs,
    navigator: &dyn Navigator,
  ) -> Result<Option<Organization>, ClientError> {
    if !org_client.is_loaded() {
      dialogs.alert(AUTH_NOT_READY);
      return Ok(None);
    }

    let name = dialogs.prompt(NAME_PROMPT).map(|n| n.trim().to_string()).unwrap_or_default();
    // length in UTF-16 code units, so an emoji counts as two
    if name.encode_utf16().count() < MIN_NAME_LEN {
      dialogs.alert(NAME_TOO_SHORT);
      return Ok(None);
    }

    let slug = format!("ws-{}", time_get_millis());
    let org = org_client.create_organization(&name, &slug).await?;
    org_client.set_active(&org.id).await?;
    info!(organization = %org.id, %slug, "workspace created");

    navigator.navigate("/");
    Ok(Some(org))
  }

  /// Close the panel when the pointer lands outside it
  pub fn on_pointer_down(&mut self, point: Point) {
    if self.is_open && !self.bounds.contains(point) {
      self.close();
    }
  }
}

#[cfg(test)]
mod tests {
  use std::sync::{Arc, Mutex};

  use serde_json::json;

  use super::*;
  use crate::{MemoryStorage, Workspace};

  #[derive(Default)]
  struct Recorder {
    alerts: Mutex<Vec<String>>,
    paths: Mutex<Vec<String>>,
    answer: Option<String>,
  }

  impl Dialogs for Recorder {
    fn alert(&self, message: &str) {
      self.alerts.lock().unwrap().push(message.to_string());
    }

    fn prompt(&self, _message: &str) -> Option<String> {
      self.answer.clone()
    }
  }

  impl Navigator for Recorder {
    fn navigate(&self, path: &str) {
      self.paths.lock().unwrap().push(path.to_string());
    }
  }

  #[derive(Default)]
  struct FakeOrgs {
    loaded: bool,
    fail: bool,
    created: Mutex<Vec<(String, String)>>,
    active: Mutex<Option<String>>,
  }

  #[async_trait]
  impl OrganizationClient for FakeOrgs {
    fn is_loaded(&self) -> bool {
      self.loaded
    }

    async fn create_organization(&self, name: &str, slug: &str) -> Result<Organization, ClientError> {
      if self.fail {
        return Err(ClientError::Identity("slug taken".into()));
      }
      self.created.lock().unwrap().push((name.to_string(), slug.to_string()));
      Ok(Organization { id: "org_new".into(), name: name.into(), image_url: None })
    }

    async fn set_active(&self, organization_id: &str) -> Result<(), ClientError> {
      *self.active.lock().unwrap() = Some(organization_id.to_string());
      Ok(())
    }
  }

  fn store() -> WorkspaceStore {
    let mut store = WorkspaceStore::new(Arc::new(MemoryStorage::new()));
    let list: Vec<Workspace> =
      serde_json::from_value(json!([{ "id": "a", "name": "Alpha" }, { "id": "b", "name": "Beta" }])).unwrap();
    store.fetch_fulfilled(list);
    store
  }

  fn panel() -> Rect {
    Rect { x: 10.0, y: 10.0, width: 200.0, height: 100.0 }
  }

  #[test]
  fn test_entries_mark_current() {
    let selector = WorkspaceSelector::new(panel());
    let entries = selector.entries(&store());

    assert_eq!(entries.len(), 2);
    assert!(entries[0].is_current);
    assert!(!entries[1].is_current);
    assert_eq!(entries[1].name, "Beta");
  }

  #[test]
  fn test_select_sets_current_closes_and_navigates_home() {
    let mut store = store();
    let nav = Recorder::default();
    let mut selector = WorkspaceSelector::new(panel());
    selector.toggle();

    selector.select(&mut store, &nav, "b");

    assert!(!selector.is_open());
    assert_eq!(store.current_workspace().map(|w| w.id.as_str()), Some("b"));
    assert_eq!(*nav.paths.lock().unwrap(), ["/"]);
  }

  #[test]
  fn test_header_falls_back_without_active_org() {
    let selector = WorkspaceSelector::default();

    let header = selector.header(None);
    assert_eq!(header.label, SELECT_WORKSPACE_LABEL);
    assert_eq!(header.initial, DEFAULT_INITIAL);

    let org = Organization { id: "org_1".into(), name: "Acme".into(), image_url: None };
    let header = selector.header(Some(&org));
    assert_eq!(header.label, "Acme");
    assert_eq!(header.initial, "A");
  }

  #[test]
  fn test_pointer_down_outside_closes_panel() {
    let mut selector = WorkspaceSelector::new(panel());
    selector.toggle();

    selector.on_pointer_down(Point { x: 50.0, y: 50.0 });
    assert!(selector.is_open());

    selector.on_pointer_down(Point { x: 500.0, y: 50.0 });
    assert!(!selector.is_open());
  }

  #[tokio::test]
  async fn test_create_workspace_requires_loaded_auth() {
    let ui = Recorder { answer: Some("Roadmap".into()), ..Default::default() };
    let orgs = FakeOrgs::default();

    let created = WorkspaceSelector::default().create_workspace(&orgs, &ui, &ui).await.unwrap();

    assert!(created.is_none());
    assert_eq!(*ui.alerts.lock().unwrap(), [AUTH_NOT_READY]);
    assert!(orgs.created.lock().unwrap().is_empty());
  }

  #[tokio::test]
  async fn test_create_workspace_rejects_short_names() {
    let orgs = FakeOrgs { loaded: true, ..Default::default() };

    for answer in [None, Some("  ab  ".to_string())] {
      let ui = Recorder { answer, ..Default::default() };
      let created = WorkspaceSelector::default().create_workspace(&orgs, &ui, &ui).await.unwrap();

      assert!(created.is_none());
      assert_eq!(*ui.alerts.lock().unwrap(), [NAME_TOO_SHORT]);
    }
    assert!(orgs.created.lock().unwrap().is_empty());
  }

  #[tokio::test]
  async fn test_create_workspace_measures_names_in_utf16_units() {
    let orgs = FakeOrgs { loaded: true, ..Default::default() };

    let ui = Recorder { answer: Some("a\u{1F680}".into()), ..Default::default() };
    let created = WorkspaceSelector::default().create_workspace(&orgs, &ui, &ui).await.unwrap();
    assert!(created.is_some());
    assert!(ui.alerts.lock().unwrap().is_empty());

    let ui = Recorder { answer: Some("\u{e9}\u{e9}".into()), ..Default::default() };
    let created = WorkspaceSelector::default().create_workspace(&orgs, &ui, &ui).await.unwrap();
    assert!(created.is_none());
    assert_eq!(*ui.alerts.lock().unwrap(), [NAME_TOO_SHORT]);
  }

  #[tokio::test]
  async fn test_create_workspace_trims_name_and_activates() {
    let ui = Recorder { answer: Some("  Roadmap  ".into()), ..Default::default() };
    let orgs = FakeOrgs { loaded: true, ..Default::default() };

    let created = WorkspaceSelector::default().create_workspace(&orgs, &ui, &ui).await.unwrap();

    assert_eq!(created.map(|o| o.id), Some("org_new".to_string()));
    let (name, slug) = orgs.created.lock().unwrap()[0].clone();
    assert_eq!(name, "Roadmap");
    assert!(slug.starts_with("ws-"));
    assert!(slug["ws-".len()..].parse::<i64>().is_ok());
    assert_eq!(orgs.active.lock().unwrap().as_deref(), Some("org_new"));
    assert_eq!(*ui.paths.lock().unwrap(), ["/"]);
  }

  #[tokio::test]
  async fn test_create_workspace_propagates_identity_errors() {
    let ui = Recorder { answer: Some("Roadmap".into()), ..Default::default() };
    let orgs = FakeOrgs { loaded: true, fail: true, ..Default::default() };

    let result = WorkspaceSelector::default().create_workspace(&orgs, &ui, &ui).await;

    assert!(matches!(result, Err(ClientError::Identity(_))));
    assert!(ui.paths.lock().unwrap().is_empty());
  }
}
