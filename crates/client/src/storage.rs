use std::{
  collections::HashMap,
  fs,
  io::{ErrorKind, Write},
  path::{Path, PathBuf},
  sync::{Mutex, MutexGuard},
};

use tempfile::NamedTempFile;

use crate::ClientError;

/// Storage key holding the id of the last selected workspace
pub const CURRENT_WORKSPACE_KEY: &str = "currentWorkspaceId";

/// Small string key/value store that outlives the process, the way browser
/// local storage does.
pub trait DurableStorage: Send + Sync {
  fn get_item(&self, key: &str) -> Result<Option<String>, ClientError>;
  fn set_item(&self, key: &str, value: &str) -> Result<(), ClientError>;
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
  mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
  items: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
  pub fn new() -> Self {
    Self::default()
  }
}

impl DurableStorage for MemoryStorage {
  fn get_item(&self, key: &str) -> Result<Option<String>, ClientError> {
    Ok(lock(&self.items).get(key).cloned())
  }

  fn set_item(&self, key: &str, value: &str) -> Result<(), ClientError> {
    lock(&self.items).insert(key.to_string(), value.to_string());
    Ok(())
  }
}

/// Stores every item in a single JSON object file. A missing file reads as
/// empty. Writes go to a temp file in the same directory which is then
/// renamed over the target, so readers see either the old or the new map.
#[derive(Debug)]
pub struct FileStorage {
  path: PathBuf,
  write_lock: Mutex<()>,
}

impl FileStorage {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into(), write_lock: Mutex::new(()) }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  fn load(&self) -> Result<HashMap<String, String>, ClientError> {
    match fs::read(&self.path) {
      Ok(bytes) if bytes.is_empty() => Ok(HashMap::new()),
      Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
      Err(err) if err.kind() == ErrorKind::NotFound => Ok(HashMap::new()),
      Err(err) => Err(err.into()),
    }
  }

  /// Write `bytes` to a temp file next to the target, not yet visible to readers
  fn stage(&self, bytes: &[u8]) -> Result<NamedTempFile, ClientError> {
    let parent = match self.path.parent() {
      Some(p) if !p.as_os_str().is_empty() => p,
      _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut staged = NamedTempFile::new_in(parent)?;
    staged.write_all(bytes)?;
    staged.as_file().sync_all()?;
    Ok(staged)
  }
}

impl DurableStorage for FileStorage {
  fn get_item(&self, key: &str) -> Result<Option<String>, ClientError> {
    Ok(self.load()?.remove(key))
  }

  fn set_item(&self, key: &str, value: &str) -> Result<(), ClientError> {
    let _guard = lock(&self.write_lock);

    let mut items = self.load()?;
    items.insert(key.to_string(), value.to_string());

    let staged = self.stage(&serde_json::to_vec_pretty(&items)?)?;
    staged.persist(&self.path).map_err(|err| err.error)?;
    Ok(())
  }
}
