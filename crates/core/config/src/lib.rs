use std::time::Duration;
use std::{env, fs};

use cached::proc_macro::cached;
use futures_locks::RwLock;
use once_cell::sync::Lazy;
use serde::Deserialize;
use tracing::warn;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;

#[cfg(feature = "sentry")]
pub use sentry::{capture_error, capture_message, Level};

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Database {
  pub postgres: String,
}

impl Default for Database {
  fn default() -> Self {
    Self { postgres: String::new() }
  }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Kafka {
  pub brokers: Vec<String>,
  pub username: Option<String>,
  pub password: Option<String>,
  pub sasl_mechanism: Option<String>,
  pub security_protocol: Option<String>,
}

impl Default for Kafka {
  fn default() -> Self {
    Self {
      brokers: vec!["localhost:9092".to_string()],
      username: None,
      password: None,
      sasl_mechanism: None,
      security_protocol: None,
    }
  }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Topics {
  /// Identity-provider lifecycle events (users, organizations, invitations)
  pub identity_events: String,
  pub identity_events_dlq: String,
}

impl Default for Topics {
  fn default() -> Self {
    Self {
      identity_events: "identity.events".to_string(),
      identity_events_dlq: "identity.events.dlq".to_string(),
    }
  }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Hosts {
  pub api: String,
  pub sync_metrics: String,
}

impl Default for Hosts {
  fn default() -> Self {
    Self {
      api: "http://localhost:5000".to_string(),
      sync_metrics: "0.0.0.0:9102".to_string(),
    }
  }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct SyncWorker {
  pub consumer_group: String,
  /// How long a dead-letter publish may block the consume loop
  pub dlq_timeout_ms: u64,
}

impl Default for SyncWorker {
  fn default() -> Self {
    Self { consumer_group: "planboard-sync-worker".to_string(), dlq_timeout_ms: 1000 }
  }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Sentry {
  pub sync_worker: String,
}

impl Default for Sentry {
  fn default() -> Self {
    Self { sync_worker: String::new() }
  }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Settings {
  pub database: Database,
  pub kafka: Kafka,
  pub topics: Topics,
  pub hosts: Hosts,
  pub sync: SyncWorker,
  pub sentry: Sentry,
  pub production: bool,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      database: Database::default(),
      kafka: Kafka::default(),
      topics: Topics::default(),
      hosts: Hosts::default(),
      sync: SyncWorker::default(),
      sentry: Sentry::default(),
      production: false,
    }
  }
}

impl Settings {
  pub fn from_yaml(contents: &str) -> Result<Settings, serde_yaml::Error> {
    serde_yaml::from_str(contents)
  }

  pub fn preflight_checks(&self) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber =
      tracing_subscriber::registry().with(env_filter).with(tracing_subscriber::fmt::layer());

    let _guard = tracing::subscriber::set_default(subscriber);

    if self.database.postgres.is_empty() {
      warn!("No Postgres DSN specified! The sync worker will use the in-memory database.");
    }

    if self.kafka.brokers.is_empty() {
      warn!("No Kafka brokers specified! The sync worker cannot consume identity events.");
    }
  }
}

/// Configure logging and common Rust variables
#[cfg(feature = "sentry")]
pub async fn setup_logging(release: &'static str, dsn: String) -> Option<sentry::ClientInitGuard> {
  if dsn.is_empty() {
    None
  } else {
    Some(sentry::init((
      dsn,
      sentry::ClientOptions { release: Some(release.into()), ..Default::default() },
    )))
  }
}

#[cfg(feature = "sentry")]
#[macro_export]
macro_rules! configure {
  ($application: ident) => {
    let config = $crate::config().await;
    let _sentry = $crate::setup_logging(
      concat!(env!("CARGO_PKG_NAME"), "@", env!("CARGO_PKG_VERSION")),
      config.sentry.$application,
    )
    .await;
  };
}

/// Configuration builder
static CONFIG_BUILDER: Lazy<RwLock<Settings>> = Lazy::new(|| {
  RwLock::new({
    let env_mode = env::var("ENV").unwrap_or("dev".to_string());
    let path = format!("/planboard.{}.yaml", env_mode);

    match fs::read_to_string(&path) {
      Ok(contents) => Settings::from_yaml(&contents).unwrap_or_else(|err| {
        warn!("Failed to parse {}: {}. Falling back to defaults.", path, err);
        Settings::default()
      }),
      Err(_) => Settings::default(),
    }
  })
});

pub async fn read() -> Settings {
  CONFIG_BUILDER.read().await.clone()
}

#[cached(time = 300)]
pub async fn config() -> Settings {
  let mut config = read().await;

  // auto-detect production nodes
  if config.hosts.api.contains("https") {
    config.production = true;
  }

  config
}
