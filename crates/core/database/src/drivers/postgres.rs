use std::ops::Deref;

use planboard_result::{DBError, ErrorType};
use sqlx::{Pool, Postgres as PostgresClient};

/// Postgres implementation
#[derive(Debug)]
pub struct PostgresDb(pub Pool<PostgresClient>);

impl Deref for PostgresDb {
  type Target = Pool<PostgresClient>;

  fn deref(&self) -> &Self::Target {
    &self.0
  }
}

impl PostgresDb {
  pub fn db(&self) -> &Pool<PostgresClient> {
    &self.0
  }

  /// Apply the embedded schema migrations
  pub async fn migrate(&self) -> Result<(), String> {
    sqlx::migrate!("./migrations")
      .run(self.db())
      .await
      .map_err(|e| format!("Failed to run PostgreSQL migrations: {}", e))
  }
}

/// Maps a sqlx failure into a `DBError`, classifying unique violations so
/// callers can tell duplicates from other failures.
pub(crate) fn sqlx_error(err: sqlx::Error, path: &str, fallback: ErrorType, msg: &str) -> DBError {
  let err_type = match err.as_database_error() {
    Some(db_err) if db_err.is_unique_violation() => ErrorType::ResourceExists,
    _ => fallback,
  };

  DBError { err_type, msg: format!("{}: {}", msg, err), path: path.to_string(), err: Box::new(err) }
}
