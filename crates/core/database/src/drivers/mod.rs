use std::future::Future;
use std::pin::Pin;

pub use self::reference::*;

mod reference;

#[cfg(feature = "postgres")]
pub use self::postgres::*;
#[cfg(feature = "postgres")]
mod postgres;

use planboard_config::config;

pub enum DatabaseInfoSql {
  /// Auto-detect the database in use
  Auto,
  /// Auto-detect the database in use and create an empty testing database
  Test(String),
  /// Use the mock database
  Reference,
  /// Connect to Postgres
  #[cfg(feature = "postgres")]
  Postgres { dsn: String },
}

/// Database
#[derive(Debug)]
pub enum DatabaseSql {
  /// Mock database
  Reference(ReferenceSqlDb),
  /// Postgres database
  #[cfg(feature = "postgres")]
  Postgres(PostgresDb),
}

// Generic helper type alias and function
type BoxedFuture<T> = Pin<Box<dyn Future<Output = Result<T, String>>>>;

fn boxed<T>(f: impl Future<Output = Result<T, String>> + 'static) -> BoxedFuture<T> {
  Box::pin(f)
}

impl DatabaseInfoSql {
  /// Create a database client from the given database information
  pub async fn connect(self) -> Result<DatabaseSql, String> {
    match self {
      DatabaseInfoSql::Auto => {
        let config = config().await;
        if std::env::var("TEST_DB_SQL").is_ok() {
          boxed(DatabaseInfoSql::Test(config.database.postgres).connect()).await
        } else if config.database.postgres.is_empty() {
          boxed(DatabaseInfoSql::Reference.connect()).await
        } else {
          #[cfg(feature = "postgres")]
          {
            boxed(DatabaseInfoSql::Postgres { dsn: config.database.postgres }.connect()).await
          }
          #[cfg(not(feature = "postgres"))]
          {
            Err("a Postgres DSN is configured but the `postgres` feature is disabled".to_string())
          }
        }
      }
      DatabaseInfoSql::Test(dsn) => {
        let test_db = std::env::var("TEST_DB_SQL").map_err(|_| {
          "`TEST_DB_SQL` environment variable should be set to REFERENCE or POSTGRES".to_string()
        })?;

        match test_db.as_str() {
          "REFERENCE" => boxed(DatabaseInfoSql::Reference.connect()).await,
          #[cfg(feature = "postgres")]
          "POSTGRES" => boxed(DatabaseInfoSql::Postgres { dsn }.connect()).await,
          other => {
            let _ = dsn;
            Err(format!("unsupported TEST_DB_SQL value: {}", other))
          }
        }
      }
      #[cfg(feature = "postgres")]
      DatabaseInfoSql::Postgres { dsn } => {
        use std::time::Duration;

        use sqlx::postgres::PgPoolOptions;

        let pool = PgPoolOptions::new()
          .max_connections(10)
          .min_connections(2)
          .max_lifetime(Duration::from_millis(600000))
          .idle_timeout(Duration::from_millis(120000))
          .connect(&dsn)
          .await
          .map_err(|e| format!("Failed to connect to PostgreSQL: {}", e))?;

        sqlx::query("SELECT 1")
          .execute(&pool)
          .await
          .map_err(|e| format!("Failed to verify PostgreSQL connection: {}", e))?;

        let db = PostgresDb(pool);
        db.migrate().await?;

        Ok(DatabaseSql::Postgres(db))
      }
      DatabaseInfoSql::Reference => Ok(DatabaseSql::Reference(Default::default())),
    }
  }
}
