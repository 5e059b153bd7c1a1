mod users;
mod workspace_members;
mod workspaces;

pub use users::*;
pub use workspace_members::*;
pub use workspaces::*;

#[cfg(feature = "postgres")]
use crate::PostgresDb;
use crate::{DatabaseSql, ReferenceSqlDb};

pub trait AbstractDatabaseSql:
  Sync + Send + UsersRepository + WorkspacesRepository + WorkspaceMembersRepository
{
}

impl AbstractDatabaseSql for ReferenceSqlDb {}

#[cfg(feature = "postgres")]
impl AbstractDatabaseSql for PostgresDb {}

impl std::ops::Deref for DatabaseSql {
  type Target = dyn AbstractDatabaseSql;

  fn deref(&self) -> &Self::Target {
    match self {
      DatabaseSql::Reference(dummy) => dummy,
      #[cfg(feature = "postgres")]
      DatabaseSql::Postgres(postgres) => postgres,
    }
  }
}
