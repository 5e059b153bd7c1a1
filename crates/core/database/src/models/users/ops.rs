mod reference;

#[cfg(feature = "postgres")]
mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use planboard_result::{Context, DBError};

use crate::{User, UserUpdate};

#[async_trait]
pub trait UsersRepository: Sync + Send {
  /// Insert a new user, fails with `ResourceExists` if the id is taken
  async fn users_create(&self, ctx: Arc<Context>, user: &User) -> Result<(), DBError>;
  /// Fetch a user by id
  async fn users_get_by_id(&self, ctx: Arc<Context>, user_id: &str) -> Result<User, DBError>;
  /// Overwrite name, image and `updated_at` of an existing user, and the
  /// email when one is given
  async fn users_update(&self, ctx: Arc<Context>, update: &UserUpdate) -> Result<(), DBError>;
  /// Delete a user, fails with `NotFound` if there is no such row
  async fn users_delete(&self, ctx: Arc<Context>, user_id: &str) -> Result<(), DBError>;
}
