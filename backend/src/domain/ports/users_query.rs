//! Driving port for read-only user lookups.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId};

/// Read-only access to user records.
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Return every record in stored order.
    async fn list_users(&self) -> Result<Vec<User>, Error>;

    /// Return the record with `id`, or a not-found error.
    async fn find_user(&self, id: UserId) -> Result<User, Error>;
}
