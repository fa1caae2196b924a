//! Driving port for user mutations.
//!
//! Each call runs one full load-validate-apply-save cycle against the store.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId};

/// Raw field values submitted for a create or update.
///
/// Nothing is validated yet; absent fields arrive as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserSubmission {
    /// Submitted display name.
    pub name: String,
    /// Submitted email address.
    pub email: String,
    /// Submitted role label.
    pub role: String,
}

/// Write access to user records.
#[async_trait]
pub trait UsersCommand: Send + Sync {
    /// Validate `submission`, allocate an id and persist the new record.
    async fn create_user(&self, submission: UserSubmission) -> Result<User, Error>;

    /// Replace every field except the id of the record identified by `id`.
    async fn update_user(&self, id: UserId, submission: UserSubmission) -> Result<User, Error>;

    /// Remove the record identified by `id`.
    async fn delete_user(&self, id: UserId) -> Result<(), Error>;
}
