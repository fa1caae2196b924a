//! Driven port for the durable user record store.
//!
//! The store treats the full record collection as one opaque unit: `load`
//! returns every record and `save` replaces every record. Callers own any
//! locking needed to make a load-mutate-save cycle atomic.

use async_trait::async_trait;

use crate::domain::User;

use super::define_port_error;

define_port_error! {
    /// Failures raised by user store adapters.
    pub enum UserStoreError {
        /// The backing resource exists but could not be read.
        Read { message: String } => "user store read failed: {message}",
        /// The backing resource was read but does not hold a record array.
        Corrupt { message: String } => "user store contents are malformed: {message}",
        /// The record set could not be written back.
        Write { message: String } => "user store write failed: {message}",
    }
}

/// Load and persist the full user record collection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Return every stored record in stored order.
    ///
    /// A store that has never been written yields an empty collection.
    async fn load(&self) -> Result<Vec<User>, UserStoreError>;

    /// Replace the stored collection with `users`.
    ///
    /// Adapters may finish the write after the returned future is dropped.
    async fn save(&self, users: &[User]) -> Result<(), UserStoreError>;
}
