//! User registry service: the mutation and query cycles over a [`UserStore`].
//!
//! Every operation reloads the full record set from the store. Writes hold
//! the exclusive side of a reader/writer lock across load, validate, apply
//! and save, so concurrent writers cannot allocate the same id or drop each
//! other's changes. Reads hold the shared side and observe whole snapshots.
//!
//! Write cycles run on their own task. A caller that stops waiting (client
//! disconnect, timeout, shutdown) does not cut the cycle short, so the lock
//! is only released once the save has landed.

mod rules;

pub use rules::{next_user_id, validate_unique_email};

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::RwLock;
use tracing::{error, info};

use crate::domain::ports::{UserStore, UserStoreError, UserSubmission, UsersCommand, UsersQuery};
use crate::domain::{Error, TraceId, User, UserDraft, UserId, UserValidationError};

const USER_NOT_FOUND: &str = "User not found";

impl From<UserValidationError> for Error {
    fn from(err: UserValidationError) -> Self {
        let details = match &err {
            UserValidationError::MissingField { field } => {
                json!({ "field": field.as_str(), "code": "missing_field" })
            }
            UserValidationError::InvalidEmailFormat => {
                json!({ "field": "email", "code": "invalid_format" })
            }
            UserValidationError::DuplicateEmail => {
                json!({ "field": "email", "code": "duplicate_email" })
            }
        };
        Error::invalid_request(err.to_string()).with_details(details)
    }
}

fn user_not_found(id: UserId) -> Error {
    Error::not_found(USER_NOT_FOUND).with_details(json!({ "id": id.get(), "code": "not_found" }))
}

fn persistence_failure(err: &UserStoreError, message: &'static str) -> Error {
    error!(error = %err, outcome = message, "user store operation failed");
    Error::persistence_failure(message).with_details(json!({ "code": "persistence_failure" }))
}

/// Registry service implementing [`UsersQuery`] and [`UsersCommand`].
///
/// One instance must own a given store; the lock that serialises writers is
/// local to the instance.
///
/// # Examples
/// ```no_run
/// use std::sync::Arc;
///
/// use user_registry::domain::UserRegistryService;
/// use user_registry::outbound::persistence::JsonFileUserStore;
///
/// let store = JsonFileUserStore::open("data/users.json").expect("open store");
/// let registry = Arc::new(UserRegistryService::new(store));
/// ```
#[derive(Debug)]
pub struct UserRegistryService<S> {
    registry: Arc<Registry<S>>,
}

#[derive(Debug)]
struct Registry<S> {
    store: S,
    lock: RwLock<()>,
}

impl<S> UserRegistryService<S>
where
    S: UserStore + 'static,
{
    /// Wrap `store` behind the registry's mutual-exclusion boundary.
    pub fn new(store: S) -> Self {
        Self {
            registry: Arc::new(Registry {
                store,
                lock: RwLock::new(()),
            }),
        }
    }

    /// Run one write cycle to completion on a spawned task.
    ///
    /// The caller's trace id is carried into the task so errors raised by
    /// the cycle still correlate with the request.
    async fn run_write_cycle<T, F, Fut>(&self, cycle: F) -> Result<T, Error>
    where
        F: FnOnce(Arc<Registry<S>>) -> Fut,
        Fut: Future<Output = Result<T, Error>> + Send + 'static,
        T: Send + 'static,
    {
        let cycle = cycle(Arc::clone(&self.registry));
        let handle = match TraceId::current() {
            Some(trace_id) => tokio::spawn(TraceId::scope(trace_id, cycle)),
            None => tokio::spawn(cycle),
        };
        handle.await.map_err(|err| {
            error!(error = %err, "user write cycle did not complete");
            Error::internal("user write cycle did not complete")
        })?
    }
}

impl<S> Registry<S>
where
    S: UserStore,
{
    async fn load(&self) -> Result<Vec<User>, Error> {
        self.store
            .load()
            .await
            .map_err(|err| persistence_failure(&err, "Failed to read users"))
    }

    async fn save(&self, users: &[User], message: &'static str) -> Result<(), Error> {
        self.store
            .save(users)
            .await
            .map_err(|err| persistence_failure(&err, message))
    }

    async fn create(&self, submission: UserSubmission) -> Result<User, Error> {
        let _guard = self.lock.write().await;
        let mut users = self.load().await?;
        let draft = draft_from(&submission)?;
        validate_unique_email(draft.email(), &users, None)?;

        let id = next_user_id(&users).ok_or_else(|| {
            error!(count = users.len(), "user id space exhausted");
            Error::internal("user id space exhausted")
        })?;
        if users.iter().any(|user| user.id() == id) {
            error!(user_id = %id, "allocated user id already present");
            return Err(Error::internal("allocated user id already present"));
        }

        let user = User::new(id, draft);
        users.push(user.clone());
        self.save(&users, "Failed to save user").await?;
        info!(user_id = %id, "user created");
        Ok(user)
    }

    async fn update(&self, id: UserId, submission: UserSubmission) -> Result<User, Error> {
        let _guard = self.lock.write().await;
        let mut users = self.load().await?;
        if !users.iter().any(|user| user.id() == id) {
            return Err(user_not_found(id));
        }
        let draft = draft_from(&submission)?;
        validate_unique_email(draft.email(), &users, Some(id))?;

        let user = User::new(id, draft);
        let Some(slot) = users.iter_mut().find(|existing| existing.id() == id) else {
            return Err(user_not_found(id));
        };
        *slot = user.clone();
        self.save(&users, "Failed to update user").await?;
        info!(user_id = %id, "user updated");
        Ok(user)
    }

    async fn delete(&self, id: UserId) -> Result<(), Error> {
        let _guard = self.lock.write().await;
        let mut users = self.load().await?;
        let before = users.len();
        users.retain(|user| user.id() != id);
        if users.len() == before {
            return Err(user_not_found(id));
        }
        self.save(&users, "Failed to delete user").await?;
        info!(user_id = %id, "user deleted");
        Ok(())
    }
}

fn draft_from(submission: &UserSubmission) -> Result<UserDraft, Error> {
    UserDraft::try_from_parts(&submission.name, &submission.email, &submission.role)
        .map_err(Error::from)
}

#[async_trait]
impl<S> UsersQuery for UserRegistryService<S>
where
    S: UserStore + 'static,
{
    async fn list_users(&self) -> Result<Vec<User>, Error> {
        let _guard = self.registry.lock.read().await;
        self.registry.load().await
    }

    async fn find_user(&self, id: UserId) -> Result<User, Error> {
        let _guard = self.registry.lock.read().await;
        self.registry
            .load()
            .await?
            .into_iter()
            .find(|user| user.id() == id)
            .ok_or_else(|| user_not_found(id))
    }
}

#[async_trait]
impl<S> UsersCommand for UserRegistryService<S>
where
    S: UserStore + 'static,
{
    async fn create_user(&self, submission: UserSubmission) -> Result<User, Error> {
        self.run_write_cycle(move |registry| async move { registry.create(submission).await })
            .await
    }

    async fn update_user(&self, id: UserId, submission: UserSubmission) -> Result<User, Error> {
        self.run_write_cycle(move |registry| async move { registry.update(id, submission).await })
            .await
    }

    async fn delete_user(&self, id: UserId) -> Result<(), Error> {
        self.run_write_cycle(move |registry| async move { registry.delete(id).await })
            .await
    }
}
