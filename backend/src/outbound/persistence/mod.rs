//! File-backed persistence adapters.
//!
//! The user store keeps the whole record collection in one pretty-printed
//! JSON array. Adapters only translate between the file and domain types;
//! validation and locking belong to the domain service.
//!
//! # Example
//!
//! ```no_run
//! use user_registry::domain::ports::UserStore;
//! use user_registry::outbound::persistence::JsonFileUserStore;
//!
//! # tokio::runtime::Runtime::new().expect("runtime").block_on(async {
//! let store = JsonFileUserStore::open("data/users.json").expect("open store");
//! let users = store.load().await.expect("load users");
//! store.save(&users).await.expect("save users");
//! # });
//! ```

mod atomic_io;
mod json_file_user_store;

pub use json_file_user_store::JsonFileUserStore;
