//! Behavioural tests for the user registry.
//!
//! Scenarios drive the registry service over a real JSON file store in a
//! temporary directory, covering creation, lookup, update, deletion and the
//! store failure modes.

use std::collections::HashSet;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenario, then, when};
use tempfile::TempDir;
use user_registry::domain::ports::{UserSubmission, UsersCommand, UsersQuery};
use user_registry::domain::{Error, User, UserId, UserRegistryService};
use user_registry::outbound::persistence::JsonFileUserStore;

type Registry = UserRegistryService<JsonFileUserStore>;

const MALFORMED_STORE: &str = "[{\"id\": 1, \"name\": ";

/// Test world holding the registry under test and the latest outcome.
#[derive(Default, ScenarioState)]
struct World {
    dir: Slot<Arc<TempDir>>,
    registry: Slot<Arc<Registry>>,
    user: Slot<User>,
    failure: Slot<Error>,
    listed: Slot<Vec<User>>,
}

impl World {
    fn store_path(&self) -> PathBuf {
        self.dir
            .get()
            .expect("store directory should be set")
            .path()
            .join("users.json")
    }

    fn open_registry(&self) {
        let dir = Arc::new(tempfile::tempdir().expect("temp dir"));
        self.dir.set(dir);
        let store = JsonFileUserStore::open(self.store_path()).expect("open store");
        self.registry.set(Arc::new(UserRegistryService::new(store)));
    }

    fn registry(&self) -> Arc<Registry> {
        self.registry.get().expect("registry should be set")
    }

    fn record(&self, result: Result<User, Error>) {
        match result {
            Ok(user) => self.user.set(user),
            Err(err) => self.failure.set(err),
        }
    }

    fn user(&self) -> User {
        self.user.get().expect("a user should have been returned")
    }
}

fn block_on<F: Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("tokio runtime")
        .block_on(future)
}

fn submission(name: &str, email: &str, role: &str) -> UserSubmission {
    UserSubmission {
        name: name.to_owned(),
        email: email.to_owned(),
        role: role.to_owned(),
    }
}

#[fixture]
fn world() -> World {
    World::default()
}

// ============================================================================
// Given steps
// ============================================================================

#[given("an empty user store")]
fn an_empty_user_store(world: &World) {
    world.open_registry();
}

#[given("a store holding user {id:u64} with email {email}")]
fn a_store_holding_user(world: &World, id: u64, email: String) {
    world.open_registry();
    let registry = world.registry();
    let created = block_on(async move {
        registry
            .create_user(submission("Ann", &email, "admin"))
            .await
    })
    .expect("seed user");
    assert_eq!(created.id(), UserId::new(id), "seeded ids start at 1");
}

#[given("a store file holding malformed JSON")]
fn a_store_file_holding_malformed_json(world: &World) {
    world.open_registry();
    std::fs::write(world.store_path(), MALFORMED_STORE).expect("write malformed store");
}

// ============================================================================
// When steps
// ============================================================================

#[when("a user named {name} with email {email} and role {role} is created")]
fn a_user_is_created(world: &World, name: String, email: String, role: String) {
    let registry = world.registry();
    let result = block_on(async move {
        registry
            .create_user(submission(&name, &email, &role))
            .await
    });
    world.record(result);
}

#[when("a user with an empty name and email {email} is created")]
fn a_user_with_an_empty_name_is_created(world: &World, email: String) {
    let registry = world.registry();
    let result = block_on(async move { registry.create_user(submission("", &email, "user")).await });
    world.record(result);
}

#[when("user {id:u64} is renamed to {name}")]
fn user_is_renamed(world: &World, id: u64, name: String) {
    let registry = world.registry();
    let result = block_on(async move {
        let current = registry.find_user(UserId::new(id)).await?;
        registry
            .update_user(
                current.id(),
                submission(&name, current.email(), current.role()),
            )
            .await
    });
    world.record(result);
}

#[when("user {id:u64} is fetched")]
fn user_is_fetched(world: &World, id: u64) {
    let registry = world.registry();
    let result = block_on(async move { registry.find_user(UserId::new(id)).await });
    world.record(result);
}

#[when("user {id:u64} is deleted")]
fn user_is_deleted(world: &World, id: u64) {
    let registry = world.registry();
    block_on(async move { registry.delete_user(UserId::new(id)).await }).expect("delete user");
}

#[when("{count:usize} users are created concurrently")]
fn users_are_created_concurrently(world: &World, count: usize) {
    let registry = world.registry();
    block_on(async move {
        let handles: Vec<_> = (0..count)
            .map(|index| {
                let registry = Arc::clone(&registry);
                tokio::spawn(async move {
                    registry
                        .create_user(submission(
                            &format!("User {index}"),
                            &format!("user{index}@example.com"),
                            "user",
                        ))
                        .await
                })
            })
            .collect();
        for joined in futures::future::join_all(handles).await {
            joined.expect("task joins").expect("create succeeds");
        }
    });
}

#[when("the users are listed")]
fn the_users_are_listed(world: &World) {
    let registry = world.registry();
    match block_on(async move { registry.list_users().await }) {
        Ok(users) => world.listed.set(users),
        Err(err) => world.failure.set(err),
    }
}

// ============================================================================
// Then steps
// ============================================================================

#[then("the created user has id {id:u64}")]
fn the_created_user_has_id(world: &World, id: u64) {
    assert_eq!(world.user().id(), UserId::new(id));
}

#[then("the created user has email {email}")]
fn the_created_user_has_email(world: &World, email: String) {
    assert_eq!(world.user().email(), email);
}

#[then("the updated user has id {id:u64} and name {name}")]
fn the_updated_user_has_id_and_name(world: &World, id: u64, name: String) {
    let user = world.user();
    assert_eq!(user.id(), UserId::new(id));
    assert_eq!(user.name(), name);
}

#[then("the request fails with {code}")]
fn the_request_fails_with(world: &World, code: String) {
    let failure = world.failure.get().expect("the request should have failed");
    assert_eq!(failure.detail_code(), Some(code.as_str()), "{failure:?}");
}

#[then("the store lists {count:usize} users")]
fn the_store_lists_users(world: &World, count: usize) {
    let registry = world.registry();
    let users = block_on(async move { registry.list_users().await }).expect("list users");
    assert_eq!(users.len(), count);
    world.listed.set(users);
}

#[then("every stored id is distinct")]
fn every_stored_id_is_distinct(world: &World) {
    let users = world.listed.get().expect("users should be listed");
    let ids: HashSet<UserId> = users.iter().map(User::id).collect();
    assert_eq!(ids.len(), users.len());
}

#[then("the store file is unchanged")]
fn the_store_file_is_unchanged(world: &World) {
    let contents = std::fs::read_to_string(world.store_path()).expect("read store file");
    assert_eq!(contents, MALFORMED_STORE);
}

// ============================================================================
// Scenarios
// ============================================================================

#[scenario(
    path = "tests/features/user_registry.feature",
    name = "Creating the first user normalises the email"
)]
fn creating_the_first_user_normalises_the_email(world: World) {
    let _ = world;
}

#[scenario(
    path = "tests/features/user_registry.feature",
    name = "Duplicate emails are rejected ignoring case"
)]
fn duplicate_emails_are_rejected_ignoring_case(world: World) {
    let _ = world;
}

#[scenario(
    path = "tests/features/user_registry.feature",
    name = "Updating a user keeps its identifier"
)]
fn updating_a_user_keeps_its_identifier(world: World) {
    let _ = world;
}

#[scenario(
    path = "tests/features/user_registry.feature",
    name = "Fetching an unknown user fails"
)]
fn fetching_an_unknown_user_fails(world: World) {
    let _ = world;
}

#[scenario(
    path = "tests/features/user_registry.feature",
    name = "Deleted users are gone"
)]
fn deleted_users_are_gone(world: World) {
    let _ = world;
}

#[scenario(
    path = "tests/features/user_registry.feature",
    name = "An empty name is a missing field"
)]
fn an_empty_name_is_a_missing_field(world: World) {
    let _ = world;
}

#[scenario(
    path = "tests/features/user_registry.feature",
    name = "Concurrent creates receive distinct identifiers"
)]
fn concurrent_creates_receive_distinct_identifiers(world: World) {
    let _ = world;
}

#[scenario(
    path = "tests/features/user_registry.feature",
    name = "A corrupt store file is reported rather than emptied"
)]
fn a_corrupt_store_file_is_reported_rather_than_emptied(world: World) {
    let _ = world;
}
