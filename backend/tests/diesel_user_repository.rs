//! Integration tests for `DieselUserRepository` against embedded PostgreSQL.

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use rstest::{fixture, rstest};
use tokio::runtime::Runtime;

use schedule_backend::domain::ports::{UserPersistenceError, UserRepository};
use schedule_backend::domain::{PasswordDigest, User, UserId, Username};
use schedule_backend::outbound::persistence::DieselUserRepository;

mod support;

use support::{TestDatabase, handle_cluster_setup_failure, provision_test_database};

struct Harness {
    repository: DieselUserRepository,
    _database: TestDatabase,
    runtime: Runtime,
}

fn setup() -> Result<Harness, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let database = provision_test_database(&runtime)?;
    Ok(Harness {
        repository: DieselUserRepository::new(database.pool.clone()),
        _database: database,
        runtime,
    })
}

#[fixture]
fn harness() -> Option<Harness> {
    match setup() {
        Ok(harness) => Some(harness),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

#[fixture]
fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 6, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

fn username(name: &str) -> Username {
    Username::new(name).expect("valid username")
}

fn user(name: &str, created_at: DateTime<Utc>) -> User {
    User::new(
        UserId::random(),
        username(name),
        PasswordDigest::new(format!("digest-of-{name}")).expect("valid digest"),
        created_at,
    )
}

#[rstest]
fn inserted_users_round_trip(harness: Option<Harness>, t0: DateTime<Utc>) {
    let Some(harness) = harness else { return };
    let alice = user("alice", t0);

    harness
        .runtime
        .block_on(harness.repository.insert(&alice))
        .expect("insert succeeds");
    let found = harness
        .runtime
        .block_on(harness.repository.find_by_username(&username("alice")))
        .expect("lookup succeeds");

    assert_eq!(found, Some(alice));
}

#[rstest]
fn usernames_are_case_sensitive(harness: Option<Harness>, t0: DateTime<Utc>) {
    let Some(harness) = harness else { return };
    harness
        .runtime
        .block_on(harness.repository.insert(&user("R1", t0)))
        .expect("insert succeeds");

    let found = harness
        .runtime
        .block_on(harness.repository.find_by_username(&username("r1")))
        .expect("lookup succeeds");

    assert!(found.is_none());
}

#[rstest]
fn duplicate_usernames_are_reported(harness: Option<Harness>, t0: DateTime<Utc>) {
    let Some(harness) = harness else { return };
    harness
        .runtime
        .block_on(harness.repository.insert(&user("alice", t0)))
        .expect("first insert succeeds");

    let err = harness
        .runtime
        .block_on(harness.repository.insert(&user("alice", t0)))
        .expect_err("second insert fails");

    assert!(
        matches!(err, UserPersistenceError::DuplicateUsername { ref username } if username == "alice"),
        "unexpected error: {err:?}"
    );
}

#[rstest]
fn list_orders_by_creation_then_delete_removes(harness: Option<Harness>, t0: DateTime<Utc>) {
    let Some(harness) = harness else { return };
    for (name, offset) in [("carol", 2), ("alice", 0), ("bob", 1)] {
        harness
            .runtime
            .block_on(
                harness
                    .repository
                    .insert(&user(name, t0 + TimeDelta::minutes(offset))),
            )
            .expect("insert succeeds");
    }

    let names = |harness: &Harness| -> Vec<String> {
        harness
            .runtime
            .block_on(harness.repository.list())
            .expect("list succeeds")
            .iter()
            .map(|user| user.username().as_str().to_owned())
            .collect()
    };
    assert_eq!(names(&harness), vec!["alice", "bob", "carol"]);

    let removed = harness
        .runtime
        .block_on(harness.repository.delete_by_username(&username("bob")))
        .expect("delete succeeds");
    let removed_again = harness
        .runtime
        .block_on(harness.repository.delete_by_username(&username("bob")))
        .expect("delete succeeds");

    assert!(removed);
    assert!(!removed_again);
    assert_eq!(names(&harness), vec!["alice", "carol"]);
}
