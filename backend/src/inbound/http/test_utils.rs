//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::web;
use chrono::{TimeZone, Utc};
use zeroize::Zeroizing;

use crate::domain::ports::{
    AccountProvisioning, FixtureStoreHealth, PlaceholderScheduleOptions, ScheduleIngestion,
    StoreHealth,
};
use crate::domain::{
    AccountService, SavedScheduleService, ScheduleIngestionService, ScheduleQueryService,
    SessionToken, SessionTokenService, TaskRecord, UserId, Username,
};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::memory::{
    InMemoryResourceScheduleRepository, InMemorySavedScheduleRepository, InMemoryUserRepository,
};
use crate::test_support::{MutableClock, PlaintextPasswordHasher, fixture_signing_key};

type TestAccounts = AccountService<InMemoryUserRepository, PlaintextPasswordHasher>;

/// In-memory wiring of every port behind [`HttpState`].
pub struct TestHarness {
    pub clock: Arc<MutableClock>,
    pub snapshots: Arc<InMemoryResourceScheduleRepository>,
    pub saved: Arc<InMemorySavedScheduleRepository>,
    accounts: Arc<TestAccounts>,
    tokens: SessionTokenService,
    store_health: Arc<dyn StoreHealth>,
}

impl TestHarness {
    pub fn new() -> Self {
        let start = Utc
            .with_ymd_and_hms(2026, 3, 2, 9, 0, 0)
            .single()
            .expect("valid start time");
        let clock = Arc::new(MutableClock::new(start));
        let tokens = SessionTokenService::new(&fixture_signing_key(), clock.clone());
        let accounts = Arc::new(AccountService::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(PlaintextPasswordHasher),
            tokens.clone(),
            clock.clone(),
        ));
        Self {
            clock,
            snapshots: Arc::new(InMemoryResourceScheduleRepository::new()),
            saved: Arc::new(InMemorySavedScheduleRepository::new()),
            accounts,
            tokens,
            store_health: Arc::new(FixtureStoreHealth),
        }
    }

    pub fn with_store_health(mut self, store_health: Arc<dyn StoreHealth>) -> Self {
        self.store_health = store_health;
        self
    }

    pub fn state(&self) -> web::Data<HttpState> {
        let ports = HttpStatePorts {
            accounts: self.accounts.clone(),
            users: self.accounts.clone(),
            schedules: Arc::new(ScheduleQueryService::new(self.snapshots.clone())),
            saved_schedules: Arc::new(SavedScheduleService::new(
                self.saved.clone(),
                self.clock.clone(),
            )),
            options: Arc::new(PlaceholderScheduleOptions),
            store_health: self.store_health.clone(),
        };
        web::Data::new(HttpState::new(ports, self.tokens.clone()))
    }

    /// Create an account the way resource provisioning does.
    pub async fn seed_user(&self, username: &str, password: &str) {
        let username = Username::new(username).expect("valid username");
        self.accounts
            .provision(vec![username], Zeroizing::new(password.to_owned()))
            .await
            .expect("provision user");
    }

    /// Token for `username` issued at the harness clock's current time.
    pub fn token_for(&self, username: &str) -> SessionToken {
        let username = Username::new(username).expect("valid username");
        self.tokens
            .issue(&UserId::random(), &username)
            .expect("issue token")
    }

    /// Run an ingestion against the harness store.
    pub async fn ingest(&self, scenario_name: &str, tasks: Vec<TaskRecord>) {
        ScheduleIngestionService::new(self.snapshots.clone(), self.clock.clone())
            .ingest(scenario_name, tasks)
            .await
            .expect("ingest tasks");
    }
}
