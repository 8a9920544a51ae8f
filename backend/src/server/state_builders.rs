//! Builders wiring domain services to Diesel or in-memory adapters.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use schedule_backend::domain::ports::{
    FixtureStoreHealth, PlaceholderScheduleOptions, ResourceScheduleRepository,
    SavedScheduleRepository, StoreHealth, UserRepository,
};
use schedule_backend::domain::{
    AccountService, SavedScheduleService, ScheduleQueryService, SessionTokenService,
};
use schedule_backend::inbound::http::state::{HttpState, HttpStatePorts};
use schedule_backend::outbound::Argon2PasswordHasher;
use schedule_backend::outbound::memory::{
    InMemoryResourceScheduleRepository, InMemorySavedScheduleRepository, InMemoryUserRepository,
};
use schedule_backend::outbound::persistence::{
    DbPool, DieselResourceScheduleRepository, DieselSavedScheduleRepository, DieselStoreHealth,
    DieselUserRepository,
};

use super::ServerConfig;

/// Repositories behind the HTTP ports.
struct Stores<U, R, S> {
    users: Arc<U>,
    snapshots: Arc<R>,
    saved: Arc<S>,
    health: Arc<dyn StoreHealth>,
}

fn diesel_stores(
    pool: &DbPool,
) -> Stores<DieselUserRepository, DieselResourceScheduleRepository, DieselSavedScheduleRepository>
{
    Stores {
        users: Arc::new(DieselUserRepository::new(pool.clone())),
        snapshots: Arc::new(DieselResourceScheduleRepository::new(pool.clone())),
        saved: Arc::new(DieselSavedScheduleRepository::new(pool.clone())),
        health: Arc::new(DieselStoreHealth::new(pool.clone())),
    }
}

fn memory_stores() -> Stores<
    InMemoryUserRepository,
    InMemoryResourceScheduleRepository,
    InMemorySavedScheduleRepository,
> {
    Stores {
        users: Arc::new(InMemoryUserRepository::new()),
        snapshots: Arc::new(InMemoryResourceScheduleRepository::new()),
        saved: Arc::new(InMemorySavedScheduleRepository::new()),
        health: Arc::new(FixtureStoreHealth),
    }
}

fn ports_for<U, R, S>(
    stores: Stores<U, R, S>,
    tokens: &SessionTokenService,
    clock: Arc<dyn Clock>,
) -> HttpStatePorts
where
    U: UserRepository + 'static,
    R: ResourceScheduleRepository + 'static,
    S: SavedScheduleRepository + 'static,
{
    let accounts = Arc::new(AccountService::new(
        stores.users,
        Arc::new(Argon2PasswordHasher::new()),
        tokens.clone(),
        clock.clone(),
    ));
    HttpStatePorts {
        accounts: accounts.clone(),
        users: accounts,
        schedules: Arc::new(ScheduleQueryService::new(stores.snapshots)),
        saved_schedules: Arc::new(SavedScheduleService::new(stores.saved, clock)),
        options: Arc::new(PlaceholderScheduleOptions),
        store_health: stores.health,
    }
}

/// Build the shared HTTP state, backed by PostgreSQL when a pool is configured.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let tokens = SessionTokenService::new(&config.token_key, clock.clone());
    let ports = match &config.db_pool {
        Some(pool) => ports_for(diesel_stores(pool), &tokens, clock),
        None => ports_for(memory_stores(), &tokens, clock),
    };
    web::Data::new(HttpState::new(ports, tokens))
}
