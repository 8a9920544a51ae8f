//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only see domain ports, so
//! they stay testable without I/O.

use std::sync::Arc;

use crate::domain::SessionTokenService;
use crate::domain::ports::{
    AccountCommand, SavedScheduleCommand, ScheduleOptions, ScheduleQuery, StoreHealth, UsersQuery,
};

/// Parameter object bundling the port implementations used by handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub accounts: Arc<dyn AccountCommand>,
    pub users: Arc<dyn UsersQuery>,
    pub schedules: Arc<dyn ScheduleQuery>,
    pub saved_schedules: Arc<dyn SavedScheduleCommand>,
    pub options: Arc<dyn ScheduleOptions>,
    pub store_health: Arc<dyn StoreHealth>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountCommand>,
    pub users: Arc<dyn UsersQuery>,
    pub schedules: Arc<dyn ScheduleQuery>,
    pub saved_schedules: Arc<dyn SavedScheduleCommand>,
    pub options: Arc<dyn ScheduleOptions>,
    pub store_health: Arc<dyn StoreHealth>,
    pub tokens: SessionTokenService,
}

impl HttpState {
    /// Construct state from the ports and the token service that gates them.
    pub fn new(ports: HttpStatePorts, tokens: SessionTokenService) -> Self {
        let HttpStatePorts {
            accounts,
            users,
            schedules,
            saved_schedules,
            options,
            store_health,
        } = ports;
        Self {
            accounts,
            users,
            schedules,
            saved_schedules,
            options,
            store_health,
            tokens,
        }
    }
}
