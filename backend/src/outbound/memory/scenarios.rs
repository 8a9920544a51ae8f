//! In-memory `ScenarioRepository`.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::Scenario;
use crate::domain::ports::{ScenarioRepository, ScenarioRepositoryError};

use super::lock;

#[derive(Debug, Default)]
pub struct InMemoryScenarioRepository {
    scenarios: Mutex<HashMap<String, Scenario>>,
}

impl InMemoryScenarioRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ScenarioRepository for InMemoryScenarioRepository {
    async fn insert(&self, scenario: &Scenario) -> Result<(), ScenarioRepositoryError> {
        let mut scenarios = lock(&self.scenarios);
        if scenarios.contains_key(scenario.name()) {
            return Err(ScenarioRepositoryError::conflict(scenario.name()));
        }
        scenarios.insert(scenario.name().to_owned(), scenario.clone());
        Ok(())
    }

    async fn replace(&self, scenario: &Scenario) -> Result<(), ScenarioRepositoryError> {
        lock(&self.scenarios).insert(scenario.name().to_owned(), scenario.clone());
        Ok(())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Scenario>, ScenarioRepositoryError> {
        Ok(lock(&self.scenarios).get(name).cloned())
    }
}
