use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::RwLock;

use super::{Settings, SettingsStore};
use crate::error::{RagsumError, Result};

/// Keeps snapshots for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    data: RwLock<BTreeMap<String, Settings>>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> RagsumError {
    RagsumError::Config(format!("settings lock poisoned: {}", e))
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn load(&self, name: &str) -> Result<Option<Settings>> {
        let data = self.data.read().map_err(poisoned)?;
        Ok(data.get(name).cloned())
    }

    async fn save(&self, name: &str, settings: &Settings) -> Result<()> {
        let mut data = self.data.write().map_err(poisoned)?;
        data.insert(name.to_string(), settings.clone());
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<bool> {
        let mut data = self.data.write().map_err(poisoned)?;
        Ok(data.remove(name).is_some())
    }

    async fn list(&self) -> Result<Vec<String>> {
        let data = self.data.read().map_err(poisoned)?;
        Ok(data.keys().cloned().collect())
    }
}
