use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{validate_save_name, Settings, SettingsStore};
use crate::error::Result;

#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    saved_at: DateTime<Utc>,
    settings: Settings,
}

/// One `<name>.json` file per save-name under a directory.
pub struct JsonSettingsStore {
    dir: PathBuf,
}

impl JsonSettingsStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, name: &str) -> Result<PathBuf> {
        validate_save_name(name)?;
        Ok(self.dir.join(format!("{}.json", name)))
    }

    /// When the snapshot for `name` was last written.
    pub fn saved_at(&self, name: &str) -> Result<Option<DateTime<Utc>>> {
        Ok(self.read_snapshot(name)?.map(|s| s.saved_at))
    }

    fn read_snapshot(&self, name: &str) -> Result<Option<Snapshot>> {
        let path = self.path_for(name)?;
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read(&path)?;
        Ok(Some(serde_json::from_slice(&content)?))
    }

    fn atomic_write(&self, path: &Path, snapshot: &Snapshot) -> Result<()> {
        fs::create_dir_all(&self.dir)?;

        let temp_path = path.with_extension("tmp");
        let json = serde_json::to_vec_pretty(snapshot)?;
        fs::write(&temp_path, json)?;
        fs::rename(temp_path, path)?;

        Ok(())
    }
}

#[async_trait]
impl SettingsStore for JsonSettingsStore {
    async fn load(&self, name: &str) -> Result<Option<Settings>> {
        Ok(self.read_snapshot(name)?.map(|s| s.settings))
    }

    async fn save(&self, name: &str, settings: &Settings) -> Result<()> {
        let path = self.path_for(name)?;
        let snapshot = Snapshot {
            saved_at: Utc::now(),
            settings: settings.clone(),
        };
        self.atomic_write(&path, &snapshot)?;
        debug!("Saved settings '{}' to {}", name, path.display());
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<bool> {
        let path = self.path_for(name)?;
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(path)?;
        Ok(true)
    }

    async fn list(&self) -> Result<Vec<String>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut names: Vec<String> = fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .filter_map(|path| {
                path.file_stem()
                    .and_then(|stem| stem.to_str())
                    .map(|s| s.to_string())
            })
            .collect();
        names.sort();

        Ok(names)
    }
}
