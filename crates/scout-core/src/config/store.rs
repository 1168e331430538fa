//! Config store for loading and saving the installed-server settings file.
//!
//! Every mutation goes through [`ConfigStore::transact`], which holds the
//! store's writer lock across load, mutate and save so two concurrent calls
//! cannot interleave their read-modify-write cycles.

use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::{debug, info, warn};

use crate::error::{Result, ScoutError};

use super::schema::RegistryConfig;

#[derive(Debug)]
pub struct ConfigStore {
    config_path: PathBuf,
    write_lock: Mutex<()>,
}

impl ConfigStore {
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Load the config, falling back to an empty one when the file is
    /// missing or cannot be read.
    pub fn load(&self) -> RegistryConfig {
        match self.read() {
            Ok(Some(config)) => config,
            Ok(None) => RegistryConfig::new(),
            Err(err) => {
                warn!(error = %err, "using empty config");
                RegistryConfig::new()
            }
        }
    }

    /// Load the config, failing when the file does not exist or is invalid.
    pub fn load_existing(&self) -> Result<RegistryConfig> {
        self.read()?
            .ok_or_else(|| ScoutError::ConfigNotFound(self.config_path.clone()))
    }

    /// Atomically overwrite the config file.
    pub fn save(&self, config: &RegistryConfig) -> Result<()> {
        let _guard = self.lock();
        self.write(config)
    }

    /// Load, mutate and save under the writer lock.
    ///
    /// A missing file starts from an empty config. An unreadable file is
    /// backed up before it gets replaced. Nothing is written when `mutate`
    /// fails.
    pub fn transact<T>(&self, mutate: impl FnOnce(&mut RegistryConfig) -> Result<T>) -> Result<T> {
        let _guard = self.lock();
        let mut config = match self.read() {
            Ok(Some(config)) => config,
            Ok(None) => RegistryConfig::new(),
            Err(err) => {
                let backup = self.copy_to_backup()?;
                warn!(
                    error = %err,
                    backup = %backup.display(),
                    "replacing unreadable config"
                );
                RegistryConfig::new()
            }
        };

        let value = mutate(&mut config)?;
        self.write(&config)?;
        Ok(value)
    }

    /// Like [`transact`](Self::transact), but the config file must already
    /// exist and parse.
    pub fn transact_existing<T>(
        &self,
        mutate: impl FnOnce(&mut RegistryConfig) -> Result<T>,
    ) -> Result<T> {
        let _guard = self.lock();
        let mut config = self.load_existing()?;
        let value = mutate(&mut config)?;
        self.write(&config)?;
        Ok(value)
    }

    /// Copy the config file verbatim next to itself with a timestamp suffix.
    pub fn backup(&self) -> Result<PathBuf> {
        let _guard = self.lock();
        if !self.config_path.exists() {
            return Err(ScoutError::ConfigNotFound(self.config_path.clone()));
        }
        let backup = self.copy_to_backup()?;
        info!(backup = %backup.display(), "backed up config");
        Ok(backup)
    }

    /// Sibling path the backup taken at this moment would be written to.
    pub fn backup_path(&self) -> PathBuf {
        self.backup_path_at(Utc::now())
    }

    fn backup_path_at(&self, taken_at: DateTime<Utc>) -> PathBuf {
        let stamp = taken_at
            .to_rfc3339_opts(SecondsFormat::Millis, true)
            .replace([':', '.'], "-");
        let file_name = self
            .config_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "config.json".to_string());
        self.config_path
            .with_file_name(format!("{}.backup-{}", file_name, stamp))
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn read(&self) -> Result<Option<RegistryConfig>> {
        let bytes = match std::fs::read(&self.config_path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %self.config_path.display(), "config file not found");
                return Ok(None);
            }
            Err(err) => return Err(ScoutError::config_read(&self.config_path, err)),
        };

        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|err| ScoutError::config_read(&self.config_path, err))
    }

    fn write(&self, config: &RegistryConfig) -> Result<()> {
        let path = &self.config_path;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|err| ScoutError::config_write(parent, err))?;
        }

        let mut content =
            serde_json::to_string_pretty(config).map_err(|err| ScoutError::config_write(path, err))?;
        content.push('\n');

        let tmp_path = path.with_file_name(format!(
            ".{}.tmp",
            path.file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default()
        ));
        std::fs::write(&tmp_path, content).map_err(|err| ScoutError::config_write(&tmp_path, err))?;
        std::fs::rename(&tmp_path, path).map_err(|err| ScoutError::config_write(path, err))?;

        debug!(path = %path.display(), servers = config.servers.len(), "saved config");
        Ok(())
    }

    fn copy_to_backup(&self) -> Result<PathBuf> {
        self.copy_to_backup_at(Utc::now())
    }

    /// Copy the config into a backup file that did not exist before. A
    /// second backup within the same millisecond gets a `-N` suffix.
    fn copy_to_backup_at(&self, taken_at: DateTime<Utc>) -> Result<PathBuf> {
        let base = self.backup_path_at(taken_at);
        let mut source =
            File::open(&self.config_path).map_err(|err| ScoutError::config_read(&self.config_path, err))?;

        let mut attempt = 0u32;
        let (backup, mut target) = loop {
            let candidate = match attempt {
                0 => base.clone(),
                n => {
                    let mut name = base.clone().into_os_string();
                    name.push(format!("-{}", n));
                    PathBuf::from(name)
                }
            };
            match OpenOptions::new().write(true).create_new(true).open(&candidate) {
                Ok(file) => break (candidate, file),
                Err(err) if err.kind() == ErrorKind::AlreadyExists => attempt += 1,
                Err(err) => return Err(ScoutError::config_write(&candidate, err)),
            }
        };

        std::io::copy(&mut source, &mut target).map_err(|err| ScoutError::config_write(&backup, err))?;
        Ok(backup)
    }
}
