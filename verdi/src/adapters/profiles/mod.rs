// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use std::path::{Path, PathBuf};

use aiida::config::{self, ProfileError, ProfileSummary};

use crate::app::errors::{AppError, AppResult};
use crate::app::ports::ProfilePort;

/// Profiles stored in the config file `verdi` was started with.
pub struct ConfigProfiles {
    config_path: Option<PathBuf>,
}

impl ConfigProfiles {
    pub fn new(config_path: Option<PathBuf>) -> Self {
        Self { config_path }
    }

    fn path(&self) -> AppResult<&Path> {
        self.config_path.as_deref().ok_or_else(|| {
            AppError::local_error("no config file location; pass --config or set AIIDA_CONFIG_PATH")
        })
    }
}

fn map_profile_error(err: ProfileError) -> AppError {
    match err {
        ProfileError::NotFound(_) => AppError::not_existent(err.to_string()),
        ProfileError::Config(err) => AppError::local_error(format!("{err:#}")),
    }
}

impl ProfilePort for ConfigProfiles {
    fn list_profiles(&self) -> AppResult<Vec<ProfileSummary>> {
        config::list_profiles(self.path()?).map_err(|err| AppError::local_error(format!("{err:#}")))
    }

    fn set_default_profile(&self, name: &str) -> AppResult<()> {
        config::set_default_profile(self.path()?, name).map_err(map_profile_error)
    }

    fn remove_profile(&self, name: &str) -> AppResult<ProfileSummary> {
        config::remove_profile(self.path()?, name).map_err(map_profile_error)
    }

    fn remove_database(&self, path: &Path) -> AppResult<bool> {
        match std::fs::remove_file(path) {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(false),
            Err(err) => {
                return Err(AppError::local_error(format!(
                    "failed to delete database {}: {err}",
                    path.display()
                )));
            }
        }
        // SQLite leaves these beside the database in WAL mode.
        for suffix in ["-wal", "-shm"] {
            let mut side = path.as_os_str().to_owned();
            side.push(suffix);
            let _ = std::fs::remove_file(PathBuf::from(side));
        }
        log::info!("deleted database {}", path.display());
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::errors::ErrorType;
    use tempfile::TempDir;

    const CONFIG: &str = r#"
default_profile = "main"

[profiles.main]
database_path = "main.sqlite"

[profiles.scratch]
database_path = "scratch.sqlite"
"#;

    fn profiles(dir: &TempDir) -> ConfigProfiles {
        let path = dir.path().join("verdi.toml");
        std::fs::write(&path, CONFIG).unwrap();
        ConfigProfiles::new(Some(path))
    }

    #[test]
    fn unknown_profile_maps_to_not_existent() {
        let dir = TempDir::new().unwrap();
        let err = profiles(&dir).set_default_profile("nope").unwrap_err();
        assert_eq!(err.kind, ErrorType::NotExistent);
        assert_eq!(err.message, "Profile 'nope' does not exist");
    }

    #[test]
    fn removed_profile_database_is_deleted_once() {
        let dir = TempDir::new().unwrap();
        let adapter = profiles(&dir);
        let removed = adapter.remove_profile("scratch").unwrap();
        assert_eq!(removed.database_path, dir.path().join("scratch.sqlite"));
        std::fs::write(&removed.database_path, b"").unwrap();

        assert!(adapter.remove_database(&removed.database_path).unwrap());
        assert!(!removed.database_path.exists());
        assert!(!adapter.remove_database(&removed.database_path).unwrap());
        let names: Vec<_> = adapter
            .list_profiles()
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, ["main"]);
    }

    #[test]
    fn missing_config_location_is_reported() {
        let err = ConfigProfiles::new(None).list_profiles().unwrap_err();
        assert_eq!(err.kind, ErrorType::LocalError);
    }
}
