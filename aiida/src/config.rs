// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

const APP_DIR_NAME: &str = "aiida";
const CONFIG_FILE_NAME: &str = "verdi.toml";
const CONFIG_ENV_VAR: &str = "AIIDA_CONFIG_PATH";
const DATABASE_ENV_VAR: &str = "AIIDA_DATABASE_PATH";
const DEFAULT_USER_ENV_VAR: &str = "AIIDA_DEFAULT_USER";
const PROFILE_ENV_VAR: &str = "AIIDA_PROFILE";
const DATABASE_FILE_NAME: &str = "aiida.sqlite";

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    database_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    default_user_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    verbose: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    default_profile: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    profiles: BTreeMap<String, ProfileEntry>,
}

/// A named `[profiles.<name>]` table. Each profile has its own database.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct ProfileEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    database_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    default_user_email: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: PathBuf,
    /// Email of the automatic user.
    pub default_user_email: Option<String>,
    pub verbose: bool,
    pub config_path: Option<PathBuf>,
    /// Active profile, when the config file defines one.
    pub profile: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    Override,
    Env,
    ConfigFile,
    Default,
}

impl ConfigSource {
    pub fn as_str(self) -> &'static str {
        match self {
            ConfigSource::Override => "override",
            ConfigSource::Env => "env",
            ConfigSource::ConfigFile => "config",
            ConfigSource::Default => "default",
        }
    }
}

#[derive(Debug)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

#[derive(Debug)]
pub struct ConfigReport {
    pub config_path: Option<PathBuf>,
    pub config_path_source: Option<ConfigSource>,
    pub config_file_present: bool,
    pub profile: ConfigValue<Option<String>>,
    pub database_path: ConfigValue<PathBuf>,
    pub default_user_email: ConfigValue<Option<String>>,
    pub verbose: ConfigValue<bool>,
}

#[derive(Debug)]
pub struct LoadResult {
    pub config: Config,
    pub report: ConfigReport,
}

/// Values given on the command line. They beat env vars and the file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub profile: Option<String>,
    pub database_path: Option<PathBuf>,
    pub default_user_email: Option<String>,
    pub verbose: Option<bool>,
}

pub fn load(config_path_override: Option<PathBuf>, overrides: Overrides) -> Result<Config> {
    Ok(load_with_report(config_path_override, overrides)?.config)
}

pub fn load_with_report(
    config_path_override: Option<PathBuf>,
    overrides: Overrides,
) -> Result<LoadResult> {
    let (config_path, config_path_source, required) = match config_path_override {
        Some(path) => (Some(expand_path(path)), Some(ConfigSource::Override), true),
        None => match non_empty_env(CONFIG_ENV_VAR)? {
            Some(path) => (
                Some(expand_path(PathBuf::from(path))),
                Some(ConfigSource::Env),
                true,
            ),
            None => match default_config_path().ok() {
                Some(path) => (Some(path), Some(ConfigSource::Default), false),
                None => (None, None, false),
            },
        },
    };
    let config_file_present = config_path
        .as_deref()
        .map(|path| path.exists())
        .unwrap_or(false);

    let mut file_config = match config_path.as_deref() {
        Some(path) => read_config_file(path, required)?,
        None => FileConfig::default(),
    };
    let config_dir = config_path.as_deref().and_then(|path| path.parent());

    let env_profile = non_empty_env(PROFILE_ENV_VAR)?
        .map(|value| value.to_string_lossy().trim().to_string());
    let (profile, profile_source) = match overrides.profile {
        Some(name) => (Some(name), ConfigSource::Override),
        None => match env_profile {
            Some(name) => (Some(name), ConfigSource::Env),
            None => match file_config.default_profile.take() {
                Some(name) => (Some(name), ConfigSource::ConfigFile),
                None => (None, ConfigSource::Default),
            },
        },
    };
    let profile_entry = match profile.as_deref() {
        Some(name) => Some(file_config.profiles.remove(name).with_context(|| {
            let location = config_path
                .as_deref()
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "(none)".to_string());
            format!("profile '{name}' is not defined in config file {location}")
        })?),
        None => None,
    };

    let (database_path, database_source) = match overrides.database_path {
        Some(path) => (expand_path(path), ConfigSource::Override),
        None => match non_empty_env(DATABASE_ENV_VAR)? {
            Some(raw) => (expand_path(PathBuf::from(raw)), ConfigSource::Env),
            None => match (profile.as_deref(), profile_entry.as_ref()) {
                (Some(name), Some(entry)) => (
                    profile_database_path(name, entry, config_dir)?,
                    ConfigSource::ConfigFile,
                ),
                _ => match file_config.database_path {
                    Some(raw) => (resolve_path(&raw, config_dir), ConfigSource::ConfigFile),
                    None => (
                        default_database_path().with_context(|| {
                            "failed to resolve default database path; pass --database or set database_path in the config file"
                        })?,
                        ConfigSource::Default,
                    ),
                },
            },
        },
    };

    let env_user = non_empty_env(DEFAULT_USER_ENV_VAR)?
        .map(|value| value.to_string_lossy().trim().to_string());
    let (default_user_email, default_user_source) = match overrides.default_user_email {
        Some(email) => (Some(email), ConfigSource::Override),
        None => match env_user {
            Some(email) => (Some(email), ConfigSource::Env),
            None => match profile_entry
                .and_then(|entry| entry.default_user_email)
                .or(file_config.default_user_email)
            {
                Some(email) => (Some(email), ConfigSource::ConfigFile),
                None => (None, ConfigSource::Default),
            },
        },
    };
    let default_user_email = default_user_email
        .map(|email| email.trim().to_string())
        .filter(|email| !email.is_empty());

    let (verbose, verbose_source) = match overrides.verbose {
        Some(verbose) => (verbose, ConfigSource::Override),
        None => match file_config.verbose {
            Some(verbose) => (verbose, ConfigSource::ConfigFile),
            None => (false, ConfigSource::Default),
        },
    };

    let config = Config {
        database_path,
        default_user_email,
        verbose,
        config_path: config_path.clone(),
        profile,
    };

    let report = ConfigReport {
        config_path,
        config_path_source,
        config_file_present,
        profile: ConfigValue {
            value: config.profile.clone(),
            source: profile_source,
        },
        database_path: ConfigValue {
            value: config.database_path.clone(),
            source: database_source,
        },
        default_user_email: ConfigValue {
            value: config.default_user_email.clone(),
            source: default_user_source,
        },
        verbose: ConfigValue {
            value: config.verbose,
            source: verbose_source,
        },
    };

    Ok(LoadResult { config, report })
}

pub fn ensure_database_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create database directory {}", parent.display()))?;
    }
    Ok(())
}

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Profile '{0}' does not exist")]
    NotFound(String),
    #[error(transparent)]
    Config(#[from] anyhow::Error),
}

/// A profile as listed from the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileSummary {
    pub name: String,
    pub is_default: bool,
    pub database_path: PathBuf,
    pub default_user_email: Option<String>,
}

/// Profiles of the config file at `path`, sorted by name. A missing file
/// has none.
pub fn list_profiles(path: &Path) -> Result<Vec<ProfileSummary>> {
    let file_config = read_config_file(path, false)?;
    file_config
        .profiles
        .iter()
        .map(|(name, entry)| summarize_profile(path, &file_config, name, entry))
        .collect()
}

pub fn set_default_profile(path: &Path, name: &str) -> std::result::Result<(), ProfileError> {
    let mut file_config = read_config_file(path, false)?;
    if !file_config.profiles.contains_key(name) {
        return Err(ProfileError::NotFound(name.to_string()));
    }
    file_config.default_profile = Some(name.to_string());
    write_config_file(path, &file_config)?;
    Ok(())
}

/// Drops the profile from the file. Clears `default_profile` when it named
/// the removed profile. The database file is left alone.
pub fn remove_profile(path: &Path, name: &str) -> std::result::Result<ProfileSummary, ProfileError> {
    let mut file_config = read_config_file(path, false)?;
    let entry = file_config
        .profiles
        .get(name)
        .cloned()
        .ok_or_else(|| ProfileError::NotFound(name.to_string()))?;
    let summary = summarize_profile(path, &file_config, name, &entry)?;
    file_config.profiles.remove(name);
    if file_config.default_profile.as_deref() == Some(name) {
        file_config.default_profile = None;
    }
    write_config_file(path, &file_config)?;
    log::info!("profile '{name}' removed from {}", path.display());
    Ok(summary)
}

fn summarize_profile(
    path: &Path,
    file_config: &FileConfig,
    name: &str,
    entry: &ProfileEntry,
) -> Result<ProfileSummary> {
    Ok(ProfileSummary {
        name: name.to_string(),
        is_default: file_config.default_profile.as_deref() == Some(name),
        database_path: profile_database_path(name, entry, path.parent())?,
        default_user_email: entry
            .default_user_email
            .clone()
            .or_else(|| file_config.default_user_email.clone()),
    })
}

/// The profile's own path, or `<data dir>/aiida/<name>.sqlite`.
fn profile_database_path(
    name: &str,
    entry: &ProfileEntry,
    config_dir: Option<&Path>,
) -> Result<PathBuf> {
    match entry.database_path.as_deref() {
        Some(raw) => Ok(resolve_path(raw, config_dir)),
        None => {
            let base = dirs::data_dir().context("failed to resolve data directory")?;
            Ok(base.join(APP_DIR_NAME).join(format!("{name}.sqlite")))
        }
    }
}

fn write_config_file(path: &Path, file_config: &FileConfig) -> Result<()> {
    let contents = toml::to_string_pretty(file_config)
        .with_context(|| format!("failed to serialize config file {}", path.display()))?;
    fs::write(path, contents)
        .with_context(|| format!("failed to write config file {}", path.display()))
}

fn read_config_file(path: &Path, required: bool) -> Result<FileConfig> {
    if !path.exists() {
        if required {
            anyhow::bail!("config file not found at {}", path.display());
        }
        return Ok(FileConfig::default());
    }

    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    toml::from_str(&contents)
        .with_context(|| format!("failed to parse config file {}", path.display()))
}

fn resolve_path(raw: &str, base_dir: Option<&Path>) -> PathBuf {
    let path = PathBuf::from(shellexpand::tilde(raw).as_ref());
    if path.is_absolute() {
        return path;
    }
    match base_dir {
        Some(dir) => dir.join(path),
        None => path,
    }
}

fn expand_path(path: PathBuf) -> PathBuf {
    let raw = path.to_string_lossy().to_string();
    PathBuf::from(shellexpand::tilde(&raw).as_ref())
}

/// `None` when unset; an error when set to the empty string.
fn non_empty_env(key: &str) -> Result<Option<OsString>> {
    match std::env::var_os(key) {
        Some(value) if value.is_empty() => anyhow::bail!("{key} is set but empty"),
        other => Ok(other),
    }
}

fn default_config_path() -> Result<PathBuf> {
    let base = dirs::config_dir().context("failed to resolve config directory")?;
    Ok(base.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

fn default_database_path() -> Result<PathBuf> {
    let base = dirs::data_dir().context("failed to resolve data directory")?;
    Ok(base.join(APP_DIR_NAME).join(DATABASE_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::TempDir;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    struct EnvVarGuard {
        key: &'static str,
        prev: Option<OsString>,
    }

    impl EnvVarGuard {
        fn set(key: &'static str, value: &str) -> Self {
            let prev = std::env::var_os(key);
            // SAFETY: tests serialize env mutations with ENV_LOCK.
            unsafe {
                std::env::set_var(key, value);
            }
            Self { key, prev }
        }

        fn clear(key: &'static str) -> Self {
            let prev = std::env::var_os(key);
            // SAFETY: tests serialize env mutations with ENV_LOCK.
            unsafe {
                std::env::remove_var(key);
            }
            Self { key, prev }
        }
    }

    impl Drop for EnvVarGuard {
        fn drop(&mut self) {
            // SAFETY: tests serialize env mutations with ENV_LOCK.
            unsafe {
                match &self.prev {
                    Some(value) => std::env::set_var(self.key, value),
                    None => std::env::remove_var(self.key),
                }
            }
        }
    }

    fn write_config(dir: &TempDir, contents: &str) -> (PathBuf, PathBuf) {
        let config_dir = dir.path().join("config");
        fs::create_dir_all(&config_dir).unwrap();
        let config_path = config_dir.join(CONFIG_FILE_NAME);
        fs::write(&config_path, contents).unwrap();
        (config_dir, config_path)
    }

    fn clear_value_env() -> (EnvVarGuard, EnvVarGuard, EnvVarGuard) {
        (
            EnvVarGuard::clear(DATABASE_ENV_VAR),
            EnvVarGuard::clear(DEFAULT_USER_ENV_VAR),
            EnvVarGuard::clear(PROFILE_ENV_VAR),
        )
    }

    const PROFILES: &str = r#"
default_user_email = "ada@example.org"
default_profile = "main"

[profiles.main]
database_path = "main.sqlite"

[profiles.scratch]
database_path = "/tmp/scratch.sqlite"
default_user_email = "bob@example.org"
"#;

    #[test]
    fn missing_optional_config_file_is_ok() {
        let dir = TempDir::new().unwrap();
        let cfg = read_config_file(&dir.path().join("missing.toml"), false).unwrap();
        assert!(cfg.database_path.is_none());
        assert!(cfg.default_user_email.is_none());
    }

    #[test]
    fn missing_required_config_file_errors() {
        let dir = TempDir::new().unwrap();
        let err = read_config_file(&dir.path().join("missing.toml"), true).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = TempDir::new().unwrap();
        let (_, config_path) = write_config(&dir, "databse_path = \"typo.sqlite\"\n");
        let err = read_config_file(&config_path, true).unwrap_err();
        assert!(err.to_string().contains("failed to parse config file"));
    }

    #[test]
    fn resolves_relative_database_path_from_config_dir() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _env = clear_value_env();
        let dir = TempDir::new().unwrap();
        let (config_dir, config_path) = write_config(
            &dir,
            "database_path = \"db/aiida.sqlite\"\ndefault_user_email = \"ada@example.org\"\n",
        );

        let config = load(Some(config_path.clone()), Overrides::default()).unwrap();
        assert_eq!(config.database_path, config_dir.join("db").join("aiida.sqlite"));
        assert_eq!(config.default_user_email.as_deref(), Some("ada@example.org"));
        assert!(!config.verbose);
        assert_eq!(config.config_path, Some(config_path));
    }

    #[test]
    fn overrides_apply_per_field() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _env = clear_value_env();
        let dir = TempDir::new().unwrap();
        let (config_dir, config_path) = write_config(
            &dir,
            "database_path = \"db/from_config.sqlite\"\ndefault_user_email = \"ada@example.org\"\n",
        );

        let config = load(
            Some(config_path),
            Overrides {
                database_path: None,
                default_user_email: Some("bob@example.org".to_string()),
                verbose: Some(true),
                ..Overrides::default()
            },
        )
        .unwrap();

        assert_eq!(
            config.database_path,
            config_dir.join("db").join("from_config.sqlite")
        );
        assert_eq!(config.default_user_email.as_deref(), Some("bob@example.org"));
        assert!(config.verbose);
    }

    #[test]
    fn env_values_sit_between_overrides_and_file() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _env = clear_value_env();
        let dir = TempDir::new().unwrap();
        let (_, config_path) = write_config(
            &dir,
            "database_path = \"db/from_config.sqlite\"\ndefault_user_email = \"ada@example.org\"\n",
        );
        let _db = EnvVarGuard::set(DATABASE_ENV_VAR, "/tmp/from_env.sqlite");
        let _user = EnvVarGuard::set(DEFAULT_USER_ENV_VAR, "env@example.org");

        let LoadResult { config, report } = load_with_report(
            Some(config_path),
            Overrides {
                database_path: Some(PathBuf::from("from_flag.sqlite")),
                ..Overrides::default()
            },
        )
        .unwrap();

        assert_eq!(config.database_path, PathBuf::from("from_flag.sqlite"));
        assert_eq!(report.database_path.source, ConfigSource::Override);
        assert_eq!(config.default_user_email.as_deref(), Some("env@example.org"));
        assert_eq!(report.default_user_email.source, ConfigSource::Env);
    }

    #[test]
    fn blank_default_user_is_unset() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _env = clear_value_env();
        let dir = TempDir::new().unwrap();
        let (_, config_path) = write_config(
            &dir,
            "database_path = \"aiida.sqlite\"\ndefault_user_email = \"  \"\n",
        );
        let config = load(Some(config_path), Overrides::default()).unwrap();
        assert!(config.default_user_email.is_none());
    }

    #[test]
    fn ensure_database_dir_creates_parent_directory() {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("nested").join(DATABASE_FILE_NAME);
        ensure_database_dir(&db_path).unwrap();
        assert!(dir.path().join("nested").is_dir());
    }

    #[test]
    fn ensure_database_dir_no_parent_does_not_error() {
        ensure_database_dir(Path::new(DATABASE_FILE_NAME)).unwrap();
    }

    #[test]
    fn env_config_path_used_when_no_override() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _env = clear_value_env();
        let _cfg = EnvVarGuard::clear(CONFIG_ENV_VAR);
        let dir = TempDir::new().unwrap();
        let (_, config_path) = write_config(&dir, "verbose = true\n");
        let _cfg = EnvVarGuard::set(CONFIG_ENV_VAR, config_path.to_str().unwrap());

        let LoadResult { config, report } = load_with_report(None, Overrides::default()).unwrap();
        assert!(config.verbose);
        assert_eq!(config.config_path, Some(config_path));
        assert_eq!(report.config_path_source, Some(ConfigSource::Env));
    }

    #[test]
    fn cli_config_path_takes_precedence_over_env() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _env = clear_value_env();
        let dir = TempDir::new().unwrap();
        let env_path = dir.path().join("env.toml");
        let cli_path = dir.path().join("cli.toml");
        fs::write(&env_path, "default_user_email = \"env@example.org\"\n").unwrap();
        fs::write(&cli_path, "default_user_email = \"cli@example.org\"\n").unwrap();
        let _cfg = EnvVarGuard::set(CONFIG_ENV_VAR, env_path.to_str().unwrap());

        let LoadResult { config, report } =
            load_with_report(Some(cli_path.clone()), Overrides::default()).unwrap();
        assert_eq!(config.default_user_email.as_deref(), Some("cli@example.org"));
        assert_eq!(config.config_path, Some(cli_path));
        assert_eq!(report.config_path_source, Some(ConfigSource::Override));
    }

    #[test]
    fn empty_env_config_path_is_an_error() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _env = clear_value_env();
        let _cfg = EnvVarGuard::set(CONFIG_ENV_VAR, "");
        let err = load_with_report(None, Overrides::default()).unwrap_err();
        assert!(err.to_string().contains("is set but empty"));
    }

    #[test]
    fn default_profile_selects_its_database_and_inherits_user() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _env = clear_value_env();
        let dir = TempDir::new().unwrap();
        let (config_dir, config_path) = write_config(&dir, PROFILES);

        let LoadResult { config, report } =
            load_with_report(Some(config_path), Overrides::default()).unwrap();
        assert_eq!(config.profile.as_deref(), Some("main"));
        assert_eq!(report.profile.source, ConfigSource::ConfigFile);
        assert_eq!(config.database_path, config_dir.join("main.sqlite"));
        assert_eq!(config.default_user_email.as_deref(), Some("ada@example.org"));
    }

    #[test]
    fn profile_override_beats_env_and_file_default() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _env = clear_value_env();
        let dir = TempDir::new().unwrap();
        let (_, config_path) = write_config(&dir, PROFILES);
        let _profile = EnvVarGuard::set(PROFILE_ENV_VAR, "main");

        let LoadResult { config, report } = load_with_report(
            Some(config_path),
            Overrides {
                profile: Some("scratch".to_string()),
                ..Overrides::default()
            },
        )
        .unwrap();
        assert_eq!(config.profile.as_deref(), Some("scratch"));
        assert_eq!(report.profile.source, ConfigSource::Override);
        assert_eq!(config.database_path, PathBuf::from("/tmp/scratch.sqlite"));
        assert_eq!(config.default_user_email.as_deref(), Some("bob@example.org"));
    }

    #[test]
    fn unknown_profile_is_an_error() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _env = clear_value_env();
        let dir = TempDir::new().unwrap();
        let (_, config_path) = write_config(&dir, PROFILES);
        let _profile = EnvVarGuard::set(PROFILE_ENV_VAR, "missing");

        let err = load_with_report(Some(config_path), Overrides::default()).unwrap_err();
        assert!(err.to_string().contains("profile 'missing' is not defined"));
    }

    #[test]
    fn list_profiles_marks_the_default() {
        let dir = TempDir::new().unwrap();
        let (config_dir, config_path) = write_config(&dir, PROFILES);

        let profiles = list_profiles(&config_path).unwrap();
        let names: Vec<_> = profiles.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["main", "scratch"]);
        assert!(profiles[0].is_default);
        assert!(!profiles[1].is_default);
        assert_eq!(profiles[0].database_path, config_dir.join("main.sqlite"));
        assert_eq!(profiles[1].default_user_email.as_deref(), Some("bob@example.org"));
        assert!(list_profiles(&dir.path().join("absent.toml")).unwrap().is_empty());
    }

    #[test]
    fn set_default_profile_rewrites_the_file() {
        let dir = TempDir::new().unwrap();
        let (_, config_path) = write_config(&dir, PROFILES);

        set_default_profile(&config_path, "scratch").unwrap();
        let profiles = list_profiles(&config_path).unwrap();
        let default: Vec<_> = profiles
            .iter()
            .filter(|p| p.is_default)
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(default, ["scratch"]);
        let reread = read_config_file(&config_path, true).unwrap();
        assert_eq!(reread.default_user_email.as_deref(), Some("ada@example.org"));

        let err = set_default_profile(&config_path, "nope").unwrap_err();
        assert!(matches!(err, ProfileError::NotFound(name) if name == "nope"));
    }

    #[test]
    fn removing_the_default_profile_clears_the_default() {
        let dir = TempDir::new().unwrap();
        let (config_dir, config_path) = write_config(&dir, PROFILES);

        let removed = remove_profile(&config_path, "main").unwrap();
        assert!(removed.is_default);
        assert_eq!(removed.database_path, config_dir.join("main.sqlite"));

        let reread = read_config_file(&config_path, true).unwrap();
        assert!(reread.default_profile.is_none());
        assert_eq!(reread.profiles.keys().collect::<Vec<_>>(), ["scratch"]);
        assert!(matches!(
            remove_profile(&config_path, "main").unwrap_err(),
            ProfileError::NotFound(_)
        ));
    }
}
