use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

const IN_MEMORY: &str = ":memory:";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct VacancyDbConfig {
    pub database: Option<String>,
    pub data_file: Option<String>,
    pub top_limit: Option<usize>,
}

/// Where the store lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

impl DatabaseConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Private in-memory database; contents vanish when the connection closes
    pub fn in_memory() -> Self {
        Self::new(IN_MEMORY)
    }

    pub fn is_in_memory(&self) -> bool {
        self.path.as_os_str() == IN_MEMORY
    }

    pub fn validate(&self) -> Result<()> {
        if self.path.as_os_str().is_empty() {
            return Err(Error::Config("database path is empty".to_string()));
        }
        if !self.is_in_memory() && self.path.is_dir() {
            return Err(Error::Config(format!(
                "database path {} is a directory",
                self.path.display()
            )));
        }
        Ok(())
    }
}

impl fmt::Display for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("vacancydb.toml")
}

pub fn default_database_path_in(base: &Path) -> PathBuf {
    base.join(".vacancydb").join("vacancies.db")
}

pub fn default_data_file() -> PathBuf {
    PathBuf::from("data").join("hh_data.json")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<VacancyDbConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: VacancyDbConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &VacancyDbConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

pub fn ensure_db_dir(db_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// CLI flag (or env) wins, then the config file, then the default location
pub fn resolve_database_path(cli: Option<&Path>, config: Option<&VacancyDbConfig>) -> PathBuf {
    if let Some(path) = cli {
        return path.to_path_buf();
    }
    config
        .and_then(|c| c.database.as_deref())
        .map(PathBuf::from)
        .unwrap_or_else(|| default_database_path_in(Path::new(".")))
}

pub fn resolve_data_file(cli: Option<&Path>, config: Option<&VacancyDbConfig>) -> PathBuf {
    if let Some(path) = cli {
        return path.to_path_buf();
    }
    config
        .and_then(|c| c.data_file.as_deref())
        .map(PathBuf::from)
        .unwrap_or_else(default_data_file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vacancydb.toml");
        let config = VacancyDbConfig {
            database: Some("db/vacancies.db".to_string()),
            data_file: Some("data/hh_data.json".to_string()),
            top_limit: Some(5),
        };

        write_config(&path, &config, false).unwrap();
        assert!(write_config(&path, &config, false).is_err());
        write_config(&path, &config, true).unwrap();

        let loaded = load_config(Some(&path)).unwrap().unwrap();
        assert_eq!(loaded.database.as_deref(), Some("db/vacancies.db"));
        assert_eq!(loaded.top_limit, Some(5));
    }

    #[test]
    fn test_missing_config_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_config(Some(&dir.path().join("absent.toml"))).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_resolve_database_path_precedence() {
        let config = VacancyDbConfig {
            database: Some("from-config.db".to_string()),
            ..Default::default()
        };

        let cli = PathBuf::from("from-cli.db");
        assert_eq!(resolve_database_path(Some(&cli), Some(&config)), cli);
        assert_eq!(
            resolve_database_path(None, Some(&config)),
            PathBuf::from("from-config.db")
        );
        assert_eq!(
            resolve_database_path(None, None),
            default_database_path_in(Path::new("."))
        );
    }

    #[test]
    fn test_validate() {
        assert!(DatabaseConfig::in_memory().validate().is_ok());
        assert!(DatabaseConfig::new("").validate().is_err());

        let dir = tempfile::tempdir().unwrap();
        assert!(DatabaseConfig::new(dir.path()).validate().is_err());
        assert!(DatabaseConfig::new(dir.path().join("x.db")).validate().is_ok());
    }
}
