//! Record sources
//!
//! The harvester writes one JSON document per run:
//!
//! ```json
//! { "employers": [ ... ], "vacancies": [ ... ], "metadata": { ... } }
//! ```

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::Result;
use crate::record::{EmployerRecord, VacancyRecord};

/// Anything that can hand the loader employer and vacancy records
pub trait DataSource {
    fn employers(&self) -> Result<Vec<EmployerRecord>>;
    fn vacancies(&self) -> Result<Vec<VacancyRecord>>;
}

/// Harvest file on disk
pub struct JsonDataSource {
    path: PathBuf,
    document: Value,
}

impl JsonDataSource {
    /// Read and parse the file once; missing file or invalid JSON is an error
    pub fn open(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let document = serde_json::from_str(&contents)?;
        Ok(Self {
            path: path.to_path_buf(),
            document,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing or non-array key yields no records.
    ///
    /// An entry that is not a record at all (a bare number, a string) becomes
    /// an empty record, which the store rejects on its own; the batch totals
    /// therefore always match the array length.
    fn records<T: DeserializeOwned + Default>(&self, key: &str) -> Vec<T> {
        let Some(items) = self.document.get(key).and_then(Value::as_array) else {
            tracing::debug!("{}: no '{}' array", self.path.display(), key);
            return Vec::new();
        };

        items
            .iter()
            .enumerate()
            .map(|(i, item)| match serde_json::from_value(item.clone()) {
                Ok(record) => record,
                Err(e) => {
                    tracing::warn!("{}: unreadable {}[{}]: {}", self.path.display(), key, i, e);
                    T::default()
                }
            })
            .collect()
    }
}

impl DataSource for JsonDataSource {
    fn employers(&self) -> Result<Vec<EmployerRecord>> {
        Ok(self.records("employers"))
    }

    fn vacancies(&self) -> Result<Vec<VacancyRecord>> {
        Ok(self.records("vacancies"))
    }
}

/// Records already in memory
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    pub employers: Vec<EmployerRecord>,
    pub vacancies: Vec<VacancyRecord>,
}

impl InMemorySource {
    pub fn new(employers: Vec<EmployerRecord>, vacancies: Vec<VacancyRecord>) -> Self {
        Self { employers, vacancies }
    }
}

impl DataSource for InMemorySource {
    fn employers(&self) -> Result<Vec<EmployerRecord>> {
        Ok(self.employers.clone())
    }

    fn vacancies(&self) -> Result<Vec<VacancyRecord>> {
        Ok(self.vacancies.clone())
    }
}
