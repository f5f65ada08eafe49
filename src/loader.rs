//! Batch loading of employer and vacancy records
//!
//! Employers go first so vacancies can reference them. Each insert commits on
//! its own; a failing record is logged and counted as not loaded, and the
//! batch moves on.

use std::fmt;

use crossbeam::channel::Sender;
use serde::Serialize;

use crate::Result;
use crate::record::{EmployerRecord, VacancyRecord};
use crate::source::DataSource;
use crate::storage::VacancyStore;
use crate::ui::{ProgressMessage, ProgressPhase};

const EMPLOYER_LOG_EVERY: usize = 10;
const VACANCY_LOG_EVERY: usize = 50;

/// Outcome of one batch load. `loaded <= total` for both entities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadStats {
    pub employers_total: usize,
    pub employers_loaded: usize,
    pub vacancies_total: usize,
    pub vacancies_loaded: usize,
}

impl LoadStats {
    /// Duplicates plus per-record failures
    pub fn employers_skipped(&self) -> usize {
        self.employers_total - self.employers_loaded
    }

    pub fn vacancies_skipped(&self) -> usize {
        self.vacancies_total - self.vacancies_loaded
    }
}

impl fmt::Display for LoadStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Load Statistics:")?;
        writeln!(f, "  Employers: {}/{}", self.employers_loaded, self.employers_total)?;
        write!(f, "  Vacancies: {}/{}", self.vacancies_loaded, self.vacancies_total)
    }
}

/// Loads record batches into a [`VacancyStore`]
pub struct RecordLoader<'a> {
    store: &'a mut VacancyStore,
    progress: Option<Sender<ProgressMessage>>,
}

impl<'a> RecordLoader<'a> {
    pub fn new(store: &'a mut VacancyStore) -> Self {
        Self { store, progress: None }
    }

    /// Report per-record progress on a channel (see [`crate::ui::ProgressManager`])
    pub fn with_progress(mut self, tx: Sender<ProgressMessage>) -> Self {
        self.progress = Some(tx);
        self
    }

    /// Pull both record sequences from a source and load them
    pub fn load_source(&mut self, source: &dyn DataSource) -> Result<LoadStats> {
        let employers = source.employers()?;
        let vacancies = source.vacancies()?;
        Ok(self.load_batch(&employers, &vacancies))
    }

    /// Insert every record, skipping ones whose external id is already stored.
    ///
    /// Never fails as a whole: per-record errors only lower the loaded counts.
    pub fn load_batch(
        &mut self,
        employers: &[EmployerRecord],
        vacancies: &[VacancyRecord],
    ) -> LoadStats {
        let mut stats = LoadStats {
            employers_total: employers.len(),
            vacancies_total: vacancies.len(),
            ..Default::default()
        };

        tracing::info!(
            "Loading {} employers and {} vacancies",
            employers.len(),
            vacancies.len()
        );

        self.notify(ProgressMessage::Started {
            phase: ProgressPhase::Employers,
            total: employers.len(),
        });
        for (i, employer) in employers.iter().enumerate() {
            let loaded = match self.store.insert_employer(employer) {
                Ok(written) => {
                    if !written {
                        tracing::debug!("Employer {:?} already stored", employer.id);
                    }
                    written
                }
                Err(e) => {
                    tracing::warn!("Failed to insert employer {:?}: {}", employer.id, e);
                    false
                }
            };
            if loaded {
                stats.employers_loaded += 1;
                if stats.employers_loaded % EMPLOYER_LOG_EVERY == 0 {
                    tracing::info!(
                        "Employers loaded: {}/{}",
                        stats.employers_loaded,
                        stats.employers_total
                    );
                }
            }
            self.notify(ProgressMessage::Progress {
                phase: ProgressPhase::Employers,
                current: i + 1,
                loaded,
            });
        }
        self.notify(ProgressMessage::Finished {
            phase: ProgressPhase::Employers,
        });

        self.notify(ProgressMessage::Started {
            phase: ProgressPhase::Vacancies,
            total: vacancies.len(),
        });
        for (i, vacancy) in vacancies.iter().enumerate() {
            let loaded = match self.store.insert_vacancy(vacancy) {
                Ok(written) => {
                    if !written {
                        tracing::debug!("Vacancy {:?} already stored", vacancy.id);
                    }
                    written
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to insert vacancy {:?} (employer {:?}): {}",
                        vacancy.id,
                        vacancy.employer_id(),
                        e
                    );
                    false
                }
            };
            if loaded {
                stats.vacancies_loaded += 1;
            }
            if (i + 1) % VACANCY_LOG_EVERY == 0 {
                tracing::info!("Vacancies processed: {}/{}", i + 1, stats.vacancies_total);
            }
            self.notify(ProgressMessage::Progress {
                phase: ProgressPhase::Vacancies,
                current: i + 1,
                loaded,
            });
        }
        self.notify(ProgressMessage::Finished {
            phase: ProgressPhase::Vacancies,
        });

        tracing::info!(
            "Load complete: {}/{} employers, {}/{} vacancies",
            stats.employers_loaded,
            stats.employers_total,
            stats.vacancies_loaded,
            stats.vacancies_total
        );
        stats
    }

    fn notify(&self, msg: ProgressMessage) {
        if let Some(tx) = &self.progress {
            // The receiver may already be gone; progress is best effort
            tx.send(msg).ok();
        }
    }
}
