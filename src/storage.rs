use crate::counters::WorkloadCounters;
use crate::model::Roster;
use crate::schedule::{GeneratedSchedule, ScheduleId};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("counters changed since they were read (expected version {expected}, found {found})")]
    VersionConflict { expected: u64, found: u64 },
    #[error("unknown schedule: {0}")]
    UnknownSchedule(String),
    #[error("reading or writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("parsing {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Valeur accompagnée de la version du document lu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Versioned<T> {
    pub version: u64,
    pub value: T,
}

pub trait Storage {
    fn load_roster(&self) -> Result<Roster, StorageError>;
    fn save_roster(&self, roster: &Roster) -> Result<(), StorageError>;

    /// Horaires sauvegardés, du plus récent au plus ancien.
    fn load_schedules(&self) -> Result<Vec<GeneratedSchedule>, StorageError>;
    fn save_schedule(&self, schedule: &GeneratedSchedule) -> Result<(), StorageError>;
    fn delete_schedule(&self, id: &ScheduleId) -> Result<(), StorageError>;

    fn load_counters(&self) -> Result<Versioned<WorkloadCounters>, StorageError>;
    /// Écrit les compteurs si la version stockée vaut encore `expected`.
    /// Retourne la nouvelle version.
    fn save_counters(
        &self,
        expected: u64,
        counters: &WorkloadCounters,
    ) -> Result<u64, StorageError>;

    fn find_schedule(&self, id: &ScheduleId) -> Result<GeneratedSchedule, StorageError> {
        self.load_schedules()?
            .into_iter()
            .find(|s| &s.id == id)
            .ok_or_else(|| StorageError::UnknownSchedule(id.to_string()))
    }
}

/// Un dossier de documents JSON : `roster.json`, `schedules.json`, `counters.json`.
///
/// Un document absent vaut sa valeur par défaut.
pub struct JsonStorage {
    dir: PathBuf,
}

const ROSTER_FILE: &str = "roster.json";
const SCHEDULES_FILE: &str = "schedules.json";
const COUNTERS_FILE: &str = "counters.json";

impl JsonStorage {
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self, StorageError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|source| StorageError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    fn read<T: DeserializeOwned + Default>(&self, file: &str) -> Result<T, StorageError> {
        let path = self.dir.join(file);
        let data = match fs::read(&path) {
            Ok(data) => data,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(T::default()),
            Err(source) => return Err(StorageError::Io { path, source }),
        };
        serde_json::from_slice(&data).map_err(|source| StorageError::Parse { path, source })
    }

    /// Sauvegarde de manière atomique.
    fn write<T: Serialize>(&self, file: &str, value: &T) -> Result<(), StorageError> {
        let path = self.dir.join(file);
        let io_err = |source| StorageError::Io {
            path: path.clone(),
            source,
        };
        let json = serde_json::to_vec_pretty(value).map_err(|source| StorageError::Parse {
            path: path.clone(),
            source,
        })?;
        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(io_err)?;
        tmp.write_all(&json).map_err(io_err)?;
        tmp.flush().map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(&path).map_err(|e| io_err(e.error))?;
        Ok(())
    }
}

impl Storage for JsonStorage {
    fn load_roster(&self) -> Result<Roster, StorageError> {
        self.read(ROSTER_FILE)
    }

    fn save_roster(&self, roster: &Roster) -> Result<(), StorageError> {
        self.write(ROSTER_FILE, roster)
    }

    fn load_schedules(&self) -> Result<Vec<GeneratedSchedule>, StorageError> {
        let mut schedules: Vec<GeneratedSchedule> = self.read(SCHEDULES_FILE)?;
        schedules.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(schedules)
    }

    fn save_schedule(&self, schedule: &GeneratedSchedule) -> Result<(), StorageError> {
        let mut schedules: Vec<GeneratedSchedule> = self.read(SCHEDULES_FILE)?;
        match schedules.iter_mut().find(|s| s.id == schedule.id) {
            Some(existing) => *existing = schedule.clone(),
            None => schedules.push(schedule.clone()),
        }
        self.write(SCHEDULES_FILE, &schedules)
    }

    fn delete_schedule(&self, id: &ScheduleId) -> Result<(), StorageError> {
        let mut schedules: Vec<GeneratedSchedule> = self.read(SCHEDULES_FILE)?;
        let before = schedules.len();
        schedules.retain(|s| &s.id != id);
        if schedules.len() == before {
            return Err(StorageError::UnknownSchedule(id.to_string()));
        }
        self.write(SCHEDULES_FILE, &schedules)
    }

    fn load_counters(&self) -> Result<Versioned<WorkloadCounters>, StorageError> {
        self.read(COUNTERS_FILE)
    }

    fn save_counters(
        &self,
        expected: u64,
        counters: &WorkloadCounters,
    ) -> Result<u64, StorageError> {
        let current: Versioned<WorkloadCounters> = self.read(COUNTERS_FILE)?;
        if current.version != expected {
            return Err(StorageError::VersionConflict {
                expected,
                found: current.version,
            });
        }
        let next = Versioned {
            version: expected + 1,
            value: counters.clone(),
        };
        self.write(COUNTERS_FILE, &next)?;
        Ok(next.version)
    }
}

impl<T: Default> Default for Versioned<T> {
    fn default() -> Self {
        Self {
            version: 0,
            value: T::default(),
        }
    }
}
