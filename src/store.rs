use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info};

use crate::homeowner::PersonRecord;

/// Errors raised by a person store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("store serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("store rejected record: {0}")]
    Rejected(String),
}

/// A person as persisted by a store
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct StoredPerson {
    pub id: u64,
    #[serde(flatten)]
    pub person: PersonRecord,
    /// Title, first name or initial and surname, for display and search
    pub full_name: String,
    /// Unix seconds
    pub created_at: u64,
}

/// Persistence seam used by the batch importer
///
/// `begin` opens a batch; `rollback` discards every record created since.
/// A failed `commit` leaves the batch open so the caller can roll it back.
pub trait PersonStore {
    /// Equality on title, first name, initial and surname
    fn exists(&self, person: &PersonRecord) -> bool;
    fn create(&mut self, person: PersonRecord) -> Result<StoredPerson, StoreError>;
    fn begin(&mut self);
    fn commit(&mut self) -> Result<(), StoreError>;
    fn rollback(&mut self);
}

#[derive(Debug, Clone, Copy)]
struct Checkpoint {
    len: usize,
    last_id: u64,
}

/// Vector-backed store
#[derive(Serialize, Deserialize, Debug, Default, Clone)]
#[serde(from = "StoreFile")]
pub struct MemoryStore {
    people: Vec<StoredPerson>,
    last_id: u64,
    /// Stored copies per person, kept in step with `people`
    #[serde(skip)]
    index: HashMap<PersonRecord, usize>,
    #[serde(skip)]
    checkpoint: Option<Checkpoint>,
}

/// On-disk shape of a memory store; the index is rebuilt on load
#[derive(Deserialize)]
struct StoreFile {
    people: Vec<StoredPerson>,
    last_id: u64,
}

impl From<StoreFile> for MemoryStore {
    fn from(file: StoreFile) -> Self {
        let mut store = Self {
            people: Vec::with_capacity(file.people.len()),
            last_id: file.last_id,
            ..Default::default()
        };
        for stored in file.people {
            store.insert(stored);
        }
        store
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All stored people in insertion order
    pub fn all(&self) -> &[StoredPerson] {
        &self.people
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    fn insert(&mut self, stored: StoredPerson) {
        *self.index.entry(stored.person.clone()).or_default() += 1;
        self.people.push(stored);
    }

    /// Case-insensitive substring search over full name, first name and surname, newest first
    pub fn search(&self, term: &str) -> Vec<&StoredPerson> {
        let needle = term.trim().to_lowercase();
        self.people
            .iter()
            .rev()
            .filter(|stored| {
                needle.is_empty()
                    || stored.full_name.to_lowercase().contains(&needle)
                    || stored
                        .person
                        .first_name()
                        .is_some_and(|name| name.to_lowercase().contains(&needle))
                    || stored.person.last_name().to_lowercase().contains(&needle)
            })
            .collect()
    }
}

impl PersonStore for MemoryStore {
    fn exists(&self, person: &PersonRecord) -> bool {
        self.index.contains_key(person)
    }

    fn create(&mut self, person: PersonRecord) -> Result<StoredPerson, StoreError> {
        self.last_id += 1;
        let stored = StoredPerson {
            id: self.last_id,
            full_name: person.full_name(),
            person,
            created_at: unix_now(),
        };
        self.insert(stored.clone());
        Ok(stored)
    }

    fn begin(&mut self) {
        self.checkpoint = Some(Checkpoint {
            len: self.people.len(),
            last_id: self.last_id,
        });
    }

    fn commit(&mut self) -> Result<(), StoreError> {
        self.checkpoint = None;
        Ok(())
    }

    fn rollback(&mut self) {
        if let Some(checkpoint) = self.checkpoint.take() {
            debug!("Rolling back {} created people", self.people.len() - checkpoint.len);
            let index = &mut self.index;
            for stored in self.people.drain(checkpoint.len..) {
                if let Some(count) = index.get_mut(&stored.person) {
                    *count -= 1;
                    if *count == 0 {
                        index.remove(&stored.person);
                    }
                }
            }
            self.last_id = checkpoint.last_id;
        }
    }
}

/// Memory store persisted as a JSON file on every commit
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl JsonFileStore {
    /// Load the store at `path`; a missing file yields an empty store
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let inner = match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => MemoryStore::default(),
            Err(e) => return Err(e.into()),
        };
        info!("Loaded {} people from {}", inner.len(), path.display());
        Ok(Self { path, inner })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn people(&self) -> &MemoryStore {
        &self.inner
    }

    fn save(&self) -> Result<(), StoreError> {
        let content = serde_json::to_vec_pretty(&self.inner)?;
        write_atomically(&self.path, |temp| {
            temp.write_all(&content)?;
            Ok(())
        })
    }
}

/// Replace `path` with whatever `write` puts in a sibling temp file
/// On any error the existing file is left byte-for-byte as it was
fn write_atomically<F>(path: &Path, write: F) -> Result<(), StoreError>
where
    F: FnOnce(&mut NamedTempFile) -> Result<(), StoreError>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    // Same directory as the target so the final rename never crosses filesystems
    let mut temp = NamedTempFile::new_in(dir)?;
    write(&mut temp)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;

    debug!("Saved store to {}", path.display());
    Ok(())
}

impl PersonStore for JsonFileStore {
    fn exists(&self, person: &PersonRecord) -> bool {
        self.inner.exists(person)
    }

    fn create(&mut self, person: PersonRecord) -> Result<StoredPerson, StoreError> {
        self.inner.create(person)
    }

    fn begin(&mut self) {
        self.inner.begin();
    }

    fn commit(&mut self) -> Result<(), StoreError> {
        self.save()?;
        self.inner.commit()
    }

    fn rollback(&mut self) {
        self.inner.rollback();
    }
}

fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::SystemTime::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default()
}
