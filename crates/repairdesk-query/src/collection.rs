//! Owned, versioned record collections.
//!
//! A [`Collection`] is the single owner of a listing's records. Every
//! successful mutation bumps [`Collection::version`], so a view can tell
//! when its cached page is stale. Queries only ever see `&[T]` snapshots.

use tracing::debug;

use crate::error::{QueryError, Result};
use crate::record::Record;

/// Records in insertion order, unique by id.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection<T: Record> {
    records: Vec<T>,
    version: u64,
}

impl<T: Record> Default for Collection<T> {
    fn default() -> Self {
        Collection {
            records: Vec::new(),
            version: 0,
        }
    }
}

impl<T: Record> Collection<T> {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Collection::default()
    }

    /// Builds a collection from existing records, rejecting duplicate ids.
    pub fn from_records(records: impl IntoIterator<Item = T>) -> Result<Self> {
        let mut collection = Collection::new();
        for record in records {
            collection.push_unique(record)?;
        }
        collection.version = 0;
        Ok(collection)
    }

    /// Read-only snapshot for querying.
    pub fn snapshot(&self) -> &[T] {
        &self.records
    }

    /// Incremented by every successful mutation.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the collection holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Finds a record by id.
    pub fn get(&self, id: &T::Id) -> Option<&T> {
        self.records.iter().find(|r| r.id() == id)
    }

    /// Appends a record. Fails if its id is already taken.
    pub fn insert(&mut self, record: T) -> Result<()> {
        self.push_unique(record)?;
        self.bump("insert");
        Ok(())
    }

    /// Appends several records as one mutation. Nothing is added if any id
    /// collides with an existing record or with another incoming record.
    /// An empty batch is not a mutation.
    pub fn extend(&mut self, records: impl IntoIterator<Item = T>) -> Result<usize> {
        let incoming: Vec<T> = records.into_iter().collect();
        if incoming.is_empty() {
            return Ok(0);
        }
        for (i, record) in incoming.iter().enumerate() {
            let clashes_existing = self.get(record.id()).is_some();
            let clashes_incoming = incoming[..i].iter().any(|r| r.id() == record.id());
            if clashes_existing || clashes_incoming {
                return Err(QueryError::DuplicateId(format!("{:?}", record.id())));
            }
        }
        let added = incoming.len();
        self.records.extend(incoming);
        self.bump("extend");
        Ok(added)
    }

    /// Replaces the record with the same id as `record`, keeping its
    /// position. Returns the previous record.
    pub fn replace_by_id(&mut self, record: T) -> Result<T> {
        let index = self.position(record.id())?;
        let previous = std::mem::replace(&mut self.records[index], record);
        self.bump("replace");
        Ok(previous)
    }

    /// Removes and returns the record with `id`.
    pub fn remove_by_id(&mut self, id: &T::Id) -> Result<T> {
        let index = self.position(id)?;
        let removed = self.records.remove(index);
        self.bump("remove");
        Ok(removed)
    }

    /// Consumes the collection, returning its records.
    pub fn into_records(self) -> Vec<T> {
        self.records
    }

    fn position(&self, id: &T::Id) -> Result<usize> {
        self.records
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| QueryError::NotFound(format!("{:?}", id)))
    }

    fn push_unique(&mut self, record: T) -> Result<()> {
        if self.get(record.id()).is_some() {
            return Err(QueryError::DuplicateId(format!("{:?}", record.id())));
        }
        self.records.push(record);
        Ok(())
    }

    fn bump(&mut self, op: &'static str) {
        self.version += 1;
        debug!(op, version = self.version, len = self.records.len(), "collection mutated");
    }
}
