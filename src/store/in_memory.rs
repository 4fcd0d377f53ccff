//! InMemoryModelStore - BTreeMap-backed model store for testing and development.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::model::{Id, Model, ParentRef};

use super::{ConflictError, ModelStore, StoreError};

/// Internal stored representation of a model.
struct StoredModel {
    bytes: Vec<u8>,
    /// Unique index entries this record holds.
    keys: Vec<String>,
    parents: Vec<ParentRef>,
}

#[derive(Default)]
struct Table {
    rows: BTreeMap<Id, StoredModel>,
    /// Unique key value → owning id.
    index: HashMap<String, Id>,
    last_id: Id,
}

#[derive(Default)]
struct Tables {
    tables: HashMap<&'static str, Table>,
}

/// In-memory model store.
///
/// One table per collection, rows ordered by id. Unique keys and foreign keys
/// are checked under the write lock, so concurrent inserts of the same key
/// see exactly one winner. Clone-friendly via Arc.
#[derive(Clone, Default)]
pub struct InMemoryModelStore {
    storage: Arc<RwLock<Tables>>,
}

impl InMemoryModelStore {
    /// Create a new empty model store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records in a collection.
    pub fn len(&self, collection: &str) -> Result<usize, StoreError> {
        let storage = self.read()?;
        Ok(storage.tables.get(collection).map_or(0, |t| t.rows.len()))
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StoreError> {
        self.storage
            .read()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StoreError> {
        self.storage
            .write()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))
    }
}

impl Tables {
    fn contains(&self, collection: &str, id: Id) -> bool {
        self.tables
            .get(collection)
            .map_or(false, |t| t.rows.contains_key(&id))
    }

    /// Validate keys and parents of `model` (whose id is `id`) and build its row.
    fn prepare<M: Model>(&self, model: &M, id: Id) -> Result<StoredModel, StoreError> {
        let parents = model.parents();
        for parent in &parents {
            if !self.contains(parent.collection, parent.id) {
                return Err(StoreError::MissingParent {
                    collection: parent.collection,
                    field: parent.field,
                    id: parent.id,
                });
            }
        }

        let mut keys = Vec::new();
        for key in model.unique_keys() {
            let Some(value) = key.value() else {
                continue;
            };
            let holder = self
                .tables
                .get(M::COLLECTION)
                .and_then(|t| t.index.get(&value));
            if matches!(holder, Some(&holder) if holder != id) {
                return Err(ConflictError::new::<M>(&key).into());
            }
            keys.push(value);
        }

        let bytes = serde_json::to_vec(model).map_err(|e| StoreError::Serde(e.to_string()))?;

        Ok(StoredModel {
            bytes,
            keys,
            parents,
        })
    }

    fn put(&mut self, collection: &'static str, id: Id, row: StoredModel) {
        let table = self.tables.entry(collection).or_default();
        if let Some(old) = table.rows.remove(&id) {
            for key in old.keys {
                table.index.remove(&key);
            }
        }
        for key in &row.keys {
            table.index.insert(key.clone(), id);
        }
        table.rows.insert(id, row);
    }

    /// Remove a row and everything that belongs to it. Returns rows removed.
    fn remove(&mut self, collection: &str, id: Id) -> usize {
        let Some(table) = self.tables.get_mut(collection) else {
            return 0;
        };
        let Some(row) = table.rows.remove(&id) else {
            return 0;
        };
        for key in row.keys {
            table.index.remove(&key);
        }

        let dependents: Vec<(&'static str, Id)> = self
            .tables
            .iter()
            .flat_map(|(name, table)| {
                table
                    .rows
                    .iter()
                    .filter(|(_, row)| {
                        row.parents
                            .iter()
                            .any(|p| p.collection == collection && p.id == id)
                    })
                    .map(move |(child, _)| (*name, *child))
            })
            .collect();

        1 + dependents
            .into_iter()
            .map(|(name, child)| self.remove(name, child))
            .sum::<usize>()
    }
}

fn decode<M: Model>(row: &StoredModel) -> Result<M, StoreError> {
    serde_json::from_slice(&row.bytes).map_err(|e| StoreError::Serde(e.to_string()))
}

impl ModelStore for InMemoryModelStore {
    fn get_model<M: Model>(&self, id: Id) -> Result<Option<M>, StoreError> {
        let storage = self.read()?;

        match storage
            .tables
            .get(M::COLLECTION)
            .and_then(|t| t.rows.get(&id))
        {
            Some(row) => Ok(Some(decode(row)?)),
            None => Ok(None),
        }
    }

    fn find_models<M: Model>(
        &self,
        predicate: &dyn Fn(&M) -> bool,
    ) -> Result<Vec<M>, StoreError> {
        let storage = self.read()?;
        let Some(table) = storage.tables.get(M::COLLECTION) else {
            return Ok(Vec::new());
        };

        let mut results = Vec::new();
        for row in table.rows.values() {
            let model: M = decode(row)?;
            if predicate(&model) {
                results.push(model);
            }
        }

        Ok(results)
    }

    fn find_by_unique_key<M: Model>(
        &self,
        key: &crate::model::UniqueKey,
    ) -> Result<Option<M>, StoreError> {
        let Some(value) = key.value() else {
            return Ok(None);
        };
        let storage = self.read()?;
        let row = storage
            .tables
            .get(M::COLLECTION)
            .and_then(|t| t.index.get(&value).and_then(|id| t.rows.get(id)));

        match row {
            Some(row) => Ok(Some(decode(row)?)),
            None => Ok(None),
        }
    }

    fn contains(&self, collection: &str, id: Id) -> Result<bool, StoreError> {
        Ok(self.read()?.contains(collection, id))
    }

    fn insert_model<M: Model>(&self, model: &M) -> Result<M, StoreError> {
        let mut storage = self.write()?;

        let id = storage
            .tables
            .get(M::COLLECTION)
            .map_or(0, |t| t.last_id)
            + 1;
        let mut stored = model.clone();
        stored.set_id(id);

        let row = storage.prepare(&stored, id)?;
        storage.put(M::COLLECTION, id, row);
        storage.tables.entry(M::COLLECTION).or_default().last_id = id;

        Ok(stored)
    }

    fn update_model<M: Model>(&self, model: &M) -> Result<M, StoreError> {
        let mut storage = self.write()?;

        let id = model.id().ok_or(StoreError::NotFound {
            collection: M::COLLECTION,
            id: 0,
        })?;
        if !storage.contains(M::COLLECTION, id) {
            return Err(StoreError::NotFound {
                collection: M::COLLECTION,
                id,
            });
        }

        let row = storage.prepare(model, id)?;
        storage.put(M::COLLECTION, id, row);

        Ok(model.clone())
    }

    fn delete_model<M: Model>(&self, id: Id) -> Result<bool, StoreError> {
        let mut storage = self.write()?;

        let removed = storage.remove(M::COLLECTION, id);
        if removed > 1 {
            tracing::debug!(
                collection = M::COLLECTION,
                id,
                dependents = removed - 1,
                "cascaded delete"
            );
        }

        Ok(removed > 0)
    }
}
