//! ModelRepository - Typed accessor for model CRUD operations.

use std::marker::PhantomData;

use crate::model::{Id, Model};

use super::{ModelStore, StoreError};

/// Typed repository wrapper for accessing models of a specific type.
pub struct ModelRepository<'a, S, M> {
    store: &'a S,
    _marker: PhantomData<M>,
}

impl<'a, S: ModelStore, M: Model> ModelRepository<'a, S, M> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            _marker: PhantomData,
        }
    }

    /// Get a model by ID.
    pub fn get(&self, id: Id) -> Result<Option<M>, StoreError> {
        self.store.get_model(id)
    }

    /// Load several models in the order of `ids`, skipping any that are gone.
    pub fn get_many(&self, ids: &[Id]) -> Result<Vec<M>, StoreError> {
        let mut models = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(model) = self.store.get_model(*id)? {
                models.push(model);
            }
        }
        Ok(models)
    }

    /// All models of this type, ascending id.
    pub fn all(&self) -> Result<Vec<M>, StoreError> {
        self.store.find_models(&|_| true)
    }

    pub fn count(&self) -> Result<usize, StoreError> {
        Ok(self.all()?.len())
    }

    /// Find models matching a predicate.
    pub fn find(&self, predicate: &dyn Fn(&M) -> bool) -> Result<Vec<M>, StoreError> {
        self.store.find_models(predicate)
    }

    pub fn find_one(&self, predicate: &dyn Fn(&M) -> bool) -> Result<Option<M>, StoreError> {
        self.store.find_one_model(predicate)
    }

    /// Insert a new model. The returned copy carries the assigned id.
    pub fn insert(&self, model: &M) -> Result<M, StoreError> {
        self.store.insert_model(model)
    }

    /// Update an existing model.
    pub fn update(&self, model: &M) -> Result<M, StoreError> {
        self.store.update_model(model)
    }

    /// Insert if the model has never been saved, update otherwise.
    pub fn save(&self, model: &M) -> Result<M, StoreError> {
        if model.is_new() {
            self.insert(model)
        } else {
            self.update(model)
        }
    }

    /// Delete a model by ID. Returns true if it existed.
    pub fn delete(&self, id: Id) -> Result<bool, StoreError> {
        self.store.delete_model::<M>(id)
    }

    /// Return the first model matching `matches`, or insert the one `create`
    /// builds.
    ///
    /// Two callers racing on the same natural key both miss the lookup; the
    /// loser's insert conflicts and it returns the winner's record instead.
    pub fn find_or_create<E, F>(&self, matches: &dyn Fn(&M) -> bool, create: F) -> Result<M, E>
    where
        E: From<StoreError>,
        F: FnOnce() -> Result<M, E>,
    {
        if let Some(existing) = self.find_one(matches)? {
            return Ok(existing);
        }

        let model = create()?;
        match self.insert(&model) {
            Ok(saved) => Ok(saved),
            Err(StoreError::Conflict(conflict)) => match self.find_one(matches)? {
                Some(winner) => {
                    tracing::warn!(
                        collection = M::COLLECTION,
                        "lost insert race, using existing record"
                    );
                    Ok(winner)
                }
                None => {
                    tracing::warn!(
                        collection = M::COLLECTION,
                        %conflict,
                        "conflict on insert but no matching record"
                    );
                    Err(StoreError::Conflict(conflict).into())
                }
            },
            Err(e) => Err(e.into()),
        }
    }
}

/// Extension trait for typed model access on any ModelStore.
pub trait ModelsExt: ModelStore + Sized {
    /// Get a typed model repository.
    fn models<M: Model>(&self) -> ModelRepository<'_, Self, M> {
        ModelRepository::new(self)
    }
}

impl<S: ModelStore> ModelsExt for S {}
