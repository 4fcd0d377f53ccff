//! Stores - the persistence seam.
//!
//! [`ModelStore`] is the narrow interface the domain core talks to. A store
//! assigns identifiers, enforces each model's unique keys and foreign keys,
//! and cascades deletes from a parent to the records that belong to it.
//! [`InMemoryModelStore`] is the reference implementation; a SQL-backed store
//! maps the same contract onto unique indexes and `ON DELETE CASCADE`.
//!
//! ```
//! use moovover::{InMemoryModelStore, Movie, ModelsExt};
//!
//! let store = InMemoryModelStore::new();
//! let mut movie = Movie::new();
//! movie.set_title("Aladdin");
//! let saved = store.models::<Movie>().save(&movie).unwrap();
//! assert_eq!(saved.id(), Some(1));
//! ```

mod in_memory;
mod repository;

use thiserror::Error;

use crate::model::{Id, Model, UniqueKey};
use crate::validation::{FieldError, ValidationErrors};

pub use in_memory::InMemoryModelStore;
pub use repository::{ModelRepository, ModelsExt};

/// A unique key was already held by another record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}.{} {}", .collection, .field, .message.unwrap_or("has already been taken"))]
pub struct ConflictError {
    pub collection: &'static str,
    pub field: &'static str,
    pub message: Option<&'static str>,
}

impl ConflictError {
    pub fn new<M: Model>(key: &UniqueKey) -> Self {
        Self {
            collection: M::COLLECTION,
            field: key.field,
            message: key.message,
        }
    }
}

impl From<ConflictError> for ValidationErrors {
    fn from(conflict: ConflictError) -> Self {
        let mut errors = ValidationErrors::new();
        errors.add(conflict.field, FieldError::taken(conflict.message));
        errors
    }
}

/// Error type for store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Unique key violation.
    #[error(transparent)]
    Conflict(#[from] ConflictError),

    /// Foreign key points at a record that does not exist.
    #[error("{field} references missing {collection} {id}")]
    MissingParent {
        collection: &'static str,
        field: &'static str,
        id: Id,
    },

    /// Update of a record that does not exist.
    #[error("{collection} {id} not found")]
    NotFound { collection: &'static str, id: Id },

    /// Serialization/deserialization error.
    #[error("model serialization error: {0}")]
    Serde(String),

    /// Storage-level error.
    #[error("model storage error: {0}")]
    Storage(String),
}

/// Abstract storage for models.
///
/// Reads return records in ascending id order.
pub trait ModelStore: Send + Sync {
    /// Get a model by id. Returns None if not found.
    fn get_model<M: Model>(&self, id: Id) -> Result<Option<M>, StoreError>;

    /// Find models matching a predicate.
    fn find_models<M: Model>(&self, predicate: &dyn Fn(&M) -> bool)
        -> Result<Vec<M>, StoreError>;

    /// Find the first model matching a predicate.
    fn find_one_model<M: Model>(
        &self,
        predicate: &dyn Fn(&M) -> bool,
    ) -> Result<Option<M>, StoreError> {
        Ok(self.find_models(predicate)?.into_iter().next())
    }

    /// Find the record currently holding `key`, if any.
    fn find_by_unique_key<M: Model>(&self, key: &UniqueKey) -> Result<Option<M>, StoreError> {
        let Some(value) = key.value() else {
            return Ok(None);
        };
        self.find_one_model(&|model: &M| {
            model
                .unique_keys()
                .iter()
                .any(|k| k.value().as_deref() == Some(value.as_str()))
        })
    }

    /// Whether a record with `id` exists in `collection`.
    fn contains(&self, collection: &str, id: Id) -> Result<bool, StoreError>;

    /// Insert a new model, assigning its id.
    ///
    /// Fails with `Conflict` if a unique key is taken and with `MissingParent`
    /// if a foreign key dangles. The check and the write are atomic.
    fn insert_model<M: Model>(&self, model: &M) -> Result<M, StoreError>;

    /// Replace an existing model. Same failure modes as insert, plus `NotFound`.
    fn update_model<M: Model>(&self, model: &M) -> Result<M, StoreError>;

    /// Delete a model and, transitively, every record that belongs to it.
    /// Returns false if it did not exist.
    fn delete_model<M: Model>(&self, id: Id) -> Result<bool, StoreError>;
}
