use crate::model::Model;
use crate::store::{ModelStore, StoreError};

use super::{FieldError, ValidationErrors};

/// Rules that can only be answered by looking at what is already stored:
/// unique keys held by another record and foreign keys that point nowhere.
pub fn check_against_store<M, S>(record: &M, store: &S) -> Result<ValidationErrors, StoreError>
where
    M: Model,
    S: ModelStore,
{
    let mut errors = ValidationErrors::new();

    for key in record.unique_keys() {
        if let Some(holder) = store.find_by_unique_key::<M>(&key)? {
            if holder.id() != record.id() {
                errors.add(key.field, FieldError::taken(key.message));
            }
        }
    }

    for parent in record.parents() {
        if !store.contains(parent.collection, parent.id)? {
            errors.add(parent.field, FieldError::required());
        }
    }

    Ok(errors)
}
