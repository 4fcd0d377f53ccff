use thiserror::Error;

use crate::model::Id;
use crate::scope::ArgumentError;
use crate::store::StoreError;
use crate::validation::ValidationErrors;

/// Everything a catalog operation can fail with.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    /// The record was rejected; nothing was written.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error("{collection} {id} not found")]
    NotFound { collection: &'static str, id: Id },

    /// A scope was built with an invalid argument.
    #[error(transparent)]
    Argument(#[from] ArgumentError),

    #[error("store failure: {0}")]
    Store(StoreError),
}

impl CatalogError {
    /// The HTTP status a web layer would answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            CatalogError::Validation(_) => 422,
            CatalogError::NotFound { .. } => 404,
            CatalogError::Argument(_) => 400,
            CatalogError::Store(_) => 500,
        }
    }

    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            CatalogError::Validation(errors) => Some(errors),
            _ => None,
        }
    }

    pub(crate) fn not_found<M: crate::Model>(id: Id) -> Self {
        CatalogError::NotFound {
            collection: M::COLLECTION,
            id,
        }
    }
}

/// A conflict surfacing from the store is the same `taken` error the
/// pre-save check reports; a dangling parent is the same `required` error.
impl From<StoreError> for CatalogError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(conflict) => CatalogError::Validation(conflict.into()),
            StoreError::MissingParent { field, .. } => {
                let mut errors = ValidationErrors::new();
                errors.add(field, crate::validation::FieldError::required());
                CatalogError::Validation(errors)
            }
            StoreError::NotFound { collection, id } => CatalogError::NotFound { collection, id },
            other => CatalogError::Store(other),
        }
    }
}
