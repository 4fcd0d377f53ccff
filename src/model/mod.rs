//! Models - the movie, moviegoer and review entities.
//!
//! Every entity implements [`Model`], which tells a [`ModelStore`](crate::ModelStore)
//! where the entity lives, which records own it, and which field combinations
//! must be unique. The impls are derived:
//!
//! ```ignore
//! #[derive(Clone, Serialize, Deserialize, Model)]
//! #[model(collection = "moviegoers", timestamps)]
//! pub struct Moviegoer {
//!     id: Option<Id>,
//!     provider: Option<String>,
//!     #[model(unique_with = "provider")]
//!     uid: Option<String>,
//!     created_at: Option<DateTime<Utc>>,
//!     updated_at: Option<DateTime<Utc>>,
//! }
//! ```
//!
//! Entities hold state only. Associations (`movie.reviews(&store)`) are
//! queries against the store, never cached copies.

mod movie;
mod moviegoer;
mod rating;
mod review;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};

pub use movie::{Movie, MovieParams};
pub use moviegoer::{Identity, Moviegoer};
pub use rating::Rating;
pub use review::{Review, ReviewParams};

/// Store-assigned identifier.
pub type Id = u64;

/// Trait for types that can be stored as models.
pub trait Model: Serialize + DeserializeOwned + Clone + Send + Sync {
    /// The collection name for this model type (e.g., "movies", "reviews").
    /// Maps to a table in SQL, a key prefix in KV stores, etc.
    const COLLECTION: &'static str;

    /// The identifier, or `None` before the first save.
    fn id(&self) -> Option<Id>;

    /// Called by the store when it assigns an identifier on insert.
    fn set_id(&mut self, id: Id);

    /// Records this one belongs to. Deleting any of them deletes this one.
    fn parents(&self) -> Vec<ParentRef> {
        Vec::new()
    }

    /// Field combinations that must be unique within the collection.
    fn unique_keys(&self) -> Vec<UniqueKey> {
        Vec::new()
    }

    /// Maintain timestamps before a save.
    fn touch(&mut self, _now: DateTime<Utc>) {}

    fn is_new(&self) -> bool {
        self.id().is_none()
    }
}

/// A foreign key: `field` on the child holds `id` of a record in `collection`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParentRef {
    pub collection: &'static str,
    pub field: &'static str,
    pub id: Id,
}

/// A composite natural key. Two records of one collection conflict when all
/// parts are equal; a key with any missing part never conflicts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueKey {
    /// The field a `taken` error is reported on.
    pub field: &'static str,
    /// Overrides the default "has already been taken".
    pub message: Option<&'static str>,
    parts: Vec<Option<String>>,
}

impl UniqueKey {
    pub fn new(field: &'static str, message: Option<&'static str>, parts: Vec<Option<String>>) -> Self {
        Self {
            field,
            message,
            parts,
        }
    }

    /// The key as stored in a unique index, or `None` if a part is missing.
    ///
    /// Parts are JSON-encoded, so no choice of part text makes two different
    /// part lists share a value.
    pub fn value(&self) -> Option<String> {
        let parts: Vec<&str> = self.parts.iter().map(|p| p.as_deref()).collect::<Option<_>>()?;
        let encoded = serde_json::to_string(&parts).ok()?;
        Some(format!("{}={}", self.field, encoded))
    }
}

/// Conversion of a field value into one part of a [`UniqueKey`].
pub trait KeyPart {
    fn key_part(&self) -> Option<String>;
}

impl KeyPart for Option<String> {
    fn key_part(&self) -> Option<String> {
        self.clone()
    }
}

impl KeyPart for Option<Id> {
    fn key_part(&self) -> Option<String> {
        self.map(|id| id.to_string())
    }
}

impl KeyPart for String {
    fn key_part(&self) -> Option<String> {
        Some(self.clone())
    }
}
