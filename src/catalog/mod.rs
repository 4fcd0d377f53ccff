//! Catalog - the validate-then-persist path for movies, moviegoers and
//! reviews.
//!
//! A `Catalog<S, C>` holds a store, a clock and the validation config. Every
//! write goes through the same pipeline: normalize, run the entity's rules,
//! check unique and foreign keys against the store, stamp timestamps, save.
//! A record that fails any step is returned as `CatalogError::Validation`
//! and nothing is written.
//!
//! ```
//! use moovover::{Catalog, Identity, InMemoryModelStore};
//!
//! let catalog = Catalog::new(InMemoryModelStore::new());
//! let alice = catalog
//!     .find_or_create_moviegoer(Identity::new("github", "42").with_name("Alice"))
//!     .unwrap();
//! let again = catalog.find_or_create_moviegoer(Identity::new("github", "42")).unwrap();
//! assert_eq!(alice.id(), again.id());
//! ```

mod moviegoers;
mod movies;
mod reviews;
pub mod seed;

use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::error::CatalogError;
use crate::model::Model;
use crate::store::{ModelStore, ModelsExt};
use crate::validation::{check_against_store, Validate, ValidationErrors};

pub use seed::SeedReport;

pub struct Catalog<S, C = SystemClock> {
    store: S,
    clock: C,
    config: Config,
}

impl<S: ModelStore> Catalog<S> {
    /// A catalog on `store` with the wall clock and default rules.
    pub fn new(store: S) -> Self {
        Self {
            store,
            clock: SystemClock,
            config: Config::default(),
        }
    }
}

impl<S: ModelStore, C: Clock> Catalog<S, C> {
    pub fn with_clock<C2: Clock>(self, clock: C2) -> Catalog<S, C2> {
        Catalog {
            store: self.store,
            clock,
            config: self.config,
        }
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run `record` through the entity's rules and the store checks without
    /// saving it. Normalization is applied to `record` either way.
    pub fn validate<M: Model + Validate>(&self, record: &mut M) -> Result<(), CatalogError> {
        record.normalize();
        let mut errors: ValidationErrors = M::rules().run(&*record, &self.config);
        errors.merge(check_against_store(&*record, &self.store)?);

        if errors.is_empty() {
            Ok(())
        } else {
            tracing::debug!(
                collection = M::COLLECTION,
                id = ?record.id(),
                %errors,
                "validation failed"
            );
            Err(CatalogError::Validation(errors))
        }
    }

    /// Validate, stamp and save. Inserts new records, updates stored ones.
    fn persist<M: Model + Validate>(&self, mut record: M) -> Result<M, CatalogError> {
        self.validate(&mut record)?;
        record.touch(self.clock.now());

        let created = record.is_new();
        let saved = self.store.models::<M>().save(&record)?;
        tracing::info!(
            collection = M::COLLECTION,
            id = ?saved.id(),
            created,
            "saved"
        );
        Ok(saved)
    }

    fn load<M: Model>(&self, id: crate::model::Id) -> Result<M, CatalogError> {
        self.store
            .models::<M>()
            .get(id)?
            .ok_or_else(|| CatalogError::not_found::<M>(id))
    }

    fn remove<M: Model>(&self, id: crate::model::Id) -> Result<(), CatalogError> {
        if self.store.models::<M>().delete(id)? {
            tracing::info!(collection = M::COLLECTION, id, "deleted");
            Ok(())
        } else {
            Err(CatalogError::not_found::<M>(id))
        }
    }
}
