use crate::clock::Clock;
use crate::error::CatalogError;
use crate::model::{Id, Identity, Model, Movie, Moviegoer, Review};
use crate::store::{ModelStore, ModelsExt};
use crate::validation::Validate;

use super::Catalog;

impl<S: ModelStore, C: Clock> Catalog<S, C> {
    /// The moviegoer `identity` names, created on first sign-in.
    ///
    /// Profile fields are copied only when the moviegoer is created; a
    /// returning user keeps the stored name and email.
    pub fn find_or_create_moviegoer(&self, identity: Identity) -> Result<Moviegoer, CatalogError> {
        let repo = self.store.models::<Moviegoer>();
        let moviegoer = repo.find_or_create::<CatalogError, _>(&|m| m.matches(&identity), || {
            let mut moviegoer = Moviegoer::from_identity(identity.clone());
            // uniqueness is left to the insert so a lost race resolves to the winner
            moviegoer.validate(&self.config)?;
            moviegoer.touch(self.clock.now());
            tracing::info!(
                provider = %identity.provider,
                uid = %identity.uid,
                "creating moviegoer"
            );
            Ok(moviegoer)
        })?;
        Ok(moviegoer)
    }

    pub fn find_moviegoer(&self, id: Id) -> Result<Moviegoer, CatalogError> {
        self.load(id)
    }

    /// Movies the moviegoer has reviewed, in review order.
    pub fn movies_for(&self, moviegoer_id: Id) -> Result<Vec<Movie>, CatalogError> {
        let moviegoer: Moviegoer = self.load(moviegoer_id)?;
        Ok(moviegoer.movies(&self.store)?)
    }

    pub fn reviews_by(&self, moviegoer_id: Id) -> Result<Vec<Review>, CatalogError> {
        let moviegoer: Moviegoer = self.load(moviegoer_id)?;
        Ok(moviegoer.reviews(&self.store)?)
    }

    /// Delete a moviegoer and their reviews.
    pub fn delete_moviegoer(&self, id: Id) -> Result<(), CatalogError> {
        self.remove::<Moviegoer>(id)
    }
}
