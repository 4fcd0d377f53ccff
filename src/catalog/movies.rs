use crate::clock::Clock;
use crate::error::CatalogError;
use crate::model::{Id, Movie, MovieParams, Moviegoer, Review};
use crate::scope::{MovieQueries, MovieQuery};
use crate::store::{ModelStore, ModelsExt};

use super::Catalog;

impl<S: ModelStore, C: Clock> Catalog<S, C> {
    pub fn create_movie(&self, params: MovieParams) -> Result<Movie, CatalogError> {
        let mut movie = Movie::new();
        movie.assign(params);
        self.persist(movie)
    }

    /// Apply `params` to a stored movie. On failure the stored movie is
    /// unchanged.
    pub fn update_movie(&self, id: Id, params: MovieParams) -> Result<Movie, CatalogError> {
        let mut movie: Movie = self.load(id)?;
        movie.assign(params);
        self.persist(movie)
    }

    pub fn find_movie(&self, id: Id) -> Result<Movie, CatalogError> {
        self.load(id)
    }

    /// Delete a movie and its reviews.
    pub fn delete_movie(&self, id: Id) -> Result<(), CatalogError> {
        self.remove::<Movie>(id)
    }

    /// Every movie, ascending id.
    pub fn list_movies(&self) -> Result<Vec<Movie>, CatalogError> {
        Ok(self.store.models::<Movie>().all()?)
    }

    pub fn reviews_for(&self, movie_id: Id) -> Result<Vec<Review>, CatalogError> {
        let movie: Movie = self.load(movie_id)?;
        Ok(movie.reviews(&self.store)?)
    }

    pub fn moviegoers_for(&self, movie_id: Id) -> Result<Vec<Moviegoer>, CatalogError> {
        let movie: Movie = self.load(movie_id)?;
        Ok(movie.moviegoers(&self.store)?)
    }
}

impl<S: MovieQueries, C: Clock> Catalog<S, C> {
    /// Movies matching `query`, ascending id. Time-relative steps are
    /// measured from the catalog's clock.
    pub fn list_movies_by(&self, query: &MovieQuery) -> Result<Vec<Movie>, CatalogError> {
        query.load(&self.store, &self.clock)
    }
}
