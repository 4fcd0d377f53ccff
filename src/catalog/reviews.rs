use crate::clock::Clock;
use crate::error::CatalogError;
use crate::model::{Id, Movie, Moviegoer, Review, ReviewParams};
use crate::store::ModelStore;

use super::Catalog;

impl<S: ModelStore, C: Clock> Catalog<S, C> {
    /// `moviegoer_id` reviews `movie_id`. Both must exist, and a moviegoer
    /// reviews a given movie at most once.
    pub fn create_review(
        &self,
        movie_id: Id,
        moviegoer_id: Id,
        params: ReviewParams,
    ) -> Result<Review, CatalogError> {
        let movie: Movie = self.load(movie_id)?;
        let moviegoer: Moviegoer = self.load(moviegoer_id)?;
        self.persist(Review::build(&movie, &moviegoer, params))
    }

    /// A review looked up through its movie. A review of another movie is
    /// not found.
    pub fn find_review(&self, movie_id: Id, review_id: Id) -> Result<Review, CatalogError> {
        let review: Review = self.load(review_id)?;
        if review.movie_id() != Some(movie_id) {
            return Err(CatalogError::not_found::<Review>(review_id));
        }
        Ok(review)
    }

    /// Change the score of a review. Nothing else about a review is editable.
    pub fn update_review(
        &self,
        movie_id: Id,
        review_id: Id,
        params: ReviewParams,
    ) -> Result<Review, CatalogError> {
        let mut review = self.find_review(movie_id, review_id)?;
        review.assign(params);
        self.persist(review)
    }

    pub fn delete_review(&self, movie_id: Id, review_id: Id) -> Result<(), CatalogError> {
        self.find_review(movie_id, review_id)?;
        self.remove::<Review>(review_id)
    }
}
