//! Movie scopes.
//!
//! A [`MovieQuery`] is a list of filter steps and nothing else; building one
//! never touches a store. A store runs it through [`MovieQueries`], either by
//! evaluating the steps in memory or by rendering them to SQL
//! ([`MovieQuery::to_sql`], behind the `sql` feature).
//!
//! Steps combine with AND. Each review-based step looks at all of a movie's
//! reviews, independently of the other steps.
//!
//! ```
//! use moovover::MovieQuery;
//!
//! let query = MovieQuery::new().for_kids().with_good_reviews(3).recently_reviewed(None);
//! assert_eq!(query.steps().len(), 3);
//!
//! let bad = MovieQuery::new().with_many_reviews(-1);
//! assert!(bad.check().is_err());
//! ```

mod eval;
#[cfg(feature = "sql")]
mod sql;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::clock::Clock;
use crate::error::CatalogError;
use crate::model::{Movie, Review};
use crate::store::{InMemoryModelStore, ModelStore, ModelsExt};

#[cfg(feature = "sql")]
pub use sql::{SqlParam, SqlQuery};

/// Window used by `recently_reviewed` when no argument is given.
pub const DEFAULT_RECENT_DAYS: i64 = 7;

/// Threshold used by `with_many_reviews` when no argument is given.
pub const DEFAULT_MIN_REVIEWS: i64 = 3;

/// One filter in a movie query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum Step {
    /// Rating is G or PG.
    ForKids,
    /// Mean score strictly above `cutoff`.
    WithGoodReviews { cutoff: f64 },
    /// At least one review created in the last `days` days.
    RecentlyReviewed { days: i64 },
    /// At least `min_count` reviews.
    WithManyReviews { min_count: i64 },
}

/// A scope argument that cannot be honored. Arguments are rejected, never
/// clamped.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ArgumentError {
    #[error("days must not be negative (got {0})")]
    NegativeDays(i64),

    #[error("review count must not be negative (got {0})")]
    NegativeCount(i64),

    #[error("score cutoff must be a finite number (got {0})")]
    NonFiniteCutoff(f64),
}

/// A lazy, chainable movie query.
///
/// The first invalid argument is remembered and reported when the query is
/// run or rendered, so a chain can be written without a `?` at every link.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovieQuery {
    steps: Vec<Step>,
    error: Option<ArgumentError>,
}

impl MovieQuery {
    /// The unfiltered query: every movie.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_kids(self) -> Self {
        self.push(Step::ForKids)
    }

    pub fn with_good_reviews(self, cutoff: impl Into<f64>) -> Self {
        let cutoff = cutoff.into();
        if !cutoff.is_finite() {
            return self.fail(ArgumentError::NonFiniteCutoff(cutoff));
        }
        self.push(Step::WithGoodReviews { cutoff })
    }

    /// `None` means the default window of [`DEFAULT_RECENT_DAYS`].
    pub fn recently_reviewed(self, days: impl Into<Option<i64>>) -> Self {
        let days = days.into().unwrap_or(DEFAULT_RECENT_DAYS);
        if days < 0 {
            return self.fail(ArgumentError::NegativeDays(days));
        }
        self.push(Step::RecentlyReviewed { days })
    }

    /// `None` means the default threshold of [`DEFAULT_MIN_REVIEWS`].
    pub fn with_many_reviews(self, min_count: impl Into<Option<i64>>) -> Self {
        let min_count = min_count.into().unwrap_or(DEFAULT_MIN_REVIEWS);
        if min_count < 0 {
            return self.fail(ArgumentError::NegativeCount(min_count));
        }
        self.push(Step::WithManyReviews { min_count })
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// The steps, or the first argument error recorded while building.
    pub fn check(&self) -> Result<&[Step], ArgumentError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(&self.steps),
        }
    }

    /// Run the query against `store` as of `clock`'s now.
    pub fn load<S, C>(&self, store: &S, clock: &C) -> Result<Vec<Movie>, CatalogError>
    where
        S: MovieQueries,
        C: Clock,
    {
        store.query_movies(self, clock.now())
    }

    /// Filter already-loaded movies. `movies` is expected in store order;
    /// the result keeps it.
    pub fn apply(
        &self,
        movies: Vec<Movie>,
        reviews: &[Review],
        now: DateTime<Utc>,
    ) -> Result<Vec<Movie>, ArgumentError> {
        let steps = self.check()?;
        Ok(eval::filter(steps, movies, reviews, now))
    }

    fn push(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    fn fail(mut self, error: ArgumentError) -> Self {
        tracing::debug!(%error, "rejected scope argument");
        self.error.get_or_insert(error);
        self
    }
}

/// Stores that can answer movie queries.
///
/// The provided method loads every movie and review and filters in memory;
/// a SQL store overrides it to run [`MovieQuery::to_sql`] instead.
pub trait MovieQueries: ModelStore + Sized {
    fn query_movies(
        &self,
        query: &MovieQuery,
        now: DateTime<Utc>,
    ) -> Result<Vec<Movie>, CatalogError> {
        query.check()?;
        let movies = self.models::<Movie>().all()?;
        let reviews = if query.steps().iter().any(|s| *s != Step::ForKids) {
            self.models::<Review>().all()?
        } else {
            Vec::new()
        };
        Ok(query.apply(movies, &reviews, now)?)
    }
}

impl MovieQueries for InMemoryModelStore {}
