use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::config::Config;
use crate::store::{ModelStore, ModelsExt, StoreError};
use crate::validation::{FieldError, Rule, RuleSet, Validate};
use crate::Model;

use super::{Id, Movie, Moviegoer};

pub const MIN_POTATOES: i64 = 1;
pub const MAX_POTATOES: i64 = 5;

/// One moviegoer's score for one movie.
///
/// `potatoes` holds the number as submitted so that a fractional score can be
/// reported as `not_an_integer` instead of being silently truncated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Model)]
#[model(collection = "reviews", timestamps)]
pub struct Review {
    id: Option<Id>,
    #[model(belongs_to = "movies")]
    movie_id: Option<Id>,
    #[model(belongs_to = "moviegoers")]
    #[model(unique_with = "movie_id", message = "has already reviewed this movie")]
    moviegoer_id: Option<Id>,
    potatoes: Option<Number>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl Review {
    pub fn new() -> Self {
        Self::default()
    }

    /// A review of `movie` by `moviegoer`, like building through the movie's
    /// reviews association.
    pub fn build(movie: &Movie, moviegoer: &Moviegoer, params: ReviewParams) -> Self {
        let mut review = Self {
            movie_id: movie.id(),
            moviegoer_id: moviegoer.id(),
            ..Self::default()
        };
        review.assign(params);
        review
    }

    pub fn id(&self) -> Option<Id> {
        self.id
    }

    pub fn movie_id(&self) -> Option<Id> {
        self.movie_id
    }

    pub fn moviegoer_id(&self) -> Option<Id> {
        self.moviegoer_id
    }

    /// The score, if it is a whole number.
    pub fn potatoes(&self) -> Option<i64> {
        self.potatoes.as_ref().and_then(integral)
    }

    /// The score exactly as submitted.
    pub fn raw_potatoes(&self) -> Option<&Number> {
        self.potatoes.as_ref()
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    pub fn set_movie_id(&mut self, movie_id: Option<Id>) {
        self.movie_id = movie_id;
    }

    pub fn set_moviegoer_id(&mut self, moviegoer_id: Option<Id>) {
        self.moviegoer_id = moviegoer_id;
    }

    pub fn set_potatoes(&mut self, potatoes: Option<Number>) {
        self.potatoes = potatoes;
    }

    /// Copy the submitted fields onto this review. Only the score is
    /// assignable from a form.
    pub fn assign(&mut self, params: ReviewParams) {
        if let Some(potatoes) = params.potatoes {
            self.potatoes = Some(potatoes);
        }
    }

    pub fn movie<S: ModelStore>(&self, store: &S) -> Result<Option<Movie>, StoreError> {
        match self.movie_id {
            Some(id) => store.models::<Movie>().get(id),
            None => Ok(None),
        }
    }

    pub fn moviegoer<S: ModelStore>(&self, store: &S) -> Result<Option<Moviegoer>, StoreError> {
        match self.moviegoer_id {
            Some(id) => store.models::<Moviegoer>().get(id),
            None => Ok(None),
        }
    }
}

fn integral(number: &Number) -> Option<i64> {
    if let Some(n) = number.as_i64() {
        return Some(n);
    }
    if number.is_u64() {
        // larger than i64::MAX; out of range either way
        return Some(i64::MAX);
    }
    // whole floats past the i64 range saturate; they are out of range anyway
    number
        .as_f64()
        .filter(|f| f.fract() == 0.0)
        .map(|f| f as i64)
}

impl Validate for Review {
    fn rules() -> RuleSet<Self> {
        RuleSet::new()
            .rule(Rule::new("potatoes", "potatoes_presence", potatoes_present))
            .rule(Rule::new("potatoes", "potatoes_integral", potatoes_integral))
            .rule(Rule::new("potatoes", "potatoes_range", potatoes_in_range))
            .rule(Rule::new("movie_id", "movie_presence", movie_present))
            .rule(Rule::new("moviegoer_id", "moviegoer_presence", moviegoer_present))
    }
}

fn potatoes_present(review: &Review, _: &Config) -> Option<FieldError> {
    review.potatoes.is_none().then(FieldError::blank)
}

fn potatoes_integral(review: &Review, _: &Config) -> Option<FieldError> {
    let number = review.potatoes.as_ref()?;
    integral(number).is_none().then(FieldError::not_an_integer)
}

fn potatoes_in_range(review: &Review, _: &Config) -> Option<FieldError> {
    let potatoes = review.potatoes()?;
    if potatoes < MIN_POTATOES {
        Some(FieldError::at_least(MIN_POTATOES))
    } else if potatoes > MAX_POTATOES {
        Some(FieldError::at_most(MAX_POTATOES))
    } else {
        None
    }
}

fn movie_present(review: &Review, _: &Config) -> Option<FieldError> {
    review.movie_id.is_none().then(FieldError::required)
}

fn moviegoer_present(review: &Review, _: &Config) -> Option<FieldError> {
    review.moviegoer_id.is_none().then(FieldError::required)
}

/// Form input for a review.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewParams {
    pub potatoes: Option<Number>,
}

impl ReviewParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn potatoes(mut self, potatoes: impl Into<Number>) -> Self {
        self.potatoes = Some(potatoes.into());
        self
    }

    /// A fractional score (only representable if finite).
    pub fn fractional_potatoes(mut self, potatoes: f64) -> Self {
        self.potatoes = Number::from_f64(potatoes);
        self
    }
}
