use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::store::{ModelStore, ModelsExt, StoreError};
use crate::validation::{ErrorKind, FieldError, Rule, RuleSet, Validate};
use crate::Model;

use super::{Id, Moviegoer, Rating, Review};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Model)]
#[model(collection = "movies", timestamps)]
pub struct Movie {
    id: Option<Id>,
    title: String,
    rating: Option<String>,
    description: Option<String>,
    release_date: Option<NaiveDate>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl Movie {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(&self) -> Option<Id> {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// The stored rating text. May be outside the enumeration for a
    /// grandfathered movie.
    pub fn rating(&self) -> Option<&str> {
        self.rating.as_deref()
    }

    /// The rating, if it is one of the five known ratings.
    pub fn known_rating(&self) -> Option<Rating> {
        self.rating.as_deref().and_then(|r| r.parse().ok())
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn release_date(&self) -> Option<NaiveDate> {
        self.release_date
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_rating(&mut self, rating: Option<String>) {
        self.rating = rating;
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
    }

    pub fn set_release_date(&mut self, release_date: Option<NaiveDate>) {
        self.release_date = release_date;
    }

    /// Copy every field present in `params` onto this movie.
    pub fn assign(&mut self, params: MovieParams) {
        if let Some(title) = params.title {
            self.title = title;
        }
        if let Some(rating) = params.rating {
            self.rating = Some(rating);
        }
        if let Some(description) = params.description {
            self.description = Some(description);
        }
        if let Some(release_date) = params.release_date {
            self.release_date = Some(release_date);
        }
    }

    /// Released before the default rating-enforcement cutoff (1900-01-01).
    pub fn is_grandfathered(&self) -> bool {
        self.is_grandfathered_under(&Config::default())
    }

    /// Released before `config.grandfather_cutoff`. A movie without a
    /// release date is never grandfathered.
    pub fn is_grandfathered_under(&self, config: &Config) -> bool {
        self.release_date
            .map_or(false, |date| date < config.grandfather_cutoff)
    }

    pub fn is_for_kids(&self) -> bool {
        self.known_rating().map_or(false, |r| r.is_for_kids())
    }

    /// Reviews of this movie, oldest first.
    pub fn reviews<S: ModelStore>(&self, store: &S) -> Result<Vec<Review>, StoreError> {
        let Some(id) = self.id else {
            return Ok(Vec::new());
        };
        store.models::<Review>().find(&|review| review.movie_id() == Some(id))
    }

    /// Moviegoers who reviewed this movie, in review order.
    pub fn moviegoers<S: ModelStore>(&self, store: &S) -> Result<Vec<Moviegoer>, StoreError> {
        let ids: Vec<Id> = self
            .reviews(store)?
            .iter()
            .filter_map(Review::moviegoer_id)
            .collect();
        store.models::<Moviegoer>().get_many(&ids)
    }
}

impl Validate for Movie {
    fn normalize(&mut self) {
        let trimmed = self.title.trim();
        if trimmed.len() != self.title.len() {
            self.title = trimmed.to_string();
        }
    }

    fn rules() -> RuleSet<Self> {
        RuleSet::new()
            .rule(Rule::new("title", "title_presence", title_present))
            .rule(Rule::new("title", "title_length", title_short_enough))
            .rule(Rule::new("release_date", "release_date_presence", release_date_present))
            .rule(Rule::new("release_date", "released_after_earliest", released_after_earliest))
            .rule(
                Rule::new("rating", "rating_inclusion", rating_known)
                    .unless(Movie::is_grandfathered_under),
            )
    }
}

fn title_present(movie: &Movie, _: &Config) -> Option<FieldError> {
    movie.title.trim().is_empty().then(FieldError::blank)
}

fn title_short_enough(movie: &Movie, config: &Config) -> Option<FieldError> {
    (movie.title.trim().chars().count() > config.title_max_length)
        .then(|| FieldError::too_long(config.title_max_length))
}

fn release_date_present(movie: &Movie, _: &Config) -> Option<FieldError> {
    movie.release_date.is_none().then(FieldError::blank)
}

fn released_after_earliest(movie: &Movie, config: &Config) -> Option<FieldError> {
    let date = movie.release_date?;
    if date >= config.earliest_release {
        return None;
    }

    let earliest = config.earliest_release;
    let message = if earliest.month() == 1 && earliest.day() == 1 {
        format!("must be {} or later", earliest.year())
    } else {
        format!("must be {} or later", earliest)
    };
    Some(FieldError::new(ErrorKind::TooOld, message))
}

fn rating_known(movie: &Movie, _: &Config) -> Option<FieldError> {
    match movie.rating.as_deref() {
        Some(rating) if rating.parse::<Rating>().is_ok() => None,
        Some(rating) => Some(FieldError::new(
            ErrorKind::Inclusion,
            format!("{} is not a valid rating", rating),
        )),
        None => Some(FieldError::new(ErrorKind::Inclusion, "is not a valid rating")),
    }
}

/// Form input for creating or updating a movie. Absent fields are left
/// untouched on update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieParams {
    pub title: Option<String>,
    pub rating: Option<String>,
    pub description: Option<String>,
    pub release_date: Option<NaiveDate>,
}

impl MovieParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn rating(mut self, rating: impl Into<String>) -> Self {
        self.rating = Some(rating.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn release_date(mut self, release_date: NaiveDate) -> Self {
        self.release_date = Some(release_date);
        self
    }
}
