//! Demo data: ten movies, three developer-provider moviegoers and a handful
//! of reviews. Seeding is idempotent; run it as often as you like.

use chrono::NaiveDate;

use crate::clock::Clock;
use crate::error::CatalogError;
use crate::model::{Identity, Movie, MovieParams, Moviegoer, Review, ReviewParams};
use crate::store::{ModelStore, ModelsExt};
use crate::validation::ValidationErrors;

use super::Catalog;

const MOVIES: [(&str, &str, (i32, u32, u32)); 10] = [
    ("Aladdin", "G", (1992, 11, 25)),
    ("The Terminator", "R", (1984, 10, 26)),
    ("When Harry Met Sally", "R", (1989, 7, 21)),
    ("The Help", "PG-13", (2011, 8, 10)),
    ("Chocolat", "PG-13", (2001, 1, 5)),
    ("Amelie", "R", (2001, 4, 25)),
    ("2001: A Space Odyssey", "G", (1968, 4, 6)),
    ("The Incredibles", "PG", (2004, 11, 5)),
    ("Raiders of the Lost Ark", "PG", (1981, 6, 12)),
    ("Chicken Run", "G", (2000, 6, 21)),
];

// (name, email, uid)
const MOVIEGOERS: [(&str, &str, &str); 3] = [
    ("Alice", "alice@example.com", "alice123"),
    ("Bob", "bob@example.com", "bob456"),
    ("Charlie", "charlie@example.com", "charlie789"),
];

// (moviegoer uid, movie title, potatoes)
const REVIEWS: [(&str, &str, i64); 6] = [
    ("alice123", "Aladdin", 5),
    ("alice123", "The Terminator", 4),
    ("alice123", "The Incredibles", 5),
    ("bob456", "Aladdin", 4),
    ("bob456", "The Terminator", 5),
    ("charlie789", "The Incredibles", 4),
];

pub const SEED_PROVIDER: &str = "developer";

/// What a seeding run left in the store.
#[derive(Debug, Clone, Default)]
pub struct SeedReport {
    /// Seed movies present after the run, whether created now or earlier.
    pub movies: Vec<Movie>,
    /// Seed movies the current rules reject, with the reasons.
    pub rejected: Vec<(String, ValidationErrors)>,
    pub moviegoers: Vec<Moviegoer>,
    /// Reviews created by this run. Zero when the store already had reviews.
    pub reviews_created: usize,
}

impl<S: ModelStore, C: Clock> Catalog<S, C> {
    /// Load the demo data.
    ///
    /// Movies are matched by title and moviegoers by identity, so existing
    /// records are left alone. Reviews are only added to a store that has
    /// none. A review whose movie was rejected is skipped.
    pub fn seed(&self) -> Result<SeedReport, CatalogError> {
        let mut report = SeedReport::default();

        for (title, rating, (y, m, d)) in MOVIES {
            let existing = self
                .store
                .models::<Movie>()
                .find_one(&|movie| movie.title() == title)?;
            if let Some(movie) = existing {
                report.movies.push(movie);
                continue;
            }

            let mut params = MovieParams::new().title(title).rating(rating);
            if let Some(date) = NaiveDate::from_ymd_opt(y, m, d) {
                params = params.release_date(date);
            }
            match self.create_movie(params) {
                Ok(movie) => report.movies.push(movie),
                Err(CatalogError::Validation(errors)) => {
                    tracing::warn!(title, %errors, "seed movie rejected");
                    report.rejected.push((title.to_string(), errors));
                }
                Err(e) => return Err(e),
            }
        }

        for (name, email, uid) in MOVIEGOERS {
            let identity = Identity::new(SEED_PROVIDER, uid)
                .with_name(name)
                .with_email(email);
            report.moviegoers.push(self.find_or_create_moviegoer(identity)?);
        }

        if self.store.models::<Review>().count()? == 0 {
            for (uid, title, potatoes) in REVIEWS {
                let movie = report.movies.iter().find(|m| m.title() == title);
                let moviegoer = report.moviegoers.iter().find(|m| m.uid() == Some(uid));
                let (Some(movie_id), Some(moviegoer_id)) =
                    (movie.and_then(Movie::id), moviegoer.and_then(Moviegoer::id))
                else {
                    continue;
                };
                self.create_review(movie_id, moviegoer_id, ReviewParams::new().potatoes(potatoes))?;
                report.reviews_created += 1;
            }
        }

        tracing::info!(
            movies = report.movies.len(),
            rejected = report.rejected.len(),
            moviegoers = report.moviegoers.len(),
            reviews = report.reviews_created,
            "seeded"
        );
        Ok(report)
    }
}
