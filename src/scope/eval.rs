use std::collections::HashMap;

use chrono::{DateTime, TimeDelta, Utc};

use crate::model::{Id, Movie, Review};

use super::Step;

#[derive(Debug, Default)]
struct ReviewStats {
    count: i64,
    scored: i64,
    total: i64,
    latest: Option<DateTime<Utc>>,
}

impl ReviewStats {
    fn mean(&self) -> Option<f64> {
        (self.scored > 0).then(|| self.total as f64 / self.scored as f64)
    }
}

fn collect_stats(reviews: &[Review]) -> HashMap<Id, ReviewStats> {
    let mut stats: HashMap<Id, ReviewStats> = HashMap::new();
    for review in reviews {
        let Some(movie_id) = review.movie_id() else {
            continue;
        };
        let entry = stats.entry(movie_id).or_default();
        entry.count += 1;
        if let Some(potatoes) = review.potatoes() {
            entry.scored += 1;
            entry.total = entry.total.saturating_add(potatoes);
        }
        if let Some(created_at) = review.created_at() {
            entry.latest = entry.latest.max(Some(created_at));
        }
    }
    stats
}

/// Earliest creation time that still counts as recent. `None` when the
/// window reaches past the representable range, so every review counts.
pub(super) fn recent_since(now: DateTime<Utc>, days: i64) -> Option<DateTime<Utc>> {
    TimeDelta::try_days(days).and_then(|window| now.checked_sub_signed(window))
}

fn keep(step: &Step, movie: &Movie, stats: Option<&ReviewStats>, now: DateTime<Utc>) -> bool {
    match *step {
        Step::ForKids => movie.is_for_kids(),
        Step::WithGoodReviews { cutoff } => stats
            .and_then(ReviewStats::mean)
            .map_or(false, |mean| mean > cutoff),
        Step::WithManyReviews { min_count } => {
            stats.map_or(false, |s| s.count > 0 && s.count >= min_count)
        }
        Step::RecentlyReviewed { days } => {
            let Some(latest) = stats.and_then(|s| s.latest) else {
                return false;
            };
            recent_since(now, days).map_or(true, |since| latest >= since)
        }
    }
}

pub(super) fn filter(
    steps: &[Step],
    movies: Vec<Movie>,
    reviews: &[Review],
    now: DateTime<Utc>,
) -> Vec<Movie> {
    if steps.is_empty() {
        return movies;
    }

    let stats = collect_stats(reviews);
    let before = movies.len();
    let kept: Vec<Movie> = movies
        .into_iter()
        .filter(|movie| {
            let movie_stats = movie.id().and_then(|id| stats.get(&id));
            steps.iter().all(|step| keep(step, movie, movie_stats, now))
        })
        .collect();

    tracing::trace!(steps = steps.len(), before, after = kept.len(), "filtered movies");
    kept
}
