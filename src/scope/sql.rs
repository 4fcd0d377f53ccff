use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{eval, ArgumentError, MovieQuery, Step};
use crate::model::Rating;

/// A bound parameter for a rendered query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SqlParam {
    Float(f64),
    Int(i64),
    Timestamp(DateTime<Utc>),
}

/// Parameterized Postgres SQL for a [`MovieQuery`], with `$n` placeholders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SqlQuery {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

impl SqlQuery {
    fn bind(&mut self, param: SqlParam) -> String {
        self.params.push(param);
        format!("${}", self.params.len())
    }
}

impl MovieQuery {
    /// Render as one `SELECT` over `movies`. Each review-based step is its
    /// own `movies.id IN (...)` subquery, so chained steps narrow the result
    /// instead of joining against each other.
    pub fn to_sql(&self, now: DateTime<Utc>) -> Result<SqlQuery, ArgumentError> {
        let steps = self.check()?;
        let mut query = SqlQuery {
            sql: String::from("SELECT movies.* FROM movies"),
            params: Vec::new(),
        };

        let mut conditions = Vec::with_capacity(steps.len());
        for step in steps {
            let condition = match *step {
                Step::ForKids => {
                    let ratings: Vec<String> = Rating::FOR_KIDS
                        .iter()
                        .map(|r| format!("'{}'", r.as_str()))
                        .collect();
                    format!("movies.rating IN ({})", ratings.join(", "))
                }
                Step::WithGoodReviews { cutoff } => {
                    let p = query.bind(SqlParam::Float(cutoff));
                    format!(
                        "movies.id IN (SELECT reviews.movie_id FROM reviews \
                         GROUP BY reviews.movie_id HAVING AVG(reviews.potatoes) > {})",
                        p
                    )
                }
                Step::WithManyReviews { min_count } => {
                    let p = query.bind(SqlParam::Int(min_count));
                    format!(
                        "movies.id IN (SELECT reviews.movie_id FROM reviews \
                         GROUP BY reviews.movie_id HAVING COUNT(reviews.id) >= {})",
                        p
                    )
                }
                Step::RecentlyReviewed { days } => match eval::recent_since(now, days) {
                    Some(since) => {
                        let p = query.bind(SqlParam::Timestamp(since));
                        format!(
                            "movies.id IN (SELECT DISTINCT reviews.movie_id FROM reviews \
                             WHERE reviews.created_at >= {})",
                            p
                        )
                    }
                    None => String::from(
                        "movies.id IN (SELECT DISTINCT reviews.movie_id FROM reviews)",
                    ),
                },
            };
            conditions.push(condition);
        }

        if !conditions.is_empty() {
            let _ = write!(query.sql, " WHERE {}", conditions.join(" AND "));
        }
        query.sql.push_str(" ORDER BY movies.id");

        Ok(query)
    }
}
