use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// MPAA rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rating {
    #[serde(rename = "G")]
    G,
    #[serde(rename = "PG")]
    Pg,
    #[serde(rename = "PG-13")]
    Pg13,
    #[serde(rename = "R")]
    R,
    #[serde(rename = "NC-17")]
    Nc17,
}

impl Rating {
    pub const ALL: [Rating; 5] = [Rating::G, Rating::Pg, Rating::Pg13, Rating::R, Rating::Nc17];

    /// Ratings suitable for children.
    pub const FOR_KIDS: [Rating; 2] = [Rating::G, Rating::Pg];

    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::G => "G",
            Rating::Pg => "PG",
            Rating::Pg13 => "PG-13",
            Rating::R => "R",
            Rating::Nc17 => "NC-17",
        }
    }

    pub fn is_for_kids(&self) -> bool {
        Self::FOR_KIDS.contains(self)
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The value is not one of the five ratings. Matching is exact: `"pg"` is not `PG`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0} is not a valid rating")]
pub struct UnknownRating(pub String);

impl FromStr for Rating {
    type Err = UnknownRating;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rating::ALL
            .iter()
            .copied()
            .find(|rating| rating.as_str() == s)
            .ok_or_else(|| UnknownRating(s.to_string()))
    }
}
