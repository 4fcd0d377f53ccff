//! Validation engine.
//!
//! Each entity declares an ordered [`RuleSet`]; a rule names the field it
//! reports on, an optional applicability predicate, and a check. Running the
//! set yields [`ValidationErrors`], an ordered map from field to messages.
//!
//! Validation has exactly one side effect: [`Validate::normalize`] runs first,
//! always, even when a rule later fails (a movie title is trimmed whether or
//! not the movie is otherwise valid).
//!
//! Rules that need the store (uniqueness, parent existence) live in
//! [`check_against_store`]; the store repeats the uniqueness check under its
//! own lock, and a conflict it reports is mapped back to the same `taken`
//! error.

mod persisted;
mod rule;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use thiserror::Error;

use crate::config::Config;

pub use persisted::check_against_store;
pub use rule::{Check, Condition, Rule, RuleSet};

/// Machine-readable reason a rule failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Blank,
    TooLong,
    TooOld,
    Inclusion,
    NotAnInteger,
    OutOfRange,
    Taken,
    Required,
}

/// One failed rule on one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub kind: ErrorKind,
    pub message: String,
}

impl FieldError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn blank() -> Self {
        Self::new(ErrorKind::Blank, "can't be blank")
    }

    pub fn too_long(maximum: usize) -> Self {
        Self::new(
            ErrorKind::TooLong,
            format!("is too long (maximum is {} characters)", maximum),
        )
    }

    pub fn not_an_integer() -> Self {
        Self::new(ErrorKind::NotAnInteger, "must be an integer")
    }

    pub fn at_least(minimum: i64) -> Self {
        Self::new(
            ErrorKind::OutOfRange,
            format!("must be greater than or equal to {}", minimum),
        )
    }

    pub fn at_most(maximum: i64) -> Self {
        Self::new(
            ErrorKind::OutOfRange,
            format!("must be less than or equal to {}", maximum),
        )
    }

    pub fn taken(message: Option<&str>) -> Self {
        Self::new(ErrorKind::Taken, message.unwrap_or("has already been taken"))
    }

    pub fn required() -> Self {
        Self::new(ErrorKind::Required, "must exist")
    }
}

/// Field name → ordered messages. Fields keep the order of their first error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("validation failed: {}", full_messages(.fields).join(", "))]
pub struct ValidationErrors {
    fields: Vec<(&'static str, Vec<FieldError>)>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, error: FieldError) {
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some((_, errors)) => errors.push(error),
            None => self.fields.push((field, vec![error])),
        }
    }

    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, errors) in other.fields {
            for error in errors {
                self.add(field, error);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Total number of errors across all fields.
    pub fn len(&self) -> usize {
        self.fields.iter().map(|(_, errors)| errors.len()).sum()
    }

    pub fn get(&self, field: &str) -> &[FieldError] {
        self.fields
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, errors)| errors.as_slice())
            .unwrap_or(&[])
    }

    pub fn has(&self, field: &str, kind: ErrorKind) -> bool {
        self.get(field).iter().any(|error| error.kind == kind)
    }

    pub fn kinds(&self, field: &str) -> Vec<ErrorKind> {
        self.get(field).iter().map(|error| error.kind).collect()
    }

    pub fn messages(&self, field: &str) -> Vec<&str> {
        self.get(field).iter().map(|error| error.message.as_str()).collect()
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(name, _)| *name)
    }

    /// Messages prefixed with the humanized field name ("Title can't be blank").
    pub fn full_messages(&self) -> Vec<String> {
        full_messages(&self.fields)
    }

    pub(crate) fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (field, errors) in &self.fields {
            let messages: Vec<&str> = errors.iter().map(|e| e.message.as_str()).collect();
            map.serialize_entry(field, &messages)?;
        }
        map.end()
    }
}

/// Entities that carry validation rules.
pub trait Validate: Sized + 'static {
    /// Runs before the rules, on every validation.
    fn normalize(&mut self) {}

    fn rules() -> RuleSet<Self>;

    /// Normalize, then run every applicable rule.
    fn validate(&mut self, config: &Config) -> Result<(), ValidationErrors> {
        self.normalize();
        Self::rules().run(self, config).into_result()
    }
}

fn full_messages(fields: &[(&'static str, Vec<FieldError>)]) -> Vec<String> {
    fields
        .iter()
        .flat_map(|(field, errors)| {
            let label = humanize(field);
            errors
                .iter()
                .map(move |error| format!("{} {}", label, error.message))
        })
        .collect()
}

fn humanize(field: &str) -> String {
    let base = field.strip_suffix("_id").unwrap_or(field).replace('_', " ");
    let mut chars = base.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
