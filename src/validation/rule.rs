use crate::config::Config;

use super::{FieldError, ValidationErrors};

/// A check returns the error it found, if any.
pub type Check<T> = fn(&T, &Config) -> Option<FieldError>;

/// Decides whether a rule applies to a record at all.
pub type Condition<T> = fn(&T, &Config) -> bool;

enum Applicability<T> {
    Always,
    If(Condition<T>),
    Unless(Condition<T>),
}

/// One validation rule on one field.
pub struct Rule<T> {
    field: &'static str,
    name: &'static str,
    applicability: Applicability<T>,
    check: Check<T>,
}

impl<T> Rule<T> {
    pub fn new(field: &'static str, name: &'static str, check: Check<T>) -> Self {
        Self {
            field,
            name,
            applicability: Applicability::Always,
            check,
        }
    }

    /// Only run the check when `condition` holds.
    pub fn only_if(mut self, condition: Condition<T>) -> Self {
        self.applicability = Applicability::If(condition);
        self
    }

    /// Skip the check entirely when `condition` holds.
    pub fn unless(mut self, condition: Condition<T>) -> Self {
        self.applicability = Applicability::Unless(condition);
        self
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn applies(&self, record: &T, config: &Config) -> bool {
        match self.applicability {
            Applicability::Always => true,
            Applicability::If(condition) => condition(record, config),
            Applicability::Unless(condition) => !condition(record, config),
        }
    }

    pub fn check(&self, record: &T, config: &Config) -> Option<FieldError> {
        (self.check)(record, config)
    }
}

/// An ordered list of rules. Every applicable rule runs; errors accumulate.
pub struct RuleSet<T> {
    rules: Vec<Rule<T>>,
}

impl<T> Default for RuleSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RuleSet<T> {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append a rule (builder style).
    pub fn rule(mut self, rule: Rule<T>) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn run(&self, record: &T, config: &Config) -> ValidationErrors {
        let mut errors = ValidationErrors::new();

        for rule in &self.rules {
            if !rule.applies(record, config) {
                tracing::trace!(rule = rule.name(), field = rule.field(), "rule skipped");
                continue;
            }

            if let Some(error) = rule.check(record, config) {
                tracing::debug!(
                    rule = rule.name(),
                    field = rule.field(),
                    message = %error.message,
                    "rule failed"
                );
                errors.add(rule.field(), error);
            }
        }

        errors
    }
}
