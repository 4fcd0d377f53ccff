use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::store::{ModelStore, ModelsExt, StoreError};
use crate::validation::{FieldError, Rule, RuleSet, Validate};
use crate::Model;

use super::{Id, Movie, Review};

/// A user, identified by the external provider that authenticated them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Model)]
#[model(collection = "moviegoers", timestamps)]
pub struct Moviegoer {
    id: Option<Id>,
    name: Option<String>,
    email: Option<String>,
    provider: Option<String>,
    #[model(unique_with = "provider")]
    uid: Option<String>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl Moviegoer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_identity(identity: Identity) -> Self {
        Self {
            name: identity.name,
            email: identity.email,
            provider: Some(identity.provider),
            uid: Some(identity.uid),
            ..Self::default()
        }
    }

    pub fn id(&self) -> Option<Id> {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The name to greet the user with.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("User")
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn provider(&self) -> Option<&str> {
        self.provider.as_deref()
    }

    pub fn uid(&self) -> Option<&str> {
        self.uid.as_deref()
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    pub fn set_email(&mut self, email: Option<String>) {
        self.email = email;
    }

    pub fn set_provider(&mut self, provider: Option<String>) {
        self.provider = provider;
    }

    pub fn set_uid(&mut self, uid: Option<String>) {
        self.uid = uid;
    }

    /// Whether this moviegoer is the one `identity` names.
    pub fn matches(&self, identity: &Identity) -> bool {
        self.provider.as_deref() == Some(identity.provider.as_str())
            && self.uid.as_deref() == Some(identity.uid.as_str())
    }

    /// This moviegoer's reviews, oldest first.
    pub fn reviews<S: ModelStore>(&self, store: &S) -> Result<Vec<Review>, StoreError> {
        let Some(id) = self.id else {
            return Ok(Vec::new());
        };
        store
            .models::<Review>()
            .find(&|review| review.moviegoer_id() == Some(id))
    }

    /// Movies this moviegoer has reviewed, in review order.
    pub fn movies<S: ModelStore>(&self, store: &S) -> Result<Vec<Movie>, StoreError> {
        let ids: Vec<Id> = self
            .reviews(store)?
            .iter()
            .filter_map(Review::movie_id)
            .collect();
        store.models::<Movie>().get_many(&ids)
    }
}

impl Validate for Moviegoer {
    fn rules() -> RuleSet<Self> {
        RuleSet::new()
            .rule(Rule::new("uid", "uid_presence", uid_present))
            .rule(Rule::new("provider", "provider_presence", provider_present))
    }
}

fn uid_present(moviegoer: &Moviegoer, _: &Config) -> Option<FieldError> {
    is_blank(moviegoer.uid.as_deref()).then(FieldError::blank)
}

fn provider_present(moviegoer: &Moviegoer, _: &Config) -> Option<FieldError> {
    is_blank(moviegoer.provider.as_deref()).then(FieldError::blank)
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

/// A verified identity handed over by the authentication layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub provider: String,
    pub uid: String,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl Identity {
    pub fn new(provider: impl Into<String>, uid: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            uid: uid.into(),
            name: None,
            email: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}
