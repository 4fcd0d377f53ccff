//! Domain core for a movie review site: movies, moviegoers and the reviews
//! that join them.
//!
//! The crate owns three things and delegates everything else to its host:
//!
//! - the entities and their rules ([`Movie`], [`Moviegoer`], [`Review`] and the
//!   [`validation`] engine that checks them before every save),
//! - composable, lazy movie scopes ([`MovieQuery`]),
//! - the persistence seam ([`ModelStore`]) with an in-memory reference store.
//!
//! [`Catalog`] ties them together into the validate-then-persist path a web
//! layer calls once per request.
//!
//! ```
//! use chrono::NaiveDate;
//! use moovover::{Catalog, InMemoryModelStore, MovieParams, MovieQuery};
//!
//! let catalog = Catalog::new(InMemoryModelStore::new());
//! let released = NaiveDate::from_ymd_opt(1992, 11, 25).unwrap();
//! let movie = catalog
//!     .create_movie(MovieParams::new().title("  Aladdin ").rating("G").release_date(released))
//!     .unwrap();
//! assert_eq!(movie.title(), "Aladdin");
//!
//! let kids = catalog.list_movies_by(&MovieQuery::new().for_kids()).unwrap();
//! assert_eq!(kids.len(), 1);
//! ```

extern crate self as moovover;

pub mod catalog;
pub mod clock;
pub mod config;
mod error;
pub mod model;
pub mod scope;
pub mod store;
pub mod validation;

pub use catalog::{Catalog, SeedReport};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{Config, ConfigError};
pub use error::CatalogError;
pub use model::{
    Id, Identity, KeyPart, Model, Movie, MovieParams, Moviegoer, ParentRef, Rating, Review,
    ReviewParams, UniqueKey,
};
pub use scope::{ArgumentError, MovieQueries, MovieQuery, Step};
#[cfg(feature = "sql")]
pub use scope::{SqlParam, SqlQuery};
pub use store::{
    ConflictError, InMemoryModelStore, ModelRepository, ModelStore, ModelsExt, StoreError,
};
pub use validation::{ErrorKind, FieldError, Validate, ValidationErrors};

pub use moovover_macros::Model;
