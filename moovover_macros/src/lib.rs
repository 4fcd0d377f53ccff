mod model;

use proc_macro::TokenStream;

/// Derive `moovover::Model` for a struct.
///
/// Struct-level attributes:
/// - `#[model(collection = "movies")]` sets the collection name (defaults to
///   the snake_case struct name plus `s`).
/// - `#[model(timestamps)]` maintains `created_at` / `updated_at` fields of
///   type `Option<DateTime<Utc>>` on every save.
///
/// Field-level attributes:
/// - `#[model(id)]` marks the identifier field (defaults to the field named `id`).
///   The field must be `Option<Id>`.
/// - `#[model(belongs_to = "movies")]` declares a foreign key of type
///   `Option<Id>`; deleting the referenced record deletes this one.
/// - `#[model(unique_with = "provider")]` declares that this field, together
///   with the named sibling, must be unique across the collection. An optional
///   `message = "..."` overrides the default `taken` message.
///
/// ```ignore
/// #[derive(Clone, Serialize, Deserialize, Model)]
/// #[model(collection = "reviews", timestamps)]
/// pub struct Review {
///     id: Option<Id>,
///     #[model(belongs_to = "movies")]
///     movie_id: Option<Id>,
///     #[model(belongs_to = "moviegoers")]
///     #[model(unique_with = "movie_id", message = "has already reviewed this movie")]
///     moviegoer_id: Option<Id>,
///     created_at: Option<DateTime<Utc>>,
///     updated_at: Option<DateTime<Utc>>,
/// }
/// ```
#[proc_macro_derive(Model, attributes(model))]
pub fn derive_model(input: TokenStream) -> TokenStream {
    model::derive_model(input)
}
