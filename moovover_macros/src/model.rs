use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Data, DeriveInput, Fields, Ident, LitStr};

pub fn derive_model(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);

    match expand(&input) {
        Ok(tokens) => TokenStream::from(tokens),
        Err(err) => TokenStream::from(err.to_compile_error()),
    }
}

struct ModelAttrs {
    collection: String,
    timestamps: bool,
}

struct ForeignKey {
    field: Ident,
    collection: LitStr,
}

struct Unique {
    field: Ident,
    scope: Ident,
    message: Option<LitStr>,
}

#[derive(Default)]
struct FieldAttrs {
    id: Option<Ident>,
    foreign_keys: Vec<ForeignKey>,
    uniques: Vec<Unique>,
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let attrs = parse_model_attrs(input)?;
    let fields = parse_field_attrs(input)?;

    let collection = &attrs.collection;
    let id_field = fields.id.ok_or_else(|| {
        syn::Error::new_spanned(
            name,
            "Model derive: no field marked with #[model(id)] and no field named `id`",
        )
    })?;

    let parents = fields.foreign_keys.iter().map(|fk| {
        let field = &fk.field;
        let field_name = field.to_string();
        let parent = &fk.collection;
        quote! {
            if let Some(id) = self.#field {
                parents.push(::moovover::ParentRef {
                    collection: #parent,
                    field: #field_name,
                    id,
                });
            }
        }
    });

    let uniques = fields.uniques.iter().map(|unique| {
        let field = &unique.field;
        let scope = &unique.scope;
        let field_name = field.to_string();
        let message = match &unique.message {
            Some(message) => quote! { Some(#message) },
            None => quote! { None },
        };
        quote! {
            ::moovover::UniqueKey::new(
                #field_name,
                #message,
                vec![
                    ::moovover::KeyPart::key_part(&self.#scope),
                    ::moovover::KeyPart::key_part(&self.#field),
                ],
            )
        }
    });

    let touch = if attrs.timestamps {
        quote! {
            fn touch(&mut self, now: ::chrono::DateTime<::chrono::Utc>) {
                if self.created_at.is_none() {
                    self.created_at = Some(now);
                }
                self.updated_at = Some(now);
            }
        }
    } else {
        quote! {}
    };

    Ok(quote! {
        impl ::moovover::Model for #name {
            const COLLECTION: &'static str = #collection;

            fn id(&self) -> Option<::moovover::Id> {
                self.#id_field
            }

            fn set_id(&mut self, id: ::moovover::Id) {
                self.#id_field = Some(id);
            }

            fn parents(&self) -> Vec<::moovover::ParentRef> {
                #[allow(unused_mut)]
                let mut parents = Vec::new();
                #(#parents)*
                parents
            }

            fn unique_keys(&self) -> Vec<::moovover::UniqueKey> {
                vec![#(#uniques),*]
            }

            #touch
        }
    })
}

fn parse_model_attrs(input: &DeriveInput) -> syn::Result<ModelAttrs> {
    let mut collection = None;
    let mut timestamps = false;

    for attr in &input.attrs {
        if !attr.path().is_ident("model") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("collection") {
                let value: LitStr = meta.value()?.parse()?;
                collection = Some(value.value());
                Ok(())
            } else if meta.path.is_ident("timestamps") {
                timestamps = true;
                Ok(())
            } else {
                Err(meta.error("unsupported #[model] attribute"))
            }
        })?;
    }

    // Default: snake_case struct name + "s"
    let collection =
        collection.unwrap_or_else(|| format!("{}s", to_snake_case(&input.ident.to_string())));

    Ok(ModelAttrs {
        collection,
        timestamps,
    })
}

fn parse_field_attrs(input: &DeriveInput) -> syn::Result<FieldAttrs> {
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => fields,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input.ident,
                    "Model derive requires named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Model derive only supports structs",
            ))
        }
    };

    let mut parsed = FieldAttrs::default();
    let mut fallback_id = None;

    for field in &fields.named {
        let Some(ident) = field.ident.clone() else {
            continue;
        };
        if ident == "id" {
            fallback_id = Some(ident.clone());
        }

        for attr in &field.attrs {
            if !attr.path().is_ident("model") {
                continue;
            }

            let mut unique_scope = None;
            let mut message = None;

            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("id") {
                    parsed.id = Some(ident.clone());
                } else if meta.path.is_ident("belongs_to") {
                    let collection: LitStr = meta.value()?.parse()?;
                    parsed.foreign_keys.push(ForeignKey {
                        field: ident.clone(),
                        collection,
                    });
                } else if meta.path.is_ident("unique_with") {
                    let scope: LitStr = meta.value()?.parse()?;
                    unique_scope = Some(scope.parse::<Ident>()?);
                } else if meta.path.is_ident("message") {
                    message = Some(meta.value()?.parse::<LitStr>()?);
                } else {
                    return Err(meta.error("unsupported #[model] field attribute"));
                }
                Ok(())
            })?;

            match (unique_scope, message) {
                (Some(scope), message) => parsed.uniques.push(Unique {
                    field: ident.clone(),
                    scope,
                    message,
                }),
                (None, Some(message)) => {
                    return Err(syn::Error::new_spanned(
                        message,
                        "`message` is only valid together with `unique_with`",
                    ))
                }
                (None, None) => {}
            }
        }
    }

    if parsed.id.is_none() {
        parsed.id = fallback_id;
    }

    Ok(parsed)
}

fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    for (i, ch) in s.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 {
                result.push('_');
            }
            result.extend(ch.to_lowercase());
        } else {
            result.push(ch);
        }
    }
    result
}
