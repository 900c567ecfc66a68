//! Model derive macro implementation
//!
//! Reads the struct's fields and `#[model(...)]` attributes and emits the
//! `Model` impl plus the equality, formatting and value conversions that
//! make up the mixin.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{
    ext::IdentExt, parse::Result, parse_macro_input, Attribute, Data, DeriveInput, Error, Fields,
    Ident, LitStr,
};

/// Main implementation function for the Model derive
pub fn derive_model_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand_model(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

#[derive(Default)]
struct ContainerAttrs {
    table: Option<LitStr>,
    naming: Option<Ident>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    Column,
    Relationship,
    Skip,
}

struct FieldInfo {
    ident: Ident,
    name: String,
    kind: FieldKind,
    primary_key: bool,
}

fn expand_model(input: &DeriveInput) -> Result<TokenStream2> {
    if !input.generics.params.is_empty() {
        return Err(Error::new_spanned(
            &input.generics,
            "#[derive(Model)] does not support generic models",
        ));
    }

    let container = parse_container_attrs(&input.attrs)?;
    let fields = parse_fields(input)?;
    let primary_key = resolve_primary_key(input, &fields)?;

    let ident = &input.ident;
    let model_name = ident.unraw().to_string();

    let table = match (&container.table, &container.naming) {
        (Some(table), _) => quote!(.with_table(#table)),
        (None, Some(naming)) => quote!(.with_naming(::tenon::NamingConvention::#naming)),
        (None, None) => quote!(),
    };

    let columns: Vec<&FieldInfo> = fields.iter().filter(|f| f.kind == FieldKind::Column).collect();
    let column_names: Vec<&str> = columns.iter().map(|f| f.name.as_str()).collect();
    let column_idents: Vec<&Ident> = columns.iter().map(|f| &f.ident).collect();

    let relationships: Vec<&FieldInfo> = fields
        .iter()
        .filter(|f| f.kind == FieldKind::Relationship)
        .collect();
    let relationship_names: Vec<&str> = relationships.iter().map(|f| f.name.as_str()).collect();
    let relationship_idents: Vec<&Ident> = relationships.iter().map(|f| &f.ident).collect();

    let meta_static = format_ident!("__{}_META", model_name.to_uppercase());

    Ok(quote! {
        impl ::tenon::Model for #ident {
            fn meta() -> &'static ::tenon::ModelMeta {
                #[allow(non_upper_case_globals)]
                static #meta_static: ::tenon::__private::Lazy<::tenon::ModelMeta> =
                    ::tenon::__private::Lazy::new(|| {
                        ::tenon::ModelMeta::new(#model_name)
                            #table
                            .with_primary_key(&[#(#primary_key),*])
                            .with_columns(&[#(#column_names),*])
                            .with_relationships(&[#(#relationship_names),*])
                    });
                &#meta_static
            }

            fn model_meta(&self) -> &'static ::tenon::ModelMeta {
                <Self as ::tenon::Model>::meta()
            }

            fn column_values(&self) -> ::std::vec::Vec<(&'static str, ::tenon::Value)> {
                ::std::vec![
                    #((#column_names, ::tenon::ToValue::to_value(&self.#column_idents))),*
                ]
            }

            fn relationships(&self) -> ::std::vec::Vec<(&'static str, &dyn ::tenon::Relationship)> {
                ::std::vec![
                    #((#relationship_names, &self.#relationship_idents as &dyn ::tenon::Relationship)),*
                ]
            }
        }

        impl ::std::cmp::PartialEq for #ident {
            fn eq(&self, other: &Self) -> bool {
                ::tenon::Model::model_eq(self, other)
            }
        }

        impl ::std::fmt::Debug for #ident {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(&::tenon::Model::repr(self))
            }
        }

        impl ::std::fmt::Display for #ident {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(&::tenon::Model::repr(self))
            }
        }

        impl ::tenon::ToValue for #ident {
            fn to_value(&self) -> ::tenon::Value {
                ::tenon::Value::Model(::std::sync::Arc::new(::std::clone::Clone::clone(self)))
            }
        }
    })
}

fn parse_container_attrs(attrs: &[Attribute]) -> Result<ContainerAttrs> {
    let mut container = ContainerAttrs::default();

    for attr in attrs.iter().filter(|a| a.path().is_ident("model")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("table") {
                let table: LitStr = meta.value()?.parse()?;
                if table.value().trim().is_empty() {
                    return Err(Error::new_spanned(&table, "table name must not be empty"));
                }
                container.table = Some(table);
                Ok(())
            } else if meta.path.is_ident("naming") {
                let naming: LitStr = meta.value()?.parse()?;
                let variant = match naming.value().as_str() {
                    "lowercase" => "Lowercase",
                    "snake_case" => "SnakeCase",
                    "verbatim" => "Verbatim",
                    _ => {
                        return Err(Error::new_spanned(
                            &naming,
                            "expected \"lowercase\", \"snake_case\" or \"verbatim\"",
                        ))
                    }
                };
                container.naming = Some(Ident::new(variant, naming.span()));
                Ok(())
            } else {
                Err(meta.error("unsupported model attribute, expected `table` or `naming`"))
            }
        })?;
    }

    Ok(container)
}

fn parse_fields(input: &DeriveInput) -> Result<Vec<FieldInfo>> {
    let named = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => named,
            _ => {
                return Err(Error::new_spanned(
                    &input.ident,
                    "#[derive(Model)] requires a struct with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new_spanned(
                &input.ident,
                "#[derive(Model)] can only be applied to structs",
            ))
        }
    };

    let mut fields = Vec::new();
    for field in &named.named {
        let Some(ident) = &field.ident else {
            continue;
        };

        let mut kind = FieldKind::Column;
        let mut primary_key = false;

        for attr in field.attrs.iter().filter(|a| a.path().is_ident("model")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("primary_key") {
                    primary_key = true;
                } else if meta.path.is_ident("relationship") {
                    kind = FieldKind::Relationship;
                } else if meta.path.is_ident("skip") {
                    kind = FieldKind::Skip;
                } else {
                    return Err(meta.error(
                        "unsupported field attribute, expected `primary_key`, `relationship` or `skip`",
                    ));
                }
                Ok(())
            })?;
        }

        if primary_key && kind != FieldKind::Column {
            return Err(Error::new_spanned(
                ident,
                "a primary key field must be a plain column",
            ));
        }

        fields.push(FieldInfo {
            ident: ident.clone(),
            name: ident.unraw().to_string(),
            kind,
            primary_key,
        });
    }

    Ok(fields)
}

/// Explicitly marked key fields, or the `id` column
fn resolve_primary_key<'a>(input: &DeriveInput, fields: &'a [FieldInfo]) -> Result<Vec<&'a str>> {
    let explicit: Vec<&str> = fields
        .iter()
        .filter(|f| f.primary_key)
        .map(|f| f.name.as_str())
        .collect();
    if !explicit.is_empty() {
        return Ok(explicit);
    }

    fields
        .iter()
        .find(|f| f.kind == FieldKind::Column && f.name == "id")
        .map(|f| vec![f.name.as_str()])
        .ok_or_else(|| {
            Error::new_spanned(
                &input.ident,
                "model has no primary key; mark a field with #[model(primary_key)] or add an `id` field",
            )
        })
}
