//! Implementation of the `#[derive(Record)]` macro.
//!
//! Generates an implementation of `repairdesk_query::Record` plus field
//! name constants for building tables without string typos.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{spanned::Spanned, Data, DeriveInput, Error, Fields, Result, Type};

use crate::attrs::{parse_field_attrs, FieldKind};

/// Main implementation of the Record derive macro.
pub fn record_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(Error::new(
                    input.span(),
                    "Record can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new(
                input.span(),
                "Record can only be derived for structs",
            ))
        }
    };

    let mut field_matches: Vec<TokenStream> = Vec::new();
    let mut field_constants: Vec<TokenStream> = Vec::new();
    let mut id_field: Option<(&syn::Ident, &Type)> = None;

    for field in fields.iter() {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "expected named field"))?;

        let attrs = parse_field_attrs(&field.attrs)?;

        if attrs.skip {
            if attrs.id {
                return Err(Error::new(attrs.span, "the id field cannot be skipped"));
            }
            continue;
        }

        if attrs.id {
            if id_field.is_some() {
                return Err(Error::new(
                    field.span(),
                    "only one field can be marked #[field(id)]",
                ));
            }
            id_field = Some((field_name, &field.ty));
        }

        let kind = match attrs.kind {
            Some(k) => k,
            None => continue,
        };

        let query_name = attrs.rename.unwrap_or_else(|| field_name.to_string());
        let const_name = format_ident!("{}", to_screaming_snake_case(&query_name));

        field_constants.push(quote! {
            /// Field name constant for table definitions.
            pub const #const_name: &'static str = #query_name;
        });

        let value_expr = value_expr(kind, field_name, is_option(&field.ty));
        field_matches.push(quote! {
            #query_name => #value_expr,
        });
    }

    let (id_name, id_ty) = id_field.ok_or_else(|| {
        Error::new(
            input.span(),
            "Record requires exactly one field marked #[field(id)]",
        )
    })?;

    let expanded = quote! {
        impl #impl_generics #struct_name #ty_generics #where_clause {
            #(#field_constants)*
        }

        impl #impl_generics ::repairdesk_query::Record for #struct_name #ty_generics #where_clause {
            type Id = #id_ty;

            fn id(&self) -> &Self::Id {
                &self.#id_name
            }

            fn field(&self, name: &str) -> ::repairdesk_query::Value<'_> {
                match name {
                    #(#field_matches)*
                    _ => ::repairdesk_query::Value::None,
                }
            }
        }
    };

    Ok(expanded)
}

fn value_expr(kind: FieldKind, field: &syn::Ident, optional: bool) -> TokenStream {
    match (kind, optional) {
        (FieldKind::Text | FieldKind::Date, false) => {
            quote! { ::repairdesk_query::Value::text(&self.#field) }
        }
        (FieldKind::Text | FieldKind::Date, true) => {
            quote! { ::repairdesk_query::Value::from(self.#field.as_deref()) }
        }
        (FieldKind::Number, false) => {
            quote! {
                ::repairdesk_query::Value::Number(::repairdesk_query::Number::from(self.#field))
            }
        }
        (FieldKind::Number, true) => {
            quote! {
                match self.#field {
                    Some(n) => ::repairdesk_query::Value::Number(::repairdesk_query::Number::from(n)),
                    None => ::repairdesk_query::Value::None,
                }
            }
        }
        (FieldKind::Bool, false) => {
            quote! { ::repairdesk_query::Value::Bool(self.#field) }
        }
        (FieldKind::Bool, true) => {
            quote! { ::repairdesk_query::Value::from(self.#field) }
        }
        (FieldKind::Enum, false) => {
            quote! {
                ::repairdesk_query::Value::text(
                    ::repairdesk_query::RecordEnum::key(&self.#field)
                )
            }
        }
        (FieldKind::Enum, true) => {
            quote! {
                match &self.#field {
                    Some(e) => ::repairdesk_query::Value::text(::repairdesk_query::RecordEnum::key(e)),
                    None => ::repairdesk_query::Value::None,
                }
            }
        }
    }
}

/// `Option<T>` fields yield `Value::None` when empty.
fn is_option(ty: &Type) -> bool {
    match ty {
        Type::Path(path) if path.qself.is_none() => path
            .path
            .segments
            .last()
            .map(|seg| seg.ident == "Option")
            .unwrap_or(false),
        _ => false,
    }
}

/// Convert a string to SCREAMING_SNAKE_CASE.
fn to_screaming_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let mut prev_was_lower = false;

    for c in s.chars() {
        if c.is_uppercase() {
            if prev_was_lower {
                result.push('_');
            }
            result.push(c);
            prev_was_lower = false;
        } else if c == '_' || c == '-' {
            result.push('_');
            prev_was_lower = false;
        } else {
            result.push(c.to_ascii_uppercase());
            prev_was_lower = c.is_alphanumeric();
        }
    }

    result
}
