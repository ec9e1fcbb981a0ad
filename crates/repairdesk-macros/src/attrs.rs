//! Attribute parsing for the Record derive macro.
//!
//! Parses the `#[field(...)]` attributes placed on struct fields.

use proc_macro2::Span;
use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    Attribute, Error, Ident, Lit, Meta, Result, Token,
};

/// How a field is exposed to queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// `#[field(Text)]`
    Text,
    /// `#[field(Number)]`
    Number,
    /// `#[field(Bool)]`
    Bool,
    /// `#[field(Enum)]`, the field type implements `RecordEnum`.
    Enum,
    /// `#[field(Date)]`, an ISO-8601 date carried as text.
    Date,
}

impl FieldKind {
    fn parse_name(name: &str, span: Span) -> Result<Self> {
        match name {
            "Text" | "text" | "String" | "string" => Ok(FieldKind::Text),
            "Number" | "number" => Ok(FieldKind::Number),
            "Bool" | "bool" | "boolean" => Ok(FieldKind::Bool),
            "Enum" | "enum" | "enumeration" => Ok(FieldKind::Enum),
            "Date" | "date" => Ok(FieldKind::Date),
            other => Err(Error::new(
                span,
                format!(
                    "unknown field kind: '{}'. Expected one of: Text, Number, Bool, Enum, Date",
                    other
                ),
            )),
        }
    }

    /// Parse a kind from an identifier.
    pub fn from_ident(ident: &Ident) -> Result<Self> {
        Self::parse_name(&ident.to_string(), ident.span())
    }

    /// Parse a kind from a string literal (`kind = "enum"`).
    pub fn from_str(s: &str, span: Span) -> Result<Self> {
        Self::parse_name(s, span)
    }
}

/// Field-level attributes from `#[field(...)]`.
#[derive(Debug, Clone)]
pub struct FieldAttr {
    /// How the field is exposed; `None` means not queryable.
    pub kind: Option<FieldKind>,
    /// This field is the record's identifier.
    pub id: bool,
    /// Exclude the field entirely.
    pub skip: bool,
    /// Query name override (default: the Rust field name).
    pub rename: Option<String>,
    /// The span for error reporting.
    pub span: Span,
}

impl Default for FieldAttr {
    fn default() -> Self {
        FieldAttr {
            kind: None,
            id: false,
            skip: false,
            rename: None,
            span: Span::call_site(),
        }
    }
}

fn string_literal(expr: &syn::Expr, what: &str) -> Result<syn::LitStr> {
    if let syn::Expr::Lit(syn::ExprLit {
        lit: Lit::Str(s), ..
    }) = expr
    {
        Ok(s.clone())
    } else {
        Err(Error::new(
            expr.span(),
            format!("{} must be a string literal", what),
        ))
    }
}

impl Parse for FieldAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = FieldAttr {
            span: input.span(),
            ..FieldAttr::default()
        };

        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                Meta::Path(p) if p.is_ident("skip") => attr.skip = true,
                Meta::Path(p) if p.is_ident("id") => attr.id = true,
                Meta::Path(p) => {
                    let ident = p.get_ident().ok_or_else(|| {
                        Error::new(p.span(), "expected field kind: Text, Number, Bool, Enum, Date")
                    })?;
                    attr.kind = Some(FieldKind::from_ident(ident)?);
                    attr.span = ident.span();
                }
                Meta::NameValue(nv) if nv.path.is_ident("rename") => {
                    attr.rename = Some(string_literal(&nv.value, "rename")?.value());
                }
                Meta::NameValue(nv) if nv.path.is_ident("kind") => {
                    let lit = string_literal(&nv.value, "kind")?;
                    attr.kind = Some(FieldKind::from_str(&lit.value(), lit.span())?);
                    attr.span = lit.span();
                }
                Meta::NameValue(nv) => {
                    return Err(Error::new(
                        nv.path.span(),
                        "unknown attribute. Expected: rename or kind",
                    ));
                }
                Meta::List(list) => {
                    return Err(Error::new(list.span(), "nested field attributes are not supported"));
                }
            }
        }

        Ok(attr)
    }
}

/// Extract `#[field(...)]` attributes from a struct field.
pub fn parse_field_attrs(attrs: &[Attribute]) -> Result<FieldAttr> {
    for attr in attrs {
        if attr.path().is_ident("field") {
            return attr.parse_args::<FieldAttr>();
        }
    }
    Ok(FieldAttr::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(tokens: &str) -> Result<FieldAttr> {
        syn::parse_str::<FieldAttr>(tokens)
    }

    #[test]
    fn kinds() {
        assert_eq!(parse("Text").unwrap().kind, Some(FieldKind::Text));
        assert_eq!(parse("Number").unwrap().kind, Some(FieldKind::Number));
        assert_eq!(parse("Bool").unwrap().kind, Some(FieldKind::Bool));
        assert_eq!(parse("Enum").unwrap().kind, Some(FieldKind::Enum));
        assert_eq!(parse("Date").unwrap().kind, Some(FieldKind::Date));
    }

    #[test]
    fn kind_via_string() {
        // `enum` is a keyword, so the lowercase form goes through kind = "..."
        let attr = parse(r#"kind = "enum""#).unwrap();
        assert_eq!(attr.kind, Some(FieldKind::Enum));
        let attr = parse(r#"kind = "bool""#).unwrap();
        assert_eq!(attr.kind, Some(FieldKind::Bool));
    }

    #[test]
    fn id_marker_with_kind() {
        let attr = parse("Text, id").unwrap();
        assert!(attr.id);
        assert_eq!(attr.kind, Some(FieldKind::Text));
    }

    #[test]
    fn id_marker_alone() {
        let attr = parse("id").unwrap();
        assert!(attr.id);
        assert_eq!(attr.kind, None);
    }

    #[test]
    fn skip() {
        let attr = parse("skip").unwrap();
        assert!(attr.skip);
        assert_eq!(attr.kind, None);
    }

    #[test]
    fn rename() {
        let attr = parse(r#"Number, rename = "totalSpent""#).unwrap();
        assert_eq!(attr.kind, Some(FieldKind::Number));
        assert_eq!(attr.rename.as_deref(), Some("totalSpent"));
    }

    #[test]
    fn unknown_kind_is_an_error() {
        let err = parse("Money").unwrap_err();
        assert!(err.to_string().contains("unknown field kind"));
    }

    #[test]
    fn rename_must_be_a_string() {
        assert!(parse("rename = 3").is_err());
    }
}
