//! Parsing utilities for record and column attributes
//!
//! This module handles the parsing of `#[record]` and `#[column]` attributes
//! and validation of the resulting column names.

use convert_case::{Case, Casing};
use proc_macro2::Span;
use std::collections::HashMap;
use syn::{ext::IdentExt, Attribute, Data, Error, Fields, Ident, LitStr, Result};

/// Longest column or record name accepted, matching procedure name parts
const MAX_NAME_LENGTH: usize = 128;

/// Validate column name and return syn::Error for better proc macro error handling
pub fn validate_column_name_syn(name: &str, span: Span) -> Result<()> {
    validate_identifier(name)
        .map_err(|e| Error::new(span, format!("Invalid column name '{}': {}", name, e)))
}

/// Validate record name and return syn::Error for better proc macro error handling
pub fn validate_record_name_syn(name: &str, span: Span) -> Result<()> {
    validate_identifier(name)
        .map_err(|e| Error::new(span, format!("Invalid record name '{}': {}", name, e)))
}

/// Same rules as procedure name parts at runtime
fn validate_identifier(name: &str) -> std::result::Result<(), String> {
    let first_char = name
        .chars()
        .next()
        .ok_or_else(|| "Name cannot be empty".to_string())?;

    if name.len() > MAX_NAME_LENGTH {
        return Err(format!(
            "too long: {} characters (max {})",
            name.len(),
            MAX_NAME_LENGTH
        ));
    }

    if !first_char.is_ascii_alphabetic() && first_char != '_' {
        return Err("must start with a letter or underscore".to_string());
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(
            "contains invalid characters: only alphanumeric characters and underscores are allowed"
                .to_string(),
        );
    }

    Ok(())
}

/// Case convention applied to field names that have no explicit column name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameRule {
    PascalCase,
    CamelCase,
    SnakeCase,
    ScreamingSnakeCase,
}

impl RenameRule {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "PascalCase" => Some(RenameRule::PascalCase),
            "camelCase" => Some(RenameRule::CamelCase),
            "snake_case" => Some(RenameRule::SnakeCase),
            "SCREAMING_SNAKE_CASE" => Some(RenameRule::ScreamingSnakeCase),
            _ => None,
        }
    }

    pub fn apply(self, field: &str) -> String {
        let case = match self {
            RenameRule::PascalCase => Case::UpperCamel,
            RenameRule::CamelCase => Case::Camel,
            RenameRule::SnakeCase => Case::Snake,
            RenameRule::ScreamingSnakeCase => Case::UpperSnake,
        };
        field.to_case(case)
    }
}

#[derive(Debug)]
pub struct RecordInfo {
    /// Type context handed to name resolvers
    pub name: String,
    pub rename_all: Option<RenameRule>,
}

#[derive(Debug)]
pub struct ColumnField {
    pub ident: Ident,
    pub column: String,
}

#[derive(Debug)]
pub struct FieldInfo {
    /// Bound and read fields, in declaration order
    pub columns: Vec<ColumnField>,
    /// `#[column(skip)]` fields, filled with `Default::default()`
    pub skipped: Vec<Ident>,
}

pub fn parse_record_attributes(ident: &Ident, attrs: &[Attribute]) -> Result<RecordInfo> {
    let mut name = None;
    let mut rename_all = None;

    for attr in attrs {
        if !attr.path().is_ident("record") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let value: LitStr = meta.value()?.parse()?;
                validate_record_name_syn(&value.value(), value.span())?;
                name = Some(value.value());
                Ok(())
            } else if meta.path.is_ident("rename_all") {
                let value: LitStr = meta.value()?.parse()?;
                let rule = RenameRule::parse(&value.value()).ok_or_else(|| {
                    Error::new(
                        value.span(),
                        format!(
                            "unknown rename_all rule '{}': expected PascalCase, camelCase, snake_case or SCREAMING_SNAKE_CASE",
                            value.value()
                        ),
                    )
                })?;
                rename_all = Some(rule);
                Ok(())
            } else {
                Err(meta.error("unsupported record attribute: expected `name` or `rename_all`"))
            }
        })?;
    }

    Ok(RecordInfo {
        name: name.unwrap_or_else(|| ident.unraw().to_string()),
        rename_all,
    })
}

struct ColumnAttribute {
    name: Option<LitStr>,
    skip: bool,
}

fn parse_column_attribute(attrs: &[Attribute]) -> Result<ColumnAttribute> {
    let mut column = ColumnAttribute {
        name: None,
        skip: false,
    };

    for attr in attrs {
        if !attr.path().is_ident("column") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                column.name = Some(meta.value()?.parse()?);
                Ok(())
            } else if meta.path.is_ident("skip") {
                column.skip = true;
                Ok(())
            } else {
                Err(meta.error("unsupported column attribute: expected `name` or `skip`"))
            }
        })?;
    }

    if column.skip {
        if let Some(name) = &column.name {
            return Err(Error::new(
                name.span(),
                "a skipped field cannot also name a column",
            ));
        }
    }

    Ok(column)
}

pub fn parse_field_attributes(data: &Data, record_info: &RecordInfo) -> Result<FieldInfo> {
    if let Data::Struct(data_struct) = data {
        if let Fields::Named(fields_named) = &data_struct.fields {
            let mut columns = Vec::new();
            let mut skipped = Vec::new();
            // lowercase column -> field that claimed it
            let mut seen: HashMap<String, String> = HashMap::new();

            for field in &fields_named.named {
                let field_name = field
                    .ident
                    .as_ref()
                    .ok_or_else(|| Error::new_spanned(field, "Field must have a name"))?;

                let attribute = parse_column_attribute(&field.attrs)?;
                if attribute.skip {
                    skipped.push(field_name.clone());
                    continue;
                }

                let (column, span) = match &attribute.name {
                    Some(lit) => (lit.value(), lit.span()),
                    None => {
                        let raw = field_name.unraw().to_string();
                        let column = match record_info.rename_all {
                            Some(rule) => rule.apply(&raw),
                            None => raw,
                        };
                        (column, field_name.span())
                    }
                };

                validate_column_name_syn(&column, span)?;

                let field_name_str = field_name.unraw().to_string();
                if let Some(previous) = seen.insert(column.to_lowercase(), field_name_str.clone()) {
                    return Err(Error::new(
                        span,
                        format!(
                            "column '{}' of field '{}' is already used by field '{}' (column names are case-insensitive)",
                            column, field_name_str, previous
                        ),
                    ));
                }

                columns.push(ColumnField {
                    ident: field_name.clone(),
                    column,
                });
            }

            return Ok(FieldInfo { columns, skipped });
        }
    }

    Err(Error::new(
        Span::call_site(),
        "Record can only be derived for structs with named fields",
    ))
}
