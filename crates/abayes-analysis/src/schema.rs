//! Query schema description and field-role resolution
//!
//! A query result exposes its columns as *dimensions* followed by *measures*,
//! each with a declared type. An A/B test needs three of them:
//!
//! | Role                | Declared type | Selection                         |
//! |---------------------|---------------|-----------------------------------|
//! | variant label       | `string`      | first string field                |
//! | visitor count       | `number`      | first number field                |
//! | conversion count    | `number`      | second number field               |
//!
//! Fields are scanned dimensions-first, in declaration order. This is a
//! best-effort heuristic: reordering the columns of a query changes which
//! field is treated as visitors and which as conversions. Queries should list
//! the visitor column before the conversion column.
//!
//! # Examples
//!
//! ```
//! use abayes_analysis::schema::{FieldDescriptor, FieldType, QueryFields, resolve_fields};
//!
//! let fields = QueryFields {
//!     dimensions: vec![FieldDescriptor::new("ab.variant", FieldType::String)],
//!     measures: vec![
//!         FieldDescriptor::new("ab.visitors", FieldType::Number),
//!         FieldDescriptor::new("ab.conversions", FieldType::Number),
//!     ],
//! };
//! let resolved = resolve_fields(&fields).unwrap();
//! assert_eq!(resolved.variant, "ab.variant");
//! assert_eq!(resolved.visitors, "ab.visitors");
//! assert_eq!(resolved.conversions, "ab.conversions");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Declared type of a query field.
///
/// Only `string` and `number` take part in role resolution; every other
/// declared type (dates, yes/no, tiers, ...) is kept as [`FieldType::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    String,
    Number,
    #[serde(other)]
    Other,
}

/// A dimension or measure of a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

impl FieldDescriptor {
    pub fn new<S>(name: S, field_type: FieldType) -> Self
    where
        S: Into<String>,
    {
        Self {
            name: name.into(),
            field_type,
        }
    }
}

/// Ordered dimensions and measures of a query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryFields {
    #[serde(default)]
    pub dimensions: Vec<FieldDescriptor>,
    #[serde(default)]
    pub measures: Vec<FieldDescriptor>,
}

impl QueryFields {
    /// Iterates over dimensions, then measures.
    pub fn iter(&self) -> impl Iterator<Item = &FieldDescriptor> + '_ {
        self.dimensions.iter().chain(&self.measures)
    }
}

/// Role a field plays in the A/B test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum FieldRole {
    #[display("variant label (string)")]
    VariantLabel,
    #[display("visitor count (number)")]
    Visitors,
    #[display("conversion count (number)")]
    Conversions,
}

/// Field names assigned to the three roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedFields {
    pub variant: String,
    pub visitors: String,
    pub conversions: String,
}

/// The schema lacks a field for one or more roles.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Error)]
pub struct SchemaResolutionError {
    pub missing: Vec<FieldRole>,
}

impl fmt::Display for SchemaResolutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "query schema has no field for")?;
        for (i, role) in self.missing.iter().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            write!(f, "{sep}{role}")?;
        }
        Ok(())
    }
}

/// Assigns query fields to the variant, visitor and conversion roles.
pub fn resolve_fields(fields: &QueryFields) -> Result<ResolvedFields, SchemaResolutionError> {
    let mut variant = None;
    let mut visitors = None;
    let mut conversions = None;

    for field in fields.iter() {
        let name = || Some(field.name.clone());
        match field.field_type {
            FieldType::String if variant.is_none() => variant = name(),
            FieldType::Number if visitors.is_none() => visitors = name(),
            FieldType::Number if conversions.is_none() => conversions = name(),
            _ => {}
        }
    }

    match (variant, visitors, conversions) {
        (Some(variant), Some(visitors), Some(conversions)) => {
            let resolved = ResolvedFields {
                variant,
                visitors,
                conversions,
            };
            tracing::debug!(?resolved, "resolved query fields");
            Ok(resolved)
        }
        (variant, visitors, conversions) => {
            let missing = [
                (variant.is_none(), FieldRole::VariantLabel),
                (visitors.is_none(), FieldRole::Visitors),
                (conversions.is_none(), FieldRole::Conversions),
            ]
            .into_iter()
            .filter_map(|(is_missing, role)| is_missing.then_some(role))
            .collect();
            Err(SchemaResolutionError { missing })
        }
    }
}
