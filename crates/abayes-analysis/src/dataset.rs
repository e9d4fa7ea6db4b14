//! Query responses and extraction of the two observed variants.
//!
//! A query response carries the field schema plus one row per variant. Each
//! row maps a field name to a cell whose `value` is an arbitrary JSON value:
//!
//! ```json
//! {
//!   "fields": {
//!     "dimensions": [{ "name": "ab.variant", "type": "string" }],
//!     "measures": [
//!       { "name": "ab.visitors", "type": "number" },
//!       { "name": "ab.conversions", "type": "number" }
//!     ]
//!   },
//!   "data": [
//!     { "ab.variant": { "value": "Control" }, "ab.visitors": { "value": 1300 }, "ab.conversions": { "value": 120 } },
//!     { "ab.variant": { "value": "Treatment" }, "ab.visitors": { "value": 1275 }, "ab.conversions": { "value": 125 } }
//!   ]
//! }
//! ```
//!
//! Row 0 is variant A and row 1 is variant B. Further rows are ignored.

use std::collections::BTreeMap;

use abayes_stats::{error::InvalidInputError, posterior::VariantObservation};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schema::{QueryFields, ResolvedFields};

/// A single cell of a result row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    #[serde(default)]
    pub value: Value,
}

impl Cell {
    pub fn new<V>(value: V) -> Self
    where
        V: Into<Value>,
    {
        Self {
            value: value.into(),
        }
    }
}

pub type Row = BTreeMap<String, Cell>;

/// Field schema plus result rows of a query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub fields: QueryFields,
    #[serde(default)]
    pub data: Vec<Row>,
}

/// Reads the observations of variants A and B from the first two rows.
pub fn extract_observations(
    rows: &[Row],
    fields: &ResolvedFields,
) -> Result<(VariantObservation, VariantObservation), InvalidInputError> {
    let [row_a, row_b, ..] = rows else {
        return Err(InvalidInputError::MissingRows { found: rows.len() });
    };
    if rows.len() > 2 {
        tracing::debug!(ignored = rows.len() - 2, "ignoring extra result rows");
    }
    Ok((
        observation(0, row_a, fields)?,
        observation(1, row_b, fields)?,
    ))
}

fn observation(
    index: usize,
    row: &Row,
    fields: &ResolvedFields,
) -> Result<VariantObservation, InvalidInputError> {
    let label = label(index, row, &fields.variant)?;
    let visitors = count(index, row, &fields.visitors)?;
    let conversions = count(index, row, &fields.conversions)?;
    Ok(VariantObservation::new(label, visitors, conversions))
}

fn cell<'a>(index: usize, row: &'a Row, field: &str) -> Result<&'a Value, InvalidInputError> {
    row.get(field)
        .map(|cell| &cell.value)
        .filter(|value| !value.is_null())
        .ok_or_else(|| InvalidInputError::MissingField {
            row: index,
            field: field.to_owned(),
        })
}

fn label(index: usize, row: &Row, field: &str) -> Result<String, InvalidInputError> {
    Ok(match cell(index, row, field)? {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

/// Parses a count from a JSON number or a numeric string.
///
/// Integral floats such as `1300.0` are accepted; fractions, negatives and
/// anything else are rejected.
fn count(index: usize, row: &Row, field: &str) -> Result<u64, InvalidInputError> {
    let value = cell(index, row, field)?;
    let parsed = match value {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().and_then(integral_count)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<u64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(integral_count))
        }
        _ => None,
    };
    parsed.ok_or_else(|| InvalidInputError::InvalidCount {
        row: index,
        field: field.to_owned(),
        value: value.to_string(),
    })
}

/// Largest float below which every integer is exactly representable.
const MAX_EXACT_COUNT: f64 = 9_007_199_254_740_992.0;

#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn integral_count(x: f64) -> Option<u64> {
    (x.is_finite() && (0.0..=MAX_EXACT_COUNT).contains(&x) && x.fract() == 0.0).then(|| x as u64)
}
