//! Catalog document loader
//!
//! Decodes the compact JSON catalog the course search front end ships:
//!
//! ```json
//! {
//!   "meta": {
//!     "masters": {
//!       "years": ["1", "2"],
//!       "terms": ["SpringA", "SpringB"],
//!       "periods": ["Mon1", "Mon2"],
//!       "formats": ["InPerson", "Online"]
//!     }
//!   },
//!   "data": [
//!     ["GB10234", "Intro to Systems", "2.0", "1 - 2", "SpringA", "Mon1", "InPerson", 3, 1, 1, 0, 1]
//!   ]
//! }
//! ```
//!
//! Each row is a positional array: identifier, title, credits, four display
//! strings, then the year, term, period-low, period-high and format bit
//! columns. Rows are shape-checked here so the filter can assume well-formed
//! records.
//!
//! # Example
//!
//! ```rust
//! use course_filter::catalog::parse_str;
//!
//! let json = r#"{
//!     "meta": {"masters": {"years": ["1"], "terms": [], "periods": [], "formats": []}},
//!     "data": [["CS101", "Intro", 2, "1", "", "", "", 1, 0, 0, 0, 0]]
//! }"#;
//!
//! let catalog = parse_str(json).unwrap();
//! assert_eq!(catalog.len(), 1);
//! assert_eq!(catalog.records()[0].credits, 2.0);
//! ```

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use super::{Catalog, Vocabularies};
use crate::error::{CatalogError, Result};
use crate::types::{CourseRecord, DisplayLabels, MaskWord};

/// Column positions within a catalog row
pub mod columns {
    /// Course identifier
    pub const ID: usize = 0;
    /// Course title
    pub const TITLE: usize = 1;
    /// Credit value
    pub const CREDITS: usize = 2;
    /// Display text: year
    pub const DISPLAY_YEAR: usize = 3;
    /// Display text: term
    pub const DISPLAY_TERM: usize = 4;
    /// Display text: period
    pub const DISPLAY_PERIOD: usize = 5;
    /// Display text: format
    pub const DISPLAY_FORMAT: usize = 6;
    /// Year bits
    pub const BIT_YEAR: usize = 7;
    /// Term bits
    pub const BIT_TERM: usize = 8;
    /// Period bits, low word
    pub const BIT_PERIOD_LOW: usize = 9;
    /// Period bits, high word
    pub const BIT_PERIOD_HIGH: usize = 10;
    /// Format bits
    pub const BIT_FORMAT: usize = 11;
    /// Minimum number of columns per row
    pub const COUNT: usize = 12;
}

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    meta: DocumentMeta,
    data: Vec<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct DocumentMeta {
    masters: Vocabularies,
}

/// Load a catalog from a JSON file
pub fn load_from_path(path: impl AsRef<Path>) -> Result<Catalog> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let catalog = load_from_reader(BufReader::new(file))?;
    info!(path = %path.display(), records = catalog.len(), "catalog loaded");
    Ok(catalog)
}

/// Load a catalog from any JSON reader
pub fn load_from_reader<R: Read>(reader: R) -> Result<Catalog> {
    let document: CatalogDocument = serde_json::from_reader(reader)?;
    from_document(document)
}

/// Load a catalog from a JSON string
pub fn parse_str(json: &str) -> Result<Catalog> {
    let document: CatalogDocument = serde_json::from_str(json)?;
    from_document(document)
}

fn from_document(document: CatalogDocument) -> Result<Catalog> {
    let records = document
        .data
        .iter()
        .enumerate()
        .map(|(row, values)| decode_row(row, values))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(Catalog::new(records, &document.meta.masters)?)
}

/// Decode one positional row into a record
///
/// Extra trailing columns are ignored.
pub fn decode_row(row: usize, values: &[Value]) -> std::result::Result<CourseRecord, CatalogError> {
    if values.len() < columns::COUNT {
        return Err(malformed(
            row,
            format!(
                "expected at least {} columns, found {}",
                columns::COUNT,
                values.len()
            ),
        ));
    }

    Ok(CourseRecord {
        identifier: required_string(row, values, columns::ID, "identifier")?,
        title: required_string(row, values, columns::TITLE, "title")?,
        credits: credits(row, &values[columns::CREDITS])?,
        display: DisplayLabels {
            year: display_string(&values[columns::DISPLAY_YEAR]),
            term: display_string(&values[columns::DISPLAY_TERM]),
            period: display_string(&values[columns::DISPLAY_PERIOD]),
            format: display_string(&values[columns::DISPLAY_FORMAT]),
        },
        year_bits: bits(row, values, columns::BIT_YEAR, "year bits")?,
        term_bits: bits(row, values, columns::BIT_TERM, "term bits")?,
        period_bits_low: bits(row, values, columns::BIT_PERIOD_LOW, "period low bits")?,
        period_bits_high: bits(row, values, columns::BIT_PERIOD_HIGH, "period high bits")?,
        format_bits: bits(row, values, columns::BIT_FORMAT, "format bits")?,
    })
}

fn malformed(row: usize, reason: impl Into<String>) -> CatalogError {
    CatalogError::MalformedRecord {
        row,
        reason: reason.into(),
    }
}

fn required_string(
    row: usize,
    values: &[Value],
    column: usize,
    name: &str,
) -> std::result::Result<String, CatalogError> {
    match &values[column] {
        Value::String(s) => Ok(s.clone()),
        other => Err(malformed(row, format!("{} must be a string, got {}", name, other))),
    }
}

/// Display columns are informational; null and non-strings render as text
fn display_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Credits arrive either as a number or as a numeric string; blank means 0
fn credits(row: usize, value: &Value) -> std::result::Result<f32, CatalogError> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .map(|f| f as f32)
            .ok_or_else(|| malformed(row, format!("credits {} is not representable", n))),
        Value::String(s) if s.trim().is_empty() => Ok(0.0),
        Value::String(s) => s
            .trim()
            .parse::<f32>()
            .map_err(|_| malformed(row, format!("credits '{}' is not a number", s))),
        Value::Null => Ok(0.0),
        other => Err(malformed(row, format!("credits must be numeric, got {}", other))),
    }
}

fn bits(
    row: usize,
    values: &[Value],
    column: usize,
    name: &str,
) -> std::result::Result<MaskWord, CatalogError> {
    let value = &values[column];
    let unsigned = value.as_u64().and_then(|n| MaskWord::try_from(n).ok());
    // Writers using signed 32-bit shifts emit bit 31 as a negative number
    let signed = || {
        value
            .as_i64()
            .and_then(|n| i32::try_from(n).ok())
            .map(|n| n as MaskWord)
    };

    unsigned.or_else(signed).ok_or_else(|| {
        malformed(
            row,
            format!("{} must be a 32-bit integer, got {}", name, value),
        )
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use serde_json::json;

    fn row(values: Value) -> Vec<Value> {
        match values {
            Value::Array(v) => v,
            _ => panic!("test rows must be arrays"),
        }
    }

    #[test]
    fn test_decode_row() {
        let values = row(json!([
            "GB10234", "Intro", "2.5", "1", "SpringA", "Mon1", "Online", 3, 1, 1, 2, 1
        ]));
        let record = decode_row(0, &values).unwrap();

        assert_eq!(record.identifier, "GB10234");
        assert_eq!(record.credits, 2.5);
        assert_eq!(record.display.term, "SpringA");
        assert_eq!(record.year_bits, 3);
        assert_eq!((record.period_bits_low, record.period_bits_high), (1, 2));
        assert_eq!(record.format_bits, 1);
    }

    #[test]
    fn test_credits_forms() {
        assert_eq!(credits(0, &json!(1)).unwrap(), 1.0);
        assert_eq!(credits(0, &json!(" 3.0 ")).unwrap(), 3.0);
        assert_eq!(credits(0, &json!("")).unwrap(), 0.0);
        assert_eq!(credits(0, &Value::Null).unwrap(), 0.0);
        assert!(credits(0, &json!("two")).is_err());
        assert!(credits(0, &json!([1])).is_err());
    }

    #[test]
    fn test_short_row_rejected() {
        let values = row(json!(["GB1", "Intro", 2]));
        let err = decode_row(4, &values).unwrap_err();
        assert!(matches!(err, CatalogError::MalformedRecord { row: 4, .. }));
    }

    #[test]
    fn test_bad_bit_column_rejected() {
        let too_negative = row(json!(["A", "a", 1, "", "", "", "", -2147483649i64, 0, 0, 0, 0]));
        let too_wide = row(json!(["A", "a", 1, "", "", "", "", 0, 4294967296u64, 0, 0, 0]));
        let text = row(json!(["A", "a", 1, "", "", "", "", 0, 0, "1", 0, 0]));
        let fractional = row(json!(["A", "a", 1, "", "", "", "", 0, 0, 0, 0, 1.5]));

        assert!(decode_row(0, &too_negative).is_err());
        assert!(decode_row(0, &too_wide).is_err());
        assert!(decode_row(0, &text).is_err());
        assert!(decode_row(0, &fractional).is_err());
    }

    #[test]
    fn test_signed_bit_columns_reinterpreted() {
        // 1 << 31 and !0 as produced by signed 32-bit arithmetic
        let values = row(json!([
            "A", "a", 1, "", "", "", "", -2147483648i64, -1, 0, -2147483647i64, 4294967295u64
        ]));
        let record = decode_row(0, &values).unwrap();

        assert_eq!(record.year_bits, 1 << 31);
        assert_eq!(record.term_bits, MaskWord::MAX);
        assert_eq!(record.period_bits_high, (1 << 31) | 1);
        assert_eq!(record.format_bits, MaskWord::MAX);
    }

    #[test]
    fn test_identifier_must_be_string() {
        let values = row(json!([101, "a", 1, "", "", "", "", 0, 0, 0, 0, 0]));
        assert!(decode_row(0, &values).is_err());
    }

    #[test]
    fn test_display_null_is_empty() {
        let values = row(json!(["A", "a", 1, null, 2, "", "", 0, 0, 0, 0, 0]));
        let record = decode_row(0, &values).unwrap();
        assert_eq!(record.display.year, "");
        assert_eq!(record.display.term, "2");
    }

    #[test]
    fn test_parse_document() {
        let json = r#"{
            "meta": {"masters": {
                "years": ["1", "2"],
                "terms": ["SpringA"],
                "periods": ["Mon1", "Mon2"],
                "formats": ["Online"]
            }},
            "data": [
                ["CS101", "Intro", 2, "1", "SpringA", "Mon1", "Online", 1, 1, 1, 0, 1],
                ["CS102", "Advanced", 2, "2", "SpringA", "Mon2", "Online", 2, 1, 2, 0, 1]
            ]
        }"#;

        let catalog = parse_str(json).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.indexes().period.find("Mon2"), Some(1));
    }

    #[test]
    fn test_malformed_row_reports_position() {
        let json = r#"{
            "meta": {"masters": {"years": [], "terms": [], "periods": [], "formats": []}},
            "data": [
                ["CS101", "Intro", 2, "", "", "", "", 0, 0, 0, 0, 0],
                ["CS102", "Advanced"]
            ]
        }"#;

        match parse_str(json) {
            Err(Error::Catalog(CatalogError::MalformedRecord { row, .. })) => assert_eq!(row, 1),
            other => panic!("expected malformed record, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_document() {
        assert!(matches!(
            parse_str("{\"data\": []}"),
            Err(Error::Catalog(CatalogError::InvalidDocument(_)))
        ));
        assert!(matches!(
            parse_str("not json"),
            Err(Error::Catalog(CatalogError::InvalidDocument(_)))
        ));
    }

    #[test]
    fn test_duplicate_master_rejected() {
        let json = r#"{
            "meta": {"masters": {"years": ["1", "1"], "terms": [], "periods": [], "formats": []}},
            "data": []
        }"#;

        assert!(matches!(
            parse_str(json),
            Err(Error::Catalog(CatalogError::DuplicateLabel { .. }))
        ));
    }
}
