//! Type-preserving coercion for admin field edits.
//!
//! The admin browser submits plain JSON, but stored documents carry the full
//! BSON type range. Each incoming field is coerced to the type of the value it
//! replaces, so editing a `Decimal128` price with the string `"19.90"` keeps it
//! a `Decimal128`. The match over [`Bson`] is deliberately wildcard-free; a
//! driver upgrade that adds a variant must be handled here before it compiles.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bson::spec::BinarySubtype;
use bson::{Binary, Bson, Document, JavaScriptCodeWithScope, Timestamp};
use chrono::{NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;
use thiserror::Error;

use crate::error::AppError;

/// Why a submitted value cannot become the stored type. The message is what
/// the admin UI shows next to the field.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CoerceError {
    #[error("Invalid ObjectId")]
    ObjectId,
    #[error("Invalid Date")]
    Date,
    #[error("Invalid Decimal128")]
    Decimal,
    #[error("Invalid Int64")]
    Int64,
    #[error("Invalid Int32")]
    Int32,
    #[error("Invalid number")]
    Number,
    #[error("Invalid UUID")]
    Uuid,
    #[error("Invalid Binary (must be base64 string)")]
    Binary,
    #[error("Invalid Timestamp (must have numeric 't' and 'i')")]
    Timestamp,
    #[error("Invalid RegExp")]
    Regex,
    #[error("Invalid Code (must be string)")]
    Code,
    #[error("Invalid DBRef (must have $ref, $id)")]
    DbRef,
    #[error("Invalid boolean")]
    Boolean,
    #[error("Invalid string")]
    String,
    #[error("Invalid JSON value")]
    Json,
}

/// Coerces `raw` to the type of `original`. `None` means the field does not
/// exist on the stored document yet; the raw value is then taken as-is under
/// Extended JSON interpretation.
pub fn coerce(original: Option<&Bson>, raw: &Value) -> Result<Bson, CoerceError> {
    let Some(original) = original else {
        return convert_json(raw);
    };
    match original {
        // A null or undefined slot carries no type to preserve.
        Bson::Null | Bson::Undefined => convert_json(raw),
        Bson::ObjectId(_) => match raw {
            Value::String(s) => bson::oid::ObjectId::parse_str(s)
                .map(Bson::ObjectId)
                .map_err(|_| CoerceError::ObjectId),
            _ => Err(CoerceError::ObjectId),
        },
        Bson::DateTime(_) => parse_date_value(raw).ok_or(CoerceError::Date),
        Bson::Decimal128(_) => match raw {
            Value::String(s) => s
                .trim()
                .parse()
                .map(Bson::Decimal128)
                .map_err(|_| CoerceError::Decimal),
            Value::Number(n) => n
                .to_string()
                .parse()
                .map(Bson::Decimal128)
                .map_err(|_| CoerceError::Decimal),
            _ => Err(CoerceError::Decimal),
        },
        Bson::Int64(_) => match raw {
            Value::String(s) => s
                .trim()
                .parse()
                .map(Bson::Int64)
                .map_err(|_| CoerceError::Int64),
            // Fractional input truncates; the cast saturates at the i64 range.
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f as i64))
                .map(Bson::Int64)
                .ok_or(CoerceError::Int64),
            _ => Err(CoerceError::Int64),
        },
        Bson::Int32(_) => match raw {
            Value::String(s) => s
                .trim()
                .parse()
                .map(Bson::Int32)
                .map_err(|_| CoerceError::Int32),
            Value::Number(n) => json_number_to_i32(n).map(Bson::Int32).ok_or(CoerceError::Int32),
            _ => Err(CoerceError::Int32),
        },
        Bson::Double(_) => match raw {
            Value::Number(n) => n.as_f64().map(Bson::Double).ok_or(CoerceError::Number),
            Value::String(s) => {
                let parsed = s.trim().parse::<f64>().map_err(|_| CoerceError::Number)?;
                if parsed.is_nan() {
                    return Err(CoerceError::Number);
                }
                Ok(Bson::Double(parsed))
            }
            _ => Err(CoerceError::Number),
        },
        Bson::Binary(b) if b.subtype == BinarySubtype::Uuid => match raw {
            Value::String(s) => bson::Uuid::parse_str(s)
                .map(|u| Bson::Binary(Binary::from_uuid(u)))
                .map_err(|_| CoerceError::Uuid),
            _ => Err(CoerceError::Uuid),
        },
        Bson::Binary(b) => match raw {
            Value::String(s) => STANDARD
                .decode(s)
                .map(|bytes| {
                    Bson::Binary(Binary {
                        subtype: b.subtype,
                        bytes,
                    })
                })
                .map_err(|_| CoerceError::Binary),
            _ => Err(CoerceError::Binary),
        },
        Bson::Timestamp(_) => match raw {
            Value::Object(fields) => {
                let time = fields.get("t").and_then(integer_u32);
                let increment = fields.get("i").and_then(integer_u32);
                match (time, increment) {
                    (Some(time), Some(increment)) => {
                        Ok(Bson::Timestamp(Timestamp { time, increment }))
                    }
                    _ => Err(CoerceError::Timestamp),
                }
            }
            _ => Err(CoerceError::Timestamp),
        },
        // The pattern is replaced; the stored flags stay as they are.
        Bson::RegularExpression(re) => match raw {
            Value::String(s) => Ok(Bson::RegularExpression(bson::Regex {
                pattern: s.clone(),
                options: re.options.clone(),
            })),
            _ => Err(CoerceError::Regex),
        },
        Bson::JavaScriptCode(_) => match raw {
            Value::String(s) => Ok(Bson::JavaScriptCode(s.clone())),
            _ => Err(CoerceError::Code),
        },
        // The scope document survives a source edit.
        Bson::JavaScriptCodeWithScope(code) => match raw {
            Value::String(s) => Ok(Bson::JavaScriptCodeWithScope(JavaScriptCodeWithScope {
                code: s.clone(),
                scope: code.scope.clone(),
            })),
            _ => Err(CoerceError::Code),
        },
        Bson::Document(current) if is_dbref(current) => match raw {
            Value::Object(fields) => {
                let collection = fields
                    .get("$ref")
                    .and_then(Value::as_str)
                    .filter(|s| !s.is_empty());
                let id = fields.get("$id");
                match (collection, id) {
                    (Some(collection), Some(id)) => {
                        let mut dbref = Document::new();
                        dbref.insert("$ref", collection);
                        dbref.insert("$id", coerce(current.get("$id"), id)?);
                        if let Some(db) = fields.get("$db").and_then(Value::as_str) {
                            dbref.insert("$db", db);
                        }
                        Ok(Bson::Document(dbref))
                    }
                    _ => Err(CoerceError::DbRef),
                }
            }
            _ => Err(CoerceError::DbRef),
        },
        Bson::Document(_) | Bson::Array(_) | Bson::DbPointer(_) => convert_json(raw),
        Bson::MinKey => Ok(Bson::MinKey),
        Bson::MaxKey => Ok(Bson::MaxKey),
        Bson::String(_) => string_like(raw).map(Bson::String),
        Bson::Symbol(_) => string_like(raw).map(Bson::Symbol),
        Bson::Boolean(_) => match raw {
            Value::Bool(b) => Ok(Bson::Boolean(*b)),
            Value::String(s) if s == "true" => Ok(Bson::Boolean(true)),
            Value::String(s) if s == "false" => Ok(Bson::Boolean(false)),
            _ => Err(CoerceError::Boolean),
        },
    }
}

/// Validates every field of a patch against the current document before
/// anything is written. One bad field rejects the whole patch. The `_id`
/// field is immutable and silently dropped.
pub fn coerce_update(
    current: &Document,
    updates: &serde_json::Map<String, Value>,
) -> Result<Document, AppError> {
    let mut validated = Document::new();
    for (field, raw) in updates {
        if field == "_id" {
            continue;
        }
        let coerced = coerce(current.get(field), raw).map_err(|source| AppError::InvalidValue {
            field: field.clone(),
            source,
        })?;
        validated.insert(field, coerced);
    }
    Ok(validated)
}

fn convert_json(raw: &Value) -> Result<Bson, CoerceError> {
    Bson::try_from(raw.clone()).map_err(|_| CoerceError::Json)
}

fn string_like(raw: &Value) -> Result<String, CoerceError> {
    match raw {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => Err(CoerceError::String),
    }
}

fn json_number_to_i32(n: &serde_json::Number) -> Option<i32> {
    if let Some(i) = n.as_i64() {
        return i32::try_from(i).ok();
    }
    n.as_f64().and_then(|f| {
        let truncated = f.trunc();
        (truncated >= f64::from(i32::MIN) && truncated <= f64::from(i32::MAX))
            .then_some(truncated as i32)
    })
}

fn integer_u32(v: &Value) -> Option<u32> {
    v.as_u64().and_then(|n| u32::try_from(n).ok())
}

fn is_dbref(doc: &Document) -> bool {
    doc.contains_key("$ref") && doc.contains_key("$id")
}

fn parse_date_value(raw: &Value) -> Option<Bson> {
    match raw {
        Value::String(s) => parse_date_str(s).map(Bson::DateTime),
        // Bare numbers are epoch milliseconds.
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .map(|ms| Bson::DateTime(bson::DateTime::from_millis(ms))),
        _ => None,
    }
}

/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS[.fff]`, or a bare
/// `YYYY-MM-DD`. Naive inputs are taken as UTC.
pub(crate) fn parse_date_str(s: &str) -> Option<bson::DateTime> {
    let s = s.trim();
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Some(bson::DateTime::from_chrono(dt.with_timezone(&Utc)));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(bson::DateTime::from_chrono(dt.and_utc()));
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return d
            .and_hms_opt(0, 0, 0)
            .map(|dt| bson::DateTime::from_chrono(dt.and_utc()));
    }
    None
}
