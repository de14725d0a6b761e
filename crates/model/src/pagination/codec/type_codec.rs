//! Per-column scalar encoding used inside cursor tokens.
//!
//! | tag       | encoded form                          | decoded value        |
//! |-----------|---------------------------------------|----------------------|
//! | `number`  | decimal integer                       | `Value::Int`/`Uint`  |
//! | `string`  | percent-encoded (URI component rules) | `Value::String`      |
//! | `date`    | epoch milliseconds                    | `Value::Timestamp`   |
//! | `unknown` | best effort, only with [`LooseTyping`] | timestamp, int or string |
//!
//! Null values have no encoded form: the column is left out of the token.

use crate::{
    core::{type_tag::TypeTag, value::Value},
    pagination::error::PaginationError,
};
use chrono::{DateTime, Utc};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

/// Segment value that always decodes to null.
pub const NULL_MARKER: &str = "null";

/// Everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )` is escaped, which keeps
/// the `,` and `:` token delimiters out of encoded strings.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// 2000-01-01T00:00:00Z
const DEFAULT_PLAUSIBLE_MIN_MS: i64 = 946_684_800_000;
/// 2100-01-01T00:00:00Z
const DEFAULT_PLAUSIBLE_MAX_MS: i64 = 4_102_444_800_000;

/// Opt-in heuristics for columns tagged `unknown`.
///
/// An integer inside the half-open `[min_epoch_millis, max_epoch_millis)`
/// window is read back as a timestamp, anything else as a plain integer. This
/// is a guess: an id that happens to fall inside the window decodes as a date.
/// Strings that look like integers are emitted with an escaped first byte so
/// they come back as strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LooseTyping {
    pub min_epoch_millis: i64,
    pub max_epoch_millis: i64,
}

impl LooseTyping {
    pub fn new(min_epoch_millis: i64, max_epoch_millis: i64) -> Self {
        Self {
            min_epoch_millis,
            max_epoch_millis,
        }
    }

    pub fn is_plausible_timestamp(&self, millis: i64) -> bool {
        (self.min_epoch_millis..self.max_epoch_millis).contains(&millis)
    }
}

impl Default for LooseTyping {
    fn default() -> Self {
        Self::new(DEFAULT_PLAUSIBLE_MIN_MS, DEFAULT_PLAUSIBLE_MAX_MS)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypeCodec {
    loose: Option<LooseTyping>,
}

impl TypeCodec {
    /// Strict codec: `unknown` columns are rejected.
    pub fn new() -> Self {
        Self { loose: None }
    }

    pub fn with_loose_typing(loose: LooseTyping) -> Self {
        Self { loose: Some(loose) }
    }

    pub fn loose_typing(&self) -> Option<&LooseTyping> {
        self.loose.as_ref()
    }

    /// Fails with `UnsupportedType` for tags this codec cannot carry.
    pub fn check_supported(&self, column: &str, tag: TypeTag) -> Result<(), PaginationError> {
        match tag {
            TypeTag::String | TypeTag::Number | TypeTag::Date => Ok(()),
            TypeTag::Unknown if self.loose.is_some() => Ok(()),
            TypeTag::Unknown | TypeTag::Boolean => Err(PaginationError::UnsupportedType {
                column: column.to_string(),
                tag,
            }),
        }
    }

    /// Encodes one column value. `Ok(None)` means the value is null and the
    /// column must be omitted from the token.
    pub fn encode(
        &self,
        column: &str,
        tag: TypeTag,
        value: &Value,
    ) -> Result<Option<String>, PaginationError> {
        self.check_supported(column, tag)?;

        if value.is_null() {
            return Ok(None);
        }

        let encoded = match tag {
            TypeTag::Number => encode_number(value),
            TypeTag::String => encode_string(value),
            TypeTag::Date => value.as_epoch_millis().map(|ms| ms.to_string()),
            TypeTag::Unknown => self.encode_loose(value),
            TypeTag::Boolean => None,
        };

        encoded
            .map(Some)
            .ok_or_else(|| PaginationError::ValueMismatch {
                column: column.to_string(),
                tag,
                value: value.to_string(),
            })
    }

    /// Decodes one segment value under the column's tag.
    pub fn decode(&self, column: &str, tag: TypeTag, raw: &str) -> Result<Value, PaginationError> {
        self.check_supported(column, tag)?;

        if raw == NULL_MARKER {
            return Ok(Value::Null);
        }

        match tag {
            TypeTag::Number => decode_number(raw).ok_or_else(|| {
                PaginationError::InvalidCursor(format!(
                    "number column `{column}` should be a valid integer, got {raw:?}"
                ))
            }),
            TypeTag::String => decode_string(column, raw),
            TypeTag::Date => raw
                .parse::<i64>()
                .ok()
                .and_then(DateTime::<Utc>::from_timestamp_millis)
                .map(Value::Timestamp)
                .ok_or_else(|| {
                    PaginationError::InvalidCursor(format!(
                        "date column `{column}` should be a valid timestamp, got {raw:?}"
                    ))
                }),
            TypeTag::Unknown => self.decode_loose(column, raw),
            TypeTag::Boolean => Err(PaginationError::UnsupportedType {
                column: column.to_string(),
                tag,
            }),
        }
    }

    fn encode_loose(&self, value: &Value) -> Option<String> {
        let loose = self.loose?;
        match value {
            Value::Timestamp(_) | Value::Date(_) => value.as_epoch_millis().map(|ms| ms.to_string()),
            Value::Int(_) | Value::Uint(_) | Value::Float(_) => encode_number(value),
            Value::String(s) => {
                if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
                    let millis = ts.timestamp_millis();
                    if loose.is_plausible_timestamp(millis) {
                        return Some(millis.to_string());
                    }
                }
                if s.parse::<i64>().is_ok() {
                    return Some(escape_leading_byte(s));
                }
                Some(percent_encode_component(s))
            }
            Value::Uuid(u) => Some(u.to_string()),
            Value::Boolean(_) | Value::Null => None,
        }
    }

    fn decode_loose(&self, column: &str, raw: &str) -> Result<Value, PaginationError> {
        let Some(loose) = self.loose else {
            return Err(PaginationError::UnsupportedType {
                column: column.to_string(),
                tag: TypeTag::Unknown,
            });
        };
        match raw.parse::<i64>() {
            Ok(n) if loose.is_plausible_timestamp(n) => Ok(DateTime::<Utc>::from_timestamp_millis(n)
                .map(Value::Timestamp)
                .unwrap_or(Value::Int(n))),
            Ok(n) => Ok(Value::Int(n)),
            Err(_) => decode_string(column, raw),
        }
    }
}

fn encode_number(value: &Value) -> Option<String> {
    match value {
        Value::Int(v) => Some(v.to_string()),
        Value::Uint(v) => Some(v.to_string()),
        // Fractional keys lose precision; only the integer part survives.
        Value::Float(v) if v.is_finite() => Some((v.trunc() as i64).to_string()),
        Value::String(s) => {
            let s = s.trim();
            if s.parse::<i64>().is_ok() || s.parse::<u64>().is_ok() {
                Some(s.to_string())
            } else {
                None
            }
        }
        _ => None,
    }
}

fn decode_number(raw: &str) -> Option<Value> {
    if let Ok(v) = raw.parse::<i64>() {
        return Some(Value::Int(v));
    }
    raw.parse::<u64>().ok().map(Value::Uint)
}

fn encode_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(percent_encode_component(s)),
        Value::Uuid(u) => Some(u.to_string()),
        _ => None,
    }
}

/// Percent-encodes `s`; the literal text `null` gets its first byte escaped
/// so it cannot be mistaken for [`NULL_MARKER`].
fn percent_encode_component(s: &str) -> String {
    if s == NULL_MARKER {
        return "%6Eull".to_string();
    }
    utf8_percent_encode(s, COMPONENT).to_string()
}

/// Escapes the first byte of an ASCII integer-like string so loose decoding
/// reads it back as a string instead of a number.
fn escape_leading_byte(s: &str) -> String {
    match s.as_bytes().first() {
        Some(first) if first.is_ascii() => {
            format!("%{first:02X}{}", utf8_percent_encode(&s[1..], COMPONENT))
        }
        _ => percent_encode_component(s),
    }
}

fn decode_string(column: &str, raw: &str) -> Result<Value, PaginationError> {
    percent_decode_str(raw)
        .decode_utf8()
        .map(|s| Value::String(s.into_owned()))
        .map_err(|e| {
            PaginationError::InvalidCursor(format!(
                "string column `{column}` is not valid percent-encoded UTF-8: {e}"
            ))
        })
}
