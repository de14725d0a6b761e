use crate::{
    pagination::{
        codec::type_codec::TypeCodec,
        cursor::{Cursor, CursorValues},
        error::PaginationError,
        request::PaginationKeys,
    },
    records::row::RowData,
};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};

const PAIR_DELIMITER: &str = ",";
const KEY_DELIMITER: char = ':';

/// Turns the ordering-key values of a row into an opaque token and back.
///
/// Token layout: base64 of the UTF-8 text `col1:val1,col2:val2,...` in
/// ordering-key order. Null columns are left out entirely.
#[derive(Debug, Clone, Copy, Default)]
pub struct CursorCodec {
    type_codec: TypeCodec,
}

impl CursorCodec {
    pub fn new(type_codec: TypeCodec) -> Self {
        Self { type_codec }
    }

    pub fn type_codec(&self) -> &TypeCodec {
        &self.type_codec
    }

    /// Fails with `UnsupportedType` on the first key column whose tag the
    /// codec cannot carry.
    pub fn validate_keys(&self, keys: &PaginationKeys) -> Result<(), PaginationError> {
        keys.iter()
            .try_for_each(|key| self.type_codec.check_supported(&key.name, key.tag))
    }

    pub fn encode(&self, keys: &PaginationKeys, row: &RowData) -> Result<Cursor, PaginationError> {
        let mut segments = Vec::with_capacity(keys.columns().len());
        for key in keys {
            let value = row.get_value(&key.name);
            if let Some(encoded) = self.type_codec.encode(&key.name, key.tag, &value)? {
                segments.push(format!("{}{KEY_DELIMITER}{encoded}", key.name));
            }
        }

        let payload = segments.join(PAIR_DELIMITER);
        Ok(Cursor::new(BASE64.encode(payload.as_bytes())))
    }

    pub fn decode(
        &self,
        keys: &PaginationKeys,
        cursor: &Cursor,
    ) -> Result<CursorValues, PaginationError> {
        let bytes = BASE64
            .decode(cursor.as_str())
            .map_err(|e| PaginationError::InvalidCursor(format!("not valid base64: {e}")))?;
        let payload = String::from_utf8(bytes)
            .map_err(|e| PaginationError::InvalidCursor(format!("not valid UTF-8: {e}")))?;

        let mut values = CursorValues::new();
        if payload.is_empty() {
            return Ok(values);
        }

        // Segments must follow key order, each column at most once.
        let mut next_position = 0;
        for segment in payload.split(PAIR_DELIMITER) {
            let (column, raw) = segment.split_once(KEY_DELIMITER).ok_or_else(|| {
                PaginationError::InvalidCursor(format!("segment {segment:?} has no key delimiter"))
            })?;

            let (position, key) = keys
                .iter()
                .enumerate()
                .find(|(_, key)| key.name == column)
                .ok_or_else(|| {
                    PaginationError::InvalidCursor(format!(
                        "column `{column}` is not part of the pagination keys"
                    ))
                })?;
            if position < next_position {
                return Err(PaginationError::InvalidCursor(format!(
                    "column `{column}` is repeated or out of key order"
                )));
            }
            next_position = position + 1;

            let value = self.type_codec.decode(column, key.tag, raw)?;
            values.push(column, value);
        }

        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::{type_tag::TypeTag, value::Value},
        pagination::request::KeyColumn,
    };
    use chrono::{TimeZone, Utc};

    fn keys(spec: &str) -> PaginationKeys {
        PaginationKeys::parse(spec).unwrap()
    }

    fn token(payload: &str) -> Cursor {
        Cursor::new(BASE64.encode(payload))
    }

    #[test]
    fn test_encode_layout_is_bit_exact() {
        let row = RowData::from_pairs(
            "users",
            [
                ("id", Value::Int(10)),
                ("name", Value::from("user 9")),
                ("email", Value::from("ignored")),
            ],
        );
        let cursor = CursorCodec::default()
            .encode(&keys("id:number,name:string"), &row)
            .unwrap();
        assert_eq!(cursor, token("id:10,name:user%209"));
    }

    #[test]
    fn test_null_columns_are_omitted() {
        let row = RowData::from_pairs("users", [("id", Value::Int(3)), ("name", Value::Null)]);
        let cursor = CursorCodec::default()
            .encode(&keys("name:string,id:number"), &row)
            .unwrap();
        assert_eq!(cursor, token("id:3"));
    }

    #[test]
    fn test_round_trip_mixed_types() {
        let keys = keys("created_at:date,name:string,id:number");
        let created = Utc.timestamp_millis_opt(1_650_000_000_250).unwrap();
        let row = RowData::from_pairs(
            "users",
            [
                ("created_at", Value::Timestamp(created)),
                ("name", Value::from("Zoë, the 2nd")),
                ("id", Value::Int(42)),
            ],
        );

        let codec = CursorCodec::default();
        let decoded = codec.decode(&keys, &codec.encode(&keys, &row).unwrap()).unwrap();

        let expected: CursorValues = [
            ("created_at", Value::Timestamp(created)),
            ("name", Value::from("Zoë, the 2nd")),
            ("id", Value::Int(42)),
        ]
        .into_iter()
        .collect();
        assert_eq!(decoded, expected);
    }

    #[test]
    fn test_encode_is_deterministic() {
        let keys = keys("name:string,id:number");
        let row = RowData::from_pairs("users", [("id", Value::Int(1)), ("name", Value::from("a"))]);
        let codec = CursorCodec::default();
        let first = codec.encode(&keys, &row).unwrap();
        for _ in 0..5 {
            assert_eq!(codec.encode(&keys, &row).unwrap(), first);
        }
    }

    #[test]
    fn test_non_numeric_segment_is_invalid() {
        let err = CursorCodec::default()
            .decode(&keys("id:number"), &token("id:ten"))
            .unwrap_err();
        assert!(matches!(err, PaginationError::InvalidCursor(_)));
    }

    #[test]
    fn test_malformed_tokens() {
        let codec = CursorCodec::default();
        let keys = keys("id:number");

        for bad in [Cursor::from("not base64!"), token("id10"), token("other:1")] {
            let err = codec.decode(&keys, &bad).unwrap_err();
            assert!(matches!(err, PaginationError::InvalidCursor(_)), "{bad}: {err}");
        }
    }

    #[test]
    fn test_repeated_or_reordered_columns_are_invalid() {
        let codec = CursorCodec::default();
        let keys = keys("name:string,id:number");

        for bad in [token("id:1,id:2"), token("id:1,name:a"), token("name:a,name:b,id:1")] {
            let err = codec.decode(&keys, &bad).unwrap_err();
            assert!(matches!(err, PaginationError::InvalidCursor(_)), "{bad}: {err}");
        }
        assert!(codec.decode(&keys, &token("id:1")).is_ok());
    }

    #[test]
    fn test_null_marker_decodes_to_null() {
        let values = CursorCodec::default()
            .decode(&keys("name:string,id:number"), &token("name:null,id:4"))
            .unwrap();
        assert_eq!(values.get("name"), None);
        assert_eq!(values.get("id"), Some(&Value::Int(4)));
    }

    #[test]
    fn test_empty_payload_has_no_values() {
        let values = CursorCodec::default()
            .decode(&keys("id:number"), &token(""))
            .unwrap();
        assert!(!values.has_values());
    }

    #[test]
    fn test_validate_keys_rejects_boolean() {
        let keys = PaginationKeys::new(vec![
            KeyColumn::new("active", TypeTag::Boolean),
            KeyColumn::new("id", TypeTag::Number),
        ])
        .unwrap();
        assert!(matches!(
            CursorCodec::default().validate_keys(&keys),
            Err(PaginationError::UnsupportedType { .. })
        ));
    }
}
