use crate::error::CliError;
use model::{
    core::value::Value,
    pagination::{cursor::CursorValues, result::PageResult},
    records::row::RowData,
};
use serde_json::{Map, Value as JsonValue, json};
use std::path::Path;

pub fn value_json(value: &Value) -> JsonValue {
    match value {
        Value::Int(v) => json!(v),
        Value::Uint(v) => json!(v),
        Value::Float(v) => json!(v),
        Value::String(v) => json!(v),
        Value::Boolean(v) => json!(v),
        Value::Uuid(v) => json!(v.to_string()),
        Value::Date(v) => json!(v.to_string()),
        Value::Timestamp(v) => json!(v.to_rfc3339()),
        Value::Null => JsonValue::Null,
    }
}

fn row_json(row: &RowData) -> JsonValue {
    let fields = row
        .field_values
        .iter()
        .map(|field| {
            let value = field.value.as_ref().map(value_json).unwrap_or(JsonValue::Null);
            (field.name.clone(), value)
        })
        .collect::<Map<_, _>>();
    JsonValue::Object(fields)
}

pub fn page_json(page: &PageResult) -> JsonValue {
    let mut out = json!({
        "items": page.items.iter().map(row_json).collect::<Vec<_>>(),
        "after_cursor": page.after_cursor,
        "before_cursor": page.before_cursor,
    });
    if let (Some(count), Some(obj)) = (page.count, out.as_object_mut()) {
        obj.insert("count".to_string(), json!(count));
    }
    out
}

pub fn cursor_values_json(values: &CursorValues) -> JsonValue {
    let fields = values
        .iter()
        .map(|(name, value)| (name.to_string(), value_json(value)))
        .collect::<Map<_, _>>();
    JsonValue::Object(fields)
}

pub async fn emit(json: &JsonValue, path: Option<&Path>) -> Result<(), CliError> {
    let text = serde_json::to_string_pretty(json).map_err(CliError::JsonSerialize)?;
    match path {
        Some(path) => tokio::fs::write(path, text).await?,
        None => println!("{text}"),
    }
    Ok(())
}
