use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use model::{
    core::value::{FieldValue, Value},
    records::row::RowData,
};
use rust_decimal::{Decimal, prelude::ToPrimitive};
use tokio_postgres::{Row as PgRow, types::FromSql};
use tracing::warn;
use uuid::Uuid;

/// Reads every column of a Postgres row into a `RowData`.
pub fn to_row_data(row: &PgRow, entity: &str) -> RowData {
    let fields = row
        .columns()
        .iter()
        .enumerate()
        .map(|(idx, column)| {
            let value = read_value(row, idx, column.type_().name());
            FieldValue::new(column.name(), value)
        })
        .collect();

    RowData::new(entity, fields)
}

fn read_value(row: &PgRow, idx: usize, type_name: &str) -> Value {
    match type_name {
        "int2" => get::<i16>(row, idx).map(|v| Value::Int(v.into())),
        "int4" => get::<i32>(row, idx).map(|v| Value::Int(v.into())),
        "int8" => get::<i64>(row, idx).map(Value::Int),
        "oid" => get::<u32>(row, idx).map(|v| Value::Uint(v.into())),
        "float4" => get::<f32>(row, idx).map(|v| Value::Float(v.into())),
        "float8" => get::<f64>(row, idx).map(Value::Float),
        "numeric" => get::<Decimal>(row, idx).map(decimal_value),
        "bool" => get::<bool>(row, idx).map(Value::Boolean),
        "uuid" => get::<Uuid>(row, idx).map(Value::Uuid),
        "date" => get::<NaiveDate>(row, idx).map(Value::Date),
        "timestamptz" => get::<DateTime<Utc>>(row, idx).map(Value::Timestamp),
        "timestamp" => get::<NaiveDateTime>(row, idx).map(|v| Value::Timestamp(v.and_utc())),
        "text" | "varchar" | "bpchar" | "name" | "citext" => {
            get::<String>(row, idx).map(Value::String)
        }
        other => {
            let value = get::<String>(row, idx).map(Value::String);
            if value.is_none() {
                warn!("Unsupported column type {other}, reading as NULL");
            }
            value
        }
    }
    .unwrap_or(Value::Null)
}

/// `None` for SQL NULL and for values the driver cannot decode as `T`.
fn get<'a, T: FromSql<'a>>(row: &'a PgRow, idx: usize) -> Option<T> {
    row.try_get::<_, Option<T>>(idx).ok().flatten()
}

/// Integral numerics stay exact; anything with a fractional part becomes a
/// float.
fn decimal_value(d: Decimal) -> Value {
    if d.fract().is_zero() {
        if let Some(v) = d.to_i64() {
            return Value::Int(v);
        }
    }
    d.to_f64().map(Value::Float).unwrap_or(Value::Null)
}
