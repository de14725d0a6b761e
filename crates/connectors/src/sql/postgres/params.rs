use crate::error::DbError;
use bytes::BytesMut;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use model::core::value::Value;
use rust_decimal::{Decimal, prelude::FromPrimitive};
use std::error::Error;
use tokio_postgres::types::{IsNull, ToSql, Type, to_sql_checked};
use uuid::Uuid;

/// Untyped SQL NULL, accepted for any parameter type.
#[derive(Debug)]
struct SqlNull;

impl ToSql for SqlNull {
    fn to_sql(&self, _ty: &Type, _out: &mut BytesMut) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        Ok(IsNull::Yes)
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }

    to_sql_checked!();
}

pub struct PgParam(Box<dyn ToSql + Sync + Send>);

impl PgParam {
    /// Converts `value` into the Rust type the driver expects for `ty`.
    ///
    /// The statement is prepared first, so `ty` is the type the server
    /// inferred for the placeholder (e.g. `int4` for `"id" < $1` on an
    /// INTEGER column).
    pub fn coerce(value: Value, ty: &Type) -> Result<Self, DbError> {
        if value.is_null() {
            return Ok(PgParam(Box::new(SqlNull)));
        }

        let param: Option<Box<dyn ToSql + Sync + Send>> = match ty.name() {
            "int2" => value
                .as_i64()
                .and_then(|v| i16::try_from(v).ok())
                .map(|v| Box::new(v) as _),
            "int4" => value
                .as_i64()
                .and_then(|v| i32::try_from(v).ok())
                .map(|v| Box::new(v) as _),
            "int8" => value.as_i64().map(|v| Box::new(v) as _),
            "float4" => value.as_f64().map(|v| Box::new(v as f32) as _),
            "float8" => value.as_f64().map(|v| Box::new(v) as _),
            "numeric" => to_decimal(&value).map(|v| Box::new(v) as _),
            "bool" => match &value {
                Value::Boolean(v) => Some(Box::new(*v) as _),
                _ => None,
            },
            "uuid" => match &value {
                Value::Uuid(v) => Some(Box::new(*v) as _),
                Value::String(s) => Uuid::parse_str(s).ok().map(|v| Box::new(v) as _),
                _ => None,
            },
            "timestamptz" => to_timestamp(&value).map(|v| Box::new(v) as _),
            "timestamp" => to_timestamp(&value).map(|v| Box::new(v.naive_utc()) as _),
            "date" => match &value {
                Value::Date(d) => Some(Box::new(*d) as _),
                other => to_timestamp(other).map(|v| Box::new(v.date_naive()) as _),
            },
            _ => value.as_string().map(|v| Box::new(v) as _),
        };

        param.map(PgParam).ok_or_else(|| DbError::ParamType {
            value: value.to_string(),
            expected: ty.name().to_string(),
        })
    }
}

fn to_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Int(v) => Some(Decimal::from(*v)),
        Value::Uint(v) => Some(Decimal::from(*v)),
        Value::Float(v) => Decimal::from_f64(*v),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn to_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Timestamp(ts) => Some(*ts),
        Value::Date(_) | Value::Int(_) => value
            .as_epoch_millis()
            .or_else(|| value.as_i64())
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .map(|ts| ts.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
                    .ok()
                    .map(|naive| naive.and_utc())
            }),
        _ => None,
    }
}

impl AsRef<dyn ToSql + Sync> for PgParam {
    fn as_ref(&self) -> &(dyn ToSql + Sync + 'static) {
        &*self.0
    }
}

pub struct PgParamStore {
    pub params: Vec<PgParam>,
}

impl PgParamStore {
    /// Pairs each value with the statement's parameter type at the same
    /// position.
    pub fn coerce(values: Vec<Value>, types: &[Type]) -> Result<Self, DbError> {
        if values.len() != types.len() {
            return Err(DbError::QueryBuildError(format!(
                "statement expects {} parameters, got {}",
                types.len(),
                values.len()
            )));
        }

        let params = values
            .into_iter()
            .zip(types)
            .map(|(value, ty)| PgParam::coerce(value, ty))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { params })
    }

    pub fn as_refs(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params
            .iter()
            .map(|param| param.as_ref())
            .collect::<Vec<_>>()
    }
}
