use sqlx::postgres::PgRow;
use sqlx::{Column, Row as _, TypeInfo, ValueRef};

use dbtask_core::{Error, Result, Row, Value};

/// How a column is turned into a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoder {
    Bool,
    Int2,
    Int4,
    Int8,
    Float4,
    Float8,
    Text,
}

impl Decoder {
    /// Pick a decoder from the driver's type name. Unknown types fall back to
    /// their text representation.
    pub fn for_type(name: &str) -> Self {
        match name {
            "BOOL" => Self::Bool,
            "INT2" => Self::Int2,
            "INT4" => Self::Int4,
            "INT8" => Self::Int8,
            "FLOAT4" => Self::Float4,
            "FLOAT8" => Self::Float8,
            _ => Self::Text,
        }
    }
}

pub fn decode_row(row: &PgRow) -> Result<Row> {
    row.columns()
        .iter()
        .map(|column| {
            decode_value(row, column.ordinal(), Decoder::for_type(column.type_info().name()))
        })
        .collect::<Result<Vec<_>>>()
        .map(Row::new)
}

fn decode_value(row: &PgRow, index: usize, decoder: Decoder) -> Result<Value> {
    if row.try_get_raw(index).map_err(decode_error)?.is_null() {
        return Ok(Value::Null);
    }

    let value = match decoder {
        Decoder::Bool => Value::Bool(row.try_get(index).map_err(decode_error)?),
        Decoder::Int2 => Value::Int(row.try_get::<i16, _>(index).map_err(decode_error)?.into()),
        Decoder::Int4 => Value::Int(row.try_get::<i32, _>(index).map_err(decode_error)?.into()),
        Decoder::Int8 => Value::Int(row.try_get(index).map_err(decode_error)?),
        Decoder::Float4 => {
            Value::Float(row.try_get::<f32, _>(index).map_err(decode_error)?.into())
        }
        Decoder::Float8 => Value::Float(row.try_get(index).map_err(decode_error)?),
        Decoder::Text => Value::Text(
            row.try_get_unchecked::<String, _>(index)
                .map_err(decode_error)?,
        ),
    };
    Ok(value)
}

fn decode_error(err: sqlx::Error) -> Error {
    Error::Query(format!("cannot decode column: {err}"))
}
