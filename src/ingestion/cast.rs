//! Column materialisation - builds Arrow arrays from cell values and casts
//! columns to a field's storage type

use arrow::array::*;
use arrow::compute::{cast, cast_with_options, CastOptions};
use arrow::datatypes::{DataType, Date32Type};
use std::sync::Arc;

use crate::error::{TableError, TableResult};
use crate::metadata::ResolvedField;
use crate::types::{Value, ValueKind};

/// Common kind of a list of values, nulls ignored
///
/// Integers and floats unify to float. Signed and unsigned unify to unsigned
/// while every signed value is non-negative, otherwise to signed. Any other
/// mix is an error naming the two kinds.
fn unify_kinds(values: &[Value]) -> Result<ValueKind, (ValueKind, ValueKind)> {
    let has_negative = values.iter().any(|v| matches!(v, Value::Int(i) if *i < 0));
    let mut unified = ValueKind::Null;
    for value in values {
        let kind = value.kind();
        unified = match (unified, kind) {
            (_, ValueKind::Null) => unified,
            (ValueKind::Null, k) => k,
            (a, b) if a == b => a,
            (ValueKind::Int, ValueKind::UInt) | (ValueKind::UInt, ValueKind::Int) => {
                if has_negative {
                    ValueKind::Int
                } else {
                    ValueKind::UInt
                }
            }
            (ValueKind::Float, ValueKind::Int | ValueKind::UInt)
            | (ValueKind::Int | ValueKind::UInt, ValueKind::Float) => ValueKind::Float,
            (a, b) => return Err((a, b)),
        };
    }
    Ok(unified)
}

fn as_i64(value: &Value) -> Result<Option<i64>, String> {
    match value {
        Value::Null => Ok(None),
        Value::Int(v) => Ok(Some(*v)),
        Value::UInt(v) => i64::try_from(*v)
            .map(Some)
            .map_err(|_| format!("{} does not fit a signed 64-bit integer", v)),
        other => Err(format!("{} value {}", other.kind(), other)),
    }
}

fn as_u64(value: &Value) -> Option<u64> {
    match value {
        Value::UInt(v) => Some(*v),
        Value::Int(v) => u64::try_from(*v).ok(),
        _ => None,
    }
}

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Int(v) => Some(*v as f64),
        Value::UInt(v) => Some(*v as f64),
        Value::Float(v) => Some(*v),
        _ => None,
    }
}

/// Build the natural Arrow array for a list of values
///
/// The array type follows the values (ints become Int64, dates Date32,
/// datetimes Date64 in milliseconds); an all-null or empty list becomes a
/// NullArray, which casts to any type.
pub fn array_from_values(values: &[Value]) -> Result<ArrayRef, String> {
    let kind = unify_kinds(values)
        .map_err(|(a, b)| format!("mixed {} and {} values", a, b))?;

    let array: ArrayRef = match kind {
        ValueKind::Null => Arc::new(NullArray::new(values.len())),
        ValueKind::Bool => Arc::new(
            values
                .iter()
                .map(|v| match v {
                    Value::Bool(b) => Some(*b),
                    _ => None,
                })
                .collect::<BooleanArray>(),
        ),
        ValueKind::Int => {
            let ints = values.iter().map(as_i64).collect::<Result<Vec<_>, _>>()?;
            Arc::new(Int64Array::from(ints))
        }
        ValueKind::UInt => Arc::new(values.iter().map(as_u64).collect::<UInt64Array>()),
        ValueKind::Float => Arc::new(values.iter().map(as_f64).collect::<Float64Array>()),
        ValueKind::Str => Arc::new(
            values
                .iter()
                .map(|v| match v {
                    Value::Str(s) => Some(s.as_str()),
                    _ => None,
                })
                .collect::<StringArray>(),
        ),
        ValueKind::Bytes => Arc::new(
            values
                .iter()
                .map(|v| match v {
                    Value::Bytes(b) => Some(b.as_slice()),
                    _ => None,
                })
                .collect::<BinaryArray>(),
        ),
        ValueKind::Date => Arc::new(
            values
                .iter()
                .map(|v| match v {
                    Value::Date(d) => Some(Date32Type::from_naive_date(*d)),
                    _ => None,
                })
                .collect::<Date32Array>(),
        ),
        ValueKind::DateTime => Arc::new(
            values
                .iter()
                .map(|v| match v {
                    Value::DateTime(dt) => Some(dt.and_utc().timestamp_millis()),
                    _ => None,
                })
                .collect::<Date64Array>(),
        ),
    };

    Ok(array)
}

/// Cast a column to the field's storage type
///
/// With `strict` set, values the cast cannot represent are errors instead of
/// being silently replaced by nulls, and floats headed for an integer type
/// must have no fractional part. An all-null column becomes a null column of
/// the target type.
pub fn cast_column(column: &ArrayRef, field: &ResolvedField, strict: bool) -> TableResult<ArrayRef> {
    let target = field.data_type();
    if column.data_type() == target {
        return Ok(column.clone());
    }
    if column.data_type() == &DataType::Null {
        return Ok(new_null_array(target, column.len()));
    }
    if strict && column.data_type().is_floating() && target.is_integer() {
        reject_fractions(column, field)?;
    }

    let options = CastOptions {
        safe: !strict,
        ..Default::default()
    };

    cast_with_options(column, target, &options).map_err(|e| {
        TableError::column(
            field.column_name(),
            field.type_label(),
            format!("{:?} ({})", column.data_type(), e),
        )
    })
}

/// Fail on the first float that an integer cast would truncate
fn reject_fractions(column: &ArrayRef, field: &ResolvedField) -> TableResult<()> {
    let floats = cast(column, &DataType::Float64)?;
    let floats = floats
        .as_any()
        .downcast_ref::<Float64Array>()
        .ok_or_else(|| TableError::engine("float cast did not produce Float64"))?;
    match floats.iter().flatten().find(|v| v.fract() != 0.0) {
        Some(value) => Err(TableError::column(
            field.column_name(),
            field.type_label(),
            format!("{:?} value {} with a fractional part", column.data_type(), value),
        )),
        None => Ok(()),
    }
}

/// Materialise a list of values into the field's storage type
pub fn values_to_column(values: &[Value], field: &ResolvedField, strict: bool) -> TableResult<ArrayRef> {
    let natural = array_from_values(values)
        .map_err(|given| TableError::column(field.column_name(), field.type_label(), given))?;
    cast_column(&natural, field, strict)
}

/// Nested Arrow types are not accepted as column input
pub fn is_nested(data_type: &DataType) -> bool {
    matches!(
        data_type,
        DataType::List(_)
            | DataType::LargeList(_)
            | DataType::FixedSizeList(_, _)
            | DataType::Struct(_)
            | DataType::Map(_, _)
            | DataType::Union(_, _)
    )
}
