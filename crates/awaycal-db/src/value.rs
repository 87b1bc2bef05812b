//! Conversion of driver values into domain values

use awaycal_core::FieldValue;
use chrono::NaiveDate;
use mysql::prelude::FromValue;
use mysql::{from_value_opt, Row, Value};

use crate::error::{DbError, DbResult};

/// Convert a driver value into a [`FieldValue`].
///
/// Text-protocol results carry timestamps as bytes and become `Text`;
/// binary-protocol results carry them as `Date` and become `Timestamp`.
/// Zero dates (`0000-00-00`) cannot be represented and are passed on as
/// text so that normalization rejects them.
pub fn field_value(value: Value) -> FieldValue {
    match value {
        Value::NULL => FieldValue::Null,
        Value::Int(v) => FieldValue::Int(v),
        Value::UInt(v) => i64::try_from(v).map_or_else(|_| FieldValue::Text(v.to_string()), FieldValue::Int),
        Value::Bytes(bytes) => FieldValue::Text(String::from_utf8_lossy(&bytes).into_owned()),
        Value::Float(v) => FieldValue::Text(v.to_string()),
        Value::Double(v) => FieldValue::Text(v.to_string()),
        Value::Date(year, month, day, hour, minute, second, micros) => {
            NaiveDate::from_ymd_opt(i32::from(year), u32::from(month), u32::from(day))
                .and_then(|d| {
                    d.and_hms_micro_opt(u32::from(hour), u32::from(minute), u32::from(second), micros)
                })
                .map_or_else(
                    || {
                        FieldValue::Text(format!(
                            "{year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02}"
                        ))
                    },
                    FieldValue::Timestamp,
                )
        }
        Value::Time(negative, days, hours, minutes, seconds, _) => FieldValue::Text(format!(
            "{}{} {hours:02}:{minutes:02}:{seconds:02}",
            if negative { "-" } else { "" },
            days
        )),
    }
}

/// Interpret a textual column that may hold binary data (`longblob`)
pub fn lossy_text(value: Value) -> String {
    match field_value(value) {
        FieldValue::Null => String::new(),
        other => other.to_string(),
    }
}

/// Take a column out of a row
pub(crate) fn take(row: &mut Row, query: &'static str, column: &'static str) -> DbResult<Value> {
    row.take::<Value, _>(column)
        .ok_or_else(|| DbError::missing_column(query, column))
}

/// Take and convert a column out of a row
pub(crate) fn take_as<T: FromValue>(
    row: &mut Row,
    query: &'static str,
    column: &'static str,
) -> DbResult<T> {
    let value = take(row, query, column)?;
    from_value_opt(value).map_err(|source| DbError::Decode { column, source })
}
