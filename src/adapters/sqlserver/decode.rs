//! Positional decoding of SQL Server rows into sales records
//!
//! Each column is read into an `Option`, so SQL NULL becomes `None`. Columns
//! whose driver type differs from the record field are accepted when the
//! conversion is lossless for the target column:
//!
//! - text fields also take integer columns, rendered as decimal strings
//! - the date field also takes `DATETIME`/`DATETIME2`/`SMALLDATETIME`,
//!   truncated to the calendar date
//! - numeric fields also take `FLOAT`/`REAL`/`MONEY`

use crate::adapters::database::traits::SourceRow;
use crate::domain::{ColumnDecodeError, SalesRecord, SOURCE_COLUMNS};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use tiberius::Row;

type Field<T> = Result<Option<T>, ColumnDecodeError>;

/// Decodes a row selected in `SOURCE_COLUMNS` order
///
/// # Errors
///
/// Returns the first column that could not be decoded.
pub fn decode_row(row: &Row) -> SourceRow {
    Ok(SalesRecord {
        fsno: text(row, 0)?,
        sale_type: text(row, 1)?,
        attachment_no: text(row, 2)?,
        customer: text(row, 3)?,
        region: text(row, 4)?,
        date: date(row, 5)?,
        code: text(row, 6)?,
        name: text(row, 7)?,
        measurement_unit: text(row, 8)?,
        unit_price: decimal(row, 9)?,
        sold_quantity: decimal(row, 10)?,
        net_pay: decimal(row, 11)?,
    })
}

fn text(row: &Row, idx: usize) -> Field<String> {
    let primary = match row.try_get::<&str, _>(idx) {
        Ok(value) => return Ok(value.map(str::to_owned)),
        Err(e) => e,
    };

    if let Ok(value) = row.try_get::<i64, _>(idx) {
        return Ok(value.map(|v| v.to_string()));
    }
    if let Ok(value) = row.try_get::<i32, _>(idx) {
        return Ok(value.map(|v| v.to_string()));
    }
    if let Ok(value) = row.try_get::<i16, _>(idx) {
        return Ok(value.map(|v| v.to_string()));
    }
    if let Ok(value) = row.try_get::<u8, _>(idx) {
        return Ok(value.map(|v| v.to_string()));
    }

    Err(ColumnDecodeError::new(SOURCE_COLUMNS[idx], primary.to_string()))
}

fn date(row: &Row, idx: usize) -> Field<NaiveDate> {
    let primary = match row.try_get::<NaiveDate, _>(idx) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };

    if let Ok(value) = row.try_get::<NaiveDateTime, _>(idx) {
        return Ok(value.map(|dt| dt.date()));
    }

    Err(ColumnDecodeError::new(SOURCE_COLUMNS[idx], primary.to_string()))
}

fn decimal(row: &Row, idx: usize) -> Field<Decimal> {
    let column = SOURCE_COLUMNS[idx];
    let primary = match row.try_get::<Decimal, _>(idx) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };

    if let Ok(value) = row.try_get::<f64, _>(idx) {
        return value.map(|v| decimal_from_float(column, v)).transpose();
    }
    if let Ok(value) = row.try_get::<f32, _>(idx) {
        return value
            .map(|v| decimal_from_float(column, f64::from(v)))
            .transpose();
    }

    Err(ColumnDecodeError::new(column, primary.to_string()))
}

/// Converts a floating point column value to a decimal
///
/// # Errors
///
/// Returns an error for NaN and infinities, which NUMERIC cannot hold.
pub(crate) fn decimal_from_float(column: &'static str, value: f64) -> Result<Decimal, ColumnDecodeError> {
    if !value.is_finite() {
        return Err(ColumnDecodeError::new(
            column,
            format!("non-finite value {value} cannot be stored as NUMERIC"),
        ));
    }

    Decimal::from_f64(value).ok_or_else(|| {
        ColumnDecodeError::new(column, format!("value {value} is out of NUMERIC range"))
    })
}
