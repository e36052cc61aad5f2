use super::error::{Result, TableError};
use super::model::{Table, Value};

/// Arithmetic mean of a numeric column.
///
/// `Null` cells are skipped. A column with no values at all (zero rows, or
/// only nulls) fails with `TableError::EmptyInput` rather than producing NaN.
pub fn mean(table: &Table, column: &str) -> Result<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;

    for (row, value) in table.column(column)?.enumerate() {
        match value {
            Value::Null => continue,
            other => {
                let v = other.as_f64().ok_or_else(|| TableError::NotNumeric {
                    column: column.to_string(),
                    row,
                    value: other.to_string(),
                })?;
                sum += v;
                count += 1;
            }
        }
    }

    if count == 0 {
        return Err(TableError::EmptyInput(column.to_string()));
    }
    Ok(sum / count as f64)
}

/// Dollar amount with two decimals, e.g. `$54600.00`.
pub fn format_currency(amount: f64) -> String {
    format!("${amount:.2}")
}
