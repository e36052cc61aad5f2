use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use arrow::util::pretty::pretty_format_batches;

use super::error::Result;
use super::model::{Table, Value};

/// Arrow type a column of cells is stored as.
///
/// Nulls never decide the type. Integers mixed with floats widen to Float64;
/// anything mixing text, or booleans with numbers, falls back to Utf8, as does
/// a column with no values at all.
pub fn infer_type<'a>(values: impl IntoIterator<Item = &'a Value>) -> DataType {
    let (mut ints, mut floats, mut bools, mut text) = (false, false, false, false);
    for value in values {
        match value {
            Value::Integer(_) => ints = true,
            Value::Float(_) => floats = true,
            Value::Bool(_) => bools = true,
            Value::String(_) => text = true,
            Value::Null => {}
        }
    }

    match (ints, floats, bools, text) {
        (_, _, _, true) => DataType::Utf8,
        (true, _, true, _) | (_, true, true, _) => DataType::Utf8,
        (false, false, true, false) => DataType::Boolean,
        (_, true, false, false) => DataType::Float64,
        (true, false, false, false) => DataType::Int64,
        (false, false, false, false) => DataType::Utf8,
    }
}

fn build_array<'a>(values: impl Iterator<Item = &'a Value>, data_type: &DataType) -> ArrayRef {
    match data_type {
        DataType::Int64 => Arc::new(
            values
                .map(|v| match v {
                    Value::Integer(i) => Some(*i),
                    _ => None,
                })
                .collect::<Int64Array>(),
        ),
        DataType::Float64 => Arc::new(values.map(Value::as_f64).collect::<Float64Array>()),
        DataType::Boolean => Arc::new(
            values
                .map(|v| match v {
                    Value::Bool(b) => Some(*b),
                    _ => None,
                })
                .collect::<BooleanArray>(),
        ),
        _ => Arc::new(
            values
                .map(|v| (!v.is_null()).then(|| v.to_string()))
                .collect::<StringArray>(),
        ),
    }
}

/// Convert a table into a single Arrow record batch with nullable columns.
pub fn to_record_batch(table: &Table) -> Result<RecordBatch> {
    let mut fields = Vec::with_capacity(table.width());
    let mut arrays = Vec::with_capacity(table.width());

    for name in table.columns() {
        let data_type = infer_type(table.column(name)?);
        arrays.push(build_array(table.column(name)?, &data_type));
        fields.push(Field::new(name, data_type, true));
    }

    let options = RecordBatchOptions::new().with_row_count(Some(table.len()));
    let batch = RecordBatch::try_new_with_options(Arc::new(Schema::new(fields)), arrays, &options)?;
    Ok(batch)
}

/// Render a table as an ASCII grid.
pub fn pretty_format(table: &Table) -> Result<String> {
    let batch = to_record_batch(table)?;
    Ok(pretty_format_batches(&[batch])?.to_string())
}
