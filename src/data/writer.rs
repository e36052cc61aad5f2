use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use log::info;
use parquet::arrow::ArrowWriter;
use serde_json::{Map, Number, Value as JsonValue};

use super::columnar::to_record_batch;
use super::error::{Result, TableError};
use super::model::{Table, Value};

/// Write a table to disk, format chosen by extension (`.csv`, `.json`, `.parquet`).
pub fn write_file(table: &Table, path: &Path) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => write_csv(table, path)?,
        "json" => write_json(table, path)?,
        "parquet" | "pq" => write_parquet(table, path)?,
        other => return Err(TableError::UnsupportedFormat(other.to_string())),
    }

    info!("wrote {} rows to {}", table.len(), path.display());
    Ok(())
}

fn write_csv(table: &Table, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(table.columns())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(|v| v.to_string()))?;
    }
    writer.flush()?;
    Ok(())
}

/// Records-oriented: one object per row, keys in column order.
fn write_json(table: &Table, path: &Path) -> Result<()> {
    let records: Vec<JsonValue> = table
        .rows()
        .iter()
        .map(|row| {
            let obj: Map<String, JsonValue> = table
                .columns()
                .iter()
                .cloned()
                .zip(row.iter().map(value_to_json))
                .collect();
            JsonValue::Object(obj)
        })
        .collect();

    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, &records)?;
    Ok(())
}

fn value_to_json(value: &Value) -> JsonValue {
    match value {
        Value::String(s) => JsonValue::String(s.clone()),
        Value::Integer(i) => JsonValue::Number((*i).into()),
        // JSON has no NaN/inf; they become null.
        Value::Float(f) => Number::from_f64(*f).map_or(JsonValue::Null, JsonValue::Number),
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::Null => JsonValue::Null,
    }
}

fn write_parquet(table: &Table, path: &Path) -> Result<()> {
    let batch = to_record_batch(table)?;
    let file = File::create(path)?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}
