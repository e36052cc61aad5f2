use std::fs::File;
use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::{cast_with_options, CastOptions};
use arrow::datatypes::{DataType, Float64Type, Int64Type};
use log::{debug, info};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::{Result, TableError};
use super::model::{Table, Value};

/// How a file's columns are named.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Explicit column names. When set, the file's own header is ignored.
    pub names: Option<Vec<String>>,
    /// Whether a CSV file starts with a header row.
    pub has_header: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            names: None,
            has_header: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – delimited text, typed per cell
/// * `.json`    – `[{ "col": value, ... }, ...]`
/// * `.parquet` – flat scalar columns
pub fn load_file(path: &Path, options: &LoadOptions) -> Result<Table> {
    if !path.exists() {
        return Err(TableError::NotFound(path.to_path_buf()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" | "txt" => load_csv(path, options)?,
        "json" => with_names(load_json(path)?, options)?,
        "parquet" | "pq" => with_names(load_parquet(path)?, options)?,
        other => return Err(TableError::UnsupportedFormat(other.to_string())),
    };

    info!(
        "loaded {} rows x {} columns from {}",
        table.len(),
        table.width(),
        path.display()
    );
    Ok(table)
}

fn with_names(table: Table, options: &LoadOptions) -> Result<Table> {
    match &options.names {
        // An empty JSON array carries no columns to rename.
        Some(names) if table.width() == 0 && table.is_empty() => Table::new(names.clone()),
        Some(names) => table.rename_columns(names.clone()),
        None => Ok(table),
    }
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => TableError::NotFound(path.to_path_buf()),
        _ => TableError::Io(e),
    })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Every record must carry exactly as many fields as there are declared
/// column names (or header fields when no names are given).
fn load_csv(path: &Path, options: &LoadOptions) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(options.has_header)
        .flexible(true)
        .from_reader(open(path)?);

    let columns = match &options.names {
        Some(names) => names.clone(),
        None if options.has_header => reader.headers()?.iter().map(str::to_string).collect(),
        None => {
            return Err(TableError::Malformed(
                "a file without a header row needs explicit column names".to_string(),
            ))
        }
    };
    debug!("CSV columns: {columns:?}");

    let mut table = Table::new(columns)?;
    for (row_no, result) in reader.records().enumerate() {
        let record = result?;
        if record.len() != table.width() {
            return Err(TableError::Format {
                row: row_no,
                expected: table.width(),
                found: record.len(),
            });
        }
        table.push_row(record.iter().map(Value::parse).collect())?;
    }

    Ok(table)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "sepal length": 5.1, "class": "setosa" },
///   ...
/// ]
/// ```
///
/// The first record fixes the columns; every later record must carry the
/// same keys.
fn load_json(path: &Path) -> Result<Table> {
    let root: JsonValue = serde_json::from_reader(std::io::BufReader::new(open(path)?))?;

    let records = root
        .as_array()
        .ok_or_else(|| TableError::Malformed("expected a top-level JSON array".to_string()))?;

    let columns: Vec<String> = match records.first() {
        Some(JsonValue::Object(first)) => first.keys().cloned().collect(),
        Some(_) => return Err(TableError::Malformed("row 0 is not a JSON object".to_string())),
        None => Vec::new(),
    };

    let mut table = Table::new(columns)?;
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| TableError::Malformed(format!("row {i} is not a JSON object")))?;

        if obj.len() != table.width() {
            return Err(TableError::Format {
                row: i,
                expected: table.width(),
                found: obj.len(),
            });
        }

        let row = table
            .columns()
            .iter()
            .map(|col| {
                obj.get(col)
                    .map(json_to_value)
                    .ok_or_else(|| TableError::Malformed(format!("row {i}: missing field '{col}'")))
            })
            .collect::<Result<Vec<_>>>()?;
        table.push_row(row)?;
    }

    Ok(table)
}

fn json_to_value(val: &JsonValue) -> Value {
    match val {
        JsonValue::String(s) => Value::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Integer(i)
            } else if let Some(f) = n.as_f64() {
                Value::Float(f)
            } else {
                Value::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => Value::Bool(*b),
        JsonValue::Null => Value::Null,
        other => Value::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file of flat scalar columns.
///
/// Integer, float, boolean and string columns are supported, including
/// dictionary-encoded strings as written for pandas `category` columns.
fn load_parquet(path: &Path) -> Result<Table> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(open(path)?)?;
    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build()?;

    let mut table = Table::new(columns)?;

    for batch_result in reader {
        let batch = batch_result?;

        let column_values = batch
            .columns()
            .iter()
            .zip(table.columns())
            .map(|(array, name)| array_values(array, name))
            .collect::<Result<Vec<_>>>()?;

        for row in 0..batch.num_rows() {
            table.push_row(column_values.iter().map(|col| col[row].clone()).collect())?;
        }
    }

    Ok(table)
}

/// Cast that fails on values the target type cannot hold instead of nulling them.
fn strict_cast(array: &ArrayRef, to: &DataType) -> Result<ArrayRef> {
    let options = CastOptions {
        safe: false,
        ..Default::default()
    };
    Ok(cast_with_options(array, to, &options)?)
}

/// Convert one Arrow column into cell values.
fn array_values(array: &ArrayRef, name: &str) -> Result<Vec<Value>> {
    let len = array.len();
    let values = match array.data_type() {
        DataType::Null => vec![Value::Null; len],
        DataType::Boolean => {
            let arr = array.as_boolean();
            (0..len)
                .map(|i| if arr.is_null(i) { Value::Null } else { Value::Bool(arr.value(i)) })
                .collect()
        }
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32
        | DataType::UInt64 => {
            let widened = strict_cast(array, &DataType::Int64)?;
            let arr = widened.as_primitive::<Int64Type>();
            (0..len)
                .map(|i| if arr.is_null(i) { Value::Null } else { Value::Integer(arr.value(i)) })
                .collect()
        }
        DataType::Float16 | DataType::Float32 | DataType::Float64 => {
            let widened = strict_cast(array, &DataType::Float64)?;
            let arr = widened.as_primitive::<Float64Type>();
            (0..len)
                .map(|i| if arr.is_null(i) { Value::Null } else { Value::Float(arr.value(i)) })
                .collect()
        }
        DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View | DataType::Dictionary(_, _) => {
            let text = strict_cast(array, &DataType::Utf8)?;
            let arr = text.as_string::<i32>();
            (0..len)
                .map(|i| {
                    if arr.is_null(i) {
                        Value::Null
                    } else {
                        Value::String(arr.value(i).to_string())
                    }
                })
                .collect()
        }
        other => {
            return Err(TableError::Malformed(format!(
                "column '{name}' has unsupported type {other:?}"
            )))
        }
    };
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{
        BooleanArray, Date32Array, DictionaryArray, Float32Array, Int32Array, LargeStringArray,
        StringViewArray, UInt16Array, UInt64Array,
    };
    use arrow::datatypes::Int32Type;
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;
    use std::io::Write as _;
    use std::sync::Arc;
    use tempfile::{Builder, NamedTempFile};

    const IRIS_HEAD: &str = "\
\"\",\"Sepal.Length\",\"Sepal.Width\",\"Petal.Length\",\"Petal.Width\",\"Species\"
\"1\",5.1,3.5,1.4,0.2,\"setosa\"
\"2\",4.9,3,1.4,0.2,\"setosa\"
\"51\",7,3.2,4.7,1.4,\"versicolor\"
";

    fn temp_with(suffix: &str, contents: &str) -> NamedTempFile {
        let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    fn parquet_with(columns: Vec<(&str, ArrayRef)>) -> NamedTempFile {
        let batch = RecordBatch::try_from_iter(columns).unwrap();
        let file = Builder::new().suffix(".parquet").tempfile().unwrap();
        let mut writer = ArrowWriter::try_new(file.reopen().unwrap(), batch.schema(), None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();
        file
    }

    fn iris_names() -> Vec<String> {
        ["item", "sepal length", "sepal width", "petal length", "petal width", "class"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn csv_uses_file_header_by_default() {
        let file = temp_with(".csv", IRIS_HEAD);
        let table = load_file(file.path(), &LoadOptions::default()).unwrap();
        assert_eq!(table.columns()[1], "Sepal.Length");
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn csv_declared_names_override_header() {
        let file = temp_with(".csv", IRIS_HEAD);
        let options = LoadOptions {
            names: Some(iris_names()),
            ..LoadOptions::default()
        };
        let table = load_file(file.path(), &options).unwrap();

        assert_eq!(table.columns(), &iris_names()[..]);
        assert_eq!(table.len(), 3);
        assert_eq!(
            table.rows()[2],
            vec![
                Value::Integer(51),
                Value::Integer(7),
                Value::Float(3.2),
                Value::Float(4.7),
                Value::Float(1.4),
                Value::from("versicolor"),
            ]
        );
    }

    #[test]
    fn csv_wrong_field_count_is_format_error() {
        let file = temp_with(".csv", "a,b,c\n1,2,3\n4,5\n");
        let err = load_file(file.path(), &LoadOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            TableError::Format {
                row: 1,
                expected: 3,
                found: 2
            }
        ));
    }

    #[test]
    fn csv_rows_must_match_declared_names_not_header() {
        let file = temp_with(".csv", "a,b\n1,2\n");
        let options = LoadOptions {
            names: Some(vec!["x".into(), "y".into(), "z".into()]),
            ..LoadOptions::default()
        };
        let err = load_file(file.path(), &options).unwrap_err();
        assert!(matches!(err, TableError::Format { row: 0, .. }));
    }

    #[test]
    fn headerless_csv_requires_names() {
        let file = temp_with(".csv", "1,2\n3,4\n");
        let options = LoadOptions {
            names: None,
            has_header: false,
        };
        assert!(matches!(
            load_file(file.path(), &options),
            Err(TableError::Malformed(_))
        ));

        let options = LoadOptions {
            names: Some(vec!["a".into(), "b".into()]),
            has_header: false,
        };
        let table = load_file(file.path(), &options).unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn header_only_csv_has_zero_rows() {
        let file = temp_with(".csv", "a,b\n");
        let table = load_file(file.path(), &LoadOptions::default()).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.width(), 2);
    }

    #[test]
    fn empty_json_array_takes_declared_names() {
        let file = temp_with(".json", "[]");
        let options = LoadOptions {
            names: Some(vec!["x".into(), "y".into()]),
            ..LoadOptions::default()
        };
        let table = load_file(file.path(), &options).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.columns(), &["x", "y"]);
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = load_file(Path::new("/nonexistent/iris.csv"), &LoadOptions::default())
            .unwrap_err();
        assert!(matches!(err, TableError::NotFound(_)));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let file = temp_with(".xlsx", "");
        let err = load_file(file.path(), &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, TableError::UnsupportedFormat(ref e) if e == "xlsx"));
    }

    #[test]
    fn json_records_keep_key_order() {
        let file = temp_with(
            ".json",
            r#"[{"item": 1, "petal width": 0.2, "class": "setosa"},
                {"item": 2, "petal width": null, "class": "virginica"}]"#,
        );
        let table = load_file(file.path(), &LoadOptions::default()).unwrap();
        assert_eq!(table.columns(), &["item", "petal width", "class"]);
        assert_eq!(table.rows()[1][1], Value::Null);
        assert_eq!(table.rows()[0][0], Value::Integer(1));
    }

    #[test]
    fn json_record_with_extra_key_is_format_error() {
        let file = temp_with(".json", r#"[{"a": 1}, {"a": 2, "b": 3}]"#);
        let err = load_file(file.path(), &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, TableError::Format { row: 1, .. }));
    }

    #[test]
    fn json_names_must_match_width() {
        let file = temp_with(".json", r#"[{"a": 1, "b": 2}]"#);
        let options = LoadOptions {
            names: Some(vec!["x".into()]),
            ..LoadOptions::default()
        };
        assert!(matches!(
            load_file(file.path(), &options),
            Err(TableError::Malformed(_))
        ));
    }

    #[test]
    fn parquet_scalar_columns_are_widened() {
        let class: DictionaryArray<Int32Type> =
            vec!["setosa", "virginica", "setosa"].into_iter().collect();
        let file = parquet_with(vec![
            ("class", Arc::new(class) as ArrayRef),
            ("flag", Arc::new(BooleanArray::from(vec![Some(true), None, Some(false)])) as ArrayRef),
            ("small", Arc::new(Int32Array::from(vec![1, -2, 3])) as ArrayRef),
            ("unsigned", Arc::new(UInt16Array::from(vec![7, 8, 9])) as ArrayRef),
            ("ratio", Arc::new(Float32Array::from(vec![0.5, 1.25, 2.0])) as ArrayRef),
            ("name", Arc::new(LargeStringArray::from(vec!["a", "b", "c"])) as ArrayRef),
        ]);

        let table = load_file(file.path(), &LoadOptions::default()).unwrap();
        assert_eq!(
            table.columns(),
            &["class", "flag", "small", "unsigned", "ratio", "name"]
        );
        assert_eq!(
            table.rows()[1],
            vec![
                Value::from("virginica"),
                Value::Null,
                Value::Integer(-2),
                Value::Integer(8),
                Value::Float(1.25),
                Value::from("b"),
            ]
        );
        assert_eq!(table.rows()[0][1], Value::Bool(true));
    }

    #[test]
    fn parquet_unsigned_overflow_is_an_error() {
        let file = parquet_with(vec![(
            "id",
            Arc::new(UInt64Array::from(vec![1, u64::MAX, 3])) as ArrayRef,
        )]);
        let err = load_file(file.path(), &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, TableError::Arrow(_)));
    }

    #[test]
    fn parquet_unsupported_type_is_malformed() {
        let file = parquet_with(vec![(
            "day",
            Arc::new(Date32Array::from(vec![19000, 19001])) as ArrayRef,
        )]);
        let err = load_file(file.path(), &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, TableError::Malformed(ref m) if m.contains("day")));
    }

    #[test]
    fn string_views_become_strings() {
        let array: ArrayRef = Arc::new(vec![Some("x"), None].into_iter().collect::<StringViewArray>());
        let values = array_values(&array, "view").unwrap();
        assert_eq!(values, vec![Value::from("x"), Value::Null]);
    }
}
