use std::path::Path;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::data::encode::{encode_categorical, CategoryMap, CodeOrder};
use crate::data::error::{Result, TableError};
use crate::data::loader::{load_file, LoadOptions};
use crate::data::model::{Table, Value};
use crate::data::project::drop_columns;
use crate::data::stats::{format_currency, mean};

/// Column names declared for the iris CSV, replacing its own header.
pub const IRIS_COLUMNS: [&str; 6] = [
    "item",
    "sepal length",
    "sepal width",
    "petal length",
    "petal width",
    "class",
];

// ---------------------------------------------------------------------------
// Pipeline A: labeled-dataset preparation
// ---------------------------------------------------------------------------

/// Parameters of the preparation pipeline. Defaults describe the iris dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrepareOptions {
    /// Declared column names; `None` keeps the file's header.
    pub column_names: Option<Vec<String>>,
    pub has_header: bool,
    /// Columns removed before encoding.
    pub drop: Vec<String>,
    pub label_column: String,
    pub code_column: String,
    pub order: CodeOrder,
}

impl Default for PrepareOptions {
    fn default() -> Self {
        Self {
            column_names: Some(IRIS_COLUMNS.iter().map(|c| c.to_string()).collect()),
            has_header: true,
            drop: vec!["item".to_string()],
            label_column: "class".to_string(),
            code_column: "classIndex".to_string(),
            order: CodeOrder::Sorted,
        }
    }
}

impl PrepareOptions {
    /// Read options from a JSON file; absent keys keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => TableError::NotFound(path.to_path_buf()),
            _ => TableError::Io(e),
        })?;
        Ok(serde_json::from_str(&text)?)
    }

    fn load_options(&self) -> LoadOptions {
        LoadOptions {
            names: self.column_names.clone(),
            has_header: self.has_header,
        }
    }
}

/// Result of the preparation pipeline.
#[derive(Debug, Clone)]
pub struct Prepared {
    pub table: Table,
    pub categories: CategoryMap,
}

/// Load `path`, drop the configured columns and append the label codes.
pub fn prepare_dataset(path: &Path, options: &PrepareOptions) -> Result<Prepared> {
    let raw = load_file(path, &options.load_options())?;
    let projected = drop_columns(&raw, &options.drop)?;
    debug!("projected columns: {:?}", projected.columns());

    let (table, categories) = encode_categorical(
        &projected,
        &options.label_column,
        &options.code_column,
        options.order,
    )?;

    info!(
        "prepared {} rows, {} categories in '{}'",
        table.len(),
        categories.len(),
        options.label_column
    );
    Ok(Prepared { table, categories })
}

// ---------------------------------------------------------------------------
// Pipeline B: summary statistic
// ---------------------------------------------------------------------------

/// The fixed five-row employee table.
pub fn employee_table() -> Result<Table> {
    let rows = [
        ("Alice", 25, 50000),
        ("Bob", 30, 70000),
        ("Charlie", 35, 3000),
        ("David", 40, 90000),
        ("Eve", 45, 60000),
    ];

    Table::from_rows(
        vec!["Name".into(), "Age".into(), "Salary".into()],
        rows.iter()
            .map(|&(name, age, salary)| {
                vec![Value::from(name), Value::Integer(age), Value::Integer(salary)]
            })
            .collect(),
    )
}

/// `Average salary: $<mean>` over the `Salary` column.
pub fn average_salary_line(table: &Table) -> Result<String> {
    let avg = mean(table, "Salary")?;
    Ok(format!("Average salary: {}", format_currency(avg)))
}
