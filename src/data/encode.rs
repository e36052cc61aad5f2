use std::collections::{BTreeMap, BTreeSet};

use log::debug;
use serde::{Deserialize, Serialize};

use super::error::Result;
use super::model::{Table, Value};

// ---------------------------------------------------------------------------
// Code ordering
// ---------------------------------------------------------------------------

/// Order in which distinct labels receive their integer codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum CodeOrder {
    /// Ascending value order: codes do not depend on row order.
    #[default]
    Sorted,
    /// Order of first appearance, top to bottom.
    FirstSeen,
}

// ---------------------------------------------------------------------------
// Category map: label value → integer code
// ---------------------------------------------------------------------------

/// Maps the distinct non-null values of one column onto `0..len()`.
#[derive(Debug, Clone)]
pub struct CategoryMap {
    pub column: String,
    codes: BTreeMap<Value, i64>,
    categories: Vec<Value>,
}

impl CategoryMap {
    /// Build the map for `column` of `table`.
    pub fn new(table: &Table, column: &str, order: CodeOrder) -> Result<Self> {
        let categories: Vec<Value> = match order {
            CodeOrder::Sorted => table
                .unique_values(column)?
                .into_iter()
                .filter(|v| !v.is_null())
                .collect(),
            CodeOrder::FirstSeen => {
                let mut seen = BTreeSet::new();
                table
                    .column(column)?
                    .filter(|v| !v.is_null() && seen.insert(*v))
                    .cloned()
                    .collect()
            }
        };

        let codes = categories
            .iter()
            .enumerate()
            .map(|(code, v)| (v.clone(), code as i64))
            .collect();

        Ok(CategoryMap {
            column: column.to_string(),
            codes,
            categories,
        })
    }

    /// Code for a label, `None` for `Null` or unseen values.
    pub fn code_for(&self, value: &Value) -> Option<i64> {
        self.codes.get(value).copied()
    }

    /// Categories in code order: `categories()[code]` is the label.
    pub fn categories(&self) -> &[Value] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Legend entries (code, label) for reporting.
    pub fn legend_entries(&self) -> Vec<(i64, String)> {
        self.categories
            .iter()
            .enumerate()
            .map(|(code, v)| (code as i64, v.to_string()))
            .collect()
    }
}

/// Add (or overwrite) `code_column` holding the categorical code of `column`.
///
/// Rows with a `Null` label get a `Null` code. Returns the new table and the
/// map that produced the codes.
pub fn encode_categorical(
    table: &Table,
    column: &str,
    code_column: &str,
    order: CodeOrder,
) -> Result<(Table, CategoryMap)> {
    let map = CategoryMap::new(table, column, order)?;

    let codes: Vec<Value> = table
        .column(column)?
        .map(|v| map.code_for(v).map_or(Value::Null, Value::Integer))
        .collect();

    let mut encoded = table.clone();
    encoded.set_column(code_column, codes)?;

    debug!(
        "encoded '{column}' into '{code_column}' with {} categories",
        map.len()
    );
    Ok((encoded, map))
}
