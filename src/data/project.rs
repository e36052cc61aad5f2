use std::collections::BTreeSet;

use log::debug;

use super::error::Result;
use super::model::Table;

/// Return a copy of `table` without the named columns.
///
/// Every name must exist; one missing name fails the whole call with
/// `TableError::Key` and nothing is dropped. Rows and the order of the
/// remaining columns are untouched.
pub fn drop_columns<S: AsRef<str>>(table: &Table, names: &[S]) -> Result<Table> {
    let dropped = names
        .iter()
        .map(|n| table.column_index(n.as_ref()))
        .collect::<Result<BTreeSet<usize>>>()?;

    let keep: Vec<usize> = (0..table.width()).filter(|i| !dropped.contains(i)).collect();

    let columns = keep.iter().map(|&i| table.columns()[i].clone()).collect();
    let rows = table
        .rows()
        .iter()
        .map(|row| keep.iter().map(|&i| row[i].clone()).collect())
        .collect();

    debug!("dropped {} column(s), {} remain", dropped.len(), keep.len());
    Table::from_rows(columns, rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::error::TableError;
    use crate::data::model::Value;

    fn sample() -> Table {
        Table::from_rows(
            vec!["item".into(), "petal width".into(), "class".into()],
            vec![
                vec![Value::Integer(1), Value::Float(0.2), Value::from("setosa")],
                vec![Value::Integer(2), Value::Float(1.3), Value::from("versicolor")],
            ],
        )
        .unwrap()
    }

    #[test]
    fn drops_only_named_columns() {
        let table = sample();
        let projected = drop_columns(&table, &["item"]).unwrap();

        assert_eq!(projected.columns(), &["petal width", "class"]);
        assert_eq!(projected.len(), table.len());
        assert_eq!(
            projected.rows()[1],
            vec![Value::Float(1.3), Value::from("versicolor")]
        );
    }

    #[test]
    fn missing_column_fails_without_partial_drop() {
        let table = sample();
        let err = drop_columns(&table, &["item", "sepal length"]).unwrap_err();
        assert!(matches!(err, TableError::Key(ref c) if c == "sepal length"));
        assert_eq!(table.width(), 3);
    }

    #[test]
    fn dropping_nothing_is_identity() {
        let table = sample();
        let names: [&str; 0] = [];
        assert_eq!(drop_columns(&table, &names).unwrap(), table);
    }

    #[test]
    fn repeated_names_drop_once() {
        let table = sample();
        let projected = drop_columns(&table, &["class", "class"]).unwrap();
        assert_eq!(projected.columns(), &["item", "petal width"]);
    }
}
