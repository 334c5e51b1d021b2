use crate::error::{KMeansError, Result};
use crate::value::{Example, Value};
use std::collections::{BTreeSet, HashMap};

/// Column metadata as reported by a [`TableReader`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub is_numeric: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Aggregate {
    Min,
    Max,
}

/// Source of the tables a [`crate::Dataset`] is built from.
///
/// Implementations wrap whatever storage holds the records (a relational database, files, ...).
pub trait TableReader {
    /// Columns of `table`, in row order.
    fn list_columns(&self, table: &str) -> Result<Vec<Column>>;

    /// The distinct rows of `table`, each aligned with [`TableReader::list_columns`].
    ///
    /// ## Errors
    /// [`KMeansError::EmptyResult`] when the table holds no rows.
    fn distinct_rows(&self, table: &str) -> Result<Vec<Example>>;

    /// Sorted distinct values of a (discrete) column.
    fn distinct_values(&self, table: &str, column: &str) -> Result<BTreeSet<Value>>;

    /// MIN or MAX of a numeric column.
    ///
    /// ## Errors
    /// [`KMeansError::NoAggregateValue`] when the table is empty or the column holds no numbers.
    fn aggregate(&self, table: &str, column: &str, aggregate: Aggregate) -> Result<f64>;
}

#[derive(Clone, Debug, Default)]
struct MemoryTableData {
    columns: Vec<Column>,
    rows: Vec<Example>,
}

/// [`TableReader`] over tables kept in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryTable {
    tables: HashMap<String, MemoryTableData>,
}
impl MemoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create (or replace) an empty table with the given `(name, is_numeric)` columns.
    pub fn create_table(&mut self, table: &str, columns: &[(&str, bool)]) {
        let columns = columns.iter()
            .map(|&(name, is_numeric)| Column { name: name.to_owned(), is_numeric })
            .collect();
        self.tables.insert(table.to_owned(), MemoryTableData { columns, rows: Vec::new() });
    }

    /// Append a row to `table`.
    ///
    /// ## Errors
    /// - [`KMeansError::UnknownTable`] if the table was never created
    /// - [`KMeansError::DimensionMismatch`] if the row does not have one value per column
    pub fn insert(&mut self, table: &str, row: Vec<Value>) -> Result<()> {
        let data = self.tables.get_mut(table)
            .ok_or_else(|| KMeansError::UnknownTable { table: table.to_owned() })?;
        if row.len() != data.columns.len() {
            return Err(KMeansError::DimensionMismatch { expected: data.columns.len(), found: row.len() });
        }
        data.rows.push(Example::new(row));
        Ok(())
    }

    fn table(&self, table: &str) -> Result<&MemoryTableData> {
        self.tables.get(table).ok_or_else(|| KMeansError::UnknownTable { table: table.to_owned() })
    }

    fn column_index(&self, table: &str, column: &str) -> Result<(&MemoryTableData, usize)> {
        let data = self.table(table)?;
        let idx = data.columns.iter().position(|c| c.name == column)
            .ok_or_else(|| KMeansError::UnknownColumn { table: table.to_owned(), column: column.to_owned() })?;
        Ok((data, idx))
    }
}
impl TableReader for MemoryTable {
    fn list_columns(&self, table: &str) -> Result<Vec<Column>> {
        Ok(self.table(table)?.columns.clone())
    }

    fn distinct_rows(&self, table: &str) -> Result<Vec<Example>> {
        let distinct: BTreeSet<&Example> = self.table(table)?.rows.iter().collect();
        if distinct.is_empty() {
            return Err(KMeansError::EmptyResult { table: table.to_owned() });
        }
        Ok(distinct.into_iter().cloned().collect())
    }

    fn distinct_values(&self, table: &str, column: &str) -> Result<BTreeSet<Value>> {
        let (data, idx) = self.column_index(table, column)?;
        Ok(data.rows.iter().filter_map(|r| r.get(idx)).cloned().collect())
    }

    fn aggregate(&self, table: &str, column: &str, aggregate: Aggregate) -> Result<f64> {
        let (data, idx) = self.column_index(table, column)?;
        let values = data.rows.iter().filter_map(|r| r.get(idx)).filter_map(Value::as_number);
        let result = match aggregate {
            Aggregate::Min => values.reduce(f64::min),
            Aggregate::Max => values.reduce(f64::max),
        };
        result.ok_or_else(|| KMeansError::NoAggregateValue { table: table.to_owned(), column: column.to_owned() })
    }
}
