use crate::attribute::{Attribute, ContinuousAttribute, DiscreteAttribute};
use crate::error::{KMeansError, Result};
use crate::item::Item;
use crate::table::{Aggregate, TableReader};
use crate::tuple::Tuple;
use crate::value::{Example, Value};
use rand::prelude::*;
use std::fmt;
use tracing::debug;

/// The table to cluster: its distinct rows plus the schema they conform to.
///
/// A dataset is immutable once constructed, so a single instance can be shared by any number
/// of concurrent clustering runs.
#[derive(Clone, Debug)]
pub struct Dataset {
    schema: Vec<Attribute>,
    rows: Vec<Example>,
    tuples: Vec<Tuple>,
}
impl Dataset {
    /// Create a dataset from a schema and the (already deduplicated) rows of a table.
    ///
    /// ## Errors
    /// - [`KMeansError::EmptyResult`] if there are no rows
    /// - [`KMeansError::DimensionMismatch`] if an attribute's index does not match its schema position,
    ///   or a row does not have exactly one value per attribute
    /// - [`KMeansError::InvalidValue`] if a value does not conform to its attribute
    pub fn new(schema: Vec<Attribute>, rows: Vec<Example>) -> Result<Self> {
        if rows.is_empty() {
            return Err(KMeansError::EmptyResult { table: "(in-memory)".to_owned() });
        }
        if let Some((pos, attr)) = schema.iter().enumerate().find(|(pos, attr)| attr.index() != *pos) {
            return Err(KMeansError::DimensionMismatch { expected: pos, found: attr.index() });
        }
        let tuples = rows.iter().enumerate()
            .map(|(r, row)| {
                if row.len() != schema.len() {
                    return Err(KMeansError::DimensionMismatch { expected: schema.len(), found: row.len() });
                }
                schema.iter().zip(row.values())
                    .map(|(attr, value)| Item::bind(attr, value)
                        .ok_or_else(|| KMeansError::InvalidValue { row: r, attribute: attr.name().to_owned() }))
                    .collect::<Result<Vec<_>>>()
                    .map(Tuple::new)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { schema, rows, tuples })
    }

    /// Load the distinct rows of `table` through `reader`, deriving the schema from the table's
    /// columns: numeric columns become continuous attributes ranging over the column's MIN/MAX,
    /// all others discrete attributes over the column's distinct values.
    pub fn from_table<R: TableReader + ?Sized>(reader: &R, table: &str) -> Result<Self> {
        let columns = reader.list_columns(table)?;
        let rows = reader.distinct_rows(table)?;
        let schema = columns.iter().enumerate()
            .map(|(i, column)| -> Result<Attribute> {
                if column.is_numeric {
                    let min = reader.aggregate(table, &column.name, Aggregate::Min)?;
                    let max = reader.aggregate(table, &column.name, Aggregate::Max)?;
                    Ok(ContinuousAttribute::new(column.name.as_str(), i, min, max)?.into())
                } else {
                    let values = reader.distinct_values(table, &column.name)?;
                    Ok(DiscreteAttribute::new(column.name.as_str(), i, values.iter().map(Value::to_string)).into())
                }
            })
            .collect::<Result<Vec<_>>>()?;
        debug!(table, attributes = schema.len(), examples = rows.len(), "loaded dataset");
        Self::new(schema, rows)
    }

    pub fn number_of_examples(&self) -> usize {
        self.rows.len()
    }
    pub fn number_of_attributes(&self) -> usize {
        self.schema.len()
    }
    pub fn schema(&self) -> &[Attribute] {
        &self.schema
    }
    pub fn example(&self, index: usize) -> &Example {
        &self.rows[index]
    }

    /// Record `index` as a freshly allocated [`Tuple`]. Mutating the returned tuple never
    /// affects the dataset.
    ///
    /// ## Panics
    /// If `index >= number_of_examples()`.
    pub fn tuple_at(&self, index: usize) -> Tuple {
        self.tuples[index].clone()
    }

    /// Borrowed record `index`, for callers that only read it.
    pub(crate) fn tuple(&self, index: usize) -> &Tuple {
        &self.tuples[index]
    }

    /// Borrowed record `index`, or [`KMeansError::RecordOutOfRange`] if the dataset is smaller.
    /// Used wherever indices come from a [`crate::ClusterSet`] that may have been computed on
    /// another dataset.
    pub fn try_tuple(&self, index: usize) -> Result<&Tuple> {
        self.tuples.get(index)
            .ok_or(KMeansError::RecordOutOfRange { index, records: self.number_of_examples() })
    }

    fn value_at(&self, example: usize, column: usize) -> Result<&Value> {
        let row = self.rows.get(example)
            .ok_or(KMeansError::RecordOutOfRange { index: example, records: self.number_of_examples() })?;
        row.get(column)
            .ok_or(KMeansError::DimensionMismatch { expected: self.number_of_attributes(), found: column + 1 })
    }

    /// Select `k` distinct record indices, no two of which reference value-identical rows.
    ///
    /// The indices are shuffled with `rnd` and accepted in shuffled order, skipping every
    /// index whose row equals the row of an already accepted one.
    ///
    /// ## Errors
    /// [`KMeansError::InvalidSampleSize`] if `k == 0`, `k >= number_of_examples()`, or the dataset
    /// does not contain `k` pairwise different rows.
    pub fn sample_distinct_indices(&self, k: usize, rnd: &mut dyn RngCore) -> Result<Vec<usize>> {
        let records = self.number_of_examples();
        if k == 0 || k >= records {
            return Err(KMeansError::InvalidSampleSize { k, records });
        }
        let mut candidates: Vec<usize> = (0..records).collect();
        candidates.shuffle(rnd);

        let mut chosen: Vec<usize> = Vec::with_capacity(k);
        for c in candidates {
            if !chosen.iter().any(|&j| self.rows[j] == self.rows[c]) {
                chosen.push(c);
                if chosen.len() == k {
                    return Ok(chosen);
                }
            }
        }
        Err(KMeansError::InvalidSampleSize { k, records })
    }

    /// Prototype of `attribute` over the records `indices`.
    ///
    /// - continuous: the mean of the raw values, returned scaled (see [`ContinuousAttribute::scaled_value`]).
    ///   No records yield `0`.
    /// - discrete: the most frequent value; ties (and no records) resolve to the first such value in
    ///   the attribute's iteration order.
    ///
    /// ## Errors
    /// - [`KMeansError::RecordOutOfRange`] if an index exceeds the dataset
    /// - [`KMeansError::DimensionMismatch`] if the attribute's column is not part of the schema
    pub fn compute_prototype<'a>(&self, indices: impl IntoIterator<Item = &'a usize>, attribute: &Attribute) -> Result<Value> {
        let column = attribute.index();
        if column >= self.number_of_attributes() {
            return Err(KMeansError::DimensionMismatch { expected: self.number_of_attributes(), found: column + 1 });
        }
        let values = indices.into_iter()
            .map(|&i| self.value_at(i, column))
            .collect::<Result<Vec<_>>>()?;
        Ok(match attribute {
            Attribute::Continuous(a) => {
                let numbers: Vec<f64> = values.iter().filter_map(|v| v.as_number()).collect();
                if numbers.is_empty() {
                    Value::Number(0.0)
                } else {
                    Value::Number(a.scaled_value(numbers.iter().sum::<f64>() / numbers.len() as f64))
                }
            }
            Attribute::Discrete(a) => {
                let mut best: Option<(&str, usize)> = None;
                for value in a.values() {
                    let frequency = values.iter().filter(|v| v.as_text() == Some(value)).count();
                    if best.map_or(true, |(_, f)| frequency > f) {
                        best = Some((value, frequency));
                    }
                }
                Value::Text(best.map(|(v, _)| v.to_owned()).unwrap_or_default())
            }
        })
    }
}
impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows.iter().enumerate() {
            writeln!(f, "{}:{}", i + 1, row)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::MemoryTable;
    use std::collections::BTreeSet;

    fn numbers(values: &[f64]) -> Dataset {
        let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let schema = vec![ContinuousAttribute::new("x", 0, min, max).unwrap().into()];
        Dataset::new(schema, values.iter().map(|&v| Example::new(vec![Value::from(v)])).collect()).unwrap()
    }

    fn letters(values: &[&str]) -> Dataset {
        let schema = vec![DiscreteAttribute::new("c", 0, values.iter().cloned()).into()];
        Dataset::new(schema, values.iter().map(|&v| Example::new(vec![Value::from(v)])).collect()).unwrap()
    }

    #[test]
    fn construction_validates_rows() {
        let schema: Vec<Attribute> = vec![
            DiscreteAttribute::new("outlook", 0, ["rain", "sunny"]).into(),
            ContinuousAttribute::new("temperature", 1, 0.0, 40.0).unwrap().into(),
        ];
        assert!(matches!(Dataset::new(schema.clone(), vec![]), Err(KMeansError::EmptyResult { .. })));
        assert!(matches!(
            Dataset::new(schema.clone(), vec![Example::new(vec![Value::from("rain")])]),
            Err(KMeansError::DimensionMismatch { expected: 2, found: 1 })
        ));
        assert!(matches!(
            Dataset::new(schema.clone(), vec![
                Example::new(vec![Value::from("rain"), Value::from(1.0)]),
                Example::new(vec![Value::from("snow"), Value::from(1.0)]),
            ]),
            Err(KMeansError::InvalidValue { row: 1, .. })
        ));
        assert!(matches!(
            Dataset::new(schema, vec![Example::new(vec![Value::from(2.0), Value::from(1.0)])]),
            Err(KMeansError::InvalidValue { row: 0, .. })
        ));
    }

    #[test]
    fn construction_checks_attribute_positions() {
        let schema = vec![ContinuousAttribute::new("x", 1, 0.0, 1.0).unwrap().into()];
        assert!(matches!(
            Dataset::new(schema, vec![Example::new(vec![Value::from(0.5)])]),
            Err(KMeansError::DimensionMismatch { expected: 0, found: 1 })
        ));
    }

    #[test]
    fn tuple_at_returns_independent_copies() {
        let data = numbers(&[1.0, 2.0, 3.0]);
        let mut t = data.tuple_at(1);
        t.items_mut()[0].update(Value::Number(1.0)).unwrap();
        assert_eq!(t.items()[0].value(), Value::Number(3.0));
        assert_eq!(data.tuple_at(1).items()[0].value(), Value::Number(2.0));
    }

    #[test]
    fn sample_size_bounds() {
        let data = numbers(&[1.0, 2.0, 3.0, 100.0]);
        let mut rnd = StdRng::seed_from_u64(1);
        for k in [0, 4, 5] {
            assert!(matches!(
                data.sample_distinct_indices(k, &mut rnd),
                Err(KMeansError::InvalidSampleSize { records: 4, .. })
            ));
        }
        for k in 1..4 {
            let sample = data.sample_distinct_indices(k, &mut rnd).unwrap();
            assert_eq!(sample.len(), k);
            assert_eq!(sample.iter().collect::<BTreeSet<_>>().len(), k);
        }
    }

    #[test]
    fn sample_never_picks_identical_rows() {
        // Rows 0/2/4 and 1/3 are duplicates of each other
        let data = letters(&["a", "b", "a", "b", "a", "c"]);
        for seed in 0..200 {
            let mut rnd = StdRng::seed_from_u64(seed);
            let sample = data.sample_distinct_indices(3, &mut rnd).unwrap();
            let rows: BTreeSet<_> = sample.iter().map(|&i| data.example(i).clone()).collect();
            assert_eq!(rows.len(), 3);
        }
        let mut rnd = StdRng::seed_from_u64(7);
        assert!(matches!(data.sample_distinct_indices(4, &mut rnd), Err(KMeansError::InvalidSampleSize { k: 4, .. })));
    }

    #[test]
    fn continuous_prototype_is_scaled_mean() {
        let data = numbers(&[1.0, 2.0, 3.0, 100.0]);
        let attr = data.schema()[0].clone();
        let p = data.compute_prototype(&[0, 1, 2], &attr).unwrap().as_number().unwrap();
        assert_approx_eq!(p, 1.0 / 99.0);
        let p = data.compute_prototype(&[3], &attr).unwrap().as_number().unwrap();
        assert_approx_eq!(p, 1.0);
        assert_eq!(data.compute_prototype(&[], &attr).unwrap(), Value::Number(0.0));
    }

    #[test]
    fn discrete_prototype_is_mode_with_ordered_ties() {
        let data = letters(&["b", "a", "c", "b", "a"]);
        let attr = data.schema()[0].clone();
        assert_eq!(data.compute_prototype(&[0, 2, 3], &attr).unwrap(), Value::from("b"));
        // a and b tie, a comes first
        assert_eq!(data.compute_prototype(&[0, 1, 3, 4], &attr).unwrap(), Value::from("a"));
        assert_eq!(data.compute_prototype(&[2], &attr).unwrap(), Value::from("c"));
        assert_eq!(data.compute_prototype(&[], &attr).unwrap(), Value::from("a"));
    }

    #[test]
    fn prototype_of_foreign_indices_is_an_error() {
        let data = numbers(&[1.0, 2.0, 3.0]);
        let attr = data.schema()[0].clone();
        assert!(matches!(
            data.compute_prototype(&[0, 7], &attr),
            Err(KMeansError::RecordOutOfRange { index: 7, records: 3 })
        ));
        let wide: Attribute = ContinuousAttribute::new("y", 4, 0.0, 1.0).unwrap().into();
        assert!(matches!(data.compute_prototype(&[0], &wide), Err(KMeansError::DimensionMismatch { expected: 1, found: 5 })));
    }

    #[test]
    fn try_tuple_checks_range() {
        let data = letters(&["x", "y"]);
        assert_eq!(data.try_tuple(1).unwrap(), &data.tuple_at(1));
        assert_eq!(data.tuple(0), &data.tuple_at(0));
        assert!(matches!(data.try_tuple(2), Err(KMeansError::RecordOutOfRange { index: 2, records: 2 })));
    }

    #[test]
    fn from_table_derives_schema() {
        let mut tables = MemoryTable::new();
        tables.create_table("weather", &[("outlook", false), ("temperature", true)]);
        for (outlook, temperature) in [("sunny", 30.0), ("rain", 12.5), ("sunny", 30.0), ("overcast", 21.0)] {
            tables.insert("weather", vec![Value::from(outlook), Value::from(temperature)]).unwrap();
        }
        let data = Dataset::from_table(&tables, "weather").unwrap();
        assert_eq!(data.number_of_examples(), 3);
        assert_eq!(data.number_of_attributes(), 2);
        match &data.schema()[1] {
            Attribute::Continuous(a) => assert_eq!((a.min(), a.max()), (12.5, 30.0)),
            other => panic!("expected continuous attribute, got {:?}", other),
        }
        match &data.schema()[0] {
            Attribute::Discrete(a) => assert_eq!(a.values().collect::<Vec<_>>(), vec!["overcast", "rain", "sunny"]),
            other => panic!("expected discrete attribute, got {:?}", other),
        }
    }

    #[test]
    fn from_table_rejects_constant_numeric_column() {
        let mut tables = MemoryTable::new();
        tables.create_table("flat", &[("x", true)]);
        tables.insert("flat", vec![Value::from(4.0)]).unwrap();
        assert!(matches!(Dataset::from_table(&tables, "flat"), Err(KMeansError::DegenerateAttribute { .. })));
    }

    #[test]
    fn display_lists_rows_one_based() {
        let data = letters(&["x", "y"]);
        assert_eq!(data.to_string(), "1:x \n2:y \n");
    }
}
