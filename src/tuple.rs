use crate::dataset::Dataset;
use crate::error::{KMeansError, Result};
use crate::item::Item;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One record projected onto a schema: item `i` is bound to attribute `i`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tuple {
    items: Vec<Item>,
}
impl Tuple {
    pub fn new(items: Vec<Item>) -> Self {
        Self { items }
    }
    pub fn len(&self) -> usize {
        self.items.len()
    }
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
    pub fn get(&self, i: usize) -> Option<&Item> {
        self.items.get(i)
    }
    pub fn items(&self) -> &[Item] {
        &self.items
    }
    pub(crate) fn items_mut(&mut self) -> &mut [Item] {
        &mut self.items
    }

    /// Unweighted sum of the per-attribute item distances.
    ///
    /// ## Errors
    /// - [`KMeansError::DimensionMismatch`] when the tuples differ in length
    /// - [`KMeansError::IncompatibleItems`] when the tuples were built over different schemas
    pub fn distance(&self, other: &Tuple) -> Result<f64> {
        if self.len() != other.len() {
            return Err(KMeansError::DimensionMismatch { expected: self.len(), found: other.len() });
        }
        self.items.iter().zip(other.items.iter())
            .map(|(a, b)| a.distance(b))
            .sum()
    }

    /// Mean distance between this tuple and the records `indices` of `dataset`.
    /// An empty index set has an average distance of `0.0`. Indices beyond the dataset yield
    /// [`KMeansError::RecordOutOfRange`].
    pub fn average_distance<'a>(&self, dataset: &Dataset, indices: impl IntoIterator<Item = &'a usize>) -> Result<f64> {
        let (mut sum, mut cnt) = (0.0, 0usize);
        for &i in indices {
            sum += self.distance(dataset.try_tuple(i)?)?;
            cnt += 1;
        }
        Ok(if cnt == 0 { 0.0 } else { sum / cnt as f64 })
    }
}
impl fmt::Display for Tuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for item in &self.items {
            write!(f, "{} ", item)?;
        }
        Ok(())
    }
}
