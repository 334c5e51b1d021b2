use crate::error::{KMeansError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Numeric column descriptor with the range `[min, max]` observed in the source table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ContinuousAttributeFields")]
pub struct ContinuousAttribute {
    name: String,
    index: usize,
    min: f64,
    max: f64,
}

/// Decoded form of a [`ContinuousAttribute`], checked through [`ContinuousAttribute::new`].
#[derive(Deserialize)]
struct ContinuousAttributeFields {
    name: String,
    index: usize,
    min: f64,
    max: f64,
}
impl TryFrom<ContinuousAttributeFields> for ContinuousAttribute {
    type Error = KMeansError;

    fn try_from(fields: ContinuousAttributeFields) -> Result<Self> {
        Self::new(fields.name, fields.index, fields.min, fields.max)
    }
}
impl ContinuousAttribute {
    /// Create a continuous attribute.
    ///
    /// ## Errors
    /// [`KMeansError::DegenerateAttribute`] when the range is empty (`min >= max`) or not finite,
    /// since scaling would divide by zero.
    pub fn new(name: impl Into<String>, index: usize, min: f64, max: f64) -> Result<Self> {
        let name = name.into();
        if !(min.is_finite() && max.is_finite() && min < max) {
            return Err(KMeansError::DegenerateAttribute { name, min, max });
        }
        Ok(Self { name, index, min, max })
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn index(&self) -> usize {
        self.index
    }
    pub fn min(&self) -> f64 {
        self.min
    }
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Normalize `v` into `[0, 1]` relative to the attribute's range.
    /// Values outside of the range are mapped outside of `[0, 1]`, without clamping.
    pub fn scaled_value(&self, v: f64) -> f64 {
        (v - self.min) / (self.max - self.min)
    }

    /// Inverse of [`ContinuousAttribute::scaled_value`].
    pub fn unscaled_value(&self, s: f64) -> f64 {
        self.min + s * (self.max - self.min)
    }
}

/// Categorical column descriptor with its set of allowed values.
///
/// Values iterate in sorted order. This order is what breaks ties when computing the mode of
/// a set of records.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiscreteAttribute {
    name: String,
    index: usize,
    values: BTreeSet<String>,
}
impl DiscreteAttribute {
    pub fn new<I, S>(name: impl Into<String>, index: usize, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { name: name.into(), index, values: values.into_iter().map(Into::into).collect() }
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn index(&self) -> usize {
        self.index
    }
    pub fn contains(&self, value: &str) -> bool {
        self.values.contains(value)
    }
    pub fn number_of_distinct_values(&self) -> usize {
        self.values.len()
    }
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(String::as_str)
    }
}

/// Typed column descriptor. Descriptors are created once per schema and then shared,
/// read-only, by every [`crate::Item`] bound to them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Attribute {
    Continuous(Arc<ContinuousAttribute>),
    Discrete(Arc<DiscreteAttribute>),
}
impl Attribute {
    pub fn name(&self) -> &str {
        match self {
            Attribute::Continuous(a) => a.name(),
            Attribute::Discrete(a) => a.name(),
        }
    }
    pub fn index(&self) -> usize {
        match self {
            Attribute::Continuous(a) => a.index(),
            Attribute::Discrete(a) => a.index(),
        }
    }
    pub fn is_numeric(&self) -> bool {
        matches!(self, Attribute::Continuous(_))
    }
}
impl From<ContinuousAttribute> for Attribute {
    fn from(a: ContinuousAttribute) -> Self {
        Attribute::Continuous(Arc::new(a))
    }
}
impl From<DiscreteAttribute> for Attribute {
    fn from(a: DiscreteAttribute) -> Self {
        Attribute::Discrete(Arc::new(a))
    }
}
impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
