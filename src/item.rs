use crate::attribute::{Attribute, ContinuousAttribute, DiscreteAttribute};
use crate::error::{KMeansError, Result};
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContinuousItem {
    attribute: Arc<ContinuousAttribute>,
    value: f64,
}
impl ContinuousItem {
    pub fn new(attribute: Arc<ContinuousAttribute>, value: f64) -> Self {
        Self { attribute, value }
    }
    pub fn attribute(&self) -> &ContinuousAttribute {
        &self.attribute
    }
    pub fn value(&self) -> f64 {
        self.value
    }
    /// `|scale(self) - scale(other)|`, each value scaled by its own attribute.
    pub fn distance(&self, other: &ContinuousItem) -> f64 {
        (self.attribute.scaled_value(self.value) - other.attribute.scaled_value(other.value)).abs()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiscreteItem {
    attribute: Arc<DiscreteAttribute>,
    value: String,
}
impl DiscreteItem {
    pub fn new(attribute: Arc<DiscreteAttribute>, value: impl Into<String>) -> Self {
        Self { attribute, value: value.into() }
    }
    pub fn attribute(&self) -> &DiscreteAttribute {
        &self.attribute
    }
    pub fn value(&self) -> &str {
        &self.value
    }
    pub fn distance(&self, other: &DiscreteItem) -> f64 {
        if self.value == other.value { 0.0 } else { 1.0 }
    }
}

/// An attribute-value pair. The variant always matches the variant of the bound attribute.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Item {
    Continuous(ContinuousItem),
    Discrete(DiscreteItem),
}
impl Item {
    /// Bind `value` to `attribute`, checking that the value conforms to it.
    /// Returns [`None`] for a number bound to a discrete attribute (or vice versa), or for
    /// a string outside of the discrete attribute's domain.
    pub fn bind(attribute: &Attribute, value: &Value) -> Option<Self> {
        match (attribute, value) {
            (Attribute::Continuous(a), Value::Number(v)) => Some(Item::Continuous(ContinuousItem::new(a.clone(), *v))),
            (Attribute::Discrete(a), Value::Text(s)) if a.contains(s) => {
                Some(Item::Discrete(DiscreteItem::new(a.clone(), s.as_str())))
            }
            _ => None,
        }
    }

    pub fn attribute(&self) -> Attribute {
        match self {
            Item::Continuous(i) => Attribute::Continuous(i.attribute.clone()),
            Item::Discrete(i) => Attribute::Discrete(i.attribute.clone()),
        }
    }

    pub fn value(&self) -> Value {
        match self {
            Item::Continuous(i) => Value::Number(i.value),
            Item::Discrete(i) => Value::Text(i.value.clone()),
        }
    }

    /// Distance to an item of the same variant.
    ///
    /// ## Errors
    /// [`KMeansError::IncompatibleItems`] when a continuous item is compared with a discrete one.
    pub fn distance(&self, other: &Item) -> Result<f64> {
        match (self, other) {
            (Item::Continuous(a), Item::Continuous(b)) => Ok(a.distance(b)),
            (Item::Discrete(a), Item::Discrete(b)) => Ok(a.distance(b)),
            _ => Err(KMeansError::IncompatibleItems { position: self.attribute().index() }),
        }
    }

    /// Replace the item's value by a prototype as returned by [`crate::Dataset::compute_prototype`].
    ///
    /// Continuous prototypes are given in scaled form and are stored back in the attribute's raw
    /// domain, so that [`Item::distance`] keeps comparing values of the same scale.
    pub fn update(&mut self, prototype: Value) -> Result<()> {
        match (self, prototype) {
            (Item::Continuous(i), Value::Number(scaled)) => {
                i.value = i.attribute.unscaled_value(scaled);
                Ok(())
            }
            (Item::Discrete(i), Value::Text(value)) => {
                i.value = value;
                Ok(())
            }
            (item, _) => Err(KMeansError::IncompatibleItems { position: item.attribute().index() }),
        }
    }
}
impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Item::Continuous(i) => write!(f, "{}", i.value),
            Item::Discrete(i) => f.write_str(&i.value),
        }
    }
}
