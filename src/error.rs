use thiserror::Error;

pub type Result<T> = std::result::Result<T, KMeansError>;

/// Every way an operation of this crate can be rejected.
///
/// A rejected operation leaves the previously existing state (a [`crate::Dataset`], or the
/// [`crate::ClusterSet`] of a [`crate::KMeansMiner`]) untouched.
#[derive(Error, Debug)]
pub enum KMeansError {
    #[error("table '{table}' has no distinct rows")]
    EmptyResult { table: String },

    #[error("no aggregate value for column '{column}' of table '{table}'")]
    NoAggregateValue { table: String, column: String },

    #[error("sample size {k} out of range: expected 1 <= k < {records}")]
    InvalidSampleSize { k: usize, records: usize },

    #[error("record {index} out of range: dataset holds {records} records")]
    RecordOutOfRange { index: usize, records: usize },

    #[error("dimension mismatch: expected {expected} values, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("incompatible items at position {position}: continuous and discrete values can not be mixed")]
    IncompatibleItems { position: usize },

    #[error("value of attribute '{attribute}' in row {row} does not conform to its domain")]
    InvalidValue { row: usize, attribute: String },

    #[error("continuous attribute '{name}' has a degenerate range [{min}, {max}]")]
    DegenerateAttribute { name: String, min: f64, max: f64 },

    #[error("cluster set already holds all of its {k} clusters")]
    ClusterSetFull { k: usize },

    #[error("unknown table '{table}'")]
    UnknownTable { table: String },

    #[error("unknown column '{column}' in table '{table}'")]
    UnknownColumn { table: String, column: String },

    #[error("no table has been loaded yet")]
    NoTable,

    #[error("no clustering has been computed yet")]
    NotSeeded,

    #[error("clustering did not converge within {iterations} iterations")]
    NotConverged { iterations: usize },

    #[error("serialization failure: {0}")]
    SerializationFailure(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<rmp_serde::encode::Error> for KMeansError {
    fn from(e: rmp_serde::encode::Error) -> Self {
        KMeansError::SerializationFailure(e.to_string())
    }
}

impl From<rmp_serde::decode::Error> for KMeansError {
    fn from(e: rmp_serde::decode::Error) -> Self {
        KMeansError::SerializationFailure(e.to_string())
    }
}
