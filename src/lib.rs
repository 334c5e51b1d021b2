//! # kmeans-miner - API documentation
//!
//! kmeans-miner is a small rust library for k-means-clustering of the records of a table, whose
//! columns may be continuous (numeric) or discrete (categorical).
//!
//! ## Design target
//! Records are never turned into a plain numeric matrix. Instead, every column is described by an
//! [`Attribute`], and distances as well as cluster prototypes are computed per attribute:
//! - continuous: values are scaled into `[0, 1]` using the column's MIN/MAX, the distance is the
//!   absolute difference of the scaled values, and the prototype is the mean
//! - discrete: the distance is `0` for equal values and `1` otherwise, the prototype is the mode
//!
//! The distance between two records is the sum of their per-attribute distances.
//!
//! ## Supported centroid initializations
//! The outcome of each run depends on the initial centroids. For a list of implemented
//! initialization methods, see [`KMeansMiner`].
//!
//! ## Example
//! ```rust
//! use kmeans_miner::*;
//!
//! fn main() {
//!     let mut tables = MemoryTable::new();
//!     tables.create_table("weather", &[("outlook", false), ("temperature", true)]);
//!     for (outlook, temperature) in [("sunny", 30.0), ("sunny", 27.0), ("rain", 12.0), ("rain", 9.0)] {
//!         tables.insert("weather", vec![outlook.into(), temperature.into()]).unwrap();
//!     }
//!     let data = Dataset::from_table(&tables, "weather").unwrap();
//!
//!     let mut miner = KMeansMiner::new(2).unwrap();
//!     let iterations = miner.run(&data, &KMeansConfig::default()).unwrap();
//!
//!     println!("Iterations: {}", iterations);
//!     println!("{}", miner.cluster_set());
//! }
//! ```
//!
//! ## Example (using the status event callbacks)
//! ```rust
//! use kmeans_miner::*;
//! use rand::prelude::*;
//!
//! fn main() {
//!     let schema = vec![ContinuousAttribute::new("x", 0, 0.0, 1.0).unwrap().into()];
//!     let mut rnd = StdRng::seed_from_u64(1337);
//!     let rows = (0..1000).map(|_| Example::new(vec![Value::from(rnd.gen::<f64>())])).collect();
//!     let data = Dataset::new(schema, rows).unwrap();
//!
//!     let conf = KMeansConfig::build()
//!         .init_done(&|_| println!("Initialization completed."))
//!         .iteration_done(&|_, nr, reassigned| println!("Iteration {} - Reassigned: {}", nr, reassigned))
//!         .random_generator(rnd)
//!         .abort_strategy(AbortStrategy::MaxIterations { max_iter: 500 })
//!         .build();
//!
//!     let mut miner = KMeansMiner::new(4).unwrap();
//!     match miner.run(&data, &conf) {
//!         Ok(iterations) => println!("Converged after {} iterations:\n{}", iterations, miner.cluster_set()),
//!         Err(e) => println!("{}", e),
//!     }
//! }
//! ```
//!
//! ## Short API-Overview / Description
//! Records are read through a [`TableReader`] (e.g. the in-memory [`MemoryTable`]) into an immutable
//! [`Dataset`], which holds the distinct rows and the schema derived from the table's columns.
//!
//! Entry-point of the clustering is the [`KMeansMiner`] struct. [`KMeansMiner::run`] repeatedly assigns
//! every record to the cluster with the nearest centroid and recomputes the centroids, until an iteration
//! does not move any record. The result is a [`ClusterSet`], which can be rendered
//! ([`ClusterSet::report`]) and persisted ([`KMeansMiner::save`], [`service::serialize`]).
//!
//! The [`service`] module bundles these operations for remote clients, with one [`service::Session`]
//! per client.

#[cfg(test)]
#[macro_use] mod helpers;
mod error;
mod value;
mod attribute;
mod item;
mod tuple;
mod table;
mod dataset;
mod cluster;
mod report;
mod api;
mod variants;
mod inits;
mod abort_strategy;
pub mod service;

pub use abort_strategy::AbortStrategy;
pub use api::{KMeansConfig, KMeansConfigBuilder, KMeansMiner, MinerState};
pub use attribute::{Attribute, ContinuousAttribute, DiscreteAttribute};
pub use cluster::{Cluster, ClusterSet};
pub use dataset::Dataset;
pub use error::{KMeansError, Result};
pub use item::{ContinuousItem, DiscreteItem, Item};
pub use table::{Aggregate, Column, MemoryTable, TableReader};
pub use tuple::Tuple;
pub use value::{Example, Value};


#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::testing::assert_partition_eq;
    use rand::prelude::*;

    fn table(rows: &[(&str, f64)]) -> MemoryTable {
        let mut tables = MemoryTable::new();
        tables.create_table("t", &[("label", false), ("x", true)]);
        for &(label, x) in rows {
            tables.insert("t", vec![Value::from(label), Value::from(x)]).unwrap();
        }
        tables
    }

    #[test]
    fn outlier_is_separated_for_any_seed() {
        let mut tables = MemoryTable::new();
        tables.create_table("t", &[("x", true)]);
        for x in [1.0, 2.0, 3.0, 100.0] {
            tables.insert("t", vec![Value::from(x)]).unwrap();
        }
        let data = Dataset::from_table(&tables, "t").unwrap();
        for seed in 0..32 {
            let conf = KMeansConfig::build().random_generator(StdRng::seed_from_u64(seed)).build();
            let mut miner = KMeansMiner::new(2).unwrap();
            miner.run(&data, &conf).unwrap();
            assert_partition_eq(miner.cluster_set(), &[&[0, 1, 2], &[3]]);
        }
    }

    #[test]
    fn discrete_majority_prototypes() {
        let schema = vec![DiscreteAttribute::new("v", 0, ["A", "B"]).into()];
        let rows = ["A", "A", "A", "B"].iter().map(|&v| Example::new(vec![Value::from(v)])).collect();
        let data = Dataset::new(schema, rows).unwrap();
        let mut miner = KMeansMiner::new(2).unwrap();
        miner.run(&data, &KMeansConfig::build().random_generator(StdRng::seed_from_u64(3)).build()).unwrap();

        assert_partition_eq(miner.cluster_set(), &[&[0, 1, 2], &[3]]);
        for cluster in miner.cluster_set() {
            let expected = if cluster.contains(3) { "B" } else { "A" };
            assert_eq!(cluster.centroid().items()[0].value(), Value::from(expected));
        }
    }

    #[test]
    fn sample_size_edge() {
        let data = Dataset::from_table(&table(&[("a", 1.0), ("b", 2.0), ("c", 3.0), ("d", 4.0)]), "t").unwrap();
        let conf = KMeansConfig::default();
        assert!(KMeansMiner::new(3).unwrap().run(&data, &conf).is_ok());
        assert!(matches!(
            KMeansMiner::new(4).unwrap().run(&data, &conf),
            Err(KMeansError::InvalidSampleSize { k: 4, records: 4 })
        ));
    }

    #[test]
    fn mixed_attributes_converge_to_fixpoint() {
        let data = Dataset::from_table(&table(&[
            ("cold", 1.0), ("cold", 4.0), ("cold", 2.5), ("warm", 21.0), ("warm", 24.0), ("hot", 38.0), ("hot", 35.5), ("warm", 19.0),
        ]), "t").unwrap();
        let last_reassigned = std::cell::Cell::new(usize::MAX);
        let iteration_done = |_: &ClusterSet, _: usize, reassigned: usize| last_reassigned.set(reassigned);
        let conf = KMeansConfig::build()
            .random_generator(StdRng::seed_from_u64(99))
            .iteration_done(&iteration_done)
            .build();

        let mut miner = KMeansMiner::new(3).unwrap();
        miner.run(&data, &conf).unwrap();
        assert_eq!(last_reassigned.get(), 0);

        let mut refreshed = miner.cluster_set().clone();
        refreshed.update_centroids(&data).unwrap();
        assert_eq!(&refreshed, miner.cluster_set());
    }

    #[test]
    fn persisted_clustering_matches() {
        let data = Dataset::from_table(&table(&[("a", 1.0), ("a", 2.0), ("b", 9.0), ("b", 10.0)]), "t").unwrap();
        let mut miner = KMeansMiner::new(2).unwrap();
        miner.run(&data, &KMeansConfig::default()).unwrap();

        let restored = KMeansMiner::from_bytes(&miner.to_bytes().unwrap()).unwrap();
        assert_eq!(restored.cluster_set(), miner.cluster_set());
        assert_eq!(restored.cluster_set().report(&data).unwrap(), miner.cluster_set().report(&data).unwrap());
    }
}
