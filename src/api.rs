use crate::{AbortStrategy, ClusterSet, Dataset, KMeansError, Result};
use std::cell::RefCell;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use rand::prelude::*;
use tracing::debug;

pub type InitDoneCallbackFn<'a> = &'a dyn Fn(&ClusterSet);
pub type IterationDoneCallbackFn<'a> = &'a dyn Fn(&ClusterSet, usize, usize);

/// This is a structure holding various configuration options for a clustering run, such as
/// the random number generator to use, or a couple of callbacks, that can be set to get status information from
/// a running clustering.
///
/// For a more detailed information about all possible options, have a look at [`KMeansConfigBuilder`].
pub struct KMeansConfig<'a> {
    /// Callback that is called, when the initialization phase finished
    /// ## Arguments
    /// - **clusters**: The seeded [`ClusterSet`], all clusters still without members
    pub(crate) init_done: InitDoneCallbackFn<'a>,
    /// Callback that is called after each iteration
    /// ## Arguments
    /// - **clusters**: [`ClusterSet`] after the iteration's centroid refresh
    /// - **iteration_id**: Number of the current iteration (starting at 1)
    /// - **reassigned**: Amount of records that changed their cluster in this iteration
    pub(crate) iteration_done: IterationDoneCallbackFn<'a>,
    /// Random number generator to use
    pub(crate) rnd: Box<RefCell<dyn RngCore>>,
    /// The abort-strategy to use for the running calculation
    pub(crate) abort_strategy: AbortStrategy
}
impl<'a> Default for KMeansConfig<'a> {
    fn default() -> Self {
        Self {
            init_done: &|_| {},
            iteration_done: &|_, _, _| {},
            rnd: Box::new(RefCell::new(rand::thread_rng())),
            abort_strategy: AbortStrategy::UntilStable
        }
    }
}
impl<'a> KMeansConfig<'a> {
    /// Use the [`KMeansConfigBuilder`] to build a [`KMeansConfig`] instance.
    pub fn build() -> KMeansConfigBuilder<'a> {
        KMeansConfigBuilder { config: KMeansConfig::default() }
    }
}
impl<'a> std::fmt::Debug for KMeansConfig<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KMeansConfig").field("abort_strategy", &self.abort_strategy).finish_non_exhaustive()
    }
}

pub struct KMeansConfigBuilder<'a> {
    config: KMeansConfig<'a>
}
impl<'a> KMeansConfigBuilder<'a> {
    /// Set the callback that should be called after the centroid initialization, before the iteration starts.
    pub fn init_done(mut self, init_done: InitDoneCallbackFn<'a>) -> Self {
        self.config.init_done = init_done; self
    }
    /// Set the callback that should be called after each iteration during a running clustering.
    pub fn iteration_done(mut self, iteration_done: IterationDoneCallbackFn<'a>) -> Self {
        self.config.iteration_done = iteration_done; self
    }
    /// Set the random number generator that should be used to sample the initial centroids.
    /// Use a seeded generator for deterministically repeatable results.
    pub fn random_generator<R: RngCore + 'static>(mut self, rnd: R) -> Self {
        self.config.rnd = Box::new(RefCell::new(rnd)); self
    }
    /// Set the abort-strategy to use during a running clustering. For more information,
    /// see documentation of [`AbortStrategy`].
    /// ## Default
    /// [`AbortStrategy::UntilStable`]
    pub fn abort_strategy(mut self, abort_strategy: AbortStrategy) -> Self {
        self.config.abort_strategy = abort_strategy; self
    }
    /// Return the internally built configuration structure.
    pub fn build(self) -> KMeansConfig<'a> { self.config }
}


/// Lifecycle of a [`KMeansMiner`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MinerState {
    /// No clustering has been computed (or loaded) yet
    Unseeded,
    /// Centroids are seeded ([`KMeansMiner::seed_with`]) and the last [`KMeansMiner::step`]
    /// still moved records
    Assigning,
    /// The last run or step ended with an iteration that reassigned no record
    Converged
}


/// Entrypoint of this crate's API-Surface.
///
/// A miner is created for a fixed amount of clusters **k**. Running it on a [`Dataset`] computes a
/// fresh [`ClusterSet`], which the miner then holds until the next run (or load). A failed run keeps
/// the previously held clustering.
///
/// ## Supported initialization methods
/// - Distinct random sample [`KMeansMiner::init_distinct_sample`] (default)
/// - Precomputed record indices [`KMeansMiner::init_precomputed`]
#[derive(Clone, Debug)]
pub struct KMeansMiner {
    clusters: ClusterSet,
    state: MinerState
}
impl KMeansMiner {
    /// Create a new, unseeded miner for **k** clusters.
    ///
    /// ## Errors
    /// [`KMeansError::InvalidSampleSize`] if `k == 0`.
    pub fn new(k: usize) -> Result<Self> {
        Ok(Self { clusters: ClusterSet::new(k)?, state: MinerState::Unseeded })
    }

    pub fn k(&self) -> usize {
        self.clusters.k()
    }
    pub fn state(&self) -> MinerState {
        self.state
    }
    /// The clustering computed by the last successful run (empty while unseeded).
    pub fn cluster_set(&self) -> &ClusterSet {
        &self.clusters
    }

    /// Iteratively refine **k** clusters over **dataset**, until an iteration reassigns no record.
    /// Initial centroids are drawn with [`KMeansMiner::init_distinct_sample`].
    ///
    /// ## Returns
    /// The amount of iterations that were executed (at least 1).
    ///
    /// ## Example
    /// ```rust
    /// use kmeans_miner::*;
    ///
    /// let schema = vec![ContinuousAttribute::new("x", 0, 1.0, 100.0).unwrap().into()];
    /// let rows = [1.0, 2.0, 3.0, 100.0].iter().map(|&v| Example::new(vec![Value::from(v)])).collect();
    /// let data = Dataset::new(schema, rows).unwrap();
    ///
    /// let mut miner = KMeansMiner::new(2).unwrap();
    /// let iterations = miner.run(&data, &KMeansConfig::default()).unwrap();
    ///
    /// println!("Iterations: {}", iterations);
    /// println!("{}", miner.cluster_set().report(&data).unwrap());
    /// ```
    pub fn run(&mut self, dataset: &Dataset, config: &KMeansConfig<'_>) -> Result<usize> {
        self.run_with(dataset, KMeansMiner::init_distinct_sample, config)
    }

    /// Same as [`KMeansMiner::run`], using **init** to seed the centroids.
    pub fn run_with<F>(&mut self, dataset: &Dataset, init: F, config: &KMeansConfig<'_>) -> Result<usize>
            where F: FnOnce(&Dataset, &mut ClusterSet, &KMeansConfig<'_>) -> Result<()> {
        let (iterations, clusters) = crate::variants::Lloyd::calculate(dataset, self.k(), init, config)?;
        self.clusters = clusters;
        self.state = MinerState::Converged;
        Ok(iterations)
    }

    /// Seed fresh centroids with **init**, without assigning any record yet. The clustering is then
    /// advanced one iteration at a time with [`KMeansMiner::step`].
    pub fn seed_with<F>(&mut self, dataset: &Dataset, init: F, config: &KMeansConfig<'_>) -> Result<()>
            where F: FnOnce(&Dataset, &mut ClusterSet, &KMeansConfig<'_>) -> Result<()> {
        self.clusters = crate::variants::Lloyd::seed(dataset, self.k(), init, config)?;
        self.state = MinerState::Assigning;
        Ok(())
    }

    /// Run a single iteration (assignment pass plus centroid refresh) on the held clustering.
    ///
    /// ## Returns
    /// The amount of reassigned records. Once that is `0`, the miner is [`MinerState::Converged`].
    ///
    /// ## Errors
    /// [`KMeansError::NotSeeded`] on an unseeded miner. On any error the held clustering is kept.
    pub fn step(&mut self, dataset: &Dataset) -> Result<usize> {
        if self.state == MinerState::Unseeded {
            return Err(KMeansError::NotSeeded);
        }
        let mut clusters = self.clusters.clone();
        let reassigned = crate::variants::Lloyd::iterate(dataset, &mut clusters)?;
        self.clusters = clusters;
        self.state = if reassigned == 0 { MinerState::Converged } else { MinerState::Assigning };
        debug!(reassigned, state = ?self.state, "stepped clustering");
        Ok(reassigned)
    }

    /// Random sample initialization method
    ///
    /// ## Description
    /// Selects **k** records at random as initial centroids, never two records holding identical values.
    ///
    /// ## Note
    /// This method is not meant for direct invocation. Pass a reference to it, to [`KMeansMiner::run_with`].
    pub fn init_distinct_sample(dataset: &Dataset, clusters: &mut ClusterSet, config: &KMeansConfig<'_>) -> Result<()> {
        crate::inits::randomsample::calculate(dataset, clusters, config)
    }

    /// Precomputed initialization method
    ///
    /// ## Description
    /// Seeds the centroids with the given record indices, in order. There have to be exactly **k** of them,
    /// referencing pairwise different records.
    pub fn init_precomputed(indices: Vec<usize>) -> impl FnOnce(&Dataset, &mut ClusterSet, &KMeansConfig<'_>) -> Result<()> {
        move |dataset, clusters, config| crate::inits::precomputed::calculate(dataset, clusters, config, indices)
    }

    /// Encode the held clustering (centroids with their attributes, and memberships) into **writer**.
    ///
    /// ## Errors
    /// [`KMeansError::NotSeeded`] if no clustering has been computed.
    pub fn save<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
        let bytes = self.to_bytes()?;
        writer.write_all(&bytes)?;
        writer.flush()?;
        debug!(bytes = bytes.len(), "saved cluster set");
        Ok(())
    }

    /// Decode a clustering previously written by [`KMeansMiner::save`].
    pub fn load<R: Read>(mut reader: R) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        debug!(bytes = bytes.len(), "loading cluster set");
        Self::from_bytes(&bytes)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        if self.state == MinerState::Unseeded {
            return Err(KMeansError::NotSeeded);
        }
        crate::service::serialize(&self.clusters)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let clusters = crate::service::deserialize(bytes)?;
        if !clusters.is_seeded() {
            return Err(KMeansError::SerializationFailure(format!(
                "stored cluster set holds {} of its {} clusters", clusters.len(), clusters.k())));
        }
        Ok(Self { clusters, state: MinerState::Converged })
    }

    pub fn save_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        self.save(&mut out)
    }

    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::load(BufReader::new(File::open(path)?))
    }
}
