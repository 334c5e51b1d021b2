//! Operations offered to remote clients, and the state a single client works on.
use crate::{ClusterSet, Dataset, KMeansConfig, KMeansError, KMeansMiner, Result, TableReader};
use std::path::Path;
use tracing::debug;

/// Compute `k` clusters over `dataset`, returning the iteration count and the final clusters.
pub fn run(dataset: &Dataset, k: usize, config: &KMeansConfig<'_>) -> Result<(usize, ClusterSet)> {
    let mut miner = KMeansMiner::new(k)?;
    let iterations = miner.run(dataset, config)?;
    Ok((iterations, miner.cluster_set().clone()))
}

/// Encode a cluster set (centroids, attribute bindings and memberships) into an opaque blob.
pub fn serialize(clusters: &ClusterSet) -> Result<Vec<u8>> {
    let bytes = rmp_serde::to_vec_named(clusters)?;
    debug!(bytes = bytes.len(), clusters = clusters.len(), "serialized cluster set");
    Ok(bytes)
}

/// Decode a blob written by [`serialize`].
///
/// ## Errors
/// [`KMeansError::SerializationFailure`] when the blob is malformed, or decodes to a set no
/// clustering could have produced: `k == 0`, more than `k` clusters, centroids over differing
/// or degenerate attributes, or a record assigned to several clusters.
pub fn deserialize(bytes: &[u8]) -> Result<ClusterSet> {
    let clusters: ClusterSet = rmp_serde::from_slice(bytes)?;
    clusters.check_consistency().map_err(KMeansError::SerializationFailure)?;
    debug!(bytes = bytes.len(), clusters = clusters.len(), "deserialized cluster set");
    Ok(clusters)
}

/// Result of [`Session::cluster`].
#[derive(Clone, Debug)]
pub struct ClusteringOutcome {
    pub iterations: usize,
    /// Data listing, iteration count and the detailed cluster report
    pub text: String,
    pub clusters: ClusterSet,
}

/// Everything one client has loaded or computed so far.
pub struct Session<R: TableReader> {
    reader: R,
    dataset: Option<Dataset>,
    miner: Option<KMeansMiner>,
}
impl<R: TableReader> Session<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, dataset: None, miner: None }
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }
    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    /// Replace the session's dataset by the distinct rows of `table`.
    /// On failure the previously loaded dataset is kept.
    pub fn load_table(&mut self, table: &str) -> Result<&Dataset> {
        let dataset = Dataset::from_table(&self.reader, table)?;
        Ok(self.dataset.insert(dataset))
    }

    pub fn cluster(&mut self, k: usize, config: &KMeansConfig<'_>) -> Result<ClusteringOutcome> {
        let dataset = self.dataset.as_ref().ok_or(KMeansError::NoTable)?;
        let mut miner = KMeansMiner::new(k)?;
        let iterations = miner.run(dataset, config)?;
        let text = format!(
            "Data Examples:\n{}\nIterations: {}\n\n{}",
            dataset, iterations, miner.cluster_set().report(dataset)?);
        let clusters = miner.cluster_set().clone();
        self.miner = Some(miner);
        Ok(ClusteringOutcome { iterations, text, clusters })
    }

    /// Store the last computed clustering at `path`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.miner.as_ref().ok_or(KMeansError::NotSeeded)?.save_file(path)
    }

    /// Load a stored clustering, making it the session's current one, and return its summary.
    pub fn open<P: AsRef<Path>>(&mut self, path: P) -> Result<String> {
        let miner = KMeansMiner::load_file(path)?;
        let summary = miner.cluster_set().to_string();
        self.miner = Some(miner);
        Ok(summary)
    }
}
