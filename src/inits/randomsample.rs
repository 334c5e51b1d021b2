use crate::{ClusterSet, Dataset, KMeansConfig, Result};
use std::ops::DerefMut;
use tracing::debug;

#[inline(always)]
pub fn calculate(dataset: &Dataset, clusters: &mut ClusterSet, config: &KMeansConfig<'_>) -> Result<()> {
    clusters.initialize_centroids(dataset, config.rnd.borrow_mut().deref_mut())?;
    debug!(k = clusters.k(), "seeded centroids from randomly sampled records");
    Ok(())
}
