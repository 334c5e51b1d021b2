use crate::{ClusterSet, Dataset, KMeansConfig, KMeansError, Result};
use tracing::debug;

#[inline(always)]
pub fn calculate(dataset: &Dataset, clusters: &mut ClusterSet, _config: &KMeansConfig<'_>, indices: Vec<usize>) -> Result<()> {
    let (k, records) = (clusters.k(), dataset.number_of_examples());
    if indices.len() != k {
        return Err(KMeansError::DimensionMismatch { expected: k, found: indices.len() });
    }
    if k >= records || indices.iter().any(|&i| i >= records) {
        return Err(KMeansError::InvalidSampleSize { k, records });
    }
    let duplicate = indices.iter().enumerate()
        .any(|(n, &i)| indices[..n].iter().any(|&j| dataset.example(i) == dataset.example(j)));
    if duplicate {
        return Err(KMeansError::InvalidSampleSize { k, records });
    }
    clusters.seed_from_indices(dataset, &indices)?;
    debug!(k, ?indices, "seeded centroids from precomputed records");
    Ok(())
}
