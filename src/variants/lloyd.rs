use crate::{ClusterSet, Dataset, KMeansConfig, KMeansError, Result};
use rayon::prelude::*;
use tracing::{info, trace, warn};

pub(crate) struct Lloyd;
impl Lloyd {
    /// Move every record into the cluster with the nearest centroid.
    /// Returns the amount of records whose membership changed.
    fn update_cluster_assignments(data: &Dataset, clusters: &mut ClusterSet) -> Result<usize> {
        // Centroids stay fixed during an assignment pass, so the nearest clusters can be searched in parallel
        let nearest = (0..data.number_of_examples()).into_par_iter()
            .map(|i| clusters.nearest_cluster(data.tuple(i)))
            .collect::<Result<Vec<usize>>>()?;

        let mut reassigned = 0;
        for (i, new_cluster) in nearest.into_iter().enumerate() {
            let old_cluster = clusters.current_cluster_of(i);
            if clusters.get_mut(new_cluster).add_member(i) {
                reassigned += 1;
                if let Some(old_cluster) = old_cluster {
                    clusters.get_mut(old_cluster).remove_member(i);
                }
            }
        }
        Ok(reassigned)
    }

    /// Build a fresh set of `k` clusters and seed it with **init**.
    pub fn seed<F>(data: &Dataset, k: usize, init: F, config: &KMeansConfig<'_>) -> Result<ClusterSet>
                where F: FnOnce(&Dataset, &mut ClusterSet, &KMeansConfig<'_>) -> Result<()> {
        let mut clusters = ClusterSet::new(k)?;

        // Initialize clusters and notify subscriber
        init(data, &mut clusters, config)?;
        if !clusters.is_seeded() {
            return Err(KMeansError::InvalidSampleSize { k, records: data.number_of_examples() });
        }
        (config.init_done)(&clusters);
        Ok(clusters)
    }

    /// One assignment pass followed by a centroid refresh.
    /// Returns the amount of reassigned records.
    pub fn iterate(data: &Dataset, clusters: &mut ClusterSet) -> Result<usize> {
        let reassigned = Self::update_cluster_assignments(data, clusters)?;
        clusters.update_centroids(data)?;
        Ok(reassigned)
    }

    pub fn calculate<F>(data: &Dataset, k: usize, init: F, config: &KMeansConfig<'_>) -> Result<(usize, ClusterSet)>
                where F: FnOnce(&Dataset, &mut ClusterSet, &KMeansConfig<'_>) -> Result<()> {
        let mut clusters = Self::seed(data, k, init, config)?;
        let mut abort_strategy = config.abort_strategy.create_logic();

        let mut iteration = 0;
        loop {
            iteration += 1;
            let reassigned = Self::iterate(data, &mut clusters)?;
            trace!(iteration, reassigned, "iteration done");

            // Notify subscriber about finished iteration
            (config.iteration_done)(&clusters, iteration, reassigned);
            if reassigned == 0 {
                break;
            }
            if !abort_strategy.next(reassigned) {
                warn!(iterations = iteration, reassigned, "aborting before a stable assignment was reached");
                return Err(KMeansError::NotConverged { iterations: iteration });
            }
        }

        info!(k, records = data.number_of_examples(), iterations = iteration, "clustering converged");
        Ok((iteration, clusters))
    }
}
