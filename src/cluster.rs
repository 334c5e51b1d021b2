use crate::attribute::Attribute;
use crate::dataset::Dataset;
use crate::error::{KMeansError, Result};
use crate::item::Item;
use crate::tuple::Tuple;
use rand::RngCore;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A centroid plus the indices of the records currently assigned to it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    centroid: Tuple,
    members: BTreeSet<usize>,
}
impl Cluster {
    pub fn new(centroid: Tuple) -> Self {
        Self { centroid, members: BTreeSet::new() }
    }
    pub fn centroid(&self) -> &Tuple {
        &self.centroid
    }
    /// Member indices, ascending.
    pub fn members(&self) -> &BTreeSet<usize> {
        &self.members
    }
    pub fn len(&self) -> usize {
        self.members.len()
    }
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
    pub fn contains(&self, index: usize) -> bool {
        self.members.contains(&index)
    }
    /// Returns `true` if `index` was not a member before.
    pub fn add_member(&mut self, index: usize) -> bool {
        self.members.insert(index)
    }
    pub fn remove_member(&mut self, index: usize) {
        self.members.remove(&index);
    }

    /// Recompute every centroid item as the prototype of the current members.
    /// On error the centroid is left as it was.
    pub fn compute_centroid(&mut self, dataset: &Dataset) -> Result<()> {
        self.centroid = self.prototype_centroid(dataset)?;
        Ok(())
    }

    fn prototype_centroid(&self, dataset: &Dataset) -> Result<Tuple> {
        let mut centroid = self.centroid.clone();
        for item in centroid.items_mut() {
            let prototype = dataset.compute_prototype(&self.members, &item.attribute())?;
            item.update(prototype)?;
        }
        Ok(centroid)
    }
}

/// Fixed-size collection of `k` clusters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClusterSet {
    k: usize,
    clusters: Vec<Cluster>,
}
impl ClusterSet {
    /// Create an empty set for `k` clusters.
    ///
    /// ## Errors
    /// [`KMeansError::InvalidSampleSize`] if `k == 0`.
    pub fn new(k: usize) -> Result<Self> {
        if k == 0 {
            return Err(KMeansError::InvalidSampleSize { k, records: 0 });
        }
        Ok(Self { k, clusters: Vec::with_capacity(k) })
    }
    pub fn k(&self) -> usize {
        self.k
    }
    /// Number of clusters appended so far (`k` once seeded).
    pub fn len(&self) -> usize {
        self.clusters.len()
    }
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }
    pub fn is_seeded(&self) -> bool {
        self.clusters.len() == self.k
    }
    pub fn get(&self, i: usize) -> &Cluster {
        &self.clusters[i]
    }
    pub fn get_mut(&mut self, i: usize) -> &mut Cluster {
        &mut self.clusters[i]
    }
    pub fn iter(&self) -> std::slice::Iter<'_, Cluster> {
        self.clusters.iter()
    }

    /// Append a cluster.
    ///
    /// ## Errors
    /// [`KMeansError::ClusterSetFull`] if the set already holds `k` clusters.
    pub fn add(&mut self, cluster: Cluster) -> Result<()> {
        if self.is_seeded() {
            return Err(KMeansError::ClusterSetFull { k: self.k });
        }
        self.clusters.push(cluster);
        Ok(())
    }

    /// Seed all `k` clusters with the records of [`Dataset::sample_distinct_indices`] as centroids
    /// and no members.
    pub fn initialize_centroids(&mut self, dataset: &Dataset, rnd: &mut dyn RngCore) -> Result<()> {
        let indices = dataset.sample_distinct_indices(self.k, rnd)?;
        self.seed_from_indices(dataset, &indices)
    }

    /// Seed one cluster per index, using the index's record as centroid.
    /// Either all clusters are added, or the set is left unchanged.
    pub fn seed_from_indices(&mut self, dataset: &Dataset, indices: &[usize]) -> Result<()> {
        if self.clusters.len() + indices.len() > self.k {
            return Err(KMeansError::ClusterSetFull { k: self.k });
        }
        let records = dataset.number_of_examples();
        if indices.iter().any(|&i| i >= records) {
            return Err(KMeansError::InvalidSampleSize { k: indices.len(), records });
        }
        self.clusters.extend(indices.iter().map(|&i| Cluster::new(dataset.tuple_at(i))));
        Ok(())
    }

    /// Position of the cluster whose centroid is closest to `tuple`.
    /// Ties resolve to the cluster that comes first.
    pub fn nearest_cluster(&self, tuple: &Tuple) -> Result<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (ci, c) in self.clusters.iter().enumerate() {
            let d = tuple.distance(c.centroid())?;
            if best.map_or(true, |(_, best_d)| d < best_d) {
                best = Some((ci, d));
            }
        }
        best.map(|(ci, _)| ci).ok_or(KMeansError::NotSeeded)
    }

    /// Position of the cluster `index` is currently a member of.
    pub fn current_cluster_of(&self, index: usize) -> Option<usize> {
        self.clusters.iter().position(|c| c.contains(index))
    }

    /// Recompute all centroids from their members. Clusters are independent of each other, so
    /// they are refreshed in parallel. Either every centroid is replaced, or none is.
    pub fn update_centroids(&mut self, dataset: &Dataset) -> Result<()> {
        let centroids = self.clusters.par_iter()
            .map(|c| c.prototype_centroid(dataset))
            .collect::<Result<Vec<_>>>()?;
        for (cluster, centroid) in self.clusters.iter_mut().zip(centroids) {
            cluster.centroid = centroid;
        }
        Ok(())
    }

    /// Check the invariants every set built through this API holds, for sets that were decoded
    /// from elsewhere: `k >= 1`, at most `k` clusters, all centroids laid out over the same attributes with
    /// conforming values, and no record in more than one cluster.
    pub(crate) fn check_consistency(&self) -> std::result::Result<(), String> {
        if self.k == 0 {
            return Err("cluster set of size 0".to_owned());
        }
        if self.clusters.len() > self.k {
            return Err(format!("cluster set of size {} holds {} clusters", self.k, self.clusters.len()));
        }
        if let Some(first) = self.clusters.first() {
            let schema: Vec<Attribute> = first.centroid.items().iter().map(Item::attribute).collect();
            for (ci, c) in self.clusters.iter().enumerate() {
                let items = c.centroid.items();
                if items.len() != schema.len() {
                    return Err(format!("centroid {} holds {} of {} attributes", ci, items.len(), schema.len()));
                }
                for (pos, (item, attribute)) in items.iter().zip(&schema).enumerate() {
                    if attribute.index() != pos || item.attribute() != *attribute
                            || Item::bind(attribute, &item.value()).is_none() {
                        return Err(format!("centroid {} is inconsistent at attribute {}", ci, pos));
                    }
                }
            }
        }
        let mut seen = BTreeSet::new();
        for c in &self.clusters {
            if let Some(&dup) = c.members.iter().find(|&&i| !seen.insert(i)) {
                return Err(format!("record {} is a member of more than one cluster", dup));
            }
        }
        Ok(())
    }
}
impl<'a> IntoIterator for &'a ClusterSet {
    type Item = &'a Cluster;
    type IntoIter = std::slice::Iter<'a, Cluster>;
    fn into_iter(self) -> Self::IntoIter {
        self.clusters.iter()
    }
}
