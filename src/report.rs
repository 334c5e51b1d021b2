use crate::{Cluster, ClusterSet, Dataset, Result};
use std::fmt;

impl Cluster {
    /// Distance of every member to the centroid, in ascending member order.
    ///
    /// ## Errors
    /// [`crate::KMeansError::RecordOutOfRange`] when a member does not exist in **dataset**.
    pub fn member_distances(&self, dataset: &Dataset) -> Result<Vec<(usize, f64)>> {
        self.members().iter()
            .map(|&i| Ok((i, self.centroid().distance(dataset.try_tuple(i)?)?)))
            .collect()
    }

    /// Render the centroid, each member row with its distance to the centroid, and the
    /// average of those distances.
    pub fn report(&self, dataset: &Dataset) -> Result<String> {
        Ok(ClusterReport::new(self, dataset)?.to_string())
    }
}
impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Centroid=({})", self.centroid())
    }
}

/// Everything [`Cluster::report`] prints, computed up front.
struct ClusterReport<'a> {
    cluster: &'a Cluster,
    dataset: &'a Dataset,
    distances: Vec<(usize, f64)>,
    average: f64,
}
impl<'a> ClusterReport<'a> {
    fn new(cluster: &'a Cluster, dataset: &'a Dataset) -> Result<Self> {
        let distances = cluster.member_distances(dataset)?;
        let average = cluster.centroid().average_distance(dataset, cluster.members())?;
        Ok(Self { cluster, dataset, distances, average })
    }
}
impl fmt::Display for ClusterReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.cluster)?;
        writeln!(f, "Examples:")?;
        for &(i, d) in &self.distances {
            writeln!(f, "[{}] dist={}", self.dataset.example(i), d)?;
        }
        writeln!(f)?;
        write!(f, "AvgDistance={}", self.average)
    }
}

impl ClusterSet {
    /// Detailed report of all clusters against the dataset they were computed on.
    pub fn report(&self, dataset: &Dataset) -> Result<String> {
        let reports = self.iter()
            .map(|cluster| ClusterReport::new(cluster, dataset))
            .collect::<Result<Vec<_>>>()?;
        Ok(reports.iter().enumerate().map(|(i, r)| format!("{}:{}\n", i, r)).collect())
    }
}
/// Summary form: one centroid per line.
impl fmt::Display for ClusterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, cluster) in self.iter().enumerate() {
            writeln!(f, "{}:{}", i, cluster)?;
        }
        Ok(())
    }
}
