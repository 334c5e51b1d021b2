#[cfg(test)]
macro_rules! assert_approx_eq {
	($left: expr, $right: expr, $tol: expr) => ({
		match ($left, $right, $tol) {
			(left_val , right_val, tol_val) => {
				let delta = (left_val - right_val).abs();
				if !(delta < tol_val) {
					panic!(
						"assertion failed: `(left ≈ right)` \
						(left: `{}`, right: `{}`) \
						with ∆={:1.1e} (allowed ∆={:e})",
						left_val , right_val, delta, tol_val
					)
				}
			}
		}
	});
	($left: expr, $right: expr) => (assert_approx_eq!(($left), ($right), 1e-12))
}

#[cfg(test)]
pub(crate) mod testing {
	use std::collections::BTreeSet;
	use crate::ClusterSet;

	/// Compare the memberships of `actual` against the expected groups of record indices,
	/// independent of the order the clusters ended up in.
	pub fn assert_partition_eq(actual: &ClusterSet, should: &[&[usize]]) {
		assert_eq!(actual.len(), should.len(), "cluster count differs");
		let mut actual_groups: Vec<BTreeSet<usize>> = actual.iter().map(|c| c.members().clone()).collect();
		let mut should_groups: Vec<BTreeSet<usize>> = should.iter().map(|g| g.iter().cloned().collect()).collect();
		actual_groups.sort();
		should_groups.sort();
		if actual_groups != should_groups {
			panic!("Cluster memberships differ.\nActual: {:?}\nShould: {:?}", actual_groups, should_groups);
		}
	}
}


#[cfg(test)]
mod tests {
	use super::testing::assert_partition_eq;
	use crate::{ClusterSet, Dataset, DiscreteAttribute, Example, Value};

	fn two_clusters() -> ClusterSet {
		let schema = vec![DiscreteAttribute::new("c", 0, ["a", "b"]).into()];
		let data = Dataset::new(schema, vec![Example::new(vec![Value::from("a")]), Example::new(vec![Value::from("b")])]).unwrap();
		let mut cs = ClusterSet::new(2).unwrap();
		cs.seed_from_indices(&data, &[1, 0]).unwrap();
		cs.get_mut(0).add_member(1);
		cs.get_mut(1).add_member(0);
		cs
	}

	#[test]
	fn partition_order_does_not_matter() {
		assert_partition_eq(&two_clusters(), &[&[0], &[1]]);
		assert_partition_eq(&two_clusters(), &[&[1], &[0]]);
	}

	#[test]
	#[should_panic(expected = "Cluster memberships differ")]
	fn partition_mismatch_panics() {
		assert_partition_eq(&two_clusters(), &[&[0, 1], &[]]);
	}

	#[test]
	fn approx_eq() {
		assert_approx_eq!(0.1f64 + 0.2, 0.3);
		assert_approx_eq!(1.0f64, 1.05, 0.1);
	}
}
