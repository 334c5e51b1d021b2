/// Enum with possible abort strategies.
/// These strategies specify when a running clustering is aborted before reaching a stable assignment.
/// A run always stops on the first iteration that reassigned no record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AbortStrategy {
	/// Keep iterating until an iteration reassigns no record, however long that takes.
	#[default]
	UntilStable,
	/// Give up after **max_iter** iterations that all still reassigned records.
	/// ## Fields:
	/// - **max_iter**: Upper bound on the number of iterations
	MaxIterations { max_iter: usize }
}
impl AbortStrategy {
	pub(crate) fn create_logic(&self) -> Box<dyn AbortStrategyLogic> {
		match *self {
			AbortStrategy::UntilStable => Box::new(UntilStableLogic),
			AbortStrategy::MaxIterations{max_iter} => Box::new(MaxIterationsLogic {
				max_iter,
				iterations: 0
			})
		}
	}
}

pub(crate) trait AbortStrategyLogic {
	/// Function that has to be called once an iteration that reassigned records ended.
	/// ## Arguments
	/// - **reassigned**: Amount of records that changed their cluster during the iteration
	/// ## Returns
	/// - **true** if the calculation should continue
	/// - **false** if the calculation should abort
	fn next(&mut self, reassigned: usize) -> bool;
}


pub(crate) struct UntilStableLogic;
impl AbortStrategyLogic for UntilStableLogic {
	fn next(&mut self, _reassigned: usize) -> bool {
		true
	}
}


pub(crate) struct MaxIterationsLogic {
	max_iter: usize,
	iterations: usize
}
impl AbortStrategyLogic for MaxIterationsLogic {
	fn next(&mut self, _reassigned: usize) -> bool {
		self.iterations += 1;
		self.iterations < self.max_iter
	}
}


#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_until_stable() {
		let mut abort_strategy = AbortStrategy::UntilStable.create_logic();
		for _ in 0..10_000 {
			assert_eq!(abort_strategy.next(1), true);
		}
	}

	#[test]
	fn test_max_iterations() {
		{
			let mut abort_strategy = AbortStrategy::MaxIterations { max_iter: 1 }.create_logic();
			assert_eq!(abort_strategy.next(4), false);
		}
		{
			let mut abort_strategy = AbortStrategy::MaxIterations { max_iter: 3 }.create_logic();
			assert_eq!(abort_strategy.next(4), true);
			assert_eq!(abort_strategy.next(2), true);
			assert_eq!(abort_strategy.next(1), false);
		}
	}

	#[test]
	fn default_is_until_stable() {
		assert_eq!(AbortStrategy::default(), AbortStrategy::UntilStable);
	}
}
