use std::collections::HashMap;

use rand::Rng;

/// Outcome observed immediately after a token during training.
///
/// A token is either followed by another token, or it ended the
/// training sequence it appeared in.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
	/// Another token was observed next.
	Token(String),
	/// The sequence ended on this token.
	Terminator,
}

/// Represents a state in the sequence model.
///
/// A `State` corresponds to a single token (`key`) and stores all outcomes
/// observed after this token across the training corpus.
///
/// Conceptually, this is a node in a Markov chain where outgoing edges
/// are weighted by their number of observations.
///
/// ## Responsibilities:
/// - Accumulate outcome occurrences during learning
/// - Sample the next outcome using weighted random sampling
/// - Merge with another state having the same key (parallel learning support)
///
/// ## Invariants
/// - All outcomes belong to the same `key`
/// - Each outcome occurrence count is strictly positive
#[derive(Clone, Debug, PartialEq)]
pub struct State {
	/// Identifier of the state (the token itself).
	key: String,
	/// Observed outcomes indexed by successor.
	/// The value represents how many times this outcome was observed.
	/// Example: { Token("sprzętu") => 42, Terminator => 3 }
	outcomes: HashMap<Outcome, usize>,
}

impl State {
	/// Creates a new empty state for the given token.
	pub fn new(key: &str) -> Self {
		Self {
			key: key.to_owned(),
			outcomes: HashMap::new(),
		}
	}

	/// Records one occurrence of an outcome.
	///
	/// - If the outcome already exists, its occurrence count is increased.
	/// - Otherwise, a new outcome is created with an initial count of 1.
	pub fn record(&mut self, outcome: Outcome) {
		*self.outcomes.entry(outcome).or_insert(0) += 1;
	}

	/// Number of times `outcome` was observed after this token.
	pub fn occurrences(&self, outcome: &Outcome) -> usize {
		self.outcomes.get(outcome).copied().unwrap_or(0)
	}

	/// Samples the next outcome using weighted random sampling.
	///
	/// The probability of selecting an outcome is proportional to its
	/// occurrence count.
	///
	/// This method performs:
	/// - an O(n) scan over the outcomes
	/// - a cumulative subtraction to select a bucket
	///
	/// Returns `None` if the state has no outcomes.
	pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Outcome> {
		if self.outcomes.is_empty() {
			return None;
		}

		// Compute the total number of occurrences
		let total: usize = self.outcomes.values().sum();
		if total == 0 {
			// Should not happen due to invariants, but kept for safety
			return None;
		}

		// Randomly select an outcome
		let mut r = rng.random_range(0..total);

		let mut fallback: Option<&Outcome> = None;
		for (outcome, occurrence) in &self.outcomes {
			if r < *occurrence {
				return Some(outcome);
			}
			r -= occurrence;
			fallback = Some(outcome);
		}

		// Fallback: should not happen, but kept for safety.
		fallback
	}

	/// Merges another state into this one.
	///
	/// Both states must represent the same token (`key`).
	/// Outcome occurrence counts are summed.
	///
	/// This method is intended for parallel learning,
	/// where multiple partial models are combined into a single one.
	///
	/// # Errors
	/// Returns an error if the state keys do not match.
	pub fn merge(&mut self, other: &Self) -> Result<(), String> {
		if self.key != other.key {
			return Err("Key mismatch".to_owned());
		}

		for (outcome, occurrence) in &other.outcomes {
			*self.outcomes.entry(outcome.clone()).or_insert(0) += *occurrence;
		}

		Ok(())
	}
}
