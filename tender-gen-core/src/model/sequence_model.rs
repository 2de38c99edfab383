use std::collections::HashMap;
use std::sync::mpsc;
use std::thread;

use rand::Rng;

use super::state::{Outcome, State};

/// First-order stochastic sequence model over whitespace-delimited tokens.
///
/// The model learns a transition table from token to observed outcomes
/// (successor tokens or end-of-sequence) plus a pool of opening tokens,
/// and generates new sequences by a frequency-weighted random walk.
///
/// # Responsibilities
/// - Build the transition table and start pool from training sequences
/// - Accumulate occurrence counts across repeated training calls
/// - Generate bounded token sequences by weighted sampling
/// - Merge with another model (parallel corpus ingestion)
///
/// # Invariants
/// - Every token seen anywhere in training is a transition-table key
/// - Every token that ended a training sequence holds a terminator outcome
/// - Every non-final token holds at least one successor outcome
/// - All occurrence counts are strictly positive
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SequenceModel {
	/// Mapping from a token to its observed outcomes.
	states: HashMap<String, State>,

	/// Opening tokens of training sequences, with occurrence counts.
	start_pool: HashMap<String, usize>,
}

impl SequenceModel {
	/// Creates a new empty model.
	pub fn new() -> Self {
		Self::default()
	}

	/// Builds a model from a corpus using multithreaded merging.
	///
	/// # Behavior
	/// - Splits the corpus into chunks (based on CPU cores * factor).
	/// - Spawns threads to train partial models for each chunk.
	/// - Merges all partial models sequentially.
	///
	/// The result is identical to training a single model on the whole
	/// corpus, since merging sums occurrence counts.
	///
	/// # Errors
	/// Returns an error if merging the partial models fails.
	pub fn from_corpus(sequences: Vec<String>) -> Result<Self, String> {
		if sequences.is_empty() {
			return Ok(Self::new());
		}

		let cpus = num_cpus::get();
		let factor = 8;
		let chunks = cpus * factor;
		let chunk_size = (sequences.len() + chunks - 1) / chunks;

		let (tx, rx) = mpsc::channel();
		for chunk in sequences.chunks(chunk_size) {
			let tx = tx.clone();
			let chunk: Vec<String> = chunk.to_vec();

			thread::spawn(move || {
				let mut partial_model = SequenceModel::new();
				partial_model.train(&chunk);
				tx.send(partial_model).expect("Failed to send from thread");
			});
		}
		drop(tx);

		let mut model = SequenceModel::new();
		for partial_model in rx.iter() {
			model.merge(&partial_model)?;
		}

		Ok(model)
	}

	/// Trains the model on a collection of sequences.
	///
	/// Each sequence is split on runs of whitespace. For a non-empty
	/// sequence, the first token joins the start pool, each consecutive
	/// token pair records a successor outcome, and the last token records
	/// a terminator outcome. A single-token sequence records only the
	/// terminator.
	///
	/// # Notes
	/// - Empty and whitespace-only sequences are silently skipped.
	/// - Repeated calls accumulate: training twice on the same corpus
	///   doubles all occurrence counts.
	pub fn train<I, S>(&mut self, sequences: I)
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		for sequence in sequences {
			let tokens: Vec<&str> = sequence.as_ref().split_whitespace().collect();
			let Some(first) = tokens.first() else {
				continue;
			};

			*self.start_pool.entry((*first).to_owned()).or_insert(0) += 1;

			for pair in tokens.windows(2) {
				self.state_entry(pair[0]).record(Outcome::Token(pair[1].to_owned()));
			}

			// The last token can also end a sequence, even if it continues
			// one elsewhere in the corpus.
			self.state_entry(tokens[tokens.len() - 1]).record(Outcome::Terminator);
		}
	}

	/// Returns true once at least one non-empty sequence was trained.
	pub fn is_trained(&self) -> bool {
		!self.start_pool.is_empty()
	}

	/// Number of distinct tokens in the transition table.
	pub fn token_count(&self) -> usize {
		self.states.len()
	}

	/// Number of distinct opening tokens in the start pool.
	pub fn start_token_count(&self) -> usize {
		self.start_pool.len()
	}

	/// Generates a new sequence using the thread-local RNG.
	///
	/// See [`SequenceModel::generate_with`].
	pub fn generate(&self, max_length: usize) -> String {
		self.generate_with(&mut rand::rng(), max_length)
	}

	/// Generates a new sequence of at most `max_length` tokens.
	///
	/// Performs a random walk: a frequency-weighted start token, then
	/// repeated weighted draws from the current token's outcomes until a
	/// terminator is drawn, `max_length` tokens were emitted, or a token
	/// without recorded outcomes is reached (dead end).
	///
	/// # Notes
	/// - An untrained model generates the empty string.
	/// - `max_length == 0` generates the empty string as well; it is not
	///   reported as an error.
	/// - Generation never mutates the model.
	pub fn generate_with<R: Rng + ?Sized>(&self, rng: &mut R, max_length: usize) -> String {
		if max_length == 0 {
			return String::new();
		}
		let Some(start) = self.sample_start(rng) else {
			return String::new();
		};

		let mut sequence = vec![start];
		let mut current = start;

		for _ in 1..max_length {
			// Dead end: no outcomes were ever recorded for this token.
			// Prevented by the training invariants, handled anyway.
			let Some(state) = self.states.get(current) else {
				break;
			};

			match state.sample(rng) {
				Some(Outcome::Token(next)) => {
					sequence.push(next.as_str());
					current = next;
				}
				Some(Outcome::Terminator) | None => break,
			}
		}

		sequence.join(" ")
	}

	/// Merges another model into this one.
	///
	/// Outcome and start-pool occurrence counts are summed. Intended for
	/// parallel corpus ingestion, where partial models built on chunks of
	/// the corpus are combined into a single one.
	///
	/// # Errors
	/// Returns an error if merging a pair of states fails.
	pub fn merge(&mut self, other: &Self) -> Result<(), String> {
		for (key, state) in &other.states {
			if let Some(existing) = self.states.get_mut(key) {
				existing.merge(state)?;
			} else {
				self.states.insert(key.clone(), state.clone());
			}
		}

		for (token, occurrence) in &other.start_pool {
			*self.start_pool.entry(token.clone()).or_insert(0) += *occurrence;
		}

		Ok(())
	}

	/// Samples a start token using weighted random sampling.
	///
	/// Returns `None` if the start pool is empty (untrained model).
	fn sample_start<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
		let total: usize = self.start_pool.values().sum();
		if total == 0 {
			return None;
		}

		let mut r = rng.random_range(0..total);

		let mut fallback: Option<&str> = None;
		for (token, occurrence) in &self.start_pool {
			if r < *occurrence {
				return Some(token);
			}
			r -= occurrence;
			fallback = Some(token);
		}

		// Fallback: should not happen, but kept for safety.
		fallback
	}

	/// Gets or creates the state for a token.
	fn state_entry(&mut self, token: &str) -> &mut State {
		self.states
			.entry(token.to_owned())
			.or_insert_with(|| State::new(token))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	use rand::SeedableRng;
	use rand::rngs::StdRng;

	fn token(s: &str) -> Outcome {
		Outcome::Token(s.to_owned())
	}

	#[test]
	fn every_trained_token_becomes_a_state() {
		let mut model = SequenceModel::new();
		model.train(["a b c", "a b d"]);

		let mut keys: Vec<&str> = model.states.keys().map(String::as_str).collect();
		keys.sort_unstable();
		assert_eq!(keys, ["a", "b", "c", "d"]);
	}

	#[test]
	fn final_tokens_record_a_terminator() {
		let mut model = SequenceModel::new();
		model.train(["a b c", "a b d"]);

		assert_eq!(model.states["c"].occurrences(&Outcome::Terminator), 1);
		assert_eq!(model.states["d"].occurrences(&Outcome::Terminator), 1);
		assert_eq!(model.states["b"].occurrences(&Outcome::Terminator), 0);
	}

	#[test]
	fn transition_counts_reflect_the_corpus() {
		let mut model = SequenceModel::new();
		model.train(["a b c", "a b d"]);

		assert_eq!(model.states["a"].occurrences(&token("b")), 2);
		assert_eq!(model.states["b"].occurrences(&token("c")), 1);
		assert_eq!(model.states["b"].occurrences(&token("d")), 1);
		assert_eq!(model.start_pool["a"], 2);
	}

	#[test]
	fn generation_only_yields_observed_sequences() {
		let mut model = SequenceModel::new();
		model.train(["a b c", "a b d"]);

		let mut rng = StdRng::seed_from_u64(13);
		for _ in 0..100 {
			let generated = model.generate_with(&mut rng, 10);
			assert!(
				generated == "a b c" || generated == "a b d",
				"unexpected sequence {generated:?}"
			);
		}
	}

	#[test]
	fn empty_sequences_are_skipped() {
		let mut model = SequenceModel::new();
		model.train(["", "   ", "\t\n"]);

		assert!(!model.is_trained());
		assert_eq!(model.generate_with(&mut StdRng::seed_from_u64(1), 5), "");
	}

	#[test]
	fn single_token_corpus_generates_that_token() {
		let mut model = SequenceModel::new();
		model.train(["x"]);

		assert_eq!(model.states["x"].occurrences(&Outcome::Terminator), 1);
		assert_eq!(model.start_pool["x"], 1);
		assert_eq!(model.generate_with(&mut StdRng::seed_from_u64(1), 5), "x");
	}

	#[test]
	fn training_accumulates_across_calls() {
		let mut model = SequenceModel::new();
		model.train(["a b"]);
		model.train(["a b"]);

		assert_eq!(model.states["a"].occurrences(&token("b")), 2);
		assert_eq!(model.states["b"].occurrences(&Outcome::Terminator), 2);
		assert_eq!(model.start_pool["a"], 2);
	}

	#[test]
	fn generation_is_bounded_by_max_length() {
		let mut model = SequenceModel::new();
		// "a" loops on itself, so only the length bound or a terminator
		// draw can stop the walk.
		model.train(["a a a a"]);

		let mut rng = StdRng::seed_from_u64(99);
		for max_length in 1..=8 {
			for _ in 0..50 {
				let generated = model.generate_with(&mut rng, max_length);
				let count = generated.split_whitespace().count();
				assert!(count >= 1 && count <= max_length);
			}
		}
	}

	#[test]
	fn untrained_model_generates_empty_string() {
		let model = SequenceModel::new();
		assert_eq!(model.generate_with(&mut StdRng::seed_from_u64(1), 20), "");
	}

	#[test]
	fn zero_max_length_generates_empty_string() {
		let mut model = SequenceModel::new();
		model.train(["a b"]);
		assert_eq!(model.generate_with(&mut StdRng::seed_from_u64(1), 0), "");
	}

	#[test]
	fn dead_end_stops_the_walk_early() {
		let mut model = SequenceModel::new();
		model.train(["a b c"]);
		// Forge a dead end that training alone cannot produce.
		model.states.remove("b");

		assert_eq!(model.generate_with(&mut StdRng::seed_from_u64(1), 10), "a b");
	}

	#[test]
	fn successor_sampling_follows_observed_frequencies() {
		let mut model = SequenceModel::new();
		let mut corpus = vec!["a b".to_owned(); 9];
		corpus.push("a c".to_owned());
		model.train(&corpus);

		let mut rng = StdRng::seed_from_u64(42);
		let trials = 10_000;
		let mut b_draws = 0;
		for _ in 0..trials {
			if model.generate_with(&mut rng, 2) == "a b" {
				b_draws += 1;
			}
		}

		let ratio = b_draws as f64 / trials as f64;
		assert!((0.85..=0.95).contains(&ratio), "ratio was {ratio}");
	}

	#[test]
	fn merge_matches_sequential_training() {
		let corpus = ["a b c", "a b d", "b c", "x"];

		let mut sequential = SequenceModel::new();
		sequential.train(corpus);

		let mut left = SequenceModel::new();
		left.train(&corpus[..2]);
		let mut right = SequenceModel::new();
		right.train(&corpus[2..]);
		left.merge(&right).unwrap();

		assert_eq!(left, sequential);
	}

	#[test]
	fn from_corpus_matches_sequential_training() {
		let corpus: Vec<String> = (0..100)
			.map(|i| format!("dostawa sprzętu numer {i}"))
			.collect();

		let mut sequential = SequenceModel::new();
		sequential.train(&corpus);

		let parallel = SequenceModel::from_corpus(corpus).unwrap();

		assert_eq!(parallel, sequential);
	}
}
