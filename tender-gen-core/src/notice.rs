use serde::{Deserialize, Serialize};

/// A procurement notice as returned by the notice API or synthesized locally.
///
/// Only the fields the pipeline consumes are modelled; the API returns many
/// more, which are ignored on deserialization. All fields are optional
/// because real records are frequently incomplete.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct RawNotice {
	/// Notice identifier assigned by the portal (or a synthetic one).
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,

	/// Procurement type, e.g. "Dostawy", "Usługi", "Roboty budowlane".
	#[serde(rename = "orderType", default, skip_serializing_if = "Option::is_none")]
	pub order_type: Option<String>,

	/// Free-text description of the procurement object.
	#[serde(rename = "orderObject", default, skip_serializing_if = "Option::is_none")]
	pub order_object: Option<String>,

	/// Notice title.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
}

/// Statistics computed for a single processed notice.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NoticeStats {
	/// Number of whitespace-delimited tokens in the cleaned text.
	pub word_count: usize,
}

/// A notice record after cleaning and tokenization.
///
/// The `cleaned_text` field is the training input of the sequence model.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ProcessedNotice {
	/// Description text as downloaded.
	pub original_text: String,

	/// Lowercased, punctuation-free description text.
	pub cleaned_text: String,

	/// Whitespace tokens of the cleaned text.
	pub tokens: Vec<String>,

	/// Procurement-type label carried over from the raw record.
	pub label: String,

	/// Per-record statistics.
	pub stats: NoticeStats,
}
