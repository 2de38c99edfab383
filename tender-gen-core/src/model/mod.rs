//! Top-level module for the sequence generation system.
//!
//! This module provides a first-order stochastic text generator, including:
//! - The trainable model itself (`SequenceModel`)
//! - Internal state management (`State`)

/// First-order sequence model over whitespace-delimited tokens.
///
/// Handles corpus ingestion, transition counting, frequency-weighted
/// generation, and model merging.
pub mod sequence_model;

/// Internal representation of a single model state (one token).
///
/// Tracks outgoing outcomes and supports weighted random sampling.
/// This module is not exposed publicly.
mod state;
