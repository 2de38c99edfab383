//! Procurement-notice text generation library.
//!
//! This crate provides the shared pieces of the tender pipeline:
//! - A first-order stochastic sequence model trained on cleaned notice text
//! - Frequency-weighted sampling of synthetic tender descriptions
//! - Notice record types exchanged between the pipeline stages
//! - I/O utilities for the JSON data files
//!
//! Only the high-level API is exposed publicly. Low-level components
//! are kept internal to ensure consistency and prevent misuse.

/// Core sequence model and generation logic.
///
/// This module exposes the high-level model interface while keeping
/// internal state representations private.
pub mod model;

/// Notice record types shared by the pipeline stages.
///
/// Raw records as downloaded and processed records after cleaning.
pub mod notice;

/// I/O utilities (JSON data files, path helpers).
pub mod io;
