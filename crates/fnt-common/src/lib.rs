//! Common types and utilities for the fnt front-end.
//!
//! This crate provides foundational types used across all fnt crates:
//! - String interning (`Atom`, `Interner`, `ShardedInterner`)
//! - Source spans (`Span`)
//! - Diagnostics (`Diagnostic`, `DiagnosticCategory`, message codes)

// String interning for identifier deduplication
pub mod interner;
pub use interner::{Atom, Interner, ShardedInterner};

// Span - Source location tracking (byte offsets)
pub mod span;
pub use span::Span;

// Diagnostics - categories, codes, and the diagnostic record
pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory};
