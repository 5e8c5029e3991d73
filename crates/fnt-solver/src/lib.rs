//! Structural signature model for the fnt front-end.
//!
//! This crate owns the type/symbol representation of structural function
//! types and its algebra:
//!
//! - **Interning**: O(1) type and signature equality via `TypeId` /
//!   `SignatureId` handles, with structural dedup per compilation
//! - **Comparison modes**: equality and hashing that optionally ignore
//!   nullability annotations and/or custom modifiers
//! - **Variance-aware merge**: best common shape across
//!   equal-up-to-annotations occurrences
//! - **Nullability codec**: the flat transform-tag stream synchronized
//!   with shape traversal
//! - **Parameter synthesis**: owner-rebinding derivation with explicit
//!   attribute inheritance
//!
//! Everything handed out is an immutable value object; every "mutator" is
//! a pure constructor of a new value, and structural hashing (not
//! reference caching) provides deduplication.

pub mod format;
pub mod intern;
pub mod lower;
pub mod merge;
pub mod nullability;
pub mod signature;
pub mod synthesis;
pub mod types;

pub use format::TypeFormatter;
pub use intern::TypeInterner;
pub use lower::{
    TypeResolver, function_type_from_syntax, lower_type, signature_from_syntax,
    structural_resolver,
};
pub use merge::{merge_signatures, merge_type_refs};
pub use nullability::{apply_transforms, emit_transforms, is_tag_bearing};
pub use signature::{
    CallingConvention, ComparisonMode, Param, ParamPassing, ReturnPassing, Signature, Variance,
};
pub use synthesis::{
    ConstValue, ParamFlags, SourceParam, SymbolId, SynthesizedParam, derive_complex,
    derive_parameters, derive_with,
};
pub use types::{
    IntrinsicKind, ModifierSeqId, Nullability, SignatureId, TypeId, TypeKey, TypeKind, TypeRef,
};
