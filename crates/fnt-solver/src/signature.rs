//! The structural signature model: passing modes, comparison modes, and
//! the immutable `Signature`/`Param` records.
//!
//! Signatures are persistent value objects. Every "mutator" (`substitute`,
//! the merge in `merge.rs`, the nullability transform in `nullability.rs`)
//! constructs a new value; nothing edits a signature in place. Arity and
//! passing modes are fixed at construction and only annotated-type payloads
//! are ever replaced.

use crate::types::{ModifierSeqId, TypeRef};
use bitflags::bitflags;
use fnt_common::diagnostics::{Diagnostic, diagnostic_messages};
use fnt_common::interner::Atom;

bitflags! {
    /// Selects which payload details participate in a structural
    /// equality/hash check. The empty set compares raw shape only.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct ComparisonMode: u8 {
        const NULLABILITY = 1 << 0;
        const MODIFIERS = 1 << 1;
    }
}

impl ComparisonMode {
    /// Full-fidelity comparison; the mode used by the interning dedup map.
    pub const DEFAULT: ComparisonMode = ComparisonMode::all();
    /// Shape only: arity and passing modes, no annotation payloads.
    pub const SHAPE: ComparisonMode = ComparisonMode::empty();
}

/// How a return value is produced.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ReturnPassing {
    Value,
    Ref,
    RefReadonly,
}

/// How a parameter is transferred.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ParamPassing {
    Value,
    Ref,
    Out,
    In,
}

impl ParamPassing {
    /// Any pass-by-reference mode requires exact agreement under merge,
    /// since reference aliasing is not co/contravariant-safe.
    pub const fn is_by_ref(self) -> bool {
        !matches!(self, ParamPassing::Value)
    }
}

/// Calling convention of a function shape.
///
/// `Varargs` shapes are constructible (the binder may produce them from
/// metadata) but unsupported: they carry a use-site diagnostic that is
/// reported when the symbol is used, not when it is built.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CallingConvention {
    Default,
    Varargs,
}

/// Direction in which a merge may generalize or specialize a type.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Variance {
    /// Exact match required.
    None,
    /// Covariant.
    Out,
    /// Contravariant.
    In,
}

impl Variance {
    /// Parameters sit in a contravariant position relative to the
    /// signature as a whole, so a declared variance flips for them.
    pub const fn flip(self) -> Variance {
        match self {
            Variance::None => Variance::None,
            Variance::Out => Variance::In,
            Variance::In => Variance::Out,
        }
    }
}

/// One parameter of a signature.
///
/// `name` is documentation only - it never participates in equality,
/// hashing, or matching. `ref_modifiers` are the custom modifiers attached
/// to the reference itself for by-reference passing modes; modifiers on the
/// type ride on `ty`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Param {
    pub ordinal: u16,
    pub name: Atom,
    pub passing: ParamPassing,
    pub ty: TypeRef,
    pub ref_modifiers: ModifierSeqId,
}

/// The structural payload shared by a function-type symbol and any
/// synthesized method-shape symbol.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Signature {
    pub return_type: TypeRef,
    pub return_passing: ReturnPassing,
    pub return_ref_modifiers: ModifierSeqId,
    pub convention: CallingConvention,
    pub params: Vec<Param>,
}

impl Signature {
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Build a new signature reusing every parameter's ordinal, name, and
    /// passing mode, replacing only type/modifier payloads. This is the
    /// single construction path used by merge and the nullability codec -
    /// callers never hand-build a parameter list when only payloads change.
    ///
    /// # Panics
    ///
    /// Panics if `new_param_types` (or `new_param_ref_modifiers`, when
    /// given) does not match this signature's arity.
    pub fn substitute(
        &self,
        new_return_type: TypeRef,
        new_param_types: &[TypeRef],
        new_return_ref_modifiers: Option<ModifierSeqId>,
        new_param_ref_modifiers: Option<&[ModifierSeqId]>,
    ) -> Signature {
        assert_eq!(
            new_param_types.len(),
            self.params.len(),
            "substitution must preserve arity"
        );
        if let Some(mods) = new_param_ref_modifiers {
            assert_eq!(
                mods.len(),
                self.params.len(),
                "substitution must supply one ref-modifier sequence per parameter"
            );
        }

        let params = self
            .params
            .iter()
            .enumerate()
            .map(|(i, param)| Param {
                ordinal: param.ordinal,
                name: param.name,
                passing: param.passing,
                ty: new_param_types[i],
                ref_modifiers: new_param_ref_modifiers
                    .map(|mods| mods[i])
                    .unwrap_or(param.ref_modifiers),
            })
            .collect();

        Signature {
            return_type: new_return_type,
            return_passing: self.return_passing,
            return_ref_modifiers: new_return_ref_modifiers.unwrap_or(self.return_ref_modifiers),
            convention: self.convention,
            params,
        }
    }

    /// Use-site diagnostic for shapes this core cannot support, deferred
    /// until the symbol is actually used.
    pub fn use_site_diagnostic(&self, file: &str, pos: u32) -> Option<Diagnostic> {
        match self.convention {
            CallingConvention::Default => None,
            CallingConvention::Varargs => Some(Diagnostic::from_message(
                diagnostic_messages::UNSUPPORTED_CALLING_CONVENTION,
                file,
                pos,
                0,
                &[],
            )),
        }
    }
}

#[cfg(test)]
#[path = "../tests/signature_tests.rs"]
mod tests;
