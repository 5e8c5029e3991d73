//! Compiler-owned parameter synthesis.
//!
//! Derivation rebinds a source parameter list to a new owner symbol. It
//! copies type, passing mode, ordinal, and name, and never infers
//! attribute inheritance: a synthesized parameter only sees its base
//! parameter's default value, attributes, and marker flags when
//! `inherit_attributes` was passed explicitly at construction.

use crate::signature::{Param, ParamPassing, Signature};
use crate::types::{ModifierSeqId, TypeRef};
use bitflags::bitflags;
use fnt_common::interner::Atom;
use std::sync::Arc;

/// Opaque handle to the owner symbol a synthesized parameter is bound to.
/// Symbol-table management for owners is the caller's concern.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SymbolId(pub u32);

bitflags! {
    /// Well-known marker attributes on a source parameter.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct ParamFlags: u8 {
        /// "Do not pass explicitly, supplied by the caller's context."
        const CALLER_SUPPLIED = 1 << 0;
    }
}

/// A compile-time constant default value.
#[derive(Clone, Debug, PartialEq)]
pub enum ConstValue {
    Int(i64),
    Bool(bool),
    String(Atom),
    Null,
}

/// A base parameter as seen from source or metadata: the structural
/// record plus the attribute payload derivation may inherit.
#[derive(Clone, Debug)]
pub struct SourceParam {
    pub param: Param,
    pub default_value: Option<ConstValue>,
    pub attributes: Vec<Atom>,
    pub flags: ParamFlags,
}

impl SourceParam {
    pub fn new(param: Param) -> SourceParam {
        SourceParam {
            param,
            default_value: None,
            attributes: Vec::new(),
            flags: ParamFlags::empty(),
        }
    }

    pub fn with_default_value(mut self, value: ConstValue) -> SourceParam {
        self.default_value = Some(value);
        self
    }

    pub fn with_attributes(mut self, attributes: Vec<Atom>) -> SourceParam {
        self.attributes = attributes;
        self
    }

    pub fn with_flags(mut self, flags: ParamFlags) -> SourceParam {
        self.flags = flags;
        self
    }
}

/// A parameter synthesized for a compiler-owned symbol, optionally linked
/// back to the base parameter it was derived from.
#[derive(Clone, Debug)]
pub struct SynthesizedParam {
    owner: SymbolId,
    param: Param,
    inherit_attributes: bool,
    base: Option<Arc<SourceParam>>,
}

impl SynthesizedParam {
    pub fn owner(&self) -> SymbolId {
        self.owner
    }

    pub fn ordinal(&self) -> u16 {
        self.param.ordinal
    }

    pub fn name(&self) -> Atom {
        self.param.name
    }

    pub fn passing(&self) -> ParamPassing {
        self.param.passing
    }

    pub fn type_ref(&self) -> TypeRef {
        self.param.ty
    }

    pub fn ref_modifiers(&self) -> ModifierSeqId {
        self.param.ref_modifiers
    }

    /// Whether this parameter carries an attribute-inheritance link.
    pub fn has_inheritance_link(&self) -> bool {
        self.base.is_some()
    }

    /// The linked base parameter, if any.
    pub fn base(&self) -> Option<&Arc<SourceParam>> {
        self.base.as_ref()
    }

    /// The inherited default value. Empty unless inheritance was requested
    /// at construction, regardless of what the base carries.
    pub fn default_value(&self) -> Option<&ConstValue> {
        if !self.inherit_attributes {
            return None;
        }
        self.base.as_ref()?.default_value.as_ref()
    }

    /// The inherited attribute set. Empty unless inheritance was requested.
    pub fn attributes(&self) -> &[Atom] {
        if !self.inherit_attributes {
            return &[];
        }
        self.base
            .as_ref()
            .map(|base| base.attributes.as_slice())
            .unwrap_or(&[])
    }

    /// Whether the caller-context marker is visible through the link.
    pub fn is_caller_supplied(&self) -> bool {
        self.inherit_attributes
            && self
                .base
                .as_ref()
                .is_some_and(|base| base.flags.contains(ParamFlags::CALLER_SUPPLIED))
    }
}

/// Derive a full parameter list from `signature`, bound to
/// `destination_owner`. Ordinals, names, passing modes, and types are
/// copied; no attribute inheritance.
pub fn derive_parameters(signature: &Signature, destination_owner: SymbolId) -> Vec<SynthesizedParam> {
    signature
        .params
        .iter()
        .map(|param| SynthesizedParam {
            owner: destination_owner,
            param: param.clone(),
            inherit_attributes: false,
            base: None,
        })
        .collect()
}

/// Derive a single parameter with an explicit attribute-inheritance link
/// back to `base`. When `inherit_attributes` is false the synthesized
/// parameter reports an empty attribute set and no default value.
pub fn derive_complex(
    base: &Arc<SourceParam>,
    destination_owner: SymbolId,
    inherit_attributes: bool,
) -> SynthesizedParam {
    SynthesizedParam {
        owner: destination_owner,
        param: base.param.clone(),
        inherit_attributes,
        base: Some(base.clone()),
    }
}

/// Derivation form that states the expected passing mode and ref
/// modifiers explicitly.
///
/// # Panics
///
/// Derivation is defined only as an owner-rebind operation: requesting a
/// passing-mode change or a custom-modifier mutation through it is
/// unsupported and fails fast.
pub fn derive_with(
    base: &Arc<SourceParam>,
    destination_owner: SymbolId,
    inherit_attributes: bool,
    passing: ParamPassing,
    ref_modifiers: ModifierSeqId,
) -> SynthesizedParam {
    assert_eq!(
        passing, base.param.passing,
        "parameter derivation cannot change the passing mode; derivation is an owner-rebind operation"
    );
    assert_eq!(
        ref_modifiers, base.param.ref_modifiers,
        "parameter derivation cannot mutate custom modifiers; derivation is an owner-rebind operation"
    );
    derive_complex(base, destination_owner, inherit_attributes)
}

#[cfg(test)]
#[path = "../tests/synthesis_tests.rs"]
mod tests;
