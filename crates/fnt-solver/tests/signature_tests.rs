use super::*;
use crate::types::{ModifierSeqId, Nullability, TypeId, TypeRef};
use fnt_common::interner::Atom;

fn param(ordinal: u16, passing: ParamPassing, ty: TypeRef) -> Param {
    Param {
        ordinal,
        name: Atom(ordinal as u32 + 1),
        passing,
        ty,
        ref_modifiers: ModifierSeqId::EMPTY,
    }
}

fn sample_signature() -> Signature {
    Signature {
        return_type: TypeRef::new(TypeId::STRING).with_nullability(Nullability::NotAnnotated),
        return_passing: ReturnPassing::Value,
        return_ref_modifiers: ModifierSeqId::EMPTY,
        convention: CallingConvention::Default,
        params: vec![
            param(0, ParamPassing::Value, TypeRef::new(TypeId::INT)),
            param(1, ParamPassing::Out, TypeRef::new(TypeId::BOOL)),
        ],
    }
}

#[test]
fn test_substitute_preserves_shape() {
    let signature = sample_signature();
    let new_return = TypeRef::new(TypeId::STRING).with_nullability(Nullability::Annotated);
    let new_params = [
        TypeRef::new(TypeId::LONG),
        TypeRef::new(TypeId::BOOL),
    ];

    let substituted = signature.substitute(new_return, &new_params, None, None);

    assert_eq!(substituted.return_passing, signature.return_passing);
    assert_eq!(substituted.convention, signature.convention);
    assert_eq!(substituted.return_type, new_return);
    assert_eq!(substituted.arity(), signature.arity());
    for (new_param, old_param) in substituted.params.iter().zip(signature.params.iter()) {
        assert_eq!(new_param.ordinal, old_param.ordinal);
        assert_eq!(new_param.name, old_param.name);
        assert_eq!(new_param.passing, old_param.passing);
        assert_eq!(new_param.ref_modifiers, old_param.ref_modifiers);
    }
    assert_eq!(substituted.params[0].ty, new_params[0]);
    assert_eq!(substituted.params[1].ty, new_params[1]);
}

#[test]
fn test_substitute_replaces_ref_modifiers_when_given() {
    let signature = sample_signature();
    let new_mods = ModifierSeqId(7);
    let substituted = signature.substitute(
        signature.return_type,
        &[signature.params[0].ty, signature.params[1].ty],
        Some(new_mods),
        Some(&[ModifierSeqId(3), ModifierSeqId::EMPTY]),
    );
    assert_eq!(substituted.return_ref_modifiers, new_mods);
    assert_eq!(substituted.params[0].ref_modifiers, ModifierSeqId(3));
    assert_eq!(substituted.params[1].ref_modifiers, ModifierSeqId::EMPTY);
}

#[test]
#[should_panic(expected = "substitution must preserve arity")]
fn test_substitute_arity_mismatch_fails_fast() {
    let signature = sample_signature();
    let only_one = [TypeRef::new(TypeId::INT)];
    signature.substitute(signature.return_type, &only_one, None, None);
}

#[test]
fn test_variance_flip() {
    assert_eq!(Variance::Out.flip(), Variance::In);
    assert_eq!(Variance::In.flip(), Variance::Out);
    assert_eq!(Variance::None.flip(), Variance::None);
}

#[test]
fn test_comparison_mode_constants() {
    assert_eq!(
        ComparisonMode::DEFAULT,
        ComparisonMode::NULLABILITY | ComparisonMode::MODIFIERS
    );
    assert!(ComparisonMode::SHAPE.is_empty());
}

#[test]
fn test_use_site_diagnostic_deferred_to_use() {
    let mut signature = sample_signature();
    assert!(signature.use_site_diagnostic("test.fnt", 0).is_none());

    // Construction of a varargs shape succeeds; the diagnostic surfaces
    // only when asked for at a use site.
    signature.convention = CallingConvention::Varargs;
    let diagnostic = signature
        .use_site_diagnostic("test.fnt", 42)
        .expect("varargs shape carries a use-site diagnostic");
    assert_eq!(
        diagnostic.code,
        fnt_common::diagnostics::diagnostic_codes::UNSUPPORTED_CALLING_CONVENTION
    );
    assert_eq!(diagnostic.start, 42);
}

#[test]
fn test_by_ref_classification() {
    assert!(!ParamPassing::Value.is_by_ref());
    assert!(ParamPassing::Ref.is_by_ref());
    assert!(ParamPassing::Out.is_by_ref());
    assert!(ParamPassing::In.is_by_ref());
}
