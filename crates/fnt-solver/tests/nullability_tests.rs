use super::*;
use crate::intern::TypeInterner;
use crate::signature::{CallingConvention, ComparisonMode, Param, ParamPassing, ReturnPassing, Signature};
use crate::types::{ModifierSeqId, Nullability, SignatureId, TypeId, TypeKey, TypeRef};

fn intern(
    interner: &TypeInterner,
    return_type: TypeRef,
    params: Vec<TypeRef>,
) -> SignatureId {
    let name = interner.intern_string("p");
    interner.intern_signature(Signature {
        return_type,
        return_passing: ReturnPassing::Value,
        return_ref_modifiers: ModifierSeqId::EMPTY,
        convention: CallingConvention::Default,
        params: params
            .into_iter()
            .enumerate()
            .map(|(ordinal, ty)| Param {
                ordinal: ordinal as u16,
                name,
                passing: ParamPassing::Value,
                ty,
                ref_modifiers: ModifierSeqId::EMPTY,
            })
            .collect(),
    })
}

/// `string? (int, List<string>)` - two tag-bearing occurrences beyond the
/// return: the List itself and its argument. `int` carries no tag.
fn sample_signature(interner: &TypeInterner) -> SignatureId {
    let list = interner.intern_string("List");
    let list_of_string = TypeRef::new(interner.named(
        list,
        vec![TypeRef::new(TypeId::STRING).with_nullability(Nullability::NotAnnotated)],
    ))
    .with_nullability(Nullability::NotAnnotated);

    intern(
        interner,
        TypeRef::new(TypeId::STRING).with_nullability(Nullability::Annotated),
        vec![TypeRef::new(TypeId::INT), list_of_string],
    )
}

#[test]
fn test_emit_traversal_order() {
    let interner = TypeInterner::new();
    let signature = sample_signature(&interner);

    let mut tags = Vec::new();
    emit_transforms(&interner, signature, &mut tags);

    // Return first, then parameters in ordinal order, recursing into
    // nested type arguments; the value intrinsic contributes nothing.
    assert_eq!(
        tags,
        vec![
            Nullability::Annotated,    // string? return
            Nullability::NotAnnotated, // List<string>
            Nullability::NotAnnotated, // string argument
        ]
    );
}

#[test]
fn test_round_trip_law() {
    // apply(s, _, emit(s), 0) reproduces s under the annotation-sensitive
    // comparison and reports no changes, for any default tag.
    let interner = TypeInterner::new();
    let signature = sample_signature(&interner);

    let mut tags = Vec::new();
    emit_transforms(&interner, signature, &mut tags);

    for default_tag in [
        Nullability::Oblivious,
        Nullability::NotAnnotated,
        Nullability::Annotated,
    ] {
        let mut cursor = 0;
        let (applied, changed) =
            apply_transforms(&interner, signature, default_tag, &tags, &mut cursor);
        assert_eq!(applied, signature, "same object, not an equal copy");
        assert!(!changed);
        assert_eq!(cursor, tags.len(), "stream fully consumed");

        let original = interner.signature(signature);
        let applied = interner.signature(applied);
        assert!(interner.signatures_equal(&original, &applied, ComparisonMode::DEFAULT));
    }
}

#[test]
fn test_apply_changes_annotations() {
    let interner = TypeInterner::new();
    let signature = sample_signature(&interner);

    // Flip every occurrence to Annotated
    let tags = vec![Nullability::Annotated; 3];
    let mut cursor = 0;
    let (applied, changed) = apply_transforms(
        &interner,
        signature,
        Nullability::Oblivious,
        &tags,
        &mut cursor,
    );

    assert!(changed);
    assert_ne!(applied, signature);
    assert_eq!(cursor, 3);

    let applied = interner.signature(applied);
    assert_eq!(applied.return_type.nullability, Nullability::Annotated);
    assert_eq!(applied.params[1].ty.nullability, Nullability::Annotated);
    let TypeKey::Named { args, .. } = interner
        .lookup(applied.params[1].ty.ty)
        .expect("list stays interned")
    else {
        panic!("parameter 1 should stay a named type");
    };
    assert_eq!(args[0].nullability, Nullability::Annotated);

    // The untouched value intrinsic is untouched
    assert_eq!(applied.params[0].ty, TypeRef::new(TypeId::INT));
}

#[test]
fn test_empty_stream_applies_default_tag() {
    let interner = TypeInterner::new();
    let signature = sample_signature(&interner);

    let mut cursor = 0;
    let (applied, changed) =
        apply_transforms(&interner, signature, Nullability::Oblivious, &[], &mut cursor);

    assert!(changed);
    assert_eq!(cursor, 0, "an empty stream never advances the cursor");
    let applied = interner.signature(applied);
    assert_eq!(applied.return_type.nullability, Nullability::Oblivious);
    assert_eq!(applied.params[1].ty.nullability, Nullability::Oblivious);
}

#[test]
fn test_cursor_threads_across_signatures() {
    // Two signatures sharing one stream: the caller-owned cursor advances
    // by exactly each shape's occurrence count.
    let interner = TypeInterner::new();
    let first = intern(
        &interner,
        TypeRef::new(TypeId::STRING).with_nullability(Nullability::NotAnnotated),
        vec![],
    );
    let second = sample_signature(&interner);

    let mut tags = Vec::new();
    emit_transforms(&interner, first, &mut tags);
    emit_transforms(&interner, second, &mut tags);
    assert_eq!(tags.len(), 4);

    let mut cursor = 0;
    let (first_applied, _) = apply_transforms(
        &interner,
        first,
        Nullability::Oblivious,
        &tags,
        &mut cursor,
    );
    assert_eq!(cursor, 1);
    let (second_applied, _) = apply_transforms(
        &interner,
        second,
        Nullability::Oblivious,
        &tags,
        &mut cursor,
    );
    assert_eq!(cursor, 4);
    assert_eq!(first_applied, first);
    assert_eq!(second_applied, second);
}

#[test]
fn test_nested_function_shape_occurrences() {
    // A parameter whose type is itself a function shape contributes its
    // own occurrence plus its full nested traversal.
    let interner = TypeInterner::new();
    let nested = intern(
        &interner,
        TypeRef::new(TypeId::STRING).with_nullability(Nullability::Annotated),
        vec![TypeRef::new(TypeId::STRING).with_nullability(Nullability::NotAnnotated)],
    );
    let nested_fn = TypeRef::new(interner.intern(TypeKey::Function(nested)))
        .with_nullability(Nullability::NotAnnotated);
    let outer = intern(&interner, TypeRef::new(TypeId::VOID), vec![nested_fn]);

    let mut tags = Vec::new();
    emit_transforms(&interner, outer, &mut tags);
    assert_eq!(
        tags,
        vec![
            Nullability::NotAnnotated, // the function-typed parameter itself
            Nullability::Annotated,    // nested return
            Nullability::NotAnnotated, // nested parameter
        ]
    );

    let mut cursor = 0;
    let (applied, changed) = apply_transforms(
        &interner,
        outer,
        Nullability::Oblivious,
        &tags,
        &mut cursor,
    );
    assert_eq!(applied, outer);
    assert!(!changed);
    assert_eq!(cursor, 3);
}

#[test]
#[should_panic(expected = "nullability transform stream exhausted")]
fn test_short_stream_is_contract_violation() {
    let interner = TypeInterner::new();
    let signature = sample_signature(&interner);

    // Three occurrences, two tags: fail fast rather than desynchronize
    let tags = vec![Nullability::Annotated, Nullability::Annotated];
    let mut cursor = 0;
    apply_transforms(
        &interner,
        signature,
        Nullability::Oblivious,
        &tags,
        &mut cursor,
    );
}
