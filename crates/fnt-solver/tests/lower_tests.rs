use super::*;
use crate::format::TypeFormatter;
use crate::intern::TypeInterner;
use crate::signature::{ParamPassing, ReturnPassing};
use crate::types::{Nullability, TypeId, TypeKey};
use fnt_parser::{NodeArena, NodeIndex, ParserState};

/// Parse `text` as a single parameter and return the arena plus the
/// parameter's type node.
fn parse_parameter_type(text: &str) -> (NodeArena, NodeIndex) {
    let mut state = ParserState::new("test.fnt", text);
    let node = state.parse_parameter();
    let ty = state
        .arena
        .get(node)
        .and_then(|n| state.arena.get_parameter(n))
        .expect("parameter payload")
        .ty;
    let (arena, diagnostics) = state.into_parts();
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    (arena, ty)
}

fn lower_function_type(text: &str, interner: &TypeInterner) -> TypeId {
    let (arena, ty) = parse_parameter_type(text);
    let mut resolver = structural_resolver(interner);
    function_type_from_syntax(&arena, ty, interner, &mut resolver)
}

fn signature_of(interner: &TypeInterner, fn_type: TypeId) -> std::sync::Arc<crate::signature::Signature> {
    let Some(TypeKey::Function(sig_id)) = interner.lookup(fn_type) else {
        panic!("expected a function-type symbol");
    };
    interner.signature(sig_id)
}

#[test]
fn test_lower_function_type_parameter() {
    // `int (int x, int y) z`: parameter z of shape (int, int) -> int
    let interner = TypeInterner::new();
    let fn_type = lower_function_type("int (int x, int y) z", &interner);
    let signature = signature_of(&interner, fn_type);

    assert_eq!(signature.return_type.ty, TypeId::INT);
    assert_eq!(signature.return_passing, ReturnPassing::Value);
    assert_eq!(signature.arity(), 2);
    for (ordinal, param) in signature.params.iter().enumerate() {
        assert_eq!(param.ordinal, ordinal as u16);
        assert_eq!(param.passing, ParamPassing::Value);
        assert_eq!(param.ty.ty, TypeId::INT);
    }
    assert_eq!(interner.resolve_atom(signature.params[0].name).as_ref(), "x");
    assert_eq!(interner.resolve_atom(signature.params[1].name).as_ref(), "y");
}

#[test]
fn test_lower_tuple_returning_function_type() {
    // `(int x1, int x2) (int x, int y) z`: the structural-type return is a
    // two-element tuple, lowered to the well-known named generic with the
    // element names dropped.
    let interner = TypeInterner::new();
    let fn_type = lower_function_type("(int x1, int x2) (int x, int y) z", &interner);
    let signature = signature_of(&interner, fn_type);

    let Some(TypeKey::Named { name, args }) = interner.lookup(signature.return_type.ty) else {
        panic!("tuple return should lower to a named generic");
    };
    assert_eq!(interner.resolve_atom(name).as_ref(), "ValueTuple");
    assert_eq!(args.len(), 2);
    assert!(args.iter().all(|arg| arg.ty == TypeId::INT));
    assert_eq!(signature.arity(), 2);
}

#[test]
fn test_lower_local_declaration_analogously() {
    // `int (int x, int y) z;` as a local declaration lowers to the same
    // shape as the parameter form.
    let interner = TypeInterner::new();
    let parameter_form = lower_function_type("int (int x, int y) z", &interner);

    let mut state = ParserState::new("test.fnt", "int (int x, int y) z;");
    let stmt = state.parse_statement();
    let ty = state
        .arena
        .get(stmt)
        .and_then(|n| state.arena.get_local_declaration(n))
        .expect("local declaration")
        .ty;
    let (arena, diagnostics) = state.into_parts();
    assert!(diagnostics.is_empty(), "{diagnostics:?}");

    let mut resolver = structural_resolver(&interner);
    let local_form = function_type_from_syntax(&arena, ty, &interner, &mut resolver);

    // Structural dedup: independently parsed occurrences of the same
    // written shape are the same interned symbol.
    assert_eq!(parameter_form, local_form);
}

#[test]
fn test_structural_dedup_across_parses_ignores_names() {
    let interner = TypeInterner::new();
    let a = lower_function_type("int (int x, int y) z", &interner);
    let b = lower_function_type("int (int left, int right) other", &interner);
    assert_eq!(a, b);
}

#[test]
fn test_nullability_splits_identity() {
    let interner = TypeInterner::new();
    let plain = lower_function_type("string (string s) f", &interner);
    let annotated = lower_function_type("string? (string s) f", &interner);
    assert_ne!(plain, annotated);

    let signature = signature_of(&interner, annotated);
    assert_eq!(signature.return_type.nullability, Nullability::Annotated);
}

#[test]
fn test_lower_passing_modes() {
    let interner = TypeInterner::new();
    let fn_type = lower_function_type("ref int (out int r, in string s, ref bool b) f", &interner);
    let signature = signature_of(&interner, fn_type);

    assert_eq!(signature.return_passing, ReturnPassing::Ref);
    let passing: Vec<ParamPassing> = signature.params.iter().map(|p| p.passing).collect();
    assert_eq!(
        passing,
        vec![ParamPassing::Out, ParamPassing::In, ParamPassing::Ref]
    );
}

#[test]
fn test_lower_named_reference_through_resolver() {
    let interner = TypeInterner::new();
    let fn_type = lower_function_type("void (List<string?> xs) f", &interner);
    let signature = signature_of(&interner, fn_type);

    let Some(TypeKey::Named { name, args }) = interner.lookup(signature.params[0].ty.ty) else {
        panic!("resolver should intern the reference as a named type");
    };
    assert_eq!(interner.resolve_atom(name).as_ref(), "List");
    assert_eq!(args[0].ty, TypeId::STRING);
    assert_eq!(args[0].nullability, Nullability::Annotated);
}

// =============================================================================
// Grammar round-trip: re-emitting a parsed shape and re-parsing it must
// reproduce an equal shape.
// =============================================================================

fn round_trip(text: &str) {
    let interner = TypeInterner::new();
    let original = lower_function_type(text, &interner);

    let formatted = TypeFormatter::new(&interner).format_type(original);

    let mut state = ParserState::new("roundtrip.fnt", &formatted);
    let node = state.parse_type();
    let (arena, diagnostics) = state.into_parts();
    assert!(diagnostics.is_empty(), "reparsing {formatted:?}: {diagnostics:?}");

    let mut resolver = structural_resolver(&interner);
    let reparsed = lower_type(&arena, node, &interner, &mut resolver);
    assert_eq!(reparsed.ty, original, "round-trip of {formatted:?}");
}

#[test]
fn test_round_trip_simple_shape() {
    round_trip("int (int x, int y) z");
}

#[test]
fn test_round_trip_tuple_return() {
    round_trip("(int x1, int x2) (int x, int y) z");
}

#[test]
fn test_round_trip_nested_shapes() {
    round_trip("string? (int (bool b) inner, List<string?> xs) f");
}

#[test]
fn test_round_trip_ref_and_modes() {
    round_trip("ref readonly string (out int r, in string s) f");
}

#[test]
fn test_round_trip_arrays_and_nullable() {
    round_trip("string?[] (object? o) f");
}
