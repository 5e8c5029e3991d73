//! Binder-facing lowering from parsed syntax to interned shapes.
//!
//! The parser hands over a node carrying an ordered parameter list and a
//! return-type node; this module materializes the signature symbol. Name
//! resolution stays external: every written type reference goes through
//! the caller's resolution callback, which maps a name plus lowered type
//! arguments to an annotated type.

use crate::intern::TypeInterner;
use crate::nullability::is_tag_bearing;
use crate::signature::{CallingConvention, Param, ParamPassing, ReturnPassing, Signature};
use crate::types::{Nullability, TypeId, TypeKey, TypeRef};
use fnt_common::interner::Atom;
use fnt_parser::{NodeArena, NodeIndex, ParamModifier, RefPrefix, syntax_kind_ext};
use fnt_scanner::SyntaxKind;

/// Resolution callback for written type references: receives the interned
/// name and the already-lowered type arguments, returns the annotated type.
pub type TypeResolver<'a> = dyn FnMut(Atom, Vec<TypeRef>) -> TypeRef + 'a;

/// A resolver that interns every reference as a structural named type.
/// Real binders substitute symbol-table resolution here.
pub fn structural_resolver(interner: &TypeInterner) -> impl FnMut(Atom, Vec<TypeRef>) -> TypeRef {
    move |name, args| {
        TypeRef::new(interner.named(name, args)).with_nullability(Nullability::NotAnnotated)
    }
}

/// Materialize a function-type symbol from a parsed structural-type node.
///
/// The interner dedupes the produced signature structurally, so two
/// independently parsed occurrences of the same written shape yield the
/// same symbol.
///
/// # Panics
///
/// Panics if `node` is not a structural function type node - the
/// binder-facing entry point is defined for confirmed parses only.
pub fn function_type_from_syntax(
    arena: &NodeArena,
    node: NodeIndex,
    interner: &TypeInterner,
    resolve: &mut TypeResolver<'_>,
) -> TypeId {
    let signature = signature_from_syntax(arena, node, interner, resolve);
    interner.function_type(signature)
}

/// Build the structural signature for a parsed function type node.
pub fn signature_from_syntax(
    arena: &NodeArena,
    node: NodeIndex,
    interner: &TypeInterner,
    resolve: &mut TypeResolver<'_>,
) -> Signature {
    let func = arena
        .get(node)
        .and_then(|n| arena.get_function_type(n))
        .expect("function-type lowering requires a structural function type node");

    let return_type = lower_type(arena, func.return_type, interner, resolve);
    let return_passing = match func.return_prefix {
        RefPrefix::None => ReturnPassing::Value,
        RefPrefix::Ref => ReturnPassing::Ref,
        RefPrefix::RefReadonly => ReturnPassing::RefReadonly,
    };

    let params = arena
        .node_list(func.parameters)
        .iter()
        .enumerate()
        .map(|(ordinal, &param_node)| {
            let param = arena
                .get(param_node)
                .and_then(|n| arena.get_parameter(n))
                .expect("parameter list holds parameter nodes");
            let passing = match param.modifier {
                ParamModifier::Value => ParamPassing::Value,
                ParamModifier::Ref => ParamPassing::Ref,
                ParamModifier::Out => ParamPassing::Out,
                ParamModifier::In => ParamPassing::In,
            };
            Param {
                ordinal: ordinal as u16,
                name: import_atom(arena, interner, param.name),
                passing,
                ty: lower_type(arena, param.ty, interner, resolve),
                ref_modifiers: crate::types::ModifierSeqId::EMPTY,
            }
        })
        .collect();

    Signature {
        return_type,
        return_passing,
        return_ref_modifiers: crate::types::ModifierSeqId::EMPTY,
        convention: CallingConvention::Default,
        params,
    }
}

/// Lower any parsed type node to an annotated type reference.
pub fn lower_type(
    arena: &NodeArena,
    node: NodeIndex,
    interner: &TypeInterner,
    resolve: &mut TypeResolver<'_>,
) -> TypeRef {
    let Some(syntax) = arena.get(node) else {
        return TypeRef::new(TypeId::ERROR);
    };

    match syntax.kind {
        syntax_kind_ext::PREDEFINED_TYPE => {
            let data = arena.get_predefined(syntax).expect("predefined payload");
            let ty = predefined_type_id(data.keyword);
            TypeRef::new(ty).with_nullability(default_annotation(interner, ty))
        }
        syntax_kind_ext::TYPE_REFERENCE => {
            let data = arena.get_type_ref(syntax).expect("type ref payload");
            let args: Vec<TypeRef> = data
                .type_arguments
                .map(|list| {
                    arena
                        .node_list(list)
                        .to_vec()
                        .into_iter()
                        .map(|arg| lower_type(arena, arg, interner, resolve))
                        .collect()
                })
                .unwrap_or_default();
            resolve(import_atom(arena, interner, data.name), args)
        }
        syntax_kind_ext::NULLABLE_TYPE => {
            let data = arena.get_wrapped(syntax).expect("nullable payload");
            lower_type(arena, data.inner, interner, resolve)
                .with_nullability(Nullability::Annotated)
        }
        syntax_kind_ext::ARRAY_TYPE => {
            let data = arena.get_wrapped(syntax).expect("array payload");
            let element = lower_type(arena, data.inner, interner, resolve);
            let ty = interner.intern(TypeKey::Array(element));
            TypeRef::new(ty).with_nullability(Nullability::NotAnnotated)
        }
        syntax_kind_ext::POINTER_TYPE => {
            let data = arena.get_wrapped(syntax).expect("pointer payload");
            let pointee = lower_type(arena, data.inner, interner, resolve);
            TypeRef::new(interner.intern(TypeKey::Pointer(pointee)))
        }
        syntax_kind_ext::REF_TYPE => {
            // The by-reference marker is declaration-level; the underlying
            // type is what participates in the signature algebra.
            let data = arena.get_ref_type(syntax).expect("ref payload");
            lower_type(arena, data.inner, interner, resolve)
        }
        syntax_kind_ext::TUPLE_TYPE => {
            // Tuples lower to the well-known named generic; element names
            // are surface documentation and are dropped here.
            let data = arena.get_tuple(syntax).expect("tuple payload");
            let args: Vec<TypeRef> = arena
                .node_list(data.elements)
                .to_vec()
                .into_iter()
                .map(|element_node| {
                    let element = arena
                        .get(element_node)
                        .and_then(|n| arena.get_tuple_element(n))
                        .expect("tuple element payload");
                    lower_type(arena, element.ty, interner, resolve)
                })
                .collect();
            let name = interner.intern_string("ValueTuple");
            TypeRef::new(interner.named(name, args)).with_nullability(Nullability::NotAnnotated)
        }
        syntax_kind_ext::FUNCTION_TYPE => {
            let ty = function_type_from_syntax(arena, node, interner, resolve);
            TypeRef::new(ty).with_nullability(Nullability::NotAnnotated)
        }
        _ => TypeRef::new(TypeId::ERROR),
    }
}

fn predefined_type_id(keyword: SyntaxKind) -> TypeId {
    match keyword {
        SyntaxKind::VoidKeyword => TypeId::VOID,
        SyntaxKind::BoolKeyword => TypeId::BOOL,
        SyntaxKind::CharKeyword => TypeId::CHAR,
        SyntaxKind::IntKeyword => TypeId::INT,
        SyntaxKind::LongKeyword => TypeId::LONG,
        SyntaxKind::ShortKeyword => TypeId::SHORT,
        SyntaxKind::ByteKeyword => TypeId::BYTE,
        SyntaxKind::FloatKeyword => TypeId::FLOAT,
        SyntaxKind::DoubleKeyword => TypeId::DOUBLE,
        SyntaxKind::DecimalKeyword => TypeId::DECIMAL,
        SyntaxKind::StringKeyword => TypeId::STRING,
        SyntaxKind::ObjectKeyword => TypeId::OBJECT,
        _ => TypeId::ERROR,
    }
}

fn default_annotation(interner: &TypeInterner, ty: TypeId) -> Nullability {
    if is_tag_bearing(interner, ty) {
        Nullability::NotAnnotated
    } else {
        Nullability::Oblivious
    }
}

/// Re-intern a parser-arena atom into the shared type interner.
fn import_atom(arena: &NodeArena, interner: &TypeInterner, atom: Atom) -> Atom {
    interner.intern_string(arena.resolve_atom(atom))
}

#[cfg(test)]
#[path = "../tests/lower_tests.rs"]
mod tests;
