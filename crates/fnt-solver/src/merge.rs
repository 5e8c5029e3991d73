//! Variance-aware signature merge ("best common shape").
//!
//! `merge_signatures(a, b, variance)` computes the most specific shape
//! compatible with both inputs, used when one type must stand in for two
//! structurally-equal-but-differently-annotated occurrences (e.g. the two
//! branches of a conditional). Only annotation payloads ever differ between
//! the inputs; the shape itself is a precondition.

use crate::intern::TypeInterner;
use crate::signature::{ComparisonMode, ReturnPassing, Variance};
use crate::types::{Nullability, SignatureId, TypeId, TypeKey, TypeRef};
use tracing::debug;

/// Merge two interned signatures under the given variance.
///
/// Returns `a` itself (no allocation) when every constituent merge is a
/// no-op.
///
/// # Panics
///
/// The inputs must already be equal under the nullability-insensitive
/// comparison mode - same arity, same passing modes, same underlying
/// shape. Violating that is a caller contract error, and the merge fails
/// fast rather than producing a corrupted shape.
pub fn merge_signatures(
    interner: &TypeInterner,
    a: SignatureId,
    b: SignatureId,
    variance: Variance,
) -> SignatureId {
    if a == b {
        // Identity law: merge(a, a, _) == a
        return a;
    }

    let sig_a = interner.signature(a);
    let sig_b = interner.signature(b);
    assert!(
        interner.signatures_equal(&sig_a, &sig_b, ComparisonMode::MODIFIERS),
        "merge requires signatures equal up to nullability annotations"
    );

    // By-reference returns merge with no variance: aliasing requires
    // exact agreement.
    let return_variance = if sig_a.return_passing == ReturnPassing::Value {
        variance
    } else {
        Variance::None
    };
    let merged_return = merge_type_refs(
        interner,
        sig_a.return_type,
        sig_b.return_type,
        return_variance,
    );

    let param_variance = variance.flip();
    let merged_params: Vec<TypeRef> = sig_a
        .params
        .iter()
        .zip(sig_b.params.iter())
        .map(|(pa, pb)| {
            let v = if pa.passing.is_by_ref() {
                Variance::None
            } else {
                param_variance
            };
            merge_type_refs(interner, pa.ty, pb.ty, v)
        })
        .collect();

    let unchanged = merged_return == sig_a.return_type
        && merged_params
            .iter()
            .zip(sig_a.params.iter())
            .all(|(merged, original)| *merged == original.ty);
    if unchanged {
        return a;
    }

    debug!(from = a.0, with = b.0, "merge produced a new signature");
    let merged = sig_a.substitute(merged_return, &merged_params, None, None);
    interner.intern_signature(merged)
}

/// Merge two annotated type references. The underlying types must be equal
/// up to nullability; custom modifiers are identical by precondition and
/// carried from `a`.
pub fn merge_type_refs(
    interner: &TypeInterner,
    a: TypeRef,
    b: TypeRef,
    variance: Variance,
) -> TypeRef {
    let ty = merge_type_ids(interner, a.ty, b.ty, variance);
    let nullability = merge_nullability(a.nullability, b.nullability, variance);
    TypeRef {
        ty,
        nullability,
        modifiers: a.modifiers,
    }
}

fn merge_nullability(a: Nullability, b: Nullability, variance: Variance) -> Nullability {
    match variance {
        Variance::Out => a.join(b),
        Variance::In => a.meet(b),
        Variance::None => a.ensure_compatible(b),
    }
}

fn merge_type_ids(interner: &TypeInterner, a: TypeId, b: TypeId, variance: Variance) -> TypeId {
    if a == b {
        return a;
    }
    match (interner.lookup(a), interner.lookup(b)) {
        (
            Some(TypeKey::Named {
                name,
                args: args_a,
            }),
            Some(TypeKey::Named { args: args_b, .. }),
        ) => {
            // Without declaration-site variance information, type
            // arguments merge invariantly.
            let args = args_a
                .iter()
                .zip(args_b.iter())
                .map(|(&x, &y)| merge_type_refs(interner, x, y, Variance::None))
                .collect();
            interner.intern(TypeKey::Named { name, args })
        }
        (Some(TypeKey::Array(element_a)), Some(TypeKey::Array(element_b))) => {
            let element = merge_type_refs(interner, element_a, element_b, variance);
            interner.intern(TypeKey::Array(element))
        }
        (Some(TypeKey::Pointer(pointee_a)), Some(TypeKey::Pointer(pointee_b))) => {
            let pointee = merge_type_refs(interner, pointee_a, pointee_b, Variance::None);
            interner.intern(TypeKey::Pointer(pointee))
        }
        (Some(TypeKey::Function(sig_a)), Some(TypeKey::Function(sig_b))) => {
            let merged = merge_signatures(interner, sig_a, sig_b, variance);
            interner.intern(TypeKey::Function(merged))
        }
        (Some(TypeKey::TypeParameter { .. }), Some(TypeKey::TypeParameter { .. })) => {
            // Same index by precondition; names are documentation only
            a
        }
        _ => panic!("merge requires structurally equal underlying types"),
    }
}

#[cfg(test)]
#[path = "../tests/merge_tests.rs"]
mod tests;
