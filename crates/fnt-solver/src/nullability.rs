//! Nullability transform codec.
//!
//! Annotations travel out-of-band as a flat, ordered tag stream: one tag
//! per reference-type occurrence, visited in a fixed deterministic order -
//! return type first, then each parameter's type in ordinal order,
//! recursing into nested type arguments the same way annotation
//! serialization orders them everywhere else. There are no separators and
//! no length prefix; length is recovered by replaying the traversal
//! against a known shape.

use crate::intern::TypeInterner;
use crate::types::{Nullability, SignatureId, TypeId, TypeKey, TypeRef};

/// Whether a type occurrence carries a tag in the transform stream.
///
/// Named types, type parameters, arrays, and function shapes are
/// reference-like; so are the `string`/`object` intrinsics. Value
/// intrinsics and pointers are not (a pointer still recurses into its
/// pointee). The classification is a pure function of the interned shape,
/// so decode can replay it with no side data.
pub fn is_tag_bearing(interner: &TypeInterner, ty: TypeId) -> bool {
    match interner.lookup(ty) {
        Some(TypeKey::Named { .. })
        | Some(TypeKey::Array(_))
        | Some(TypeKey::Function(_))
        | Some(TypeKey::TypeParameter { .. }) => true,
        Some(TypeKey::Intrinsic(kind)) => kind.is_reference_like(),
        _ => false,
    }
}

/// Append one tag per reference-type occurrence of `signature`, in
/// traversal order.
pub fn emit_transforms(interner: &TypeInterner, signature: SignatureId, out: &mut Vec<Nullability>) {
    let signature = interner.signature(signature);
    emit_type(interner, signature.return_type, out);
    for param in &signature.params {
        emit_type(interner, param.ty, out);
    }
}

fn emit_type(interner: &TypeInterner, type_ref: TypeRef, out: &mut Vec<Nullability>) {
    if is_tag_bearing(interner, type_ref.ty) {
        out.push(type_ref.nullability);
    }
    match interner.lookup(type_ref.ty) {
        Some(TypeKey::Named { args, .. }) => {
            for arg in args {
                emit_type(interner, arg, out);
            }
        }
        Some(TypeKey::Array(element)) => emit_type(interner, element, out),
        Some(TypeKey::Pointer(pointee)) => emit_type(interner, pointee, out),
        Some(TypeKey::Function(nested)) => {
            let nested = interner.signature(nested);
            emit_type(interner, nested.return_type, out);
            for param in &nested.params {
                emit_type(interner, param.ty, out);
            }
        }
        _ => {}
    }
}

/// Apply a tag stream to `signature`, producing annotated types in the
/// same traversal order `emit_transforms` uses.
///
/// `cursor` is advanced by exactly the number of occurrences the shape
/// has, so a caller can thread one stream across multiple signatures. An
/// empty stream applies `default_tag` to every occurrence without touching
/// the cursor.
///
/// Returns the new signature id and whether any produced annotation
/// differs from the original. When nothing changed, the original id is
/// returned and no new signature is allocated.
///
/// # Panics
///
/// Panics if the stream runs out before the traversal completes -
/// consuming fewer tags than the shape expects is a caller contract error,
/// and silently coercing would desynchronize every later signature sharing
/// the stream.
pub fn apply_transforms(
    interner: &TypeInterner,
    signature: SignatureId,
    default_tag: Nullability,
    tags: &[Nullability],
    cursor: &mut usize,
) -> (SignatureId, bool) {
    let data = interner.signature(signature);

    let mut changed = false;
    let (new_return, return_changed) =
        apply_to_type(interner, data.return_type, default_tag, tags, cursor);
    changed |= return_changed;

    let mut new_param_types: Vec<TypeRef> = Vec::with_capacity(data.params.len());
    for param in &data.params {
        let (new_type, param_changed) = apply_to_type(interner, param.ty, default_tag, tags, cursor);
        changed |= param_changed;
        new_param_types.push(new_type);
    }

    if !changed {
        return (signature, false);
    }
    let substituted = data.substitute(new_return, &new_param_types, None, None);
    (interner.intern_signature(substituted), true)
}

fn next_tag(default_tag: Nullability, tags: &[Nullability], cursor: &mut usize) -> Nullability {
    if tags.is_empty() {
        return default_tag;
    }
    assert!(
        *cursor < tags.len(),
        "nullability transform stream exhausted before the shape traversal completed"
    );
    let tag = tags[*cursor];
    *cursor += 1;
    tag
}

fn apply_to_type(
    interner: &TypeInterner,
    type_ref: TypeRef,
    default_tag: Nullability,
    tags: &[Nullability],
    cursor: &mut usize,
) -> (TypeRef, bool) {
    let mut changed = false;
    let nullability = if is_tag_bearing(interner, type_ref.ty) {
        let tag = next_tag(default_tag, tags, cursor);
        if tag != type_ref.nullability {
            changed = true;
        }
        tag
    } else {
        type_ref.nullability
    };

    let ty = match interner.lookup(type_ref.ty) {
        Some(TypeKey::Named { name, args }) => {
            let mut new_args: Vec<TypeRef> = Vec::with_capacity(args.len());
            let mut args_changed = false;
            for arg in args {
                let (new_arg, arg_changed) =
                    apply_to_type(interner, arg, default_tag, tags, cursor);
                args_changed |= arg_changed;
                new_args.push(new_arg);
            }
            if args_changed {
                changed = true;
                interner.intern(TypeKey::Named {
                    name,
                    args: new_args,
                })
            } else {
                type_ref.ty
            }
        }
        Some(TypeKey::Array(element)) => {
            let (new_element, element_changed) =
                apply_to_type(interner, element, default_tag, tags, cursor);
            if element_changed {
                changed = true;
                interner.intern(TypeKey::Array(new_element))
            } else {
                type_ref.ty
            }
        }
        Some(TypeKey::Pointer(pointee)) => {
            let (new_pointee, pointee_changed) =
                apply_to_type(interner, pointee, default_tag, tags, cursor);
            if pointee_changed {
                changed = true;
                interner.intern(TypeKey::Pointer(new_pointee))
            } else {
                type_ref.ty
            }
        }
        Some(TypeKey::Function(nested)) => {
            let (new_nested, nested_changed) =
                apply_transforms(interner, nested, default_tag, tags, cursor);
            if nested_changed {
                changed = true;
                interner.intern(TypeKey::Function(new_nested))
            } else {
                type_ref.ty
            }
        }
        _ => type_ref.ty,
    };

    (
        TypeRef {
            ty,
            nullability,
            modifiers: type_ref.modifiers,
        },
        changed,
    )
}

#[cfg(test)]
#[path = "../tests/nullability_tests.rs"]
mod tests;
