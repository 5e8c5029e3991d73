//! Rendering interned types back to surface syntax.
//!
//! Used for diagnostics and shape dumps, and by the grammar round-trip
//! tests: re-parsing a formatted shape must reproduce an equal shape.

use crate::intern::TypeInterner;
use crate::signature::{ParamPassing, ReturnPassing, Signature};
use crate::types::{Nullability, SignatureId, TypeId, TypeKey, TypeRef};
use std::fmt::Write;

pub struct TypeFormatter<'a> {
    interner: &'a TypeInterner,
}

impl<'a> TypeFormatter<'a> {
    pub fn new(interner: &'a TypeInterner) -> TypeFormatter<'a> {
        TypeFormatter { interner }
    }

    pub fn format_type_ref(&self, type_ref: TypeRef) -> String {
        let mut out = String::new();
        self.write_type_ref(&mut out, type_ref);
        out
    }

    pub fn format_type(&self, ty: TypeId) -> String {
        self.format_type_ref(TypeRef::new(ty))
    }

    pub fn format_signature_id(&self, id: SignatureId) -> String {
        self.format_signature(&self.interner.signature(id))
    }

    pub fn format_signature(&self, signature: &Signature) -> String {
        let mut out = String::new();
        self.write_signature(&mut out, signature);
        out
    }

    fn write_type_ref(&self, out: &mut String, type_ref: TypeRef) {
        self.write_type(out, type_ref.ty);
        if type_ref.nullability == Nullability::Annotated {
            out.push('?');
        }
    }

    fn write_type(&self, out: &mut String, ty: TypeId) {
        match self.interner.lookup(ty) {
            None | Some(TypeKey::Error) => out.push_str("<error>"),
            Some(TypeKey::Intrinsic(kind)) => out.push_str(kind.name()),
            Some(TypeKey::Named { name, args }) => {
                let name = self.interner.resolve_atom(name);
                if name.as_ref() == "ValueTuple" && args.len() >= 2 {
                    // Tuple surface syntax
                    out.push('(');
                    for (i, &arg) in args.iter().enumerate() {
                        if i > 0 {
                            out.push_str(", ");
                        }
                        self.write_type_ref(out, arg);
                    }
                    out.push(')');
                    return;
                }
                out.push_str(&name);
                if !args.is_empty() {
                    out.push('<');
                    for (i, &arg) in args.iter().enumerate() {
                        if i > 0 {
                            out.push_str(", ");
                        }
                        self.write_type_ref(out, arg);
                    }
                    out.push('>');
                }
            }
            Some(TypeKey::Array(element)) => {
                self.write_type_ref(out, element);
                out.push_str("[]");
            }
            Some(TypeKey::Pointer(pointee)) => {
                self.write_type_ref(out, pointee);
                out.push('*');
            }
            Some(TypeKey::TypeParameter { name, index }) => {
                let name = self.interner.resolve_atom(name);
                if name.is_empty() {
                    let _ = write!(out, "T{index}");
                } else {
                    out.push_str(&name);
                }
            }
            Some(TypeKey::Function(sig_id)) => {
                let signature = self.interner.signature(sig_id);
                self.write_signature(out, &signature);
            }
        }
    }

    fn write_signature(&self, out: &mut String, signature: &Signature) {
        match signature.return_passing {
            ReturnPassing::Value => {}
            ReturnPassing::Ref => out.push_str("ref "),
            ReturnPassing::RefReadonly => out.push_str("ref readonly "),
        }
        self.write_type_ref(out, signature.return_type);
        out.push_str(" (");
        for (i, param) in signature.params.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            match param.passing {
                ParamPassing::Value => {}
                ParamPassing::Ref => out.push_str("ref "),
                ParamPassing::Out => out.push_str("out "),
                ParamPassing::In => out.push_str("in "),
            }
            self.write_type_ref(out, param.ty);
            let name = self.interner.resolve_atom(param.name);
            if !name.is_empty() {
                out.push(' ');
                out.push_str(&name);
            }
        }
        out.push(')');
    }
}
