//! Node payload records stored in per-kind arena pools.

use super::{NodeIndex, NodeList};
use fnt_common::interner::Atom;
use fnt_scanner::SyntaxKind;

/// A syntax node: kind tag, source span, and an index into the kind's
/// payload pool (`u32::MAX` for payload-free kinds).
#[derive(Copy, Clone, Debug)]
pub struct Node {
    pub kind: u16,
    pub pos: u32,
    pub end: u32,
    pub data: u32,
}

/// `ref` / `ref readonly` prefix recorded on a function type's return.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RefPrefix {
    None,
    Ref,
    RefReadonly,
}

/// Parameter passing-mode modifier as written.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ParamModifier {
    Value,
    Ref,
    Out,
    In,
}

#[derive(Copy, Clone, Debug)]
pub struct PredefinedTypeData {
    pub keyword: SyntaxKind,
}

#[derive(Clone, Debug)]
pub struct TypeRefData {
    pub name: Atom,
    pub type_arguments: Option<NodeList>,
}

/// Payload for nullable/array/pointer wrappers around an inner type.
#[derive(Copy, Clone, Debug)]
pub struct WrappedTypeData {
    pub inner: NodeIndex,
}

/// A `ref` / `ref readonly` declared type that did not attach to a
/// function-type return (e.g. a ref local's type).
#[derive(Copy, Clone, Debug)]
pub struct RefTypeData {
    pub inner: NodeIndex,
    pub readonly: bool,
}

#[derive(Copy, Clone, Debug)]
pub struct TupleTypeData {
    pub elements: NodeList,
}

/// One tuple element: a type plus an optional, documentation-only name.
#[derive(Copy, Clone, Debug)]
pub struct TupleElementData {
    pub ty: NodeIndex,
    pub name: Atom,
}

#[derive(Copy, Clone, Debug)]
pub struct FunctionTypeData {
    pub return_prefix: RefPrefix,
    pub return_type: NodeIndex,
    pub parameters: NodeList,
}

#[derive(Copy, Clone, Debug)]
pub struct ParameterData {
    pub modifier: ParamModifier,
    pub ty: NodeIndex,
    pub name: Atom,
}

#[derive(Copy, Clone, Debug)]
pub struct LocalDeclData {
    pub ty: NodeIndex,
    pub name: Atom,
}
