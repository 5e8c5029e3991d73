//! NodeArena: side-table storage for syntax nodes.
//!
//! Nodes are a flat `Vec<Node>`; kind-specific payloads live in per-kind
//! pools indexed by `Node::data`. This keeps the hot node vector small and
//! lets payloads vary in size without boxing.

use super::node::*;
use super::{NodeIndex, NodeList, syntax_kind_ext};
use fnt_common::interner::{Atom, Interner};
use fnt_scanner::SyntaxKind;

#[derive(Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
    predefined: Vec<PredefinedTypeData>,
    type_refs: Vec<TypeRefData>,
    wrapped: Vec<WrappedTypeData>,
    ref_types: Vec<RefTypeData>,
    tuples: Vec<TupleTypeData>,
    tuple_elements: Vec<TupleElementData>,
    functions: Vec<FunctionTypeData>,
    parameters: Vec<ParameterData>,
    locals: Vec<LocalDeclData>,
    lists: Vec<Vec<NodeIndex>>,
    interner: Interner,
}

impl NodeArena {
    pub fn new() -> NodeArena {
        NodeArena::default()
    }

    /// Set the interner (called after parsing to transfer ownership from the scanner).
    pub fn set_interner(&mut self, interner: Interner) {
        self.interner = interner;
    }

    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    /// Resolve an identifier atom to its text.
    pub fn resolve_atom(&self, atom: Atom) -> &str {
        self.interner.resolve(atom)
    }

    pub fn get(&self, index: NodeIndex) -> Option<&Node> {
        if index.is_none() {
            return None;
        }
        self.nodes.get(index.0 as usize)
    }

    pub fn node_list(&self, list: NodeList) -> &[NodeIndex] {
        self.lists
            .get(list.0 as usize)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn make_node_list(&mut self, nodes: Vec<NodeIndex>) -> NodeList {
        let id = NodeList(self.lists.len() as u32);
        self.lists.push(nodes);
        id
    }

    fn push_node(&mut self, kind: u16, pos: u32, end: u32, data: u32) -> NodeIndex {
        let index = NodeIndex(self.nodes.len() as u32);
        self.nodes.push(Node {
            kind,
            pos,
            end,
            data,
        });
        index
    }

    // =========================================================================
    // Node constructors
    // =========================================================================

    pub fn add_error(&mut self, pos: u32) -> NodeIndex {
        self.push_node(syntax_kind_ext::ERROR, pos, pos, u32::MAX)
    }

    pub fn add_predefined_type(&mut self, pos: u32, end: u32, keyword: SyntaxKind) -> NodeIndex {
        let data = self.predefined.len() as u32;
        self.predefined.push(PredefinedTypeData { keyword });
        self.push_node(syntax_kind_ext::PREDEFINED_TYPE, pos, end, data)
    }

    pub fn add_type_ref(&mut self, pos: u32, end: u32, payload: TypeRefData) -> NodeIndex {
        let data = self.type_refs.len() as u32;
        self.type_refs.push(payload);
        self.push_node(syntax_kind_ext::TYPE_REFERENCE, pos, end, data)
    }

    /// Nullable, array, and pointer types share the wrapper payload.
    pub fn add_wrapped_type(
        &mut self,
        kind: u16,
        pos: u32,
        end: u32,
        inner: NodeIndex,
    ) -> NodeIndex {
        let data = self.wrapped.len() as u32;
        self.wrapped.push(WrappedTypeData { inner });
        self.push_node(kind, pos, end, data)
    }

    pub fn add_ref_type(&mut self, pos: u32, end: u32, payload: RefTypeData) -> NodeIndex {
        let data = self.ref_types.len() as u32;
        self.ref_types.push(payload);
        self.push_node(syntax_kind_ext::REF_TYPE, pos, end, data)
    }

    pub fn add_tuple_type(&mut self, pos: u32, end: u32, elements: NodeList) -> NodeIndex {
        let data = self.tuples.len() as u32;
        self.tuples.push(TupleTypeData { elements });
        self.push_node(syntax_kind_ext::TUPLE_TYPE, pos, end, data)
    }

    pub fn add_tuple_element(
        &mut self,
        pos: u32,
        end: u32,
        payload: TupleElementData,
    ) -> NodeIndex {
        let data = self.tuple_elements.len() as u32;
        self.tuple_elements.push(payload);
        self.push_node(syntax_kind_ext::TUPLE_ELEMENT, pos, end, data)
    }

    pub fn add_function_type(
        &mut self,
        pos: u32,
        end: u32,
        payload: FunctionTypeData,
    ) -> NodeIndex {
        let data = self.functions.len() as u32;
        self.functions.push(payload);
        self.push_node(syntax_kind_ext::FUNCTION_TYPE, pos, end, data)
    }

    pub fn add_parameter(&mut self, pos: u32, end: u32, payload: ParameterData) -> NodeIndex {
        let data = self.parameters.len() as u32;
        self.parameters.push(payload);
        self.push_node(syntax_kind_ext::PARAMETER, pos, end, data)
    }

    pub fn add_local_declaration(
        &mut self,
        pos: u32,
        end: u32,
        payload: LocalDeclData,
    ) -> NodeIndex {
        let data = self.locals.len() as u32;
        self.locals.push(payload);
        self.push_node(syntax_kind_ext::LOCAL_DECLARATION, pos, end, data)
    }

    pub fn add_expression_statement(&mut self, pos: u32, end: u32) -> NodeIndex {
        self.push_node(syntax_kind_ext::EXPRESSION_STATEMENT, pos, end, u32::MAX)
    }

    // =========================================================================
    // Payload accessors
    // =========================================================================

    pub fn get_predefined(&self, node: &Node) -> Option<&PredefinedTypeData> {
        (node.kind == syntax_kind_ext::PREDEFINED_TYPE)
            .then(|| self.predefined.get(node.data as usize))
            .flatten()
    }

    pub fn get_type_ref(&self, node: &Node) -> Option<&TypeRefData> {
        (node.kind == syntax_kind_ext::TYPE_REFERENCE)
            .then(|| self.type_refs.get(node.data as usize))
            .flatten()
    }

    pub fn get_wrapped(&self, node: &Node) -> Option<&WrappedTypeData> {
        matches!(
            node.kind,
            syntax_kind_ext::NULLABLE_TYPE
                | syntax_kind_ext::ARRAY_TYPE
                | syntax_kind_ext::POINTER_TYPE
        )
        .then(|| self.wrapped.get(node.data as usize))
        .flatten()
    }

    pub fn get_ref_type(&self, node: &Node) -> Option<&RefTypeData> {
        (node.kind == syntax_kind_ext::REF_TYPE)
            .then(|| self.ref_types.get(node.data as usize))
            .flatten()
    }

    pub fn get_tuple(&self, node: &Node) -> Option<&TupleTypeData> {
        (node.kind == syntax_kind_ext::TUPLE_TYPE)
            .then(|| self.tuples.get(node.data as usize))
            .flatten()
    }

    pub fn get_tuple_element(&self, node: &Node) -> Option<&TupleElementData> {
        (node.kind == syntax_kind_ext::TUPLE_ELEMENT)
            .then(|| self.tuple_elements.get(node.data as usize))
            .flatten()
    }

    pub fn get_function_type(&self, node: &Node) -> Option<&FunctionTypeData> {
        (node.kind == syntax_kind_ext::FUNCTION_TYPE)
            .then(|| self.functions.get(node.data as usize))
            .flatten()
    }

    pub fn get_parameter(&self, node: &Node) -> Option<&ParameterData> {
        (node.kind == syntax_kind_ext::PARAMETER)
            .then(|| self.parameters.get(node.data as usize))
            .flatten()
    }

    pub fn get_local_declaration(&self, node: &Node) -> Option<&LocalDeclData> {
        (node.kind == syntax_kind_ext::LOCAL_DECLARATION)
            .then(|| self.locals.get(node.data as usize))
            .flatten()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
