//! Parser for the fnt structural-type grammar.
//!
//! The grammar extension implemented here is the type fragment only: a
//! parenthesized list following a type may be a structural-type parameter
//! list, a tuple type, or (in statement position) part of an expression.
//! Disambiguation is speculative with memoized sub-parse outcomes, so deep
//! nesting never re-scans a position twice.

pub mod parser;

pub use parser::node::{
    FunctionTypeData, LocalDeclData, ParamModifier, ParameterData, PredefinedTypeData, RefPrefix,
    RefTypeData, TupleElementData, TupleTypeData, TypeRefData, WrappedTypeData,
};
pub use parser::node_arena::NodeArena;
pub use parser::state::ParserState;
pub use parser::{NodeIndex, NodeList, syntax_kind_ext};
