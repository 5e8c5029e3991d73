//! Parser state - the committed type grammar and statement entry points.
//!
//! The speculative scans in `lookahead` decide which alternative wins;
//! everything here builds nodes along the already-confirmed path.

use super::node::{
    FunctionTypeData, LocalDeclData, ParamModifier, ParameterData, RefPrefix, RefTypeData,
    TupleElementData, TypeRefData,
};
use super::state::ParserState;
use super::{NodeIndex, NodeList, syntax_kind_ext};
use fnt_common::diagnostics::{Diagnostic, diagnostic_messages};
use fnt_common::interner::Atom;
use fnt_scanner::SyntaxKind;
use smallvec::SmallVec;

impl ParserState {
    // =========================================================================
    // Parse Methods - Types
    // =========================================================================

    /// Parse a type, including `ref`/`ref readonly` prefixes and the
    /// postfix forms `?`, `[]`, `*`, and `( parameter-list )`.
    pub fn parse_type(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        if self.is_token(SyntaxKind::RefKeyword) {
            self.next_token();
            let prefix = if self.parse_optional(SyntaxKind::ReadonlyKeyword) {
                RefPrefix::RefReadonly
            } else {
                RefPrefix::Ref
            };
            return self.parse_postfix_type(start_pos, Some(prefix));
        }
        self.parse_postfix_type(start_pos, None)
    }

    fn parse_postfix_type(&mut self, start_pos: u32, mut ref_prefix: Option<RefPrefix>) -> NodeIndex {
        let mut ty = self.parse_core_type();
        loop {
            match self.token() {
                SyntaxKind::QuestionToken => {
                    self.next_token();
                    ty = self.arena.add_wrapped_type(
                        syntax_kind_ext::NULLABLE_TYPE,
                        start_pos,
                        self.prev_token_end,
                        ty,
                    );
                }
                SyntaxKind::OpenBracketToken => {
                    self.next_token();
                    self.parse_expected(SyntaxKind::CloseBracketToken);
                    ty = self.arena.add_wrapped_type(
                        syntax_kind_ext::ARRAY_TYPE,
                        start_pos,
                        self.prev_token_end,
                        ty,
                    );
                }
                SyntaxKind::AsteriskToken => {
                    self.next_token();
                    ty = self.arena.add_wrapped_type(
                        syntax_kind_ext::POINTER_TYPE,
                        start_pos,
                        self.prev_token_end,
                        ty,
                    );
                }
                SyntaxKind::OpenParenToken if self.look_ahead_is_parameter_list() => {
                    let parameters = self.parse_parameter_list();
                    // The first function type formed claims a pending
                    // `ref` prefix as its return passing mode.
                    let return_prefix = ref_prefix.take().unwrap_or(RefPrefix::None);
                    ty = self.arena.add_function_type(
                        start_pos,
                        self.prev_token_end,
                        FunctionTypeData {
                            return_prefix,
                            return_type: ty,
                            parameters,
                        },
                    );
                }
                _ => break,
            }
        }
        if let Some(prefix) = ref_prefix {
            ty = self.arena.add_ref_type(
                start_pos,
                self.prev_token_end,
                RefTypeData {
                    inner: ty,
                    readonly: prefix == RefPrefix::RefReadonly,
                },
            );
        }
        ty
    }

    fn parse_core_type(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();

        if self.token().is_predefined_type() {
            let keyword = self.token();
            self.next_token();
            return self
                .arena
                .add_predefined_type(start_pos, self.prev_token_end, keyword);
        }

        if self.is_token(SyntaxKind::OpenParenToken) {
            return self.parse_tuple_or_grouped_type();
        }

        if self.is_token(SyntaxKind::Identifier) {
            let name = self.token_atom();
            self.next_token();
            let type_arguments = self
                .is_token(SyntaxKind::LessThanToken)
                .then(|| self.parse_type_arguments());
            return self.arena.add_type_ref(
                start_pos,
                self.prev_token_end,
                TypeRefData {
                    name,
                    type_arguments,
                },
            );
        }

        self.error_type_expected();
        self.arena.add_error(start_pos)
    }

    fn parse_type_arguments(&mut self) -> NodeList {
        self.next_token(); // consume <
        let mut args: Vec<NodeIndex> = Vec::new();
        loop {
            args.push(self.parse_type());
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.parse_expected(SyntaxKind::GreaterThanToken);
        self.arena.make_node_list(args)
    }

    /// Parse `( element, ... )` as a tuple type, or unwrap a single
    /// unnamed element as a grouped (parenthesized) type.
    fn parse_tuple_or_grouped_type(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        self.next_token(); // consume (

        if self.is_token(SyntaxKind::CloseParenToken) {
            // `()` is not a type; recover with an error node
            self.error_type_expected();
            self.next_token();
            return self.arena.add_error(start_pos);
        }

        let mut elements: SmallVec<[NodeIndex; 4]> = SmallVec::new();
        loop {
            let element_start = self.token_pos();
            let ty = self.parse_type();
            let name = if self.is_token(SyntaxKind::Identifier) {
                let atom = self.token_atom();
                self.next_token();
                atom
            } else {
                Atom::NONE
            };
            elements.push(self.arena.add_tuple_element(
                element_start,
                self.prev_token_end,
                TupleElementData { ty, name },
            ));
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.parse_expected(SyntaxKind::CloseParenToken);

        if elements.len() == 1 {
            let only = elements[0];
            let unnamed = self
                .arena
                .get(only)
                .and_then(|node| self.arena.get_tuple_element(node))
                .is_some_and(|el| el.name.is_none());
            if unnamed {
                // Grouping parentheses, not a tuple
                let inner = self
                    .arena
                    .get(only)
                    .and_then(|node| self.arena.get_tuple_element(node))
                    .map(|el| el.ty)
                    .unwrap_or(NodeIndex::NONE);
                return inner;
            }
            self.diagnostics.push(Diagnostic::from_message(
                diagnostic_messages::TUPLE_TOO_SHORT,
                self.file_name.clone(),
                start_pos,
                self.prev_token_end.saturating_sub(start_pos),
                &[],
            ));
        }

        let list = self.arena.make_node_list(elements.into_vec());
        self.arena
            .add_tuple_type(start_pos, self.prev_token_end, list)
    }

    // =========================================================================
    // Parse Methods - Parameters
    // =========================================================================

    /// Parse a confirmed `( parameter, ... )` list. The caller has already
    /// established via lookahead that the alternative won.
    pub(crate) fn parse_parameter_list(&mut self) -> NodeList {
        self.next_token(); // consume (
        let mut params: Vec<NodeIndex> = Vec::new();
        if !self.parse_optional(SyntaxKind::CloseParenToken) {
            loop {
                params.push(self.parse_parameter());
                if !self.parse_optional(SyntaxKind::CommaToken) {
                    break;
                }
            }
            self.parse_expected(SyntaxKind::CloseParenToken);
        }
        self.arena.make_node_list(params)
    }

    /// Parse a single parameter: `[ref|out|in] type [identifier]`.
    pub fn parse_parameter(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        let modifier = match self.token() {
            SyntaxKind::RefKeyword => {
                self.next_token();
                ParamModifier::Ref
            }
            SyntaxKind::OutKeyword => {
                self.next_token();
                ParamModifier::Out
            }
            SyntaxKind::InKeyword => {
                self.next_token();
                ParamModifier::In
            }
            _ => ParamModifier::Value,
        };
        let ty = self.parse_type();
        let name = if self.is_token(SyntaxKind::Identifier) {
            let atom = self.token_atom();
            self.next_token();
            atom
        } else {
            Atom::NONE
        };
        self.arena.add_parameter(
            start_pos,
            self.prev_token_end,
            ParameterData { modifier, ty, name },
        )
    }

    // =========================================================================
    // Parse Methods - Statements
    // =========================================================================

    /// Parse statements until end of input.
    pub fn parse_statements(&mut self) -> Vec<NodeIndex> {
        let mut statements = Vec::new();
        while !self.is_token(SyntaxKind::EndOfFileToken) {
            statements.push(self.parse_statement());
        }
        statements
    }

    pub fn parse_statement(&mut self) -> NodeIndex {
        if self.look_ahead_is_local_declaration() {
            self.parse_local_declaration()
        } else {
            self.parse_expression_statement()
        }
    }

    /// Parse `type identifier [= ...] ;`.
    pub fn parse_local_declaration(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        let ty = self.parse_type();
        let name = if self.is_token(SyntaxKind::Identifier) {
            let atom = self.token_atom();
            self.next_token();
            atom
        } else {
            self.parse_expected(SyntaxKind::Identifier);
            Atom::NONE
        };
        if self.parse_optional(SyntaxKind::EqualsToken) {
            // Initializer expressions are outside this grammar fragment;
            // consume opaquely up to the statement terminator.
            self.skip_to_semicolon();
        }
        self.parse_expected(SyntaxKind::SemicolonToken);
        self.arena
            .add_local_declaration(start_pos, self.prev_token_end, LocalDeclData { ty, name })
    }

    /// A statement that failed declaration lookahead. Consumed opaquely -
    /// expression grammar belongs to the surrounding parser, and the failed
    /// speculation is not an error.
    fn parse_expression_statement(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        self.skip_to_semicolon();
        self.parse_optional(SyntaxKind::SemicolonToken);
        self.arena
            .add_expression_statement(start_pos, self.prev_token_end)
    }

    fn skip_to_semicolon(&mut self) {
        while !self.is_token(SyntaxKind::SemicolonToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            self.next_token();
        }
    }
}
