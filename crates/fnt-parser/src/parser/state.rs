//! Parser state - token cursor, diagnostics, and speculative-parse plumbing.

use super::lookahead::LookaheadRule;
use super::node_arena::NodeArena;
use fnt_common::diagnostics::{Diagnostic, diagnostic_messages};
use fnt_common::interner::Atom;
use fnt_scanner::{ScannerSnapshot, ScannerState, SyntaxKind};
use rustc_hash::FxHashMap;

/// Full parser position, restorable after a speculative parse.
#[derive(Copy, Clone)]
pub(crate) struct ParserSnapshot {
    pub(crate) scanner: ScannerSnapshot,
    pub(crate) token: SyntaxKind,
    pub(crate) prev_token_end: u32,
}

pub struct ParserState {
    pub(crate) scanner: ScannerState,
    pub(crate) current_token: SyntaxKind,
    pub arena: NodeArena,
    pub diagnostics: Vec<Diagnostic>,
    pub(crate) file_name: String,
    /// End offset of the last consumed token, for node end positions.
    pub(crate) prev_token_end: u32,
    /// Memoized speculative-parse outcomes keyed by (start offset, rule).
    /// `Some` holds the parser position just past the recognized construct.
    pub(crate) memo: FxHashMap<(u32, LookaheadRule), Option<ParserSnapshot>>,
}

impl ParserState {
    pub fn new(file_name: impl Into<String>, text: &str) -> ParserState {
        let mut scanner = ScannerState::new(text);
        let current_token = scanner.next_token();
        ParserState {
            scanner,
            current_token,
            arena: NodeArena::new(),
            diagnostics: Vec::new(),
            file_name: file_name.into(),
            prev_token_end: 0,
            memo: FxHashMap::default(),
        }
    }

    /// Finish parsing: move the scanner's interner into the arena and
    /// return the arena plus collected diagnostics.
    pub fn into_parts(mut self) -> (NodeArena, Vec<Diagnostic>) {
        let interner = self.scanner.into_interner();
        self.arena.set_interner(interner);
        (self.arena, self.diagnostics)
    }

    // =========================================================================
    // Token cursor
    // =========================================================================

    #[inline]
    pub(crate) fn token(&self) -> SyntaxKind {
        self.current_token
    }

    #[inline]
    pub(crate) fn is_token(&self, kind: SyntaxKind) -> bool {
        self.current_token == kind
    }

    #[inline]
    pub(crate) fn token_pos(&self) -> u32 {
        self.scanner.token_start()
    }

    /// Interned text of the current identifier token.
    #[inline]
    pub(crate) fn token_atom(&self) -> Atom {
        self.scanner.token_atom()
    }

    pub(crate) fn next_token(&mut self) -> SyntaxKind {
        self.prev_token_end = self.scanner.token_end();
        self.current_token = self.scanner.next_token();
        self.current_token
    }

    /// Consume the current token if it matches; no diagnostic otherwise.
    pub(crate) fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.is_token(kind) {
            self.next_token();
            return true;
        }
        false
    }

    /// Alias of [`Self::eat`] kept for parity with committed-parse call sites.
    pub(crate) fn parse_optional(&mut self, kind: SyntaxKind) -> bool {
        self.eat(kind)
    }

    /// Consume an expected token, emitting a diagnostic when absent.
    pub(crate) fn parse_expected(&mut self, kind: SyntaxKind) -> bool {
        if self.eat(kind) {
            return true;
        }
        self.diagnostics.push(Diagnostic::from_message(
            diagnostic_messages::TOKEN_EXPECTED,
            self.file_name.clone(),
            self.token_pos(),
            0,
            &[kind.text()],
        ));
        false
    }

    pub(crate) fn error_type_expected(&mut self) {
        self.diagnostics.push(Diagnostic::from_message(
            diagnostic_messages::TYPE_EXPECTED,
            self.file_name.clone(),
            self.token_pos(),
            0,
            &[],
        ));
    }

    // =========================================================================
    // Speculation
    // =========================================================================

    pub(crate) fn save(&self) -> ParserSnapshot {
        ParserSnapshot {
            scanner: self.scanner.save_state(),
            token: self.current_token,
            prev_token_end: self.prev_token_end,
        }
    }

    pub(crate) fn restore(&mut self, snapshot: ParserSnapshot) {
        self.scanner.restore_state(snapshot.scanner);
        self.current_token = snapshot.token;
        self.prev_token_end = snapshot.prev_token_end;
    }
}
