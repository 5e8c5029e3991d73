//! Scanner/tokenizer for the fnt front-end.
//!
//! This crate provides the lexical analysis phase:
//! - `SyntaxKind` - Token types
//! - `ScannerState` - Tokenizer state machine
//!
//! The scanner supports full state snapshots (`save_state`/`restore_state`)
//! so the parser can run speculative parses and backtrack without re-lexing
//! from the start of the file.

use fnt_common::interner::{Atom, Interner};
use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

/// Token kinds produced by the scanner.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SyntaxKind {
    Unknown,
    EndOfFileToken,

    // Literals and names
    Identifier,
    NumericLiteral,
    StringLiteral,

    // Punctuation
    OpenParenToken,
    CloseParenToken,
    OpenBracketToken,
    CloseBracketToken,
    LessThanToken,
    GreaterThanToken,
    CommaToken,
    SemicolonToken,
    QuestionToken,
    AsteriskToken,
    DotToken,
    EqualsToken,

    // Predefined type keywords
    IntKeyword,
    LongKeyword,
    ShortKeyword,
    ByteKeyword,
    BoolKeyword,
    CharKeyword,
    FloatKeyword,
    DoubleKeyword,
    DecimalKeyword,
    StringKeyword,
    ObjectKeyword,
    VoidKeyword,

    // Modifier keywords
    RefKeyword,
    OutKeyword,
    InKeyword,
    ReadonlyKeyword,
    VarKeyword,
}

impl SyntaxKind {
    /// Whether this token is one of the predefined type keywords.
    pub fn is_predefined_type(self) -> bool {
        matches!(
            self,
            SyntaxKind::IntKeyword
                | SyntaxKind::LongKeyword
                | SyntaxKind::ShortKeyword
                | SyntaxKind::ByteKeyword
                | SyntaxKind::BoolKeyword
                | SyntaxKind::CharKeyword
                | SyntaxKind::FloatKeyword
                | SyntaxKind::DoubleKeyword
                | SyntaxKind::DecimalKeyword
                | SyntaxKind::StringKeyword
                | SyntaxKind::ObjectKeyword
                | SyntaxKind::VoidKeyword
        )
    }

    /// Source text of a fixed-spelling token, for diagnostics.
    pub fn text(self) -> &'static str {
        match self {
            SyntaxKind::OpenParenToken => "(",
            SyntaxKind::CloseParenToken => ")",
            SyntaxKind::OpenBracketToken => "[",
            SyntaxKind::CloseBracketToken => "]",
            SyntaxKind::LessThanToken => "<",
            SyntaxKind::GreaterThanToken => ">",
            SyntaxKind::CommaToken => ",",
            SyntaxKind::SemicolonToken => ";",
            SyntaxKind::QuestionToken => "?",
            SyntaxKind::AsteriskToken => "*",
            SyntaxKind::DotToken => ".",
            SyntaxKind::EqualsToken => "=",
            SyntaxKind::IntKeyword => "int",
            SyntaxKind::LongKeyword => "long",
            SyntaxKind::ShortKeyword => "short",
            SyntaxKind::ByteKeyword => "byte",
            SyntaxKind::BoolKeyword => "bool",
            SyntaxKind::CharKeyword => "char",
            SyntaxKind::FloatKeyword => "float",
            SyntaxKind::DoubleKeyword => "double",
            SyntaxKind::DecimalKeyword => "decimal",
            SyntaxKind::StringKeyword => "string",
            SyntaxKind::ObjectKeyword => "object",
            SyntaxKind::VoidKeyword => "void",
            SyntaxKind::RefKeyword => "ref",
            SyntaxKind::OutKeyword => "out",
            SyntaxKind::InKeyword => "in",
            SyntaxKind::ReadonlyKeyword => "readonly",
            SyntaxKind::VarKeyword => "var",
            SyntaxKind::EndOfFileToken => "<eof>",
            SyntaxKind::Identifier => "identifier",
            SyntaxKind::NumericLiteral => "number",
            SyntaxKind::StringLiteral => "string literal",
            SyntaxKind::Unknown => "<unknown>",
        }
    }
}

static KEYWORDS: Lazy<FxHashMap<&'static str, SyntaxKind>> = Lazy::new(|| {
    let mut map = FxHashMap::default();
    map.insert("int", SyntaxKind::IntKeyword);
    map.insert("long", SyntaxKind::LongKeyword);
    map.insert("short", SyntaxKind::ShortKeyword);
    map.insert("byte", SyntaxKind::ByteKeyword);
    map.insert("bool", SyntaxKind::BoolKeyword);
    map.insert("char", SyntaxKind::CharKeyword);
    map.insert("float", SyntaxKind::FloatKeyword);
    map.insert("double", SyntaxKind::DoubleKeyword);
    map.insert("decimal", SyntaxKind::DecimalKeyword);
    map.insert("string", SyntaxKind::StringKeyword);
    map.insert("object", SyntaxKind::ObjectKeyword);
    map.insert("void", SyntaxKind::VoidKeyword);
    map.insert("ref", SyntaxKind::RefKeyword);
    map.insert("out", SyntaxKind::OutKeyword);
    map.insert("in", SyntaxKind::InKeyword);
    map.insert("readonly", SyntaxKind::ReadonlyKeyword);
    map.insert("var", SyntaxKind::VarKeyword);
    map
});

/// A full snapshot of the scanner position, cheap to copy.
///
/// Restoring a snapshot rewinds the scanner exactly, including the current
/// token and its value, so speculative parses can back out without observable
/// effect.
#[derive(Copy, Clone, Debug)]
pub struct ScannerSnapshot {
    pos: u32,
    token: SyntaxKind,
    token_start: u32,
    token_end: u32,
    token_atom: Atom,
}

/// Tokenizer state machine.
pub struct ScannerState {
    text: Vec<u8>,
    pos: u32,
    token: SyntaxKind,
    token_start: u32,
    token_end: u32,
    token_atom: Atom,
    interner: Interner,
}

impl ScannerState {
    pub fn new(text: &str) -> ScannerState {
        let mut interner = Interner::new();
        interner.intern_common();
        ScannerState {
            text: text.as_bytes().to_vec(),
            pos: 0,
            token: SyntaxKind::Unknown,
            token_start: 0,
            token_end: 0,
            token_atom: Atom::NONE,
            interner,
        }
    }

    /// The current token kind.
    #[inline]
    pub fn token(&self) -> SyntaxKind {
        self.token
    }

    /// Byte offset of the start of the current token.
    #[inline]
    pub fn token_start(&self) -> u32 {
        self.token_start
    }

    /// Byte offset one past the end of the current token.
    #[inline]
    pub fn token_end(&self) -> u32 {
        self.token_end
    }

    /// Interned text of the current identifier token (NONE for punctuation).
    #[inline]
    pub fn token_atom(&self) -> Atom {
        self.token_atom
    }

    /// Resolve an atom produced by this scanner.
    pub fn resolve(&self, atom: Atom) -> &str {
        self.interner.resolve(atom)
    }

    /// Transfer interner ownership to the arena once parsing is done.
    pub fn into_interner(self) -> Interner {
        self.interner
    }

    /// Capture the current scanner position for a speculative parse.
    pub fn save_state(&self) -> ScannerSnapshot {
        ScannerSnapshot {
            pos: self.pos,
            token: self.token,
            token_start: self.token_start,
            token_end: self.token_end,
            token_atom: self.token_atom,
        }
    }

    /// Rewind to a previously captured position.
    pub fn restore_state(&mut self, snapshot: ScannerSnapshot) {
        self.pos = snapshot.pos;
        self.token = snapshot.token;
        self.token_start = snapshot.token_start;
        self.token_end = snapshot.token_end;
        self.token_atom = snapshot.token_atom;
    }

    /// Advance to the next token and return its kind.
    pub fn next_token(&mut self) -> SyntaxKind {
        self.skip_trivia();
        self.token_start = self.pos;
        self.token_atom = Atom::NONE;

        let Some(&ch) = self.text.get(self.pos as usize) else {
            self.token = SyntaxKind::EndOfFileToken;
            self.token_end = self.pos;
            return self.token;
        };

        self.token = match ch {
            b'(' => self.single(SyntaxKind::OpenParenToken),
            b')' => self.single(SyntaxKind::CloseParenToken),
            b'[' => self.single(SyntaxKind::OpenBracketToken),
            b']' => self.single(SyntaxKind::CloseBracketToken),
            b'<' => self.single(SyntaxKind::LessThanToken),
            b'>' => self.single(SyntaxKind::GreaterThanToken),
            b',' => self.single(SyntaxKind::CommaToken),
            b';' => self.single(SyntaxKind::SemicolonToken),
            b'?' => self.single(SyntaxKind::QuestionToken),
            b'*' => self.single(SyntaxKind::AsteriskToken),
            b'.' => self.single(SyntaxKind::DotToken),
            b'=' => self.single(SyntaxKind::EqualsToken),
            b'"' => self.scan_string_literal(),
            b'0'..=b'9' => self.scan_numeric_literal(),
            b'_' | b'a'..=b'z' | b'A'..=b'Z' => self.scan_identifier_or_keyword(),
            _ => self.single(SyntaxKind::Unknown),
        };
        self.token_end = self.pos;
        self.token
    }

    #[inline]
    fn single(&mut self, kind: SyntaxKind) -> SyntaxKind {
        self.pos += 1;
        kind
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.text.get(self.pos as usize) {
                Some(b' ' | b'\t' | b'\r' | b'\n') => self.pos += 1,
                Some(b'/') => match self.text.get(self.pos as usize + 1) {
                    Some(b'/') => {
                        self.pos += 2;
                        while let Some(&c) = self.text.get(self.pos as usize) {
                            if c == b'\n' {
                                break;
                            }
                            self.pos += 1;
                        }
                    }
                    Some(b'*') => {
                        self.pos += 2;
                        while let Some(&c) = self.text.get(self.pos as usize) {
                            if c == b'*' && self.text.get(self.pos as usize + 1) == Some(&b'/') {
                                self.pos += 2;
                                break;
                            }
                            self.pos += 1;
                        }
                    }
                    _ => return,
                },
                _ => return,
            }
        }
    }

    fn scan_identifier_or_keyword(&mut self) -> SyntaxKind {
        let start = self.pos as usize;
        while let Some(&c) = self.text.get(self.pos as usize) {
            if c == b'_' || c.is_ascii_alphanumeric() {
                self.pos += 1;
            } else {
                break;
            }
        }
        // Source text is valid UTF-8 and identifiers are ASCII
        let text = std::str::from_utf8(&self.text[start..self.pos as usize]).unwrap_or("");
        if let Some(&kind) = KEYWORDS.get(text) {
            return kind;
        }
        self.token_atom = self.interner.intern(text);
        SyntaxKind::Identifier
    }

    fn scan_numeric_literal(&mut self) -> SyntaxKind {
        while let Some(&c) = self.text.get(self.pos as usize) {
            if c.is_ascii_digit() || c == b'.' || c == b'_' {
                self.pos += 1;
            } else {
                break;
            }
        }
        SyntaxKind::NumericLiteral
    }

    fn scan_string_literal(&mut self) -> SyntaxKind {
        self.pos += 1; // opening quote
        while let Some(&c) = self.text.get(self.pos as usize) {
            self.pos += 1;
            if c == b'"' {
                break;
            }
        }
        SyntaxKind::StringLiteral
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<SyntaxKind> {
        let mut scanner = ScannerState::new(text);
        let mut out = Vec::new();
        loop {
            let kind = scanner.next_token();
            if kind == SyntaxKind::EndOfFileToken {
                return out;
            }
            out.push(kind);
        }
    }

    #[test]
    fn test_scan_function_type_tokens() {
        assert_eq!(
            kinds("int (int x, int y) z"),
            vec![
                SyntaxKind::IntKeyword,
                SyntaxKind::OpenParenToken,
                SyntaxKind::IntKeyword,
                SyntaxKind::Identifier,
                SyntaxKind::CommaToken,
                SyntaxKind::IntKeyword,
                SyntaxKind::Identifier,
                SyntaxKind::CloseParenToken,
                SyntaxKind::Identifier,
            ]
        );
    }

    #[test]
    fn test_scan_keywords_and_modifiers() {
        assert_eq!(
            kinds("ref readonly string? s;"),
            vec![
                SyntaxKind::RefKeyword,
                SyntaxKind::ReadonlyKeyword,
                SyntaxKind::StringKeyword,
                SyntaxKind::QuestionToken,
                SyntaxKind::Identifier,
                SyntaxKind::SemicolonToken,
            ]
        );
    }

    #[test]
    fn test_scan_comments_and_generics() {
        assert_eq!(
            kinds("List<List<int>> /* block */ xs // line"),
            vec![
                SyntaxKind::Identifier,
                SyntaxKind::LessThanToken,
                SyntaxKind::Identifier,
                SyntaxKind::LessThanToken,
                SyntaxKind::IntKeyword,
                SyntaxKind::GreaterThanToken,
                SyntaxKind::GreaterThanToken,
                SyntaxKind::Identifier,
            ]
        );
    }

    #[test]
    fn test_snapshot_restore() {
        let mut scanner = ScannerState::new("int (bool b)");
        scanner.next_token();
        assert_eq!(scanner.token(), SyntaxKind::IntKeyword);

        let snapshot = scanner.save_state();
        scanner.next_token();
        scanner.next_token();
        assert_eq!(scanner.token(), SyntaxKind::BoolKeyword);

        scanner.restore_state(snapshot);
        assert_eq!(scanner.token(), SyntaxKind::IntKeyword);
        assert_eq!(scanner.next_token(), SyntaxKind::OpenParenToken);
    }

    #[test]
    fn test_identifier_atoms_dedup() {
        let mut scanner = ScannerState::new("alpha beta alpha");
        scanner.next_token();
        let first = scanner.token_atom();
        scanner.next_token();
        let second = scanner.token_atom();
        scanner.next_token();
        let third = scanner.token_atom();
        assert_eq!(first, third);
        assert_ne!(first, second);
        assert_eq!(scanner.resolve(first), "alpha");
    }
}
