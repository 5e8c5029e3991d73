//! Diagnostic records and message codes shared across the fnt crates.

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DiagnosticCategory {
    Warning,
    Error,
    Suggestion,
    Message,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

/// Numeric codes for the diagnostics this subsystem can produce.
pub mod diagnostic_codes {
    /// `{0} expected.`
    pub const TOKEN_EXPECTED: u32 = 1005;
    /// `Type expected.`
    pub const TYPE_EXPECTED: u32 = 1110;
    /// `Tuple types must have at least two elements.`
    pub const TUPLE_TOO_SHORT: u32 = 8124;
    /// `Function types with a variadic calling convention are not supported.`
    pub const UNSUPPORTED_CALLING_CONVENTION: u32 = 8205;
}

pub mod diagnostic_messages {
    use super::{DiagnosticCategory, DiagnosticMessage, diagnostic_codes};

    pub const TOKEN_EXPECTED: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::TOKEN_EXPECTED,
        category: DiagnosticCategory::Error,
        message: "'{0}' expected.",
    };

    pub const TYPE_EXPECTED: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::TYPE_EXPECTED,
        category: DiagnosticCategory::Error,
        message: "Type expected.",
    };

    pub const TUPLE_TOO_SHORT: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::TUPLE_TOO_SHORT,
        category: DiagnosticCategory::Error,
        message: "Tuple types must have at least two elements.",
    };

    pub const UNSUPPORTED_CALLING_CONVENTION: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::UNSUPPORTED_CALLING_CONVENTION,
        category: DiagnosticCategory::Error,
        message: "Function types with a variadic calling convention are not supported.",
    };
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub code: u32,
    pub file: String,
    pub start: u32,
    pub length: u32,
    pub message_text: String,
}

impl Diagnostic {
    pub fn error(
        file: impl Into<String>,
        start: u32,
        length: u32,
        message: impl Into<String>,
        code: u32,
    ) -> Diagnostic {
        Diagnostic {
            category: DiagnosticCategory::Error,
            message_text: message.into(),
            code,
            file: file.into(),
            start,
            length,
        }
    }

    pub fn from_message(
        message: DiagnosticMessage,
        file: impl Into<String>,
        start: u32,
        length: u32,
        args: &[&str],
    ) -> Diagnostic {
        Diagnostic {
            category: message.category,
            code: message.code,
            file: file.into(),
            start,
            length,
            message_text: format_message(message.message, args),
        }
    }
}

/// Substitute `{0}`, `{1}`, ... placeholders in a message template.
pub fn format_message(message: &str, args: &[&str]) -> String {
    let mut result = message.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}
