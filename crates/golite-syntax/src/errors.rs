//! Centralized diagnostic definitions for the golite lexer.
//!
//! The lexer reports malformed input through these codes; the parser
//! itself signals failure by absence and has no codes of its own.

use golite_common::{Diagnostic, Label, Span};

/// Lexical error codes (1xxx range).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum SyntaxError {
    // === Comments (1000-1009) ===
    /// Unterminated block comment.
    UnterminatedBlockComment = 1000,

    // === String/rune literals (1010-1029) ===
    /// Unterminated string literal.
    UnterminatedString = 1010,
    /// Unterminated rune literal.
    UnterminatedRune = 1012,
    /// Empty rune literal.
    EmptyRune = 1013,
    /// Rune literal with more than one character.
    MultiCharRune = 1014,

    // === Escape sequences (1030-1039) ===
    /// Unknown escape sequence.
    UnknownEscape = 1030,
    /// Escape sequence cut off by end of input.
    UnterminatedEscape = 1031,
    /// Hex escape with too few hex digits.
    EscapeHexDigits = 1032,
    /// Octal escape with fewer than 3 octal digits.
    EscapeOctalDigits = 1033,
    /// Escape value is not a Unicode scalar value.
    EscapeBadScalar = 1034,

    // === Numeric literals (1040-1059) ===
    /// Radix prefix with no digits after it.
    IntNoDigits = 1040,
    /// Digit outside the literal's radix.
    IntBadDigit = 1041,
    /// Fractional part on a binary or octal literal.
    FloatBadRadix = 1042,
    /// Exponent with no digits.
    ExponentNoDigits = 1043,

    // === Other (1090-1099) ===
    /// Character no recognizer accepts.
    UnexpectedChar = 1090,
}

impl SyntaxError {
    pub fn code(self) -> u16 {
        self as u16
    }

    pub fn message(self) -> &'static str {
        match self {
            SyntaxError::UnterminatedBlockComment => "unterminated block comment",
            SyntaxError::UnterminatedString => "unterminated string literal",
            SyntaxError::UnterminatedRune => "unterminated rune literal",
            SyntaxError::EmptyRune => "empty rune literal",
            SyntaxError::MultiCharRune => "rune literal has more than one character",
            SyntaxError::UnknownEscape => "unknown escape sequence",
            SyntaxError::UnterminatedEscape => "escape sequence not terminated",
            SyntaxError::EscapeHexDigits => "escape sequence requires hex digits",
            SyntaxError::EscapeOctalDigits => "octal escape sequence requires 3 octal digits",
            SyntaxError::EscapeBadScalar => "escape value is not a valid Unicode scalar value",
            SyntaxError::IntNoDigits => "integer literal has no digits",
            SyntaxError::IntBadDigit => "invalid digit in integer literal",
            SyntaxError::FloatBadRadix => {
                "binary and octal literals cannot have a fractional part"
            }
            SyntaxError::ExponentNoDigits => "exponent has no digits",
            SyntaxError::UnexpectedChar => "unexpected character",
        }
    }

    /// A diagnostic with this code and a primary label at `span`.
    pub fn at(self, span: impl Into<Span>) -> Diagnostic {
        Diagnostic::error(self.message())
            .with_code(self.code())
            .with_label(Label::primary(span))
    }

    /// Same, with a custom message.
    pub fn at_with_message(self, span: impl Into<Span>, message: impl Into<String>) -> Diagnostic {
        Diagnostic::error(message)
            .with_code(self.code())
            .with_label(Label::primary(span))
    }
}
