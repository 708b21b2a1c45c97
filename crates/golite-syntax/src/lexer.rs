//! Lexer for golite source code.
//!
//! Tokenization proceeds recognizer by recognizer: comments,
//! punctuation (maximal munch over a trie), string literals, rune
//! literals, identifiers and keywords, numeric literals. Numeric
//! literals carry the full radix dance: prefixes, implicit octal with
//! retroactive promotion to decimal, digit separators, per-radix
//! exponent markers, and trailing `i` for imaginary literals.
//!
//! Positions are offset by a base value from `SourceMap::add_file` so
//! spans identify both file and location. Semicolons are inserted at
//! newlines after statement-ending tokens.

use std::collections::HashMap;
use std::str::Chars;
use std::sync::OnceLock;

use golite_common::diagnostics::DiagnosticSink;
use golite_common::span::Span;
use unicode_ident::{is_xid_continue, is_xid_start};

use crate::errors::SyntaxError;
use crate::token::{
    Comment, FloatLit, ImaginaryLit, IntLit, Keyword, Punct, RuneKind, RuneLit, StrLit, Token,
    TokenKind,
};

/// Pull-based character source with unbounded pushback.
///
/// The numeric scanner relies on multi-character pushback: a trailing
/// digit separator puts both the separator and the following character
/// back.
struct Scanner<'src> {
    chars: Chars<'src>,
    pushback: Vec<char>,
    base: u32,
    local_pos: u32,
}

impl<'src> Scanner<'src> {
    fn new(source: &'src str, base: u32) -> Self {
        Self {
            chars: source.chars(),
            pushback: Vec::new(),
            base,
            local_pos: 0,
        }
    }

    /// The current global byte position.
    #[inline]
    fn pos(&self) -> u32 {
        self.base + self.local_pos
    }

    fn next(&mut self) -> Option<char> {
        let c = match self.pushback.pop() {
            Some(c) => c,
            None => self.chars.next()?,
        };
        self.local_pos += c.len_utf8() as u32;
        Some(c)
    }

    fn unget(&mut self, c: char) {
        self.local_pos -= c.len_utf8() as u32;
        self.pushback.push(c);
    }

    fn peek(&mut self) -> Option<char> {
        let c = self.next()?;
        self.unget(c);
        Some(c)
    }

    fn eof(&mut self) -> bool {
        self.peek().is_none()
    }

    fn eat(&mut self, expected: char) -> bool {
        self.eat_any(&[expected]).is_some()
    }

    /// Consumes and returns the next character if it is one of `options`.
    fn eat_any(&mut self, options: &[char]) -> Option<char> {
        let c = self.next()?;
        if options.contains(&c) {
            Some(c)
        } else {
            self.unget(c);
            None
        }
    }
}

/// A node of the punctuation trie. The trie is built once from
/// [`Punct::ALL`] and walked greedily, remembering the last terminal
/// kind seen.
#[derive(Default)]
struct TrieNode {
    terminal: Option<Punct>,
    children: HashMap<char, TrieNode>,
}

fn punct_trie() -> &'static TrieNode {
    static TRIE: OnceLock<TrieNode> = OnceLock::new();
    TRIE.get_or_init(|| {
        let mut root = TrieNode::default();
        for (punct, spelling) in Punct::ALL {
            let mut node = &mut root;
            for ch in spelling.chars() {
                node = node.children.entry(ch).or_default();
            }
            node.terminal = Some(*punct);
        }
        root
    })
}

/// The lexer for golite source code.
pub struct Lexer<'src> {
    scanner: Scanner<'src>,
    /// Whether the previous non-comment token can end a statement.
    prev_ends_statement: bool,
    /// A semicolon is due before the next token.
    pending_semicolon: bool,
    diagnostics: DiagnosticSink,
}

impl<'src> Lexer<'src> {
    /// Creates a lexer with the given base offset (from
    /// `SourceMap::add_file`; use 0 for a standalone source).
    pub fn new(source: &'src str, base: u32) -> Self {
        Self {
            scanner: Scanner::new(source, base),
            prev_ends_statement: false,
            pending_semicolon: false,
            diagnostics: DiagnosticSink::new(),
        }
    }

    pub fn diagnostics(&self) -> &DiagnosticSink {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> DiagnosticSink {
        std::mem::take(&mut self.diagnostics)
    }

    /// Lexes the whole source, ending with an `Eof` token.
    pub fn collect_tokens(mut self) -> (Vec<Token>, DiagnosticSink) {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let is_eof = token.is_eof();
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        (tokens, self.diagnostics)
    }

    /// Returns the next token.
    pub fn next_token(&mut self) -> Token {
        loop {
            if self.pending_semicolon {
                self.pending_semicolon = false;
                return self.insert_semicolon();
            }

            self.skip_whitespace();
            if self.pending_semicolon {
                continue;
            }

            let start = self.scanner.pos();
            if self.scanner.eof() {
                // Inserted semicolon at end of input, so the last
                // declaration gets its terminator.
                if self.prev_ends_statement {
                    self.prev_ends_statement = false;
                    return self.insert_semicolon();
                }
                return Token::new(TokenKind::Eof, Span::from_u32(start, start));
            }
            let Some(c) = self.scanner.peek() else {
                continue;
            };

            let Some(kind) = self.scan_token(c) else {
                continue;
            };

            if !matches!(kind, TokenKind::Comment(_)) {
                self.prev_ends_statement = kind.can_end_statement();
            }
            let span = Span::from_u32(start, self.scanner.pos());
            return Token::new(kind, span);
        }
    }

    fn insert_semicolon(&mut self) -> Token {
        let pos = self.scanner.pos();
        self.prev_ends_statement = false;
        Token::new(TokenKind::Punct(Punct::Semicolon), Span::from_u32(pos, pos))
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.scanner.peek() {
            if c == '\n' {
                self.scanner.next();
                if self.prev_ends_statement {
                    self.pending_semicolon = true;
                    return;
                }
            } else if c.is_whitespace() {
                self.scanner.next();
            } else {
                break;
            }
        }
    }

    /// Scans one token. Returns `None` for a character no recognizer
    /// accepts, after emitting a diagnostic and skipping it.
    fn scan_token(&mut self, c: char) -> Option<TokenKind> {
        let start = self.scanner.pos();

        if c == '/' {
            if let Some(comment) = self.scan_comment() {
                return Some(comment);
            }
        }

        if c == '.' {
            // `.5` is a float literal; `.` and `...` stay with the trie.
            self.scanner.next();
            let after = self.scanner.peek();
            self.scanner.unget('.');
            if after.map_or(false, |d| d.is_ascii_digit()) {
                return Some(self.scan_number());
            }
        }

        if let Some(punct) = self.scan_punct() {
            return Some(TokenKind::Punct(punct));
        }

        match c {
            '"' => Some(self.scan_string()),
            '\'' => Some(self.scan_rune()),
            c if is_ident_start(c) => Some(self.scan_ident()),
            c if c.is_ascii_digit() => Some(self.scan_number()),
            _ => {
                self.scanner.next();
                self.diagnostics.emit(SyntaxError::UnexpectedChar.at_with_message(
                    start..self.scanner.pos(),
                    format!("unexpected character: {c:?}"),
                ));
                None
            }
        }
    }

    // ── Comments ───────────────────────────────────────────────────────

    /// Scans `// ...` or `/* ... */`. Declines a lone `/` by pushing it
    /// back for the punctuation trie.
    fn scan_comment(&mut self) -> Option<TokenKind> {
        let start = self.scanner.pos();
        self.scanner.next(); // '/'
        let multiline = match self.scanner.peek() {
            Some('/') => false,
            Some('*') => true,
            _ => {
                self.scanner.unget('/');
                return None;
            }
        };
        self.scanner.next();

        let mut text = String::new();
        if multiline {
            let mut might_end = false;
            let mut terminated = false;
            let mut has_newline = false;
            while let Some(ch) = self.scanner.next() {
                if might_end {
                    if ch == '/' {
                        terminated = true;
                        break;
                    }
                    // a '*' not followed by '/' belongs to the text
                    text.push('*');
                    might_end = false;
                }
                if ch == '*' {
                    might_end = true;
                    continue;
                }
                if ch == '\n' {
                    has_newline = true;
                }
                text.push(ch);
            }
            if !terminated {
                if might_end {
                    text.push('*');
                }
                self.diagnostics
                    .emit(SyntaxError::UnterminatedBlockComment.at(start..self.scanner.pos()));
            }
            // A comment spanning lines acts as a newline.
            if has_newline && self.prev_ends_statement {
                self.pending_semicolon = true;
            }
            Some(TokenKind::Comment(Comment {
                text,
                multiline: true,
            }))
        } else {
            // The newline is left in place for semicolon insertion.
            while let Some(ch) = self.scanner.peek() {
                if ch == '\n' {
                    break;
                }
                self.scanner.next();
                text.push(ch);
            }
            Some(TokenKind::Comment(Comment {
                text,
                multiline: false,
            }))
        }
    }

    // ── Punctuation ────────────────────────────────────────────────────

    /// Maximal munch over the punctuation trie: walk as far as edges
    /// exist, return the last terminal seen and push back everything
    /// consumed past it.
    fn scan_punct(&mut self) -> Option<Punct> {
        let mut node = punct_trie();
        let mut last: Option<Punct> = None;
        let mut since_last: Vec<char> = Vec::new();

        while let Some(c) = self.scanner.next() {
            match node.children.get(&c) {
                Some(child) => {
                    node = child;
                    if child.terminal.is_some() {
                        last = child.terminal;
                        since_last.clear();
                    } else {
                        since_last.push(c);
                    }
                }
                None => {
                    self.scanner.unget(c);
                    break;
                }
            }
        }

        while let Some(c) = since_last.pop() {
            self.scanner.unget(c);
        }
        last
    }

    // ── Identifiers and keywords ───────────────────────────────────────

    fn scan_ident(&mut self) -> TokenKind {
        let mut ident = String::new();
        while let Some(c) = self.scanner.peek() {
            if is_ident_continue(c) {
                self.scanner.next();
                ident.push(c);
            } else {
                break;
            }
        }
        match Keyword::from_str(&ident) {
            Some(kw) => TokenKind::Keyword(kw),
            None => TokenKind::Ident(ident),
        }
    }

    // ── Numeric literals ───────────────────────────────────────────────

    /// Scans a numeric literal: integer, float, or imaginary.
    fn scan_number(&mut self) -> TokenKind {
        let start = self.scanner.pos();
        let first = self.scanner.next().expect("scan_number called at a digit");

        if first == '.' {
            let lit = self.scan_float_after_dot(String::from("."), 10, start);
            return self.finish_float(lit);
        }

        let mut digits = String::new();
        digits.push(first);
        let mut radix: u8 = 10;
        let mut implicit = false;
        let mut prefixed = false;

        if first == '0' {
            match self.scanner.peek() {
                Some(c) if c.is_ascii_digit() => {
                    radix = 8;
                    implicit = true;
                }
                Some('_') => {
                    radix = 8;
                    implicit = true;
                }
                Some('b') | Some('B') => {
                    radix = 2;
                    prefixed = true;
                }
                Some('o') | Some('O') => {
                    radix = 8;
                    prefixed = true;
                }
                Some('x') | Some('X') => {
                    radix = 16;
                    prefixed = true;
                }
                _ => {}
            }
            if prefixed {
                self.scanner.next();
                digits.clear();
            }
        }

        let (count, all_in_radix) = self.consume_digits(&mut digits, radix, true);

        if prefixed && count == 0 && self.scanner.peek() != Some('.') {
            self.diagnostics
                .emit(SyntaxError::IntNoDigits.at(start..self.scanner.pos()));
            return TokenKind::Int(IntLit {
                digits,
                radix,
                implicit_octal: implicit,
            });
        }

        // Fractional part. A dot promotes an implicit-octal literal to
        // decimal; explicit binary and octal literals have no floats.
        if self.scanner.eat('.') {
            if implicit {
                radix = 10;
            }
            if radix == 2 || radix == 8 {
                self.scanner.unget('.');
                self.diagnostics
                    .emit(SyntaxError::FloatBadRadix.at(start..self.scanner.pos()));
                return TokenKind::Int(IntLit {
                    digits,
                    radix,
                    implicit_octal: implicit,
                });
            }
            let mut mantissa = digits;
            mantissa.push('.');
            let lit = self.scan_float_after_dot(mantissa, radix, start);
            return self.finish_float(lit);
        }

        // An exponent marker also promotes to float.
        let marker = if radix == 10 || implicit {
            self.scanner.eat_any(&['e', 'E'])
        } else if radix == 16 {
            self.scanner.eat_any(&['p', 'P'])
        } else {
            None
        };
        if let Some(marker) = marker {
            if implicit {
                radix = 10;
            }
            let mut lit = FloatLit::new(digits, radix);
            self.scan_exponent(&mut lit, marker, start);
            return self.finish_float(lit);
        }

        if !all_in_radix {
            self.diagnostics.emit(SyntaxError::IntBadDigit.at_with_message(
                start..self.scanner.pos(),
                format!("invalid digit in base {radix} literal"),
            ));
        }

        let mut lit = IntLit {
            digits,
            radix,
            implicit_octal: implicit,
        };
        if self.scanner.eat('i') {
            // An implicit-octal literal that turns out imaginary was
            // decimal all along.
            if lit.radix == 8 && lit.implicit_octal {
                lit.radix = 10;
            }
            return TokenKind::Imaginary(ImaginaryLit::Int(lit));
        }
        TokenKind::Int(lit)
    }

    /// Consumes digits of the effective radix `max(radix, 10)` into
    /// `digits`, skipping single underscores between digits. Returns the
    /// number of digits consumed and whether all of them were valid in
    /// `radix` itself (implicit octal reads 8 and 9 provisionally).
    ///
    /// A doubled or trailing underscore ends the run; the offending
    /// characters are pushed back.
    fn consume_digits(
        &mut self,
        digits: &mut String,
        radix: u8,
        allow_starting_underscore: bool,
    ) -> (u32, bool) {
        let effective = radix.max(10) as u32;
        let mut consumed = 0u32;
        let mut all_in_radix = true;
        let mut last_was_underscore = false;
        let mut any = false;

        while let Some(c) = self.scanner.next() {
            if c == '_' {
                if last_was_underscore || (!any && !allow_starting_underscore) {
                    self.scanner.unget(c);
                    if last_was_underscore {
                        self.scanner.unget('_');
                    }
                    return (consumed, all_in_radix);
                }
                last_was_underscore = true;
                any = true;
                continue;
            }
            if c.to_digit(effective).is_some() {
                all_in_radix &= c.to_digit(radix as u32).is_some();
                digits.push(c);
                consumed += 1;
                last_was_underscore = false;
                any = true;
            } else {
                self.scanner.unget(c);
                if last_was_underscore {
                    self.scanner.unget('_');
                }
                return (consumed, all_in_radix);
            }
        }

        if last_was_underscore {
            self.scanner.unget('_');
        }
        (consumed, all_in_radix)
    }

    /// Scans the fractional digits and optional exponent; the mantissa
    /// already holds the integer part and the dot.
    fn scan_float_after_dot(&mut self, mut mantissa: String, radix: u8, start: u32) -> FloatLit {
        self.consume_digits(&mut mantissa, radix, false);

        let effective = radix.max(10) as u32;
        if !mantissa.chars().any(|c| c.to_digit(effective).is_some()) {
            self.diagnostics
                .emit(SyntaxError::IntNoDigits.at(start..self.scanner.pos()));
        }

        let mut lit = FloatLit::new(mantissa, radix);
        let marker = if radix == 16 {
            self.scanner.eat_any(&['p', 'P'])
        } else {
            self.scanner.eat_any(&['e', 'E'])
        };
        if let Some(marker) = marker {
            self.scan_exponent(&mut lit, marker, start);
        }
        lit
    }

    /// Scans `[+|-] digits` after an exponent marker. Exponent digits
    /// are always decimal.
    fn scan_exponent(&mut self, lit: &mut FloatLit, marker: char, start: u32) {
        lit.exponent_char = Some(marker);
        if let Some(sign) = self.scanner.eat_any(&['+', '-']) {
            lit.negative_exponent = sign == '-';
        }
        let (count, _) = self.consume_digits(&mut lit.exponent, 10, false);
        if count == 0 {
            self.diagnostics
                .emit(SyntaxError::ExponentNoDigits.at(start..self.scanner.pos()));
        }
    }

    fn finish_float(&mut self, lit: FloatLit) -> TokenKind {
        if self.scanner.eat('i') {
            TokenKind::Imaginary(ImaginaryLit::Float(lit))
        } else {
            TokenKind::Float(lit)
        }
    }

    // ── Rune and string literals ───────────────────────────────────────

    fn scan_string(&mut self) -> TokenKind {
        let start = self.scanner.pos();
        self.scanner.next(); // opening "
        let mut lit = StrLit::default();

        loop {
            match self.scanner.peek() {
                None => {
                    self.diagnostics
                        .emit(SyntaxError::UnterminatedString.at(start..self.scanner.pos()));
                    break;
                }
                Some('"') => {
                    self.scanner.next();
                    break;
                }
                _ => {
                    if let Some(rune) = self.scan_rune_char(true) {
                        lit.runes.push(rune);
                    }
                }
            }
        }
        TokenKind::Str(lit)
    }

    fn scan_rune(&mut self) -> TokenKind {
        let start = self.scanner.pos();
        self.scanner.next(); // opening '

        match self.scanner.peek() {
            None => {
                self.diagnostics
                    .emit(SyntaxError::UnterminatedRune.at(start..self.scanner.pos()));
                return TokenKind::Rune(RuneLit::new('\u{FFFD}', RuneKind::Normal));
            }
            Some('\'') => {
                self.scanner.next();
                self.diagnostics
                    .emit(SyntaxError::EmptyRune.at(start..self.scanner.pos()));
                return TokenKind::Rune(RuneLit::new('\u{FFFD}', RuneKind::Normal));
            }
            _ => {}
        }

        let rune = self
            .scan_rune_char(false)
            .unwrap_or(RuneLit::new('\u{FFFD}', RuneKind::Normal));

        if self.scanner.eat('\'') {
            return TokenKind::Rune(rune);
        }

        // Recover to the closing quote or end of line.
        let mut closed = false;
        while let Some(ch) = self.scanner.peek() {
            if ch == '\n' {
                break;
            }
            self.scanner.next();
            if ch == '\'' {
                closed = true;
                break;
            }
            if ch == '\\' {
                self.scanner.next();
            }
        }
        let err = if closed {
            SyntaxError::MultiCharRune
        } else {
            SyntaxError::UnterminatedRune
        };
        self.diagnostics.emit(err.at(start..self.scanner.pos()));
        TokenKind::Rune(rune)
    }

    /// Scans one character of a rune or string literal, unescaping it.
    /// The quote escape differs by context: `\'` in runes, `\"` in
    /// strings.
    fn scan_rune_char(&mut self, in_string: bool) -> Option<RuneLit> {
        if !self.scanner.eat('\\') {
            let c = self.scanner.next()?;
            return Some(RuneLit::new(c, RuneKind::Normal));
        }

        let start = self.scanner.pos() - 1;
        match self.scanner.peek() {
            None => {
                self.diagnostics
                    .emit(SyntaxError::UnterminatedEscape.at(start..self.scanner.pos()));
                None
            }
            Some('u') => {
                self.scanner.next();
                self.scan_hex_escape(4, RuneKind::LittleU, start)
            }
            Some('U') => {
                self.scanner.next();
                self.scan_hex_escape(8, RuneKind::BigU, start)
            }
            Some('x') => {
                self.scanner.next();
                self.scan_hex_escape(2, RuneKind::HexByte, start)
            }
            Some(c) => {
                let mapped = match c {
                    'a' => Some('\u{07}'),
                    'b' => Some('\u{08}'),
                    'f' => Some('\u{0C}'),
                    'n' => Some('\n'),
                    'r' => Some('\r'),
                    't' => Some('\t'),
                    'v' => Some('\u{0B}'),
                    '\\' => Some('\\'),
                    '\'' if !in_string => Some('\''),
                    '"' if in_string => Some('"'),
                    _ => None,
                };
                if let Some(value) = mapped {
                    self.scanner.next();
                    return Some(RuneLit::new(value, RuneKind::Escaped));
                }
                if c.is_digit(8) {
                    return self.scan_octal_escape(start);
                }
                self.scanner.next();
                self.diagnostics.emit(SyntaxError::UnknownEscape.at_with_message(
                    start..self.scanner.pos(),
                    format!("unknown escape sequence: \\{c}"),
                ));
                None
            }
        }
    }

    /// Scans exactly `digits` hex digits of an `\x`, `\u`, or `\U`
    /// escape.
    fn scan_hex_escape(&mut self, digits: u32, kind: RuneKind, start: u32) -> Option<RuneLit> {
        let mut value: u32 = 0;
        for _ in 0..digits {
            match self.scanner.peek() {
                Some(c) if c.is_ascii_hexdigit() => {
                    self.scanner.next();
                    value = value * 16 + c.to_digit(16).unwrap();
                }
                _ => {
                    self.diagnostics.emit(SyntaxError::EscapeHexDigits.at_with_message(
                        start..self.scanner.pos(),
                        format!("escape sequence requires {digits} hex digits"),
                    ));
                    return None;
                }
            }
        }
        match char::from_u32(value) {
            Some(c) => Some(RuneLit::new(c, kind)),
            None => {
                self.diagnostics
                    .emit(SyntaxError::EscapeBadScalar.at(start..self.scanner.pos()));
                None
            }
        }
    }

    /// Scans exactly 3 octal digits of a `\ooo` escape.
    fn scan_octal_escape(&mut self, start: u32) -> Option<RuneLit> {
        let mut value: u32 = 0;
        for _ in 0..3 {
            match self.scanner.peek() {
                Some(c) if c.is_digit(8) => {
                    self.scanner.next();
                    value = value * 8 + c.to_digit(8).unwrap();
                }
                _ => {
                    self.diagnostics
                        .emit(SyntaxError::EscapeOctalDigits.at(start..self.scanner.pos()));
                    return None;
                }
            }
        }
        char::from_u32(value).map(|c| RuneLit::new(c, RuneKind::OctalByte))
    }
}

/// Whether the character can start an identifier.
fn is_ident_start(c: char) -> bool {
    c == '_' || is_xid_start(c)
}

/// Whether the character can continue an identifier.
fn is_ident_continue(c: char) -> bool {
    c == '_' || is_xid_continue(c)
}
