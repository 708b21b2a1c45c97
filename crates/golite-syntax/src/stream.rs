//! The buffered token stream consumed by the parser.
//!
//! Comments are transparently skipped at every match point. Recognizers
//! that try an alternative take a [`Mark`] on entry and reset to it on
//! failure, so an uncommitted alternative always leaves the stream
//! where it found it.

use golite_common::span::Span;

use crate::token::{Keyword, Punct, StrLit, Token, TokenKind};

/// A saved stream position. See [`TokenStream::mark`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark(usize);

/// A cursor over the lexed tokens.
pub struct TokenStream {
    tokens: Vec<Token>,
    pos: usize,
}

impl TokenStream {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Every token, comments included, in lexing order.
    pub fn all(&self) -> &[Token] {
        &self.tokens
    }

    /// Saves the current position.
    #[inline]
    pub fn mark(&self) -> Mark {
        Mark(self.pos)
    }

    /// Restores a position saved with [`TokenStream::mark`].
    #[inline]
    pub fn reset(&mut self, mark: Mark) {
        self.pos = mark.0;
    }

    fn skip_comments(&mut self) {
        while self
            .tokens
            .get(self.pos)
            .map_or(false, |t| t.is_comment())
        {
            self.pos += 1;
        }
    }

    /// The next non-comment token, without consuming it. `None` at end
    /// of input.
    pub fn peek(&mut self) -> Option<&Token> {
        self.skip_comments();
        self.tokens.get(self.pos).filter(|t| !t.is_eof())
    }

    /// Whether all non-comment tokens have been consumed.
    pub fn at_eof(&mut self) -> bool {
        self.peek().is_none()
    }

    /// Consumes the next non-comment token if `f` accepts it.
    ///
    /// This is the primitive behind the kind-specific matchers: `f`
    /// projects the data out of the token, and the token is consumed
    /// only on success.
    pub fn match_token<T>(&mut self, f: impl FnOnce(&Token) -> Option<T>) -> Option<T> {
        self.skip_comments();
        let token = self.tokens.get(self.pos)?;
        if token.is_eof() {
            return None;
        }
        let out = f(token)?;
        self.pos += 1;
        Some(out)
    }

    /// Consumes a specific keyword.
    pub fn match_keyword(&mut self, kind: Keyword) -> Option<Span> {
        self.match_token(|t| match &t.kind {
            TokenKind::Keyword(kw) if *kw == kind => Some(t.span),
            _ => None,
        })
    }

    /// Consumes the first matching punctuation out of `kinds`.
    pub fn match_punct(&mut self, kinds: &[Punct]) -> Option<(Punct, Span)> {
        self.match_token(|t| match &t.kind {
            TokenKind::Punct(p) if kinds.contains(p) => Some((*p, t.span)),
            _ => None,
        })
    }

    /// Non-consuming variant of [`TokenStream::match_punct`].
    pub fn peek_punct(&mut self, kinds: &[Punct]) -> Option<Punct> {
        match self.peek().map(|t| &t.kind) {
            Some(TokenKind::Punct(p)) if kinds.contains(p) => Some(*p),
            _ => None,
        }
    }

    /// Consumes an identifier, returning its text and span.
    pub fn match_ident(&mut self) -> Option<(String, Span)> {
        self.match_token(|t| match &t.kind {
            TokenKind::Ident(name) => Some((name.clone(), t.span)),
            _ => None,
        })
    }

    /// Consumes a string literal.
    pub fn match_string(&mut self) -> Option<(StrLit, Span)> {
        self.match_token(|t| match &t.kind {
            TokenKind::Str(lit) => Some((lit.clone(), t.span)),
            _ => None,
        })
    }
}
