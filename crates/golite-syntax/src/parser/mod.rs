//! Recursive descent parser for golite.
//!
//! Every production returns `Option`: `Some` on success, `None` when
//! the alternative does not apply. A failing production always restores
//! the token stream to where it started, so callers can try the next
//! alternative. There is no error recovery: if the source file does not
//! parse, the caller gets `None` and no partial tree.

mod decl;
mod expr;
mod stmt;
mod types;

use golite_common::diagnostics::DiagnosticSink;
use golite_common::span::Span;

use crate::ast::*;
use crate::lexer::Lexer;
use crate::stream::TokenStream;
use crate::token::{Keyword, Punct};

/// The golite parser.
pub struct Parser {
    stream: TokenStream,
}

impl Parser {
    pub fn new(stream: TokenStream) -> Self {
        Self { stream }
    }

    /// Runs `f`, restoring the stream position if it returns `None`.
    /// Every alternative-shaped production goes through here so the
    /// no-match contract holds by construction.
    fn backtrack<T>(&mut self, f: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        let mark = self.stream.mark();
        let result = f(self);
        if result.is_none() {
            self.stream.reset(mark);
        }
        result
    }

    fn parse_ident(&mut self) -> Option<Ident> {
        let (name, span) = self.stream.match_ident()?;
        Some(Ident::new(name, span))
    }

    /// `IdentifierList = Identifier { ',' Identifier }`
    fn parse_identifier_list(&mut self) -> Option<Vec<Ident>> {
        self.backtrack(|p| {
            let mut idents = vec![p.parse_ident()?];
            loop {
                let mark = p.stream.mark();
                if p.stream.match_punct(&[Punct::Comma]).is_none() {
                    break;
                }
                match p.parse_ident() {
                    Some(ident) => idents.push(ident),
                    None => {
                        // the comma belonged to an enclosing list
                        p.stream.reset(mark);
                        break;
                    }
                }
            }
            Some(idents)
        })
    }

    /// `IdentOrQualified = Identifier [ '.' Identifier ]`
    ///
    /// A dot not followed by an identifier (a selector postfix, a type
    /// assertion) is left unconsumed.
    fn parse_qualified_ident(&mut self) -> Option<QualifiedIdent> {
        let first = self.parse_ident()?;
        let mark = self.stream.mark();
        if self.stream.match_punct(&[Punct::Dot]).is_some() {
            if let Some(name) = self.parse_ident() {
                let span = first.span.to(name.span);
                return Some(QualifiedIdent {
                    package: Some(first),
                    name,
                    span,
                });
            }
            self.stream.reset(mark);
        }
        let span = first.span;
        Some(QualifiedIdent {
            package: None,
            name: first,
            span,
        })
    }

    fn semi(&mut self) -> Option<Span> {
        self.stream
            .match_punct(&[Punct::Semicolon])
            .map(|(_, span)| span)
    }

    // ── Top level ──────────────────────────────────────────────────────

    /// `SourceFile = PackageClause ';' { ImportDecl ';' } { TopLevelDecl ';' }`
    ///
    /// The whole input must be consumed; trailing tokens fail the parse.
    pub fn parse_source_file(&mut self) -> Option<SourceFile> {
        self.backtrack(|p| {
            let package = p.parse_package_clause()?;
            p.semi()?;

            let mut imports = Vec::new();
            while let Some(import) = p.parse_import_decl() {
                p.semi()?;
                imports.push(import);
            }

            let mut decls = Vec::new();
            while let Some(decl) = p.parse_top_level_decl() {
                p.semi()?;
                decls.push(decl);
            }

            if !p.stream.at_eof() {
                return None;
            }

            let end = decls
                .last()
                .map(|d| d.span())
                .or_else(|| imports.last().map(|i| i.span))
                .unwrap_or(package.span);
            Some(SourceFile {
                span: package.span.to(end),
                package,
                imports,
                decls,
            })
        })
    }

    /// `PackageClause = 'package' Identifier`
    fn parse_package_clause(&mut self) -> Option<PackageClause> {
        self.backtrack(|p| {
            let start = p.stream.match_keyword(Keyword::Package)?;
            let name = p.parse_ident()?;
            Some(PackageClause {
                span: start.to(name.span),
                name,
            })
        })
    }

    /// `ImportDecl = 'import' ( ImportSpec | '(' { ImportSpec ';' } ')' )`
    fn parse_import_decl(&mut self) -> Option<ImportDecl> {
        self.backtrack(|p| {
            let start = p.stream.match_keyword(Keyword::Import)?;

            if p.stream.match_punct(&[Punct::LParen]).is_some() {
                let mut specs = Vec::new();
                while let Some(spec) = p.parse_import_spec() {
                    specs.push(spec);
                    if p.semi().is_none() {
                        break;
                    }
                }
                let (_, end) = p.stream.match_punct(&[Punct::RParen])?;
                return Some(ImportDecl {
                    specs,
                    span: start.to(end),
                });
            }

            let spec = p.parse_import_spec()?;
            let span = start.to(spec.span);
            Some(ImportDecl {
                specs: vec![spec],
                span,
            })
        })
    }

    /// `ImportSpec = [ '.' | Identifier ] StringLiteral`
    fn parse_import_spec(&mut self) -> Option<ImportSpec> {
        self.backtrack(|p| {
            let mut dot = false;
            let mut alias = None;
            let mut start = None;

            if let Some((_, span)) = p.stream.match_punct(&[Punct::Dot]) {
                dot = true;
                start = Some(span);
            } else if let Some(ident) = p.parse_ident() {
                start = Some(ident.span);
                alias = Some(ident);
            }

            let (path, path_span) = p.stream.match_string()?;
            let span = start.unwrap_or(path_span).to(path_span);
            Some(ImportSpec {
                path,
                alias,
                dot,
                span,
            })
        })
    }

    /// `TopLevelDecl = TypeDecl | ConstDecl | VarDecl`, tried in that
    /// order.
    fn parse_top_level_decl(&mut self) -> Option<TopLevelDecl> {
        if let Some(decl) = self.parse_type_decl() {
            return Some(TopLevelDecl::Type(decl));
        }
        if let Some(decl) = self.parse_const_decl() {
            return Some(TopLevelDecl::Const(decl));
        }
        if let Some(decl) = self.parse_var_decl() {
            return Some(TopLevelDecl::Var(decl));
        }
        None
    }
}

/// Lexes and parses a single source file.
///
/// The sink carries lexical diagnostics; a failed parse is the `None`
/// in the first slot. No partial tree is ever returned.
pub fn parse(source: &str) -> (Option<SourceFile>, DiagnosticSink) {
    let (tokens, diagnostics) = Lexer::new(source, 0).collect_tokens();
    let mut parser = Parser::new(TokenStream::new(tokens));
    (parser.parse_source_file(), diagnostics)
}
