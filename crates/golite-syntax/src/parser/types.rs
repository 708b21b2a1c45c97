//! Type parsing: named types, generic instantiation, and type literals.

use golite_common::span::Span;

use super::Parser;
use crate::ast::*;
use crate::token::{Keyword, Punct};

impl Parser {
    /// `Type = NamedType | TypeLit | '(' Type ')'`
    pub(super) fn parse_type(&mut self) -> Option<Type> {
        if let Some(named) = self.parse_named_type() {
            return Some(named);
        }

        if let Some((lit, span)) = self.parse_type_lit() {
            return Some(Type {
                kind: TypeKind::Lit(lit),
                span,
            });
        }

        self.backtrack(|p| {
            p.stream.match_punct(&[Punct::LParen])?;
            let ty = p.parse_type()?;
            p.stream.match_punct(&[Punct::RParen])?;
            Some(ty)
        })
    }

    /// `NamedType = IdentOrQualified [ '[' TypeList ']' ]`
    pub(super) fn parse_named_type(&mut self) -> Option<Type> {
        self.backtrack(|p| {
            let name = p.parse_qualified_ident()?;
            let mut span = name.span;

            let type_args = match p.parse_type_args() {
                Some((args, end)) => {
                    span = span.to(end);
                    Some(args)
                }
                None => None,
            };

            Some(Type {
                kind: TypeKind::Named(NamedType { name, type_args }),
                span,
            })
        })
    }

    /// `'[' TypeList ']'` — type arguments for generic instantiation.
    /// Returns the list and the span of the closing bracket.
    pub(super) fn parse_type_args(&mut self) -> Option<(Vec<Type>, Span)> {
        self.backtrack(|p| {
            p.stream.match_punct(&[Punct::LBracket])?;
            let types = p.parse_type_list()?;
            let (_, end) = p.stream.match_punct(&[Punct::RBracket])?;
            Some((types, end))
        })
    }

    /// `TypeList = Type { ',' Type }` — non-empty; a trailing comma is
    /// tolerated.
    fn parse_type_list(&mut self) -> Option<Vec<Type>> {
        let mut types = vec![self.parse_type()?];
        while self.stream.match_punct(&[Punct::Comma]).is_some() {
            match self.parse_type() {
                Some(ty) => types.push(ty),
                None => break,
            }
        }
        Some(types)
    }

    /// `TypeLit`, dispatched on the leading token. Function and
    /// interface types are declared extension points and not parsed.
    pub(super) fn parse_type_lit(&mut self) -> Option<(TypeLit, Span)> {
        // '*' Type
        if let Some(res) = self.backtrack(|p| {
            let (_, start) = p.stream.match_punct(&[Punct::Star])?;
            let inner = p.parse_type()?;
            let span = start.to(inner.span);
            Some((
                TypeLit::Pointer(PointerType {
                    inner: Box::new(inner),
                }),
                span,
            ))
        }) {
            return Some(res);
        }

        // '[' ']' Type (slice) or '[' Expression ']' Type (array)
        if let Some(res) = self.backtrack(|p| {
            let (_, start) = p.stream.match_punct(&[Punct::LBracket])?;
            if p.stream.match_punct(&[Punct::RBracket]).is_some() {
                let elem = p.parse_type()?;
                let span = start.to(elem.span);
                return Some((
                    TypeLit::Slice(SliceType {
                        elem: Box::new(elem),
                    }),
                    span,
                ));
            }
            let len = p.parse_expression()?;
            p.stream.match_punct(&[Punct::RBracket])?;
            let elem = p.parse_type()?;
            let span = start.to(elem.span);
            Some((
                TypeLit::Array(ArrayType {
                    len: Box::new(len),
                    elem: Box::new(elem),
                }),
                span,
            ))
        }) {
            return Some(res);
        }

        // 'map' '[' Type ']' Type
        if let Some(res) = self.backtrack(|p| {
            let start = p.stream.match_keyword(Keyword::Map)?;
            p.stream.match_punct(&[Punct::LBracket])?;
            let key = p.parse_type()?;
            p.stream.match_punct(&[Punct::RBracket])?;
            let value = p.parse_type()?;
            let span = start.to(value.span);
            Some((
                TypeLit::Map(MapType {
                    key: Box::new(key),
                    value: Box::new(value),
                }),
                span,
            ))
        }) {
            return Some(res);
        }

        // 'chan' Type, 'chan' '<-' Type, '<-' 'chan' Type
        if let Some(res) = self.backtrack(|p| {
            let start = p.stream.match_keyword(Keyword::Chan)?;
            let dir = if p.stream.match_punct(&[Punct::Arrow]).is_some() {
                ChanDir::Send
            } else {
                ChanDir::Bidi
            };
            let elem = p.parse_type()?;
            let span = start.to(elem.span);
            Some((
                TypeLit::Chan(ChannelType {
                    dir,
                    elem: Box::new(elem),
                }),
                span,
            ))
        }) {
            return Some(res);
        }

        if let Some(res) = self.backtrack(|p| {
            let (_, start) = p.stream.match_punct(&[Punct::Arrow])?;
            p.stream.match_keyword(Keyword::Chan)?;
            let elem = p.parse_type()?;
            let span = start.to(elem.span);
            Some((
                TypeLit::Chan(ChannelType {
                    dir: ChanDir::Recv,
                    elem: Box::new(elem),
                }),
                span,
            ))
        }) {
            return Some(res);
        }

        self.parse_struct_type()
    }

    /// `'struct' '{' { StructFieldDecl [ Tag ] ';' } '}'`
    fn parse_struct_type(&mut self) -> Option<(TypeLit, Span)> {
        self.backtrack(|p| {
            let start = p.stream.match_keyword(Keyword::Struct)?;
            p.stream.match_punct(&[Punct::LBrace])?;

            let mut fields = Vec::new();
            while let Some(field) = p.parse_struct_field_decl() {
                fields.push(field);
                if p.stream.peek_punct(&[Punct::RBrace]).is_some() {
                    break;
                }
                if p.semi().is_none() {
                    break;
                }
            }

            let (_, end) = p.stream.match_punct(&[Punct::RBrace])?;
            Some((TypeLit::Struct(StructType { fields }), start.to(end)))
        })
    }

    /// One struct field: `'*' NamedType`, `NamedType`, or
    /// `IdentifierList Type`, each with an optional string tag.
    ///
    /// Disambiguation: read one-or-more identifiers first. Two or more
    /// force a named field. Exactly one is a named field only if a type
    /// follows; otherwise the identifier was the start of an embedded
    /// named type and is reparsed as such.
    fn parse_struct_field_decl(&mut self) -> Option<StructFieldDecl> {
        self.backtrack(|p| {
            // embedded pointer field
            if let Some((_, star)) = p.stream.match_punct(&[Punct::Star]) {
                let ty = p.parse_embedded_named_type()?;
                let mut span = star.to(ty.name.span);
                let tag = p.parse_field_tag(&mut span);
                return Some(StructFieldDecl {
                    kind: StructFieldKind::Embedded { pointer: true, ty },
                    tag,
                    span,
                });
            }

            let mark = p.stream.mark();
            let names = p.parse_identifier_list()?;
            let start = names[0].span;

            if names.len() == 1 {
                if let Some(ty) = p.parse_type() {
                    let mut span = start.to(ty.span);
                    let tag = p.parse_field_tag(&mut span);
                    return Some(StructFieldDecl {
                        kind: StructFieldKind::Named {
                            names,
                            ty: Box::new(ty),
                        },
                        tag,
                        span,
                    });
                }

                // the lone identifier starts an embedded named type
                p.stream.reset(mark);
                let ty = p.parse_embedded_named_type()?;
                let mut span = ty.name.span;
                let tag = p.parse_field_tag(&mut span);
                return Some(StructFieldDecl {
                    kind: StructFieldKind::Embedded { pointer: false, ty },
                    tag,
                    span,
                });
            }

            let ty = p.parse_type()?;
            let mut span = start.to(ty.span);
            let tag = p.parse_field_tag(&mut span);
            Some(StructFieldDecl {
                kind: StructFieldKind::Named {
                    names,
                    ty: Box::new(ty),
                },
                tag,
                span,
            })
        })
    }

    /// The `NamedType` of an embedded field.
    fn parse_embedded_named_type(&mut self) -> Option<NamedType> {
        match self.parse_named_type()? {
            Type {
                kind: TypeKind::Named(named),
                ..
            } => Some(named),
            _ => None,
        }
    }

    /// An optional field tag, widening `span` over it.
    fn parse_field_tag(&mut self, span: &mut Span) -> Option<crate::token::StrLit> {
        let (tag, tag_span) = self.stream.match_string()?;
        *span = span.to(tag_span);
        Some(tag)
    }
}
