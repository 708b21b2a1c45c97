//! Declaration parsing: const, var, and type declarations.

use super::Parser;
use crate::ast::*;
use crate::token::{Keyword, Punct};

impl Parser {
    /// `ConstDecl = 'const' ( ConstSpec | '(' { ConstSpec ';' } ')' )`
    pub(super) fn parse_const_decl(&mut self) -> Option<ConstDecl> {
        self.backtrack(|p| {
            let start = p.stream.match_keyword(Keyword::Const)?;

            if p.stream.match_punct(&[Punct::LParen]).is_some() {
                let mut specs = Vec::new();
                while let Some(spec) = p.parse_const_spec() {
                    specs.push(spec);
                    if p.stream.peek_punct(&[Punct::RParen]).is_some() {
                        break;
                    }
                    if p.semi().is_none() {
                        break;
                    }
                }
                let (_, end) = p.stream.match_punct(&[Punct::RParen])?;
                return Some(ConstDecl {
                    specs,
                    span: start.to(end),
                });
            }

            let spec = p.parse_const_spec()?;
            let span = start.to(spec.span);
            Some(ConstDecl {
                specs: vec![spec],
                span,
            })
        })
    }

    /// `ConstSpec = IdentifierList [ [ Type ] '=' ExpressionList ]`
    ///
    /// A bare identifier list is legal when the next token closes the
    /// spec (`;` or `)`), which is how grouped blocks repeat the
    /// previous expression.
    fn parse_const_spec(&mut self) -> Option<ConstSpec> {
        self.backtrack(|p| {
            let names = p.parse_identifier_list()?;
            let start = names[0].span;

            let mut ty = None;
            if p.stream.match_punct(&[Punct::Eq]).is_none() {
                if p.stream
                    .peek_punct(&[Punct::Semicolon, Punct::RParen])
                    .is_some()
                {
                    let span = start.to(names.last().map_or(start, |n| n.span));
                    return Some(ConstSpec {
                        names,
                        ty: None,
                        values: None,
                        span,
                    });
                }

                ty = Some(p.parse_type()?);
                p.stream.match_punct(&[Punct::Eq])?;
            }

            let values = p.parse_expression_list();
            let end = values
                .last()
                .map(|e| e.span())
                .or_else(|| ty.as_ref().map(|t| t.span))
                .unwrap_or(start);
            Some(ConstSpec {
                names,
                ty,
                values: Some(values),
                span: start.to(end),
            })
        })
    }

    /// `VarDecl = 'var' ( VarSpec | '(' { VarSpec ';' } ')' )`
    pub(super) fn parse_var_decl(&mut self) -> Option<VarDecl> {
        self.backtrack(|p| {
            let start = p.stream.match_keyword(Keyword::Var)?;

            if p.stream.match_punct(&[Punct::LParen]).is_some() {
                let mut specs = Vec::new();
                while let Some(spec) = p.parse_var_spec() {
                    specs.push(spec);
                    if p.stream.peek_punct(&[Punct::RParen]).is_some() {
                        break;
                    }
                    if p.semi().is_none() {
                        break;
                    }
                }
                let (_, end) = p.stream.match_punct(&[Punct::RParen])?;
                return Some(VarDecl {
                    specs,
                    span: start.to(end),
                });
            }

            let spec = p.parse_var_spec()?;
            let span = start.to(spec.span);
            Some(VarDecl {
                specs: vec![spec],
                span,
            })
        })
    }

    /// `VarSpec = IdentifierList ( Type [ '=' ExpressionList ] | '=' ExpressionList )`
    fn parse_var_spec(&mut self) -> Option<VarSpec> {
        self.backtrack(|p| {
            let names = p.parse_identifier_list()?;
            let start = names[0].span;

            let mut ty = None;
            if p.stream.match_punct(&[Punct::Eq]).is_none() {
                let parsed = p.parse_type()?;
                let ty_span = parsed.span;
                ty = Some(parsed);
                if p.stream.match_punct(&[Punct::Eq]).is_none() {
                    return Some(VarSpec {
                        names,
                        ty,
                        values: None,
                        span: start.to(ty_span),
                    });
                }
            }

            let values = p.parse_expression_list();
            if ty.is_none() && values.is_empty() {
                return None;
            }
            let end = values
                .last()
                .map(|e| e.span())
                .or_else(|| ty.as_ref().map(|t| t.span))
                .unwrap_or(start);
            Some(VarSpec {
                names,
                ty,
                values: Some(values),
                span: start.to(end),
            })
        })
    }

    /// `TypeDecl = 'type' ( TypeSpec | '(' { TypeSpec ';' } ')' )`
    pub(super) fn parse_type_decl(&mut self) -> Option<TypeDecl> {
        self.backtrack(|p| {
            let start = p.stream.match_keyword(Keyword::Type)?;

            if p.stream.match_punct(&[Punct::LParen]).is_some() {
                let mut specs = Vec::new();
                while let Some(spec) = p.parse_type_spec() {
                    specs.push(spec);
                    if p.stream.peek_punct(&[Punct::RParen]).is_some() {
                        break;
                    }
                    if p.semi().is_none() {
                        break;
                    }
                }
                let (_, end) = p.stream.match_punct(&[Punct::RParen])?;
                return Some(TypeDecl {
                    specs,
                    span: start.to(end),
                });
            }

            let spec = p.parse_type_spec()?;
            let span = start.to(spec.span());
            Some(TypeDecl {
                specs: vec![spec],
                span,
            })
        })
    }

    /// `TypeSpec = AliasDecl | TypeDef`
    fn parse_type_spec(&mut self) -> Option<TypeSpec> {
        if let Some(alias) = self.parse_alias_decl() {
            return Some(TypeSpec::Alias(alias));
        }
        self.parse_type_def().map(TypeSpec::Def)
    }

    /// `AliasDecl = Identifier '=' Type`
    fn parse_alias_decl(&mut self) -> Option<AliasDecl> {
        self.backtrack(|p| {
            let name = p.parse_ident()?;
            p.stream.match_punct(&[Punct::Eq])?;
            let ty = p.parse_type()?;
            Some(AliasDecl {
                span: name.span.to(ty.span),
                name,
                ty,
            })
        })
    }

    /// `TypeDef = Identifier Type`
    fn parse_type_def(&mut self) -> Option<TypeDef> {
        self.backtrack(|p| {
            let name = p.parse_ident()?;
            let ty = p.parse_type()?;
            Some(TypeDef {
                span: name.span.to(ty.span),
                name,
                ty,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::*;
    use crate::parser::parse;

    fn decls(source: &str) -> Vec<TopLevelDecl> {
        let full = format!("package p\n{source}\n");
        let (file, diags) = parse(&full);
        assert!(!diags.has_errors(), "lex errors in {source:?}: {diags:?}");
        file.unwrap_or_else(|| panic!("failed to parse {source:?}"))
            .decls
    }

    fn parse_decl_fails(source: &str) {
        let full = format!("package p\n{source}\n");
        let (file, _) = parse(&full);
        assert!(file.is_none(), "expected parse failure for {source:?}");
    }

    #[test]
    fn var_with_type_only() {
        let decls = decls("var x int");
        let TopLevelDecl::Var(var) = &decls[0] else {
            panic!("expected var");
        };
        let spec = &var.specs[0];
        assert_eq!(spec.names.len(), 1);
        assert_eq!(spec.names[0].name, "x");
        assert!(spec.ty.is_some());
        assert!(spec.values.is_none());
    }

    #[test]
    fn var_with_value_only() {
        let decls = decls("var x = 1");
        let TopLevelDecl::Var(var) = &decls[0] else {
            panic!("expected var");
        };
        let spec = &var.specs[0];
        assert!(spec.ty.is_none());
        assert_eq!(spec.values.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn var_with_type_and_value() {
        let decls = decls("var x, y int = 1, 2");
        let TopLevelDecl::Var(var) = &decls[0] else {
            panic!("expected var");
        };
        let spec = &var.specs[0];
        assert_eq!(spec.names.len(), 2);
        assert!(spec.ty.is_some());
        assert_eq!(spec.values.as_ref().unwrap().len(), 2);
    }

    #[test]
    fn var_requires_type_or_value() {
        parse_decl_fails("var x");
    }

    #[test]
    fn grouped_var_decl() {
        let decls = decls("var (\n\ta = 1\n\tb int\n)");
        let TopLevelDecl::Var(var) = &decls[0] else {
            panic!("expected var");
        };
        assert_eq!(var.specs.len(), 2);
    }

    #[test]
    fn const_spec_can_be_bare_inside_a_group() {
        let decls = decls("const (\n\ta = 1\n\tb\n\tc\n)");
        let TopLevelDecl::Const(c) = &decls[0] else {
            panic!("expected const");
        };
        assert_eq!(c.specs.len(), 3);
        assert!(c.specs[0].values.is_some());
        assert!(c.specs[1].values.is_none());
        assert!(c.specs[1].ty.is_none());
        assert!(c.specs[2].values.is_none());
    }

    #[test]
    fn bare_const_spec_is_tolerated_wherever_a_terminator_follows() {
        // syntactically fine even at top level; a later pass rejects it
        let decls = decls("const x");
        let TopLevelDecl::Const(c) = &decls[0] else {
            panic!("expected const");
        };
        assert!(c.specs[0].ty.is_none());
        assert!(c.specs[0].values.is_none());
    }

    #[test]
    fn const_with_type() {
        let decls = decls("const big uint64 = 1 << 62");
        let TopLevelDecl::Const(c) = &decls[0] else {
            panic!("expected const");
        };
        assert!(c.specs[0].ty.is_some());
    }

    #[test]
    fn type_alias() {
        let decls = decls("type T = int");
        let TopLevelDecl::Type(t) = &decls[0] else {
            panic!("expected type");
        };
        let TypeSpec::Alias(alias) = &t.specs[0] else {
            panic!("expected alias");
        };
        assert_eq!(alias.name.name, "T");
    }

    #[test]
    fn type_definition() {
        let decls = decls("type Celsius float64");
        let TopLevelDecl::Type(t) = &decls[0] else {
            panic!("expected type");
        };
        let TypeSpec::Def(def) = &t.specs[0] else {
            panic!("expected definition, not alias");
        };
        assert_eq!(def.name.name, "Celsius");
    }

    #[test]
    fn grouped_type_decl_mixes_aliases_and_defs() {
        let decls = decls("type (\n\tA = int\n\tB map[string]int\n)");
        let TopLevelDecl::Type(t) = &decls[0] else {
            panic!("expected type");
        };
        assert_eq!(t.specs.len(), 2);
        assert!(matches!(t.specs[0], TypeSpec::Alias(_)));
        assert!(matches!(t.specs[1], TypeSpec::Def(_)));
    }

    #[test]
    fn multiple_names_share_a_spec() {
        let decls = decls("const a, b = 1, 2");
        let TopLevelDecl::Const(c) = &decls[0] else {
            panic!("expected const");
        };
        assert_eq!(c.specs[0].names.len(), 2);
        assert_eq!(c.specs[0].values.as_ref().unwrap().len(), 2);
    }
}
