//! Expression parsing: a Pratt climber over unary and primary
//! expressions.
//!
//! The grammar over-accepts on purpose. `IdentOrQualified` inners may be
//! operands, conversions, or method expressions; `inner(args)` covers
//! calls and conversions alike; type literals are admitted as inners so
//! a type is a syntactic subset of an expression. Classification happens
//! in a later pass.

use golite_common::span::Span;

use super::Parser;
use crate::ast::*;
use crate::token::{Punct, TokenKind};

impl Parser {
    /// `Expression`, climbing from binding power 0.
    pub(crate) fn parse_expression(&mut self) -> Option<Expr> {
        self.parse_expression_bp(0)
    }

    /// The Pratt loop. Each level of the precedence table doubles into
    /// a left and right binding power (`left = 2·level`,
    /// `right = left + 1`), which makes every operator left-associative;
    /// recursion with `right` stops the next climb at equal level.
    fn parse_expression_bp(&mut self, min_bp: u8) -> Option<Expr> {
        let mut lhs = Expr::Unary(self.parse_unary_expression()?);

        loop {
            let mark = self.stream.mark();
            let Some(op) = self.match_binary_op() else {
                break;
            };

            let left_bp = 2 * op.level();
            let right_bp = left_bp + 1;
            if left_bp < min_bp {
                self.stream.reset(mark);
                break;
            }

            let Some(rhs) = self.parse_expression_bp(right_bp) else {
                // operator without a right operand: hand it back
                self.stream.reset(mark);
                break;
            };

            let span = lhs.span().to(rhs.span());
            lhs = Expr::Binary(Box::new(BinaryExpr { op, lhs, rhs, span }));
        }

        Some(lhs)
    }

    fn match_binary_op(&mut self) -> Option<BinOp> {
        self.stream.match_token(|t| match &t.kind {
            TokenKind::Punct(p) => BinOp::from_punct(*p),
            _ => None,
        })
    }

    fn match_unary_op(&mut self) -> Option<(UnaryOp, Span)> {
        self.stream.match_token(|t| match &t.kind {
            TokenKind::Punct(p) => UnaryOp::from_punct(*p).map(|op| (op, t.span)),
            _ => None,
        })
    }

    /// `UnaryExpression = { unary_op } PrimaryExpression`
    pub(super) fn parse_unary_expression(&mut self) -> Option<UnaryExpr> {
        self.backtrack(|p| {
            let mut ops = Vec::new();
            let mut start: Option<Span> = None;
            while let Some((op, span)) = p.match_unary_op() {
                ops.push(op);
                start.get_or_insert(span);
            }

            let primary = p.parse_primary_expression()?;
            let span = start.map_or(primary.span, |s| s.to(primary.span));
            Some(UnaryExpr {
                ops,
                expr: primary,
                span,
            })
        })
    }

    /// `PrimaryExpression = Inner { Outer }`
    pub(super) fn parse_primary_expression(&mut self) -> Option<PrimaryExpr> {
        self.backtrack(|p| {
            let (inner, start) = p.parse_pex_inner()?;
            let mut span = start;
            let mut outers = Vec::new();
            while let Some((outer, end)) = p.parse_pex_outer() {
                outers.push(outer);
                span = span.to(end);
            }
            Some(PrimaryExpr {
                inner,
                outers,
                span,
            })
        })
    }

    /// The inner operand of a primary expression.
    fn parse_pex_inner(&mut self) -> Option<(Inner, Span)> {
        // a name; an immediately following '[' makes it a generic
        // instantiation
        if let Some(res) = self.backtrack(|p| {
            let name = p.parse_qualified_ident()?;
            if let Some((type_args, end)) = p.parse_type_args() {
                let span = name.span.to(end);
                return Some((Inner::Operand(NamedOperand { name, type_args }), span));
            }
            let span = name.span;
            Some((Inner::Name(name), span))
        }) {
            return Some(res);
        }

        // '(' Expression ')'
        if let Some(res) = self.backtrack(|p| {
            let (_, start) = p.stream.match_punct(&[Punct::LParen])?;
            let expr = p.parse_expression()?;
            let (_, end) = p.stream.match_punct(&[Punct::RParen])?;
            Some((Inner::Paren(Box::new(expr)), start.to(end)))
        }) {
            return Some(res);
        }

        // basic literals
        if let Some(res) = self.stream.match_token(|t| {
            let lit = match &t.kind {
                TokenKind::Int(l) => BasicLit::Int(l.clone()),
                TokenKind::Float(l) => BasicLit::Float(l.clone()),
                TokenKind::Imaginary(l) => BasicLit::Imaginary(l.clone()),
                TokenKind::Rune(l) => BasicLit::Rune(*l),
                TokenKind::Str(l) => BasicLit::Str(l.clone()),
                _ => return None,
            };
            Some((Inner::Literal(lit), t.span))
        }) {
            return Some(res);
        }

        // type literals in operand position, e.g. the `[]byte` of
        // `[]byte(s)`
        if let Some((lit, span)) = self.parse_type_lit() {
            return Some((Inner::TypeLit(lit), span));
        }

        None
    }

    /// One postfix operation, dispatched on its leading punctuation.
    fn parse_pex_outer(&mut self) -> Option<(Outer, Span)> {
        // '.' '(' Type ')' or '.' Identifier
        if let Some(res) = self.backtrack(|p| {
            let (_, dot) = p.stream.match_punct(&[Punct::Dot])?;

            if p.stream.match_punct(&[Punct::LParen]).is_some() {
                let ty = p.parse_type()?;
                let (_, end) = p.stream.match_punct(&[Punct::RParen])?;
                return Some((Outer::TypeAssert(Box::new(ty)), dot.to(end)));
            }

            let ident = p.parse_ident()?;
            let span = dot.to(ident.span);
            Some((Outer::Selector(ident), span))
        }) {
            return Some(res);
        }

        // '[' ... ']' — slice or index
        if let Some(res) = self.backtrack(|p| {
            let (_, start) = p.stream.match_punct(&[Punct::LBracket])?;

            if p.stream.match_punct(&[Punct::Colon]).is_some() {
                return p.finish_slice(None, start);
            }

            let expr = p.parse_expression()?;
            if p.stream.match_punct(&[Punct::Colon]).is_some() {
                return p.finish_slice(Some(Box::new(expr)), start);
            }

            // a trailing comma is tolerated in an index
            p.stream.match_punct(&[Punct::Comma]);
            let (_, end) = p.stream.match_punct(&[Punct::RBracket])?;
            Some((Outer::Index(Box::new(expr)), start.to(end)))
        }) {
            return Some(res);
        }

        // '(' ExpressionList [ '...' ] ')'
        if let Some(res) = self.backtrack(|p| {
            let (_, start) = p.stream.match_punct(&[Punct::LParen])?;
            let args = p.parse_expression_list();
            let ellipsis = p.stream.match_punct(&[Punct::Ellipsis]).is_some();
            let (_, end) = p.stream.match_punct(&[Punct::RParen])?;
            Some((
                Outer::Arguments(Arguments { args, ellipsis }),
                start.to(end),
            ))
        }) {
            return Some(res);
        }

        None
    }

    /// The rest of a slice after the first ':'. Two-index and
    /// three-index forms; omitted bounds stay `None`.
    fn finish_slice(&mut self, low: Option<Box<Expr>>, start: Span) -> Option<(Outer, Span)> {
        let high = self.parse_expression();

        if let Some((_, end)) = self.stream.match_punct(&[Punct::RBracket]) {
            return Some((
                Outer::Slice(SliceExpr {
                    low,
                    high: high.map(Box::new),
                    max: None,
                }),
                start.to(end),
            ));
        }

        // three-index form requires an explicit high bound
        let high = high?;
        self.stream.match_punct(&[Punct::Colon])?;
        let max = self.parse_expression()?;
        let (_, end) = self.stream.match_punct(&[Punct::RBracket])?;
        Some((
            Outer::Slice(SliceExpr {
                low,
                high: Some(Box::new(high)),
                max: Some(Box::new(max)),
            }),
            start.to(end),
        ))
    }

    /// `ExpressionList = Expression { ',' Expression }`; may be empty.
    /// A trailing comma is tolerated.
    pub(super) fn parse_expression_list(&mut self) -> Vec<Expr> {
        let mut exprs = Vec::new();
        while let Some(expr) = self.parse_expression() {
            exprs.push(expr);
            if self.stream.match_punct(&[Punct::Comma]).is_none() {
                break;
            }
        }
        exprs
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::*;
    use crate::lexer::Lexer;
    use crate::parser::Parser;
    use crate::stream::TokenStream;

    fn expr(source: &str) -> Expr {
        let (tokens, diags) = Lexer::new(source, 0).collect_tokens();
        assert!(!diags.has_errors(), "lex errors in {source:?}: {diags:?}");
        let mut parser = Parser::new(TokenStream::new(tokens));
        parser
            .parse_expression()
            .unwrap_or_else(|| panic!("failed to parse {source:?}"))
    }

    /// Renders the binary structure with full parenthesization.
    fn shape(e: &Expr) -> String {
        match e {
            Expr::Binary(b) => {
                format!("({} {} {})", shape(&b.lhs), b.op.as_str(), shape(&b.rhs))
            }
            Expr::Unary(u) => {
                let mut s = String::new();
                for op in &u.ops {
                    s.push_str(op.as_str());
                }
                s.push_str(&primary_shape(&u.expr));
                s
            }
        }
    }

    fn primary_shape(p: &PrimaryExpr) -> String {
        let mut s = match &p.inner {
            Inner::Name(q) => match &q.package {
                Some(pkg) => format!("{}.{}", pkg.name, q.name.name),
                None => q.name.name.clone(),
            },
            Inner::Operand(op) => format!("{}[..]", op.name.name.name),
            Inner::TypeLit(_) => "<type>".to_string(),
            Inner::Paren(e) => format!("({})", shape(e)),
            Inner::Literal(BasicLit::Int(l)) => l.digits.clone(),
            Inner::Literal(_) => "<lit>".to_string(),
        };
        for outer in &p.outers {
            match outer {
                Outer::Selector(id) => s = format!("{s}.{}", id.name),
                Outer::Index(_) => s = format!("{s}[i]"),
                Outer::Slice(_) => s = format!("{s}[:]"),
                Outer::TypeAssert(_) => s = format!("{s}.(T)"),
                Outer::Arguments(_) => s = format!("{s}(..)"),
            }
        }
        s
    }

    #[test]
    fn precedence_table() {
        assert_eq!(shape(&expr("1 + 2 * 3")), "(1 + (2 * 3))");
        assert_eq!(shape(&expr("1 * 2 + 3")), "((1 * 2) + 3)");
        assert_eq!(shape(&expr("1 + 2 * 3 == 7 && y")), "(((1 + (2 * 3)) == 7) && y)");
        assert_eq!(shape(&expr("a || b && c")), "(a || (b && c))");
        assert_eq!(shape(&expr("a << 1 + b")), "((a << 1) + b)");
        assert_eq!(shape(&expr("a &^ b | c")), "((a &^ b) | c)");
    }

    #[test]
    fn left_associativity() {
        assert_eq!(shape(&expr("a - b - c")), "((a - b) - c)");
        assert_eq!(shape(&expr("a / b / c")), "((a / b) / c)");
        assert_eq!(shape(&expr("a == b == c")), "((a == b) == c)");
    }

    #[test]
    fn parentheses_override_precedence() {
        assert_eq!(shape(&expr("(1 + 2) * 3")), "(((1 + 2)) * 3)");
    }

    #[test]
    fn unary_prefixes_stack() {
        let Expr::Unary(u) = expr("-^x") else {
            panic!("expected unary");
        };
        assert_eq!(u.ops, vec![UnaryOp::Neg, UnaryOp::BitNot]);

        let Expr::Unary(u) = expr("<-ch") else {
            panic!("expected unary");
        };
        assert_eq!(u.ops, vec![UnaryOp::Recv]);
    }

    #[test]
    fn unary_binds_tighter_than_binary() {
        assert_eq!(shape(&expr("-a * b")), "(-a * b)");
        assert_eq!(shape(&expr("!a && b")), "(!a && b)");
    }

    #[test]
    fn generic_instantiation_is_an_operand_not_an_index() {
        let Expr::Unary(u) = expr("F[int]") else {
            panic!("expected unary");
        };
        let Inner::Operand(op) = &u.expr.inner else {
            panic!("expected named operand, got {:?}", u.expr.inner);
        };
        assert_eq!(op.name.name.name, "F");
        assert_eq!(op.type_args.len(), 1);
        assert!(u.expr.outers.is_empty());
    }

    #[test]
    fn numeric_index_stays_an_index() {
        let Expr::Unary(u) = expr("a[0]") else {
            panic!("expected unary");
        };
        assert!(matches!(u.expr.inner, Inner::Name(_)));
        assert_eq!(u.expr.outers.len(), 1);
        assert!(matches!(u.expr.outers[0], Outer::Index(_)));
    }

    #[test]
    fn selector_chain() {
        assert_eq!(shape(&expr("a.b.c.d")), "a.b.c.d");
    }

    #[test]
    fn call_and_conversion_share_a_shape() {
        assert_eq!(shape(&expr("f(x)")), "f(..)");
        assert_eq!(shape(&expr("float64(x)")), "float64(..)");
        assert_eq!(shape(&expr("math.Sin(10)")), "math.Sin(..)");
    }

    #[test]
    fn call_with_splat() {
        let Expr::Unary(u) = expr("f(xs...)") else {
            panic!("expected unary");
        };
        let Outer::Arguments(args) = &u.expr.outers[0] else {
            panic!("expected arguments");
        };
        assert!(args.ellipsis);
        assert_eq!(args.args.len(), 1);
    }

    #[test]
    fn empty_argument_list() {
        let Expr::Unary(u) = expr("f()") else {
            panic!("expected unary");
        };
        let Outer::Arguments(args) = &u.expr.outers[0] else {
            panic!("expected arguments");
        };
        assert!(args.args.is_empty());
        assert!(!args.ellipsis);
    }

    #[test]
    fn slice_forms() {
        let Expr::Unary(u) = expr("a[:]") else {
            panic!("expected unary");
        };
        let Outer::Slice(s) = &u.expr.outers[0] else {
            panic!("expected slice");
        };
        assert!(s.low.is_none() && s.high.is_none() && s.max.is_none());

        let Expr::Unary(u) = expr("a[1:2]") else {
            panic!("expected unary");
        };
        let Outer::Slice(s) = &u.expr.outers[0] else {
            panic!("expected slice");
        };
        assert!(s.low.is_some() && s.high.is_some() && s.max.is_none());

        let Expr::Unary(u) = expr("a[1:2:3]") else {
            panic!("expected unary");
        };
        let Outer::Slice(s) = &u.expr.outers[0] else {
            panic!("expected slice");
        };
        assert!(s.low.is_some() && s.high.is_some() && s.max.is_some());

        // low omitted
        let Expr::Unary(u) = expr("a[:5]") else {
            panic!("expected unary");
        };
        let Outer::Slice(s) = &u.expr.outers[0] else {
            panic!("expected slice");
        };
        assert!(s.low.is_none() && s.high.is_some());

        // high omitted: the low bound must survive
        let Expr::Unary(u) = expr("a[2:]") else {
            panic!("expected unary");
        };
        let Outer::Slice(s) = &u.expr.outers[0] else {
            panic!("expected slice");
        };
        assert!(s.low.is_some() && s.high.is_none());
    }

    #[test]
    fn type_assertion() {
        let Expr::Unary(u) = expr("x.(int)") else {
            panic!("expected unary");
        };
        assert!(matches!(u.expr.outers[0], Outer::TypeAssert(_)));
    }

    #[test]
    fn type_literal_conversion() {
        let Expr::Unary(u) = expr("[]byte(s)") else {
            panic!("expected unary");
        };
        assert!(matches!(u.expr.inner, Inner::TypeLit(TypeLit::Slice(_))));
        assert!(matches!(u.expr.outers[0], Outer::Arguments(_)));
    }

    #[test]
    fn postfix_chains_compose() {
        assert_eq!(shape(&expr("m.items[0].name(1, 2)")), "m.items[i].name(..)");
    }

    #[test]
    fn literals_as_operands() {
        let Expr::Unary(u) = expr("42") else {
            panic!("expected unary");
        };
        assert!(matches!(u.expr.inner, Inner::Literal(BasicLit::Int(_))));

        let Expr::Unary(u) = expr("\"hi\"") else {
            panic!("expected unary");
        };
        assert!(matches!(u.expr.inner, Inner::Literal(BasicLit::Str(_))));

        let Expr::Unary(u) = expr("'x'") else {
            panic!("expected unary");
        };
        assert!(matches!(u.expr.inner, Inner::Literal(BasicLit::Rune(_))));

        let Expr::Unary(u) = expr("3.5i") else {
            panic!("expected unary");
        };
        assert!(matches!(
            u.expr.inner,
            Inner::Literal(BasicLit::Imaginary(_))
        ));
    }

    #[test]
    fn dangling_operator_is_not_consumed() {
        let (tokens, _) = Lexer::new("1 +", 0).collect_tokens();
        let mut parser = Parser::new(TokenStream::new(tokens));
        let e = parser.parse_expression().unwrap();
        assert_eq!(shape(&e), "1");
        // the '+' is still there for the caller to see
        assert!(parser
            .stream
            .peek_punct(&[crate::token::Punct::Plus])
            .is_some());
    }

    #[test]
    fn expression_spans_cover_the_text() {
        let e = expr("1 + 2 * 3");
        assert_eq!(e.span().to_range(), 0..9);
    }
}
