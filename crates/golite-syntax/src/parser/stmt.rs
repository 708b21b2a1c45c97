//! Statement parsing.
//!
//! Composite statements (`if`, `switch`, `select`, `for`) are extension
//! points: their keywords are left unconsumed and the production yields
//! absence, so nothing is half-eaten. Blocks, keyword-led statements,
//! and simple statements are parsed in full.

use golite_common::span::Span;

use super::Parser;
use crate::ast::*;
use crate::token::{Keyword, Punct, TokenKind};

impl Parser {
    /// `Statement`, dispatched by leading keyword or prefix.
    pub fn parse_statement(&mut self) -> Option<Stmt> {
        // labeled statement: the identifier and colon commit together
        if let Some(stmt) = self.backtrack(|p| {
            let label = p.parse_ident()?;
            p.stream.match_punct(&[Punct::Colon])?;
            let stmt = p.parse_statement()?;
            let span = label.span.to(stmt.span);
            Some(Stmt {
                kind: StmtKind::Labeled(LabeledStmt {
                    label,
                    stmt: Box::new(stmt),
                }),
                span,
            })
        }) {
            return Some(stmt);
        }

        if let Some(stmt) = self.backtrack(|p| {
            let start = p.stream.match_keyword(Keyword::Go)?;
            let expr = p.parse_expression()?;
            Some(Stmt {
                span: start.to(expr.span()),
                kind: StmtKind::Go(expr),
            })
        }) {
            return Some(stmt);
        }

        if let Some(stmt) = self.backtrack(|p| {
            let start = p.stream.match_keyword(Keyword::Defer)?;
            let expr = p.parse_expression()?;
            Some(Stmt {
                span: start.to(expr.span()),
                kind: StmtKind::Defer(expr),
            })
        }) {
            return Some(stmt);
        }

        if let Some(stmt) = self.backtrack(|p| {
            let start = p.stream.match_keyword(Keyword::Return)?;
            let values = p.parse_expression_list();
            let span = values.last().map_or(start, |e| start.to(e.span()));
            Some(Stmt {
                kind: StmtKind::Return(values),
                span,
            })
        }) {
            return Some(stmt);
        }

        if let Some(stmt) = self.backtrack(|p| {
            let start = p.stream.match_keyword(Keyword::Break)?;
            let label = p.parse_ident();
            let span = label.as_ref().map_or(start, |l| start.to(l.span));
            Some(Stmt {
                kind: StmtKind::Break(label),
                span,
            })
        }) {
            return Some(stmt);
        }

        if let Some(stmt) = self.backtrack(|p| {
            let start = p.stream.match_keyword(Keyword::Continue)?;
            let label = p.parse_ident();
            let span = label.as_ref().map_or(start, |l| start.to(l.span));
            Some(Stmt {
                kind: StmtKind::Continue(label),
                span,
            })
        }) {
            return Some(stmt);
        }

        if let Some(stmt) = self.backtrack(|p| {
            let start = p.stream.match_keyword(Keyword::Goto)?;
            let label = p.parse_ident()?;
            let span = start.to(label.span);
            Some(Stmt {
                kind: StmtKind::Goto(label),
                span,
            })
        }) {
            return Some(stmt);
        }

        if let Some(span) = self.stream.match_keyword(Keyword::Fallthrough) {
            return Some(Stmt {
                kind: StmtKind::Fallthrough,
                span,
            });
        }

        if let Some(block) = self.parse_block() {
            return Some(Stmt {
                span: block.span,
                kind: StmtKind::Block(block),
            });
        }

        self.parse_simple_statement()
    }

    /// `Block = '{' { Statement ';' } '}'`
    pub fn parse_block(&mut self) -> Option<Block> {
        self.backtrack(|p| {
            let (_, start) = p.stream.match_punct(&[Punct::LBrace])?;

            let mut stmts = Vec::new();
            loop {
                if p.stream.peek_punct(&[Punct::RBrace]).is_some() {
                    break;
                }
                let Some(stmt) = p.parse_statement() else {
                    break;
                };
                stmts.push(stmt);
                if p.semi().is_none() {
                    break;
                }
            }

            let (_, end) = p.stream.match_punct(&[Punct::RBrace])?;
            Some(Block {
                stmts,
                span: start.to(end),
            })
        })
    }

    /// Simple statements: empty, assignment, send, inc/dec, expression.
    fn parse_simple_statement(&mut self) -> Option<Stmt> {
        // the empty statement before a ';' (the separator stays put)
        if let Some(token) = self.stream.peek() {
            if token.kind == TokenKind::Punct(Punct::Semicolon) {
                let pos = token.span.start;
                return Some(Stmt {
                    kind: StmtKind::Empty,
                    span: Span::new(pos, pos),
                });
            }
        }

        self.backtrack(|p| {
            let lhs = p.parse_expression_list();
            let start = lhs.first()?.span();

            if let Some(op) = p.match_assign_op() {
                let rhs = p.parse_expression_list();
                let end = rhs.last()?.span();
                return Some(Stmt {
                    kind: StmtKind::Assign(AssignStmt { lhs, op, rhs }),
                    span: start.to(end),
                });
            }

            if lhs.len() != 1 {
                return None;
            }
            let mut lhs = lhs;
            let expr = lhs.pop()?;

            if p.stream.match_punct(&[Punct::Arrow]).is_some() {
                let value = p.parse_expression()?;
                let span = start.to(value.span());
                return Some(Stmt {
                    kind: StmtKind::Send(SendStmt { chan: expr, value }),
                    span,
                });
            }

            if let Some((punct, end)) = p.stream.match_punct(&[Punct::PlusPlus, Punct::MinusMinus])
            {
                return Some(Stmt {
                    kind: StmtKind::IncDec(IncDecStmt {
                        expr,
                        is_inc: punct == Punct::PlusPlus,
                    }),
                    span: start.to(end),
                });
            }

            let span = expr.span();
            Some(Stmt {
                kind: StmtKind::Expr(expr),
                span,
            })
        })
    }

    fn match_assign_op(&mut self) -> Option<AssignOp> {
        self.stream.match_token(|t| match &t.kind {
            TokenKind::Punct(p) => AssignOp::from_punct(*p),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::*;
    use crate::lexer::Lexer;
    use crate::parser::Parser;
    use crate::stream::TokenStream;

    fn stmt(source: &str) -> Stmt {
        let (tokens, diags) = Lexer::new(source, 0).collect_tokens();
        assert!(!diags.has_errors(), "lex errors in {source:?}: {diags:?}");
        let mut parser = Parser::new(TokenStream::new(tokens));
        parser
            .parse_statement()
            .unwrap_or_else(|| panic!("failed to parse statement {source:?}"))
    }

    fn stmt_fails(source: &str) {
        let (tokens, _) = Lexer::new(source, 0).collect_tokens();
        let mut parser = Parser::new(TokenStream::new(tokens));
        assert!(
            parser.parse_statement().is_none(),
            "expected statement parse failure for {source:?}"
        );
    }

    #[test]
    fn keyword_led_statements() {
        assert!(matches!(stmt("go f()").kind, StmtKind::Go(_)));
        assert!(matches!(stmt("defer close(ch)").kind, StmtKind::Defer(_)));
        assert!(matches!(stmt("fallthrough").kind, StmtKind::Fallthrough));
        assert!(matches!(stmt("goto done").kind, StmtKind::Goto(_)));
    }

    #[test]
    fn return_with_and_without_values() {
        let StmtKind::Return(values) = stmt("return").kind else {
            panic!("expected return");
        };
        assert!(values.is_empty());

        let StmtKind::Return(values) = stmt("return a, b").kind else {
            panic!("expected return");
        };
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn break_and_continue_take_optional_labels() {
        assert!(matches!(stmt("break").kind, StmtKind::Break(None)));
        let StmtKind::Break(Some(label)) = stmt("break loop").kind else {
            panic!("expected labeled break");
        };
        assert_eq!(label.name, "loop");

        assert!(matches!(stmt("continue").kind, StmtKind::Continue(None)));
        assert!(matches!(stmt("continue outer").kind, StmtKind::Continue(Some(_))));
    }

    #[test]
    fn goto_requires_a_label() {
        stmt_fails("goto");
    }

    #[test]
    fn labeled_statement_commits_on_the_colon() {
        let StmtKind::Labeled(labeled) = stmt("done: return").kind else {
            panic!("expected labeled statement");
        };
        assert_eq!(labeled.label.name, "done");
        assert!(matches!(labeled.stmt.kind, StmtKind::Return(_)));
    }

    #[test]
    fn assignment_forms() {
        let StmtKind::Assign(a) = stmt("x = 1").kind else {
            panic!("expected assignment");
        };
        assert_eq!(a.op, AssignOp::Assign);

        let StmtKind::Assign(a) = stmt("x += 1").kind else {
            panic!("expected assignment");
        };
        assert_eq!(a.op, AssignOp::Add);

        let StmtKind::Assign(a) = stmt("a, b = b, a").kind else {
            panic!("expected assignment");
        };
        assert_eq!(a.lhs.len(), 2);
        assert_eq!(a.rhs.len(), 2);

        let StmtKind::Assign(a) = stmt("x &^= mask").kind else {
            panic!("expected assignment");
        };
        assert_eq!(a.op, AssignOp::AndNot);
    }

    #[test]
    fn send_statement() {
        let StmtKind::Send(send) = stmt("ch <- v + 1").kind else {
            panic!("expected send");
        };
        assert!(matches!(send.value, Expr::Binary(_)));
        assert!(matches!(send.chan, Expr::Unary(_)));
    }

    #[test]
    fn inc_dec_statements() {
        let StmtKind::IncDec(i) = stmt("n++").kind else {
            panic!("expected inc/dec");
        };
        assert!(i.is_inc);

        let StmtKind::IncDec(i) = stmt("n--").kind else {
            panic!("expected inc/dec");
        };
        assert!(!i.is_inc);
    }

    #[test]
    fn expression_statement() {
        assert!(matches!(stmt("f(1)").kind, StmtKind::Expr(_)));
    }

    #[test]
    fn empty_statement_before_semicolon() {
        assert!(matches!(stmt(";").kind, StmtKind::Empty));
    }

    #[test]
    fn block_statement() {
        let StmtKind::Block(block) = stmt("{ x = 1; y = 2 }").kind else {
            panic!("expected block");
        };
        assert_eq!(block.stmts.len(), 2);
    }

    #[test]
    fn block_with_newline_separators() {
        let StmtKind::Block(block) = stmt("{\n\tx = 1\n\ty = 2\n}").kind else {
            panic!("expected block");
        };
        assert_eq!(block.stmts.len(), 2);
    }

    #[test]
    fn composite_statements_are_extension_points() {
        stmt_fails("if x { }");
        stmt_fails("for { }");
        stmt_fails("switch x { }");
        stmt_fails("select { }");
    }

    #[test]
    fn terminating_statements() {
        assert!(stmt("return").is_terminating());
        assert!(stmt("return 1, 2").is_terminating());
        assert!(stmt("goto done").is_terminating());
        assert!(stmt("done: return").is_terminating());
        assert!(stmt("{ x = 1; return }").is_terminating());

        assert!(!stmt("x = 1").is_terminating());
        assert!(!stmt("break").is_terminating());
        assert!(!stmt("{ return; x = 1 }").is_terminating());
        assert!(!stmt("{ }").is_terminating());
    }
}
