//! End-to-end tests driving the lexer and parser together over whole
//! source files.

use golite_syntax::ast::*;
use golite_syntax::display::render_source_file;
use golite_syntax::lexer::Lexer;
use golite_syntax::parser::parse;
use golite_syntax::stream::TokenStream;
use golite_syntax::token::TokenKind;
use num_bigint::BigUint;

fn parse_ok(source: &str) -> SourceFile {
    let (file, diags) = parse(source);
    assert!(!diags.has_errors(), "lex errors in {source:?}: {diags:?}");
    file.unwrap_or_else(|| panic!("failed to parse:\n{source}"))
}

fn first_var_values(file: &SourceFile) -> &[Expr] {
    for decl in &file.decls {
        if let TopLevelDecl::Var(var) = decl {
            return var.specs[0].values.as_deref().unwrap_or(&[]);
        }
    }
    panic!("no var declaration in file");
}

/// Fully parenthesized rendering of the binary structure.
fn shape(e: &Expr) -> String {
    match e {
        Expr::Binary(b) => format!("({} {} {})", shape(&b.lhs), b.op.as_str(), shape(&b.rhs)),
        Expr::Unary(u) => {
            let mut s = String::new();
            for op in &u.ops {
                s.push_str(op.as_str());
            }
            match &u.expr.inner {
                Inner::Name(q) => s.push_str(&q.name.name),
                Inner::Literal(BasicLit::Int(l)) => s.push_str(&l.digits),
                _ => s.push('?'),
            }
            s
        }
    }
}

#[test]
fn minimal_source_file() {
    let file = parse_ok("package p\n");
    assert_eq!(file.package.name.name, "p");
    assert!(file.imports.is_empty());
    assert!(file.decls.is_empty());
}

#[test]
fn grouped_imports() {
    let file = parse_ok("package p; import ( \"a\"; x \"b\"; . \"c\" )\n");
    let specs = &file.imports[0].specs;
    assert_eq!(specs.len(), 3);
    assert_eq!(specs[0].path.cooked(), "a");
    assert_eq!(specs[1].alias.as_ref().unwrap().name, "x");
    assert!(specs[2].dot);
}

#[test]
fn operator_precedence_end_to_end() {
    let file = parse_ok("package p; var x = 1 + 2 * 3 == 7 && y\n");
    let values = first_var_values(&file);
    assert_eq!(shape(&values[0]), "(((1 + (2 * 3)) == 7) && y)");
}

#[test]
fn every_level_of_the_table_in_one_expression() {
    let file = parse_ok("package p; var x = a || b && c == d + e * f\n");
    let values = first_var_values(&file);
    assert_eq!(shape(&values[0]), "(a || (b && (c == (d + (e * f)))))");
}

#[test]
fn generic_instantiation_vs_index() {
    let file = parse_ok("package p; var x = F[int]\n");
    let values = first_var_values(&file);
    let Expr::Unary(u) = &values[0] else {
        panic!("expected unary expression");
    };
    let Inner::Operand(op) = &u.expr.inner else {
        panic!("expected named operand, got {:?}", u.expr.inner);
    };
    assert_eq!(op.name.name.name, "F");
    assert_eq!(op.type_args.len(), 1);
    assert!(u.expr.outers.is_empty());
}

#[test]
fn numeric_literal_values() {
    // lexer-level checks over the literal grid
    let cases: &[(&str, &str, u8, u64)] = &[
        ("0b1010", "1010", 2, 10),
        ("0o17", "17", 8, 15),
        ("0xBEEF", "BEEF", 16, 0xBEEF),
        ("0_1_2", "012", 8, 10),
        ("1_000", "1000", 10, 1000),
    ];
    for (source, digits, radix, value) in cases {
        let (tokens, diags) = Lexer::new(source, 0).collect_tokens();
        assert!(!diags.has_errors(), "errors lexing {source}");
        let TokenKind::Int(lit) = &tokens[0].kind else {
            panic!("expected int for {source}, got {:?}", tokens[0].kind);
        };
        assert_eq!(lit.digits, *digits, "digits of {source}");
        assert_eq!(lit.radix, *radix, "radix of {source}");
        assert_eq!(lit.value(), BigUint::from(*value), "value of {source}");
    }
}

#[test]
fn int_value_decode_invariant() {
    // value == sum of digit * radix^(n-1-i)
    let (tokens, _) = Lexer::new("0xDEAD_BEEF", 0).collect_tokens();
    let TokenKind::Int(lit) = &tokens[0].kind else {
        panic!("expected int");
    };
    let mut expect = BigUint::from(0u32);
    for c in lit.digits.chars() {
        expect = expect * 16u32 + c.to_digit(16).unwrap();
    }
    assert_eq!(lit.value(), expect);
}

#[test]
fn struct_alias_disambiguation() {
    let file = parse_ok("package p; type T = struct { x int; Y; *Z }\n");
    let TopLevelDecl::Type(decl) = &file.decls[0] else {
        panic!("expected type decl");
    };
    let TypeSpec::Alias(alias) = &decl.specs[0] else {
        panic!("expected alias");
    };
    assert_eq!(alias.name.name, "T");
    let TypeKind::Lit(TypeLit::Struct(s)) = &alias.ty.kind else {
        panic!("expected struct type");
    };
    assert_eq!(s.fields.len(), 3);
    assert!(matches!(s.fields[0].kind, StructFieldKind::Named { .. }));
    assert!(matches!(
        s.fields[1].kind,
        StructFieldKind::Embedded { pointer: false, .. }
    ));
    assert!(matches!(
        s.fields[2].kind,
        StructFieldKind::Embedded { pointer: true, .. }
    ));
}

#[test]
fn a_realistic_file() {
    let source = "\
package main

import \"math\"

const ( aconstant = 1 + 2 / 3 )
var name = float64(aconstant) + 2 * 3 + -4 * math.Sin(10)
var x int

const (
\ta = 1
\tb
\tc
)

type x = map[uint64][]*chan uint64

type s = struct {
\ta, b, c int64
}
";
    let file = parse_ok(source);
    assert_eq!(file.package.name.name, "main");
    assert_eq!(file.imports.len(), 1);
    assert_eq!(file.decls.len(), 6);

    // the grouped const block keeps its bare specs
    let TopLevelDecl::Const(c) = &file.decls[3] else {
        panic!("expected grouped const");
    };
    assert_eq!(c.specs.len(), 3);
    assert!(c.specs[1].values.is_none());
}

#[test]
fn semicolon_insertion_carries_the_grammar() {
    // no explicit semicolons anywhere
    let file = parse_ok("package p\nvar x = 1\nvar y = 2\n");
    assert_eq!(file.decls.len(), 2);
}

#[test]
fn parse_failure_yields_no_tree() {
    for source in [
        "var x = 1\n",                 // missing package clause
        "package p; var x =\n",        // missing initializer
        "package p; import 42\n",      // import path must be a string
        "package p; type T = \n",      // missing type
        "package p; var x = (1 + 2\n", // unbalanced paren
    ] {
        let (file, _) = parse(source);
        assert!(file.is_none(), "expected failure for {source:?}");
    }
}

#[test]
fn token_round_trip_through_display() {
    // lexing the printed spelling of punctuation and keywords gives the
    // same kinds back
    let source = "package p; var x = a + 1\n";
    let (tokens, _) = Lexer::new(source, 0).collect_tokens();
    for token in tokens.iter().filter(|t| !t.is_eof()) {
        match &token.kind {
            TokenKind::Punct(p) => {
                if token.span.is_empty() {
                    continue; // inserted semicolon has no spelling in the source
                }
                let (again, _) = Lexer::new(p.as_str(), 0).collect_tokens();
                assert_eq!(again[0].kind, TokenKind::Punct(*p));
            }
            TokenKind::Keyword(kw) => {
                let (again, _) = Lexer::new(kw.as_str(), 0).collect_tokens();
                assert_eq!(again[0].kind, TokenKind::Keyword(*kw));
            }
            _ => {}
        }
    }
}

#[test]
fn stream_restores_position_on_failed_alternatives() {
    // a var decl inside the stream is untouched by a failed const parse
    let (tokens, _) = Lexer::new("var x = 1", 0).collect_tokens();
    let mut ts = TokenStream::new(tokens);
    let before = ts.mark();
    assert!(ts.match_keyword(golite_syntax::token::Keyword::Const).is_none());
    assert_eq!(ts.mark(), before);
    assert!(ts.match_keyword(golite_syntax::token::Keyword::Var).is_some());
}

#[test]
fn rendered_tree_mentions_every_declaration() {
    let file = parse_ok(
        "package demo\nimport \"io\"\nconst k = 1\nvar v = k\ntype T = int\n",
    );
    let rendered = render_source_file(&file);
    for needle in [
        "SourceFile [",
        "PackageClause [",
        "ImportDecl [",
        "ConstDecl [",
        "VarDecl [",
        "TypeDecl [",
        "AliasDecl [",
    ] {
        assert!(rendered.contains(needle), "missing {needle} in:\n{rendered}");
    }
}

#[test]
fn deeply_nested_types_parse() {
    let file = parse_ok("package p; type T = map[string]map[int][]*[4]chan<- <-chan V\n");
    let TopLevelDecl::Type(decl) = &file.decls[0] else {
        panic!("expected type decl");
    };
    let TypeSpec::Alias(alias) = &decl.specs[0] else {
        panic!("expected alias");
    };
    assert!(matches!(alias.ty.kind, TypeKind::Lit(TypeLit::Map(_))));
}

#[test]
fn unary_chain_on_call() {
    let file = parse_ok("package p; var x = -*p.f(1)[0]\n");
    let values = first_var_values(&file);
    let Expr::Unary(u) = &values[0] else {
        panic!("expected unary");
    };
    assert_eq!(u.ops.len(), 2);
    assert_eq!(u.expr.outers.len(), 2);
}
