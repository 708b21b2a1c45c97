//! The debug surface: token and AST rendering.
//!
//! Tokens print as `Kind(field: value, ...)` and every literal can
//! reproduce the spelling it was written with. AST nodes render as an
//! indented `NodeName [ ... ]` tree, two spaces per depth level. This
//! is tooling output; tests compare structures, not these strings.

use std::fmt;

use crate::ast::*;
use crate::token::{
    Comment, FloatLit, ImaginaryLit, IntLit, RuneKind, RuneLit, StrLit, Token, TokenKind,
};

impl RuneLit {
    /// The source spelling of this rune, escape form included.
    pub fn spelling(&self) -> String {
        let code = self.value as u32;
        match self.kind {
            RuneKind::Normal => self.value.to_string(),
            RuneKind::Escaped => format!("\\{}", escape_letter(self.value)),
            RuneKind::LittleU => format!("\\u{code:04x}"),
            RuneKind::BigU => format!("\\U{code:08x}"),
            RuneKind::HexByte => format!("\\x{code:02x}"),
            RuneKind::OctalByte => format!("\\{code:03o}"),
        }
    }
}

impl StrLit {
    /// The source spelling of the string body, escape forms included.
    pub fn spelling(&self) -> String {
        self.runes.iter().map(|r| r.spelling()).collect()
    }
}

fn escape_letter(value: char) -> char {
    match value {
        '\u{07}' => 'a',
        '\u{08}' => 'b',
        '\u{0C}' => 'f',
        '\n' => 'n',
        '\r' => 'r',
        '\t' => 't',
        '\u{0B}' => 'v',
        '\'' => '\'',
        '"' => '"',
        _ => '\\',
    }
}

impl fmt::Display for IntLit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "IntLiteral(lit: {}, value: {}, radix: {})",
            self.digits,
            self.value(),
            self.radix
        )
    }
}

impl fmt::Display for FloatLit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FloatLiteral(mantissa: {}, exponent: {}, radix: {}, negative_exponent: {})",
            self.mantissa, self.exponent, self.radix, self.negative_exponent
        )
    }
}

impl fmt::Display for ImaginaryLit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImaginaryLit::Int(lit) => write!(f, "ImaginaryLiteral(inner: {lit})"),
            ImaginaryLit::Float(lit) => write!(f, "ImaginaryLiteral(inner: {lit})"),
        }
    }
}

impl fmt::Display for RuneLit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RuneLiteral(kind: {:?}, rune: '{}')", self.kind, self.spelling())
    }
}

impl fmt::Display for StrLit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StringLiteral(lit: \"{}\")", self.spelling())
    }
}

impl fmt::Display for Comment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Comment(multiline: {}, text: {})", self.multiline, self.text)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TokenKind::Eof => write!(f, "EOF"),
            TokenKind::Keyword(kw) => write!(f, "Keyword(kind: {kw})"),
            TokenKind::Punct(p) => write!(f, "Punctuation(kind: {p})"),
            TokenKind::Ident(name) => write!(f, "Identifier(ident: {name})"),
            TokenKind::Int(lit) => write!(f, "{lit}"),
            TokenKind::Float(lit) => write!(f, "{lit}"),
            TokenKind::Imaginary(lit) => write!(f, "{lit}"),
            TokenKind::Rune(lit) => write!(f, "{lit}"),
            TokenKind::Str(lit) => write!(f, "{lit}"),
            TokenKind::Comment(c) => write!(f, "{c}"),
        }
    }
}

// ── AST tree rendering ─────────────────────────────────────────────────

/// Renders a parsed source file as an indented tree.
pub fn render_source_file(file: &SourceFile) -> String {
    let mut p = Printer::new();
    p.file(file);
    p.out
}

/// Renders a single statement as an indented tree.
pub fn render_stmt(stmt: &Stmt) -> String {
    let mut p = Printer::new();
    p.stmt(stmt);
    p.out
}

struct Printer {
    out: String,
    depth: usize,
}

impl Printer {
    fn new() -> Self {
        Self {
            out: String::new(),
            depth: 0,
        }
    }

    fn line(&mut self, text: impl AsRef<str>) {
        for _ in 0..self.depth {
            self.out.push_str("  ");
        }
        self.out.push_str(text.as_ref());
        self.out.push('\n');
    }

    /// `name [` ... `]` around the children printed by `f`.
    fn node(&mut self, name: &str, f: impl FnOnce(&mut Self)) {
        self.line(format!("{name} ["));
        self.depth += 1;
        f(self);
        self.depth -= 1;
        self.line("]");
    }

    fn ident(&mut self, ident: &Ident) {
        self.line(format!("Identifier(ident: {})", ident.name));
    }

    fn qualified(&mut self, q: &QualifiedIdent) {
        match &q.package {
            Some(pkg) => self.line(format!(
                "IdentOrQualified(package: {}, name: {})",
                pkg.name, q.name.name
            )),
            None => self.line(format!("IdentOrQualified(name: {})", q.name.name)),
        }
    }

    fn file(&mut self, file: &SourceFile) {
        self.node("SourceFile", |p| {
            p.node("PackageClause", |p| p.ident(&file.package.name));
            for import in &file.imports {
                p.import_decl(import);
            }
            for decl in &file.decls {
                p.top_level_decl(decl);
            }
        });
    }

    fn import_decl(&mut self, decl: &ImportDecl) {
        self.node("ImportDecl", |p| {
            for spec in &decl.specs {
                let name = match (&spec.alias, spec.dot) {
                    (Some(alias), _) => format!("ImportSpec(name: {})", alias.name),
                    (None, true) => "ImportSpec(dot: true)".to_string(),
                    (None, false) => "ImportSpec".to_string(),
                };
                p.node(&name, |p| p.line(spec.path.to_string()));
            }
        });
    }

    fn top_level_decl(&mut self, decl: &TopLevelDecl) {
        match decl {
            TopLevelDecl::Type(d) => self.type_decl(d),
            TopLevelDecl::Const(d) => self.const_decl(d),
            TopLevelDecl::Var(d) => self.var_decl(d),
        }
    }

    fn const_decl(&mut self, decl: &ConstDecl) {
        self.node("ConstDecl", |p| {
            for spec in &decl.specs {
                p.node("ConstSpec", |p| {
                    p.spec_body(&spec.names, &spec.ty, &spec.values);
                });
            }
        });
    }

    fn var_decl(&mut self, decl: &VarDecl) {
        self.node("VarDecl", |p| {
            for spec in &decl.specs {
                p.node("VarSpec", |p| {
                    p.spec_body(&spec.names, &spec.ty, &spec.values);
                });
            }
        });
    }

    fn spec_body(&mut self, names: &[Ident], ty: &Option<Type>, values: &Option<Vec<Expr>>) {
        self.node("IdentifierList", |p| {
            for name in names {
                p.ident(name);
            }
        });
        if let Some(ty) = ty {
            self.ty(ty);
        }
        if let Some(values) = values {
            self.node("ExpressionList", |p| {
                for value in values {
                    p.expr(value);
                }
            });
        }
    }

    fn type_decl(&mut self, decl: &TypeDecl) {
        self.node("TypeDecl", |p| {
            for spec in &decl.specs {
                match spec {
                    TypeSpec::Alias(alias) => p.node("AliasDecl", |p| {
                        p.ident(&alias.name);
                        p.ty(&alias.ty);
                    }),
                    TypeSpec::Def(def) => p.node("TypeDef", |p| {
                        p.ident(&def.name);
                        p.ty(&def.ty);
                    }),
                }
            }
        });
    }

    fn ty(&mut self, ty: &Type) {
        match &ty.kind {
            TypeKind::Named(named) => self.named_type(named),
            TypeKind::Lit(lit) => self.type_lit(lit),
        }
    }

    fn named_type(&mut self, named: &NamedType) {
        self.node("NamedType", |p| {
            p.qualified(&named.name);
            if let Some(args) = &named.type_args {
                p.node("TypeList", |p| {
                    for arg in args {
                        p.ty(arg);
                    }
                });
            }
        });
    }

    fn type_lit(&mut self, lit: &TypeLit) {
        match lit {
            TypeLit::Array(a) => self.node("ArrayType", |p| {
                p.expr(&a.len);
                p.ty(&a.elem);
            }),
            TypeLit::Struct(s) => self.node("StructType", |p| {
                for field in &s.fields {
                    p.struct_field(field);
                }
            }),
            TypeLit::Pointer(ptr) => self.node("PointerType", |p| p.ty(&ptr.inner)),
            TypeLit::Function(_) => self.line("FunctionType"),
            TypeLit::Interface(_) => self.line("InterfaceType"),
            TypeLit::Slice(s) => self.node("SliceType", |p| p.ty(&s.elem)),
            TypeLit::Map(m) => self.node("MapType", |p| {
                p.ty(&m.key);
                p.ty(&m.value);
            }),
            TypeLit::Chan(c) => {
                let dir = match c.dir {
                    ChanDir::Send => "SEND",
                    ChanDir::Recv => "RECV",
                    ChanDir::Bidi => "BIDI",
                };
                self.node(&format!("ChannelType(direction: {dir})"), |p| p.ty(&c.elem));
            }
        }
    }

    fn struct_field(&mut self, field: &StructFieldDecl) {
        self.node("StructFieldDecl", |p| {
            match &field.kind {
                StructFieldKind::Embedded { pointer, ty } => {
                    let name = if *pointer {
                        "EmbeddedField(pointer: true)"
                    } else {
                        "EmbeddedField"
                    };
                    p.node(name, |p| p.named_type(ty));
                }
                StructFieldKind::Named { names, ty } => p.node("Field", |p| {
                    p.node("IdentifierList", |p| {
                        for name in names {
                            p.ident(name);
                        }
                    });
                    p.ty(ty);
                }),
            }
            if let Some(tag) = &field.tag {
                p.line(format!("Tag({tag})"));
            }
        });
    }

    fn expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Unary(u) => self.unary(u),
            Expr::Binary(b) => self.node(&format!("BinaryExpression(op: {})", b.op.as_str()), |p| {
                p.expr(&b.lhs);
                p.expr(&b.rhs);
            }),
        }
    }

    fn unary(&mut self, u: &UnaryExpr) {
        if u.ops.is_empty() {
            self.primary(&u.expr);
        } else {
            let ops: Vec<&str> = u.ops.iter().map(|op| op.as_str()).collect();
            self.node(&format!("UnaryExpression(ops: {})", ops.join(" ")), |p| {
                p.primary(&u.expr);
            });
        }
    }

    fn primary(&mut self, primary: &PrimaryExpr) {
        self.node("PrimaryExpression", |p| {
            match &primary.inner {
                Inner::Name(q) => p.qualified(q),
                Inner::Operand(op) => p.node("NamedOperand", |p| {
                    p.qualified(&op.name);
                    p.node("TypeList", |p| {
                        for arg in &op.type_args {
                            p.ty(arg);
                        }
                    });
                }),
                Inner::TypeLit(lit) => p.type_lit(lit),
                Inner::Paren(e) => p.node("ParenExpression", |p| p.expr(e)),
                Inner::Literal(lit) => {
                    let text = match lit {
                        BasicLit::Int(l) => l.to_string(),
                        BasicLit::Float(l) => l.to_string(),
                        BasicLit::Imaginary(l) => l.to_string(),
                        BasicLit::Rune(l) => l.to_string(),
                        BasicLit::Str(l) => l.to_string(),
                    };
                    p.line(format!("BasicLiteral({text})"));
                }
            }
            for outer in &primary.outers {
                p.outer(outer);
            }
        });
    }

    fn outer(&mut self, outer: &Outer) {
        match outer {
            Outer::Selector(ident) => self.line(format!("Selector(ident: {})", ident.name)),
            Outer::Index(e) => self.node("Index", |p| p.expr(e)),
            Outer::Slice(s) => self.node("Slice", |p| {
                if let Some(low) = &s.low {
                    p.node("Low", |p| p.expr(low));
                }
                if let Some(high) = &s.high {
                    p.node("High", |p| p.expr(high));
                }
                if let Some(max) = &s.max {
                    p.node("Max", |p| p.expr(max));
                }
            }),
            Outer::TypeAssert(ty) => self.node("TypeAssertion", |p| p.ty(ty)),
            Outer::Arguments(args) => {
                let name = if args.ellipsis {
                    "Arguments(ellipsis: true)"
                } else {
                    "Arguments"
                };
                self.node(name, |p| {
                    for arg in &args.args {
                        p.expr(arg);
                    }
                });
            }
        }
    }

    fn stmt(&mut self, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::Empty => self.line("EmptyStatement"),
            StmtKind::Labeled(l) => {
                self.node(&format!("LabeledStatement(label: {})", l.label.name), |p| {
                    p.stmt(&l.stmt)
                })
            }
            StmtKind::Go(e) => self.node("GoStatement", |p| p.expr(e)),
            StmtKind::Defer(e) => self.node("DeferStatement", |p| p.expr(e)),
            StmtKind::Return(values) => self.node("ReturnStatement", |p| {
                for value in values {
                    p.expr(value);
                }
            }),
            StmtKind::Break(label) => match label {
                Some(l) => self.line(format!("BreakStatement(label: {})", l.name)),
                None => self.line("BreakStatement"),
            },
            StmtKind::Continue(label) => match label {
                Some(l) => self.line(format!("ContinueStatement(label: {})", l.name)),
                None => self.line("ContinueStatement"),
            },
            StmtKind::Goto(label) => self.line(format!("GotoStatement(label: {})", label.name)),
            StmtKind::Fallthrough => self.line("FallthroughStatement"),
            StmtKind::Block(block) => self.node("Block", |p| {
                for s in &block.stmts {
                    p.stmt(s);
                }
            }),
            StmtKind::Assign(a) => {
                self.node(&format!("AssignmentStatement(op: {})", a.op.as_str()), |p| {
                    p.node("ExpressionList", |p| {
                        for e in &a.lhs {
                            p.expr(e);
                        }
                    });
                    p.node("ExpressionList", |p| {
                        for e in &a.rhs {
                            p.expr(e);
                        }
                    });
                })
            }
            StmtKind::Send(s) => self.node("SendStatement", |p| {
                p.expr(&s.chan);
                p.expr(&s.value);
            }),
            StmtKind::IncDec(i) => {
                let name = if i.is_inc {
                    "IncrementStatement"
                } else {
                    "DecrementStatement"
                };
                self.node(name, |p| p.expr(&i.expr));
            }
            StmtKind::Expr(e) => self.node("ExpressionStatement", |p| p.expr(e)),
        }
    }
}
