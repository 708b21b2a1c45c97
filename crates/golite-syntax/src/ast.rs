//! Abstract Syntax Tree definitions for golite.
//!
//! The AST is a pure ownership tree: every node owns its children and
//! recursive positions go through `Box`. It is built bottom-up by the
//! parser and handed to the caller as a value.

use golite_common::span::Span;

use crate::token::{FloatLit, ImaginaryLit, IntLit, Punct, RuneLit, StrLit};

/// An identifier with its source span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

/// `Identifier` or package-qualified `Identifier '.' Identifier`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedIdent {
    pub package: Option<Ident>,
    pub name: Ident,
    pub span: Span,
}

// =============================================================================
// Source file and declarations
// =============================================================================

/// A complete source file: package clause, imports, then declarations.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub package: PackageClause,
    pub imports: Vec<ImportDecl>,
    pub decls: Vec<TopLevelDecl>,
    pub span: Span,
}

/// `package name`
#[derive(Debug, Clone)]
pub struct PackageClause {
    pub name: Ident,
    pub span: Span,
}

/// `import "path"` or a parenthesized group of import specs.
#[derive(Debug, Clone)]
pub struct ImportDecl {
    pub specs: Vec<ImportSpec>,
    pub span: Span,
}

/// One import path with an optional local name or dot marker.
/// At most one of `alias` and `dot` is set.
#[derive(Debug, Clone)]
pub struct ImportSpec {
    pub path: StrLit,
    pub alias: Option<Ident>,
    pub dot: bool,
    pub span: Span,
}

/// A top-level declaration.
#[derive(Debug, Clone)]
pub enum TopLevelDecl {
    Type(TypeDecl),
    Const(ConstDecl),
    Var(VarDecl),
}

impl TopLevelDecl {
    pub fn span(&self) -> Span {
        match self {
            TopLevelDecl::Type(d) => d.span,
            TopLevelDecl::Const(d) => d.span,
            TopLevelDecl::Var(d) => d.span,
        }
    }
}

/// `const` declaration: one spec or a parenthesized group.
#[derive(Debug, Clone)]
pub struct ConstDecl {
    pub specs: Vec<ConstSpec>,
    pub span: Span,
}

/// One constant spec. Inside a grouped block the values may be absent
/// entirely (the spec repeats the previous one).
#[derive(Debug, Clone)]
pub struct ConstSpec {
    pub names: Vec<Ident>,
    pub ty: Option<Type>,
    pub values: Option<Vec<Expr>>,
    pub span: Span,
}

/// `var` declaration: one spec or a parenthesized group.
#[derive(Debug, Clone)]
pub struct VarDecl {
    pub specs: Vec<VarSpec>,
    pub span: Span,
}

/// One variable spec. At least one of `ty` and `values` is present.
#[derive(Debug, Clone)]
pub struct VarSpec {
    pub names: Vec<Ident>,
    pub ty: Option<Type>,
    pub values: Option<Vec<Expr>>,
    pub span: Span,
}

/// `type` declaration: one spec or a parenthesized group.
#[derive(Debug, Clone)]
pub struct TypeDecl {
    pub specs: Vec<TypeSpec>,
    pub span: Span,
}

/// A type spec: alias (`type T = U`) or definition (`type T U`).
#[derive(Debug, Clone)]
pub enum TypeSpec {
    Alias(AliasDecl),
    Def(TypeDef),
}

impl TypeSpec {
    pub fn span(&self) -> Span {
        match self {
            TypeSpec::Alias(d) => d.span,
            TypeSpec::Def(d) => d.span,
        }
    }
}

/// `Identifier '=' Type`
#[derive(Debug, Clone)]
pub struct AliasDecl {
    pub name: Ident,
    pub ty: Type,
    pub span: Span,
}

/// `Identifier Type`
#[derive(Debug, Clone)]
pub struct TypeDef {
    pub name: Ident,
    pub ty: Type,
    pub span: Span,
}

// =============================================================================
// Types
// =============================================================================

/// A type: a (possibly instantiated) named type or a type literal.
#[derive(Debug, Clone)]
pub struct Type {
    pub kind: TypeKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum TypeKind {
    Named(NamedType),
    Lit(TypeLit),
}

/// A reference to a type by name, with optional type arguments for
/// generic instantiation: `T`, `pkg.T`, `List[int]`.
#[derive(Debug, Clone)]
pub struct NamedType {
    pub name: QualifiedIdent,
    pub type_args: Option<Vec<Type>>,
}

/// A structural type form.
#[derive(Debug, Clone)]
pub enum TypeLit {
    Array(ArrayType),
    Struct(StructType),
    Pointer(PointerType),
    Function(FunctionType),
    Interface(InterfaceType),
    Slice(SliceType),
    Map(MapType),
    Chan(ChannelType),
}

/// `[len]T`
#[derive(Debug, Clone)]
pub struct ArrayType {
    pub len: Box<Expr>,
    pub elem: Box<Type>,
}

/// `struct { ... }`
#[derive(Debug, Clone)]
pub struct StructType {
    pub fields: Vec<StructFieldDecl>,
}

/// One field declaration in a struct body, with its optional tag.
#[derive(Debug, Clone)]
pub struct StructFieldDecl {
    pub kind: StructFieldKind,
    pub tag: Option<StrLit>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum StructFieldKind {
    /// An embedded type, optionally behind a pointer marker: `T`, `*T`.
    Embedded { pointer: bool, ty: NamedType },
    /// Named fields sharing a type: `x, y int`.
    Named { names: Vec<Ident>, ty: Box<Type> },
}

/// `*T`
#[derive(Debug, Clone)]
pub struct PointerType {
    pub inner: Box<Type>,
}

/// Declared extension point; the parser never produces one.
#[derive(Debug, Clone)]
pub struct FunctionType;

/// Declared extension point; the parser never produces one.
#[derive(Debug, Clone)]
pub struct InterfaceType;

/// `[]T`
#[derive(Debug, Clone)]
pub struct SliceType {
    pub elem: Box<Type>,
}

/// `map[K]V`
#[derive(Debug, Clone)]
pub struct MapType {
    pub key: Box<Type>,
    pub value: Box<Type>,
}

/// `chan T`, `chan<- T`, or `<-chan T`.
#[derive(Debug, Clone)]
pub struct ChannelType {
    pub dir: ChanDir,
    pub elem: Box<Type>,
}

/// Channel direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChanDir {
    /// `chan<- T`
    Send,
    /// `<-chan T`
    Recv,
    /// `chan T`
    Bidi,
}

// =============================================================================
// Expressions
// =============================================================================

/// An expression. The leaves are unary expressions (zero or more
/// prefix operators around a primary expression); interior nodes are
/// binary operators.
#[derive(Debug, Clone)]
pub enum Expr {
    Unary(UnaryExpr),
    Binary(Box<BinaryExpr>),
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Unary(e) => e.span,
            Expr::Binary(e) => e.span,
        }
    }
}

/// `{ unary_op } PrimaryExpression`. The operators apply right to left.
#[derive(Debug, Clone)]
pub struct UnaryExpr {
    pub ops: Vec<UnaryOp>,
    pub expr: PrimaryExpr,
    pub span: Span,
}

/// A binary operator application.
#[derive(Debug, Clone)]
pub struct BinaryExpr {
    pub op: BinOp,
    pub lhs: Expr,
    pub rhs: Expr,
    pub span: Span,
}

/// Unary prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `+`
    Pos,
    /// `-`
    Neg,
    /// `!`
    Not,
    /// `^`
    BitNot,
    /// `*`
    Deref,
    /// `&`
    Addr,
    /// `<-`
    Recv,
}

impl UnaryOp {
    pub fn from_punct(p: Punct) -> Option<UnaryOp> {
        match p {
            Punct::Plus => Some(UnaryOp::Pos),
            Punct::Minus => Some(UnaryOp::Neg),
            Punct::Not => Some(UnaryOp::Not),
            Punct::Caret => Some(UnaryOp::BitNot),
            Punct::Star => Some(UnaryOp::Deref),
            Punct::Amp => Some(UnaryOp::Addr),
            Punct::Arrow => Some(UnaryOp::Recv),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            UnaryOp::Pos => "+",
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
            UnaryOp::BitNot => "^",
            UnaryOp::Deref => "*",
            UnaryOp::Addr => "&",
            UnaryOp::Recv => "<-",
        }
    }
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Mul,
    Div,
    Rem,
    Shl,
    Shr,
    And,
    AndNot,
    Add,
    Sub,
    Or,
    Xor,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    LogAnd,
    LogOr,
}

impl BinOp {
    /// Precedence level; higher binds tighter. Every operator is
    /// left-associative.
    pub const fn level(self) -> u8 {
        match self {
            BinOp::Mul
            | BinOp::Div
            | BinOp::Rem
            | BinOp::Shl
            | BinOp::Shr
            | BinOp::And
            | BinOp::AndNot => 5,
            BinOp::Add | BinOp::Sub | BinOp::Or | BinOp::Xor => 4,
            BinOp::Eq | BinOp::NotEq | BinOp::Lt | BinOp::LtEq | BinOp::Gt | BinOp::GtEq => 3,
            BinOp::LogAnd => 2,
            BinOp::LogOr => 1,
        }
    }

    pub fn from_punct(p: Punct) -> Option<BinOp> {
        match p {
            Punct::Star => Some(BinOp::Mul),
            Punct::Slash => Some(BinOp::Div),
            Punct::Percent => Some(BinOp::Rem),
            Punct::Shl => Some(BinOp::Shl),
            Punct::Shr => Some(BinOp::Shr),
            Punct::Amp => Some(BinOp::And),
            Punct::AmpCaret => Some(BinOp::AndNot),
            Punct::Plus => Some(BinOp::Add),
            Punct::Minus => Some(BinOp::Sub),
            Punct::Pipe => Some(BinOp::Or),
            Punct::Caret => Some(BinOp::Xor),
            Punct::EqEq => Some(BinOp::Eq),
            Punct::NotEq => Some(BinOp::NotEq),
            Punct::Lt => Some(BinOp::Lt),
            Punct::LtEq => Some(BinOp::LtEq),
            Punct::Gt => Some(BinOp::Gt),
            Punct::GtEq => Some(BinOp::GtEq),
            Punct::AmpAmp => Some(BinOp::LogAnd),
            Punct::PipePipe => Some(BinOp::LogOr),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Rem => "%",
            BinOp::Shl => "<<",
            BinOp::Shr => ">>",
            BinOp::And => "&",
            BinOp::AndNot => "&^",
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Or => "|",
            BinOp::Xor => "^",
            BinOp::Eq => "==",
            BinOp::NotEq => "!=",
            BinOp::Lt => "<",
            BinOp::LtEq => "<=",
            BinOp::Gt => ">",
            BinOp::GtEq => ">=",
            BinOp::LogAnd => "&&",
            BinOp::LogOr => "||",
        }
    }
}

/// A primary expression: an inner operand followed by postfix
/// operations applied left to right.
///
/// The grammar here deliberately over-accepts. An `IdentOrQualified`
/// inner may later turn out to be an operand, a conversion, or a method
/// expression; `Inner(Arguments)` covers both calls and conversions;
/// and type literals are admitted as inners so that a type is a
/// syntactic subset of an expression. A later pass disambiguates.
#[derive(Debug, Clone)]
pub struct PrimaryExpr {
    pub inner: Inner,
    pub outers: Vec<Outer>,
    pub span: Span,
}

/// The operand of a primary expression.
#[derive(Debug, Clone)]
pub enum Inner {
    /// A possibly qualified name.
    Name(QualifiedIdent),
    /// A name with type arguments: generic instantiation.
    Operand(NamedOperand),
    /// A type literal in expression position.
    TypeLit(TypeLit),
    /// `( Expression )`
    Paren(Box<Expr>),
    /// A basic literal.
    Literal(BasicLit),
}

/// A generic instantiation: `F[int]`, `pkg.Set[K, V]`.
#[derive(Debug, Clone)]
pub struct NamedOperand {
    pub name: QualifiedIdent,
    pub type_args: Vec<Type>,
}

/// A literal token carried into the tree.
#[derive(Debug, Clone)]
pub enum BasicLit {
    Int(IntLit),
    Float(FloatLit),
    Imaginary(ImaginaryLit),
    Rune(RuneLit),
    Str(StrLit),
}

/// A postfix operation on a primary expression.
#[derive(Debug, Clone)]
pub enum Outer {
    /// `.name`
    Selector(Ident),
    /// `[index]`
    Index(Box<Expr>),
    /// `[low : high]` or `[low : high : max]`; omitted bounds are `None`
    /// (a `None` low means "from the start").
    Slice(SliceExpr),
    /// `.(Type)`
    TypeAssert(Box<Type>),
    /// `(args...)`
    Arguments(Arguments),
}

/// The bounds of a slice operation.
#[derive(Debug, Clone, Default)]
pub struct SliceExpr {
    pub low: Option<Box<Expr>>,
    pub high: Option<Box<Expr>>,
    pub max: Option<Box<Expr>>,
}

/// A call argument list, with an optional trailing splat.
#[derive(Debug, Clone)]
pub struct Arguments {
    pub args: Vec<Expr>,
    pub ellipsis: bool,
}

// =============================================================================
// Statements
// =============================================================================

/// A statement.
#[derive(Debug, Clone)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    /// Whether this statement unconditionally transfers control away.
    /// Later passes use this to check that function bodies end properly.
    pub fn is_terminating(&self) -> bool {
        match &self.kind {
            StmtKind::Return(_) | StmtKind::Goto(_) => true,
            StmtKind::Labeled(l) => l.stmt.is_terminating(),
            StmtKind::Block(b) => b.is_terminating(),
            _ => false,
        }
    }
}

#[derive(Debug, Clone)]
pub enum StmtKind {
    /// The empty statement before a `;`.
    Empty,
    /// `label: stmt`
    Labeled(LabeledStmt),
    /// `go expr`
    Go(Expr),
    /// `defer expr`
    Defer(Expr),
    /// `return expr, ...`
    Return(Vec<Expr>),
    /// `break [label]`
    Break(Option<Ident>),
    /// `continue [label]`
    Continue(Option<Ident>),
    /// `goto label`
    Goto(Ident),
    /// `fallthrough`
    Fallthrough,
    /// `{ ... }`
    Block(Block),
    /// `lhs op= rhs`
    Assign(AssignStmt),
    /// `chan <- value`
    Send(SendStmt),
    /// `expr++` / `expr--`
    IncDec(IncDecStmt),
    /// A bare expression.
    Expr(Expr),
}

/// `label: stmt`
#[derive(Debug, Clone)]
pub struct LabeledStmt {
    pub label: Ident,
    pub stmt: Box<Stmt>,
}

/// A braced statement list.
#[derive(Debug, Clone)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

impl Block {
    /// A block terminates iff its last statement does.
    pub fn is_terminating(&self) -> bool {
        self.stmts.last().map_or(false, |s| s.is_terminating())
    }
}

/// An assignment, compound or plain.
#[derive(Debug, Clone)]
pub struct AssignStmt {
    pub lhs: Vec<Expr>,
    pub op: AssignOp,
    pub rhs: Vec<Expr>,
}

/// Assignment operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    /// `=`
    Assign,
    /// `+=`
    Add,
    /// `-=`
    Sub,
    /// `*=`
    Mul,
    /// `/=`
    Div,
    /// `%=`
    Rem,
    /// `<<=`
    Shl,
    /// `>>=`
    Shr,
    /// `&=`
    And,
    /// `|=`
    Or,
    /// `^=`
    Xor,
    /// `&^=`
    AndNot,
}

impl AssignOp {
    pub fn from_punct(p: Punct) -> Option<AssignOp> {
        match p {
            Punct::Eq => Some(AssignOp::Assign),
            Punct::PlusEq => Some(AssignOp::Add),
            Punct::MinusEq => Some(AssignOp::Sub),
            Punct::StarEq => Some(AssignOp::Mul),
            Punct::SlashEq => Some(AssignOp::Div),
            Punct::PercentEq => Some(AssignOp::Rem),
            Punct::ShlEq => Some(AssignOp::Shl),
            Punct::ShrEq => Some(AssignOp::Shr),
            Punct::AmpEq => Some(AssignOp::And),
            Punct::PipeEq => Some(AssignOp::Or),
            Punct::CaretEq => Some(AssignOp::Xor),
            Punct::AmpCaretEq => Some(AssignOp::AndNot),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::Add => "+=",
            AssignOp::Sub => "-=",
            AssignOp::Mul => "*=",
            AssignOp::Div => "/=",
            AssignOp::Rem => "%=",
            AssignOp::Shl => "<<=",
            AssignOp::Shr => ">>=",
            AssignOp::And => "&=",
            AssignOp::Or => "|=",
            AssignOp::Xor => "^=",
            AssignOp::AndNot => "&^=",
        }
    }
}

/// `chan <- value`
#[derive(Debug, Clone)]
pub struct SendStmt {
    pub chan: Expr,
    pub value: Expr,
}

/// `expr++` or `expr--`
#[derive(Debug, Clone)]
pub struct IncDecStmt {
    pub expr: Expr,
    pub is_inc: bool,
}
