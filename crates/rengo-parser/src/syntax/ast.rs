//! Abstract syntax tree for the Go-like source language.
//!
//! Children are owned by their parents; there are no back-pointers. The
//! rename engine mutates the tree in exactly one way: overwriting the
//! `name` field of `Ident` nodes. Everything else is read-only shape.

use rengo_common::{Span, Spanned};

/// An identifier occurrence. The only node the rename engine ever mutates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Ident {
        Ident {
            name: name.into(),
            span,
        }
    }
}

/// Literal kinds carried by `BasicLit`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LitKind {
    Int,
    Float,
    String,
    Char,
}

/// A literal, stored verbatim as it appeared in the source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BasicLit {
    pub kind: LitKind,
    pub value: String,
    pub span: Span,
}

/// One parsed source file.
#[derive(Clone, Debug, PartialEq)]
pub struct File {
    pub package: Ident,
    pub decls: Vec<Decl>,
    pub span: Span,
}

/// A top-level declaration.
#[derive(Clone, Debug, PartialEq)]
pub enum Decl {
    Gen(GenDecl),
    Func(FuncDecl),
}

/// Which keyword a generic declaration group was introduced by.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeclKeyword {
    Import,
    Const,
    Type,
    Var,
}

impl DeclKeyword {
    pub fn as_str(self) -> &'static str {
        match self {
            DeclKeyword::Import => "import",
            DeclKeyword::Const => "const",
            DeclKeyword::Type => "type",
            DeclKeyword::Var => "var",
        }
    }
}

/// An import/const/type/var declaration group.
///
/// `grouped` records whether the source used the parenthesised form, so the
/// printer can reproduce it.
#[derive(Clone, Debug, PartialEq)]
pub struct GenDecl {
    pub keyword: DeclKeyword,
    pub grouped: bool,
    pub specs: Vec<Spec>,
    pub span: Span,
}

/// One spec inside a `GenDecl`.
#[derive(Clone, Debug, PartialEq)]
pub enum Spec {
    Import(ImportSpec),
    Type(TypeSpec),
    Value(ValueSpec),
}

/// A single import. `alias` is absent for the bare `import "path"` form.
#[derive(Clone, Debug, PartialEq)]
pub struct ImportSpec {
    pub alias: Option<Ident>,
    pub path: BasicLit,
    pub span: Span,
}

/// A single type definition: exactly one declared name.
#[derive(Clone, Debug, PartialEq)]
pub struct TypeSpec {
    pub name: Ident,
    pub ty: Expr,
    pub span: Span,
}

/// A const/var spec: one or more names, optional type, optional values.
#[derive(Clone, Debug, PartialEq)]
pub struct ValueSpec {
    pub names: Vec<Ident>,
    pub ty: Option<Expr>,
    pub values: Vec<Expr>,
    pub span: Span,
}

/// A function or method declaration.
#[derive(Clone, Debug, PartialEq)]
pub struct FuncDecl {
    /// The receiver field, present for methods.
    pub recv: Option<Field>,
    pub name: Ident,
    pub func_type: FuncType,
    /// Absent for forward declarations without a body.
    pub body: Option<Block>,
    pub span: Span,
}

/// A function signature: parameter and result fields.
#[derive(Clone, Debug, PartialEq)]
pub struct FuncType {
    pub params: Vec<Field>,
    pub results: Vec<Field>,
    pub span: Span,
}

/// A named (or embedded/anonymous) field: parameters, results, struct
/// fields, interface methods and receivers all share this shape.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    pub names: Vec<Ident>,
    pub ty: Expr,
    pub span: Span,
}

/// A braced statement list.
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

// ---------------------------------------------------------------------------
// Statements
// ---------------------------------------------------------------------------

/// A statement. Closed set: the rewriter matches exhaustively over this.
#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    Assign(AssignStmt),
    Block(Block),
    Branch(BranchStmt),
    Decl(GenDecl),
    Defer(DeferStmt),
    Empty(Span),
    Expr(ExprStmt),
    For(ForStmt),
    Go(GoStmt),
    If(IfStmt),
    IncDec(IncDecStmt),
    Labeled(LabeledStmt),
    Range(RangeStmt),
    Return(ReturnStmt),
    Select(SelectStmt),
    Send(SendStmt),
    Switch(SwitchStmt),
    TypeSwitch(TypeSwitchStmt),
}

/// Assignment operators, including the short-form declaration `:=`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssignOp {
    Define,
    Assign,
    Add,
    Sub,
    Mul,
    Quo,
    Rem,
    And,
    Or,
    Xor,
    Shl,
    Shr,
    AndNot,
}

impl AssignOp {
    pub fn as_str(self) -> &'static str {
        match self {
            AssignOp::Define => ":=",
            AssignOp::Assign => "=",
            AssignOp::Add => "+=",
            AssignOp::Sub => "-=",
            AssignOp::Mul => "*=",
            AssignOp::Quo => "/=",
            AssignOp::Rem => "%=",
            AssignOp::And => "&=",
            AssignOp::Or => "|=",
            AssignOp::Xor => "^=",
            AssignOp::Shl => "<<=",
            AssignOp::Shr => ">>=",
            AssignOp::AndNot => "&^=",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AssignStmt {
    pub lhs: Vec<Expr>,
    pub op: AssignOp,
    pub rhs: Vec<Expr>,
    pub span: Span,
}

impl AssignStmt {
    /// Whether this assignment introduces new bindings (`:=`).
    pub fn is_define(&self) -> bool {
        self.op == AssignOp::Define
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BranchKind {
    Break,
    Continue,
    Goto,
    Fallthrough,
}

impl BranchKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BranchKind::Break => "break",
            BranchKind::Continue => "continue",
            BranchKind::Goto => "goto",
            BranchKind::Fallthrough => "fallthrough",
        }
    }
}

/// `break`/`continue`/`goto`/`fallthrough`. Labels are carried for printing
/// but are not rename targets.
#[derive(Clone, Debug, PartialEq)]
pub struct BranchStmt {
    pub kind: BranchKind,
    pub label: Option<Ident>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DeferStmt {
    pub call: CallExpr,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GoStmt {
    pub call: CallExpr,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExprStmt {
    pub expr: Expr,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ForStmt {
    pub init: Option<Box<Stmt>>,
    pub cond: Option<Expr>,
    pub post: Option<Box<Stmt>>,
    pub body: Block,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct IfStmt {
    pub init: Option<Box<Stmt>>,
    pub cond: Expr,
    pub then_branch: Block,
    /// Either another `If` (else-if chain) or a `Block`.
    pub else_branch: Option<Box<Stmt>>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct IncDecStmt {
    pub expr: Expr,
    pub inc: bool,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LabeledStmt {
    pub label: Ident,
    pub stmt: Box<Stmt>,
    pub span: Span,
}

/// `for key, value := range subject { ... }` and its `=` form.
#[derive(Clone, Debug, PartialEq)]
pub struct RangeStmt {
    pub key: Option<Expr>,
    pub value: Option<Expr>,
    /// `true` for `:=`, `false` for plain `=` (or no binding at all).
    pub define: bool,
    pub subject: Expr,
    pub body: Block,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReturnStmt {
    pub results: Vec<Expr>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SelectStmt {
    pub clauses: Vec<CommClause>,
    pub span: Span,
}

/// One `case`/`default` arm of a `select`. `comm` is absent for `default`.
#[derive(Clone, Debug, PartialEq)]
pub struct CommClause {
    pub comm: Option<Box<Stmt>>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SendStmt {
    pub chan: Expr,
    pub value: Expr,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SwitchStmt {
    pub init: Option<Box<Stmt>>,
    pub tag: Option<Expr>,
    pub cases: Vec<CaseClause>,
    pub span: Span,
}

/// One `case`/`default` arm of a switch. Empty `exprs` means `default`.
#[derive(Clone, Debug, PartialEq)]
pub struct CaseClause {
    pub exprs: Vec<Expr>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

/// `switch binding := subject.(type) { ... }`.
///
/// The `.(type)` assertion never appears as an expression node; the binding
/// and subject are stored directly on the statement.
#[derive(Clone, Debug, PartialEq)]
pub struct TypeSwitchStmt {
    pub init: Option<Box<Stmt>>,
    pub binding: Option<Ident>,
    pub subject: Expr,
    pub cases: Vec<CaseClause>,
    pub span: Span,
}

// ---------------------------------------------------------------------------
// Expressions
// ---------------------------------------------------------------------------

/// An expression. Type forms live here too, the way the source grammar
/// treats them: a type is just an expression in type position.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    ArrayType(ArrayType),
    Binary(BinaryExpr),
    Call(CallExpr),
    ChanType(ChanType),
    Composite(CompositeLit),
    Ellipsis(EllipsisExpr),
    FuncLit(FuncLit),
    FuncType(FuncType),
    Ident(Ident),
    Index(IndexExpr),
    InterfaceType(InterfaceType),
    KeyValue(KeyValueExpr),
    Lit(BasicLit),
    MapType(MapType),
    Paren(ParenExpr),
    Selector(SelectorExpr),
    Slice(SliceExpr),
    Star(StarExpr),
    StructType(StructType),
    TypeAssert(TypeAssertExpr),
    Unary(UnaryExpr),
}

impl Expr {
    /// View this expression as a bare identifier, if it is one.
    pub fn as_ident(&self) -> Option<&Ident> {
        match self {
            Expr::Ident(ident) => Some(ident),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    LogicalOr,
    LogicalAnd,
    Eql,
    Neq,
    Lss,
    Leq,
    Gtr,
    Geq,
    Add,
    Sub,
    Or,
    Xor,
    Mul,
    Quo,
    Rem,
    Shl,
    Shr,
    And,
    AndNot,
}

impl BinaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::LogicalOr => "||",
            BinaryOp::LogicalAnd => "&&",
            BinaryOp::Eql => "==",
            BinaryOp::Neq => "!=",
            BinaryOp::Lss => "<",
            BinaryOp::Leq => "<=",
            BinaryOp::Gtr => ">",
            BinaryOp::Geq => ">=",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Or => "|",
            BinaryOp::Xor => "^",
            BinaryOp::Mul => "*",
            BinaryOp::Quo => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::And => "&",
            BinaryOp::AndNot => "&^",
        }
    }

    /// Binding strength, highest first. Mirrors the Go precedence ladder.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::Mul
            | BinaryOp::Quo
            | BinaryOp::Rem
            | BinaryOp::Shl
            | BinaryOp::Shr
            | BinaryOp::And
            | BinaryOp::AndNot => 5,
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Or | BinaryOp::Xor => 4,
            BinaryOp::Eql
            | BinaryOp::Neq
            | BinaryOp::Lss
            | BinaryOp::Leq
            | BinaryOp::Gtr
            | BinaryOp::Geq => 3,
            BinaryOp::LogicalAnd => 2,
            BinaryOp::LogicalOr => 1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Minus,
    Not,
    Complement,
    AddrOf,
    Recv,
}

impl UnaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOp::Plus => "+",
            UnaryOp::Minus => "-",
            UnaryOp::Not => "!",
            UnaryOp::Complement => "^",
            UnaryOp::AddrOf => "&",
            UnaryOp::Recv => "<-",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BinaryExpr {
    pub op: BinaryOp,
    pub x: Box<Expr>,
    pub y: Box<Expr>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct UnaryExpr {
    pub op: UnaryOp,
    pub x: Box<Expr>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CallExpr {
    pub fun: Box<Expr>,
    pub args: Vec<Expr>,
    /// `f(xs...)` spread on the final argument.
    pub ellipsis: bool,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ParenExpr {
    pub x: Box<Expr>,
    pub span: Span,
}

/// Member access `x.sel`. The rename engine only ever descends into `x`.
#[derive(Clone, Debug, PartialEq)]
pub struct SelectorExpr {
    pub x: Box<Expr>,
    pub sel: Ident,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct IndexExpr {
    pub x: Box<Expr>,
    pub index: Box<Expr>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SliceExpr {
    pub x: Box<Expr>,
    pub low: Option<Box<Expr>>,
    pub high: Option<Box<Expr>>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StarExpr {
    pub x: Box<Expr>,
    pub span: Span,
}

/// `T{...}` composite literal. `ty` is absent for nested untyped literals
/// inside another composite literal.
#[derive(Clone, Debug, PartialEq)]
pub struct CompositeLit {
    pub ty: Option<Box<Expr>>,
    pub elts: Vec<Expr>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct KeyValueExpr {
    pub key: Box<Expr>,
    pub value: Box<Expr>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FuncLit {
    pub func_type: FuncType,
    pub body: Block,
    pub span: Span,
}

/// `...T` in a final parameter.
#[derive(Clone, Debug, PartialEq)]
pub struct EllipsisExpr {
    pub elt: Option<Box<Expr>>,
    pub span: Span,
}

/// `x.(T)`. The type is absent only for the `x.(type)` form, which the
/// parser folds into `TypeSwitchStmt` and which therefore never survives
/// into a finished tree.
#[derive(Clone, Debug, PartialEq)]
pub struct TypeAssertExpr {
    pub x: Box<Expr>,
    pub ty: Option<Box<Expr>>,
    pub span: Span,
}

/// `[N]T` or, with `len` absent, the slice type `[]T`.
#[derive(Clone, Debug, PartialEq)]
pub struct ArrayType {
    pub len: Option<Box<Expr>>,
    pub elt: Box<Expr>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MapType {
    pub key: Box<Expr>,
    pub value: Box<Expr>,
    pub span: Span,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChanDir {
    Both,
    SendOnly,
    RecvOnly,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChanType {
    pub dir: ChanDir,
    pub value: Box<Expr>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StructType {
    pub fields: Vec<Field>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct InterfaceType {
    pub methods: Vec<Field>,
    pub span: Span,
}

// ---------------------------------------------------------------------------
// Spans
// ---------------------------------------------------------------------------

macro_rules! spanned {
    ($($ty:ty),* $(,)?) => {
        $(impl Spanned for $ty {
            fn span(&self) -> Span {
                self.span
            }
        })*
    };
}

spanned!(
    Ident,
    BasicLit,
    File,
    GenDecl,
    ImportSpec,
    TypeSpec,
    ValueSpec,
    FuncDecl,
    FuncType,
    Field,
    Block,
    AssignStmt,
    BranchStmt,
    DeferStmt,
    GoStmt,
    ExprStmt,
    ForStmt,
    IfStmt,
    IncDecStmt,
    LabeledStmt,
    RangeStmt,
    ReturnStmt,
    SelectStmt,
    CommClause,
    SendStmt,
    SwitchStmt,
    CaseClause,
    TypeSwitchStmt,
    BinaryExpr,
    UnaryExpr,
    CallExpr,
    ParenExpr,
    SelectorExpr,
    IndexExpr,
    SliceExpr,
    StarExpr,
    CompositeLit,
    KeyValueExpr,
    FuncLit,
    EllipsisExpr,
    TypeAssertExpr,
    ArrayType,
    MapType,
    ChanType,
    StructType,
    InterfaceType,
);

impl Spanned for Decl {
    fn span(&self) -> Span {
        match self {
            Decl::Gen(decl) => decl.span,
            Decl::Func(decl) => decl.span,
        }
    }
}

impl Spanned for Spec {
    fn span(&self) -> Span {
        match self {
            Spec::Import(spec) => spec.span,
            Spec::Type(spec) => spec.span,
            Spec::Value(spec) => spec.span,
        }
    }
}

impl Spanned for Stmt {
    fn span(&self) -> Span {
        match self {
            Stmt::Assign(s) => s.span,
            Stmt::Block(s) => s.span,
            Stmt::Branch(s) => s.span,
            Stmt::Decl(s) => s.span,
            Stmt::Defer(s) => s.span,
            Stmt::Empty(span) => *span,
            Stmt::Expr(s) => s.span,
            Stmt::For(s) => s.span,
            Stmt::Go(s) => s.span,
            Stmt::If(s) => s.span,
            Stmt::IncDec(s) => s.span,
            Stmt::Labeled(s) => s.span,
            Stmt::Range(s) => s.span,
            Stmt::Return(s) => s.span,
            Stmt::Select(s) => s.span,
            Stmt::Send(s) => s.span,
            Stmt::Switch(s) => s.span,
            Stmt::TypeSwitch(s) => s.span,
        }
    }
}

impl Spanned for Expr {
    fn span(&self) -> Span {
        match self {
            Expr::ArrayType(e) => e.span,
            Expr::Binary(e) => e.span,
            Expr::Call(e) => e.span,
            Expr::ChanType(e) => e.span,
            Expr::Composite(e) => e.span,
            Expr::Ellipsis(e) => e.span,
            Expr::FuncLit(e) => e.span,
            Expr::FuncType(e) => e.span,
            Expr::Ident(e) => e.span,
            Expr::Index(e) => e.span,
            Expr::InterfaceType(e) => e.span,
            Expr::KeyValue(e) => e.span,
            Expr::Lit(e) => e.span,
            Expr::MapType(e) => e.span,
            Expr::Paren(e) => e.span,
            Expr::Selector(e) => e.span,
            Expr::Slice(e) => e.span,
            Expr::Star(e) => e.span,
            Expr::StructType(e) => e.span,
            Expr::TypeAssert(e) => e.span,
            Expr::Unary(e) => e.span,
        }
    }
}
