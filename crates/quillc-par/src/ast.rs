//! quillc-par - AST Node Definitions
//!
//! The untyped tree produced by the parser. All nodes are immutable after
//! construction and carry interned [`Symbol`] names; literal values are
//! already converted (escapes resolved, numbers parsed to arbitrary
//! precision).

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use quillc_util::Symbol;

/// AST root - an ordered sequence of statements.
#[derive(Clone, Debug, PartialEq)]
pub struct Source {
    pub statements: Vec<Stmt>,
}

/// Statement.
#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    Let(LetStmt),
    Def(DefStmt),
    If(IfStmt),
    For(ForStmt),
    Return(ReturnStmt),
    Expression(Expr),
    Assignment(AssignStmt),
}

/// `LET name (: Type)? (= expr)? ;`
#[derive(Clone, Debug, PartialEq)]
pub struct LetStmt {
    pub name: Symbol,
    pub type_name: Option<Symbol>,
    pub value: Option<Expr>,
}

/// `DEF name(params) (: Type)? DO body END`
#[derive(Clone, Debug, PartialEq)]
pub struct DefStmt {
    pub name: Symbol,
    pub params: Vec<Param>,
    pub return_type: Option<Symbol>,
    pub body: Vec<Stmt>,
}

/// A function parameter with an optional type annotation.
#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    pub name: Symbol,
    pub type_name: Option<Symbol>,
}

/// `IF cond DO then (ELSE else)? END`
#[derive(Clone, Debug, PartialEq)]
pub struct IfStmt {
    pub condition: Expr,
    pub then_body: Vec<Stmt>,
    pub else_body: Vec<Stmt>,
}

/// `FOR name IN iterable DO body END`
#[derive(Clone, Debug, PartialEq)]
pub struct ForStmt {
    pub name: Symbol,
    pub iterable: Expr,
    pub body: Vec<Stmt>,
}

/// `RETURN expr? ;`
#[derive(Clone, Debug, PartialEq)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
}

/// `target = value ;` where `target` must later prove to be a variable or
/// property - the parser accepts any expression and the analyzer rejects
/// other shapes.
#[derive(Clone, Debug, PartialEq)]
pub struct AssignStmt {
    pub target: Expr,
    pub value: Expr,
}

/// Expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Literal value.
    Literal(Literal),

    /// Parenthesized expression.
    Group(Box<Expr>),

    /// Binary operation; `op` is the operator literal (`+`, `<=`, `AND`, ...).
    Binary {
        op: Symbol,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Variable reference.
    Variable(Symbol),

    /// Property access: `receiver.name`.
    Property { receiver: Box<Expr>, name: Symbol },

    /// Function call: `name(args)`.
    Function { name: Symbol, args: Vec<Expr> },

    /// Method call: `receiver.name(args)`.
    Method {
        receiver: Box<Expr>,
        name: Symbol,
        args: Vec<Expr>,
    },

    /// Object literal: `OBJECT name? DO fields methods END`.
    Object(ObjectExpr),
}

/// Object literal body: fields (each a `LET`) followed by methods (each a
/// `DEF`).
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectExpr {
    pub name: Option<Symbol>,
    pub fields: Vec<LetStmt>,
    pub methods: Vec<DefStmt>,
}

/// Converted literal value.
#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Nil,
    Bool(bool),
    Integer(BigInt),
    Decimal(BigDecimal),
    Character(char),
    String(String),
}
