//! The typed intermediate representation.
//!
//! The IR mirrors the AST with two differences: every expression node
//! carries its [`Type`], and assignment splits into a variable-target and a
//! property-target statement, each holding the pre-resolved target. Names
//! are symbolic copies from the AST; no IR node points back into it.

pub use quillc_par::ast::Literal;

use quillc_util::Symbol;

use crate::scope::ScopeId;
use crate::types::Type;

/// IR root - an ordered sequence of statements.
#[derive(Clone, Debug, PartialEq)]
pub struct Source {
    pub statements: Vec<Stmt>,
}

/// Typed statement.
#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    Let(Let),
    Def(Def),
    If(If),
    For(For),
    Return(Return),
    Expression(Expr),
    AssignVariable(AssignVariable),
    AssignProperty(AssignProperty),
}

/// A declaration with its effective type.
#[derive(Clone, Debug, PartialEq)]
pub struct Let {
    pub name: Symbol,
    pub ty: Type,
    pub value: Option<Expr>,
}

/// A function definition with resolved parameter and return types.
#[derive(Clone, Debug, PartialEq)]
pub struct Def {
    pub name: Symbol,
    pub params: Vec<(Symbol, Type)>,
    pub ret: Type,
    pub body: Vec<Stmt>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct If {
    pub condition: Expr,
    pub then_body: Vec<Stmt>,
    pub else_body: Vec<Stmt>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct For {
    pub name: Symbol,
    pub iterable: Expr,
    pub body: Vec<Stmt>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Return {
    pub value: Option<Expr>,
}

/// Assignment to a resolved variable.
#[derive(Clone, Debug, PartialEq)]
pub struct AssignVariable {
    pub target: VariableTarget,
    pub value: Expr,
}

/// Assignment to a resolved property of an object-typed receiver.
#[derive(Clone, Debug, PartialEq)]
pub struct AssignProperty {
    pub target: PropertyTarget,
    pub value: Expr,
}

/// A variable with its declared type.
#[derive(Clone, Debug, PartialEq)]
pub struct VariableTarget {
    pub name: Symbol,
    pub ty: Type,
}

/// A property with its receiver and declared type.
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyTarget {
    pub receiver: Expr,
    pub name: Symbol,
    pub ty: Type,
}

/// Typed expression: a shape plus the type the analyzer assigned it.
#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub ty: Type,
    pub kind: ExprKind,
}

impl Expr {
    pub fn new(ty: Type, kind: ExprKind) -> Self {
        Self { ty, kind }
    }
}

/// Expression shapes, mirroring the AST.
#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    Literal(Literal),
    Group(Box<Expr>),
    Binary {
        op: Symbol,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Variable {
        name: Symbol,
    },
    Property {
        receiver: Box<Expr>,
        name: Symbol,
    },
    Function {
        name: Symbol,
        args: Vec<Expr>,
    },
    Method {
        receiver: Box<Expr>,
        name: Symbol,
        args: Vec<Expr>,
    },
    Object(Object),
}

/// A lowered object literal; `scope` is the member scope the object's type
/// refers to.
#[derive(Clone, Debug, PartialEq)]
pub struct Object {
    pub name: Option<Symbol>,
    pub fields: Vec<Let>,
    pub methods: Vec<Def>,
    pub scope: ScopeId,
}
