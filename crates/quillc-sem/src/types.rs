//! The Quill type lattice.
//!
//! Types are a closed sum: nine atomic types plus the structural `Object`
//! and `Function` shapes. The subtype relation is the least relation
//! containing reflexivity, `s <: Any`, and the two enumerated rows below -
//! deliberately *without* further transitive closure, so the checks match
//! the enumeration exactly:
//!
//! ```text
//! {Nil, Comparable, Iterable, Boolean, Integer, Decimal, String} <: Equatable
//! {Boolean, Integer, Decimal, String}                            <: Comparable
//! ```
//!
//! `Object` and `Function` are invariant: equal only when structurally
//! identical (`Object` equality is scope identity via [`ScopeId`]).

use std::fmt;
use std::sync::LazyLock;

use quillc_util::FxHashMap;

use crate::scope::ScopeId;

/// A Quill type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Type {
    /// Top type; every type is a subtype of `Any`.
    Any,
    /// The type of `NIL`.
    Nil,
    /// Abstract supertype of everything the ordering operators accept.
    Comparable,
    /// Abstract supertype of everything the equality operators accept.
    Equatable,
    /// Abstract supertype of `FOR` iterables.
    Iterable,
    Boolean,
    Integer,
    Decimal,
    String,
    /// An object's type is the scope holding its fields and methods.
    Object(ScopeId),
    /// A function's type is its parameter types and return type.
    Function { params: Vec<Type>, ret: Box<Type> },
}

impl Type {
    /// The subtype relation, checked case by case as enumerated.
    pub fn is_subtype_of(&self, other: &Type) -> bool {
        if self == other || matches!(other, Type::Any) {
            return true;
        }
        match other {
            Type::Equatable => matches!(
                self,
                Type::Nil
                    | Type::Comparable
                    | Type::Iterable
                    | Type::Boolean
                    | Type::Integer
                    | Type::Decimal
                    | Type::String
            ),
            Type::Comparable => matches!(
                self,
                Type::Boolean | Type::Integer | Type::Decimal | Type::String
            ),
            _ => false,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Any => f.write_str("Any"),
            Type::Nil => f.write_str("Nil"),
            Type::Comparable => f.write_str("Comparable"),
            Type::Equatable => f.write_str("Equatable"),
            Type::Iterable => f.write_str("Iterable"),
            Type::Boolean => f.write_str("Boolean"),
            Type::Integer => f.write_str("Integer"),
            Type::Decimal => f.write_str("Decimal"),
            Type::String => f.write_str("String"),
            Type::Object(_) => f.write_str("Object"),
            Type::Function { params, ret } => {
                f.write_str("Function([")?;
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{param}")?;
                }
                write!(f, "], {ret})")
            }
        }
    }
}

/// The process-wide table of atomic type names, initialized once and then
/// read-only. This is the only table consulted when resolving declared type
/// annotations.
static ATOMICS: LazyLock<FxHashMap<&'static str, Type>> = LazyLock::new(|| {
    let mut table = FxHashMap::default();
    table.insert("Any", Type::Any);
    table.insert("Nil", Type::Nil);
    table.insert("Comparable", Type::Comparable);
    table.insert("Equatable", Type::Equatable);
    table.insert("Iterable", Type::Iterable);
    table.insert("Boolean", Type::Boolean);
    table.insert("Integer", Type::Integer);
    table.insert("Decimal", Type::Decimal);
    table.insert("String", Type::String);
    table
});

/// Looks up an atomic type by its source-level name.
pub fn atomic(name: &str) -> Option<Type> {
    ATOMICS.get(name).cloned()
}
