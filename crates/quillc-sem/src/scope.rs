//! The lexical scope tree.
//!
//! Scopes live in an arena ([`IndexVec`]) and are addressed by [`ScopeId`]
//! handles. That makes the cyclic shape of object types cheap to represent:
//! an `Object` type holds the id of its member scope, and a method body's
//! `this` binding holds the same id, with no reference cycles to manage.
//!
//! Bindings are ordered (insertion order) and map a name to its type.

use indexmap::IndexMap;

use quillc_util::{Idx, IndexVec, Symbol};

use crate::types::Type;

/// Handle to a scope in a [`ScopeTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(u32);

impl Idx for ScopeId {
    fn from_usize(idx: usize) -> Self {
        ScopeId(idx as u32)
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

/// A single scope: ordered bindings plus an optional parent.
#[derive(Debug)]
pub struct Scope {
    /// Bindings in this scope, in definition order.
    bindings: IndexMap<Symbol, Type>,

    /// Enclosing scope, if any. Object scopes have none.
    parent: Option<ScopeId>,
}

/// Arena of scopes forming the lexical tree.
///
/// A fresh tree holds one root scope; the caller may pre-bind built-ins in
/// it before analysis (e.g. a `log` function).
#[derive(Debug)]
pub struct ScopeTree {
    scopes: IndexVec<ScopeId, Scope>,
    root: ScopeId,
}

impl ScopeTree {
    /// Creates a tree containing only the root scope.
    pub fn new() -> Self {
        let mut scopes = IndexVec::new();
        let root = scopes.push(Scope {
            bindings: IndexMap::new(),
            parent: None,
        });
        Self { scopes, root }
    }

    /// The root scope.
    pub fn root(&self) -> ScopeId {
        self.root
    }

    /// Creates a child of `parent` and returns its id.
    pub fn child(&mut self, parent: ScopeId) -> ScopeId {
        self.scopes.push(Scope {
            bindings: IndexMap::new(),
            parent: Some(parent),
        })
    }

    /// Creates a parentless scope (the shape object types use).
    pub fn orphan(&mut self) -> ScopeId {
        self.scopes.push(Scope {
            bindings: IndexMap::new(),
            parent: None,
        })
    }

    /// The parent of `scope`, if any.
    pub fn parent(&self, scope: ScopeId) -> Option<ScopeId> {
        self.scopes[scope].parent
    }

    /// Binds `name` in `scope`. Returns false (and leaves the scope
    /// untouched) if `name` is already bound in that scope itself.
    pub fn define(&mut self, scope: ScopeId, name: Symbol, ty: Type) -> bool {
        let bindings = &mut self.scopes[scope].bindings;
        if bindings.contains_key(&name) {
            return false;
        }
        bindings.insert(name, ty);
        true
    }

    /// Looks up `name`, searching only `scope` itself when `current_only`,
    /// otherwise walking the parent chain to the root.
    pub fn get(&self, scope: ScopeId, name: Symbol, current_only: bool) -> Option<&Type> {
        let mut current = scope;
        loop {
            let node = &self.scopes[current];
            if let Some(ty) = node.bindings.get(&name) {
                return Some(ty);
            }
            if current_only {
                return None;
            }
            current = node.parent?;
        }
    }

    /// Rebinds `name` in the nearest enclosing scope that defines it.
    /// Returns false if no scope in the chain binds the name.
    pub fn set(&mut self, scope: ScopeId, name: Symbol, ty: Type) -> bool {
        let mut current = scope;
        loop {
            if self.scopes[current].bindings.contains_key(&name) {
                self.scopes[current].bindings.insert(name, ty);
                return true;
            }
            match self.scopes[current].parent {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// Iterates the bindings of `scope` in definition order.
    pub fn bindings(&self, scope: ScopeId) -> impl Iterator<Item = (Symbol, &Type)> {
        self.scopes[scope].bindings.iter().map(|(name, ty)| (*name, ty))
    }
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}
