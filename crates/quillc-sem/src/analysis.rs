//! The semantic analyzer: AST in, typed IR out.
//!
//! The analyzer walks statements in textual order and subexpressions left
//! to right, holding a current [`ScopeId`] into the shared [`ScopeTree`].
//! Nested lexical regions (function bodies, `IF` branches, `FOR` bodies,
//! object method bodies) are analyzed under a child scope via
//! [`Analyzer::in_scope`], which restores the previous scope on the way
//! out.
//!
//! The expected return type of the enclosing function travels through the
//! scope chain as the reserved `$RETURNS` binding; `RETURN` looks it up and
//! fails outside any function. For `AND`/`OR` the left operand's Boolean
//! check runs before the right operand is analyzed at all, which is what
//! makes the check order observable for short-circuit operators.

use log::trace;

use quillc_par::ast;
use quillc_util::{kw, FxHashSet, Symbol};

use crate::error::AnalyzeError;
use crate::ir;
use crate::scope::{ScopeId, ScopeTree};
use crate::types::{self, Type};

/// Analyzes a parsed source under the tree's root scope.
///
/// The caller may pre-bind built-ins in the root scope (e.g. `log:
/// Function([Any], Any)`); the analyzer reads such bindings but never
/// replaces them.
///
/// # Panics
///
/// Panics if a character literal reaches the analyzer: the type lattice
/// has no `Character` type, so such an AST is a programmer error.
pub fn analyze(source: &ast::Source, scopes: &mut ScopeTree) -> Result<ir::Source, AnalyzeError> {
    let root = scopes.root();
    let mut analyzer = Analyzer { scopes, scope: root };
    analyzer.source(source)
}

/// Walker state: the arena plus the current scope.
struct Analyzer<'a> {
    scopes: &'a mut ScopeTree,
    scope: ScopeId,
}

impl<'a> Analyzer<'a> {
    fn source(&mut self, source: &ast::Source) -> Result<ir::Source, AnalyzeError> {
        let statements = self.statements(&source.statements)?;
        Ok(ir::Source { statements })
    }

    fn statements(&mut self, statements: &[ast::Stmt]) -> Result<Vec<ir::Stmt>, AnalyzeError> {
        statements.iter().map(|stmt| self.statement(stmt)).collect()
    }

    /// Runs `f` with `scope` as the current scope, restoring afterwards.
    fn in_scope<T>(&mut self, scope: ScopeId, f: impl FnOnce(&mut Self) -> T) -> T {
        let saved = std::mem::replace(&mut self.scope, scope);
        let result = f(self);
        self.scope = saved;
        result
    }

    fn statement(&mut self, statement: &ast::Stmt) -> Result<ir::Stmt, AnalyzeError> {
        match statement {
            ast::Stmt::Let(stmt) => self.let_statement(stmt).map(ir::Stmt::Let),
            ast::Stmt::Def(stmt) => self.def_statement(stmt).map(ir::Stmt::Def),
            ast::Stmt::If(stmt) => self.if_statement(stmt),
            ast::Stmt::For(stmt) => self.for_statement(stmt),
            ast::Stmt::Return(stmt) => self.return_statement(stmt),
            ast::Stmt::Expression(expr) => self.expression(expr).map(ir::Stmt::Expression),
            ast::Stmt::Assignment(stmt) => self.assignment(stmt),
        }
    }

    /// `LET`: effective type is declared, else inferred from the
    /// initializer, else `Any`; the initializer must fit it.
    fn let_statement(&mut self, stmt: &ast::LetStmt) -> Result<ir::Let, AnalyzeError> {
        if self.scopes.get(self.scope, stmt.name, true).is_some() {
            return Err(AnalyzeError::AlreadyDeclared {
                name: stmt.name.to_string(),
            });
        }

        let declared = stmt.type_name.map(|name| self.resolve_type(name)).transpose()?;
        let value = stmt
            .value
            .as_ref()
            .map(|expr| self.expression(expr))
            .transpose()?;

        let ty = declared
            .or_else(|| value.as_ref().map(|v| v.ty.clone()))
            .unwrap_or(Type::Any);
        if let Some(value) = &value {
            self.require_subtype(&value.ty, &ty)?;
        }

        self.define(stmt.name, ty.clone())?;
        Ok(ir::Let {
            name: stmt.name,
            ty,
            value,
        })
    }

    /// `DEF`: the function's name is bound before the body is analyzed, so
    /// recursion resolves. The body runs in a child scope holding the
    /// parameters and `$RETURNS`.
    fn def_statement(&mut self, stmt: &ast::DefStmt) -> Result<ir::Def, AnalyzeError> {
        trace!("analyzing function '{}'", stmt.name);
        if self.scopes.get(self.scope, stmt.name, true).is_some() {
            return Err(AnalyzeError::AlreadyDeclared {
                name: stmt.name.to_string(),
            });
        }

        let (params, ret) = self.signature(stmt)?;
        self.define(
            stmt.name,
            Type::Function {
                params: params.iter().map(|(_, ty)| ty.clone()).collect(),
                ret: Box::new(ret.clone()),
            },
        )?;

        let body_scope = self.scopes.child(self.scope);
        let body = self.in_scope(body_scope, |this| {
            for (name, ty) in &params {
                this.define(*name, ty.clone())?;
            }
            this.define(kw::RETURNS, ret.clone())?;
            this.statements(&stmt.body)
        })?;

        Ok(ir::Def {
            name: stmt.name,
            params,
            ret,
            body,
        })
    }

    /// Resolves a `DEF`'s parameter and return types. Absent annotations
    /// fall back to `Any`; present ones must name an atomic type.
    fn signature(
        &mut self,
        stmt: &ast::DefStmt,
    ) -> Result<(Vec<(Symbol, Type)>, Type), AnalyzeError> {
        let mut seen = FxHashSet::default();
        let mut params = Vec::with_capacity(stmt.params.len());
        for param in &stmt.params {
            if !seen.insert(param.name) {
                return Err(AnalyzeError::DuplicateParameter {
                    name: param.name.to_string(),
                });
            }
            let ty = param
                .type_name
                .map(|name| self.resolve_type(name))
                .transpose()?
                .unwrap_or(Type::Any);
            params.push((param.name, ty));
        }
        let ret = stmt
            .return_type
            .map(|name| self.resolve_type(name))
            .transpose()?
            .unwrap_or(Type::Any);
        Ok((params, ret))
    }

    /// `IF`: Boolean condition; both branches analyzed, each in a fresh
    /// child scope, regardless of what the condition would evaluate to.
    fn if_statement(&mut self, stmt: &ast::IfStmt) -> Result<ir::Stmt, AnalyzeError> {
        let condition = self.expression(&stmt.condition)?;
        self.require_subtype(&condition.ty, &Type::Boolean)?;

        let then_scope = self.scopes.child(self.scope);
        let then_body = self.in_scope(then_scope, |this| this.statements(&stmt.then_body))?;
        let else_scope = self.scopes.child(self.scope);
        let else_body = self.in_scope(else_scope, |this| this.statements(&stmt.else_body))?;

        Ok(ir::Stmt::If(ir::If {
            condition,
            then_body,
            else_body,
        }))
    }

    /// `FOR`: the iterable must be `Iterable`; the loop variable is fixed
    /// to `Integer` (the language trusts the iterable's element type).
    fn for_statement(&mut self, stmt: &ast::ForStmt) -> Result<ir::Stmt, AnalyzeError> {
        let iterable = self.expression(&stmt.iterable)?;
        self.require_subtype(&iterable.ty, &Type::Iterable)?;

        let body_scope = self.scopes.child(self.scope);
        let body = self.in_scope(body_scope, |this| {
            this.define(stmt.name, Type::Integer)?;
            this.statements(&stmt.body)
        })?;

        Ok(ir::Stmt::For(ir::For {
            name: stmt.name,
            iterable,
            body,
        }))
    }

    /// `RETURN`: `$RETURNS` must be reachable through the chain; a missing
    /// value stands in for `NIL`.
    fn return_statement(&mut self, stmt: &ast::ReturnStmt) -> Result<ir::Stmt, AnalyzeError> {
        let expected = self
            .scopes
            .get(self.scope, kw::RETURNS, false)
            .cloned()
            .ok_or(AnalyzeError::ReturnOutsideFunction)?;

        let value = stmt
            .value
            .as_ref()
            .map(|expr| self.expression(expr))
            .transpose()?;
        match &value {
            Some(value) => self.require_subtype(&value.ty, &expected)?,
            None => self.require_subtype(&Type::Nil, &expected)?,
        }

        Ok(ir::Stmt::Return(ir::Return { value }))
    }

    /// Assignment targets must be variables or properties; anything else
    /// the parser accepted is rejected here.
    fn assignment(&mut self, stmt: &ast::AssignStmt) -> Result<ir::Stmt, AnalyzeError> {
        match &stmt.target {
            ast::Expr::Variable(name) => {
                let ty = self
                    .scopes
                    .get(self.scope, *name, false)
                    .cloned()
                    .ok_or_else(|| AnalyzeError::Undefined {
                        name: name.to_string(),
                    })?;
                let value = self.expression(&stmt.value)?;
                self.require_subtype(&value.ty, &ty)?;
                Ok(ir::Stmt::AssignVariable(ir::AssignVariable {
                    target: ir::VariableTarget { name: *name, ty },
                    value,
                }))
            }
            ast::Expr::Property { receiver, name } => {
                let receiver = self.expression(receiver)?;
                let ty = self.member_type(&receiver.ty, *name)?;
                let value = self.expression(&stmt.value)?;
                self.require_subtype(&value.ty, &ty)?;
                Ok(ir::Stmt::AssignProperty(ir::AssignProperty {
                    target: ir::PropertyTarget {
                        receiver,
                        name: *name,
                        ty,
                    },
                    value,
                }))
            }
            _ => Err(AnalyzeError::InvalidAssignmentTarget),
        }
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn expression(&mut self, expr: &ast::Expr) -> Result<ir::Expr, AnalyzeError> {
        match expr {
            ast::Expr::Literal(literal) => Ok(self.literal(literal)),

            ast::Expr::Group(inner) => {
                let inner = self.expression(inner)?;
                let ty = inner.ty.clone();
                Ok(ir::Expr::new(ty, ir::ExprKind::Group(Box::new(inner))))
            }

            ast::Expr::Binary { op, left, right } => self.binary(*op, left, right),

            ast::Expr::Variable(name) => {
                let ty = self
                    .scopes
                    .get(self.scope, *name, false)
                    .cloned()
                    .ok_or_else(|| AnalyzeError::Undefined {
                        name: name.to_string(),
                    })?;
                Ok(ir::Expr::new(ty, ir::ExprKind::Variable { name: *name }))
            }

            ast::Expr::Property { receiver, name } => {
                let receiver = self.expression(receiver)?;
                let ty = self.member_type(&receiver.ty, *name)?;
                Ok(ir::Expr::new(
                    ty,
                    ir::ExprKind::Property {
                        receiver: Box::new(receiver),
                        name: *name,
                    },
                ))
            }

            ast::Expr::Function { name, args } => {
                let ty = self
                    .scopes
                    .get(self.scope, *name, false)
                    .cloned()
                    .ok_or_else(|| AnalyzeError::Undefined {
                        name: name.to_string(),
                    })?;
                let Type::Function { params, ret } = ty else {
                    return Err(AnalyzeError::NotFunction {
                        name: name.to_string(),
                    });
                };
                let args = self.arguments(*name, args, &params)?;
                Ok(ir::Expr::new(
                    *ret,
                    ir::ExprKind::Function { name: *name, args },
                ))
            }

            ast::Expr::Method {
                receiver,
                name,
                args,
            } => {
                let receiver = self.expression(receiver)?;
                let member = self.member_type(&receiver.ty, *name)?;
                let Type::Function { params, ret } = member else {
                    return Err(AnalyzeError::NotFunction {
                        name: name.to_string(),
                    });
                };
                let args = self.arguments(*name, args, &params)?;
                Ok(ir::Expr::new(
                    *ret,
                    ir::ExprKind::Method {
                        receiver: Box::new(receiver),
                        name: *name,
                        args,
                    },
                ))
            }

            ast::Expr::Object(object) => self.object_expression(object),
        }
    }

    fn literal(&self, literal: &ast::Literal) -> ir::Expr {
        let ty = match literal {
            ast::Literal::Nil => Type::Nil,
            ast::Literal::Bool(_) => Type::Boolean,
            ast::Literal::Integer(_) => Type::Integer,
            ast::Literal::Decimal(_) => Type::Decimal,
            ast::Literal::String(_) => Type::String,
            ast::Literal::Character(_) => {
                // No Character type exists in the lattice; a character
                // literal in analyzable position is a programmer error.
                panic!("character literal reached the analyzer")
            }
        };
        ir::Expr::new(ty, ir::ExprKind::Literal(literal.clone()))
    }

    fn binary(
        &mut self,
        op: Symbol,
        left: &ast::Expr,
        right: &ast::Expr,
    ) -> Result<ir::Expr, AnalyzeError> {
        match op.as_str() {
            // The left operand must prove Boolean before the right operand
            // is analyzed at all.
            "AND" | "OR" => {
                let left = self.expression(left)?;
                self.require_subtype(&left.ty, &Type::Boolean)?;
                let right = self.expression(right)?;
                self.require_subtype(&right.ty, &Type::Boolean)?;
                Ok(self.binary_expr(op, left, right, Type::Boolean))
            }

            "+" => {
                let left = self.expression(left)?;
                let right = self.expression(right)?;
                let ty = if left.ty == Type::String || right.ty == Type::String {
                    Type::String
                } else {
                    self.numeric_operands(op, &left.ty, &right.ty)?
                };
                Ok(self.binary_expr(op, left, right, ty))
            }

            "-" | "*" | "/" => {
                let left = self.expression(left)?;
                let right = self.expression(right)?;
                let ty = self.numeric_operands(op, &left.ty, &right.ty)?;
                Ok(self.binary_expr(op, left, right, ty))
            }

            "<" | "<=" | ">" | ">=" => {
                let left = self.expression(left)?;
                self.require_subtype(&left.ty, &Type::Comparable)?;
                let right = self.expression(right)?;
                self.require_subtype(&right.ty, &left.ty)?;
                Ok(self.binary_expr(op, left, right, Type::Boolean))
            }

            "==" | "!=" => {
                let left = self.expression(left)?;
                self.require_subtype(&left.ty, &Type::Equatable)?;
                let right = self.expression(right)?;
                self.require_subtype(&right.ty, &Type::Equatable)?;
                Ok(self.binary_expr(op, left, right, Type::Boolean))
            }

            other => panic!("parser produced unknown binary operator '{other}'"),
        }
    }

    /// Both operands `Integer`, or both `Decimal`; no mixing.
    fn numeric_operands(
        &self,
        op: Symbol,
        left: &Type,
        right: &Type,
    ) -> Result<Type, AnalyzeError> {
        match (left, right) {
            (Type::Integer, Type::Integer) => Ok(Type::Integer),
            (Type::Decimal, Type::Decimal) => Ok(Type::Decimal),
            _ => Err(AnalyzeError::InvalidOperands {
                op: op.to_string(),
                left: left.to_string(),
                right: right.to_string(),
            }),
        }
    }

    fn binary_expr(&self, op: Symbol, left: ir::Expr, right: ir::Expr, ty: Type) -> ir::Expr {
        ir::Expr::new(
            ty,
            ir::ExprKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
        )
    }

    /// Object literal: members live in a fresh parentless scope. Field
    /// initializers evaluate in the enclosing scope; all signatures are
    /// bound before any method body is analyzed, so sibling methods can
    /// call each other through the shared scope handle.
    fn object_expression(&mut self, object: &ast::ObjectExpr) -> Result<ir::Expr, AnalyzeError> {
        trace!("analyzing object literal '{:?}'", object.name);
        if let Some(name) = object.name {
            if types::atomic(name.as_str()).is_some() {
                return Err(AnalyzeError::ObjectNameShadowsType {
                    name: name.to_string(),
                });
            }
        }

        let object_scope = self.scopes.orphan();

        let mut fields = Vec::with_capacity(object.fields.len());
        for field in &object.fields {
            if self.scopes.get(object_scope, field.name, true).is_some() {
                return Err(AnalyzeError::AlreadyDeclared {
                    name: field.name.to_string(),
                });
            }
            let declared = field.type_name.map(|name| self.resolve_type(name)).transpose()?;
            let value = field
                .value
                .as_ref()
                .map(|expr| self.expression(expr))
                .transpose()?;
            let ty = declared
                .or_else(|| value.as_ref().map(|v| v.ty.clone()))
                .unwrap_or(Type::Any);
            if let Some(value) = &value {
                self.require_subtype(&value.ty, &ty)?;
            }
            let defined = self.scopes.define(object_scope, field.name, ty.clone());
            debug_assert!(defined);
            fields.push(ir::Let {
                name: field.name,
                ty,
                value,
            });
        }

        let mut signatures = Vec::with_capacity(object.methods.len());
        for method in &object.methods {
            if self.scopes.get(object_scope, method.name, true).is_some() {
                return Err(AnalyzeError::AlreadyDeclared {
                    name: method.name.to_string(),
                });
            }
            let (params, ret) = self.signature(method)?;
            let defined = self.scopes.define(
                object_scope,
                method.name,
                Type::Function {
                    params: params.iter().map(|(_, ty)| ty.clone()).collect(),
                    ret: Box::new(ret.clone()),
                },
            );
            debug_assert!(defined);
            signatures.push((params, ret));
        }

        let mut methods = Vec::with_capacity(object.methods.len());
        for (method, (params, ret)) in object.methods.iter().zip(signatures) {
            let body_scope = self.scopes.child(object_scope);
            let body = self.in_scope(body_scope, |this| {
                this.define(kw::THIS, Type::Object(object_scope))?;
                for (name, ty) in &params {
                    this.define(*name, ty.clone())?;
                }
                this.define(kw::RETURNS, ret.clone())?;
                this.statements(&method.body)
            })?;
            methods.push(ir::Def {
                name: method.name,
                params,
                ret,
                body,
            });
        }

        Ok(ir::Expr::new(
            Type::Object(object_scope),
            ir::ExprKind::Object(ir::Object {
                name: object.name,
                fields,
                methods,
                scope: object_scope,
            }),
        ))
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    /// Analyzes call arguments against parameter types: count first, then
    /// each argument left to right.
    fn arguments(
        &mut self,
        name: Symbol,
        args: &[ast::Expr],
        params: &[Type],
    ) -> Result<Vec<ir::Expr>, AnalyzeError> {
        if args.len() != params.len() {
            return Err(AnalyzeError::Arity {
                name: name.to_string(),
                expected: params.len(),
                found: args.len(),
            });
        }
        let mut out = Vec::with_capacity(args.len());
        for (arg, param) in args.iter().zip(params) {
            let arg = self.expression(arg)?;
            self.require_subtype(&arg.ty, param)?;
            out.push(arg);
        }
        Ok(out)
    }

    /// Looks up a member in an object receiver's scope. Rejects every
    /// non-object receiver, `Nil` included.
    fn member_type(&self, receiver: &Type, name: Symbol) -> Result<Type, AnalyzeError> {
        let Type::Object(scope) = receiver else {
            return Err(AnalyzeError::NotObject {
                found: receiver.to_string(),
            });
        };
        self.scopes
            .get(*scope, name, true)
            .cloned()
            .ok_or_else(|| AnalyzeError::UndefinedMember {
                name: name.to_string(),
            })
    }

    /// Resolves a declared type annotation against the atomic-type table.
    fn resolve_type(&self, name: Symbol) -> Result<Type, AnalyzeError> {
        types::atomic(name.as_str()).ok_or_else(|| AnalyzeError::UnknownType {
            name: name.to_string(),
        })
    }

    fn define(&mut self, name: Symbol, ty: Type) -> Result<(), AnalyzeError> {
        if self.scopes.define(self.scope, name, ty) {
            Ok(())
        } else {
            Err(AnalyzeError::AlreadyDeclared {
                name: name.to_string(),
            })
        }
    }

    fn require_subtype(&self, found: &Type, expected: &Type) -> Result<(), AnalyzeError> {
        if found.is_subtype_of(expected) {
            Ok(())
        } else {
            Err(AnalyzeError::NotSubtype {
                found: found.to_string(),
                expected: expected.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quillc_lex::lex;
    use quillc_par::parse;

    /// Analyzes under a root scope pre-bound with a `log` built-in of type
    /// `Function([Any], Any)` and a `list: Iterable`.
    fn analyze_source(source: &str) -> Result<ir::Source, AnalyzeError> {
        let ast = parse(&lex(source).unwrap()).unwrap();
        let mut scopes = ScopeTree::new();
        let root = scopes.root();
        scopes.define(
            root,
            Symbol::intern("log"),
            Type::Function {
                params: vec![Type::Any],
                ret: Box::new(Type::Any),
            },
        );
        scopes.define(root, Symbol::intern("list"), Type::Iterable);
        analyze(&ast, &mut scopes)
    }

    /// The first expression statement's expression, or failing that the
    /// first `LET`'s initializer.
    fn first_expr(source: &str) -> ir::Expr {
        let ir = analyze_source(source).unwrap();
        let mut fallback = None;
        for stmt in ir.statements {
            match stmt {
                ir::Stmt::Expression(expr) => return expr,
                ir::Stmt::Let(let_stmt) if fallback.is_none() => {
                    fallback = let_stmt.value;
                }
                _ => {}
            }
        }
        fallback.expect("no expression-bearing statement in test source")
    }

    // =========================================================================
    // LET
    // =========================================================================

    #[test]
    fn test_let_infers_from_initializer() {
        let expr = first_expr("LET x = 1 + 2;");
        assert_eq!(expr.ty, Type::Integer);
        assert!(matches!(expr.kind, ir::ExprKind::Binary { .. }));
    }

    #[test]
    fn test_let_declared_type_accepts_subtype_init() {
        let ir = analyze_source("LET s: String = \"hi\";").unwrap();
        let ir::Stmt::Let(let_stmt) = &ir.statements[0] else {
            panic!("expected let");
        };
        assert_eq!(let_stmt.ty, Type::String);
    }

    #[test]
    fn test_let_without_anything_is_any() {
        let ir = analyze_source("LET x;").unwrap();
        let ir::Stmt::Let(let_stmt) = &ir.statements[0] else {
            panic!("expected let");
        };
        assert_eq!(let_stmt.ty, Type::Any);
    }

    #[test]
    fn test_let_duplicate_is_rejected() {
        let err = analyze_source("LET x = 1; LET x = 2;").unwrap_err();
        assert_eq!(
            err,
            AnalyzeError::AlreadyDeclared { name: "x".into() }
        );
    }

    #[test]
    fn test_let_init_must_fit_declared_type() {
        let err = analyze_source("LET s: String = 1;").unwrap_err();
        assert_eq!(
            err,
            AnalyzeError::NotSubtype {
                found: "Integer".into(),
                expected: "String".into()
            }
        );
    }

    #[test]
    fn test_let_unknown_type_annotation() {
        let err = analyze_source("LET x: Number = 1;").unwrap_err();
        assert_eq!(err, AnalyzeError::UnknownType { name: "Number".into() });
    }

    // =========================================================================
    // DEF / RETURN
    // =========================================================================

    #[test]
    fn test_def_binds_function_and_types_body() {
        let ir = analyze_source("DEF f(x: Integer): Integer DO RETURN x + 1; END").unwrap();
        let ir::Stmt::Def(def) = &ir.statements[0] else {
            panic!("expected def");
        };
        assert_eq!(def.params, vec![(Symbol::intern("x"), Type::Integer)]);
        assert_eq!(def.ret, Type::Integer);
        let ir::Stmt::Return(ret) = &def.body[0] else {
            panic!("expected return");
        };
        assert_eq!(ret.value.as_ref().unwrap().ty, Type::Integer);
    }

    #[test]
    fn test_def_supports_recursion() {
        analyze_source("DEF f(n: Integer): Integer DO RETURN f(n); END").unwrap();
    }

    #[test]
    fn test_def_unannotated_defaults_to_any() {
        let ir = analyze_source("DEF f(x) DO RETURN x; END").unwrap();
        let ir::Stmt::Def(def) = &ir.statements[0] else {
            panic!("expected def");
        };
        assert_eq!(def.params[0].1, Type::Any);
        assert_eq!(def.ret, Type::Any);
    }

    #[test]
    fn test_def_duplicate_parameter() {
        let err = analyze_source("DEF f(a, a) DO END").unwrap_err();
        assert_eq!(err, AnalyzeError::DuplicateParameter { name: "a".into() });
    }

    #[test]
    fn test_return_outside_function() {
        let err = analyze_source("RETURN 1;").unwrap_err();
        assert_eq!(err, AnalyzeError::ReturnOutsideFunction);
    }

    #[test]
    fn test_bare_return_checks_nil() {
        analyze_source("DEF f() DO RETURN; END").unwrap();
        let err = analyze_source("DEF f(): Integer DO RETURN; END").unwrap_err();
        assert_eq!(
            err,
            AnalyzeError::NotSubtype {
                found: "Nil".into(),
                expected: "Integer".into()
            }
        );
    }

    #[test]
    fn test_return_value_must_fit() {
        let err = analyze_source("DEF f(): Integer DO RETURN \"no\"; END").unwrap_err();
        assert!(matches!(err, AnalyzeError::NotSubtype { .. }));
    }

    // =========================================================================
    // IF / FOR
    // =========================================================================

    #[test]
    fn test_if_condition_must_be_boolean() {
        let err = analyze_source("IF 1 DO END").unwrap_err();
        assert_eq!(
            err,
            AnalyzeError::NotSubtype {
                found: "Integer".into(),
                expected: "Boolean".into()
            }
        );
    }

    #[test]
    fn test_if_branches_are_fresh_scopes() {
        // The same name may be declared in both branches, and neither leaks.
        analyze_source("IF TRUE DO LET x = 1; ELSE LET x = 2; END LET x = 3;").unwrap();
    }

    #[test]
    fn test_else_branch_is_analyzed() {
        // Both branches are checked regardless of the condition's value.
        let err = analyze_source("IF TRUE DO ELSE missing; END").unwrap_err();
        assert_eq!(err, AnalyzeError::Undefined { name: "missing".into() });
    }

    #[test]
    fn test_for_requires_iterable() {
        let err = analyze_source("FOR i IN 1 DO END").unwrap_err();
        assert_eq!(
            err,
            AnalyzeError::NotSubtype {
                found: "Integer".into(),
                expected: "Iterable".into()
            }
        );
    }

    #[test]
    fn test_for_loop_variable_is_integer() {
        analyze_source("FOR i IN list DO LET x: Integer = i; END").unwrap();
    }

    // =========================================================================
    // Binary operators
    // =========================================================================

    #[test]
    fn test_arithmetic_types() {
        assert_eq!(first_expr("1 + 2;").ty, Type::Integer);
        assert_eq!(first_expr("1.5 * 2.5;").ty, Type::Decimal);
    }

    #[test]
    fn test_mixed_arithmetic_is_rejected() {
        let err = analyze_source("1 + 2.0;").unwrap_err();
        assert_eq!(
            err,
            AnalyzeError::InvalidOperands {
                op: "+".into(),
                left: "Integer".into(),
                right: "Decimal".into()
            }
        );
    }

    #[test]
    fn test_string_concatenation_wins() {
        assert_eq!(first_expr("\"n = \" + 1;").ty, Type::String);
        assert_eq!(first_expr("1.5 + \"!\";").ty, Type::String);
    }

    #[test]
    fn test_comparison_right_must_fit_left() {
        assert_eq!(first_expr("1 < 2;").ty, Type::Boolean);
        let err = analyze_source("1 < 2.0;").unwrap_err();
        assert_eq!(
            err,
            AnalyzeError::NotSubtype {
                found: "Decimal".into(),
                expected: "Integer".into()
            }
        );
    }

    #[test]
    fn test_equality_requires_equatable() {
        assert_eq!(first_expr("NIL == 1;").ty, Type::Boolean);
        // `log` returns Any, which is not Equatable.
        let err = analyze_source("log(1) == 1;").unwrap_err();
        assert_eq!(
            err,
            AnalyzeError::NotSubtype {
                found: "Any".into(),
                expected: "Equatable".into()
            }
        );
    }

    #[test]
    fn test_logical_left_checked_before_right() {
        // The right operand is an undefined name; the reported error is the
        // left operand's subtype failure, proving the right was never
        // analyzed.
        let err = analyze_source("1 AND missing;").unwrap_err();
        assert_eq!(
            err,
            AnalyzeError::NotSubtype {
                found: "Integer".into(),
                expected: "Boolean".into()
            }
        );
    }

    #[test]
    fn test_logical_types() {
        assert_eq!(first_expr("TRUE AND FALSE OR TRUE;").ty, Type::Boolean);
    }

    // =========================================================================
    // Calls, variables, assignment
    // =========================================================================

    #[test]
    fn test_undefined_variable() {
        let err = analyze_source("ghost;").unwrap_err();
        assert_eq!(err, AnalyzeError::Undefined { name: "ghost".into() });
    }

    #[test]
    fn test_builtin_call_through_root_scope() {
        assert_eq!(first_expr("log(\"hello\");").ty, Type::Any);
    }

    #[test]
    fn test_call_arity_mismatch() {
        let err = analyze_source("log(1, 2);").unwrap_err();
        assert_eq!(
            err,
            AnalyzeError::Arity {
                name: "log".into(),
                expected: 1,
                found: 2
            }
        );
    }

    #[test]
    fn test_call_of_non_function() {
        let err = analyze_source("LET x = 1; x();").unwrap_err();
        assert_eq!(err, AnalyzeError::NotFunction { name: "x".into() });
    }

    #[test]
    fn test_argument_subtype_check() {
        let err =
            analyze_source("DEF f(n: Integer) DO END f(\"s\");").unwrap_err();
        assert_eq!(
            err,
            AnalyzeError::NotSubtype {
                found: "String".into(),
                expected: "Integer".into()
            }
        );
    }

    #[test]
    fn test_variable_assignment_checks_subtype() {
        analyze_source("LET x: Any; x = 1;").unwrap();
        let err = analyze_source("LET x: Integer = 1; x = \"s\";").unwrap_err();
        assert!(matches!(err, AnalyzeError::NotSubtype { .. }));
    }

    #[test]
    fn test_assignment_target_must_be_place() {
        let err = analyze_source("1 = 2;").unwrap_err();
        assert_eq!(err, AnalyzeError::InvalidAssignmentTarget);
    }

    #[test]
    fn test_assignment_splits_into_ir_variants() {
        let ir = analyze_source("LET x = 1; x = 2;").unwrap();
        assert!(matches!(ir.statements[1], ir::Stmt::AssignVariable(_)));

        let ir = analyze_source("LET o = OBJECT DO LET f = 1; END; o.f = 2;").unwrap();
        assert!(matches!(ir.statements[1], ir::Stmt::AssignProperty(_)));
    }

    // =========================================================================
    // Properties, methods, objects
    // =========================================================================

    #[test]
    fn test_property_on_nil_receiver() {
        let err = analyze_source("LET n = NIL; n.field;").unwrap_err();
        assert_eq!(err, AnalyzeError::NotObject { found: "Nil".into() });
    }

    #[test]
    fn test_property_resolves_field_type() {
        let expr = first_expr("LET o = OBJECT DO LET n: Integer = 1; END; o.n;");
        assert_eq!(expr.ty, Type::Integer);
    }

    #[test]
    fn test_unknown_member() {
        let err = analyze_source("LET o = OBJECT DO END; o.ghost;").unwrap_err();
        assert_eq!(err, AnalyzeError::UndefinedMember { name: "ghost".into() });
    }

    #[test]
    fn test_method_call_types() {
        let expr = first_expr(
            "LET o = OBJECT DO DEF inc(n: Integer): Integer DO RETURN n + 1; END END; o.inc(1);",
        );
        assert_eq!(expr.ty, Type::Integer);
    }

    #[test]
    fn test_method_sees_this_and_fields() {
        analyze_source(
            "LET o = OBJECT DO LET n: Integer = 0; DEF get(): Integer DO RETURN this.n; END END;",
        )
        .unwrap();
    }

    #[test]
    fn test_methods_see_siblings_through_object_scope() {
        analyze_source(
            "LET o = OBJECT DO \
                 DEF a(): Integer DO RETURN this.b(); END \
                 DEF b(): Integer DO RETURN 1; END \
             END;",
        )
        .unwrap();
    }

    #[test]
    fn test_object_scope_does_not_see_enclosing() {
        // Object scopes are parentless: method bodies cannot reach names
        // from the surrounding lexical environment.
        let err = analyze_source(
            "LET outside = 1; LET o = OBJECT DO DEF f(): Integer DO RETURN outside; END END;",
        )
        .unwrap_err();
        assert_eq!(err, AnalyzeError::Undefined { name: "outside".into() });
    }

    #[test]
    fn test_object_field_initializer_sees_enclosing() {
        analyze_source("LET base = 1; LET o = OBJECT DO LET n = base; END;").unwrap();
    }

    #[test]
    fn test_object_name_must_not_be_a_type() {
        let err = analyze_source("OBJECT String DO END;").unwrap_err();
        assert_eq!(
            err,
            AnalyzeError::ObjectNameShadowsType { name: "String".into() }
        );
    }

    #[test]
    fn test_object_duplicate_field() {
        let err = analyze_source("OBJECT DO LET a = 1; LET a = 2; END;").unwrap_err();
        assert_eq!(err, AnalyzeError::AlreadyDeclared { name: "a".into() });
    }

    #[test]
    fn test_object_types_are_invariant() {
        // Two structurally identical objects still have distinct scopes,
        // so assignment between them fails.
        let err = analyze_source(
            "LET a = OBJECT DO END; LET b = OBJECT DO END; a = b;",
        )
        .unwrap_err();
        assert!(matches!(err, AnalyzeError::NotSubtype { .. }));
    }

    #[test]
    fn test_object_expression_has_object_type() {
        let expr = first_expr("OBJECT DO LET x = 1; END;");
        assert!(matches!(expr.ty, Type::Object(_)));
    }

    #[test]
    #[should_panic(expected = "character literal reached the analyzer")]
    fn test_character_literal_is_programmer_error() {
        let _ = analyze_source("'c';");
    }
}
