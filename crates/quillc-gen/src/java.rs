//! Java-style emission.
//!
//! One walk over the IR, appending into a single output string with an
//! explicit indent counter (4-space units). Every expression visitor
//! appends contiguously; every statement visitor owns its whole line(s).

use quillc_sem::ir::{self, Literal};
use quillc_sem::Type;
use quillc_util::Symbol;

/// Renders typed IR as Java-flavored source text.
pub fn generate(source: &ir::Source) -> String {
    let mut generator = Generator::new();
    generator.source(source);
    generator.out
}

struct Generator {
    out: String,
    indent: usize,
}

impl Generator {
    fn new() -> Self {
        Self {
            out: String::new(),
            indent: 0,
        }
    }

    // =========================================================================
    // Writer helpers
    // =========================================================================

    fn write(&mut self, text: &str) {
        self.out.push_str(text);
    }

    fn begin_line(&mut self) {
        for _ in 0..self.indent {
            self.out.push_str("    ");
        }
    }

    fn newline(&mut self) {
        self.out.push('\n');
    }

    fn blank(&mut self) {
        self.out.push('\n');
    }

    // =========================================================================
    // Source layout: hoisting preamble, then a synthesized main
    // =========================================================================

    fn source(&mut self, source: &ir::Source) {
        self.write("public static class Main {");
        self.newline();
        self.indent = 1;

        // The hoisting preamble is the longest prefix of declarations.
        let boundary = source
            .statements
            .iter()
            .position(|stmt| !matches!(stmt, ir::Stmt::Let(_) | ir::Stmt::Def(_)))
            .unwrap_or(source.statements.len());

        for stmt in &source.statements[..boundary] {
            self.blank();
            match stmt {
                ir::Stmt::Let(let_stmt) => self.let_statement(let_stmt, true),
                ir::Stmt::Def(def) => self.def(def, true),
                _ => unreachable!("hoisting boundary admits only declarations"),
            }
        }

        let body = &source.statements[boundary..];
        if !body.is_empty() {
            self.blank();
            self.begin_line();
            self.write("public static void main(String[] args) {");
            self.newline();
            self.indent += 1;
            for stmt in body {
                self.statement(stmt);
            }
            self.indent -= 1;
            self.begin_line();
            self.write("}");
            self.newline();
        }

        self.indent = 0;
        self.blank();
        self.write("}");
        self.newline();
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn statement(&mut self, stmt: &ir::Stmt) {
        match stmt {
            ir::Stmt::Let(let_stmt) => self.let_statement(let_stmt, false),
            ir::Stmt::Def(def) => self.def(def, false),
            ir::Stmt::If(if_stmt) => self.if_statement(if_stmt),
            ir::Stmt::For(for_stmt) => self.for_statement(for_stmt),
            ir::Stmt::Return(ret) => self.return_statement(ret),
            ir::Stmt::Expression(expr) => {
                self.begin_line();
                self.expression(expr);
                self.write(";");
                self.newline();
            }
            ir::Stmt::AssignVariable(assign) => {
                self.begin_line();
                self.write(assign.target.name.as_str());
                self.write(" = ");
                self.expression(&assign.value);
                self.write(";");
                self.newline();
            }
            ir::Stmt::AssignProperty(assign) => {
                self.begin_line();
                self.expression(&assign.target.receiver);
                self.write(".");
                self.write(assign.target.name.as_str());
                self.write(" = ");
                self.expression(&assign.value);
                self.write(";");
                self.newline();
            }
        }
    }

    fn let_statement(&mut self, stmt: &ir::Let, member: bool) {
        self.begin_line();
        if member {
            self.write("static ");
        }
        self.write(type_name(&stmt.ty));
        self.write(" ");
        self.write(stmt.name.as_str());
        if let Some(value) = &stmt.value {
            self.write(" = ");
            self.expression(value);
        }
        self.write(";");
        self.newline();
    }

    fn def(&mut self, def: &ir::Def, member: bool) {
        self.begin_line();
        if member {
            self.write("static ");
        }
        self.write(type_name(&def.ret));
        self.write(" ");
        self.write(def.name.as_str());
        self.write("(");
        for (i, (name, ty)) in def.params.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.write(type_name(ty));
            self.write(" ");
            self.write(name.as_str());
        }
        self.write(") {");
        self.newline();
        self.indent += 1;
        for stmt in &def.body {
            self.statement(stmt);
        }
        self.indent -= 1;
        self.begin_line();
        self.write("}");
        self.newline();
    }

    fn if_statement(&mut self, stmt: &ir::If) {
        self.begin_line();
        self.write("if (");
        self.expression(&stmt.condition);
        self.write(") {");
        self.newline();
        self.indent += 1;
        for inner in &stmt.then_body {
            self.statement(inner);
        }
        self.indent -= 1;
        if !stmt.else_body.is_empty() {
            self.begin_line();
            self.write("} else {");
            self.newline();
            self.indent += 1;
            for inner in &stmt.else_body {
                self.statement(inner);
            }
            self.indent -= 1;
        }
        self.begin_line();
        self.write("}");
        self.newline();
    }

    fn for_statement(&mut self, stmt: &ir::For) {
        self.begin_line();
        self.write("for (BigInteger ");
        self.write(stmt.name.as_str());
        self.write(" : ");
        self.expression(&stmt.iterable);
        self.write(") {");
        self.newline();
        self.indent += 1;
        for inner in &stmt.body {
            self.statement(inner);
        }
        self.indent -= 1;
        self.begin_line();
        self.write("}");
        self.newline();
    }

    fn return_statement(&mut self, stmt: &ir::Return) {
        self.begin_line();
        match &stmt.value {
            Some(value) => {
                self.write("return ");
                self.expression(value);
            }
            None => self.write("return null"),
        }
        self.write(";");
        self.newline();
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn expression(&mut self, expr: &ir::Expr) {
        match &expr.kind {
            ir::ExprKind::Literal(literal) => self.literal(literal),

            ir::ExprKind::Group(inner) => {
                self.write("(");
                self.expression(inner);
                self.write(")");
            }

            ir::ExprKind::Binary { op, left, right } => {
                self.binary(*op, left, right, &expr.ty)
            }

            ir::ExprKind::Variable { name } => self.write(name.as_str()),

            ir::ExprKind::Property { receiver, name } => {
                self.expression(receiver);
                self.write(".");
                self.write(name.as_str());
            }

            ir::ExprKind::Function { name, args } => {
                self.write(name.as_str());
                self.call_arguments(args);
            }

            ir::ExprKind::Method {
                receiver,
                name,
                args,
            } => {
                self.expression(receiver);
                self.write(".");
                self.write(name.as_str());
                self.call_arguments(args);
            }

            ir::ExprKind::Object(object) => self.object(object),
        }
    }

    fn call_arguments(&mut self, args: &[ir::Expr]) {
        self.write("(");
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.expression(arg);
        }
        self.write(")");
    }

    fn literal(&mut self, literal: &Literal) {
        match literal {
            Literal::Nil => self.write("null"),
            Literal::Bool(true) => self.write("true"),
            Literal::Bool(false) => self.write("false"),
            Literal::Integer(value) => {
                self.write("new BigInteger(\"");
                self.write(&value.to_string());
                self.write("\")");
            }
            Literal::Decimal(value) => {
                self.write("new BigDecimal(\"");
                self.write(&value.to_string());
                self.write("\")");
            }
            Literal::Character(c) => {
                self.write("'");
                let mut escaped = String::new();
                escape_into(*c, &mut escaped);
                self.write(&escaped);
                self.write("'");
            }
            Literal::String(s) => {
                self.write("\"");
                let mut escaped = String::new();
                for c in s.chars() {
                    escape_into(c, &mut escaped);
                }
                self.write(&escaped);
                self.write("\"");
            }
        }
    }

    /// Binary lowering. The analyzer fixed the result type, which picks the
    /// rendering: string concatenation, big-number method calls,
    /// `compareTo`, the equality helper, or short-circuit operators.
    fn binary(&mut self, op: Symbol, left: &ir::Expr, right: &ir::Expr, ty: &Type) {
        match op.as_str() {
            "+" if *ty == Type::String => {
                self.expression(left);
                self.write(" + ");
                self.expression(right);
            }

            "+" | "-" | "*" | "/" => {
                self.expression(left);
                self.write(".");
                self.write(arithmetic_method(op));
                self.write("(");
                self.expression(right);
                // Decimal division needs a rounding mode; integer division
                // stays exact.
                if op.as_str() == "/" && *ty == Type::Decimal {
                    self.write(", RoundingMode.HALF_EVEN");
                }
                self.write(")");
            }

            "<" | "<=" | ">" | ">=" => {
                self.expression(left);
                self.write(".compareTo(");
                self.expression(right);
                self.write(") ");
                self.write(op.as_str());
                self.write(" 0");
            }

            "==" | "!=" => {
                if op.as_str() == "!=" {
                    self.write("!");
                }
                self.write("Objects.equals(");
                self.expression(left);
                self.write(", ");
                self.expression(right);
                self.write(")");
            }

            "AND" => {
                // A bare OR on the left would re-associate under the
                // host's precedence; group it explicitly.
                let needs_group = matches!(
                    &left.kind,
                    ir::ExprKind::Binary { op, .. } if op.as_str() == "OR"
                );
                if needs_group {
                    self.write("(");
                }
                self.expression(left);
                if needs_group {
                    self.write(")");
                }
                self.write(" && ");
                self.expression(right);
            }

            "OR" => {
                self.expression(left);
                self.write(" || ");
                self.expression(right);
            }

            other => panic!("no lowering for binary operator '{other}'"),
        }
    }

    /// Anonymous object body: fields, a blank line, then methods, each
    /// member separated by blank lines.
    fn object(&mut self, object: &ir::Object) {
        self.write("new Object() {");
        self.newline();
        self.indent += 1;
        for field in &object.fields {
            self.let_statement(field, false);
        }
        if !object.fields.is_empty() && !object.methods.is_empty() {
            self.blank();
        }
        for (i, method) in object.methods.iter().enumerate() {
            if i > 0 {
                self.blank();
            }
            self.def(method, false);
        }
        self.indent -= 1;
        self.begin_line();
        self.write("}");
    }
}

/// Java-side name of an IR type. `Object`-typed variables use the host's
/// inferred-type keyword because an anonymous class has no denotable name.
fn type_name(ty: &Type) -> &'static str {
    match ty {
        Type::Any => "Object",
        Type::Nil => "Void",
        Type::Comparable => "Comparable",
        Type::Equatable => "Object",
        Type::Iterable => "Iterable",
        Type::Boolean => "Boolean",
        Type::Integer => "BigInteger",
        Type::Decimal => "BigDecimal",
        Type::String => "String",
        Type::Object(_) => "var",
        Type::Function { .. } => "Function",
    }
}

fn arithmetic_method(op: Symbol) -> &'static str {
    match op.as_str() {
        "+" => "add",
        "-" => "subtract",
        "*" => "multiply",
        "/" => "divide",
        other => panic!("no arithmetic lowering for operator '{other}'"),
    }
}

/// Re-applies the escape set on output.
fn escape_into(c: char, out: &mut String) {
    match c {
        '\\' => out.push_str("\\\\"),
        '\u{0008}' => out.push_str("\\b"),
        '\n' => out.push_str("\\n"),
        '\r' => out.push_str("\\r"),
        '\t' => out.push_str("\\t"),
        '\'' => out.push_str("\\'"),
        '"' => out.push_str("\\\""),
        c => out.push(c),
    }
}
