//! Expression productions.
//!
//! The cascade is fixed and every binary level folds left:
//!
//! ```text
//! expr           := logical
//! logical        := comparison (('AND'|'OR') comparison)*
//! comparison     := additive (('<'|'<='|'>'|'>='|'=='|'!=') additive)*
//! additive       := multiplicative (('+'|'-') multiplicative)*
//! multiplicative := secondary (('*'|'/') secondary)*
//! secondary      := primary ('.' IDENT ('(' args? ')')?)*
//! primary        := literal | '(' expr ')' | objectExpr | IDENT ('(' args? ')')?
//! ```
//!
//! Literal conversion also happens here: escapes are resolved, numbers
//! parse to arbitrary precision, and an integer literal containing `e`
//! parses as a decimal first and truncates toward zero.

use bigdecimal::{BigDecimal, RoundingMode};
use num_bigint::BigInt;
use quillc_lex::TokenKind;

use crate::ast;
use crate::{ParseError, Parser};

impl<'a> Parser<'a> {
    /// `expr := logical`
    pub(crate) fn expression(&mut self) -> Result<ast::Expr, ParseError> {
        self.logical()
    }

    fn logical(&mut self) -> Result<ast::Expr, ParseError> {
        let mut left = self.comparison()?;
        while let Some(op) = self.take_one_of(&["AND", "OR"]) {
            let right = self.comparison()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn comparison(&mut self) -> Result<ast::Expr, ParseError> {
        let mut left = self.additive()?;
        while let Some(op) = self.take_one_of(&["<", "<=", ">", ">=", "==", "!="]) {
            let right = self.additive()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn additive(&mut self) -> Result<ast::Expr, ParseError> {
        let mut left = self.multiplicative()?;
        while let Some(op) = self.take_one_of(&["+", "-"]) {
            let right = self.multiplicative()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn multiplicative(&mut self) -> Result<ast::Expr, ParseError> {
        let mut left = self.secondary()?;
        while let Some(op) = self.take_one_of(&["*", "/"]) {
            let right = self.secondary()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    /// Property accesses and method calls chain left to right.
    fn secondary(&mut self) -> Result<ast::Expr, ParseError> {
        let mut receiver = self.primary()?;
        while self.take(".") {
            let name = self.expect(TokenKind::Identifier)?.literal;
            receiver = if self.take("(") {
                let args = self.arguments()?;
                ast::Expr::Method {
                    receiver: Box::new(receiver),
                    name,
                    args,
                }
            } else {
                ast::Expr::Property {
                    receiver: Box::new(receiver),
                    name,
                }
            };
        }
        Ok(receiver)
    }

    fn primary(&mut self) -> Result<ast::Expr, ParseError> {
        use ast::{Expr, Literal};

        if self.take("NIL") {
            return Ok(Expr::Literal(Literal::Nil));
        }
        if self.take("TRUE") {
            return Ok(Expr::Literal(Literal::Bool(true)));
        }
        if self.take("FALSE") {
            return Ok(Expr::Literal(Literal::Bool(false)));
        }

        if self.take(TokenKind::Integer) {
            let value = integer_value(self.previous().literal.as_str());
            return Ok(Expr::Literal(Literal::Integer(value)));
        }
        if self.take(TokenKind::Decimal) {
            let value = decimal_value(self.previous().literal.as_str());
            return Ok(Expr::Literal(Literal::Decimal(value)));
        }
        if self.take(TokenKind::Character) {
            let value = character_value(self.previous().literal.as_str());
            return Ok(Expr::Literal(Literal::Character(value)));
        }
        if self.take(TokenKind::String) {
            let value = string_value(self.previous().literal.as_str());
            return Ok(Expr::Literal(Literal::String(value)));
        }

        if self.take("(") {
            let inner = self.expression()?;
            self.expect(")")?;
            return Ok(Expr::Group(Box::new(inner)));
        }

        if self.at("OBJECT") {
            return self.object_expression();
        }

        if self.take(TokenKind::Identifier) {
            let name = self.previous().literal;
            if self.take("(") {
                let args = self.arguments()?;
                return Ok(Expr::Function { name, args });
            }
            return Ok(Expr::Variable(name));
        }

        Err(self.unexpected("expression"))
    }

    /// `objectExpr := 'OBJECT' IDENT? 'DO' letStmt* defStmt* 'END'`
    ///
    /// An identifier immediately before `DO` is the object's name; an
    /// anonymous object still requires the `DO`.
    fn object_expression(&mut self) -> Result<ast::Expr, ParseError> {
        self.expect("OBJECT")?;
        let name = if self.at(TokenKind::Identifier) && !self.at("DO") {
            self.take(TokenKind::Identifier);
            Some(self.previous().literal)
        } else {
            None
        };
        self.expect("DO")?;

        let mut fields = Vec::new();
        while self.at("LET") {
            fields.push(self.let_statement()?);
        }
        let mut methods = Vec::new();
        while self.at("DEF") {
            methods.push(self.def_statement()?);
        }
        self.expect("END")?;

        Ok(ast::Expr::Object(ast::ObjectExpr {
            name,
            fields,
            methods,
        }))
    }

    /// `args := expr (',' expr)*` followed by the closing `)`.
    pub(crate) fn arguments(&mut self) -> Result<Vec<ast::Expr>, ParseError> {
        let mut args = Vec::new();
        if !self.at(")") {
            loop {
                args.push(self.expression()?);
                if self.take(",") {
                    if self.at(")") {
                        return Err(self.trailing_comma());
                    }
                } else {
                    break;
                }
            }
        }
        self.expect(")")?;
        Ok(args)
    }
}

fn binary(op: quillc_util::Symbol, left: ast::Expr, right: ast::Expr) -> ast::Expr {
    ast::Expr::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}

/// Converts an integer literal. A literal containing `e` first parses as an
/// arbitrary-precision decimal and then truncates toward zero.
fn integer_value(literal: &str) -> BigInt {
    if literal.contains('e') {
        let decimal: BigDecimal = literal.parse().expect("lexer guarantees numeric form");
        let (value, _scale) = decimal
            .with_scale_round(0, RoundingMode::Down)
            .into_bigint_and_exponent();
        value
    } else {
        literal.parse().expect("lexer guarantees numeric form")
    }
}

fn decimal_value(literal: &str) -> BigDecimal {
    literal.parse().expect("lexer guarantees numeric form")
}

/// Strips the surrounding quotes and resolves the escape set.
fn string_value(literal: &str) -> String {
    let body = &literal[1..literal.len() - 1];
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('b') => out.push('\u{0008}'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('\'') => out.push('\''),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            other => unreachable!("lexer validated escapes, got {other:?}"),
        }
    }
    out
}

fn character_value(literal: &str) -> char {
    string_value(literal)
        .chars()
        .next()
        .expect("lexer guarantees one character")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Expr, Literal, Stmt};
    use crate::parse;
    use quillc_lex::lex;
    use quillc_util::Symbol;

    fn parse_expr(source: &str) -> Expr {
        let tokens = lex(&format!("{source};")).unwrap();
        let parsed = parse(&tokens).unwrap();
        match parsed.statements.into_iter().next() {
            Some(Stmt::Expression(expr)) => expr,
            other => panic!("expected expression statement, got {other:?}"),
        }
    }

    fn sym(s: &str) -> Symbol {
        Symbol::intern(s)
    }

    fn int(n: i64) -> Expr {
        Expr::Literal(Literal::Integer(BigInt::from(n)))
    }

    // =========================================================================
    // Precedence and associativity
    // =========================================================================

    #[test]
    fn test_multiplicative_binds_tighter() {
        let expr = parse_expr("1 + 2 * 3");
        let Expr::Binary { op, left, right } = expr else {
            panic!("expected binary");
        };
        assert_eq!(op, sym("+"));
        assert_eq!(*left, int(1));
        assert!(matches!(*right, Expr::Binary { op, .. } if op == sym("*")));
    }

    #[test]
    fn test_left_associativity() {
        let expr = parse_expr("7 - 2 - 3");
        let Expr::Binary { op, left, right } = expr else {
            panic!("expected binary");
        };
        assert_eq!(op, sym("-"));
        assert_eq!(*right, int(3));
        assert!(matches!(*left, Expr::Binary { op, .. } if op == sym("-")));
    }

    #[test]
    fn test_logical_single_level_folds_left() {
        // AND and OR share one level, so `a OR b AND c` is `(a OR b) AND c`.
        let expr = parse_expr("a OR b AND c");
        let Expr::Binary { op, left, .. } = expr else {
            panic!("expected binary");
        };
        assert_eq!(op, sym("AND"));
        assert!(matches!(*left, Expr::Binary { op, .. } if op == sym("OR")));
    }

    #[test]
    fn test_comparison_below_logical() {
        let expr = parse_expr("x < 1 AND y > 2");
        let Expr::Binary { op, left, right } = expr else {
            panic!("expected binary");
        };
        assert_eq!(op, sym("AND"));
        assert!(matches!(*left, Expr::Binary { op, .. } if op == sym("<")));
        assert!(matches!(*right, Expr::Binary { op, .. } if op == sym(">")));
    }

    #[test]
    fn test_group_overrides_precedence() {
        let expr = parse_expr("(1 + 2) * 3");
        let Expr::Binary { op, left, .. } = expr else {
            panic!("expected binary");
        };
        assert_eq!(op, sym("*"));
        assert!(matches!(*left, Expr::Group(_)));
    }

    // =========================================================================
    // Secondary chains
    // =========================================================================

    #[test]
    fn test_property_chain() {
        let expr = parse_expr("a.b.c");
        let Expr::Property { receiver, name } = expr else {
            panic!("expected property");
        };
        assert_eq!(name, sym("c"));
        assert!(matches!(*receiver, Expr::Property { name, .. } if name == sym("b")));
    }

    #[test]
    fn test_method_call_with_args() {
        let expr = parse_expr("point.offset(1, 2)");
        let Expr::Method {
            receiver,
            name,
            args,
        } = expr
        else {
            panic!("expected method");
        };
        assert_eq!(*receiver, Expr::Variable(sym("point")));
        assert_eq!(name, sym("offset"));
        assert_eq!(args, vec![int(1), int(2)]);
    }

    #[test]
    fn test_function_call_no_args() {
        let expr = parse_expr("f()");
        assert_eq!(
            expr,
            Expr::Function {
                name: sym("f"),
                args: Vec::new()
            }
        );
    }

    #[test]
    fn test_call_trailing_comma() {
        let tokens = lex("f(1,);").unwrap();
        let err = parse(&tokens).unwrap_err();
        assert!(matches!(err, ParseError::TrailingComma { .. }));
    }

    // =========================================================================
    // Literals
    // =========================================================================

    #[test]
    fn test_keyword_literals() {
        assert_eq!(parse_expr("NIL"), Expr::Literal(Literal::Nil));
        assert_eq!(parse_expr("TRUE"), Expr::Literal(Literal::Bool(true)));
        assert_eq!(parse_expr("FALSE"), Expr::Literal(Literal::Bool(false)));
    }

    #[test]
    fn test_integer_literal() {
        assert_eq!(parse_expr("42"), int(42));
        assert_eq!(parse_expr("-7"), int(-7));
    }

    #[test]
    fn test_integer_with_exponent_truncates_via_decimal() {
        assert_eq!(parse_expr("1e3"), int(1000));
        assert_eq!(parse_expr("-2e2"), int(-200));
    }

    #[test]
    fn test_huge_integer_keeps_precision() {
        let expr = parse_expr("123456789012345678901234567890");
        let Expr::Literal(Literal::Integer(value)) = expr else {
            panic!("expected integer");
        };
        assert_eq!(value.to_string(), "123456789012345678901234567890");
    }

    #[test]
    fn test_decimal_literal() {
        let expr = parse_expr("3.14");
        assert_eq!(
            expr,
            Expr::Literal(Literal::Decimal("3.14".parse().unwrap()))
        );
    }

    #[test]
    fn test_string_escapes_resolved() {
        let expr = parse_expr(r#""ab\nc""#);
        let Expr::Literal(Literal::String(value)) = expr else {
            panic!("expected string");
        };
        assert_eq!(value.len(), 4);
        assert_eq!(value.chars().nth(2), Some('\n'));
        assert_eq!(value, "ab\nc");
    }

    #[test]
    fn test_character_escapes_resolved() {
        assert_eq!(
            parse_expr(r"'\t'"),
            Expr::Literal(Literal::Character('\t'))
        );
        assert_eq!(parse_expr("'q'"), Expr::Literal(Literal::Character('q')));
    }

    // =========================================================================
    // Object literals
    // =========================================================================

    #[test]
    fn test_named_object() {
        let expr = parse_expr("OBJECT Point DO LET x = 1; DEF get() DO RETURN 1; END END");
        let Expr::Object(object) = expr else {
            panic!("expected object");
        };
        assert_eq!(object.name, Some(sym("Point")));
        assert_eq!(object.fields.len(), 1);
        assert_eq!(object.methods.len(), 1);
    }

    #[test]
    fn test_anonymous_object() {
        let expr = parse_expr("OBJECT DO END");
        let Expr::Object(object) = expr else {
            panic!("expected object");
        };
        assert_eq!(object.name, None);
        assert!(object.fields.is_empty());
        assert!(object.methods.is_empty());
    }

    #[test]
    fn test_object_requires_do() {
        let tokens = lex("OBJECT;").unwrap();
        let err = parse(&tokens).unwrap_err();
        assert!(matches!(err, ParseError::Unexpected { .. }));
    }

    #[test]
    fn test_reparse_equivalence_under_reformatting() {
        // The AST is invariant under whitespace and comments.
        let a = parse(&lex("LET x=1+2*y; o.m(1,\"s\");").unwrap()).unwrap();
        let b = parse(
            &lex("LET x = 1 + // note\n    2 * y;\no . m ( 1 , \"s\" ) ;").unwrap(),
        )
        .unwrap();
        assert_eq!(a, b);
    }
}
