//! Statement productions.
//!
//! ```text
//! source   := stmt*
//! stmt     := letStmt | defStmt | ifStmt | forStmt | returnStmt | exprOrAssign
//! ```
//!
//! Statement keywords are recognized by literal; everything that does not
//! open with one falls through to the expression-or-assignment production.

use quillc_lex::TokenKind;

use crate::ast;
use crate::{ParseError, Parser, Pat};

impl<'a> Parser<'a> {
    /// `source := stmt*`
    pub(crate) fn source(&mut self) -> Result<ast::Source, ParseError> {
        let mut statements = Vec::new();
        while self.has(0) {
            statements.push(self.statement()?);
        }
        Ok(ast::Source { statements })
    }

    pub(crate) fn statement(&mut self) -> Result<ast::Stmt, ParseError> {
        if self.at("LET") {
            self.let_statement().map(ast::Stmt::Let)
        } else if self.at("DEF") {
            self.def_statement().map(ast::Stmt::Def)
        } else if self.at("IF") {
            self.if_statement()
        } else if self.at("FOR") {
            self.for_statement()
        } else if self.at("RETURN") {
            self.return_statement()
        } else {
            self.expression_or_assignment()
        }
    }

    /// `letStmt := 'LET' IDENT (':' IDENT)? ('=' expr)? ';'`
    ///
    /// Also used for object fields, which share the production.
    pub(crate) fn let_statement(&mut self) -> Result<ast::LetStmt, ParseError> {
        self.expect("LET")?;
        let name = self.expect(TokenKind::Identifier)?.literal;
        let type_name = if self.take(":") {
            Some(self.expect(TokenKind::Identifier)?.literal)
        } else {
            None
        };
        let value = if self.take("=") {
            Some(self.expression()?)
        } else {
            None
        };
        self.expect(";")?;
        Ok(ast::LetStmt {
            name,
            type_name,
            value,
        })
    }

    /// `defStmt := 'DEF' IDENT '(' params? ')' (':' IDENT)? 'DO' stmt* 'END'`
    pub(crate) fn def_statement(&mut self) -> Result<ast::DefStmt, ParseError> {
        self.expect("DEF")?;
        let name = self.expect(TokenKind::Identifier)?.literal;

        self.expect("(")?;
        let mut params = Vec::new();
        if !self.at(")") {
            loop {
                let param_name = self.expect(TokenKind::Identifier)?.literal;
                let type_name = if self.take(":") {
                    Some(self.expect(TokenKind::Identifier)?.literal)
                } else {
                    None
                };
                params.push(ast::Param {
                    name: param_name,
                    type_name,
                });
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

        let return_type = if self.take(":") {
            Some(self.expect(TokenKind::Identifier)?.literal)
        } else {
            None
        };

        self.expect("DO")?;
        let body = self.block(&["END"])?;
        self.expect("END")?;

        Ok(ast::DefStmt {
            name,
            params,
            return_type,
            body,
        })
    }

    /// `ifStmt := 'IF' expr 'DO' stmt* ('ELSE' stmt*)? 'END'`
    fn if_statement(&mut self) -> Result<ast::Stmt, ParseError> {
        self.expect("IF")?;
        let condition = self.expression()?;
        self.expect("DO")?;
        let then_body = self.block(&["ELSE", "END"])?;
        let else_body = if self.take("ELSE") {
            self.block(&["END"])?
        } else {
            Vec::new()
        };
        self.expect("END")?;
        Ok(ast::Stmt::If(ast::IfStmt {
            condition,
            then_body,
            else_body,
        }))
    }

    /// `forStmt := 'FOR' IDENT 'IN' expr 'DO' stmt* 'END'`
    fn for_statement(&mut self) -> Result<ast::Stmt, ParseError> {
        self.expect("FOR")?;
        let name = self.expect(TokenKind::Identifier)?.literal;
        self.expect("IN")?;
        let iterable = self.expression()?;
        self.expect("DO")?;
        let body = self.block(&["END"])?;
        self.expect("END")?;
        Ok(ast::Stmt::For(ast::ForStmt {
            name,
            iterable,
            body,
        }))
    }

    /// `returnStmt := 'RETURN' expr? ';'`
    ///
    /// The parser accepts `RETURN` anywhere; only the analyzer rejects a
    /// return outside a function body.
    fn return_statement(&mut self) -> Result<ast::Stmt, ParseError> {
        self.expect("RETURN")?;
        let value = if self.at(";") {
            None
        } else {
            Some(self.expression()?)
        };
        self.expect(";")?;
        Ok(ast::Stmt::Return(ast::ReturnStmt { value }))
    }

    /// `exprOrAssign := expr ('=' expr)? ';'`
    fn expression_or_assignment(&mut self) -> Result<ast::Stmt, ParseError> {
        let target = self.expression()?;
        let statement = if self.take("=") {
            let value = self.expression()?;
            ast::Stmt::Assignment(ast::AssignStmt { target, value })
        } else {
            ast::Stmt::Expression(target)
        };
        self.expect(";")?;
        Ok(statement)
    }

    /// Parses statements until one of `terminators` (or end of input, which
    /// the caller's closing `expect` then reports).
    fn block(&mut self, terminators: &[&'static str]) -> Result<Vec<ast::Stmt>, ParseError> {
        let mut statements = Vec::new();
        while self.has(0) && !terminators.iter().any(|t| self.peek(&[Pat::Lit(t)])) {
            statements.push(self.statement()?);
        }
        Ok(statements)
    }

    /// Error for a comma directly before `)`; positioned at the comma.
    pub(crate) fn trailing_comma(&self) -> ParseError {
        let comma = self.previous();
        ParseError::TrailingComma {
            line: comma.span.line,
            column: comma.span.column,
        }
    }
}
