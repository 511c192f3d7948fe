//! The Quill lexer.
//!
//! Transforms source text into a flat token sequence. The lexer is a
//! single-pass dispatch on the next one or two characters: whitespace and
//! `//` comments are consumed silently, everything else is handed to one of
//! the per-class sublexers (identifier, number, character, string,
//! operator). Token literals are read back as the source slice between the
//! token's start position and the cursor, so they are always exact source
//! substrings.
//!
//! Lexing is total in the sense of producing either a token stream or the
//! first [`LexError`]; there is no recovery.

use thiserror::Error;

use quillc_util::{Span, Symbol};

use crate::cursor::Cursor;
use crate::token::{Token, TokenKind};

/// Error raised by the lexer. Fatal: the first error aborts the stage.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LexError {
    /// A character that cannot start or continue any token.
    #[error("unexpected character '{found}' at {line}:{column}")]
    UnexpectedCharacter { found: char, line: u32, column: u32 },

    /// End of input, LF, or CR inside a character literal.
    #[error("unterminated character literal at {line}:{column}")]
    UnterminatedCharacter { line: u32, column: u32 },

    /// End of input, LF, or CR inside a string literal.
    #[error("unterminated string literal at {line}:{column}")]
    UnterminatedString { line: u32, column: u32 },

    /// A backslash followed by anything outside `b n r t ' " \`.
    #[error("invalid escape sequence '\\{found}' at {line}:{column}")]
    InvalidEscape { found: char, line: u32, column: u32 },
}

/// Lexes an entire source string.
///
/// This is the pipeline entry point: it drives [`Lexer`] to completion and
/// collects the tokens.
///
/// # Example
///
/// ```
/// use quillc_lex::{lex, TokenKind};
///
/// let tokens = lex("LET x = 1;").unwrap();
/// assert_eq!(tokens.len(), 5);
/// assert_eq!(tokens[0].kind, TokenKind::Identifier);
/// assert_eq!(tokens[0].literal.as_str(), "LET");
/// ```
pub fn lex(source: &str) -> Result<Vec<Token>, LexError> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    while let Some(token) = lexer.next_token()? {
        tokens.push(token);
    }
    Ok(tokens)
}

/// The Quill lexer state machine.
pub struct Lexer<'a> {
    /// Character cursor over the source.
    cursor: Cursor<'a>,

    /// Start byte position of the current token.
    token_start: usize,

    /// Start line of the current token.
    token_line: u32,

    /// Start column of the current token.
    token_column: u32,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer over `source`.
    pub fn new(source: &'a str) -> Self {
        Self {
            cursor: Cursor::new(source),
            token_start: 0,
            token_line: 1,
            token_column: 1,
        }
    }

    /// Returns the next token, or `None` at end of input.
    pub fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        self.skip_trivia();

        self.token_start = self.cursor.position();
        self.token_line = self.cursor.line();
        self.token_column = self.cursor.column();

        if self.cursor.is_at_end() {
            return Ok(None);
        }

        let token = match self.cursor.current_char() {
            c if is_identifier_start(c) => self.lex_identifier(),
            c if c.is_ascii_digit() => self.lex_number(),

            // A sign starts a number only when a digit follows; otherwise it
            // falls through to the operator lexer.
            '+' | '-' if self.cursor.peek_char(1).is_ascii_digit() => self.lex_number(),

            '\'' => self.lex_character()?,
            '"' => self.lex_string()?,

            c if c.is_ascii() => self.lex_operator(),

            c => {
                return Err(LexError::UnexpectedCharacter {
                    found: c,
                    line: self.cursor.line(),
                    column: self.cursor.column(),
                });
            }
        };

        Ok(Some(token))
    }

    /// Consumes whitespace and line comments; emits nothing.
    fn skip_trivia(&mut self) {
        loop {
            let c = self.cursor.current_char();
            if is_whitespace(c) {
                self.cursor.advance();
            } else if c == '/' && self.cursor.peek_char(1) == '/' {
                // Comment body runs until, but not including, LF or CR.
                while !self.cursor.is_at_end() && !matches!(self.cursor.current_char(), '\n' | '\r')
                {
                    self.cursor.advance();
                }
            } else {
                return;
            }
        }
    }

    /// Lexes an identifier (or keyword, which is just an identifier).
    fn lex_identifier(&mut self) -> Token {
        while is_identifier_continue(self.cursor.current_char()) {
            self.cursor.advance();
        }
        self.finish(TokenKind::Identifier)
    }

    /// Lexes a number: `[+-]? digit+ ('.' digit+)? ('e' digit+)?`.
    ///
    /// The kind is [`TokenKind::Decimal`] only when a `.` fraction was
    /// consumed; an `e` exponent alone keeps the token an integer. A `.` or
    /// `e` is consumed only when a digit follows it.
    fn lex_number(&mut self) -> Token {
        if matches!(self.cursor.current_char(), '+' | '-') {
            self.cursor.advance();
        }
        while self.cursor.current_char().is_ascii_digit() {
            self.cursor.advance();
        }

        let mut kind = TokenKind::Integer;
        if self.cursor.current_char() == '.' && self.cursor.peek_char(1).is_ascii_digit() {
            kind = TokenKind::Decimal;
            self.cursor.advance();
            while self.cursor.current_char().is_ascii_digit() {
                self.cursor.advance();
            }
        }

        if self.cursor.current_char() == 'e' && self.cursor.peek_char(1).is_ascii_digit() {
            self.cursor.advance();
            while self.cursor.current_char().is_ascii_digit() {
                self.cursor.advance();
            }
        }

        self.finish(kind)
    }

    /// Lexes a character literal: quote, one body element, quote.
    fn lex_character(&mut self) -> Result<Token, LexError> {
        self.cursor.advance(); // opening '

        if self.at_literal_break() {
            return Err(self.unterminated_character());
        }
        match self.cursor.current_char() {
            '\\' => self.lex_escape(true)?,
            '\'' => {
                // Empty literal: the closing quote arrived where the body
                // was required.
                return Err(LexError::UnexpectedCharacter {
                    found: '\'',
                    line: self.cursor.line(),
                    column: self.cursor.column(),
                });
            }
            _ => self.cursor.advance(),
        }

        if self.at_literal_break() {
            return Err(self.unterminated_character());
        }
        if !self.cursor.match_char('\'') {
            return Err(LexError::UnexpectedCharacter {
                found: self.cursor.current_char(),
                line: self.cursor.line(),
                column: self.cursor.column(),
            });
        }

        Ok(self.finish(TokenKind::Character))
    }

    /// Lexes a string literal: quote, body elements, quote.
    fn lex_string(&mut self) -> Result<Token, LexError> {
        self.cursor.advance(); // opening "

        loop {
            if self.at_literal_break() {
                return Err(LexError::UnterminatedString {
                    line: self.token_line,
                    column: self.token_column,
                });
            }
            match self.cursor.current_char() {
                '"' => {
                    self.cursor.advance();
                    return Ok(self.finish(TokenKind::String));
                }
                '\\' => self.lex_escape(false)?,
                _ => self.cursor.advance(),
            }
        }
    }

    /// Consumes a backslash escape, validating it against `b n r t ' " \`.
    fn lex_escape(&mut self, in_character: bool) -> Result<(), LexError> {
        self.cursor.advance(); // backslash

        if self.at_literal_break() {
            return Err(if in_character {
                self.unterminated_character()
            } else {
                LexError::UnterminatedString {
                    line: self.token_line,
                    column: self.token_column,
                }
            });
        }
        match self.cursor.current_char() {
            'b' | 'n' | 'r' | 't' | '\'' | '"' | '\\' => {
                self.cursor.advance();
                Ok(())
            }
            found => Err(LexError::InvalidEscape {
                found,
                line: self.cursor.line(),
                column: self.cursor.column(),
            }),
        }
    }

    /// Lexes an operator. One of `< > ! =` may take a trailing `=`;
    /// everything else is a single-character operator.
    fn lex_operator(&mut self) -> Token {
        let c = self.cursor.current_char();
        self.cursor.advance();
        if matches!(c, '<' | '>' | '!' | '=') {
            self.cursor.match_char('=');
        }
        self.finish(TokenKind::Operator)
    }

    /// Builds the token for the slice consumed since `token_start`.
    fn finish(&mut self, kind: TokenKind) -> Token {
        let literal = self.cursor.slice_from(self.token_start);
        let span = Span::new(
            self.token_start,
            self.cursor.position(),
            self.token_line,
            self.token_column,
        );
        Token::new(kind, Symbol::intern(literal), span)
    }

    /// True at end of input or before a raw LF/CR, the characters that
    /// terminate a quoted literal illegally.
    fn at_literal_break(&self) -> bool {
        self.cursor.is_at_end() || matches!(self.cursor.current_char(), '\n' | '\r')
    }

    fn unterminated_character(&self) -> LexError {
        LexError::UnterminatedCharacter {
            line: self.token_line,
            column: self.token_column,
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().transpose()
    }
}

/// Whitespace: space, backspace, tab, LF, CR. Nothing else - in particular
/// no Unicode whitespace.
fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\u{0008}' | '\t' | '\n' | '\r')
}

/// Identifier start: `[A-Za-z_]`.
fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// Identifier continuation: `[A-Za-z0-9_-]`.
fn is_identifier_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}
