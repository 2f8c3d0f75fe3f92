// src/frontend/lexer.rs

use crate::frontend::errors::LexerError;
use crate::frontend::token::{Comment, Span, Token, TokenType};

#[derive(Clone)]
pub struct Lexer<'src> {
    source: &'src str,
    chars: std::iter::Peekable<std::str::CharIndices<'src>>,
    start: usize,
    current: usize,
    line: u32,
    column: u32,
    start_column: u32,
    start_line: u32,
    // Comment capture (doc attachment happens in the parser)
    comments: Vec<Comment>,
    // Error collection
    errors: Vec<LexerError>,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            start: 0,
            current: 0,
            line: 1,
            column: 1,
            start_column: 1,
            start_line: 1,
            comments: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Take all collected errors, leaving the internal list empty.
    pub fn take_errors(&mut self) -> Vec<LexerError> {
        std::mem::take(&mut self.errors)
    }

    /// Check if any errors have been collected.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Comments captured so far, in source order.
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    /// Take all captured comments, leaving the internal list empty.
    pub fn take_comments(&mut self) -> Vec<Comment> {
        std::mem::take(&mut self.comments)
    }

    /// Get the next token from the source
    pub fn next_token(&mut self) -> Token {
        self.skip_blanks();

        self.start = self.current;
        self.start_column = self.column;
        self.start_line = self.line;

        let Some(c) = self.advance() else {
            return self.make_token(TokenType::Eof);
        };

        match c {
            '\n' => {
                // Collapse a run of newlines (and indentation between them)
                // into one token.
                while matches!(self.peek(), Some('\n' | ' ' | '\t' | '\r')) {
                    self.advance();
                }
                self.make_token(TokenType::Newline)
            }
            '(' => self.make_token(TokenType::LParen),
            ')' => self.make_token(TokenType::RParen),
            '{' => self.make_token(TokenType::LBrace),
            '}' => self.make_token(TokenType::RBrace),
            '[' => self.make_token(TokenType::LBracket),
            ']' => self.make_token(TokenType::RBracket),
            ',' => self.make_token(TokenType::Comma),
            ';' => self.make_token(TokenType::Semicolon),
            '*' => self.make_token(TokenType::Star),
            '&' => self.make_token(TokenType::Amp),
            '=' => self.make_token(TokenType::Eq),
            '.' => {
                if self.match_char('.') {
                    if self.match_char('.') {
                        self.make_token(TokenType::Ellipsis)
                    } else {
                        self.error_token('.')
                    }
                } else {
                    self.make_token(TokenType::Dot)
                }
            }
            '"' => self.string(),
            c if c.is_ascii_digit() => self.number(),
            c if is_ident_start(c) => self.identifier(),
            c => self.error_token(c),
        }
    }

    /// Skip spaces, tabs, carriage returns and comments. Newlines are
    /// significant and become tokens.
    fn skip_blanks(&mut self) {
        loop {
            match self.peek() {
                Some(' ') | Some('\t') | Some('\r') => {
                    self.advance();
                }
                Some('/') if self.peek_second() == Some('/') => {
                    self.line_comment();
                }
                Some('/') if self.peek_second() == Some('*') => {
                    self.block_comment();
                }
                _ => return,
            }
        }
    }

    fn line_comment(&mut self) {
        let line = self.line;
        self.advance(); // '/'
        self.advance(); // '/'
        let text_start = self.current;
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
        let raw = &self.source[text_start..self.current];
        let text = raw.strip_prefix(' ').unwrap_or(raw).to_string();
        self.comments.push(Comment { text, line });
    }

    fn block_comment(&mut self) {
        let start = self.current;
        let start_line = self.line;
        let start_column = self.column;
        self.advance(); // '/'
        self.advance(); // '*'
        loop {
            match self.advance() {
                Some('*') if self.peek() == Some('/') => {
                    self.advance();
                    return;
                }
                Some(_) => {}
                None => {
                    self.errors.push(LexerError::UnterminatedComment {
                        span: Span::new(start, self.current, start_line, start_column).into(),
                    });
                    return;
                }
            }
        }
    }

    fn string(&mut self) -> Token {
        loop {
            match self.advance() {
                Some('"') => break,
                Some('\\') => {
                    self.advance();
                }
                Some('\n') | None => {
                    self.errors.push(LexerError::UnterminatedString {
                        span: Span::new(self.start, self.current, self.start_line, self.start_column)
                            .into(),
                    });
                    return self.make_token(TokenType::Error);
                }
                Some(_) => {}
            }
        }
        self.make_token(TokenType::StringLiteral)
    }

    fn number(&mut self) -> Token {
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.advance();
        }
        self.make_token(TokenType::IntLiteral)
    }

    fn identifier(&mut self) -> Token {
        while matches!(self.peek(), Some(c) if is_ident_continue(c)) {
            self.advance();
        }
        let text = &self.source[self.start..self.current];
        match TokenType::keyword_type(text) {
            Some(ty) => self.make_token(ty),
            None => self.make_token(TokenType::Identifier),
        }
    }

    fn advance(&mut self) -> Option<char> {
        let (_, c) = self.chars.next()?;
        self.current += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn peek_second(&mut self) -> Option<char> {
        let mut ahead = self.chars.clone();
        ahead.next();
        ahead.next().map(|(_, c)| c)
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn make_token(&self, ty: TokenType) -> Token {
        let span = Span::new(self.start, self.current, self.start_line, self.start_column);
        Token::new(ty, &self.source[self.start..self.current], span)
    }

    fn error_token(&mut self, c: char) -> Token {
        let span = Span::new(self.start, self.current, self.start_line, self.start_column);
        self.errors.push(LexerError::UnexpectedCharacter { ch: c, span: span.into() });
        Token::new(TokenType::Error, &self.source[self.start..self.current], span)
    }
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}
