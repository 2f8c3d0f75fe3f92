// src/frontend/token.rs

/// Single source of truth for keyword-to-token mapping.
///
/// Each entry `"text" => Variant` generates:
/// - A match arm in `TokenType::keyword_type`: `"text" => Some(TokenType::Variant)`
/// - A match arm in `TokenType::as_str`:       `Self::Variant => "text"`
macro_rules! define_keywords {
    ( $( $text:literal => $variant:ident ),+ $(,)? ) => {
        impl TokenType {
            /// Check if a string is a keyword and return its token type.
            pub fn keyword_type(text: &str) -> Option<TokenType> {
                match text {
                    $( $text => Some(TokenType::$variant), )+
                    _ => None,
                }
            }

            /// String representation for keyword tokens (used by `as_str`).
            fn keyword_as_str(&self) -> Option<&'static str> {
                match self {
                    $( Self::$variant => Some($text), )+
                    _ => None,
                }
            }
        }
    };
}

define_keywords! {
    "package"   => KwPackage,
    "import"    => KwImport,
    "type"      => KwType,
    "struct"    => KwStruct,
    "interface" => KwInterface,
    "func"      => KwFunc,
    "var"       => KwVar,
    "return"    => KwReturn,
    "map"       => KwMap,
    "chan"      => KwChan,
    "nil"       => KwNil,
}

/// All token types in the source language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    // Literals
    IntLiteral,
    StringLiteral,
    Identifier,

    // Keywords
    KwPackage,
    KwImport,
    KwType,
    KwStruct,
    KwInterface,
    KwFunc,
    KwVar,
    KwReturn,
    KwMap,
    KwChan,
    KwNil,

    // Operators
    Star,     // *
    Amp,      // &
    Eq,       // =
    Dot,      // .
    Ellipsis, // ...

    // Delimiters
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Semicolon,

    // Special
    Newline,
    Eof,
    Error,
}

impl TokenType {
    /// Get string representation for error messages
    pub fn as_str(&self) -> &'static str {
        // Keywords are defined once in `define_keywords!`; delegate to the
        // generated helper so they never diverge from `keyword_type()`.
        if let Some(s) = self.keyword_as_str() {
            return s;
        }
        match self {
            Self::IntLiteral => "integer",
            Self::StringLiteral => "string",
            Self::Identifier => "identifier",
            Self::Star => "*",
            Self::Amp => "&",
            Self::Eq => "=",
            Self::Dot => ".",
            Self::Ellipsis => "...",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::LBrace => "{",
            Self::RBrace => "}",
            Self::LBracket => "[",
            Self::RBracket => "]",
            Self::Comma => ",",
            Self::Semicolon => ";",
            Self::Newline => "newline",
            Self::Eof => "end of file",
            Self::Error => "error",
            _ => unreachable!("keyword handled above"),
        }
    }

    /// Whether this token can begin a type expression. The parser uses this
    /// to split `name Type` parameter groups from bare types.
    pub fn starts_type(&self) -> bool {
        matches!(
            self,
            Self::Identifier
                | Self::Star
                | Self::LBracket
                | Self::KwMap
                | Self::KwChan
                | Self::KwFunc
                | Self::Ellipsis
        )
    }
}

/// Source location span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize, // Byte offset
    pub end: usize,   // Byte offset (exclusive)
    pub line: u32,    // Start line (1-indexed)
    pub column: u32,  // Start column (1-indexed)
}

impl Span {
    pub fn new(start: usize, end: usize, line: u32, column: u32) -> Self {
        Self { start, end, line, column }
    }

    /// Smallest span covering both `self` and `other`.
    pub fn merge(self, other: Span) -> Span {
        let (start, line, column) = if self.start <= other.start {
            (self.start, self.line, self.column)
        } else {
            (other.start, other.line, other.column)
        };
        Span {
            start,
            end: self.end.max(other.end),
            line,
            column,
        }
    }

    /// Whether a byte offset falls inside this span (end-inclusive, matching
    /// how diagnostics anchor at the edge of a token).
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset <= self.end
    }
}

#[derive(Debug, Clone)]
pub struct Token {
    pub ty: TokenType,
    pub lexeme: String,
    pub span: Span,
}

impl Token {
    pub fn new(ty: TokenType, lexeme: impl Into<String>, span: Span) -> Self {
        Self {
            ty,
            lexeme: lexeme.into(),
            span,
        }
    }
}

/// A line comment captured by the lexer. `text` excludes the `//` marker and
/// one leading space, if present.
#[derive(Debug, Clone)]
pub struct Comment {
    pub text: String,
    pub line: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_round_trip() {
        assert_eq!(TokenType::keyword_type("interface"), Some(TokenType::KwInterface));
        assert_eq!(TokenType::KwInterface.as_str(), "interface");
        assert_eq!(TokenType::keyword_type("Interface"), None);
    }

    #[test]
    fn span_merge() {
        let a = Span::new(4, 8, 1, 5);
        let b = Span::new(10, 12, 1, 11);
        let m = a.merge(b);
        assert_eq!(m.start, 4);
        assert_eq!(m.end, 12);
        assert_eq!(m.column, 5);
    }

    #[test]
    fn span_contains_is_end_inclusive() {
        let s = Span::new(2, 5, 1, 3);
        assert!(s.contains(2));
        assert!(s.contains(5));
        assert!(!s.contains(6));
    }
}
