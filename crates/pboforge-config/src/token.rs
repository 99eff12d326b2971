//! Lexical tokens.

use std::fmt;

/// Kind of a lexed token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Keyword `class`.
    Class,
    /// Keyword `delete`.
    Delete,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `=`
    Assign,
    /// `+=`
    PlusAssign,
    /// `-=`
    MinusAssign,
    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// `:`
    Colon,
    /// Identifier, possibly with a trailing `[]`.
    Identifier,
    /// Terminated double-quoted string, quotes included.
    String,
    /// String cut off by a line break or the end of the document.
    BrokenString,
    /// Numeric literal, not yet validated.
    Number,
    /// A character no other rule accepts.
    Unknown,
    /// Returned forever once the input is exhausted.
    EndOfDocument,
}

impl TokenKind {
    /// Human readable name used in diagnostics.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Class => "keyword 'class'",
            TokenKind::Delete => "keyword 'delete'",
            TokenKind::LeftBrace => "'{'",
            TokenKind::RightBrace => "'}'",
            TokenKind::Assign => "'='",
            TokenKind::PlusAssign => "'+='",
            TokenKind::MinusAssign => "'-='",
            TokenKind::Comma => "','",
            TokenKind::Semicolon => "';'",
            TokenKind::Colon => "':'",
            TokenKind::Identifier => "identifier",
            TokenKind::String => "string",
            TokenKind::BrokenString => "unterminated string",
            TokenKind::Number => "number",
            TokenKind::Unknown => "unknown character",
            TokenKind::EndOfDocument => "end of document",
        }
    }
}

/// A token with its source position.
///
/// `offset` counts characters from the start of the input; `line` and
/// `column` are zero-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(
        kind: TokenKind,
        text: impl Into<String>,
        offset: usize,
        line: usize,
        column: usize,
    ) -> Self {
        Self {
            kind,
            text: text.into(),
            offset,
            line,
            column,
        }
    }

    /// Build a token that does not come from the input, positioned at `at`.
    pub fn synthetic(kind: TokenKind, text: impl Into<String>, at: &Token) -> Self {
        Self::new(kind, text, at.offset, at.line, at.column)
    }

    /// Token text without surrounding whitespace.
    pub fn trimmed(&self) -> &str {
        self.text.trim()
    }

    /// Returns true for the end-of-document token.
    pub fn is_end(&self) -> bool {
        self.kind == TokenKind::EndOfDocument
    }

    /// Returns true for identifiers with a `[]` suffix.
    pub fn is_array_identifier(&self) -> bool {
        self.kind == TokenKind::Identifier && self.trimmed().ends_with("[]")
    }

    /// Returns true for identifiers without a `[]` suffix.
    pub fn is_plain_identifier(&self) -> bool {
        self.kind == TokenKind::Identifier && !self.trimmed().ends_with("[]")
    }

    /// Returns true if this token can open an array element.
    pub fn starts_value(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Number | TokenKind::String | TokenKind::BrokenString | TokenKind::LeftBrace
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::EndOfDocument => f.write_str(self.kind.describe()),
            _ => write!(f, "{} '{}'", self.kind.describe(), self.trimmed()),
        }
    }
}
