//! Config lexer.
//!
//! Turns characters from an [`InputReader`] into [`Token`]s on demand. Lexed
//! tokens wait in a [`RingBuffer`] lookahead queue until consumed, so the
//! parser can peek arbitrarily far ahead.

use pboforge_common::{InputReader, RingBuffer, StringReader, END_OF_INPUT};

use crate::stream::TokenStream;
use crate::token::{Token, TokenKind};

/// Initial depth of the lookahead queue; it grows when peeked past.
const LOOKAHEAD_DEPTH: usize = 10;

/// Streaming tokenizer.
///
/// # Example
///
/// ```
/// use pboforge_config::{Lexer, TokenKind, TokenStream};
///
/// let mut lexer = Lexer::from_text("class Test");
/// assert_eq!(lexer.consume().kind, TokenKind::Class);
/// assert_eq!(lexer.consume().text, "Test");
///
/// let end = lexer.consume();
/// assert_eq!(end.kind, TokenKind::EndOfDocument);
/// assert_eq!(end.offset, 10);
/// ```
pub struct Lexer<R> {
    reader: R,
    lookahead: RingBuffer<Token>,
    injected: Vec<Token>,
    end: Option<Token>,
    offset: usize,
    line: usize,
    column: usize,
}

impl Lexer<StringReader> {
    /// Lex an in-memory string.
    pub fn from_text(text: &str) -> Self {
        Self::new(StringReader::new(text))
    }
}

impl<R: InputReader> Lexer<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            lookahead: RingBuffer::new(LOOKAHEAD_DEPTH),
            injected: Vec::new(),
            end: None,
            offset: 0,
            line: 0,
            column: 0,
        }
    }

    /// Lex until `count` tokens are queued or the input is exhausted.
    fn fill(&mut self, count: usize) {
        while self.lookahead.len() < count && self.end.is_none() {
            let token = self.lex_token();
            if token.is_end() {
                self.end = Some(token);
            } else {
                self.lookahead.add(token);
            }
        }
    }

    fn end_token(&self) -> Token {
        match &self.end {
            Some(token) => token.clone(),
            None => Token::new(TokenKind::EndOfDocument, "", self.offset, self.line, self.column),
        }
    }

    fn advance(&mut self) -> char {
        let c = self.reader.consume();
        if c == END_OF_INPUT {
            return c;
        }
        self.offset += 1;
        if is_line_break(c) {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
        c
    }

    /// Skip whitespace and comments.
    fn skip_trivia(&mut self) {
        loop {
            let c = self.reader.peek();
            if c == END_OF_INPUT {
                return;
            }
            if c.is_whitespace() {
                self.advance();
            } else if c == '/' && self.reader.peek_nth(1) == '/' {
                while !is_line_break(self.reader.peek()) && self.reader.peek() != END_OF_INPUT {
                    self.advance();
                }
            } else if c == '/' && self.reader.peek_nth(1) == '*' {
                self.advance();
                self.advance();
                loop {
                    match self.reader.peek() {
                        END_OF_INPUT => return,
                        '*' if self.reader.peek_nth(1) == '/' => {
                            self.advance();
                            self.advance();
                            break;
                        }
                        _ => {
                            self.advance();
                        }
                    }
                }
            } else {
                return;
            }
        }
    }

    fn lex_token(&mut self) -> Token {
        self.skip_trivia();

        let (offset, line, column) = (self.offset, self.line, self.column);
        let make = |kind: TokenKind, text: String| Token::new(kind, text, offset, line, column);

        let c = self.reader.peek();
        let next = self.reader.peek_nth(1);
        let symbol = match c {
            END_OF_INPUT => return make(TokenKind::EndOfDocument, String::new()),
            '{' => Some(TokenKind::LeftBrace),
            '}' => Some(TokenKind::RightBrace),
            '=' => Some(TokenKind::Assign),
            ',' => Some(TokenKind::Comma),
            ';' => Some(TokenKind::Semicolon),
            ':' => Some(TokenKind::Colon),
            _ => None,
        };
        if let Some(kind) = symbol {
            let text = self.advance().to_string();
            return make(kind, text);
        }

        match c {
            '+' | '-' if next == '=' => {
                let text = self.consume_chars(2);
                let kind = if c == '+' {
                    TokenKind::PlusAssign
                } else {
                    TokenKind::MinusAssign
                };
                make(kind, text)
            }
            '"' => {
                let (kind, text) = self.lex_string();
                make(kind, text)
            }
            _ if starts_number(c, next, self.reader.peek_nth(2)) => {
                let (kind, text) = self.lex_number();
                make(kind, text)
            }
            _ if is_word_char(c) => {
                let text = self.lex_word(String::new());
                let kind = if text.eq_ignore_ascii_case("class") {
                    TokenKind::Class
                } else if text.eq_ignore_ascii_case("delete") {
                    TokenKind::Delete
                } else {
                    TokenKind::Identifier
                };
                make(kind, text)
            }
            _ => {
                let text = self.advance().to_string();
                make(TokenKind::Unknown, text)
            }
        }
    }

    fn consume_chars(&mut self, count: usize) -> String {
        (0..count).map(|_| self.advance()).collect()
    }

    fn lex_string(&mut self) -> (TokenKind, String) {
        let mut text = String::new();
        text.push(self.advance());

        let mut previous = '"';
        loop {
            let c = self.reader.peek();
            if c == END_OF_INPUT || is_line_break(c) || c == '\r' {
                return (TokenKind::BrokenString, text);
            }
            text.push(self.advance());
            if c == '"' && previous != '\\' {
                return (TokenKind::String, text);
            }
            previous = c;
        }
    }

    fn lex_number(&mut self) -> (TokenKind, String) {
        let mut text = String::new();
        if self.reader.peek() == '-' {
            text.push(self.advance());
        }
        while matches!(self.reader.peek(), '0'..='9' | '.') {
            text.push(self.advance());
        }

        // Exponent, e.g. `1e-5`.
        if matches!(self.reader.peek(), 'e' | 'E') {
            let sign = matches!(self.reader.peek_nth(1), '+' | '-');
            let digit_at = if sign { 2 } else { 1 };
            if self.reader.peek_nth(digit_at).is_ascii_digit() {
                text.push_str(&self.consume_chars(digit_at));
                while self.reader.peek().is_ascii_digit() {
                    text.push(self.advance());
                }
            }
        }

        // Digits running into letters form a word such as `3rdParty`.
        let plain_digits = text.chars().all(|c| c.is_ascii_digit());
        if plain_digits && is_word_char(self.reader.peek()) {
            return (TokenKind::Identifier, self.lex_word(text));
        }

        (TokenKind::Number, text)
    }

    fn lex_word(&mut self, mut text: String) -> String {
        while is_word_char(self.reader.peek()) {
            text.push(self.advance());
        }
        if self.reader.peek() == '[' && self.reader.peek_nth(1) == ']' {
            text.push_str(&self.consume_chars(2));
        }
        text
    }
}

impl<R: InputReader> TokenStream for Lexer<R> {
    fn peek_nth(&mut self, n: usize) -> Token {
        if let Some(index) = self.injected.len().checked_sub(n + 1) {
            return self.injected[index].clone();
        }
        let n = n - self.injected.len();
        self.fill(n + 1);
        match self.lookahead.get(n) {
            Some(token) => token.clone(),
            None => self.end_token(),
        }
    }

    fn consume(&mut self) -> Token {
        if let Some(token) = self.injected.pop() {
            return token;
        }
        self.fill(1);
        match self.lookahead.pop() {
            Some(token) => token,
            None => self.end_token(),
        }
    }

    fn inject(&mut self, token: Token) {
        self.injected.push(token);
    }
}

fn is_line_break(c: char) -> bool {
    matches!(c, '\n' | '\u{2028}' | '\u{2029}')
}

fn is_word_char(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

fn starts_number(c: char, next: char, after: char) -> bool {
    let digit_or_fraction = |c: char, next: char| c.is_ascii_digit() || (c == '.' && next.is_ascii_digit());
    digit_or_fraction(c, next) || (c == '-' && digit_or_fraction(next, after))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<TokenKind> {
        let mut lexer = Lexer::from_text(text);
        let mut kinds = Vec::new();
        loop {
            let token = lexer.consume();
            if token.is_end() {
                return kinds;
            }
            kinds.push(token.kind);
        }
    }

    #[test]
    fn test_class_keyword_positions() {
        let mut lexer = Lexer::from_text("class Test");

        let class = lexer.consume();
        assert_eq!((class.kind, class.offset), (TokenKind::Class, 0));

        let name = lexer.consume();
        assert_eq!(name.kind, TokenKind::Identifier);
        assert_eq!((name.text.as_str(), name.offset), ("Test", 6));

        let end = lexer.consume();
        assert_eq!(end.kind, TokenKind::EndOfDocument);
        assert_eq!(end.text, "");
        assert_eq!((end.offset, end.line, end.column), (10, 0, 10));

        // End of document repeats.
        assert!(lexer.consume().is_end());
        assert!(lexer.peek_nth(5).is_end());
    }

    #[test]
    fn test_keywords_need_word_boundary() {
        assert_eq!(
            kinds("CLASS classes Delete deleted"),
            vec![
                TokenKind::Class,
                TokenKind::Identifier,
                TokenKind::Delete,
                TokenKind::Identifier
            ]
        );
    }

    #[test]
    fn test_symbols() {
        assert_eq!(
            kinds("{ } = += -= , ; :"),
            vec![
                TokenKind::LeftBrace,
                TokenKind::RightBrace,
                TokenKind::Assign,
                TokenKind::PlusAssign,
                TokenKind::MinusAssign,
                TokenKind::Comma,
                TokenKind::Semicolon,
                TokenKind::Colon
            ]
        );
    }

    #[test]
    fn test_array_identifier_and_numbers() {
        let mut lexer = Lexer::from_text("weights[]={-1.5,2,1e-3,.5}");
        let tokens: Vec<Token> = (0..10).map(|_| lexer.consume()).collect();
        assert_eq!(tokens[0].text, "weights[]");
        assert!(tokens[0].is_array_identifier());
        assert_eq!(tokens[3].text, "-1.5");
        assert_eq!(tokens[3].kind, TokenKind::Number);
        assert_eq!(tokens[5].text, "2");
        assert_eq!(tokens[7].text, "1e-3");
        assert_eq!(tokens[9].text, ".5");
    }

    #[test]
    fn test_number_running_into_word() {
        let mut lexer = Lexer::from_text("3rdParty 1.2.3");
        let word = lexer.consume();
        assert_eq!((word.kind, word.text.as_str()), (TokenKind::Identifier, "3rdParty"));
        let number = lexer.consume();
        assert_eq!((number.kind, number.text.as_str()), (TokenKind::Number, "1.2.3"));
    }

    #[test]
    fn test_strings() {
        let mut lexer = Lexer::from_text(r#""say \"hi\"" "open"#);
        let closed = lexer.consume();
        assert_eq!(closed.kind, TokenKind::String);
        assert_eq!(closed.text, r#""say \"hi\"""#);

        let broken = lexer.consume();
        assert_eq!(broken.kind, TokenKind::BrokenString);
        assert_eq!(broken.text, "\"open");
    }

    #[test]
    fn test_broken_string_stops_at_line_break() {
        let mut lexer = Lexer::from_text("\"broken;\nnext");
        let broken = lexer.consume();
        assert_eq!(broken.kind, TokenKind::BrokenString);
        assert_eq!(broken.text, "\"broken;");

        let next = lexer.consume();
        assert_eq!(next.text, "next");
        assert_eq!((next.line, next.column), (1, 0));
    }

    #[test]
    fn test_comments_and_unknown() {
        assert_eq!(
            kinds("// line\na /* block\n */ # b"),
            vec![TokenKind::Identifier, TokenKind::Unknown, TokenKind::Identifier]
        );
    }

    #[test]
    fn test_peek_is_idempotent_and_deep() {
        let text = (0..40).map(|i| format!("v{i}")).collect::<Vec<_>>().join(" ");
        let mut lexer = Lexer::from_text(&text);
        assert_eq!(lexer.peek_nth(25).text, "v25");
        assert_eq!(lexer.peek_nth(25).text, "v25");
        assert_eq!(lexer.peek().text, "v0");
        assert_eq!(lexer.consume().text, "v0");
        assert_eq!(lexer.peek_nth(24).text, "v25");
    }

    #[test]
    fn test_inject_is_served_first() {
        let mut lexer = Lexer::from_text("a");
        lexer.inject(Token::new(TokenKind::Semicolon, ";", 0, 0, 0));
        lexer.inject(Token::new(TokenKind::Comma, ",", 0, 0, 0));
        assert_eq!(lexer.peek_nth(1).text, ";");
        assert_eq!(lexer.peek_nth(2).text, "a");
        assert_eq!(lexer.consume().text, ",");
        assert_eq!(lexer.consume().text, ";");
        assert_eq!(lexer.consume().text, "a");
    }
}
