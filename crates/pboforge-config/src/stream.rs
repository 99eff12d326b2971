//! Token streams consumed by the parser.
//!
//! The parser reads through the [`TokenStream`] trait so the same grammar
//! rules can run against the real [`Lexer`](crate::Lexer) or against a
//! [`PreviewStream`] during error recovery.

use crate::token::Token;

/// A queue of tokens with unbounded lookahead.
pub trait TokenStream {
    /// Look `n` tokens ahead without consuming.
    fn peek_nth(&mut self, n: usize) -> Token;

    /// Remove and return the next token.
    fn consume(&mut self) -> Token;

    /// Push a token in front of the stream; it is the next one returned.
    fn inject(&mut self, token: Token);

    /// Look at the next token.
    fn peek(&mut self) -> Token {
        self.peek_nth(0)
    }
}

/// Non-consuming view over another stream.
///
/// Serves `prefix` first, then the base stream starting `skip` tokens ahead.
/// The base stream is only ever peeked, so dropping the preview leaves it
/// exactly as it was.
pub struct PreviewStream<'a> {
    base: &'a mut dyn TokenStream,
    prefix: Vec<Token>,
    skip: usize,
    position: usize,
}

impl<'a> PreviewStream<'a> {
    pub fn new(base: &'a mut dyn TokenStream, prefix: Vec<Token>, skip: usize) -> Self {
        Self {
            base,
            prefix,
            skip,
            position: 0,
        }
    }

    /// Number of tokens consumed through this preview.
    pub fn consumed(&self) -> usize {
        self.position
    }
}

impl TokenStream for PreviewStream<'_> {
    fn peek_nth(&mut self, n: usize) -> Token {
        let index = self.position + n;
        match self.prefix.get(index) {
            Some(token) => token.clone(),
            None => self.base.peek_nth(self.skip + index - self.prefix.len()),
        }
    }

    fn consume(&mut self) -> Token {
        let token = self.peek();
        self.position += 1;
        token
    }

    fn inject(&mut self, token: Token) {
        // Copy base tokens already read through the preview so `position`
        // indexes into the prefix.
        while self.prefix.len() < self.position {
            let next = self.base.peek_nth(self.skip);
            self.prefix.push(next);
            self.skip += 1;
        }
        self.prefix.insert(self.position, token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use crate::token::TokenKind;

    fn texts(stream: &mut dyn TokenStream, count: usize) -> Vec<String> {
        (0..count).map(|_| stream.consume().text).collect()
    }

    #[test]
    fn test_preview_leaves_base_untouched() {
        let mut lexer = Lexer::from_text("a = 1 ;");
        {
            let prefix = vec![Token::new(TokenKind::Identifier, "x", 0, 0, 0)];
            let mut preview = PreviewStream::new(&mut lexer, prefix, 1);
            assert_eq!(texts(&mut preview, 3), vec!["x", "=", "1"]);
            assert_eq!(preview.consumed(), 3);
        }
        assert_eq!(lexer.peek().text, "a");
    }

    #[test]
    fn test_preview_inject_after_base_reads() {
        let mut lexer = Lexer::from_text("a b c");
        let mut preview = PreviewStream::new(&mut lexer, Vec::new(), 0);
        assert_eq!(preview.consume().text, "a");
        preview.inject(Token::new(TokenKind::Semicolon, ";", 0, 0, 0));
        assert_eq!(texts(&mut preview, 3), vec![";", "b", "c"]);
    }
}
