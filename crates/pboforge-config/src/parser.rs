//! Recursive-descent config parser.
//!
//! Grammar:
//!
//! ```text
//! Config     := (ClassDecl | Expression | Delete)* EOD
//! ClassDecl  := "class" Ident (":" Ident)? ( ";" | "{" (ClassDecl | Expression | Delete)* "}" ";" )
//! Expression := Ident "=" Value ";"
//!             | Ident"[]" ("=" | "+=" | "-=") Array ";"
//! Delete     := "delete" Ident ";"
//! Array      := "{" ( (Value | Array) ("," (Value | Array))* )? "}"
//! Value      := Number | String
//! ```
//!
//! The parser never gives up. At every checkpoint a mismatching token is
//! recorded as a [`ParseError`] and handed to an [`ErrorResolver`], which
//! rewrites the token stream; the checkpoint is then re-evaluated against the
//! rewritten stream. With [`RecoveringResolver`] every input yields a full
//! tree plus the ordered list of errors.

use std::fmt;
use std::path::Path;

use pboforge_common::FileReader;

use crate::lexer::Lexer;
use crate::model::{ArrayOperator, Config, ConfigClass, ConfigExpression, Scope};
use crate::resolver::{ErrorResolver, ErrorSite, FailFast, Halt, RecoveringResolver};
use crate::stream::TokenStream;
use crate::token::{Token, TokenKind};
use crate::value::ConfigValue;
use crate::Result;

/// Grammar rule active when an error is raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParserState {
    RootScope,
    Class,
    VariableExpression,
    ArrayExpression,
    Delete,
    Value,
    Array,
}

/// Closed set of syntax errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    UnexpectedToken,
    ExpectedArrayIdentifier,
    ExpectedIdentifier,
    ExpectedOperator,
    ExpectedSemicolon,
    ExpectedLeftBrace,
    ExpectedRightBrace,
    ExpectedCommaOrRightBrace,
    InvalidNumber,
    ExpectedClassKeyword,
    ExpectedDeleteKeyword,
    BrokenString,
}

impl ParseErrorKind {
    fn expectation(self) -> &'static str {
        match self {
            ParseErrorKind::UnexpectedToken => "unexpected",
            ParseErrorKind::ExpectedArrayIdentifier => "expected an array identifier, found",
            ParseErrorKind::ExpectedIdentifier => "expected an identifier, found",
            ParseErrorKind::ExpectedOperator => "expected '=', '+=' or '-=', found",
            ParseErrorKind::ExpectedSemicolon => "expected ';', found",
            ParseErrorKind::ExpectedLeftBrace => "expected '{', found",
            ParseErrorKind::ExpectedRightBrace => "expected '}', found",
            ParseErrorKind::ExpectedCommaOrRightBrace => "expected ',' or '}', found",
            ParseErrorKind::InvalidNumber => "invalid",
            ParseErrorKind::ExpectedClassKeyword => "expected 'class', found",
            ParseErrorKind::ExpectedDeleteKeyword => "expected 'delete', found",
            ParseErrorKind::BrokenString => "missing closing quote in",
        }
    }
}

/// A recovered syntax error and the token that caused it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub token: Token,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, token: Token) -> Self {
        Self { kind, token }
    }

    /// One-based line of the offending token.
    pub fn line(&self) -> usize {
        self.token.line + 1
    }

    /// One-based column of the offending token.
    pub fn column(&self) -> usize {
        self.token.column + 1
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.kind.expectation())?;
        if self.token.is_end() {
            f.write_str("end of document")?;
        } else {
            write!(f, "'{}'", self.token.trimmed())?;
        }
        write!(f, " at line {}, column {}", self.line(), self.column())
    }
}

impl std::error::Error for ParseError {}

/// Outcome of a recovering parse.
#[derive(Debug, Clone)]
pub struct ParseResult {
    pub config: Config,
    pub errors: Vec<ParseError>,
}

impl ParseResult {
    /// Returns true if no error was recovered from.
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Parse a token stream, recovering from every error.
pub fn parse(stream: &mut dyn TokenStream) -> ParseResult {
    let mut parser = Parser::new(RecoveringResolver);
    let config = match parser.parse_config(stream) {
        Ok(config) => config,
        Err(never) => match never {},
    };
    ParseResult {
        config,
        errors: parser.into_errors(),
    }
}

/// Parse config text.
///
/// # Example
///
/// ```
/// use pboforge_config::{parse_str, Scope};
///
/// let result = parse_str("class CfgPatches { class MyMod { units[] = {}; }; };");
/// assert!(result.is_success());
/// assert!(result.config.class("CfgPatches").unwrap().class("MyMod").is_some());
/// ```
pub fn parse_str(text: &str) -> ParseResult {
    parse(&mut Lexer::from_text(text))
}

/// Parse a config file, streaming it from disk.
pub fn parse_file(path: impl AsRef<Path>) -> Result<ParseResult> {
    let reader = FileReader::open(path)?;
    Ok(parse(&mut Lexer::new(reader)))
}

/// Run the rule for `state` with a resolver that stops at the first error.
pub(crate) fn speculate(state: ParserState, stream: &mut dyn TokenStream) -> std::result::Result<(), Halt> {
    Parser::new(FailFast).parse_state(state, stream)
}

/// Recursive-descent parser parameterized by its error resolver.
pub struct Parser<R> {
    resolver: R,
    states: Vec<ParserState>,
    errors: Vec<ParseError>,
}

type Step<T, R> = std::result::Result<T, <R as ErrorResolver>::Error>;

impl<R: ErrorResolver> Parser<R> {
    pub fn new(resolver: R) -> Self {
        Self {
            resolver,
            states: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Errors recorded so far, in the order they were raised.
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<ParseError> {
        self.errors
    }

    /// Parse a whole document.
    pub fn parse_config(&mut self, stream: &mut dyn TokenStream) -> Step<Config, R> {
        self.scoped(ParserState::RootScope, |parser| {
            let mut config = Config::new();
            loop {
                let token = stream.peek();
                match token.kind {
                    TokenKind::EndOfDocument => return Ok(config),
                    TokenKind::Class => config.push(parser.parse_class(stream)?),
                    TokenKind::Identifier => config.push(parser.parse_expression(stream)?),
                    TokenKind::Delete => config.push(parser.parse_delete(stream)?),
                    _ => parser.fail(stream, &[], ParseErrorKind::UnexpectedToken, token)?,
                }
            }
        })
    }

    /// Parse a single construct starting in `state`.
    pub fn parse_state(&mut self, state: ParserState, stream: &mut dyn TokenStream) -> Step<(), R> {
        match state {
            ParserState::RootScope => self.parse_config(stream).map(drop),
            ParserState::Class => self.parse_class(stream).map(drop),
            ParserState::VariableExpression => self.parse_variable(stream).map(drop),
            ParserState::ArrayExpression => self.parse_array_expression(stream).map(drop),
            ParserState::Delete => self.parse_delete(stream).map(drop),
            ParserState::Value => self.parse_value(stream).map(drop),
            ParserState::Array => self.parse_array(stream).map(drop),
        }
    }

    fn scoped<T>(&mut self, state: ParserState, rule: impl FnOnce(&mut Self) -> Step<T, R>) -> Step<T, R> {
        self.states.push(state);
        let result = rule(self);
        self.states.pop();
        result
    }

    /// Record an error and let the resolver rewrite the stream.
    fn fail(
        &mut self,
        stream: &mut dyn TokenStream,
        consumed: &[Token],
        kind: ParseErrorKind,
        token: Token,
    ) -> Step<(), R> {
        let error = ParseError::new(kind, token);
        let site = ErrorSite {
            states: &self.states,
            consumed,
            token: &error.token,
            kind,
        };
        let outcome = self.resolver.resolve(stream, &site);
        self.errors.push(error);
        outcome
    }

    /// Consume the next token if `accept` approves it, recovering until it does.
    fn expect(
        &mut self,
        stream: &mut dyn TokenStream,
        consumed: &[Token],
        kind: ParseErrorKind,
        accept: impl Fn(&Token) -> bool,
    ) -> Step<Token, R> {
        loop {
            let token = stream.peek();
            if accept(&token) {
                return Ok(stream.consume());
            }
            self.fail(stream, consumed, kind, token)?;
        }
    }

    fn parse_class(&mut self, stream: &mut dyn TokenStream) -> Step<ConfigExpression, R> {
        self.scoped(ParserState::Class, |parser| {
            let mut consumed = Vec::new();

            let keyword = parser.expect(stream, &consumed, ParseErrorKind::ExpectedClassKeyword, |t| {
                t.kind == TokenKind::Class
            })?;
            consumed.push(keyword);

            let name = parser.expect(
                stream,
                &consumed,
                ParseErrorKind::ExpectedIdentifier,
                Token::is_plain_identifier,
            )?;
            let identifier = name.trimmed().to_string();
            consumed.push(name);

            let mut parent = None;
            if stream.peek().kind == TokenKind::Colon {
                consumed.push(stream.consume());
                let base = parser.expect(
                    stream,
                    &consumed,
                    ParseErrorKind::ExpectedIdentifier,
                    Token::is_plain_identifier,
                )?;
                parent = Some(base.trimmed().to_string());
                consumed.push(base);
            }

            if stream.peek().kind == TokenKind::Semicolon {
                stream.consume();
                return Ok(ConfigExpression::external_class(identifier, parent));
            }

            let open = parser.expect(stream, &consumed, ParseErrorKind::ExpectedLeftBrace, |t| {
                t.kind == TokenKind::LeftBrace
            })?;
            consumed.push(open);

            let mut class = ConfigClass::new(identifier, parent);
            loop {
                let token = stream.peek();
                match token.kind {
                    TokenKind::RightBrace | TokenKind::EndOfDocument => break,
                    TokenKind::Class => class.push(parser.parse_class(stream)?),
                    TokenKind::Identifier => class.push(parser.parse_expression(stream)?),
                    TokenKind::Delete => class.push(parser.parse_delete(stream)?),
                    _ => parser.fail(stream, &consumed, ParseErrorKind::UnexpectedToken, token)?,
                }
            }

            let close = parser.expect(stream, &consumed, ParseErrorKind::ExpectedRightBrace, |t| {
                t.kind == TokenKind::RightBrace
            })?;
            consumed.push(close);
            parser.expect_semicolon(stream, &consumed)?;

            Ok(ConfigExpression::Class(class))
        })
    }

    fn expect_semicolon(&mut self, stream: &mut dyn TokenStream, consumed: &[Token]) -> Step<Token, R> {
        self.expect(stream, consumed, ParseErrorKind::ExpectedSemicolon, |t| {
            t.kind == TokenKind::Semicolon
        })
    }

    fn parse_expression(&mut self, stream: &mut dyn TokenStream) -> Step<ConfigExpression, R> {
        if stream.peek().is_array_identifier() {
            self.parse_array_expression(stream)
        } else {
            self.parse_variable(stream)
        }
    }

    fn parse_variable(&mut self, stream: &mut dyn TokenStream) -> Step<ConfigExpression, R> {
        self.scoped(ParserState::VariableExpression, |parser| {
            let mut consumed = Vec::new();

            let name = parser.expect(
                stream,
                &consumed,
                ParseErrorKind::ExpectedIdentifier,
                Token::is_plain_identifier,
            )?;
            let identifier = name.trimmed().to_string();
            consumed.push(name);

            let operator = parser.expect(stream, &consumed, ParseErrorKind::ExpectedOperator, |t| {
                t.kind == TokenKind::Assign
            })?;
            consumed.push(operator);

            let (value, token) = parser.parse_value(stream)?;
            consumed.push(token);
            parser.expect_semicolon(stream, &consumed)?;

            Ok(ConfigExpression::variable(identifier, value))
        })
    }

    fn parse_array_expression(&mut self, stream: &mut dyn TokenStream) -> Step<ConfigExpression, R> {
        self.scoped(ParserState::ArrayExpression, |parser| {
            let mut consumed = Vec::new();

            let name = parser.expect(
                stream,
                &consumed,
                ParseErrorKind::ExpectedArrayIdentifier,
                Token::is_array_identifier,
            )?;
            let identifier = name.trimmed().trim_end_matches("[]").trim().to_string();
            consumed.push(name);

            let operator = parser.expect(stream, &consumed, ParseErrorKind::ExpectedOperator, |t| {
                matches!(
                    t.kind,
                    TokenKind::Assign | TokenKind::PlusAssign | TokenKind::MinusAssign
                )
            })?;
            let operator_kind = match operator.kind {
                TokenKind::PlusAssign => ArrayOperator::Add,
                TokenKind::MinusAssign => ArrayOperator::Subtract,
                _ => ArrayOperator::Assign,
            };
            consumed.push(operator);

            let (values, tokens) = parser.parse_array(stream)?;
            consumed.extend(tokens);
            parser.expect_semicolon(stream, &consumed)?;

            Ok(ConfigExpression::array(identifier, operator_kind, values))
        })
    }

    fn parse_delete(&mut self, stream: &mut dyn TokenStream) -> Step<ConfigExpression, R> {
        self.scoped(ParserState::Delete, |parser| {
            let mut consumed = Vec::new();

            let keyword = parser.expect(stream, &consumed, ParseErrorKind::ExpectedDeleteKeyword, |t| {
                t.kind == TokenKind::Delete
            })?;
            consumed.push(keyword);

            let name = parser.expect(
                stream,
                &consumed,
                ParseErrorKind::ExpectedIdentifier,
                Token::is_plain_identifier,
            )?;
            let identifier = name.trimmed().to_string();
            consumed.push(name);
            parser.expect_semicolon(stream, &consumed)?;

            Ok(ConfigExpression::delete(identifier))
        })
    }

    /// Parse a scalar value, returning it with the token it came from.
    fn parse_value(&mut self, stream: &mut dyn TokenStream) -> Step<(ConfigValue, Token), R> {
        self.scoped(ParserState::Value, |parser| loop {
            let token = stream.peek();
            match token.kind {
                TokenKind::Number => match ConfigValue::parse_number(token.trimmed()) {
                    Some(value) => return Ok((value, stream.consume())),
                    None => parser.fail(stream, &[], ParseErrorKind::InvalidNumber, token)?,
                },
                TokenKind::String => {
                    let value = ConfigValue::String(unquote(token.trimmed()));
                    return Ok((value, stream.consume()));
                }
                TokenKind::BrokenString => {
                    parser.fail(stream, &[], ParseErrorKind::BrokenString, token)?
                }
                _ => parser.fail(stream, &[], ParseErrorKind::UnexpectedToken, token)?,
            }
        })
    }

    /// Parse an array literal, returning its values and every token it consumed.
    fn parse_array(&mut self, stream: &mut dyn TokenStream) -> Step<(Vec<ConfigValue>, Vec<Token>), R> {
        self.scoped(ParserState::Array, |parser| {
            let mut consumed = Vec::new();
            let mut values = Vec::new();

            let open = parser.expect(stream, &consumed, ParseErrorKind::ExpectedLeftBrace, |t| {
                t.kind == TokenKind::LeftBrace
            })?;
            consumed.push(open);

            if stream.peek().kind == TokenKind::RightBrace {
                consumed.push(stream.consume());
                return Ok((values, consumed));
            }

            parser.parse_element(stream, &mut values, &mut consumed)?;
            loop {
                let token = stream.peek();
                match token.kind {
                    TokenKind::RightBrace | TokenKind::EndOfDocument => break,
                    TokenKind::Comma => {
                        consumed.push(stream.consume());
                        parser.parse_element(stream, &mut values, &mut consumed)?;
                    }
                    _ => parser.fail(
                        stream,
                        &consumed,
                        ParseErrorKind::ExpectedCommaOrRightBrace,
                        token,
                    )?,
                }
            }

            let close = parser.expect(stream, &consumed, ParseErrorKind::ExpectedRightBrace, |t| {
                t.kind == TokenKind::RightBrace
            })?;
            consumed.push(close);

            Ok((values, consumed))
        })
    }

    fn parse_element(
        &mut self,
        stream: &mut dyn TokenStream,
        values: &mut Vec<ConfigValue>,
        consumed: &mut Vec<Token>,
    ) -> Step<(), R> {
        if stream.peek().kind == TokenKind::LeftBrace {
            let (nested, tokens) = self.parse_array(stream)?;
            consumed.extend(tokens);
            values.push(ConfigValue::Array(nested));
        } else {
            let (value, token) = self.parse_value(stream)?;
            consumed.push(token);
            values.push(value);
        }
        Ok(())
    }
}

/// Strip the outer quotes of a string token and unescape `\"`.
fn unquote(text: &str) -> String {
    let inner = text.strip_prefix('"').unwrap_or(text);
    let inner = inner.strip_suffix('"').unwrap_or(inner);
    inner.replace("\\\"", "\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(result: &ParseResult) -> Vec<ParseErrorKind> {
        result.errors.iter().map(|error| error.kind).collect()
    }

    #[test]
    fn test_parse_class_with_everything() {
        let result = parse_str(
            r#"class Test { str = "hi"; arr[] = {1,2}; arr[] += {3}; class Inner { v = 5; }; };"#,
        );
        assert!(result.is_success(), "{:?}", result.errors);

        let classes: Vec<_> = result.config.classes().collect();
        assert_eq!(classes.len(), 1);
        let test = classes[0];
        assert_eq!(test.identifier(), "Test");
        assert_eq!(test.variable("str"), Some(&ConfigValue::from("hi")));

        let arrays: Vec<_> = test.arrays().collect();
        assert_eq!(arrays[0], ("arr", ArrayOperator::Assign, &[ConfigValue::Int(1), ConfigValue::Int(2)][..]));
        assert_eq!(arrays[1], ("arr", ArrayOperator::Add, &[ConfigValue::Int(3)][..]));

        let inner = test.class("Inner").unwrap();
        assert_eq!(inner.variable("v"), Some(&ConfigValue::Int(5)));
    }

    #[test]
    fn test_parse_values() {
        let result = parse_str(
            r#"i = -3; f = 0.5; s = "say \"x\""; nested[] = {{1, "a"}, {}, 2.5}; list[] -= {"b"};"#,
        );
        assert!(result.is_success(), "{:?}", result.errors);

        let config = &result.config;
        assert_eq!(config.variable("i"), Some(&ConfigValue::Int(-3)));
        assert_eq!(config.variable("f"), Some(&ConfigValue::Float(0.5)));
        assert_eq!(config.variable("s"), Some(&ConfigValue::from("say \"x\"")));

        let arrays: Vec<_> = config.arrays().collect();
        assert_eq!(
            arrays[0].2,
            &[
                ConfigValue::Array(vec![ConfigValue::Int(1), ConfigValue::from("a")]),
                ConfigValue::Array(vec![]),
                ConfigValue::Float(2.5),
            ][..]
        );
        assert_eq!(arrays[1].1, ArrayOperator::Subtract);
    }

    #[test]
    fn test_parse_external_classes_and_deletes() {
        let result = parse_str("class Base; class Child: Base; delete Old; class Holder { delete Inner; };");
        assert!(result.is_success(), "{:?}", result.errors);
        let config = &result.config;
        assert_eq!(
            config.external_classes().collect::<Vec<_>>(),
            vec![("Base", None), ("Child", Some("Base"))]
        );
        assert_eq!(config.deletes().collect::<Vec<_>>(), vec!["Old"]);
        assert_eq!(config.class("Holder").unwrap().deletes().count(), 1);
    }

    #[test]
    fn test_class_with_parent() {
        let result = parse_str("class Rifle : Weapon { mass = 4.5; };");
        assert!(result.is_success());
        let rifle = result.config.class("Rifle").unwrap();
        assert_eq!(rifle.parent(), Some("Weapon"));
        assert_eq!(rifle.variable("mass"), Some(&ConfigValue::Float(4.5)));
    }

    #[test]
    fn test_broken_string_recovers() {
        let result = parse_str("str = \"broken;\n");
        assert_eq!(
            kinds(&result),
            vec![ParseErrorKind::BrokenString, ParseErrorKind::ExpectedSemicolon]
        );
        assert_eq!(result.config.variable("str"), Some(&ConfigValue::from("broken;")));
    }

    #[test]
    fn test_trailing_comma_terminates() {
        let result = parse_str("arr[] = { 22, };");
        assert!(!result.errors.is_empty());
        let arrays: Vec<_> = result.config.arrays().collect();
        assert_eq!(arrays.len(), 1);
        assert_eq!(arrays[0].2[0], ConfigValue::Int(22));
    }

    #[test]
    fn test_missing_semicolon_is_injected() {
        let result = parse_str("a = 1\nb = 2;");
        assert_eq!(kinds(&result), vec![ParseErrorKind::ExpectedSemicolon]);
        assert_eq!(result.config.variable("a"), Some(&ConfigValue::Int(1)));
        assert_eq!(result.config.variable("b"), Some(&ConfigValue::Int(2)));

        let error = &result.errors[0];
        assert_eq!((error.line(), error.column()), (2, 1));
    }

    #[test]
    fn test_missing_operator_is_injected() {
        let result = parse_str("a 5;");
        assert_eq!(kinds(&result), vec![ParseErrorKind::ExpectedOperator]);
        assert_eq!(result.config.variable("a"), Some(&ConfigValue::Int(5)));
    }

    #[test]
    fn test_stray_token_is_skipped() {
        let result = parse_str("class A {}; } b = 1;");
        assert_eq!(kinds(&result), vec![ParseErrorKind::UnexpectedToken]);
        assert!(result.config.class("A").is_some());
        assert_eq!(result.config.variable("b"), Some(&ConfigValue::Int(1)));
    }

    #[test]
    fn test_missing_comma_between_values() {
        let result = parse_str("arr[] = {1 2};");
        assert_eq!(kinds(&result), vec![ParseErrorKind::ExpectedCommaOrRightBrace]);
        let arrays: Vec<_> = result.config.arrays().collect();
        assert_eq!(arrays[0].2, &[ConfigValue::Int(1), ConfigValue::Int(2)][..]);
    }

    #[test]
    fn test_invalid_number_becomes_zero() {
        let result = parse_str("v = 1.2.3;");
        assert_eq!(kinds(&result), vec![ParseErrorKind::InvalidNumber]);
        assert_eq!(result.config.variable("v"), Some(&ConfigValue::Int(0)));
    }

    #[test]
    fn test_unclosed_class_at_end() {
        let result = parse_str("class A { x = 1;");
        assert_eq!(
            kinds(&result),
            vec![ParseErrorKind::ExpectedRightBrace, ParseErrorKind::ExpectedSemicolon]
        );
        assert_eq!(
            result.config.class("A").unwrap().variable("x"),
            Some(&ConfigValue::Int(1))
        );
    }

    #[test]
    fn test_errors_are_deterministic() {
        let text = "class { a = ; b[] = {1 \"x }; delete ; } ; = 3";
        let first = parse_str(text);
        let second = parse_str(text);
        assert!(!first.errors.is_empty());
        assert_eq!(first.errors, second.errors);
        assert_eq!(first.config, second.config);
    }

    #[test]
    fn test_error_display() {
        let result = parse_str("a = 1");
        assert_eq!(
            result.errors[0].to_string(),
            "expected ';', found end of document at line 1, column 6"
        );
    }

    #[test]
    fn test_error_display_shows_token_text_once() {
        let result = parse_str("class A {}; } b = 1;");
        assert_eq!(result.errors[0].to_string(), "unexpected '}' at line 1, column 13");

        let result = parse_str("v = 1.2.3;");
        assert_eq!(result.errors[0].to_string(), "invalid '1.2.3' at line 1, column 5");
    }

    #[test]
    fn test_missing_value_becomes_zero() {
        let result = parse_str("class A { x = ; y = 1; };");
        assert_eq!(result.errors.len(), 1);

        let class = result.config.class("A").unwrap();
        assert_eq!(class.variable("x"), Some(&ConfigValue::Int(0)));
        assert_eq!(class.variable("y"), Some(&ConfigValue::Int(1)));
    }

    #[test]
    fn test_parse_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.cpp");
        std::fs::write(&path, "class CfgPatches\n{\n\tclass Mod\n\t{\n\t\tunits[] = {};\n\t};\n};\n").unwrap();

        let result = parse_file(&path).unwrap();
        assert!(result.is_success());
        assert!(result.config.class("CfgPatches").unwrap().class("Mod").is_some());
    }
}
