//! Error recovery for the parser.
//!
//! When a checkpoint fails, the resolver picks one of three rewrites of the
//! token stream:
//!
//! - **Skip**: drop the offending token.
//! - **Replace**: swap the offending token for a synthetic one.
//! - **Inject**: insert a synthetic token in front of the offending one.
//!
//! Each `(state, error kind)` pair has a fixed synthetic token and a ranked
//! list of allowed rewrites. When more than one rewrite is allowed, each is
//! tried on a [`PreviewStream`] by re-running the active rule with
//! [`FailFast`]; the rewrite that lets the rule consume the most tokens wins,
//! ties going to the higher ranked one. Only that rewrite touches the real
//! stream. At the end of the document only Inject is possible.

use std::convert::Infallible;

use log::trace;

use crate::parser::{speculate, ParseErrorKind, ParserState};
use crate::stream::{PreviewStream, TokenStream};
use crate::token::{Token, TokenKind};

/// Identifier substituted where a name is missing.
pub const RECOVERED_IDENTIFIER: &str = "Recovered";

/// Everything the resolver knows about a failed checkpoint.
#[derive(Debug)]
pub struct ErrorSite<'a> {
    /// Active rules, innermost last.
    pub states: &'a [ParserState],
    /// Tokens the innermost rule consumed before failing.
    pub consumed: &'a [Token],
    pub token: &'a Token,
    pub kind: ParseErrorKind,
}

impl ErrorSite<'_> {
    /// Innermost active rule.
    pub fn state(&self) -> ParserState {
        self.states.last().copied().unwrap_or(ParserState::RootScope)
    }
}

/// Rewrites the token stream after a parse error.
pub trait ErrorResolver {
    /// Returned when the resolver refuses to recover.
    type Error;

    fn resolve(&mut self, stream: &mut dyn TokenStream, site: &ErrorSite<'_>) -> Result<(), Self::Error>;
}

/// Marker returned by [`FailFast`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Halt;

/// Resolver that refuses every error; bounds speculation to a single level.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailFast;

impl ErrorResolver for FailFast {
    type Error = Halt;

    fn resolve(&mut self, _stream: &mut dyn TokenStream, _site: &ErrorSite<'_>) -> Result<(), Halt> {
        Err(Halt)
    }
}

/// Resolver that always recovers.
#[derive(Debug, Default, Clone, Copy)]
pub struct RecoveringResolver;

impl ErrorResolver for RecoveringResolver {
    type Error = Infallible;

    fn resolve(&mut self, stream: &mut dyn TokenStream, site: &ErrorSite<'_>) -> Result<(), Infallible> {
        let plan = plan(site);

        let repair = if site.token.is_end() {
            Repair::Inject
        } else if let [only] = plan.ranking {
            *only
        } else {
            choose(stream, site, &plan)
        };

        trace!(
            "{:?} in {:?} at {}: {:?} with {:?}",
            site.kind,
            site.state(),
            site.token,
            repair,
            plan.token.text
        );
        apply(stream, repair, plan.token);
        Ok(())
    }
}

/// Stream rewrite applied at the offending token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repair {
    Skip,
    Replace,
    Inject,
}

const SKIP_FIRST: &[Repair] = &[Repair::Skip, Repair::Replace, Repair::Inject];
const INJECT_FIRST: &[Repair] = &[Repair::Inject, Repair::Replace, Repair::Skip];
const INJECT_ONLY: &[Repair] = &[Repair::Inject];
const REPLACE_ONLY: &[Repair] = &[Repair::Replace];

/// Synthetic token and ranked rewrites for one error site.
struct Plan {
    token: Token,
    ranking: &'static [Repair],
}

fn plan(site: &ErrorSite<'_>) -> Plan {
    let at = site.token;
    let synthetic = |kind: TokenKind, text: &str| Token::synthetic(kind, text, at);
    let make = |token: Token, ranking: &'static [Repair]| Plan { token, ranking };

    match (site.state(), site.kind) {
        (_, ParseErrorKind::ExpectedSemicolon) => make(synthetic(TokenKind::Semicolon, ";"), INJECT_ONLY),

        (ParserState::Value, ParseErrorKind::BrokenString) => {
            make(synthetic(TokenKind::String, &format!("{}\"", at.text)), REPLACE_ONLY)
        }
        (ParserState::Value, ParseErrorKind::InvalidNumber) => {
            make(synthetic(TokenKind::Number, "0"), REPLACE_ONLY)
        }
        (ParserState::Value, _) => make(synthetic(TokenKind::Number, "0"), INJECT_FIRST),

        (ParserState::Array, ParseErrorKind::ExpectedLeftBrace) => {
            make(synthetic(TokenKind::LeftBrace, "{"), INJECT_FIRST)
        }
        // Another element follows: the comma went missing.
        (ParserState::Array, ParseErrorKind::ExpectedCommaOrRightBrace) if at.starts_value() => {
            make(synthetic(TokenKind::Comma, ","), INJECT_ONLY)
        }
        (ParserState::Array, _) => make(synthetic(TokenKind::RightBrace, "}"), INJECT_FIRST),

        (_, ParseErrorKind::ExpectedClassKeyword) => make(synthetic(TokenKind::Class, "class"), SKIP_FIRST),
        (_, ParseErrorKind::ExpectedDeleteKeyword) => {
            make(synthetic(TokenKind::Delete, "delete"), SKIP_FIRST)
        }
        (_, ParseErrorKind::ExpectedLeftBrace) => make(synthetic(TokenKind::LeftBrace, "{"), SKIP_FIRST),
        (_, ParseErrorKind::ExpectedRightBrace) => {
            make(synthetic(TokenKind::RightBrace, "}"), SKIP_FIRST)
        }
        (_, ParseErrorKind::ExpectedOperator) => make(synthetic(TokenKind::Assign, "="), SKIP_FIRST),
        (_, ParseErrorKind::ExpectedArrayIdentifier) => make(
            synthetic(TokenKind::Identifier, &format!("{RECOVERED_IDENTIFIER}[]")),
            SKIP_FIRST,
        ),
        _ => make(synthetic(TokenKind::Identifier, RECOVERED_IDENTIFIER), SKIP_FIRST),
    }
}

/// Score every ranked rewrite and keep the best one.
fn choose(stream: &mut dyn TokenStream, site: &ErrorSite<'_>, plan: &Plan) -> Repair {
    let mut best = None;
    for &repair in plan.ranking {
        let score = score(stream, site, repair, &plan.token);
        match best {
            Some((_, top)) if top >= score => {}
            _ => best = Some((repair, score)),
        }
    }
    best.map(|(repair, _)| repair).unwrap_or(Repair::Inject)
}

/// Tokens the active rule consumes on the rewritten stream before failing.
fn score(stream: &mut dyn TokenStream, site: &ErrorSite<'_>, repair: Repair, token: &Token) -> usize {
    let mut prefix = site.consumed.to_vec();
    let skip = match repair {
        Repair::Skip => 1,
        Repair::Replace => {
            prefix.push(token.clone());
            1
        }
        Repair::Inject => {
            prefix.push(token.clone());
            0
        }
    };

    let mut preview = PreviewStream::new(stream, prefix, skip);
    let completed = speculate(site.state(), &mut preview).is_ok();
    let consumed = preview.consumed();

    // The synthetic token itself does not count.
    let score = match repair {
        Repair::Skip => consumed,
        Repair::Replace | Repair::Inject => consumed.saturating_sub(1),
    };
    trace!("  {repair:?}: {score} (completed: {completed})");
    score
}

fn apply(stream: &mut dyn TokenStream, repair: Repair, token: Token) {
    match repair {
        Repair::Skip => {
            stream.consume();
        }
        Repair::Replace => {
            stream.consume();
            stream.inject(token);
        }
        Repair::Inject => stream.inject(token),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn site<'a>(states: &'a [ParserState], consumed: &'a [Token], token: &'a Token, kind: ParseErrorKind) -> ErrorSite<'a> {
        ErrorSite {
            states,
            consumed,
            token,
            kind,
        }
    }

    #[test]
    fn test_fail_fast_halts() {
        let mut lexer = Lexer::from_text("x");
        let token = lexer.peek();
        let states = [ParserState::RootScope];
        let result = FailFast.resolve(&mut lexer, &site(&states, &[], &token, ParseErrorKind::UnexpectedToken));
        assert_eq!(result, Err(Halt));
        assert_eq!(lexer.peek().text, "x");
    }

    #[test]
    fn test_end_of_document_only_injects() {
        let mut lexer = Lexer::from_text("");
        let token = lexer.peek();
        let states = [ParserState::RootScope, ParserState::Class];
        let consumed = vec![
            Token::new(TokenKind::Class, "class", 0, 0, 0),
            Token::new(TokenKind::Identifier, "A", 6, 0, 6),
        ];
        RecoveringResolver
            .resolve(&mut lexer, &site(&states, &consumed, &token, ParseErrorKind::ExpectedLeftBrace))
            .unwrap();
        assert_eq!(lexer.consume().kind, TokenKind::LeftBrace);
        assert!(lexer.consume().is_end());
    }

    #[test]
    fn test_operator_is_injected_before_value() {
        let mut lexer = Lexer::from_text("5;");
        let token = lexer.peek();
        let states = [ParserState::RootScope, ParserState::VariableExpression];
        let consumed = vec![Token::new(TokenKind::Identifier, "a", 0, 0, 0)];
        RecoveringResolver
            .resolve(&mut lexer, &site(&states, &consumed, &token, ParseErrorKind::ExpectedOperator))
            .unwrap();
        assert_eq!(lexer.consume().kind, TokenKind::Assign);
        assert_eq!(lexer.consume().text, "5");
    }

    #[test]
    fn test_garbage_is_skipped_at_root() {
        let mut lexer = Lexer::from_text("} a = 1;");
        let token = lexer.peek();
        let states = [ParserState::RootScope];
        RecoveringResolver
            .resolve(&mut lexer, &site(&states, &[], &token, ParseErrorKind::UnexpectedToken))
            .unwrap();
        assert_eq!(lexer.consume().text, "a");
    }

    #[test]
    fn test_broken_string_gets_closing_quote() {
        let mut lexer = Lexer::from_text("\"open\n;");
        let token = lexer.peek();
        let states = [ParserState::Value];
        RecoveringResolver
            .resolve(&mut lexer, &site(&states, &[], &token, ParseErrorKind::BrokenString))
            .unwrap();
        let repaired = lexer.consume();
        assert_eq!(repaired.kind, TokenKind::String);
        assert_eq!(repaired.text, "\"open\"");
        assert_eq!(lexer.consume().kind, TokenKind::Semicolon);
    }

    #[test]
    fn test_missing_right_brace_in_array_is_injected() {
        let mut lexer = Lexer::from_text("; b = 2;");
        let token = lexer.peek();
        let states = [ParserState::ArrayExpression, ParserState::Array];
        let consumed = vec![
            Token::new(TokenKind::LeftBrace, "{", 0, 0, 0),
            Token::new(TokenKind::Number, "1", 1, 0, 1),
        ];
        RecoveringResolver
            .resolve(
                &mut lexer,
                &site(&states, &consumed, &token, ParseErrorKind::ExpectedCommaOrRightBrace),
            )
            .unwrap();
        assert_eq!(lexer.consume().kind, TokenKind::RightBrace);
        assert_eq!(lexer.consume().kind, TokenKind::Semicolon);
    }
}
