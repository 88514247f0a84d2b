//! Token definitions for node queries
//!
//! Tokenization is handled entirely by logos. Whitespace between tokens is skipped, so the
//! parser only ever sees significant tokens with their byte spans.

use super::QueryError;
use logos::{Lexer, Logos};
use std::ops::Range;

/// Token with its byte span in the query source
pub(crate) type TokenLocation = (QueryToken, Range<usize>);

fn unquote(lex: &mut Lexer<QueryToken>) -> String {
    let quoted = lex.slice();
    quoted[1..quoted.len() - 1].to_string()
}

fn name(lex: &mut Lexer<QueryToken>) -> String {
    lex.slice().to_string()
}

#[derive(Logos, Debug, PartialEq, Eq, Clone)]
#[logos(skip r"[ \t\r\n\f]+")]
pub(crate) enum QueryToken {
    // Axes
    #[token("//")]
    DoubleSlash,
    #[token("/")]
    Slash,

    #[token("*")]
    Star,
    #[token("[")]
    OpenBracket,
    #[token("]")]
    CloseBracket,
    #[token("@")]
    At,
    #[token("=")]
    Equals,
    #[token("(")]
    OpenParen,
    #[token(")")]
    CloseParen,
    #[token(",")]
    Comma,

    #[token("contains")]
    Contains,

    // Tag and attribute names
    #[regex(r"[A-Za-z_][A-Za-z0-9_:\-]*", name)]
    Name(String),

    // Single or double quoted, no escapes
    #[regex(r#""[^"]*"|'[^']*'"#, unquote)]
    Literal(String),
}

/// Tokenize a query, keeping spans for error offsets.
pub(crate) fn tokenize_with_spans(source: &str) -> Result<Vec<TokenLocation>, QueryError> {
    let mut lexer = QueryToken::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(token) => tokens.push((token, span)),
            Err(()) if lexer.slice().starts_with(['"', '\'']) => {
                return Err(QueryError::UnterminatedString {
                    offset: span.start,
                    query: source.to_string(),
                });
            }
            Err(()) => {
                return Err(QueryError::Expected {
                    expected: "a query token",
                    offset: span.start,
                    query: source.to_string(),
                });
            }
        }
    }

    Ok(tokens)
}
