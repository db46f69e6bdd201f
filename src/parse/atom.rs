use super::lex::{Token, TokenLexer, TokenValue};
use super::types::{ParseError, ParseResult, SrcSpan};
use chumsky::{self, Parser};

//===========================================================================//

/// The error type used for `chumsky::Parser`s in this crate.
pub(crate) type PError<'a> =
    chumsky::extra::Err<chumsky::error::Rich<'a, Token>>;

//===========================================================================//

/// An integer literal, with its location.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct IntAst {
    /// The location in the source code where this literal appears.
    pub span: SrcSpan,
    /// The value of the literal.
    pub value: u64,
}

impl IntAst {
    pub(crate) fn parser<'a>()
    -> impl Parser<'a, &'a [Token], IntAst, PError<'a>> + Clone {
        chumsky::prelude::any()
            .try_map(|token: Token, span| {
                if let TokenValue::IntLiteral(value) = token.value {
                    Ok(IntAst { span: token.span, value })
                } else {
                    let message = format!(
                        "expected integer, found {}",
                        token.value.name()
                    );
                    Err(chumsky::error::Rich::custom(span, message))
                }
            })
            .labelled("integer literal")
    }

    /// Parses the required integer operand of a statement.  A missing
    /// operand is reported at the token found in its place, and the
    /// statement still parses (with a dummy value) so that the rest of the
    /// script can be checked.
    pub(crate) fn operand_parser<'a>()
    -> impl Parser<'a, &'a [Token], IntAst, PError<'a>> + Clone {
        chumsky::prelude::any()
            .rewind()
            .then(IntAst::parser().or_not())
            .validate(|(next, int): (Token, Option<IntAst>), extra, emitter| {
                match int {
                    Some(int) => int,
                    None => {
                        let message = format!(
                            "expected integer, found {}",
                            next.value.name()
                        );
                        emitter.emit(chumsky::error::Rich::custom(
                            extra.span(),
                            message,
                        ));
                        IntAst { span: next.span, value: 0 }
                    }
                }
            })
    }
}

//===========================================================================//

pub(crate) fn keyword<'a>(
    word: &'static str,
) -> impl Parser<'a, &'a [Token], Token, PError<'a>> + Clone {
    chumsky::prelude::any()
        .filter(move |token: &Token| {
            if let TokenValue::Identifier(id) = &token.value {
                id == word
            } else {
                false
            }
        })
        .labelled(word)
}

pub(crate) fn linebreak<'a>()
-> impl Parser<'a, &'a [Token], (), PError<'a>> + Clone {
    symbol(TokenValue::Linebreak).repeated().at_least(1)
}

pub(crate) fn symbol<'a>(
    value: TokenValue,
) -> impl Parser<'a, &'a [Token], Token, PError<'a>> + Clone {
    let name = value.name();
    chumsky::prelude::any()
        .filter(move |token: &Token| token.value == value)
        .labelled(name)
}

//===========================================================================//

/// Splits source code into tokens.  If the source doesn't end with a
/// linebreak, one is added, so that every statement is terminated.
pub(crate) fn tokenize(source: &str) -> ParseResult<Vec<Token>> {
    let mut tokens: Vec<Token> = TokenLexer::new(source)
        .collect::<Result<_, _>>()
        .map_err(|error| vec![error])?;
    if let Some(last) = tokens.last() {
        if last.value != TokenValue::Linebreak {
            let span = last.span.end_span();
            tokens.push(Token { span, value: TokenValue::Linebreak });
        }
    }
    Ok(tokens)
}

/// Runs a parser over a complete token stream, converting any errors into
/// [`ParseError`]s located in the source text.
pub(crate) fn parse_tokens<'a, T>(
    parser: impl Parser<'a, &'a [Token], T, PError<'a>>,
    tokens: &'a [Token],
) -> ParseResult<T> {
    parser.parse(tokens).into_result().map_err(|errors| {
        errors
            .into_iter()
            .map(|error| {
                let index = error.span().start;
                let span = match tokens.get(index) {
                    Some(token) => token.span,
                    None => tokens.last().map_or(
                        SrcSpan::from_byte_range(0..0),
                        |token| token.span.end_span(),
                    ),
                };
                ParseError::new(span, error_message(&error))
            })
            .collect()
    })
}

fn error_message(error: &chumsky::error::Rich<'_, Token>) -> String {
    if let chumsky::error::RichReason::Custom(message) = error.reason() {
        return message.clone();
    }
    match error.found() {
        Some(token) => format!("unexpected {}", token.value.name()),
        None => "unexpected end of input".to_string(),
    }
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::tokenize;
    use crate::parse::{SrcSpan, TokenValue};

    #[test]
    fn tokenize_adds_final_linebreak() {
        let tokens = tokenize("read").unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].value, TokenValue::Linebreak);
        assert_eq!(tokens[1].span, SrcSpan::from_byte_range(4..4));
    }

    #[test]
    fn tokenize_keeps_existing_linebreak() {
        assert_eq!(tokenize("read\n").unwrap().len(), 2);
        assert!(tokenize("").unwrap().is_empty());
    }
}

//===========================================================================//
