//! Facilities for parsing FIFO bench scripts.

use super::atom::{
    IntAst, PError, keyword, linebreak, parse_tokens, symbol, tokenize,
};
use super::lex::{Token, TokenValue};
use super::types::{ParseResult, SrcSpan};
use chumsky::{self, IterParser, Parser};

//===========================================================================//

/// The abstract syntax tree for a bench script.
#[derive(Debug, Eq, PartialEq)]
pub struct BenchScriptAst {
    /// The top-level statements in the script.
    pub statements: Vec<BenchStmtAst>,
}

impl BenchScriptAst {
    /// Parses a bench script.
    pub fn parse_source(source: &str) -> ParseResult<BenchScriptAst> {
        let tokens = tokenize(source)?;
        parse_tokens(BenchScriptAst::parser(), &tokens)
    }

    fn parser<'a>()
    -> impl Parser<'a, &'a [Token], BenchScriptAst, PError<'a>> {
        symbol(TokenValue::Linebreak)
            .repeated()
            .ignore_then(BenchStmtAst::parser().repeated().collect::<Vec<_>>())
            .map(|statements| BenchScriptAst { statements })
    }
}

//===========================================================================//

/// The abstract syntax tree for a single statement in a bench script.
#[derive(Debug, Eq, PartialEq)]
pub enum BenchStmtAst {
    /// One clock cycle with the given requests asserted.
    Cycle(Vec<ActionAst>),
    /// An `expect` statement.
    Expect(ExpectAst),
    /// Some number of clock cycles (one, if unspecified) with no requests,
    /// along with the location of the `idle` keyword.
    Idle(SrcSpan, Option<IntAst>),
    /// A `repeat` block.
    Repeat(IntAst, Vec<BenchStmtAst>),
}

impl BenchStmtAst {
    fn parser<'a>()
    -> impl Parser<'a, &'a [Token], BenchStmtAst, PError<'a>> + Clone {
        chumsky::prelude::recursive(|statement| {
            let cycle = ActionAst::parser()
                .separated_by(symbol(TokenValue::Comma))
                .at_least(1)
                .collect::<Vec<_>>()
                .then_ignore(linebreak())
                .map(BenchStmtAst::Cycle);
            let expect = ExpectAst::parser()
                .then_ignore(linebreak())
                .map(BenchStmtAst::Expect);
            let idle = keyword("idle")
                .then(IntAst::parser().or_not())
                .then_ignore(linebreak())
                .map(|(token, count): (Token, Option<IntAst>)| {
                    BenchStmtAst::Idle(token.span, count)
                });
            let repeat = keyword("repeat")
                .ignore_then(IntAst::operand_parser())
                .then_ignore(symbol(TokenValue::BraceOpen))
                .then_ignore(linebreak())
                .then(statement.repeated().collect::<Vec<_>>())
                .then_ignore(symbol(TokenValue::BraceClose))
                .then_ignore(linebreak())
                .map(|(count, body)| BenchStmtAst::Repeat(count, body));
            chumsky::prelude::choice((cycle, expect, idle, repeat))
                .labelled("statement")
        })
    }
}

//===========================================================================//

/// One request asserted during a clock cycle.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ActionAst {
    /// The location in the source code where this request appears.
    pub span: SrcSpan,
    /// The request itself.
    pub node: ActionAstNode,
}

impl ActionAst {
    fn parser<'a>()
    -> impl Parser<'a, &'a [Token], ActionAst, PError<'a>> + Clone {
        let reset = keyword("reset").map(|token: Token| ActionAst {
            span: token.span,
            node: ActionAstNode::Reset,
        });
        let read = keyword("read").map(|token: Token| ActionAst {
            span: token.span,
            node: ActionAstNode::Read,
        });
        let write = keyword("write").then(IntAst::operand_parser()).map(
            |(token, data): (Token, IntAst)| ActionAst {
                span: token.span.merged_with(data.span),
                node: ActionAstNode::Write(data),
            },
        );
        chumsky::prelude::choice((reset, read, write)).labelled("request")
    }
}

/// The kinds of request that can be asserted during a clock cycle.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ActionAstNode {
    /// Assert the read request.
    Read,
    /// Assert reset.
    Reset,
    /// Assert the write request, with the given data.
    Write(IntAst),
}

//===========================================================================//

/// The abstract syntax tree for an `expect` statement.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ExpectAst {
    /// The location in the source code of the statement.
    pub span: SrcSpan,
    /// The output signal to check, and its expected value.
    pub check: CheckAst,
}

impl ExpectAst {
    fn parser<'a>()
    -> impl Parser<'a, &'a [Token], ExpectAst, PError<'a>> + Clone {
        let boolean = chumsky::prelude::choice((
            keyword("true").map(|token: Token| (token.span, true)),
            keyword("false").map(|token: Token| (token.span, false)),
        ));
        let flag = |name: &'static str, node: fn(bool) -> CheckAst| {
            keyword(name).then(boolean.clone().or_not()).map(
                move |(token, value): (Token, Option<(SrcSpan, bool)>)| {
                    match value {
                        Some((span, value)) => {
                            (token.span.merged_with(span), node(value))
                        }
                        None => (token.span, node(true)),
                    }
                },
            )
        };
        let number = |name: &'static str, node: fn(IntAst) -> CheckAst| {
            keyword(name).then(IntAst::operand_parser()).map(
                move |(token, int): (Token, IntAst)| {
                    (token.span.merged_with(int.span), node(int))
                },
            )
        };
        keyword("expect")
            .then(
                chumsky::prelude::choice((
                    flag("full", CheckAst::Full),
                    flag("empty", CheckAst::Empty),
                    number("occupancy", CheckAst::Occupancy),
                    number("data", CheckAst::Data),
                ))
                .labelled("output signal"),
            )
            .map(|(token, (span, check)): (Token, (SrcSpan, CheckAst))| {
                ExpectAst { span: token.span.merged_with(span), check }
            })
    }
}

/// An output signal to check, and its expected value.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CheckAst {
    /// The `data_out` signal.
    Data(IntAst),
    /// The `empty` flag.
    Empty(bool),
    /// The `full` flag.
    Full(bool),
    /// The occupancy count.
    Occupancy(IntAst),
}

//===========================================================================//


//===========================================================================//
