//! Facilities for parsing bench scripts.

mod atom;
mod lex;
mod script;
mod types;

pub use atom::IntAst;
pub use lex::{Token, TokenLexer, TokenValue};
pub use script::{
    ActionAst, ActionAstNode, BenchScriptAst, BenchStmtAst, CheckAst,
    ExpectAst,
};
pub use types::{ParseError, ParseErrorLabel, ParseResult, SrcSpan};

//===========================================================================//
