use crate::parse::{ParseError, SrcSpan};
use logos::{self, Logos};

//===========================================================================//

#[derive(Clone, Debug, Default, PartialEq)]
enum LexerError {
    #[default]
    InvalidToken,
    IntOverflow,
}

//===========================================================================//

fn int_literal_callback(
    lexer: &mut logos::Lexer<TokenKind>,
) -> Result<u64, LexerError> {
    let digits: String =
        lexer.slice().chars().filter(|&chr| chr != '_').collect();
    let result = if let Some(hex) = digits.strip_prefix("0x") {
        u64::from_str_radix(hex, 16)
    } else if let Some(bin) = digits.strip_prefix("0b") {
        u64::from_str_radix(bin, 2)
    } else {
        digits.parse::<u64>()
    };
    result.map_err(|_| LexerError::IntOverflow)
}

#[derive(Debug, Eq, Logos, PartialEq)]
#[logos(error = LexerError)]
#[logos(skip r"[ \t\r]+")] // whitespace
#[logos(skip r";[^\n]*")] // comments
enum TokenKind {
    #[token("}")]
    BraceClose,
    #[token("{")]
    BraceOpen,
    #[token(",")]
    Comma,
    #[regex(r"[_A-Za-z][_A-Za-z0-9]*")]
    Identifier,
    #[regex(r"0x[0-9A-Fa-f_]+", int_literal_callback)]
    #[regex(r"0b[01_]+", int_literal_callback)]
    #[regex(r"[0-9][0-9_]*", int_literal_callback)]
    IntLiteral(u64),
    #[token("\n")]
    Linebreak,
}

impl TokenKind {
    fn into_token(self, lexer: &logos::Lexer<TokenKind>) -> Token {
        let span = SrcSpan::from_byte_range(lexer.span());
        let value = match self {
            TokenKind::BraceClose => TokenValue::BraceClose,
            TokenKind::BraceOpen => TokenValue::BraceOpen,
            TokenKind::Comma => TokenValue::Comma,
            TokenKind::Identifier => {
                TokenValue::Identifier(lexer.slice().to_string())
            }
            TokenKind::IntLiteral(value) => TokenValue::IntLiteral(value),
            TokenKind::Linebreak => TokenValue::Linebreak,
        };
        Token { span, value }
    }
}

//===========================================================================//

/// The contents of a single lexical token.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TokenValue {
    /// A "`}`" symbol.
    BraceClose,
    /// A "`{`" symbol.
    BraceOpen,
    /// A "`,`" symbol.
    Comma,
    /// An identifier or keyword.
    Identifier(String),
    /// An integer literal.
    IntLiteral(u64),
    /// A linebreak.
    Linebreak,
}

impl TokenValue {
    /// Returns the human-readable name for this kind of token.
    pub fn name(&self) -> &'static str {
        match self {
            TokenValue::BraceClose => "close brace",
            TokenValue::BraceOpen => "open brace",
            TokenValue::Comma => "comma",
            TokenValue::Identifier(_) => "identifier",
            TokenValue::IntLiteral(_) => "int literal",
            TokenValue::Linebreak => "linebreak",
        }
    }
}

//===========================================================================//

/// A single lexical token, including location information.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Token {
    /// The location in the file of the token.
    pub span: SrcSpan,
    /// The contents of the token.
    pub value: TokenValue,
}

//===========================================================================//

/// A lexer for tokenizing an input file.
pub struct TokenLexer<'a> {
    lexer: logos::Lexer<'a, TokenKind>,
}

impl<'a> TokenLexer<'a> {
    /// Constructs a new lexer in its initial state.
    pub fn new(input: &'a str) -> TokenLexer<'a> {
        TokenLexer { lexer: TokenKind::lexer(input) }
    }
}

impl Iterator for TokenLexer<'_> {
    type Item = Result<Token, ParseError>;

    fn next(&mut self) -> Option<Result<Token, ParseError>> {
        let result = self.lexer.next()?;
        let span = SrcSpan::from_byte_range(self.lexer.span());
        Some(match result {
            Ok(kind) => Ok(kind.into_token(&self.lexer)),
            Err(LexerError::InvalidToken) => {
                let message = format!(
                    "invalid character: {}",
                    self.lexer.slice().escape_debug()
                );
                Err(ParseError::new(span, message))
            }
            Err(LexerError::IntOverflow) => {
                let message = format!(
                    "integer literal {} is too large",
                    self.lexer.slice()
                );
                Err(ParseError::new(span, message))
            }
        })
    }
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::{Token, TokenLexer, TokenValue};
    use crate::parse::{ParseError, SrcSpan};

    fn token(start: usize, end: usize, value: TokenValue) -> Token {
        Token { span: SrcSpan::from_byte_range(start..end), value }
    }

    fn read_all(input: &str) -> Vec<Token> {
        TokenLexer::new(input).collect::<Result<_, _>>().unwrap()
    }

    fn expect_error(input: &str) -> ParseError {
        for result in TokenLexer::new(input) {
            if let Err(error) = result {
                return error;
            }
        }
        panic!("no error occurred");
    }

    #[test]
    fn empty_input() {
        assert_eq!(read_all(""), vec![]);
    }

    #[test]
    fn comment() {
        assert_eq!(read_all(";;; Hello, world!"), vec![]);
    }

    #[test]
    fn linebreak() {
        assert_eq!(read_all("\n"), vec![token(0, 1, TokenValue::Linebreak)]);
    }

    #[test]
    fn int_literals() {
        assert_eq!(
            read_all("42 0x2A 0b1_0 1_000"),
            vec![
                token(0, 2, TokenValue::IntLiteral(42)),
                token(3, 7, TokenValue::IntLiteral(42)),
                token(8, 13, TokenValue::IntLiteral(2)),
                token(14, 19, TokenValue::IntLiteral(1000)),
            ]
        );
    }

    #[test]
    fn statement_tokens() {
        assert_eq!(
            read_all("write 7, read ; both\nrepeat 2 {"),
            vec![
                token(0, 5, TokenValue::Identifier("write".to_string())),
                token(6, 7, TokenValue::IntLiteral(7)),
                token(7, 8, TokenValue::Comma),
                token(9, 13, TokenValue::Identifier("read".to_string())),
                token(20, 21, TokenValue::Linebreak),
                token(21, 27, TokenValue::Identifier("repeat".to_string())),
                token(28, 29, TokenValue::IntLiteral(2)),
                token(30, 31, TokenValue::BraceOpen),
            ]
        );
    }

    #[test]
    fn int_overflow() {
        let error = expect_error("write 0x1_0000_0000_0000_0000");
        assert_eq!(error.span, SrcSpan::from_byte_range(6..29));
        assert_eq!(
            error.message,
            "integer literal 0x1_0000_0000_0000_0000 is too large"
        );
    }

    #[test]
    fn invalid_token() {
        let error = expect_error("write $12");
        assert_eq!(error.span, SrcSpan::from_byte_range(6..7));
        assert_eq!(error.message, "invalid character: $");
    }
}

//===========================================================================//
