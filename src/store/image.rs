//! Loaders for the initial contents of read-only stores.

use crate::parse::{ParseError, ParseResult, SrcSpan};
use crate::word::{Word, WordWidth};
use byteorder::{BigEndian, LittleEndian, ReadBytesExt};
use logos::Logos;
use std::io::{self, Read};

//===========================================================================//

macro_rules! invalid_data {
    ($e:expr) => {
        return Err(::std::io::Error::new(::std::io::ErrorKind::InvalidData,
                                         $e))
    };
    ($fmt:expr, $($arg:tt)+) => {
        return Err(::std::io::Error::new(::std::io::ErrorKind::InvalidData,
                                         format!($fmt, $($arg)+)))
    };
}

//===========================================================================//

#[derive(Clone, Debug, Default, PartialEq)]
enum HexLexError {
    #[default]
    InvalidToken,
    UnterminatedComment,
}

fn block_comment_callback(
    lexer: &mut logos::Lexer<HexToken>,
) -> Result<logos::Skip, HexLexError> {
    if let Some(end) = lexer.remainder().find("*/") {
        lexer.bump(end + 2);
        Ok(logos::Skip)
    } else {
        lexer.bump(lexer.remainder().len());
        Err(HexLexError::UnterminatedComment)
    }
}

#[derive(Debug, Eq, Logos, PartialEq)]
#[logos(error = HexLexError)]
#[logos(skip r"[ \t\r\n\f]+")] // whitespace
#[logos(skip r"//[^\n]*")] // line comments
enum HexToken {
    #[regex(r"@[0-9A-Fa-f][0-9A-Fa-f_]*")]
    Address,
    #[token("/*", block_comment_callback)]
    BlockComment,
    #[regex(r"[0-9A-Fa-f][0-9A-Fa-f_]*")]
    Value,
}

fn parse_hex(digits: &str) -> Option<u64> {
    let digits: String = digits.chars().filter(|&chr| chr != '_').collect();
    u64::from_str_radix(&digits, 16).ok()
}

//===========================================================================//

/// The largest hex image, in words, that [`load_hex_image`] will build.
pub const MAX_HEX_IMAGE_WORDS: usize = 1 << 24;

/// Parses a `$readmemh`-style hex image.
///
/// The image is a sequence of whitespace-separated hexadecimal words, which
/// are loaded at consecutive addresses starting from zero.  An `@` followed
/// by a hexadecimal address moves the load address; any skipped words are
/// zero-filled.  `//` line comments and `/* */` block comments are ignored.
/// Words at or beyond `limit`, or beyond [`MAX_HEX_IMAGE_WORDS`], are
/// rejected.
pub fn load_hex_image(
    source: &str,
    width: WordWidth,
    limit: usize,
) -> ParseResult<Vec<Word>> {
    let limit = limit.min(MAX_HEX_IMAGE_WORDS);
    let mut words = Vec::<Word>::new();
    let mut errors = Vec::<ParseError>::new();
    let mut addr: usize = 0;
    let mut lexer = HexToken::lexer(source);
    while let Some(result) = lexer.next() {
        let span = SrcSpan::from_byte_range(lexer.span());
        match result {
            Ok(HexToken::Address) => match parse_hex(&lexer.slice()[1..]) {
                Some(value) if value < limit as u64 => addr = value as usize,
                _ => {
                    let message = format!(
                        "address {} is beyond the image limit of {limit} \
                         words",
                        lexer.slice()
                    );
                    errors.push(ParseError::new(span, message));
                }
            },
            Ok(HexToken::BlockComment) => {}
            Ok(HexToken::Value) => {
                let slice = lexer.slice();
                let value = match parse_hex(slice) {
                    Some(value) if width.fits(value) => value,
                    _ => {
                        let message = format!(
                            "value {slice} does not fit in a {width} word"
                        );
                        errors.push(ParseError::new(span, message));
                        addr += 1;
                        continue;
                    }
                };
                if addr >= limit {
                    let message = format!(
                        "word at address {addr:#x} is beyond the image limit \
                         of {limit} words"
                    );
                    errors.push(ParseError::new(span, message));
                    continue;
                }
                if words.len() <= addr {
                    words.resize(addr + 1, 0);
                }
                words[addr] = value;
                addr += 1;
            }
            Err(HexLexError::InvalidToken) => {
                let message = format!(
                    "invalid character: {}",
                    lexer.slice().escape_debug()
                );
                errors.push(ParseError::new(span, message));
            }
            Err(HexLexError::UnterminatedComment) => {
                let message = "unterminated block comment".to_string();
                errors.push(ParseError::new(span, message));
            }
        }
    }
    if errors.is_empty() { Ok(words) } else { Err(errors) }
}

//===========================================================================//

/// The byte order of words in a binary image.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Endian {
    /// Most significant byte first.
    Big,
    /// Least significant byte first.
    Little,
}

/// Reads a raw binary image, in which each word occupies
/// [`WordWidth::bytes`] bytes in the given byte order.
pub fn load_binary_image<R: Read>(
    mut reader: R,
    width: WordWidth,
    endian: Endian,
) -> io::Result<Vec<Word>> {
    let mut data = Vec::<u8>::new();
    reader.read_to_end(&mut data)?;
    let word_size = width.bytes();
    if data.len() % word_size != 0 {
        invalid_data!(
            "image length of {} bytes is not a multiple of the {}-byte word \
             size",
            data.len(),
            word_size
        );
    }
    let mut bytes = data.as_slice();
    let mut words = Vec::<Word>::with_capacity(data.len() / word_size);
    while !bytes.is_empty() {
        let value = match endian {
            Endian::Big => bytes.read_uint::<BigEndian>(word_size)?,
            Endian::Little => bytes.read_uint::<LittleEndian>(word_size)?,
        };
        if !width.fits(value) {
            invalid_data!(
                "word {:#x} at address {:#x} does not fit in a {} word",
                value,
                words.len(),
                width
            );
        }
        words.push(value);
    }
    Ok(words)
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::{
        Endian, MAX_HEX_IMAGE_WORDS, load_binary_image, load_hex_image,
    };
    use crate::parse::SrcSpan;
    use crate::word::WordWidth;
    use std::io;

    fn width(bits: u32) -> WordWidth {
        WordWidth::new(bits).unwrap()
    }

    #[test]
    fn hex_words() {
        assert_eq!(
            load_hex_image("01 2a\nff\n", width(8), 16),
            Ok(vec![0x01, 0x2a, 0xff])
        );
    }

    #[test]
    fn hex_comments_and_underscores() {
        let source = "// header\n12_34 /* skip\n this */ abcd // tail\n";
        assert_eq!(
            load_hex_image(source, width(16), 16),
            Ok(vec![0x1234, 0xabcd])
        );
    }

    #[test]
    fn hex_address_directive() {
        assert_eq!(
            load_hex_image("1 @4 5 6 @1 7", width(8), 16),
            Ok(vec![1, 7, 0, 0, 5, 6])
        );
    }

    #[test]
    fn hex_value_too_wide() {
        let errors = load_hex_image("ff 100", width(8), 16).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].span, SrcSpan::from_byte_range(3..6));
        assert_eq!(errors[0].message, "value 100 does not fit in a 8-bit word");
    }

    #[test]
    fn hex_beyond_limit() {
        let errors = load_hex_image("1 2 3", width(8), 2).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].span, SrcSpan::from_byte_range(4..5));
        let errors = load_hex_image("@10 1", width(8), 4).unwrap_err();
        assert_eq!(errors[0].span, SrcSpan::from_byte_range(0..3));
    }

    #[test]
    fn hex_far_address_is_capped() {
        let errors =
            load_hex_image("@7fffffff 1", width(8), usize::MAX).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].span, SrcSpan::from_byte_range(0..9));
        assert_eq!(
            errors[0].message,
            format!(
                "address @7fffffff is beyond the image limit of {} words",
                MAX_HEX_IMAGE_WORDS
            )
        );
    }

    #[test]
    fn hex_invalid_character() {
        let errors = load_hex_image("12 zz", width(8), 16).unwrap_err();
        assert_eq!(errors[0].span, SrcSpan::from_byte_range(3..4));
        assert_eq!(errors[0].message, "invalid character: z");
    }

    #[test]
    fn hex_unterminated_comment() {
        let errors = load_hex_image("12 /* oops", width(8), 16).unwrap_err();
        assert_eq!(errors[0].message, "unterminated block comment");
    }

    #[test]
    fn binary_big_endian() {
        let data: &[u8] = &[0x12, 0x34, 0x0a, 0xbc];
        assert_eq!(
            load_binary_image(data, width(16), Endian::Big).unwrap(),
            vec![0x1234, 0x0abc]
        );
    }

    #[test]
    fn binary_little_endian() {
        let data: &[u8] = &[0x12, 0x04, 0x0a, 0x0b];
        assert_eq!(
            load_binary_image(data, width(12), Endian::Little).unwrap(),
            vec![0x0412, 0x0b0a]
        );
    }

    #[test]
    fn binary_partial_word() {
        let data: &[u8] = &[0x12, 0x34, 0x56];
        let error =
            load_binary_image(data, width(16), Endian::Big).unwrap_err();
        assert_eq!(error.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn binary_word_too_wide() {
        let data: &[u8] = &[0x10, 0x00];
        let error =
            load_binary_image(data, width(12), Endian::Big).unwrap_err();
        assert_eq!(error.kind(), io::ErrorKind::InvalidData);
        assert_eq!(
            error.to_string(),
            "word 0x1000 at address 0x0 does not fit in a 12-bit word"
        );
    }
}

//===========================================================================//
