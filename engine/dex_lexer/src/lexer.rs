//! The pull lexer.
//!
//! One token per [`Lexer::next_token`] call; [`TokenKind::Eof`] repeats
//! forever once reached. The previous token's kind is explicit scanner
//! state — it drives the unary/binary disambiguation of `-`.

use crate::class::{classify, CharClass};
use crate::error::LexError;
use dex_ir::{OpKind, Span, Token, TokenKind};

/// Maximum accepted input length in bytes.
///
/// Token offsets must fit a 16-bit signed value; longer input is rejected
/// before any scanning begins.
pub const MAX_SOURCE_LEN: usize = i16::MAX as usize;

/// Pull scanner over expression source.
pub struct Lexer<'src> {
    src: &'src [u8],
    /// Byte offset of the current character.
    pos: usize,
    /// Current byte, 0 once the input is exhausted.
    ch: u8,
    /// Kind of the previously emitted token. Seeds as `Eof` so a leading
    /// `-` is unary.
    prev_kind: TokenKind,
}

impl<'src> Lexer<'src> {
    /// Create a lexer, rejecting oversized input up front.
    pub fn new(source: &'src str) -> Result<Self, LexError> {
        if source.len() >= MAX_SOURCE_LEN {
            return Err(LexError::InputTooLong { len: source.len() });
        }
        let src = source.as_bytes();
        Ok(Lexer {
            src,
            pos: 0,
            ch: src.first().copied().unwrap_or(0),
            prev_kind: TokenKind::Eof,
        })
    }

    /// Produce the next token.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let start = self.offset();
        let tok = match classify(self.ch) {
            CharClass::Operator => self.operator(start),
            CharClass::LParen => Token::new(TokenKind::LParen, "(", Span::new(start, start + 1)),
            CharClass::RParen => Token::new(TokenKind::RParen, ")", Span::new(start, start + 1)),
            CharClass::Comma => Token::new(TokenKind::Comma, ",", Span::new(start, start + 1)),
            CharClass::Digit => {
                let tok = self.read_number();
                self.prev_kind = tok.kind;
                return tok;
            }
            CharClass::Letter => {
                let mut tok = self.read_identifier();
                // An identifier directly followed by `(` names a function.
                if classify(self.ch) == CharClass::LParen {
                    tok.kind = TokenKind::Function;
                }
                self.prev_kind = tok.kind;
                return tok;
            }
            CharClass::Eof => Token::new(TokenKind::Eof, "", Span::point(start)),
            CharClass::Invalid | CharClass::Dot => Token::new(
                TokenKind::Illegal(self.ch),
                (self.ch as char).to_string(),
                Span::new(start, start + 1),
            ),
            // skip_whitespace never leaves the cursor on whitespace.
            CharClass::Whitespace => unreachable!("whitespace consumed before dispatch"),
        };

        self.next_char();
        self.prev_kind = tok.kind;
        tok
    }

    /// Collect all tokens up to end of input.
    ///
    /// An illegal byte aborts the scan with [`LexError::IllegalByte`].
    /// The terminal `Eof` token is not included.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token();
            match tok.kind {
                TokenKind::Eof => break,
                TokenKind::Illegal(byte) => {
                    return Err(LexError::IllegalByte {
                        byte,
                        offset: tok.span.start,
                    });
                }
                _ => tokens.push(tok),
            }
        }
        Ok(tokens)
    }

    fn operator(&mut self, start: u32) -> Token {
        let span = Span::new(start, start + 1);
        let kind = match self.ch {
            b'+' => TokenKind::Op(OpKind::Add),
            b'-' if self.prev_kind.minus_is_unary_after() => TokenKind::UnaryOp(OpKind::Sub),
            b'-' => TokenKind::Op(OpKind::Sub),
            b'*' => TokenKind::Op(OpKind::Mul),
            b'/' => TokenKind::Op(OpKind::Div),
            b'%' => TokenKind::Op(OpKind::Rem),
            // The classifier admits exactly the six operator bytes.
            _ => TokenKind::Op(OpKind::Pow),
        };
        Token::new(kind, (self.ch as char).to_string(), span)
    }

    /// Consume a run of digits with at most one decimal point.
    ///
    /// The digits accumulate with the point elided; the fractional-digit
    /// count is tracked as the literal's scale. A second point ends the
    /// literal rather than being consumed.
    fn read_number(&mut self) -> Token {
        let start = self.offset();
        let mut digits = String::new();
        let mut scale: u16 = 0;
        let mut seen_dot = false;

        loop {
            match classify(self.ch) {
                CharClass::Digit => {
                    digits.push(self.ch as char);
                    if seen_dot {
                        scale += 1;
                    }
                    self.next_char();
                }
                CharClass::Dot if !seen_dot => {
                    seen_dot = true;
                    self.next_char();
                }
                _ => break,
            }
        }

        let kind = if seen_dot {
            TokenKind::Float { scale }
        } else {
            TokenKind::Int
        };
        Token::new(kind, digits, Span::new(start, self.offset()))
    }

    fn read_identifier(&mut self) -> Token {
        let start = self.offset();
        let mut name = String::new();

        while matches!(classify(self.ch), CharClass::Letter | CharClass::Digit) {
            name.push(self.ch as char);
            self.next_char();
        }

        Token::new(TokenKind::Ident, name, Span::new(start, self.offset()))
    }

    fn skip_whitespace(&mut self) {
        while classify(self.ch) == CharClass::Whitespace {
            self.next_char();
        }
    }

    fn next_char(&mut self) {
        if self.pos < self.src.len() {
            self.pos += 1;
        }
        self.ch = self.src.get(self.pos).copied().unwrap_or(0);
    }

    #[allow(
        clippy::cast_possible_truncation,
        reason = "pos is capped by MAX_SOURCE_LEN which fits in u32"
    )]
    fn offset(&self) -> u32 {
        self.pos as u32
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests panic on unexpected state")]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds_and_texts(source: &str) -> Vec<(TokenKind, String)> {
        let mut lexer = Lexer::new(source).unwrap();
        lexer
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|tok| (tok.kind, tok.text))
            .collect()
    }

    #[test]
    fn simple_addition() {
        let mut lexer = Lexer::new("5+10").unwrap();
        let tokens = lexer.tokenize().unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::new(TokenKind::Int, "5", Span::new(0, 1)),
                Token::new(TokenKind::Op(OpKind::Add), "+", Span::new(1, 2)),
                Token::new(TokenKind::Int, "10", Span::new(2, 4)),
            ]
        );
    }

    #[test]
    fn whitespace_between_tokens() {
        let mut lexer = Lexer::new("5 + 10").unwrap();
        let tokens = lexer.tokenize().unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::new(TokenKind::Int, "5", Span::new(0, 1)),
                Token::new(TokenKind::Op(OpKind::Add), "+", Span::new(2, 3)),
                Token::new(TokenKind::Int, "10", Span::new(4, 6)),
            ]
        );
    }

    #[test]
    fn float_literal_tracks_scale() {
        let mut lexer = Lexer::new("5.10").unwrap();
        let tokens = lexer.tokenize().unwrap();
        assert_eq!(
            tokens,
            vec![Token::new(
                TokenKind::Float { scale: 2 },
                "510",
                Span::new(0, 4)
            )]
        );
    }

    #[test]
    fn identifier_vs_function_call() {
        assert_eq!(
            kinds_and_texts("var1 + var2(1,432.5)"),
            vec![
                (TokenKind::Ident, "var1".to_string()),
                (TokenKind::Op(OpKind::Add), "+".to_string()),
                (TokenKind::Function, "var2".to_string()),
                (TokenKind::LParen, "(".to_string()),
                (TokenKind::Int, "1".to_string()),
                (TokenKind::Comma, ",".to_string()),
                (TokenKind::Float { scale: 1 }, "4325".to_string()),
                (TokenKind::RParen, ")".to_string()),
            ]
        );
    }

    #[test]
    fn leading_minus_is_unary() {
        assert_eq!(
            kinds_and_texts("-5.10"),
            vec![
                (TokenKind::UnaryOp(OpKind::Sub), "-".to_string()),
                (TokenKind::Float { scale: 2 }, "510".to_string()),
            ]
        );
    }

    #[test]
    fn minus_after_operator_is_unary() {
        assert_eq!(
            kinds_and_texts("5 + -10"),
            vec![
                (TokenKind::Int, "5".to_string()),
                (TokenKind::Op(OpKind::Add), "+".to_string()),
                (TokenKind::UnaryOp(OpKind::Sub), "-".to_string()),
                (TokenKind::Int, "10".to_string()),
            ]
        );
    }

    #[test]
    fn minus_after_operand_is_binary() {
        assert_eq!(
            kinds_and_texts("5-10"),
            vec![
                (TokenKind::Int, "5".to_string()),
                (TokenKind::Op(OpKind::Sub), "-".to_string()),
                (TokenKind::Int, "10".to_string()),
            ]
        );
    }

    #[test]
    fn unary_contexts_inside_calls() {
        assert_eq!(
            kinds_and_texts("-v1 * (-10+log(v2, 10.123)-max(-45.56))"),
            vec![
                (TokenKind::UnaryOp(OpKind::Sub), "-".to_string()),
                (TokenKind::Ident, "v1".to_string()),
                (TokenKind::Op(OpKind::Mul), "*".to_string()),
                (TokenKind::LParen, "(".to_string()),
                (TokenKind::UnaryOp(OpKind::Sub), "-".to_string()),
                (TokenKind::Int, "10".to_string()),
                (TokenKind::Op(OpKind::Add), "+".to_string()),
                (TokenKind::Function, "log".to_string()),
                (TokenKind::LParen, "(".to_string()),
                (TokenKind::Ident, "v2".to_string()),
                (TokenKind::Comma, ",".to_string()),
                (TokenKind::Float { scale: 3 }, "10123".to_string()),
                (TokenKind::RParen, ")".to_string()),
                (TokenKind::Op(OpKind::Sub), "-".to_string()),
                (TokenKind::Function, "max".to_string()),
                (TokenKind::LParen, "(".to_string()),
                (TokenKind::UnaryOp(OpKind::Sub), "-".to_string()),
                (TokenKind::Float { scale: 2 }, "4556".to_string()),
                (TokenKind::RParen, ")".to_string()),
                (TokenKind::RParen, ")".to_string()),
            ]
        );
    }

    #[test]
    fn operators_cover_fixed_set() {
        assert_eq!(
            kinds_and_texts("1*2/3%4^5"),
            vec![
                (TokenKind::Int, "1".to_string()),
                (TokenKind::Op(OpKind::Mul), "*".to_string()),
                (TokenKind::Int, "2".to_string()),
                (TokenKind::Op(OpKind::Div), "/".to_string()),
                (TokenKind::Int, "3".to_string()),
                (TokenKind::Op(OpKind::Rem), "%".to_string()),
                (TokenKind::Int, "4".to_string()),
                (TokenKind::Op(OpKind::Pow), "^".to_string()),
                (TokenKind::Int, "5".to_string()),
            ]
        );
    }

    #[test]
    fn eof_repeats() {
        let mut lexer = Lexer::new("7").unwrap();
        assert_eq!(lexer.next_token().kind, TokenKind::Int);
        assert_eq!(lexer.next_token().kind, TokenKind::Eof);
        assert_eq!(lexer.next_token().kind, TokenKind::Eof);
    }

    #[test]
    fn empty_input_is_immediate_eof() {
        let mut lexer = Lexer::new("").unwrap();
        let tok = lexer.next_token();
        assert_eq!(tok.kind, TokenKind::Eof);
        assert_eq!(tok.span, Span::point(0));
    }

    #[test]
    fn trailing_dot_yields_scale_zero_float() {
        // "5." consumes the dot; the literal becomes a float with no
        // fractional digits.
        assert_eq!(
            kinds_and_texts("5."),
            vec![(TokenKind::Float { scale: 0 }, "5".to_string())]
        );
    }

    #[test]
    fn second_dot_ends_the_literal() {
        let mut lexer = Lexer::new("1.2.3").unwrap();
        let first = lexer.next_token();
        assert_eq!(first.kind, TokenKind::Float { scale: 1 });
        assert_eq!(first.text, "12");
        // The stray dot is not part of any literal.
        assert_eq!(lexer.next_token().kind, TokenKind::Illegal(b'.'));
    }

    #[test]
    fn illegal_byte_aborts_tokenize() {
        let mut lexer = Lexer::new("5 @ 3").unwrap();
        assert_eq!(
            lexer.tokenize(),
            Err(LexError::IllegalByte {
                byte: b'@',
                offset: 2
            })
        );
    }

    #[test]
    fn oversized_input_is_rejected() {
        let source = "1".repeat(MAX_SOURCE_LEN);
        assert_eq!(
            Lexer::new(&source).err(),
            Some(LexError::InputTooLong {
                len: MAX_SOURCE_LEN
            })
        );
        // One byte under the cap is fine.
        let source = "1".repeat(MAX_SOURCE_LEN - 1);
        assert!(Lexer::new(&source).is_ok());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            // The lexer must terminate without panicking on arbitrary
            // input, either with a token list or an illegal-byte error.
            #[test]
            fn never_panics(source in ".{0,128}") {
                let mut lexer = Lexer::new(&source).unwrap();
                let _ = lexer.tokenize();
            }

            // Token spans are in bounds and strictly ascending.
            #[test]
            fn spans_are_ordered(source in "[0-9a-z_+*/%^(), .-]{0,64}") {
                let mut lexer = Lexer::new(&source).unwrap();
                if let Ok(tokens) = lexer.tokenize() {
                    let mut last_end = 0u32;
                    for tok in tokens {
                        prop_assert!(tok.span.start >= last_end);
                        prop_assert!(tok.span.end as usize <= source.len());
                        prop_assert!(tok.span.start < tok.span.end);
                        last_end = tok.span.end;
                    }
                }
            }
        }
    }
}
