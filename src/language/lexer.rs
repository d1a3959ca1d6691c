use std::fmt;

use crate::language::errors::ParseError;

#[derive(PartialEq, Debug, Clone)]
pub struct Source {
    body: String
}

impl Source {
    pub fn new(body: &str) -> Source {
        Source::from(String::from(body))
    }

    pub fn from(body: String) -> Source {
        Source {
            body: body
        }
    }
}

#[derive(PartialEq, Debug, Clone, Copy)]
pub enum TokenKind {
    EOF,
    Bang,
    Dollar,
    ParenL,
    ParenR,
    Spread,
    Colon,
    Equals,
    At,
    BracketL,
    BracketR,
    BraceR,
    BraceL,
    Pipe,
    Name,
    Int,
    Float,
    String
}

#[derive(PartialEq, Debug)]
pub enum NameKind {
    Query,
    Mutation,
    Subscription,
    Fragment
}

#[derive(PartialEq, Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
    pub value: Option<String>
}

impl Token {
    fn make(kind: TokenKind, start: usize, end: usize) -> Token {
        Token {
            kind: kind,
            start: start,
            end: end,
            value: None
        }
    }

    fn make_char(kind: TokenKind, start: usize) -> Token {
        Token::make(kind, start, start + 1)
    }

    pub fn name_kind_from_value(&self) -> Option<NameKind> {
        if self.kind != TokenKind::Name {
            return None;
        }
        match self.value.as_deref() {
            Some("query") => Some(NameKind::Query),
            Some("mutation") => Some(NameKind::Mutation),
            Some("subscription") => Some(NameKind::Subscription),
            Some("fragment") => Some(NameKind::Fragment),
            _ => None
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match (self.kind, self.value.as_ref()) {
            (TokenKind::EOF, _) => write!(f, "<EOF>"),
            (TokenKind::String, Some(value)) => write!(f, "\"{}\"", value),
            (_, Some(value)) => write!(f, "{}", value),
            (kind, None) => write!(f, "{}", punctuation(kind))
        }
    }
}

fn punctuation(kind: TokenKind) -> &'static str {
    match kind {
        TokenKind::Bang => "!",
        TokenKind::Dollar => "$",
        TokenKind::ParenL => "(",
        TokenKind::ParenR => ")",
        TokenKind::Spread => "...",
        TokenKind::Colon => ":",
        TokenKind::Equals => "=",
        TokenKind::At => "@",
        TokenKind::BracketL => "[",
        TokenKind::BracketR => "]",
        TokenKind::BraceL => "{",
        TokenKind::BraceR => "}",
        TokenKind::Pipe => "|",
        _ => "<token>"
    }
}

pub struct Lexer {
    prev_position: usize,
    source: Source,
}

impl Lexer {
    pub fn lex(source: Source) -> Lexer {
        Lexer {
            prev_position: 0,
            source: source,
        }
    }

    /// Reads the token after the previous one. Keeps returning `EOF` once
    /// the body is exhausted.
    pub fn next(&mut self) -> Result<Token, ParseError> {
        let token = Lexer::read_token(&self.source, self.prev_position)?;
        trace!("lexed {:?} at {}", token.kind, token.start);
        self.prev_position = token.end;
        Ok(token)
    }

    fn read_token(source: &Source, from_position: usize) -> Result<Token, ParseError> {
        let body = source.body.as_bytes();
        let position = Lexer::position_after_whitespace(body, from_position);

        let code = match body.get(position) {
            Some(&code) => code,
            None => return Ok(Token::make(TokenKind::EOF, position, position))
        };

        match code {
            // !
            33 => Ok(Token::make_char(TokenKind::Bang, position)),
            // $
            36 => Ok(Token::make_char(TokenKind::Dollar, position)),
            // (
            40 => Ok(Token::make_char(TokenKind::ParenL, position)),
            // )
            41 => Ok(Token::make_char(TokenKind::ParenR, position)),
            // .
            46 => {
                if body.get(position + 1) == Some(&46) && body.get(position + 2) == Some(&46) {
                    Ok(Token::make(TokenKind::Spread, position, position + 3))
                } else {
                    parse_error!(position, "Unexpected character {:?}", '.')
                }
            }
            // :
            58 => Ok(Token::make_char(TokenKind::Colon, position)),
            // =
            61 => Ok(Token::make_char(TokenKind::Equals, position)),
            // @
            64 => Ok(Token::make_char(TokenKind::At, position)),
            // [
            91 => Ok(Token::make_char(TokenKind::BracketL, position)),
            // ]
            93 => Ok(Token::make_char(TokenKind::BracketR, position)),
            // {
            123 => Ok(Token::make_char(TokenKind::BraceL, position)),
            // |
            124 => Ok(Token::make_char(TokenKind::Pipe, position)),
            // }
            125 => Ok(Token::make_char(TokenKind::BraceR, position)),
            // A-Z _ a-z
            65..=90 | 95 | 97..=122 => Ok(Lexer::read_name(source, position)),
            // - 0-9
            45 | 48..=57 => Lexer::read_number(source, position),
            // "
            34 => Lexer::read_string(source, position),

            _ => {
                let unexpected = source.body[position..].chars().next().unwrap_or('\u{fffd}');
                parse_error!(position, "Unexpected character {:?}", unexpected)
            }
        }
    }

    fn read_string(source: &Source, start: usize) -> Result<Token, ParseError> {
        let body = source.body.as_bytes();
        let mut position = start + 1;
        let mut chunk_start = position;
        let mut value = String::new();

        loop {
            let code = match body.get(position) {
                Some(&code) => code,
                None => return parse_error!(position, "Unterminated string")
            };

            match code {
                // "
                34 => break,
                // \n \r
                10 | 13 => return parse_error!(position, "Unterminated string"),
                // \
                92 => {
                    value.push_str(&source.body[chunk_start..position]);
                    let escaped = match body.get(position + 1) {
                        Some(&escaped) => escaped,
                        None => return parse_error!(position, "Unterminated string")
                    };
                    position += 2;
                    match escaped {
                        b'"' => value.push('"'),
                        b'/' => value.push('/'),
                        b'\\' => value.push('\\'),
                        b'b' => value.push('\u{8}'),
                        b'f' => value.push('\u{c}'),
                        b'n' => value.push('\n'),
                        b'r' => value.push('\r'),
                        b't' => value.push('\t'),
                        b'u' => {
                            let decoded = source.body.get(position..position + 4)
                                .filter(|hex| hex.bytes().all(|b| b.is_ascii_hexdigit()))
                                .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                                .and_then(char::from_u32);
                            match decoded {
                                Some(c) => value.push(c),
                                None => return parse_error!(position - 2, "Bad character escape sequence")
                            }
                            position += 4;
                        }
                        _ => return parse_error!(position - 2, "Bad character escape sequence")
                    }
                    chunk_start = position;
                }
                _ => position += 1
            }
        }

        value.push_str(&source.body[chunk_start..position]);
        Ok(Token {
            kind: TokenKind::String,
            start: start,
            end: position + 1,
            value: Some(value)
        })
    }

    fn read_name(source: &Source, position: usize) -> Token {
        let body = source.body.as_bytes();
        let mut end = position + 1;
        while end < body.len() && Lexer::is_name_continue(body[end]) {
            end += 1;
        }

        Token {
            kind:  TokenKind::Name,
            start: position,
            end:   end,
            value: Some(source.body[position..end].to_string())
        }
    }

    /// Reads an Int or Float literal. Leading zeros are kept in the token;
    /// whether they are acceptable depends on the argument the literal is
    /// coerced to.
    fn read_number(source: &Source, start: usize) -> Result<Token, ParseError> {
        let body = source.body.as_bytes();
        let mut position = start;
        let mut is_float = false;

        if body[position] == 45 { // -
            position += 1;
        }

        position = Lexer::read_digits(body, position)?;

        if body.get(position) == Some(&46) { // .
            is_float = true;
            position = Lexer::read_digits(body, position + 1)?;
        }

        if let Some(&(69 | 101)) = body.get(position) { // E e
            is_float = true;
            position += 1;
            if let Some(&(43 | 45)) = body.get(position) { // + -
                position += 1;
            }
            position = Lexer::read_digits(body, position)?;
        }

        if let Some(&code) = body.get(position) {
            if code == 46 || Lexer::is_name_continue(code) {
                return parse_error!(position, "Invalid number, unexpected {:?}", code as char);
            }
        }

        let kind = match is_float {
            true => TokenKind::Float,
            false => TokenKind::Int
        };

        Ok(Token {
            kind: kind,
            start: start,
            end: position,
            value: Some(source.body[start..position].to_string())
        })
    }

    fn read_digits(body: &[u8], start: usize) -> Result<usize, ParseError> {
        let mut position = start;
        while let Some(&(48..=57)) = body.get(position) { // 0-9
            position += 1;
        }
        if position == start {
            let found = body.get(start).map_or("<EOF>".to_string(), |c| format!("{:?}", *c as char));
            return parse_error!(start, "Invalid number, expected digit but got: {}", found);
        }
        Ok(position)
    }

    fn position_after_whitespace(body: &[u8], start_position: usize) -> usize {
        let mut position = start_position;

        while let Some(&code) = body.get(position) {
            if Lexer::is_whitespace(code) {
                position += 1;
            } else if code == 35 { // skip comments
                while let Some(&code) = body.get(position) {
                    if code == 10 || code == 13 {
                        break;
                    }
                    position += 1;
                }
            } else if body[position..].starts_with(&[0xef, 0xbb, 0xbf]) { // BOM
                position += 3;
            } else {
                break;
            }
        }
        position
    }

    fn is_whitespace(code: u8) -> bool {
        code == 32 || code == 44 || code == 9 || code == 10 || code == 13
    }

    fn is_name_continue(code: u8) -> bool {
        code == 95 || code.is_ascii_alphanumeric()
    }
}
