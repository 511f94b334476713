use nom::{
    branch::alt,
    bytes::complete::{tag, take_while},
    character::complete::{alpha1, alphanumeric0, anychar, digit1},
    combinator::{consumed, map, map_opt, recognize},
    sequence::pair,
    IResult,
};

use crate::error::LexError;

pub type Span<'a> = nom_locate::LocatedSpan<&'a str>;

/// A location in the source text. Lines and columns start at 1.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Pos {
    pub offset: usize,
    pub line: u32,
    pub column: usize,
}

impl From<Span<'_>> for Pos {
    fn from(sp: Span) -> Self {
        Pos {
            offset: sp.location_offset(),
            line: sp.location_line(),
            column: sp.get_utf8_column(),
        }
    }
}

impl std::fmt::Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum TokenKind {
    Eof,
    Word,
    Number,
    Colon,
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Lt,
    Gt,
    Eq,
    BracketLeft,
    BracketRight,
    ParenLeft,
    ParenRight,
}

impl TokenKind {
    fn from_char(ch: char) -> Option<TokenKind> {
        Some(match ch {
            ':' => TokenKind::Colon,
            '=' => TokenKind::Assign,
            '+' => TokenKind::Add,
            '-' => TokenKind::Sub,
            '*' => TokenKind::Mul,
            '/' => TokenKind::Div,
            '^' => TokenKind::Pow,
            '<' => TokenKind::Lt,
            '>' => TokenKind::Gt,
            '[' => TokenKind::BracketLeft,
            ']' => TokenKind::BracketRight,
            '(' => TokenKind::ParenLeft,
            ')' => TokenKind::ParenRight,
            _ => return None,
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Eof => "end of input",
            TokenKind::Word => "a word",
            TokenKind::Number => "a number",
            TokenKind::Colon => "':'",
            TokenKind::Assign => "'='",
            TokenKind::Add => "'+'",
            TokenKind::Sub => "'-'",
            TokenKind::Mul => "'*'",
            TokenKind::Div => "'/'",
            TokenKind::Pow => "'^'",
            TokenKind::Lt => "'<'",
            TokenKind::Gt => "'>'",
            TokenKind::Eq => "'=='",
            TokenKind::BracketLeft => "'['",
            TokenKind::BracketRight => "']'",
            TokenKind::ParenLeft => "'('",
            TokenKind::ParenRight => "')'",
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub lexeme: &'a str,
    pub pos: Pos,
}

impl<'a> Token<'a> {
    /// Is this the keyword `word`? Keywords ignore case.
    pub fn is_keyword(&self, word: &str) -> bool {
        self.kind == TokenKind::Word && self.lexeme.eq_ignore_ascii_case(word)
    }
}

impl std::fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            TokenKind::Eof => f.write_str("end of input"),
            TokenKind::Word | TokenKind::Number => {
                write!(f, "{} \"{}\"", self.kind, self.lexeme)
            }
            kind => f.write_str(kind.name()),
        }
    }
}

fn is_space(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\r' | ',')
}

fn whitespace(input: Span) -> IResult<Span, Span> {
    take_while(is_space)(input)
}

fn token(input: Span) -> IResult<Span, (TokenKind, Span)> {
    alt((
        map(tag("=="), |s| (TokenKind::Eq, s)),
        map(digit1, |s| (TokenKind::Number, s)),
        map(recognize(pair(alpha1, alphanumeric0)), |s| (TokenKind::Word, s)),
        map_opt(consumed(anychar), |(s, ch)| {
            TokenKind::from_char(ch).map(|kind| (kind, s))
        }),
    ))(input)
}

/// Splits source text into tokens, one at a time.
///
/// Once the input is exhausted every call returns an [`TokenKind::Eof`] token.
pub struct Lexer<'a> {
    rest: Span<'a>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Lexer {
            rest: Span::new(source),
        }
    }

    /// The part of the source that hasn't been tokenized yet.
    pub fn remaining(&self) -> &'a str {
        *self.rest.fragment()
    }

    pub fn next_token(&mut self) -> Result<Token<'a>, LexError> {
        let input = match whitespace(self.rest) {
            Ok((rest, _)) => rest,
            Err(_) => self.rest,
        };

        // Trailing whitespace is left unconsumed, so the end marker always sits right after
        // the last real token.
        if input.fragment().is_empty() {
            return Ok(Token {
                kind: TokenKind::Eof,
                lexeme: "",
                pos: self.rest.into(),
            });
        }
        self.rest = input;

        let (rest, (kind, span)) = token(input).map_err(|_| LexError::UnexpectedChar {
            ch: input.fragment().chars().next().unwrap_or_default(),
            pos: input.into(),
        })?;

        if kind == TokenKind::Colon {
            match rest.fragment().chars().next() {
                None => return Err(LexError::DanglingColon { pos: span.into() }),
                Some(ch) if !ch.is_ascii_alphabetic() => {
                    return Err(LexError::BadParamName {
                        found: ch,
                        pos: rest.into(),
                    })
                }
                Some(_) => {}
            }
        }

        self.rest = rest;
        Ok(Token {
            kind,
            lexeme: *span.fragment(),
            pos: span.into(),
        })
    }
}

/// Tokenizes the whole input. The last token is always [`TokenKind::Eof`].
pub fn tokenize(source: &str) -> Result<Vec<Token<'_>>, LexError> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let tok = lexer.next_token()?;
        let done = tok.kind == TokenKind::Eof;
        tokens.push(tok);
        if done {
            return Ok(tokens);
        }
    }
}
