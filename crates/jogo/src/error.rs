use crate::lexer::{Pos, TokenKind};

/// Any failure that aborts a run, tagged by the stage that produced it.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("lexical error at {0}")]
    Lex(#[from] LexError),
    #[error("parse error at {0}")]
    Parse(#[from] ParseError),
    #[error("evaluation error: {0}")]
    Eval(#[from] EvalError),
}

impl Error {
    /// Where in the source the error was found. Evaluation errors have no position.
    pub fn pos(&self) -> Option<Pos> {
        match self {
            Error::Lex(e) => Some(e.pos()),
            Error::Parse(e) => Some(e.pos()),
            Error::Eval(_) => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    #[error("{pos}: I don't know what to do with {ch:?}")]
    UnexpectedChar { ch: char, pos: Pos },
    #[error("{pos}: expected a name after ':' but the input ended")]
    DanglingColon { pos: Pos },
    #[error("{pos}: expected a letter after ':', found {found:?}")]
    BadParamName { found: char, pos: Pos },
}

impl LexError {
    pub fn pos(&self) -> Pos {
        match self {
            LexError::UnexpectedChar { pos, .. }
            | LexError::DanglingColon { pos }
            | LexError::BadParamName { pos, .. } => *pos,
        }
    }
}

/// What the parser was looking for when it gave up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expected {
    Kind(TokenKind),
    Keyword(&'static str),
    Expression,
    RepeatCount,
}

impl std::fmt::Display for Expected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expected::Kind(kind) => f.write_str(kind.name()),
            Expected::Keyword(word) => write!(f, "\"{word}\""),
            Expected::Expression => f.write_str("an expression"),
            Expected::RepeatCount => f.write_str("a variable or a number"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("{pos}: expected {expected} but found {found}")]
    Mismatch {
        expected: Expected,
        found: String,
        pos: Pos,
    },
    #[error("{pos}: the program does not have any statements")]
    EmptyProgram { pos: Pos },
    #[error("{pos}: I don't know how to {name}")]
    UnknownStatement { name: String, pos: Pos },
    #[error("{pos}: {name} is already defined")]
    DuplicateProcedure { name: String, pos: Pos },
    #[error("{pos}: {lexeme} is too big to be a number")]
    NumberOutOfRange { lexeme: String, pos: Pos },
    #[error("{pos}: unable to parse the whole program, stopped at {found}")]
    TrailingTokens { found: String, pos: Pos },
    #[error("{pos}: expressions and blocks are nested deeper than {limit}")]
    TooDeep { limit: usize, pos: Pos },
}

impl ParseError {
    pub fn pos(&self) -> Pos {
        match self {
            ParseError::Mismatch { pos, .. }
            | ParseError::EmptyProgram { pos }
            | ParseError::UnknownStatement { pos, .. }
            | ParseError::DuplicateProcedure { pos, .. }
            | ParseError::NumberOutOfRange { pos, .. }
            | ParseError::TrailingTokens { pos, .. }
            | ParseError::TooDeep { pos, .. } => *pos,
        }
    }
}

// The AST carries no positions, so evaluation errors identify the culprit by name.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    #[error("{name} has no value")]
    UnknownVariable { name: String },
    #[error("I don't know how to {name}")]
    UnknownProcedure { name: String },
    #[error("{name} is already defined")]
    DuplicateProcedure { name: String },
    #[error("wrong number of inputs to {name} (expected {expected}, found {found})")]
    WrongArgCount {
        name: String,
        expected: usize,
        found: usize,
    },
    #[error("{name} doesn't like {value} as input")]
    BadArg { name: String, value: i32 },
    #[error("arithmetic fault: {lhs} {op} {rhs}")]
    Arithmetic { op: &'static str, lhs: i32, rhs: i32 },
    #[error("procedure calls nested deeper than {limit}")]
    RecursionLimit { limit: usize },
}
