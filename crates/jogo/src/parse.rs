use std::{collections::HashMap, rc::Rc};

use crate::{
    ast::{AddOp, CmpOp, Expr, FunctionCall, FunctionDefinition, MulOp, Program, Statement},
    builtins::Builtins,
    error::{Error, Expected, ParseError},
    lexer::{Lexer, Token, TokenKind},
};

/// How deeply expressions, blocks and definitions may nest. Every right-hand operand of a binary
/// operator counts as one level, so this also bounds the length of an operator chain.
pub const MAX_NESTING: usize = 200;

/// A recursive-descent parser with two tokens of lookahead.
///
/// The second lookahead token is only needed to tell an assignment (`a = 1`) apart from
/// everything else that starts with a word.
pub struct Parser<'a, 'b> {
    lexer: Lexer<'a>,
    lookahead: [Token<'a>; 2],
    builtins: &'b Builtins,
    // Arity of every procedure defined so far, in source order.
    procs: HashMap<String, usize>,
    depth: usize,
}

impl<'a, 'b> Parser<'a, 'b> {
    pub fn new(source: &'a str, builtins: &'b Builtins) -> Result<Self, Error> {
        let mut lexer = Lexer::new(source);
        let first = lexer.next_token()?;
        let second = lexer.next_token()?;
        Ok(Parser {
            lexer,
            lookahead: [first, second],
            builtins,
            procs: HashMap::new(),
            depth: 0,
        })
    }

    fn peek(&self) -> Token<'a> {
        self.lookahead[0]
    }

    fn advance(&mut self) -> Result<Token<'a>, Error> {
        let tok = self.lookahead[0];
        self.lookahead[0] = self.lookahead[1];
        self.lookahead[1] = self.lexer.next_token()?;
        Ok(tok)
    }

    fn mismatch(&self, expected: Expected) -> Error {
        let tok = self.peek();
        ParseError::Mismatch {
            expected,
            found: tok.to_string(),
            pos: tok.pos,
        }
        .into()
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token<'a>, Error> {
        if self.peek().kind == kind {
            self.advance()
        } else {
            Err(self.mismatch(Expected::Kind(kind)))
        }
    }

    fn expect_keyword(&mut self, word: &'static str) -> Result<Token<'a>, Error> {
        if self.peek().is_keyword(word) {
            self.advance()
        } else {
            Err(self.mismatch(Expected::Keyword(word)))
        }
    }

    /// Runs `f` one nesting level deeper, failing instead if that would pass [`MAX_NESTING`].
    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T, Error>) -> Result<T, Error> {
        if self.depth >= MAX_NESTING {
            return Err(ParseError::TooDeep {
                limit: MAX_NESTING,
                pos: self.peek().pos,
            }
            .into());
        }
        self.depth += 1;
        let res = f(self);
        self.depth -= 1;
        res
    }

    pub fn parse(mut self) -> Result<Program, Error> {
        let first = self.peek();
        if first.kind == TokenKind::Eof {
            return Err(ParseError::EmptyProgram { pos: first.pos }.into());
        }

        let statements = self.statements(false)?;
        let rest = self.peek();
        if rest.kind != TokenKind::Eof {
            return Err(ParseError::TrailingTokens {
                found: rest.to_string(),
                pos: rest.pos,
            }
            .into());
        }
        log::debug!("parsed {} top-level statements", statements.len());
        Ok(Program { statements })
    }

    fn statements(&mut self, in_def: bool) -> Result<Vec<Statement>, Error> {
        let mut ret = Vec::new();
        loop {
            let tok = self.peek();
            if tok.kind != TokenKind::Word || (in_def && tok.is_keyword("end")) {
                return Ok(ret);
            }
            ret.push(self.statement()?);
        }
    }

    fn statement(&mut self) -> Result<Statement, Error> {
        let tok = self.peek();
        if let Some(arity) = self.builtins.arity(tok.lexeme) {
            self.call(arity, true)
        } else if tok.is_keyword("to") {
            self.definition()
        } else if tok.is_keyword("repeat") {
            self.repeat()
        } else if tok.is_keyword("if") {
            self.conditional(false)
        } else if tok.is_keyword("ifelse") {
            self.conditional(true)
        } else if let Some(&arity) = self.procs.get(tok.lexeme) {
            self.call(arity, false)
        } else if self.lookahead[1].kind == TokenKind::Assign {
            self.assignment()
        } else {
            Err(ParseError::UnknownStatement {
                name: tok.lexeme.to_owned(),
                pos: tok.pos,
            }
            .into())
        }
    }

    fn call(&mut self, arity: usize, builtin: bool) -> Result<Statement, Error> {
        let name = self.expect(TokenKind::Word)?;
        let args = (0..arity)
            .map(|_| self.expr())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Statement::Call(FunctionCall {
            name: name.lexeme.to_owned(),
            arity,
            builtin,
            args,
        }))
    }

    fn definition(&mut self) -> Result<Statement, Error> {
        self.expect_keyword("to")?;
        let name = self.expect(TokenKind::Word)?;
        if self.procs.contains_key(name.lexeme) || self.builtins.lookup(name.lexeme).is_some() {
            return Err(ParseError::DuplicateProcedure {
                name: name.lexeme.to_owned(),
                pos: name.pos,
            }
            .into());
        }

        let mut params = Vec::new();
        while self.peek().kind == TokenKind::Colon {
            self.advance()?;
            params.push(self.expect(TokenKind::Word)?.lexeme.to_owned());
        }
        // Registered before the body so that the body can call itself.
        self.procs.insert(name.lexeme.to_owned(), params.len());

        let body = self.nested(|p| p.statements(true))?;
        self.expect_keyword("end")?;
        Ok(Statement::Def(Rc::new(FunctionDefinition {
            name: name.lexeme.to_owned(),
            params,
            body,
        })))
    }

    fn block(&mut self) -> Result<Vec<Statement>, Error> {
        self.expect(TokenKind::BracketLeft)?;
        let body = self.nested(|p| p.statements(false))?;
        self.expect(TokenKind::BracketRight)?;
        Ok(body)
    }

    fn repeat(&mut self) -> Result<Statement, Error> {
        self.expect_keyword("repeat")?;
        let count = match self.peek().kind {
            TokenKind::Word => Expr::Var(self.advance()?.lexeme.to_owned()),
            TokenKind::Number => self.number()?,
            _ => return Err(self.mismatch(Expected::RepeatCount)),
        };
        let body = self.block()?;
        Ok(Statement::Repeat { count, body })
    }

    fn conditional(&mut self, has_else: bool) -> Result<Statement, Error> {
        self.advance()?;
        let cond = self.expr()?;
        let then = self.block()?;
        let otherwise = if has_else { Some(self.block()?) } else { None };
        Ok(Statement::If {
            cond,
            then,
            otherwise,
        })
    }

    fn assignment(&mut self) -> Result<Statement, Error> {
        let name = self.expect(TokenKind::Word)?;
        self.expect(TokenKind::Assign)?;
        let value = self.expr()?;
        Ok(Statement::Assign {
            name: name.lexeme.to_owned(),
            value,
        })
    }

    pub fn expr(&mut self) -> Result<Expr, Error> {
        self.or()
    }

    // Each binary level parses one operand of the next level and, if it sees its own operator,
    // recurses into itself for the right operand. That makes `-`, `/` and `^` group to the right.

    fn or(&mut self) -> Result<Expr, Error> {
        let lhs = self.and()?;
        if self.peek().is_keyword("or") {
            self.advance()?;
            let rhs = self.nested(Self::or)?;
            Ok(Expr::Or(Box::new(lhs), Box::new(rhs)))
        } else {
            Ok(lhs)
        }
    }

    fn and(&mut self) -> Result<Expr, Error> {
        let lhs = self.equality()?;
        if self.peek().is_keyword("and") {
            self.advance()?;
            let rhs = self.nested(Self::and)?;
            Ok(Expr::And(Box::new(lhs), Box::new(rhs)))
        } else {
            Ok(lhs)
        }
    }

    fn equality(&mut self) -> Result<Expr, Error> {
        let lhs = self.comparison()?;
        if self.peek().kind == TokenKind::Eq {
            self.advance()?;
            let rhs = self.comparison()?;
            Ok(Expr::Eq(Box::new(lhs), Box::new(rhs)))
        } else {
            Ok(lhs)
        }
    }

    fn comparison(&mut self) -> Result<Expr, Error> {
        let lhs = self.additive()?;
        let op = match self.peek().kind {
            TokenKind::Lt => CmpOp::Lt,
            TokenKind::Gt => CmpOp::Gt,
            _ => return Ok(lhs),
        };
        self.advance()?;
        let rhs = self.additive()?;
        Ok(Expr::Cmp(op, Box::new(lhs), Box::new(rhs)))
    }

    fn additive(&mut self) -> Result<Expr, Error> {
        let lhs = self.multiplicative()?;
        let op = match self.peek().kind {
            TokenKind::Add => AddOp::Add,
            TokenKind::Sub => AddOp::Sub,
            _ => return Ok(lhs),
        };
        self.advance()?;
        let rhs = self.nested(Self::additive)?;
        Ok(Expr::Add(op, Box::new(lhs), Box::new(rhs)))
    }

    fn multiplicative(&mut self) -> Result<Expr, Error> {
        let lhs = self.unary()?;
        let op = match self.peek().kind {
            TokenKind::Mul => MulOp::Mul,
            TokenKind::Div => MulOp::Div,
            TokenKind::Pow => MulOp::Pow,
            _ => return Ok(lhs),
        };
        self.advance()?;
        let rhs = self.nested(Self::multiplicative)?;
        Ok(Expr::Mul(op, Box::new(lhs), Box::new(rhs)))
    }

    fn unary(&mut self) -> Result<Expr, Error> {
        let negate = self.peek().kind == TokenKind::Sub;
        if negate {
            self.advance()?;
        }
        let inner = self.primary()?;
        Ok(Expr::Unary {
            negate,
            inner: Box::new(inner),
        })
    }

    fn number(&mut self) -> Result<Expr, Error> {
        let tok = self.expect(TokenKind::Number)?;
        let x = tok
            .lexeme
            .parse::<i32>()
            .map_err(|_| ParseError::NumberOutOfRange {
                lexeme: tok.lexeme.to_owned(),
                pos: tok.pos,
            })?;
        Ok(Expr::Number(x))
    }

    fn primary(&mut self) -> Result<Expr, Error> {
        let tok = self.peek();
        match tok.kind {
            TokenKind::Number => self.number(),
            TokenKind::Word => {
                self.advance()?;
                Ok(match tok.lexeme {
                    "true" => Expr::Boolean(true),
                    "false" => Expr::Boolean(false),
                    name => Expr::Var(name.to_owned()),
                })
            }
            TokenKind::ParenLeft => {
                self.advance()?;
                let inner = self.nested(Self::expr)?;
                self.expect(TokenKind::ParenRight)?;
                Ok(inner)
            }
            _ => Err(self.mismatch(Expected::Expression)),
        }
    }
}

/// Parses a whole program. Calls are resolved against `builtins` and the procedures defined
/// earlier in `source`.
pub fn parse(source: &str, builtins: &Builtins) -> Result<Program, Error> {
    Parser::new(source, builtins)?.parse()
}
