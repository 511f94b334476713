use std::{fmt, rc::Rc};

use crate::error::EvalError;

#[derive(Clone, Debug, PartialEq)]
pub struct Program {
    pub statements: Vec<Statement>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Statement {
    Call(FunctionCall),
    Def(Rc<FunctionDefinition>),
    Repeat {
        count: Expr,
        body: Vec<Statement>,
    },
    If {
        cond: Expr,
        then: Vec<Statement>,
        // `None` for a plain `if`, `Some` for `ifelse`.
        otherwise: Option<Vec<Statement>>,
    },
    Assign {
        name: String,
        value: Expr,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    // Invariant: `args.len() == arity`.
    pub arity: usize,
    pub builtin: bool,
    pub args: Vec<Expr>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FunctionDefinition {
    pub name: String,
    pub params: Vec<String>,
    pub body: Vec<Statement>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum MulOp {
    Mul,
    Div,
    Pow,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum AddOp {
    Add,
    Sub,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CmpOp {
    Lt,
    Gt,
}

/// Expressions, from the tightest-binding variants to the loosest.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Number(i32),
    Boolean(bool),
    Var(String),
    Unary { negate: bool, inner: Box<Expr> },
    Mul(MulOp, Box<Expr>, Box<Expr>),
    Add(AddOp, Box<Expr>, Box<Expr>),
    Cmp(CmpOp, Box<Expr>, Box<Expr>),
    Eq(Box<Expr>, Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
}

fn fault(op: &'static str, lhs: i32, rhs: i32) -> EvalError {
    EvalError::Arithmetic { op, lhs, rhs }
}

/// Integer exponentiation, truncated towards zero for negative exponents.
fn pow(base: i32, exp: i32) -> Option<i32> {
    if exp >= 0 {
        return base.checked_pow(exp as u32);
    }
    match base {
        0 => None,
        1 => Some(1),
        -1 => Some(if exp % 2 == 0 { 1 } else { -1 }),
        _ => Some(0),
    }
}

impl MulOp {
    pub fn name(&self) -> &'static str {
        match self {
            MulOp::Mul => "*",
            MulOp::Div => "/",
            MulOp::Pow => "^",
        }
    }

    pub fn apply(&self, lhs: i32, rhs: i32) -> Result<i32, EvalError> {
        let res = match self {
            MulOp::Mul => lhs.checked_mul(rhs),
            MulOp::Div => lhs.checked_div(rhs),
            MulOp::Pow => pow(lhs, rhs),
        };
        res.ok_or_else(|| fault(self.name(), lhs, rhs))
    }
}

impl AddOp {
    pub fn name(&self) -> &'static str {
        match self {
            AddOp::Add => "+",
            AddOp::Sub => "-",
        }
    }

    pub fn apply(&self, lhs: i32, rhs: i32) -> Result<i32, EvalError> {
        let res = match self {
            AddOp::Add => lhs.checked_add(rhs),
            AddOp::Sub => lhs.checked_sub(rhs),
        };
        res.ok_or_else(|| fault(self.name(), lhs, rhs))
    }
}

impl CmpOp {
    pub fn name(&self) -> &'static str {
        match self {
            CmpOp::Lt => "<",
            CmpOp::Gt => ">",
        }
    }

    pub fn apply(&self, lhs: i32, rhs: i32) -> bool {
        match self {
            CmpOp::Lt => lhs < rhs,
            CmpOp::Gt => lhs > rhs,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(x) => write!(f, "{x}"),
            Expr::Boolean(b) => write!(f, "{b}"),
            Expr::Var(name) => f.write_str(name),
            Expr::Unary {
                negate: true,
                inner,
            } => write!(f, "-{inner}"),
            Expr::Unary {
                negate: false,
                inner,
            } => write!(f, "{inner}"),
            Expr::Mul(op, l, r) => write!(f, "({l} {} {r})", op.name()),
            Expr::Add(op, l, r) => write!(f, "({l} {} {r})", op.name()),
            Expr::Cmp(op, l, r) => write!(f, "({l} {} {r})", op.name()),
            Expr::Eq(l, r) => write!(f, "({l} == {r})"),
            Expr::And(l, r) => write!(f, "({l} and {r})"),
            Expr::Or(l, r) => write!(f, "({l} or {r})"),
        }
    }
}

fn write_block(f: &mut fmt::Formatter<'_>, block: &[Statement]) -> fmt::Result {
    f.write_str("[")?;
    for statement in block {
        write!(f, " {statement}")?;
    }
    f.write_str(" ]")
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Call(call) => {
                f.write_str(&call.name)?;
                for arg in &call.args {
                    write!(f, " {arg}")?;
                }
                Ok(())
            }
            Statement::Def(def) => {
                write!(f, "to {}", def.name)?;
                for param in &def.params {
                    write!(f, " :{param}")?;
                }
                for statement in &def.body {
                    write!(f, " {statement}")?;
                }
                f.write_str(" end")
            }
            Statement::Repeat { count, body } => {
                write!(f, "repeat {count} ")?;
                write_block(f, body)
            }
            Statement::If {
                cond,
                then,
                otherwise: None,
            } => {
                write!(f, "if {cond} ")?;
                write_block(f, then)
            }
            Statement::If {
                cond,
                then,
                otherwise: Some(otherwise),
            } => {
                write!(f, "ifelse {cond} ")?;
                write_block(f, then)?;
                f.write_str(" ")?;
                write_block(f, otherwise)
            }
            Statement::Assign { name, value } => write!(f, "{name} = {value}"),
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for statement in &self.statements {
            writeln!(f, "{statement}")?;
        }
        Ok(())
    }
}
