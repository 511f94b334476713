use std::rc::Rc;

use crate::{
    ast::{Expr, FunctionCall, Program, Statement},
    builtins::Builtins,
    env::Env,
    error::EvalError,
};

pub const TRUE: i32 = 1;
pub const FALSE: i32 = 0;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// How deeply user procedure calls may nest before evaluation gives up.
    pub max_depth: usize,
}

impl Config {
    pub const DEFAULT_MAX_DEPTH: usize = 256;
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_depth: Config::DEFAULT_MAX_DEPTH,
        }
    }
}

impl Expr {
    pub fn eval(&self, env: &Env) -> Result<i32, EvalError> {
        Ok(match self {
            Expr::Number(x) => *x,
            Expr::Boolean(b) => i32::from(*b),
            Expr::Var(name) => env.lookup_var(name)?,
            Expr::Unary { negate, inner } => {
                let x = inner.eval(env)?;
                if *negate {
                    x.checked_neg().ok_or(EvalError::Arithmetic {
                        op: "-",
                        lhs: 0,
                        rhs: x,
                    })?
                } else {
                    x
                }
            }
            Expr::Mul(op, lhs, rhs) => op.apply(lhs.eval(env)?, rhs.eval(env)?)?,
            Expr::Add(op, lhs, rhs) => op.apply(lhs.eval(env)?, rhs.eval(env)?)?,
            Expr::Cmp(op, lhs, rhs) => i32::from(op.apply(lhs.eval(env)?, rhs.eval(env)?)),
            Expr::Eq(lhs, rhs) => i32::from(lhs.eval(env)? == rhs.eval(env)?),
            // `and` and `or` only look at their right side when the left doesn't decide.
            Expr::And(lhs, rhs) => match lhs.eval(env)? {
                FALSE => FALSE,
                _ => rhs.eval(env)?,
            },
            Expr::Or(lhs, rhs) => match lhs.eval(env)? {
                TRUE => TRUE,
                _ => rhs.eval(env)?,
            },
        })
    }
}

/// Walks a parsed program, sending built-in calls to the environment's turtle.
pub struct Evaluator<'b> {
    builtins: &'b Builtins,
    config: Config,
}

impl<'b> Evaluator<'b> {
    pub fn new(builtins: &'b Builtins, config: Config) -> Self {
        Evaluator { builtins, config }
    }

    pub fn exec_program(&self, program: &Program, env: &mut Env) -> Result<(), EvalError> {
        self.exec_block(&program.statements, env)
    }

    pub fn exec_block(&self, block: &[Statement], env: &mut Env) -> Result<(), EvalError> {
        for statement in block {
            self.exec(statement, env)?;
        }
        Ok(())
    }

    pub fn exec(&self, statement: &Statement, env: &mut Env) -> Result<(), EvalError> {
        match statement {
            Statement::Call(call) if call.builtin => self.call_builtin(call, env),
            Statement::Call(call) => self.call_user(call, env),
            Statement::Def(def) => env.def_proc(Rc::clone(def)),
            Statement::Repeat { count, body } => {
                let count = count.eval(env)?;
                for _ in 0..count {
                    self.exec_block(body, env)?;
                }
                Ok(())
            }
            Statement::If {
                cond,
                then,
                otherwise,
            } => {
                // Only exactly 1 counts as true; anything else takes the else branch.
                if cond.eval(env)? == TRUE {
                    self.exec_block(then, env)
                } else if let Some(otherwise) = otherwise {
                    self.exec_block(otherwise, env)
                } else {
                    Ok(())
                }
            }
            Statement::Assign { name, value } => {
                let val = value.eval(env)?;
                env.def_var(name, val);
                Ok(())
            }
        }
    }

    fn eval_args(&self, call: &FunctionCall, env: &Env) -> Result<Vec<i32>, EvalError> {
        call.args.iter().map(|arg| arg.eval(env)).collect()
    }

    fn call_builtin(&self, call: &FunctionCall, env: &mut Env) -> Result<(), EvalError> {
        let builtin =
            self.builtins
                .lookup(&call.name)
                .ok_or_else(|| EvalError::UnknownProcedure {
                    name: call.name.clone(),
                })?;
        let args = self.eval_args(call, env)?;
        builtin.call(env.turtle(), &args)
    }

    fn call_user(&self, call: &FunctionCall, env: &mut Env) -> Result<(), EvalError> {
        let proc = env.lookup_proc(&call.name)?;
        if proc.params.len() != call.args.len() {
            return Err(EvalError::WrongArgCount {
                name: call.name.clone(),
                expected: proc.params.len(),
                found: call.args.len(),
            });
        }
        // Arguments are evaluated in the caller's frame, before the callee's frame exists.
        let args = self.eval_args(call, env)?;
        if env.depth() >= self.config.max_depth {
            return Err(EvalError::RecursionLimit {
                limit: self.config.max_depth,
            });
        }

        log::debug!("calling {} {:?} at depth {}", proc.name, args, env.depth());
        env.scoped(|env| {
            for (name, val) in proc.params.iter().zip(args) {
                env.def_var(name, val);
            }
            self.exec_block(&proc.body, env)
        })
    }
}
