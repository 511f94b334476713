pub mod ast;
pub mod builtins;
pub mod env;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod parse;
pub mod turtle;

pub use ast::{Expr, Program, Statement};
pub use builtins::Builtins;
pub use env::Env;
pub use error::{Error, EvalError, LexError, ParseError};
pub use eval::{Config, Evaluator};
pub use parse::parse;
pub use turtle::{Color, Turtle, TurtleCmd};

/// Parses and runs programs against a set of built-ins.
#[derive(Debug, Default)]
pub struct Interpreter {
    builtins: Builtins,
    config: Config,
}

impl Interpreter {
    pub fn new(builtins: Builtins, config: Config) -> Self {
        Interpreter { builtins, config }
    }

    pub fn parse(&self, source: &str) -> Result<Program, Error> {
        parse::parse(source, &self.builtins)
    }

    /// Parses all of `source` and then runs it in a fresh environment.
    ///
    /// Nothing is sent to `turtle` unless the whole program parses. If evaluation fails
    /// part-way, whatever was drawn before the failure stays drawn.
    pub fn run(&self, turtle: &mut dyn Turtle, source: &str) -> Result<(), Error> {
        let program = self.parse(source)?;
        self.exec(turtle, &program)
    }

    pub fn exec(&self, turtle: &mut dyn Turtle, program: &Program) -> Result<(), Error> {
        let mut env = Env::new(turtle);
        let eval = Evaluator::new(&self.builtins, self.config);
        log::debug!("running {} statements", program.statements.len());
        eval.exec_program(program, &mut env)?;
        log::debug!("done");
        Ok(())
    }
}

/// Runs `source` with the default built-ins and configuration.
pub fn run(turtle: &mut dyn Turtle, source: &str) -> Result<(), Error> {
    Interpreter::default().run(turtle, source)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trace(source: &str) -> Vec<TurtleCmd> {
        let mut out: Vec<TurtleCmd> = Vec::new();
        run(&mut out, source).unwrap();
        out
    }

    #[test]
    fn arithmetic() {
        assert_eq!(trace("forward 3+4*5+2"), vec![TurtleCmd::Forward(25)]);
        assert_eq!(trace("forward (3+4)*(5+2)"), vec![TurtleCmd::Forward(49)]);
        assert_eq!(trace("forward 1+1+1+1+1"), vec![TurtleCmd::Forward(5)]);
        assert_eq!(trace("forward 2*2*2*2"), vec![TurtleCmd::Forward(16)]);
        assert_eq!(trace("forward 2*3 + 5*-1"), vec![TurtleCmd::Forward(1)]);

        let sum = format!("forward 1{}", "+1".repeat(150));
        assert_eq!(trace(&sum), vec![TurtleCmd::Forward(151)]);
    }

    #[test]
    fn long_chains_fail_cleanly() {
        let mut out: Vec<TurtleCmd> = Vec::new();
        let sum = format!("fd 1 fd 1{}", "+1".repeat(10_000));
        let err = run(&mut out, &sum).unwrap_err();
        assert!(matches!(err, Error::Parse(ParseError::TooDeep { .. })));
        assert_eq!(err.pos().map(|p| p.line), Some(1));
        assert!(out.is_empty());
    }

    #[test]
    fn variables() {
        assert_eq!(
            trace("a = 2 b=3 c=a+b forward c"),
            vec![TurtleCmd::Forward(5)]
        );
        assert_eq!(trace("a = 3 > 5 forward a"), vec![TurtleCmd::Forward(0)]);
        assert_eq!(trace("a = 3 < 5 forward a"), vec![TurtleCmd::Forward(1)]);
        assert_eq!(trace("a = 3 == 3 forward a"), vec![TurtleCmd::Forward(1)]);
    }

    #[test]
    fn conditionals() {
        assert_eq!(trace("if 3 < 5 [ forward 1 ]"), vec![TurtleCmd::Forward(1)]);
        assert_eq!(
            trace("ifelse 5 < 3 [ forward 1 ] [ right 1 ]"),
            vec![TurtleCmd::Right(1)]
        );
        // Only 1 is true.
        assert_eq!(
            trace("ifelse 2 [ forward 1 ] [ right 1 ]"),
            vec![TurtleCmd::Right(1)]
        );
    }

    #[test]
    fn procedures() {
        assert_eq!(
            trace("to f :arg1 forward arg1 end f 100"),
            vec![TurtleCmd::Forward(100)]
        );
        assert_eq!(
            trace("to f :n if n > 0 [ fd n f n - 1 ] end f 3"),
            vec![
                TurtleCmd::Forward(3),
                TurtleCmd::Forward(2),
                TurtleCmd::Forward(1)
            ]
        );
    }

    #[test]
    fn nothing_runs_after_a_parse_error() {
        let mut out: Vec<TurtleCmd> = Vec::new();
        let err = run(&mut out, "fd 10 rt 90 fd").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
        assert!(out.is_empty());
    }

    #[test]
    fn effects_before_an_eval_error_remain() {
        let mut out: Vec<TurtleCmd> = Vec::new();
        let err = run(&mut out, "fd 10 fd 1/0 fd 20").unwrap_err();
        assert_eq!(
            err,
            Error::Eval(EvalError::Arithmetic {
                op: "/",
                lhs: 1,
                rhs: 0
            })
        );
        assert_eq!(out, vec![TurtleCmd::Forward(10)]);
    }

    #[test]
    fn recursion_limit() {
        let interp = Interpreter::new(Builtins::default(), Config { max_depth: 10 });
        let mut out: Vec<TurtleCmd> = Vec::new();
        let err = interp.run(&mut out, "to f :n fd n f n + 1 end f 1").unwrap_err();
        assert_eq!(err, Error::Eval(EvalError::RecursionLimit { limit: 10 }));
        assert_eq!(out.len(), 10);
    }

    #[test]
    fn each_run_is_fresh() {
        let interp = Interpreter::default();
        let mut out: Vec<TurtleCmd> = Vec::new();
        interp.run(&mut out, "to f end a = 1").unwrap();
        // Neither `f` nor `a` survives into the next run.
        interp.run(&mut out, "to f end").unwrap();
        assert!(matches!(
            interp.run(&mut out, "fd a"),
            Err(Error::Eval(EvalError::UnknownVariable { .. }))
        ));
    }
}
