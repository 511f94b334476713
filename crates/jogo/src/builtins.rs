use std::collections::HashMap;

use crate::{
    error::EvalError,
    turtle::{Color, Turtle},
};

#[derive(Copy, Clone)]
pub enum Handler {
    Zero(fn(&mut dyn Turtle)),
    One(fn(&mut dyn Turtle, i32) -> Result<(), EvalError>),
}

impl std::fmt::Debug for Handler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Handler::Zero(_) => f.write_str("Handler::Zero"),
            Handler::One(_) => f.write_str("Handler::One"),
        }
    }
}

/// A procedure that talks directly to the turtle.
#[derive(Debug)]
pub struct Builtin {
    pub aliases: &'static [&'static str],
    pub handler: Handler,
}

impl Builtin {
    /// The canonical name, which is the first alias.
    pub fn name(&self) -> &'static str {
        self.aliases[0]
    }

    pub fn arity(&self) -> usize {
        match self.handler {
            Handler::Zero(_) => 0,
            Handler::One(_) => 1,
        }
    }

    pub fn call(&self, turtle: &mut dyn Turtle, args: &[i32]) -> Result<(), EvalError> {
        log::trace!("{} {:?}", self.name(), args);
        match (self.handler, args) {
            (Handler::Zero(f), []) => {
                f(turtle);
                Ok(())
            }
            (Handler::One(f), [x]) => f(turtle, *x),
            _ => Err(EvalError::WrongArgCount {
                name: self.name().to_owned(),
                expected: self.arity(),
                found: args.len(),
            }),
        }
    }
}

/// The table of built-in procedures, keyed by every alias.
#[derive(Debug)]
pub struct Builtins {
    procs: Vec<Builtin>,
    by_alias: HashMap<&'static str, usize>,
}

impl Builtins {
    pub fn empty() -> Self {
        Builtins {
            procs: Vec::new(),
            by_alias: HashMap::new(),
        }
    }

    pub fn def(&mut self, aliases: &'static [&'static str], handler: Handler) {
        let idx = self.procs.len();
        self.procs.push(Builtin { aliases, handler });
        for alias in aliases {
            self.by_alias.insert(*alias, idx);
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&Builtin> {
        self.by_alias.get(name).map(|&idx| &self.procs[idx])
    }

    pub fn arity(&self, name: &str) -> Option<usize> {
        self.lookup(name).map(Builtin::arity)
    }
}

fn set_pen_color(turtle: &mut dyn Turtle, idx: i32) -> Result<(), EvalError> {
    let color = Color::try_from(idx).map_err(|_| EvalError::BadArg {
        name: "setpencolor".to_owned(),
        value: idx,
    })?;
    turtle.set_pen_color(color);
    Ok(())
}

impl Default for Builtins {
    fn default() -> Self {
        let mut ret = Builtins::empty();
        ret.def(&["home"], Handler::Zero(|t| t.teleport(0, 0)));
        ret.def(&["penup", "pu"], Handler::Zero(|t| t.pen_up()));
        ret.def(&["pendown", "pd"], Handler::Zero(|t| t.pen_down()));
        ret.def(&["clean", "cg"], Handler::Zero(|t| t.clear()));
        ret.def(&["hideturtle", "ht"], Handler::Zero(|t| t.hide()));
        ret.def(&["showturtle", "st"], Handler::Zero(|t| t.show()));
        ret.def(&["setpencolor", "setpc", "setc"], Handler::One(set_pen_color));
        ret.def(
            &["forward", "fd"],
            Handler::One(|t, x| {
                t.move_forward(x);
                Ok(())
            }),
        );
        ret.def(
            &["back", "bk"],
            Handler::One(|t, x| {
                t.move_back(x);
                Ok(())
            }),
        );
        ret.def(
            &["left", "lt"],
            Handler::One(|t, x| {
                t.turn_left(x);
                Ok(())
            }),
        );
        ret.def(
            &["right", "rt"],
            Handler::One(|t, x| {
                t.turn_right(x);
                Ok(())
            }),
        );
        ret
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::turtle::TurtleCmd;

    #[test]
    fn aliases() {
        let builtins = Builtins::default();
        for (alias, name, arity) in [
            ("home", "home", 0),
            ("pu", "penup", 0),
            ("pd", "pendown", 0),
            ("cg", "clean", 0),
            ("ht", "hideturtle", 0),
            ("st", "showturtle", 0),
            ("setc", "setpencolor", 1),
            ("setpc", "setpencolor", 1),
            ("fd", "forward", 1),
            ("bk", "back", 1),
            ("lt", "left", 1),
            ("rt", "right", 1),
        ] {
            let b = builtins.lookup(alias).unwrap();
            assert_eq!(b.name(), name);
            assert_eq!(b.arity(), arity);
        }
        assert!(builtins.lookup("FD").is_none());
        assert!(builtins.lookup("to").is_none());
        assert!(builtins.lookup("clear").is_none());
    }

    #[test]
    fn call() {
        let builtins = Builtins::default();
        let mut out: Vec<TurtleCmd> = Vec::new();
        builtins.lookup("fd").unwrap().call(&mut out, &[10]).unwrap();
        builtins.lookup("home").unwrap().call(&mut out, &[]).unwrap();
        builtins.lookup("setc").unwrap().call(&mut out, &[4]).unwrap();
        assert_eq!(
            out,
            vec![
                TurtleCmd::Forward(10),
                TurtleCmd::Teleport(0, 0),
                TurtleCmd::SetPenColor(Color::Red)
            ]
        );

        assert_eq!(
            builtins.lookup("setc").unwrap().call(&mut out, &[16]),
            Err(EvalError::BadArg {
                name: "setpencolor".to_owned(),
                value: 16
            })
        );
        assert!(matches!(
            builtins.lookup("fd").unwrap().call(&mut out, &[]),
            Err(EvalError::WrongArgCount { expected: 1, .. })
        ));
    }
}
