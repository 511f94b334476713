use std::{collections::HashMap, rc::Rc};

use crate::{ast::FunctionDefinition, error::EvalError, turtle::Turtle};

#[derive(Default)]
pub struct Frame {
    vars: HashMap<String, i32>,
    procs: HashMap<String, Rc<FunctionDefinition>>,
}

/// The chain of scopes visible to the running code.
///
/// Every user procedure call pushes one frame and pops it on return, so the frames always
/// form a stack with the root at the bottom. Lookups walk from the innermost frame outwards.
pub struct Env<'t> {
    root: Frame,
    frames: Vec<Frame>,
    turtle: &'t mut dyn Turtle,
}

impl<'t> Env<'t> {
    pub fn new(turtle: &'t mut dyn Turtle) -> Self {
        Env {
            root: Frame::default(),
            frames: Vec::new(),
            turtle,
        }
    }

    fn chain(&self) -> impl Iterator<Item = &Frame> {
        self.frames.iter().rev().chain(std::iter::once(&self.root))
    }

    fn current(&mut self) -> &mut Frame {
        self.frames.last_mut().unwrap_or(&mut self.root)
    }

    pub fn lookup_var(&self, name: &str) -> Result<i32, EvalError> {
        self.chain()
            .find_map(|frame| frame.vars.get(name).copied())
            .ok_or_else(|| EvalError::UnknownVariable {
                name: name.to_owned(),
            })
    }

    pub fn lookup_proc(&self, name: &str) -> Result<Rc<FunctionDefinition>, EvalError> {
        self.chain()
            .find_map(|frame| frame.procs.get(name).cloned())
            .ok_or_else(|| EvalError::UnknownProcedure {
                name: name.to_owned(),
            })
    }

    /// Binds a variable in the innermost frame, shadowing any outer binding.
    pub fn def_var(&mut self, name: &str, val: i32) {
        self.current().vars.insert(name.to_owned(), val);
    }

    pub fn def_proc(&mut self, proc: Rc<FunctionDefinition>) -> Result<(), EvalError> {
        let frame = self.current();
        if frame.procs.contains_key(&proc.name) {
            return Err(EvalError::DuplicateProcedure {
                name: proc.name.clone(),
            });
        }
        frame.procs.insert(proc.name.clone(), proc);
        Ok(())
    }

    /// Runs `f` in a fresh child frame, which is dropped when `f` returns.
    pub fn scoped<U>(&mut self, f: impl FnOnce(&mut Env<'t>) -> U) -> U {
        self.frames.push(Frame::default());
        let res = f(self);
        self.frames.pop();
        res
    }

    /// The number of frames above the root.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn turtle(&mut self) -> &mut dyn Turtle {
        &mut *self.turtle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::turtle::TurtleCmd;

    fn proc(name: &str) -> Rc<FunctionDefinition> {
        Rc::new(FunctionDefinition {
            name: name.to_owned(),
            params: vec![],
            body: vec![],
        })
    }

    #[test]
    fn shadowing() {
        let mut out: Vec<TurtleCmd> = Vec::new();
        let mut env = Env::new(&mut out);
        env.def_var("a", 1);
        env.def_var("b", 2);

        env.scoped(|env| {
            assert_eq!(env.depth(), 1);
            assert_eq!(env.lookup_var("a"), Ok(1));
            env.def_var("a", 10);
            assert_eq!(env.lookup_var("a"), Ok(10));
            assert_eq!(env.lookup_var("b"), Ok(2));
        });

        assert_eq!(env.depth(), 0);
        assert_eq!(env.lookup_var("a"), Ok(1));
        assert_eq!(
            env.lookup_var("c"),
            Err(EvalError::UnknownVariable {
                name: "c".to_owned()
            })
        );
    }

    #[test]
    fn procs() {
        let mut out: Vec<TurtleCmd> = Vec::new();
        let mut env = Env::new(&mut out);
        env.def_proc(proc("f")).unwrap();
        assert!(matches!(
            env.def_proc(proc("f")),
            Err(EvalError::DuplicateProcedure { .. })
        ));

        env.scoped(|env| {
            assert_eq!(env.lookup_proc("f").unwrap().name, "f");
            // A child frame may define the same name again.
            env.def_proc(proc("f")).unwrap();
            env.def_proc(proc("g")).unwrap();
            assert!(env.lookup_proc("g").is_ok());
        });

        assert!(matches!(
            env.lookup_proc("g"),
            Err(EvalError::UnknownProcedure { .. })
        ));
    }

    #[test]
    fn shared_turtle() {
        let mut out: Vec<TurtleCmd> = Vec::new();
        {
            let mut env = Env::new(&mut out);
            env.turtle().move_forward(1);
            env.scoped(|env| env.turtle().move_back(2));
        }
        assert_eq!(out, vec![TurtleCmd::Forward(1), TurtleCmd::Back(2)]);
    }
}
