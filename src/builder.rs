//! Writing initial graphs into a runtime.
//!
//! `Term` is a plain tree with named variables. Building it allocates one
//! node per constructor and wires every variable to its binder, so the
//! result satisfies the heap's back-reference invariant.
//!
//! Variables are affine: each binder may be used at most once.
//! Sharing is spelled out with `Dup`.

use crate::data::{Heap, Label, Link, Symbols, MAX_LABEL, ROOT};
use crate::eval::{Op, Runtime};
use crate::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    Var(String),
    Lam(String, Box<Term>),
    App(Box<Term>, Box<Term>),
    Par(Label, Box<Term>, Box<Term>),
    /// `!label<left right> = expr; body`
    Dup {
        label: Label,
        left: String,
        right: String,
        expr: Box<Term>,
        body: Box<Term>,
    },
    Ctr(String, Vec<Term>),
    Cal(String, Vec<Term>),
    Op2(Op, Box<Term>, Box<Term>),
    U32(u32),
}

impl Term {
    pub fn var(name: &str) -> Term {
        Term::Var(name.to_string())
    }

    pub fn lam(name: &str, body: Term) -> Term {
        Term::Lam(name.to_string(), Box::new(body))
    }

    pub fn app(func: Term, arg: Term) -> Term {
        Term::App(Box::new(func), Box::new(arg))
    }

    pub fn par(label: Label, left: Term, right: Term) -> Term {
        Term::Par(label, Box::new(left), Box::new(right))
    }

    pub fn dup(label: Label, left: &str, right: &str, expr: Term, body: Term) -> Term {
        Term::Dup {
            label,
            left: left.to_string(),
            right: right.to_string(),
            expr: Box::new(expr),
            body: Box::new(body),
        }
    }

    pub fn ctr(name: &str, args: Vec<Term>) -> Term {
        Term::Ctr(name.to_string(), args)
    }

    pub fn cal(name: &str, args: Vec<Term>) -> Term {
        Term::Cal(name.to_string(), args)
    }

    pub fn op2(op: Op, left: Term, right: Term) -> Term {
        Term::Op2(op, Box::new(left), Box::new(right))
    }

    pub fn num(value: u32) -> Term {
        Term::U32(value)
    }
}

/// Variables in scope, innermost last.
#[derive(Default)]
struct Scope {
    bound: Vec<Binding>,
}

struct Binding {
    name: String,
    link: Link,
    used: bool,
}

impl Scope {
    fn bind(&mut self, name: &str, link: Link) {
        self.bound.push(Binding {
            name: name.to_string(),
            link,
            used: false,
        });
    }

    fn unbind(&mut self, count: usize) {
        self.bound.truncate(self.bound.len() - count);
    }

    /// Take the occurrence link for `name`.
    fn take(&mut self, name: &str) -> Result<Link, Error> {
        let binding = self
            .bound
            .iter_mut()
            .rev()
            .find(|b| b.name == name)
            .ok_or_else(|| Error::InvalidTerm(format!("unbound variable {}", name)))?;
        if binding.used {
            return Err(Error::InvalidTerm(format!(
                "variable {} is used more than once",
                name
            )));
        }
        binding.used = true;
        Ok(binding.link)
    }
}

fn check_label(label: Label) -> Result<Label, Error> {
    if label > MAX_LABEL {
        return Err(Error::InvalidTerm(format!(
            "label {} does not fit in {} bits",
            label,
            crate::data::LABEL_BITS
        )));
    }
    Ok(label)
}

/// Allocate `term` and return its root link.
/// The caller places the link with `Heap::link`.
fn build(heap: &mut Heap, symbols: &Symbols, scope: &mut Scope, term: &Term) -> Result<Link, Error> {
    Ok(match term {
        Term::Var(name) => scope.take(name)?,
        Term::Lam(name, body) => {
            let loc = heap.alloc(2)?;
            heap.write(loc, Link::NIL);
            scope.bind(name, Link::var(loc));
            let body = build(heap, symbols, scope, body)?;
            scope.unbind(1);
            heap.link(loc + 1, body);
            Link::lam(loc)
        }
        Term::App(func, arg) => {
            let loc = heap.alloc(2)?;
            let func = build(heap, symbols, scope, func)?;
            heap.link(loc, func);
            let arg = build(heap, symbols, scope, arg)?;
            heap.link(loc + 1, arg);
            Link::app(loc)
        }
        Term::Par(label, left, right) => {
            let label = check_label(*label)?;
            let loc = heap.alloc(2)?;
            let left = build(heap, symbols, scope, left)?;
            heap.link(loc, left);
            let right = build(heap, symbols, scope, right)?;
            heap.link(loc + 1, right);
            Link::par(label, loc)
        }
        Term::Dup {
            label,
            left,
            right,
            expr,
            body,
        } => {
            let label = check_label(*label)?;
            let loc = heap.alloc(3)?;
            heap.write(loc, Link::NIL);
            heap.write(loc + 1, Link::NIL);
            let expr = build(heap, symbols, scope, expr)?;
            heap.link(loc + 2, expr);
            scope.bind(left, Link::dp0(label, loc));
            scope.bind(right, Link::dp1(label, loc));
            let body = build(heap, symbols, scope, body)?;
            scope.unbind(2);
            body
        }
        Term::Ctr(name, args) | Term::Cal(name, args) => {
            let (fun, arity) = symbols.check(name, args.len())?;
            let loc = heap.alloc(arity as u64)?;
            for (i, arg) in (0u64..).zip(args) {
                let arg = build(heap, symbols, scope, arg)?;
                heap.link(loc + i, arg);
            }
            if let Term::Cal(..) = term {
                Link::cal(fun, arity, loc)
            } else {
                Link::ctr(fun, arity, loc)
            }
        }
        Term::Op2(op, left, right) => {
            let loc = heap.alloc(2)?;
            let left = build(heap, symbols, scope, left)?;
            heap.link(loc, left);
            let right = build(heap, symbols, scope, right)?;
            heap.link(loc + 1, right);
            Link::op2(*op, loc)
        }
        Term::U32(value) => Link::u32(*value),
    })
}

impl Runtime<'_> {
    /// Write `term` into the heap and return its root link.
    ///
    /// The link is not stored anywhere yet; place it with `Heap::link` so
    /// a variable or projection at the root gets its back-reference.
    pub fn alloc_term(&mut self, symbols: &Symbols, term: &Term) -> Result<Link, Error> {
        let mut scope = Scope::default();
        build(self.heap_mut(), symbols, &mut scope, term)
    }

    /// Write `term` into the root slot.
    pub fn boot(&mut self, symbols: &Symbols, term: &Term) -> Result<Link, Error> {
        let root = self.alloc_term(symbols, term)?;
        Ok(self.heap_mut().link(ROOT, root))
    }
}
