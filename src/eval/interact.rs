//! The interaction rules.
//!
//! Notation, as in the rule comments: `λx b` lambda, `(f a)` application,
//! `&A<a b>` superposition labelled A, `!A<x y> = e` duplication of `e`
//! into `x` and `y`, `x <- v` substitution.
//!
//! Each rule reads every slot it is about to overwrite before writing it,
//! and allocates everything it needs before its first write.

use super::Runtime;
use crate::data::{Link, Loc, Tag};
use crate::Error;

impl Runtime<'_> {
    /// ```text
    /// (λx b a)
    /// -------- APP-LAM
    /// x <- a
    /// b
    /// ```
    pub(super) fn app_lam(&mut self, host: Loc, term: Link, func: Link) {
        self.interact("app-lam", host, term, func);
        let heap = &mut self.heap;
        let var = heap.child(func, 0);
        let arg = heap.child(term, 1);
        heap.substitute(var, arg);
        // The body may have been the variable itself.
        let body = heap.child(func, 1);
        heap.link(host, body);
        heap.free(term.loc(0), 2);
        heap.free(func.loc(0), 2);
    }

    /// ```text
    /// (&A<f g> a)
    /// ----------------- APP-PAR
    /// !A<a0 a1> = a
    /// &A<(f a0) (g a1)>
    /// ```
    ///
    /// The application's group becomes `(f a0)`,
    /// the superposition's group becomes `(g a1)`.
    pub(super) fn app_par(&mut self, host: Loc, term: Link, func: Link) -> Result<Link, Error> {
        let let0 = self.heap.alloc(3)?;
        let par0 = self.heap.alloc(2)?;
        self.interact("app-par", host, term, func);

        let heap = &mut self.heap;
        let label = func.label();
        let app0 = term.loc(0);
        let app1 = func.loc(0);
        heap.link(let0 + 2, heap.child(term, 1));
        heap.link(app0 + 1, Link::dp0(label, let0));
        heap.link(app0, heap.child(func, 0));
        heap.link(app1, heap.child(func, 1));
        heap.link(app1 + 1, Link::dp1(label, let0));
        heap.link(par0, Link::app(app0));
        heap.link(par0 + 1, Link::app(app1));
        Ok(heap.link(host, Link::par(label, par0)))
    }

    /// ```text
    /// (+ #a #b)
    /// --------- OP2-U32
    /// #(a + b)
    /// ```
    pub(super) fn op2_num(&mut self, host: Loc, term: Link, val0: Link, val1: Link) -> Link {
        self.interact("op2-u32", host, term, val1);
        let result = term.op().apply(val0.num(), val1.num());
        self.heap.free(term.loc(0), 2);
        self.heap.link(host, Link::u32(result))
    }

    /// ```text
    /// (+ &A<a0 a1> b)          (+ a &A<b0 b1>)
    /// ----------------------   ----------------------  OP2-PAR
    /// !A<b0 b1> = b            !A<a0 a1> = a
    /// &A<(+ a0 b0) (+ a1 b1)>  &A<(+ a0 b0) (+ a1 b1)>
    /// ```
    ///
    /// `sup` is the superposed operand, `other` the one that gets duplicated;
    /// `sup_left` says which side `sup` came from, so operand order is kept.
    pub(super) fn op2_par(
        &mut self,
        host: Loc,
        term: Link,
        sup: Link,
        other: Link,
        sup_left: bool,
    ) -> Result<Link, Error> {
        let let0 = self.heap.alloc(3)?;
        let par0 = self.heap.alloc(2)?;
        self.interact("op2-par", host, term, sup);

        let heap = &mut self.heap;
        let label = sup.label();
        let op = term.op();
        let op20 = term.loc(0);
        let op21 = sup.loc(0);
        let s0 = heap.child(sup, 0);
        let s1 = heap.child(sup, 1);
        let d0 = Link::dp0(label, let0);
        let d1 = Link::dp1(label, let0);
        heap.link(let0 + 2, other);
        if sup_left {
            heap.link(op20, s0);
            heap.link(op20 + 1, d0);
            heap.link(op21, s1);
            heap.link(op21 + 1, d1);
        } else {
            heap.link(op20, d0);
            heap.link(op20 + 1, s0);
            heap.link(op21, d1);
            heap.link(op21 + 1, s1);
        }
        heap.link(par0, Link::op2(op, op20));
        heap.link(par0 + 1, Link::op2(op, op21));
        Ok(heap.link(host, Link::par(label, par0)))
    }

    /// ```text
    /// !A<r s> = λx f
    /// --------------- DUP-LAM
    /// !A<f0 f1> = f
    /// r <- λx0 f0
    /// s <- λx1 f1
    /// x <- &A<x0 x1>
    /// ```
    ///
    /// The duplication group is reused for `f`, the old lambda's group
    /// becomes the superposition of the two new variables.
    pub(super) fn dup_lam(&mut self, host: Loc, term: Link, expr: Link) -> Result<(), Error> {
        let lam0 = self.heap.alloc(2)?;
        let lam1 = self.heap.alloc(2)?;
        self.interact("dup-lam", host, term, expr);

        let heap = &mut self.heap;
        let label = term.label();
        let let0 = term.loc(0);
        let par0 = expr.loc(0);

        heap.link(let0 + 2, heap.child(expr, 1));
        heap.link(par0 + 1, Link::var(lam1));

        let x = heap.child(expr, 0);
        heap.link(par0, Link::var(lam0));
        heap.substitute(x, Link::par(label, par0));

        let r = heap.child(term, 0);
        heap.link(lam0 + 1, Link::dp0(label, let0));
        heap.substitute(r, Link::lam(lam0));

        let s = heap.child(term, 1);
        heap.link(lam1 + 1, Link::dp1(label, let0));
        heap.substitute(s, Link::lam(lam1));

        let mine = if term.tag() == Tag::Dp0 { lam0 } else { lam1 };
        heap.link(host, Link::lam(mine));
        Ok(())
    }

    /// ```text
    /// !A<x y> = &A<a b>
    /// ----------------- DUP-PAR (same label)
    /// x <- a
    /// y <- b
    /// ```
    pub(super) fn dup_par_annihilate(&mut self, host: Loc, term: Link, expr: Link) {
        self.interact("dup-par-same", host, term, expr);
        let heap = &mut self.heap;
        heap.substitute(heap.child(term, 0), heap.child(expr, 0));
        heap.substitute(heap.child(term, 1), heap.child(expr, 1));
        let side = if term.tag() == Tag::Dp0 { 0 } else { 1 };
        heap.link(host, heap.child(expr, side));
        heap.free(term.loc(0), 3);
        heap.free(expr.loc(0), 2);
    }

    /// ```text
    /// !A<x y> = &B<a b>
    /// ----------------- DUP-PAR (different labels)
    /// x <- &B<xa xb>
    /// y <- &B<ya yb>
    /// !A<xa ya> = a
    /// !A<xb yb> = b
    /// ```
    ///
    /// The duplication group is reused for `a`,
    /// the superposition's group becomes `&B<ya yb>`.
    pub(super) fn dup_par_commute(
        &mut self,
        host: Loc,
        term: Link,
        expr: Link,
    ) -> Result<Link, Error> {
        let par0 = self.heap.alloc(2)?;
        let let1 = self.heap.alloc(3)?;
        self.interact("dup-par", host, term, expr);

        let heap = &mut self.heap;
        let a = term.label();
        let b = expr.label();
        let let0 = term.loc(0);
        let par1 = expr.loc(0);

        heap.link(let0 + 2, heap.child(expr, 0));
        heap.link(let1 + 2, heap.child(expr, 1));

        let y = heap.child(term, 1);
        heap.link(par1, Link::dp1(a, let0));
        heap.link(par1 + 1, Link::dp1(a, let1));
        heap.substitute(y, Link::par(b, par1));

        let x = heap.child(term, 0);
        heap.link(par0, Link::dp0(a, let0));
        heap.link(par0 + 1, Link::dp0(a, let1));
        heap.substitute(x, Link::par(b, par0));

        let mine = if term.tag() == Tag::Dp0 { par0 } else { par1 };
        Ok(heap.link(host, Link::par(b, mine)))
    }

    /// ```text
    /// !A<x y> = {K a b ...}
    /// --------------------- DUP-CTR
    /// !A<a0 a1> = a
    /// !A<b0 b1> = b
    /// ...
    /// x <- {K a0 b0 ...}
    /// y <- {K a1 b1 ...}
    /// ```
    ///
    /// Also applies to stuck calls, which keep their CAL tag.
    pub(super) fn dup_ctr(&mut self, host: Loc, term: Link, expr: Link) -> Result<Link, Error> {
        let arity = expr.arity() as u64;
        let rebuild = |loc: Loc| match expr.tag() {
            Tag::Cal => Link::cal(expr.fun(), expr.arity(), loc),
            _ => Link::ctr(expr.fun(), expr.arity(), loc),
        };

        if arity == 0 {
            self.interact("dup-ctr", host, term, expr);
            let heap = &mut self.heap;
            let empty = rebuild(0);
            heap.substitute(heap.child(term, 0), empty);
            heap.substitute(heap.child(term, 1), empty);
            heap.free(term.loc(0), 3);
            return Ok(heap.link(host, empty));
        }

        let ctr1 = self.heap.alloc(arity)?;
        // The first field reuses the duplication group.
        let mut lets = Vec::with_capacity(arity as usize);
        lets.push(term.loc(0));
        for _ in 1..arity {
            lets.push(self.heap.alloc(3)?);
        }
        self.interact("dup-ctr", host, term, expr);

        let heap = &mut self.heap;
        let label = term.label();
        let ctr0 = expr.loc(0);
        let x = heap.child(term, 0);
        let y = heap.child(term, 1);
        for (i, leti) in (0..arity).zip(lets) {
            let field = heap.child(expr, i);
            heap.link(ctr0 + i, Link::dp0(label, leti));
            heap.link(ctr1 + i, Link::dp1(label, leti));
            heap.link(leti + 2, field);
        }
        heap.substitute(x, rebuild(ctr0));
        heap.substitute(y, rebuild(ctr1));

        let mine = if term.tag() == Tag::Dp0 { ctr0 } else { ctr1 };
        Ok(heap.link(host, rebuild(mine)))
    }

    /// ```text
    /// !A<x y> = #k
    /// ------------ DUP-U32
    /// x <- #k
    /// y <- #k
    /// ```
    ///
    /// Copying a number never repeats work, so it is not counted.
    pub(super) fn dup_num(&mut self, host: Loc, term: Link, expr: Link) {
        tracing::trace!("dup-u32 at {}: {} {}", host, term, expr);
        let heap = &mut self.heap;
        heap.substitute(heap.child(term, 0), expr);
        heap.substitute(heap.child(term, 1), expr);
        heap.link(host, expr);
        heap.free(term.loc(0), 3);
    }
}
