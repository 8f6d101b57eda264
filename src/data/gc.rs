//! Reclaiming discarded subgraphs.
//!
//! There is no tracing pass: the reduction rules know exactly when a value
//! loses its last reader (substitution into a NIL binder slot), and hand
//! that value to `Heap::collect`, which frees it eagerly.
//!
//! Duplication groups are the exception. Collecting a DP0 or DP1 only marks
//! that projection dead; the shared expression and the group itself stay
//! allocated even once both projections are dead. Collecting the expression
//! at that point is unsound while a rewrite still has the group half-built,
//! so those slots are leaked until the session ends.

use super::{Heap, Link, Tag};

impl Heap {
    /// Free the node `term` points at, and everything only it reaches.
    pub fn collect(&mut self, term: Link) {
        // Children still to visit; avoids recursion on deep spines.
        let mut stack = vec![term];
        while let Some(term) = stack.pop() {
            match term.tag() {
                Tag::Lam => {
                    let var = self.child(term, 0);
                    if !var.is_nil() {
                        // The occurrence sits somewhere inside the body.
                        self.link(var.loc(0), Link::NIL);
                    }
                    stack.push(self.child(term, 1));
                    self.free(term.loc(0), 2);
                }
                Tag::App | Tag::Par => {
                    stack.push(self.child(term, 1));
                    stack.push(self.child(term, 0));
                    self.free(term.loc(0), 2);
                }
                Tag::Op2 => {
                    // The group belongs to whoever holds the operator.
                    stack.push(self.child(term, 1));
                    stack.push(self.child(term, 0));
                }
                Tag::Ctr | Tag::Cal => {
                    let arity = term.arity() as u64;
                    stack.extend((0..arity).rev().map(|i| self.child(term, i)));
                    self.free(term.loc(0), arity);
                }
                Tag::Var => {
                    self.link(term.loc(0), Link::NIL);
                }
                Tag::Dp0 => {
                    self.link(term.loc(0), Link::NIL);
                }
                Tag::Dp1 => {
                    self.link(term.loc(1), Link::NIL);
                }
                Tag::U32 | Tag::Nil | Tag::Arg => {}
            }
        }
    }
}
