//! Graph evaluator.
//!
//! A `Runtime` is one evaluation session: it owns the heap, counts
//! interactions, and borrows the rulebook that rewrites function calls.
//!
//! `reduce` brings one slot to weak-head-normal-form. It loops on the same
//! host while rules keep firing, and recurses to force the parts a rule
//! needs (an application's function, an operator's operands, a duplication's
//! shared expression). `normal` drives `reduce` over a whole graph.

mod interact;
mod normal;
mod ops;
mod rules;

#[cfg(test)]
mod interact_test;

pub use ops::Op;
pub use rules::{NoRules, Rule, RuleTable, Rulebook};

use crate::data::{Config, Heap, Link, Loc, Tag};
use crate::Error;

pub struct Runtime<'r> {
    heap: Heap,
    interactions: u64,
    rules: &'r dyn Rulebook,
}

impl Default for Runtime<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl Runtime<'static> {
    /// A session with the default heap and no function rules.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Runtime::with_rules(config, &NoRules)
    }
}

impl<'r> Runtime<'r> {
    pub fn with_rules(config: Config, rules: &'r dyn Rulebook) -> Self {
        Runtime {
            heap: Heap::with_config(config),
            interactions: 0,
            rules,
        }
    }

    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    pub fn heap_mut(&mut self) -> &mut Heap {
        &mut self.heap
    }

    /// Interactions performed since the session started
    /// or the last call to `normal`.
    pub fn interactions(&self) -> u64 {
        self.interactions
    }

    /// Record one interaction.
    fn interact(&mut self, rule: &'static str, host: Loc, term: Link, other: Link) {
        self.interactions += 1;
        tracing::trace!("{} at {}: {} {}", rule, host, term, other);
    }

    /// Rewrite the node at `host` until no rule applies, and return it.
    pub fn reduce(&mut self, host: Loc) -> Result<Link, Error> {
        loop {
            let term = self.heap.deref(host);
            match term.tag() {
                Tag::App => {
                    let func = self.reduce(term.loc(0))?;
                    match func.tag() {
                        Tag::Lam => {
                            self.app_lam(host, term, func);
                            continue;
                        }
                        Tag::Par => return self.app_par(host, term, func),
                        _ => {}
                    }
                }
                Tag::Op2 => {
                    let val0 = self.reduce(term.loc(0))?;
                    let val1 = self.reduce(term.loc(1))?;
                    match (val0.tag(), val1.tag()) {
                        (Tag::U32, Tag::U32) => return Ok(self.op2_num(host, term, val0, val1)),
                        (Tag::Par, _) => return self.op2_par(host, term, val0, val1, true),
                        (_, Tag::Par) => return self.op2_par(host, term, val1, val0, false),
                        _ => {}
                    }
                }
                Tag::Dp0 | Tag::Dp1 => {
                    let expr = self.reduce(term.loc(2))?;
                    match expr.tag() {
                        Tag::Lam => {
                            self.dup_lam(host, term, expr)?;
                            continue;
                        }
                        Tag::Par if expr.label() == term.label() => {
                            self.dup_par_annihilate(host, term, expr);
                            continue;
                        }
                        Tag::Par => return self.dup_par_commute(host, term, expr),
                        Tag::Ctr | Tag::Cal => return self.dup_ctr(host, term, expr),
                        Tag::U32 => {
                            self.dup_num(host, term, expr);
                            continue;
                        }
                        _ => {}
                    }
                }
                Tag::Cal => {
                    let rules = self.rules;
                    if let Some(root) = rules.rewrite(self, host, term)? {
                        self.interact("call", host, term, root);
                        continue;
                    }
                }
                Tag::Nil
                | Tag::Lam
                | Tag::Par
                | Tag::Var
                | Tag::Arg
                | Tag::Ctr
                | Tag::U32 => {}
            }
            return Ok(term);
        }
    }
}
