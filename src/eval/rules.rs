//! User-defined rewrite rules for function-call (CAL) nodes.
//!
//! The evaluator knows nothing about individual functions. When it meets a
//! CAL node it asks the session's `Rulebook`, which may force arguments with
//! `Runtime::reduce`, rewire the graph through `Runtime::heap_mut`, and link
//! a new node into the host slot.

use std::collections::HashMap;

use super::Runtime;
use crate::data::{FunId, Link, Loc};
use crate::Error;

pub trait Rulebook {
    /// Try to rewrite the call `term` held in `host`.
    ///
    /// On a match, the rule links the result into `host` and returns it;
    /// the call's slot group is the rule's to reuse or free.
    /// `None` leaves the node untouched: the call is stuck, which is a
    /// normal form rather than an error.
    fn rewrite(&self, rt: &mut Runtime<'_>, host: Loc, term: Link)
        -> Result<Option<Link>, Error>;
}

/// A rulebook with no rules: every call is stuck.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoRules;

impl Rulebook for NoRules {
    fn rewrite(&self, _: &mut Runtime<'_>, _: Loc, _: Link) -> Result<Option<Link>, Error> {
        Ok(None)
    }
}

/// A single function's rewrite rule.
pub type Rule = Box<dyn Fn(&mut Runtime<'_>, Loc, Link) -> Result<Option<Link>, Error>>;

/// Rules keyed by function id.
#[derive(Default)]
pub struct RuleTable {
    rules: HashMap<FunId, Rule>,
}

impl RuleTable {
    pub fn new() -> Self {
        Default::default()
    }

    /// Set the rule for `fun`, replacing any previous one.
    pub fn insert<F>(&mut self, fun: FunId, rule: F)
    where
        F: Fn(&mut Runtime<'_>, Loc, Link) -> Result<Option<Link>, Error> + 'static,
    {
        self.rules.insert(fun, Box::new(rule));
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Rulebook for RuleTable {
    fn rewrite(&self, rt: &mut Runtime<'_>, host: Loc, term: Link) -> Result<Option<Link>, Error> {
        match self.rules.get(&term.fun()) {
            Some(rule) => rule(rt, host, term),
            None => Ok(None),
        }
    }
}
