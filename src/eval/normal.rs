use super::Runtime;
use crate::data::{BitSet, Loc, Tag};
use crate::Error;

impl Runtime<'_> {
    /// Reduce the whole graph under `host` to normal form.
    ///
    /// Resets the interaction counter and returns the number of
    /// interactions performed. Each slot is visited at most once, so shared
    /// subgraphs are walked once however many paths lead to them.
    pub fn normal(&mut self, host: Loc) -> Result<u64, Error> {
        self.interactions = 0;
        let start = self.heap.current_stats();
        tracing::debug!("normalizing {} with heap {:?}", host, start);

        let mut seen = BitSet::with_capacity(start.slots);
        // Slots still to visit, next on top.
        let mut pending = vec![host];
        while let Some(host) = pending.pop() {
            if !seen.insert(host) {
                continue;
            }
            let term = self.reduce(host)?;
            match term.tag() {
                Tag::Lam => pending.push(term.loc(1)),
                Tag::App | Tag::Par => {
                    pending.push(term.loc(1));
                    pending.push(term.loc(0));
                }
                Tag::Dp0 | Tag::Dp1 => pending.push(term.loc(2)),
                Tag::Ctr | Tag::Cal => {
                    pending.extend((0..term.arity() as u64).rev().map(|i| term.loc(i)))
                }
                // Operands were already forced by `reduce`.
                Tag::Op2 => {}
                Tag::Nil | Tag::Var | Tag::Arg | Tag::U32 => {}
            }
        }

        tracing::debug!(
            "normalized {} in {} interactions, {} slots visited, heap {:?}",
            host,
            self.interactions,
            seen.len(),
            self.heap.current_stats()
        );
        Ok(self.interactions)
    }
}
