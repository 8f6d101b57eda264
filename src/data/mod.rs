//! Graph storage: packed links and the heap arena they point into.
//!
//! The heap is a flat vector of slots. A node with `n` children owns a
//! contiguous group of `n` slots; its link records where the group starts.
//!
//! The heap never shrinks. Freed groups go onto a free list for their size
//! and are handed out again by the next allocation of that size.
//! There is no compaction: an evaluation session is short-lived.
//!
//! Binders and their occurrences point at each other:
//! - a LAM's slot 0 holds an ARG pointing at the slot that holds its VAR;
//! - a duplication group's slots 0 and 1 hold ARGs pointing at the slots
//!   that hold its DP0 and DP1 links.
//!
//! `Heap::link` maintains that invariant on every write, which is what makes
//! substitution O(1).

mod bitset;
mod gc;
mod link;
mod symbols;
mod tag;

pub use self::bitset::BitSet;
pub use self::link::*;
pub use self::symbols::Symbols;
pub use self::tag::Tag;

use crate::Error;

/// The reserved root slot. `Heap::alloc` never hands it out.
pub const ROOT: Loc = 0;

/// Heap sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of slots, including the root slot.
    /// Clamped to the addressable range of a link.
    pub capacity: u64,
    /// Groups of size `1..=free_list_sizes` are recycled.
    pub free_list_sizes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            capacity: 1 << 28,
            free_list_sizes: 8,
        }
    }
}

#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub struct HeapStats {
    /// Slots the arena has grown to, including the root slot.
    pub slots: usize,
    /// Groups waiting on free lists.
    pub free_groups: usize,
    /// Slots covered by those groups.
    pub free_slots: usize,
}

impl HeapStats {
    /// Slots held by live (or leaked) nodes.
    pub fn used_slots(&self) -> usize {
        self.slots - self.free_slots
    }
}

pub struct Heap {
    slots: Vec<Link>,
    /// `free[n]` holds the start of each free group of `n` slots.
    free: Vec<Vec<Loc>>,
    capacity: u64,
}

impl Default for Heap {
    fn default() -> Self {
        Self::with_config(Config::default())
    }
}

impl Heap {
    pub fn with_config(config: Config) -> Self {
        Heap {
            // The root slot.
            slots: vec![Link::NIL],
            free: vec![Vec::new(); config.free_list_sizes + 1],
            capacity: config.capacity.clamp(1, LOC_LIMIT),
        }
    }

    pub fn current_stats(&self) -> HeapStats {
        let free_groups = self.free.iter().map(Vec::len).sum();
        let free_slots = self
            .free
            .iter()
            .enumerate()
            .map(|(size, groups)| size * groups.len())
            .sum();
        HeapStats {
            slots: self.slots.len(),
            free_groups,
            free_slots,
        }
    }

    /// Number of groups of exactly `size` slots on the free list.
    pub fn free_groups(&self, size: usize) -> usize {
        self.free.get(size).map(Vec::len).unwrap_or(0)
    }

    /// Reserve `size` contiguous slots and return the first location.
    ///
    /// A size of zero reserves nothing and returns 0.
    /// Recycled groups keep whatever they held; callers write every slot
    /// before reading it.
    pub fn alloc(&mut self, size: u64) -> Result<Loc, Error> {
        if size == 0 {
            return Ok(0);
        }
        if let Some(loc) = self.free.get_mut(size as usize).and_then(Vec::pop) {
            return Ok(loc);
        }
        let loc = self.slots.len() as u64;
        let Some(end) = loc.checked_add(size).filter(|end| *end <= self.capacity) else {
            tracing::warn!(
                "heap exhausted: {} slots requested with {} of {} in use",
                size,
                loc,
                self.capacity
            );
            return Err(Error::OutOfMemory {
                requested: size,
                capacity: self.capacity,
            });
        };
        self.slots.resize(end as usize, Link::NIL);
        tracing::trace!("heap grew to {} slots", self.slots.len());
        Ok(loc)
    }

    /// Return a group to the free list.
    /// The contents are neither cleared nor checked.
    pub fn free(&mut self, loc: Loc, size: u64) {
        if size == 0 {
            return;
        }
        match self.free.get_mut(size as usize) {
            Some(list) => list.push(loc),
            None => tracing::debug!("not recycling {} slots at {}", size, loc),
        }
    }

    /// Read a slot.
    #[inline]
    pub fn deref(&self, loc: Loc) -> Link {
        self.slots[loc as usize]
    }

    /// Read the `arg`-th child of the node `term` points at.
    #[inline]
    pub fn child(&self, term: Link, arg: u64) -> Link {
        self.deref(term.loc(arg))
    }

    /// Write a slot without touching back-references.
    #[inline]
    pub fn write(&mut self, loc: Loc, value: Link) {
        self.slots[loc as usize] = value;
    }

    /// Write `value` into `loc`, and if it is an occurrence (VAR, DP0, DP1),
    /// point its binder's slot back at `loc`.
    pub fn link(&mut self, loc: Loc, value: Link) -> Link {
        self.write(loc, value);
        match value.tag() {
            Tag::Var | Tag::Dp0 => self.write(value.loc(0), Link::arg(loc)),
            Tag::Dp1 => self.write(value.loc(1), Link::arg(loc)),
            _ => {}
        }
        value
    }

    /// Deliver `value` to the slot the back-reference `target` points at.
    ///
    /// A NIL target means nothing reads the binder any more;
    /// the value is collected instead.
    pub fn substitute(&mut self, target: Link, value: Link) {
        if target.is_nil() {
            self.collect(value);
        } else {
            self.link(target.loc(0), value);
        }
    }
}
