//! Packed links: a node reference in a single word.
//!
//! Layout, from the least significant bit:
//!
//! ```text
//!  0..4    tag
//!  4..24   label (PAR, DP0, DP1)
//!          or function id (4..20) + arity (20..24) (CTR, CAL)
//!          or operator (4..8) (OP2)
//! 24..64   location of the node's first slot
//! ```
//!
//! U32 links are the exception: the 32-bit value lives in bits 4..36,
//! and there is no location.

use std::sync::OnceLock;

use regex::Regex;

use super::Tag;
use crate::eval::Op;

/// A slot index in the heap.
pub type Loc = u64;

/// A function / constructor identifier.
pub type FunId = u16;

/// A sharing label, distinguishing independent duplication contexts.
pub type Label = u32;

const TAG_MASK: u64 = 0xF;
const SUB_SHIFT: u32 = 4;
const ARITY_SHIFT: u32 = 20;
const LOC_SHIFT: u32 = 24;

/// Number of bits in a sharing label.
pub const LABEL_BITS: u32 = 20;
/// Largest sharing label that fits in a link.
pub const MAX_LABEL: Label = (1 << LABEL_BITS) - 1;
/// Largest arity that fits in a link.
pub const MAX_ARITY: u8 = 0xF;
/// Number of bits in a location.
pub const LOC_BITS: u32 = 64 - LOC_SHIFT;
/// One past the largest addressable location.
pub const LOC_LIMIT: u64 = 1 << LOC_BITS;

/// A reference to a node: tag, kind-specific fields and a heap location.
///
/// A link is a plain value. Any number of slots may hold a copy of it;
/// the heap is the only owner of node storage.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Link(u64);

impl Link {
    /// The unbound placeholder.
    pub const NIL: Link = Link(0);

    #[inline]
    const fn node(tag: Tag, sub: u64, loc: Loc) -> Link {
        Link(tag as u64 | (sub << SUB_SHIFT) | (loc << LOC_SHIFT))
    }

    pub const fn lam(loc: Loc) -> Link {
        Link::node(Tag::Lam, 0, loc)
    }

    pub const fn app(loc: Loc) -> Link {
        Link::node(Tag::App, 0, loc)
    }

    pub const fn par(label: Label, loc: Loc) -> Link {
        Link::node(Tag::Par, (label & MAX_LABEL) as u64, loc)
    }

    pub const fn dp0(label: Label, loc: Loc) -> Link {
        Link::node(Tag::Dp0, (label & MAX_LABEL) as u64, loc)
    }

    pub const fn dp1(label: Label, loc: Loc) -> Link {
        Link::node(Tag::Dp1, (label & MAX_LABEL) as u64, loc)
    }

    pub const fn var(loc: Loc) -> Link {
        Link::node(Tag::Var, 0, loc)
    }

    /// Back-reference from a binder or duplication slot to its reader.
    pub const fn arg(loc: Loc) -> Link {
        Link::node(Tag::Arg, 0, loc)
    }

    pub const fn ctr(fun: FunId, arity: u8, loc: Loc) -> Link {
        Link::node(Tag::Ctr, Self::fun_arity(fun, arity), loc)
    }

    pub const fn cal(fun: FunId, arity: u8, loc: Loc) -> Link {
        Link::node(Tag::Cal, Self::fun_arity(fun, arity), loc)
    }

    const fn fun_arity(fun: FunId, arity: u8) -> u64 {
        fun as u64 | (((arity & MAX_ARITY) as u64) << (ARITY_SHIFT - SUB_SHIFT))
    }

    pub const fn op2(op: Op, loc: Loc) -> Link {
        Link::node(Tag::Op2, op as u64, loc)
    }

    pub const fn u32(value: u32) -> Link {
        Link(Tag::U32 as u64 | ((value as u64) << SUB_SHIFT))
    }

    /// Rebuild a link from its raw word.
    /// Fails if the tag bits do not name a node kind.
    pub fn from_raw(raw: u64) -> Result<Link, String> {
        if raw & TAG_MASK > Tag::U32 as u64 {
            return Err(format!("invalid tag code {} in {:#x}", raw & TAG_MASK, raw));
        }
        Ok(Link(raw))
    }

    pub const fn raw(self) -> u64 {
        self.0
    }

    #[inline]
    pub fn tag(self) -> Tag {
        ((self.0 & TAG_MASK) as u8).into()
    }

    #[inline]
    pub fn is_nil(self) -> bool {
        self.tag() == Tag::Nil
    }

    /// The sharing label of a PAR, DP0 or DP1 link.
    #[inline]
    pub fn label(self) -> Label {
        ((self.0 >> SUB_SHIFT) & MAX_LABEL as u64) as Label
    }

    /// The function id of a CTR or CAL link.
    #[inline]
    pub fn fun(self) -> FunId {
        ((self.0 >> SUB_SHIFT) & 0xFFFF) as FunId
    }

    /// The arity of a CTR or CAL link.
    #[inline]
    pub fn arity(self) -> u8 {
        ((self.0 >> ARITY_SHIFT) & MAX_ARITY as u64) as u8
    }

    /// The operator of an OP2 link.
    #[inline]
    pub fn op(self) -> Op {
        Op::from_code(((self.0 >> SUB_SHIFT) & 0xF) as u8)
    }

    /// The value of a U32 link.
    #[inline]
    pub fn num(self) -> u32 {
        (self.0 >> SUB_SHIFT) as u32
    }

    /// Location of the `arg`-th slot of the node this link points at.
    #[inline]
    pub fn loc(self, arg: u64) -> Loc {
        (self.0 >> LOC_SHIFT) + arg
    }
}

impl std::fmt::Debug for Link {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Link({})", self)
    }
}

impl std::fmt::Display for Link {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = self.tag();
        match tag {
            Tag::U32 => write!(f, "u32#{}", self.num()),
            Tag::Par | Tag::Dp0 | Tag::Dp1 => {
                write!(f, "{}:{}#{}", tag.name(), self.label(), self.loc(0))
            }
            Tag::Ctr | Tag::Cal => write!(
                f,
                "{}:{}/{}#{}",
                tag.name(),
                self.fun(),
                self.arity(),
                self.loc(0)
            ),
            Tag::Op2 => write!(f, "op2:{}#{}", self.op(), self.loc(0)),
            _ => write!(f, "{}#{}", tag.name(), self.loc(0)),
        }
    }
}

fn link_syntax() -> &'static Regex {
    static SYNTAX: OnceLock<Regex> = OnceLock::new();
    SYNTAX.get_or_init(|| {
        Regex::new(r"\A([a-z][a-z0-9]{2})(?::([a-z0-9]+)(?:/([0-9]+))?)?#([0-9]+)\z")
            .expect("could not compile regex for links")
    })
}

impl std::str::FromStr for Link {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = link_syntax()
            .captures(s)
            .ok_or_else(|| format!("invalid link {}", s))?;
        let tag: Tag = caps[1].parse()?;
        let sub = caps.get(2).map(|m| m.as_str());
        let arity = caps.get(3).map(|m| m.as_str());
        let value: u64 = caps[4]
            .parse()
            .map_err(|e| format!("invalid location: {}", e))?;

        let number = |field: Option<&str>, max: u64, what: &str| -> Result<u64, String> {
            let field = field.ok_or_else(|| format!("{} link {} is missing its {}", tag.name(), s, what))?;
            let n: u64 = field
                .parse()
                .map_err(|e| format!("invalid {}: {}", what, e))?;
            if n > max {
                return Err(format!("{} {} is out of range", what, n));
            }
            Ok(n)
        };

        if tag == Tag::U32 {
            if sub.is_some() {
                return Err(format!("u32 link {} takes no subfield", s));
            }
            let n = u32::try_from(value).map_err(|e| format!("invalid u32 value: {}", e))?;
            return Ok(Link::u32(n));
        }
        if value >= LOC_LIMIT {
            return Err(format!("location {} is out of range", value));
        }
        let takes_sub = matches!(
            tag,
            Tag::Par | Tag::Dp0 | Tag::Dp1 | Tag::Ctr | Tag::Cal | Tag::Op2
        );
        if !takes_sub && sub.is_some() {
            return Err(format!("{} link {} takes no subfield", tag.name(), s));
        }
        if arity.is_some() && !matches!(tag, Tag::Ctr | Tag::Cal) {
            return Err(format!("{} link {} takes no arity", tag.name(), s));
        }

        Ok(match tag {
            Tag::Par | Tag::Dp0 | Tag::Dp1 => {
                let label = number(sub, MAX_LABEL as u64, "label")? as Label;
                Link::node(tag, label as u64, value)
            }
            Tag::Ctr | Tag::Cal => {
                let fun = number(sub, u16::MAX as u64, "function id")? as FunId;
                let arity = number(arity, MAX_ARITY as u64, "arity")? as u8;
                Link::node(tag, Link::fun_arity(fun, arity), value)
            }
            Tag::Op2 => {
                let op: Op = sub
                    .ok_or_else(|| format!("op2 link {} is missing its operator", s))?
                    .parse()?;
                Link::op2(op, value)
            }
            _ => Link::node(tag, 0, value),
        })
    }
}
