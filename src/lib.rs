//! Optimal-sharing graph reduction for a lambda calculus with explicit
//! duplication, superposition and 32-bit numbers.
//!
//! A program is a graph in a flat heap (`data::Heap`). Evaluation rewrites
//! the graph in place, one local interaction at a time (`eval::Runtime`),
//! and never copies work that has not been done yet: copies are deferred
//! behind duplication nodes until a projection is demanded.
//!

pub mod builder;
pub mod data;
pub mod eval;

pub use builder::Term;
pub use data::{Config, Heap, Link, Loc, Symbols, Tag, ROOT};
pub use eval::{NoRules, Op, RuleTable, Rulebook, Runtime};

/// Errors reported by the runtime.
///
/// Malformed graphs are not detected; these are the conditions a
/// well-formed program can still run into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The heap cannot grow by `requested` more slots.
    OutOfMemory { requested: u64, capacity: u64 },
    /// A constructor or function name that was never declared.
    UnknownSymbol(String),
    /// A name used with a different number of arguments than declared.
    ArityConflict {
        name: String,
        declared: u8,
        found: usize,
    },
    /// An arity that does not fit in a link.
    ArityOverflow { name: String, arity: u8 },
    /// Every function id is taken.
    SymbolTableFull,
    /// A term that cannot be written as a graph.
    InvalidTerm(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::OutOfMemory {
                requested,
                capacity,
            } => write!(
                f,
                "out of memory: cannot allocate {} slots within a capacity of {}",
                requested, capacity
            ),
            Error::UnknownSymbol(name) => write!(f, "unknown symbol {}", name),
            Error::ArityConflict {
                name,
                declared,
                found,
            } => write!(
                f,
                "{} is declared with arity {} but used with {}",
                name, declared, found
            ),
            Error::ArityOverflow { name, arity } => {
                write!(f, "arity {} of {} does not fit in a link", arity, name)
            }
            Error::SymbolTableFull => write!(f, "symbol table is full"),
            Error::InvalidTerm(e) => write!(f, "invalid term: {}", e),
        }
    }
}

impl std::error::Error for Error {}
