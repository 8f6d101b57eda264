//! The function / constructor table.
//!
//! Each distinct name gets a small integer id (the one stored in CTR and CAL
//! links) and a declared arity. Ids are handed out in declaration order.

use std::collections::HashMap;

use string_interner::{DefaultStringInterner, DefaultSymbol};

use super::{FunId, MAX_ARITY};
use crate::Error;

#[derive(Default)]
pub struct Symbols {
    names: DefaultStringInterner,
    ids: HashMap<DefaultSymbol, FunId>,
    /// Indexed by id.
    entries: Vec<(DefaultSymbol, u8)>,
}

impl Symbols {
    pub fn new() -> Self {
        Default::default()
    }

    /// Declare `name` with the given arity, returning its id.
    /// Declaring the same name again with the same arity returns the same id.
    pub fn declare(&mut self, name: &str, arity: u8) -> Result<FunId, Error> {
        if arity > MAX_ARITY {
            return Err(Error::ArityOverflow {
                name: name.to_string(),
                arity,
            });
        }
        if let Some(id) = self.id(name) {
            let declared = self.entries[id as usize].1;
            if declared != arity {
                return Err(Error::ArityConflict {
                    name: name.to_string(),
                    declared,
                    found: arity as usize,
                });
            }
            return Ok(id);
        }
        let id = FunId::try_from(self.entries.len()).map_err(|_| Error::SymbolTableFull)?;
        let symbol = self.names.get_or_intern(name);
        self.ids.insert(symbol, id);
        self.entries.push((symbol, arity));
        tracing::trace!("declared {}/{} as {}", name, arity, id);
        Ok(id)
    }

    /// Look up the id of a declared name.
    pub fn id(&self, name: &str) -> Option<FunId> {
        let symbol = self.names.get(name)?;
        self.ids.get(&symbol).copied()
    }

    pub fn name(&self, id: FunId) -> Option<&str> {
        let (symbol, _) = self.entries.get(id as usize)?;
        self.names.resolve(*symbol)
    }

    pub fn arity(&self, id: FunId) -> Option<u8> {
        self.entries.get(id as usize).map(|(_, arity)| *arity)
    }

    /// Resolve a name to its id, checking the number of arguments supplied.
    pub fn check(&self, name: &str, args: usize) -> Result<(FunId, u8), Error> {
        let id = self
            .id(name)
            .ok_or_else(|| Error::UnknownSymbol(name.to_string()))?;
        let declared = self.entries[id as usize].1;
        if declared as usize != args {
            return Err(Error::ArityConflict {
                name: name.to_string(),
                declared,
                found: args,
            });
        }
        Ok((id, declared))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
