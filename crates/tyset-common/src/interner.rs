//! String interning for atom and type-variable names.
//!
//! The engine manipulates names (language atoms such as `'ok'`, type-variable
//! names such as `a`) as small copyable ids. The `Interner` is shared
//! process-wide: interning serializes through the sharded map, resolution
//! takes a short read lock on the append-only name table.

use std::sync::{Arc, RwLock};

use dashmap::DashMap;
use serde::Serialize;

/// An interned string. Two symbols are equal iff their strings are equal
/// within the same interner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Symbol(pub u32);

/// Deduplicating string table.
///
/// Ids are assigned in interning order and are stable for the lifetime of the
/// interner; the name table only ever grows.
#[derive(Debug, Default)]
pub struct Interner {
    ids: DashMap<Arc<str>, u32>,
    names: RwLock<Vec<Arc<str>>>,
}

impl Interner {
    pub fn new() -> Self {
        Interner {
            ids: DashMap::new(),
            names: RwLock::new(Vec::new()),
        }
    }

    /// Intern a string, returning its symbol. Idempotent.
    pub fn intern(&self, name: &str) -> Symbol {
        if let Some(id) = self.ids.get(name) {
            return Symbol(*id);
        }
        let key: Arc<str> = Arc::from(name);
        let id = *self.ids.entry(Arc::clone(&key)).or_insert_with(|| {
            let mut names = self.names.write().expect("interner name table poisoned");
            let id = names.len() as u32;
            names.push(key);
            id
        });
        Symbol(id)
    }

    /// Resolve a symbol back to its string.
    ///
    /// Panics on a symbol that was not produced by this interner; that is a
    /// caller bug, not a recoverable condition.
    pub fn resolve(&self, sym: Symbol) -> Arc<str> {
        let names = self.names.read().expect("interner name table poisoned");
        Arc::clone(
            names
                .get(sym.0 as usize)
                .unwrap_or_else(|| panic!("dangling symbol {:?}", sym)),
        )
    }

    /// Number of interned strings.
    pub fn len(&self) -> usize {
        self.names.read().expect("interner name table poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intern_deduplicates() {
        let interner = Interner::new();
        let a = interner.intern("ok");
        let b = interner.intern("ok");
        let c = interner.intern("error");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(&*interner.resolve(a), "ok");
        assert_eq!(&*interner.resolve(c), "error");
    }

    #[test]
    fn ids_are_stable() {
        let interner = Interner::new();
        let first = interner.intern("first");
        for i in 0..100 {
            interner.intern(&format!("filler{i}"));
        }
        assert_eq!(interner.intern("first"), first);
        assert_eq!(interner.len(), 101);
    }
}
