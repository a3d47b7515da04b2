//! Human-readable rendering of interned types for diagnostics and test
//! failure messages. Not a parseable syntax: unions of slot DNFs are joined
//! with `∨`, coclauses spell out their variable literals, recursive
//! back-references print as `#id`.

use rustc_hash::FxHashSet;

use crate::bdd::{Bdd, Coclause, Leaf};
use crate::dnf::atoms::AtomSet;
use crate::dnf::interval::{Endpoint, IntervalSet};
use crate::intern::TypeStore;
use crate::ty::TyRec;
use crate::types::{TypeId, TypeVar};

const MAX_RENDER_DEPTH: u32 = 16;

pub(crate) fn render(store: &TypeStore, t: TypeId) -> String {
    let mut p = Printer {
        store,
        depth: 0,
        open: FxHashSet::default(),
    };
    p.ty(t)
}

struct Printer<'a> {
    store: &'a TypeStore,
    depth: u32,
    open: FxHashSet<TypeId>,
}

impl<'a> Printer<'a> {
    fn ty(&mut self, t: TypeId) -> String {
        if t == TypeId::EMPTY {
            return "none()".to_string();
        }
        if t == TypeId::ANY {
            return "any()".to_string();
        }
        if self.depth >= MAX_RENDER_DEPTH || !self.open.insert(t) {
            return format!("#{}", t.0);
        }
        self.depth += 1;
        let rec = self.store.resolve(t);
        let out = self.rec(&rec);
        self.depth -= 1;
        self.open.remove(&t);
        out
    }

    fn rec(&mut self, rec: &TyRec) -> String {
        let mut parts: Vec<String> = Vec::new();
        self.var_slot(&rec.atoms, "atom()", &mut parts, |p, leaf| p.atom_set(leaf));
        self.var_slot(&rec.ints, "integer()", &mut parts, |p, leaf| {
            p.interval_set(leaf)
        });
        self.var_slot(&rec.bits, "bitstring()", &mut parts, |p, leaf| {
            p.dnf_leaf(leaf, "bitstring()", |_, a| {
                format!("bitstring({}, {})", a.size, a.unit)
            })
        });
        for c in rec.tuples.default_part().coclauses() {
            let leaf = if c.leaf.is_top() {
                "tuple()".to_string()
            } else {
                "tuple(…)".to_string()
            };
            parts.push(self.clause(&c.pos, &c.neg, leaf));
        }
        for bdd in rec.tuples.entries().values() {
            self.var_slot(bdd, "tuple()", &mut parts, |p, leaf| {
                p.dnf_leaf(leaf, "tuple()", |p, a| {
                    let elems: Vec<String> = a.elems.iter().map(|&e| p.ty(e)).collect();
                    format!("{{{}}}", elems.join(", "))
                })
            });
        }
        for c in rec.funs.default_part().coclauses() {
            let leaf = if c.leaf.is_top() {
                "fun()".to_string()
            } else {
                "fun(…)".to_string()
            };
            parts.push(self.clause(&c.pos, &c.neg, leaf));
        }
        for bdd in rec.funs.entries().values() {
            self.var_slot(bdd, "fun()", &mut parts, |p, leaf| {
                p.dnf_leaf(leaf, "fun()", |p, a| {
                    let doms: Vec<String> = a.domains.iter().map(|&d| p.ty(d)).collect();
                    format!("fun(({}) -> {})", doms.join(", "), p.ty(a.codomain))
                })
            });
        }
        self.var_slot(&rec.records, "record()", &mut parts, |p, leaf| {
            p.dnf_leaf(leaf, "record()", |p, a| {
                let name = p.store.symbol_name(a.name);
                let fields: Vec<String> = a.fields.iter().map(|&f| p.ty(f)).collect();
                format!("#{}{{{}}}", name, fields.join(", "))
            })
        });
        self.var_slot(&rec.maps, "map()", &mut parts, |p, leaf| {
            p.dnf_leaf(leaf, "map()", |p, a| {
                format!("#{{{} => {}}}", p.ty(a.key), p.ty(a.value))
            })
        });
        if parts.is_empty() {
            "none()".to_string()
        } else {
            parts.join(" ∨ ")
        }
    }

    /// Render one variable-layer slot: each coclause becomes
    /// `vars ∧ ¬vars ∧ leaf`.
    fn var_slot<L: Leaf>(
        &mut self,
        bdd: &Bdd<TypeVar, L>,
        top: &str,
        parts: &mut Vec<String>,
        mut leaf_fn: impl FnMut(&mut Self, &L) -> String,
    ) {
        for c in bdd.coclauses() {
            let leaf = if c.leaf.is_top() {
                top.to_string()
            } else {
                leaf_fn(self, &c.leaf)
            };
            parts.push(self.clause(&c.pos, &c.neg, leaf));
        }
    }

    fn clause(&mut self, pos: &[TypeVar], neg: &[TypeVar], leaf: String) -> String {
        let mut pieces: Vec<String> = Vec::new();
        for &v in pos {
            pieces.push(self.store.type_var_name(v).to_string());
        }
        for &v in neg {
            pieces.push(format!("¬{}", self.store.type_var_name(v)));
        }
        pieces.push(leaf);
        if pieces.len() == 1 {
            pieces.pop().unwrap_or_default()
        } else {
            format!("({})", pieces.join(" ∧ "))
        }
    }

    /// Render an inner (Boolean-terminal) DNF by its coclauses.
    fn dnf_leaf<A: crate::bdd::BddAtom>(
        &mut self,
        leaf: &Bdd<A, bool>,
        top: &str,
        mut atom_fn: impl FnMut(&mut Self, &A) -> String,
    ) -> String {
        let coclauses: Vec<Coclause<A, bool>> = leaf.coclauses();
        if coclauses.is_empty() {
            return "none()".to_string();
        }
        let mut parts = Vec::new();
        for c in coclauses {
            let mut pieces = Vec::new();
            for a in &c.pos {
                pieces.push(atom_fn(self, a));
            }
            for a in &c.neg {
                pieces.push(format!("¬{}", atom_fn(self, a)));
            }
            if pieces.is_empty() {
                pieces.push(top.to_string());
            }
            if pieces.len() == 1 {
                parts.push(pieces.pop().unwrap_or_default());
            } else {
                parts.push(format!("({})", pieces.join(" ∧ ")));
            }
        }
        parts.join(" ∨ ")
    }

    fn atom_set(&mut self, set: &AtomSet) -> String {
        match set {
            AtomSet::Finite(syms) => {
                let names: Vec<String> = syms
                    .iter()
                    .map(|&s| format!("'{}'", self.store.symbol_name(s)))
                    .collect();
                names.join(" ∨ ")
            }
            AtomSet::Cofinite(syms) => {
                let names: Vec<String> = syms
                    .iter()
                    .map(|&s| format!("'{}'", self.store.symbol_name(s)))
                    .collect();
                format!("atom() \\ ({})", names.join(" ∨ "))
            }
        }
    }

    fn interval_set(&mut self, set: &IntervalSet) -> String {
        let runs: Vec<String> = set
            .runs()
            .iter()
            .map(|r| match (r.lo, r.hi) {
                (Endpoint::Finite(a), Endpoint::Finite(b)) if a == b => format!("{a}"),
                (lo, hi) => format!("{}..{}", endpoint(lo), endpoint(hi)),
            })
            .collect();
        runs.join(" ∨ ")
    }
}

fn endpoint(e: Endpoint) -> String {
    match e {
        Endpoint::NegInf => "-inf".to_string(),
        Endpoint::PosInf => "+inf".to_string(),
        Endpoint::Finite(n) => n.to_string(),
    }
}
