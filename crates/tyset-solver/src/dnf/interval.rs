//! The integer constructor: finite unions of (possibly unbounded) intervals.
//!
//! The canonical form is a sorted vector of disjoint, non-adjacent runs, so
//! structural equality coincides with set equality and the lattice can sit
//! directly at the terminals of the variable BDD of the integer slot.
//!
//! Endpoints are kept as `i128` internally so that complementing a run that
//! ends at `i64::MAX` still has a representable successor; the public
//! constructors take `i64`.

use crate::bdd::Leaf;

/// An interval endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Endpoint {
    NegInf,
    Finite(i128),
    PosInf,
}

impl Endpoint {
    fn succ(self) -> Endpoint {
        match self {
            Endpoint::Finite(n) => Endpoint::Finite(n + 1),
            other => other,
        }
    }

    fn pred(self) -> Endpoint {
        match self {
            Endpoint::Finite(n) => Endpoint::Finite(n - 1),
            other => other,
        }
    }
}

/// A single run `lo..=hi`. Invariant: `lo <= hi`, `lo != PosInf`,
/// `hi != NegInf`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Interval {
    pub lo: Endpoint,
    pub hi: Endpoint,
}

/// A canonical union of integer intervals.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IntervalSet {
    runs: Vec<Interval>,
}

impl IntervalSet {
    /// The set `lo..=hi`; `None` means unbounded on that side.
    pub fn range(lo: Option<i64>, hi: Option<i64>) -> Self {
        let lo = lo.map_or(Endpoint::NegInf, |n| Endpoint::Finite(n as i128));
        let hi = hi.map_or(Endpoint::PosInf, |n| Endpoint::Finite(n as i128));
        if lo > hi {
            return Self::bottom();
        }
        IntervalSet {
            runs: vec![Interval { lo, hi }],
        }
    }

    pub fn singleton(n: i64) -> Self {
        Self::range(Some(n), Some(n))
    }

    pub fn runs(&self) -> &[Interval] {
        &self.runs
    }

    pub fn contains(&self, n: i64) -> bool {
        let p = Endpoint::Finite(n as i128);
        self.runs.iter().any(|r| r.lo <= p && p <= r.hi)
    }

    /// Sort and merge overlapping or adjacent runs.
    fn normalized(mut runs: Vec<Interval>) -> Self {
        runs.sort();
        let mut out: Vec<Interval> = Vec::with_capacity(runs.len());
        for run in runs {
            match out.last_mut() {
                Some(prev) if run.lo <= prev.hi.succ() => {
                    if run.hi > prev.hi {
                        prev.hi = run.hi;
                    }
                }
                _ => out.push(run),
            }
        }
        IntervalSet { runs: out }
    }
}

impl Leaf for IntervalSet {
    fn bottom() -> Self {
        IntervalSet { runs: Vec::new() }
    }

    fn top() -> Self {
        IntervalSet {
            runs: vec![Interval {
                lo: Endpoint::NegInf,
                hi: Endpoint::PosInf,
            }],
        }
    }

    fn is_bottom(&self) -> bool {
        self.runs.is_empty()
    }

    fn is_top(&self) -> bool {
        self.runs.len() == 1
            && self.runs[0].lo == Endpoint::NegInf
            && self.runs[0].hi == Endpoint::PosInf
    }

    fn union(&self, other: &Self) -> Self {
        let mut runs = self.runs.clone();
        runs.extend_from_slice(&other.runs);
        Self::normalized(runs)
    }

    fn intersect(&self, other: &Self) -> Self {
        let mut runs = Vec::new();
        for a in &self.runs {
            for b in &other.runs {
                let lo = a.lo.max(b.lo);
                let hi = a.hi.min(b.hi);
                if lo <= hi {
                    runs.push(Interval { lo, hi });
                }
            }
        }
        Self::normalized(runs)
    }

    fn negate(&self) -> Self {
        if self.runs.is_empty() {
            return Self::top();
        }
        let mut runs = Vec::new();
        if self.runs[0].lo != Endpoint::NegInf {
            runs.push(Interval {
                lo: Endpoint::NegInf,
                hi: self.runs[0].lo.pred(),
            });
        }
        for pair in self.runs.windows(2) {
            runs.push(Interval {
                lo: pair[0].hi.succ(),
                hi: pair[1].lo.pred(),
            });
        }
        if self.runs[self.runs.len() - 1].hi != Endpoint::PosInf {
            runs.push(Interval {
                lo: self.runs[self.runs.len() - 1].hi.succ(),
                hi: Endpoint::PosInf,
            });
        }
        IntervalSet { runs }
    }
}
