//! The bitstring constructor.
//!
//! A bitstring atom `BitsAtom { size, unit }` denotes the bitstrings whose
//! bit length lies in the arithmetic progression `{ size + k·unit | k ≥ 0 }`
//! (`unit = 0` denotes the single length `size`), matching binary patterns
//! like `<<_:size, _:_*unit>>`. A coclause is empty iff the intersection of
//! the positive length sets minus the union of the negative length sets is
//! empty; membership is eventually periodic, so a residue search up to the
//! combined period decides it.

use tyset_common::limits;

use crate::bdd::Bdd;
use crate::types::EngineError;

/// Lengths `{ size + k·unit | k ≥ 0 }`; `unit = 0` means exactly `size`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BitsAtom {
    pub size: u64,
    pub unit: u64,
}

impl BitsAtom {
    pub fn contains(&self, len: u64) -> bool {
        if len < self.size {
            return false;
        }
        if self.unit == 0 {
            len == self.size
        } else {
            (len - self.size) % self.unit == 0
        }
    }
}

pub type BitsDnf = Bdd<BitsAtom, bool>;

fn gcd(a: u128, b: u128) -> u128 {
    if b == 0 { a } else { gcd(b, a % b) }
}

/// Decide emptiness of `⋀ pos ∧ ⋀ ¬neg` over bit lengths.
///
/// Every progression is periodic for lengths past its start, so membership
/// over `[0, S + M)` (`S` the largest start, `M` the lcm of the nonzero
/// units) determines membership everywhere. A combined period past the
/// configured bound is reported as fuel exhaustion rather than decided
/// wrongly.
pub(crate) fn coclause_is_empty(pos: &[BitsAtom], neg: &[BitsAtom]) -> Result<bool, EngineError> {
    let member = |len: u64| pos.iter().all(|a| a.contains(len)) && !neg.iter().any(|a| a.contains(len));

    // A positive exact-size atom pins the candidate length.
    if let Some(exact) = pos.iter().find(|a| a.unit == 0) {
        return Ok(!member(exact.size));
    }

    let mut period: u128 = 1;
    for a in pos.iter().chain(neg.iter()) {
        if a.unit != 0 {
            period = period / gcd(period, a.unit as u128) * a.unit as u128;
            if period > limits::MAX_BITSTRING_PERIOD {
                return Err(EngineError::FuelExhausted);
            }
        }
    }
    let start = pos
        .iter()
        .chain(neg.iter())
        .map(|a| a.size as u128)
        .max()
        .unwrap_or(0);
    let bound = start + period;
    if bound > limits::MAX_BITSTRING_PERIOD {
        return Err(EngineError::FuelExhausted);
    }

    for len in 0..bound as u64 {
        if member(len) {
            return Ok(false);
        }
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atom(size: u64, unit: u64) -> BitsAtom {
        BitsAtom { size, unit }
    }

    #[test]
    fn byte_aligned_within_nibble_aligned() {
        // multiples of 8 are all multiples of 4
        assert!(coclause_is_empty(&[atom(0, 8)], &[atom(0, 4)]).unwrap());
        // but not the other way around (4 is a witness)
        assert!(!coclause_is_empty(&[atom(0, 4)], &[atom(0, 8)]).unwrap());
    }

    #[test]
    fn exact_size_atoms() {
        assert!(coclause_is_empty(&[atom(7, 0)], &[atom(7, 0)]).unwrap());
        assert!(!coclause_is_empty(&[atom(7, 0)], &[atom(8, 0)]).unwrap());
        // 7 is not byte aligned
        assert!(coclause_is_empty(&[atom(7, 0), atom(0, 8)], &[]).unwrap());
    }

    #[test]
    fn universe_is_nonempty() {
        assert!(!coclause_is_empty(&[], &[]).unwrap());
        // the negatives cover everything: unit 1 from 0
        assert!(coclause_is_empty(&[], &[atom(0, 1)]).unwrap());
        // even and odd lengths together cover everything
        assert!(coclause_is_empty(&[], &[atom(0, 2), atom(1, 2)]).unwrap());
    }
}
