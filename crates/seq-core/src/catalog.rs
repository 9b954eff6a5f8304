//! Well-known sequences consulted by the lookup strategy.
//!
//! Two sources exist: the process-wide [`Catalog`], built once and never
//! mutated, and a per-prediction [`SessionMemory`] that only lives for the
//! duration of one top-level call.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_FAMILIARITY, PRIME_FAMILIARITY};
use crate::sequence::{Sequence, Term};

/// A sequence trusted for lookup once at least `familiarity` consecutive
/// terms of a probe line up with it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownSequence {
    pub name: String,
    pub terms: Sequence,
    pub familiarity: usize,
}

impl KnownSequence {
    pub fn new(name: impl Into<String>, terms: Sequence, familiarity: usize) -> Self {
        Self {
            name: name.into(),
            terms,
            familiarity,
        }
    }

    /// Descending variant of this entry, same familiarity.
    pub fn reversed(&self) -> Self {
        Self {
            name: format!("{} reversed", self.name),
            terms: self.terms.reversed(),
            familiarity: self.familiarity,
        }
    }
}

fn powers(base: Term, exponents: std::ops::RangeInclusive<u32>) -> Sequence {
    exponents.map(|e| base.pow(e)).collect()
}

fn squares() -> Sequence {
    (1..=11).map(|i: Term| i * i).collect()
}

fn cubes() -> Sequence {
    (1..=6).map(|i: Term| i * i * i).collect()
}

const FIRST_PRIMES: [Term; 9] = [2, 3, 5, 7, 11, 13, 17, 19, 23];

static STANDARD: LazyLock<Catalog> = LazyLock::new(Catalog::build_standard);

/// Immutable collection of known sequences, forward entries first and then
/// their reverses.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    entries: Vec<KnownSequence>,
}

impl Catalog {
    /// Shared standard catalog, built on first use.
    pub fn standard() -> &'static Catalog {
        &STANDARD
    }

    /// Builds a catalog from `entries` and appends the reverse of each.
    pub fn with_reverses(entries: Vec<KnownSequence>) -> Self {
        let reverses: Vec<KnownSequence> = entries.iter().map(KnownSequence::reversed).collect();
        let mut entries = entries;
        entries.extend(reverses);
        Self { entries }
    }

    fn build_standard() -> Self {
        let f = DEFAULT_FAMILIARITY;
        Self::with_reverses(vec![
            KnownSequence::new("squares", squares(), f),
            KnownSequence::new("cubes", cubes(), f),
            KnownSequence::new("powers of 2", powers(2, 0..=11), f),
            KnownSequence::new("powers of 3", powers(3, 0..=7), f),
            KnownSequence::new("powers of 4", powers(4, 0..=6), f),
            KnownSequence::new("powers of 10", powers(10, 0..=4), f),
            KnownSequence::new(
                "primes",
                Sequence::from(&FIRST_PRIMES[..]),
                PRIME_FAMILIARITY,
            ),
        ])
    }

    pub fn entries(&self) -> &[KnownSequence] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &KnownSequence> {
        self.entries.iter()
    }
}

/// Sequences remembered during one top-level prediction.
///
/// Owned by the caller of a single prediction and dropped with it; nothing
/// carries over to the next query.
#[derive(Clone, Debug, Default)]
pub struct SessionMemory {
    entries: Vec<KnownSequence>,
}

impl SessionMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn remember(&mut self, entry: KnownSequence) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &KnownSequence> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find<'a>(catalog: &'a Catalog, name: &str) -> &'a KnownSequence {
        catalog
            .iter()
            .find(|e| e.name == name)
            .unwrap_or_else(|| panic!("missing catalog entry {name}"))
    }

    #[test]
    fn test_standard_has_every_entry_and_its_reverse() {
        let catalog = Catalog::standard();
        assert_eq!(catalog.len(), 14);
        for entry in &catalog.entries()[..7] {
            let reverse = find(catalog, &format!("{} reversed", entry.name));
            assert_eq!(reverse.terms, entry.terms.reversed());
            assert_eq!(reverse.familiarity, entry.familiarity);
        }
    }

    #[test]
    fn test_standard_ranges() {
        let catalog = Catalog::standard();
        let sq = &find(catalog, "squares").terms;
        assert_eq!(sq.len(), 11);
        assert_eq!(sq.last(), Some(121));
        assert_eq!(find(catalog, "cubes").terms.last(), Some(216));
        assert_eq!(find(catalog, "powers of 2").terms.last(), Some(2048));
        assert_eq!(find(catalog, "powers of 3").terms.last(), Some(2187));
        assert_eq!(find(catalog, "powers of 4").terms.last(), Some(4096));
        assert_eq!(find(catalog, "powers of 10").terms.last(), Some(10_000));
        assert_eq!(find(catalog, "powers of 10").terms.first(), Some(1));
    }

    #[test]
    fn test_primes_need_longer_match() {
        let primes = find(Catalog::standard(), "primes");
        assert_eq!(primes.familiarity, PRIME_FAMILIARITY);
        assert_eq!(primes.terms.len(), 9);
        assert_eq!(find(Catalog::standard(), "squares").familiarity, DEFAULT_FAMILIARITY);
    }

    #[test]
    fn test_session_memory_is_per_instance() {
        let mut a = SessionMemory::new();
        let b = SessionMemory::new();
        a.remember(KnownSequence::new("query", Sequence::from(vec![1, 2, 3]), 3));
        assert_eq!(a.len(), 1);
        assert!(b.is_empty());
    }
}
