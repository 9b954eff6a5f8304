use serde::Serialize;

use crate::catalog::{Catalog, KnownSequence, SessionMemory};
use crate::constants::MIN_MATCH_SIZE;
use crate::sequence::{Sequence, Term};

/// A suffix alignment of a probe inside a known sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchHit {
    /// Number of aligned terms.
    pub size: usize,
    /// The known term right after the aligned run.
    pub next: Term,
}

/// Where a lookup hit came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOrigin {
    Session,
    Catalog,
}

/// Best hit across all sources, with the entry it matched.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LookupMatch {
    pub entry: KnownSequence,
    pub origin: MatchOrigin,
    pub size: usize,
    pub next: Term,
}

/// Align the end of `probe` against a run of `known` ending at `b`, for
/// every `b` from `known.len() - 2` down to `0`.
///
/// Walking backward from `known[b]` and `probe[last]`, every pair must be
/// equal until either side runs out. The longest such run wins, and among
/// equal lengths the first anchor scanned (the largest `b`) is kept. Runs
/// shorter than [`MIN_MATCH_SIZE`] are not reported.
pub fn match_sequence(probe: &Sequence, known: &Sequence) -> Option<MatchHit> {
    let probe = probe.as_slice();
    let known = known.as_slice();

    let mut best_size = 0;
    let mut best_b = None;
    for b in (0..known.len().saturating_sub(1)).rev() {
        let span = (b + 1).min(probe.len());
        let aligned = (0..span).all(|k| known[b - k] == probe[probe.len() - 1 - k]);
        if aligned && span > best_size {
            best_size = span;
            best_b = Some(b);
        }
    }

    match best_b {
        Some(b) if best_size >= MIN_MATCH_SIZE => Some(MatchHit {
            size: best_size,
            next: known[b + 1],
        }),
        _ => None,
    }
}

/// Best match of `probe` over the session entries, then the catalog.
///
/// Only a strictly longer match replaces the current best, so earlier
/// sources win ties. The winner must also reach its entry's familiarity.
pub fn lookup(probe: &Sequence, session: &SessionMemory, catalog: &Catalog) -> Option<LookupMatch> {
    let sources = session
        .iter()
        .map(|e| (e, MatchOrigin::Session))
        .chain(catalog.iter().map(|e| (e, MatchOrigin::Catalog)));

    let mut best: Option<(&KnownSequence, MatchOrigin, MatchHit)> = None;
    for (entry, origin) in sources {
        let Some(hit) = match_sequence(probe, &entry.terms) else {
            continue;
        };
        if best.is_none_or(|(_, _, b)| hit.size > b.size) {
            best = Some((entry, origin, hit));
        }
    }

    let (entry, origin, hit) = best?;
    if hit.size < entry.familiarity {
        return None;
    }
    Some(LookupMatch {
        entry: entry.clone(),
        origin,
        size: hit.size,
        next: hit.next,
    })
}
