//! Depth-budgeted recursive search.
//!
//! `search` tries a catalog lookup and every representation on a sequence.
//! Representations recurse into `search` on their derived channels; the
//! answer with the smallest depth wins, ties going to the earlier strategy
//! in [`Strategy::ALL`].
//!
//! Depth accounting: a constant sequence costs 0, a lookup hit 1, a
//! transform `1 + max(channel depths)`, and every strategy result gains one
//! more on its way out of `search`.

use serde::Serialize;

use crate::catalog::{Catalog, SessionMemory};
use crate::constants::{MATCH_PREVIEW_CHARS, SIDE_CHANNEL_CAP};
use crate::log_tree::LogTree;
use crate::matcher::{LookupMatch, lookup};
use crate::repr::{self, ChannelRole, Representation};
use crate::sequence::{Sequence, Term};

/// Remaining recursion allowance.
///
/// Kept fractional: halving for side channels can leave values such as
/// `0.5`, which still admit a constant check and a lookup before the next
/// descent exhausts them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Budget(f64);

impl Budget {
    pub fn new(limit: u32) -> Self {
        Self(f64::from(limit))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn is_exhausted(self) -> bool {
        self.0 <= 0.0
    }

    /// Budget handed to strategies one level down.
    pub fn descend(self) -> Self {
        Self(self.0 - 1.0)
    }

    /// Budget for auxiliary channels: half, capped.
    pub fn side_channel(self) -> Self {
        Self((self.0 / 2.0).min(SIDE_CHANNEL_CAP))
    }

    fn for_role(self, role: ChannelRole) -> Self {
        match role {
            ChannelRole::Primary => self,
            ChannelRole::Side => self.side_channel(),
        }
    }
}

/// Ways of predicting a sequence, in tie-breaking order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Lookup,
    Difference,
    Ratio,
    DivMod,
    Alternate,
    AbsSign,
    DivModShifted,
}

impl Strategy {
    pub const ALL: [Strategy; 7] = [
        Strategy::Lookup,
        Strategy::Difference,
        Strategy::Ratio,
        Strategy::DivMod,
        Strategy::Alternate,
        Strategy::AbsSign,
        Strategy::DivModShifted,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Strategy::Lookup => "lookup",
            Strategy::Difference => "difference",
            Strategy::Ratio => "ratio",
            Strategy::DivMod => "div-mod",
            Strategy::Alternate => "alternate",
            Strategy::AbsSign => "abs-sign",
            Strategy::DivModShifted => "div-mod-shifted",
        }
    }

    fn attempt(self, engine: &SearchEngine<'_>, seq: &Sequence, budget: Budget) -> SearchResult {
        match self {
            Strategy::Lookup => engine.by_lookup(seq),
            Strategy::Difference => engine.by_transform::<repr::Difference>(self, seq, budget),
            Strategy::Ratio => engine.by_transform::<repr::Ratio>(self, seq, budget),
            Strategy::DivMod => engine.by_transform::<repr::DivMod>(self, seq, budget),
            Strategy::Alternate => engine.by_transform::<repr::Alternate>(self, seq, budget),
            Strategy::AbsSign => engine.by_transform::<repr::AbsSign>(self, seq, budget),
            Strategy::DivModShifted => {
                engine.by_transform::<repr::DivModShifted>(self, seq, budget)
            }
        }
    }
}

/// Outcome of one search call.
#[derive(Clone, Debug, Default)]
pub struct SearchResult {
    /// Predicted next term, `None` when nothing worked.
    pub value: Option<Term>,
    /// Cost of the derivation; smaller is preferred.
    pub depth: u32,
    /// Strategy that produced `value` at this level.
    pub strategy: Option<Strategy>,
    /// Catalog or session entry behind a lookup answer.
    pub matched: Option<LookupMatch>,
    pub log_tree: LogTree,
}

impl SearchResult {
    pub fn none() -> Self {
        Self::default()
    }

    fn constant(value: Term) -> Self {
        Self {
            value: Some(value),
            ..Self::default()
        }
    }

    pub fn is_found(&self) -> bool {
        self.value.is_some()
    }
}

/// `"1, 4, 9 --> 16 \tcomment"`; an unknown value renders as `?`.
pub fn log_line(seq: &Sequence, next: Option<Term>, comment: &str) -> String {
    let next = next.map_or_else(|| "?".to_string(), |n| n.to_string());
    if comment.is_empty() {
        format!("{seq} --> {next}")
    } else {
        format!("{seq} --> {next} \t{comment}")
    }
}

/// Recursive searcher over one catalog and one session's memory.
pub struct SearchEngine<'a> {
    catalog: &'a Catalog,
    session: &'a SessionMemory,
}

impl<'a> SearchEngine<'a> {
    pub fn new(catalog: &'a Catalog, session: &'a SessionMemory) -> Self {
        Self { catalog, session }
    }

    pub fn search(&self, seq: &Sequence, budget: Budget) -> SearchResult {
        if budget.is_exhausted() || seq.len() < 2 {
            return SearchResult::none();
        }
        if seq.is_constant() {
            return SearchResult::constant(seq[0]);
        }

        let inner = budget.descend();
        let mut best: Option<SearchResult> = None;
        for strategy in Strategy::ALL {
            let mut result = strategy.attempt(self, seq, inner);
            if !result.is_found() {
                continue;
            }
            result.depth += 1;
            tracing::trace!(
                strategy = strategy.name(),
                depth = result.depth,
                value = ?result.value,
                "candidate for [{seq}]"
            );
            if best.as_ref().is_none_or(|b| result.depth < b.depth) {
                best = Some(result);
            }
        }
        best.unwrap_or_default()
    }

    fn by_lookup(&self, seq: &Sequence) -> SearchResult {
        let Some(found) = lookup(seq, self.session, self.catalog) else {
            return SearchResult::none();
        };

        let preview: String = found
            .entry
            .terms
            .readable()
            .chars()
            .take(MATCH_PREVIEW_CHARS)
            .collect();
        let comment = format!("match with {} ({preview})", found.entry.name);
        let mut log_tree = LogTree::new();
        log_tree.add_line(log_line(seq, Some(found.next), &comment));

        SearchResult {
            value: Some(found.next),
            depth: 1,
            strategy: Some(Strategy::Lookup),
            matched: Some(found),
            log_tree,
        }
    }

    /// Search every channel of `R`; all of them must succeed.
    fn by_transform<R: Representation>(
        &self,
        strategy: Strategy,
        seq: &Sequence,
        budget: Budget,
    ) -> SearchResult {
        if !R::is_considering(seq) {
            return SearchResult::none();
        }
        let mut repr = match R::convert(seq) {
            Ok(repr) => repr,
            Err(e) => {
                tracing::trace!(strategy = strategy.name(), "skipped [{seq}]: {e}");
                return SearchResult::none();
            }
        };

        let mut predicted = Vec::new();
        let mut depth = 0;
        let mut log_tree = LogTree::new();
        for channel in repr.channels() {
            let sub = self.search(channel.terms, budget.for_role(channel.role));
            let Some(next) = sub.value else {
                return SearchResult::none();
            };
            log_tree.add_line(log_line(channel.terms, Some(next), channel.label));
            log_tree.add_subtree(sub.log_tree);
            depth = depth.max(sub.depth);
            predicted.push(next);
        }

        repr.extend(&predicted);
        let value = match repr.to_normal() {
            Ok(normal) => normal.last(),
            Err(e) => {
                tracing::trace!(strategy = strategy.name(), "cannot rebuild [{seq}]: {e}");
                None
            }
        };
        if value.is_none() {
            return SearchResult::none();
        }

        SearchResult {
            value,
            depth: depth + 1,
            strategy: Some(strategy),
            matched: None,
            log_tree,
        }
    }
}
