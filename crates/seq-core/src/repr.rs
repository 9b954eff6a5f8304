//! Reversible re-encodings of a sequence.
//!
//! Each representation splits a sequence into one or two derived channels.
//! Once every channel has been predicted one step further, `extend` takes
//! those predictions and `to_normal` rebuilds the original-domain sequence,
//! now one term longer.
//!
//! | representation   | channels               | rebuilt by                 |
//! |------------------|------------------------|----------------------------|
//! | `Difference`     | successive differences | running sum                |
//! | `Ratio`          | successive ratios      | running product            |
//! | `Alternate`      | even / odd positions   | interleaving               |
//! | `AbsSign`        | magnitudes / signs     | elementwise product        |
//! | `DivMod`         | floor quotients / rems | `prev * div + mod`         |
//! | `DivModShifted`  | `div + 1` / `mod - prev` | unshift, then as `DivMod` |

use crate::error::{Result, SeqError};
use crate::sequence::{Sequence, Term, floor_divmod, sign};

/// How much of the remaining budget a channel's sub-search receives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelRole {
    /// Carries the bulk of the structure; searched with the full budget.
    Primary,
    /// Auxiliary data; searched with a capped, halved budget.
    Side,
}

/// One derived sequence exposed to the search.
#[derive(Debug)]
pub struct Channel<'a> {
    pub terms: &'a Sequence,
    pub role: ChannelRole,
    /// Short explanation used in the log line for this channel.
    pub label: &'static str,
}

pub trait Representation: Sized {
    /// Whether the representation is meaningful for `seq` at all.
    fn is_considering(_seq: &Sequence) -> bool {
        true
    }

    fn convert(seq: &Sequence) -> Result<Self>;

    /// Derived channels, in the order the search visits them.
    fn channels(&self) -> Vec<Channel<'_>>;

    /// Append one predicted term per channel, in `channels()` order.
    fn extend(&mut self, predicted: &[Term]);

    fn to_normal(&self) -> Result<Sequence>;
}

fn first_term(seq: &Sequence) -> Result<Term> {
    seq.first().ok_or(SeqError::TooShort { len: 0, min: 1 })
}

fn channel<'a>(terms: &'a Sequence, role: ChannelRole, label: &'static str) -> Channel<'a> {
    Channel { terms, role, label }
}

// ---------------------------------------------------------------------------
// Difference
// ---------------------------------------------------------------------------

/// `[1, 4, 9, 16]` → first `1`, differences `[3, 5, 7]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Difference {
    pub first: Term,
    pub differences: Sequence,
}

impl Representation for Difference {
    fn convert(seq: &Sequence) -> Result<Self> {
        let first = first_term(seq)?;
        let differences = seq
            .pairs()
            .map(|(prev, next)| next.checked_sub(prev).ok_or(SeqError::Overflow("difference")))
            .collect::<Result<Sequence>>()?;
        Ok(Self { first, differences })
    }

    fn channels(&self) -> Vec<Channel<'_>> {
        vec![channel(&self.differences, ChannelRole::Primary, "taking differences")]
    }

    fn extend(&mut self, predicted: &[Term]) {
        if let Some(&d) = predicted.first() {
            self.differences.push(d);
        }
    }

    fn to_normal(&self) -> Result<Sequence> {
        let mut last = self.first;
        let mut normal = Sequence::new(vec![last]);
        for d in self.differences.iter() {
            last = last.checked_add(d).ok_or(SeqError::Overflow("running sum"))?;
            normal.push(last);
        }
        Ok(normal)
    }
}

// ---------------------------------------------------------------------------
// Ratio
// ---------------------------------------------------------------------------

/// `[3, 6, 18]` → first `3`, ratios `[2, 3]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ratio {
    pub first: Term,
    pub ratios: Sequence,
}

impl Representation for Ratio {
    /// Every term must divide its successor exactly; zeros disqualify.
    fn is_considering(seq: &Sequence) -> bool {
        seq.pairs()
            .all(|(prev, next)| prev != 0 && next.checked_rem(prev) == Some(0))
    }

    fn convert(seq: &Sequence) -> Result<Self> {
        let first = first_term(seq)?;
        let ratios = seq
            .pairs()
            .map(|(prev, next)| {
                if prev == 0 {
                    return Err(SeqError::DivisionByZero);
                }
                // Rounded float quotient; exact whenever the guard held.
                Ok((next as f64 / prev as f64).round_ties_even() as Term)
            })
            .collect::<Result<Sequence>>()?;
        Ok(Self { first, ratios })
    }

    fn channels(&self) -> Vec<Channel<'_>> {
        vec![channel(&self.ratios, ChannelRole::Primary, "taking ratios")]
    }

    fn extend(&mut self, predicted: &[Term]) {
        if let Some(&r) = predicted.first() {
            self.ratios.push(r);
        }
    }

    fn to_normal(&self) -> Result<Sequence> {
        let mut last = self.first;
        let mut normal = Sequence::new(vec![last]);
        for r in self.ratios.iter() {
            last = last.checked_mul(r).ok_or(SeqError::Overflow("running product"))?;
            normal.push(last);
        }
        Ok(normal)
    }
}

// ---------------------------------------------------------------------------
// Alternate
// ---------------------------------------------------------------------------

/// `[1, 2, 3, 4, 5]` → evens `[1, 3, 5]`, odds `[2, 4]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alternate {
    pub evens: Sequence,
    pub odds: Sequence,
}

impl Representation for Alternate {
    fn convert(seq: &Sequence) -> Result<Self> {
        let evens = seq.iter().step_by(2).collect();
        let odds = seq.iter().skip(1).step_by(2).collect();
        Ok(Self { evens, odds })
    }

    fn channels(&self) -> Vec<Channel<'_>> {
        vec![
            channel(&self.evens, ChannelRole::Side, "even positions"),
            channel(&self.odds, ChannelRole::Side, "odd positions"),
        ]
    }

    /// Only the channel owning the next position grows.
    fn extend(&mut self, predicted: &[Term]) {
        if let &[next_even, next_odd] = predicted {
            if self.evens.len() == self.odds.len() {
                self.evens.push(next_even);
            } else {
                self.odds.push(next_odd);
            }
        }
    }

    fn to_normal(&self) -> Result<Sequence> {
        let mut normal = Sequence::default();
        for (i, even) in self.evens.iter().enumerate() {
            normal.push(even);
            if let Some(odd) = self.odds.get(i) {
                normal.push(odd);
            }
        }
        Ok(normal)
    }
}

// ---------------------------------------------------------------------------
// AbsSign
// ---------------------------------------------------------------------------

/// `[1, -2, 3, -4]` → values `[1, 2, 3, 4]`, signs `[1, -1, 1, -1]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AbsSign {
    pub values: Sequence,
    pub signs: Sequence,
}

impl AbsSign {
    fn magnitudes(seq: &Sequence) -> Result<Sequence> {
        seq.iter()
            .map(|t| t.checked_abs().ok_or(SeqError::Overflow("absolute value")))
            .collect()
    }
}

impl Representation for AbsSign {
    /// Needs a negative term, and neither channel may equal the input,
    /// otherwise the search would recurse on an unchanged sequence.
    fn is_considering(seq: &Sequence) -> bool {
        if !seq.iter().any(|t| t < 0) {
            return false;
        }
        let signs: Sequence = seq.iter().map(sign).collect();
        if &signs == seq {
            return false;
        }
        match Self::magnitudes(seq) {
            Ok(values) => &values != seq,
            Err(_) => false,
        }
    }

    fn convert(seq: &Sequence) -> Result<Self> {
        Ok(Self {
            values: Self::magnitudes(seq)?,
            signs: seq.iter().map(sign).collect(),
        })
    }

    fn channels(&self) -> Vec<Channel<'_>> {
        vec![
            channel(&self.values, ChannelRole::Primary, "taking absolute values"),
            channel(&self.signs, ChannelRole::Side, "taking signs"),
        ]
    }

    fn extend(&mut self, predicted: &[Term]) {
        if let &[value, sign] = predicted {
            self.values.push(value);
            self.signs.push(sign);
        }
    }

    fn to_normal(&self) -> Result<Sequence> {
        self.signs.mul_aligned(&self.values)
    }
}

// ---------------------------------------------------------------------------
// DivMod
// ---------------------------------------------------------------------------

fn nonzero_terms(seq: &Sequence) -> bool {
    seq.iter().all(|t| t != 0)
}

/// `divmod(seq[i + 1], seq[i])` for each step, with floor semantics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DivMod {
    pub first: Term,
    pub divs: Sequence,
    pub mods: Sequence,
}

impl DivMod {
    fn rebuild(first: Term, steps: impl Iterator<Item = Result<(Term, Term)>>) -> Result<Sequence> {
        let mut si = first;
        let mut normal = Sequence::new(vec![si]);
        for step in steps {
            let (div, rem) = step?;
            si = si
                .checked_mul(div)
                .and_then(|v| v.checked_add(rem))
                .ok_or(SeqError::Overflow("div-mod rebuild"))?;
            normal.push(si);
        }
        Ok(normal)
    }
}

impl Representation for DivMod {
    fn is_considering(seq: &Sequence) -> bool {
        nonzero_terms(seq)
    }

    fn convert(seq: &Sequence) -> Result<Self> {
        let first = first_term(seq)?;
        let mut divs = Sequence::default();
        let mut mods = Sequence::default();
        for (prev, next) in seq.pairs() {
            let (div, rem) = floor_divmod(next, prev)?;
            divs.push(div);
            mods.push(rem);
        }
        Ok(Self { first, divs, mods })
    }

    fn channels(&self) -> Vec<Channel<'_>> {
        vec![
            channel(&self.divs, ChannelRole::Side, "taking divs"),
            channel(&self.mods, ChannelRole::Side, "taking mods"),
        ]
    }

    fn extend(&mut self, predicted: &[Term]) {
        if let &[div, rem] = predicted {
            self.divs.push(div);
            self.mods.push(rem);
        }
    }

    fn to_normal(&self) -> Result<Sequence> {
        let steps = self.divs.iter().zip(self.mods.iter()).map(Ok);
        Self::rebuild(self.first, steps)
    }
}

// ---------------------------------------------------------------------------
// DivModShifted
// ---------------------------------------------------------------------------

/// Like [`DivMod`] but stores `div + 1` and `mod - seq[i]`.
///
/// `[8, 6, 9, 23, 87]` becomes divs `[1, 2, 3, 4]` and mods
/// `[-2, -3, -4, -5]`, both plain arithmetic progressions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DivModShifted {
    pub first: Term,
    pub divs: Sequence,
    pub mods: Sequence,
}

impl Representation for DivModShifted {
    fn is_considering(seq: &Sequence) -> bool {
        nonzero_terms(seq)
    }

    fn convert(seq: &Sequence) -> Result<Self> {
        let first = first_term(seq)?;
        let mut divs = Sequence::default();
        let mut mods = Sequence::default();
        for (prev, next) in seq.pairs() {
            let (div, rem) = floor_divmod(next, prev)?;
            divs.push(div.checked_add(1).ok_or(SeqError::Overflow("shifted div"))?);
            mods.push(rem.checked_sub(prev).ok_or(SeqError::Overflow("shifted mod"))?);
        }
        Ok(Self { first, divs, mods })
    }

    fn channels(&self) -> Vec<Channel<'_>> {
        vec![
            channel(&self.divs, ChannelRole::Side, "taking shifted divs"),
            channel(&self.mods, ChannelRole::Side, "taking shifted mods"),
        ]
    }

    fn extend(&mut self, predicted: &[Term]) {
        if let &[div, rem] = predicted {
            self.divs.push(div);
            self.mods.push(rem);
        }
    }

    /// The shift on `mod` depends on the previous rebuilt term, so the
    /// inverse is applied step by step.
    fn to_normal(&self) -> Result<Sequence> {
        let mut si = self.first;
        let mut normal = Sequence::new(vec![si]);
        for (shifted_div, shifted_mod) in self.divs.iter().zip(self.mods.iter()) {
            let div = shifted_div.checked_sub(1);
            let rem = shifted_mod.checked_add(si);
            si = div
                .zip(rem)
                .and_then(|(div, rem)| si.checked_mul(div)?.checked_add(rem))
                .ok_or(SeqError::Overflow("shifted div-mod rebuild"))?;
            normal.push(si);
        }
        Ok(normal)
    }
}
