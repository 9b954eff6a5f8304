use std::fmt;
use std::ops::Index;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::TERM_SEPARATOR;
use crate::error::{Result, SeqError};

/// Element type of every sequence the engine handles.
pub type Term = i64;

/// An ordered, finite list of integers.
///
/// Arithmetic only mixes a sequence with a scalar, except for the
/// tail-aligned `sub_aligned`/`mul_aligned`, which pair the trailing
/// elements of two sequences first. All arithmetic is checked.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sequence {
    terms: Vec<Term>,
}

impl Sequence {
    pub fn new(terms: Vec<Term>) -> Self {
        Self { terms }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Term> {
        self.terms.get(index).copied()
    }

    pub fn first(&self) -> Option<Term> {
        self.terms.first().copied()
    }

    pub fn last(&self) -> Option<Term> {
        self.terms.last().copied()
    }

    pub fn as_slice(&self) -> &[Term] {
        &self.terms
    }

    pub fn iter(&self) -> impl Iterator<Item = Term> + '_ {
        self.terms.iter().copied()
    }

    /// Consecutive pairs `(seq[i], seq[i + 1])`.
    pub fn pairs(&self) -> impl Iterator<Item = (Term, Term)> + '_ {
        self.terms.windows(2).map(|w| (w[0], w[1]))
    }

    /// Grow by one term.
    pub fn push(&mut self, term: Term) {
        self.terms.push(term);
    }

    /// Copy of `self` with `term` appended.
    pub fn pushed(&self, term: Term) -> Self {
        let mut next = self.clone();
        next.push(term);
        next
    }

    /// Independent copy with the elements in reverse order.
    pub fn reversed(&self) -> Self {
        self.terms.iter().rev().copied().collect()
    }

    /// Reject sequences shorter than `min` with [`SeqError::TooShort`].
    pub fn require_len(&self, min: usize) -> Result<&Self> {
        if self.len() < min {
            return Err(SeqError::TooShort {
                len: self.len(),
                min,
            });
        }
        Ok(self)
    }

    /// Empty and single-element sequences are vacuously constant.
    pub fn is_constant(&self) -> bool {
        match self.terms.split_first() {
            Some((first, rest)) => rest.iter().all(|t| t == first),
            None => true,
        }
    }

    /// `[1, 2, 3]` renders as `"1, 2, 3"`.
    pub fn readable(&self) -> String {
        self.terms
            .iter()
            .map(|t| t.to_string())
            .collect::<Vec<_>>()
            .join(TERM_SEPARATOR)
    }

    pub fn add_scalar(&self, k: Term) -> Result<Self> {
        self.map_checked(|t| t.checked_add(k), "add")
    }

    pub fn sub_scalar(&self, k: Term) -> Result<Self> {
        self.map_checked(|t| t.checked_sub(k), "subtract")
    }

    pub fn mul_scalar(&self, k: Term) -> Result<Self> {
        self.map_checked(|t| t.checked_mul(k), "multiply")
    }

    /// Elementwise `self - other`, pairing trailing elements first.
    /// The result has the shorter length and keeps forward order.
    pub fn sub_aligned(&self, other: &Sequence) -> Result<Self> {
        self.zip_tail(other, |a, b| a.checked_sub(b), "subtract")
    }

    /// Elementwise `self * other`, pairing trailing elements first.
    pub fn mul_aligned(&self, other: &Sequence) -> Result<Self> {
        self.zip_tail(other, |a, b| a.checked_mul(b), "multiply")
    }

    fn map_checked(&self, f: impl Fn(Term) -> Option<Term>, op: &'static str) -> Result<Self> {
        self.terms
            .iter()
            .map(|&t| f(t).ok_or(SeqError::Overflow(op)))
            .collect()
    }

    fn zip_tail(
        &self,
        other: &Sequence,
        f: impl Fn(Term, Term) -> Option<Term>,
        op: &'static str,
    ) -> Result<Self> {
        let n = self.len().min(other.len());
        let lhs = &self.terms[self.len() - n..];
        let rhs = &other.terms[other.len() - n..];
        lhs.iter()
            .zip(rhs)
            .map(|(&a, &b)| f(a, b).ok_or(SeqError::Overflow(op)))
            .collect()
    }
}

/// Quotient rounded toward negative infinity and a remainder carrying the
/// divisor's sign, so that `a == q * b + r` always holds.
pub fn floor_divmod(a: Term, b: Term) -> Result<(Term, Term)> {
    if b == 0 {
        return Err(SeqError::DivisionByZero);
    }
    let mut q = a.checked_div(b).ok_or(SeqError::Overflow("divide"))?;
    let mut r = a % b;
    if r != 0 && (r < 0) != (b < 0) {
        q -= 1;
        r += b;
    }
    Ok((q, r))
}

/// `-1`, `0` or `1`.
pub fn sign(t: Term) -> Term {
    t.signum()
}

impl From<Vec<Term>> for Sequence {
    fn from(terms: Vec<Term>) -> Self {
        Self::new(terms)
    }
}

impl From<&[Term]> for Sequence {
    fn from(terms: &[Term]) -> Self {
        Self::new(terms.to_vec())
    }
}

impl FromIterator<Term> for Sequence {
    fn from_iter<I: IntoIterator<Item = Term>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl Index<usize> for Sequence {
    type Output = Term;

    fn index(&self, index: usize) -> &Term {
        &self.terms[index]
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.readable())
    }
}

/// Parses `"1, 2, 3"`. Empty and whitespace-only fields are skipped, so
/// `"1,,2, "` is `[1, 2]`.
impl FromStr for Sequence {
    type Err = SeqError;

    fn from_str(s: &str) -> Result<Self> {
        s.split(',')
            .map(str::trim)
            .filter(|field| !field.is_empty())
            .map(|field| {
                field
                    .parse::<Term>()
                    .map_err(|_| SeqError::InvalidTerm(field.to_string()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(terms: &[Term]) -> Sequence {
        Sequence::from(terms)
    }

    #[test]
    fn test_require_len() {
        assert!(seq(&[1, 2]).require_len(2).is_ok());
        assert_eq!(
            seq(&[1]).require_len(2),
            Err(SeqError::TooShort { len: 1, min: 2 })
        );
    }

    #[test]
    fn test_constant_check() {
        assert!(seq(&[]).is_constant());
        assert!(seq(&[7]).is_constant());
        assert!(seq(&[3, 3, 3]).is_constant());
        assert!(!seq(&[3, 3, 4]).is_constant());
    }

    #[test]
    fn test_reversed_is_independent_copy() {
        let s = seq(&[1, 2, 3]);
        let mut r = s.reversed();
        assert_eq!(r, seq(&[3, 2, 1]));
        r.push(0);
        assert_eq!(s.len(), 3);
    }

    #[test]
    fn test_readable() {
        assert_eq!(seq(&[1, -2, 3]).readable(), "1, -2, 3");
        assert_eq!(seq(&[]).readable(), "");
        assert_eq!(seq(&[4, 5]).to_string(), "4, 5");
    }

    #[test]
    fn test_scalar_arithmetic() {
        let s = seq(&[1, 2, 3]);
        assert_eq!(s.add_scalar(2).unwrap(), seq(&[3, 4, 5]));
        assert_eq!(s.sub_scalar(1).unwrap(), seq(&[0, 1, 2]));
        assert_eq!(s.mul_scalar(-2).unwrap(), seq(&[-2, -4, -6]));
    }

    #[test]
    fn test_scalar_overflow_is_reported() {
        let s = seq(&[Term::MAX]);
        assert_eq!(s.add_scalar(1), Err(SeqError::Overflow("add")));
    }

    #[test]
    fn test_sub_aligned_pairs_trailing_terms() {
        let a = seq(&[10, 20, 30, 40]);
        let b = seq(&[1, 2, 3]);
        assert_eq!(a.sub_aligned(&b).unwrap(), seq(&[19, 28, 37]));
        assert_eq!(b.sub_aligned(&a).unwrap(), seq(&[-19, -28, -37]));
    }

    #[test]
    fn test_mul_aligned() {
        let signs = seq(&[1, -1, 1]);
        let values = seq(&[1, 2, 3]);
        assert_eq!(signs.mul_aligned(&values).unwrap(), seq(&[1, -2, 3]));
    }

    #[test]
    fn test_pairs() {
        let pairs: Vec<_> = seq(&[1, 4, 9]).pairs().collect();
        assert_eq!(pairs, vec![(1, 4), (4, 9)]);
        assert_eq!(seq(&[1]).pairs().count(), 0);
    }

    #[test]
    fn test_floor_divmod_matches_floor_semantics() {
        assert_eq!(floor_divmod(7, 2).unwrap(), (3, 1));
        assert_eq!(floor_divmod(-7, 2).unwrap(), (-4, 1));
        assert_eq!(floor_divmod(7, -2).unwrap(), (-4, -1));
        assert_eq!(floor_divmod(-7, -2).unwrap(), (3, -1));
        assert_eq!(floor_divmod(-2, 1).unwrap(), (-2, 0));
        assert_eq!(floor_divmod(3, -2).unwrap(), (-2, -1));
        assert_eq!(floor_divmod(6, 8).unwrap(), (0, 6));
    }

    #[test]
    fn test_floor_divmod_errors() {
        assert_eq!(floor_divmod(1, 0), Err(SeqError::DivisionByZero));
        assert!(floor_divmod(Term::MIN, -1).is_err());
    }

    #[test]
    fn test_parse_comma_separated() {
        let s: Sequence = "1, 2,3 ,  4".parse().unwrap();
        assert_eq!(s, seq(&[1, 2, 3, 4]));
    }

    #[test]
    fn test_parse_skips_blank_fields() {
        let s: Sequence = " 1,, -2 , ,".parse().unwrap();
        assert_eq!(s, seq(&[1, -2]));
        let empty: Sequence = "".parse().unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = "1, two, 3".parse::<Sequence>().unwrap_err();
        assert_eq!(err, SeqError::InvalidTerm("two".to_string()));
        assert!("1.5, 2".parse::<Sequence>().is_err());
    }
}
