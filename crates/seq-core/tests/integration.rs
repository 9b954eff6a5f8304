//! End-to-end predictions through the public API: parse → predict →
//! explanation, plus properties over whole families of sequences.

use proptest::prelude::*;
use seq_core::{
    Catalog, DivMod, DivModShifted, Difference, Predictor, Representation, SearchConfig,
    Sequence, Strategy as SearchStrategy, Term, match_sequence, predict,
};

fn next_of(terms: &[Term]) -> Option<Term> {
    predict(&Sequence::from(terms)).value
}

#[test]
fn counting_up() {
    assert_eq!(next_of(&[1, 2, 3, 4]), Some(5));
}

#[test]
fn perfect_squares() {
    let p = predict(&Sequence::from(vec![1, 4, 9, 16]));
    assert_eq!(p.value, Some(25));
    // Lookup and differences both work; the lookup is shallower.
    assert_eq!(p.strategy, Some(SearchStrategy::Lookup));
    assert_eq!(p.depth, 2);
}

#[test]
fn perfect_cubes() {
    assert_eq!(next_of(&[1, 8, 27]), Some(64));
}

#[test]
fn primes_need_four_terms() {
    let p = predict(&Sequence::from(vec![2, 3, 5, 7, 11, 13, 17, 19]));
    assert_eq!(p.value, Some(23));
    assert_eq!(p.matched.unwrap().entry.name, "primes");
}

#[test]
fn alternating_signs() {
    let p = predict(&Sequence::from(vec![1, -2, 3, -4]));
    assert_eq!(p.value, Some(5));
    assert_eq!(p.strategy, Some(SearchStrategy::AbsSign));
}

#[test]
fn division_remainder_pairs() {
    let p = predict(&Sequence::from(vec![8, 6, 9, 23, 87]));
    assert_eq!(p.value, Some(429));
    assert_eq!(p.strategy, Some(SearchStrategy::DivModShifted));
}

#[test]
fn descending_squares_use_reversed_catalog() {
    let p = predict(&Sequence::from(vec![144, 121, 100, 81]));
    assert_eq!(p.value, Some(64));
    assert_eq!(p.matched.unwrap().entry.name, "squares reversed");
}

#[test]
fn fibonacci_through_session_memory() {
    // The differences 0, 1, 1, 2, 3 are recognised against the query itself.
    assert_eq!(next_of(&[1, 1, 2, 3, 5, 8]), Some(13));
}

#[test]
fn alternating_geometric() {
    let p = predict(&Sequence::from(vec![1, -2, 4, -8, 16]));
    assert_eq!(p.value, Some(-32));
    assert_eq!(p.strategy, Some(SearchStrategy::Ratio));
}

#[test]
fn powers_of_three() {
    assert_eq!(next_of(&[1, 3, 9, 27]), Some(81));
}

#[test]
fn short_input_has_no_answer() {
    assert_eq!(next_of(&[]), None);
    assert_eq!(next_of(&[42]), None);
}

#[test]
fn parsed_input_predicts() {
    let seq: Sequence = "3, 10, 17, 24, 31".parse().unwrap();
    assert_eq!(predict(&seq).value, Some(38));
}

#[test]
fn explanation_nests_sub_searches() {
    let p = predict(&Sequence::from(vec![1, -2, 3, -4]));
    let lines = p.lines();
    assert!(lines[0].starts_with("| 1, -2, 3, -4 --> 5"), "{lines:?}");
    assert!(lines.iter().any(|l| l.starts_with("----| 1, 2, 3, 4 --> 5")));
    assert!(
        lines.iter().any(|l| l.starts_with("    ----| ")),
        "expected a second nesting level: {lines:?}"
    );
    assert_eq!(p.explanation.depth(), lines_depth(&lines));
}

fn lines_depth(lines: &[String]) -> usize {
    lines
        .iter()
        .map(|l| {
            if l.starts_with("| ") {
                1
            } else {
                l.find("----|").map_or(0, |i| i / 4 + 2)
            }
        })
        .max()
        .unwrap_or(0)
}

#[test]
fn each_prediction_has_its_own_session() {
    // The first query must not leak into the second one's lookups.
    let predictor = Predictor::default();
    let first = predictor.predict(&Sequence::from(vec![5, 9, 14, 20, 27]));
    assert!(first.value.is_some());
    let second = predictor.predict(&Sequence::from(vec![9, 14, 20]));
    assert_ne!(second.strategy, Some(SearchStrategy::Lookup));
}

#[test]
fn smaller_depth_limit_restricts_search() {
    let shallow = Predictor::new(SearchConfig {
        depth_limit: 1,
        ..SearchConfig::default()
    });
    // Differences need a second level; only a direct lookup fits.
    assert_eq!(shallow.predict(&Sequence::from(vec![1, 2, 3, 4])).value, None);
    assert_eq!(shallow.predict(&Sequence::from(vec![1, 4, 9])).value, Some(16));
}

#[test]
fn catalog_prefixes_match_their_own_entry() {
    for entry in Catalog::standard().iter() {
        let n = entry.terms.len();
        for k in 3..n {
            let prefix = Sequence::from(&entry.terms.as_slice()[..k]);
            let hit = match_sequence(&prefix, &entry.terms)
                .unwrap_or_else(|| panic!("{} prefix of {k} did not match", entry.name));
            assert_eq!(hit.size, k);
            assert_eq!(hit.next, entry.terms[k]);
        }
    }
}

fn assert_round_trip<R: Representation>(terms: &[Term], next: Term) {
    let original = Sequence::from(terms);
    let extended = original.pushed(next);
    let truth = R::convert(&extended).unwrap();
    let predicted: Vec<Term> = truth
        .channels()
        .iter()
        .map(|c| c.terms.last().unwrap())
        .collect();
    let mut repr = R::convert(&original).unwrap();
    repr.extend(&predicted);
    assert_eq!(repr.to_normal().unwrap(), extended);
}

fn nonzero() -> impl Strategy<Value = Term> {
    prop_oneof![-1000i64..=-1, 1i64..=1000]
}

proptest! {
    #[test]
    fn arithmetic_progressions(a in -1000i64..=1000, d in -50i64..=50, n in 4usize..=8) {
        let terms: Vec<Term> = (0..n as i64).map(|i| a + i * d).collect();
        prop_assert_eq!(next_of(&terms), Some(a + n as i64 * d));
    }

    #[test]
    fn geometric_progressions(
        a in nonzero().prop_map(|t| t % 20 + t.signum()),
        r in prop_oneof![-4i64..=-1, 1i64..=4],
        n in 4usize..=6,
    ) {
        let terms: Vec<Term> = (0..n as u32).map(|i| a * r.pow(i)).collect();
        prop_assert_eq!(next_of(&terms), Some(a * r.pow(n as u32)));
    }

    #[test]
    fn constants_cost_nothing(c in -1000i64..=1000, n in 2usize..=8) {
        let p = predict(&Sequence::from(vec![c; n]));
        prop_assert_eq!(p.value, Some(c));
        prop_assert_eq!(p.depth, 0);
    }

    #[test]
    fn difference_round_trip(terms in prop::collection::vec(-1000i64..=1000, 1..8), next in -1000i64..=1000) {
        assert_round_trip::<Difference>(&terms, next);
    }

    #[test]
    fn div_mod_round_trip(terms in prop::collection::vec(nonzero(), 1..8), next in -1000i64..=1000) {
        assert_round_trip::<DivMod>(&terms, next);
        assert_round_trip::<DivModShifted>(&terms, next);
    }
}
