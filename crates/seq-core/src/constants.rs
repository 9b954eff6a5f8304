/// Top-level recursion allowance for a single prediction.
pub const DEFAULT_DEPTH_LIMIT: u32 = 70;

/// Familiarity given to the query sequence when it is remembered for the session.
pub const DEFAULT_FAMILIARITY: usize = 3;

/// Short runs of primes are ambiguous, so the primes entry asks for a longer match.
pub const PRIME_FAMILIARITY: usize = 4;

/// Shortest suffix alignment the matcher will report at all.
pub const MIN_MATCH_SIZE: usize = 3;

/// Fewest terms a front end accepts as a query.
pub const MIN_QUERY_TERMS: usize = 2;

/// Upper bound on the budget handed to side channels (signs, odd/even, div, mod).
pub const SIDE_CHANNEL_CAP: f64 = 2.0;

/// Separator used when rendering a sequence for humans.
pub const TERM_SEPARATOR: &str = ", ";

/// Character budget for the catalog preview in a lookup explanation.
pub const MATCH_PREVIEW_CHARS: usize = 15;
