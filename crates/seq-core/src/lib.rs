//! Next-term prediction for integer sequences.
//!
//! A sequence is explained by recursively re-encoding it (successive
//! differences, ratios, alternating sub-sequences, sign/magnitude splits,
//! division-remainder pairs) and by matching it against a small catalog of
//! well-known sequences. The cheapest derivation wins and comes back with a
//! nested, human-readable explanation.
//!
//! ```
//! use seq_core::{Sequence, predict};
//!
//! let seq: Sequence = "1, 4, 9, 16".parse().unwrap();
//! let prediction = predict(&seq);
//! assert_eq!(prediction.value, Some(25));
//! ```
//!
//! Zero I/O. The engine is synchronous and holds no shared mutable state.

pub mod catalog;
pub mod constants;
pub mod error;
pub mod log_tree;
pub mod matcher;
pub mod predictor;
pub mod repr;
pub mod search;
pub mod sequence;

pub use catalog::{Catalog, KnownSequence, SessionMemory};
pub use constants::{DEFAULT_DEPTH_LIMIT, DEFAULT_FAMILIARITY, MIN_MATCH_SIZE, MIN_QUERY_TERMS, PRIME_FAMILIARITY};
pub use error::{Result, SeqError};
pub use log_tree::{LogNode, LogTree};
pub use matcher::{LookupMatch, MatchHit, MatchOrigin, lookup, match_sequence};
pub use predictor::{Prediction, Predictor, SearchConfig, export_json, predict};
pub use repr::{
    AbsSign, Alternate, Channel, ChannelRole, DivMod, DivModShifted, Difference, Ratio,
    Representation,
};
pub use search::{Budget, SearchEngine, SearchResult, Strategy};
pub use sequence::{Sequence, Term, floor_divmod};
