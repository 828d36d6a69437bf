//! Correlation module - two-body correlation factors.

mod pair;

pub use pair::{squared_distance, unique_pairs, PairCorrelation};
