//! # sigsim
//!
//! Bounded string similarity for clustering near-duplicate failure
//! signatures (test-failure messages, stack traces, log excerpts).
//!
//! Failures that are semantically identical rarely produce byte-identical
//! text: timestamps, pointer addresses, UUIDs and IPs differ on every run.
//! This crate provides the two pieces a clustering driver needs to see
//! through that noise:
//!
//! - a **normalization pipeline** ([`normalize::normalize`],
//!   [`normalize::normalize_name`]) that deletes timestamps and
//!   alpha-converts noisy identifiers into stable `UNIQ<k>` labels, and
//! - a **bounded edit-distance evaluator** ([`distance::bounded_distance`])
//!   with a constant-time ngram-histogram heuristic
//!   ([`ngram::estimate_distance`]) for skipping comparisons that cannot
//!   possibly land under a caller's limit.
//!
//! ## Example
//!
//! ```rust
//! use sigsim::prelude::*;
//!
//! // Two observations of the same failure, differing only in noise.
//! let a = normalize("I0102 15:04:05.000 pod 10.0.0.1 crashed");
//! let b = normalize("I0203 16:05:06.999 pod 10.9.9.9 crashed");
//!
//! assert_eq!(a, b);
//! assert_eq!(distance(&a, &b), 0);
//! ```
//!
//! ## Comparison flow
//!
//! Callers comparing many pairs should normalize once per string, fetch
//! fingerprints through a shared [`ngram::HistogramCache`], and only fall
//! back to [`distance::bounded_distance`] when the heuristic estimate does
//! not already rule the pair out:
//!
//! ```rust
//! use sigsim::prelude::*;
//!
//! let cache = HistogramCache::new();
//! let limit = 4;
//!
//! let a = normalize("connection refused by backend");
//! let b = normalize("deadline exceeded waiting for quota");
//!
//! let estimate = estimate_distance(&cache.histogram(&a), &cache.histogram(&b));
//! // A single edit perturbs at most 4 ngram windows, so dividing the raw
//! // sum by 4 yields the caller-side lower bound used for gating.
//! if estimate / 4 <= limit {
//!     let _d = bounded_distance(&a, &b, limit);
//! }
//! ```
//!
//! The estimate is a hint, never an authoritative bound: bucket collisions
//! and large transpositions both make it undercount. Callers that must not
//! drop true matches should only use it to *skip* work, with a conservative
//! margin, and let [`distance::bounded_distance`] have the final word.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod distance;
pub mod ngram;
pub mod normalize;

/// Common imports for convenient usage
pub mod prelude {
    pub use crate::distance::{bounded_distance, distance};
    pub use crate::ngram::{
        estimate_distance, HistogramCache, NgramHistogram, HISTOGRAM_BUCKETS, NGRAM_WINDOW,
    };
    pub use crate::normalize::{normalize, normalize_name};
}
