//! Ngram histogram fingerprints.
//!
//! A histogram approximates a string's 4-byte-substring frequency
//! distribution in constant space: every window is hashed with IEEE CRC-32
//! and counted in one of 64 buckets. Comparing two fingerprints
//! ([`estimate_distance`]) then costs 64 subtractions regardless of string
//! length, which is what makes it usable as a pre-filter in front of the
//! exact evaluator in [`crate::distance`].
//!
//! The window size and bucket count are fixed design constants. Histograms
//! produced with different constants (or a different checksum) are not
//! comparable, so implementations sharing cached fingerprints must agree on
//! all three.

#[cfg(feature = "concurrent-cache")]
use dashmap::DashMap;

#[cfg(not(feature = "concurrent-cache"))]
use rustc_hash::FxHashMap;

#[cfg(not(feature = "concurrent-cache"))]
use std::sync::RwLock;

/// Width in bytes of the sliding window hashed into buckets.
pub const NGRAM_WINDOW: usize = 4;

/// Number of hash buckets in a fingerprint.
pub const HISTOGRAM_BUCKETS: usize = 64;

/// A constant-size frequency fingerprint of a string's 4-byte windows.
///
/// For input `s`, bucket `crc32(s[x..x + 4]) & 63` is incremented for every
/// starting offset `x`; the counts therefore sum to
/// `max(0, s.len() - 3)`. Strings shorter than one window produce the zero
/// histogram. Deterministic, pure function of the input bytes.
///
/// # Example
///
/// ```rust
/// use sigsim::ngram::NgramHistogram;
///
/// let hist = NgramHistogram::of("abcdef");
/// let total: u32 = hist.counts().iter().sum();
/// assert_eq!(total, 3); // "abcd", "bcde", "cdef"
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct NgramHistogram {
    counts: [u32; HISTOGRAM_BUCKETS],
}

impl NgramHistogram {
    /// Fingerprint `text` by hashing each 4-byte window into a bucket.
    pub fn of(text: &str) -> Self {
        let mut counts = [0u32; HISTOGRAM_BUCKETS];
        for window in text.as_bytes().windows(NGRAM_WINDOW) {
            counts[crc32fast::hash(window) as usize & (HISTOGRAM_BUCKETS - 1)] += 1;
        }
        Self { counts }
    }

    /// The per-bucket window counts.
    pub fn counts(&self) -> &[u32; HISTOGRAM_BUCKETS] {
        &self.counts
    }

    /// A stable 8-hex-digit digest of the bucket counts, for keying
    /// clusters by fingerprint without shipping the whole histogram.
    ///
    /// Equal histograms always digest equally; the converse holds only up
    /// to CRC-32 collision odds, which is fine for its grouping use.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sigsim::ngram::NgramHistogram;
    ///
    /// // Sub-window strings all share the zero histogram, and its digest.
    /// assert_eq!(NgramHistogram::of("").digest(), NgramHistogram::of("abc").digest());
    /// assert_eq!(NgramHistogram::of("").digest().len(), 8);
    /// ```
    pub fn digest(&self) -> String {
        let mut hasher = crc32fast::Hasher::new();
        for count in self.counts {
            hasher.update(&count.to_le_bytes());
        }
        format!("{:08x}", hasher.finalize())
    }
}

#[cfg(feature = "serialization")]
impl serde::Serialize for NgramHistogram {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serde::Serialize::serialize(self.counts.as_slice(), serializer)
    }
}

#[cfg(feature = "serialization")]
impl<'de> serde::Deserialize<'de> for NgramHistogram {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let counts = <Vec<u32> as serde::Deserialize>::deserialize(deserializer)?;
        let counts: [u32; HISTOGRAM_BUCKETS] = counts
            .try_into()
            .map_err(|v: Vec<u32>| serde::de::Error::invalid_length(v.len(), &"64 bucket counts"))?;
        Ok(Self { counts })
    }
}

/// Sum of absolute per-bucket count differences between two fingerprints:
/// the raw ngram-difference sum.
///
/// This is an *estimate* for short-circuiting exact computation, not a
/// certified bound. It undercounts whenever distinct windows collide into
/// one bucket, and large transpositions barely move it while moving true
/// edit distance a lot. A single character edit perturbs at most 4
/// overlapping windows, so callers wanting a defensible lower bound on edit
/// distance divide the sum by 4 themselves; the rounding policy is theirs.
///
/// # Example
///
/// ```rust
/// use sigsim::ngram::{estimate_distance, NgramHistogram};
///
/// let a = NgramHistogram::of("executor timed out waiting for node");
/// assert_eq!(estimate_distance(&a, &a), 0);
/// ```
pub fn estimate_distance(a: &NgramHistogram, b: &NgramHistogram) -> usize {
    a.counts
        .iter()
        .zip(&b.counts)
        .map(|(&x, &y)| x.abs_diff(y) as usize)
        .sum()
}

/// Read-through cache of fingerprints, keyed by exact string value.
///
/// Entries are added on first computation and never evicted; unbounded
/// growth is the accepted tradeoff for signature corpora, where the same
/// normalized strings recur across many pairwise comparisons. Callers own
/// the cache and decide its scope; there is no hidden process-wide state.
///
/// Thread safety: lookups and inserts are safe from any thread. Two threads
/// racing on the same key may both compute the histogram; the computation
/// is pure, so whichever insert lands first wins and both observe the same
/// value.
///
/// With the `concurrent-cache` feature the backing store is a lock-free
/// `DashMap`; otherwise it is an `RwLock`-guarded map.
///
/// # Example
///
/// ```rust
/// use sigsim::ngram::HistogramCache;
///
/// let cache = HistogramCache::new();
/// let first = cache.histogram("etcd leader changed");
/// let second = cache.histogram("etcd leader changed");
/// assert_eq!(first, second);
/// assert_eq!(cache.len(), 1);
/// ```
pub struct HistogramCache {
    #[cfg(feature = "concurrent-cache")]
    entries: DashMap<String, NgramHistogram>,

    #[cfg(not(feature = "concurrent-cache"))]
    entries: RwLock<FxHashMap<String, NgramHistogram>>,
}

impl HistogramCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            #[cfg(feature = "concurrent-cache")]
            entries: DashMap::new(),

            #[cfg(not(feature = "concurrent-cache"))]
            entries: RwLock::new(FxHashMap::default()),
        }
    }

    /// Fingerprint `text`, consulting the cache first and populating it on
    /// a miss. The histogram is computed outside any lock.
    pub fn histogram(&self, text: &str) -> NgramHistogram {
        #[cfg(feature = "concurrent-cache")]
        {
            if let Some(hit) = self.entries.get(text) {
                return *hit;
            }
            let computed = NgramHistogram::of(text);
            *self.entries.entry(text.to_owned()).or_insert(computed)
        }

        #[cfg(not(feature = "concurrent-cache"))]
        {
            if let Some(hit) = self.entries.read().unwrap().get(text) {
                return *hit;
            }
            let computed = NgramHistogram::of(text);
            *self
                .entries
                .write()
                .unwrap()
                .entry(text.to_owned())
                .or_insert(computed)
        }
    }

    /// Number of cached fingerprints.
    pub fn len(&self) -> usize {
        #[cfg(feature = "concurrent-cache")]
        {
            self.entries.len()
        }

        #[cfg(not(feature = "concurrent-cache"))]
        {
            self.entries.read().unwrap().len()
        }
    }

    /// Whether the cache holds no fingerprints yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for HistogramCache {
    fn default() -> Self {
        Self::new()
    }
}
