//! Signature normalization.
//!
//! Raw failure text carries entropy that has nothing to do with the failure
//! itself: timestamps, pointer addresses, UUIDs, IPs, and (for very long
//! logs) repeated line blocks. This module reduces that entropy so that
//! edit distance over the normalized form reflects semantic similarity.
//!
//! Two independent entry points:
//!
//! - [`normalize`] for failure bodies (messages, tracebacks, log excerpts)
//! - [`normalize_name`] for short test-case names
//!
//! Both are total and deterministic; neither keeps state across calls.

use rustc_hash::FxHashMap;

/// Byte length above which repeated-line collapsing and truncation kick in.
const LONG_TEXT_THRESHOLD: usize = 10_000;

/// Bytes kept from each end when truncating an oversized signature.
const KEEP_BYTES: usize = 5_000;

/// Marker spliced between the retained head and tail of a truncated text.
const TRUNCATION_MARKER: &str = "\n...[truncated]...\n";

mod patterns {
    use regex::Regex;
    use std::sync::LazyLock;

    /// Timestamp shapes worth blanking outright:
    /// RFC-1123 dates with an optional UTC offset, ctime/syslog dates with
    /// an optional weekday prefix and year suffix, and ISO-8601-ish
    /// date-times with any single punctuation separator.
    pub(super) static DATE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(
            r"[A-Z][a-z]{2}, \d+ \w+ 2\d{3} [\d.:\- ]*([-+]\d+)?|([A-Z][a-z]{2} )?\w{3} +\d{1,2} \d+:\d+:\d+(\.\d+)?( 2\d{3})?|(\d{4}-\d\d-\d\d.|.\d{4} )\d\d:\d\d:\d\d(.\d+)?",
        )
        .unwrap()
    });

    /// Random noisy tokens that should be renumbered instead of deleted:
    /// hex constants, IPs, UUIDs (with an optional trailing ordinal), and
    /// bare hex garbage long enough to not be a real word.
    pub(super) static ORDINAL: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(
            r"0x[0-9a-fA-F]+|\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}|[0-9a-fA-F]{8}-\S{4}-\S{4}-\S{4}-\S{12}(-\d+)?|[0-9a-f]{14,32}",
        )
        .unwrap()
    });

    /// Bracketed/braced tags in test names. Non-greedy: a span ends at the
    /// first closer after its opener, nesting is not interpreted.
    pub(super) static NAME_TAG: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"\[.*?\]|\{.*?\}").unwrap()
    });
}

/// Reduce excess entropy in a failure signature to make clustering easier.
///
/// Applies, in order:
///
/// 1. blanking dates and timestamps;
/// 2. alpha conversion: renaming noisy identifiers (pointer values, IPs,
///    UUIDs, hex garbage) to `UNIQ0`, `UNIQ1`, ... in order of first
///    appearance, so repeated occurrences of the same literal collapse to
///    the same label;
/// 3. for texts still over 10,000 bytes, dropping lines identical to their
///    immediate predecessor;
/// 4. for texts *still* over 10,000 bytes, keeping only the first and last
///    5,000 bytes around a truncation marker.
///
/// The label table in step 2 is scoped to a single call, which is exactly
/// what makes two traces that each repeat "their own" pointer three times
/// normalize to identical text even though the pointer values differ.
///
/// Total over any input, including the empty string.
///
/// # Examples
///
/// ```rust
/// use sigsim::normalize::normalize;
///
/// // Timestamps are deleted, not replaced.
/// assert_eq!(normalize("Mon Jan 2 15:04:05 2023 test failed"), " test failed");
///
/// // Noisy identifiers are renumbered; repeats share a label.
/// assert_eq!(
///     normalize("conn reset by 10.240.0.12: read 0xc8201e6f30 after 10.240.0.12"),
///     "conn reset by UNIQ0: read UNIQ1 after UNIQ0",
/// );
/// ```
pub fn normalize(text: &str) -> String {
    let dated = patterns::DATE.replace_all(text, "");

    let mut labels: FxHashMap<String, String> = FxHashMap::default();
    let mut s = patterns::ORDINAL
        .replace_all(dated.as_ref(), |caps: &regex::Captures| {
            let token = &caps[0];
            let next = labels.len();
            labels
                .entry(token.to_owned())
                .or_insert_with(|| format!("UNIQ{next}"))
                .clone()
        })
        .into_owned();

    if s.len() > LONG_TEXT_THRESHOLD {
        s = collapse_repeated_lines(&s);
    }

    if s.len() > LONG_TEXT_THRESHOLD {
        s = truncate_middle(&s);
    }

    s
}

/// Remove `[...]` and `{...}` tags from a test name, then collapse
/// whitespace runs to single spaces and trim the ends.
///
/// The bracket/brace stripping here is a compatibility contract with other
/// systems that classify test names; its semantics (first closer ends a
/// span, no nesting) must not drift.
///
/// # Example
///
/// ```rust
/// use sigsim::normalize::normalize_name;
///
/// assert_eq!(
///     normalize_name("TestFoo[sig-network] {Slow}  runs ok"),
///     "TestFoo runs ok",
/// );
/// ```
pub fn normalize_name(name: &str) -> String {
    let stripped = patterns::NAME_TAG.replace_all(name, "");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Drop every line identical to the line immediately before it, keeping the
/// first line of each run. Only adjacent duplicates collapse; this is noise
/// reduction for logs that repeat blocks, not general deduplication.
fn collapse_repeated_lines(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut last: Option<&str> = None;
    for line in s.split('\n') {
        if last == Some(line) {
            continue;
        }
        if last.is_some() {
            out.push('\n');
        }
        out.push_str(line);
        last = Some(line);
    }
    out
}

/// Keep the first and last [`KEEP_BYTES`] of an oversized text around
/// [`TRUNCATION_MARKER`]. Cut points move inward only as far as needed to
/// stay on UTF-8 character boundaries.
fn truncate_middle(s: &str) -> String {
    let mut head = KEEP_BYTES;
    while !s.is_char_boundary(head) {
        head -= 1;
    }
    let mut tail = s.len() - KEEP_BYTES;
    while !s.is_char_boundary(tail) {
        tail += 1;
    }

    let mut out = String::with_capacity(head + TRUNCATION_MARKER.len() + (s.len() - tail));
    out.push_str(&s[..head]);
    out.push_str(TRUNCATION_MARKER);
    out.push_str(&s[tail..]);
    out
}
