//! Fused evidence model for one pull request
//!
//! Every signal the pipeline collects is independently optional: an
//! endpoint that fails, returns garbage, or was never consulted leaves
//! its field `Unknown`, and unknown fields contribute no score
//! deduction. Encoding that as `Signal<T>` makes the rule impossible to
//! bypass by accident — there is no null to pun on.

use serde::Serialize;

/// A single piece of evidence that may or may not have been resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Signal<T> {
    /// The value was resolved from the forge.
    Known(T),
    /// Not fetched, fetch failed, or the response was inconclusive.
    Unknown,
}

// Not derived: the derive would demand `T: Default` for no reason.
impl<T> Default for Signal<T> {
    fn default() -> Self {
        Signal::Unknown
    }
}

impl<T> Signal<T> {
    /// The resolved value, if any
    pub fn known(&self) -> Option<&T> {
        match self {
            Signal::Known(v) => Some(v),
            Signal::Unknown => None,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Signal::Known(_))
    }
}

impl<T: Copy> Signal<T> {
    /// The resolved value by copy, if any
    pub fn get(&self) -> Option<T> {
        match self {
            Signal::Known(v) => Some(*v),
            Signal::Unknown => None,
        }
    }
}

impl<T> From<Option<T>> for Signal<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Signal::Known(v),
            None => Signal::Unknown,
        }
    }
}

/// Classification of a PR description body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DescriptionStatus {
    /// User-authored content present
    Full,
    /// Nothing but the tracker's auto-inserted block
    BoilerplateOnly,
    /// Blank (or whitespace) body
    Empty,
}

/// The fused evidence for one pull request.
///
/// `viewer_has_active_review` is a plain bool rather than a `Signal`:
/// it is only ever true on positive evidence (the viewer's own
/// non-dismissed review against the current head commit), so "could not
/// determine" and "no" behave identically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReviewabilitySignals {
    pub changed_file_count: Signal<u64>,
    pub has_merge_conflicts: Signal<bool>,
    pub description: Signal<DescriptionStatus>,
    pub ci_failed: Signal<bool>,
    pub is_draft: Signal<bool>,
    pub requested_reviewer_count: Signal<u64>,
    pub viewer_has_active_review: bool,
}

impl ReviewabilitySignals {
    /// Signals with every field unresolved, the result for a PR the
    /// pipeline could not reach at all.
    pub fn unknown() -> Self {
        Self::default()
    }
}

/// Identifies the subject of every fetch.
///
/// Derived once per row and immutable afterwards. The number must be a
/// positive integer; `parse_number` is the lenient front door for raw
/// row identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PullRequestRef {
    pub owner: String,
    pub repo: String,
    pub number: u64,
}

impl PullRequestRef {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>, number: u64) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            number,
        }
    }

    /// Parse a raw row identifier ("123", "#123", padded whitespace)
    /// into a positive PR number. Returns `None` for anything else.
    pub fn parse_number(raw: &str) -> Option<u64> {
        let cleaned = raw.trim().trim_start_matches('#');
        match cleaned.parse::<u64>() {
            Ok(n) if n > 0 => Some(n),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_from_option() {
        let known: Signal<u64> = Some(3).into();
        assert_eq!(known, Signal::Known(3));
        assert_eq!(known.get(), Some(3));

        let unknown: Signal<u64> = None.into();
        assert_eq!(unknown, Signal::Unknown);
        assert_eq!(unknown.get(), None);
        assert!(!unknown.is_known());
    }

    #[test]
    fn test_default_signals_all_unknown() {
        let signals = ReviewabilitySignals::unknown();
        assert_eq!(signals.changed_file_count, Signal::Unknown);
        assert_eq!(signals.has_merge_conflicts, Signal::Unknown);
        assert_eq!(signals.description, Signal::Unknown);
        assert_eq!(signals.ci_failed, Signal::Unknown);
        assert_eq!(signals.is_draft, Signal::Unknown);
        assert_eq!(signals.requested_reviewer_count, Signal::Unknown);
        assert!(!signals.viewer_has_active_review);
    }

    #[test]
    fn test_parse_number_accepts_plain_and_hash_prefixed() {
        assert_eq!(PullRequestRef::parse_number("123"), Some(123));
        assert_eq!(PullRequestRef::parse_number("#123"), Some(123));
        assert_eq!(PullRequestRef::parse_number("  42  "), Some(42));
    }

    #[test]
    fn test_parse_number_rejects_invalid() {
        assert_eq!(PullRequestRef::parse_number("0"), None);
        assert_eq!(PullRequestRef::parse_number(""), None);
        assert_eq!(PullRequestRef::parse_number("abc"), None);
        assert_eq!(PullRequestRef::parse_number("12a"), None);
        assert_eq!(PullRequestRef::parse_number("-5"), None);
    }
}
