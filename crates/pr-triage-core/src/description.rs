//! PR description classification
//!
//! The issue tracker appends a block to every PR body: a horizontal rule
//! followed by a fixed sentence and the task link. A body consisting of
//! nothing but that block is no better than an empty one, so the
//! classifier strips it before judging.

use crate::signals::DescriptionStatus;
use regex::Regex;
use std::sync::OnceLock;

/// The fixed sentence the tracker inserts after its horizontal rule.
const TRACKER_SENTENCE: &str = "This pull request is linked to a task in the issue tracker.";

/// Classify a PR body.
///
/// Policy:
/// - blank (or whitespace-only) body → `Empty`
/// - body that is exactly the tracker block → `BoilerplateOnly`
/// - anything else, including real content followed by the tracker
///   block → `Full`
pub fn classify_description(body: Option<&str>) -> DescriptionStatus {
    let trimmed = body.unwrap_or("").trim();
    if trimmed.is_empty() {
        return DescriptionStatus::Empty;
    }

    static BOILERPLATE: OnceLock<Regex> = OnceLock::new();
    let re = BOILERPLATE.get_or_init(|| {
        // Horizontal rule on its own line, then the tracker sentence,
        // then whatever the tracker appended after it.
        let pattern = format!(
            r"(?sm)^-{{3,}}[ \t]*\r?\n\s*{}.*\z",
            regex::escape(TRACKER_SENTENCE)
        );
        Regex::new(&pattern).unwrap()
    });

    match re.find(trimmed) {
        // Only a match anchored at the start of the (trimmed) body means
        // the PR has no user-authored content at all.
        Some(m) if m.start() == 0 => DescriptionStatus::BoilerplateOnly,
        _ => DescriptionStatus::Full,
    }
}
