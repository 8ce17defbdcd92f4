//! Terminal annotation sink
//!
//! The stand-in for tinting a list row: one line per scored PR with a
//! colored score badge. Painting is naturally idempotent here — the
//! driver only hands each row over once, and re-printing the same line
//! would merely repeat it, never corrupt state.

use async_trait::async_trait;
use pr_triage_core::{AnnotationSink, CandidateRow, Score};

const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

/// Prints scored rows to stdout
pub struct TerminalSink {
    color: bool,
}

impl TerminalSink {
    /// Colored output, unless the conventional NO_COLOR var is set
    pub fn new() -> Self {
        Self {
            color: std::env::var_os("NO_COLOR").is_none(),
        }
    }

    /// Uncolored output
    pub fn plain() -> Self {
        Self { color: false }
    }
}

impl Default for TerminalSink {
    fn default() -> Self {
        Self::new()
    }
}

fn score_color(value: u8) -> &'static str {
    match value {
        8..=10 => GREEN,
        5..=7 => YELLOW,
        _ => RED,
    }
}

fn format_row(pr_number: u64, title: &str, score: &Score, color: bool) -> String {
    let badge = format!("[{:>2}/10]", score.value);
    let badge = if color {
        format!("{}{}{}", score_color(score.value), badge, RESET)
    } else {
        badge
    };

    let mut line = format!("{} #{:<5} {}", badge, pr_number, title);

    if !score.deductions.is_empty() {
        let detail: Vec<String> = score
            .deductions
            .iter()
            .map(|d| format!("{} {}", d.label, d.delta))
            .collect();
        line.push_str(&format!("  ({})", detail.join(", ")));
    }

    line
}

#[async_trait]
impl AnnotationSink for TerminalSink {
    async fn paint(
        &self,
        row: &CandidateRow,
        pr_number: u64,
        score: &Score,
    ) -> anyhow::Result<()> {
        println!("{}", format_row(pr_number, &row.title, score, self.color));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pr_triage_core::Deduction;

    fn score(value: u8, deductions: Vec<Deduction>) -> Score {
        Score { value, deductions }
    }

    #[test]
    fn test_format_clean_row() {
        let line = format_row(12, "Fix cache warmup", &score(10, vec![]), false);
        assert_eq!(line, "[10/10] #12    Fix cache warmup");
    }

    #[test]
    fn test_format_row_with_deductions() {
        let deductions = vec![
            Deduction {
                label: "merge-conflicts",
                delta: -3,
            },
            Deduction {
                label: "ci-failed",
                delta: -3,
            },
        ];
        let line = format_row(7, "Rework pipeline", &score(4, deductions), false);
        assert_eq!(
            line,
            "[ 4/10] #7     Rework pipeline  (merge-conflicts -3, ci-failed -3)"
        );
    }

    #[test]
    fn test_colored_badge_by_band() {
        let high = format_row(1, "t", &score(9, vec![]), true);
        assert!(high.starts_with(GREEN));

        let mid = format_row(1, "t", &score(6, vec![]), true);
        assert!(mid.starts_with(YELLOW));

        let low = format_row(1, "t", &score(2, vec![]), true);
        assert!(low.starts_with(RED));
    }
}
