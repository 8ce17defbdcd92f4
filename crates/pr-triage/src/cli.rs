//! Command-line interface

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "pr-triage",
    about = "Scores open pull requests for reviewability",
    version
)]
pub struct Cli {
    /// Target repository owner (overrides config)
    #[arg(long, global = true)]
    pub owner: Option<String>,

    /// Target repository name (overrides config)
    #[arg(long, global = true)]
    pub repo: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Scan open PRs and annotate them with reviewability scores
    Scan {
        /// Run a single tick instead of polling
        #[arg(long)]
        once: bool,
    },

    /// Post a comment on a PR
    Comment {
        /// PR number
        pr: u64,
        /// Comment body
        #[arg(long)]
        body: String,
    },

    /// Post the configured promote comment on a PR
    Promote {
        /// PR number
        pr: u64,
    },

    /// Post the configured run-tests comment on a PR
    RunTests {
        /// PR number
        pr: u64,
    },

    /// Post the configured approve comment on a PR
    Approve {
        /// PR number
        pr: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_is_default_free_form() {
        let cli = Cli::try_parse_from(["pr-triage"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_scan_once() {
        let cli = Cli::try_parse_from(["pr-triage", "scan", "--once"]).unwrap();
        match cli.command {
            Some(Command::Scan { once }) => assert!(once),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_repo_overrides() {
        let cli =
            Cli::try_parse_from(["pr-triage", "--owner", "acme", "--repo", "widgets", "scan"])
                .unwrap();
        assert_eq!(cli.owner.as_deref(), Some("acme"));
        assert_eq!(cli.repo.as_deref(), Some("widgets"));
    }

    #[test]
    fn test_comment_requires_body() {
        assert!(Cli::try_parse_from(["pr-triage", "comment", "12"]).is_err());

        let cli =
            Cli::try_parse_from(["pr-triage", "comment", "12", "--body", "looks good"]).unwrap();
        match cli.command {
            Some(Command::Comment { pr, body }) => {
                assert_eq!(pr, 12);
                assert_eq!(body, "looks good");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_promote_takes_pr_number() {
        let cli = Cli::try_parse_from(["pr-triage", "promote", "7"]).unwrap();
        match cli.command {
            Some(Command::Promote { pr }) => assert_eq!(pr, 7),
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
