// src/vcs.rs
use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::Error;

/// Whitespace-token cap applied to captured diffs. Counting tokens by
/// splitting on spaces is a lossy approximation of a real tokenizer,
/// kept under this explicit name so an accurate one can be swapped in.
pub const MAX_DIFF_TOKENS: usize = 30_000;

// =============================================================================
// VCS KIND
// =============================================================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VcsKind {
    Git,
    Svn,
}

impl VcsKind {
    pub fn diff_command(self) -> &'static str {
        match self {
            Self::Git => "git diff --cached",
            Self::Svn => "svn diff --git -x -w",
        }
    }

    pub fn commit_command(self) -> &'static str {
        match self {
            Self::Git => "git commit",
            Self::Svn => "svn commit",
        }
    }
}

/// Probe for an active VCS in fixed priority order: git before svn.
/// Absence is a reported result, never an error.
pub fn detect() -> Option<VcsKind> {
    if probe("git", &["status"]) {
        return Some(VcsKind::Git);
    }
    if probe("svn", &["status"]) {
        return Some(VcsKind::Svn);
    }
    None
}

fn probe(program: &str, args: &[&str]) -> bool {
    Command::new(program)
        .args(args)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

// =============================================================================
// SHELL EXECUTION
// =============================================================================
fn shell_command(command: &str) -> Command {
    #[cfg(windows)]
    {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", command]);
        cmd
    }
    #[cfg(not(windows))]
    {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", command]);
        cmd
    }
}

/// Run a diff command and capture its stdout as text.
pub fn capture_diff(command: &str) -> Result<String, Error> {
    debug!(command, "capturing diff");
    let output = shell_command(command)
        .output()
        .map_err(|_| Error::CommandFailed { command: command.to_string() })?;
    if !output.status.success() {
        return Err(Error::CommandFailed { command: command.to_string() });
    }
    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Run a commit command with inherited stdio so the user can interact
/// with editors and VCS prompts directly.
pub fn run_interactive(command: &str) -> Result<(), Error> {
    debug!(command, "running interactive command");
    let status = shell_command(command)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|_| Error::CommandFailed { command: command.to_string() })?;
    if !status.success() {
        return Err(Error::CommandFailed { command: command.to_string() });
    }
    Ok(())
}

// =============================================================================
// DIFF TRUNCATION
// =============================================================================
/// Keep the first `max_tokens` space-separated tokens of the diff.
/// Below the threshold the input comes back untouched; above it, tokens
/// are rejoined with single spaces, so the cut is lossy by design.
pub fn truncate_diff_tokens(diff: &str, max_tokens: usize) -> String {
    let tokens: Vec<&str> = diff.split(' ').collect();
    if tokens.len() <= max_tokens {
        return diff.to_string();
    }
    tokens[..max_tokens].join(" ")
}

pub fn diff_token_count(diff: &str) -> usize {
    diff.split(' ').count()
}

// =============================================================================
// COMMIT COMMAND CONSTRUCTION
// =============================================================================
/// Double every single quote so the message survives single-quoted
/// shell interpolation.
pub fn escape_commit_message(message: &str) -> String {
    message.replace('\'', "''")
}

pub fn build_commit_command(base: &str, message: &str) -> String {
    format!("{} -m '{}'", base, escape_commit_message(message))
}

// =============================================================================
// MODULE TESTS
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_commands_per_kind() {
        assert_eq!(VcsKind::Git.diff_command(), "git diff --cached");
        assert_eq!(VcsKind::Svn.diff_command(), "svn diff --git -x -w");
        assert_eq!(VcsKind::Git.commit_command(), "git commit");
        assert_eq!(VcsKind::Svn.commit_command(), "svn commit");
    }

    #[test]
    fn truncate_below_threshold_is_noop() {
        let diff = "one two three\nfour five";
        assert_eq!(truncate_diff_tokens(diff, 30_000), diff);
    }

    #[test]
    fn truncate_exact_threshold_is_noop() {
        let diff = vec!["tok"; 100].join(" ");
        assert_eq!(truncate_diff_tokens(&diff, 100), diff);
    }

    #[test]
    fn truncate_above_threshold_keeps_prefix() {
        let diff = (0..200).map(|i| i.to_string()).collect::<Vec<_>>().join(" ");
        let truncated = truncate_diff_tokens(&diff, 100);
        assert_eq!(truncated.split(' ').count(), 100);
        assert!(diff.starts_with(&truncated));
    }

    #[test]
    fn truncate_preserves_newlines_inside_tokens() {
        // Splitting on spaces only: newlines stay embedded in tokens
        let diff = "a b\nc d e";
        let truncated = truncate_diff_tokens(diff, 2);
        assert_eq!(truncated, "a b\nc");
    }

    #[test]
    fn token_count_matches_split() {
        assert_eq!(diff_token_count("a b c"), 3);
        assert_eq!(diff_token_count(""), 1);
    }

    #[test]
    fn escape_doubles_single_quotes() {
        assert_eq!(escape_commit_message("don't break"), "don''t break");
        assert_eq!(escape_commit_message("it's a 'test'"), "it''s a ''test''");
    }

    #[test]
    fn escape_leaves_clean_messages_alone() {
        assert_eq!(escape_commit_message("fix: plain message"), "fix: plain message");
    }

    #[test]
    fn build_commit_command_wraps_message() {
        let cmd = build_commit_command("git commit", "fix: don't panic");
        assert_eq!(cmd, "git commit -m 'fix: don''t panic'");
    }

    #[test]
    fn capture_diff_reports_failing_command() {
        let err = capture_diff("exit 3").unwrap_err();
        match err {
            Error::CommandFailed { command } => assert_eq!(command, "exit 3"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn capture_diff_collects_stdout() {
        let out = capture_diff("echo hello").unwrap();
        assert_eq!(out.trim(), "hello");
    }

    #[test]
    fn detect_never_panics() {
        // Result depends on the environment; only the contract matters
        let _ = detect();
    }
}
