//! Newtype wrappers for domain identifiers.
//!
//! These types prevent accidental mixing of different ID types (e.g., using a
//! user ID where a PR number is expected) and make the code more self-documenting.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A pull request (or issue) number within a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrNumber(pub u64);

impl fmt::Display for PrNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for PrNumber {
    fn from(n: u64) -> Self {
        PrNumber(n)
    }
}

/// A stable GitHub user ID.
///
/// Logins can be renamed; the numeric ID cannot, so reviewer membership is
/// keyed on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A GitHub login (username).
///
/// GitHub treats logins case-insensitively, so comparisons should go through
/// [`Login::matches`] rather than `==` when the other side came from a
/// different source (config vs. API).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Login(pub String);

impl Login {
    pub fn new(s: impl Into<String>) -> Self {
        Login(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison, matching GitHub's handling of logins.
    pub fn matches(&self, other: &Login) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl fmt::Display for Login {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Login {
    fn from(s: &str) -> Self {
        Login(s.to_string())
    }
}

/// A repository identifier (owner/repo format).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoId {
    pub owner: String,
    pub repo: String,
}

/// Error returned when a string is not a valid `owner/repo` slug.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid repository '{0}': expected owner/repo")]
pub struct InvalidRepoId(pub String);

impl RepoId {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        RepoId {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Parses `owner/repo`, also accepting a leading `https://github.com/`.
    pub fn parse(s: &str) -> Result<Self, InvalidRepoId> {
        let trimmed = s.trim();
        let slug = trimmed
            .strip_prefix("https://github.com/")
            .or_else(|| trimmed.strip_prefix("http://github.com/"))
            .or_else(|| trimmed.strip_prefix("github.com/"))
            .unwrap_or(trimmed)
            .trim_end_matches('/');

        match slug.split_once('/') {
            Some((owner, repo))
                if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') =>
            {
                Ok(RepoId::new(owner, repo))
            }
            _ => Err(InvalidRepoId(s.to_string())),
        }
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod pr_number {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn display_has_hash_prefix(n: u64) {
                prop_assert_eq!(PrNumber(n).to_string(), format!("#{}", n));
            }
        }
    }

    mod login {
        use super::*;

        #[test]
        fn matches_ignores_case() {
            assert!(Login::from("Alice").matches(&Login::from("alice")));
            assert!(!Login::from("alice").matches(&Login::from("alicia")));
        }
    }

    mod repo_id {
        use super::*;

        #[test]
        fn parses_plain_slug() {
            assert_eq!(RepoId::parse("owner/repo"), Ok(RepoId::new("owner", "repo")));
        }

        #[test]
        fn parses_github_urls() {
            assert_eq!(
                RepoId::parse("https://github.com/owner/repo/"),
                Ok(RepoId::new("owner", "repo"))
            );
            assert_eq!(
                RepoId::parse("github.com/owner/repo"),
                Ok(RepoId::new("owner", "repo"))
            );
        }

        #[test]
        fn rejects_malformed() {
            assert!(RepoId::parse("owner").is_err());
            assert!(RepoId::parse("/repo").is_err());
            assert!(RepoId::parse("owner/").is_err());
            assert!(RepoId::parse("a/b/c").is_err());
        }

        #[test]
        fn display_roundtrips_through_parse() {
            let repo = RepoId::new("kubernetes", "contrib");
            assert_eq!(RepoId::parse(&repo.to_string()), Ok(repo));
        }
    }
}
