//! Issue tracker integration: the issue model, its rich-text flattening, and the
//! [`CandidateSource`] seam with a Jira Cloud implementation.

pub mod error;
pub mod issue;
pub mod jira;
#[cfg(any(test, feature = "mock"))]
mod mock;
pub mod source;

#[cfg(test)]
mod tests;

pub use error::TrackerError;
pub use issue::{TrackerIssue, comment_document, flatten_description, is_valid_issue_key};
pub use jira::JiraClient;
pub use source::{CandidateSource, TrackerAuth, TrackerCredentials, normalize_base_url};

#[cfg(any(test, feature = "mock"))]
pub use mock::StaticCandidateSource;
