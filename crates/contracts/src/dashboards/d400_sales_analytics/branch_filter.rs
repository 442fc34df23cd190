use serde::{Deserialize, Serialize};
use std::fmt;

/// Label of the synthetic "every branch" option in the selector
pub const ALL_BRANCHES: &str = "All";

/// Branch selection applied to the whole dataset before aggregation.
///
/// Serialized as a plain string: `"All"` or the branch name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BranchFilter {
    #[default]
    All,
    Branch(String),
}

impl BranchFilter {
    pub fn is_all(&self) -> bool {
        matches!(self, BranchFilter::All)
    }

    /// Whether a record from `branch` passes this filter
    pub fn matches(&self, branch: &str) -> bool {
        match self {
            BranchFilter::All => true,
            BranchFilter::Branch(name) => name == branch,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            BranchFilter::All => ALL_BRANCHES,
            BranchFilter::Branch(name) => name,
        }
    }
}

impl From<String> for BranchFilter {
    fn from(value: String) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed == ALL_BRANCHES {
            BranchFilter::All
        } else {
            BranchFilter::Branch(trimmed.to_string())
        }
    }
}

impl From<&str> for BranchFilter {
    fn from(value: &str) -> Self {
        BranchFilter::from(value.to_string())
    }
}

impl From<BranchFilter> for String {
    fn from(value: BranchFilter) -> Self {
        match value {
            BranchFilter::All => ALL_BRANCHES.to_string(),
            BranchFilter::Branch(name) => name,
        }
    }
}

impl fmt::Display for BranchFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
