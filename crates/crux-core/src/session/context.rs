//! Who the session is for.
//!
//! Both contexts are supplied by the host at `start` and only feed the document
//! metadata and title.

use serde::{Deserialize, Serialize};

/// The person being challenged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserContext {
    /// User's display name
    pub name: String,
    /// Optional role or title (e.g. "Head of Product")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl UserContext {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: None,
        }
    }
}

impl Default for UserContext {
    fn default() -> Self {
        Self::new("You")
    }
}

/// The organization the strategy is for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgContext {
    /// Company name used in the document title
    pub company_name: String,
    /// Optional industry hint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
}

impl OrgContext {
    pub fn new(company_name: impl Into<String>) -> Self {
        Self {
            company_name: company_name.into(),
            industry: None,
        }
    }

    /// Company name, or a neutral placeholder when none was given.
    pub fn display_name(&self) -> &str {
        let trimmed = self.company_name.trim();
        if trimmed.is_empty() {
            "Your Company"
        } else {
            trimmed
        }
    }
}

impl Default for OrgContext {
    fn default() -> Self {
        Self::new("")
    }
}
