//! Search box filtering for the ACL list.

use regex::{Regex, RegexBuilder};
use tracing::debug;

use crate::rule::AclDetail;

/// Case-insensitive regex filter over principals (and optionally hosts).
///
/// An empty query matches everything. A query that is not a valid regular
/// expression matches nothing.
#[derive(Debug, Clone)]
pub struct AclListFilter {
    query: String,
    regex: Option<Regex>,
    match_host: bool,
}

impl AclListFilter {
    pub fn new(query: &str) -> Self {
        let query = query.trim();
        let regex = if query.is_empty() {
            None
        } else {
            match RegexBuilder::new(query).case_insensitive(true).build() {
                Ok(regex) => Some(regex),
                Err(e) => {
                    debug!(query, "Invalid ACL search pattern, matching nothing: {e}");
                    None
                }
            }
        };

        Self {
            query: query.to_string(),
            regex,
            match_host: false,
        }
    }

    /// Also match the query against the host.
    pub fn with_host(mut self, match_host: bool) -> Self {
        self.match_host = match_host;
        self
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn matches(&self, detail: &AclDetail) -> bool {
        if self.query.is_empty() {
            return true;
        }
        let Some(regex) = &self.regex else {
            return false;
        };

        regex.is_match(&detail.shared_config.principal)
            || (self.match_host && regex.is_match(&detail.shared_config.host))
    }

    pub fn apply<'a>(&self, details: &'a [AclDetail]) -> Vec<&'a AclDetail> {
        details.iter().filter(|d| self.matches(d)).collect()
    }
}
