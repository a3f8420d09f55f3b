//! Page access policy.

use crate::api::GATED_PAGES;

/// Entry point every failed check redirects to.
pub const LOGIN_PATH: &str = "/";

/// Where a successful login lands.
pub const DASHBOARD_PATH: &str = "/dashboard";

/// How a page treats a missing session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageAccess {
    /// Rendered for everyone, no verification.
    Public,
    /// Requires a verified session; redirect to login otherwise.
    Gated,
    /// Rendered for everyone, differently when a session verifies.
    Conditional,
}

/// Static path classification, evaluated once per page load.
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    rules: Vec<(String, PageAccess)>,
    fallback: PageAccess,
}

impl AccessPolicy {
    /// An empty policy classifying every path as `fallback`.
    pub fn new(fallback: PageAccess) -> Self {
        Self {
            rules: Vec::new(),
            fallback,
        }
    }

    /// Add or replace the rule for one path.
    pub fn with(mut self, path: &str, access: PageAccess) -> Self {
        let path = normalize(path).to_string();
        self.rules.retain(|(p, _)| *p != path);
        self.rules.push((path, access));
        self
    }

    /// Classify a request path. Query strings, fragments and trailing
    /// slashes are ignored.
    pub fn classify(&self, path: &str) -> PageAccess {
        let path = normalize(path);
        self.rules
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, access)| *access)
            .unwrap_or(self.fallback)
    }
}

impl Default for AccessPolicy {
    /// The dashboard's pages. Unknown pages are gated.
    fn default() -> Self {
        let policy = AccessPolicy::new(PageAccess::Gated)
            .with(LOGIN_PATH, PageAccess::Conditional)
            .with("/clone", PageAccess::Public);

        GATED_PAGES
            .iter()
            .fold(policy, |policy, (path, _)| policy.with(path, PageAccess::Gated))
    }
}

fn normalize(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or(path);
    match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = AccessPolicy::default();
        assert_eq!(policy.classify("/"), PageAccess::Conditional);
        assert_eq!(policy.classify("/clone"), PageAccess::Public);
        assert_eq!(policy.classify("/dashboard"), PageAccess::Gated);
        assert_eq!(policy.classify("/sample-lawyer-page"), PageAccess::Gated);
        assert_eq!(policy.classify("/vikk-intelligence"), PageAccess::Gated);
        assert_eq!(policy.classify("/knowledge-graph"), PageAccess::Gated);
    }

    #[test]
    fn test_unknown_pages_fail_closed() {
        assert_eq!(AccessPolicy::default().classify("/admin"), PageAccess::Gated);
    }

    #[test]
    fn test_normalization() {
        let policy = AccessPolicy::default();
        assert_eq!(policy.classify("/clone/"), PageAccess::Public);
        assert_eq!(policy.classify("/clone?ref=nav"), PageAccess::Public);
        assert_eq!(policy.classify("/#top"), PageAccess::Conditional);
        assert_eq!(policy.classify(""), PageAccess::Conditional);
    }

    #[test]
    fn test_rules_replace() {
        let policy = AccessPolicy::new(PageAccess::Public)
            .with("/reports", PageAccess::Gated)
            .with("/reports/", PageAccess::Conditional);
        assert_eq!(policy.classify("/reports"), PageAccess::Conditional);
        assert_eq!(policy.classify("/other"), PageAccess::Public);
    }
}
