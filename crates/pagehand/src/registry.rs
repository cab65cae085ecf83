//! Page lookup by name.
//!
//! Steps refer to pages by the words a scenario uses ("home", "app
//! dashboard"). The registry maps those names to [`Page`] objects built for
//! the current driver session.

use crate::page::Page;
use crate::result::{HarnessError, HarnessResult};
use std::collections::HashMap;

/// Registry of the pages a scenario can visit
#[derive(Debug, Clone, Default)]
pub struct PageRegistry {
    pages: HashMap<String, Page>,
}

impl PageRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a page under `name`, replacing any page already there
    pub fn register(&mut self, name: impl Into<String>, page: Page) {
        let name = name.into();
        tracing::debug!(page = %name, url = page.url(), "registering page");
        let _ = self.pages.insert(name, page);
    }

    /// Register a page under its own name
    pub fn add(&mut self, page: Page) {
        self.register(page.name().to_string(), page);
    }

    /// Page registered under `name`
    pub fn get(&self, name: &str) -> HarnessResult<&Page> {
        self.pages
            .get(name)
            .ok_or_else(|| HarnessError::unknown_alias(name))
    }

    /// Page registered under the space-joined `parts`,
    /// e.g. `["app", "dashboard"]` is `"app dashboard"`
    pub fn get_qualified(&self, parts: &[&str]) -> HarnessResult<&Page> {
        self.get(&parts.join(" "))
    }

    /// Whether a page is registered under `name`
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.pages.contains_key(name)
    }

    /// Registered page names, sorted
    #[must_use]
    pub fn list(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.pages.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered pages
    #[must_use]
    pub fn count(&self) -> usize {
        self.pages.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HarnessConfig;
    use crate::mock::MockDriver;
    use std::sync::Arc;

    fn page(name: &str, path: &str) -> Page {
        let driver = Arc::new(MockDriver::new());
        Page::new(name, driver, "https://example.com", path, HarnessConfig::default()).unwrap()
    }

    mod registry_tests {
        use super::*;

        #[test]
        fn test_new_registry() {
            let registry = PageRegistry::new();
            assert_eq!(registry.count(), 0);
            assert!(registry.list().is_empty());
        }

        #[test]
        fn test_register_and_get() {
            let mut registry = PageRegistry::new();
            registry.register("login", page("login", "/login"));

            assert_eq!(registry.count(), 1);
            assert_eq!(registry.get("login").unwrap().url(), "https://example.com/login/");
            assert!(matches!(
                registry.get("nonexistent"),
                Err(HarnessError::UnknownAlias { alias }) if alias == "nonexistent"
            ));
        }

        #[test]
        fn test_register_replaces() {
            let mut registry = PageRegistry::new();
            registry.register("home", page("home", "/old"));
            registry.register("home", page("home", "/new"));
            assert_eq!(registry.count(), 1);
            assert_eq!(registry.get("home").unwrap().url(), "https://example.com/new/");
        }

        #[test]
        fn test_list_pages() {
            let mut registry = PageRegistry::new();
            registry.add(page("login", "/login"));
            registry.add(page("home", "/"));
            assert_eq!(registry.list(), vec!["home", "login"]);
            assert!(registry.contains("home"));
        }

        #[test]
        fn test_qualified_lookup() {
            let mut registry = PageRegistry::new();
            registry.register("app dashboard", page("app dashboard", "/app/dashboard"));
            let found = registry.get_qualified(&["app", "dashboard"]).unwrap();
            assert_eq!(found.name(), "app dashboard");
            assert!(registry.get_qualified(&["app", "settings"]).is_err());
        }
    }
}
