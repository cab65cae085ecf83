//! Element resolution.
//!
//! [`ElementSelector`] is the declaration of a named element on a page or
//! section. It carries only a [`Locator`]; nothing touches the document until
//! it is resolved through a [`SearchContext`], and every resolution polls the
//! live document from scratch. Handles are never cached between accesses
//! because the page may have re-rendered in between.

use crate::driver::{ElementHandle, SharedDriver, WebDriver};
use crate::locator::{By, Locator};
use crate::result::{HarnessError, HarnessResult};
use crate::wait::{poll, WaitOptions};
use std::fmt;

/// Script used to bring an element to the middle of the viewport
pub const SCROLL_INTO_VIEW_SCRIPT: &str = "arguments[0].scrollIntoView({ block: 'center' })";

/// Outcome of resolving a locator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// First match of a single-element locator
    One(ElementHandle),
    /// Every match of a multiple-element locator
    Many(Vec<ElementHandle>),
}

impl Resolved {
    /// The single handle, or the first of many
    #[must_use]
    pub fn first(&self) -> Option<&ElementHandle> {
        match self {
            Self::One(handle) => Some(handle),
            Self::Many(handles) => handles.first(),
        }
    }

    /// All handles as a vector
    #[must_use]
    pub fn into_vec(self) -> Vec<ElementHandle> {
        match self {
            Self::One(handle) => vec![handle],
            Self::Many(handles) => handles,
        }
    }
}

/// Split an XPath at the `|` operators outside predicates and string literals
fn union_branches(xpath: &str) -> Vec<&str> {
    let mut branches = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (i, c) in xpath.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '[') => depth += 1,
            (None, ']') => depth = depth.saturating_sub(1),
            (None, '|') if depth == 0 => {
                branches.push(&xpath[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    branches.push(&xpath[start..]);
    branches
}

/// An XPath starting at the document root escapes any element scope, so
/// scoped searches anchor every union branch at the context node instead.
/// Absolute `/...` paths cannot be anchored and are rejected.
fn anchor_to_scope(by: By) -> HarnessResult<By> {
    let xpath = match by {
        By::XPath(xpath) => xpath,
        other => return Ok(other),
    };
    let mut anchored = String::with_capacity(xpath.len() + 4);
    for (i, branch) in union_branches(&xpath).into_iter().enumerate() {
        if i > 0 {
            anchored.push('|');
        }
        let path = branch.trim_start_matches(|c: char| c == '(' || c.is_whitespace());
        anchored.push_str(&branch[..branch.len() - path.len()]);
        if path.starts_with("//") {
            anchored.push('.');
        } else if path.starts_with('/') {
            return Err(HarnessError::InvalidValue {
                alias: xpath.clone(),
                message: "absolute XPath cannot be confined to an element scope".to_string(),
            });
        }
        anchored.push_str(path);
    }
    Ok(By::XPath(anchored))
}

/// Poll until `locator` matches at least one node under `scope`.
/// The returned vector is never empty.
fn poll_matches(
    driver: &dyn WebDriver,
    locator: &Locator,
    scope: Option<&ElementHandle>,
    options: &WaitOptions,
) -> HarnessResult<Vec<ElementHandle>> {
    let by = match scope {
        Some(_) => anchor_to_scope(locator.to_by())?,
        None => locator.to_by(),
    };
    tracing::debug!(locator = %locator, scoped = scope.is_some(), "resolving element");

    let found = poll(options, || {
        let found = driver.find_elements(&by, scope)?;
        Ok((!found.is_empty()).then_some(found))
    })?;

    found.ok_or_else(|| {
        tracing::warn!(locator = %locator, timeout_ms = options.timeout_ms, "element not found");
        not_found(locator)
    })
}

fn not_found(locator: &Locator) -> HarnessError {
    HarnessError::ElementNotFound {
        locator: locator.value().to_string(),
        strategy: locator.strategy(),
    }
}

fn first_match(
    driver: &dyn WebDriver,
    locator: &Locator,
    scope: Option<&ElementHandle>,
    options: &WaitOptions,
) -> HarnessResult<ElementHandle> {
    poll_matches(driver, locator, scope, options)?
        .into_iter()
        .next()
        .ok_or_else(|| not_found(locator))
}

/// Resolve `locator` into live handles.
///
/// Polls `scope` (or the whole document) until at least one node matches or
/// `options.timeout_ms` elapses. Single-element locators return the first
/// match; multiple-element locators return every match.
pub fn find(
    driver: &dyn WebDriver,
    locator: &Locator,
    scope: Option<&ElementHandle>,
    options: &WaitOptions,
) -> HarnessResult<Resolved> {
    if locator.is_multiple() {
        poll_matches(driver, locator, scope, options).map(Resolved::Many)
    } else {
        first_match(driver, locator, scope, options).map(Resolved::One)
    }
}

/// Wait for a child of an already-resolved element
pub fn find_child(
    driver: &dyn WebDriver,
    parent: &ElementHandle,
    locator: &Locator,
    options: &WaitOptions,
) -> HarnessResult<ElementHandle> {
    first_match(driver, locator, Some(parent), options)
}

/// Ask the browser to centre `element` in the viewport. Best effort.
pub fn scroll_into_view(driver: &dyn WebDriver, element: &ElementHandle) {
    if let Err(err) = driver.execute_script(SCROLL_INTO_VIEW_SCRIPT, std::slice::from_ref(element))
    {
        tracing::debug!(%element, error = %err, "scroll into view failed");
    }
}

/// Where a resolution searches: a driver session, an optional root element
/// and the wait budget.
#[derive(Clone)]
pub struct SearchContext {
    driver: SharedDriver,
    scope: Option<ElementHandle>,
    wait: WaitOptions,
}

impl fmt::Debug for SearchContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchContext")
            .field("scope", &self.scope)
            .field("wait", &self.wait)
            .finish_non_exhaustive()
    }
}

impl SearchContext {
    /// Search the whole document
    #[must_use]
    pub fn document(driver: SharedDriver, wait: WaitOptions) -> Self {
        Self {
            driver,
            scope: None,
            wait,
        }
    }

    /// Narrow the search to descendants of `root`
    #[must_use]
    pub fn within(&self, root: ElementHandle) -> Self {
        Self {
            driver: self.driver.clone(),
            scope: Some(root),
            wait: self.wait,
        }
    }

    /// Same scope with a different wait budget
    #[must_use]
    pub fn with_wait(mut self, wait: WaitOptions) -> Self {
        self.wait = wait;
        self
    }

    /// Driver session
    #[must_use]
    pub fn driver(&self) -> &dyn WebDriver {
        self.driver.as_ref()
    }

    /// Shared driver session
    #[must_use]
    pub fn shared_driver(&self) -> &SharedDriver {
        &self.driver
    }

    /// Root element, `None` for the document
    #[must_use]
    pub const fn scope(&self) -> Option<&ElementHandle> {
        self.scope.as_ref()
    }

    /// Wait budget for resolutions
    #[must_use]
    pub const fn wait(&self) -> &WaitOptions {
        &self.wait
    }

    /// Resolve a locator honouring its multiplicity
    pub fn find(&self, locator: &Locator) -> HarnessResult<Resolved> {
        find(self.driver(), locator, self.scope(), &self.wait)
    }

    /// First match, regardless of the locator's multiplicity
    pub fn find_one(&self, locator: &Locator) -> HarnessResult<ElementHandle> {
        first_match(self.driver(), locator, self.scope(), &self.wait)
    }

    /// Every match, regardless of the locator's multiplicity
    pub fn find_all(&self, locator: &Locator) -> HarnessResult<Vec<ElementHandle>> {
        poll_matches(self.driver(), locator, self.scope(), &self.wait)
    }

    /// Centre `element` in the viewport
    pub fn scroll_into_view(&self, element: &ElementHandle) {
        scroll_into_view(self.driver(), element);
    }
}

/// Declaration of a named element, resolved on every access
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementSelector {
    locator: Locator,
}

impl ElementSelector {
    /// Declare an element
    #[must_use]
    pub const fn new(locator: Locator) -> Self {
        Self { locator }
    }

    /// Declared locator
    #[must_use]
    pub const fn locator(&self) -> &Locator {
        &self.locator
    }

    /// Resolve against the live document
    pub fn resolve(&self, ctx: &SearchContext) -> HarnessResult<Resolved> {
        ctx.find(&self.locator)
    }
}

impl From<Locator> for ElementSelector {
    fn from(locator: Locator) -> Self {
        Self::new(locator)
    }
}
