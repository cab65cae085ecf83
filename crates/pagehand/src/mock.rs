//! In-memory document and driver for testing page objects without a browser.
//!
//! [`MockDriver`] implements [`WebDriver`] over a small node tree. It
//! understands the lookups the page-object layer emits (id, name, tag,
//! class, link text, compound CSS selectors of the form
//! `tag#id.class[attr=value]`, and the text-matching XPath expressions built
//! by [`crate::locator`]), applies the browser side effects of clicks on
//! checkboxes, radios, labels and options, and records every interaction so
//! tests can assert on the exact sequence issued.
//!
//! Nodes can be made to appear late with [`Node::appear_after`] to exercise
//! polling.

use crate::driver::{ElementHandle, WebDriver, WindowSize};
use crate::locator::By;
use crate::result::{HarnessError, HarnessResult};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Bytes returned by [`MockDriver::screenshot`] (PNG signature)
pub const MOCK_SCREENSHOT: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// An interaction recorded by the mock driver
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Element clicked
    Click(String),
    /// Text typed into an element
    SendKeys {
        /// Element id
        element: String,
        /// Typed text
        text: String,
    },
    /// Element cleared
    Clear(String),
    /// Script executed
    Script(String),
    /// URL loaded
    Navigate(String),
    /// Dialog accepted
    AcceptAlert,
    /// Screenshot captured
    Screenshot,
    /// Window resized
    SetWindowSize(WindowSize),
    /// Session closed
    Close,
}

impl Action {
    /// True for user interactions with elements (click, typing, clearing)
    #[must_use]
    pub const fn is_interaction(&self) -> bool {
        matches!(self, Self::Click(_) | Self::SendKeys { .. } | Self::Clear(_))
    }
}

/// Declarative description of a node to insert
#[derive(Debug, Clone, Default)]
pub struct Node {
    tag: String,
    attrs: BTreeMap<String, String>,
    text: String,
    selected: bool,
    appear_after: usize,
}

impl Node {
    /// Create a node with a tag name
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Set an attribute
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let _ = self.attrs.insert(name.into(), value.into());
        self
    }

    /// Set the node's own text
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Mark the node selected (checked / chosen)
    #[must_use]
    pub const fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    /// Hide the node from the next `polls` lookups
    #[must_use]
    pub const fn appear_after(mut self, polls: usize) -> Self {
        self.appear_after = polls;
        self
    }
}

#[derive(Debug)]
struct NodeData {
    tag: String,
    attrs: BTreeMap<String, String>,
    text: String,
    selected: bool,
    parent: Option<usize>,
    children: Vec<usize>,
    visible_from: usize,
    removed: bool,
}

#[derive(Debug, Default)]
struct Document {
    nodes: Vec<NodeData>,
    roots: Vec<usize>,
    find_calls: usize,
    url: String,
    history: Vec<String>,
    redirects: HashMap<String, String>,
    alert: Option<(String, usize)>,
    alert_polls: usize,
    window: Option<WindowSize>,
    closed: bool,
    actions: Vec<Action>,
}

fn index_of(handle: &ElementHandle) -> Option<usize> {
    handle.id().strip_prefix("node-")?.parse().ok()
}

fn handle_of(index: usize) -> ElementHandle {
    ElementHandle::new(format!("node-{index}"))
}

fn normalize_space(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl Document {
    fn node(&self, handle: &ElementHandle) -> HarnessResult<usize> {
        match index_of(handle) {
            Some(i) if i < self.nodes.len() && !self.nodes[i].removed => Ok(i),
            _ => Err(HarnessError::driver(format!(
                "stale element reference: {handle}"
            ))),
        }
    }

    /// XPath string-value: own text followed by descendants' text
    fn string_value(&self, index: usize) -> String {
        let node = &self.nodes[index];
        let mut out = node.text.clone();
        for &child in &node.children {
            if !self.nodes[child].removed {
                out.push_str(&self.string_value(child));
            }
        }
        out
    }

    /// Document order pre-order walk below `from` (or of the whole document)
    fn descendants(&self, from: Option<usize>) -> Vec<usize> {
        let mut out = Vec::new();
        let mut stack: Vec<usize> = match from {
            Some(i) => self.nodes[i].children.iter().rev().copied().collect(),
            None => self.roots.iter().rev().copied().collect(),
        };
        while let Some(i) = stack.pop() {
            if self.nodes[i].removed {
                continue;
            }
            out.push(i);
            stack.extend(self.nodes[i].children.iter().rev().copied());
        }
        out
    }

    fn click_effect(&mut self, index: usize) {
        let tag = self.nodes[index].tag.to_ascii_lowercase();
        let input_type = self.nodes[index]
            .attrs
            .get("type")
            .map(|t| t.to_ascii_lowercase());
        match (tag.as_str(), input_type.as_deref()) {
            ("input", Some("checkbox")) => {
                self.nodes[index].selected = !self.nodes[index].selected;
            }
            ("input", Some("radio")) => {
                let group = self.nodes[index].attrs.get("name").cloned();
                for node in &mut self.nodes {
                    if node.attrs.get("type").map(String::as_str) == Some("radio")
                        && node.attrs.get("name") == group.as_ref()
                    {
                        node.selected = false;
                    }
                }
                self.nodes[index].selected = true;
            }
            ("label", _) => {
                let target = self.nodes[index].attrs.get("for").cloned();
                if let Some(target) = target {
                    let found = (0..self.nodes.len()).find(|&i| {
                        !self.nodes[i].removed
                            && self.nodes[i].attrs.get("id") == Some(&target)
                    });
                    if let Some(i) = found {
                        self.click_effect(i);
                    }
                }
            }
            ("option", _) => {
                let parent = self.nodes[index].parent;
                let multi = parent
                    .is_some_and(|p| self.nodes[p].attrs.contains_key("multiple"));
                if multi {
                    self.nodes[index].selected = !self.nodes[index].selected;
                } else {
                    if let Some(p) = parent {
                        for child in self.nodes[p].children.clone() {
                            self.nodes[child].selected = false;
                        }
                    }
                    self.nodes[index].selected = true;
                }
            }
            _ => {}
        }
    }
}

/// One compound CSS selector: `tag#id.class[attr=value]`
#[derive(Debug, Default)]
struct CssCompound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<(String, Option<String>)>,
}

fn unescape_css(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Read an identifier, honouring backslash escapes
fn take_ident(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut out = String::new();
    while let Some(&c) = chars.peek() {
        if c == '\\' {
            let _ = chars.next();
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else if c.is_alphanumeric() || c == '-' || c == '_' {
            out.push(c);
            let _ = chars.next();
        } else {
            break;
        }
    }
    out
}

fn parse_css(selector: &str) -> HarnessResult<CssCompound> {
    let unsupported = || HarnessError::driver(format!("unsupported css selector: {selector}"));
    let mut compound = CssCompound::default();
    let mut chars = selector.trim().chars().peekable();

    if chars.peek().is_some_and(|c| c.is_alphanumeric() || *c == '*') {
        if chars.peek() == Some(&'*') {
            let _ = chars.next();
        } else {
            compound.tag = Some(take_ident(&mut chars).to_ascii_lowercase());
        }
    }
    while let Some(c) = chars.next() {
        match c {
            '#' => compound.id = Some(take_ident(&mut chars)),
            '.' => compound.classes.push(take_ident(&mut chars)),
            '[' => {
                let mut body = String::new();
                let mut escaped = false;
                for c in chars.by_ref() {
                    if c == ']' && !escaped {
                        break;
                    }
                    escaped = c == '\\' && !escaped;
                    body.push(c);
                }
                let (name, value) = match body.split_once('=') {
                    Some((name, value)) => {
                        let value = value.trim();
                        let value = match value.chars().next() {
                            Some(q @ ('"' | '\'')) if value.len() >= 2 && value.ends_with(q) => {
                                &value[1..value.len() - 1]
                            }
                            _ => value,
                        };
                        (name.trim().to_string(), Some(unescape_css(value)))
                    }
                    None => (body.trim().to_string(), None),
                };
                compound.attrs.push((name, value));
            }
            _ => return Err(unsupported()),
        }
    }
    Ok(compound)
}

#[derive(Debug)]
enum TextQuery {
    Exact(String),
    Contains(String),
}

/// Parse the text XPath forms built by the locator module.
/// Returns the query and whether it is relative to the search scope.
fn parse_xpath(xpath: &str) -> HarnessResult<(TextQuery, bool)> {
    let unsupported = || HarnessError::driver(format!("unsupported xpath: {xpath}"));
    let mut rest = xpath.trim();
    if let Some(inner) = rest.strip_prefix('(').and_then(|r| r.strip_suffix(')')) {
        rest = inner;
    }
    let relative = rest.starts_with('.');
    let rest = rest.trim_start_matches('.');

    let literal = |s: &str| -> Option<String> {
        let s = s.trim();
        let quote = s.chars().next()?;
        if (quote == '"' || quote == '\'') && s.len() >= 2 && s.ends_with(quote) {
            Some(s[1..s.len() - 1].to_string())
        } else {
            None
        }
    };

    if let Some(body) = rest
        .strip_prefix("//*[normalize-space() = ")
        .and_then(|r| r.strip_suffix("]/text()/.."))
    {
        let text = literal(body).ok_or_else(unsupported)?;
        return Ok((TextQuery::Exact(text), relative));
    }
    if let Some(body) = rest
        .strip_prefix("//*[contains(normalize-space(.), ")
        .and_then(|r| r.strip_suffix(")]"))
    {
        let text = literal(body).ok_or_else(unsupported)?;
        return Ok((TextQuery::Contains(text), relative));
    }
    Err(unsupported())
}

/// Mock driver for unit testing
#[derive(Debug, Default)]
pub struct MockDriver {
    doc: Mutex<Document>,
}

impl MockDriver {
    /// Create an empty document at `about:blank`
    #[must_use]
    pub fn new() -> Self {
        let driver = Self::default();
        driver.doc().url = "about:blank".to_string();
        driver
    }

    fn doc(&self) -> MutexGuard<'_, Document> {
        self.doc.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert a node under `parent` (or at the document root)
    pub fn append(&self, parent: Option<&ElementHandle>, node: Node) -> ElementHandle {
        let mut doc = self.doc();
        let index = doc.nodes.len();
        let parent = parent.and_then(index_of).filter(|&p| p < index);
        let visible_from = doc.find_calls + node.appear_after;
        doc.nodes.push(NodeData {
            tag: node.tag,
            attrs: node.attrs,
            text: node.text,
            selected: node.selected,
            parent,
            children: Vec::new(),
            visible_from,
            removed: false,
        });
        match parent {
            Some(p) => doc.nodes[p].children.push(index),
            None => doc.roots.push(index),
        }
        handle_of(index)
    }

    /// Detach a node and its subtree; its handles go stale
    pub fn remove(&self, element: &ElementHandle) {
        let mut doc = self.doc();
        if let Some(i) = index_of(element).filter(|&i| i < doc.nodes.len()) {
            let mut stack = vec![i];
            while let Some(n) = stack.pop() {
                doc.nodes[n].removed = true;
                stack.extend(doc.nodes[n].children.clone());
            }
        }
    }

    /// Set an attribute on an existing node
    pub fn set_attribute(&self, element: &ElementHandle, name: &str, value: &str) {
        let mut doc = self.doc();
        if let Ok(i) = doc.node(element) {
            let _ = doc.nodes[i].attrs.insert(name.to_string(), value.to_string());
        }
    }

    /// Force the selected state of an existing node
    pub fn set_selected(&self, element: &ElementHandle, selected: bool) {
        let mut doc = self.doc();
        if let Ok(i) = doc.node(element) {
            doc.nodes[i].selected = selected;
        }
    }

    /// Current `value` attribute of a node
    #[must_use]
    pub fn value_of(&self, element: &ElementHandle) -> Option<String> {
        let doc = self.doc();
        let i = doc.node(element).ok()?;
        doc.nodes[i].attrs.get("value").cloned()
    }

    /// Current selected state of a node
    #[must_use]
    pub fn selected_of(&self, element: &ElementHandle) -> bool {
        let doc = self.doc();
        doc.node(element).is_ok_and(|i| doc.nodes[i].selected)
    }

    /// Set the URL without recording a navigation
    pub fn set_current_url(&self, url: impl Into<String>) {
        self.doc().url = url.into();
    }

    /// Make navigating to `from` land on `to`
    pub fn redirect(&self, from: impl Into<String>, to: impl Into<String>) {
        let _ = self.doc().redirects.insert(from.into(), to.into());
    }

    /// Open a native dialog after `polls` more presence checks
    pub fn open_alert_after(&self, message: impl Into<String>, polls: usize) {
        let mut doc = self.doc();
        let visible_from = doc.alert_polls + polls;
        doc.alert = Some((message.into(), visible_from));
    }

    /// Open a native dialog immediately
    pub fn open_alert(&self, message: impl Into<String>) {
        self.open_alert_after(message, 0);
    }

    /// Every recorded action, oldest first
    #[must_use]
    pub fn actions(&self) -> Vec<Action> {
        self.doc().actions.clone()
    }

    /// Recorded element interactions only (clicks, typing, clearing)
    #[must_use]
    pub fn interactions(&self) -> Vec<Action> {
        self.doc()
            .actions
            .iter()
            .filter(|a| a.is_interaction())
            .cloned()
            .collect()
    }

    /// Number of clicks recorded against `element`
    #[must_use]
    pub fn clicks_on(&self, element: &ElementHandle) -> usize {
        self.doc()
            .actions
            .iter()
            .filter(|a| matches!(a, Action::Click(id) if id == element.id()))
            .count()
    }

    /// Forget recorded actions
    pub fn clear_actions(&self) {
        self.doc().actions.clear();
    }

    /// Number of `find_elements` calls served so far
    #[must_use]
    pub fn find_calls(&self) -> usize {
        self.doc().find_calls
    }

    /// Last window size requested
    #[must_use]
    pub fn window_size(&self) -> Option<WindowSize> {
        self.doc().window
    }

    /// Whether the session was closed
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.doc().closed
    }

    fn matches(doc: &Document, index: usize, by: &By, css: Option<&CssCompound>) -> bool {
        let node = &doc.nodes[index];
        let attr = |name: &str| node.attrs.get(name).map(String::as_str);
        match by {
            By::Id(v) => attr("id") == Some(v),
            By::Name(v) => attr("name") == Some(v),
            By::TagName(v) => node.tag.eq_ignore_ascii_case(v),
            By::ClassName(v) => attr("class").is_some_and(|c| c.split_whitespace().any(|c| c == v)),
            By::LinkText(v) => {
                node.tag.eq_ignore_ascii_case("a") && normalize_space(&doc.string_value(index)) == *v
            }
            By::PartialLinkText(v) => {
                node.tag.eq_ignore_ascii_case("a") && doc.string_value(index).contains(v.as_str())
            }
            By::Css(_) => css.is_some_and(|c| {
                c.tag.as_ref().map_or(true, |t| node.tag.eq_ignore_ascii_case(t))
                    && c.id.as_ref().map_or(true, |id| attr("id") == Some(id))
                    && c.classes.iter().all(|class| {
                        attr("class").is_some_and(|have| have.split_whitespace().any(|h| h == class))
                    })
                    && c.attrs.iter().all(|(name, value)| match value {
                        Some(v) => attr(name) == Some(v),
                        None => node.attrs.contains_key(name),
                    })
            }),
            By::XPath(_) => false,
        }
    }
}

impl WebDriver for MockDriver {
    fn find_elements(
        &self,
        by: &By,
        scope: Option<&ElementHandle>,
    ) -> HarnessResult<Vec<ElementHandle>> {
        let mut doc = self.doc();
        doc.find_calls += 1;
        let scope = scope.map(|s| doc.node(s)).transpose()?;
        let calls = doc.find_calls;
        let live = |i: &usize| calls > doc.nodes[*i].visible_from;

        let found: Vec<usize> = match by {
            By::XPath(xpath) => {
                let (query, relative) = parse_xpath(xpath)?;
                let from = if relative { scope } else { None };
                doc.descendants(from)
                    .into_iter()
                    .filter(live)
                    .filter(|&i| {
                        let value = normalize_space(&doc.string_value(i));
                        match &query {
                            TextQuery::Exact(t) => {
                                !doc.nodes[i].text.trim().is_empty() && value == *t
                            }
                            TextQuery::Contains(t) => value.contains(t.as_str()),
                        }
                    })
                    .collect()
            }
            By::Css(selector) => {
                let css = parse_css(selector)?;
                doc.descendants(scope)
                    .into_iter()
                    .filter(live)
                    .filter(|&i| Self::matches(&doc, i, by, Some(&css)))
                    .collect()
            }
            _ => doc
                .descendants(scope)
                .into_iter()
                .filter(live)
                .filter(|&i| Self::matches(&doc, i, by, None))
                .collect(),
        };
        Ok(found.into_iter().map(handle_of).collect())
    }

    fn click(&self, element: &ElementHandle) -> HarnessResult<()> {
        let mut doc = self.doc();
        let i = doc.node(element)?;
        doc.actions.push(Action::Click(element.id().to_string()));
        doc.click_effect(i);
        Ok(())
    }

    fn send_keys(&self, element: &ElementHandle, text: &str) -> HarnessResult<()> {
        let mut doc = self.doc();
        let i = doc.node(element)?;
        doc.actions.push(Action::SendKeys {
            element: element.id().to_string(),
            text: text.to_string(),
        });
        let value = doc.nodes[i].attrs.entry("value".to_string()).or_default();
        value.push_str(text);
        Ok(())
    }

    fn clear(&self, element: &ElementHandle) -> HarnessResult<()> {
        let mut doc = self.doc();
        let i = doc.node(element)?;
        doc.actions.push(Action::Clear(element.id().to_string()));
        let _ = doc.nodes[i]
            .attrs
            .insert("value".to_string(), String::new());
        Ok(())
    }

    fn attribute(&self, element: &ElementHandle, name: &str) -> HarnessResult<Option<String>> {
        let doc = self.doc();
        let i = doc.node(element)?;
        Ok(doc.nodes[i].attrs.get(name).cloned())
    }

    fn text(&self, element: &ElementHandle) -> HarnessResult<String> {
        let doc = self.doc();
        let i = doc.node(element)?;
        Ok(normalize_space(&doc.string_value(i)))
    }

    fn is_selected(&self, element: &ElementHandle) -> HarnessResult<bool> {
        let doc = self.doc();
        let i = doc.node(element)?;
        Ok(doc.nodes[i].selected)
    }

    fn execute_script(
        &self,
        script: &str,
        args: &[ElementHandle],
    ) -> HarnessResult<serde_json::Value> {
        let mut doc = self.doc();
        for arg in args {
            let _ = doc.node(arg)?;
        }
        doc.actions.push(Action::Script(script.to_string()));
        if script.contains("history.go(-1)") && doc.history.len() > 1 {
            let _ = doc.history.pop();
            if let Some(previous) = doc.history.last().cloned() {
                doc.url = previous;
            }
        }
        Ok(serde_json::Value::Null)
    }

    fn navigate(&self, url: &str) -> HarnessResult<()> {
        let mut doc = self.doc();
        if doc.closed {
            return Err(HarnessError::driver("session is closed"));
        }
        doc.actions.push(Action::Navigate(url.to_string()));
        let landed = doc.redirects.get(url).cloned().unwrap_or_else(|| url.to_string());
        doc.history.push(landed.clone());
        doc.url = landed;
        Ok(())
    }

    fn current_url(&self) -> HarnessResult<String> {
        Ok(self.doc().url.clone())
    }

    fn screenshot(&self) -> HarnessResult<Vec<u8>> {
        self.doc().actions.push(Action::Screenshot);
        Ok(MOCK_SCREENSHOT.to_vec())
    }

    fn alert_text(&self) -> HarnessResult<Option<String>> {
        let mut doc = self.doc();
        doc.alert_polls += 1;
        let polls = doc.alert_polls;
        Ok(doc
            .alert
            .as_ref()
            .filter(|(_, visible_from)| polls > *visible_from)
            .map(|(message, _)| message.clone()))
    }

    fn accept_alert(&self) -> HarnessResult<()> {
        let mut doc = self.doc();
        if doc.alert.take().is_none() {
            return Err(HarnessError::driver("no such alert"));
        }
        doc.actions.push(Action::AcceptAlert);
        Ok(())
    }

    fn set_window_size(&self, size: WindowSize) -> HarnessResult<()> {
        let mut doc = self.doc();
        if doc.closed {
            return Err(HarnessError::driver("session is closed"));
        }
        doc.actions.push(Action::SetWindowSize(size));
        doc.window = Some(size);
        Ok(())
    }

    fn close(&self) -> HarnessResult<()> {
        let mut doc = self.doc();
        doc.actions.push(Action::Close);
        doc.closed = true;
        Ok(())
    }
}
