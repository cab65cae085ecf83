//! Sections: named, nestable regions of a page.
//!
//! A [`SectionSelector`] declares a region by locator together with the
//! named elements, sub-sections and forms inside it. Resolving it yields a
//! [`Section`] whose root handle scopes every child lookup, so a child can
//! never match a node outside the section even when an identical node
//! exists elsewhere on the page. Nesting composes: a sub-section resolves
//! inside its parent's root, and its own children inside its root.
//!
//! ```text
//! page ─► nav (section, #nav) ─► menu (section, ul.menu) ─► items (li, many)
//! ```

use crate::driver::ElementHandle;
use crate::element::{ElementSelector, Resolved, SearchContext};
use crate::form::{BoundForm, Form};
use crate::locator::Locator;
use crate::result::{HarnessError, HarnessResult};
use std::collections::BTreeMap;

/// A named child of a page or section
#[derive(Debug, Clone)]
pub enum Child {
    /// A single element or element list
    Element(ElementSelector),
    /// A nested section
    Section(SectionSelector),
}

/// Named children of a page or section
pub type Children = BTreeMap<String, Child>;

/// A resolved child
#[derive(Debug)]
pub enum Target<'a> {
    /// Live element handle(s)
    Element(Resolved),
    /// Live section
    Section(Section<'a>),
}

impl<'a> Target<'a> {
    /// The element handle(s), failing for sections
    pub fn into_element(self, name: &str) -> HarnessResult<Resolved> {
        match self {
            Self::Element(resolved) => Ok(resolved),
            Self::Section(_) => Err(HarnessError::unknown_alias(name)),
        }
    }

    /// The section, failing for elements
    pub fn into_section(self, name: &str) -> HarnessResult<Section<'a>> {
        match self {
            Self::Section(section) => Ok(section),
            Self::Element(_) => Err(HarnessError::unknown_alias(name)),
        }
    }

    /// The handle to interact with: the element itself or the section root
    #[must_use]
    pub fn handle(&self) -> Option<&ElementHandle> {
        match self {
            Self::Element(resolved) => resolved.first(),
            Self::Section(section) => Some(section.element()),
        }
    }
}

/// Resolve the child called `name` inside `ctx`
pub(crate) fn resolve_child<'a>(
    children: &'a Children,
    name: &str,
    ctx: &SearchContext,
) -> HarnessResult<Target<'a>> {
    match children.get(name) {
        Some(Child::Element(selector)) => selector.resolve(ctx).map(Target::Element),
        Some(Child::Section(selector)) => selector.resolve(ctx).map(Target::Section),
        None => Err(HarnessError::unknown_alias(name)),
    }
}

/// Walk a chain of names through nested sections, resolving each hop
pub(crate) fn walk<'a>(
    children: &'a Children,
    ctx: &SearchContext,
    names: &[&str],
) -> HarnessResult<Target<'a>> {
    let (first, rest) = names
        .split_first()
        .ok_or_else(|| HarnessError::unknown_alias(""))?;
    let mut target = resolve_child(children, first, ctx)?;
    for name in rest {
        target = match target {
            Target::Section(section) => section.get(name)?,
            Target::Element(_) => return Err(HarnessError::unknown_alias(*name)),
        };
    }
    Ok(target)
}

/// Declaration of a page region and its children
#[derive(Debug, Clone)]
pub struct SectionSelector {
    locator: Locator,
    children: Children,
    forms: BTreeMap<String, Form>,
}

impl SectionSelector {
    /// Declare a section located by `locator`
    #[must_use]
    pub fn new(locator: Locator) -> Self {
        Self {
            locator,
            children: Children::new(),
            forms: BTreeMap::new(),
        }
    }

    /// Add a named element
    #[must_use]
    pub fn with_element(mut self, name: impl Into<String>, locator: Locator) -> Self {
        let _ = self
            .children
            .insert(name.into(), Child::Element(ElementSelector::new(locator)));
        self
    }

    /// Add a named sub-section
    #[must_use]
    pub fn with_section(mut self, name: impl Into<String>, section: SectionSelector) -> Self {
        let _ = self.children.insert(name.into(), Child::Section(section));
        self
    }

    /// Add a named form whose inputs resolve inside this section
    #[must_use]
    pub fn with_form(mut self, name: impl Into<String>, form: Form) -> Self {
        let _ = self.forms.insert(name.into(), form);
        self
    }

    /// Locator of the section root
    #[must_use]
    pub const fn locator(&self) -> &Locator {
        &self.locator
    }

    /// Declared child names
    #[must_use]
    pub fn child_names(&self) -> Vec<&str> {
        self.children.keys().map(String::as_str).collect()
    }

    /// Resolve the root inside `parent` and bind the children to it
    pub fn resolve(&self, parent: &SearchContext) -> HarnessResult<Section<'_>> {
        let root = parent.find_one(&self.locator)?;
        tracing::debug!(locator = %self.locator, %root, "resolved section");
        Ok(Section {
            selector: self,
            ctx: parent.within(root.clone()),
            root,
        })
    }
}

/// A live section: a resolved root plus its declared children.
///
/// Obtained fresh on every access; hold one only for the duration of a
/// single interaction.
#[derive(Debug)]
pub struct Section<'a> {
    selector: &'a SectionSelector,
    root: ElementHandle,
    ctx: SearchContext,
}

impl<'a> Section<'a> {
    /// Resolved root element
    #[must_use]
    pub const fn element(&self) -> &ElementHandle {
        &self.root
    }

    /// Search context confined to this section
    #[must_use]
    pub const fn context(&self) -> &SearchContext {
        &self.ctx
    }

    /// Resolve a named child
    pub fn get(&self, name: &str) -> HarnessResult<Target<'a>> {
        resolve_child(&self.selector.children, name, &self.ctx)
    }

    /// Resolve a named element
    pub fn find(&self, name: &str) -> HarnessResult<Resolved> {
        self.get(name)?.into_element(name)
    }

    /// Resolve a named element to a single handle
    pub fn find_one(&self, name: &str) -> HarnessResult<ElementHandle> {
        match self.selector.children.get(name) {
            Some(Child::Element(selector)) => self.ctx.find_one(selector.locator()),
            _ => Err(HarnessError::unknown_alias(name)),
        }
    }

    /// Resolve a named element to every match
    pub fn find_all(&self, name: &str) -> HarnessResult<Vec<ElementHandle>> {
        match self.selector.children.get(name) {
            Some(Child::Element(selector)) => self.ctx.find_all(selector.locator()),
            _ => Err(HarnessError::unknown_alias(name)),
        }
    }

    /// Resolve a named sub-section
    pub fn section(&self, name: &str) -> HarnessResult<Section<'a>> {
        self.get(name)?.into_section(name)
    }

    /// Bind a named form to this section
    pub fn form(&self, name: &str) -> HarnessResult<BoundForm<'a>> {
        self.selector
            .forms
            .get(name)
            .map(|form| form.bind(self.ctx.clone()))
            .ok_or_else(|| HarnessError::unknown_alias(name))
    }

    /// Walk a chain of names below this section
    pub fn get_path(&self, names: &[&str]) -> HarnessResult<Target<'a>> {
        walk(&self.selector.children, &self.ctx, names)
    }
}
