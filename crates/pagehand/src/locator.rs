//! Locator abstraction for element selection.
//!
//! A [`Locator`] is declaration-time metadata: a lookup strategy, a value and
//! whether all matches are wanted. It never touches the document; the
//! [`crate::element`] module turns it into live handles.
//!
//! # Strategies
//!
//! The driver understands the classic WebDriver strategies ([`By`]). The
//! page-object layer adds [`Strategy::TextContent`], which matches an element
//! by its exact visible text and is rewritten to XPath before it reaches the
//! driver.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lookup strategy for a locator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// `id` attribute
    Id,
    /// `name` attribute
    Name,
    /// CSS selector
    Css,
    /// XPath expression
    XPath,
    /// Exact anchor text
    LinkText,
    /// Anchor text substring
    PartialLinkText,
    /// Element tag name
    TagName,
    /// Single class name
    ClassName,
    /// Exact visible text, normalized to XPath before lookup
    TextContent,
}

impl Strategy {
    /// Name of the strategy as WebDriver spells it
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Css => "css selector",
            Self::XPath => "xpath",
            Self::LinkText => "link text",
            Self::PartialLinkText => "partial link text",
            Self::TagName => "tag name",
            Self::ClassName => "class name",
            Self::TextContent => "text content",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A strategy/value pair the driver can execute directly.
///
/// There is no text-content variant: [`Locator::to_by`] has already rewritten
/// it to XPath.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum By {
    /// `id` attribute
    Id(String),
    /// `name` attribute
    Name(String),
    /// CSS selector
    Css(String),
    /// XPath expression
    XPath(String),
    /// Exact anchor text
    LinkText(String),
    /// Anchor text substring
    PartialLinkText(String),
    /// Element tag name
    TagName(String),
    /// Single class name
    ClassName(String),
}

impl By {
    /// Strategy this lookup uses
    #[must_use]
    pub const fn strategy(&self) -> Strategy {
        match self {
            Self::Id(_) => Strategy::Id,
            Self::Name(_) => Strategy::Name,
            Self::Css(_) => Strategy::Css,
            Self::XPath(_) => Strategy::XPath,
            Self::LinkText(_) => Strategy::LinkText,
            Self::PartialLinkText(_) => Strategy::PartialLinkText,
            Self::TagName(_) => Strategy::TagName,
            Self::ClassName(_) => Strategy::ClassName,
        }
    }

    /// Lookup value
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::Id(v)
            | Self::Name(v)
            | Self::Css(v)
            | Self::XPath(v)
            | Self::LinkText(v)
            | Self::PartialLinkText(v)
            | Self::TagName(v)
            | Self::ClassName(v) => v,
        }
    }
}

impl fmt::Display for By {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.strategy(), self.value())
    }
}

/// Quote a string as an XPath literal.
///
/// XPath 1.0 has no escape sequences, so text containing both quote kinds is
/// spliced together with `concat()`.
#[must_use]
pub fn xpath_literal(text: &str) -> String {
    if !text.contains('"') {
        format!("\"{text}\"")
    } else if !text.contains('\'') {
        format!("'{text}'")
    } else {
        let parts: Vec<String> = text.split('"').map(|p| format!("\"{p}\"")).collect();
        format!("concat({})", parts.join(", '\"', "))
    }
}

/// XPath selecting the element that owns a text node whose normalized text
/// equals `text` exactly.
#[must_use]
pub fn exact_text_xpath(text: &str) -> String {
    format!("//*[normalize-space() = {}]/text()/..", xpath_literal(text))
}

/// XPath selecting every element whose normalized text contains `text`.
#[must_use]
pub fn contains_text_xpath(text: &str) -> String {
    format!("(//*[contains(normalize-space(.), {})])", xpath_literal(text))
}

/// Declaration-time description of zero or more document nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locator {
    strategy: Strategy,
    value: String,
    #[serde(default)]
    multiple: bool,
}

impl Locator {
    /// Create a locator resolving to the first match
    #[must_use]
    pub fn new(strategy: Strategy, value: impl Into<String>) -> Self {
        Self {
            strategy,
            value: value.into(),
            multiple: false,
        }
    }

    /// Locate by `id` attribute
    #[must_use]
    pub fn id(value: impl Into<String>) -> Self {
        Self::new(Strategy::Id, value)
    }

    /// Locate by `name` attribute
    #[must_use]
    pub fn name(value: impl Into<String>) -> Self {
        Self::new(Strategy::Name, value)
    }

    /// Locate by CSS selector
    #[must_use]
    pub fn css(value: impl Into<String>) -> Self {
        Self::new(Strategy::Css, value)
    }

    /// Locate by XPath
    #[must_use]
    pub fn xpath(value: impl Into<String>) -> Self {
        Self::new(Strategy::XPath, value)
    }

    /// Locate by exact visible text
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::new(Strategy::TextContent, value)
    }

    /// Locate anchors by exact text
    #[must_use]
    pub fn link_text(value: impl Into<String>) -> Self {
        Self::new(Strategy::LinkText, value)
    }

    /// Locate by tag name
    #[must_use]
    pub fn tag_name(value: impl Into<String>) -> Self {
        Self::new(Strategy::TagName, value)
    }

    /// Locate by class name
    #[must_use]
    pub fn class_name(value: impl Into<String>) -> Self {
        Self::new(Strategy::ClassName, value)
    }

    /// Resolve to every match instead of the first
    #[must_use]
    pub const fn multiple(mut self) -> Self {
        self.multiple = true;
        self
    }

    /// Set whether every match is returned
    #[must_use]
    pub const fn with_multiple(mut self, multiple: bool) -> Self {
        self.multiple = multiple;
        self
    }

    /// Lookup strategy
    #[must_use]
    pub const fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Lookup value as declared
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Whether every match is returned
    #[must_use]
    pub const fn is_multiple(&self) -> bool {
        self.multiple
    }

    /// Lower the locator to a driver lookup, rewriting text content to XPath
    #[must_use]
    pub fn to_by(&self) -> By {
        let value = self.value.clone();
        match self.strategy {
            Strategy::Id => By::Id(value),
            Strategy::Name => By::Name(value),
            Strategy::Css => By::Css(value),
            Strategy::XPath => By::XPath(value),
            Strategy::LinkText => By::LinkText(value),
            Strategy::PartialLinkText => By::PartialLinkText(value),
            Strategy::TagName => By::TagName(value),
            Strategy::ClassName => By::ClassName(value),
            Strategy::TextContent => By::XPath(exact_text_xpath(&self.value)),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.strategy, self.value)?;
        if self.multiple {
            f.write_str(" (all)")?;
        }
        Ok(())
    }
}
