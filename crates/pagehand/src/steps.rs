//! Step definitions.
//!
//! Maps the plain-language step phrases used in feature files onto page
//! operations. Phrases name pages by their registry name; quoted parts carry
//! text, aliases and values verbatim.
//!
//! | Phrase | Operation |
//! |---|---|
//! | `I go to the {page} page` | [`Page::go_to_page`] |
//! | `I am redirected to the {page} page` | [`Page::go_to_page`] |
//! | `I search on {page} page with {query} {parameter}` | [`Page::go_to_link`] with [`Page::search_url`] |
//! | `I click on "{text}" on the {page} page` | [`Page::click_on_text`] |
//! | `I hit enter on "{text}" on the {page} page` | [`Page::enter_on_text`] |
//! | `I see "{text}" on the {page} page` | [`Page::assert_text`] |
//! | `I see "{text}" contained on the {page} page` | [`Page::assert_text_contained`] |
//! | `I am on the {application} {page} page` | [`Page::assert_on_page`] |
//! | `I accept the alert on the {application} {page} page` | [`Page::accept_alert`] |
//! | `On home page I want to see {text}` | [`Page::assert_text`] on `home` |
//! | `I fill "{alias}" with "{value}" in the {form} form on the {page} page` | form fill |
//! | `I verify "{alias}" is "{value}" in the {form} form on the {page} page` | form verify |
//!
//! [`Page::go_to_page`]: crate::page::Page::go_to_page
//! [`Page::go_to_link`]: crate::page::Page::go_to_link
//! [`Page::search_url`]: crate::page::Page::search_url
//! [`Page::click_on_text`]: crate::page::Page::click_on_text
//! [`Page::enter_on_text`]: crate::page::Page::enter_on_text
//! [`Page::assert_text`]: crate::page::Page::assert_text
//! [`Page::assert_text_contained`]: crate::page::Page::assert_text_contained
//! [`Page::assert_on_page`]: crate::page::Page::assert_on_page
//! [`Page::accept_alert`]: crate::page::Page::accept_alert

use crate::registry::PageRegistry;
use crate::result::{HarnessError, HarnessResult};
use regex::{Captures, Regex};

/// Registry name of the page used by the home-page text steps
pub const HOME_PAGE: &str = "home";

/// Operation a step phrase maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKind {
    /// Navigate to a page
    GoTo,
    /// Navigate to a page with a query parameter
    Search,
    /// Click on exact text
    ClickOnText,
    /// Press Enter on exact text
    EnterOnText,
    /// Exact text is present
    SeeText,
    /// Some element contains text
    SeeTextContained,
    /// Browser is on a qualified page
    OnPage,
    /// Accept a native dialog on a qualified page
    AcceptAlert,
    /// Exact text is present on the home page
    HomeText,
    /// Fill a form input
    FillForm,
    /// Verify a form input
    VerifyForm,
}

const STEP_PATTERNS: &[(StepKind, &str)] = &[
    (StepKind::GoTo, r"^I go to the (?P<page>.+) page$"),
    (StepKind::GoTo, r"^I am redirected to the (?P<page>.+) page$"),
    (
        StepKind::Search,
        r"^I search on (?P<page>.+?) page with (?P<query>.+?) (?P<parameter>.+)$",
    ),
    (
        StepKind::ClickOnText,
        r#"^I click on "(?P<text>.+?)" on the (?P<page>.+) page$"#,
    ),
    (
        StepKind::EnterOnText,
        r#"^I hit enter on "(?P<text>.+?)" on the (?P<page>.+) page$"#,
    ),
    (
        StepKind::SeeTextContained,
        r#"^I see "(?P<text>.+?)" contained on the (?P<page>.+) page$"#,
    ),
    (
        StepKind::SeeText,
        r#"^I see "(?P<text>.+?)" on the (?P<page>.+) page$"#,
    ),
    (
        StepKind::OnPage,
        r"^I am on the (?P<application>.+?) (?P<page>.+) page$",
    ),
    (
        StepKind::AcceptAlert,
        r"^I accept the alert on the (?P<application>.+?) (?P<page>.+) page$",
    ),
    (
        StepKind::HomeText,
        r"^On (?:home|searching) page I want to see (?P<text>.+)$",
    ),
    (
        StepKind::FillForm,
        r#"^I fill "(?P<alias>.+?)" with "(?P<value>.*?)" in the (?P<form>.+?) form on the (?P<page>.+) page$"#,
    ),
    (
        StepKind::VerifyForm,
        r#"^I verify "(?P<alias>.+?)" is "(?P<value>.*?)" in the (?P<form>.+?) form on the (?P<page>.+) page$"#,
    ),
];

const KEYWORD_PATTERN: &str = r"^\s*(?:Given|When|Then|And|But)\s+";

fn compile(pattern: &str) -> HarnessResult<Regex> {
    Regex::new(pattern).map_err(|source| HarnessError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

fn capture<'t>(captures: &Captures<'t>, name: &str) -> &'t str {
    captures.name(name).map_or("", |m| m.as_str())
}

/// Runs step text against the pages of a registry
#[derive(Debug, Clone)]
pub struct StepRunner {
    registry: PageRegistry,
    steps: Vec<(StepKind, Regex)>,
    keyword: Regex,
}

impl StepRunner {
    /// Runner over `registry`
    pub fn new(registry: PageRegistry) -> HarnessResult<Self> {
        let steps = STEP_PATTERNS
            .iter()
            .map(|(kind, pattern)| Ok((*kind, compile(pattern)?)))
            .collect::<HarnessResult<Vec<_>>>()?;
        Ok(Self {
            registry,
            steps,
            keyword: compile(KEYWORD_PATTERN)?,
        })
    }

    /// Pages steps can refer to
    #[must_use]
    pub const fn registry(&self) -> &PageRegistry {
        &self.registry
    }

    /// Mutable access for registering pages between scenarios
    pub fn registry_mut(&mut self) -> &mut PageRegistry {
        &mut self.registry
    }

    fn strip_keyword<'t>(&self, step: &'t str) -> &'t str {
        let trimmed = step.trim();
        match self.keyword.find(trimmed) {
            Some(keyword) => &trimmed[keyword.end()..],
            None => trimmed,
        }
    }

    fn find_step<'t>(&self, step: &'t str) -> Option<(StepKind, Captures<'t>)> {
        let text = self.strip_keyword(step);
        self.steps
            .iter()
            .find_map(|(kind, pattern)| pattern.captures(text).map(|caps| (*kind, caps)))
    }

    /// Which operation `step` maps to, if any
    #[must_use]
    pub fn matches(&self, step: &str) -> Option<StepKind> {
        self.find_step(step).map(|(kind, _)| kind)
    }

    /// Run one step
    pub fn run(&self, step: &str) -> HarnessResult<()> {
        let Some((kind, caps)) = self.find_step(step) else {
            tracing::warn!(step, "undefined step");
            return Err(HarnessError::UndefinedStep {
                step: step.trim().to_string(),
            });
        };
        tracing::debug!(step, ?kind, "running step");

        let pages = &self.registry;
        match kind {
            StepKind::GoTo => pages.get(capture(&caps, "page"))?.go_to_page(),
            StepKind::Search => {
                let page = pages.get(capture(&caps, "page"))?;
                page.go_to_link(&page.search_url(capture(&caps, "query"), capture(&caps, "parameter")))
            }
            StepKind::ClickOnText => pages
                .get(capture(&caps, "page"))?
                .click_on_text(capture(&caps, "text")),
            StepKind::EnterOnText => pages
                .get(capture(&caps, "page"))?
                .enter_on_text(capture(&caps, "text")),
            StepKind::SeeText => pages
                .get(capture(&caps, "page"))?
                .assert_text(capture(&caps, "text")),
            StepKind::SeeTextContained => pages
                .get(capture(&caps, "page"))?
                .assert_text_contained(capture(&caps, "text")),
            StepKind::OnPage => pages
                .get_qualified(&[capture(&caps, "application"), capture(&caps, "page")])?
                .assert_on_page(),
            StepKind::AcceptAlert => pages
                .get_qualified(&[capture(&caps, "application"), capture(&caps, "page")])?
                .accept_alert(),
            StepKind::HomeText => pages.get(HOME_PAGE)?.assert_text(capture(&caps, "text")),
            StepKind::FillForm => pages
                .get(capture(&caps, "page"))?
                .form(capture(&caps, "form"))?
                .fill(capture(&caps, "alias"), capture(&caps, "value")),
            StepKind::VerifyForm => pages
                .get(capture(&caps, "page"))?
                .form(capture(&caps, "form"))?
                .verify(capture(&caps, "alias"), capture(&caps, "value")),
        }
    }
}
