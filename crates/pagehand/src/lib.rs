//! Pagehand: page objects for behaviour-driven browser tests
//!
//! Scenarios written in plain language ("I click on "Sign in" on the home
//! page") drive a browser through page objects. A page object declares the
//! elements, sections and forms of one page; every access resolves them
//! against the live document by polling until they appear or a timeout
//! expires.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    PAGEHAND Architecture                        │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐            │
//! │   │ Step text  │    │ Page       │    │ Element    │            │
//! │   │ (steps)    │───►│ Registry / │───►│ Resolver   │───► driver │
//! │   │            │    │ Page       │    │ (polling)  │            │
//! │   └────────────┘    └────────────┘    └────────────┘            │
//! │                      sections, forms   locators                  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use pagehand::prelude::*;
//! use std::sync::Arc;
//!
//! let driver = Arc::new(MockDriver::new());
//! let email = driver.append(None, Node::new("input").attr("name", "email"));
//!
//! let signup = Page::new("signup", driver.clone(), "https://example.com", "/signup", HarnessConfig::new())?
//!     .with_form("details", Form::new().with(TextInput::new("email"))?);
//!
//! signup.go_to_page()?;
//! signup.form("details")?.fill("email", "a@b.com")?;
//! assert_eq!(driver.value_of(&email).as_deref(), Some("a@b.com"));
//! # Ok::<(), HarnessError>(())
//! ```

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

mod config;
mod driver;
#[allow(clippy::missing_errors_doc, clippy::must_use_candidate)]
mod element;
#[allow(
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::missing_const_for_fn
)]
mod form;
mod lifecycle;
mod locator;
mod logging;
#[allow(clippy::missing_const_for_fn, clippy::doc_markdown)]
mod mock;
#[allow(clippy::missing_errors_doc, clippy::must_use_candidate)]
mod page;
mod registry;
mod result;
mod section;
mod steps;
mod wait;

pub use config::{
    DriverMode, HarnessConfig, ENV_DRIVER_MODE, ENV_DRIVER_URI, ENV_ELEMENT_TIMEOUT,
    ENV_MOBILE_BROWSER, ENV_PAGE_TIMEOUT, ENV_SCREENSHOTS,
};
pub use driver::{ElementHandle, SharedDriver, WebDriver, WindowSize};
pub use element::{
    find, find_child, scroll_into_view, ElementSelector, Resolved, SearchContext,
    SCROLL_INTO_VIEW_SCRIPT,
};
pub use form::{
    BoundForm, Button, CheckableGroupInput, CheckboxInput, DateInput, DateParts, DropdownItem,
    Field, Form, FormInput, GroupKind, MultiSelectInput, RadioInput, SelectInput, TextInput,
    CHECKED, UNCHECKED,
};
pub use lifecycle::{
    screenshot_stem, step_stem, Scenario, ScenarioHooks, ScenarioOutcome, Step,
};
pub use locator::{contains_text_xpath, exact_text_xpath, xpath_literal, By, Locator, Strategy};
pub use logging::{init_logging, DEFAULT_FILTER};
pub use mock::{Action, MockDriver, Node, MOCK_SCREENSHOT};
pub use page::{join_url, normalize_path, save_screenshot, Page, GO_BACK_SCRIPT};
pub use registry::PageRegistry;
pub use result::{HarnessError, HarnessResult};
pub use section::{Child, Children, Section, SectionSelector, Target};
pub use steps::{StepKind, StepRunner, HOME_PAGE};
pub use wait::{
    poll, wait_for, wait_until, FnCondition, WaitCondition, WaitOptions, WaitResult,
    DEFAULT_ELEMENT_TIMEOUT_MS, DEFAULT_PAGE_TIMEOUT_MS, DEFAULT_POLL_INTERVAL_MS,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use super::config::*;
    pub use super::driver::*;
    pub use super::element::{ElementSelector, Resolved, SearchContext};
    pub use super::form::*;
    pub use super::lifecycle::*;
    pub use super::locator::*;
    pub use super::logging::init_logging;
    pub use super::mock::*;
    pub use super::page::*;
    pub use super::registry::*;
    pub use super::result::*;
    pub use super::section::*;
    pub use super::steps::*;
    pub use super::wait::{WaitCondition, WaitOptions, WaitResult};
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use std::sync::Arc;

    mod prelude_tests {
        use super::*;

        #[test]
        fn test_prelude_builds_a_page() {
            use crate::prelude::*;
            let driver: SharedDriver = Arc::new(MockDriver::new());
            let page = Page::new("home", driver, "https://example.com", "", HarnessConfig::new())
                .unwrap()
                .with_element("logo", Locator::css("img.logo"));
            assert_eq!(page.url(), "https://example.com/");
        }
    }

    mod error_tests {
        use super::*;

        #[test]
        fn test_not_found_message_names_locator_and_strategy() {
            let err = HarnessError::ElementNotFound {
                locator: "#go".to_string(),
                strategy: Strategy::Css,
            };
            assert_eq!(
                err.to_string(),
                "Element not found. Locator: '#go'. Find method: 'css selector'"
            );
        }
    }
}
