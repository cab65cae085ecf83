//! Driver boundary.
//!
//! The page-object layer depends only on the [`WebDriver`] capability
//! surface: find handles for a lookup (optionally under a scope), interact
//! with a handle, and drive the browser session. Any transport (WebDriver
//! HTTP, CDP, an in-memory document) can sit behind it.
//!
//! ```text
//! Page / Section / Form
//!         │  Locator ──► By
//!         ▼
//! ┌──────────────────────┐
//! │  dyn WebDriver       │  find_elements / click / send_keys / ...
//! └──────────────────────┘
//!         │
//!   remote session │ MockDriver (tests)
//! ```

use crate::locator::By;
use crate::result::HarnessResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Opaque reference to a live node in the current document.
///
/// Handles are only valid until the document re-renders; callers borrow one
/// for a single interaction and resolve again for the next.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementHandle {
    id: String,
}

impl ElementHandle {
    /// Wrap a driver-assigned element id
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// Driver-assigned element id
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "element({})", self.id)
    }
}

/// Browser window dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSize {
    /// Width in CSS pixels
    pub width: u32,
    /// Height in CSS pixels
    pub height: u32,
}

impl WindowSize {
    /// Desktop scenario window
    pub const DESKTOP: Self = Self {
        width: 1280,
        height: 800,
    };

    /// Mobile scenario window
    pub const MOBILE: Self = Self {
        width: 412,
        height: 732,
    };
}

/// Browser automation capability surface.
///
/// All calls are synchronous: they block the scenario thread until the
/// browser answers. Implementations own exactly one session.
pub trait WebDriver: Send + Sync {
    /// All nodes matching `by`, searched under `scope` or the whole document.
    /// An empty vector means "nothing yet", not an error.
    fn find_elements(&self, by: &By, scope: Option<&ElementHandle>)
        -> HarnessResult<Vec<ElementHandle>>;

    /// Click an element
    fn click(&self, element: &ElementHandle) -> HarnessResult<()>;

    /// Type text into an element
    fn send_keys(&self, element: &ElementHandle, text: &str) -> HarnessResult<()>;

    /// Clear an editable element
    fn clear(&self, element: &ElementHandle) -> HarnessResult<()>;

    /// Read an attribute or property; `None` when absent
    fn attribute(&self, element: &ElementHandle, name: &str) -> HarnessResult<Option<String>>;

    /// Visible text of an element
    fn text(&self, element: &ElementHandle) -> HarnessResult<String>;

    /// Selected state of an option, checkbox or radio button
    fn is_selected(&self, element: &ElementHandle) -> HarnessResult<bool>;

    /// Run a script in the page; `args` are exposed as `arguments[i]`
    fn execute_script(
        &self,
        script: &str,
        args: &[ElementHandle],
    ) -> HarnessResult<serde_json::Value>;

    /// Load a URL in the current tab
    fn navigate(&self, url: &str) -> HarnessResult<()>;

    /// URL currently shown in the tab
    fn current_url(&self) -> HarnessResult<String>;

    /// PNG screenshot of the viewport
    fn screenshot(&self) -> HarnessResult<Vec<u8>>;

    /// Message of the open native dialog, if any
    fn alert_text(&self) -> HarnessResult<Option<String>>;

    /// Accept the open native dialog
    fn accept_alert(&self) -> HarnessResult<()>;

    /// Resize the browser window
    fn set_window_size(&self, size: WindowSize) -> HarnessResult<()>;

    /// End the session
    fn close(&self) -> HarnessResult<()>;
}

/// Driver session shared by the pages of one scenario
pub type SharedDriver = Arc<dyn WebDriver>;
