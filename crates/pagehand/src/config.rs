//! Harness configuration.
//!
//! Configuration is an explicit value handed to pages and hooks. It can be
//! built in code, loaded from a YAML or JSON file, and overlaid with the
//! environment variables the harness has always honoured:
//!
//! | Variable | Field | Default |
//! |---|---|---|
//! | `PAGE_ELEMENT_TIMEOUT` | `element_timeout_secs` | 5 |
//! | `PAGE_TIMEOUT` | `page_timeout_secs` | 20 |
//! | `SCREENSHOTS` | `screenshots` | 0 |
//! | `MOBILE_BROWSER` | `mobile_browser` | 0 |
//! | `SELENIUM_MODE` | `driver_mode` | `local` |
//! | `SELENIUM_BASE_URI` | `driver_uri` | unset |

use crate::driver::WindowSize;
use crate::result::{HarnessError, HarnessResult};
use crate::wait::{WaitOptions, DEFAULT_POLL_INTERVAL_MS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Element resolution timeout variable
pub const ENV_ELEMENT_TIMEOUT: &str = "PAGE_ELEMENT_TIMEOUT";
/// Page assertion timeout variable
pub const ENV_PAGE_TIMEOUT: &str = "PAGE_TIMEOUT";
/// Per-step screenshot flag variable
pub const ENV_SCREENSHOTS: &str = "SCREENSHOTS";
/// Mobile window flag variable
pub const ENV_MOBILE_BROWSER: &str = "MOBILE_BROWSER";
/// Driver mode variable
pub const ENV_DRIVER_MODE: &str = "SELENIUM_MODE";
/// Remote driver endpoint variable
pub const ENV_DRIVER_URI: &str = "SELENIUM_BASE_URI";

/// Where the browser session runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriverMode {
    /// Browser started on this machine
    #[default]
    Local,
    /// Remote WebDriver endpoint
    Remote,
}

impl FromStr for DriverMode {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "remote" => Ok(Self::Remote),
            other => Err(HarnessError::Config {
                message: format!("unknown driver mode '{other}'"),
            }),
        }
    }
}

/// Configuration for one test run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Seconds to wait for an element before `ElementNotFound`
    pub element_timeout_secs: u64,
    /// Seconds to wait in `assert_on_page`
    pub page_timeout_secs: u64,
    /// Milliseconds between polls
    pub poll_interval_ms: u64,
    /// Capture a screenshot after every step
    pub screenshots: bool,
    /// Directory screenshots are written to
    pub screenshot_dir: PathBuf,
    /// Use a mobile-sized window
    pub mobile_browser: bool,
    /// Where the browser session runs. The harness never starts a browser
    /// itself; this is read by whatever builds the [`WebDriver`] session.
    ///
    /// [`WebDriver`]: crate::driver::WebDriver
    pub driver_mode: DriverMode,
    /// Remote WebDriver endpoint for [`DriverMode::Remote`], read by the
    /// session factory like `driver_mode`
    pub driver_uri: Option<String>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            element_timeout_secs: 5,
            page_timeout_secs: 20,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            screenshots: false,
            screenshot_dir: PathBuf::from("screenshots"),
            mobile_browser: false,
            driver_mode: DriverMode::Local,
            driver_uri: None,
        }
    }
}

fn parse_number(name: &str, raw: &str) -> HarnessResult<u64> {
    raw.trim().parse().map_err(|_| HarnessError::Config {
        message: format!("{name} must be a non-negative integer, got '{raw}'"),
    })
}

impl HarnessConfig {
    /// Create a config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the element timeout in seconds
    #[must_use]
    pub const fn with_element_timeout(mut self, secs: u64) -> Self {
        self.element_timeout_secs = secs;
        self
    }

    /// Set the page timeout in seconds
    #[must_use]
    pub const fn with_page_timeout(mut self, secs: u64) -> Self {
        self.page_timeout_secs = secs;
        self
    }

    /// Set the poll interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, ms: u64) -> Self {
        self.poll_interval_ms = ms;
        self
    }

    /// Enable per-step screenshots into `dir`
    #[must_use]
    pub fn with_screenshots(mut self, dir: impl Into<PathBuf>) -> Self {
        self.screenshots = true;
        self.screenshot_dir = dir.into();
        self
    }

    /// Use the mobile window size
    #[must_use]
    pub const fn with_mobile_browser(mut self, mobile: bool) -> Self {
        self.mobile_browser = mobile;
        self
    }

    /// Wait options for element resolution
    #[must_use]
    pub const fn element_wait(&self) -> WaitOptions {
        WaitOptions {
            timeout_ms: self.element_timeout_secs.saturating_mul(1000),
            poll_interval_ms: self.poll_interval_ms,
        }
    }

    /// Wait options for page assertions
    #[must_use]
    pub const fn page_wait(&self) -> WaitOptions {
        WaitOptions {
            timeout_ms: self.page_timeout_secs.saturating_mul(1000),
            poll_interval_ms: self.poll_interval_ms,
        }
    }

    /// Window size scenarios start with
    #[must_use]
    pub const fn window_size(&self) -> WindowSize {
        if self.mobile_browser {
            WindowSize::MOBILE
        } else {
            WindowSize::DESKTOP
        }
    }

    /// Defaults overlaid with the process environment
    pub fn from_env() -> HarnessResult<Self> {
        Self::default().with_env_overrides(|name| std::env::var(name).ok())
    }

    /// Overlay values from an environment-style lookup
    pub fn with_env_overrides<F>(mut self, lookup: F) -> HarnessResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_ELEMENT_TIMEOUT) {
            self.element_timeout_secs = parse_number(ENV_ELEMENT_TIMEOUT, &raw)?;
        }
        if let Some(raw) = lookup(ENV_PAGE_TIMEOUT) {
            self.page_timeout_secs = parse_number(ENV_PAGE_TIMEOUT, &raw)?;
        }
        if let Some(raw) = lookup(ENV_SCREENSHOTS) {
            self.screenshots = parse_number(ENV_SCREENSHOTS, &raw)? != 0;
        }
        if let Some(raw) = lookup(ENV_MOBILE_BROWSER) {
            self.mobile_browser = parse_number(ENV_MOBILE_BROWSER, &raw)? != 0;
        }
        if let Some(raw) = lookup(ENV_DRIVER_MODE) {
            self.driver_mode = raw.parse()?;
        }
        if let Some(raw) = lookup(ENV_DRIVER_URI) {
            self.driver_uri = Some(raw);
        }
        self.validate()?;
        Ok(self)
    }

    /// Parse a YAML document
    pub fn from_yaml_str(source: &str) -> HarnessResult<Self> {
        let config: Self = serde_yaml_ng::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON document
    pub fn from_json_str(source: &str) -> HarnessResult<Self> {
        let config: Self = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a `.json`, `.yaml` or `.yml` file
    pub fn load(path: &Path) -> HarnessResult<Self> {
        let source = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&source),
            Some("yaml" | "yml") => Self::from_yaml_str(&source),
            _ => Err(HarnessError::Config {
                message: format!("unsupported config file: {}", path.display()),
            }),
        }
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> HarnessResult<()> {
        if self.poll_interval_ms == 0 {
            return Err(HarnessError::Config {
                message: "poll_interval_ms must be greater than zero".to_string(),
            });
        }
        if self.driver_mode == DriverMode::Remote && self.driver_uri.is_none() {
            return Err(HarnessError::Config {
                message: format!("remote driver mode requires {ENV_DRIVER_URI}"),
            });
        }
        Ok(())
    }
}
